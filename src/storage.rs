use crate::entities;
use crate::errors::LodgeError;
use crate::settings::Database as DbCfg;
use crate::warranty::expiration_date;
use base64ct::Encoding;
use chrono::Utc;
use rand::RngCore;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Database, DatabaseConnection, EntityTrait, QueryFilter,
    QueryOrder, Set,
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Property {
    pub id: String,
    pub name: String,
    pub address: Option<String>,
    pub created_at: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewProperty {
    pub name: String,
    pub address: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Warranty {
    pub id: String,
    pub property_id: Option<String>,
    pub parent_warranty_id: Option<String>,
    pub product_name: String,
    pub vendor: Option<String>,
    pub manufacturer: Option<String>,
    pub contact_info: Option<String>,
    pub purchased_from: Option<String>,
    pub cost: Option<f64>,
    pub purchase_date: Option<String>,
    pub duration: String,
    pub custom_duration_days: Option<i64>,
    pub expiration_date: Option<String>,
    pub attachments: Vec<String>,
    pub notes: Option<String>,
    pub created_by: Option<String>,
    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NewWarranty {
    pub property_id: Option<String>,
    pub parent_warranty_id: Option<String>,
    pub product_name: String,
    pub vendor: Option<String>,
    pub manufacturer: Option<String>,
    pub contact_info: Option<String>,
    pub purchased_from: Option<String>,
    pub cost: Option<f64>,
    pub purchase_date: Option<String>,
    pub duration: String,
    pub custom_duration_days: Option<i64>,
    #[serde(default)]
    pub attachments: Vec<String>,
    pub notes: Option<String>,
    pub created_by: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Asset {
    pub id: String,
    pub property_id: Option<String>,
    pub warranty_id: Option<String>,
    pub category: String,
    pub brand: Option<String>,
    pub model: Option<String>,
    pub condition: Option<String>,
    pub location: Option<String>,
    pub cost: Option<f64>,
    pub notes: Option<String>,
    pub created_at: i64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NewAsset {
    pub property_id: Option<String>,
    pub warranty_id: Option<String>,
    pub category: String,
    pub brand: Option<String>,
    pub model: Option<String>,
    pub condition: Option<String>,
    pub location: Option<String>,
    pub cost: Option<f64>,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DamageReport {
    pub id: String,
    pub property_id: Option<String>,
    pub title: String,
    pub description: Option<String>,
    pub severity: String,
    pub status: String,
    pub responsible_party: String,
    pub guest_name: Option<String>,
    pub booking_reference: Option<String>,
    pub photo_urls: Vec<String>,
    pub estimated_cost: Option<f64>,
    pub notes: Option<String>,
    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewDamageReport {
    pub property_id: Option<String>,
    pub title: String,
    pub description: Option<String>,
    pub severity: String,
    #[serde(default = "default_report_status")]
    pub status: String,
    #[serde(default = "default_responsible_party")]
    pub responsible_party: String,
    pub guest_name: Option<String>,
    pub booking_reference: Option<String>,
    #[serde(default)]
    pub photo_urls: Vec<String>,
    pub estimated_cost: Option<f64>,
    pub notes: Option<String>,
}

fn default_report_status() -> String {
    "open".to_string()
}

fn default_responsible_party() -> String {
    "unknown".to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InventoryItem {
    pub id: String,
    pub property_id: Option<String>,
    pub name: String,
    pub category: Option<String>,
    pub current_quantity: i64,
    pub restock_threshold: i64,
    pub reorder_quantity: i64,
    pub supplier: Option<String>,
    pub marketplace_url: Option<String>,
    pub unit_cost: Option<f64>,
    pub notes: Option<String>,
    pub created_at: i64,
    pub updated_at: i64,
}

impl InventoryItem {
    /// Master items carry no property assignment and act as templates.
    pub fn is_master(&self) -> bool {
        self.property_id.is_none()
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NewInventoryItem {
    pub property_id: Option<String>,
    pub name: String,
    pub category: Option<String>,
    #[serde(default)]
    pub current_quantity: i64,
    #[serde(default)]
    pub restock_threshold: i64,
    #[serde(default)]
    pub reorder_quantity: i64,
    pub supplier: Option<String>,
    pub marketplace_url: Option<String>,
    pub unit_cost: Option<f64>,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChecklistItem {
    pub description: String,
    #[serde(default)]
    pub notes: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InspectionTemplate {
    pub id: String,
    pub property_id: Option<String>,
    pub name: String,
    pub items: Vec<ChecklistItem>,
    pub created_at: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewInspectionTemplate {
    pub property_id: Option<String>,
    pub name: String,
    #[serde(default)]
    pub items: Vec<ChecklistItem>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InspectionRecord {
    pub id: String,
    pub template_id: String,
    pub property_id: Option<String>,
    pub inspector: Option<String>,
    pub completed_on: String,
    pub notes: Option<String>,
    pub created_at: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewInspectionRecord {
    pub template_id: String,
    pub property_id: Option<String>,
    pub inspector: Option<String>,
    pub completed_on: String,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Invitation {
    pub id: String,
    pub email: String,
    pub role: String,
    pub token: String,
    pub status: String,
    pub invited_by: Option<String>,
    pub created_at: i64,
    pub expires_at: i64,
}

pub async fn init(cfg: &DbCfg) -> Result<DatabaseConnection, LodgeError> {
    use migration::MigratorTrait;

    let db = Database::connect(&cfg.url).await?;
    migration::Migrator::up(&db, None).await?;
    Ok(db)
}

fn new_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

/// Opaque URL-safe token for invitation links.
fn random_token() -> String {
    let mut bytes = [0u8; 24];
    rand::thread_rng().fill_bytes(&mut bytes);
    base64ct::Base64UrlUnpadded::encode_string(&bytes)
}

// Property operations

pub async fn create_property(
    db: &DatabaseConnection,
    input: NewProperty,
) -> Result<Property, LodgeError> {
    let id = new_id();
    let created_at = Utc::now().timestamp();

    let property = entities::property::ActiveModel {
        id: Set(id.clone()),
        name: Set(input.name.clone()),
        address: Set(input.address.clone()),
        created_at: Set(created_at),
    };

    property.insert(db).await?;

    Ok(Property {
        id,
        name: input.name,
        address: input.address,
        created_at,
    })
}

pub async fn get_property(
    db: &DatabaseConnection,
    id: &str,
) -> Result<Option<Property>, LodgeError> {
    use entities::property::{Column, Entity};

    Ok(Entity::find()
        .filter(Column::Id.eq(id))
        .one(db)
        .await?
        .map(|model| Property {
            id: model.id,
            name: model.name,
            address: model.address,
            created_at: model.created_at,
        }))
}

pub async fn list_properties(db: &DatabaseConnection) -> Result<Vec<Property>, LodgeError> {
    use entities::property::{Column, Entity};

    let models = Entity::find().order_by_asc(Column::Name).all(db).await?;
    Ok(models
        .into_iter()
        .map(|model| Property {
            id: model.id,
            name: model.name,
            address: model.address,
            created_at: model.created_at,
        })
        .collect())
}

/// Lookup table from property id to display name, for search and digests.
pub async fn property_names(
    db: &DatabaseConnection,
) -> Result<HashMap<String, String>, LodgeError> {
    use entities::property::Entity;

    let models = Entity::find().all(db).await?;
    Ok(models.into_iter().map(|m| (m.id, m.name)).collect())
}

pub async fn update_property(
    db: &DatabaseConnection,
    id: &str,
    input: NewProperty,
) -> Result<Property, LodgeError> {
    use entities::property::{Column, Entity};

    let model = Entity::find()
        .filter(Column::Id.eq(id))
        .one(db)
        .await?
        .ok_or_else(|| LodgeError::NotFound(format!("property {id}")))?;

    let mut active: entities::property::ActiveModel = model.into();
    active.name = Set(input.name);
    active.address = Set(input.address);
    let updated = active.update(db).await?;

    Ok(Property {
        id: updated.id,
        name: updated.name,
        address: updated.address,
        created_at: updated.created_at,
    })
}

pub async fn delete_property(db: &DatabaseConnection, id: &str) -> Result<(), LodgeError> {
    use entities::property::{Column, Entity};

    Entity::delete_many().filter(Column::Id.eq(id)).exec(db).await?;
    Ok(())
}

// Warranty operations

fn warranty_from_model(model: entities::warranty::Model) -> Result<Warranty, LodgeError> {
    let attachments: Vec<String> = serde_json::from_str(&model.attachments).unwrap_or_default();
    Ok(Warranty {
        id: model.id,
        property_id: model.property_id,
        parent_warranty_id: model.parent_warranty_id,
        product_name: model.product_name,
        vendor: model.vendor,
        manufacturer: model.manufacturer,
        contact_info: model.contact_info,
        purchased_from: model.purchased_from,
        cost: model.cost,
        purchase_date: model.purchase_date,
        duration: model.duration,
        custom_duration_days: model.custom_duration_days,
        expiration_date: model.expiration_date,
        attachments,
        notes: model.notes,
        created_by: model.created_by,
        created_at: model.created_at,
        updated_at: model.updated_at,
    })
}

pub async fn create_warranty(
    db: &DatabaseConnection,
    input: NewWarranty,
) -> Result<Warranty, LodgeError> {
    let id = new_id();
    let now = Utc::now().timestamp();
    // The stored expiration date is always recomputed from the purchase
    // date and duration policy before the write.
    let expiration = expiration_date(
        input.purchase_date.as_deref(),
        &input.duration,
        input.custom_duration_days,
    );
    let attachments_json = serde_json::to_string(&input.attachments)?;

    let warranty = entities::warranty::ActiveModel {
        id: Set(id.clone()),
        property_id: Set(input.property_id.clone()),
        parent_warranty_id: Set(input.parent_warranty_id.clone()),
        product_name: Set(input.product_name.clone()),
        vendor: Set(input.vendor.clone()),
        manufacturer: Set(input.manufacturer.clone()),
        contact_info: Set(input.contact_info.clone()),
        purchased_from: Set(input.purchased_from.clone()),
        cost: Set(input.cost),
        purchase_date: Set(input.purchase_date.clone()),
        duration: Set(input.duration.clone()),
        custom_duration_days: Set(input.custom_duration_days),
        expiration_date: Set(expiration.clone()),
        attachments: Set(attachments_json),
        notes: Set(input.notes.clone()),
        created_by: Set(input.created_by.clone()),
        created_at: Set(now),
        updated_at: Set(now),
    };

    warranty.insert(db).await?;

    Ok(Warranty {
        id,
        property_id: input.property_id,
        parent_warranty_id: input.parent_warranty_id,
        product_name: input.product_name,
        vendor: input.vendor,
        manufacturer: input.manufacturer,
        contact_info: input.contact_info,
        purchased_from: input.purchased_from,
        cost: input.cost,
        purchase_date: input.purchase_date,
        duration: input.duration,
        custom_duration_days: input.custom_duration_days,
        expiration_date: expiration,
        attachments: input.attachments,
        notes: input.notes,
        created_by: input.created_by,
        created_at: now,
        updated_at: now,
    })
}

pub async fn get_warranty(
    db: &DatabaseConnection,
    id: &str,
) -> Result<Option<Warranty>, LodgeError> {
    use entities::warranty::{Column, Entity};

    match Entity::find().filter(Column::Id.eq(id)).one(db).await? {
        Some(model) => Ok(Some(warranty_from_model(model)?)),
        None => Ok(None),
    }
}

/// List warranties, optionally scoped to one property, in creation order.
pub async fn list_warranties(
    db: &DatabaseConnection,
    property_id: Option<&str>,
) -> Result<Vec<Warranty>, LodgeError> {
    use entities::warranty::{Column, Entity};

    let mut query = Entity::find().order_by_asc(Column::CreatedAt);
    if let Some(property) = property_id {
        query = query.filter(Column::PropertyId.eq(property));
    }

    let models = query.all(db).await?;
    models.into_iter().map(warranty_from_model).collect()
}

pub async fn update_warranty(
    db: &DatabaseConnection,
    id: &str,
    input: NewWarranty,
) -> Result<Warranty, LodgeError> {
    use entities::warranty::{Column, Entity};

    let model = Entity::find()
        .filter(Column::Id.eq(id))
        .one(db)
        .await?
        .ok_or_else(|| LodgeError::NotFound(format!("warranty {id}")))?;

    let expiration = expiration_date(
        input.purchase_date.as_deref(),
        &input.duration,
        input.custom_duration_days,
    );
    let attachments_json = serde_json::to_string(&input.attachments)?;

    let mut active: entities::warranty::ActiveModel = model.into();
    active.property_id = Set(input.property_id);
    active.parent_warranty_id = Set(input.parent_warranty_id);
    active.product_name = Set(input.product_name);
    active.vendor = Set(input.vendor);
    active.manufacturer = Set(input.manufacturer);
    active.contact_info = Set(input.contact_info);
    active.purchased_from = Set(input.purchased_from);
    active.cost = Set(input.cost);
    active.purchase_date = Set(input.purchase_date);
    active.duration = Set(input.duration);
    active.custom_duration_days = Set(input.custom_duration_days);
    active.expiration_date = Set(expiration);
    active.attachments = Set(attachments_json);
    active.notes = Set(input.notes);
    active.updated_at = Set(Utc::now().timestamp());

    let updated = active.update(db).await?;
    warranty_from_model(updated)
}

/// Delete a warranty. Sub-warranties go with it via the ON DELETE CASCADE
/// on parent_warranty_id.
pub async fn delete_warranty(db: &DatabaseConnection, id: &str) -> Result<(), LodgeError> {
    use entities::warranty::{Column, Entity};

    Entity::delete_many().filter(Column::Id.eq(id)).exec(db).await?;
    Ok(())
}

// Asset operations

fn asset_from_model(model: entities::asset::Model) -> Asset {
    Asset {
        id: model.id,
        property_id: model.property_id,
        warranty_id: model.warranty_id,
        category: model.category,
        brand: model.brand,
        model: model.model,
        condition: model.condition,
        location: model.location,
        cost: model.cost,
        notes: model.notes,
        created_at: model.created_at,
    }
}

pub async fn create_asset(db: &DatabaseConnection, input: NewAsset) -> Result<Asset, LodgeError> {
    let id = new_id();
    let created_at = Utc::now().timestamp();

    let asset = entities::asset::ActiveModel {
        id: Set(id.clone()),
        property_id: Set(input.property_id.clone()),
        warranty_id: Set(input.warranty_id.clone()),
        category: Set(input.category.clone()),
        brand: Set(input.brand.clone()),
        model: Set(input.model.clone()),
        condition: Set(input.condition.clone()),
        location: Set(input.location.clone()),
        cost: Set(input.cost),
        notes: Set(input.notes.clone()),
        created_at: Set(created_at),
    };

    let inserted = asset.insert(db).await?;
    Ok(asset_from_model(inserted))
}

pub async fn get_asset(db: &DatabaseConnection, id: &str) -> Result<Option<Asset>, LodgeError> {
    use entities::asset::{Column, Entity};

    Ok(Entity::find()
        .filter(Column::Id.eq(id))
        .one(db)
        .await?
        .map(asset_from_model))
}

pub async fn list_assets(
    db: &DatabaseConnection,
    property_id: Option<&str>,
) -> Result<Vec<Asset>, LodgeError> {
    use entities::asset::{Column, Entity};

    let mut query = Entity::find().order_by_asc(Column::CreatedAt);
    if let Some(property) = property_id {
        query = query.filter(Column::PropertyId.eq(property));
    }

    Ok(query.all(db).await?.into_iter().map(asset_from_model).collect())
}

pub async fn update_asset(
    db: &DatabaseConnection,
    id: &str,
    input: NewAsset,
) -> Result<Asset, LodgeError> {
    use entities::asset::{Column, Entity};

    let model = Entity::find()
        .filter(Column::Id.eq(id))
        .one(db)
        .await?
        .ok_or_else(|| LodgeError::NotFound(format!("asset {id}")))?;

    let mut active: entities::asset::ActiveModel = model.into();
    active.property_id = Set(input.property_id);
    active.warranty_id = Set(input.warranty_id);
    active.category = Set(input.category);
    active.brand = Set(input.brand);
    active.model = Set(input.model);
    active.condition = Set(input.condition);
    active.location = Set(input.location);
    active.cost = Set(input.cost);
    active.notes = Set(input.notes);

    Ok(asset_from_model(active.update(db).await?))
}

pub async fn delete_asset(db: &DatabaseConnection, id: &str) -> Result<(), LodgeError> {
    use entities::asset::{Column, Entity};

    Entity::delete_many().filter(Column::Id.eq(id)).exec(db).await?;
    Ok(())
}

// Damage report operations

fn damage_report_from_model(model: entities::damage_report::Model) -> DamageReport {
    let photo_urls: Vec<String> = serde_json::from_str(&model.photo_urls).unwrap_or_default();
    DamageReport {
        id: model.id,
        property_id: model.property_id,
        title: model.title,
        description: model.description,
        severity: model.severity,
        status: model.status,
        responsible_party: model.responsible_party,
        guest_name: model.guest_name,
        booking_reference: model.booking_reference,
        photo_urls,
        estimated_cost: model.estimated_cost,
        notes: model.notes,
        created_at: model.created_at,
        updated_at: model.updated_at,
    }
}

pub async fn create_damage_report(
    db: &DatabaseConnection,
    input: NewDamageReport,
) -> Result<DamageReport, LodgeError> {
    let id = new_id();
    let now = Utc::now().timestamp();
    let photo_urls_json = serde_json::to_string(&input.photo_urls)?;

    let report = entities::damage_report::ActiveModel {
        id: Set(id),
        property_id: Set(input.property_id),
        title: Set(input.title),
        description: Set(input.description),
        severity: Set(input.severity),
        status: Set(input.status),
        responsible_party: Set(input.responsible_party),
        guest_name: Set(input.guest_name),
        booking_reference: Set(input.booking_reference),
        photo_urls: Set(photo_urls_json),
        estimated_cost: Set(input.estimated_cost),
        notes: Set(input.notes),
        created_at: Set(now),
        updated_at: Set(now),
    };

    Ok(damage_report_from_model(report.insert(db).await?))
}

pub async fn get_damage_report(
    db: &DatabaseConnection,
    id: &str,
) -> Result<Option<DamageReport>, LodgeError> {
    use entities::damage_report::{Column, Entity};

    Ok(Entity::find()
        .filter(Column::Id.eq(id))
        .one(db)
        .await?
        .map(damage_report_from_model))
}

pub async fn list_damage_reports(
    db: &DatabaseConnection,
    property_id: Option<&str>,
) -> Result<Vec<DamageReport>, LodgeError> {
    use entities::damage_report::{Column, Entity};

    let mut query = Entity::find().order_by_desc(Column::CreatedAt);
    if let Some(property) = property_id {
        query = query.filter(Column::PropertyId.eq(property));
    }

    Ok(query
        .all(db)
        .await?
        .into_iter()
        .map(damage_report_from_model)
        .collect())
}

pub async fn update_damage_report(
    db: &DatabaseConnection,
    id: &str,
    input: NewDamageReport,
) -> Result<DamageReport, LodgeError> {
    use entities::damage_report::{Column, Entity};

    let model = Entity::find()
        .filter(Column::Id.eq(id))
        .one(db)
        .await?
        .ok_or_else(|| LodgeError::NotFound(format!("damage report {id}")))?;

    let photo_urls_json = serde_json::to_string(&input.photo_urls)?;

    let mut active: entities::damage_report::ActiveModel = model.into();
    active.property_id = Set(input.property_id);
    active.title = Set(input.title);
    active.description = Set(input.description);
    active.severity = Set(input.severity);
    active.status = Set(input.status);
    active.responsible_party = Set(input.responsible_party);
    active.guest_name = Set(input.guest_name);
    active.booking_reference = Set(input.booking_reference);
    active.photo_urls = Set(photo_urls_json);
    active.estimated_cost = Set(input.estimated_cost);
    active.notes = Set(input.notes);
    active.updated_at = Set(Utc::now().timestamp());

    Ok(damage_report_from_model(active.update(db).await?))
}

pub async fn delete_damage_report(db: &DatabaseConnection, id: &str) -> Result<(), LodgeError> {
    use entities::damage_report::{Column, Entity};

    Entity::delete_many().filter(Column::Id.eq(id)).exec(db).await?;
    Ok(())
}

// Inventory operations

fn inventory_item_from_model(model: entities::inventory_item::Model) -> InventoryItem {
    InventoryItem {
        id: model.id,
        property_id: model.property_id,
        name: model.name,
        category: model.category,
        current_quantity: model.current_quantity,
        restock_threshold: model.restock_threshold,
        reorder_quantity: model.reorder_quantity,
        supplier: model.supplier,
        marketplace_url: model.marketplace_url,
        unit_cost: model.unit_cost,
        notes: model.notes,
        created_at: model.created_at,
        updated_at: model.updated_at,
    }
}

pub async fn create_inventory_item(
    db: &DatabaseConnection,
    input: NewInventoryItem,
) -> Result<InventoryItem, LodgeError> {
    let id = new_id();
    let now = Utc::now().timestamp();

    let item = entities::inventory_item::ActiveModel {
        id: Set(id),
        property_id: Set(input.property_id),
        name: Set(input.name),
        category: Set(input.category),
        current_quantity: Set(input.current_quantity),
        restock_threshold: Set(input.restock_threshold),
        reorder_quantity: Set(input.reorder_quantity),
        supplier: Set(input.supplier),
        marketplace_url: Set(input.marketplace_url),
        unit_cost: Set(input.unit_cost),
        notes: Set(input.notes),
        created_at: Set(now),
        updated_at: Set(now),
    };

    Ok(inventory_item_from_model(item.insert(db).await?))
}

pub async fn get_inventory_item(
    db: &DatabaseConnection,
    id: &str,
) -> Result<Option<InventoryItem>, LodgeError> {
    use entities::inventory_item::{Column, Entity};

    Ok(Entity::find()
        .filter(Column::Id.eq(id))
        .one(db)
        .await?
        .map(inventory_item_from_model))
}

/// List inventory. `property_id` of None returns everything; use
/// [`list_master_items`] for the unassigned template items.
pub async fn list_inventory_items(
    db: &DatabaseConnection,
    property_id: Option<&str>,
) -> Result<Vec<InventoryItem>, LodgeError> {
    use entities::inventory_item::{Column, Entity};

    let mut query = Entity::find().order_by_asc(Column::Name);
    if let Some(property) = property_id {
        query = query.filter(Column::PropertyId.eq(property));
    }

    Ok(query
        .all(db)
        .await?
        .into_iter()
        .map(inventory_item_from_model)
        .collect())
}

pub async fn list_master_items(
    db: &DatabaseConnection,
) -> Result<Vec<InventoryItem>, LodgeError> {
    use entities::inventory_item::{Column, Entity};

    let models = Entity::find()
        .filter(Column::PropertyId.is_null())
        .order_by_asc(Column::Name)
        .all(db)
        .await?;

    Ok(models.into_iter().map(inventory_item_from_model).collect())
}

pub async fn update_inventory_item(
    db: &DatabaseConnection,
    id: &str,
    input: NewInventoryItem,
) -> Result<InventoryItem, LodgeError> {
    use entities::inventory_item::{Column, Entity};

    let model = Entity::find()
        .filter(Column::Id.eq(id))
        .one(db)
        .await?
        .ok_or_else(|| LodgeError::NotFound(format!("inventory item {id}")))?;

    let mut active: entities::inventory_item::ActiveModel = model.into();
    active.property_id = Set(input.property_id);
    active.name = Set(input.name);
    active.category = Set(input.category);
    active.current_quantity = Set(input.current_quantity);
    active.restock_threshold = Set(input.restock_threshold);
    active.reorder_quantity = Set(input.reorder_quantity);
    active.supplier = Set(input.supplier);
    active.marketplace_url = Set(input.marketplace_url);
    active.unit_cost = Set(input.unit_cost);
    active.notes = Set(input.notes);
    active.updated_at = Set(Utc::now().timestamp());

    Ok(inventory_item_from_model(active.update(db).await?))
}

pub async fn delete_inventory_item(db: &DatabaseConnection, id: &str) -> Result<(), LodgeError> {
    use entities::inventory_item::{Column, Entity};

    Entity::delete_many().filter(Column::Id.eq(id)).exec(db).await?;
    Ok(())
}

/// Apply a quantity delta and append to the change log. Two independent
/// single-row writes, not a transaction.
pub async fn adjust_inventory_quantity(
    db: &DatabaseConnection,
    id: &str,
    delta: i64,
    reason: &str,
    changed_by: Option<&str>,
) -> Result<InventoryItem, LodgeError> {
    use entities::inventory_item::{Column, Entity};

    let model = Entity::find()
        .filter(Column::Id.eq(id))
        .one(db)
        .await?
        .ok_or_else(|| LodgeError::NotFound(format!("inventory item {id}")))?;

    let quantity_after = (model.current_quantity + delta).max(0);
    let property_id = model.property_id.clone();
    let now = Utc::now().timestamp();

    let mut active: entities::inventory_item::ActiveModel = model.into();
    active.current_quantity = Set(quantity_after);
    active.updated_at = Set(now);
    let updated = active.update(db).await?;

    let change = entities::inventory_change::ActiveModel {
        item_id: Set(id.to_string()),
        property_id: Set(property_id),
        delta: Set(delta),
        quantity_after: Set(quantity_after),
        reason: Set(reason.to_string()),
        changed_by: Set(changed_by.map(|c| c.to_string())),
        created_at: Set(now),
        ..Default::default()
    };
    change.insert(db).await?;

    Ok(inventory_item_from_model(updated))
}

pub async fn list_inventory_changes(
    db: &DatabaseConnection,
    item_id: &str,
) -> Result<Vec<entities::inventory_change::Model>, LodgeError> {
    use entities::inventory_change::{Column, Entity};

    Ok(Entity::find()
        .filter(Column::ItemId.eq(item_id))
        .order_by_desc(Column::CreatedAt)
        .all(db)
        .await?)
}

/// Copy a master item to a property as a new independent row. The copy keeps
/// no link back to the master.
pub async fn copy_master_item(
    db: &DatabaseConnection,
    item_id: &str,
    property_id: &str,
) -> Result<InventoryItem, LodgeError> {
    let master = get_inventory_item(db, item_id)
        .await?
        .ok_or_else(|| LodgeError::NotFound(format!("inventory item {item_id}")))?;

    if !master.is_master() {
        return Err(LodgeError::Validation(format!(
            "inventory item {item_id} is already assigned to a property"
        )));
    }

    create_inventory_item(
        db,
        NewInventoryItem {
            property_id: Some(property_id.to_string()),
            name: master.name,
            category: master.category,
            current_quantity: master.current_quantity,
            restock_threshold: master.restock_threshold,
            reorder_quantity: master.reorder_quantity,
            supplier: master.supplier,
            marketplace_url: master.marketplace_url,
            unit_cost: master.unit_cost,
            notes: master.notes,
        },
    )
    .await
}

// Inspection operations

fn template_from_model(
    model: entities::inspection_template::Model,
) -> InspectionTemplate {
    let items: Vec<ChecklistItem> = serde_json::from_str(&model.items).unwrap_or_default();
    InspectionTemplate {
        id: model.id,
        property_id: model.property_id,
        name: model.name,
        items,
        created_at: model.created_at,
    }
}

pub async fn create_inspection_template(
    db: &DatabaseConnection,
    input: NewInspectionTemplate,
) -> Result<InspectionTemplate, LodgeError> {
    let id = new_id();
    let created_at = Utc::now().timestamp();
    let items_json = serde_json::to_string(&input.items)?;

    let template = entities::inspection_template::ActiveModel {
        id: Set(id),
        property_id: Set(input.property_id),
        name: Set(input.name),
        items: Set(items_json),
        created_at: Set(created_at),
    };

    Ok(template_from_model(template.insert(db).await?))
}

pub async fn get_inspection_template(
    db: &DatabaseConnection,
    id: &str,
) -> Result<Option<InspectionTemplate>, LodgeError> {
    use entities::inspection_template::{Column, Entity};

    Ok(Entity::find()
        .filter(Column::Id.eq(id))
        .one(db)
        .await?
        .map(template_from_model))
}

pub async fn list_inspection_templates(
    db: &DatabaseConnection,
) -> Result<Vec<InspectionTemplate>, LodgeError> {
    use entities::inspection_template::{Column, Entity};

    Ok(Entity::find()
        .order_by_asc(Column::Name)
        .all(db)
        .await?
        .into_iter()
        .map(template_from_model)
        .collect())
}

pub async fn update_inspection_template(
    db: &DatabaseConnection,
    id: &str,
    input: NewInspectionTemplate,
) -> Result<InspectionTemplate, LodgeError> {
    use entities::inspection_template::{Column, Entity};

    let model = Entity::find()
        .filter(Column::Id.eq(id))
        .one(db)
        .await?
        .ok_or_else(|| LodgeError::NotFound(format!("inspection template {id}")))?;

    let items_json = serde_json::to_string(&input.items)?;

    let mut active: entities::inspection_template::ActiveModel = model.into();
    active.property_id = Set(input.property_id);
    active.name = Set(input.name);
    active.items = Set(items_json);

    Ok(template_from_model(active.update(db).await?))
}

pub async fn delete_inspection_template(
    db: &DatabaseConnection,
    id: &str,
) -> Result<(), LodgeError> {
    use entities::inspection_template::{Column, Entity};

    Entity::delete_many().filter(Column::Id.eq(id)).exec(db).await?;
    Ok(())
}

fn record_from_model(model: entities::inspection_record::Model) -> InspectionRecord {
    InspectionRecord {
        id: model.id,
        template_id: model.template_id,
        property_id: model.property_id,
        inspector: model.inspector,
        completed_on: model.completed_on,
        notes: model.notes,
        created_at: model.created_at,
    }
}

pub async fn create_inspection_record(
    db: &DatabaseConnection,
    input: NewInspectionRecord,
) -> Result<InspectionRecord, LodgeError> {
    let id = new_id();
    let created_at = Utc::now().timestamp();

    let record = entities::inspection_record::ActiveModel {
        id: Set(id),
        template_id: Set(input.template_id),
        property_id: Set(input.property_id),
        inspector: Set(input.inspector),
        completed_on: Set(input.completed_on),
        notes: Set(input.notes),
        created_at: Set(created_at),
    };

    Ok(record_from_model(record.insert(db).await?))
}

pub async fn list_inspection_records(
    db: &DatabaseConnection,
    property_id: Option<&str>,
) -> Result<Vec<InspectionRecord>, LodgeError> {
    use entities::inspection_record::{Column, Entity};

    let mut query = Entity::find().order_by_desc(Column::CompletedOn);
    if let Some(property) = property_id {
        query = query.filter(Column::PropertyId.eq(property));
    }

    Ok(query
        .all(db)
        .await?
        .into_iter()
        .map(record_from_model)
        .collect())
}

pub async fn delete_inspection_record(
    db: &DatabaseConnection,
    id: &str,
) -> Result<(), LodgeError> {
    use entities::inspection_record::{Column, Entity};

    Entity::delete_many().filter(Column::Id.eq(id)).exec(db).await?;
    Ok(())
}

// Invitation operations

const INVITATION_TTL_SECS: i64 = 7 * 24 * 3600;

fn invitation_from_model(model: entities::invitation::Model) -> Invitation {
    Invitation {
        id: model.id,
        email: model.email,
        role: model.role,
        token: model.token,
        status: model.status,
        invited_by: model.invited_by,
        created_at: model.created_at,
        expires_at: model.expires_at,
    }
}

pub async fn create_invitation(
    db: &DatabaseConnection,
    email: &str,
    role: &str,
    invited_by: Option<&str>,
) -> Result<Invitation, LodgeError> {
    let id = new_id();
    let token = random_token();
    let now = Utc::now().timestamp();

    let invitation = entities::invitation::ActiveModel {
        id: Set(id),
        email: Set(email.to_string()),
        role: Set(role.to_string()),
        token: Set(token),
        status: Set("pending".to_string()),
        invited_by: Set(invited_by.map(|s| s.to_string())),
        created_at: Set(now),
        expires_at: Set(now + INVITATION_TTL_SECS),
    };

    Ok(invitation_from_model(invitation.insert(db).await?))
}

pub async fn list_invitations(db: &DatabaseConnection) -> Result<Vec<Invitation>, LodgeError> {
    use entities::invitation::{Column, Entity};

    Ok(Entity::find()
        .order_by_desc(Column::CreatedAt)
        .all(db)
        .await?
        .into_iter()
        .map(invitation_from_model)
        .collect())
}

/// Accept a pending, unexpired invitation by token. Returns None when the
/// token is unknown, already used, revoked, or expired.
pub async fn accept_invitation(
    db: &DatabaseConnection,
    token: &str,
) -> Result<Option<Invitation>, LodgeError> {
    use entities::invitation::{Column, Entity};

    let model = match Entity::find().filter(Column::Token.eq(token)).one(db).await? {
        Some(m) => m,
        None => return Ok(None),
    };

    let now = Utc::now().timestamp();
    if model.status != "pending" || now > model.expires_at {
        return Ok(None);
    }

    let mut active: entities::invitation::ActiveModel = model.into();
    active.status = Set("accepted".to_string());
    Ok(Some(invitation_from_model(active.update(db).await?)))
}

pub async fn revoke_invitation(db: &DatabaseConnection, id: &str) -> Result<(), LodgeError> {
    use entities::invitation::{Column, Entity};

    if let Some(model) = Entity::find().filter(Column::Id.eq(id)).one(db).await? {
        let mut active: entities::invitation::ActiveModel = model.into();
        active.status = Set("revoked".to_string());
        active.update(db).await?;
    }

    Ok(())
}

// One-time backfill

/// Assign every unowned (null property) inspection record, inventory item,
/// and damage report to the given property. Returns the total rows touched.
pub async fn backfill_unassigned(
    db: &DatabaseConnection,
    property_id: &str,
) -> Result<u64, LodgeError> {
    use sea_orm::sea_query::Expr;

    let mut total = 0u64;

    {
        use entities::inspection_record::{Column, Entity};
        let result = Entity::update_many()
            .col_expr(Column::PropertyId, Expr::value(property_id))
            .filter(Column::PropertyId.is_null())
            .exec(db)
            .await?;
        total += result.rows_affected;
    }

    {
        use entities::inventory_item::{Column, Entity};
        let result = Entity::update_many()
            .col_expr(Column::PropertyId, Expr::value(property_id))
            .filter(Column::PropertyId.is_null())
            .exec(db)
            .await?;
        total += result.rows_affected;
    }

    {
        use entities::damage_report::{Column, Entity};
        let result = Entity::update_many()
            .col_expr(Column::PropertyId, Expr::value(property_id))
            .filter(Column::PropertyId.is_null())
            .exec(db)
            .await?;
        total += result.rows_affected;
    }

    Ok(total)
}
