use lodgebook::storage::{
    self, InventoryItem, NewInventoryItem, NewProperty, NewWarranty, Property, Warranty,
};
use sea_orm::DatabaseConnection;

/// Builder for creating test properties
pub struct PropertyBuilder {
    name: String,
    address: Option<String>,
}

impl PropertyBuilder {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            address: None,
        }
    }

    pub fn with_address(mut self, address: &str) -> Self {
        self.address = Some(address.to_string());
        self
    }

    pub async fn create(self, db: &DatabaseConnection) -> Property {
        storage::create_property(
            db,
            NewProperty {
                name: self.name,
                address: self.address,
            },
        )
        .await
        .expect("Failed to create test property")
    }
}

/// Builder for creating test warranties
pub struct WarrantyBuilder {
    input: NewWarranty,
}

impl WarrantyBuilder {
    pub fn new(product_name: &str) -> Self {
        Self {
            input: NewWarranty {
                product_name: product_name.to_string(),
                duration: "1_year".to_string(),
                ..Default::default()
            },
        }
    }

    pub fn for_property(mut self, property_id: &str) -> Self {
        self.input.property_id = Some(property_id.to_string());
        self
    }

    pub fn with_parent(mut self, parent_id: &str) -> Self {
        self.input.parent_warranty_id = Some(parent_id.to_string());
        self
    }

    pub fn purchased_on(mut self, date: &str) -> Self {
        self.input.purchase_date = Some(date.to_string());
        self
    }

    pub fn with_duration(mut self, code: &str) -> Self {
        self.input.duration = code.to_string();
        self
    }

    /// Custom policy with an explicit day count. Combined with a purchase
    /// date of today this pins the expiration at today+N.
    pub fn expiring_in_days(mut self, days: i64) -> Self {
        self.input.purchase_date = Some(chrono::Utc::now().date_naive().to_string());
        self.input.duration = "custom".to_string();
        self.input.custom_duration_days = Some(days);
        self
    }

    pub fn with_vendor(mut self, vendor: &str) -> Self {
        self.input.vendor = Some(vendor.to_string());
        self
    }

    pub async fn create(self, db: &DatabaseConnection) -> Warranty {
        storage::create_warranty(db, self.input)
            .await
            .expect("Failed to create test warranty")
    }
}

/// Builder for creating test inventory items
pub struct InventoryItemBuilder {
    input: NewInventoryItem,
}

impl InventoryItemBuilder {
    pub fn new(name: &str) -> Self {
        Self {
            input: NewInventoryItem {
                name: name.to_string(),
                ..Default::default()
            },
        }
    }

    pub fn for_property(mut self, property_id: &str) -> Self {
        self.input.property_id = Some(property_id.to_string());
        self
    }

    pub fn with_quantities(mut self, current: i64, threshold: i64, reorder: i64) -> Self {
        self.input.current_quantity = current;
        self.input.restock_threshold = threshold;
        self.input.reorder_quantity = reorder;
        self
    }

    pub fn with_supplier(mut self, supplier: &str) -> Self {
        self.input.supplier = Some(supplier.to_string());
        self
    }

    pub async fn create(self, db: &DatabaseConnection) -> InventoryItem {
        storage::create_inventory_item(db, self.input)
            .await
            .expect("Failed to create test inventory item")
    }
}
