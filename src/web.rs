//! HTTP API. JSON in, JSON out; errors come back as
//! `{"error": "..."}` with a matching status code. Uploaded files are
//! served read-only under `/files`.
use crate::email::{digest_body, invitation_body, restock_body, EmailClient, RestockItem};
use crate::errors::LodgeError;
use crate::files::FileStore;
use crate::inventory::stock_level;
use crate::rate_limit::RateLimiter;
use crate::settings::Settings;
use crate::storage;
use crate::validate::Validator;
use crate::warranty::{assemble, classify_stored, present, StatusFilter, WarrantyNode};
use crate::{jobs, storage::Warranty};
use axum::body::Bytes;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post, put};
use axum::{Json, Router};
use chrono::Utc;
use miette::IntoDiagnostic;
use sea_orm::DatabaseConnection;
use serde::Deserialize;
use serde_json::{json, Value};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::services::ServeDir;

#[derive(Clone)]
pub struct AppState {
    pub settings: Arc<Settings>,
    pub db: DatabaseConnection,
    pub email: EmailClient,
    pub files: FileStore,
    pub invite_limiter: Arc<RateLimiter>,
    pub restock_limiter: Arc<RateLimiter>,
}

/// Map a domain error onto a status code: validation 400, missing 404,
/// throttled 429, everything else 500.
fn error_response(err: LodgeError) -> Response {
    let (status, message) = match &err {
        LodgeError::Validation(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
        LodgeError::NotFound(msg) => (StatusCode::NOT_FOUND, msg.clone()),
        LodgeError::RateLimited(msg) => (
            StatusCode::TOO_MANY_REQUESTS,
            format!("rate limit exceeded for {msg}"),
        ),
        other => {
            tracing::error!("Request failed: {}", other);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "internal error".to_string(),
            )
        }
    };
    (status, Json(json!({"error": message}))).into_response()
}

pub async fn serve(settings: Settings, db: DatabaseConnection) -> miette::Result<()> {
    let settings = Arc::new(settings);
    let state = AppState {
        email: EmailClient::new(settings.email.clone()),
        files: FileStore::new(settings.files.root.clone(), settings.base_url()),
        invite_limiter: Arc::new(RateLimiter::per_hour(settings.limits.invites_per_hour)),
        restock_limiter: Arc::new(RateLimiter::per_hour(settings.limits.restocks_per_hour)),
        settings: settings.clone(),
        db,
    };

    let router = Router::new()
        .route(
            "/api/properties",
            get(list_properties_handler).post(create_property_handler),
        )
        .route(
            "/api/properties/{id}",
            get(get_property_handler)
                .put(update_property_handler)
                .delete(delete_property_handler),
        )
        .route(
            "/api/warranties",
            get(list_warranties_handler).post(create_warranty_handler),
        )
        .route(
            "/api/warranties/{id}",
            get(get_warranty_handler)
                .put(update_warranty_handler)
                .delete(delete_warranty_handler),
        )
        .route(
            "/api/assets",
            get(list_assets_handler).post(create_asset_handler),
        )
        .route(
            "/api/assets/{id}",
            get(get_asset_handler)
                .put(update_asset_handler)
                .delete(delete_asset_handler),
        )
        .route(
            "/api/damage-reports",
            get(list_damage_reports_handler).post(create_damage_report_handler),
        )
        .route(
            "/api/damage-reports/{id}",
            get(get_damage_report_handler)
                .put(update_damage_report_handler)
                .delete(delete_damage_report_handler),
        )
        .route(
            "/api/inventory",
            get(list_inventory_handler).post(create_inventory_handler),
        )
        .route("/api/inventory/master", get(list_master_items_handler))
        .route(
            "/api/inventory/{id}",
            get(get_inventory_handler)
                .put(update_inventory_handler)
                .delete(delete_inventory_handler),
        )
        .route("/api/inventory/{id}/adjust", post(adjust_inventory_handler))
        .route(
            "/api/inventory/{id}/changes",
            get(list_inventory_changes_handler),
        )
        .route(
            "/api/inventory/{id}/copy-to/{property_id}",
            post(copy_master_item_handler),
        )
        .route(
            "/api/inspection-templates",
            get(list_templates_handler).post(create_template_handler),
        )
        .route(
            "/api/inspection-templates/{id}",
            get(get_template_handler)
                .put(update_template_handler)
                .delete(delete_template_handler),
        )
        .route(
            "/api/inspection-records",
            get(list_records_handler).post(create_record_handler),
        )
        .route(
            "/api/inspection-records/{id}",
            axum::routing::delete(delete_record_handler),
        )
        .route("/api/invitations", get(list_invitations_handler))
        .route(
            "/api/invitations/{id}/revoke",
            post(revoke_invitation_handler),
        )
        .route(
            "/invitations/accept/{token}",
            post(accept_invitation_handler),
        )
        .route("/api/files/{bucket}/{*path}", put(upload_file_handler))
        .route("/functions/invite", post(invite_handler))
        .route("/functions/restock-request", post(restock_request_handler))
        .route("/functions/warranty-digest", post(warranty_digest_handler))
        .route("/admin/jobs/{name}/trigger", post(trigger_job_handler))
        .nest_service("/files", ServeDir::new(&state.settings.files.root))
        .with_state(state.clone());

    let addr: SocketAddr = format!(
        "{}:{}",
        state.settings.server.host, state.settings.server.port
    )
    .parse()
    .map_err(|e| miette::miette!("bad listen addr: {e}"))?;

    tracing::info!(%addr, "API listening");
    let listener = tokio::net::TcpListener::bind(addr).await.into_diagnostic()?;
    axum::serve(listener, router).await.into_diagnostic()?;
    Ok(())
}

// Properties

async fn list_properties_handler(State(state): State<AppState>) -> Response {
    match storage::list_properties(&state.db).await {
        Ok(properties) => Json(properties).into_response(),
        Err(e) => error_response(e),
    }
}

async fn create_property_handler(
    State(state): State<AppState>,
    Json(input): Json<storage::NewProperty>,
) -> Response {
    let mut validator = Validator::new();
    validator.non_empty("name", &input.name).max_len("name", &input.name, 200);
    if let Some(message) = validator.finish() {
        return error_response(LodgeError::Validation(message));
    }

    match storage::create_property(&state.db, input).await {
        Ok(property) => (StatusCode::CREATED, Json(property)).into_response(),
        Err(e) => error_response(e),
    }
}

async fn get_property_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Response {
    match storage::get_property(&state.db, &id).await {
        Ok(Some(property)) => Json(property).into_response(),
        Ok(None) => error_response(LodgeError::NotFound(format!("property {id}"))),
        Err(e) => error_response(e),
    }
}

async fn update_property_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(input): Json<storage::NewProperty>,
) -> Response {
    match storage::update_property(&state.db, &id, input).await {
        Ok(property) => Json(property).into_response(),
        Err(e) => error_response(e),
    }
}

async fn delete_property_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Response {
    match storage::delete_property(&state.db, &id).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => error_response(e),
    }
}

// Warranties

#[derive(Deserialize)]
struct WarrantyListQuery {
    property_id: Option<String>,
    status: Option<String>,
    q: Option<String>,
}

/// Serialize one warranty with its derived badge status attached.
fn warranty_json(warranty: &Warranty, today: chrono::NaiveDate) -> Value {
    let status = classify_stored(warranty.expiration_date.as_deref(), today);
    let mut value = serde_json::to_value(warranty).unwrap_or_else(|_| json!({}));
    if let Value::Object(map) = &mut value {
        map.insert(
            "expiration_status".to_string(),
            json!(status.map(|s| s.as_str())),
        );
    }
    value
}

fn warranty_node_json(node: &WarrantyNode, today: chrono::NaiveDate) -> Value {
    let mut value = warranty_json(&node.warranty, today);
    if let Value::Object(map) = &mut value {
        map.insert(
            "sub_warranties".to_string(),
            Value::Array(
                node.sub_warranties
                    .iter()
                    .map(|sub| warranty_json(sub, today))
                    .collect(),
            ),
        );
    }
    value
}

async fn list_warranties_handler(
    State(state): State<AppState>,
    Query(query): Query<WarrantyListQuery>,
) -> Response {
    let warranties = match storage::list_warranties(&state.db, query.property_id.as_deref()).await
    {
        Ok(w) => w,
        Err(e) => return error_response(e),
    };
    let names = match storage::property_names(&state.db).await {
        Ok(n) => n,
        Err(e) => return error_response(e),
    };

    let filter = query
        .status
        .as_deref()
        .map(StatusFilter::parse)
        .unwrap_or_default();
    let today = Utc::now().date_naive();

    let nodes = present(
        assemble(warranties),
        filter,
        query.q.as_deref(),
        &names,
        today,
    );

    let body: Vec<Value> = nodes
        .iter()
        .map(|node| warranty_node_json(node, today))
        .collect();
    Json(body).into_response()
}

async fn create_warranty_handler(
    State(state): State<AppState>,
    Json(input): Json<storage::NewWarranty>,
) -> Response {
    let mut validator = Validator::new();
    validator
        .non_empty("product_name", &input.product_name)
        .max_len("product_name", &input.product_name, 200)
        .max_items("attachments", &input.attachments, 20);
    if let Some(property) = &input.property_id {
        validator.uuid("property_id", property);
    }
    if let Some(parent) = &input.parent_warranty_id {
        validator.uuid("parent_warranty_id", parent);
    }
    if let Some(message) = validator.finish() {
        return error_response(LodgeError::Validation(message));
    }

    // A sub-warranty must hang off a root; one level of nesting only.
    if let Some(parent_id) = &input.parent_warranty_id {
        match storage::get_warranty(&state.db, parent_id).await {
            Ok(Some(parent)) if parent.parent_warranty_id.is_none() => {}
            Ok(Some(_)) => {
                return error_response(LodgeError::Validation(
                    "parent_warranty_id must reference a top-level warranty".to_string(),
                ))
            }
            Ok(None) => {
                return error_response(LodgeError::NotFound(format!("warranty {parent_id}")))
            }
            Err(e) => return error_response(e),
        }
    }

    match storage::create_warranty(&state.db, input).await {
        Ok(warranty) => {
            let today = Utc::now().date_naive();
            (StatusCode::CREATED, Json(warranty_json(&warranty, today))).into_response()
        }
        Err(e) => error_response(e),
    }
}

async fn get_warranty_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Response {
    match storage::get_warranty(&state.db, &id).await {
        Ok(Some(warranty)) => {
            let today = Utc::now().date_naive();
            Json(warranty_json(&warranty, today)).into_response()
        }
        Ok(None) => error_response(LodgeError::NotFound(format!("warranty {id}"))),
        Err(e) => error_response(e),
    }
}

async fn update_warranty_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(input): Json<storage::NewWarranty>,
) -> Response {
    match storage::update_warranty(&state.db, &id, input).await {
        Ok(warranty) => {
            let today = Utc::now().date_naive();
            Json(warranty_json(&warranty, today)).into_response()
        }
        Err(e) => error_response(e),
    }
}

async fn delete_warranty_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Response {
    match storage::delete_warranty(&state.db, &id).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => error_response(e),
    }
}

// Assets

#[derive(Deserialize)]
struct PropertyQuery {
    property_id: Option<String>,
}

async fn list_assets_handler(
    State(state): State<AppState>,
    Query(query): Query<PropertyQuery>,
) -> Response {
    match storage::list_assets(&state.db, query.property_id.as_deref()).await {
        Ok(assets) => Json(assets).into_response(),
        Err(e) => error_response(e),
    }
}

async fn create_asset_handler(
    State(state): State<AppState>,
    Json(input): Json<storage::NewAsset>,
) -> Response {
    let mut validator = Validator::new();
    validator
        .non_empty("category", &input.category)
        .max_len("category", &input.category, 100);
    if let Some(warranty) = &input.warranty_id {
        validator.uuid("warranty_id", warranty);
    }
    if let Some(message) = validator.finish() {
        return error_response(LodgeError::Validation(message));
    }

    match storage::create_asset(&state.db, input).await {
        Ok(asset) => (StatusCode::CREATED, Json(asset)).into_response(),
        Err(e) => error_response(e),
    }
}

async fn get_asset_handler(State(state): State<AppState>, Path(id): Path<String>) -> Response {
    match storage::get_asset(&state.db, &id).await {
        Ok(Some(asset)) => Json(asset).into_response(),
        Ok(None) => error_response(LodgeError::NotFound(format!("asset {id}"))),
        Err(e) => error_response(e),
    }
}

async fn update_asset_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(input): Json<storage::NewAsset>,
) -> Response {
    match storage::update_asset(&state.db, &id, input).await {
        Ok(asset) => Json(asset).into_response(),
        Err(e) => error_response(e),
    }
}

async fn delete_asset_handler(State(state): State<AppState>, Path(id): Path<String>) -> Response {
    match storage::delete_asset(&state.db, &id).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => error_response(e),
    }
}

// Damage reports

async fn list_damage_reports_handler(
    State(state): State<AppState>,
    Query(query): Query<PropertyQuery>,
) -> Response {
    match storage::list_damage_reports(&state.db, query.property_id.as_deref()).await {
        Ok(reports) => Json(reports).into_response(),
        Err(e) => error_response(e),
    }
}

async fn create_damage_report_handler(
    State(state): State<AppState>,
    Json(input): Json<storage::NewDamageReport>,
) -> Response {
    let mut validator = Validator::new();
    validator
        .non_empty("title", &input.title)
        .max_len("title", &input.title, 200)
        .one_of("severity", &input.severity, &["minor", "moderate", "severe"])
        .one_of(
            "status",
            &input.status,
            &["open", "in_review", "resolved", "closed"],
        )
        .one_of(
            "responsible_party",
            &input.responsible_party,
            &["guest", "owner", "vendor", "unknown"],
        )
        .max_items("photo_urls", &input.photo_urls, 20);
    if let Some(message) = validator.finish() {
        return error_response(LodgeError::Validation(message));
    }

    match storage::create_damage_report(&state.db, input).await {
        Ok(report) => (StatusCode::CREATED, Json(report)).into_response(),
        Err(e) => error_response(e),
    }
}

async fn get_damage_report_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Response {
    match storage::get_damage_report(&state.db, &id).await {
        Ok(Some(report)) => Json(report).into_response(),
        Ok(None) => error_response(LodgeError::NotFound(format!("damage report {id}"))),
        Err(e) => error_response(e),
    }
}

async fn update_damage_report_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(input): Json<storage::NewDamageReport>,
) -> Response {
    match storage::update_damage_report(&state.db, &id, input).await {
        Ok(report) => Json(report).into_response(),
        Err(e) => error_response(e),
    }
}

async fn delete_damage_report_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Response {
    match storage::delete_damage_report(&state.db, &id).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => error_response(e),
    }
}

// Inventory

/// Serialize one inventory item with its derived stock level attached.
fn inventory_json(item: &storage::InventoryItem) -> Value {
    let level = stock_level(item.current_quantity, item.restock_threshold);
    let mut value = serde_json::to_value(item).unwrap_or_else(|_| json!({}));
    if let Value::Object(map) = &mut value {
        map.insert("stock_level".to_string(), json!(level.label()));
    }
    value
}

async fn list_inventory_handler(
    State(state): State<AppState>,
    Query(query): Query<PropertyQuery>,
) -> Response {
    match storage::list_inventory_items(&state.db, query.property_id.as_deref()).await {
        Ok(items) => {
            let body: Vec<Value> = items.iter().map(inventory_json).collect();
            Json(body).into_response()
        }
        Err(e) => error_response(e),
    }
}

async fn list_master_items_handler(State(state): State<AppState>) -> Response {
    match storage::list_master_items(&state.db).await {
        Ok(items) => {
            let body: Vec<Value> = items.iter().map(inventory_json).collect();
            Json(body).into_response()
        }
        Err(e) => error_response(e),
    }
}

async fn create_inventory_handler(
    State(state): State<AppState>,
    Json(input): Json<storage::NewInventoryItem>,
) -> Response {
    let mut validator = Validator::new();
    validator
        .non_empty("name", &input.name)
        .max_len("name", &input.name, 200);
    if let Some(property) = &input.property_id {
        validator.uuid("property_id", property);
    }
    if let Some(message) = validator.finish() {
        return error_response(LodgeError::Validation(message));
    }

    match storage::create_inventory_item(&state.db, input).await {
        Ok(item) => (StatusCode::CREATED, Json(inventory_json(&item))).into_response(),
        Err(e) => error_response(e),
    }
}

async fn get_inventory_handler(State(state): State<AppState>, Path(id): Path<String>) -> Response {
    match storage::get_inventory_item(&state.db, &id).await {
        Ok(Some(item)) => Json(inventory_json(&item)).into_response(),
        Ok(None) => error_response(LodgeError::NotFound(format!("inventory item {id}"))),
        Err(e) => error_response(e),
    }
}

async fn update_inventory_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(input): Json<storage::NewInventoryItem>,
) -> Response {
    match storage::update_inventory_item(&state.db, &id, input).await {
        Ok(item) => Json(inventory_json(&item)).into_response(),
        Err(e) => error_response(e),
    }
}

async fn delete_inventory_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Response {
    match storage::delete_inventory_item(&state.db, &id).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => error_response(e),
    }
}

#[derive(Deserialize)]
struct AdjustRequest {
    delta: i64,
    reason: String,
    changed_by: Option<String>,
}

async fn adjust_inventory_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(input): Json<AdjustRequest>,
) -> Response {
    let mut validator = Validator::new();
    validator
        .non_empty("reason", &input.reason)
        .max_len("reason", &input.reason, 200);
    if let Some(message) = validator.finish() {
        return error_response(LodgeError::Validation(message));
    }

    match storage::adjust_inventory_quantity(
        &state.db,
        &id,
        input.delta,
        &input.reason,
        input.changed_by.as_deref(),
    )
    .await
    {
        Ok(item) => Json(inventory_json(&item)).into_response(),
        Err(e) => error_response(e),
    }
}

async fn list_inventory_changes_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Response {
    match storage::list_inventory_changes(&state.db, &id).await {
        Ok(changes) => Json(changes).into_response(),
        Err(e) => error_response(e),
    }
}

async fn copy_master_item_handler(
    State(state): State<AppState>,
    Path((id, property_id)): Path<(String, String)>,
) -> Response {
    match storage::get_property(&state.db, &property_id).await {
        Ok(Some(_)) => {}
        Ok(None) => {
            return error_response(LodgeError::NotFound(format!("property {property_id}")))
        }
        Err(e) => return error_response(e),
    }

    match storage::copy_master_item(&state.db, &id, &property_id).await {
        Ok(item) => (StatusCode::CREATED, Json(inventory_json(&item))).into_response(),
        Err(e) => error_response(e),
    }
}

// Inspections

async fn list_templates_handler(State(state): State<AppState>) -> Response {
    match storage::list_inspection_templates(&state.db).await {
        Ok(templates) => Json(templates).into_response(),
        Err(e) => error_response(e),
    }
}

async fn create_template_handler(
    State(state): State<AppState>,
    Json(input): Json<storage::NewInspectionTemplate>,
) -> Response {
    let mut validator = Validator::new();
    validator
        .non_empty("name", &input.name)
        .max_len("name", &input.name, 200)
        .max_items("items", &input.items, 100);
    if let Some(message) = validator.finish() {
        return error_response(LodgeError::Validation(message));
    }

    match storage::create_inspection_template(&state.db, input).await {
        Ok(template) => (StatusCode::CREATED, Json(template)).into_response(),
        Err(e) => error_response(e),
    }
}

async fn get_template_handler(State(state): State<AppState>, Path(id): Path<String>) -> Response {
    match storage::get_inspection_template(&state.db, &id).await {
        Ok(Some(template)) => Json(template).into_response(),
        Ok(None) => error_response(LodgeError::NotFound(format!("inspection template {id}"))),
        Err(e) => error_response(e),
    }
}

async fn update_template_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(input): Json<storage::NewInspectionTemplate>,
) -> Response {
    match storage::update_inspection_template(&state.db, &id, input).await {
        Ok(template) => Json(template).into_response(),
        Err(e) => error_response(e),
    }
}

async fn delete_template_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Response {
    match storage::delete_inspection_template(&state.db, &id).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => error_response(e),
    }
}

async fn list_records_handler(
    State(state): State<AppState>,
    Query(query): Query<PropertyQuery>,
) -> Response {
    match storage::list_inspection_records(&state.db, query.property_id.as_deref()).await {
        Ok(records) => Json(records).into_response(),
        Err(e) => error_response(e),
    }
}

async fn create_record_handler(
    State(state): State<AppState>,
    Json(input): Json<storage::NewInspectionRecord>,
) -> Response {
    let mut validator = Validator::new();
    validator
        .uuid("template_id", &input.template_id)
        .non_empty("completed_on", &input.completed_on);
    if let Some(message) = validator.finish() {
        return error_response(LodgeError::Validation(message));
    }

    match storage::create_inspection_record(&state.db, input).await {
        Ok(record) => (StatusCode::CREATED, Json(record)).into_response(),
        Err(e) => error_response(e),
    }
}

async fn delete_record_handler(State(state): State<AppState>, Path(id): Path<String>) -> Response {
    match storage::delete_inspection_record(&state.db, &id).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => error_response(e),
    }
}

// Invitations

async fn list_invitations_handler(State(state): State<AppState>) -> Response {
    match storage::list_invitations(&state.db).await {
        Ok(invitations) => Json(invitations).into_response(),
        Err(e) => error_response(e),
    }
}

async fn revoke_invitation_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Response {
    match storage::revoke_invitation(&state.db, &id).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => error_response(e),
    }
}

async fn accept_invitation_handler(
    State(state): State<AppState>,
    Path(token): Path<String>,
) -> Response {
    match storage::accept_invitation(&state.db, &token).await {
        Ok(Some(invitation)) => Json(invitation).into_response(),
        Ok(None) => (
            StatusCode::BAD_REQUEST,
            Json(json!({"error": "invitation is invalid or expired"})),
        )
            .into_response(),
        Err(e) => error_response(e),
    }
}

// Files

async fn upload_file_handler(
    State(state): State<AppState>,
    Path((bucket, path)): Path<(String, String)>,
    body: Bytes,
) -> Response {
    match state.files.upload(&bucket, &path, &body).await {
        Ok(()) => (
            StatusCode::CREATED,
            Json(json!({"url": state.files.public_url(&bucket, &path)})),
        )
            .into_response(),
        Err(e) => error_response(e),
    }
}

// Email functions

#[derive(Deserialize)]
struct InviteRequest {
    email: String,
    role: String,
    invited_by: Option<String>,
}

async fn invite_handler(
    State(state): State<AppState>,
    Json(input): Json<InviteRequest>,
) -> Response {
    let mut validator = Validator::new();
    validator
        .email("email", &input.email)
        .one_of("role", &input.role, &["admin", "manager", "staff"]);
    if let Some(inviter) = &input.invited_by {
        validator.max_len("invited_by", inviter, 100);
    }
    if let Some(message) = validator.finish() {
        return error_response(LodgeError::Validation(message));
    }

    let key = input.invited_by.as_deref().unwrap_or("global");
    if !state.invite_limiter.check(key) {
        return error_response(LodgeError::RateLimited(format!("invitations by {key}")));
    }

    let invitation = match storage::create_invitation(
        &state.db,
        &input.email,
        &input.role,
        input.invited_by.as_deref(),
    )
    .await
    {
        Ok(i) => i,
        Err(e) => return error_response(e),
    };

    let accept_url = format!(
        "{}/invitations/accept/{}",
        state.settings.base_url(),
        invitation.token
    );
    let body = invitation_body(&input.role, input.invited_by.as_deref(), &accept_url);
    if let Err(e) = state
        .email
        .send(&input.email, "You're invited to Lodgebook", &body)
        .await
    {
        return error_response(e);
    }

    (StatusCode::CREATED, Json(invitation)).into_response()
}

const RESTOCK_ITEM_CAP: usize = 50;

#[derive(Deserialize)]
struct RestockRequest {
    to: String,
    property_id: Option<String>,
    /// Explicit item selection. Empty means "every low or out of stock item
    /// for the property".
    #[serde(default)]
    item_ids: Vec<String>,
}

async fn restock_request_handler(
    State(state): State<AppState>,
    Json(input): Json<RestockRequest>,
) -> Response {
    let mut validator = Validator::new();
    validator
        .email("to", &input.to)
        .max_items("item_ids", &input.item_ids, RESTOCK_ITEM_CAP);
    if let Some(property) = &input.property_id {
        validator.uuid("property_id", property);
    }
    for item_id in &input.item_ids {
        validator.uuid("item_ids", item_id);
    }
    if let Some(message) = validator.finish() {
        return error_response(LodgeError::Validation(message));
    }

    let key = input.property_id.as_deref().unwrap_or("global");
    if !state.restock_limiter.check(key) {
        return error_response(LodgeError::RateLimited(format!("restock requests for {key}")));
    }

    let items = match storage::list_inventory_items(&state.db, input.property_id.as_deref()).await
    {
        Ok(items) => items,
        Err(e) => return error_response(e),
    };

    let selected: Vec<RestockItem> = items
        .into_iter()
        .filter(|item| {
            if input.item_ids.is_empty() {
                stock_level(item.current_quantity, item.restock_threshold)
                    != crate::inventory::StockLevel::InStock
            } else {
                input.item_ids.contains(&item.id)
            }
        })
        .take(RESTOCK_ITEM_CAP)
        .map(|item| RestockItem {
            name: item.name,
            current_quantity: item.current_quantity,
            reorder_quantity: item.reorder_quantity,
            supplier: item.supplier,
        })
        .collect();

    if selected.is_empty() {
        return error_response(LodgeError::Validation(
            "no items need restocking".to_string(),
        ));
    }

    let count = selected.len();
    if let Err(e) = state
        .email
        .send(&input.to, "Restock request", &restock_body(&selected))
        .await
    {
        return error_response(e);
    }

    Json(json!({"sent": true, "items": count})).into_response()
}

#[derive(Deserialize)]
struct DigestRequest {
    to: String,
}

async fn warranty_digest_handler(
    State(state): State<AppState>,
    Json(input): Json<DigestRequest>,
) -> Response {
    let mut validator = Validator::new();
    validator.email("to", &input.to);
    if let Some(message) = validator.finish() {
        return error_response(LodgeError::Validation(message));
    }

    let entries = match jobs::collect_digest_entries(&state.db).await {
        Ok(entries) => entries,
        Err(e) => return error_response(e),
    };

    if entries.is_empty() {
        return Json(json!({"sent": false, "warranties": 0})).into_response();
    }

    let count = entries.len();
    if let Err(e) = state
        .email
        .send(&input.to, "Warranties expiring soon", &digest_body(&entries))
        .await
    {
        return error_response(e);
    }

    Json(json!({"sent": true, "warranties": count})).into_response()
}

// Jobs

async fn trigger_job_handler(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Response {
    if !matches!(
        name.as_str(),
        "warranty_expiration_digest" | "backfill_property_links"
    ) {
        return error_response(LodgeError::NotFound(format!("job {name}")));
    }

    match jobs::trigger_job_manually(&state.db, &state.settings, &name).await {
        Ok(()) => Json(json!({"triggered": name})).into_response(),
        Err(e) => error_response(e),
    }
}
