use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "damage_reports")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub property_id: Option<String>,
    pub title: String,
    pub description: Option<String>,
    pub severity: String, // "minor" | "moderate" | "severe"
    pub status: String,   // "open" | "in_review" | "resolved" | "closed"
    pub responsible_party: String, // "guest" | "owner" | "vendor" | "unknown"
    pub guest_name: Option<String>,
    pub booking_reference: Option<String>,
    pub photo_urls: String, // JSON-encoded Vec<String>
    pub estimated_cost: Option<f64>,
    pub notes: Option<String>,
    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
