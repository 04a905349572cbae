use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "warranties")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub property_id: Option<String>,
    /// At most one level of nesting; a sub-warranty's parent is always a root.
    pub parent_warranty_id: Option<String>,
    pub product_name: String,
    pub vendor: Option<String>,
    pub manufacturer: Option<String>,
    pub contact_info: Option<String>,
    pub purchased_from: Option<String>,
    pub cost: Option<f64>,
    /// Calendar date, YYYY-MM-DD. No time component.
    pub purchase_date: Option<String>,
    /// Duration policy code: 90_days | 1_year | 2_years | 3_years | 5_years | 10_years | custom
    pub duration: String,
    pub custom_duration_days: Option<i64>,
    /// Stored derived value; recomputed from purchase_date + duration on every write.
    pub expiration_date: Option<String>,
    pub attachments: String, // JSON-encoded Vec<String> of URLs
    pub notes: Option<String>,
    pub created_by: Option<String>,
    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
