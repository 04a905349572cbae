use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Append-only change log for inventory quantities.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "inventory_changes")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = true)]
    pub id: i64,
    pub item_id: String,
    pub property_id: Option<String>,
    pub delta: i64,
    pub quantity_after: i64,
    pub reason: String,
    pub changed_by: Option<String>,
    pub created_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
