use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "inventory_items")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    /// NULL means "master" template item, copyable to properties.
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

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
