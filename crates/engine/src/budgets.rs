//! Monthly budgets, one row per (category, month key) pair.

use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;

use super::categories;

/// A budget joined with its category's display fields. `month` is the
/// canonical `YYYY-MM` key produced by [`crate::Period::month_key`].
#[derive(Clone, Debug, PartialEq)]
pub struct Budget {
    pub id: String,
    pub category_id: String,
    pub amount_minor: i64,
    pub month: String,
    pub created_at: DateTime<Utc>,
    pub category_name: String,
    pub category_icon: String,
    pub category_color: String,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "budgets")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub category_id: String,
    pub amount_minor: i64,
    pub month: String,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::categories::Entity",
        from = "Column::CategoryId",
        to = "super::categories::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    Categories,
}

impl Related<super::categories::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Categories.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<(Model, categories::Model)> for Budget {
    fn from((model, category): (Model, categories::Model)) -> Self {
        Self {
            id: model.id,
            category_id: model.category_id,
            amount_minor: model.amount_minor,
            month: model.month,
            created_at: model.created_at,
            category_name: category.name,
            category_icon: category.icon,
            category_color: category.color,
        }
    }
}
