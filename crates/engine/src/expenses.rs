//! Expense records, optionally tied to a category.

use chrono::{DateTime, NaiveDate, Utc};
use sea_orm::entity::prelude::*;

use super::categories;

/// An expense joined with its category's display fields, the shape every
/// read path returns. The category fields are `None` for uncategorized
/// expenses.
#[derive(Clone, Debug, PartialEq)]
pub struct Expense {
    pub id: String,
    pub amount_minor: i64,
    pub category_id: Option<String>,
    pub description: String,
    pub date: NaiveDate,
    pub created_at: DateTime<Utc>,
    pub category_name: Option<String>,
    pub category_icon: Option<String>,
    pub category_color: Option<String>,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "expenses")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub amount_minor: i64,
    pub category_id: Option<String>,
    pub description: String,
    pub date: Date,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::categories::Entity",
        from = "Column::CategoryId",
        to = "super::categories::Column::Id",
        on_update = "NoAction",
        on_delete = "SetNull"
    )]
    Categories,
}

impl Related<super::categories::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Categories.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<(Model, Option<categories::Model>)> for Expense {
    fn from((model, category): (Model, Option<categories::Model>)) -> Self {
        Self {
            id: model.id,
            amount_minor: model.amount_minor,
            category_id: model.category_id,
            description: model.description,
            date: model.date,
            created_at: model.created_at,
            category_name: category.as_ref().map(|c| c.name.clone()),
            category_icon: category.as_ref().map(|c| c.icon.clone()),
            category_color: category.map(|c| c.color),
        }
    }
}
