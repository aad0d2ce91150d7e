//! Income records with a free-text source label.

use chrono::{DateTime, NaiveDate, Utc};
use sea_orm::entity::prelude::*;

/// An income entry. `source` is a label such as "Salary" or "Freelance";
/// the set is open, nothing enforces a closed list.
#[derive(Clone, Debug, PartialEq)]
pub struct Income {
    pub id: String,
    pub amount_minor: i64,
    pub source: String,
    pub description: String,
    pub date: NaiveDate,
    pub is_recurring: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "income")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub amount_minor: i64,
    pub source: String,
    pub description: String,
    pub date: Date,
    pub is_recurring: bool,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for Income {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            amount_minor: model.amount_minor,
            source: model.source,
            description: model.description,
            date: model.date,
            is_recurring: model.is_recurring,
            created_at: model.created_at,
        }
    }
}
