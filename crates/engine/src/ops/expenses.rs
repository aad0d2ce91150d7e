//! Expense record operations.

use chrono::{NaiveDate, Utc};
use sea_orm::{
    ActiveModelTrait, ActiveValue, ColumnTrait, EntityTrait, IntoActiveModel, QueryFilter,
    QueryOrder, QuerySelect,
};

use crate::{EngineError, Expense, ResultEngine, categories, expenses};

use super::{Engine, ListFilter, new_id};

impl Engine {
    /// Lists expenses matching `filter`, newest first, each joined with
    /// its category's display fields.
    pub async fn list_expenses(&self, filter: &ListFilter) -> ResultEngine<Vec<Expense>> {
        let mut query = expenses::Entity::find()
            .order_by_desc(expenses::Column::Date)
            .order_by_desc(expenses::Column::CreatedAt);

        if let Some((start, end)) = filter.date_range()? {
            query = query
                .filter(expenses::Column::Date.gte(start))
                .filter(expenses::Column::Date.lt(end));
        }
        if let Some(category_id) = &filter.category_id {
            query = query.filter(expenses::Column::CategoryId.eq(category_id));
        }
        if let Some(limit) = filter.limit {
            query = query.limit(limit);
        }

        let rows = query
            .find_also_related(categories::Entity)
            .all(&self.database)
            .await?;
        Ok(rows.into_iter().map(Expense::from).collect())
    }

    /// Returns a single expense with its category display fields.
    pub async fn expense(&self, id: &str) -> ResultEngine<Expense> {
        let row = expenses::Entity::find_by_id(id)
            .find_also_related(categories::Entity)
            .one(&self.database)
            .await?
            .ok_or_else(|| EngineError::KeyNotFound("expense not exists".to_string()))?;
        Ok(row.into())
    }

    /// Records an expense. The amount must be strictly positive and a
    /// supplied category must exist.
    pub async fn create_expense(
        &self,
        amount_minor: i64,
        category_id: Option<&str>,
        description: Option<&str>,
        date: NaiveDate,
    ) -> ResultEngine<Expense> {
        if amount_minor <= 0 {
            return Err(EngineError::InvalidAmount(
                "amount_minor must be > 0".to_string(),
            ));
        }
        if let Some(category_id) = category_id {
            self.require_category(category_id).await?;
        }

        let model = expenses::ActiveModel {
            id: ActiveValue::Set(new_id()),
            amount_minor: ActiveValue::Set(amount_minor),
            category_id: ActiveValue::Set(category_id.map(ToString::to_string)),
            description: ActiveValue::Set(description.unwrap_or_default().to_string()),
            date: ActiveValue::Set(date),
            created_at: ActiveValue::Set(Utc::now()),
        };
        let model = model.insert(&self.database).await?;
        self.expense(&model.id).await
    }

    /// Updates an expense, leaving omitted fields unchanged. `category_id`
    /// distinguishes omitted (`None`) from explicitly cleared
    /// (`Some(None)`).
    pub async fn update_expense(
        &self,
        id: &str,
        amount_minor: Option<i64>,
        category_id: Option<Option<&str>>,
        description: Option<&str>,
        date: Option<NaiveDate>,
    ) -> ResultEngine<Expense> {
        let existing = expenses::Entity::find_by_id(id)
            .one(&self.database)
            .await?
            .ok_or_else(|| EngineError::KeyNotFound("expense not exists".to_string()))?;

        if let Some(amount_minor) = amount_minor
            && amount_minor <= 0
        {
            return Err(EngineError::InvalidAmount(
                "amount_minor must be > 0".to_string(),
            ));
        }
        if let Some(Some(category_id)) = category_id {
            self.require_category(category_id).await?;
        }

        let mut active = existing.into_active_model();
        let mut changed = false;
        if let Some(amount_minor) = amount_minor {
            active.amount_minor = ActiveValue::Set(amount_minor);
            changed = true;
        }
        if let Some(category_id) = category_id {
            active.category_id = ActiveValue::Set(category_id.map(ToString::to_string));
            changed = true;
        }
        if let Some(description) = description {
            active.description = ActiveValue::Set(description.to_string());
            changed = true;
        }
        if let Some(date) = date {
            active.date = ActiveValue::Set(date);
            changed = true;
        }

        if !changed {
            return self.expense(id).await;
        }
        let model = active.update(&self.database).await?;
        self.expense(&model.id).await
    }

    pub async fn delete_expense(&self, id: &str) -> ResultEngine<()> {
        let res = expenses::Entity::delete_by_id(id).exec(&self.database).await?;
        if res.rows_affected == 0 {
            return Err(EngineError::KeyNotFound("expense not exists".to_string()));
        }
        Ok(())
    }
}
