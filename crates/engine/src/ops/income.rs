//! Income record operations.

use chrono::{NaiveDate, Utc};
use sea_orm::{
    ActiveModelTrait, ActiveValue, ColumnTrait, EntityTrait, IntoActiveModel, QueryFilter,
    QueryOrder, QuerySelect,
};

use crate::{EngineError, Income, ResultEngine, income};

use super::{Engine, ListFilter, new_id, normalize_required_name};

impl Engine {
    /// Lists income entries matching `filter`, newest first.
    pub async fn list_income(&self, filter: &ListFilter) -> ResultEngine<Vec<Income>> {
        let mut query = income::Entity::find()
            .order_by_desc(income::Column::Date)
            .order_by_desc(income::Column::CreatedAt);

        if let Some((start, end)) = filter.date_range()? {
            query = query
                .filter(income::Column::Date.gte(start))
                .filter(income::Column::Date.lt(end));
        }
        if let Some(source) = &filter.source {
            query = query.filter(income::Column::Source.eq(source));
        }
        if let Some(limit) = filter.limit {
            query = query.limit(limit);
        }

        let rows = query.all(&self.database).await?;
        Ok(rows.into_iter().map(Income::from).collect())
    }

    pub async fn income(&self, id: &str) -> ResultEngine<Income> {
        let model = income::Entity::find_by_id(id)
            .one(&self.database)
            .await?
            .ok_or_else(|| EngineError::KeyNotFound("income not exists".to_string()))?;
        Ok(model.into())
    }

    /// Records an income entry. The amount must be strictly positive and
    /// the source label is required.
    pub async fn create_income(
        &self,
        amount_minor: i64,
        source: &str,
        description: Option<&str>,
        date: NaiveDate,
        is_recurring: bool,
    ) -> ResultEngine<Income> {
        if amount_minor <= 0 {
            return Err(EngineError::InvalidAmount(
                "amount_minor must be > 0".to_string(),
            ));
        }
        let source = normalize_required_name(source, "income source")?;

        let model = income::ActiveModel {
            id: ActiveValue::Set(new_id()),
            amount_minor: ActiveValue::Set(amount_minor),
            source: ActiveValue::Set(source),
            description: ActiveValue::Set(description.unwrap_or_default().to_string()),
            date: ActiveValue::Set(date),
            is_recurring: ActiveValue::Set(is_recurring),
            created_at: ActiveValue::Set(Utc::now()),
        };
        Ok(model.insert(&self.database).await?.into())
    }

    /// Updates an income entry, leaving omitted fields unchanged.
    pub async fn update_income(
        &self,
        id: &str,
        amount_minor: Option<i64>,
        source: Option<&str>,
        description: Option<&str>,
        date: Option<NaiveDate>,
        is_recurring: Option<bool>,
    ) -> ResultEngine<Income> {
        let existing = income::Entity::find_by_id(id)
            .one(&self.database)
            .await?
            .ok_or_else(|| EngineError::KeyNotFound("income not exists".to_string()))?;

        if let Some(amount_minor) = amount_minor
            && amount_minor <= 0
        {
            return Err(EngineError::InvalidAmount(
                "amount_minor must be > 0".to_string(),
            ));
        }
        let source = match source {
            Some(source) => Some(normalize_required_name(source, "income source")?),
            None => None,
        };

        let mut active = existing.clone().into_active_model();
        let mut changed = false;
        if let Some(amount_minor) = amount_minor {
            active.amount_minor = ActiveValue::Set(amount_minor);
            changed = true;
        }
        if let Some(source) = source {
            active.source = ActiveValue::Set(source);
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
        if let Some(is_recurring) = is_recurring {
            active.is_recurring = ActiveValue::Set(is_recurring);
            changed = true;
        }

        if !changed {
            return Ok(existing.into());
        }
        Ok(active.update(&self.database).await?.into())
    }

    pub async fn delete_income(&self, id: &str) -> ResultEngine<()> {
        let res = income::Entity::delete_by_id(id).exec(&self.database).await?;
        if res.rows_affected == 0 {
            return Err(EngineError::KeyNotFound("income not exists".to_string()));
        }
        Ok(())
    }
}
