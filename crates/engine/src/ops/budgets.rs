//! Budget record operations.

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ActiveValue, ColumnTrait, EntityTrait, IntoActiveModel, QueryFilter,
    QueryOrder,
};

use crate::{Budget, EngineError, Period, ResultEngine, budgets, categories};

use super::{Engine, new_id};

impl Engine {
    /// Budgets stored for a month, joined with category display fields and
    /// ordered by category name.
    pub async fn list_budgets(&self, period: Period) -> ResultEngine<Vec<Budget>> {
        let rows = budgets::Entity::find()
            .filter(budgets::Column::Month.eq(period.month_key()))
            .find_also_related(categories::Entity)
            .order_by_asc(categories::Column::Name)
            .all(&self.database)
            .await?;

        let mut out = Vec::with_capacity(rows.len());
        for (budget, category) in rows {
            let category = category
                .ok_or_else(|| EngineError::KeyNotFound("category not exists".to_string()))?;
            out.push(Budget::from((budget, category)));
        }
        Ok(out)
    }

    /// Creates or overwrites the budget for `(category, month)`. A second
    /// call for the same pair replaces the stored amount instead of adding
    /// a row. Zero is allowed and means "no budget set".
    pub async fn set_budget(
        &self,
        category_id: &str,
        amount_minor: i64,
        period: Period,
    ) -> ResultEngine<Budget> {
        if amount_minor < 0 {
            return Err(EngineError::InvalidAmount(
                "amount_minor must be >= 0".to_string(),
            ));
        }
        let category = self.require_category(category_id).await?;
        let month_key = period.month_key();

        let existing = budgets::Entity::find()
            .filter(budgets::Column::CategoryId.eq(category_id))
            .filter(budgets::Column::Month.eq(month_key.clone()))
            .one(&self.database)
            .await?;

        let model = match existing {
            Some(budget) => {
                let mut active = budget.into_active_model();
                active.amount_minor = ActiveValue::Set(amount_minor);
                active.update(&self.database).await?
            }
            None => {
                budgets::ActiveModel {
                    id: ActiveValue::Set(new_id()),
                    category_id: ActiveValue::Set(category_id.to_string()),
                    amount_minor: ActiveValue::Set(amount_minor),
                    month: ActiveValue::Set(month_key),
                    created_at: ActiveValue::Set(Utc::now()),
                }
                .insert(&self.database)
                .await?
            }
        };

        Ok(Budget::from((model, category)))
    }

    pub async fn delete_budget(&self, id: &str) -> ResultEngine<()> {
        let res = budgets::Entity::delete_by_id(id).exec(&self.database).await?;
        if res.rows_affected == 0 {
            return Err(EngineError::KeyNotFound("budget not exists".to_string()));
        }
        Ok(())
    }
}
