//! Category record operations.

use chrono::Utc;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ActiveValue, ColumnTrait, ConnectionTrait, EntityTrait, IntoActiveModel,
    QueryFilter, Statement, TransactionTrait, Value,
};

use crate::{Category, EngineError, ResultEngine, budgets, categories, expenses};

use super::{Engine, new_id, normalize_optional_text, normalize_required_name, with_tx};

/// A category plus its all-time spending totals.
#[derive(Clone, Debug, PartialEq)]
pub struct CategoryWithSpending {
    pub category: Category,
    pub total_spent_minor: i64,
    pub expense_count: i64,
}

impl Engine {
    /// Lists every category with its all-time expense total and count,
    /// ordered by name.
    pub async fn list_categories(&self) -> ResultEngine<Vec<CategoryWithSpending>> {
        let backend = self.database.get_database_backend();
        let stmt = Statement::from_string(
            backend,
            "SELECT c.id AS id, c.name AS name, c.icon AS icon, c.color AS color, \
             c.created_at AS created_at, \
             COALESCE(SUM(e.amount_minor), 0) AS total_spent, \
             COUNT(e.id) AS expense_count \
             FROM categories c \
             LEFT JOIN expenses e ON e.category_id = c.id \
             GROUP BY c.id \
             ORDER BY c.name ASC",
        );
        let rows = self.database.query_all(stmt).await?;

        let mut out = Vec::with_capacity(rows.len());
        for row in rows {
            out.push(CategoryWithSpending {
                category: Category {
                    id: row.try_get("", "id")?,
                    name: row.try_get("", "name")?,
                    icon: row.try_get("", "icon")?,
                    color: row.try_get("", "color")?,
                    created_at: row.try_get("", "created_at")?,
                },
                total_spent_minor: row.try_get("", "total_spent")?,
                expense_count: row.try_get("", "expense_count")?,
            });
        }
        Ok(out)
    }

    /// Creates a category. Missing icon/color fall back to the display
    /// defaults; a duplicate name is rejected.
    pub async fn create_category(
        &self,
        name: &str,
        icon: Option<&str>,
        color: Option<&str>,
    ) -> ResultEngine<Category> {
        let name = normalize_required_name(name, "category name")?;
        self.reject_duplicate_name(&name, None).await?;

        let model = categories::ActiveModel {
            id: ActiveValue::Set(new_id()),
            name: ActiveValue::Set(name),
            icon: ActiveValue::Set(
                normalize_optional_text(icon).unwrap_or_else(|| categories::DEFAULT_ICON.to_string()),
            ),
            color: ActiveValue::Set(
                normalize_optional_text(color)
                    .unwrap_or_else(|| categories::DEFAULT_COLOR.to_string()),
            ),
            created_at: ActiveValue::Set(Utc::now()),
        };
        Ok(model.insert(&self.database).await?.into())
    }

    /// Updates a category, leaving omitted fields unchanged.
    pub async fn update_category(
        &self,
        id: &str,
        name: Option<&str>,
        icon: Option<&str>,
        color: Option<&str>,
    ) -> ResultEngine<Category> {
        let existing = categories::Entity::find_by_id(id)
            .one(&self.database)
            .await?
            .ok_or_else(|| EngineError::KeyNotFound("category not exists".to_string()))?;

        let mut active = existing.clone().into_active_model();
        let mut changed = false;

        if let Some(name) = name {
            let name = normalize_required_name(name, "category name")?;
            if name != existing.name {
                self.reject_duplicate_name(&name, Some(id)).await?;
            }
            active.name = ActiveValue::Set(name);
            changed = true;
        }
        if let Some(icon) = normalize_optional_text(icon) {
            active.icon = ActiveValue::Set(icon);
            changed = true;
        }
        if let Some(color) = normalize_optional_text(color) {
            active.color = ActiveValue::Set(color);
            changed = true;
        }

        if !changed {
            return Ok(existing.into());
        }
        Ok(active.update(&self.database).await?.into())
    }

    /// Deletes a category. Referencing expenses are kept but detached
    /// (category cleared); the category's budgets are removed. All three
    /// steps commit atomically.
    pub async fn delete_category(&self, id: &str) -> ResultEngine<()> {
        with_tx!(self, |tx| {
            let category = categories::Entity::find_by_id(id)
                .one(&tx)
                .await?
                .ok_or_else(|| EngineError::KeyNotFound("category not exists".to_string()))?;

            expenses::Entity::update_many()
                .col_expr(expenses::Column::CategoryId, Expr::value(Value::String(None)))
                .filter(expenses::Column::CategoryId.eq(id))
                .exec(&tx)
                .await?;

            budgets::Entity::delete_many()
                .filter(budgets::Column::CategoryId.eq(id))
                .exec(&tx)
                .await?;

            categories::Entity::delete_by_id(category.id).exec(&tx).await?;
            Ok(())
        })
    }

    pub(super) async fn require_category(&self, id: &str) -> ResultEngine<categories::Model> {
        categories::Entity::find_by_id(id)
            .one(&self.database)
            .await?
            .ok_or_else(|| EngineError::KeyNotFound("category not exists".to_string()))
    }

    async fn reject_duplicate_name(&self, name: &str, except_id: Option<&str>) -> ResultEngine<()> {
        let mut query =
            categories::Entity::find().filter(categories::Column::Name.eq(name));
        if let Some(except_id) = except_id {
            query = query.filter(categories::Column::Id.ne(except_id));
        }
        if query.one(&self.database).await?.is_some() {
            return Err(EngineError::ExistingKey(name.to_string()));
        }
        Ok(())
    }
}
