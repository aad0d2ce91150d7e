use sea_orm::{ConnectionTrait, Statement};
use sea_orm_migration::prelude::*;
use uuid::Uuid;

#[derive(DeriveMigrationName)]
pub struct Migration;

const DEFAULT_CATEGORIES: &[(&str, &str, &str)] = &[
    ("Utilities", "💡", "#f59e0b"),
    ("Subscriptions", "📺", "#8b5cf6"),
    ("Groceries", "🛒", "#10b981"),
    ("Rent/Mortgage", "🏠", "#ef4444"),
    ("Transport", "🚗", "#3b82f6"),
    ("Entertainment", "🎮", "#ec4899"),
    ("Healthcare", "🏥", "#14b8a6"),
    ("Other", "📦", "#6b7280"),
];

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();
        let backend = db.get_database_backend();

        // Installs upgraded mid-life may already carry categories; only a
        // fresh table gets the starter set.
        let row = db
            .query_one(Statement::from_string(
                backend,
                "SELECT COUNT(*) AS count FROM categories;",
            ))
            .await?;
        let count: i64 = match row {
            Some(row) => row.try_get("", "count")?,
            None => 0,
        };
        if count > 0 {
            return Ok(());
        }

        for (name, icon, color) in DEFAULT_CATEGORIES {
            db.execute(Statement::from_sql_and_values(
                backend,
                "INSERT INTO categories (id, name, icon, color, created_at) \
                 VALUES (?, ?, ?, ?, ?);",
                [
                    Uuid::new_v4().to_string().into(),
                    (*name).into(),
                    (*icon).into(),
                    (*color).into(),
                    chrono::Utc::now().into(),
                ],
            ))
            .await?;
        }

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();
        let backend = db.get_database_backend();

        for (name, _, _) in DEFAULT_CATEGORIES {
            db.execute(Statement::from_sql_and_values(
                backend,
                "DELETE FROM categories WHERE name = ?;",
                [(*name).into()],
            ))
            .await?;
        }

        Ok(())
    }
}
