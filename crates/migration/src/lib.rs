pub use sea_orm_migration::prelude::*;

mod m20260105_100000_categories;
mod m20260105_101000_expenses;
mod m20260105_102000_budgets;
mod m20260105_103000_income;
mod m20260112_090000_seed_categories;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20260105_100000_categories::Migration),
            Box::new(m20260105_101000_expenses::Migration),
            Box::new(m20260105_102000_budgets::Migration),
            Box::new(m20260105_103000_income::Migration),
            Box::new(m20260112_090000_seed_categories::Migration),
        ]
    }
}
