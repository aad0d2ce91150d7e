use chrono::{Months, NaiveDate, Utc};
use engine::{Engine, Period};
use migration::MigratorTrait;
use sea_orm::Database;

async fn engine_with_db() -> Engine {
    let db = Database::connect("sqlite::memory:").await.unwrap();
    migration::Migrator::up(&db, None).await.unwrap();
    Engine::new(db)
}

async fn category_id(engine: &Engine, name: &str) -> String {
    engine
        .list_categories()
        .await
        .unwrap()
        .into_iter()
        .find(|entry| entry.category.name == name)
        .expect("category missing")
        .category
        .id
}

fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}

const SEEDED_CATEGORIES: usize = 8;

#[tokio::test]
async fn expense_summary_enumerates_every_category() {
    let engine = engine_with_db().await;
    let period = Period::new(2024, 3).unwrap();

    let summary = engine
        .expense_summary(period, date(2024, 3, 15))
        .await
        .unwrap();

    assert_eq!(summary.total_this_month, 0);
    assert_eq!(summary.total_last_month, 0);
    assert_eq!(summary.percent_change, 0.0);
    // Every known category appears even with zero expenses in scope.
    assert_eq!(summary.by_category.len(), SEEDED_CATEGORIES);
    assert!(
        summary
            .by_category
            .iter()
            .all(|c| c.total_minor == 0 && c.count == 0)
    );
    assert!(summary.monthly_trend.is_empty());
}

#[tokio::test]
async fn expense_summary_totals_and_breakdown() {
    let engine = engine_with_db().await;
    let groceries = category_id(&engine, "Groceries").await;
    let rent = category_id(&engine, "Rent/Mortgage").await;
    let period = Period::new(2024, 3).unwrap();

    engine
        .create_expense(10000, Some(&groceries), None, date(2024, 3, 5))
        .await
        .unwrap();
    engine
        .create_expense(5000, Some(&groceries), None, date(2024, 3, 12))
        .await
        .unwrap();
    engine
        .create_expense(50000, Some(&rent), None, date(2024, 3, 1))
        .await
        .unwrap();
    // Out of scope: April.
    engine
        .create_expense(7000, Some(&groceries), None, date(2024, 4, 1))
        .await
        .unwrap();

    let summary = engine
        .expense_summary(period, date(2024, 3, 15))
        .await
        .unwrap();

    assert_eq!(summary.total_this_month, 65000);
    // February was empty: the change is a guarded 0, not an error.
    assert_eq!(summary.total_last_month, 0);
    assert_eq!(summary.percent_change, 0.0);

    assert_eq!(summary.by_category.len(), SEEDED_CATEGORIES);
    // Largest total first.
    assert_eq!(summary.by_category[0].name, "Rent/Mortgage");
    assert_eq!(summary.by_category[0].total_minor, 50000);
    assert_eq!(summary.by_category[0].count, 1);

    let groceries_entry = summary
        .by_category
        .iter()
        .find(|c| c.name == "Groceries")
        .unwrap();
    assert_eq!(groceries_entry.total_minor, 15000);
    assert_eq!(groceries_entry.count, 2);
}

#[tokio::test]
async fn expense_summary_month_over_month_change() {
    let engine = engine_with_db().await;

    engine
        .create_expense(10000, None, None, date(2024, 2, 10))
        .await
        .unwrap();
    engine
        .create_expense(12000, None, None, date(2024, 3, 10))
        .await
        .unwrap();

    let summary = engine
        .expense_summary(Period::new(2024, 3).unwrap(), date(2024, 3, 15))
        .await
        .unwrap();
    assert_eq!(summary.total_this_month, 12000);
    assert_eq!(summary.total_last_month, 10000);
    assert_eq!(summary.percent_change, 20.0);

    // January scope: the "last month" window rolls into December 2023.
    let summary = engine
        .expense_summary(Period::new(2024, 1).unwrap(), date(2024, 3, 15))
        .await
        .unwrap();
    assert_eq!(summary.total_this_month, 0);
    assert_eq!(summary.total_last_month, 0);
}

#[tokio::test]
async fn income_summary_guards_zero_income() {
    let engine = engine_with_db().await;
    let period = Period::new(2024, 3).unwrap();

    engine
        .create_expense(8000, None, None, date(2024, 3, 5))
        .await
        .unwrap();

    let summary = engine
        .income_summary(period, date(2024, 3, 15))
        .await
        .unwrap();
    assert_eq!(summary.total_income, 0);
    assert_eq!(summary.total_expenses, 8000);
    assert_eq!(summary.remaining, -8000);
    // Guarded: no income means a savings rate of exactly 0.
    assert_eq!(summary.savings_rate, 0.0);
    assert!(summary.by_source.is_empty());
}

#[tokio::test]
async fn income_summary_by_source_omits_empty_sources() {
    let engine = engine_with_db().await;
    let period = Period::new(2024, 3).unwrap();

    engine
        .create_income(300000, "Salary", None, date(2024, 3, 1), true)
        .await
        .unwrap();
    engine
        .create_income(50000, "Salary", None, date(2024, 3, 20), false)
        .await
        .unwrap();
    engine
        .create_income(100000, "Freelance", None, date(2024, 3, 10), false)
        .await
        .unwrap();
    // A source with activity only outside the scope month stays out.
    engine
        .create_income(25000, "Investments", None, date(2024, 2, 10), false)
        .await
        .unwrap();
    engine
        .create_expense(50000, None, None, date(2024, 3, 5))
        .await
        .unwrap();

    let summary = engine
        .income_summary(period, date(2024, 3, 15))
        .await
        .unwrap();
    assert_eq!(summary.total_income, 450000);
    assert_eq!(summary.total_expenses, 50000);
    assert_eq!(summary.remaining, 400000);
    assert_eq!(summary.savings_rate, 88.9);

    assert_eq!(summary.by_source.len(), 2);
    assert_eq!(summary.by_source[0].source, "Salary");
    assert_eq!(summary.by_source[0].total_minor, 350000);
    assert_eq!(summary.by_source[0].count, 2);
    assert_eq!(summary.by_source[1].source, "Freelance");
    assert_eq!(summary.by_source[1].total_minor, 100000);
}

#[tokio::test]
async fn budget_status_matches_spent_against_budgets() {
    let engine = engine_with_db().await;
    let groceries = category_id(&engine, "Groceries").await;
    let rent = category_id(&engine, "Rent/Mortgage").await;
    let period = Period::new(2024, 3).unwrap();

    engine.set_budget(&groceries, 20000, period).await.unwrap();
    engine
        .create_expense(10000, Some(&groceries), None, date(2024, 3, 5))
        .await
        .unwrap();
    engine
        .create_expense(5000, Some(&groceries), None, date(2024, 3, 12))
        .await
        .unwrap();
    engine
        .create_expense(50000, Some(&rent), None, date(2024, 3, 1))
        .await
        .unwrap();

    let status = engine.budget_status(period).await.unwrap();

    assert_eq!(status.categories.len(), SEEDED_CATEGORIES);
    // Highest percent first; Groceries is the only category with a budget.
    assert_eq!(status.categories[0].category_name, "Groceries");
    assert_eq!(status.categories[0].budget_amount, 20000);
    assert_eq!(status.categories[0].spent_amount, 15000);
    assert_eq!(status.categories[0].percent_used, 75.0);

    // Spending without a budget reads as 0% used, not an error.
    let rent_entry = status
        .categories
        .iter()
        .find(|c| c.category_name == "Rent/Mortgage")
        .unwrap();
    assert_eq!(rent_entry.budget_amount, 0);
    assert_eq!(rent_entry.spent_amount, 50000);
    assert_eq!(rent_entry.percent_used, 0.0);

    assert_eq!(status.total_budget, 20000);
    assert_eq!(status.total_spent, 65000);
    assert_eq!(status.total_remaining, -45000);
    assert_eq!(status.overall_percent, 325.0);
}

#[tokio::test]
async fn budget_status_with_no_budgets_guards_overall_percent() {
    let engine = engine_with_db().await;
    let period = Period::new(2024, 3).unwrap();

    engine
        .create_expense(8000, None, None, date(2024, 3, 5))
        .await
        .unwrap();

    let status = engine.budget_status(period).await.unwrap();
    assert_eq!(status.total_budget, 0);
    assert_eq!(status.overall_percent, 0.0);
    // The uncategorized expense belongs to no category row.
    assert_eq!(status.total_spent, 0);
}

#[tokio::test]
async fn monthly_trend_tracks_the_trailing_six_months() {
    let engine = engine_with_db().await;
    let today = Utc::now().date_naive();
    let two_months_ago = today.checked_sub_months(Months::new(2)).unwrap();
    let eight_months_ago = today.checked_sub_months(Months::new(8)).unwrap();

    engine.create_expense(1000, None, None, today).await.unwrap();
    engine
        .create_expense(2000, None, None, two_months_ago)
        .await
        .unwrap();
    engine
        .create_expense(4000, None, None, eight_months_ago)
        .await
        .unwrap();

    // The scope month is irrelevant for the trend; it always trails today.
    let summary = engine
        .expense_summary(Period::new(2020, 1).unwrap(), today)
        .await
        .unwrap();

    let months: Vec<&str> = summary
        .monthly_trend
        .iter()
        .map(|entry| entry.month.as_str())
        .collect();
    assert_eq!(
        months,
        vec![
            Period::from_date(two_months_ago).month_key().as_str(),
            Period::from_date(today).month_key().as_str(),
        ]
    );
    assert_eq!(summary.monthly_trend[0].total_minor, 2000);
    assert_eq!(summary.monthly_trend[1].total_minor, 1000);
}
