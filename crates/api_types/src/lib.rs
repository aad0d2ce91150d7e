//! Request/response payloads shared by the HTTP server and its clients.
//!
//! Amounts travel as integer minor units (cents). Summary objects keep the
//! camelCase field names the dashboard consumes; entity fields stay
//! snake_case.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// Distinguishes "field absent" from "field set to null" in partial
/// updates. Pair with `#[serde(default, deserialize_with = "double_option")]`:
/// absent → `None`, `null` → `Some(None)`, value → `Some(Some(v))`.
pub fn double_option<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Deserialize::deserialize(deserializer).map(Some)
}

/// Sum for one calendar month of a trailing trend window.
#[derive(Debug, Serialize, Deserialize)]
pub struct MonthTotalView {
    /// `YYYY-MM`.
    pub month: String,
    pub total_minor: i64,
}

pub mod period {
    use super::*;

    /// Month/year query pair accepted by every summary/status endpoint.
    /// Each side falls back to the current calendar month/year.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct PeriodQuery {
        pub month: Option<u32>,
        pub year: Option<i32>,
    }
}

pub mod health {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct HealthResponse {
        pub status: String,
        pub timestamp: DateTime<Utc>,
    }
}

pub mod category {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct CategoryCreate {
        pub name: String,
        pub icon: Option<String>,
        pub color: Option<String>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct CategoryUpdate {
        pub name: Option<String>,
        pub icon: Option<String>,
        pub color: Option<String>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct CategoryView {
        pub id: String,
        pub name: String,
        pub icon: String,
        pub color: String,
        pub created_at: DateTime<Utc>,
    }

    /// List item: a category with its all-time spending totals joined in.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct CategorySpendingView {
        pub id: String,
        pub name: String,
        pub icon: String,
        pub color: String,
        pub created_at: DateTime<Utc>,
        pub total_spent_minor: i64,
        pub expense_count: i64,
    }
}

pub mod expense {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct ExpenseListQuery {
        pub month: Option<u32>,
        pub year: Option<i32>,
        pub category_id: Option<String>,
        pub limit: Option<u64>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct ExpenseCreate {
        pub amount_minor: i64,
        pub category_id: Option<String>,
        pub description: Option<String>,
        pub date: NaiveDate,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct ExpenseUpdate {
        pub amount_minor: Option<i64>,
        /// Absent leaves the category unchanged; `null` detaches it.
        #[serde(default, deserialize_with = "double_option")]
        pub category_id: Option<Option<String>>,
        pub description: Option<String>,
        pub date: Option<NaiveDate>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct ExpenseView {
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

    #[derive(Debug, Serialize, Deserialize)]
    pub struct CategoryTotalView {
        pub id: String,
        pub name: String,
        pub icon: String,
        pub color: String,
        pub total_minor: i64,
        pub count: i64,
    }

    #[derive(Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct ExpenseSummaryResponse {
        pub total_this_month: i64,
        pub total_last_month: i64,
        pub percent_change: f64,
        pub by_category: Vec<CategoryTotalView>,
        pub monthly_trend: Vec<MonthTotalView>,
        /// Two-digit month the summary was computed for.
        pub month: String,
        /// Four-digit year the summary was computed for.
        pub year: String,
    }
}

pub mod income {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct IncomeListQuery {
        pub month: Option<u32>,
        pub year: Option<i32>,
        pub source: Option<String>,
        pub limit: Option<u64>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct IncomeCreate {
        pub amount_minor: i64,
        pub source: String,
        pub description: Option<String>,
        pub date: NaiveDate,
        pub is_recurring: Option<bool>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct IncomeUpdate {
        pub amount_minor: Option<i64>,
        pub source: Option<String>,
        pub description: Option<String>,
        pub date: Option<NaiveDate>,
        pub is_recurring: Option<bool>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct IncomeView {
        pub id: String,
        pub amount_minor: i64,
        pub source: String,
        pub description: String,
        pub date: NaiveDate,
        pub is_recurring: bool,
        pub created_at: DateTime<Utc>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct SourceTotalView {
        pub source: String,
        pub total_minor: i64,
        pub count: i64,
    }

    #[derive(Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct IncomeSummaryResponse {
        pub total_income: i64,
        pub total_expenses: i64,
        pub remaining: i64,
        pub savings_rate: f64,
        pub by_source: Vec<SourceTotalView>,
        pub monthly_trend: Vec<MonthTotalView>,
        pub month: String,
        pub year: String,
    }
}

pub mod budget {
    use super::*;

    /// Upsert request: month/year default to the current calendar month.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct BudgetSet {
        pub category_id: String,
        pub amount_minor: i64,
        pub month: Option<u32>,
        pub year: Option<i32>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct BudgetView {
        pub id: String,
        pub category_id: String,
        pub amount_minor: i64,
        /// `YYYY-MM` month key.
        pub month: String,
        pub created_at: DateTime<Utc>,
        pub category_name: String,
        pub category_icon: String,
        pub category_color: String,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct BudgetCategoryView {
        pub category_id: String,
        pub category_name: String,
        pub category_icon: String,
        pub category_color: String,
        pub budget_amount: i64,
        pub spent_amount: i64,
        pub percent_used: f64,
    }

    #[derive(Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct BudgetStatusResponse {
        pub categories: Vec<BudgetCategoryView>,
        pub total_budget: i64,
        pub total_spent: i64,
        pub total_remaining: i64,
        pub overall_percent: f64,
        pub month: String,
        pub year: String,
    }
}
