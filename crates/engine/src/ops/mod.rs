use chrono::NaiveDate;
use sea_orm::DatabaseConnection;
use uuid::Uuid;

use crate::{EngineError, Period, ResultEngine};

mod budgets;
mod categories;
mod expenses;
mod income;
mod summary;

pub use categories::CategoryWithSpending;
pub use summary::{
    BudgetStatus, CategoryBudget, CategoryTotal, ExpenseSummary, IncomeSummary, MonthTotal,
    SourceTotal,
};

/// Run a block inside a DB transaction, committing on success and rolling back on error.
macro_rules! with_tx {
    ($self:expr, |$tx:ident| $body:expr) => {{
        let $tx = $self.database.begin().await?;
        let result = $body;
        match result {
            Ok(value) => {
                $tx.commit().await?;
                Ok(value)
            }
            Err(err) => Err(err),
        }
    }};
}

pub(crate) use with_tx;

/// The engine behind every API operation. Reads and writes go straight to
/// the database; summaries never cache anything between calls.
#[derive(Debug)]
pub struct Engine {
    database: DatabaseConnection,
}

impl Engine {
    pub fn new(database: DatabaseConnection) -> Self {
        Self { database }
    }
}

/// Conjunctive narrowing for list reads, shared by every entity kind.
/// Every supplied field narrows the result further; results come back
/// newest first (`date DESC, created_at DESC`) and truncated to `limit`.
#[derive(Clone, Debug, Default)]
pub struct ListFilter {
    pub month: Option<u32>,
    pub year: Option<i32>,
    pub category_id: Option<String>,
    pub source: Option<String>,
    pub limit: Option<u64>,
}

impl ListFilter {
    /// Half-open `[start, end)` date range implied by month/year.
    ///
    /// Month and year together narrow to that calendar month, a bare year
    /// to the whole year. A bare month is ignored.
    pub(crate) fn date_range(&self) -> ResultEngine<Option<(NaiveDate, NaiveDate)>> {
        match (self.month, self.year) {
            (Some(month), Some(year)) => {
                let period = Period::new(year, month)?;
                Ok(Some((period.first_day(), period.next_first_day())))
            }
            (None, Some(year)) => Ok(Some((
                Period::new(year, 1)?.first_day(),
                Period::new(year, 12)?.next_first_day(),
            ))),
            _ => Ok(None),
        }
    }
}

fn new_id() -> String {
    Uuid::new_v4().to_string()
}

fn normalize_required_name(value: &str, label: &str) -> ResultEngine<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(EngineError::InvalidName(format!(
            "{label} must not be empty"
        )));
    }
    Ok(trimmed.to_string())
}

fn normalize_optional_text(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(ToString::to_string)
}
