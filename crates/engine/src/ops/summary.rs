//! Derived monthly metrics: expense/income summaries and budget status.
//!
//! Sums run as parameterized SQL against the store; the ratio arithmetic
//! (percent-of-budget, savings rate, month-over-month change) happens here.
//! Every ratio is defined as exactly `0` when its denominator is `0`.

use std::cmp::Ordering;

use chrono::{Months, NaiveDate};
use sea_orm::{ConnectionTrait, Statement};

use crate::{EngineError, Period, ResultEngine};

use super::Engine;

const EXPENSES: &str = "expenses";
const INCOME: &str = "income";

/// Expense totals for one month. Amounts are integer minor units.
#[derive(Clone, Debug, PartialEq)]
pub struct ExpenseSummary {
    pub total_this_month: i64,
    pub total_last_month: i64,
    /// Month-over-month change in percent, one decimal; `0` when last
    /// month had no expenses.
    pub percent_change: f64,
    /// One entry per known category, including those without expenses in
    /// scope, largest total first.
    pub by_category: Vec<CategoryTotal>,
    pub monthly_trend: Vec<MonthTotal>,
    pub period: Period,
}

#[derive(Clone, Debug, PartialEq)]
pub struct CategoryTotal {
    pub id: String,
    pub name: String,
    pub icon: String,
    pub color: String,
    pub total_minor: i64,
    pub count: i64,
}

/// Sum for one calendar month of the trailing-six-months trend window.
/// Months without any rows are omitted rather than zero-filled.
#[derive(Clone, Debug, PartialEq)]
pub struct MonthTotal {
    /// `YYYY-MM`.
    pub month: String,
    pub total_minor: i64,
}

/// Income totals for one month, with the cross-entity expense total the
/// savings rate is derived from.
#[derive(Clone, Debug, PartialEq)]
pub struct IncomeSummary {
    pub total_income: i64,
    pub total_expenses: i64,
    /// May be negative.
    pub remaining: i64,
    /// Percent of income kept, one decimal; `0` when there is no income.
    pub savings_rate: f64,
    /// Sources with income in scope only, largest total first.
    pub by_source: Vec<SourceTotal>,
    pub monthly_trend: Vec<MonthTotal>,
    pub period: Period,
}

#[derive(Clone, Debug, PartialEq)]
pub struct SourceTotal {
    pub source: String,
    pub total_minor: i64,
    pub count: i64,
}

/// Budget-versus-actual for one month, one entry per known category.
#[derive(Clone, Debug, PartialEq)]
pub struct BudgetStatus {
    /// Ordered by `percent_used`, highest first.
    pub categories: Vec<CategoryBudget>,
    pub total_budget: i64,
    pub total_spent: i64,
    pub total_remaining: i64,
    pub overall_percent: f64,
    pub period: Period,
}

#[derive(Clone, Debug, PartialEq)]
pub struct CategoryBudget {
    pub category_id: String,
    pub category_name: String,
    pub category_icon: String,
    pub category_color: String,
    /// `0` when no budget row exists for the month.
    pub budget_amount: i64,
    pub spent_amount: i64,
    /// One decimal; `0` when no budget is set, which makes "no budget"
    /// indistinguishable from "0% used".
    pub percent_used: f64,
}

impl Engine {
    /// Expense summary for `period`. The six-month trend window is always
    /// relative to `today`, not to the requested period.
    pub async fn expense_summary(
        &self,
        period: Period,
        today: NaiveDate,
    ) -> ResultEngine<ExpenseSummary> {
        let total_this_month = self.month_total(EXPENSES, period).await?;
        let total_last_month = self.month_total(EXPENSES, period.prev()).await?;

        let backend = self.database.get_database_backend();
        let stmt = Statement::from_sql_and_values(
            backend,
            "SELECT c.id AS id, c.name AS name, c.icon AS icon, c.color AS color, \
             COALESCE(SUM(e.amount_minor), 0) AS total, COUNT(e.id) AS count \
             FROM categories c \
             LEFT JOIN expenses e ON e.category_id = c.id \
             AND e.date >= ? AND e.date < ? \
             GROUP BY c.id \
             ORDER BY total DESC",
            [period.first_day().into(), period.next_first_day().into()],
        );
        let rows = self.database.query_all(stmt).await?;
        let mut by_category = Vec::with_capacity(rows.len());
        for row in rows {
            by_category.push(CategoryTotal {
                id: row.try_get("", "id")?,
                name: row.try_get("", "name")?,
                icon: row.try_get("", "icon")?,
                color: row.try_get("", "color")?,
                total_minor: row.try_get("", "total")?,
                count: row.try_get("", "count")?,
            });
        }

        Ok(ExpenseSummary {
            total_this_month,
            total_last_month,
            percent_change: percent_change(total_this_month, total_last_month),
            by_category,
            monthly_trend: self.monthly_trend(EXPENSES, today).await?,
            period,
        })
    }

    /// Income summary for `period`. Depends on expense data for the
    /// remaining amount and savings rate.
    pub async fn income_summary(
        &self,
        period: Period,
        today: NaiveDate,
    ) -> ResultEngine<IncomeSummary> {
        let total_income = self.month_total(INCOME, period).await?;
        let total_expenses = self.month_total(EXPENSES, period).await?;
        let remaining = total_income - total_expenses;

        let backend = self.database.get_database_backend();
        let stmt = Statement::from_sql_and_values(
            backend,
            "SELECT source AS source, SUM(amount_minor) AS total, COUNT(*) AS count \
             FROM income \
             WHERE date >= ? AND date < ? \
             GROUP BY source \
             ORDER BY total DESC",
            [period.first_day().into(), period.next_first_day().into()],
        );
        let rows = self.database.query_all(stmt).await?;
        let mut by_source = Vec::with_capacity(rows.len());
        for row in rows {
            by_source.push(SourceTotal {
                source: row.try_get("", "source")?,
                total_minor: row.try_get("", "total")?,
                count: row.try_get("", "count")?,
            });
        }

        Ok(IncomeSummary {
            total_income,
            total_expenses,
            remaining,
            savings_rate: percent_of(remaining, total_income),
            by_source,
            monthly_trend: self.monthly_trend(INCOME, today).await?,
            period,
        })
    }

    /// Budget-versus-actual for `period`, enumerating every known category
    /// whether or not it has a budget or any expenses.
    pub async fn budget_status(&self, period: Period) -> ResultEngine<BudgetStatus> {
        let backend = self.database.get_database_backend();
        let stmt = Statement::from_sql_and_values(
            backend,
            "SELECT c.id AS category_id, c.name AS category_name, \
             c.icon AS category_icon, c.color AS category_color, \
             COALESCE(b.amount_minor, 0) AS budget_amount, \
             COALESCE(SUM(e.amount_minor), 0) AS spent_amount \
             FROM categories c \
             LEFT JOIN budgets b ON b.category_id = c.id AND b.month = ? \
             LEFT JOIN expenses e ON e.category_id = c.id \
             AND e.date >= ? AND e.date < ? \
             GROUP BY c.id",
            [
                period.month_key().into(),
                period.first_day().into(),
                period.next_first_day().into(),
            ],
        );
        let rows = self.database.query_all(stmt).await?;

        let mut entries = Vec::with_capacity(rows.len());
        for row in rows {
            let budget_amount: i64 = row.try_get("", "budget_amount")?;
            let spent_amount: i64 = row.try_get("", "spent_amount")?;
            entries.push(CategoryBudget {
                category_id: row.try_get("", "category_id")?,
                category_name: row.try_get("", "category_name")?,
                category_icon: row.try_get("", "category_icon")?,
                category_color: row.try_get("", "category_color")?,
                budget_amount,
                spent_amount,
                percent_used: percent_of(spent_amount, budget_amount),
            });
        }
        entries.sort_by(|a, b| {
            b.percent_used
                .partial_cmp(&a.percent_used)
                .unwrap_or(Ordering::Equal)
        });

        let total_budget: i64 = entries.iter().map(|c| c.budget_amount).sum();
        let total_spent: i64 = entries.iter().map(|c| c.spent_amount).sum();

        Ok(BudgetStatus {
            categories: entries,
            total_budget,
            total_spent,
            total_remaining: total_budget - total_spent,
            overall_percent: percent_of(total_spent, total_budget),
            period,
        })
    }

    async fn month_total(&self, table: &str, period: Period) -> ResultEngine<i64> {
        let backend = self.database.get_database_backend();
        let stmt = Statement::from_sql_and_values(
            backend,
            format!(
                "SELECT COALESCE(SUM(amount_minor), 0) AS total \
                 FROM {table} \
                 WHERE date >= ? AND date < ?"
            ),
            [period.first_day().into(), period.next_first_day().into()],
        );
        let row = self.database.query_one(stmt).await?;
        Ok(row.and_then(|r| r.try_get("", "total").ok()).unwrap_or(0))
    }

    /// Per-month sums for the six months trailing `today`, oldest first.
    async fn monthly_trend(&self, table: &str, today: NaiveDate) -> ResultEngine<Vec<MonthTotal>> {
        let cutoff = today
            .checked_sub_months(Months::new(6))
            .ok_or_else(|| EngineError::InvalidPeriod("date out of range".to_string()))?;

        let backend = self.database.get_database_backend();
        let stmt = Statement::from_sql_and_values(
            backend,
            format!(
                "SELECT strftime('%Y-%m', date) AS month, SUM(amount_minor) AS total \
                 FROM {table} \
                 WHERE date >= ? \
                 GROUP BY strftime('%Y-%m', date) \
                 ORDER BY month ASC"
            ),
            [cutoff.into()],
        );
        let rows = self.database.query_all(stmt).await?;

        let mut out = Vec::with_capacity(rows.len());
        for row in rows {
            out.push(MonthTotal {
                month: row.try_get("", "month")?,
                total_minor: row.try_get("", "total")?,
            });
        }
        Ok(out)
    }
}

/// `part / whole` as a percentage rounded to one decimal; exactly `0` when
/// `whole` is `0`.
fn percent_of(part: i64, whole: i64) -> f64 {
    if whole == 0 {
        return 0.0;
    }
    round1(part as f64 / whole as f64 * 100.0)
}

/// Month-over-month change in percent, one decimal; `0` when the previous
/// month had nothing.
fn percent_change(current: i64, previous: i64) -> f64 {
    if previous == 0 {
        return 0.0;
    }
    round1((current - previous) as f64 / previous as f64 * 100.0)
}

fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn percent_of_guards_zero_denominator() {
        assert_eq!(percent_of(500, 0), 0.0);
        assert_eq!(percent_of(-80, 0), 0.0);
        assert_eq!(percent_of(150, 200), 75.0);
        assert_eq!(percent_of(100, 300), 33.3);
    }

    #[test]
    fn percent_change_guards_empty_previous_month() {
        assert_eq!(percent_change(120, 0), 0.0);
        assert_eq!(percent_change(12000, 10000), 20.0);
        assert_eq!(percent_change(9000, 10000), -10.0);
    }

    #[test]
    fn rounding_keeps_one_decimal() {
        assert_eq!(round1(33.333), 33.3);
        assert_eq!(round1(66.666), 66.7);
        assert_eq!(round1(-12.34), -12.3);
    }
}
