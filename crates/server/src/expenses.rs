//! Expenses API endpoints.

use api_types::MonthTotalView;
use api_types::expense::{
    CategoryTotalView, ExpenseCreate, ExpenseListQuery, ExpenseSummaryResponse, ExpenseUpdate,
    ExpenseView,
};
use api_types::period::PeriodQuery;
use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::Response,
};
use chrono::{NaiveDate, Utc};
use engine::{Expense, ExpenseSummary, ListFilter, Period};
use serde::Serialize;

use crate::server::csv_attachment;
use crate::{ServerError, server::ServerState};

fn map_expense(expense: Expense) -> ExpenseView {
    ExpenseView {
        id: expense.id,
        amount_minor: expense.amount_minor,
        category_id: expense.category_id,
        description: expense.description,
        date: expense.date,
        created_at: expense.created_at,
        category_name: expense.category_name,
        category_icon: expense.category_icon,
        category_color: expense.category_color,
    }
}

fn map_summary(summary: ExpenseSummary) -> ExpenseSummaryResponse {
    ExpenseSummaryResponse {
        total_this_month: summary.total_this_month,
        total_last_month: summary.total_last_month,
        percent_change: summary.percent_change,
        by_category: summary
            .by_category
            .into_iter()
            .map(|entry| CategoryTotalView {
                id: entry.id,
                name: entry.name,
                icon: entry.icon,
                color: entry.color,
                total_minor: entry.total_minor,
                count: entry.count,
            })
            .collect(),
        monthly_trend: summary
            .monthly_trend
            .into_iter()
            .map(|entry| MonthTotalView {
                month: entry.month,
                total_minor: entry.total_minor,
            })
            .collect(),
        month: summary.period.month_str(),
        year: summary.period.year_str(),
    }
}

fn list_filter(query: ExpenseListQuery) -> ListFilter {
    ListFilter {
        month: query.month,
        year: query.year,
        category_id: query.category_id,
        source: None,
        limit: query.limit,
    }
}

pub async fn list(
    State(state): State<ServerState>,
    Query(query): Query<ExpenseListQuery>,
) -> Result<Json<Vec<ExpenseView>>, ServerError> {
    let expenses = state.engine.list_expenses(&list_filter(query)).await?;
    Ok(Json(expenses.into_iter().map(map_expense).collect()))
}

pub async fn summary(
    State(state): State<ServerState>,
    Query(query): Query<PeriodQuery>,
) -> Result<Json<ExpenseSummaryResponse>, ServerError> {
    let today = Utc::now().date_naive();
    let period = Period::resolve(query.month, query.year, today)?;
    let summary = state.engine.expense_summary(period, today).await?;
    Ok(Json(map_summary(summary)))
}

pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<ExpenseCreate>,
) -> Result<(StatusCode, Json<ExpenseView>), ServerError> {
    let expense = state
        .engine
        .create_expense(
            payload.amount_minor,
            payload.category_id.as_deref(),
            payload.description.as_deref(),
            payload.date,
        )
        .await?;
    Ok((StatusCode::CREATED, Json(map_expense(expense))))
}

pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Json(payload): Json<ExpenseUpdate>,
) -> Result<Json<ExpenseView>, ServerError> {
    let expense = state
        .engine
        .update_expense(
            &id,
            payload.amount_minor,
            payload.category_id.as_ref().map(|inner| inner.as_deref()),
            payload.description.as_deref(),
            payload.date,
        )
        .await?;
    Ok(Json(map_expense(expense)))
}

pub async fn remove(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ServerError> {
    state.engine.delete_expense(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[derive(Serialize)]
struct ExportRow<'a> {
    date: NaiveDate,
    amount_minor: i64,
    category: &'a str,
    description: &'a str,
}

/// The filtered expense list as a downloadable CSV.
pub async fn export(
    State(state): State<ServerState>,
    Query(query): Query<ExpenseListQuery>,
) -> Result<Response, ServerError> {
    let expenses = state.engine.list_expenses(&list_filter(query)).await?;

    let mut writer = csv::Writer::from_writer(Vec::new());
    for expense in &expenses {
        writer
            .serialize(ExportRow {
                date: expense.date,
                amount_minor: expense.amount_minor,
                category: expense.category_name.as_deref().unwrap_or(""),
                description: &expense.description,
            })
            .map_err(|err| ServerError::Generic(err.to_string()))?;
    }
    let data = writer
        .into_inner()
        .map_err(|err| ServerError::Generic(err.to_string()))?;

    Ok(csv_attachment("expenses.csv", data))
}
