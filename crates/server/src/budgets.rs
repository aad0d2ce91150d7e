//! Budgets API endpoints.

use api_types::budget::{BudgetCategoryView, BudgetSet, BudgetStatusResponse, BudgetView};
use api_types::period::PeriodQuery;
use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use chrono::Utc;
use engine::{Budget, BudgetStatus, Period};

use crate::{ServerError, server::ServerState};

fn map_budget(budget: Budget) -> BudgetView {
    BudgetView {
        id: budget.id,
        category_id: budget.category_id,
        amount_minor: budget.amount_minor,
        month: budget.month,
        created_at: budget.created_at,
        category_name: budget.category_name,
        category_icon: budget.category_icon,
        category_color: budget.category_color,
    }
}

fn map_status(status: BudgetStatus) -> BudgetStatusResponse {
    BudgetStatusResponse {
        categories: status
            .categories
            .into_iter()
            .map(|entry| BudgetCategoryView {
                category_id: entry.category_id,
                category_name: entry.category_name,
                category_icon: entry.category_icon,
                category_color: entry.category_color,
                budget_amount: entry.budget_amount,
                spent_amount: entry.spent_amount,
                percent_used: entry.percent_used,
            })
            .collect(),
        total_budget: status.total_budget,
        total_spent: status.total_spent,
        total_remaining: status.total_remaining,
        overall_percent: status.overall_percent,
        month: status.period.month_str(),
        year: status.period.year_str(),
    }
}

pub async fn list(
    State(state): State<ServerState>,
    Query(query): Query<PeriodQuery>,
) -> Result<Json<Vec<BudgetView>>, ServerError> {
    let period = Period::resolve(query.month, query.year, Utc::now().date_naive())?;
    let budgets = state.engine.list_budgets(period).await?;
    Ok(Json(budgets.into_iter().map(map_budget).collect()))
}

pub async fn status(
    State(state): State<ServerState>,
    Query(query): Query<PeriodQuery>,
) -> Result<Json<BudgetStatusResponse>, ServerError> {
    let period = Period::resolve(query.month, query.year, Utc::now().date_naive())?;
    let status = state.engine.budget_status(period).await?;
    Ok(Json(map_status(status)))
}

/// Upsert: a second set for the same (category, month) overwrites the
/// stored amount.
pub async fn set(
    State(state): State<ServerState>,
    Json(payload): Json<BudgetSet>,
) -> Result<(StatusCode, Json<BudgetView>), ServerError> {
    let period = Period::resolve(payload.month, payload.year, Utc::now().date_naive())?;
    let budget = state
        .engine
        .set_budget(&payload.category_id, payload.amount_minor, period)
        .await?;
    Ok((StatusCode::CREATED, Json(map_budget(budget))))
}

pub async fn remove(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ServerError> {
    state.engine.delete_budget(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}
