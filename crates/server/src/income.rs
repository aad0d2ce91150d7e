//! Income API endpoints.

use api_types::MonthTotalView;
use api_types::income::{
    IncomeCreate, IncomeListQuery, IncomeSummaryResponse, IncomeUpdate, IncomeView,
    SourceTotalView,
};
use api_types::period::PeriodQuery;
use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::Response,
};
use chrono::{NaiveDate, Utc};
use engine::{Income, IncomeSummary, ListFilter, Period};
use serde::Serialize;

use crate::server::csv_attachment;
use crate::{ServerError, server::ServerState};

fn map_income(income: Income) -> IncomeView {
    IncomeView {
        id: income.id,
        amount_minor: income.amount_minor,
        source: income.source,
        description: income.description,
        date: income.date,
        is_recurring: income.is_recurring,
        created_at: income.created_at,
    }
}

fn map_summary(summary: IncomeSummary) -> IncomeSummaryResponse {
    IncomeSummaryResponse {
        total_income: summary.total_income,
        total_expenses: summary.total_expenses,
        remaining: summary.remaining,
        savings_rate: summary.savings_rate,
        by_source: summary
            .by_source
            .into_iter()
            .map(|entry| SourceTotalView {
                source: entry.source,
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

fn list_filter(query: IncomeListQuery) -> ListFilter {
    ListFilter {
        month: query.month,
        year: query.year,
        category_id: None,
        source: query.source,
        limit: query.limit,
    }
}

pub async fn list(
    State(state): State<ServerState>,
    Query(query): Query<IncomeListQuery>,
) -> Result<Json<Vec<IncomeView>>, ServerError> {
    let income = state.engine.list_income(&list_filter(query)).await?;
    Ok(Json(income.into_iter().map(map_income).collect()))
}

pub async fn summary(
    State(state): State<ServerState>,
    Query(query): Query<PeriodQuery>,
) -> Result<Json<IncomeSummaryResponse>, ServerError> {
    let today = Utc::now().date_naive();
    let period = Period::resolve(query.month, query.year, today)?;
    let summary = state.engine.income_summary(period, today).await?;
    Ok(Json(map_summary(summary)))
}

pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<IncomeCreate>,
) -> Result<(StatusCode, Json<IncomeView>), ServerError> {
    let income = state
        .engine
        .create_income(
            payload.amount_minor,
            &payload.source,
            payload.description.as_deref(),
            payload.date,
            payload.is_recurring.unwrap_or(false),
        )
        .await?;
    Ok((StatusCode::CREATED, Json(map_income(income))))
}

pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Json(payload): Json<IncomeUpdate>,
) -> Result<Json<IncomeView>, ServerError> {
    let income = state
        .engine
        .update_income(
            &id,
            payload.amount_minor,
            payload.source.as_deref(),
            payload.description.as_deref(),
            payload.date,
            payload.is_recurring,
        )
        .await?;
    Ok(Json(map_income(income)))
}

pub async fn remove(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ServerError> {
    state.engine.delete_income(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[derive(Serialize)]
struct ExportRow<'a> {
    date: NaiveDate,
    amount_minor: i64,
    source: &'a str,
    description: &'a str,
    is_recurring: bool,
}

/// The filtered income list as a downloadable CSV.
pub async fn export(
    State(state): State<ServerState>,
    Query(query): Query<IncomeListQuery>,
) -> Result<Response, ServerError> {
    let income = state.engine.list_income(&list_filter(query)).await?;

    let mut writer = csv::Writer::from_writer(Vec::new());
    for entry in &income {
        writer
            .serialize(ExportRow {
                date: entry.date,
                amount_minor: entry.amount_minor,
                source: &entry.source,
                description: &entry.description,
                is_recurring: entry.is_recurring,
            })
            .map_err(|err| ServerError::Generic(err.to_string()))?;
    }
    let data = writer
        .into_inner()
        .map_err(|err| ServerError::Generic(err.to_string()))?;

    Ok(csv_attachment("income.csv", data))
}
