//! Categories API endpoints.

use api_types::category::{CategoryCreate, CategorySpendingView, CategoryUpdate, CategoryView};
use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use engine::{Category, CategoryWithSpending};

use crate::{ServerError, server::ServerState};

fn map_category(category: Category) -> CategoryView {
    CategoryView {
        id: category.id,
        name: category.name,
        icon: category.icon,
        color: category.color,
        created_at: category.created_at,
    }
}

fn map_spending(entry: CategoryWithSpending) -> CategorySpendingView {
    CategorySpendingView {
        id: entry.category.id,
        name: entry.category.name,
        icon: entry.category.icon,
        color: entry.category.color,
        created_at: entry.category.created_at,
        total_spent_minor: entry.total_spent_minor,
        expense_count: entry.expense_count,
    }
}

pub async fn list(
    State(state): State<ServerState>,
) -> Result<Json<Vec<CategorySpendingView>>, ServerError> {
    let categories = state
        .engine
        .list_categories()
        .await?
        .into_iter()
        .map(map_spending)
        .collect();
    Ok(Json(categories))
}

pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<CategoryCreate>,
) -> Result<(StatusCode, Json<CategoryView>), ServerError> {
    let category = state
        .engine
        .create_category(
            &payload.name,
            payload.icon.as_deref(),
            payload.color.as_deref(),
        )
        .await?;
    Ok((StatusCode::CREATED, Json(map_category(category))))
}

pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Json(payload): Json<CategoryUpdate>,
) -> Result<Json<CategoryView>, ServerError> {
    let category = state
        .engine
        .update_category(
            &id,
            payload.name.as_deref(),
            payload.icon.as_deref(),
            payload.color.as_deref(),
        )
        .await?;
    Ok(Json(map_category(category)))
}

pub async fn remove(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ServerError> {
    state.engine.delete_category(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}
