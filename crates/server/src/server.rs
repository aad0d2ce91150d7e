use std::sync::Arc;

use api_types::health::HealthResponse;
use axum::{
    Json, Router,
    http::header,
    response::{IntoResponse, Response},
    routing::{delete, get, put},
};
use chrono::Utc;
use engine::Engine;

use crate::{budgets, categories, expenses, income};

#[derive(Clone)]
pub struct ServerState {
    pub engine: Arc<Engine>,
}

/// All dashboard routes, mounted under `/api`.
pub fn router(state: ServerState) -> Router {
    Router::new()
        .route("/api/health", get(health))
        .route(
            "/api/categories",
            get(categories::list).post(categories::create),
        )
        .route(
            "/api/categories/{id}",
            put(categories::update).delete(categories::remove),
        )
        .route("/api/expenses", get(expenses::list).post(expenses::create))
        .route("/api/expenses/summary", get(expenses::summary))
        .route("/api/expenses/export", get(expenses::export))
        .route(
            "/api/expenses/{id}",
            put(expenses::update).delete(expenses::remove),
        )
        .route("/api/income", get(income::list).post(income::create))
        .route("/api/income/summary", get(income::summary))
        .route("/api/income/export", get(income::export))
        .route(
            "/api/income/{id}",
            put(income::update).delete(income::remove),
        )
        .route("/api/budgets", get(budgets::list).post(budgets::set))
        .route("/api/budgets/status", get(budgets::status))
        .route("/api/budgets/{id}", delete(budgets::remove))
        .with_state(state)
}

async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        timestamp: Utc::now(),
    })
}

/// CSV bytes as a downloadable attachment.
pub(crate) fn csv_attachment(filename: &str, data: Vec<u8>) -> Response {
    (
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{filename}\""),
            ),
        ],
        data,
    )
        .into_response()
}

pub async fn run(engine: Engine) {
    let listener = match tokio::net::TcpListener::bind("127.0.0.1:3000").await {
        Ok(listener) => listener,
        Err(err) => {
            tracing::error!("failed to bind server listener: {err}");
            return;
        }
    };
    if let Err(err) = run_with_listener(engine, listener).await {
        tracing::error!("server failed: {err}");
    }
}

pub async fn run_with_listener(
    engine: Engine,
    listener: tokio::net::TcpListener,
) -> Result<(), std::io::Error> {
    let addr = listener.local_addr()?;
    tracing::info!("Server listening on {}", addr);

    let state = ServerState {
        engine: Arc::new(engine),
    };

    axum::serve(listener, router(state)).await
}

pub fn spawn_with_listener(
    engine: Engine,
    listener: tokio::net::TcpListener,
) -> Result<std::net::SocketAddr, std::io::Error> {
    let addr = listener.local_addr()?;

    tokio::spawn(async move {
        if let Err(err) = run_with_listener(engine, listener).await {
            tracing::error!("server failed: {err}");
        }
    });

    Ok(addr)
}
