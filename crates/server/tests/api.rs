use std::sync::Arc;

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
};
use engine::Engine;
use http_body_util::BodyExt;
use migration::MigratorTrait;
use sea_orm::Database;
use serde_json::{Value, json};
use server::{ServerState, router};
use tower::ServiceExt;

async fn test_router() -> Router {
    let db = Database::connect("sqlite::memory:").await.unwrap();
    migration::Migrator::up(&db, None).await.unwrap();
    router(ServerState {
        engine: Arc::new(Engine::new(db)),
    })
}

async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let request = match body {
        Some(body) => Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => Request::builder()
            .method(method)
            .uri(uri)
            .body(Body::empty())
            .unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

async fn category_id(app: &Router, name: &str) -> String {
    let (status, categories) = send(app, "GET", "/api/categories", None).await;
    assert_eq!(status, StatusCode::OK);
    categories
        .as_array()
        .unwrap()
        .iter()
        .find(|c| c["name"] == name)
        .expect("category missing")["id"]
        .as_str()
        .unwrap()
        .to_string()
}

#[tokio::test]
async fn health_reports_ok() {
    let app = test_router().await;
    let (status, body) = send(&app, "GET", "/api/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn seeded_categories_are_listed_with_totals() {
    let app = test_router().await;
    let (status, body) = send(&app, "GET", "/api/categories", None).await;
    assert_eq!(status, StatusCode::OK);

    let categories = body.as_array().unwrap();
    assert_eq!(categories.len(), 8);
    // Ordered by name.
    assert_eq!(categories[0]["name"], "Entertainment");
    assert!(categories.iter().all(|c| c["total_spent_minor"] == 0));
    assert!(categories.iter().all(|c| c["expense_count"] == 0));
}

#[tokio::test]
async fn expense_round_trip_with_filters() {
    let app = test_router().await;
    let groceries = category_id(&app, "Groceries").await;

    let (status, created) = send(
        &app,
        "POST",
        "/api/expenses",
        Some(json!({
            "amount_minor": 2500,
            "category_id": groceries,
            "description": "weekly shop",
            "date": "2024-03-05",
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["category_name"], "Groceries");

    send(
        &app,
        "POST",
        "/api/expenses",
        Some(json!({"amount_minor": 1200, "date": "2024-03-20"})),
    )
    .await;
    send(
        &app,
        "POST",
        "/api/expenses",
        Some(json!({"amount_minor": 900, "category_id": groceries, "date": "2024-04-01"})),
    )
    .await;

    let uri = format!(
        "/api/expenses?month=3&year=2024&category_id={groceries}&limit=2"
    );
    let (status, listed) = send(&app, "GET", &uri, None).await;
    assert_eq!(status, StatusCode::OK);
    let listed = listed.as_array().unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0]["id"], created["id"]);
    assert_eq!(listed[0]["category_icon"], "🛒");

    // Update leaves omitted fields alone and can clear the category.
    let id = created["id"].as_str().unwrap();
    let (status, updated) = send(
        &app,
        "PUT",
        &format!("/api/expenses/{id}"),
        Some(json!({"category_id": null})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["amount_minor"], 2500);
    assert_eq!(updated["category_id"], Value::Null);

    let (status, _) = send(&app, "DELETE", &format!("/api/expenses/{id}"), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    let (status, _) = send(&app, "DELETE", &format!("/api/expenses/{id}"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn non_positive_expense_is_rejected() {
    let app = test_router().await;
    let (status, body) = send(
        &app,
        "POST",
        "/api/expenses",
        Some(json!({"amount_minor": 0, "date": "2024-03-05"})),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body["error"].as_str().unwrap().contains("amount"));
}

#[tokio::test]
async fn duplicate_category_name_conflicts() {
    let app = test_router().await;
    let (status, body) = send(
        &app,
        "POST",
        "/api/categories",
        Some(json!({"name": "Groceries"})),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert!(body["error"].as_str().unwrap().contains("Groceries"));
}

#[tokio::test]
async fn budget_status_reports_percent_used() {
    let app = test_router().await;
    let groceries = category_id(&app, "Groceries").await;

    let (status, budget) = send(
        &app,
        "POST",
        "/api/budgets",
        Some(json!({
            "category_id": groceries,
            "amount_minor": 20000,
            "month": 3,
            "year": 2024,
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(budget["month"], "2024-03");
    assert_eq!(budget["category_name"], "Groceries");

    for (amount, day) in [(10000, "2024-03-05"), (5000, "2024-03-12")] {
        send(
            &app,
            "POST",
            "/api/expenses",
            Some(json!({"amount_minor": amount, "category_id": groceries, "date": day})),
        )
        .await;
    }

    let (status, body) = send(&app, "GET", "/api/budgets/status?month=3&year=2024", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["totalBudget"], 20000);
    assert_eq!(body["totalSpent"], 15000);
    assert_eq!(body["totalRemaining"], 5000);
    assert_eq!(body["overallPercent"], 75.0);
    assert_eq!(body["month"], "03");
    assert_eq!(body["year"], "2024");

    let entries = body["categories"].as_array().unwrap();
    assert_eq!(entries.len(), 8);
    assert_eq!(entries[0]["category_name"], "Groceries");
    assert_eq!(entries[0]["percent_used"], 75.0);

    // Upsert: a second set replaces the amount, no second row.
    let (status, _) = send(
        &app,
        "POST",
        "/api/budgets",
        Some(json!({
            "category_id": groceries,
            "amount_minor": 30000,
            "month": 3,
            "year": 2024,
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (_, budgets) = send(&app, "GET", "/api/budgets?month=3&year=2024", None).await;
    let budgets = budgets.as_array().unwrap();
    assert_eq!(budgets.len(), 1);
    assert_eq!(budgets[0]["amount_minor"], 30000);
}

#[tokio::test]
async fn income_summary_guards_division_by_zero() {
    let app = test_router().await;

    send(
        &app,
        "POST",
        "/api/expenses",
        Some(json!({"amount_minor": 8000, "date": "2024-03-05"})),
    )
    .await;

    let (status, body) = send(&app, "GET", "/api/income/summary?month=3&year=2024", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["totalIncome"], 0);
    assert_eq!(body["totalExpenses"], 8000);
    assert_eq!(body["remaining"], -8000);
    assert_eq!(body["savingsRate"], 0.0);
    assert_eq!(body["bySource"].as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn expense_summary_field_names_are_camel_case() {
    let app = test_router().await;

    send(
        &app,
        "POST",
        "/api/expenses",
        Some(json!({"amount_minor": 12000, "date": "2024-03-10"})),
    )
    .await;

    let (status, body) = send(
        &app,
        "GET",
        "/api/expenses/summary?month=3&year=2024",
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["totalThisMonth"], 12000);
    assert_eq!(body["totalLastMonth"], 0);
    // Empty previous month: guarded 0, not a division error.
    assert_eq!(body["percentChange"], 0.0);
    assert_eq!(body["byCategory"].as_array().unwrap().len(), 8);
    assert_eq!(body["month"], "03");
    assert_eq!(body["year"], "2024");
}

#[tokio::test]
async fn export_returns_csv_attachment() {
    let app = test_router().await;
    let groceries = category_id(&app, "Groceries").await;

    send(
        &app,
        "POST",
        "/api/expenses",
        Some(json!({
            "amount_minor": 2500,
            "category_id": groceries,
            "description": "weekly shop",
            "date": "2024-03-05",
        })),
    )
    .await;

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("GET")
                .uri("/api/expenses/export?month=3&year=2024")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()[header::CONTENT_TYPE],
        "text/csv; charset=utf-8"
    );
    assert!(
        response.headers()[header::CONTENT_DISPOSITION]
            .to_str()
            .unwrap()
            .contains("expenses.csv")
    );

    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let text = String::from_utf8(bytes.to_vec()).unwrap();
    let mut lines = text.lines();
    assert_eq!(
        lines.next().unwrap(),
        "date,amount_minor,category,description"
    );
    assert_eq!(lines.next().unwrap(), "2024-03-05,2500,Groceries,weekly shop");
}

#[tokio::test]
async fn malformed_period_is_rejected() {
    let app = test_router().await;
    let (status, body) = send(
        &app,
        "GET",
        "/api/expenses/summary?month=13&year=2024",
        None,
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body["error"].as_str().unwrap().contains("month"));
}
