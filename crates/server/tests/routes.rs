use std::sync::Arc;

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
};
use chrono::Utc;
use http_body_util::BodyExt;
use sea_orm::Database;
use serde_json::{Value, json};
use tower::ServiceExt;
use uuid::Uuid;

use migration::MigratorTrait;
use server::{ServerState, router};

async fn test_router() -> Router {
    let db = Database::connect("sqlite::memory:").await.unwrap();
    migration::Migrator::up(&db, None).await.unwrap();
    let engine = engine::Engine::builder()
        .database(db)
        .build()
        .await
        .unwrap();
    router(ServerState {
        engine: Arc::new(engine),
    })
}

async fn request(router: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");
    let request = match body {
        Some(body) => builder.body(Body::from(body.to_string())).unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

async fn create_account(router: &Router, name: &str, kind: &str) -> Uuid {
    let (status, body) = request(
        router,
        "POST",
        "/accounts",
        Some(json!({ "name": name, "kind": kind })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    body["id"].as_str().unwrap().parse().unwrap()
}

#[tokio::test]
async fn account_crud_round_trip() {
    let router = test_router().await;
    let id = create_account(&router, "Mina El Roble", "mina").await;

    let (status, body) = request(&router, "GET", &format!("/accounts/{id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], "Mina El Roble");
    assert_eq!(body["kind"], "mina");
    assert_eq!(body["balance_minor"], 0);
    assert_eq!(body["currency"], "COP");

    let (status, _) = request(
        &router,
        "PATCH",
        &format!("/accounts/{id}"),
        Some(json!({ "name": "Mina El Cedro" })),
    )
    .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, body) = request(&router, "GET", "/accounts", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["accounts"][0]["name"], "Mina El Cedro");

    let (status, _) = request(&router, "DELETE", &format!("/accounts/{id}"), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = request(&router, "GET", &format!("/accounts/{id}"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn duplicate_account_name_returns_conflict() {
    let router = test_router().await;
    create_account(&router, "Comprador Norte", "comprador").await;

    let (status, body) = request(
        &router,
        "POST",
        "/accounts",
        Some(json!({ "name": "comprador norte", "kind": "comprador" })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert!(body["error"].as_str().unwrap().contains("comprador norte"));
}

#[tokio::test]
async fn completed_transaction_moves_balances() {
    let router = test_router().await;
    let mina = create_account(&router, "Mina A", "mina").await;
    let caja = create_account(&router, "Caja", "rodmar").await;

    let (status, _) = request(
        &router,
        "POST",
        "/transactions",
        Some(json!({
            "origin_account_id": mina,
            "destination_account_id": caja,
            "amount_minor": 2_000_000,
            "status": "completed",
            "occurred_at": Utc::now().to_rfc3339(),
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (_, body) = request(&router, "GET", &format!("/accounts/{mina}"), None).await;
    assert_eq!(body["balance_minor"], -2_000_000);
    let (_, body) = request(&router, "GET", &format!("/accounts/{caja}"), None).await;
    assert_eq!(body["balance_minor"], 2_000_000);
}

#[tokio::test]
async fn pending_transaction_then_complete() {
    let router = test_router().await;
    let mina = create_account(&router, "Mina A", "mina").await;
    let caja = create_account(&router, "Caja", "rodmar").await;

    let (status, body) = request(
        &router,
        "POST",
        "/transactions",
        Some(json!({
            "origin_account_id": mina,
            "destination_account_id": caja,
            "amount_minor": 500_000,
            "status": "pending",
            "occurred_at": Utc::now().to_rfc3339(),
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let tx_id = body["id"].as_str().unwrap().to_string();

    let (_, body) = request(&router, "GET", &format!("/accounts/{caja}"), None).await;
    assert_eq!(body["balance_minor"], 0);

    let (status, _) = request(
        &router,
        "POST",
        &format!("/transactions/{tx_id}/complete"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (_, body) = request(&router, "GET", &format!("/accounts/{caja}"), None).await;
    assert_eq!(body["balance_minor"], 500_000);

    // Completing a second time is a state conflict, not a validation error.
    let (status, _) = request(
        &router,
        "POST",
        &format!("/transactions/{tx_id}/complete"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn transaction_to_unknown_account_is_not_found() {
    let router = test_router().await;
    let mina = create_account(&router, "Mina A", "mina").await;

    let (status, _) = request(
        &router,
        "POST",
        "/transactions",
        Some(json!({
            "origin_account_id": mina,
            "destination_account_id": Uuid::new_v4(),
            "amount_minor": 1000,
            "status": "completed",
            "occurred_at": Utc::now().to_rfc3339(),
        })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn delete_referenced_account_is_conflict() {
    let router = test_router().await;
    let mina = create_account(&router, "Mina A", "mina").await;
    let caja = create_account(&router, "Caja", "rodmar").await;

    let (status, _) = request(
        &router,
        "POST",
        "/transactions",
        Some(json!({
            "origin_account_id": mina,
            "destination_account_id": caja,
            "amount_minor": 1000,
            "status": "pending",
            "occurred_at": Utc::now().to_rfc3339(),
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, _) = request(&router, "DELETE", &format!("/accounts/{mina}"), None).await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn investments_and_maintenance_recalculate() {
    let router = test_router().await;
    let mina = create_account(&router, "Mina A", "mina").await;
    let comprador = create_account(&router, "Comprador B", "comprador").await;

    let (status, _) = request(
        &router,
        "POST",
        "/transactions",
        Some(json!({
            "origin_account_id": mina,
            "destination_account_id": comprador,
            "amount_minor": 2_000_000,
            "status": "completed",
            "occurred_at": Utc::now().to_rfc3339(),
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, _) = request(
        &router,
        "POST",
        "/transactions",
        Some(json!({
            "origin_account_id": mina,
            "destination_account_id": comprador,
            "amount_minor": 500_000,
            "status": "pending",
            "occurred_at": Utc::now().to_rfc3339(),
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, _) = request(
        &router,
        "POST",
        "/investments",
        Some(json!({
            "origin_account_id": comprador,
            "destination_account_id": mina,
            "amount_minor": 300_000,
            "occurred_at": Utc::now().to_rfc3339(),
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = request(&router, "POST", "/maintenance/recalculate", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["accounts_updated"], 2);
    assert_eq!(body["entries_processed"], 2);

    let (_, body) = request(&router, "GET", &format!("/accounts/{mina}"), None).await;
    assert_eq!(body["balance_minor"], -1_700_000);
    let (_, body) = request(&router, "GET", &format!("/accounts/{comprador}"), None).await;
    assert_eq!(body["balance_minor"], 1_700_000);

    let (status, body) = request(
        &router,
        "POST",
        &format!("/accounts/{comprador}/recalculate"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["balance_minor"], 1_700_000);
}

#[tokio::test]
async fn list_transactions_filters_by_status() {
    let router = test_router().await;
    let mina = create_account(&router, "Mina A", "mina").await;
    let caja = create_account(&router, "Caja", "rodmar").await;

    for (amount, status) in [(1000, "completed"), (2000, "pending")] {
        let (code, _) = request(
            &router,
            "POST",
            "/transactions",
            Some(json!({
                "origin_account_id": mina,
                "destination_account_id": caja,
                "amount_minor": amount,
                "status": status,
                "occurred_at": Utc::now().to_rfc3339(),
            })),
        )
        .await;
        assert_eq!(code, StatusCode::CREATED);
    }

    let (status, body) = request(&router, "GET", "/transactions?status=pending", None).await;
    assert_eq!(status, StatusCode::OK);
    let transactions = body["transactions"].as_array().unwrap();
    assert_eq!(transactions.len(), 1);
    assert_eq!(transactions[0]["amount_minor"], 2000);
}
