//! Round-trip tests against a small in-process HTTP backend that speaks the
//! same JSON as the real server, down to the `_id` / `userId` field names.

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{json, Value};

use fintrack::models::auth::LoginRequest;
use fintrack::models::expenses::NewExpense;
use fintrack::models::savings::NewSavingsEntry;
use fintrack::repositories::auth::AuthRepository;
use fintrack::repositories::expenses::ExpenseRepository;
use fintrack::repositories::savings::SavingsRepository;
use fintrack::repositories::{Api, ApiError};

#[derive(Clone, Default)]
struct Backend {
    expenses: Arc<Mutex<Vec<Value>>>,
    savings: Arc<Mutex<Vec<Value>>>,
    next_id: Arc<AtomicU64>,
}

impl Backend {
    fn mint_id(&self) -> String {
        format!("id-{}", self.next_id.fetch_add(1, Ordering::SeqCst))
    }
}

async fn login(Json(body): Json<Value>) -> (StatusCode, Json<Value>) {
    if body["email"] == "user@example.com" && body["password"] == "hunter2" {
        (
            StatusCode::OK,
            Json(json!({
                "token": "tok-123",
                "user": { "_id": "u1", "name": "Test User", "email": "user@example.com" }
            })),
        )
    } else {
        (
            StatusCode::UNAUTHORIZED,
            Json(json!({ "message": "Invalid credentials" })),
        )
    }
}

async fn list_expenses(
    State(backend): State<Backend>,
    Path(user_id): Path<String>,
) -> Json<Vec<Value>> {
    let rows = backend.expenses.lock().unwrap();
    Json(
        rows.iter()
            .filter(|e| e["userId"] == user_id.as_str())
            .cloned()
            .collect(),
    )
}

async fn create_expense(State(backend): State<Backend>, Json(mut body): Json<Value>) -> Json<Value> {
    body["_id"] = json!(backend.mint_id());
    // The real server stores amounts as strings; echo one back to prove the
    // client tolerates it.
    body["amount"] = json!(body["amount"].to_string());
    backend.expenses.lock().unwrap().push(body.clone());
    Json(body)
}

async fn delete_expense(
    State(backend): State<Backend>,
    Path(id): Path<String>,
) -> (StatusCode, Json<Value>) {
    let mut rows = backend.expenses.lock().unwrap();
    let before = rows.len();
    rows.retain(|e| e["_id"] != id.as_str());
    if rows.len() == before {
        (
            StatusCode::NOT_FOUND,
            Json(json!({ "message": "Expense not found" })),
        )
    } else {
        (StatusCode::OK, Json(json!({ "message": "Deleted" })))
    }
}

async fn create_savings(State(backend): State<Backend>, Json(mut body): Json<Value>) -> Json<Value> {
    body["_id"] = json!(backend.mint_id());
    backend.savings.lock().unwrap().push(body.clone());
    Json(body)
}

async fn list_savings(
    State(backend): State<Backend>,
    Path(user_id): Path<String>,
    Query(params): Query<HashMap<String, String>>,
) -> Json<Vec<Value>> {
    let rows = backend.savings.lock().unwrap();
    Json(
        rows.iter()
            .filter(|s| s["userId"] == user_id.as_str())
            .filter(|s| match params.get("month") {
                Some(month) => s["month"] == month.as_str(),
                None => true,
            })
            .cloned()
            .collect(),
    )
}

async fn spawn_backend() -> SocketAddr {
    let backend = Backend::default();
    let app = Router::new()
        .route("/api/auth/login", post(login))
        .route("/api/expenses/", post(create_expense))
        .route("/api/expenses/{id}", get(list_expenses).delete(delete_expense))
        .route("/api/savings/", post(create_savings))
        .route("/api/savings/{user_id}", get(list_savings))
        .with_state(backend);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind mock backend");
    let addr = listener.local_addr().expect("local addr");
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("serve mock backend");
    });
    addr
}

async fn api() -> Api {
    let addr = spawn_backend().await;
    Api::new(format!("http://{addr}"))
}

#[tokio::test]
async fn login_decodes_token_and_user() {
    let auth = AuthRepository::new(api().await);

    let response = auth
        .login("user@example.com", "hunter2")
        .await
        .expect("login");
    assert_eq!(response.token, "tok-123");
    assert_eq!(response.user.id, "u1");
    assert_eq!(response.user.name, "Test User");
}

#[tokio::test]
async fn login_rejection_surfaces_server_message() {
    let auth = AuthRepository::new(api().await);

    let err = auth
        .login("user@example.com", "wrong")
        .await
        .expect_err("bad password");
    match err {
        ApiError::Remote { status, message } => {
            assert_eq!(status, 401);
            assert_eq!(message, "Invalid credentials");
        }
        other => panic!("expected Remote, got {other:?}"),
    }
}

#[tokio::test]
async fn created_expense_round_trips_with_string_amount() {
    let expenses = ExpenseRepository::new(api().await);

    let created = expenses
        .create(&NewExpense {
            user_id: "u1".into(),
            amount: 42.5,
            category: "Food".into(),
            date: "2026-08-15".into(),
            description: "groceries".into(),
        })
        .await
        .expect("create");
    assert_eq!(created.amount, 42.5);
    assert_eq!(created.user_id, "u1");
    assert!(!created.id.is_empty());

    let listed = expenses.list("u1").await.expect("list");
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].id, created.id);
    assert_eq!(listed[0].amount, 42.5);

    let other = expenses.list("someone-else").await.expect("list other");
    assert!(other.is_empty());
}

#[tokio::test]
async fn delete_of_unknown_id_is_a_remote_404_and_leaves_data_alone() {
    let expenses = ExpenseRepository::new(api().await);

    let created = expenses
        .create(&NewExpense {
            user_id: "u1".into(),
            amount: 10.0,
            category: "Transport".into(),
            date: "2026-08-20".into(),
            description: String::new(),
        })
        .await
        .expect("create");

    let err = expenses.delete("no-such-id").await.expect_err("missing id");
    match err {
        ApiError::Remote { status, .. } => assert_eq!(status, 404),
        other => panic!("expected Remote, got {other:?}"),
    }

    let listed = expenses.list("u1").await.expect("list");
    assert_eq!(listed.len(), 1);

    expenses.delete(&created.id).await.expect("delete existing");
    let listed = expenses.list("u1").await.expect("list after delete");
    assert!(listed.is_empty());
}

#[tokio::test]
async fn savings_month_filter_narrows_the_list() {
    let savings = SavingsRepository::new(api().await);

    for (goal, saved, month) in [(500.0, 200.0, "2026-07"), (500.0, 350.0, "2026-08")] {
        savings
            .create(&NewSavingsEntry {
                user_id: "u1".into(),
                goal,
                saved,
                month: month.into(),
            })
            .await
            .expect("create savings");
    }

    let all = savings.list("u1").await.expect("list all");
    assert_eq!(all.len(), 2);

    let august = savings
        .list_for_month("u1", "2026-08")
        .await
        .expect("list august");
    assert_eq!(august.len(), 1);
    assert_eq!(august[0].saved, 350.0);
}

#[tokio::test]
async fn login_request_serializes_expected_field_names() {
    let body = serde_json::to_value(LoginRequest {
        email: "user@example.com".into(),
        password: "hunter2".into(),
    })
    .expect("serialize");
    assert_eq!(body, json!({ "email": "user@example.com", "password": "hunter2" }));
}
