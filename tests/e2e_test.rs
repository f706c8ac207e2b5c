mod common;

use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Request, StatusCode},
};
use chrono::NaiveDate;
use common::*;
use library_lending::adapters::sqlite::SqliteRepository;
use library_lending::api::{AppState, create_router};
use library_lending::application::library::ServiceDependencies;
use library_lending::controller::LibraryController;
use serde_json::{Value, json};
use std::sync::{Arc, Mutex};
use tower::ServiceExt;

// ============================================================================
// ヘルパー
// ============================================================================

/// テスト用アプリケーション（日付は`set_today`で進められる）
struct TestApp {
    router: Router,
    today: Arc<Mutex<NaiveDate>>,
}

impl TestApp {
    async fn new(today: NaiveDate) -> Self {
        let pool = create_test_pool().await;
        let deps = ServiceDependencies::from_repository(Arc::new(SqliteRepository::new(pool)));

        let today = Arc::new(Mutex::new(today));
        let clock_source = today.clone();
        let controller = LibraryController::with_clock(
            deps,
            Arc::new(move || *clock_source.lock().unwrap()),
        );

        let router = create_router(Arc::new(AppState { controller }));
        Self { router, today }
    }

    fn set_today(&self, date: NaiveDate) {
        *self.today.lock().unwrap() = date;
    }

    async fn send(&self, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let builder = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(body) => builder
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };
        (status, value)
    }

    async fn get(&self, uri: &str) -> (StatusCode, Value) {
        self.send("GET", uri, None).await
    }

    async fn post(&self, uri: &str, body: Value) -> (StatusCode, Value) {
        self.send("POST", uri, Some(body)).await
    }
}

fn physical_book_json(isbn: &str) -> Value {
    json!({
        "isbn": isbn,
        "type": "PhysicalBook",
        "title": "Dune",
        "author": "Frank Herbert",
        "price": 20.0,
        "weight_kg": 0.5,
        "shelf_location": "A1"
    })
}

fn member_json(id: i64, kind: &str) -> Value {
    json!({
        "member_id": id,
        "type": kind,
        "name": "Bob",
        "email": "bob@example.org"
    })
}

// ============================================================================
// シナリオ
// ============================================================================

#[tokio::test]
async fn test_health_check() {
    let app = TestApp::new(date(2025, 1, 1)).await;
    let response = app
        .router
        .clone()
        .oneshot(Request::get("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_full_loan_lifecycle() {
    let app = TestApp::new(date(2025, 1, 1)).await;

    let (status, book) = app.post("/books", physical_book_json("1234567890")).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(book["type"], "PhysicalBook");

    let (status, _) = app.post("/members", member_json(1, "RegularMember")).await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, loan) = app
        .post("/loans", json!({ "isbn": "1234567890", "member_id": 1 }))
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(loan["loan_id"], 1);
    assert_eq!(loan["loan_date"], "2025-01-01");
    assert_eq!(loan["due_date"], "2025-01-15");

    let (status, fetched) = app.get("/loans/1").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched, loan);

    // 返却期限の3日後に返却
    app.set_today(date(2025, 1, 18));
    let (status, returned) = app.post("/loans/1/return", json!({})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(returned["loan_id"], 1);
    assert_eq!(returned["fee"], 3.0);

    let (status, loans) = app.get("/loans").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(loans, json!([]));
}

#[tokio::test]
async fn test_premium_member_fee_over_http() {
    let app = TestApp::new(date(2025, 1, 1)).await;
    app.post("/books", physical_book_json("1234567890")).await;
    app.post("/members", member_json(2, "PremiumMember")).await;
    app.post("/loans", json!({ "isbn": "1234567890", "member_id": 2 }))
        .await;

    app.set_today(date(2025, 1, 18));
    let (_, returned) = app.post("/loans/1/return", json!({})).await;
    assert_eq!(returned["fee"], 1.0);
}

#[tokio::test]
async fn test_get_book_and_member() {
    let app = TestApp::new(date(2025, 1, 1)).await;
    app.post("/books", physical_book_json("1234567890")).await;
    app.post("/members", member_json(1, "RegularMember")).await;

    let (status, book) = app.get("/books/1234567890").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(book["shelf_location"], "A1");

    let (status, member) = app.get("/members/1").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(member["type"], "RegularMember");

    let (_, books) = app.get("/books").await;
    assert_eq!(books.as_array().unwrap().len(), 1);
    let (_, members) = app.get("/members").await;
    assert_eq!(members.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_not_found_responses() {
    let app = TestApp::new(date(2025, 1, 1)).await;

    let (status, body) = app.get("/books/9999999999").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "BOOK_NOT_FOUND");

    let (status, body) = app.get("/members/42").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "MEMBER_NOT_FOUND");

    let (status, body) = app.post("/loans/7/return", json!({})).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "LOAN_NOT_FOUND");

    app.post("/members", member_json(1, "RegularMember")).await;
    let (status, body) = app
        .post("/loans", json!({ "isbn": "9999999999", "member_id": 1 }))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "BOOK_NOT_FOUND");

    let (_, loans) = app.get("/loans").await;
    assert_eq!(loans, json!([]));
}

#[tokio::test]
async fn test_borrow_limit_is_unprocessable() {
    let app = TestApp::new(date(2025, 1, 1)).await;
    app.post("/members", member_json(1, "RegularMember")).await;

    for i in 0..6 {
        let isbn = format!("{:010}", 1_000_000_000u64 + i);
        app.post("/books", physical_book_json(&isbn)).await;
    }

    for i in 0..5 {
        let isbn = format!("{:010}", 1_000_000_000u64 + i);
        let (status, _) = app
            .post("/loans", json!({ "isbn": isbn, "member_id": 1 }))
            .await;
        assert_eq!(status, StatusCode::CREATED);
    }

    let (status, body) = app
        .post("/loans", json!({ "isbn": "1000000005", "member_id": 1 }))
        .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error"], "BORROW_LIMIT_EXCEEDED");
}

#[tokio::test]
async fn test_malformed_isbn_is_bad_request() {
    let app = TestApp::new(date(2025, 1, 1)).await;

    let (status, body) = app.get("/books/not-an-isbn").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "VALIDATION_ERROR");

    let (status, body) = app
        .post("/loans", json!({ "isbn": "12-34", "member_id": 1 }))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_invalid_book_payload_is_validation_error() {
    let app = TestApp::new(date(2025, 1, 1)).await;

    let mut bad_isbn = physical_book_json("12-34");
    bad_isbn["type"] = json!("Book");
    let mut negative = physical_book_json("1234567890");
    negative["price"] = json!(-1.0);
    let mut missing_shelf = physical_book_json("1234567890");
    missing_shelf.as_object_mut().unwrap().remove("shelf_location");

    for payload in [bad_isbn, negative, missing_shelf] {
        let (status, body) = app.post("/books", payload).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "VALIDATION_ERROR");
        assert!(body["message"].is_string());
    }

    let (_, books) = app.get("/books").await;
    assert_eq!(books, json!([]));
}

#[tokio::test]
async fn test_unknown_member_type_is_validation_error() {
    let app = TestApp::new(date(2025, 1, 1)).await;

    let (status, body) = app.post("/members", member_json(3, "GoldMember")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "VALIDATION_ERROR");
    assert_eq!(body["message"], "Unknown member type: GoldMember");

    let (_, members) = app.get("/members").await;
    assert_eq!(members, json!([]));
}
