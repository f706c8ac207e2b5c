use axum::{
    Router,
    routing::{get, post},
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use super::handlers::{
    AppState, create_book, create_loan, create_member, get_book, get_loan, get_member, list_books,
    list_loans, list_members, return_book,
};

/// Creates the API router
///
/// - POST /books, GET /books, GET /books/:isbn
/// - POST /members, GET /members, GET /members/:id
/// - POST /loans, GET /loans, GET /loans/:id
/// - POST /loans/:id/return - Return a book, responds with the late fee
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        // Health check endpoint
        .route("/health", get(health_check))
        .route("/books", post(create_book).get(list_books))
        .route("/books/:isbn", get(get_book))
        .route("/members", post(create_member).get(list_members))
        .route("/members/:id", get(get_member))
        .route("/loans", post(create_loan).get(list_loans))
        .route("/loans/:id", get(get_loan))
        .route("/loans/:id/return", post(return_book))
        // Add tracing middleware
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Health check endpoint
async fn health_check() -> &'static str {
    "OK"
}
