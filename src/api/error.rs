use crate::application::library::LibraryError;
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};

use super::types::ErrorResponse;

/// API層のエラー型
///
/// アプリケーション層のエラーをラップし、HTTPレスポンスへのマッピングを提供する。
#[derive(Debug)]
pub struct ApiError(LibraryError);

impl From<LibraryError> for ApiError {
    fn from(err: LibraryError) -> Self {
        ApiError(err)
    }
}

impl ApiError {
    fn parts(&self) -> (StatusCode, &'static str, String) {
        match &self.0 {
            // 400 Bad Request - 入力値の形式エラー
            LibraryError::Validation(e) => {
                (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", e.to_string())
            }

            // 404 Not Found - リクエストされたリソースが存在しない
            err @ LibraryError::BookNotFound(_) => {
                (StatusCode::NOT_FOUND, "BOOK_NOT_FOUND", err.to_string())
            }
            err @ LibraryError::MemberNotFound(_) => {
                (StatusCode::NOT_FOUND, "MEMBER_NOT_FOUND", err.to_string())
            }
            err @ LibraryError::LoanNotFound(_) => {
                (StatusCode::NOT_FOUND, "LOAN_NOT_FOUND", err.to_string())
            }

            // 422 Unprocessable Entity - ビジネスルール違反
            err @ LibraryError::BorrowLimitExceeded { .. } => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "BORROW_LIMIT_EXCEEDED",
                err.to_string(),
            ),

            // 500 Internal Server Error - 詳細はログのみ
            LibraryError::RepositoryError(e) => {
                tracing::error!("Repository error: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "REPOSITORY_ERROR",
                    "Failed to access library storage".to_string(),
                )
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_type, message) = self.parts();
        let body = Json(ErrorResponse::new(error_type, message));
        (status, body).into_response()
    }
}
