use serde::{Deserialize, Serialize};

/// 貸出作成リクエスト（POST /loans）
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoanBookRequest {
    pub isbn: String,
    pub member_id: i64,
}

/// 返却レスポンス（POST /loans/:id/return）
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookReturnedResponse {
    pub loan_id: i64,
    pub fee: f64,
}

/// エラーレスポンス
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            message: message.into(),
        }
    }
}
