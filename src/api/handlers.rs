use crate::application::library::LibraryError;
use crate::controller::LibraryController;
use crate::domain::{Book, BookRecord, Isbn, Loan, LoanId, Member, MemberId, MemberRecord};
use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use std::sync::Arc;

use super::{
    error::ApiError,
    types::{BookReturnedResponse, LoanBookRequest},
};

// ============================================================================
// State
// ============================================================================

/// ハンドラー間で共有されるアプリケーション状態
#[derive(Clone)]
pub struct AppState {
    pub controller: LibraryController,
}

// ============================================================================
// 蔵書
// ============================================================================

/// POST /books - 蔵書を登録（同じISBNなら上書き）
///
/// 本文はレコード形式で受け取り、検証エラーは400として返す。
pub async fn create_book(
    State(state): State<Arc<AppState>>,
    Json(record): Json<BookRecord>,
) -> Result<(StatusCode, Json<Book>), ApiError> {
    let book = Book::from_record(record).map_err(LibraryError::from)?;
    state.controller.add_book(book.clone()).await?;
    Ok((StatusCode::CREATED, Json(book)))
}

/// GET /books - 蔵書一覧
pub async fn list_books(State(state): State<Arc<AppState>>) -> Result<Json<Vec<Book>>, ApiError> {
    Ok(Json(state.controller.get_books().await?))
}

/// GET /books/:isbn - ISBNで蔵書を取得
pub async fn get_book(
    State(state): State<Arc<AppState>>,
    Path(isbn): Path<String>,
) -> Result<Json<Book>, ApiError> {
    let isbn = Isbn::parse(isbn).map_err(LibraryError::from)?;
    let book = state.controller.get_book(isbn.as_str()).await?;
    book.map(Json)
        .ok_or_else(|| LibraryError::BookNotFound(isbn).into())
}

// ============================================================================
// 会員
// ============================================================================

/// POST /members - 会員を登録（同じ会員IDなら上書き）
pub async fn create_member(
    State(state): State<Arc<AppState>>,
    Json(record): Json<MemberRecord>,
) -> Result<(StatusCode, Json<Member>), ApiError> {
    let member = Member::from_record(record).map_err(LibraryError::from)?;
    state.controller.add_member(member.clone()).await?;
    Ok((StatusCode::CREATED, Json(member)))
}

/// GET /members - 会員一覧
pub async fn list_members(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<Member>>, ApiError> {
    Ok(Json(state.controller.get_members().await?))
}

/// GET /members/:id - 会員IDで会員を取得
pub async fn get_member(
    State(state): State<Arc<AppState>>,
    Path(member_id): Path<i64>,
) -> Result<Json<Member>, ApiError> {
    state
        .controller
        .get_member(member_id)
        .await?
        .map(Json)
        .ok_or_else(|| LibraryError::MemberNotFound(MemberId::new(member_id)).into())
}

// ============================================================================
// 貸出
// ============================================================================

/// POST /loans - 新しい貸出を作成
///
/// 強制されるビジネスルール:
/// - 書籍・会員が存在すること
/// - 会員の貸出数が上限（一般5冊、プレミアム10冊）に達していないこと
pub async fn create_loan(
    State(state): State<Arc<AppState>>,
    Json(req): Json<LoanBookRequest>,
) -> Result<(StatusCode, Json<Loan>), ApiError> {
    let loan = state.controller.loan_book(&req.isbn, req.member_id).await?;
    Ok((StatusCode::CREATED, Json(loan)))
}

/// GET /loans - 貸出一覧
pub async fn list_loans(State(state): State<Arc<AppState>>) -> Result<Json<Vec<Loan>>, ApiError> {
    Ok(Json(state.controller.get_loans().await?))
}

/// GET /loans/:id - 貸出詳細
pub async fn get_loan(
    State(state): State<Arc<AppState>>,
    Path(loan_id): Path<i64>,
) -> Result<Json<Loan>, ApiError> {
    state
        .controller
        .get_loan(loan_id)
        .await?
        .map(Json)
        .ok_or_else(|| LibraryError::LoanNotFound(LoanId::new(loan_id)).into())
}

/// POST /loans/:id/return - 書籍を返却
///
/// 貸出を削除し、延滞料金を返す。
pub async fn return_book(
    State(state): State<Arc<AppState>>,
    Path(loan_id): Path<i64>,
) -> Result<Json<BookReturnedResponse>, ApiError> {
    let fee = state.controller.return_book(loan_id).await?;

    Ok(Json(BookReturnedResponse {
        loan_id,
        fee: fee.as_f64(),
    }))
}
