use crate::domain::{Isbn, LoanId, MemberId, ValidationError};
use thiserror::Error;

/// 図書館アプリケーション層のエラー
#[derive(Debug, Error)]
pub enum LibraryError {
    /// 入力値の検証エラー（ISBN形式など）
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// 書籍が存在しない
    #[error("Book not found: {0}")]
    BookNotFound(Isbn),

    /// 会員が存在しない
    #[error("Member not found: {0}")]
    MemberNotFound(MemberId),

    /// 貸出が存在しない
    #[error("Loan not found: {0}")]
    LoanNotFound(LoanId),

    /// 貸出上限に達している
    #[error("Borrow limit reached for member {member_id} (max {limit} books)")]
    BorrowLimitExceeded { member_id: MemberId, limit: usize },

    /// リポジトリのエラー
    #[error("Repository error")]
    RepositoryError(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl LibraryError {
    /// 書籍・会員・貸出のいずれかが見つからないエラーか
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            LibraryError::BookNotFound(_)
                | LibraryError::MemberNotFound(_)
                | LibraryError::LoanNotFound(_)
        )
    }
}

/// アプリケーション層の Result型
pub type Result<T> = std::result::Result<T, LibraryError>;
