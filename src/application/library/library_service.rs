use crate::domain::{
    Book, Borrower, Isbn, Loan, LoanId, Member, MemberId, Money,
    commands::{LoanBook, ReturnBook},
};
use crate::ports::*;
use std::sync::Arc;

use super::errors::{LibraryError, Result};
use super::fees::late_fee_for;

/// サービスの依存関係
///
/// 振る舞いは持たず、各ユースケース関数に明示的に渡す。
/// サービスは状態をキャッシュしないため、毎回リポジトリから読み直す。
#[derive(Clone)]
pub struct ServiceDependencies {
    pub books: Arc<dyn BookRepository>,
    pub members: Arc<dyn MemberRepository>,
    pub loans: Arc<dyn LoanRepository>,
}

impl ServiceDependencies {
    /// 1つのリポジトリ実装を3つのポートとして共有する
    pub fn from_repository<R>(repository: Arc<R>) -> Self
    where
        R: LibraryRepository + 'static,
    {
        Self {
            books: repository.clone(),
            members: repository.clone(),
            loans: repository,
        }
    }
}

// ============================================================================
// 蔵書
// ============================================================================

/// 蔵書を登録する（同じISBNなら上書き）
pub async fn add_book(deps: &ServiceDependencies, book: Book) -> Result<()> {
    deps.books
        .save_book(&book)
        .await
        .map_err(LibraryError::RepositoryError)?;

    tracing::info!(isbn = %book.isbn(), kind = book.kind().as_str(), "Book added");
    Ok(())
}

pub async fn find_book_by_isbn(deps: &ServiceDependencies, isbn: &Isbn) -> Result<Option<Book>> {
    deps.books
        .get_book(isbn)
        .await
        .map_err(LibraryError::RepositoryError)
}

pub async fn list_books(deps: &ServiceDependencies) -> Result<Vec<Book>> {
    deps.books
        .list_books()
        .await
        .map_err(LibraryError::RepositoryError)
}

// ============================================================================
// 会員
// ============================================================================

/// 会員を登録する（同じ会員IDなら上書き）
pub async fn add_member(deps: &ServiceDependencies, member: Member) -> Result<()> {
    deps.members
        .save_member(&member)
        .await
        .map_err(LibraryError::RepositoryError)?;

    tracing::info!(member_id = member.member_id().value(), kind = member.kind().as_str(), "Member added");
    Ok(())
}

pub async fn find_member_by_id(
    deps: &ServiceDependencies,
    member_id: MemberId,
) -> Result<Option<Member>> {
    deps.members
        .get_member(member_id)
        .await
        .map_err(LibraryError::RepositoryError)
}

pub async fn list_members(deps: &ServiceDependencies) -> Result<Vec<Member>> {
    deps.members
        .list_members()
        .await
        .map_err(LibraryError::RepositoryError)
}

// ============================================================================
// 貸出
// ============================================================================

pub async fn find_loan_by_id(deps: &ServiceDependencies, loan_id: LoanId) -> Result<Option<Loan>> {
    deps.loans
        .get_loan(loan_id)
        .await
        .map_err(LibraryError::RepositoryError)
}

pub async fn list_loans(deps: &ServiceDependencies) -> Result<Vec<Loan>> {
    deps.loans
        .list_loans()
        .await
        .map_err(LibraryError::RepositoryError)
}

/// 会員の貸出中の冊数
///
/// 全貸出を走査して会員IDで絞り込む（O(全貸出数)）。
async fn count_active_loans(deps: &ServiceDependencies, member_id: MemberId) -> Result<usize> {
    let loans = list_loans(deps).await?;
    Ok(loans
        .iter()
        .filter(|loan| loan.member_id() == member_id)
        .count())
}

/// 書籍を貸し出す
///
/// ビジネスルール：
/// - 書籍が存在すること
/// - 会員が存在すること
/// - 会員の貸出中の冊数が貸出上限未満であること（一般5冊、プレミアム10冊）
/// - 返却期限は貸出日 + 14日
///
/// 同じ書籍の重複貸出は検査しない。
///
/// # 一貫性
///
/// 存在確認・上限確認と書き込みは1つのトランザクションではない。
/// 検証に失敗した場合は何も書き込まない。
///
/// # 戻り値
/// 作成された貸出
pub async fn create_loan(deps: &ServiceDependencies, cmd: LoanBook) -> Result<Loan> {
    // 1. 書籍の存在確認
    let book = find_book_by_isbn(deps, &cmd.isbn).await?;
    if book.is_none() {
        return Err(LibraryError::BookNotFound(cmd.isbn));
    }

    // 2. 会員の存在確認
    let member = find_member_by_id(deps, cmd.member_id)
        .await?
        .ok_or(LibraryError::MemberNotFound(cmd.member_id))?;

    // 3. 貸出上限確認
    let active_loans = count_active_loans(deps, cmd.member_id).await?;
    let limit = member.borrow_limit();
    if active_loans >= limit {
        tracing::debug!(
            member_id = cmd.member_id.value(),
            active_loans,
            limit,
            "Borrow limit reached"
        );
        return Err(LibraryError::BorrowLimitExceeded {
            member_id: cmd.member_id,
            limit,
        });
    }

    // 4. 貸出IDの採番と保存
    let loan_id = deps
        .loans
        .next_loan_id()
        .await
        .map_err(LibraryError::RepositoryError)?;

    let loan = Loan::new(loan_id, cmd.isbn, cmd.member_id, cmd.loan_date)?;

    deps.loans
        .save_loan(&loan)
        .await
        .map_err(LibraryError::RepositoryError)?;

    tracing::info!(
        loan_id = loan.loan_id().value(),
        isbn = %loan.book_isbn(),
        member_id = loan.member_id().value(),
        due_date = %loan.due_date(),
        "Loan created"
    );

    Ok(loan)
}

/// 書籍を返却し、延滞料金を返す
///
/// ビジネスルール：
/// - 貸出が存在すること
/// - プレミアム会員は会員の料金ルール、それ以外は1日1.00
/// - 会員が見つからなくても貸出は削除する
pub async fn return_book(deps: &ServiceDependencies, cmd: ReturnBook) -> Result<Money> {
    // 1. 貸出を取得
    let loan = find_loan_by_id(deps, cmd.loan_id)
        .await?
        .ok_or(LibraryError::LoanNotFound(cmd.loan_id))?;

    // 2. 延滞料金を計算
    let member = find_member_by_id(deps, loan.member_id()).await?;
    if member.is_none() {
        tracing::warn!(
            loan_id = loan.loan_id().value(),
            member_id = loan.member_id().value(),
            "Returning loan of unknown member"
        );
    }
    let days_late = loan.days_overdue(cmd.returned_on);
    let fee = late_fee_for(member.as_ref(), days_late);

    // 3. 貸出を削除
    deps.loans
        .delete_loan(loan.loan_id())
        .await
        .map_err(LibraryError::RepositoryError)?;

    tracing::info!(
        loan_id = loan.loan_id().value(),
        days_late,
        fee = %fee,
        "Book returned"
    );

    Ok(fee)
}
