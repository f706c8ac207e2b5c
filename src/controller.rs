use crate::application::library::{self, Result, ServiceDependencies};
use crate::domain::{
    Book, Isbn, Loan, LoanId, Member, MemberId, Money,
    commands::{LoanBook, ReturnBook},
};
use chrono::NaiveDate;
use std::sync::Arc;

/// 今日の日付を返す関数
pub type Clock = Arc<dyn Fn() -> NaiveDate + Send + Sync>;

/// フロントエンドとユースケースの仲介
///
/// ユースケースへの委譲のみを行い、付け加えるのは「今日の日付」だけ。
#[derive(Clone)]
pub struct LibraryController {
    deps: ServiceDependencies,
    clock: Clock,
}

impl LibraryController {
    /// ローカル時刻の今日を使う
    pub fn new(deps: ServiceDependencies) -> Self {
        Self::with_clock(deps, Arc::new(|| chrono::Local::now().date_naive()))
    }

    pub fn with_clock(deps: ServiceDependencies, clock: Clock) -> Self {
        Self { deps, clock }
    }

    pub fn today(&self) -> NaiveDate {
        (self.clock)()
    }

    // ---------- 蔵書 ----------

    pub async fn add_book(&self, book: Book) -> Result<()> {
        library::add_book(&self.deps, book).await
    }

    pub async fn get_books(&self) -> Result<Vec<Book>> {
        library::list_books(&self.deps).await
    }

    pub async fn get_book(&self, isbn: &str) -> Result<Option<Book>> {
        let isbn = Isbn::parse(isbn)?;
        library::find_book_by_isbn(&self.deps, &isbn).await
    }

    // ---------- 会員 ----------

    pub async fn add_member(&self, member: Member) -> Result<()> {
        library::add_member(&self.deps, member).await
    }

    pub async fn get_members(&self) -> Result<Vec<Member>> {
        library::list_members(&self.deps).await
    }

    pub async fn get_member(&self, member_id: i64) -> Result<Option<Member>> {
        library::find_member_by_id(&self.deps, MemberId::new(member_id)).await
    }

    // ---------- 貸出 ----------

    pub async fn get_loans(&self) -> Result<Vec<Loan>> {
        library::list_loans(&self.deps).await
    }

    pub async fn get_loan(&self, loan_id: i64) -> Result<Option<Loan>> {
        library::find_loan_by_id(&self.deps, LoanId::new(loan_id)).await
    }

    /// 今日の日付で貸し出す
    ///
    /// # エラー
    /// - `Validation`: ISBNの形式が不正
    /// - `BookNotFound` / `MemberNotFound` / `BorrowLimitExceeded`
    pub async fn loan_book(&self, isbn: &str, member_id: i64) -> Result<Loan> {
        let cmd = LoanBook {
            isbn: Isbn::parse(isbn)?,
            member_id: MemberId::new(member_id),
            loan_date: self.today(),
        };
        library::create_loan(&self.deps, cmd).await
    }

    /// 今日の日付で返却し、延滞料金を返す
    pub async fn return_book(&self, loan_id: i64) -> Result<Money> {
        let cmd = ReturnBook {
            loan_id: LoanId::new(loan_id),
            returned_on: self.today(),
        };
        library::return_book(&self.deps, cmd).await
    }
}
