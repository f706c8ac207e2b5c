use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};

use super::{Isbn, LoanId, MemberId, ValidationError};

/// 貸出期間（日数）
pub const LOAN_PERIOD_DAYS: u64 = 14;

/// 貸出レコード（日付はISO-8601）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoanRecord {
    pub loan_id: i64,
    pub book_isbn: String,
    pub member_id: i64,
    pub loan_date: NaiveDate,
    pub due_date: NaiveDate,
}

/// 貸出 - 1冊の書籍を1人の会員に14日間貸し出した記録
///
/// 不変条件：due_date は常に loan_date + 14日。
/// 日付を更新する操作はない。延滞は状態として保持せず、参照時の日付から計算する。
///
/// 書籍・会員への参照はIDのみ（所有しない）。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "LoanRecord", into = "LoanRecord")]
pub struct Loan {
    loan_id: LoanId,
    book_isbn: Isbn,
    member_id: MemberId,
    loan_date: NaiveDate,
    due_date: NaiveDate,
}

/// 貸出日から返却期限を求める（暦の範囲を超える場合はNone）
fn due_date_for(loan_date: NaiveDate) -> Option<NaiveDate> {
    loan_date.checked_add_days(Days::new(LOAN_PERIOD_DAYS))
}

impl Loan {
    /// # エラー
    /// 返却期限が表現可能な日付の範囲を超える場合は`LoanDateOutOfRange`
    pub fn new(
        loan_id: LoanId,
        book_isbn: Isbn,
        member_id: MemberId,
        loan_date: NaiveDate,
    ) -> Result<Self, ValidationError> {
        let due_date =
            due_date_for(loan_date).ok_or(ValidationError::LoanDateOutOfRange(loan_date))?;
        Ok(Self {
            loan_id,
            book_isbn,
            member_id,
            loan_date,
            due_date,
        })
    }

    pub fn loan_id(&self) -> LoanId {
        self.loan_id
    }

    pub fn book_isbn(&self) -> &Isbn {
        &self.book_isbn
    }

    pub fn member_id(&self) -> MemberId {
        self.member_id
    }

    pub fn loan_date(&self) -> NaiveDate {
        self.loan_date
    }

    pub fn due_date(&self) -> NaiveDate {
        self.due_date
    }

    /// today が返却期限を過ぎているか
    pub fn is_overdue(&self, today: NaiveDate) -> bool {
        today > self.due_date
    }

    /// 延滞日数（延滞していなければ0）
    pub fn days_overdue(&self, today: NaiveDate) -> i64 {
        if !self.is_overdue(today) {
            return 0;
        }
        (today - self.due_date).num_days()
    }

    pub fn to_record(&self) -> LoanRecord {
        LoanRecord {
            loan_id: self.loan_id.value(),
            book_isbn: self.book_isbn.to_string(),
            member_id: self.member_id.value(),
            loan_date: self.loan_date,
            due_date: self.due_date,
        }
    }

    /// レコードから復元する
    ///
    /// 返却期限は loan_date から再計算する（保存された due_date は参照しない）。
    pub fn from_record(record: LoanRecord) -> Result<Self, ValidationError> {
        Self::new(
            LoanId::new(record.loan_id),
            Isbn::parse(record.book_isbn)?,
            MemberId::new(record.member_id),
            record.loan_date,
        )
    }
}

impl TryFrom<LoanRecord> for Loan {
    type Error = ValidationError;

    fn try_from(record: LoanRecord) -> Result<Self, Self::Error> {
        Loan::from_record(record)
    }
}

impl From<Loan> for LoanRecord {
    fn from(loan: Loan) -> Self {
        loan.to_record()
    }
}
