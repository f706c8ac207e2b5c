use chrono::NaiveDate;

use super::{Isbn, LoanId, MemberId};

/// コマンド：書籍を貸し出す
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoanBook {
    pub isbn: Isbn,
    pub member_id: MemberId,
    pub loan_date: NaiveDate,
}

/// コマンド：書籍を返却する
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReturnBook {
    pub loan_id: LoanId,
    pub returned_on: NaiveDate,
}
