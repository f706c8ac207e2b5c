use crate::domain::{Loan, LoanId};
use async_trait::async_trait;

pub type Result<T> = std::result::Result<T, Box<dyn std::error::Error + Send + Sync>>;

/// 貸出リポジトリポート
#[async_trait]
pub trait LoanRepository: Send + Sync {
    /// 貸出IDをキーに保存する（既存なら上書き）
    async fn save_loan(&self, loan: &Loan) -> Result<()>;

    /// 貸出IDで貸出を取得する
    async fn get_loan(&self, loan_id: LoanId) -> Result<Option<Loan>>;

    /// 全貸出を取得する
    ///
    /// 貸出上限の確認にも使われる（会員IDのインデックスは持たない）。
    async fn list_loans(&self) -> Result<Vec<Loan>>;

    /// 貸出を削除する
    ///
    /// 存在しなくてもエラーにしない。
    async fn delete_loan(&self, loan_id: LoanId) -> Result<()>;

    /// 次の貸出IDを払い出す
    ///
    /// 既存の最大ID + 1、空なら1。書き込みを伴わないため、
    /// 複数の書き手が同時に呼ぶと同じIDが返りうる。
    async fn next_loan_id(&self) -> Result<LoanId>;
}
