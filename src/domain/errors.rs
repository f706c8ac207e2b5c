use thiserror::Error;

/// エンティティ生成時の検証エラー
///
/// 検証は生成時（およびレコードからの復元時）にのみ行う。
/// 生成後のタイトル・価格などの変更は再検証しない。
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    /// ISBNが10桁・13桁の数字列でない
    #[error("Invalid ISBN: {0}")]
    InvalidIsbn(String),

    /// 価格が負
    #[error("Price must not be negative: {0}")]
    NegativePrice(f64),

    /// 判別子に対応する会員種別がない
    #[error("Unknown member type: {0}")]
    UnknownMemberType(String),

    /// 貸出日から返却期限が計算できない（暦の範囲外）
    #[error("Loan date out of range: {0}")]
    LoanDateOutOfRange(chrono::NaiveDate),

    /// 判別子が要求するフィールドがレコードにない
    #[error("{kind} record is missing field '{field}'")]
    MissingField {
        kind: &'static str,
        field: &'static str,
    },
}
