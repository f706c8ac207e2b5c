use serde::{Deserialize, Serialize};
use std::fmt;

use super::ValidationError;

/// ISBN - 蔵書の識別子
///
/// 不変条件：10桁または13桁の数字のみ（空白・ハイフン不可、チェックディジットは検証しない）。
/// 生成時にのみ検証し、以後は変更できない。
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Isbn(String);

impl Isbn {
    /// 文字列からISBNを生成する
    ///
    /// # エラー
    /// 10桁・13桁の数字列でない場合は`ValidationError::InvalidIsbn`を返す
    pub fn parse(value: impl Into<String>) -> Result<Self, ValidationError> {
        let value = value.into();
        let all_digits = value.bytes().all(|b| b.is_ascii_digit());
        if !all_digits || !matches!(value.len(), 10 | 13) {
            return Err(ValidationError::InvalidIsbn(value));
        }
        Ok(Self(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for Isbn {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}

impl From<Isbn> for String {
    fn from(isbn: Isbn) -> Self {
        isbn.0
    }
}

impl fmt::Display for Isbn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// 会員ID - 呼び出し側が採番する整数
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct MemberId(i64);

impl MemberId {
    pub fn new(value: i64) -> Self {
        Self(value)
    }

    pub fn value(&self) -> i64 {
        self.0
    }
}

impl fmt::Display for MemberId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// 貸出ID - リポジトリが採番する（既存の最大値 + 1）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct LoanId(i64);

impl LoanId {
    /// 最初に払い出されるID

    pub fn new(value: i64) -> Self {
        Self(value)
    }

    pub fn value(&self) -> i64 {
        self.0
    }

    /// 次のID
    pub fn next(&self) -> Self {
        Self(self.0 + 1)
    }
}

impl fmt::Display for LoanId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_isbn_accepts_ten_digits() {
        let isbn = Isbn::parse("1234567890");
        assert!(isbn.is_ok());
        assert_eq!(isbn.unwrap().as_str(), "1234567890");
    }

    #[test]
    fn test_isbn_accepts_thirteen_digits() {
        assert!(Isbn::parse("9781234567897").is_ok());
    }

    #[test]
    fn test_isbn_rejects_other_lengths() {
        for value in ["", "123456789", "12345678901", "123456789012", "12345678901234"] {
            assert_eq!(
                Isbn::parse(value),
                Err(ValidationError::InvalidIsbn(value.to_string())),
                "{value} should be rejected"
            );
        }
    }

    #[test]
    fn test_isbn_rejects_non_digits() {
        assert!(Isbn::parse("123456789X").is_err());
        assert!(Isbn::parse("978-1234567").is_err());
        assert!(Isbn::parse("12345 67890").is_err());
        assert!(Isbn::parse(" 1234567890").is_err());
        // 全角数字は不可
        assert!(Isbn::parse("１２３４５６７８９０").is_err());
    }

    #[test]
    fn test_isbn_deserialize_validates() {
        let ok: Result<Isbn, _> = serde_json::from_str("\"1234567890\"");
        assert!(ok.is_ok());

        let bad: Result<Isbn, _> = serde_json::from_str("\"12345\"");
        assert!(bad.is_err());
    }

    #[test]
    fn test_loan_id_next() {
        assert_eq!(LoanId::new(41).next(), LoanId::new(42));
    }

    #[test]
    fn test_member_id_serializes_as_number() {
        let json = serde_json::to_string(&MemberId::new(7)).unwrap();
        assert_eq!(json, "7");
    }
}
