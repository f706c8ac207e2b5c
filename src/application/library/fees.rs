use crate::domain::{Borrower, Member, Money};

/// 既定の1日あたり延滞料金（1.00、猶予なし）
pub const DEFAULT_DAILY_LATE_FEE: Money = Money::from_cents(100);

/// 既定の延滞料金
///
/// 種別固有の料金ルールを持たない会員に適用する。
pub fn default_late_fee(days_late: i64) -> Money {
    DEFAULT_DAILY_LATE_FEE * days_late.max(0)
}

/// 返却時の延滞料金を決める
///
/// 会員が料金ルールを持っていればそれを使い、なければ既定料金。
/// 会員が見つからない（削除済み）場合も既定料金。
pub fn late_fee_for(member: Option<&Member>, days_late: i64) -> Money {
    member
        .and_then(|m| m.late_fee(days_late))
        .unwrap_or_else(|| default_late_fee(days_late))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{MemberId, PremiumMember, RegularMember};

    #[test]
    fn test_default_fee_has_no_grace_day() {
        assert_eq!(default_late_fee(0), Money::ZERO);
        assert_eq!(default_late_fee(1), Money::from_cents(100));
        assert_eq!(default_late_fee(3), Money::from_cents(300));
    }

    #[test]
    fn test_regular_member_uses_default_fee() {
        let member = Member::from(RegularMember::new(MemberId::new(1), "Bob", "b@x"));
        assert_eq!(late_fee_for(Some(&member), 0), Money::ZERO);
        assert_eq!(late_fee_for(Some(&member), 3), Money::from_cents(300));
    }

    #[test]
    fn test_premium_member_uses_own_rule() {
        let member = Member::from(PremiumMember::new(MemberId::new(2), "Ada", "a@x"));
        assert_eq!(late_fee_for(Some(&member), 1), Money::ZERO);
        assert_eq!(late_fee_for(Some(&member), 3), Money::from_cents(100));
    }

    #[test]
    fn test_missing_member_uses_default_fee() {
        assert_eq!(late_fee_for(None, 2), Money::from_cents(200));
    }
}
