use serde::{Deserialize, Serialize};

use super::{MemberId, Money, ValidationError};

/// 一般会員の貸出上限
pub const REGULAR_BORROW_LIMIT: usize = 5;

/// プレミアム会員の貸出上限
pub const PREMIUM_BORROW_LIMIT: usize = 10;

/// プレミアム会員の猶予日数
pub const PREMIUM_GRACE_DAYS: i64 = 1;

/// プレミアム会員の1日あたり延滞料金（0.50）
pub const PREMIUM_DAILY_LATE_FEE: Money = Money::from_cents(50);

// ============================================================================
// 能力（capability）
// ============================================================================

/// 借り手としての能力
///
/// 貸出上限はすべての会員種別が持つ。延滞料金ルールは任意で、
/// 持たない種別にはサービス層の既定料金が適用される。
pub trait Borrower {
    /// 同時に借りられる冊数の上限
    fn borrow_limit(&self) -> usize;

    /// 種別固有の延滞料金ルール
    fn late_fee(&self, _days_late: i64) -> Option<Money> {
        None
    }
}

// ============================================================================
// 永続化レコード
// ============================================================================

/// 会員レコード
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemberRecord {
    pub member_id: i64,
    #[serde(rename = "type")]
    pub kind: String,
    pub name: String,
    pub email: String,
}

/// 会員種別（判別子）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MemberKind {
    Regular,
    Premium,
}

impl MemberKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            MemberKind::Regular => "RegularMember",
            MemberKind::Premium => "PremiumMember",
        }
    }
}

impl std::str::FromStr for MemberKind {
    type Err = ValidationError;

    /// 会員には基底種別がないため、未知の判別子はエラーとする
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "RegularMember" => Ok(MemberKind::Regular),
            "PremiumMember" => Ok(MemberKind::Premium),
            _ => Err(ValidationError::UnknownMemberType(s.to_string())),
        }
    }
}

// ============================================================================
// エンティティ
// ============================================================================

/// 全種別に共通する会員の属性
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemberCore {
    member_id: MemberId,
    pub name: String,
    pub email: String,
}

impl MemberCore {
    pub fn new(member_id: MemberId, name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            member_id,
            name: name.into(),
            email: email.into(),
        }
    }

    pub fn member_id(&self) -> MemberId {
        self.member_id
    }
}

/// 一般会員
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegularMember {
    pub core: MemberCore,
}

impl RegularMember {
    pub fn new(member_id: MemberId, name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            core: MemberCore::new(member_id, name, email),
        }
    }
}

impl std::ops::Deref for RegularMember {
    type Target = MemberCore;

    fn deref(&self) -> &Self::Target {
        &self.core
    }
}

impl Borrower for RegularMember {
    fn borrow_limit(&self) -> usize {
        REGULAR_BORROW_LIMIT
    }
}

/// プレミアム会員
///
/// 貸出上限が大きく、1日の猶予と割安な延滞料金が適用される。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PremiumMember {
    pub core: MemberCore,
}

impl PremiumMember {
    pub fn new(member_id: MemberId, name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            core: MemberCore::new(member_id, name, email),
        }
    }
}

impl std::ops::Deref for PremiumMember {
    type Target = MemberCore;

    fn deref(&self) -> &Self::Target {
        &self.core
    }
}

impl Borrower for PremiumMember {
    fn borrow_limit(&self) -> usize {
        PREMIUM_BORROW_LIMIT
    }

    /// max(0, 延滞日数 - 1) × 0.50
    fn late_fee(&self, days_late: i64) -> Option<Money> {
        let billable_days = (days_late - PREMIUM_GRACE_DAYS).max(0);
        Some(PREMIUM_DAILY_LATE_FEE * billable_days)
    }
}

/// 会員の統合型
///
/// シリアライズ形式は`MemberRecord`と同一。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "MemberRecord", into = "MemberRecord")]
pub enum Member {
    Regular(RegularMember),
    Premium(PremiumMember),
}

impl Member {
    pub fn core(&self) -> &MemberCore {
        match self {
            Member::Regular(member) => &member.core,
            Member::Premium(member) => &member.core,
        }
    }

    pub fn core_mut(&mut self) -> &mut MemberCore {
        match self {
            Member::Regular(member) => &mut member.core,
            Member::Premium(member) => &mut member.core,
        }
    }

    pub fn member_id(&self) -> MemberId {
        self.core().member_id()
    }

    pub fn name(&self) -> &str {
        &self.core().name
    }

    pub fn kind(&self) -> MemberKind {
        match self {
            Member::Regular(_) => MemberKind::Regular,
            Member::Premium(_) => MemberKind::Premium,
        }
    }

    pub fn to_record(&self) -> MemberRecord {
        let core = self.core();
        MemberRecord {
            member_id: core.member_id.value(),
            kind: self.kind().as_str().to_string(),
            name: core.name.clone(),
            email: core.email.clone(),
        }
    }

    /// # エラー
    /// 判別子が未知の場合は`UnknownMemberType`
    pub fn from_record(record: MemberRecord) -> Result<Self, ValidationError> {
        let core = MemberCore::new(MemberId::new(record.member_id), record.name, record.email);
        let member = match record.kind.parse::<MemberKind>()? {
            MemberKind::Regular => Member::Regular(RegularMember { core }),
            MemberKind::Premium => Member::Premium(PremiumMember { core }),
        };
        Ok(member)
    }
}

impl Borrower for Member {
    fn borrow_limit(&self) -> usize {
        match self {
            Member::Regular(member) => member.borrow_limit(),
            Member::Premium(member) => member.borrow_limit(),
        }
    }

    fn late_fee(&self, days_late: i64) -> Option<Money> {
        match self {
            Member::Regular(member) => member.late_fee(days_late),
            Member::Premium(member) => member.late_fee(days_late),
        }
    }
}

impl From<RegularMember> for Member {
    fn from(member: RegularMember) -> Self {
        Member::Regular(member)
    }
}

impl From<PremiumMember> for Member {
    fn from(member: PremiumMember) -> Self {
        Member::Premium(member)
    }
}

impl TryFrom<MemberRecord> for Member {
    type Error = ValidationError;

    fn try_from(record: MemberRecord) -> Result<Self, Self::Error> {
        Member::from_record(record)
    }
}

impl From<Member> for MemberRecord {
    fn from(member: Member) -> Self {
        member.to_record()
    }
}
