use crate::domain::{Member, MemberId};
use async_trait::async_trait;

pub type Result<T> = std::result::Result<T, Box<dyn std::error::Error + Send + Sync>>;

/// 会員リポジトリポート
#[async_trait]
pub trait MemberRepository: Send + Sync {
    /// 会員IDをキーに保存する（既存なら上書き）
    async fn save_member(&self, member: &Member) -> Result<()>;

    /// 会員IDで会員を取得する
    ///
    /// 存在しない場合、および判別子が未知の場合は`None`を返す。
    async fn get_member(&self, member_id: MemberId) -> Result<Option<Member>>;

    /// 全会員を取得する
    ///
    /// 各行は`get_member`で個別に復元され、復元できない行は含まれない。
    async fn list_members(&self) -> Result<Vec<Member>>;
}
