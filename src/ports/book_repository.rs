use crate::domain::{Book, Isbn};
use async_trait::async_trait;

pub type Result<T> = std::result::Result<T, Box<dyn std::error::Error + Send + Sync>>;

/// 蔵書リポジトリポート
///
/// 判別子に応じた種別（Book / PhysicalBook / Ebook）への復元はリポジトリの責務。
#[async_trait]
pub trait BookRepository: Send + Sync {
    /// ISBNをキーに保存する（既存なら上書き）
    ///
    /// 戻る時点で書き込みは確定している。
    async fn save_book(&self, book: &Book) -> Result<()>;

    /// ISBNで蔵書を取得する
    ///
    /// 存在しない場合はエラーではなく`None`を返す。
    async fn get_book(&self, isbn: &Isbn) -> Result<Option<Book>>;

    /// 全蔵書を取得する
    ///
    /// 各行は`get_book`で個別に復元される。順序は保証しない。
    async fn list_books(&self) -> Result<Vec<Book>>;
}
