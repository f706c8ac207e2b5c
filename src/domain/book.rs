use serde::{Deserialize, Serialize};

use super::{Isbn, ValidationError};

// ============================================================================
// 永続化レコード
// ============================================================================

/// 蔵書レコード（フラットな行表現）
///
/// `type`が判別子。種別に該当しないフィールドはNone。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookRecord {
    pub isbn: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub title: String,
    pub author: String,
    pub price: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight_kg: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shelf_location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_format: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub download_link: Option<String>,
}

/// 蔵書の種別（判別子）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BookKind {
    Standard,
    Physical,
    Ebook,
}

impl BookKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            BookKind::Standard => "Book",
            BookKind::Physical => "PhysicalBook",
            BookKind::Ebook => "Ebook",
        }
    }

    /// 判別子から種別を決める
    ///
    /// 未知の判別子は基底の`Book`として扱う（会員と異なりフォールバックあり）。
    pub fn from_discriminator(value: &str) -> Self {
        match value {
            "PhysicalBook" => BookKind::Physical,
            "Ebook" => BookKind::Ebook,
            _ => BookKind::Standard,
        }
    }
}

// ============================================================================
// エンティティ
// ============================================================================

/// 全種別に共通する蔵書の属性
///
/// ISBNは生成後に変更できない。タイトル・著者・価格は変更可能（再検証なし）。
#[derive(Debug, Clone, PartialEq)]
pub struct BookCore {
    isbn: Isbn,
    pub title: String,
    pub author: String,
    pub price: f64,
}

impl BookCore {
    /// # エラー
    /// - `InvalidIsbn`: ISBNの形式が不正
    /// - `NegativePrice`: 価格が負
    pub fn new(
        isbn: &str,
        title: impl Into<String>,
        author: impl Into<String>,
        price: f64,
    ) -> Result<Self, ValidationError> {
        let isbn = Isbn::parse(isbn)?;
        if price < 0.0 {
            return Err(ValidationError::NegativePrice(price));
        }
        Ok(Self {
            isbn,
            title: title.into(),
            author: author.into(),
            price,
        })
    }

    pub fn isbn(&self) -> &Isbn {
        &self.isbn
    }
}

/// 紙の書籍
#[derive(Debug, Clone, PartialEq)]
pub struct PhysicalBook {
    pub core: BookCore,
    pub weight_kg: f64,
    pub shelf_location: String,
}

impl PhysicalBook {
    pub fn new(
        isbn: &str,
        title: impl Into<String>,
        author: impl Into<String>,
        price: f64,
        weight_kg: f64,
        shelf_location: impl Into<String>,
    ) -> Result<Self, ValidationError> {
        Ok(Self {
            core: BookCore::new(isbn, title, author, price)?,
            weight_kg,
            shelf_location: shelf_location.into(),
        })
    }
}

impl std::ops::Deref for PhysicalBook {
    type Target = BookCore;

    fn deref(&self) -> &Self::Target {
        &self.core
    }
}

impl std::ops::DerefMut for PhysicalBook {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.core
    }
}

/// 電子書籍
#[derive(Debug, Clone, PartialEq)]
pub struct Ebook {
    pub core: BookCore,
    pub file_format: String,
    pub download_link: String,
}

impl Ebook {
    pub fn new(
        isbn: &str,
        title: impl Into<String>,
        author: impl Into<String>,
        price: f64,
        file_format: impl Into<String>,
        download_link: impl Into<String>,
    ) -> Result<Self, ValidationError> {
        Ok(Self {
            core: BookCore::new(isbn, title, author, price)?,
            file_format: file_format.into(),
            download_link: download_link.into(),
        })
    }
}

impl std::ops::Deref for Ebook {
    type Target = BookCore;

    fn deref(&self) -> &Self::Target {
        &self.core
    }
}

impl std::ops::DerefMut for Ebook {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.core
    }
}

/// 蔵書の統合型
///
/// 判別子`type`でタグ付けされた和型。各バリアントは自分に該当するフィールドだけを持つ。
/// シリアライズ形式は`BookRecord`と同一。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "BookRecord", into = "BookRecord")]
pub enum Book {
    Standard(BookCore),
    Physical(PhysicalBook),
    Ebook(Ebook),
}

impl Book {
    pub fn core(&self) -> &BookCore {
        match self {
            Book::Standard(core) => core,
            Book::Physical(book) => &book.core,
            Book::Ebook(book) => &book.core,
        }
    }

    pub fn core_mut(&mut self) -> &mut BookCore {
        match self {
            Book::Standard(core) => core,
            Book::Physical(book) => &mut book.core,
            Book::Ebook(book) => &mut book.core,
        }
    }

    pub fn isbn(&self) -> &Isbn {
        self.core().isbn()
    }

    pub fn title(&self) -> &str {
        &self.core().title
    }

    pub fn kind(&self) -> BookKind {
        match self {
            Book::Standard(_) => BookKind::Standard,
            Book::Physical(_) => BookKind::Physical,
            Book::Ebook(_) => BookKind::Ebook,
        }
    }

    /// 永続化用のレコードに変換する
    pub fn to_record(&self) -> BookRecord {
        let core = self.core();
        let mut record = BookRecord {
            isbn: core.isbn.to_string(),
            kind: self.kind().as_str().to_string(),
            title: core.title.clone(),
            author: core.author.clone(),
            price: core.price,
            weight_kg: None,
            shelf_location: None,
            file_format: None,
            download_link: None,
        };
        match self {
            Book::Standard(_) => {}
            Book::Physical(book) => {
                record.weight_kg = Some(book.weight_kg);
                record.shelf_location = Some(book.shelf_location.clone());
            }
            Book::Ebook(book) => {
                record.file_format = Some(book.file_format.clone());
                record.download_link = Some(book.download_link.clone());
            }
        }
        record
    }

    /// レコードから判別子に応じた種別の蔵書を復元する
    ///
    /// # エラー
    /// - ISBN・価格の検証エラー
    /// - `MissingField`: 種別に必要なフィールドがない
    pub fn from_record(record: BookRecord) -> Result<Self, ValidationError> {
        let core = BookCore::new(&record.isbn, record.title, record.author, record.price)?;
        let book = match BookKind::from_discriminator(&record.kind) {
            BookKind::Standard => Book::Standard(core),
            BookKind::Physical => Book::Physical(PhysicalBook {
                core,
                weight_kg: required(record.weight_kg, "PhysicalBook", "weight_kg")?,
                shelf_location: required(record.shelf_location, "PhysicalBook", "shelf_location")?,
            }),
            BookKind::Ebook => Book::Ebook(Ebook {
                core,
                file_format: required(record.file_format, "Ebook", "file_format")?,
                download_link: required(record.download_link, "Ebook", "download_link")?,
            }),
        };
        Ok(book)
    }
}

fn required<T>(value: Option<T>, kind: &'static str, field: &'static str) -> Result<T, ValidationError> {
    value.ok_or(ValidationError::MissingField { kind, field })
}

impl From<BookCore> for Book {
    fn from(core: BookCore) -> Self {
        Book::Standard(core)
    }
}

impl From<PhysicalBook> for Book {
    fn from(book: PhysicalBook) -> Self {
        Book::Physical(book)
    }
}

impl From<Ebook> for Book {
    fn from(book: Ebook) -> Self {
        Book::Ebook(book)
    }
}

impl TryFrom<BookRecord> for Book {
    type Error = ValidationError;

    fn try_from(record: BookRecord) -> Result<Self, Self::Error> {
        Book::from_record(record)
    }
}

impl From<Book> for BookRecord {
    fn from(book: Book) -> Self {
        book.to_record()
    }
}
