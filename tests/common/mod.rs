#![allow(dead_code)]

use chrono::NaiveDate;
use library_lending::adapters::memory::InMemoryRepository;
use library_lending::adapters::sqlite::{DbConfig, connect};
use library_lending::application::library::ServiceDependencies;
use library_lending::domain::*;
use sqlx::SqlitePool;
use std::sync::Arc;

/// テスト用のインメモリSQLiteプールを作成し、マイグレーションを実行
///
/// 本番と同じマイグレーションを使用する。テストごとに独立したデータベースになる。
pub async fn create_test_pool() -> SqlitePool {
    connect(&DbConfig::in_memory())
        .await
        .expect("Failed to open test database")
}

/// インメモリリポジトリを使ったサービス依存関係
pub fn in_memory_deps() -> (Arc<InMemoryRepository>, ServiceDependencies) {
    let repository = Arc::new(InMemoryRepository::new());
    let deps = ServiceDependencies::from_repository(repository.clone());
    (repository, deps)
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
}

pub fn isbn(value: &str) -> Isbn {
    Isbn::parse(value).expect("valid isbn")
}

/// n番目のテスト用ISBN（10桁）
pub fn nth_isbn(n: u32) -> Isbn {
    isbn(&format!("{:010}", 1_000_000_000u64 + n as u64))
}

pub fn physical_book(isbn: &str) -> Book {
    PhysicalBook::new(isbn, "Dune", "Frank Herbert", 20.0, 0.5, "A1")
        .expect("valid book")
        .into()
}

pub fn ebook(isbn: &str) -> Book {
    Ebook::new(
        isbn,
        "The Rust Programming Language",
        "Steve Klabnik",
        39.95,
        "epub",
        "https://example.org/trpl.epub",
    )
    .expect("valid book")
    .into()
}

pub fn regular_member(id: i64) -> Member {
    RegularMember::new(MemberId::new(id), "Bob", "bob@example.org").into()
}

pub fn premium_member(id: i64) -> Member {
    PremiumMember::new(MemberId::new(id), "Ada", "ada@example.org").into()
}
