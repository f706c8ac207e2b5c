pub mod book_repository;
pub mod loan_repository;
pub mod member_repository;

pub use book_repository::BookRepository;
pub use loan_repository::LoanRepository;
pub use member_repository::MemberRepository;

/// 3つのリポジトリポートをまとめて実装する型
///
/// ストレージ接続を単独で所有する1つのリポジトリ実装を想定している。
pub trait LibraryRepository: BookRepository + MemberRepository + LoanRepository {}

impl<T> LibraryRepository for T where T: BookRepository + MemberRepository + LoanRepository {}
