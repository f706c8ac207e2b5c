pub mod pool;
pub mod repository;

pub use pool::{DbConfig, DbError, connect};
pub use repository::Repository as SqliteRepository;
