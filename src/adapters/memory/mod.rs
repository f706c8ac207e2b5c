pub mod repository;

pub use repository::Repository as InMemoryRepository;
