mod errors;
mod fees;
mod library_service;

pub use errors::{LibraryError, Result};
pub use fees::{DEFAULT_DAILY_LATE_FEE, default_late_fee, late_fee_for};
pub use library_service::{
    ServiceDependencies, add_book, add_member, create_loan, find_book_by_isbn, find_loan_by_id,
    find_member_by_id, list_books, list_loans, list_members, return_book,
};
