use crate::domain::{
    Book, BookRecord, Isbn, Loan, LoanId, LoanRecord, Member, MemberId, MemberRecord,
};
use crate::ports::book_repository::{self, BookRepository};
use crate::ports::loan_repository::{self, LoanRepository};
use crate::ports::member_repository::{self, MemberRepository};
use async_trait::async_trait;
use std::collections::{BTreeMap, HashMap};
use std::sync::{Mutex, MutexGuard};

/// In-memory implementation of the repository ports
///
/// Stores flat records (not entities) so that reads go through the same
/// discriminator-based reconstruction as the SQLite adapter.
/// Intended for tests and local demos.
#[derive(Default)]
pub struct Repository {
    books: Mutex<HashMap<String, BookRecord>>,
    members: Mutex<BTreeMap<i64, MemberRecord>>,
    loans: Mutex<BTreeMap<i64, LoanRecord>>,
}

type BoxError = Box<dyn std::error::Error + Send + Sync>;

fn lock<T>(mutex: &Mutex<T>) -> Result<MutexGuard<'_, T>, BoxError> {
    mutex
        .lock()
        .map_err(|e| format!("in-memory repository lock poisoned: {e}").into())
}

impl Repository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a raw member record as-is, bypassing entity validation
    ///
    /// Lets tests reproduce rows written with an unknown discriminator.
    #[cfg(test)]
    fn insert_member_record(&self, record: MemberRecord) -> Result<(), BoxError> {
        lock(&self.members)?.insert(record.member_id, record);
        Ok(())
    }

    /// Store a raw book record as-is
    #[cfg(test)]
    fn insert_book_record(&self, record: BookRecord) -> Result<(), BoxError> {
        lock(&self.books)?.insert(record.isbn.clone(), record);
        Ok(())
    }
}

#[async_trait]
impl BookRepository for Repository {
    async fn save_book(&self, book: &Book) -> book_repository::Result<()> {
        let record = book.to_record();
        lock(&self.books)?.insert(record.isbn.clone(), record);
        Ok(())
    }

    async fn get_book(&self, isbn: &Isbn) -> book_repository::Result<Option<Book>> {
        let record = lock(&self.books)?.get(isbn.as_str()).cloned();
        match record {
            Some(record) => Ok(Some(Book::from_record(record)?)),
            None => Ok(None),
        }
    }

    async fn list_books(&self) -> book_repository::Result<Vec<Book>> {
        let keys: Vec<String> = lock(&self.books)?.keys().cloned().collect();

        let mut books = Vec::with_capacity(keys.len());
        for key in keys {
            let isbn = Isbn::parse(key)?;
            if let Some(book) = self.get_book(&isbn).await? {
                books.push(book);
            }
        }
        Ok(books)
    }
}

#[async_trait]
impl MemberRepository for Repository {
    async fn save_member(&self, member: &Member) -> member_repository::Result<()> {
        let record = member.to_record();
        lock(&self.members)?.insert(record.member_id, record);
        Ok(())
    }

    /// Unknown discriminators are reported as absence, not as an error
    async fn get_member(&self, member_id: MemberId) -> member_repository::Result<Option<Member>> {
        let record = lock(&self.members)?.get(&member_id.value()).cloned();
        let Some(record) = record else {
            return Ok(None);
        };

        match Member::from_record(record) {
            Ok(member) => Ok(Some(member)),
            Err(e) => {
                tracing::warn!(member_id = member_id.value(), error = %e, "Skipping member row");
                Ok(None)
            }
        }
    }

    async fn list_members(&self) -> member_repository::Result<Vec<Member>> {
        let ids: Vec<i64> = lock(&self.members)?.keys().copied().collect();

        let mut members = Vec::with_capacity(ids.len());
        for id in ids {
            if let Some(member) = self.get_member(MemberId::new(id)).await? {
                members.push(member);
            }
        }
        Ok(members)
    }
}

#[async_trait]
impl LoanRepository for Repository {
    async fn save_loan(&self, loan: &Loan) -> loan_repository::Result<()> {
        let record = loan.to_record();
        lock(&self.loans)?.insert(record.loan_id, record);
        Ok(())
    }

    async fn get_loan(&self, loan_id: LoanId) -> loan_repository::Result<Option<Loan>> {
        let record = lock(&self.loans)?.get(&loan_id.value()).cloned();
        match record {
            Some(record) => Ok(Some(Loan::from_record(record)?)),
            None => Ok(None),
        }
    }

    async fn list_loans(&self) -> loan_repository::Result<Vec<Loan>> {
        let ids: Vec<i64> = lock(&self.loans)?.keys().copied().collect();

        let mut loans = Vec::with_capacity(ids.len());
        for id in ids {
            if let Some(loan) = self.get_loan(LoanId::new(id)).await? {
                loans.push(loan);
            }
        }
        Ok(loans)
    }

    async fn delete_loan(&self, loan_id: LoanId) -> loan_repository::Result<()> {
        lock(&self.loans)?.remove(&loan_id.value());
        Ok(())
    }

    async fn next_loan_id(&self) -> loan_repository::Result<LoanId> {
        let max = lock(&self.loans)?.keys().next_back().copied().unwrap_or(0);
        Ok(LoanId::new(max).next())
    }
}
