use crate::domain::{
    Book, BookRecord, Isbn, Loan, LoanId, LoanRecord, Member, MemberId, MemberRecord,
};
use crate::ports::book_repository::{self, BookRepository};
use crate::ports::loan_repository::{self, LoanRepository};
use crate::ports::member_repository::{self, MemberRepository};
use async_trait::async_trait;
use sqlx::{Row, SqlitePool, sqlite::SqliteRow};
use tracing::{debug, warn};

fn map_row_to_book_record(row: &SqliteRow) -> Result<BookRecord, sqlx::Error> {
    Ok(BookRecord {
        isbn: row.try_get("isbn")?,
        kind: row.try_get("type")?,
        title: row.try_get("title")?,
        author: row.try_get("author")?,
        price: row.try_get("price")?,
        weight_kg: row.try_get("weight_kg")?,
        shelf_location: row.try_get("shelf_location")?,
        file_format: row.try_get("file_format")?,
        download_link: row.try_get("download_link")?,
    })
}

fn map_row_to_member_record(row: &SqliteRow) -> Result<MemberRecord, sqlx::Error> {
    Ok(MemberRecord {
        member_id: row.try_get("member_id")?,
        kind: row.try_get("type")?,
        name: row.try_get("name")?,
        email: row.try_get("email")?,
    })
}

fn map_row_to_loan_record(row: &SqliteRow) -> Result<LoanRecord, sqlx::Error> {
    Ok(LoanRecord {
        loan_id: row.try_get("loan_id")?,
        book_isbn: row.try_get("book_isbn")?,
        member_id: row.try_get("member_id")?,
        loan_date: row.try_get("loan_date")?,
        due_date: row.try_get("due_date")?,
    })
}

/// SQLite implementation of the repository ports
///
/// Exclusively owns the connection pool for its lifetime.
/// Every write is a single auto-committed statement, so it is durable
/// by the time the call returns.
pub struct Repository {
    pool: SqlitePool,
}

impl Repository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

#[async_trait]
impl BookRepository for Repository {
    /// Upsert keyed by ISBN
    async fn save_book(&self, book: &Book) -> book_repository::Result<()> {
        let record = book.to_record();
        debug!(isbn = %record.isbn, kind = %record.kind, "Saving book");

        sqlx::query(
            r#"
            INSERT INTO books (
                isbn,
                type,
                title,
                author,
                price,
                weight_kg,
                shelf_location,
                file_format,
                download_link
            )
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
            ON CONFLICT (isbn)
            DO UPDATE SET
                type = excluded.type,
                title = excluded.title,
                author = excluded.author,
                price = excluded.price,
                weight_kg = excluded.weight_kg,
                shelf_location = excluded.shelf_location,
                file_format = excluded.file_format,
                download_link = excluded.download_link
            "#,
        )
        .bind(&record.isbn)
        .bind(&record.kind)
        .bind(&record.title)
        .bind(&record.author)
        .bind(record.price)
        .bind(record.weight_kg)
        .bind(&record.shelf_location)
        .bind(&record.file_format)
        .bind(&record.download_link)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Rebuild the concrete book variant from the `type` column
    async fn get_book(&self, isbn: &Isbn) -> book_repository::Result<Option<Book>> {
        let row = sqlx::query(
            r#"
            SELECT
                isbn,
                type,
                title,
                author,
                price,
                weight_kg,
                shelf_location,
                file_format,
                download_link
            FROM books
            WHERE isbn = ?
            "#,
        )
        .bind(isbn.as_str())
        .fetch_optional(&self.pool)
        .await?;

        let Some(row) = row else {
            return Ok(None);
        };

        let record = map_row_to_book_record(&row)?;
        Ok(Some(Book::from_record(record)?))
    }

    async fn list_books(&self) -> book_repository::Result<Vec<Book>> {
        let keys: Vec<String> = sqlx::query_scalar("SELECT isbn FROM books")
            .fetch_all(&self.pool)
            .await?;

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
    /// Upsert keyed by member_id
    async fn save_member(&self, member: &Member) -> member_repository::Result<()> {
        let record = member.to_record();
        debug!(member_id = record.member_id, kind = %record.kind, "Saving member");

        sqlx::query(
            r#"
            INSERT INTO members (member_id, type, name, email)
            VALUES (?, ?, ?, ?)
            ON CONFLICT (member_id)
            DO UPDATE SET
                type = excluded.type,
                name = excluded.name,
                email = excluded.email
            "#,
        )
        .bind(record.member_id)
        .bind(&record.kind)
        .bind(&record.name)
        .bind(&record.email)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Members have no base variant: an unknown `type` yields `None`
    async fn get_member(&self, member_id: MemberId) -> member_repository::Result<Option<Member>> {
        let row = sqlx::query(
            r#"
            SELECT member_id, type, name, email
            FROM members
            WHERE member_id = ?
            "#,
        )
        .bind(member_id.value())
        .fetch_optional(&self.pool)
        .await?;

        let Some(row) = row else {
            return Ok(None);
        };

        let record = map_row_to_member_record(&row)?;
        match Member::from_record(record) {
            Ok(member) => Ok(Some(member)),
            Err(e) => {
                warn!(member_id = member_id.value(), error = %e, "Skipping member row");
                Ok(None)
            }
        }
    }

    async fn list_members(&self) -> member_repository::Result<Vec<Member>> {
        let ids: Vec<i64> = sqlx::query_scalar("SELECT member_id FROM members")
            .fetch_all(&self.pool)
            .await?;

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
    /// Upsert keyed by loan_id
    async fn save_loan(&self, loan: &Loan) -> loan_repository::Result<()> {
        let record = loan.to_record();
        debug!(loan_id = record.loan_id, isbn = %record.book_isbn, "Saving loan");

        sqlx::query(
            r#"
            INSERT INTO loans (loan_id, book_isbn, member_id, loan_date, due_date)
            VALUES (?, ?, ?, ?, ?)
            ON CONFLICT (loan_id)
            DO UPDATE SET
                book_isbn = excluded.book_isbn,
                member_id = excluded.member_id,
                loan_date = excluded.loan_date,
                due_date = excluded.due_date
            "#,
        )
        .bind(record.loan_id)
        .bind(&record.book_isbn)
        .bind(record.member_id)
        .bind(record.loan_date)
        .bind(record.due_date)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn get_loan(&self, loan_id: LoanId) -> loan_repository::Result<Option<Loan>> {
        let row = sqlx::query(
            r#"
            SELECT loan_id, book_isbn, member_id, loan_date, due_date
            FROM loans
            WHERE loan_id = ?
            "#,
        )
        .bind(loan_id.value())
        .fetch_optional(&self.pool)
        .await?;

        let Some(row) = row else {
            return Ok(None);
        };

        let record = map_row_to_loan_record(&row)?;
        Ok(Some(Loan::from_record(record)?))
    }

    async fn list_loans(&self) -> loan_repository::Result<Vec<Loan>> {
        let ids: Vec<i64> = sqlx::query_scalar("SELECT loan_id FROM loans")
            .fetch_all(&self.pool)
            .await?;

        let mut loans = Vec::with_capacity(ids.len());
        for id in ids {
            if let Some(loan) = self.get_loan(LoanId::new(id)).await? {
                loans.push(loan);
            }
        }
        Ok(loans)
    }

    async fn delete_loan(&self, loan_id: LoanId) -> loan_repository::Result<()> {
        debug!(loan_id = loan_id.value(), "Deleting loan");

        sqlx::query("DELETE FROM loans WHERE loan_id = ?")
            .bind(loan_id.value())
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    async fn next_loan_id(&self) -> loan_repository::Result<LoanId> {
        let max: i64 = sqlx::query_scalar("SELECT COALESCE(MAX(loan_id), 0) FROM loans")
            .fetch_one(&self.pool)
            .await?;

        Ok(LoanId::new(max).next())
    }
}
