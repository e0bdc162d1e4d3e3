//! PostgreSQL backend

use async_trait::async_trait;
use sqlx::{FromRow, PgConnection, Pool, Postgres, Row};
use uuid::Uuid;

use super::{book_not_found, borrow_not_found, LibraryStore, Replaced};
use crate::{
    error::{AppError, AppResult},
    models::{Book, BorrowRecord},
    services::policy::{BorrowLimitPolicy, QuantityDelta},
};

const BOOK_COLUMNS: &str = "id, title, category, quantity, author, image, description, rating";
const BORROW_COLUMNS: &str = "id, book_id, borrower_email, borrower_name, borrowed_at, return_date";

#[derive(Clone)]
pub struct PgStore {
    pool: Pool<Postgres>,
}

impl PgStore {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Serialize borrow-limit checks for one borrower until the transaction ends
    async fn lock_borrower(conn: &mut PgConnection, borrower_email: &str) -> AppResult<()> {
        sqlx::query("SELECT pg_advisory_xact_lock(hashtext($1))")
            .bind(borrower_email)
            .execute(conn)
            .await?;
        Ok(())
    }

    async fn count_borrows(conn: &mut PgConnection, borrower_email: &str) -> AppResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM borrows WHERE borrower_email = $1")
            .bind(borrower_email)
            .fetch_one(conn)
            .await?;
        Ok(count)
    }

    async fn write_borrow(conn: &mut PgConnection, record: &BorrowRecord) -> AppResult<BorrowRecord> {
        let record = sqlx::query_as::<_, BorrowRecord>(&format!(
            r#"
            INSERT INTO borrows (id, book_id, borrower_email, borrower_name, borrowed_at, return_date)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING {BORROW_COLUMNS}
            "#
        ))
        .bind(record.id)
        .bind(record.book_id)
        .bind(&record.borrower_email)
        .bind(&record.borrower_name)
        .bind(record.borrowed_at)
        .bind(record.return_date)
        .fetch_one(conn)
        .await?;
        Ok(record)
    }

    async fn shift_quantity(conn: &mut PgConnection, id: Uuid, delta: QuantityDelta) -> AppResult<Book> {
        sqlx::query_as::<_, Book>(&format!(
            "UPDATE books SET quantity = quantity + $1 WHERE id = $2 RETURNING {BOOK_COLUMNS}"
        ))
        .bind(delta.value())
        .bind(id)
        .fetch_optional(conn)
        .await?
        .ok_or_else(|| book_not_found(id))
    }
}

#[async_trait]
impl LibraryStore for PgStore {
    async fn list_books(&self, category: Option<&str>) -> AppResult<Vec<Book>> {
        let books = match category {
            Some(category) => {
                sqlx::query_as::<_, Book>(&format!(
                    "SELECT {BOOK_COLUMNS} FROM books WHERE LOWER(category) = LOWER($1) ORDER BY created_at"
                ))
                .bind(category)
                .fetch_all(&self.pool)
                .await?
            }
            None => {
                sqlx::query_as::<_, Book>(&format!(
                    "SELECT {BOOK_COLUMNS} FROM books ORDER BY created_at"
                ))
                .fetch_all(&self.pool)
                .await?
            }
        };
        Ok(books)
    }

    async fn get_book(&self, id: Uuid) -> AppResult<Book> {
        sqlx::query_as::<_, Book>(&format!("SELECT {BOOK_COLUMNS} FROM books WHERE id = $1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| book_not_found(id))
    }

    async fn insert_book(&self, book: Book) -> AppResult<Book> {
        let book = sqlx::query_as::<_, Book>(&format!(
            r#"
            INSERT INTO books (id, title, category, quantity, author, image, description, rating)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING {BOOK_COLUMNS}
            "#
        ))
        .bind(book.id)
        .bind(&book.title)
        .bind(&book.category)
        .bind(book.quantity)
        .bind(&book.author)
        .bind(&book.image)
        .bind(&book.description)
        .bind(book.rating)
        .fetch_one(&self.pool)
        .await?;
        Ok(book)
    }

    async fn replace_book(&self, book: Book) -> AppResult<Replaced> {
        // xmax is zero only for a freshly inserted row version
        let row = sqlx::query(&format!(
            r#"
            INSERT INTO books (id, title, category, quantity, author, image, description, rating)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            ON CONFLICT (id) DO UPDATE SET
                title = EXCLUDED.title,
                category = EXCLUDED.category,
                quantity = EXCLUDED.quantity,
                author = EXCLUDED.author,
                image = EXCLUDED.image,
                description = EXCLUDED.description,
                rating = EXCLUDED.rating
            RETURNING {BOOK_COLUMNS}, (xmax = 0) AS inserted
            "#
        ))
        .bind(book.id)
        .bind(&book.title)
        .bind(&book.category)
        .bind(book.quantity)
        .bind(&book.author)
        .bind(&book.image)
        .bind(&book.description)
        .bind(book.rating)
        .fetch_one(&self.pool)
        .await?;

        Ok(Replaced {
            book: Book::from_row(&row)?,
            created: row.try_get("inserted")?,
        })
    }

    async fn adjust_quantity(&self, id: Uuid, delta: QuantityDelta) -> AppResult<Book> {
        let mut conn = self.pool.acquire().await?;
        Self::shift_quantity(&mut conn, id, delta).await
    }

    async fn list_borrows(&self, borrower_email: &str) -> AppResult<Vec<BorrowRecord>> {
        let records = sqlx::query_as::<_, BorrowRecord>(&format!(
            "SELECT {BORROW_COLUMNS} FROM borrows WHERE borrower_email = $1 ORDER BY borrowed_at"
        ))
        .bind(borrower_email)
        .fetch_all(&self.pool)
        .await?;
        Ok(records)
    }

    async fn get_borrow(&self, id: Uuid) -> AppResult<BorrowRecord> {
        sqlx::query_as::<_, BorrowRecord>(&format!(
            "SELECT {BORROW_COLUMNS} FROM borrows WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| borrow_not_found(id))
    }

    async fn insert_borrow(
        &self,
        record: BorrowRecord,
        policy: &BorrowLimitPolicy,
    ) -> AppResult<BorrowRecord> {
        let mut tx = self.pool.begin().await?;

        Self::lock_borrower(&mut tx, &record.borrower_email).await?;
        let active = Self::count_borrows(&mut tx, &record.borrower_email).await?;
        policy.admit(active)?;
        let record = Self::write_borrow(&mut tx, &record).await?;

        tx.commit().await?;
        Ok(record)
    }

    async fn delete_borrow(&self, id: Uuid) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM borrows WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(borrow_not_found(id));
        }
        Ok(())
    }

    async fn checkout(
        &self,
        record: BorrowRecord,
        policy: &BorrowLimitPolicy,
    ) -> AppResult<(BorrowRecord, Book)> {
        let mut tx = self.pool.begin().await?;

        Self::lock_borrower(&mut tx, &record.borrower_email).await?;
        let active = Self::count_borrows(&mut tx, &record.borrower_email).await?;
        policy.admit(active)?;
        let record = Self::write_borrow(&mut tx, &record).await?;
        let book = Self::shift_quantity(&mut tx, record.book_id, QuantityDelta::Borrow).await?;

        tx.commit().await?;
        Ok((record, book))
    }

    async fn checkin(&self, id: Uuid) -> AppResult<(BorrowRecord, Book)> {
        let mut tx = self.pool.begin().await?;

        let record = sqlx::query_as::<_, BorrowRecord>(&format!(
            "DELETE FROM borrows WHERE id = $1 RETURNING {BORROW_COLUMNS}"
        ))
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| borrow_not_found(id))?;
        let book = Self::shift_quantity(&mut tx, record.book_id, QuantityDelta::Return).await?;

        tx.commit().await?;
        Ok((record, book))
    }

    async fn health_check(&self) -> AppResult<()> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::StoreUnavailable(e.to_string()))?;
        Ok(())
    }

    fn backend_name(&self) -> &'static str {
        "postgres"
    }
}
