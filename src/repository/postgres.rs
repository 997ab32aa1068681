//! Postgres book repository

use sqlx::{Pool, Postgres};

use crate::{
    error::{AppError, AppResult},
    models::Book,
};

use super::BookRepository;

#[derive(Clone)]
pub struct PgBookRepository {
    pool: Pool<Postgres>,
}

impl PgBookRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

/// Map unique-constraint violations on the isbn column to a Duplicate error
fn map_save_error(e: sqlx::Error, isbn: &str) -> AppError {
    match &e {
        sqlx::Error::Database(db)
            if matches!(db.kind(), sqlx::error::ErrorKind::UniqueViolation) =>
        {
            AppError::Duplicate(format!("A book with ISBN {} already exists", isbn))
        }
        _ => AppError::Database(e),
    }
}

#[async_trait::async_trait]
impl BookRepository for PgBookRepository {
    async fn save(&self, book: &Book) -> AppResult<Book> {
        match book.id {
            None => sqlx::query_as::<_, Book>(
                r#"
                INSERT INTO books (isbn, title, author, publication_year, total_copies, available_copies)
                VALUES ($1, $2, $3, $4, $5, $6)
                RETURNING *
                "#,
            )
            .bind(&book.isbn)
            .bind(&book.title)
            .bind(&book.author)
            .bind(book.publication_year)
            .bind(book.total_copies)
            .bind(book.available_copies)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| map_save_error(e, &book.isbn)),
            Some(id) => sqlx::query_as::<_, Book>(
                "UPDATE books SET available_copies = $1 WHERE id = $2 RETURNING *",
            )
            .bind(book.available_copies)
            .bind(id)
            .fetch_one(&self.pool)
            .await
            .map_err(AppError::Database),
        }
    }

    async fn find_by_isbn(&self, isbn: &str) -> AppResult<Option<Book>> {
        sqlx::query_as::<_, Book>("SELECT * FROM books WHERE isbn = $1")
            .bind(isbn)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn find_by_author(&self, author: &str) -> AppResult<Vec<Book>> {
        sqlx::query_as::<_, Book>("SELECT * FROM books WHERE author = $1 ORDER BY id")
            .bind(author)
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn delete(&self, book: &Book) -> AppResult<()> {
        sqlx::query("DELETE FROM books WHERE isbn = $1")
            .bind(&book.isbn)
            .execute(&self.pool)
            .await
            .map_err(AppError::Database)?;
        Ok(())
    }
}
