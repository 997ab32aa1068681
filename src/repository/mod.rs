//! Repository layer for book record storage

pub mod memory;
pub mod postgres;

use async_trait::async_trait;
#[cfg(test)]
use mockall::automock;

use crate::{error::AppResult, models::Book};

/// Durable keyed storage for book records.
///
/// The store is the authority for ISBN uniqueness: `save` of a new record
/// whose ISBN already exists fails with `AppError::Duplicate`. The engine
/// never pre-checks uniqueness itself.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait BookRepository: Send + Sync {
    /// Insert the record when it has no id yet, update it otherwise.
    /// Returns the stored state, with the id filled in on insert.
    async fn save(&self, book: &Book) -> AppResult<Book>;

    /// Look up a record by its unique ISBN
    async fn find_by_isbn(&self, isbn: &str) -> AppResult<Option<Book>>;

    /// All records by the given author, in store-defined order
    async fn find_by_author(&self, author: &str) -> AppResult<Vec<Book>>;

    /// Delete the record; deleting an absent record is a no-op
    async fn delete(&self, book: &Book) -> AppResult<()>;
}
