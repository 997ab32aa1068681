//! In-memory book repository.
//!
//! Default backend for development and tests, standing in for the embedded
//! database the service runs against when no Postgres is configured.

use std::collections::HashMap;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::RwLock;

use async_trait::async_trait;

use crate::{
    error::{AppError, AppResult},
    models::Book,
};

use super::BookRepository;

/// `RwLock<HashMap>` keyed by ISBN, with store-assigned sequential ids
#[derive(Debug, Default)]
pub struct MemoryBookRepository {
    books: RwLock<HashMap<String, Book>>,
    next_id: AtomicI64,
}

impl MemoryBookRepository {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> AppResult<std::sync::RwLockReadGuard<'_, HashMap<String, Book>>> {
        self.books
            .read()
            .map_err(|_| AppError::Internal("book store lock poisoned".to_string()))
    }

    fn write(&self) -> AppResult<std::sync::RwLockWriteGuard<'_, HashMap<String, Book>>> {
        self.books
            .write()
            .map_err(|_| AppError::Internal("book store lock poisoned".to_string()))
    }
}

#[async_trait]
impl BookRepository for MemoryBookRepository {
    async fn save(&self, book: &Book) -> AppResult<Book> {
        let mut books = self.write()?;

        let mut stored = book.clone();
        match stored.id {
            None => {
                // Insert path: the ISBN column is unique
                if books.contains_key(&stored.isbn) {
                    return Err(AppError::Duplicate(format!(
                        "A book with ISBN {} already exists",
                        stored.isbn
                    )));
                }
                stored.id = Some(self.next_id.fetch_add(1, Ordering::Relaxed) + 1);
            }
            Some(_) => {}
        }

        books.insert(stored.isbn.clone(), stored.clone());
        Ok(stored)
    }

    async fn find_by_isbn(&self, isbn: &str) -> AppResult<Option<Book>> {
        Ok(self.read()?.get(isbn).cloned())
    }

    async fn find_by_author(&self, author: &str) -> AppResult<Vec<Book>> {
        let mut matches: Vec<Book> = self
            .read()?
            .values()
            .filter(|b| b.author == author)
            .cloned()
            .collect();
        // Insertion order, like a sequential scan over the id column
        matches.sort_by_key(|b| b.id);
        Ok(matches)
    }

    async fn delete(&self, book: &Book) -> AppResult<()> {
        self.write()?.remove(&book.isbn);
        Ok(())
    }
}
