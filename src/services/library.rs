//! Inventory engine: copy-count invariants and cache coherence.
//!
//! Every mutation of a book (borrow, return, remove) runs inside a per-ISBN
//! critical section: resolve, check the copy-count rule, persist, then
//! refresh or evict the cache entry, all under the same lock. Readers that
//! miss the cache take the same lock before populating it, so a stale read
//! can never overwrite the state written by a later-started mutation.
//! Different ISBNs use different locks and never contend.

use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::{Mutex, OwnedMutexGuard};

use crate::{
    cache::BookCache,
    error::{AppError, AppResult},
    models::Book,
    repository::BookRepository,
};

#[derive(Clone)]
pub struct LibraryService {
    repository: Arc<dyn BookRepository>,
    cache: Arc<BookCache>,
    isbn_locks: Arc<DashMap<String, Arc<Mutex<()>>>>,
}

impl LibraryService {
    pub fn new(repository: Arc<dyn BookRepository>) -> Self {
        Self {
            repository,
            cache: Arc::new(BookCache::new()),
            isbn_locks: Arc::new(DashMap::new()),
        }
    }

    /// Register a new book. The store enforces ISBN uniqueness; a duplicate
    /// surfaces as `AppError::Duplicate`. The cache is populated lazily on
    /// first lookup, never here.
    pub async fn create_book(&self, book: Book) -> AppResult<Book> {
        let created = self.repository.save(&book).await?;
        tracing::info!(isbn = %created.isbn, title = %created.title, "book created");
        Ok(created)
    }

    /// Look up a book by ISBN, cache first
    pub async fn find_book_by_isbn(&self, isbn: &str) -> AppResult<Book> {
        if let Some(book) = self.cache.get(isbn) {
            return Ok(book);
        }
        let _guard = self.lock_isbn(isbn).await;
        self.resolve_locked(isbn).await
    }

    /// All books by the given author, straight from the store (the cache is
    /// keyed by ISBN only). Zero matches is an error, not an empty list.
    pub async fn find_books_by_author(&self, author: &str) -> AppResult<Vec<Book>> {
        let books = self.repository.find_by_author(author).await?;
        if books.is_empty() {
            return Err(AppError::NotFound(format!(
                "No books were found for author {author}"
            )));
        }
        Ok(books)
    }

    /// Borrow one copy: decrement `available_copies`, persist, refresh cache
    pub async fn borrow_book(&self, isbn: &str) -> AppResult<Book> {
        let _guard = self.lock_isbn(isbn).await;

        let mut book = self.resolve_locked(isbn).await?;
        if book.available_copies == 0 {
            return Err(AppError::NoCopiesAvailable(format!(
                "No copies left to borrow for ISBN {isbn}"
            )));
        }

        book.available_copies -= 1;
        let saved = self.repository.save(&book).await?;
        self.cache.insert(saved.clone());
        tracing::debug!(isbn, available = saved.available_copies, "copy borrowed");
        Ok(saved)
    }

    /// Return one copy: increment `available_copies`, persist, refresh cache
    pub async fn return_book(&self, isbn: &str) -> AppResult<Book> {
        let _guard = self.lock_isbn(isbn).await;

        let mut book = self.resolve_locked(isbn).await?;
        if book.available_copies == book.total_copies {
            return Err(AppError::AtCapacity(format!(
                "All copies are already on the shelf for ISBN {isbn}"
            )));
        }

        book.available_copies += 1;
        let saved = self.repository.save(&book).await?;
        self.cache.insert(saved.clone());
        tracing::debug!(isbn, available = saved.available_copies, "copy returned");
        Ok(saved)
    }

    /// Remove a book permanently and evict its cache entry
    pub async fn remove_book(&self, isbn: &str) -> AppResult<()> {
        {
            let _guard = self.lock_isbn(isbn).await;

            let book = self.resolve_locked(isbn).await?;
            self.repository.delete(&book).await?;
            self.cache.evict(isbn);
            tracing::info!(isbn, "book removed");
        }
        // Prune the lock entry only when nobody else holds a clone of it,
        // otherwise an in-flight operation on the old mutex and a fresh one
        // minted after re-creation could run unserialized.
        self.isbn_locks
            .remove_if(isbn, |_, lock| Arc::strong_count(lock) == 1);
        Ok(())
    }

    /// Serialize all work on one ISBN. The lock map grows with the set of
    /// ISBNs touched; `remove_book` drops the entry again.
    async fn lock_isbn(&self, isbn: &str) -> OwnedMutexGuard<()> {
        let lock = self
            .isbn_locks
            .entry(isbn.to_string())
            .or_default()
            .value()
            .clone();
        lock.lock_owned().await
    }

    /// Cache-or-store resolution. Caller must hold the ISBN lock so the
    /// populate cannot race a concurrent mutation's refresh.
    async fn resolve_locked(&self, isbn: &str) -> AppResult<Book> {
        if let Some(book) = self.cache.get(isbn) {
            return Ok(book);
        }
        let book = self
            .repository
            .find_by_isbn(isbn)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Book was not found using ISBN {isbn}")))?;
        self.cache.insert(book.clone());
        Ok(book)
    }
}
