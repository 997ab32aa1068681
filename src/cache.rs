//! Read-through cache for books, keyed by ISBN.
//!
//! Policy: populate-on-read, refresh-on-write, evict-on-delete. Unbounded,
//! no TTL; entries live for the lifetime of the process. Coherence with the
//! store is the engine's job: it refreshes or evicts entries inside the same
//! per-ISBN critical section as the store write they mirror.

use dashmap::DashMap;

use crate::models::Book;

#[derive(Debug, Default)]
pub struct BookCache {
    entries: DashMap<String, Book>,
}

impl BookCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cached copy for the given ISBN, if any
    pub fn get(&self, isbn: &str) -> Option<Book> {
        let hit = self.entries.get(isbn).map(|e| e.value().clone());
        if hit.is_some() {
            tracing::debug!(isbn, "cache hit");
        }
        hit
    }

    /// Store the authoritative state for the book's ISBN
    pub fn insert(&self, book: Book) {
        self.entries.insert(book.isbn.clone(), book);
    }

    /// Drop the entry for the given ISBN, if present
    pub fn evict(&self, isbn: &str) {
        self.entries.remove(isbn);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
