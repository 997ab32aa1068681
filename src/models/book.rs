//! Book (catalog entry) model and related types.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

/// A catalog record for a single title.
///
/// `isbn` is the natural key: unique across the store, immutable after
/// creation. `available_copies` is the only mutable field and stays within
/// `[0, total_copies]`; it changes only through borrow (-1) and return (+1).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Book {
    /// Store-assigned identity, absent until first save
    pub id: Option<i64>,
    /// Unique ISBN identifying the title
    pub isbn: String,
    pub title: String,
    pub author: String,
    pub publication_year: i32,
    /// Fixed number of copies the library owns
    pub total_copies: i32,
    /// Copies currently not on loan
    pub available_copies: i32,
}

impl Book {
    /// Build an unsaved record with every copy on the shelf
    pub fn new(
        isbn: impl Into<String>,
        title: impl Into<String>,
        author: impl Into<String>,
        publication_year: i32,
        total_copies: i32,
    ) -> Self {
        Self {
            id: None,
            isbn: isbn.into(),
            title: title.into(),
            author: author.into(),
            publication_year,
            total_copies,
            available_copies: total_copies,
        }
    }
}

/// Book creation payload
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateBookRequest {
    #[validate(length(min = 1, message = "isbn must not be empty"))]
    pub isbn: String,
    #[validate(length(min = 1, message = "title must not be empty"))]
    pub title: String,
    #[validate(length(min = 1, message = "author must not be empty"))]
    pub author: String,
    pub publication_year: i32,
    /// Copies owned; omitted means the library holds none yet
    #[serde(default)]
    #[validate(range(min = 0, message = "total_copies must not be negative"))]
    pub total_copies: i32,
}

impl From<CreateBookRequest> for Book {
    fn from(req: CreateBookRequest) -> Self {
        Book::new(
            req.isbn,
            req.title,
            req.author,
            req.publication_year,
            req.total_copies,
        )
    }
}
