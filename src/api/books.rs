//! Catalog endpoints: create, lookup, borrow, return, remove

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use validator::Validate;

use crate::{
    error::{AppError, AppResult, ErrorResponse},
    models::{Book, CreateBookRequest},
    AppState,
};

use super::AuthenticatedUser;

/// Register a new book
#[utoipa::path(
    post,
    path = "/books",
    tag = "books",
    security(("basic_auth" = [])),
    request_body = CreateBookRequest,
    responses(
        (status = 201, description = "Book created", body = Book),
        (status = 400, description = "ISBN already exists or invalid payload", body = ErrorResponse),
        (status = 401, description = "Not authenticated"),
        (status = 403, description = "Write role required")
    )
)]
pub async fn create_book(
    State(state): State<AppState>,
    AuthenticatedUser(principal): AuthenticatedUser,
    Json(request): Json<CreateBookRequest>,
) -> AppResult<(StatusCode, Json<Book>)> {
    principal.require_write()?;
    request
        .validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let book = state.services.library.create_book(Book::from(request)).await?;
    Ok((StatusCode::CREATED, Json(book)))
}

/// Look up a book by ISBN
#[utoipa::path(
    get,
    path = "/books/isbn/{isbn}",
    tag = "books",
    security(("basic_auth" = [])),
    params(("isbn" = String, Path, description = "ISBN of the book")),
    responses(
        (status = 200, description = "Book found", body = Book),
        (status = 404, description = "No book for this ISBN", body = ErrorResponse),
        (status = 401, description = "Not authenticated"),
        (status = 403, description = "Read role required")
    )
)]
pub async fn find_book_by_isbn(
    State(state): State<AppState>,
    AuthenticatedUser(principal): AuthenticatedUser,
    Path(isbn): Path<String>,
) -> AppResult<Json<Book>> {
    principal.require_read()?;

    let book = state.services.library.find_book_by_isbn(&isbn).await?;
    Ok(Json(book))
}

/// List all books by an author
#[utoipa::path(
    get,
    path = "/books/author/{author}",
    tag = "books",
    security(("basic_auth" = [])),
    params(("author" = String, Path, description = "Author name")),
    responses(
        (status = 200, description = "Books by the author", body = Vec<Book>),
        (status = 404, description = "No books for this author", body = ErrorResponse),
        (status = 401, description = "Not authenticated"),
        (status = 403, description = "Read role required")
    )
)]
pub async fn find_books_by_author(
    State(state): State<AppState>,
    AuthenticatedUser(principal): AuthenticatedUser,
    Path(author): Path<String>,
) -> AppResult<Json<Vec<Book>>> {
    principal.require_read()?;

    let books = state.services.library.find_books_by_author(&author).await?;
    Ok(Json(books))
}

/// Borrow one copy of a book
#[utoipa::path(
    put,
    path = "/books/borrow/isbn/{isbn}",
    tag = "books",
    security(("basic_auth" = [])),
    params(("isbn" = String, Path, description = "ISBN of the book")),
    responses(
        (status = 200, description = "Copy borrowed", body = Book),
        (status = 404, description = "No book for this ISBN or no copies available", body = ErrorResponse),
        (status = 401, description = "Not authenticated"),
        (status = 403, description = "Read role required")
    )
)]
pub async fn borrow_book(
    State(state): State<AppState>,
    AuthenticatedUser(principal): AuthenticatedUser,
    Path(isbn): Path<String>,
) -> AppResult<Json<Book>> {
    principal.require_read()?;

    let book = state.services.library.borrow_book(&isbn).await?;
    Ok(Json(book))
}

/// Return a borrowed copy of a book
#[utoipa::path(
    put,
    path = "/books/return/isbn/{isbn}",
    tag = "books",
    security(("basic_auth" = [])),
    params(("isbn" = String, Path, description = "ISBN of the book")),
    responses(
        (status = 200, description = "Copy returned", body = Book),
        (status = 404, description = "No book for this ISBN or all copies already returned", body = ErrorResponse),
        (status = 401, description = "Not authenticated"),
        (status = 403, description = "Read role required")
    )
)]
pub async fn return_book(
    State(state): State<AppState>,
    AuthenticatedUser(principal): AuthenticatedUser,
    Path(isbn): Path<String>,
) -> AppResult<Json<Book>> {
    principal.require_read()?;

    let book = state.services.library.return_book(&isbn).await?;
    Ok(Json(book))
}

/// Remove a book from the catalog
#[utoipa::path(
    delete,
    path = "/books/isbn/{isbn}",
    tag = "books",
    security(("basic_auth" = [])),
    params(("isbn" = String, Path, description = "ISBN of the book")),
    responses(
        (status = 200, description = "Book removed"),
        (status = 404, description = "No book for this ISBN", body = ErrorResponse),
        (status = 401, description = "Not authenticated"),
        (status = 403, description = "Write role required")
    )
)]
pub async fn remove_book(
    State(state): State<AppState>,
    AuthenticatedUser(principal): AuthenticatedUser,
    Path(isbn): Path<String>,
) -> AppResult<StatusCode> {
    principal.require_write()?;

    state.services.library.remove_book(&isbn).await?;
    Ok(StatusCode::OK)
}
