//! Biblos Library Catalog Service
//!
//! A small REST API for a library catalog: create book records, look them up
//! by ISBN or author, and borrow/return copies, with role-gated write access.
//! The inventory rules live in [`services::library::LibraryService`], backed
//! by a pluggable [`repository::BookRepository`] and an ISBN-keyed
//! read-through [`cache::BookCache`].

use std::sync::Arc;

use axum::{
    routing::{delete, get, post, put},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

pub mod api;
pub mod cache;
pub mod config;
pub mod error;
pub mod models;
pub mod repository;
pub mod services;

pub use config::AppConfig;
pub use error::{AppError, AppResult};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub services: Arc<services::Services>,
}

/// Create the application router with all routes
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let routes = Router::new()
        .route("/health", get(api::health::health_check))
        .route("/books", post(api::books::create_book))
        .route("/books/isbn/:isbn", get(api::books::find_book_by_isbn))
        .route("/books/isbn/:isbn", delete(api::books::remove_book))
        .route("/books/author/:author", get(api::books::find_books_by_author))
        .route("/books/borrow/isbn/:isbn", put(api::books::borrow_book))
        .route("/books/return/isbn/:isbn", put(api::books::return_book))
        .with_state(state);

    Router::new()
        .merge(routes)
        .merge(api::openapi::create_openapi_router())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}
