//! Data models for the catalog

pub mod book;

pub use book::{Book, CreateBookRequest};
