//! Business logic services

pub mod library;

use std::sync::Arc;

use crate::repository::BookRepository;

/// Container for all services
#[derive(Clone)]
pub struct Services {
    pub library: library::LibraryService,
}

impl Services {
    /// Create all services on top of the given repository
    pub fn new(repository: Arc<dyn BookRepository>) -> Self {
        Self {
            library: library::LibraryService::new(repository),
        }
    }
}
