//! Core persistence and use-case logic for Bookshelf.
//! This crate owns the book collection; presentation layers call into it.

pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use config::{ConfigError, ConfigOverrides, LibraryConfig};
pub use logging::{default_log_level, init_logging, LoggingError};
pub use model::book::{Book, BookId, BookValidationError, NewBook, MAX_YEAR, MIN_YEAR};
pub use repo::book_repo::{
    BookRepository, LibraryStats, RepoError, RepoResult, SqliteBookRepository,
};
pub use service::book_form::{BookForm, DEFAULT_FORM_YEAR};
pub use service::library_service::{LibraryError, LibraryService};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
