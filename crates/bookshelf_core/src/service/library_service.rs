//! Library use-case service.
//!
//! # Responsibility
//! - Validate book input before it reaches the repository.
//! - Expose the collection operations presentation layers call.
//!
//! # Invariants
//! - Invalid input never reaches storage.
//! - Service layer remains storage-agnostic.

use crate::model::book::{Book, BookId, BookValidationError, NewBook};
use crate::repo::book_repo::{BookRepository, LibraryStats, RepoError};
use log::warn;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Service error for library use-cases.
#[derive(Debug)]
pub enum LibraryError {
    /// Book input failed caller-side validation.
    Validation(BookValidationError),
    /// Search term is empty.
    EmptySearchTerm,
    /// Persistence-layer failure.
    Repo(RepoError),
}

impl Display for LibraryError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::EmptySearchTerm => write!(f, "search term must not be empty"),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for LibraryError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::EmptySearchTerm => None,
            Self::Repo(err) => Some(err),
        }
    }
}

impl From<BookValidationError> for LibraryError {
    fn from(value: BookValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<RepoError> for LibraryError {
    fn from(value: RepoError) -> Self {
        Self::Repo(value)
    }
}

/// Library service facade over repository implementations.
pub struct LibraryService<R: BookRepository> {
    repo: R,
}

impl<R: BookRepository> LibraryService<R> {
    /// Creates a service using the provided repository implementation.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Ensures the backing store is ready.
    pub fn initialize(&self) -> Result<(), LibraryError> {
        Ok(self.repo.initialize()?)
    }

    /// Validates and stores one book.
    pub fn add_book(&self, book: &NewBook) -> Result<BookId, LibraryError> {
        if let Err(err) = book.validate() {
            warn!("event=book_add module=service status=rejected reason={err}");
            return Err(err.into());
        }
        Ok(self.repo.add(book)?)
    }

    /// Removes every book with exactly this title.
    ///
    /// Returns the number of removed rows; `0` means nothing matched.
    pub fn remove_book(&self, title: &str) -> Result<usize, LibraryError> {
        Ok(self.repo.remove_by_title(title)?)
    }

    /// Searches title and author for `term`.
    ///
    /// An empty term is rejected here even though the repository would treat
    /// it as match-all. Whitespace is a real search term.
    pub fn search_books(&self, term: &str) -> Result<Vec<Book>, LibraryError> {
        if term.is_empty() {
            return Err(LibraryError::EmptySearchTerm);
        }
        Ok(self.repo.search(term)?)
    }

    pub fn list_books(&self) -> Result<Vec<Book>, LibraryError> {
        Ok(self.repo.list_all()?)
    }

    pub fn library_stats(&self) -> Result<LibraryStats, LibraryError> {
        Ok(self.repo.stats()?)
    }

    /// Titles offered for removal, in storage order.
    ///
    /// Duplicate titles appear once per stored book.
    pub fn removable_titles(&self) -> Result<Vec<String>, LibraryError> {
        Ok(self
            .repo
            .list_all()?
            .into_iter()
            .map(|book| book.title)
            .collect())
    }
}
