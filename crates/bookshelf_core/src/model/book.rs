//! Book domain model.
//!
//! # Responsibility
//! - Define the persisted `Book` record and the `NewBook` insert payload.
//! - Provide input validation for presentation-layer callers.
//!
//! # Invariants
//! - `id` is assigned by the store and never reused while the row exists.
//! - Validation lives here, but the repository accepts unvalidated input.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Store-assigned row identifier.
pub type BookId = i64;

/// Earliest accepted publication year.
pub const MIN_YEAR: i32 = 1000;
/// Latest accepted publication year.
pub const MAX_YEAR: i32 = 2100;

/// A book as persisted in the library.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Book {
    pub id: BookId,
    pub title: String,
    pub author: String,
    pub year: i32,
    pub genre: String,
    pub read: bool,
}

/// Insert payload for a book that has not been stored yet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewBook {
    pub title: String,
    pub author: String,
    pub year: i32,
    pub genre: String,
    pub read: bool,
}

/// Caller-side validation failure for book input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BookValidationError {
    /// A required text field is empty.
    EmptyField(&'static str),
    /// Publication year outside `MIN_YEAR..=MAX_YEAR`.
    YearOutOfRange(i32),
}

impl Display for BookValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyField(field) => write!(f, "{field} must not be empty"),
            Self::YearOutOfRange(year) => write!(
                f,
                "year {year} is out of range; expected {MIN_YEAR}..={MAX_YEAR}"
            ),
        }
    }
}

impl Error for BookValidationError {}

impl NewBook {
    pub fn new(
        title: impl Into<String>,
        author: impl Into<String>,
        year: i32,
        genre: impl Into<String>,
        read: bool,
    ) -> Self {
        Self {
            title: title.into(),
            author: author.into(),
            year,
            genre: genre.into(),
            read,
        }
    }

    /// Checks required fields and the year range.
    ///
    /// Fields are checked in `title`, `author`, `genre`, `year` order and the
    /// first failure is returned.
    pub fn validate(&self) -> Result<(), BookValidationError> {
        if self.title.is_empty() {
            return Err(BookValidationError::EmptyField("title"));
        }
        if self.author.is_empty() {
            return Err(BookValidationError::EmptyField("author"));
        }
        if self.genre.is_empty() {
            return Err(BookValidationError::EmptyField("genre"));
        }
        if !(MIN_YEAR..=MAX_YEAR).contains(&self.year) {
            return Err(BookValidationError::YearOutOfRange(self.year));
        }
        Ok(())
    }
}
