//! Caller-owned form state for adding books.
//!
//! # Invariants
//! - A successful submit resets every field to its default.
//! - A rejected submit keeps the entered values.

use crate::model::book::{BookValidationError, NewBook};

/// Publication year pre-filled into a fresh form.
pub const DEFAULT_FORM_YEAR: i32 = 2025;

/// Editable add-book form values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookForm {
    pub title: String,
    pub author: String,
    pub year: i32,
    pub genre: String,
    pub read: bool,
}

impl Default for BookForm {
    fn default() -> Self {
        Self {
            title: String::new(),
            author: String::new(),
            year: DEFAULT_FORM_YEAR,
            genre: String::new(),
            read: false,
        }
    }
}

impl BookForm {
    /// Builds the insert payload from current values without changing them.
    pub fn to_new_book(&self) -> NewBook {
        NewBook::new(
            self.title.clone(),
            self.author.clone(),
            self.year,
            self.genre.clone(),
            self.read,
        )
    }

    /// Validates the form and, on success, returns the payload and resets.
    pub fn submit(&mut self) -> Result<NewBook, BookValidationError> {
        let book = self.to_new_book();
        book.validate()?;
        self.reset();
        Ok(book)
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
