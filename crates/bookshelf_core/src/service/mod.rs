//! Core use-case services.
//!
//! # Responsibility
//! - Wrap repository calls with caller-side validation.
//! - Hold presentation state (form pre-fill) outside the repository.

pub mod book_form;
pub mod library_service;
