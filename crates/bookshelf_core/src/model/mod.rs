//! Domain model for the personal library.
//!
//! # Responsibility
//! - Define the book record and its insert payload.
//! - Host caller-side validation rules.
//!
//! # Invariants
//! - Every stored book is identified by a store-assigned `BookId`.
//! - Books are never mutated in place; they are added or removed.

pub mod book;
