//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define the data access contract for the book collection.
//! - Isolate SQLite query details from service and presentation callers.
//!
//! # Invariants
//! - Repository writes store input as given; validation is the caller's job.
//! - Every operation runs on its own connection and one SQL statement.

pub mod book_repo;
