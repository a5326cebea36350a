//! Book repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Provide add / remove / search / list / stats over the `books` table.
//! - Keep SQL details inside the core persistence boundary.
//!
//! # Invariants
//! - A connection is opened per call and dropped before the call returns,
//!   on success and on failure alike.
//! - Each write commits before returning (SQLite autocommit, one statement).
//! - Read paths reject invalid persisted `read` flags instead of masking them.

use crate::db::{ensure_schema, open_db, DbError};
use crate::model::book::{Book, BookId, NewBook};
use log::{debug, error, info};
use rusqlite::{params, Connection, Params, Row};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};
use std::time::Instant;

const BOOK_SELECT_SQL: &str = "SELECT
    id,
    title,
    author,
    year,
    genre,
    read
FROM books";

const LIKE_ESCAPE: char = '\\';

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for book persistence and query operations.
#[derive(Debug)]
pub enum RepoError {
    Db(DbError),
    InvalidData(String),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::InvalidData(message) => write!(f, "invalid persisted book data: {message}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::InvalidData(_) => None,
        }
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Aggregate counters over the whole collection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LibraryStats {
    /// Number of stored books.
    pub total: u64,
    /// Number of stored books marked as read.
    pub read: u64,
}

impl LibraryStats {
    /// Share of read books in percent, `0.0` for an empty library.
    pub fn percent_read(&self) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        self.read as f64 / self.total as f64 * 100.0
    }
}

/// Repository interface for the book collection.
pub trait BookRepository {
    /// Creates the backing schema if absent. Safe to call on every start.
    fn initialize(&self) -> RepoResult<()>;
    /// Stores one book and returns its assigned id.
    fn add(&self, book: &NewBook) -> RepoResult<BookId>;
    /// Deletes every book whose title equals `title` and returns the count.
    fn remove_by_title(&self, title: &str) -> RepoResult<usize>;
    /// Returns books whose title or author contains `term`.
    fn search(&self, term: &str) -> RepoResult<Vec<Book>>;
    /// Returns every book in storage order.
    fn list_all(&self) -> RepoResult<Vec<Book>>;
    /// Returns total and read counts.
    fn stats(&self) -> RepoResult<LibraryStats>;
}

/// SQLite-backed book repository bound to one database file.
///
/// Holds only the file location; no connection outlives a single call.
#[derive(Debug, Clone)]
pub struct SqliteBookRepository {
    db_path: PathBuf,
}

impl SqliteBookRepository {
    pub fn new(db_path: impl Into<PathBuf>) -> Self {
        Self {
            db_path: db_path.into(),
        }
    }

    pub fn db_path(&self) -> &Path {
        &self.db_path
    }

    fn connect(&self) -> RepoResult<Connection> {
        Ok(open_db(&self.db_path)?)
    }
}

impl BookRepository for SqliteBookRepository {
    fn initialize(&self) -> RepoResult<()> {
        let mut conn = self.connect()?;
        ensure_schema(&mut conn)?;
        Ok(())
    }

    fn add(&self, book: &NewBook) -> RepoResult<BookId> {
        let started_at = Instant::now();
        let conn = self.connect()?;

        let result = conn.execute(
            "INSERT INTO books (title, author, year, genre, read)
             VALUES (?1, ?2, ?3, ?4, ?5);",
            params![
                book.title.as_str(),
                book.author.as_str(),
                book.year,
                book.genre.as_str(),
                bool_to_int(book.read),
            ],
        );

        match result {
            Ok(_) => {
                let id = conn.last_insert_rowid();
                info!(
                    "event=book_add module=repo status=ok book_id={} duration_ms={}",
                    id,
                    started_at.elapsed().as_millis()
                );
                Ok(id)
            }
            Err(err) => {
                error!(
                    "event=book_add module=repo status=error duration_ms={} error={}",
                    started_at.elapsed().as_millis(),
                    err
                );
                Err(err.into())
            }
        }
    }

    fn remove_by_title(&self, title: &str) -> RepoResult<usize> {
        let started_at = Instant::now();
        let conn = self.connect()?;

        match conn.execute("DELETE FROM books WHERE title = ?1;", [title]) {
            Ok(removed) => {
                info!(
                    "event=book_remove module=repo status=ok removed={} duration_ms={}",
                    removed,
                    started_at.elapsed().as_millis()
                );
                Ok(removed)
            }
            Err(err) => {
                error!(
                    "event=book_remove module=repo status=error duration_ms={} error={}",
                    started_at.elapsed().as_millis(),
                    err
                );
                Err(err.into())
            }
        }
    }

    fn search(&self, term: &str) -> RepoResult<Vec<Book>> {
        let started_at = Instant::now();
        let conn = self.connect()?;

        let pattern = format!("%{}%", escape_like(term));
        let books = query_books(
            &conn,
            &format!(
                "{BOOK_SELECT_SQL}
                 WHERE COALESCE(title, '') LIKE ?1 ESCAPE '{LIKE_ESCAPE}'
                    OR COALESCE(author, '') LIKE ?1 ESCAPE '{LIKE_ESCAPE}'
                 ORDER BY id ASC;"
            ),
            [pattern.as_str()],
        )
        .inspect_err(|err| {
            error!(
                "event=book_search module=repo status=error duration_ms={} error={}",
                started_at.elapsed().as_millis(),
                err
            );
        })?;

        debug!(
            "event=book_search module=repo status=ok term_len={} hits={} duration_ms={}",
            term.chars().count(),
            books.len(),
            started_at.elapsed().as_millis()
        );
        Ok(books)
    }

    fn list_all(&self) -> RepoResult<Vec<Book>> {
        let started_at = Instant::now();
        let conn = self.connect()?;

        let books = query_books(&conn, &format!("{BOOK_SELECT_SQL} ORDER BY id ASC;"), [])
            .inspect_err(|err| {
                error!(
                    "event=book_list module=repo status=error duration_ms={} error={}",
                    started_at.elapsed().as_millis(),
                    err
                );
            })?;

        debug!(
            "event=book_list module=repo status=ok count={} duration_ms={}",
            books.len(),
            started_at.elapsed().as_millis()
        );
        Ok(books)
    }

    fn stats(&self) -> RepoResult<LibraryStats> {
        let started_at = Instant::now();
        let conn = self.connect()?;

        let (total, read, invalid) = conn
            .query_row(
                "SELECT
                    COUNT(*),
                    COALESCE(SUM(CASE WHEN read = 1 THEN 1 ELSE 0 END), 0),
                    COALESCE(SUM(CASE WHEN read IS NOT NULL AND read NOT IN (0, 1) THEN 1 ELSE 0 END), 0)
                 FROM books;",
                [],
                |row| {
                    Ok((
                        row.get::<_, i64>(0)?,
                        row.get::<_, i64>(1)?,
                        row.get::<_, i64>(2)?,
                    ))
                },
            )
            .inspect_err(|err| {
                error!(
                    "event=library_stats module=repo status=error duration_ms={} error={}",
                    started_at.elapsed().as_millis(),
                    err
                );
            })?;

        if invalid > 0 {
            error!(
                "event=library_stats module=repo status=error error_code=invalid_read_flag rows={}",
                invalid
            );
            return Err(RepoError::InvalidData(format!(
                "{invalid} row(s) with a read value other than 0 or 1 in books.read"
            )));
        }

        let stats = LibraryStats {
            total: count_to_u64(total, "COUNT(*)")?,
            read: count_to_u64(read, "SUM(read)")?,
        };
        debug!(
            "event=library_stats module=repo status=ok total={} read={} duration_ms={}",
            stats.total,
            stats.read,
            started_at.elapsed().as_millis()
        );
        Ok(stats)
    }
}

fn query_books<P: Params>(conn: &Connection, sql: &str, params: P) -> RepoResult<Vec<Book>> {
    let mut stmt = conn.prepare(sql)?;
    let mut rows = stmt.query(params)?;
    let mut books = Vec::new();
    while let Some(row) = rows.next()? {
        books.push(parse_book_row(row)?);
    }
    Ok(books)
}

fn parse_book_row(row: &Row<'_>) -> RepoResult<Book> {
    let id: BookId = row.get("id")?;

    let year = match row.get::<_, Option<i64>>("year")? {
        Some(value) => i32::try_from(value).map_err(|_| {
            RepoError::InvalidData(format!("invalid year `{value}` in books.year (id={id})"))
        })?,
        None => 0,
    };

    let read = match row.get::<_, Option<i64>>("read")? {
        None | Some(0) => false,
        Some(1) => true,
        Some(other) => {
            return Err(RepoError::InvalidData(format!(
                "invalid read value `{other}` in books.read (id={id})"
            )));
        }
    };

    Ok(Book {
        id,
        title: row.get::<_, Option<String>>("title")?.unwrap_or_default(),
        author: row.get::<_, Option<String>>("author")?.unwrap_or_default(),
        year,
        genre: row.get::<_, Option<String>>("genre")?.unwrap_or_default(),
        read,
    })
}

/// Escapes `LIKE` wildcards so `term` is matched literally.
fn escape_like(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len());
    for ch in term.chars() {
        if matches!(ch, '%' | '_' | LIKE_ESCAPE) {
            escaped.push(LIKE_ESCAPE);
        }
        escaped.push(ch);
    }
    escaped
}

fn count_to_u64(value: i64, column: &str) -> RepoResult<u64> {
    u64::try_from(value)
        .map_err(|_| RepoError::InvalidData(format!("negative aggregate `{value}` for {column}")))
}

fn bool_to_int(value: bool) -> i64 {
    if value {
        1
    } else {
        0
    }
}
