use bookshelf_core::db::{ensure_schema, open_db, DbError, SCHEMA_VERSION};
use bookshelf_core::{BookRepository, NewBook, RepoError, SqliteBookRepository};
use rusqlite::Connection;

#[test]
fn initialize_creates_books_table_and_stamps_version() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("library.db");

    SqliteBookRepository::new(&path).initialize().unwrap();

    let conn = Connection::open(&path).unwrap();
    assert_eq!(schema_version(&conn), SCHEMA_VERSION);
    assert_eq!(
        column_names(&conn),
        vec!["id", "title", "author", "year", "genre", "read"]
    );
}

#[test]
fn initialize_twice_preserves_data_and_schema() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("library.db");
    let repo = SqliteBookRepository::new(&path);

    repo.initialize().unwrap();
    repo.add(&NewBook::new("Dune", "Herbert", 1965, "SciFi", false))
        .unwrap();
    repo.initialize().unwrap();

    let conn = Connection::open(&path).unwrap();
    assert_eq!(table_count(&conn, "books"), 1);
    assert_eq!(repo.list_all().unwrap().len(), 1);
}

#[test]
fn unversioned_store_with_existing_rows_is_adopted() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("library.db");

    let conn = Connection::open(&path).unwrap();
    conn.execute_batch(
        "CREATE TABLE books (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            title TEXT,
            author TEXT,
            year INTEGER,
            genre TEXT,
            read INTEGER
        );
        INSERT INTO books (title, author, year, genre, read)
        VALUES ('Emma', 'Austen', 1815, 'Classic', 1);",
    )
    .unwrap();
    drop(conn);

    let repo = SqliteBookRepository::new(&path);
    repo.initialize().unwrap();

    let books = repo.list_all().unwrap();
    assert_eq!(books.len(), 1);
    assert_eq!(books[0].title, "Emma");
    assert!(books[0].read);
}

#[test]
fn opening_database_with_newer_schema_version_returns_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("future.db");

    let conn = Connection::open(&path).unwrap();
    conn.execute_batch("PRAGMA user_version = 999;").unwrap();
    drop(conn);

    let mut conn = open_db(&path).unwrap();
    match ensure_schema(&mut conn).unwrap_err() {
        DbError::UnsupportedSchemaVersion {
            db_version,
            latest_supported,
        } => {
            assert_eq!(db_version, 999);
            assert_eq!(latest_supported, SCHEMA_VERSION);
        }
        other => panic!("unexpected error: {other}"),
    }
    drop(conn);

    let err = SqliteBookRepository::new(&path).initialize().unwrap_err();
    assert!(matches!(
        err,
        RepoError::Db(DbError::UnsupportedSchemaVersion { .. })
    ));
}

#[test]
fn operations_before_initialize_surface_storage_errors() {
    let dir = tempfile::tempdir().unwrap();
    let repo = SqliteBookRepository::new(dir.path().join("empty.db"));

    let err = repo.list_all().unwrap_err();
    assert!(matches!(err, RepoError::Db(DbError::Sqlite(_))));

    let err = repo.stats().unwrap_err();
    assert!(matches!(err, RepoError::Db(DbError::Sqlite(_))));
}

#[test]
fn unreachable_store_path_surfaces_storage_error() {
    let dir = tempfile::tempdir().unwrap();
    let repo = SqliteBookRepository::new(dir.path().join("missing").join("library.db"));

    let err = repo.initialize().unwrap_err();
    assert!(matches!(err, RepoError::Db(DbError::Sqlite(_))));
}

fn schema_version(conn: &Connection) -> u32 {
    conn.query_row("PRAGMA user_version;", [], |row| row.get(0))
        .unwrap()
}

fn table_count(conn: &Connection, table_name: &str) -> i64 {
    conn.query_row(
        "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = ?1;",
        [table_name],
        |row| row.get(0),
    )
    .unwrap()
}

fn column_names(conn: &Connection) -> Vec<String> {
    let mut stmt = conn.prepare("PRAGMA table_info(books);").unwrap();
    let names = stmt
        .query_map([], |row| row.get::<_, String>(1))
        .unwrap()
        .collect::<Result<Vec<_>, _>>()
        .unwrap();
    names
}
