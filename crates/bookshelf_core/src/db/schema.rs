//! Idempotent schema setup for the `books` table.
//!
//! # Invariants
//! - Running setup on an existing store never drops or rewrites rows.
//! - Stores stamped with a newer `user_version` are rejected untouched.

use crate::db::{DbError, DbResult};
use log::{error, info};
use rusqlite::Connection;
use std::time::Instant;

/// Schema version stamped into `PRAGMA user_version` by this binary.
pub const SCHEMA_VERSION: u32 = 1;

const SCHEMA_SQL: &str = include_str!("schema.sql");

/// Creates the `books` table when absent and stamps the schema version.
///
/// Stores created without a version stamp (`user_version = 0`) share the
/// same table layout and are adopted as-is.
pub fn ensure_schema(conn: &mut Connection) -> DbResult<()> {
    let started_at = Instant::now();

    let current_version = current_user_version(conn)?;
    if current_version > SCHEMA_VERSION {
        error!(
            "event=schema_init module=db status=error error_code=unsupported_schema db_version={} latest_supported={}",
            current_version, SCHEMA_VERSION
        );
        return Err(DbError::UnsupportedSchemaVersion {
            db_version: current_version,
            latest_supported: SCHEMA_VERSION,
        });
    }

    let tx = conn.transaction()?;
    tx.execute_batch(SCHEMA_SQL)?;
    if current_version < SCHEMA_VERSION {
        tx.execute_batch(&format!("PRAGMA user_version = {SCHEMA_VERSION};"))?;
    }
    tx.commit()?;

    info!(
        "event=schema_init module=db status=ok from_version={} version={} duration_ms={}",
        current_version,
        SCHEMA_VERSION,
        started_at.elapsed().as_millis()
    );
    Ok(())
}

fn current_user_version(conn: &Connection) -> DbResult<u32> {
    let version = conn.query_row("PRAGMA user_version;", [], |row| row.get::<_, u32>(0))?;
    Ok(version)
}
