//! SQLite schema for the news store.
//!
//! The schema version lives in SQLite's `user_version` pragma, which is 0
//! on a database that has never been initialized.

use rusqlite::Connection;

use crate::error::{Error, Result};

/// Schema version written by this build.
pub const SCHEMA_VERSION: i32 = 1;

const NEWS_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS news (
    id TEXT PRIMARY KEY,
    title TEXT NOT NULL,
    description TEXT NOT NULL,
    image_url TEXT,
    video_url TEXT,
    created_at INTEGER NOT NULL,
    updated_at INTEGER NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_news_created_at ON news(created_at);
"#;

/// Create the news table on a fresh database.
///
/// Fails with [`Error::UnsupportedSchema`] when the file was written by a
/// newer schema version.
pub fn init_schema(conn: &Connection) -> Result<()> {
    match user_version(conn)? {
        0 => {
            conn.execute_batch(NEWS_TABLE)?;
            conn.pragma_update(None, "user_version", SCHEMA_VERSION)?;
            tracing::debug!(version = SCHEMA_VERSION, "news schema created");
            Ok(())
        }
        SCHEMA_VERSION => Ok(()),
        found => Err(Error::UnsupportedSchema { found }),
    }
}

fn user_version(conn: &Connection) -> Result<i32> {
    Ok(conn.pragma_query_value(None, "user_version", |row| row.get(0))?)
}
