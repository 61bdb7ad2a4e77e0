//! SQLite-backed record store.
//!
//! The store owns the canonical copy of every [`NewsRecord`]. Records are
//! only ever inserted; there is no update or delete path.

use std::path::Path;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use rusqlite::{Connection, OptionalExtension, Row, params};

use crate::error::{Error, Result};
use crate::model::{NewNews, NewsId, NewsRecord, validate_text_fields};
use crate::schema::init_schema;

const SELECT_COLUMNS: &str =
    "SELECT id, title, description, image_url, video_url, created_at, updated_at FROM news";

/// Handle to the news table. Cheap to clone; clones share one connection.
#[derive(Clone)]
pub struct NewsStore {
    conn: Arc<Mutex<Connection>>,
}

impl NewsStore {
    /// Open (or create) a store backed by a database file.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let conn = Connection::open(path)?;
        conn.pragma_update_and_check(None, "journal_mode", "WAL", |_| Ok(()))?;
        tracing::info!(path = %path.display(), "news database opened");
        Self::from_connection(conn)
    }

    /// Open a store that lives only as long as the process.
    pub fn open_in_memory() -> Result<Self> {
        Self::from_connection(Connection::open_in_memory()?)
    }

    fn from_connection(conn: Connection) -> Result<Self> {
        init_schema(&conn)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Persist a new record, assigning its id and timestamps.
    pub fn create(&self, new: NewNews) -> Result<NewsRecord> {
        new.validate()?;

        let now = now_millis();
        let record = NewsRecord {
            id: NewsId::generate(),
            title: new.title,
            description: new.description,
            image_url: new.image_url,
            video_url: new.video_url,
            created_at: now,
            updated_at: now,
        };

        let conn = self.conn.lock();
        insert(&conn, &record, "INSERT")?;
        tracing::debug!(news_id = %record.id, "news record created");

        Ok(record)
    }

    /// All records, newest first.
    pub fn list_all(&self) -> Result<Vec<NewsRecord>> {
        let conn = self.conn.lock();
        let mut stmt = conn.prepare(&format!(
            "{SELECT_COLUMNS} ORDER BY created_at DESC, rowid DESC"
        ))?;
        let rows = stmt.query_map([], record_from_row)?;
        let records = rows.collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(records)
    }

    /// Look up a single record.
    ///
    /// Malformed ids are reported as [`Error::NotFound`], same as unknown ones.
    pub fn get_by_id(&self, id: &str) -> Result<NewsRecord> {
        let Some(news_id) = NewsId::parse(id) else {
            return Err(Error::NotFound(id.to_string()));
        };

        let conn = self.conn.lock();
        conn.query_row(
            &format!("{SELECT_COLUMNS} WHERE id = ?1"),
            [news_id.as_str()],
            record_from_row,
        )
        .optional()?
        .ok_or_else(|| Error::NotFound(news_id.to_string()))
    }

    /// Insert a record that already has an id and timestamps.
    ///
    /// Returns `false` without touching the table when the id is taken.
    pub fn import(&self, record: &NewsRecord) -> Result<bool> {
        validate_text_fields(&record.title, &record.description)?;
        let conn = self.conn.lock();
        let changed = insert(&conn, record, "INSERT OR IGNORE")?;
        Ok(changed == 1)
    }

    /// Number of stored records.
    pub fn count(&self) -> Result<u64> {
        let conn = self.conn.lock();
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM news", [], |row| row.get(0))?;
        Ok(count as u64)
    }
}

fn insert(conn: &Connection, record: &NewsRecord, verb: &str) -> Result<usize> {
    let changed = conn.execute(
        &format!(
            "{verb} INTO news
                (id, title, description, image_url, video_url, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)"
        ),
        params![
            record.id.as_str(),
            record.title,
            record.description,
            record.image_url,
            record.video_url,
            record.created_at.timestamp_millis(),
            record.updated_at.timestamp_millis(),
        ],
    )?;
    Ok(changed)
}

fn record_from_row(row: &Row<'_>) -> rusqlite::Result<NewsRecord> {
    let id: String = row.get(0)?;
    let created_at: i64 = row.get(5)?;
    let updated_at: i64 = row.get(6)?;
    Ok(NewsRecord {
        // Only ids that passed NewsId::parse are ever written.
        id: NewsId::parse(&id).unwrap_or_else(NewsId::generate),
        title: row.get(1)?,
        description: row.get(2)?,
        image_url: row.get(3)?,
        video_url: row.get(4)?,
        created_at: DateTime::from_timestamp_millis(created_at).unwrap_or_default(),
        updated_at: DateTime::from_timestamp_millis(updated_at).unwrap_or_default(),
    })
}

/// Current time at the millisecond precision the table stores.
fn now_millis() -> DateTime<Utc> {
    DateTime::from_timestamp_millis(Utc::now().timestamp_millis()).unwrap_or_default()
}
