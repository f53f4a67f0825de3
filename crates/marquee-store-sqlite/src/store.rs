//! [`SqliteBackend`]: the SQLite implementation of [`PreferenceBackend`].

use std::path::Path;

use chrono::Utc;
use marquee_core::store::PreferenceBackend;
use rusqlite::OptionalExtension as _;

use crate::{Error, Result, schema::SCHEMA};

// ─── Backend ─────────────────────────────────────────────────────────────────

/// A key-value store backed by a single SQLite file.
///
/// Cloning is cheap; the inner connection is reference-counted. Clones
/// opened on the same file observe each other's writes, which is how several
/// sessions of one user share preference state.
#[derive(Clone)]
pub struct SqliteBackend {
  conn: tokio_rusqlite::Connection,
}

impl SqliteBackend {
  /// Open (or create) a database at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let backend = Self { conn };
    backend.init_schema().await?;
    Ok(backend)
  }

  /// Open an in-memory database.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let backend = Self { conn };
    backend.init_schema().await?;
    Ok(backend)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  /// Number of stored keys.
  pub async fn len(&self) -> Result<usize> {
    let count: i64 = self
      .conn
      .call(|conn| {
        Ok(conn.query_row("SELECT COUNT(*) FROM entries", [], |r| r.get(0))?)
      })
      .await?;
    Ok(usize::try_from(count).unwrap_or_default())
  }

  pub async fn is_empty(&self) -> Result<bool> { Ok(self.len().await? == 0) }
}

// ─── PreferenceBackend impl ──────────────────────────────────────────────────

impl PreferenceBackend for SqliteBackend {
  type Error = Error;

  async fn get(&self, key: &str) -> Result<Option<String>> {
    let key = key.to_owned();
    let value = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              "SELECT value FROM entries WHERE key = ?1",
              rusqlite::params![key],
              |r| r.get::<_, String>(0),
            )
            .optional()?,
        )
      })
      .await?;
    Ok(value)
  }

  async fn set(&self, key: &str, value: String) -> Result<()> {
    let key = key.to_owned();
    let updated_at = Utc::now().to_rfc3339();
    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO entries (key, value, updated_at) VALUES (?1, ?2, ?3)
           ON CONFLICT(key) DO UPDATE SET
             value      = excluded.value,
             updated_at = excluded.updated_at",
          rusqlite::params![key, value, updated_at],
        )?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  async fn remove(&self, key: &str) -> Result<()> {
    let key = key.to_owned();
    self
      .conn
      .call(move |conn| {
        conn.execute("DELETE FROM entries WHERE key = ?1", rusqlite::params![key])?;
        Ok(())
      })
      .await?;
    Ok(())
  }
}
