//! Announcement feed sources and background polling.
//!
//! Fetching itself (HTTP, CMS, ...) belongs to the host. The engine only needs
//! something that can produce the current list on demand.

use std::{
  future::Future,
  path::{Path, PathBuf},
  time::Duration,
};

use marquee_core::{announcement::AnnouncementDefinition, store::PreferenceBackend};
use tokio::{task::JoinHandle, time::MissedTickBehavior};
use tracing::{debug, warn};

use crate::{Error, Result, banner::SharedBanner};

// ─── Sources ─────────────────────────────────────────────────────────────────

pub trait FeedSource: Send + Sync {
  /// Produce the full current list of announcements.
  fn fetch(&self) -> impl Future<Output = Result<Vec<AnnouncementDefinition>>> + Send + '_;
}

/// A fixed list.
#[derive(Debug, Clone, Default)]
pub struct StaticFeed {
  announcements: Vec<AnnouncementDefinition>,
}

impl StaticFeed {
  pub fn new(announcements: Vec<AnnouncementDefinition>) -> Self { Self { announcements } }
}

impl FeedSource for StaticFeed {
  async fn fetch(&self) -> Result<Vec<AnnouncementDefinition>> { Ok(self.announcements.clone()) }
}

/// A JSON array of announcement definitions on disk, re-read on every fetch.
#[derive(Debug, Clone)]
pub struct FileFeed {
  path: PathBuf,
}

impl FileFeed {
  pub fn new(path: impl Into<PathBuf>) -> Self { Self { path: path.into() } }

  pub fn path(&self) -> &Path { &self.path }
}

impl FeedSource for FileFeed {
  async fn fetch(&self) -> Result<Vec<AnnouncementDefinition>> {
    let raw = tokio::fs::read_to_string(&self.path)
      .await
      .map_err(|source| Error::FeedIo { path: self.path.clone(), source })?;
    decode_feed(&raw)
  }
}

/// Decode a JSON array of announcement definitions.
///
/// Only a document that is not a JSON array fails as a whole. Records that do
/// not decode are skipped with a warning, so one bad announcement never hides
/// the rest of the feed.
pub fn decode_feed(raw: &str) -> Result<Vec<AnnouncementDefinition>> {
  let records: Vec<serde_json::Value> = serde_json::from_str(raw)?;
  let total = records.len();

  let feed: Vec<AnnouncementDefinition> = records
    .into_iter()
    .enumerate()
    .filter_map(|(index, record)| {
      let id = record.get("id").and_then(|v| v.as_str()).map(str::to_owned);
      match serde_json::from_value(record) {
        Ok(announcement) => Some(announcement),
        Err(e) => {
          warn!(index, id = ?id, error = %e, "skipping malformed announcement");
          None
        }
      }
    })
    .collect();

  if feed.len() < total {
    debug!(kept = feed.len(), total, "decoded feed with skipped records");
  }
  Ok(feed)
}

// ─── Polling ─────────────────────────────────────────────────────────────────

/// A background task that is aborted when the handle is dropped.
#[derive(Debug)]
pub struct TaskHandle(JoinHandle<()>);

impl TaskHandle {
  pub(crate) fn new(handle: JoinHandle<()>) -> Self { Self(handle) }

  pub fn abort(&self) { self.0.abort(); }

  pub fn is_finished(&self) -> bool { self.0.is_finished() }
}

impl Drop for TaskHandle {
  fn drop(&mut self) { self.0.abort(); }
}

/// Fetch from `source` immediately and then every `every`.
///
/// A failed fetch leaves the banner's current feed untouched and is reported
/// through `on_error`. Each successful fetch also serves as the coarse
/// schedule-boundary check when no rotation timer is running.
pub fn spawn_feed_poller<B, F>(banner: SharedBanner<B>, source: F, every: Duration) -> TaskHandle
where
  B: PreferenceBackend + 'static,
  F: FeedSource + 'static,
{
  TaskHandle::new(tokio::spawn(async move {
    let mut ticker = tokio::time::interval(every);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    loop {
      ticker.tick().await;
      debug!("polling announcement feed");
      let fetched = source.fetch().await;
      let mut banner = banner.lock().await;
      match fetched {
        Ok(feed) => banner.set_feed(feed).await,
        Err(e) => banner.feed_error(e),
      }
    }
  }))
}

#[cfg(test)]
mod tests {
  use super::*;

  #[tokio::test]
  async fn file_feed_reads_json_array() {
    let dir = std::env::temp_dir().join(format!("marquee-feed-{}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    let path = dir.join("feed.json");
    std::fs::write(
      &path,
      r#"[{
        "id": "a", "status": "active", "priority": "low", "category": "news",
        "schedule": { "startDate": "2024-01-01T00:00:00Z" },
        "createdAt": "2024-01-01T00:00:00Z"
      }]"#,
    )
    .unwrap();

    let feed = FileFeed::new(&path).fetch().await.unwrap();
    assert_eq!(feed.len(), 1);
    assert_eq!(feed[0].id, "a");

    std::fs::write(&path, "not json").unwrap();
    assert!(matches!(FileFeed::new(&path).fetch().await, Err(Error::FeedFormat(_))));

    let _ = std::fs::remove_dir_all(&dir);
  }

  #[test]
  fn malformed_record_is_skipped_not_fatal() {
    let feed = decode_feed(
      r#"[
        {
          "id": "good", "status": "active", "priority": "high", "category": "news",
          "schedule": { "startDate": "2024-01-01T00:00:00Z" },
          "createdAt": "2024-01-01T00:00:00Z"
        },
        { "id": "bad-date", "schedule": { "startDate": "next tuesday" } },
        {
          "id": "bad-window", "status": "active", "priority": "low", "category": "news",
          "schedule": {
            "startDate": "2024-01-01T00:00:00Z",
            "displayTimes": { "startTime": 900, "endTime": "17:00", "daysOfWeek": [-1] }
          },
          "createdAt": "2024-01-01T00:00:00Z"
        },
        42
      ]"#,
    )
    .unwrap();

    let ids: Vec<_> = feed.iter().map(|a| a.id.as_str()).collect();
    assert_eq!(ids, ["good"]);
  }

  #[test]
  fn non_array_document_is_a_format_error() {
    assert!(matches!(decode_feed(r#"{"id": "a"}"#), Err(Error::FeedFormat(_))));
    assert!(matches!(decode_feed(""), Err(Error::FeedFormat(_))));
  }

  #[tokio::test]
  async fn missing_file_is_an_io_error() {
    let result = FileFeed::new("/definitely/not/here.json").fetch().await;
    assert!(matches!(result, Err(Error::FeedIo { .. })));
  }
}
