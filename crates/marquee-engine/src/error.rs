//! Error type for `marquee-engine`.
//!
//! None of these reach the host as a failed call. Feed errors are delivered
//! through [`crate::BannerEvents::on_error`]; persistence errors are logged
//! and absorbed by the [`crate::PreferenceStore`].

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("failed to read feed {path:?}: {source}")]
  FeedIo {
    path:   PathBuf,
    #[source]
    source: std::io::Error,
  },

  #[error("malformed feed: {0}")]
  FeedFormat(#[from] serde_json::Error),

  #[error("feed source error: {0}")]
  FeedSource(#[source] Box<dyn std::error::Error + Send + Sync>),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
