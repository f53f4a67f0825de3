//! HTTP surface for a Marquee banner.
//!
//! Exposes an axum [`Router`] over one [`SharedBanner`]: the host polls
//! `GET /banner` to render, and reports hover, visibility, dismissals and
//! action clicks back through the other endpoints. Preference toggles live
//! under `/preferences`.

pub mod error;
pub mod events;
pub mod handlers;

pub use error::ApiError;
pub use events::LoggingEvents;

use std::path::PathBuf;

use axum::{
  Router,
  routing::{get, post},
};
use marquee_core::{config::BannerConfig, store::PreferenceBackend};
use marquee_engine::SharedBanner;
use serde::Deserialize;
use tower_http::trace::TraceLayer;

use handlers::{announcements, banner, preferences};

// ─── Configuration ────────────────────────────────────────────────────────────

/// Runtime server configuration, deserialised from `config.toml`.
#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
  pub host:              String,
  pub port:              u16,
  /// SQLite database holding persisted preferences.
  pub store_path:        PathBuf,
  /// JSON array of announcement definitions, re-read on every refresh.
  pub feed_path:         PathBuf,
  #[serde(default = "default_feed_refresh_secs")]
  pub feed_refresh_secs: u64,
  #[serde(default)]
  pub banner:            BannerConfig,
}

fn default_feed_refresh_secs() -> u64 { 60 }

// ─── Application state ────────────────────────────────────────────────────────

/// Shared state threaded through all axum handlers.
pub struct AppState<B> {
  pub banner: SharedBanner<B>,
}

impl<B> AppState<B> {
  pub fn new(banner: SharedBanner<B>) -> Self { Self { banner } }
}

impl<B> Clone for AppState<B> {
  fn clone(&self) -> Self { Self { banner: self.banner.clone() } }
}

// ─── Router ───────────────────────────────────────────────────────────────────

/// Build an axum [`Router`] for the banner server.
pub fn router<B>(state: AppState<B>) -> Router
where
  B: PreferenceBackend + 'static,
{
  Router::new()
    // Banner
    .route("/banner", get(banner::show::<B>))
    .route("/banner/pause", post(banner::pause::<B>))
    .route("/banner/resume", post(banner::resume::<B>))
    .route("/banner/next", post(banner::next::<B>))
    .route("/banner/prev", post(banner::prev::<B>))
    .route("/banner/goto/{index}", post(banner::goto::<B>))
    // Announcements
    .route("/announcements/{id}/dismiss", post(announcements::dismiss::<B>))
    .route("/announcements/{id}/visibility", post(announcements::visibility::<B>))
    .route("/announcements/{id}/actions/{index}", post(announcements::perform::<B>))
    // Preferences
    .route(
      "/preferences",
      get(preferences::show::<B>)
        .patch(preferences::update::<B>)
        .delete(preferences::clear::<B>),
    )
    .layer(TraceLayer::new_for_http())
    .with_state(state)
}

// ─── Integration tests ────────────────────────────────────────────────────────
