//! marquee server binary.
//!
//! Reads `config.toml` (or the path specified with `--config`), opens the
//! SQLite preference store, polls the announcement feed file and serves the
//! banner over HTTP.

use std::{
  path::{Path, PathBuf},
  time::Duration,
};

use anyhow::Context as _;
use clap::Parser;
use marquee_engine::{
  Banner,
  driver::spawn_rotation_timer,
  feed::{FileFeed, spawn_feed_poller},
};
use marquee_server::{AppState, LoggingEvents, ServerConfig};
use marquee_store_sqlite::SqliteBackend;
use tokio::net::TcpListener;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about = "Marquee announcement banner server")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, default_value = "config.toml")]
  config: PathBuf,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  // Initialise tracing.
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .init();

  let cli = Cli::parse();

  // Load configuration. Nested keys use `__`, e.g. `MARQUEE_BANNER__MAX_VISIBLE`.
  let settings = config::Config::builder()
    .add_source(config::File::from(cli.config).required(false))
    .add_source(config::Environment::with_prefix("MARQUEE").separator("__"))
    .build()
    .context("failed to read config file")?;

  let server_cfg: ServerConfig = settings
    .try_deserialize()
    .context("failed to deserialise ServerConfig")?;

  let store_path = expand_tilde(&server_cfg.store_path);
  let feed_path = expand_tilde(&server_cfg.feed_path);

  // Open SQLite store.
  let backend = SqliteBackend::open(&store_path)
    .await
    .with_context(|| format!("failed to open store at {store_path:?}"))?;

  // Mount the banner; the poller's first fetch fills the feed.
  let mut banner = Banner::new(server_cfg.banner.clone(), backend).with_events(LoggingEvents);
  banner.mount().await;
  let banner = banner.into_shared();

  let _poller = spawn_feed_poller(
    banner.clone(),
    FileFeed::new(feed_path),
    Duration::from_secs(server_cfg.feed_refresh_secs.max(1)),
  );
  let _rotation = spawn_rotation_timer(banner.clone()).await;

  let app = marquee_server::router(AppState::new(banner));
  let address = format!("{}:{}", server_cfg.host, server_cfg.port);

  tracing::info!("Listening on http://{address}");
  let listener = TcpListener::bind(&address)
    .await
    .with_context(|| format!("failed to bind {address}"))?;

  axum::serve(listener, app).await.context("server error")?;

  Ok(())
}

/// Expand a leading `~` to the user's home directory.
fn expand_tilde(path: &Path) -> PathBuf {
  let s = path.to_string_lossy();
  if let Some(rest) = s.strip_prefix("~/")
    && let Ok(home) = std::env::var("HOME")
  {
    return PathBuf::from(home).join(rest);
  }
  path.to_path_buf()
}
