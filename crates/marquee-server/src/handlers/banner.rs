//! Handlers for `/banner` endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/banner` | Current [`BannerSnapshot`] |
//! | `POST` | `/banner/pause` | Hover or focus entered |
//! | `POST` | `/banner/resume` | Hover or focus left |
//! | `POST` | `/banner/next` | Manual advance |
//! | `POST` | `/banner/prev` | Manual step back |
//! | `POST` | `/banner/goto/{index}` | Jump; restarts the rotation phase |
//!
//! Every endpoint responds with the snapshot after the change.

use axum::{
  Json,
  extract::{Path, State},
};
use marquee_core::store::PreferenceBackend;
use marquee_engine::BannerSnapshot;

use crate::AppState;

/// `GET /banner`
pub async fn show<B>(State(state): State<AppState<B>>) -> Json<BannerSnapshot>
where
  B: PreferenceBackend + 'static,
{
  Json(state.banner.lock().await.snapshot())
}

/// `POST /banner/pause`
pub async fn pause<B>(State(state): State<AppState<B>>) -> Json<BannerSnapshot>
where
  B: PreferenceBackend + 'static,
{
  let mut banner = state.banner.lock().await;
  banner.pause();
  Json(banner.snapshot())
}

/// `POST /banner/resume`
pub async fn resume<B>(State(state): State<AppState<B>>) -> Json<BannerSnapshot>
where
  B: PreferenceBackend + 'static,
{
  let mut banner = state.banner.lock().await;
  banner.resume();
  Json(banner.snapshot())
}

/// `POST /banner/next`
pub async fn next<B>(State(state): State<AppState<B>>) -> Json<BannerSnapshot>
where
  B: PreferenceBackend + 'static,
{
  let mut banner = state.banner.lock().await;
  banner.next().await;
  Json(banner.snapshot())
}

/// `POST /banner/prev`
pub async fn prev<B>(State(state): State<AppState<B>>) -> Json<BannerSnapshot>
where
  B: PreferenceBackend + 'static,
{
  let mut banner = state.banner.lock().await;
  banner.prev().await;
  Json(banner.snapshot())
}

/// `POST /banner/goto/{index}`
pub async fn goto<B>(
  State(state): State<AppState<B>>,
  Path(index): Path<usize>,
) -> Json<BannerSnapshot>
where
  B: PreferenceBackend + 'static,
{
  let mut banner = state.banner.lock().await;
  banner.goto(index).await;
  Json(banner.snapshot())
}
