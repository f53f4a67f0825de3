//! Handlers for `/announcements/{id}` endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `POST` | `/announcements/{id}/dismiss` | Body: `{"permanent": bool}`; returns the snapshot |
//! | `POST` | `/announcements/{id}/visibility` | Body: `{"ratio": f64}`; returns `{"viewed": bool}` |
//! | `POST` | `/announcements/{id}/actions/{index}` | Returns an [`ActionOutcome`] |

use axum::{
  Json,
  extract::{Path, State},
};
use marquee_core::store::PreferenceBackend;
use marquee_engine::{ActionOutcome, BannerSnapshot};
use serde::{Deserialize, Serialize};

use crate::{AppState, error::ApiError};

// ─── Dismiss ──────────────────────────────────────────────────────────────────

#[derive(Debug, Default, Deserialize)]
pub struct DismissBody {
  #[serde(default)]
  pub permanent: bool,
}

/// `POST /announcements/{id}/dismiss`
pub async fn dismiss<B>(
  State(state): State<AppState<B>>,
  Path(id): Path<String>,
  Json(body): Json<DismissBody>,
) -> Result<Json<BannerSnapshot>, ApiError>
where
  B: PreferenceBackend + 'static,
{
  let mut banner = state.banner.lock().await;
  if !banner.dismiss(&id, body.permanent).await {
    return Err(ApiError::NotFound(format!("announcement {id}")));
  }
  Ok(Json(banner.snapshot()))
}

// ─── Visibility ───────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct VisibilityBody {
  /// Fraction of the announcement on screen, `0.0..=1.0`.
  pub ratio: f64,
}

#[derive(Debug, Serialize)]
pub struct VisibilityResponse {
  /// Whether this report counted as the session's view.
  pub viewed: bool,
}

/// `POST /announcements/{id}/visibility`
pub async fn visibility<B>(
  State(state): State<AppState<B>>,
  Path(id): Path<String>,
  Json(body): Json<VisibilityBody>,
) -> Result<Json<VisibilityResponse>, ApiError>
where
  B: PreferenceBackend + 'static,
{
  if !(0.0..=1.0).contains(&body.ratio) {
    return Err(ApiError::BadRequest(format!("ratio {} is outside 0..=1", body.ratio)));
  }
  let viewed = state.banner.lock().await.report_visibility(&id, body.ratio).await;
  Ok(Json(VisibilityResponse { viewed }))
}

// ─── Actions ──────────────────────────────────────────────────────────────────

/// `POST /announcements/{id}/actions/{index}`
pub async fn perform<B>(
  State(state): State<AppState<B>>,
  Path((id, index)): Path<(String, usize)>,
) -> Result<Json<ActionOutcome>, ApiError>
where
  B: PreferenceBackend + 'static,
{
  match state.banner.lock().await.perform_action(&id, index).await {
    ActionOutcome::Ignored => Err(ApiError::NotFound(format!("action {index} of {id}"))),
    outcome => Ok(Json(outcome)),
  }
}
