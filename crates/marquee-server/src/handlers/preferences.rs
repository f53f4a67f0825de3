//! Handlers for `/preferences`.
//!
//! | Method   | Path | Notes |
//! |----------|------|-------|
//! | `GET`    | `/preferences` | Current [`UserPreferenceState`] |
//! | `PATCH`  | `/preferences` | Body: [`PreferencesBody`]; returns the new state |
//! | `DELETE` | `/preferences` | Forget everything, permanent dismissals included |

use std::collections::BTreeMap;

use axum::{Json, extract::State, http::StatusCode};
use marquee_core::{
  preference::{PreferencePatch, UserPreferenceState},
  store::PreferenceBackend,
};
use serde::Deserialize;

use crate::AppState;

/// `GET /preferences`
pub async fn show<B>(State(state): State<AppState<B>>) -> Json<UserPreferenceState>
where
  B: PreferenceBackend + 'static,
{
  Json(state.banner.lock().await.preferences().clone())
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PreferencesBody {
  pub globally_disabled: Option<bool>,
  /// Category name to enabled flag.
  #[serde(default)]
  pub categories:        BTreeMap<String, bool>,
}

impl PreferencesBody {
  fn into_patches(self) -> Vec<PreferencePatch> {
    self
      .globally_disabled
      .map(PreferencePatch::SetGloballyDisabled)
      .into_iter()
      .chain(
        self
          .categories
          .into_iter()
          .map(|(category, enabled)| PreferencePatch::SetCategoryEnabled { category, enabled }),
      )
      .collect()
  }
}

/// `PATCH /preferences`
pub async fn update<B>(
  State(state): State<AppState<B>>,
  Json(body): Json<PreferencesBody>,
) -> Json<UserPreferenceState>
where
  B: PreferenceBackend + 'static,
{
  let mut banner = state.banner.lock().await;
  banner.update_preferences(&body.into_patches()).await;
  Json(banner.preferences().clone())
}

/// `DELETE /preferences`
pub async fn clear<B>(State(state): State<AppState<B>>) -> StatusCode
where
  B: PreferenceBackend + 'static,
{
  state.banner.lock().await.clear_preferences().await;
  StatusCode::NO_CONTENT
}
