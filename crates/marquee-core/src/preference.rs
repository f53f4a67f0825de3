//! Per-user preference state and the patches that mutate it.
//!
//! State is never edited in place. Every change is expressed as a
//! [`PreferencePatch`] applied to the latest snapshot, which lets the engine
//! replay a patch against whatever another session persisted in the meantime.

use std::collections::{BTreeMap, BTreeSet};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::Result;

// ─── State ───────────────────────────────────────────────────────────────────

/// Everything the engine remembers about one user. Serialised as a single
/// JSON object; instants are RFC 3339 strings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct UserPreferenceState {
  /// Permanently suppressed announcements.
  pub dismissed_ids:        BTreeSet<String>,
  /// Announcements the user has actually looked at.
  pub seen_ids:             BTreeSet<String>,
  /// How many times each announcement entered the visible window.
  pub frequency_count:      BTreeMap<String, u32>,
  /// Last non-permanent dismissal, drives the cooldown rule.
  pub last_dismissal_at:    BTreeMap<String, DateTime<Utc>>,
  pub globally_disabled:    bool,
  /// Absent key means the category is enabled.
  pub category_preferences: BTreeMap<String, bool>,
}

impl UserPreferenceState {
  /// Parse a persisted blob. Anything unreadable yields the default state.
  pub fn decode(raw: &str) -> Self { serde_json::from_str(raw).unwrap_or_default() }

  pub fn encode(&self) -> Result<String> { Ok(serde_json::to_string(self)?) }

  pub fn is_dismissed(&self, id: &str) -> bool { self.dismissed_ids.contains(id) }

  pub fn display_count(&self, id: &str) -> u32 {
    self.frequency_count.get(id).copied().unwrap_or(0)
  }

  pub fn category_enabled(&self, category: &str) -> bool {
    self.category_preferences.get(category).copied().unwrap_or(true)
  }

  /// Apply `patch`, consuming `self` and returning the updated state.
  pub fn apply(mut self, patch: &PreferencePatch) -> Self {
    match patch {
      PreferencePatch::MarkSeen(id) => {
        self.seen_ids.insert(id.clone());
      }
      PreferencePatch::Dismiss(id) => {
        self.dismissed_ids.insert(id.clone());
      }
      PreferencePatch::RecordDismissal { id, at } => {
        self.last_dismissal_at.insert(id.clone(), *at);
      }
      PreferencePatch::RecordDisplay(id) => {
        let count = self.frequency_count.entry(id.clone()).or_insert(0);
        *count = count.saturating_add(1);
      }
      PreferencePatch::SetGloballyDisabled(disabled) => {
        self.globally_disabled = *disabled;
      }
      PreferencePatch::SetCategoryEnabled { category, enabled } => {
        self.category_preferences.insert(category.clone(), *enabled);
      }
    }
    self
  }
}

// ─── Patches ─────────────────────────────────────────────────────────────────

/// A single partial update to [`UserPreferenceState`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PreferencePatch {
  /// Add to `seen_ids`.
  MarkSeen(String),
  /// Add to `dismissed_ids` (permanent).
  Dismiss(String),
  /// Set `last_dismissal_at[id] = at` (session dismissal).
  RecordDismissal { id: String, at: DateTime<Utc> },
  /// Increment `frequency_count[id]`.
  RecordDisplay(String),
  SetGloballyDisabled(bool),
  SetCategoryEnabled { category: String, enabled: bool },
}

#[cfg(test)]
mod tests {
  use chrono::TimeZone;

  use super::*;

  #[test]
  fn corrupt_blob_decodes_to_default() {
    assert_eq!(UserPreferenceState::decode("{not json"), UserPreferenceState::default());
    assert_eq!(UserPreferenceState::decode(""), UserPreferenceState::default());
    assert_eq!(UserPreferenceState::decode("[1,2,3]"), UserPreferenceState::default());
  }

  #[test]
  fn partial_blob_fills_missing_fields() {
    let state = UserPreferenceState::decode(r#"{"dismissedIds":["a"]}"#);
    assert!(state.is_dismissed("a"));
    assert!(state.seen_ids.is_empty());
    assert!(!state.globally_disabled);
  }

  #[test]
  fn instants_are_stored_as_rfc3339() {
    let at = Utc.with_ymd_and_hms(2024, 5, 1, 8, 30, 0).unwrap();
    let state = UserPreferenceState::default()
      .apply(&PreferencePatch::RecordDismissal { id: "a".into(), at });

    let raw = state.encode().unwrap();
    assert!(raw.contains("\"lastDismissalAt\":{\"a\":\"2024-05-01T08:30:00Z\"}"), "{raw}");
    assert_eq!(UserPreferenceState::decode(&raw), state);
  }

  #[test]
  fn record_display_counts_up() {
    let state = UserPreferenceState::default()
      .apply(&PreferencePatch::RecordDisplay("a".into()))
      .apply(&PreferencePatch::RecordDisplay("a".into()));
    assert_eq!(state.display_count("a"), 2);
    assert_eq!(state.display_count("b"), 0);
  }

  #[test]
  fn category_defaults_to_enabled() {
    let state = UserPreferenceState::default().apply(&PreferencePatch::SetCategoryEnabled {
      category: "promotions".into(),
      enabled:  false,
    });
    assert!(!state.category_enabled("promotions"));
    assert!(state.category_enabled("news"));
  }
}
