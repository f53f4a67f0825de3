//! Host-facing configuration for a banner.
//!
//! Every field has a default so a partial `[banner]` table (or none at all)
//! deserialises cleanly.

use std::time::Duration;

use chrono::{FixedOffset, Offset, Utc};
use serde::{Deserialize, Serialize};

use crate::{eligibility::FilterOptions, sort::StackDirection};

/// Shortest rotation period accepted; smaller values are raised to this.
pub const MIN_ROTATION_INTERVAL_MS: u64 = 250;

/// Where the host renders the banner. Presentation only.
#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  Default,
  Serialize,
  Deserialize,
  strum::Display,
  strum::EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Position {
  #[default]
  Top,
  Bottom,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BannerConfig {
  pub position:                 Position,
  /// How many announcements may be shown at once. Zero is treated as one.
  pub max_visible:              usize,
  pub stack_direction:          StackDirection,
  pub auto_rotate:              bool,
  pub rotation_interval_ms:     u64,
  pub respect_user_preferences: bool,
  pub enable_persistence:       bool,
  /// Backend key holding the serialised preference state.
  pub storage_key:              String,
  /// Offset used for daily display windows and weekdays.
  pub utc_offset_minutes:       i32,
}

impl Default for BannerConfig {
  fn default() -> Self {
    Self {
      position:                 Position::Top,
      max_visible:              1,
      stack_direction:          StackDirection::PriorityFirst,
      auto_rotate:              true,
      rotation_interval_ms:     5_000,
      respect_user_preferences: true,
      enable_persistence:       true,
      storage_key:              "marquee:preferences".to_owned(),
      utc_offset_minutes:       0,
    }
  }
}

impl BannerConfig {
  pub fn max_visible(&self) -> usize { self.max_visible.max(1) }

  pub fn rotation_interval(&self) -> Duration {
    Duration::from_millis(self.rotation_interval_ms.max(MIN_ROTATION_INTERVAL_MS))
  }

  /// The evaluation time zone. Out-of-range offsets fall back to UTC.
  pub fn time_zone(&self) -> FixedOffset {
    self
      .utc_offset_minutes
      .checked_mul(60)
      .and_then(FixedOffset::east_opt)
      .unwrap_or_else(|| Utc.fix())
  }

  pub fn filter_options(&self) -> FilterOptions {
    FilterOptions { respect_user_preferences: self.respect_user_preferences }
  }
}
