//! Announcement definitions: the candidates the engine decides between.
//!
//! A definition is delivered by the feed and is immutable for the lifetime of
//! a fetch cycle. Everything the engine learns about a user lives in
//! [`crate::preference::UserPreferenceState`], never on the definition.

use std::{collections::BTreeSet, fmt, str::FromStr};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{Error, Result};

// ─── Status and priority ─────────────────────────────────────────────────────

/// Editorial status of an announcement. Only `Active` is ever displayed.
#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  Hash,
  Serialize,
  Deserialize,
  strum::Display,
  strum::EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum AnnouncementStatus {
  Draft,
  Active,
  Inactive,
  Expired,
}

/// Display precedence. The derived `Ord` follows declaration order, so
/// `Critical < High < Medium < Low < Info` and smaller sorts first.
#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  PartialOrd,
  Ord,
  Hash,
  Default,
  Serialize,
  Deserialize,
  strum::Display,
  strum::EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Priority {
  Critical,
  High,
  #[default]
  Medium,
  Low,
  Info,
}

// ─── Time of day ─────────────────────────────────────────────────────────────

/// A wall-clock time parsed from an `"HH:MM"` string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct TimeOfDay {
  hour:   u8,
  minute: u8,
}

impl TimeOfDay {
  pub fn new(hour: u8, minute: u8) -> Option<Self> {
    (hour < 24 && minute < 60).then_some(Self { hour, minute })
  }

  /// Minutes elapsed since midnight.
  pub fn minutes(self) -> u32 { u32::from(self.hour) * 60 + u32::from(self.minute) }
}

impl FromStr for TimeOfDay {
  type Err = Error;

  /// Accepts `H:MM` or `HH:MM`; anything else is rejected.
  fn from_str(s: &str) -> Result<Self> {
    let invalid = || Error::InvalidTime(s.to_owned());

    let (h, m) = s.trim().split_once(':').ok_or_else(invalid)?;
    let digits = |part: &str| !part.is_empty() && part.bytes().all(|b| b.is_ascii_digit());
    if !digits(h) || h.len() > 2 || !digits(m) || m.len() != 2 {
      return Err(invalid());
    }

    let hour = h.parse::<u8>().map_err(|_| invalid())?;
    let minute = m.parse::<u8>().map_err(|_| invalid())?;
    Self::new(hour, minute).ok_or_else(invalid)
  }
}

impl fmt::Display for TimeOfDay {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{:02}:{:02}", self.hour, self.minute)
  }
}

// ─── Schedule ────────────────────────────────────────────────────────────────

/// A recurring daily display window.
///
/// Times are kept as the raw strings from the feed so that a malformed value
/// disables only this window check instead of rejecting the whole feed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DisplayTimes {
  pub start_time:   String,
  pub end_time:     String,
  /// 0 = Sunday … 6 = Saturday.
  pub days_of_week: BTreeSet<u8>,
}

impl DisplayTimes {
  /// A window open every day of the week.
  pub fn daily(start_time: &str, end_time: &str) -> Self {
    Self {
      start_time:   start_time.to_owned(),
      end_time:     end_time.to_owned(),
      days_of_week: (0..7).collect(),
    }
  }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Schedule {
  pub start_date:            DateTime<Utc>,
  #[serde(default)]
  pub end_date:              Option<DateTime<Utc>>,
  #[serde(default)]
  pub display_times:         Option<DisplayTimes>,
  /// Per-user cap on how many times this announcement may be displayed.
  #[serde(default)]
  pub max_displays_per_user: Option<u32>,
  /// Minimum delay after a non-permanent dismissal before it may return.
  #[serde(default)]
  pub cooldown_period_hours: Option<f64>,
}

impl Schedule {
  /// An open-ended schedule with no window, cap, or cooldown.
  pub fn starting(start_date: DateTime<Utc>) -> Self {
    Self {
      start_date,
      end_date: None,
      display_times: None,
      max_displays_per_user: None,
      cooldown_period_hours: None,
    }
  }
}

// ─── Presentation payload ────────────────────────────────────────────────────

/// Text and media shown in the banner. Opaque to eligibility.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnnouncementContent {
  pub title:     String,
  pub message:   String,
  #[serde(default)]
  pub image_url: Option<String>,
}

/// What an action button does. A closed set, dispatched by the engine to
/// statically known handlers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ActionKind {
  /// Navigate the host to `url`.
  Link {
    url:     String,
    #[serde(default)]
    new_tab: bool,
  },
  /// Dismiss the owning announcement.
  Dismiss {
    #[serde(default)]
    permanent: bool,
  },
  /// Advance the rotation to the next announcement.
  Rotate,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnnouncementAction {
  pub label: String,
  pub kind:  ActionKind,
}

// ─── Definition ──────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnnouncementDefinition {
  pub id:         String,
  pub status:     AnnouncementStatus,
  pub priority:   Priority,
  /// Free-form targeting bucket; users can opt out per category.
  pub category:   String,
  pub schedule:   Schedule,
  /// Sort tie-break: newer announcements come first.
  pub created_at: DateTime<Utc>,
  #[serde(default)]
  pub content:    AnnouncementContent,
  #[serde(default)]
  pub actions:    Vec<AnnouncementAction>,
}

impl AnnouncementDefinition {
  /// Convenience constructor: an active announcement in the `general`
  /// category with empty content and no actions.
  pub fn new(
    id: impl Into<String>,
    priority: Priority,
    schedule: Schedule,
    created_at: DateTime<Utc>,
  ) -> Self {
    Self {
      id: id.into(),
      status: AnnouncementStatus::Active,
      priority,
      category: "general".to_owned(),
      schedule,
      created_at,
      content: AnnouncementContent::default(),
      actions: Vec::new(),
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn priority_order_is_critical_first() {
    let mut all = vec![
      Priority::Info,
      Priority::Low,
      Priority::Critical,
      Priority::Medium,
      Priority::High,
    ];
    all.sort();
    assert_eq!(all, vec![
      Priority::Critical,
      Priority::High,
      Priority::Medium,
      Priority::Low,
      Priority::Info,
    ]);
  }

  #[test]
  fn parses_valid_times() {
    assert_eq!("09:30".parse::<TimeOfDay>().unwrap().minutes(), 570);
    assert_eq!("9:05".parse::<TimeOfDay>().unwrap().minutes(), 545);
    assert_eq!("23:59".parse::<TimeOfDay>().unwrap().minutes(), 1439);
    assert_eq!("00:00".parse::<TimeOfDay>().unwrap().to_string(), "00:00");
  }

  #[test]
  fn rejects_malformed_times() {
    for bad in ["", "24:00", "12:60", "12", "12:5", "ab:cd", "-1:00", "12:00:00", "123:00"] {
      assert!(bad.parse::<TimeOfDay>().is_err(), "accepted {bad:?}");
    }
  }

  #[test]
  fn deserializes_feed_record() {
    let json = r#"{
      "id": "spring-sale",
      "status": "active",
      "priority": "high",
      "category": "promotions",
      "schedule": {
        "startDate": "2024-03-01T00:00:00Z",
        "endDate": "2024-03-31T23:59:59Z",
        "displayTimes": { "startTime": "09:00", "endTime": "17:00", "daysOfWeek": [1, 2, 3, 4, 5] },
        "maxDisplaysPerUser": 3,
        "cooldownPeriodHours": 24
      },
      "createdAt": "2024-02-20T12:00:00Z",
      "content": { "title": "Spring sale", "message": "20% off" },
      "actions": [
        { "label": "Shop", "kind": { "type": "link", "url": "https://example.com/sale" } },
        { "label": "Not now", "kind": { "type": "dismiss" } }
      ]
    }"#;

    let def: AnnouncementDefinition = serde_json::from_str(json).unwrap();
    assert_eq!(def.status, AnnouncementStatus::Active);
    assert_eq!(def.priority, Priority::High);
    assert_eq!(def.schedule.max_displays_per_user, Some(3));
    assert_eq!(def.schedule.cooldown_period_hours, Some(24.0));
    let window = def.schedule.display_times.as_ref().unwrap();
    assert_eq!(window.days_of_week.len(), 5);
    assert_eq!(def.actions[0].kind, ActionKind::Link {
      url:     "https://example.com/sale".into(),
      new_tab: false,
    });
    assert_eq!(def.actions[1].kind, ActionKind::Dismiss { permanent: false });
  }

  #[test]
  fn optional_schedule_fields_default_to_none() {
    let json = r#"{
      "id": "a", "status": "draft", "priority": "info", "category": "news",
      "schedule": { "startDate": "2024-01-01T00:00:00Z" },
      "createdAt": "2024-01-01T00:00:00Z"
    }"#;
    let def: AnnouncementDefinition = serde_json::from_str(json).unwrap();
    assert!(def.schedule.end_date.is_none());
    assert!(def.schedule.display_times.is_none());
    assert!(def.actions.is_empty());
    assert_eq!(def.content, AnnouncementContent::default());
  }

  #[test]
  fn status_round_trips_through_strum() {
    assert_eq!("expired".parse::<AnnouncementStatus>().unwrap(), AnnouncementStatus::Expired);
    assert_eq!(Priority::Critical.to_string(), "critical");
  }
}
