//! The eligibility filter: which announcements may be shown to this user now.
//!
//! Combines the announcement's status and schedule with the user's persisted
//! preferences. Pure; it never mutates either input.

use chrono::{DateTime, TimeDelta, TimeZone, Utc};

use crate::{
  announcement::{AnnouncementDefinition, AnnouncementStatus},
  preference::UserPreferenceState,
  schedule::is_scheduled,
};

/// The first rule an announcement failed, in evaluation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display)]
#[strum(serialize_all = "snake_case")]
pub enum Ineligibility {
  NotActive,
  GloballyDisabled,
  Dismissed,
  CategoryDisabled,
  FrequencyCapReached,
  CoolingDown,
  OutsideSchedule,
}

/// Switches that change which rules apply.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FilterOptions {
  /// When `false`, only status and schedule are checked; every preference
  /// rule (global opt-out, dismissal, category, cap, cooldown) is skipped.
  pub respect_user_preferences: bool,
}

impl Default for FilterOptions {
  fn default() -> Self { Self { respect_user_preferences: true } }
}

/// Evaluate every rule for `announcement`, returning the first one it fails.
pub fn check<Tz: TimeZone>(
  announcement: &AnnouncementDefinition,
  prefs: &UserPreferenceState,
  now: &DateTime<Tz>,
  options: FilterOptions,
) -> Result<(), Ineligibility> {
  if announcement.status != AnnouncementStatus::Active {
    return Err(Ineligibility::NotActive);
  }

  if options.respect_user_preferences {
    check_preferences(announcement, prefs, &now.with_timezone(&Utc))?;
  }

  if !is_scheduled(&announcement.schedule, now) {
    return Err(Ineligibility::OutsideSchedule);
  }
  Ok(())
}

fn check_preferences(
  announcement: &AnnouncementDefinition,
  prefs: &UserPreferenceState,
  now: &DateTime<Utc>,
) -> Result<(), Ineligibility> {
  let id = announcement.id.as_str();
  let schedule = &announcement.schedule;

  if prefs.globally_disabled {
    return Err(Ineligibility::GloballyDisabled);
  }
  if prefs.is_dismissed(id) {
    return Err(Ineligibility::Dismissed);
  }
  if !prefs.category_enabled(&announcement.category) {
    return Err(Ineligibility::CategoryDisabled);
  }
  if schedule
    .max_displays_per_user
    .is_some_and(|cap| prefs.display_count(id) >= cap)
  {
    return Err(Ineligibility::FrequencyCapReached);
  }
  if let (Some(hours), Some(dismissed_at)) =
    (schedule.cooldown_period_hours, prefs.last_dismissal_at.get(id))
    && *now - *dismissed_at < cooldown(hours)
  {
    return Err(Ineligibility::CoolingDown);
  }
  Ok(())
}

/// Fractional hours as a duration, to millisecond precision.
///
/// Zero, negative and NaN hours mean no cooldown; anything too large for a
/// `TimeDelta` saturates to `TimeDelta::MAX`.
fn cooldown(hours: f64) -> TimeDelta {
  if hours.is_nan() || hours <= 0.0 {
    return TimeDelta::zero();
  }
  TimeDelta::try_milliseconds((hours * 3_600_000.0) as i64).unwrap_or(TimeDelta::MAX)
}

pub fn is_eligible<Tz: TimeZone>(
  announcement: &AnnouncementDefinition,
  prefs: &UserPreferenceState,
  now: &DateTime<Tz>,
  options: FilterOptions,
) -> bool {
  check(announcement, prefs, now, options).is_ok()
}

/// The eligible subset of `defs`, in input order.
pub fn filter<'a, Tz: TimeZone>(
  defs: &'a [AnnouncementDefinition],
  prefs: &UserPreferenceState,
  now: &DateTime<Tz>,
  options: FilterOptions,
) -> Vec<&'a AnnouncementDefinition> {
  defs
    .iter()
    .filter(|a| is_eligible(a, prefs, now, options))
    .collect()
}
