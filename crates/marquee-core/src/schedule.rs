//! Schedule evaluation: is an announcement inside its display window at `now`?
//!
//! Pure and deterministic. The caller picks the time zone by choosing the
//! offset of `now`; the date bounds are absolute instants and compare the same
//! regardless of zone, while the daily window and weekday use `now`'s local
//! wall clock.

use chrono::{DateTime, Datelike, TimeZone, Timelike, Utc};

use crate::announcement::{DisplayTimes, Schedule, TimeOfDay};

/// Whether `schedule` permits display at `now`.
pub fn is_scheduled<Tz: TimeZone>(schedule: &Schedule, now: &DateTime<Tz>) -> bool {
  let instant = now.with_timezone(&Utc);

  if instant < schedule.start_date {
    return false;
  }
  if schedule.end_date.is_some_and(|end| instant > end) {
    return false;
  }

  match &schedule.display_times {
    Some(window) => {
      let minutes = now.hour() * 60 + now.minute();
      let weekday = now.weekday().num_days_from_sunday() as u8;
      window_contains(window, minutes, weekday)
    }
    None => true,
  }
}

/// Inclusive `[start, end]` minute check plus weekday membership.
///
/// A window whose start is later than its end (one that would cross midnight)
/// never matches; it is not wrapped around. Unparseable times never match.
pub fn window_contains(window: &DisplayTimes, minutes: u32, weekday: u8) -> bool {
  let (Ok(start), Ok(end)) = (
    window.start_time.parse::<TimeOfDay>(),
    window.end_time.parse::<TimeOfDay>(),
  ) else {
    return false;
  };

  if minutes < start.minutes() || minutes > end.minutes() {
    return false;
  }
  window.days_of_week.contains(&weekday)
}

#[cfg(test)]
mod tests {
  use chrono::{Duration, FixedOffset};

  use super::*;

  fn at(y: i32, mo: u32, d: u32, h: u32, mi: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(y, mo, d, h, mi, 0).unwrap()
  }

  // 2024-06-03 is a Monday.
  fn monday(h: u32, mi: u32) -> DateTime<Utc> { at(2024, 6, 3, h, mi) }

  fn windowed(start: &str, end: &str, days: &[u8]) -> Schedule {
    Schedule {
      display_times: Some(DisplayTimes {
        start_time:   start.into(),
        end_time:     end.into(),
        days_of_week: days.iter().copied().collect(),
      }),
      ..Schedule::starting(at(2024, 1, 1, 0, 0))
    }
  }

  #[test]
  fn before_start_is_not_scheduled() {
    let start = monday(12, 0);
    let schedule = Schedule::starting(start);
    assert!(!is_scheduled(&schedule, &(start - Duration::seconds(1))));
    assert!(is_scheduled(&schedule, &start));
  }

  #[test]
  fn after_end_is_not_scheduled() {
    let end = monday(12, 0);
    let schedule = Schedule {
      end_date: Some(end),
      ..Schedule::starting(at(2024, 1, 1, 0, 0))
    };
    assert!(is_scheduled(&schedule, &end));
    assert!(!is_scheduled(&schedule, &(end + Duration::seconds(1))));
  }

  #[test]
  fn window_bounds_are_inclusive() {
    let schedule = windowed("09:00", "17:00", &[1]);
    assert!(!is_scheduled(&schedule, &monday(8, 59)));
    assert!(is_scheduled(&schedule, &monday(9, 0)));
    assert!(is_scheduled(&schedule, &monday(17, 0)));
    assert!(!is_scheduled(&schedule, &monday(17, 1)));
  }

  #[test]
  fn weekday_must_be_listed() {
    let schedule = windowed("00:00", "23:59", &[0, 6]);
    assert!(!is_scheduled(&schedule, &monday(12, 0)));
    // 2024-06-09 is a Sunday.
    assert!(is_scheduled(&schedule, &at(2024, 6, 9, 12, 0)));
  }

  #[test]
  fn midnight_crossing_window_never_matches() {
    let schedule = windowed("22:00", "02:00", &[0, 1, 2, 3, 4, 5, 6]);
    for h in [0, 1, 2, 12, 22, 23] {
      assert!(!is_scheduled(&schedule, &monday(h, 0)), "matched at {h}:00");
    }
  }

  #[test]
  fn malformed_time_never_matches() {
    let schedule = windowed("9am", "17:00", &[1]);
    assert!(!is_scheduled(&schedule, &monday(12, 0)));
  }

  #[test]
  fn window_uses_local_wall_clock_of_now() {
    // 23:30 UTC Monday is 01:30 Tuesday at UTC+2.
    let schedule = windowed("01:00", "02:00", &[2]);
    let utc = monday(23, 30);
    let plus_two = utc.with_timezone(&FixedOffset::east_opt(2 * 3600).unwrap());
    assert!(!is_scheduled(&schedule, &utc));
    assert!(is_scheduled(&schedule, &plus_two));
  }
}
