//! [`ViewTracker`]: turns raw visibility reports into at-most-once views.
//!
//! The host reports how much of each mounted announcement is on screen. An
//! announcement counts as viewed the first time at least half of it is
//! visible. Reports are accepted only while the announcement is observed,
//! i.e. while it is in the visible window; once rotation moves away, its
//! observation is disconnected and late reports are dropped.

use std::collections::HashSet;

use tracing::debug;

/// Minimum visible fraction for a report to count as a view.
pub const VISIBILITY_THRESHOLD: f64 = 0.5;

#[derive(Debug, Default, Clone)]
pub struct ViewTracker {
  observed: HashSet<String>,
  /// Viewed during this session; never cleared except by a new tracker.
  seen:     HashSet<String>,
}

impl ViewTracker {
  pub fn new() -> Self { Self::default() }

  pub fn observe(&mut self, id: &str) { self.observed.insert(id.to_owned()); }

  pub fn disconnect(&mut self, id: &str) { self.observed.remove(id); }

  pub fn disconnect_all(&mut self) { self.observed.clear(); }

  pub fn is_observing(&self, id: &str) -> bool { self.observed.contains(id) }

  pub fn has_seen(&self, id: &str) -> bool { self.seen.contains(id) }

  /// Record that `ratio` of `id` is visible. Returns `true` exactly once per
  /// id per session: on the first report at or above the threshold.
  pub fn report(&mut self, id: &str, ratio: f64) -> bool {
    if !self.observed.contains(id) {
      debug!(id, "visibility report for unobserved announcement ignored");
      return false;
    }
    if ratio.is_nan() || ratio < VISIBILITY_THRESHOLD {
      return false;
    }
    self.seen.insert(id.to_owned())
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn first_crossing_counts_once() {
    let mut views = ViewTracker::new();
    views.observe("a");

    assert!(!views.report("a", 0.2));
    assert!(views.report("a", 0.5));
    assert!(!views.report("a", 1.0));
    assert!(!views.report("a", 0.0));
    assert!(!views.report("a", 0.9));
    assert!(views.has_seen("a"));
  }

  #[test]
  fn unobserved_reports_are_ignored() {
    let mut views = ViewTracker::new();
    assert!(!views.report("a", 1.0));

    views.observe("a");
    views.disconnect("a");
    assert!(!views.report("a", 1.0));
    assert!(!views.has_seen("a"));
  }

  #[test]
  fn reobserving_a_seen_id_does_not_count_again() {
    let mut views = ViewTracker::new();
    views.observe("a");
    assert!(views.report("a", 0.75));

    views.disconnect_all();
    views.observe("a");
    assert!(!views.report("a", 0.75));
  }

  #[test]
  fn nan_ratio_is_not_a_view() {
    let mut views = ViewTracker::new();
    views.observe("a");
    assert!(!views.report("a", f64::NAN));
  }
}
