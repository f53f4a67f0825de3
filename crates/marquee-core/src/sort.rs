//! Ordering of eligible announcements.

use std::cmp::Reverse;

use serde::{Deserialize, Serialize};

use crate::announcement::AnnouncementDefinition;

/// How a stack of eligible announcements is ordered.
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
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum StackDirection {
  /// Priority ascending (critical first), then newest first.
  #[default]
  PriorityFirst,
  NewestFirst,
  OldestFirst,
}

/// Order `eligible` according to `direction`.
///
/// Uses a stable sort, so items with equal keys keep their input order and
/// repeated passes over unchanged input produce identical output.
pub fn sort(
  mut eligible: Vec<&AnnouncementDefinition>,
  direction: StackDirection,
) -> Vec<&AnnouncementDefinition> {
  match direction {
    StackDirection::PriorityFirst => {
      eligible.sort_by_key(|a| (a.priority, Reverse(a.created_at)))
    }
    StackDirection::NewestFirst => eligible.sort_by_key(|a| Reverse(a.created_at)),
    StackDirection::OldestFirst => eligible.sort_by_key(|a| a.created_at),
  }
  eligible
}

#[cfg(test)]
mod tests {
  use chrono::{DateTime, TimeZone, Utc};

  use super::*;
  use crate::announcement::{Priority, Schedule};

  fn ts(secs: i64) -> DateTime<Utc> { Utc.timestamp_opt(secs, 0).unwrap() }

  fn def(id: &str, priority: Priority, created: i64) -> AnnouncementDefinition {
    AnnouncementDefinition::new(id, priority, Schedule::starting(ts(0)), ts(created))
  }

  fn ids(sorted: &[&AnnouncementDefinition]) -> Vec<String> {
    sorted.iter().map(|a| a.id.clone()).collect()
  }

  #[test]
  fn priority_first_breaks_ties_by_newest() {
    let defs = [
      def("low-old", Priority::Low, 10),
      def("crit", Priority::Critical, 5),
      def("low-new", Priority::Low, 20),
      def("info", Priority::Info, 30),
    ];
    let sorted = sort(defs.iter().collect(), StackDirection::PriorityFirst);
    assert_eq!(ids(&sorted), ["crit", "low-new", "low-old", "info"]);
  }

  #[test]
  fn newest_and_oldest_ignore_priority() {
    let defs = [
      def("b", Priority::Critical, 20),
      def("a", Priority::Info, 10),
      def("c", Priority::Low, 30),
    ];
    let newest = sort(defs.iter().collect(), StackDirection::NewestFirst);
    assert_eq!(ids(&newest), ["c", "b", "a"]);
    let oldest = sort(defs.iter().collect(), StackDirection::OldestFirst);
    assert_eq!(ids(&oldest), ["a", "b", "c"]);
  }

  #[test]
  fn equal_keys_keep_input_order() {
    let defs = [
      def("x", Priority::High, 10),
      def("y", Priority::High, 10),
      def("z", Priority::High, 10),
    ];
    let first = ids(&sort(defs.iter().collect(), StackDirection::PriorityFirst));
    let second = ids(&sort(defs.iter().collect(), StackDirection::PriorityFirst));
    assert_eq!(first, ["x", "y", "z"]);
    assert_eq!(first, second);
  }

  #[test]
  fn parses_config_names() {
    assert_eq!("newest-first".parse::<StackDirection>().unwrap(), StackDirection::NewestFirst);
    assert_eq!(StackDirection::default().to_string(), "priority-first");
  }
}
