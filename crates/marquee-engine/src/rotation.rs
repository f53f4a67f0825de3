//! [`RotationPlanner`]: picks which of the ordered eligible announcements are
//! on screen.
//!
//! Three layouts, chosen from the eligible count and `max_visible`:
//!
//! - everything fits: all of them are shown as a stack;
//! - single slot (`max_visible == 1`) with more than one candidate: one
//!   announcement at `cursor`, advanced by a periodic timer;
//! - several slots but more candidates than slots: the first `max_visible`.
//!
//! The planner never sleeps. It hands out a generation-tagged
//! [`TimerState`]; whoever drives the clock reports expiries back through
//! [`RotationPlanner::on_timer`], and expiries carrying an outdated
//! generation are ignored.

use std::time::Duration;

use marquee_core::{announcement::AnnouncementDefinition, config::BannerConfig};

// ─── Timer ───────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerState {
  /// No automatic advance is pending.
  Idle,
  /// Advance every `period`; only expiries tagged `generation` count.
  Armed { generation: u64, period: Duration },
}

// ─── Window diff ─────────────────────────────────────────────────────────────

/// Ids that entered and left the visible window in one step.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WindowChange {
  pub entered: Vec<String>,
  pub left:    Vec<String>,
}

impl WindowChange {
  fn between(before: &[String], after: &[String]) -> Self {
    Self {
      entered: after.iter().filter(|id| !before.contains(id)).cloned().collect(),
      left:    before.iter().filter(|id| !after.contains(id)).cloned().collect(),
    }
  }

  pub fn is_empty(&self) -> bool { self.entered.is_empty() && self.left.is_empty() }
}

// ─── Planner ─────────────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct RotationPlanner {
  max_visible: usize,
  auto_rotate: bool,
  period:      Duration,
  ordered:     Vec<AnnouncementDefinition>,
  /// Ids currently on screen, in display order.
  window:      Vec<String>,
  cursor:      usize,
  paused:      bool,
  generation:  u64,
  timer:       TimerState,
}

impl RotationPlanner {
  pub fn new(max_visible: usize, auto_rotate: bool, period: Duration) -> Self {
    Self {
      max_visible: max_visible.max(1),
      auto_rotate,
      period,
      ordered: Vec::new(),
      window: Vec::new(),
      cursor: 0,
      paused: false,
      generation: 0,
      timer: TimerState::Idle,
    }
  }

  pub fn from_config(config: &BannerConfig) -> Self {
    Self::new(config.max_visible(), config.auto_rotate, config.rotation_interval())
  }

  pub fn ordered(&self) -> &[AnnouncementDefinition] { &self.ordered }

  pub fn window(&self) -> &[String] { &self.window }

  /// The on-screen announcements, in display order.
  pub fn visible(&self) -> Vec<&AnnouncementDefinition> {
    self
      .window
      .iter()
      .filter_map(|id| self.ordered.iter().find(|a| &a.id == id))
      .collect()
  }

  pub fn cursor(&self) -> usize { self.cursor }

  pub fn is_paused(&self) -> bool { self.paused }

  pub fn timer(&self) -> TimerState { self.timer }

  /// Single-slot rotation is active.
  pub fn rotates(&self) -> bool { self.max_visible == 1 && self.ordered.len() > 1 }

  /// Install a freshly computed ordering.
  ///
  /// With a single slot, the announcement on screen keeps its slot if it is
  /// still eligible; if it dropped out, the cursor stays put and so lands on
  /// the item that followed it. A change in length restarts the timer.
  pub fn reconcile(&mut self, ordered: Vec<AnnouncementDefinition>) -> WindowChange {
    let len_changed = ordered.len() != self.ordered.len();
    let showing = if self.max_visible == 1 { self.window.first().cloned() } else { None };

    self.ordered = ordered;
    if let Some(pos) = showing.and_then(|id| self.ordered.iter().position(|a| a.id == id)) {
      self.cursor = pos;
    }
    self.cursor = match self.ordered.len() {
      0 => 0,
      len => self.cursor % len,
    };

    if len_changed {
      self.restart_timer();
    }
    self.refresh_window()
  }

  /// Handle a timer expiry. Returns `None` when nothing moved: the
  /// generation is stale, rotation is paused, or there is nothing to rotate.
  pub fn on_timer(&mut self, generation: u64) -> Option<WindowChange> {
    match self.timer {
      TimerState::Armed { generation: armed, .. } if armed == generation => {}
      _ => return None,
    }
    if self.paused || !self.rotates() {
      return None;
    }
    self.cursor = (self.cursor + 1) % self.ordered.len();
    Some(self.refresh_window())
  }

  /// Jump to `index` (wrapping) and restart the timer phase so the next
  /// automatic advance is a full period away. No-op outside rotation mode.
  pub fn goto(&mut self, index: usize) -> WindowChange {
    if self.rotates() {
      self.cursor = index % self.ordered.len();
      self.restart_timer();
    }
    self.refresh_window()
  }

  #[allow(clippy::should_implement_trait)]
  pub fn next(&mut self) -> WindowChange { self.goto(self.cursor + 1) }

  pub fn prev(&mut self) -> WindowChange {
    let len = self.ordered.len().max(1);
    self.goto(self.cursor + len - 1)
  }

  /// Hover or focus.
  pub fn pause(&mut self) { self.paused = true; }

  /// Blur.
  pub fn resume(&mut self) { self.paused = false; }

  /// Drop everything and disarm the timer. Used on unmount.
  pub fn cancel(&mut self) -> WindowChange {
    self.ordered.clear();
    self.cursor = 0;
    self.paused = false;
    self.generation = self.generation.wrapping_add(1);
    self.timer = TimerState::Idle;
    self.refresh_window()
  }

  fn restart_timer(&mut self) {
    self.generation = self.generation.wrapping_add(1);
    self.timer = if self.auto_rotate && self.rotates() {
      TimerState::Armed { generation: self.generation, period: self.period }
    } else {
      TimerState::Idle
    };
  }

  fn refresh_window(&mut self) -> WindowChange {
    let len = self.ordered.len();
    let next: Vec<String> = if len <= self.max_visible {
      self.ordered.iter().map(|a| a.id.clone()).collect()
    } else if self.max_visible == 1 {
      vec![self.ordered[self.cursor % len].id.clone()]
    } else {
      self.ordered.iter().take(self.max_visible).map(|a| a.id.clone()).collect()
    };

    let change = WindowChange::between(&self.window, &next);
    self.window = next;
    change
  }
}
