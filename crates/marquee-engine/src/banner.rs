//! [`Banner`]: one user's announcement session.

use std::sync::Arc;

use chrono::{DateTime, FixedOffset};
use marquee_core::{
  announcement::AnnouncementDefinition,
  config::{BannerConfig, Position},
  eligibility,
  preference::{PreferencePatch, UserPreferenceState},
  sort::sort,
  store::PreferenceBackend,
};
use serde::Serialize;
use tokio::sync::{Mutex, watch};
use tracing::{debug, info, warn};

use crate::{
  Error,
  clock::{Clock, SystemClock},
  events::{BannerEvents, NoopEvents},
  feed::FeedSource,
  preferences::PreferenceStore,
  rotation::{RotationPlanner, TimerState, WindowChange},
  views::ViewTracker,
};

/// A banner shared between the host and background tasks.
pub type SharedBanner<B> = Arc<Mutex<Banner<B>>>;

// ─── Snapshot ────────────────────────────────────────────────────────────────

/// What the host needs to render the banner right now.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BannerSnapshot {
  pub position:       Position,
  pub visible:        Vec<AnnouncementDefinition>,
  pub eligible_count: usize,
  pub cursor:         usize,
  pub rotating:       bool,
  pub paused:         bool,
}

// ─── Banner ──────────────────────────────────────────────────────────────────

pub struct Banner<B> {
  pub(crate) config:  BannerConfig,
  pub(crate) store:   PreferenceStore<B>,
  pub(crate) feed:    Vec<AnnouncementDefinition>,
  pub(crate) planner: RotationPlanner,
  pub(crate) views:   ViewTracker,
  pub(crate) events:  Box<dyn BannerEvents>,
  clock:              Arc<dyn Clock>,
  timer_tx:           watch::Sender<TimerState>,
  mounted:            bool,
}

impl<B: PreferenceBackend> Banner<B> {
  pub fn new(config: BannerConfig, backend: B) -> Self {
    let store =
      PreferenceStore::new(backend, config.storage_key.clone(), config.enable_persistence);
    let planner = RotationPlanner::from_config(&config);
    let (timer_tx, _) = watch::channel(TimerState::Idle);

    Self {
      config,
      store,
      feed: Vec::new(),
      planner,
      views: ViewTracker::new(),
      events: Box::new(NoopEvents),
      clock: Arc::new(SystemClock),
      timer_tx,
      mounted: false,
    }
  }

  pub fn with_events(mut self, events: impl BannerEvents + 'static) -> Self {
    self.events = Box::new(events);
    self
  }

  pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
    self.clock = Arc::new(clock);
    self
  }

  pub fn with_feed(mut self, feed: Vec<AnnouncementDefinition>) -> Self {
    self.feed = feed;
    self
  }

  pub fn into_shared(self) -> SharedBanner<B> { Arc::new(Mutex::new(self)) }

  // ── Accessors ─────────────────────────────────────────────────────────────

  pub fn config(&self) -> &BannerConfig { &self.config }

  pub fn is_mounted(&self) -> bool { self.mounted }

  pub fn preferences(&self) -> &UserPreferenceState { self.store.state() }

  pub fn feed(&self) -> &[AnnouncementDefinition] { &self.feed }

  pub fn planner(&self) -> &RotationPlanner { &self.planner }

  pub fn visible_ids(&self) -> &[String] { self.planner.window() }

  pub fn visible(&self) -> Vec<&AnnouncementDefinition> { self.planner.visible() }

  pub fn snapshot(&self) -> BannerSnapshot {
    BannerSnapshot {
      position:       self.config.position,
      visible:        self.planner.visible().into_iter().cloned().collect(),
      eligible_count: self.planner.ordered().len(),
      cursor:         self.planner.cursor(),
      rotating:       self.planner.rotates(),
      paused:         self.planner.is_paused(),
    }
  }

  /// Receives the current rotation timer state whenever it changes.
  pub fn timer_watch(&self) -> watch::Receiver<TimerState> { self.timer_tx.subscribe() }

  pub(crate) fn now(&self) -> DateTime<FixedOffset> {
    self.clock.now().with_timezone(&self.config.time_zone())
  }

  pub(crate) fn find(&self, id: &str) -> Option<&AnnouncementDefinition> {
    self.feed.iter().find(|a| a.id == id)
  }

  // ── Lifecycle ─────────────────────────────────────────────────────────────

  /// Load persisted preferences and compute the first window.
  pub async fn mount(&mut self) {
    self.mounted = true;
    self.store.load().await;
    self.recompute().await;
    info!(visible = self.planner.window().len(), "banner mounted");
  }

  /// Cancel the rotation timer and disconnect every view observation.
  /// Nothing is recomputed until the banner is mounted again.
  pub async fn unmount(&mut self) {
    self.mounted = false;
    self.planner.cancel();
    self.views.disconnect_all();
    self.publish_timer();
    debug!("banner unmounted");
  }

  // ── Triggers ──────────────────────────────────────────────────────────────

  /// Re-run eligibility, sorting and window selection.
  pub async fn recompute(&mut self) { self.recompute_excluding(None).await; }

  /// Like [`Self::recompute`], but keeps `skip` off screen for this pass
  /// only. Used right after a session dismissal so the dismissed item leaves
  /// the screen even when nothing else would stop it from showing.
  pub(crate) async fn recompute_excluding(&mut self, skip: Option<&str>) {
    if !self.mounted {
      return;
    }

    let now = self.now();
    let options = self.config.filter_options();
    let eligible: Vec<&AnnouncementDefinition> =
      eligibility::filter(&self.feed, self.store.state(), &now, options)
        .into_iter()
        .filter(|a| Some(a.id.as_str()) != skip)
        .collect();
    let ordered: Vec<AnnouncementDefinition> = sort(eligible, self.config.stack_direction)
      .into_iter()
      .cloned()
      .collect();

    debug!(
      candidates = self.feed.len(),
      eligible = ordered.len(),
      "recomputed eligibility"
    );
    let change = self.planner.reconcile(ordered);
    self.apply_window_change(change).await;
    self.publish_timer();
  }

  /// Replace the feed and recompute.
  pub async fn set_feed(&mut self, feed: Vec<AnnouncementDefinition>) {
    info!(count = feed.len(), "announcement feed updated");
    self.feed = feed;
    self.store.load().await;
    self.recompute().await;
  }

  /// Record a failed refresh. The previous feed stays in place.
  pub fn feed_error(&self, error: Error) {
    warn!(error = %error, "announcement feed refresh failed; keeping previous list");
    self.events.on_error(&error);
  }

  /// Fetch once from `source`, applying the result or reporting the error.
  pub async fn refresh_from<F: FeedSource>(&mut self, source: &F) {
    match source.fetch().await {
      Ok(feed) => self.set_feed(feed).await,
      Err(e) => self.feed_error(e),
    }
  }

  /// A rotation timer expiry tagged `generation`.
  ///
  /// Every tick also re-reads preferences and re-checks schedules, so
  /// announcements crossing a schedule boundary are picked up here. If that
  /// recomputation restarts the timer, this (now stale) expiry does not
  /// advance the rotation.
  pub async fn tick(&mut self, generation: u64) {
    if !self.mounted {
      return;
    }
    self.store.load().await;
    self.recompute().await;

    if let Some(change) = self.planner.on_timer(generation) {
      self.apply_window_change(change).await;
    }
    self.publish_timer();
  }

  // ── Navigation ────────────────────────────────────────────────────────────

  pub async fn goto(&mut self, index: usize) {
    let change = self.planner.goto(index);
    self.apply_window_change(change).await;
    self.publish_timer();
  }

  pub async fn next(&mut self) {
    let change = self.planner.next();
    self.apply_window_change(change).await;
    self.publish_timer();
  }

  pub async fn prev(&mut self) {
    let change = self.planner.prev();
    self.apply_window_change(change).await;
    self.publish_timer();
  }

  /// Hover or focus entered the banner.
  pub fn pause(&mut self) { self.planner.pause(); }

  /// Hover or focus left the banner.
  pub fn resume(&mut self) { self.planner.resume(); }

  // ── Views ─────────────────────────────────────────────────────────────────

  /// Report that `ratio` of announcement `id` is on screen.
  ///
  /// Returns `true` if this report counted as the session's view of `id`.
  pub async fn report_visibility(&mut self, id: &str, ratio: f64) -> bool {
    if !self.views.report(id, ratio) {
      return false;
    }
    self.store.merge(&PreferencePatch::MarkSeen(id.to_owned())).await;
    if let Some(announcement) = self.find(id) {
      self.events.on_view(announcement);
    }
    true
  }

  // ── Preference toggles ────────────────────────────────────────────────────

  pub async fn set_globally_disabled(&mut self, disabled: bool) {
    self.update_preferences(&[PreferencePatch::SetGloballyDisabled(disabled)]).await;
  }

  pub async fn set_category_enabled(&mut self, category: &str, enabled: bool) {
    self
      .update_preferences(&[PreferencePatch::SetCategoryEnabled {
        category: category.to_owned(),
        enabled,
      }])
      .await;
  }

  /// Apply several preference patches at once, then recompute.
  pub async fn update_preferences(&mut self, patches: &[PreferencePatch]) {
    if patches.is_empty() {
      return;
    }
    self.store.merge_all(patches).await;
    self.recompute().await;
  }

  /// Wipe all persisted preferences, including permanent dismissals.
  pub async fn clear_preferences(&mut self) {
    self.store.clear().await;
    self.recompute().await;
  }

  // ── Internals ─────────────────────────────────────────────────────────────

  /// Observation follows the window. Each entry into the window consumes one
  /// display from the frequency cap; the count is persisted but does not
  /// trigger another pass, so an item is never yanked off screen by its own
  /// display being counted.
  pub(crate) async fn apply_window_change(&mut self, change: WindowChange) {
    for id in &change.left {
      self.views.disconnect(id);
    }
    if change.entered.is_empty() {
      return;
    }
    for id in &change.entered {
      self.views.observe(id);
    }
    let patches: Vec<PreferencePatch> = change
      .entered
      .into_iter()
      .map(PreferencePatch::RecordDisplay)
      .collect();
    self.store.merge_all(&patches).await;
  }

  fn publish_timer(&self) {
    let next = self.planner.timer();
    self.timer_tx.send_if_modified(|current| {
      if *current == next {
        return false;
      }
      *current = next;
      true
    });
  }
}
