//! Callbacks from the engine to the hosting UI.

use std::sync::Arc;

use marquee_core::announcement::AnnouncementDefinition;

use crate::Error;

/// Host hooks. Every method defaults to a no-op.
///
/// Each fires at most once per logical event; `on_view` fires at most once
/// per announcement per session.
pub trait BannerEvents: Send + Sync {
  /// The announcement crossed the visibility threshold for the first time.
  fn on_view(&self, _announcement: &AnnouncementDefinition) {}

  /// The user dismissed the announcement.
  fn on_dismiss(&self, _announcement: &AnnouncementDefinition, _permanent: bool) {}

  /// The feed could not be refreshed. The previous list stays on screen.
  fn on_error(&self, _error: &Error) {}
}

#[derive(Debug, Clone, Copy, Default)]
pub struct NoopEvents;

impl BannerEvents for NoopEvents {}

impl<T: BannerEvents + ?Sized> BannerEvents for Arc<T> {
  fn on_view(&self, announcement: &AnnouncementDefinition) { (**self).on_view(announcement) }

  fn on_dismiss(&self, announcement: &AnnouncementDefinition, permanent: bool) {
    (**self).on_dismiss(announcement, permanent)
  }

  fn on_error(&self, error: &Error) { (**self).on_error(error) }
}
