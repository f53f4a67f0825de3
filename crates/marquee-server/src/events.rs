//! [`BannerEvents`] implementation that writes every callback to the log.

use marquee_core::announcement::AnnouncementDefinition;
use marquee_engine::{BannerEvents, Error};
use tracing::{info, warn};

#[derive(Debug, Clone, Copy, Default)]
pub struct LoggingEvents;

impl BannerEvents for LoggingEvents {
  fn on_view(&self, announcement: &AnnouncementDefinition) {
    info!(id = %announcement.id, category = %announcement.category, "announcement viewed");
  }

  fn on_dismiss(&self, announcement: &AnnouncementDefinition, permanent: bool) {
    info!(id = %announcement.id, permanent, "announcement dismissed");
  }

  fn on_error(&self, error: &Error) {
    warn!(error = %error, "banner error");
  }
}
