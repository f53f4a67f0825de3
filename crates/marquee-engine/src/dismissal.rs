//! Dismissal handling.
//!
//! A permanent dismissal adds the id to `dismissed_ids`, after which it is
//! never eligible again. A session dismissal only stamps
//! `last_dismissal_at`, which the cooldown rule reads; without a cooldown the
//! announcement is back on the next pass. Dismissing never touches the
//! frequency counter: displays are counted when an announcement enters the
//! window, whether or not the user interacts with it.

use chrono::{DateTime, Utc};
use marquee_core::{preference::PreferencePatch, store::PreferenceBackend};
use tracing::debug;

use crate::banner::Banner;

/// The preference change recorded for a dismissal at `at`.
pub fn dismissal_patch(id: &str, permanent: bool, at: DateTime<Utc>) -> PreferencePatch {
  if permanent {
    PreferencePatch::Dismiss(id.to_owned())
  } else {
    PreferencePatch::RecordDismissal { id: id.to_owned(), at }
  }
}

impl<B: PreferenceBackend> Banner<B> {
  /// Dismiss announcement `id` and move on to the next one immediately.
  ///
  /// Ids that are not part of the current feed are ignored. Returns whether
  /// the dismissal was recorded.
  pub async fn dismiss(&mut self, id: &str, permanent: bool) -> bool {
    let Some(announcement) = self.find(id).cloned() else {
      debug!(id, "dismissal of unknown announcement ignored");
      return false;
    };

    let at = self.now().with_timezone(&Utc);
    self.store.merge(&dismissal_patch(id, permanent, at)).await;
    self.events.on_dismiss(&announcement, permanent);
    debug!(id, permanent, "announcement dismissed");

    self.recompute_excluding(Some(id)).await;
    true
  }
}
