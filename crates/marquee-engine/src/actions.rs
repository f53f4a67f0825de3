//! Action dispatch.
//!
//! Announcement actions are a closed enum; each kind maps to one fixed
//! handler here. The host only ever receives data back (a URL to open),
//! never code to run.

use marquee_core::{announcement::ActionKind, store::PreferenceBackend};
use serde::Serialize;
use tracing::debug;

use crate::banner::Banner;

/// What happened when an action was performed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum ActionOutcome {
  /// The host should open `url`.
  Navigate { url: String, new_tab: bool },
  Dismissed { permanent: bool },
  Rotated,
  /// Unknown announcement or action index.
  Ignored,
}

impl<B: PreferenceBackend> Banner<B> {
  /// Perform action `index` of announcement `id`.
  pub async fn perform_action(&mut self, id: &str, index: usize) -> ActionOutcome {
    let Some(kind) = self
      .find(id)
      .and_then(|a| a.actions.get(index))
      .map(|action| action.kind.clone())
    else {
      debug!(id, index, "unknown action ignored");
      return ActionOutcome::Ignored;
    };

    match kind {
      ActionKind::Link { url, new_tab } => ActionOutcome::Navigate { url, new_tab },
      ActionKind::Dismiss { permanent } => {
        if self.dismiss(id, permanent).await {
          ActionOutcome::Dismissed { permanent }
        } else {
          ActionOutcome::Ignored
        }
      }
      ActionKind::Rotate => {
        self.next().await;
        ActionOutcome::Rotated
      }
    }
  }
}
