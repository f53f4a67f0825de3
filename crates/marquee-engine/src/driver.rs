//! The rotation timer task.
//!
//! Watches the banner's [`TimerState`] and sleeps one period at a time. Any
//! change to the timer (new generation after a length change or manual
//! navigation, disarm on unmount) interrupts the sleep and starts over, so a
//! pending expiry never outlives the state it was armed for.

use marquee_core::store::PreferenceBackend;
use tracing::debug;

use crate::{banner::SharedBanner, feed::TaskHandle, rotation::TimerState};

/// Drive `banner`'s rotation timer until the handle is dropped.
pub async fn spawn_rotation_timer<B>(banner: SharedBanner<B>) -> TaskHandle
where
  B: PreferenceBackend + 'static,
{
  let mut timer = banner.lock().await.timer_watch();

  TaskHandle::new(tokio::spawn(async move {
    loop {
      let state = *timer.borrow_and_update();
      match state {
        TimerState::Idle => {
          if timer.changed().await.is_err() {
            break;
          }
        }
        TimerState::Armed { generation, period } => {
          tokio::select! {
            () = tokio::time::sleep(period) => {
              debug!(generation, "rotation timer fired");
              banner.lock().await.tick(generation).await;
            }
            changed = timer.changed() => {
              if changed.is_err() {
                break;
              }
            }
          }
        }
      }
    }
  }))
}
