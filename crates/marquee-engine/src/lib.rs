//! Runtime for the Marquee announcement engine.
//!
//! A [`Banner`] owns one user's session: the current feed, the persisted
//! preference state (through a [`PreferenceStore`]), the rotation window and
//! the set of announcements already seen. It recomputes eligibility on explicit
//! triggers (preference changes, feed changes, rotation timer ticks) and
//! reports interaction back to the host through
//! [`BannerEvents`].
//!
//! The banner itself is a plain single-owner state machine. Hosts that drive
//! it from several tasks wrap it in a [`SharedBanner`]; [`driver`] and
//! [`feed`] provide the background tasks for the rotation timer and feed
//! polling.

pub mod actions;
pub mod banner;
pub mod clock;
pub mod dismissal;
pub mod driver;
pub mod error;
pub mod events;
pub mod feed;
pub mod preferences;
pub mod rotation;
pub mod views;

pub use actions::ActionOutcome;
pub use banner::{Banner, BannerSnapshot, SharedBanner};
pub use clock::{Clock, ManualClock, SystemClock};
pub use error::{Error, Result};
pub use events::{BannerEvents, NoopEvents};
pub use preferences::PreferenceStore;
pub use rotation::{RotationPlanner, TimerState, WindowChange};
pub use views::ViewTracker;
