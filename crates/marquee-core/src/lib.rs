//! Core types and pure evaluation logic for the Marquee announcement engine.
//!
//! This crate does no I/O. Persistence backends implement
//! [`store::PreferenceBackend`]; the stateful runtime (rotation, view tracking,
//! dismissal) lives in `marquee-engine`.

// We intentionally use native `async fn` in traits (stabilised in Rust 1.75).
// Suppress the advisory lint about `Send` bounds on the returned futures.
#![allow(async_fn_in_trait)]

pub mod announcement;
pub mod config;
pub mod eligibility;
pub mod error;
pub mod memory;
pub mod preference;
pub mod schedule;
pub mod sort;
pub mod store;

pub use error::{Error, Result};
