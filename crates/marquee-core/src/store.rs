//! The `PreferenceBackend` trait: where preference state is persisted.
//!
//! The engine reads and writes one namespaced key holding the serialised
//! [`crate::preference::UserPreferenceState`]. Backends only move strings;
//! they know nothing about the state's shape. Implementations:
//! [`crate::memory::MemoryBackend`] (tests, persistence disabled) and
//! `marquee-store-sqlite` (durable).

use std::{future::Future, sync::Arc};

/// A string key-value store.
///
/// All methods return `Send` futures so a backend can sit behind a tokio
/// mutex shared with spawned tasks.
pub trait PreferenceBackend: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// Read the value at `key`. Returns `None` if the key was never written.
  fn get<'a>(
    &'a self,
    key: &'a str,
  ) -> impl Future<Output = Result<Option<String>, Self::Error>> + Send + 'a;

  /// Write `value` at `key`, replacing any previous value.
  fn set<'a>(
    &'a self,
    key: &'a str,
    value: String,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + 'a;

  /// Delete `key`. Deleting a missing key is not an error.
  fn remove<'a>(
    &'a self,
    key: &'a str,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + 'a;
}

/// Sharing one backend between several stores (e.g. two sessions of the same
/// user) is done through `Arc`.
impl<B: PreferenceBackend> PreferenceBackend for Arc<B> {
  type Error = B::Error;

  fn get<'a>(
    &'a self,
    key: &'a str,
  ) -> impl Future<Output = Result<Option<String>, Self::Error>> + Send + 'a {
    (**self).get(key)
  }

  fn set<'a>(
    &'a self,
    key: &'a str,
    value: String,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + 'a {
    (**self).set(key, value)
  }

  fn remove<'a>(
    &'a self,
    key: &'a str,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + 'a {
    (**self).remove(key)
  }
}
