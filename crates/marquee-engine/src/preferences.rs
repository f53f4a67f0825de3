//! [`PreferenceStore`]: sole owner of a user's [`UserPreferenceState`].
//!
//! Persistence is best effort. Backend failures are logged at debug level and
//! absorbed; the in-memory copy stays authoritative for the rest of the
//! session. Every mutation goes through [`PreferenceStore::merge`], which
//! re-reads the backend first so that a patch lands on top of whatever another
//! session wrote in the meantime. Concurrent sessions still race: the last
//! writer wins.

use marquee_core::{
  preference::{PreferencePatch, UserPreferenceState},
  store::PreferenceBackend,
};
use tracing::debug;

pub struct PreferenceStore<B> {
  backend: B,
  key:     String,
  /// When `false` the backend is never touched.
  persist: bool,
  state:   UserPreferenceState,
}

impl<B: PreferenceBackend> PreferenceStore<B> {
  pub fn new(backend: B, key: impl Into<String>, persist: bool) -> Self {
    Self {
      backend,
      key: key.into(),
      persist,
      state: UserPreferenceState::default(),
    }
  }

  /// The current in-memory state.
  pub fn state(&self) -> &UserPreferenceState { &self.state }

  /// Refresh from the backend and return the result.
  ///
  /// A missing key or an unparseable blob yields the default state. If the
  /// backend cannot be read at all, the cached state is kept.
  pub async fn load(&mut self) -> UserPreferenceState {
    if let Some(latest) = self.read_latest().await {
      self.state = latest;
    }
    self.state.clone()
  }

  /// Replace the state and write it through.
  pub async fn save(&mut self, state: UserPreferenceState) {
    self.state = state;
    self.write_through().await;
  }

  /// Apply `patch` to the latest persisted snapshot and persist the result.
  pub async fn merge(&mut self, patch: &PreferencePatch) -> &UserPreferenceState {
    self.merge_all(std::slice::from_ref(patch)).await
  }

  /// Apply several patches in one read-modify-write cycle.
  pub async fn merge_all(&mut self, patches: &[PreferencePatch]) -> &UserPreferenceState {
    let base = match self.read_latest().await {
      Some(latest) => latest,
      None => self.state.clone(),
    };
    let next = patches.iter().fold(base, UserPreferenceState::apply);
    self.save(next).await;
    &self.state
  }

  /// Forget everything, including permanent dismissals.
  pub async fn clear(&mut self) {
    self.state = UserPreferenceState::default();
    if !self.persist {
      return;
    }
    if let Err(e) = self.backend.remove(&self.key).await {
      debug!(key = %self.key, error = %e, "failed to clear persisted preferences");
    }
  }

  async fn read_latest(&self) -> Option<UserPreferenceState> {
    if !self.persist {
      return None;
    }
    match self.backend.get(&self.key).await {
      Ok(Some(raw)) => {
        let state = UserPreferenceState::decode(&raw);
        if state == UserPreferenceState::default() && !raw.trim().is_empty() {
          debug!(key = %self.key, "persisted preferences decoded to defaults");
        }
        Some(state)
      }
      Ok(None) => Some(UserPreferenceState::default()),
      Err(e) => {
        debug!(key = %self.key, error = %e, "failed to read preferences; using session state");
        None
      }
    }
  }

  async fn write_through(&self) {
    if !self.persist {
      return;
    }
    let raw = match self.state.encode() {
      Ok(raw) => raw,
      Err(e) => {
        debug!(error = %e, "failed to encode preferences");
        return;
      }
    };
    if let Err(e) = self.backend.set(&self.key, raw).await {
      debug!(key = %self.key, error = %e, "failed to persist preferences; keeping session state");
    }
  }
}

#[cfg(test)]
mod tests {
  use std::{
    fmt,
    sync::atomic::{AtomicBool, Ordering},
  };

  use marquee_core::memory::MemoryBackend;

  use super::*;

  const KEY: &str = "marquee:preferences";

  /// A backend whose reads and writes can be switched off.
  #[derive(Default)]
  struct FlakyBackend {
    inner:  MemoryBackend,
    broken: AtomicBool,
  }

  #[derive(Debug)]
  struct Unavailable;

  impl fmt::Display for Unavailable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str("storage unavailable") }
  }

  impl std::error::Error for Unavailable {}

  impl PreferenceBackend for FlakyBackend {
    type Error = Unavailable;

    async fn get(&self, key: &str) -> Result<Option<String>, Unavailable> {
      if self.broken.load(Ordering::SeqCst) {
        return Err(Unavailable);
      }
      Ok(self.inner.get(key).await.unwrap_or_default())
    }

    async fn set(&self, key: &str, value: String) -> Result<(), Unavailable> {
      if self.broken.load(Ordering::SeqCst) {
        return Err(Unavailable);
      }
      let _ = self.inner.set(key, value).await;
      Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), Unavailable> {
      if self.broken.load(Ordering::SeqCst) {
        return Err(Unavailable);
      }
      let _ = self.inner.remove(key).await;
      Ok(())
    }
  }

  #[tokio::test]
  async fn missing_key_loads_defaults() {
    let mut store = PreferenceStore::new(MemoryBackend::new(), KEY, true);
    assert_eq!(store.load().await, UserPreferenceState::default());
  }

  #[tokio::test]
  async fn corrupt_blob_loads_defaults() {
    let backend = MemoryBackend::new();
    backend.set(KEY, "{{{ definitely not json".into()).await.unwrap();

    let mut store = PreferenceStore::new(backend, KEY, true);
    assert_eq!(store.load().await, UserPreferenceState::default());
  }

  #[tokio::test]
  async fn merge_persists_immediately() {
    let backend = MemoryBackend::new();
    let mut store = PreferenceStore::new(backend.clone(), KEY, true);
    store.merge(&PreferencePatch::Dismiss("a".into())).await;

    let raw = backend.get(KEY).await.unwrap().unwrap();
    assert!(UserPreferenceState::decode(&raw).is_dismissed("a"));
  }

  #[tokio::test]
  async fn merge_builds_on_latest_persisted_snapshot() {
    let backend = MemoryBackend::new();
    let mut first = PreferenceStore::new(backend.clone(), KEY, true);
    let mut second = PreferenceStore::new(backend.clone(), KEY, true);
    first.load().await;
    second.load().await;

    first.merge(&PreferencePatch::Dismiss("a".into())).await;
    // `second` never reloaded, but its merge must not drop `a`.
    let state = second.merge(&PreferencePatch::MarkSeen("b".into())).await;
    assert!(state.is_dismissed("a"));
    assert!(state.seen_ids.contains("b"));
  }

  #[tokio::test]
  async fn merge_never_mutates_previous_snapshot() {
    let mut store = PreferenceStore::new(MemoryBackend::new(), KEY, true);
    let before = store.load().await;
    store.merge(&PreferencePatch::RecordDisplay("a".into())).await;
    assert_eq!(before.display_count("a"), 0);
    assert_eq!(store.state().display_count("a"), 1);
  }

  #[tokio::test]
  async fn failing_backend_degrades_to_session_state() {
    let backend = FlakyBackend::default();
    backend.broken.store(true, Ordering::SeqCst);
    let mut store = PreferenceStore::new(backend, KEY, true);

    assert_eq!(store.load().await, UserPreferenceState::default());
    store.merge(&PreferencePatch::Dismiss("a".into())).await;
    store.merge(&PreferencePatch::MarkSeen("b".into())).await;
    assert!(store.state().is_dismissed("a"));
    assert!(store.state().seen_ids.contains("b"));

    // Reads still failing: the session state is kept, not reset.
    assert!(store.load().await.is_dismissed("a"));
  }

  #[tokio::test]
  async fn disabled_persistence_never_writes() {
    let backend = MemoryBackend::new();
    let mut store = PreferenceStore::new(backend.clone(), KEY, false);
    store.merge(&PreferencePatch::Dismiss("a".into())).await;

    assert!(store.state().is_dismissed("a"));
    assert_eq!(backend.get(KEY).await.unwrap(), None);
  }

  #[tokio::test]
  async fn clear_removes_persisted_state() {
    let backend = MemoryBackend::new();
    let mut store = PreferenceStore::new(backend.clone(), KEY, true);
    store.merge(&PreferencePatch::Dismiss("a".into())).await;
    store.clear().await;

    assert_eq!(store.state(), &UserPreferenceState::default());
    assert_eq!(backend.get(KEY).await.unwrap(), None);
  }
}
