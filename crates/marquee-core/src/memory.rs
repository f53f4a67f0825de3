//! [`MemoryBackend`]: a process-local [`PreferenceBackend`].

use std::{
  collections::HashMap,
  convert::Infallible,
  sync::{Arc, Mutex, PoisonError},
};

use crate::store::PreferenceBackend;

/// Keeps values in a shared map. Clones see the same entries, which makes it
/// convenient for simulating several sessions against one "device".
#[derive(Debug, Clone, Default)]
pub struct MemoryBackend {
  entries: Arc<Mutex<HashMap<String, String>>>,
}

impl MemoryBackend {
  pub fn new() -> Self { Self::default() }

  fn with<T>(&self, f: impl FnOnce(&mut HashMap<String, String>) -> T) -> T {
    let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
    f(&mut entries)
  }
}

impl PreferenceBackend for MemoryBackend {
  type Error = Infallible;

  async fn get(&self, key: &str) -> Result<Option<String>, Infallible> {
    Ok(self.with(|entries| entries.get(key).cloned()))
  }

  async fn set(&self, key: &str, value: String) -> Result<(), Infallible> {
    self.with(|entries| entries.insert(key.to_owned(), value));
    Ok(())
  }

  async fn remove(&self, key: &str) -> Result<(), Infallible> {
    self.with(|entries| entries.remove(key));
    Ok(())
  }
}
