//! Integration tests for `SqliteBackend` against in-memory and on-disk
//! databases.

use marquee_core::{
  preference::{PreferencePatch, UserPreferenceState},
  store::PreferenceBackend,
};

use crate::SqliteBackend;

async fn backend() -> SqliteBackend {
  SqliteBackend::open_in_memory()
    .await
    .expect("in-memory backend")
}

#[tokio::test]
async fn missing_key_returns_none() {
  let b = backend().await;
  assert_eq!(b.get("marquee:preferences").await.unwrap(), None);
  assert!(b.is_empty().await.unwrap());
}

#[tokio::test]
async fn set_then_get() {
  let b = backend().await;
  b.set("k", "{\"a\":1}".into()).await.unwrap();
  assert_eq!(b.get("k").await.unwrap().as_deref(), Some("{\"a\":1}"));
}

#[tokio::test]
async fn set_overwrites_previous_value() {
  let b = backend().await;
  b.set("k", "first".into()).await.unwrap();
  b.set("k", "second".into()).await.unwrap();

  assert_eq!(b.get("k").await.unwrap().as_deref(), Some("second"));
  assert_eq!(b.len().await.unwrap(), 1);
}

#[tokio::test]
async fn keys_are_namespaced() {
  let b = backend().await;
  b.set("user-a", "a".into()).await.unwrap();
  b.set("user-b", "b".into()).await.unwrap();

  assert_eq!(b.get("user-a").await.unwrap().as_deref(), Some("a"));
  assert_eq!(b.get("user-b").await.unwrap().as_deref(), Some("b"));
  assert_eq!(b.len().await.unwrap(), 2);
}

#[tokio::test]
async fn remove_deletes_and_is_idempotent() {
  let b = backend().await;
  b.set("k", "v".into()).await.unwrap();
  b.remove("k").await.unwrap();
  b.remove("k").await.unwrap();
  assert_eq!(b.get("k").await.unwrap(), None);
}

#[tokio::test]
async fn preference_state_survives_reopen() {
  let dir = std::env::temp_dir().join(format!("marquee-sqlite-{}", std::process::id()));
  std::fs::create_dir_all(&dir).unwrap();
  let path = dir.join("prefs.db");
  let _ = std::fs::remove_file(&path);

  let state = UserPreferenceState::default()
    .apply(&PreferencePatch::Dismiss("welcome".into()))
    .apply(&PreferencePatch::RecordDisplay("promo".into()));

  {
    let b = SqliteBackend::open(&path).await.unwrap();
    b.set("prefs", state.encode().unwrap()).await.unwrap();
  }

  let reopened = SqliteBackend::open(&path).await.unwrap();
  let raw = reopened.get("prefs").await.unwrap().unwrap();
  assert_eq!(UserPreferenceState::decode(&raw), state);

  drop(reopened);
  let _ = std::fs::remove_dir_all(&dir);
}
