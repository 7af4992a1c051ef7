//! Integration tests for `SqliteStore` against an in-memory database.

use leakwatch_core::{
  hub::HubPatch,
  store::{HubStore, UserStore},
  user::UserPatch,
};

use crate::{Error, SqliteStore};

async fn store() -> SqliteStore {
  SqliteStore::open_in_memory()
    .await
    .expect("in-memory store")
}

fn leak(gas_leak: bool) -> HubPatch {
  HubPatch {
    gas_leak: Some(gas_leak),
    owner_id: None,
  }
}

// ─── Users ───────────────────────────────────────────────────────────────────

#[tokio::test]
async fn get_user_missing_returns_none() {
  let s = store().await;
  assert!(s.get_user("nobody").await.unwrap().is_none());
}

#[tokio::test]
async fn put_and_get_user() {
  let s = store().await;

  let put = s
    .put_user(
      "u1",
      UserPatch {
        fcm_token:       Some("tok1".into()),
        gas_leak_alerts: None,
      },
    )
    .await
    .unwrap();
  assert_eq!(put.fcm_token.as_deref(), Some("tok1"));
  assert_eq!(put.gas_leak_alerts, None);

  let fetched = s.get_user("u1").await.unwrap().unwrap();
  assert_eq!(fetched, put);
  assert!(fetched.gas_leak_alerts_enabled());
}

#[tokio::test]
async fn put_user_keeps_fields_missing_from_patch() {
  let s = store().await;
  s.put_user(
    "u1",
    UserPatch {
      fcm_token:       Some("tok1".into()),
      gas_leak_alerts: None,
    },
  )
  .await
  .unwrap();

  let updated = s
    .put_user(
      "u1",
      UserPatch {
        fcm_token:       None,
        gas_leak_alerts: Some(false),
      },
    )
    .await
    .unwrap();

  assert_eq!(updated.fcm_token.as_deref(), Some("tok1"));
  assert_eq!(updated.gas_leak_alerts, Some(false));
  assert!(!updated.gas_leak_alerts_enabled());
}

#[tokio::test]
async fn put_user_rejects_invalid_id() {
  let s = store().await;
  let err = s.put_user("a/b", UserPatch::default()).await.unwrap_err();
  assert!(matches!(err, Error::Core(_)), "{err}");
}

// ─── Hubs ────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn first_write_creates_hub() {
  let s = store().await;

  let write = s
    .write_hub(
      "h1",
      HubPatch {
        gas_leak: None,
        owner_id: Some("u1".into()),
      },
    )
    .await
    .unwrap();

  assert!(write.before.is_none());
  assert!(!write.after.gas_leak);
  assert_eq!(write.after.owner_id.as_deref(), Some("u1"));
  assert!(write.into_update().is_none());

  let hub = s.get_hub("h1").await.unwrap().unwrap();
  assert_eq!(hub.hub_id, "h1");
  assert!(!hub.gas_leak);
}

#[tokio::test]
async fn update_reports_before_and_after() {
  let s = store().await;
  s.write_hub(
    "h1",
    HubPatch {
      gas_leak: Some(false),
      owner_id: Some("u1".into()),
    },
  )
  .await
  .unwrap();

  let write = s.write_hub("h1", leak(true)).await.unwrap();

  let before = write.before.clone().unwrap();
  assert!(!before.gas_leak);
  assert!(write.after.gas_leak);
  // Owner survives a patch that does not mention it.
  assert_eq!(write.after.owner_id.as_deref(), Some("u1"));
  assert!(write.after.updated_at >= before.updated_at);

  let update = write.into_update().unwrap();
  assert_eq!(update.hub_id(), "h1");
  assert!(update.is_rising_edge());
  assert_eq!(update.after.unwrap().owner(), Some("u1"));
}

#[tokio::test]
async fn repeated_true_write_is_not_a_rising_edge() {
  let s = store().await;
  s.write_hub("h1", leak(false)).await.unwrap();
  s.write_hub("h1", leak(true)).await.unwrap();

  let update = s.write_hub("h1", leak(true)).await.unwrap().into_update().unwrap();
  assert!(!update.is_rising_edge());
}

#[tokio::test]
async fn get_hub_missing_returns_none() {
  let s = store().await;
  assert!(s.get_hub("h404").await.unwrap().is_none());
}

#[tokio::test]
async fn write_hub_rejects_invalid_id() {
  let s = store().await;
  assert!(s.write_hub("", leak(true)).await.is_err());
  assert!(s.get_hub("").await.unwrap().is_none());
}
