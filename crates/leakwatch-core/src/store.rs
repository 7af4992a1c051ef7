//! Storage traits for user and hub records.
//!
//! Implemented by storage backends (e.g. `leakwatch-store-sqlite`). The
//! dispatcher only ever calls [`UserStore::get_user`]; the write methods
//! serve the ingest API.

use std::future::Future;

use crate::{
  hub::{Hub, HubPatch, HubWrite},
  user::{UserPatch, UserRecord},
};

/// Point lookups and upserts of user records.
///
/// All methods return `Send` futures so the trait can be used in
/// multi-threaded async runtimes (e.g. tokio with `axum`).
pub trait UserStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// Retrieve a user by id. Returns `None` if not found.
  fn get_user<'a>(
    &'a self,
    user_id: &'a str,
  ) -> impl Future<Output = Result<Option<UserRecord>, Self::Error>> + Send + 'a;

  /// Create or update a user. Fields absent from `patch` keep their stored
  /// value (or stay unset on creation).
  fn put_user<'a>(
    &'a self,
    user_id: &'a str,
    patch: UserPatch,
  ) -> impl Future<Output = Result<UserRecord, Self::Error>> + Send + 'a;
}

/// Reads and writes of hub records.
pub trait HubStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// Retrieve a hub by id. Returns `None` if not found.
  fn get_hub<'a>(
    &'a self,
    hub_id: &'a str,
  ) -> impl Future<Output = Result<Option<Hub>, Self::Error>> + Send + 'a;

  /// Apply `patch` to a hub atomically, creating it if needed, and return the
  /// states before and after the write. A new hub starts with
  /// `gas_leak = false`. The store sets `updated_at`.
  fn write_hub<'a>(
    &'a self,
    hub_id: &'a str,
    patch: HubPatch,
  ) -> impl Future<Output = Result<HubWrite, Self::Error>> + Send + 'a;
}
