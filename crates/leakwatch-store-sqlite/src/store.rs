//! [`SqliteStore`]: the SQLite implementation of [`UserStore`] and
//! [`HubStore`].

use std::path::Path;

use chrono::Utc;
use rusqlite::OptionalExtension as _;

use leakwatch_core::{
  hub::{Hub, HubPatch, HubWrite},
  id::{validate_hub_id, validate_user_id},
  store::{HubStore, UserStore},
  user::{UserPatch, UserRecord},
};

use crate::{
  Error, Result,
  encode::{HUB_COLUMNS, RawHub, RawUser, USER_COLUMNS, encode_dt},
  schema::SCHEMA,
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// Hub and user records backed by a single SQLite file.
///
/// Cloning is cheap; the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store; useful for testing.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }
}

// ─── UserStore impl ──────────────────────────────────────────────────────────

impl UserStore for SqliteStore {
  type Error = Error;

  async fn get_user(&self, user_id: &str) -> Result<Option<UserRecord>> {
    let id = user_id.to_owned();

    let raw: Option<RawUser> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              &format!("SELECT {USER_COLUMNS} FROM users WHERE user_id = ?1"),
              rusqlite::params![id],
              RawUser::from_row,
            )
            .optional()?,
        )
      })
      .await?;

    Ok(raw.map(RawUser::into_user))
  }

  async fn put_user(&self, user_id: &str, patch: UserPatch) -> Result<UserRecord> {
    validate_user_id(user_id)?;

    let id = user_id.to_owned();
    let at = encode_dt(Utc::now());

    let raw: RawUser = self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO users (user_id, fcm_token, gas_leak_alerts, updated_at)
           VALUES (?1, ?2, ?3, ?4)
           ON CONFLICT(user_id) DO UPDATE SET
             fcm_token       = COALESCE(excluded.fcm_token, users.fcm_token),
             gas_leak_alerts = COALESCE(excluded.gas_leak_alerts, users.gas_leak_alerts),
             updated_at      = excluded.updated_at",
          rusqlite::params![id, patch.fcm_token, patch.gas_leak_alerts, at],
        )?;
        Ok(conn.query_row(
          &format!("SELECT {USER_COLUMNS} FROM users WHERE user_id = ?1"),
          rusqlite::params![id],
          RawUser::from_row,
        )?)
      })
      .await?;

    Ok(raw.into_user())
  }
}

// ─── HubStore impl ───────────────────────────────────────────────────────────

impl HubStore for SqliteStore {
  type Error = Error;

  async fn get_hub(&self, hub_id: &str) -> Result<Option<Hub>> {
    let id = hub_id.to_owned();

    let raw: Option<RawHub> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              &format!("SELECT {HUB_COLUMNS} FROM hubs WHERE hub_id = ?1"),
              rusqlite::params![id],
              RawHub::from_row,
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawHub::into_hub).transpose()
  }

  async fn write_hub(&self, hub_id: &str, patch: HubPatch) -> Result<HubWrite> {
    validate_hub_id(hub_id)?;

    let id = hub_id.to_owned();
    let at = encode_dt(Utc::now());

    let (before, after): (Option<RawHub>, RawHub) = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;

        let before = tx
          .query_row(
            &format!("SELECT {HUB_COLUMNS} FROM hubs WHERE hub_id = ?1"),
            rusqlite::params![id],
            RawHub::from_row,
          )
          .optional()?;

        let after = RawHub {
          hub_id:     id,
          gas_leak:   patch
            .gas_leak
            .or(before.as_ref().map(|b| b.gas_leak))
            .unwrap_or(false),
          owner_id:   patch
            .owner_id
            .or_else(|| before.as_ref().and_then(|b| b.owner_id.clone())),
          updated_at: at,
        };

        tx.execute(
          "INSERT INTO hubs (hub_id, gas_leak, owner_id, updated_at)
           VALUES (?1, ?2, ?3, ?4)
           ON CONFLICT(hub_id) DO UPDATE SET
             gas_leak   = excluded.gas_leak,
             owner_id   = excluded.owner_id,
             updated_at = excluded.updated_at",
          rusqlite::params![after.hub_id, after.gas_leak, after.owner_id, after.updated_at],
        )?;
        tx.commit()?;

        Ok((before, after))
      })
      .await?;

    Ok(HubWrite {
      before: before.map(RawHub::into_hub).transpose()?,
      after:  after.into_hub()?,
    })
  }
}
