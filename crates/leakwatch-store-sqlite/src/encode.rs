//! Encoding and decoding helpers between domain types and SQLite columns.
//!
//! Timestamps are stored as RFC 3339 strings, booleans as integers.

use chrono::{DateTime, Utc};
use leakwatch_core::{hub::Hub, user::UserRecord};

use crate::{Error, Result};

// ─── DateTime<Utc> ───────────────────────────────────────────────────────────

pub fn encode_dt(dt: DateTime<Utc>) -> String { dt.to_rfc3339() }

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(e.to_string()))
}

// ─── Row types ───────────────────────────────────────────────────────────────

pub const HUB_COLUMNS: &str = "hub_id, gas_leak, owner_id, updated_at";

/// Raw values read directly from a `hubs` row.
pub struct RawHub {
  pub hub_id:     String,
  pub gas_leak:   bool,
  pub owner_id:   Option<String>,
  pub updated_at: String,
}

impl RawHub {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      hub_id:     row.get(0)?,
      gas_leak:   row.get(1)?,
      owner_id:   row.get(2)?,
      updated_at: row.get(3)?,
    })
  }

  pub fn into_hub(self) -> Result<Hub> {
    Ok(Hub {
      hub_id:     self.hub_id,
      gas_leak:   self.gas_leak,
      owner_id:   self.owner_id,
      updated_at: decode_dt(&self.updated_at)?,
    })
  }
}

pub const USER_COLUMNS: &str = "user_id, fcm_token, gas_leak_alerts";

/// Raw values read directly from a `users` row.
pub struct RawUser {
  pub user_id:         String,
  pub fcm_token:       Option<String>,
  pub gas_leak_alerts: Option<bool>,
}

impl RawUser {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      user_id:         row.get(0)?,
      fcm_token:       row.get(1)?,
      gas_leak_alerts: row.get(2)?,
    })
  }

  pub fn into_user(self) -> UserRecord {
    UserRecord {
      user_id:         self.user_id,
      fcm_token:       self.fcm_token,
      gas_leak_alerts: self.gas_leak_alerts,
    }
  }
}
