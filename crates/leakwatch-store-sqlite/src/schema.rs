//! SQL schema for the leakwatch SQLite store.
//!
//! Executed once at connection startup. Future migrations will be gated on
//! `PRAGMA user_version`.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;

CREATE TABLE IF NOT EXISTS users (
    user_id          TEXT PRIMARY KEY,
    fcm_token        TEXT,            -- NULL when the device never registered
    gas_leak_alerts  INTEGER,         -- NULL means never set (alerts on)
    updated_at       TEXT NOT NULL    -- ISO 8601 UTC
);

CREATE TABLE IF NOT EXISTS hubs (
    hub_id      TEXT PRIMARY KEY,
    gas_leak    INTEGER NOT NULL DEFAULT 0,
    owner_id    TEXT,
    updated_at  TEXT NOT NULL         -- ISO 8601 UTC; server-assigned
);

CREATE INDEX IF NOT EXISTS hubs_owner_idx ON hubs(owner_id);

PRAGMA user_version = 1;
";
