//! `leakwatch`: operator CLI for a leakwatch server.
//!
//! # Usage
//!
//! ```
//! leakwatch user set u1 --token <fcm-token>
//! leakwatch hub set hub-7 --owner u1 --gas-leak false
//! leakwatch event send hub-7 --before false --after true --owner u1
//! leakwatch --url http://leakwatch.internal:8080 hub get hub-7
//! ```

mod client;

use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::{ArgAction, Parser, Subcommand};
use client::{ApiClient, ApiConfig};
use leakwatch_core::{
  hub::{HubPatch, HubSnapshot, HubUpdate, UpdateParams},
  user::UserPatch,
};
use serde::{Deserialize, Serialize};
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;
use uuid::Uuid;

const DEFAULT_URL: &str = "http://localhost:8080";

// ─── CLI args ─────────────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(name = "leakwatch", about = "Operator CLI for the leakwatch alert server")]
struct Args {
  /// Path to a TOML config file (url).
  #[arg(short, long, value_name = "FILE")]
  config: Option<PathBuf>,

  /// Base URL of the leakwatch server (default: http://localhost:8080).
  #[arg(long, env = "LEAKWATCH_URL")]
  url: Option<String>,

  #[command(subcommand)]
  command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
  /// Read or write hub records.
  #[command(subcommand)]
  Hub(HubCommand),
  /// Read or write user records.
  #[command(subcommand)]
  User(UserCommand),
  /// Deliver update events to the dispatcher.
  #[command(subcommand)]
  Event(EventCommand),
}

#[derive(Subcommand, Debug)]
enum HubCommand {
  Get {
    hub_id: String,
  },
  /// Write hub state; a change to an existing hub triggers the dispatcher.
  Set {
    hub_id:   String,
    #[arg(long)]
    gas_leak: Option<bool>,
    #[arg(long)]
    owner:    Option<String>,
  },
}

#[derive(Subcommand, Debug)]
enum UserCommand {
  Get {
    user_id: String,
  },
  Set {
    user_id: String,
    /// FCM registration token of the user's device.
    #[arg(long)]
    token:   Option<String>,
    /// Whether gas-leak alerts are delivered.
    #[arg(long)]
    alerts:  Option<bool>,
  },
}

#[derive(Subcommand, Debug)]
enum EventCommand {
  /// Send a synthetic update event and print the dispatch outcome.
  Send {
    hub_id: String,
    /// gasLeak before the update.
    #[arg(long, action = ArgAction::Set)]
    before: bool,
    /// gasLeak after the update.
    #[arg(long, action = ArgAction::Set)]
    after:  bool,
    #[arg(long)]
    owner:  Option<String>,
    /// Event id for redelivery detection; a fresh uuid by default.
    #[arg(long)]
    id:     Option<String>,
  },
}

// ─── Config file ──────────────────────────────────────────────────────────────

/// Shape of the optional TOML config file.
#[derive(Deserialize, Default)]
struct ConfigFile {
  #[serde(default)]
  url: String,
}

/// CLI flag (or env) overrides config file, which overrides the default.
fn resolve_base_url(flag: Option<String>, file: &ConfigFile) -> String {
  flag
    .or_else(|| (!file.url.is_empty()).then(|| file.url.clone()))
    .unwrap_or_else(|| DEFAULT_URL.to_string())
}

// ─── Entry point ──────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> Result<()> {
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::WARN.into())
        .from_env_lossy(),
    )
    .with_writer(std::io::stderr)
    .init();

  let args = Args::parse();

  let file_cfg: ConfigFile = if let Some(path) = &args.config {
    let raw = std::fs::read_to_string(path)
      .with_context(|| format!("reading config file {}", path.display()))?;
    toml::from_str(&raw).context("parsing config file")?
  } else {
    ConfigFile::default()
  };

  let base_url = resolve_base_url(args.url, &file_cfg);
  tracing::debug!(%base_url, "using server");
  let client = ApiClient::new(ApiConfig { base_url })?;

  run(&client, args.command).await
}

async fn run(client: &ApiClient, command: Command) -> Result<()> {
  match command {
    Command::Hub(HubCommand::Get { hub_id }) => match client.get_hub(&hub_id).await? {
      Some(hub) => print_json(&hub),
      None => bail!("hub {hub_id} not found"),
    },
    Command::Hub(HubCommand::Set { hub_id, gas_leak, owner }) => {
      let patch = HubPatch {
        gas_leak,
        owner_id: owner,
      };
      print_json(&client.put_hub(&hub_id, &patch).await?)
    }
    Command::User(UserCommand::Get { user_id }) => match client.get_user(&user_id).await? {
      Some(user) => print_json(&user),
      None => bail!("user {user_id} not found"),
    },
    Command::User(UserCommand::Set { user_id, token, alerts }) => {
      let patch = UserPatch {
        fcm_token:       token,
        gas_leak_alerts: alerts,
      };
      print_json(&client.put_user(&user_id, &patch).await?)
    }
    Command::Event(EventCommand::Send { hub_id, before, after, owner, id }) => {
      let update = build_event(hub_id, before, after, owner, id);
      print_json(&client.send_event(&update).await?)
    }
  }
}

/// A complete update event with both snapshots sharing the same owner.
fn build_event(
  hub_id: String,
  before: bool,
  after: bool,
  owner: Option<String>,
  id: Option<String>,
) -> HubUpdate {
  let snapshot = |gas_leak| HubSnapshot {
    gas_leak:    Some(gas_leak),
    owner_id:    owner.clone(),
    update_time: None,
  };
  HubUpdate {
    id:     Some(id.unwrap_or_else(|| Uuid::new_v4().to_string())),
    before: Some(snapshot(before)),
    after:  Some(snapshot(after)),
    params: UpdateParams { hub_id },
  }
}

fn print_json(value: &impl Serialize) -> Result<()> {
  println!("{}", serde_json::to_string_pretty(value)?);
  Ok(())
}
