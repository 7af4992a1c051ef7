//! leakwatch server binary.
//!
//! Reads `config.toml` (or the path specified with `--config`), opens the
//! SQLite store, builds the configured push sender and serves the JSON API.
//!
//! ```
//! cargo run -p leakwatch-server -- --config config.toml
//! ```

mod sender;
mod settings;

use std::{
  path::{Path, PathBuf},
  sync::Arc,
};

use anyhow::Context as _;
use axum::{Router, routing::get};
use clap::Parser;
use leakwatch_api::{ApiState, api_router};
use leakwatch_core::{
  push::PushSender,
  store::{HubStore, UserStore},
};
use leakwatch_dispatch::Dispatcher;
use leakwatch_store_sqlite::SqliteStore;
use sender::ConfiguredSender;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about = "leakwatch gas-leak alert server")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, default_value = "config.toml")]
  config: PathBuf,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  // Initialise tracing.
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .init();

  let cli = Cli::parse();

  let server_cfg = settings::load(&cli.config)
    .with_context(|| format!("failed to load config from {:?}", cli.config))?;

  let store_path = expand_tilde(&server_cfg.store_path);
  let store = SqliteStore::open(&store_path)
    .await
    .with_context(|| format!("failed to open store at {store_path:?}"))?;
  let store = Arc::new(store);

  let push = ConfiguredSender::from_settings(&server_cfg.push)
    .context("failed to build push sender")?;
  tracing::info!(
    mode = push.mode(),
    call_timeout_secs = server_cfg.dispatch.call_timeout_secs,
    dedup_window = server_cfg.dispatch.dedup_window,
    "push delivery configured"
  );

  let dispatcher = Dispatcher::new(store.clone(), Arc::new(push), server_cfg.dispatch.clone());
  let app = app(ApiState {
    store,
    dispatcher: Arc::new(dispatcher),
  });

  let address = format!("{}:{}", server_cfg.host, server_cfg.port);
  tracing::info!("Listening on http://{address}");
  let listener = TcpListener::bind(&address)
    .await
    .with_context(|| format!("failed to bind {address}"))?;

  axum::serve(listener, app)
    .with_graceful_shutdown(shutdown_signal())
    .await
    .context("server error")?;

  tracing::info!("shut down");
  Ok(())
}

/// The full HTTP surface: health check plus the API under `/api`.
fn app<S, P>(state: ApiState<S, P>) -> Router
where
  S: UserStore + HubStore + 'static,
  P: PushSender + 'static,
{
  Router::new()
    .route("/healthz", get(healthz))
    .nest("/api", api_router(state))
    .layer(TraceLayer::new_for_http())
}

async fn healthz() -> &'static str { "ok" }

async fn shutdown_signal() {
  if let Err(e) = tokio::signal::ctrl_c().await {
    tracing::error!(error = %e, "failed to listen for ctrl-c");
    std::future::pending::<()>().await;
  }
  tracing::info!("shutdown requested");
}

/// Expand a leading `~` to the user's home directory.
fn expand_tilde(path: &Path) -> PathBuf {
  let s = path.to_string_lossy();
  if let Some(rest) = s.strip_prefix("~/")
    && let Ok(home) = std::env::var("HOME")
  {
    return PathBuf::from(home).join(rest);
  }
  path.to_path_buf()
}

#[cfg(test)]
mod tests {
  use axum::{
    body::Body,
    http::{Request, StatusCode},
  };
  use leakwatch_dispatch::DispatchConfig;
  use leakwatch_fcm::LogSender;
  use tower::ServiceExt as _;

  use super::*;

  async fn test_app() -> Router {
    let store = Arc::new(SqliteStore::open_in_memory().await.unwrap());
    let dispatcher = Dispatcher::new(store.clone(), Arc::new(LogSender), DispatchConfig::default());
    app(ApiState {
      store,
      dispatcher: Arc::new(dispatcher),
    })
  }

  #[tokio::test]
  async fn healthz_returns_ok() {
    let resp = test_app()
      .await
      .oneshot(Request::get("/healthz").body(Body::empty()).unwrap())
      .await
      .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
  }

  #[tokio::test]
  async fn api_is_nested() {
    let resp = test_app()
      .await
      .oneshot(Request::get("/api/hubs/h404").body(Body::empty()).unwrap())
      .await
      .unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
  }

  #[test]
  fn tilde_is_expanded() {
    if let Ok(home) = std::env::var("HOME") {
      assert_eq!(
        expand_tilde(Path::new("~/db.sqlite3")),
        PathBuf::from(home).join("db.sqlite3")
      );
    }
    assert_eq!(expand_tilde(Path::new("/tmp/x")), PathBuf::from("/tmp/x"));
  }
}
