//! Async HTTP client wrapping the leakwatch JSON API.

use std::time::Duration;

use anyhow::{Context, Result, anyhow};
use leakwatch_core::{
  hub::{Hub, HubPatch, HubUpdate},
  user::{UserPatch, UserRecord},
};
use reqwest::{Client, Response, StatusCode, Url};
use serde::de::DeserializeOwned;
use serde_json::Value;

/// Connection settings for the leakwatch API.
#[derive(Debug, Clone)]
pub struct ApiConfig {
  pub base_url: String,
}

/// Async HTTP client for the leakwatch JSON API.
///
/// Cheap to clone; the inner [`reqwest::Client`] is `Arc`-based.
#[derive(Clone)]
pub struct ApiClient {
  client: Client,
  config: ApiConfig,
}

impl ApiClient {
  pub fn new(config: ApiConfig) -> Result<Self> {
    let client = Client::builder()
      .timeout(Duration::from_secs(30))
      .build()
      .context("failed to build HTTP client")?;
    Ok(Self { client, config })
  }

  /// `{base_url}/api/{segments...}`, each segment percent-encoded.
  fn url(&self, segments: &[&str]) -> Result<Url> {
    let mut url = Url::parse(&self.config.base_url)
      .with_context(|| format!("invalid base URL {:?}", self.config.base_url))?;
    url
      .path_segments_mut()
      .map_err(|()| anyhow!("base URL {:?} cannot carry a path", self.config.base_url))?
      .pop_if_empty()
      .push("api")
      .extend(segments);
    Ok(url)
  }

  // ── Hubs ──────────────────────────────────────────────────────────────────

  /// `GET /api/hubs/{id}`; `None` on 404.
  pub async fn get_hub(&self, hub_id: &str) -> Result<Option<Hub>> {
    let resp = self
      .client
      .get(self.url(&["hubs", hub_id])?)
      .send()
      .await
      .context("GET /hubs failed")?;
    optional(resp, "GET /hubs").await
  }

  /// `PUT /api/hubs/{id}`
  pub async fn put_hub(&self, hub_id: &str, patch: &HubPatch) -> Result<Hub> {
    let resp = self
      .client
      .put(self.url(&["hubs", hub_id])?)
      .json(patch)
      .send()
      .await
      .context("PUT /hubs failed")?;
    parse(resp, "PUT /hubs").await
  }

  // ── Users ─────────────────────────────────────────────────────────────────

  /// `GET /api/users/{id}`; `None` on 404.
  pub async fn get_user(&self, user_id: &str) -> Result<Option<UserRecord>> {
    let resp = self
      .client
      .get(self.url(&["users", user_id])?)
      .send()
      .await
      .context("GET /users failed")?;
    optional(resp, "GET /users").await
  }

  /// `PUT /api/users/{id}`
  pub async fn put_user(&self, user_id: &str, patch: &UserPatch) -> Result<UserRecord> {
    let resp = self
      .client
      .put(self.url(&["users", user_id])?)
      .json(patch)
      .send()
      .await
      .context("PUT /users failed")?;
    parse(resp, "PUT /users").await
  }

  // ── Events ────────────────────────────────────────────────────────────────

  /// `POST /api/events/hub-updated`; returns the dispatch outcome.
  pub async fn send_event(&self, update: &HubUpdate) -> Result<Value> {
    let resp = self
      .client
      .post(self.url(&["events", "hub-updated"])?)
      .json(update)
      .send()
      .await
      .context("POST /events/hub-updated failed")?;
    parse(resp, "POST /events/hub-updated").await
  }
}

async fn parse<T: DeserializeOwned>(resp: Response, what: &str) -> Result<T> {
  let status = resp.status();
  if !status.is_success() {
    let detail = resp
      .json::<Value>()
      .await
      .ok()
      .and_then(|v| v["error"].as_str().map(str::to_owned))
      .unwrap_or_default();
    return Err(anyhow!("{what} → {status} {detail}"));
  }
  resp.json().await.with_context(|| format!("deserialising {what} response"))
}

async fn optional<T: DeserializeOwned>(resp: Response, what: &str) -> Result<Option<T>> {
  if resp.status() == StatusCode::NOT_FOUND {
    return Ok(None);
  }
  parse(resp, what).await.map(Some)
}
