//! Async HTTP client for the FCM HTTP v1 `messages:send` endpoint.

use std::time::Duration;

use leakwatch_core::{message::PushMessage, push::PushSender};
use reqwest::Client;
use serde::Deserialize;

use crate::{
  Error, Result,
  wire::{ErrorResponse, SendRequest, SendResponse},
};

pub const DEFAULT_ENDPOINT: &str = "https://fcm.googleapis.com";

fn default_endpoint() -> String { DEFAULT_ENDPOINT.to_owned() }

fn default_timeout_secs() -> u64 { 10 }

/// Connection settings for FCM.
#[derive(Debug, Clone, Deserialize)]
pub struct FcmConfig {
  /// Firebase project id.
  pub project_id:   String,
  /// OAuth2 access token with the `firebase.messaging` scope. Minted outside
  /// this process (e.g. `gcloud auth print-access-token`).
  pub access_token: String,
  /// Base URL of the API; overridden in tests.
  #[serde(default = "default_endpoint")]
  pub endpoint:     String,
  #[serde(default = "default_timeout_secs")]
  pub timeout_secs: u64,
}

/// FCM HTTP v1 client.
///
/// Cheap to clone; the inner [`reqwest::Client`] is `Arc`-based.
#[derive(Clone)]
pub struct FcmClient {
  client: Client,
  config: FcmConfig,
}

impl FcmClient {
  pub fn new(config: FcmConfig) -> Result<Self> {
    if config.project_id.is_empty() {
      return Err(Error::Config("project_id must not be empty".into()));
    }
    if config.access_token.is_empty() {
      return Err(Error::Config("access_token must not be empty".into()));
    }
    let client = Client::builder()
      .timeout(Duration::from_secs(config.timeout_secs))
      .build()?;
    Ok(Self { client, config })
  }

  fn url(&self) -> String {
    format!(
      "{}/v1/projects/{}/messages:send",
      self.config.endpoint.trim_end_matches('/'),
      self.config.project_id
    )
  }

  /// `POST /v1/projects/{project}/messages:send`
  pub async fn send_message(&self, message: &PushMessage) -> Result<String> {
    let resp = self
      .client
      .post(self.url())
      .bearer_auth(&self.config.access_token)
      .json(&SendRequest::from(message))
      .send()
      .await?;

    let status = resp.status();
    if status.is_success() {
      let body: SendResponse = resp.json().await?;
      return Ok(body.name);
    }

    let text = resp.text().await.unwrap_or_default();
    let (code, message) = match serde_json::from_str::<ErrorResponse>(&text) {
      Ok(err) => (err.error.error_code(), err.error.message),
      Err(_) => (None, text),
    };
    tracing::debug!(status = status.as_u16(), ?code, "fcm rejected message");
    Err(Error::Rejected {
      status: status.as_u16(),
      code,
      message,
    })
  }
}

impl PushSender for FcmClient {
  type Error = Error;

  async fn send(&self, message: &PushMessage) -> Result<String> {
    self.send_message(message).await
  }
}

#[cfg(test)]
mod tests {
  use std::sync::{Arc, Mutex};

  use axum::{
    Json, Router,
    extract::State,
    http::{HeaderMap, StatusCode},
    routing::post,
  };
  use serde_json::{Value, json};
  use tokio::net::TcpListener;

  use super::*;

  #[derive(Clone, Default)]
  struct Captured {
    requests: Arc<Mutex<Vec<(Option<String>, Value)>>>,
  }

  async fn accept(
    State(captured): State<Captured>,
    headers: HeaderMap,
    Json(body): Json<Value>,
  ) -> (StatusCode, Json<Value>) {
    let auth = headers
      .get("authorization")
      .and_then(|v| v.to_str().ok())
      .map(str::to_owned);
    let token = body["message"]["token"].as_str().unwrap_or_default().to_owned();
    captured.requests.lock().unwrap().push((auth, body));

    if token == "stale" {
      return (
        StatusCode::NOT_FOUND,
        Json(json!({
          "error": {
            "code": 404,
            "message": "Requested entity was not found.",
            "status": "NOT_FOUND",
            "details": [{
              "@type": "type.googleapis.com/google.firebase.fcm.v1.FcmError",
              "errorCode": "UNREGISTERED"
            }]
          }
        })),
      );
    }
    (
      StatusCode::OK,
      Json(json!({"name": "projects/demo/messages/0:1234"})),
    )
  }

  /// Serve a fake FCM endpoint on an ephemeral port.
  async fn fake_fcm() -> (String, Captured) {
    let captured = Captured::default();
    let app = Router::new()
      .route("/v1/projects/demo/messages:send", post(accept))
      .with_state(captured.clone());
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
      axum::serve(listener, app).await.unwrap();
    });
    (format!("http://{addr}"), captured)
  }

  fn client(endpoint: String) -> FcmClient {
    FcmClient::new(FcmConfig {
      project_id: "demo".into(),
      access_token: "ya29.test".into(),
      endpoint,
      timeout_secs: 5,
    })
    .unwrap()
  }

  #[tokio::test]
  async fn sends_v1_request_with_bearer_token() {
    let (endpoint, captured) = fake_fcm().await;
    let fcm = client(endpoint);

    let msg = PushMessage::gas_leak_alert("hub-7", "tok1");
    let name = fcm.send(&msg).await.unwrap();
    assert_eq!(name, "projects/demo/messages/0:1234");

    let requests = captured.requests.lock().unwrap();
    assert_eq!(requests.len(), 1);
    let (auth, body) = &requests[0];
    assert_eq!(auth.as_deref(), Some("Bearer ya29.test"));
    assert_eq!(body["message"]["token"], "tok1");
    assert_eq!(body["message"]["android"]["priority"], "high");
    assert_eq!(body["message"]["data"]["hubId"], "hub-7");
  }

  #[tokio::test]
  async fn unregistered_token_is_reported() {
    let (endpoint, _captured) = fake_fcm().await;
    let fcm = client(endpoint);

    let err = fcm
      .send(&PushMessage::gas_leak_alert("hub-7", "stale"))
      .await
      .unwrap_err();

    assert!(err.is_unregistered(), "{err:?}");
    match err {
      Error::Rejected { status, message, .. } => {
        assert_eq!(status, 404);
        assert_eq!(message, "Requested entity was not found.");
      }
      other => panic!("unexpected error: {other:?}"),
    }
  }

  #[tokio::test]
  async fn unreachable_endpoint_is_an_http_error() {
    // Bind then drop to get a port nothing listens on.
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let err = client(format!("http://{addr}"))
      .send(&PushMessage::gas_leak_alert("h1", "tok1"))
      .await
      .unwrap_err();
    assert!(matches!(err, Error::Http(_)), "{err:?}");
  }

  #[test]
  fn empty_credentials_are_rejected() {
    let err = FcmClient::new(FcmConfig {
      project_id: "demo".into(),
      access_token: String::new(),
      endpoint: DEFAULT_ENDPOINT.into(),
      timeout_secs: 5,
    })
    .err()
    .unwrap();
    assert!(matches!(err, Error::Config(_)));
  }
}
