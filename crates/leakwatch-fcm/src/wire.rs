//! FCM HTTP v1 request and response bodies.
//!
//! The sender-neutral [`PushMessage`] keeps the Android priority next to the
//! sound; v1 expects it one level up, at `android.priority`.

use std::collections::BTreeMap;

use leakwatch_core::message::{ApnsConfig, Notification, PushMessage};
use serde::{Deserialize, Serialize};

// ─── Request ─────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct SendRequest<'a> {
  pub message: WireMessage<'a>,
}

#[derive(Debug, Serialize)]
pub struct WireMessage<'a> {
  pub token:        &'a str,
  pub notification: &'a Notification,
  pub android:      WireAndroid<'a>,
  pub apns:         &'a ApnsConfig,
  pub data:         &'a BTreeMap<String, String>,
}

#[derive(Debug, Serialize)]
pub struct WireAndroid<'a> {
  pub priority:     &'a str,
  pub notification: WireAndroidNotification<'a>,
}

#[derive(Debug, Serialize)]
pub struct WireAndroidNotification<'a> {
  pub sound: &'a str,
}

impl<'a> From<&'a PushMessage> for SendRequest<'a> {
  fn from(m: &'a PushMessage) -> Self {
    Self {
      message: WireMessage {
        token:        &m.token,
        notification: &m.notification,
        android:      WireAndroid {
          priority:     &m.android.notification.priority,
          notification: WireAndroidNotification {
            sound: &m.android.notification.sound,
          },
        },
        apns:         &m.apns,
        data:         &m.data,
      },
    }
  }
}

// ─── Responses ───────────────────────────────────────────────────────────────

/// Success body: the resource name of the accepted message.
#[derive(Debug, Deserialize)]
pub struct SendResponse {
  pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct ErrorResponse {
  pub error: ErrorBody,
}

#[derive(Debug, Deserialize)]
pub struct ErrorBody {
  #[serde(default)]
  pub message: String,
  #[serde(default)]
  pub details: Vec<ErrorDetail>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorDetail {
  #[serde(default)]
  pub error_code: Option<String>,
}

impl ErrorBody {
  /// The first FCM error code among the details.
  pub fn error_code(&self) -> Option<String> {
    self.details.iter().find_map(|d| d.error_code.clone())
  }
}

#[cfg(test)]
mod tests {
  use serde_json::json;

  use super::*;

  #[test]
  fn request_moves_priority_to_android_level() {
    let msg = PushMessage::gas_leak_alert("hub-7", "tok1");
    let value = serde_json::to_value(SendRequest::from(&msg)).unwrap();

    assert_eq!(value["message"]["token"], "tok1");
    assert_eq!(value["message"]["android"]["priority"], "high");
    assert_eq!(value["message"]["android"]["notification"], json!({"sound": "default"}));
    assert_eq!(value["message"]["apns"]["payload"]["aps"]["sound"], "default");
    assert_eq!(value["message"]["data"]["hubId"], "hub-7");
    assert_eq!(value["message"]["data"]["status"], "GAS_LEAK");
    assert_eq!(value["message"]["notification"]["title"], "GAS LEAK DETECTED!");
  }

  #[test]
  fn error_code_is_read_from_details() {
    let body: ErrorResponse = serde_json::from_value(json!({
      "error": {
        "code": 404,
        "message": "Requested entity was not found.",
        "status": "NOT_FOUND",
        "details": [{
          "@type": "type.googleapis.com/google.firebase.fcm.v1.FcmError",
          "errorCode": "UNREGISTERED"
        }]
      }
    }))
    .unwrap();
    assert_eq!(body.error.error_code().as_deref(), Some("UNREGISTERED"));
    assert_eq!(body.error.message, "Requested entity was not found.");
  }
}
