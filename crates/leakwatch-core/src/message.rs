//! The push notification payload.
//!
//! Built on demand for each delivery and never persisted. The serialised form
//! is the sender-neutral shape; individual senders map it to their own wire
//! format.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

// ─── Fixed alert content ─────────────────────────────────────────────────────

pub const GAS_LEAK_TITLE: &str = "GAS LEAK DETECTED!";
pub const GAS_LEAK_BODY: &str = "A potential gas leak has been detected from \
                                 your Sentry Gas Hub. Please check immediately!";
/// Routing tag the mobile client matches on when the notification is tapped.
pub const CLICK_ACTION: &str = "FLUTTER_NOTIFICATION_CLICK";
pub const STATUS_GAS_LEAK: &str = "GAS_LEAK";
pub const DEFAULT_SOUND: &str = "default";
pub const PRIORITY_HIGH: &str = "high";

/// Keys of the custom data map.
pub mod data_keys {
  pub const CLICK_ACTION: &str = "click_action";
  pub const HUB_ID: &str = "hubId";
  pub const STATUS: &str = "status";
}

// ─── Payload ─────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
  pub title: String,
  pub body:  String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AndroidNotification {
  pub sound:    String,
  pub priority: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AndroidConfig {
  pub notification: AndroidNotification,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Aps {
  pub sound: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApnsPayload {
  pub aps: Aps,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApnsConfig {
  pub payload: ApnsPayload,
}

/// A notification addressed to a single device token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PushMessage {
  pub notification: Notification,
  pub android:      AndroidConfig,
  pub apns:         ApnsConfig,
  pub data:         BTreeMap<String, String>,
  pub token:        String,
}

impl PushMessage {
  /// The gas-leak alert for `hub_id`, addressed to `token`.
  pub fn gas_leak_alert(hub_id: &str, token: &str) -> Self {
    let data = BTreeMap::from([
      (data_keys::CLICK_ACTION.to_owned(), CLICK_ACTION.to_owned()),
      (data_keys::HUB_ID.to_owned(), hub_id.to_owned()),
      (data_keys::STATUS.to_owned(), STATUS_GAS_LEAK.to_owned()),
    ]);

    Self {
      notification: Notification {
        title: GAS_LEAK_TITLE.to_owned(),
        body:  GAS_LEAK_BODY.to_owned(),
      },
      android: AndroidConfig {
        notification: AndroidNotification {
          sound:    DEFAULT_SOUND.to_owned(),
          priority: PRIORITY_HIGH.to_owned(),
        },
      },
      apns: ApnsConfig {
        payload: ApnsPayload {
          aps: Aps { sound: DEFAULT_SOUND.to_owned() },
        },
      },
      data,
      token: token.to_owned(),
    }
  }

  /// The hub this message is about, if it carries one.
  pub fn hub_id(&self) -> Option<&str> {
    self.data.get(data_keys::HUB_ID).map(String::as_str)
  }
}
