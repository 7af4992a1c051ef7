//! User records: the recipients of alerts.

use serde::{Deserialize, Serialize};

/// A notification recipient.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserRecord {
  pub user_id:         String,
  /// Opaque per-device delivery token.
  #[serde(default)]
  pub fcm_token:       Option<String>,
  /// Stored preference; read it through
  /// [`gas_leak_alerts_enabled`](Self::gas_leak_alerts_enabled).
  #[serde(default)]
  pub gas_leak_alerts: Option<bool>,
}

impl UserRecord {
  /// Preference applied when a user has never set `gasLeakAlerts`.
  pub const DEFAULT_GAS_LEAK_ALERTS: bool = true;

  /// Whether gas-leak alerts should be delivered to this user.
  ///
  /// Falls back to [`Self::DEFAULT_GAS_LEAK_ALERTS`] when unset.
  pub fn gas_leak_alerts_enabled(&self) -> bool {
    self.gas_leak_alerts.unwrap_or(Self::DEFAULT_GAS_LEAK_ALERTS)
  }

  /// The delivery token, treating an empty string as absent.
  pub fn delivery_token(&self) -> Option<&str> {
    self.fcm_token.as_deref().filter(|t| !t.is_empty())
  }
}

/// A partial write to a user record. Fields left as `None` keep their stored
/// value.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserPatch {
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub fcm_token:       Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub gas_leak_alerts: Option<bool>,
}

#[cfg(test)]
mod tests {
  use super::*;

  fn user(token: Option<&str>, alerts: Option<bool>) -> UserRecord {
    UserRecord {
      user_id:         "u1".into(),
      fcm_token:       token.map(str::to_owned),
      gas_leak_alerts: alerts,
    }
  }

  #[test]
  fn alerts_default_to_enabled() {
    assert!(user(None, None).gas_leak_alerts_enabled());
    assert!(user(None, Some(true)).gas_leak_alerts_enabled());
    assert!(!user(None, Some(false)).gas_leak_alerts_enabled());
  }

  #[test]
  fn empty_token_is_absent() {
    assert_eq!(user(Some(""), None).delivery_token(), None);
    assert_eq!(user(Some("tok1"), None).delivery_token(), Some("tok1"));
  }

  #[test]
  fn missing_fields_deserialise_as_none() {
    let u: UserRecord = serde_json::from_str(r#"{"userId":"u1"}"#).unwrap();
    assert_eq!(u, user(None, None));
  }
}
