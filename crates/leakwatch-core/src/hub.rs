//! Hub records, snapshots and update events.
//!
//! A hub is a monitored device carrying a gas-leak flag. The dispatcher never
//! sees a [`Hub`] directly: it is handed a [`HubUpdate`] holding the state
//! immediately before and after a write.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ─── Stored record ───────────────────────────────────────────────────────────

/// The stored state of a hub.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Hub {
  pub hub_id:     String,
  pub gas_leak:   bool,
  pub owner_id:   Option<String>,
  /// Set by the store on every write.
  pub updated_at: DateTime<Utc>,
}

impl Hub {
  /// The snapshot an update event carries for this state.
  pub fn snapshot(&self) -> HubSnapshot {
    HubSnapshot {
      gas_leak:    Some(self.gas_leak),
      owner_id:    self.owner_id.clone(),
      update_time: Some(self.updated_at),
    }
  }
}

/// A partial write to a hub. Fields left as `None` keep their stored value.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HubPatch {
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub gas_leak: Option<bool>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub owner_id: Option<String>,
}

/// The result of [`HubStore::write_hub`](crate::store::HubStore::write_hub).
#[derive(Debug, Clone)]
pub struct HubWrite {
  /// `None` when the write created the hub.
  pub before: Option<Hub>,
  pub after:  Hub,
}

impl HubWrite {
  /// The update event for this write, or `None` if the hub was created.
  pub fn into_update(self) -> Option<HubUpdate> {
    let before = self.before?;
    Some(HubUpdate {
      id:     None,
      before: Some(before.snapshot()),
      after:  Some(self.after.snapshot()),
      params: UpdateParams { hub_id: self.after.hub_id },
    })
  }
}

// ─── Update events ───────────────────────────────────────────────────────────

/// The state of a hub as seen by an update event.
///
/// Every field is optional because events arrive from outside: `gas_leak`
/// missing is neither `true` nor `false`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HubSnapshot {
  #[serde(default)]
  pub gas_leak:    Option<bool>,
  #[serde(default)]
  pub owner_id:    Option<String>,
  /// Commit time of the write that produced this state, when known.
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub update_time: Option<DateTime<Utc>>,
}

impl HubSnapshot {
  /// The owner reference, treating an empty string as absent.
  pub fn owner(&self) -> Option<&str> {
    self.owner_id.as_deref().filter(|id| !id.is_empty())
  }
}

/// Path parameters of the updated document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateParams {
  pub hub_id: String,
}

/// An update event on a hub record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HubUpdate {
  /// Event id assigned by the event source, if any.
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub id:     Option<String>,
  #[serde(default)]
  pub before: Option<HubSnapshot>,
  #[serde(default)]
  pub after:  Option<HubSnapshot>,
  pub params: UpdateParams,
}

impl HubUpdate {
  pub fn hub_id(&self) -> &str { &self.params.hub_id }

  /// Both snapshots, or `None` if the event is partial.
  pub fn snapshots(&self) -> Option<(&HubSnapshot, &HubSnapshot)> {
    Some((self.before.as_ref()?, self.after.as_ref()?))
  }

  /// Whether this update flips the leak flag from `false` to `true`.
  pub fn is_rising_edge(&self) -> bool {
    self
      .snapshots()
      .is_some_and(|(before, after)| is_rising_edge(before, after))
  }

  /// Key identifying this transition across redeliveries.
  ///
  /// The event id when the source supplied one, otherwise the hub id and the
  /// commit time of the after snapshot. `None` when neither is known.
  pub fn idempotency_key(&self) -> Option<String> {
    if let Some(id) = self.id.as_deref().filter(|id| !id.is_empty()) {
      return Some(id.to_owned());
    }
    let at = self.after.as_ref()?.update_time?;
    Some(format!("{}@{}", self.params.hub_id, at.to_rfc3339()))
  }
}

/// `true` only for a `false` to `true` transition of the leak flag.
pub fn is_rising_edge(before: &HubSnapshot, after: &HubSnapshot) -> bool {
  before.gas_leak == Some(false) && after.gas_leak == Some(true)
}

#[cfg(test)]
mod tests {
  use super::*;

  fn snap(gas_leak: Option<bool>) -> HubSnapshot {
    HubSnapshot {
      gas_leak,
      owner_id: Some("u1".into()),
      update_time: None,
    }
  }

  #[test]
  fn only_false_to_true_is_a_rising_edge() {
    let states = [None, Some(false), Some(true)];
    for before in states {
      for after in states {
        let expected = before == Some(false) && after == Some(true);
        assert_eq!(
          is_rising_edge(&snap(before), &snap(after)),
          expected,
          "{before:?} -> {after:?}"
        );
      }
    }
  }

  #[test]
  fn partial_event_is_never_a_rising_edge() {
    let update = HubUpdate {
      id:     None,
      before: None,
      after:  Some(snap(Some(true))),
      params: UpdateParams { hub_id: "h1".into() },
    };
    assert!(update.snapshots().is_none());
    assert!(!update.is_rising_edge());
  }

  #[test]
  fn empty_owner_is_absent() {
    let mut s = snap(Some(true));
    s.owner_id = Some(String::new());
    assert_eq!(s.owner(), None);
    s.owner_id = Some("u1".into());
    assert_eq!(s.owner(), Some("u1"));
  }

  #[test]
  fn deserialises_event_with_camel_case_fields() {
    let json = r#"{
      "before": {"gasLeak": false, "ownerId": "u1"},
      "after":  {"gasLeak": true,  "ownerId": "u1"},
      "params": {"hubId": "hub-7"}
    }"#;
    let update: HubUpdate = serde_json::from_str(json).unwrap();
    assert_eq!(update.hub_id(), "hub-7");
    assert!(update.is_rising_edge());
    assert_eq!(update.idempotency_key(), None);
  }

  #[test]
  fn idempotency_key_prefers_event_id() {
    let at = Utc::now();
    let mut after = snap(Some(true));
    after.update_time = Some(at);
    let mut update = HubUpdate {
      id:     Some("evt-1".into()),
      before: Some(snap(Some(false))),
      after:  Some(after),
      params: UpdateParams { hub_id: "h1".into() },
    };
    assert_eq!(update.idempotency_key().as_deref(), Some("evt-1"));

    update.id = None;
    assert_eq!(
      update.idempotency_key(),
      Some(format!("h1@{}", at.to_rfc3339()))
    );
  }

  #[test]
  fn creation_is_not_an_update() {
    let hub = Hub {
      hub_id:     "h1".into(),
      gas_leak:   true,
      owner_id:   None,
      updated_at: Utc::now(),
    };
    let write = HubWrite { before: None, after: hub.clone() };
    assert!(write.into_update().is_none());

    let write = HubWrite {
      before: Some(Hub { gas_leak: false, ..hub.clone() }),
      after:  hub,
    };
    let update = write.into_update().unwrap();
    assert!(update.is_rising_edge());
    assert!(update.idempotency_key().unwrap().starts_with("h1@"));
  }
}
