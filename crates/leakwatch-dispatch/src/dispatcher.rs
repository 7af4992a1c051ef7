//! [`Dispatcher`]: the trigger, evaluate, notify flow.

use std::{future::Future, sync::Arc, time::Duration};

use leakwatch_core::{
  hub::{HubSnapshot, HubUpdate, is_rising_edge},
  message::PushMessage,
  push::PushSender,
  store::UserStore,
};
use serde::Deserialize;
use tokio::time::timeout;

use crate::{ledger::RecentDeliveries, outcome::DispatchOutcome};

// ─── Configuration ───────────────────────────────────────────────────────────

/// Tunables for a [`Dispatcher`].
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DispatchConfig {
  /// Upper bound on each awaited call (user lookup, delivery).
  pub call_timeout_secs: u64,
  /// How many recent transitions the redelivery guard remembers. `0`
  /// disables the guard.
  pub dedup_window:      usize,
}

impl Default for DispatchConfig {
  fn default() -> Self {
    Self {
      call_timeout_secs: 10,
      dedup_window:      1024,
    }
  }
}

impl DispatchConfig {
  pub fn call_timeout(&self) -> Duration { Duration::from_secs(self.call_timeout_secs) }
}

// ─── Dispatcher ──────────────────────────────────────────────────────────────

/// Reacts to hub updates by notifying the hub's owner of a new gas leak.
///
/// Holds no mutable state besides the redelivery ledger, so one instance can
/// serve concurrent invocations.
pub struct Dispatcher<U, P> {
  users:        Arc<U>,
  push:         Arc<P>,
  call_timeout: Duration,
  ledger:       Option<RecentDeliveries>,
}

impl<U, P> Dispatcher<U, P>
where
  U: UserStore,
  P: PushSender,
{
  pub fn new(users: Arc<U>, push: Arc<P>, config: DispatchConfig) -> Self {
    let ledger =
      (config.dedup_window > 0).then(|| RecentDeliveries::new(config.dedup_window));
    Self {
      users,
      push,
      call_timeout: config.call_timeout(),
      ledger,
    }
  }

  /// Handle one update event. Never fails; the outcome says what happened.
  pub async fn handle(&self, update: &HubUpdate) -> DispatchOutcome {
    let hub_id = update.hub_id();

    let Some((before, after)) = update.snapshots() else {
      tracing::warn!(hub_id, "update event is missing a before or after snapshot");
      return DispatchOutcome::Malformed;
    };

    if !is_rising_edge(before, after) {
      tracing::debug!(
        hub_id,
        before = ?before.gas_leak,
        after = ?after.gas_leak,
        "no rising edge on gasLeak"
      );
      return DispatchOutcome::Suppressed;
    }

    tracing::info!(hub_id, "gas leak detected");

    let claim = match (&self.ledger, update.idempotency_key()) {
      (Some(ledger), Some(key)) => match ledger.try_claim(&key) {
        Some(claim) => Some(claim),
        None => {
          tracing::info!(hub_id, key = %key, "transition already handled");
          return DispatchOutcome::Duplicate;
        }
      },
      _ => None,
    };

    let outcome = self.notify_owner(hub_id, after).await;

    // A transient outcome drops the claim, which frees the key for a retry.
    if let Some(claim) = claim
      && !outcome.is_transient()
    {
      claim.commit();
    }
    outcome
  }

  async fn notify_owner(&self, hub_id: &str, after: &HubSnapshot) -> DispatchOutcome {
    let Some(owner_id) = after.owner() else {
      tracing::error!(hub_id, "hub has no ownerId; notification cannot be sent");
      return DispatchOutcome::SkippedNoOwner;
    };

    let user = match self.bounded(self.users.get_user(owner_id)).await {
      Ok(Some(user)) => user,
      Ok(None) => {
        tracing::error!(hub_id, owner_id, "owner user record not found");
        return DispatchOutcome::SkippedNoUser { owner_id: owner_id.to_owned() };
      }
      Err(reason) => {
        tracing::error!(hub_id, owner_id, %reason, "user lookup failed");
        return DispatchOutcome::StoreFailed { reason };
      }
    };

    if !user.gas_leak_alerts_enabled() {
      tracing::debug!(hub_id, owner_id, "gas leak alerts disabled by owner");
      return DispatchOutcome::SkippedDisabled { owner_id: owner_id.to_owned() };
    }

    let Some(token) = user.delivery_token() else {
      tracing::error!(hub_id, owner_id, "owner has no delivery token");
      return DispatchOutcome::SkippedNoToken { owner_id: owner_id.to_owned() };
    };

    let message = PushMessage::gas_leak_alert(hub_id, token);
    tracing::info!(hub_id, owner_id, "sending gas leak notification");

    match self.bounded(self.push.send(&message)).await {
      Ok(message_id) => {
        tracing::info!(hub_id, owner_id, message_id = %message_id, "notification sent");
        DispatchOutcome::Sent { message_id }
      }
      Err(reason) => {
        tracing::error!(hub_id, owner_id, %reason, "error sending push notification");
        DispatchOutcome::DeliveryFailed { reason }
      }
    }
  }

  /// Await `call` under the configured timeout, flattening both failure
  /// kinds into a message.
  async fn bounded<T, E>(
    &self,
    call: impl Future<Output = Result<T, E>>,
  ) -> Result<T, String>
  where
    E: std::fmt::Display,
  {
    match timeout(self.call_timeout, call).await {
      Ok(Ok(value)) => Ok(value),
      Ok(Err(e)) => Err(e.to_string()),
      Err(_) => Err(format!("timed out after {:?}", self.call_timeout)),
    }
  }
}
