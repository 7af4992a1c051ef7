//! The typed result of a single dispatch.

use serde::Serialize;

/// How a dispatch ended.
///
/// Only [`Sent`](Self::Sent) and [`DeliveryFailed`](Self::DeliveryFailed)
/// involve a delivery attempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum DispatchOutcome {
  /// The event lacked a before or after snapshot.
  Malformed,
  /// Not a `false` to `true` transition of the leak flag.
  Suppressed,
  /// This transition was already handled.
  Duplicate,
  SkippedNoOwner,
  SkippedNoUser { owner_id: String },
  /// The owner turned gas-leak alerts off.
  SkippedDisabled { owner_id: String },
  SkippedNoToken { owner_id: String },
  /// The user lookup failed or timed out.
  StoreFailed { reason: String },
  Sent { message_id: String },
  DeliveryFailed { reason: String },
}

impl DispatchOutcome {
  pub fn is_sent(&self) -> bool { matches!(self, Self::Sent { .. }) }

  /// Whether a delivery was attempted.
  pub fn attempted_delivery(&self) -> bool {
    matches!(self, Self::Sent { .. } | Self::DeliveryFailed { .. })
  }

  /// Failures a redelivery of the same event may get past.
  pub fn is_transient(&self) -> bool {
    matches!(self, Self::StoreFailed { .. } | Self::DeliveryFailed { .. })
  }
}
