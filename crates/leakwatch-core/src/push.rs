//! The push-delivery seam.

use std::future::Future;

use crate::message::PushMessage;

/// A push-delivery service that routes a message to the device identified by
/// [`PushMessage::token`].
pub trait PushSender: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// Deliver `message` and return the service-assigned message id.
  fn send<'a>(
    &'a self,
    message: &'a PushMessage,
  ) -> impl Future<Output = Result<String, Self::Error>> + Send + 'a;
}
