//! [`LogSender`]: a push sender that only writes to the log.

use std::convert::Infallible;

use leakwatch_core::{message::PushMessage, push::PushSender};
use uuid::Uuid;

/// Logs each message instead of delivering it. Always succeeds.
#[derive(Debug, Clone, Default)]
pub struct LogSender;

impl PushSender for LogSender {
  type Error = Infallible;

  async fn send(&self, message: &PushMessage) -> Result<String, Infallible> {
    let id = format!("dry-run/{}", Uuid::new_v4());
    tracing::info!(
      message_id = %id,
      hub_id = message.hub_id().unwrap_or_default(),
      title = %message.notification.title,
      "dry run: push notification not delivered"
    );
    Ok(id)
  }
}
