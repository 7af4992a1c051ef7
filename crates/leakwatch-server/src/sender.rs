//! [`ConfiguredSender`]: the push sender chosen by [`PushSettings`].

use leakwatch_core::{message::PushMessage, push::PushSender};
use leakwatch_fcm::{FcmClient, LogSender};

use crate::settings::PushSettings;

pub enum ConfiguredSender {
  Log(LogSender),
  Fcm(FcmClient),
}

impl ConfiguredSender {
  pub fn from_settings(settings: &PushSettings) -> leakwatch_fcm::Result<Self> {
    Ok(match settings {
      PushSettings::Log => Self::Log(LogSender),
      PushSettings::Fcm(cfg) => Self::Fcm(FcmClient::new(cfg.clone())?),
    })
  }

  pub fn mode(&self) -> &'static str {
    match self {
      Self::Log(_) => "log",
      Self::Fcm(_) => "fcm",
    }
  }
}

impl PushSender for ConfiguredSender {
  type Error = leakwatch_fcm::Error;

  async fn send(&self, message: &PushMessage) -> leakwatch_fcm::Result<String> {
    match self {
      Self::Log(sender) => match sender.send(message).await {
        Ok(id) => Ok(id),
        Err(never) => match never {},
      },
      Self::Fcm(client) => client.send(message).await,
    }
  }
}
