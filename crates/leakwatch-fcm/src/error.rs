//! Error type for `leakwatch-fcm`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("http error: {0}")]
  Http(#[from] reqwest::Error),

  /// FCM answered with a non-success status.
  #[error("fcm rejected message with status {status}: {message}")]
  Rejected {
    status:  u16,
    /// FCM error code from the response details, e.g. `UNREGISTERED`.
    code:    Option<String>,
    message: String,
  },

  #[error("invalid fcm configuration: {0}")]
  Config(String),
}

impl Error {
  /// Whether the target token is no longer valid and should be discarded.
  pub fn is_unregistered(&self) -> bool {
    matches!(self, Self::Rejected { code: Some(code), .. } if code == "UNREGISTERED")
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
