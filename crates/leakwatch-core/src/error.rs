//! Error types for `leakwatch-core`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("{kind} id must not be empty")]
  EmptyId { kind: &'static str },

  #[error("{kind} id is longer than {max} bytes")]
  IdTooLong { kind: &'static str, max: usize },

  #[error("invalid {kind} id {id:?}: {reason}")]
  InvalidId {
    kind:   &'static str,
    id:     String,
    reason: &'static str,
  },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
