//! Identifier validation for hub and user ids.
//!
//! Ids double as document keys (`hubs/{hubId}`, `users/{userId}`), so they
//! follow document-id rules.

use crate::{Error, Result};

/// Maximum id length in bytes.
pub const MAX_ID_BYTES: usize = 1500;

/// Validate a hub id.
pub fn validate_hub_id(id: &str) -> Result<()> { validate("hub", id) }

/// Validate a user id.
pub fn validate_user_id(id: &str) -> Result<()> { validate("user", id) }

fn validate(kind: &'static str, id: &str) -> Result<()> {
  if id.is_empty() {
    return Err(Error::EmptyId { kind });
  }
  if id.len() > MAX_ID_BYTES {
    return Err(Error::IdTooLong { kind, max: MAX_ID_BYTES });
  }
  let reason = if id.contains('/') {
    Some("must not contain '/'")
  } else if id == "." || id == ".." {
    Some("must not be '.' or '..'")
  } else {
    None
  };
  match reason {
    Some(reason) => Err(Error::InvalidId {
      kind,
      id: id.to_owned(),
      reason,
    }),
    None => Ok(()),
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn accepts_ordinary_ids() {
    assert!(validate_hub_id("hub-0042").is_ok());
    assert!(validate_user_id("Xy9_aBc").is_ok());
  }

  #[test]
  fn rejects_empty_and_path_like_ids() {
    assert!(matches!(validate_hub_id(""), Err(Error::EmptyId { kind: "hub" })));
    assert!(matches!(validate_user_id("a/b"), Err(Error::InvalidId { .. })));
    assert!(matches!(validate_user_id(".."), Err(Error::InvalidId { .. })));
  }

  #[test]
  fn rejects_oversized_ids() {
    let long = "h".repeat(MAX_ID_BYTES + 1);
    assert!(matches!(validate_hub_id(&long), Err(Error::IdTooLong { .. })));
  }
}
