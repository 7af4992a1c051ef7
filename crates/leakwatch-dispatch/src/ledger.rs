//! [`RecentDeliveries`]: the in-process redelivery guard.

use std::{
  collections::{HashSet, VecDeque},
  sync::{Mutex, PoisonError},
};

/// A bounded set of recently claimed idempotency keys.
///
/// Event sources deliver at least once, so the same transition can arrive
/// twice. Claiming a key before delivery makes the second arrival a no-op.
/// When full, the oldest key is evicted.
#[derive(Debug)]
pub struct RecentDeliveries {
  capacity: usize,
  inner:    Mutex<Inner>,
}

#[derive(Debug, Default)]
struct Inner {
  order: VecDeque<String>,
  keys:  HashSet<String>,
}

impl RecentDeliveries {
  /// A ledger remembering at most `capacity` keys. Capacity `0` remembers
  /// nothing, so every claim succeeds.
  pub fn new(capacity: usize) -> Self {
    Self {
      capacity,
      inner: Mutex::new(Inner::default()),
    }
  }

  /// Claim `key`. Returns `None` if it is already held.
  ///
  /// The returned [`Claim`] gives the key back when dropped, unless
  /// [`Claim::commit`] was called first. A dispatch that is cancelled midway
  /// therefore leaves the key free for the redelivery.
  pub fn try_claim(&self, key: &str) -> Option<Claim<'_>> {
    if self.capacity == 0 {
      return Some(Claim { ledger: self, key: None });
    }
    let mut inner = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
    if inner.keys.contains(key) {
      return None;
    }
    inner.keys.insert(key.to_owned());
    inner.order.push_back(key.to_owned());
    while inner.order.len() > self.capacity {
      if let Some(evicted) = inner.order.pop_front() {
        inner.keys.remove(&evicted);
      }
    }
    Some(Claim {
      ledger: self,
      key:    Some(key.to_owned()),
    })
  }

  /// Give `key` back so a later redelivery can claim it again.
  fn release(&self, key: &str) {
    let mut inner = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
    if inner.keys.remove(key) {
      inner.order.retain(|k| k != key);
    }
  }

  pub fn len(&self) -> usize {
    self
      .inner
      .lock()
      .unwrap_or_else(PoisonError::into_inner)
      .keys
      .len()
  }

  pub fn is_empty(&self) -> bool { self.len() == 0 }
}

/// A held key in a [`RecentDeliveries`] ledger. Released on drop unless
/// committed.
#[derive(Debug)]
#[must_use = "dropping a claim releases the key immediately"]
pub struct Claim<'a> {
  ledger: &'a RecentDeliveries,
  key:    Option<String>,
}

impl Claim<'_> {
  /// Keep the key held after this claim is dropped.
  pub fn commit(mut self) { self.key = None; }
}

impl Drop for Claim<'_> {
  fn drop(&mut self) {
    if let Some(key) = self.key.take() {
      self.ledger.release(&key);
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn hold(ledger: &RecentDeliveries, key: &str) -> bool {
    match ledger.try_claim(key) {
      Some(claim) => {
        claim.commit();
        true
      }
      None => false,
    }
  }

  #[test]
  fn second_claim_of_same_key_fails() {
    let ledger = RecentDeliveries::new(8);
    assert!(hold(&ledger, "a"));
    assert!(!hold(&ledger, "a"));
    assert!(hold(&ledger, "b"));
    assert_eq!(ledger.len(), 2);
  }

  #[test]
  fn dropped_claim_releases_key() {
    let ledger = RecentDeliveries::new(8);
    let claim = ledger.try_claim("a");
    assert!(claim.is_some());
    assert!(ledger.try_claim("a").is_none());
    drop(claim);
    assert!(ledger.is_empty());
    assert!(hold(&ledger, "a"));
  }

  #[test]
  fn committed_claim_keeps_key() {
    let ledger = RecentDeliveries::new(8);
    if let Some(claim) = ledger.try_claim("a") {
      claim.commit();
    }
    assert_eq!(ledger.len(), 1);
    assert!(ledger.try_claim("a").is_none());
  }

  #[test]
  fn oldest_key_is_evicted_at_capacity() {
    let ledger = RecentDeliveries::new(2);
    assert!(hold(&ledger, "a"));
    assert!(hold(&ledger, "b"));
    assert!(hold(&ledger, "c"));
    assert_eq!(ledger.len(), 2);
    // "a" fell out, "c" is still held.
    assert!(hold(&ledger, "a"));
    assert!(!hold(&ledger, "c"));
  }

  #[test]
  fn zero_capacity_never_deduplicates() {
    let ledger = RecentDeliveries::new(0);
    assert!(hold(&ledger, "a"));
    assert!(hold(&ledger, "a"));
    assert!(ledger.is_empty());
  }
}
