//! The change-triggered alert dispatcher.
//!
//! [`Dispatcher::handle`] is invoked once per hub update event. It decides
//! whether the update is a rising edge of the gas-leak flag, resolves the
//! owner's delivery token and preference, and sends at most one push
//! notification. It never fails: every path ends in a [`DispatchOutcome`].

mod dispatcher;
mod ledger;
mod outcome;

pub use dispatcher::{DispatchConfig, Dispatcher};
pub use ledger::{Claim, RecentDeliveries};
pub use outcome::DispatchOutcome;
