//! Push senders for leakwatch.
//!
//! [`FcmClient`] delivers through the Firebase Cloud Messaging HTTP v1 API.
//! [`LogSender`] only logs, for local development.

mod client;
mod dry_run;
mod wire;

pub mod error;

pub use client::{DEFAULT_ENDPOINT, FcmClient, FcmConfig};
pub use dry_run::LogSender;
pub use error::{Error, Result};
