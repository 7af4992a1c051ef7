//! Core types and trait definitions for leakwatch.
//!
//! This crate is deliberately free of HTTP and database dependencies. The
//! dispatcher, the storage backend and the push senders all depend on it.

pub mod error;
pub mod hub;
pub mod id;
pub mod message;
pub mod push;
pub mod store;
pub mod user;

pub use error::{Error, Result};
