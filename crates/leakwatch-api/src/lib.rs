//! JSON API for leakwatch.
//!
//! Exposes an axum [`Router`] backed by any store implementing both
//! [`UserStore`] and [`HubStore`], and a [`Dispatcher`] sharing that store.
//! TLS and transport concerns are the caller's responsibility.
//!
//! # Mounting
//!
//! ```rust,ignore
//! .nest("/api", leakwatch_api::api_router(state))
//! ```

pub mod error;
pub mod events;
pub mod hubs;
pub mod users;

use std::sync::Arc;

use axum::{
  Router,
  routing::{get, post},
};
use leakwatch_core::{
  push::PushSender,
  store::{HubStore, UserStore},
};
use leakwatch_dispatch::Dispatcher;

pub use error::ApiError;

/// Shared state threaded through all handlers.
pub struct ApiState<S, P> {
  pub store:      Arc<S>,
  pub dispatcher: Arc<Dispatcher<S, P>>,
}

impl<S, P> Clone for ApiState<S, P> {
  fn clone(&self) -> Self {
    Self {
      store:      self.store.clone(),
      dispatcher: self.dispatcher.clone(),
    }
  }
}

/// Build a fully-materialised API router.
///
/// The returned `Router<()>` can be nested into any parent router regardless
/// of its own state type.
pub fn api_router<S, P>(state: ApiState<S, P>) -> Router<()>
where
  S: UserStore + HubStore + 'static,
  P: PushSender + 'static,
{
  Router::new()
    // Update events
    .route("/events/hub-updated", post(events::hub_updated::<S, P>))
    // Ingest
    .route("/hubs/{id}", get(hubs::get_one::<S, P>).put(hubs::put::<S, P>))
    .route("/users/{id}", get(users::get_one::<S, P>).put(users::put::<S, P>))
    .with_state(state)
}

// ─── Integration tests ────────────────────────────────────────────────────────
