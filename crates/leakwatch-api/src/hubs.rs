//! Handlers for `/hubs` endpoints: the ingest path for device state.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/hubs/:id` | 404 if not found |
//! | `PUT`  | `/hubs/:id` | Body: [`HubPatch`]; returns the stored hub |
//!
//! A `PUT` that changes an existing hub is an update event: it is handed to
//! the dispatcher on a background task, so the device never waits on the
//! push service.

use axum::{
  Json,
  extract::{Path, State},
};
use leakwatch_core::{
  hub::{Hub, HubPatch},
  id::validate_hub_id,
  push::PushSender,
  store::{HubStore, UserStore},
};

use crate::{ApiState, error::ApiError};

/// `GET /hubs/:id`
pub async fn get_one<S, P>(
  State(state): State<ApiState<S, P>>,
  Path(hub_id): Path<String>,
) -> Result<Json<Hub>, ApiError>
where
  S: UserStore + HubStore + 'static,
  P: PushSender + 'static,
{
  validate_hub_id(&hub_id)?;
  let hub = state
    .store
    .get_hub(&hub_id)
    .await
    .map_err(ApiError::store)?
    .ok_or_else(|| ApiError::NotFound(format!("hub {hub_id} not found")))?;
  Ok(Json(hub))
}

/// `PUT /hubs/:id`
pub async fn put<S, P>(
  State(state): State<ApiState<S, P>>,
  Path(hub_id): Path<String>,
  Json(patch): Json<HubPatch>,
) -> Result<Json<Hub>, ApiError>
where
  S: UserStore + HubStore + 'static,
  P: PushSender + 'static,
{
  validate_hub_id(&hub_id)?;
  let write = state
    .store
    .write_hub(&hub_id, patch)
    .await
    .map_err(ApiError::store)?;
  let hub = write.after.clone();

  if let Some(update) = write.into_update() {
    let dispatcher = state.dispatcher.clone();
    tokio::spawn(async move {
      let outcome = dispatcher.handle(&update).await;
      tracing::debug!(hub_id = update.hub_id(), ?outcome, "dispatch finished");
    });
  }

  Ok(Json(hub))
}
