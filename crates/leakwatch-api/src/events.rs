//! Handler for the update-event webhook.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `POST` | `/events/hub-updated` | Body: [`HubUpdate`]; always `200` with the [`DispatchOutcome`]. An undecodable body is `malformed`. |

use axum::{
  Json,
  extract::{State, rejection::JsonRejection},
};
use leakwatch_core::{
  hub::HubUpdate,
  push::PushSender,
  store::{HubStore, UserStore},
};
use leakwatch_dispatch::DispatchOutcome;

use crate::ApiState;

/// `POST /events/hub-updated`
///
/// Dispatch failures are part of the outcome, never an HTTP error, so the
/// event source does not redeliver because of them. The same holds for a
/// body that does not decode as an update event.
pub async fn hub_updated<S, P>(
  State(state): State<ApiState<S, P>>,
  body: Result<Json<HubUpdate>, JsonRejection>,
) -> Json<DispatchOutcome>
where
  S: UserStore + HubStore + 'static,
  P: PushSender + 'static,
{
  let update = match body {
    Ok(Json(update)) => update,
    Err(rejection) => {
      tracing::warn!(error = %rejection.body_text(), "undecodable update event");
      return Json(DispatchOutcome::Malformed);
    }
  };
  Json(state.dispatcher.handle(&update).await)
}
