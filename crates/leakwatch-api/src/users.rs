//! Handlers for `/users` endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/users/:id` | 404 if not found |
//! | `PUT`  | `/users/:id` | Body: [`UserPatch`]; upsert, returns the record |

use axum::{
  Json,
  extract::{Path, State},
};
use leakwatch_core::{
  id::validate_user_id,
  push::PushSender,
  store::{HubStore, UserStore},
  user::{UserPatch, UserRecord},
};

use crate::{ApiState, error::ApiError};

/// `GET /users/:id`
pub async fn get_one<S, P>(
  State(state): State<ApiState<S, P>>,
  Path(user_id): Path<String>,
) -> Result<Json<UserRecord>, ApiError>
where
  S: UserStore + HubStore + 'static,
  P: PushSender + 'static,
{
  validate_user_id(&user_id)?;
  let user = state
    .store
    .get_user(&user_id)
    .await
    .map_err(ApiError::store)?
    .ok_or_else(|| ApiError::NotFound(format!("user {user_id} not found")))?;
  Ok(Json(user))
}

/// `PUT /users/:id`
pub async fn put<S, P>(
  State(state): State<ApiState<S, P>>,
  Path(user_id): Path<String>,
  Json(patch): Json<UserPatch>,
) -> Result<Json<UserRecord>, ApiError>
where
  S: UserStore + HubStore + 'static,
  P: PushSender + 'static,
{
  validate_user_id(&user_id)?;
  let user = state
    .store
    .put_user(&user_id, patch)
    .await
    .map_err(ApiError::store)?;
  Ok(Json(user))
}
