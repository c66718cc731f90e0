//! Login endpoint.

use std::sync::Arc;

use axum::Json;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use inventory_store::EntityStore;
use ledger::{AuthenticatedUser, Credentials};
use serde::{Deserialize, Serialize};

use crate::error::ApiError;
use crate::state::AppState;

#[derive(Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Serialize)]
pub struct LoginResponse {
    pub user: AuthenticatedUser,
}

/// POST /api/auth/login: checks credentials and returns the user's identity.
#[tracing::instrument(skip_all)]
pub async fn login<S: EntityStore + 'static>(
    State(state): State<Arc<AppState<S>>>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Json<LoginResponse>, ApiError> {
    let Json(req) = payload?;
    let user = state
        .authenticator
        .authenticate(Credentials::new(req.username, req.password))
        .await?;

    Ok(Json(LoginResponse { user }))
}
