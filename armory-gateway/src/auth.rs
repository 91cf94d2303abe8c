//! Bearer-token authentication.
//!
//! Handlers never read ambient session state; they receive the caller as an
//! [`AuthenticatedUser`] argument, extracted from the `Authorization` header
//! before the handler body runs.

use armory_core::UserId;
use axum::{
    extract::{FromRequestParts, State},
    http::{header, request::Parts},
    Json,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{error::GatewayError, state::AppState};

/// The authenticated caller of the current request.
#[derive(Debug, Clone, Copy)]
pub struct AuthenticatedUser(pub UserId);

impl AuthenticatedUser {
    /// The caller's user id.
    #[must_use]
    pub fn id(self) -> UserId {
        self.0
    }
}

impl FromRequestParts<AppState> for AuthenticatedUser {
    type Rejection = GatewayError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .ok_or(GatewayError::Unauthorized)?;
        let token: Uuid = header
            .strip_prefix("Bearer ")
            .and_then(|t| t.parse().ok())
            .ok_or(GatewayError::Unauthorized)?;
        state
            .sessions
            .resolve(token)
            .map(AuthenticatedUser)
            .ok_or(GatewayError::Unauthorized)
    }
}

#[derive(Debug, Deserialize)]
pub struct LoginBody {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub token: Uuid,
}

/// `POST /login` — verify a credential and issue a session token.
///
/// # Errors
/// Returns [`GatewayError::Unauthorized`] for an unknown username or a bad
/// password; the two are indistinguishable to the caller.
pub async fn login(
    State(state): State<AppState>,
    Json(body): Json<LoginBody>,
) -> Result<Json<LoginResponse>, GatewayError> {
    let user = state
        .users
        .by_username(&body.username)
        .ok_or(GatewayError::Unauthorized)?;
    if !user.validate_password(&body.password) {
        return Err(GatewayError::Unauthorized);
    }
    let token = state.sessions.issue(user.id);
    tracing::info!(user = %user.username, "session issued");
    Ok(Json(LoginResponse { token }))
}
