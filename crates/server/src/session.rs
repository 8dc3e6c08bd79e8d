// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Session extraction for the server.
//!
//! These extractors read `Authorization: Bearer <token>` and validate
//! the session before a handler runs. Authentication state is never
//! stored outside the request; each handler receives the actor it acts
//! for.

use axum::{
    Json,
    extract::FromRequestParts,
    http::{StatusCode, header::AUTHORIZATION, request::Parts},
    response::{IntoResponse, Response},
};
use tablebook_api::{AuthError, AuthenticatedActor, AuthenticationService};
use tablebook_persistence::UserData;
use tracing::{debug, error, warn};

use crate::AppState;
use crate::response::{Envelope, INTERNAL_MESSAGE};

/// Extractor for an authenticated user.
///
/// # Usage
///
/// ```ignore
/// async fn my_handler(
///     SessionUser(actor, user): SessionUser,
/// ) -> Result<Json<Envelope<T>>, HttpError> {
///     // actor: AuthenticatedActor
///     // user: UserData
/// }
/// ```
///
/// # Errors
///
/// Rejects with HTTP 401 if the header is missing or malformed, or if
/// the session is unknown, expired, or belongs to an inactive account.
/// A storage failure rejects with HTTP 500.
pub struct SessionUser(pub AuthenticatedActor, pub UserData);

impl FromRequestParts<AppState> for SessionUser {
    type Rejection = SessionError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token: String = bearer_token(parts)?;

        let mut persistence = state.persistence.lock().await;
        let (actor, user): (AuthenticatedActor, UserData) =
            AuthenticationService::validate_session(&mut persistence, &token).map_err(
                |e: AuthError| match e {
                    AuthError::Internal { message } => {
                        error!(error = %message, "Session lookup failed");
                        SessionError::Internal
                    }
                    AuthError::AuthenticationFailed { .. } | AuthError::Unauthorized { .. } => {
                        warn!(error = %e, "Session validation failed");
                        SessionError::InvalidSession
                    }
                },
            )?;

        debug!(user_id = actor.user_id(), role = %actor.role(), "Session validated");
        Ok(Self(actor, user))
    }
}

/// Extractor for endpoints open to anonymous callers.
///
/// No `Authorization` header yields `None`. A header that is present
/// must still carry a valid session.
pub struct MaybeSessionUser(pub Option<AuthenticatedActor>);

impl FromRequestParts<AppState> for MaybeSessionUser {
    type Rejection = SessionError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        if !parts.headers.contains_key(AUTHORIZATION) {
            return Ok(Self(None));
        }
        let SessionUser(actor, _user) = SessionUser::from_request_parts(parts, state).await?;
        Ok(Self(Some(actor)))
    }
}

/// The raw bearer token, unvalidated.
///
/// Used by logout and token rotation, which act on the session itself.
pub struct BearerToken(pub String);

impl<S: Send + Sync> FromRequestParts<S> for BearerToken {
    type Rejection = SessionError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(Self(bearer_token(parts)?))
    }
}

fn bearer_token(parts: &Parts) -> Result<String, SessionError> {
    let header: &str = parts
        .headers
        .get(AUTHORIZATION)
        .ok_or_else(|| {
            debug!("Missing Authorization header");
            SessionError::MissingAuthorizationHeader
        })?
        .to_str()
        .map_err(|_| {
            warn!("Invalid Authorization header encoding");
            SessionError::InvalidAuthorizationHeader
        })?;

    let token: &str = header
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|token: &&str| !token.is_empty())
        .ok_or_else(|| {
            warn!("Authorization header does not carry a bearer token");
            SessionError::InvalidAuthorizationHeader
        })?;
    Ok(token.to_string())
}

/// Session extraction errors. All but `Internal` answer 401.
#[derive(Debug)]
pub enum SessionError {
    /// Authorization header is missing.
    MissingAuthorizationHeader,
    /// Authorization header format is invalid.
    InvalidAuthorizationHeader,
    /// The token does not name a usable session.
    InvalidSession,
    /// The session could not be read.
    Internal,
}

impl IntoResponse for SessionError {
    fn into_response(self) -> Response {
        let (status, message): (StatusCode, &str) = match self {
            Self::MissingAuthorizationHeader => (StatusCode::UNAUTHORIZED, "Authentication required"),
            Self::InvalidAuthorizationHeader => (
                StatusCode::UNAUTHORIZED,
                "Invalid Authorization header format. Expected: 'Bearer <token>'",
            ),
            Self::InvalidSession => (StatusCode::UNAUTHORIZED, "Invalid or expired session"),
            Self::Internal => (StatusCode::INTERNAL_SERVER_ERROR, INTERNAL_MESSAGE),
        };
        (status, Json(Envelope::<()>::failure(message))).into_response()
    }
}
