// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Session-based authentication.
//!
//! A successful login stores an opaque random bearer token. Every later
//! request presents the token, and [`AuthenticationService::validate_session`]
//! turns it back into the [`Actor`] the access-control evaluator works on.

use time::{Duration, OffsetDateTime};
use tablebook::Actor;
use tablebook_domain::{Email, Role, UserStatus, format_timestamp, parse_datetime};
use tablebook_persistence::{Persistence, PersistenceError, SessionData, UserData};
use tracing::{debug, error, info, warn};

use crate::error::AuthError;

/// An authenticated user acting on the system.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedActor {
    /// The actor handed to access-control decisions.
    pub actor: Actor,
}

impl AuthenticatedActor {
    /// Creates an authenticated actor for a stored user.
    #[must_use]
    pub fn from_user(user: &UserData) -> Self {
        Self {
            actor: Actor::new(user.user_id, user.role, user.email.clone(), user.created_by),
        }
    }

    #[must_use]
    pub const fn user_id(&self) -> i64 {
        self.actor.user_id
    }

    #[must_use]
    pub const fn role(&self) -> Role {
        self.actor.role
    }
}

/// Authentication service for session-based authentication.
pub struct AuthenticationService;

impl AuthenticationService {
    /// Default session lifetime (30 days).
    pub const DEFAULT_SESSION_LIFETIME: Duration = Duration::days(30);

    /// Verifies credentials and opens a session.
    ///
    /// Unknown emails and wrong passwords fail identically.
    ///
    /// # Arguments
    ///
    /// * `persistence` - The persistence layer
    /// * `email` - The account email, in any case
    /// * `password` - The plaintext password
    /// * `lifetime` - How long the new session stays valid
    ///
    /// # Returns
    ///
    /// A tuple of (`session`, `authenticated_actor`, `user`)
    ///
    /// # Errors
    ///
    /// Returns an error if the credentials are wrong, the account is
    /// inactive, or the session cannot be stored.
    pub fn login(
        persistence: &mut Persistence,
        email: &str,
        password: &str,
        lifetime: Duration,
    ) -> Result<(SessionData, AuthenticatedActor, UserData), AuthError> {
        let Ok(email) = Email::parse(email) else {
            return Err(Self::invalid_credentials());
        };

        let user: UserData = persistence
            .verify_password(&email, password)
            .map_err(Self::map_persistence_error)?
            .ok_or_else(|| {
                warn!("Rejected login with invalid credentials");
                Self::invalid_credentials()
            })?;

        if user.status == UserStatus::Inactive {
            warn!(user_id = user.user_id, "Rejected login for inactive account");
            return Err(AuthError::AuthenticationFailed {
                reason: String::from("Account is inactive"),
            });
        }

        let purged: usize = persistence
            .delete_expired_sessions()
            .map_err(Self::map_persistence_error)?;
        if purged > 0 {
            debug!(purged, "Purged expired sessions");
        }

        let session: SessionData = Self::open_session(persistence, user.user_id, lifetime)?;

        persistence
            .update_last_login(user.user_id)
            .map_err(Self::map_persistence_error)?;
        let user: UserData = persistence
            .get_user(user.user_id)
            .map_err(Self::map_persistence_error)?
            .ok_or_else(|| AuthError::Internal {
                message: format!("user {} vanished during login", user.user_id),
            })?;

        info!(user_id = user.user_id, role = %user.role, "User logged in");
        Ok((session, AuthenticatedActor::from_user(&user), user))
    }

    /// Validates a session token and returns the authenticated actor.
    ///
    /// # Arguments
    ///
    /// * `persistence` - The persistence layer
    /// * `session_token` - The bearer token to validate
    ///
    /// # Returns
    ///
    /// A tuple of (`authenticated_actor`, `user`)
    ///
    /// # Errors
    ///
    /// Returns `AuthenticationFailed` if the token is unknown, the session
    /// has expired, or the account is inactive, and `Internal` if session
    /// storage fails.
    pub fn validate_session(
        persistence: &mut Persistence,
        session_token: &str,
    ) -> Result<(AuthenticatedActor, UserData), AuthError> {
        let session: SessionData = persistence
            .get_session_by_token(session_token)
            .map_err(Self::map_persistence_error)?
            .ok_or_else(|| AuthError::AuthenticationFailed {
                reason: String::from("Invalid session token"),
            })?;

        let expires_at: OffsetDateTime =
            parse_datetime(&session.expires_at).map_err(|e| AuthError::Internal {
                message: format!("Failed to parse session expiration: {e}"),
            })?;

        if OffsetDateTime::now_utc() >= expires_at {
            persistence
                .delete_session(session_token)
                .map_err(Self::map_persistence_error)?;
            return Err(AuthError::AuthenticationFailed {
                reason: String::from("Session expired"),
            });
        }

        let user: UserData = persistence
            .get_user(session.user_id)
            .map_err(Self::map_persistence_error)?
            .ok_or_else(|| AuthError::AuthenticationFailed {
                reason: String::from("User not found"),
            })?;

        if user.status == UserStatus::Inactive {
            return Err(AuthError::AuthenticationFailed {
                reason: String::from("Account is inactive"),
            });
        }

        persistence
            .update_session_activity(session.session_id)
            .map_err(Self::map_persistence_error)?;

        Ok((AuthenticatedActor::from_user(&user), user))
    }

    /// Logs out by deleting the session.
    ///
    /// # Errors
    ///
    /// Returns `Internal` if the session cannot be deleted.
    pub fn logout(persistence: &mut Persistence, session_token: &str) -> Result<(), AuthError> {
        let removed: usize = persistence
            .delete_session(session_token)
            .map_err(Self::map_persistence_error)?;
        debug!(removed, "Session closed");
        Ok(())
    }

    /// Rotates a session: a new token is issued and the old one deleted.
    ///
    /// # Errors
    ///
    /// Returns an error if the current session is not valid or the new
    /// one cannot be stored.
    pub fn refresh(
        persistence: &mut Persistence,
        session_token: &str,
        lifetime: Duration,
    ) -> Result<SessionData, AuthError> {
        let (actor, _user): (AuthenticatedActor, UserData) =
            Self::validate_session(persistence, session_token)?;

        let session: SessionData = Self::open_session(persistence, actor.user_id(), lifetime)?;
        persistence
            .delete_session(session_token)
            .map_err(Self::map_persistence_error)?;

        info!(user_id = actor.user_id(), "Session token rotated");
        Ok(session)
    }

    fn open_session(
        persistence: &mut Persistence,
        user_id: i64,
        lifetime: Duration,
    ) -> Result<SessionData, AuthError> {
        let session_token: String = Self::generate_session_token();
        let expires_at: String = format_timestamp(OffsetDateTime::now_utc() + lifetime)
            .map_err(|e| AuthError::Internal {
                message: format!("Failed to format expiration time: {e}"),
            })?;

        persistence
            .create_session(&session_token, user_id, &expires_at)
            .map_err(Self::map_persistence_error)
    }

    /// Generates an opaque 256-bit session token, hex encoded.
    fn generate_session_token() -> String {
        (0..4)
            .map(|_| format!("{:016x}", rand::random::<u64>()))
            .collect()
    }

    fn invalid_credentials() -> AuthError {
        AuthError::AuthenticationFailed {
            reason: String::from("Invalid credentials"),
        }
    }

    /// Every storage failure is internal.
    fn map_persistence_error(err: PersistenceError) -> AuthError {
        error!(error = %err, "Session storage failed");
        AuthError::Internal {
            message: err.to_string(),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_session_tokens_are_distinct_hex() {
        let first: String = AuthenticationService::generate_session_token();
        let second: String = AuthenticationService::generate_session_token();

        assert_eq!(first.len(), 64);
        assert!(first.chars().all(|c: char| c.is_ascii_hexdigit()));
        assert_ne!(first, second);
    }

    #[test]
    fn test_storage_failures_are_internal_not_authentication_failures() {
        let mapped: AuthError = AuthenticationService::map_persistence_error(
            PersistenceError::DatabaseError(String::from("disk I/O error")),
        );

        assert!(matches!(&mapped, AuthError::Internal { message } if message.contains("disk I/O")));
        assert!(matches!(
            crate::ApiError::from(mapped),
            crate::ApiError::Internal { .. }
        ));
    }
}
