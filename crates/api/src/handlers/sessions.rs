// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use time::Duration;
use tablebook::{Actor, Registration, authorize_registration};
use tablebook_domain::{Email, Role, validate_name};
use tablebook_persistence::{NewUser, Persistence, SessionData, UserData};
use tracing::info;

use super::{user_info, validate_phone};
use crate::auth::{AuthenticatedActor, AuthenticationService};
use crate::capabilities::compute_global_capabilities;
use crate::error::ApiError;
use crate::password_policy::PasswordPolicy;
use crate::request_response::{
    LoginRequest, LoginResponse, ProfileResponse, RefreshResponse, RegisterRequest, UserInfo,
};

const TOKEN_TYPE: &str = "bearer";

/// Registers an account.
///
/// Anonymous callers may only register customers. A supervisor may
/// create customers, an admin any role; either becomes the new
/// account's `created_by`.
///
/// # Arguments
///
/// * `persistence` - The persistence layer
/// * `request` - The registration request
/// * `actor` - The authenticated caller, if any
///
/// # Errors
///
/// Returns an error if:
/// - The caller may not create an account with the requested role
/// - A field or the password fails validation
/// - The email is already registered
pub fn register(
    persistence: &mut Persistence,
    request: RegisterRequest,
    actor: Option<&AuthenticatedActor>,
) -> Result<UserInfo, ApiError> {
    let requested_role: Option<Role> = request
        .role
        .as_deref()
        .map(str::parse::<Role>)
        .transpose()?;

    let registration: Registration =
        authorize_registration(actor.map(|a: &AuthenticatedActor| &a.actor), requested_role)?;

    let name: String = validate_name("name", &request.name)?;
    let email: Email = Email::parse(&request.email)?;
    let phone: Option<String> = validate_phone(request.phone.as_deref())?;

    PasswordPolicy::default().validate(
        &request.password,
        &request.password_confirmation,
        email.as_str(),
        &name,
    )?;

    let user: UserData = persistence.create_user(&NewUser {
        name,
        email,
        password: request.password,
        role: registration.role,
        created_by: registration.created_by,
        phone,
    })?;

    info!(
        user_id = user.user_id,
        role = %user.role,
        created_by = ?user.created_by,
        "Registered account"
    );
    Ok(user_info(&user))
}

/// Authenticates with email and password and opens a session.
///
/// # Errors
///
/// Returns `AuthenticationFailed` for wrong credentials or an inactive
/// account.
pub fn login(
    persistence: &mut Persistence,
    request: &LoginRequest,
    lifetime: Duration,
) -> Result<LoginResponse, ApiError> {
    let (session, _actor, user): (SessionData, AuthenticatedActor, UserData) =
        AuthenticationService::login(persistence, &request.email, &request.password, lifetime)?;

    Ok(LoginResponse {
        token: session.session_token,
        token_type: TOKEN_TYPE.to_string(),
        expires_at: session.expires_at,
        user: user_info(&user),
    })
}

/// Logs out by deleting the session.
///
/// # Errors
///
/// Returns an error if the logout fails.
pub fn logout(persistence: &mut Persistence, session_token: &str) -> Result<(), ApiError> {
    AuthenticationService::logout(persistence, session_token)?;
    Ok(())
}

/// Replaces the caller's session token with a fresh one.
///
/// # Errors
///
/// Returns `AuthenticationFailed` if the presented session is not valid.
pub fn refresh_token(
    persistence: &mut Persistence,
    session_token: &str,
    lifetime: Duration,
) -> Result<RefreshResponse, ApiError> {
    let session: SessionData = AuthenticationService::refresh(persistence, session_token, lifetime)?;
    Ok(RefreshResponse {
        token: session.session_token,
        token_type: TOKEN_TYPE.to_string(),
        expires_at: session.expires_at,
    })
}

/// Returns the caller's account with its capabilities.
#[must_use]
pub fn profile(actor: &AuthenticatedActor, user: &UserData) -> ProfileResponse {
    let subject: &Actor = &actor.actor;
    ProfileResponse {
        user: user_info(user),
        capabilities: compute_global_capabilities(subject),
    }
}
