// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use tablebook::{Operation, Resource, Scope, authorize, user_scope};
use tablebook_domain::{Email, Role, UserStatus, validate_name};
use tablebook_persistence::{Persistence, UserChanges, UserData};
use tracing::info;

use super::{load_user, register, user_info, validate_phone};
use crate::auth::AuthenticatedActor;
use crate::error::ApiError;
use crate::password_policy::PasswordPolicy;
use crate::request_response::{ListUsersResponse, RegisterRequest, UpdateUserRequest, UserInfo};

const fn user_resource(user: &UserData) -> Resource {
    Resource::User {
        user_id: user.user_id,
        created_by: user.created_by,
    }
}

/// Lists the accounts visible to the caller.
///
/// Admins see every account, supervisors the accounts they created.
///
/// # Errors
///
/// Returns `Unauthorized` for customers.
pub fn list_users(
    persistence: &mut Persistence,
    actor: &AuthenticatedActor,
) -> Result<ListUsersResponse, ApiError> {
    let scope: Scope = user_scope(&actor.actor)?;
    let users: Vec<UserData> = persistence.list_users(scope)?;
    Ok(ListUsersResponse {
        users: users.iter().map(user_info).collect(),
    })
}

/// Retrieves one account.
///
/// # Errors
///
/// Returns `ResourceNotFound` or `Unauthorized`.
pub fn get_user(
    persistence: &mut Persistence,
    user_id: i64,
    actor: &AuthenticatedActor,
) -> Result<UserInfo, ApiError> {
    let user: UserData = load_user(persistence, user_id)?;
    authorize(&actor.actor, Operation::View, &user_resource(&user))?;
    Ok(user_info(&user))
}

/// Creates an account on behalf of staff.
///
/// Same rules as self-registration with a known caller.
///
/// # Errors
///
/// See [`register`].
pub fn create_user(
    persistence: &mut Persistence,
    request: RegisterRequest,
    actor: &AuthenticatedActor,
) -> Result<UserInfo, ApiError> {
    register(persistence, request, Some(actor))
}

/// Updates an account.
///
/// Anyone may edit their own profile. Granting a staff role is reserved
/// to admins, and customers cannot change account status.
///
/// # Errors
///
/// Returns an error if:
/// - The account does not exist
/// - The caller may not edit it, or may not make this particular change
/// - A field or a new password fails validation
/// - The new email is already registered
pub fn update_user(
    persistence: &mut Persistence,
    user_id: i64,
    request: UpdateUserRequest,
    actor: &AuthenticatedActor,
) -> Result<UserInfo, ApiError> {
    let user: UserData = load_user(persistence, user_id)?;
    let resource: Resource = user_resource(&user);
    authorize(&actor.actor, Operation::Update, &resource)?;

    let role: Option<Role> = request
        .role
        .as_deref()
        .map(str::parse::<Role>)
        .transpose()?
        .filter(|role: &Role| *role != user.role);
    if let Some(role) = role {
        authorize(&actor.actor, Operation::AssignRole(role), &resource)?;
    }

    let status: Option<UserStatus> = request
        .status
        .as_deref()
        .map(str::parse::<UserStatus>)
        .transpose()?
        .filter(|status: &UserStatus| *status != user.status);
    if status.is_some() && actor.role() == Role::Customer {
        return Err(ApiError::Unauthorized {
            action: String::from("update user status"),
            reason: String::from("customers cannot change account status"),
        });
    }

    let name: Option<String> = request
        .name
        .as_deref()
        .map(|name: &str| validate_name("name", name))
        .transpose()?;
    let email: Option<Email> = request.email.as_deref().map(Email::parse).transpose()?;
    let phone: Option<String> = validate_phone(request.phone.as_deref())?;

    if let Some(password) = &request.password {
        let confirmation: &str = request.password_confirmation.as_deref().unwrap_or_default();
        let final_email: &Email = email.as_ref().unwrap_or(&user.email);
        let final_name: &str = name.as_deref().unwrap_or(&user.name);
        PasswordPolicy::default().validate(
            password,
            confirmation,
            final_email.as_str(),
            final_name,
        )?;
    }

    let updated: UserData = persistence.update_user(
        user_id,
        &UserChanges {
            name,
            email,
            password: request.password,
            role,
            phone,
            status,
        },
    )?;

    info!(user_id, actor_id = actor.user_id(), "Updated account");
    Ok(user_info(&updated))
}

/// Deletes an account.
///
/// Nobody deletes their own account here. An account that still
/// supervises a restaurant is kept until the restaurant is reassigned.
///
/// # Errors
///
/// Returns `ResourceNotFound`, `Unauthorized`, or a rule violation.
pub fn delete_user(
    persistence: &mut Persistence,
    user_id: i64,
    actor: &AuthenticatedActor,
) -> Result<(), ApiError> {
    let user: UserData = load_user(persistence, user_id)?;
    authorize(&actor.actor, Operation::Delete, &user_resource(&user))?;

    persistence.delete_user(user_id)?;
    info!(user_id, actor_id = actor.user_id(), "Deleted account");
    Ok(())
}
