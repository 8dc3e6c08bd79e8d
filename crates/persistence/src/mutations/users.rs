// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! User and session mutations.

use diesel::prelude::*;
use diesel::{MysqlConnection, SqliteConnection};
use tablebook_domain::{Role, UserStatus};
use tracing::{debug, info};

use crate::backend::PersistenceBackend;
use crate::data_models::{NewUser, UserChanges};
use crate::diesel_schema::{reservation_tables, reservations, restaurants, sessions, users};
use crate::error::PersistenceError;
use crate::holds::ACTIVE_STATUSES;
use crate::mutations::now_timestamp;

/// Changeset for user updates. `None` fields are skipped.
#[derive(AsChangeset)]
#[diesel(table_name = users)]
struct UserChangeset<'a> {
    name: Option<&'a str>,
    email: Option<&'a str>,
    password_hash: Option<String>,
    role: Option<&'a str>,
    phone: Option<&'a str>,
    status: Option<&'a str>,
    updated_at: String,
}

backend_fn! {
/// Creates a new user.
///
/// The password is hashed with bcrypt before it reaches the database.
///
/// # Arguments
///
/// * `conn` - The database connection
/// * `new_user` - The account to create
///
/// # Errors
///
/// Returns `DuplicateEmail` if the email is taken, or an error if hashing
/// or the insert fails.
pub fn create_user(conn: &mut _, new_user: &NewUser) -> Result<i64, PersistenceError> {
    info!(
        "Creating user with email: {}, role: {}",
        new_user.email, new_user.role
    );

    let password_hash: String = bcrypt::hash(&new_user.password, bcrypt::DEFAULT_COST)?;
    let now: String = now_timestamp()?;

    conn.transaction::<i64, PersistenceError, _>(|conn| {
        let existing: i64 = users::table
            .filter(users::email.eq(new_user.email.as_str()))
            .count()
            .get_result(conn)?;
        if existing > 0 {
            return Err(PersistenceError::DuplicateEmail(new_user.email.to_string()));
        }

        diesel::insert_into(users::table)
            .values((
                users::name.eq(&new_user.name),
                users::email.eq(new_user.email.as_str()),
                users::password_hash.eq(&password_hash),
                users::role.eq(new_user.role.as_str()),
                users::created_by.eq(new_user.created_by),
                users::phone.eq(new_user.phone.as_deref()),
                users::status.eq(UserStatus::Active.as_str()),
                users::created_at.eq(&now),
                users::updated_at.eq(&now),
            ))
            .execute(conn)?;

        let user_id: i64 = conn.get_last_insert_rowid()?;
        info!(user_id, "User created");
        Ok(user_id)
    })
}
}

backend_fn! {
/// Applies changes to a user.
///
/// Deactivating a user ends all of their sessions. A supervisor who still
/// owns restaurants cannot be given another role.
///
/// # Errors
///
/// Returns `NotFound`, `DuplicateEmail`, `UserSupervisesRestaurants`, or
/// a database error.
pub fn update_user(
    conn: &mut _,
    user_id: i64,
    changes: &UserChanges,
) -> Result<(), PersistenceError> {
    debug!("Updating user ID: {}", user_id);

    let password_hash: Option<String> = changes
        .password
        .as_deref()
        .map(|password| bcrypt::hash(password, bcrypt::DEFAULT_COST))
        .transpose()?;
    let now: String = now_timestamp()?;

    conn.transaction::<(), PersistenceError, _>(|conn| {
        let current_role: Option<String> = users::table
            .filter(users::user_id.eq(user_id))
            .select(users::role)
            .first(conn)
            .optional()?;
        let Some(current_role) = current_role else {
            return Err(PersistenceError::NotFound(format!("user {user_id}")));
        };

        if let Some(email) = &changes.email {
            let clashes: i64 = users::table
                .filter(users::email.eq(email.as_str()))
                .filter(users::user_id.ne(user_id))
                .count()
                .get_result(conn)?;
            if clashes > 0 {
                return Err(PersistenceError::DuplicateEmail(email.to_string()));
            }
        }

        if let Some(role) = changes.role
            && role != Role::Supervisor
            && current_role == Role::Supervisor.as_str()
        {
            let supervised: i64 = restaurants::table
                .filter(restaurants::supervisor_id.eq(user_id))
                .count()
                .get_result(conn)?;
            if supervised > 0 {
                return Err(PersistenceError::UserSupervisesRestaurants {
                    user_id,
                    count: supervised,
                });
            }
        }

        let changeset: UserChangeset<'_> = UserChangeset {
            name: changes.name.as_deref(),
            email: changes.email.as_ref().map(tablebook_domain::Email::as_str),
            password_hash,
            role: changes.role.as_ref().map(Role::as_str),
            phone: changes.phone.as_deref(),
            status: changes.status.as_ref().map(UserStatus::as_str),
            updated_at: now,
        };
        diesel::update(users::table.filter(users::user_id.eq(user_id)))
            .set(&changeset)
            .execute(conn)?;

        if changes.status == Some(UserStatus::Inactive) {
            let ended: usize = diesel::delete(sessions::table.filter(sessions::user_id.eq(user_id)))
                .execute(conn)?;
            info!(user_id, ended, "User deactivated; sessions ended");
        }

        Ok(())
    })
}
}

backend_fn! {
/// Deletes a user.
///
/// Tables held by the user's active reservations are released before the
/// cascade removes those reservations. A user who still supervises a
/// restaurant cannot be deleted.
///
/// # Errors
///
/// Returns `NotFound`, `UserSupervisesRestaurants`, or a database error.
pub fn delete_user(conn: &mut _, user_id: i64) -> Result<(), PersistenceError> {
    info!("Deleting user ID: {}", user_id);

    conn.transaction::<(), PersistenceError, _>(|conn| {
        let supervised: i64 = restaurants::table
            .filter(restaurants::supervisor_id.eq(user_id))
            .count()
            .get_result(conn)?;
        if supervised > 0 {
            return Err(PersistenceError::UserSupervisesRestaurants {
                user_id,
                count: supervised,
            });
        }

        let held: Vec<i64> = reservation_tables::table
            .inner_join(reservations::table)
            .filter(reservations::user_id.eq(user_id))
            .filter(reservations::status.eq_any(ACTIVE_STATUSES))
            .select(reservation_tables::table_id)
            .load(conn)?;
        let released: usize = release_tables!(conn, &held)?;

        let deleted: usize =
            diesel::delete(users::table.filter(users::user_id.eq(user_id))).execute(conn)?;
        if deleted == 0 {
            return Err(PersistenceError::NotFound(format!("user {user_id}")));
        }

        info!(user_id, released, "User deleted");
        Ok(())
    })
}
}

backend_fn! {
/// Records a successful login.
///
/// # Errors
///
/// Returns an error if the database update fails.
pub fn update_last_login(conn: &mut _, user_id: i64) -> Result<(), PersistenceError> {
    debug!("Updating last_login_at for user ID: {}", user_id);

    let now: String = now_timestamp()?;
    diesel::update(users::table.filter(users::user_id.eq(user_id)))
        .set(users::last_login_at.eq(Some(now)))
        .execute(conn)?;

    Ok(())
}
}

// ============================================================================
// Sessions
// ============================================================================

backend_fn! {
/// Creates a session for a user.
///
/// # Arguments
///
/// * `conn` - The database connection
/// * `session_token` - The opaque bearer token
/// * `user_id` - The session owner
/// * `expires_at` - RFC 3339 UTC expiry
///
/// # Errors
///
/// Returns an error if the insert fails.
pub fn create_session(
    conn: &mut _,
    session_token: &str,
    user_id: i64,
    expires_at: &str,
) -> Result<i64, PersistenceError> {
    let now: String = now_timestamp()?;

    diesel::insert_into(sessions::table)
        .values((
            sessions::session_token.eq(session_token),
            sessions::user_id.eq(user_id),
            sessions::created_at.eq(&now),
            sessions::last_activity_at.eq(&now),
            sessions::expires_at.eq(expires_at),
        ))
        .execute(conn)?;

    let session_id: i64 = conn.get_last_insert_rowid()?;
    debug!(session_id, user_id, "Session created");
    Ok(session_id)
}
}

backend_fn! {
/// Marks a session as used now.
///
/// # Errors
///
/// Returns an error if the database update fails.
pub fn update_session_activity(conn: &mut _, session_id: i64) -> Result<(), PersistenceError> {
    let now: String = now_timestamp()?;
    diesel::update(sessions::table.filter(sessions::session_id.eq(session_id)))
        .set(sessions::last_activity_at.eq(now))
        .execute(conn)?;
    Ok(())
}
}

backend_fn! {
/// Deletes a session by token.
///
/// # Errors
///
/// Returns an error if the delete fails.
pub fn delete_session(conn: &mut _, session_token: &str) -> Result<usize, PersistenceError> {
    let deleted: usize =
        diesel::delete(sessions::table.filter(sessions::session_token.eq(session_token)))
            .execute(conn)?;
    Ok(deleted)
}
}

backend_fn! {
/// Deletes every session whose expiry has passed.
///
/// Expiry strings share one RFC 3339 UTC layout, so lexical comparison
/// is chronological.
///
/// # Errors
///
/// Returns an error if the delete fails.
pub fn delete_expired_sessions(conn: &mut _) -> Result<usize, PersistenceError> {
    let now: String = now_timestamp()?;
    let deleted: usize = diesel::delete(sessions::table.filter(sessions::expires_at.le(now)))
        .execute(conn)?;
    if deleted > 0 {
        info!(deleted, "Expired sessions removed");
    }
    Ok(deleted)
}
}
