// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! User and session queries.

use diesel::prelude::*;
use diesel::{MysqlConnection, SqliteConnection};
use tablebook::Scope;
use tablebook_domain::Email;
use tracing::debug;

use crate::data_models::{SessionData, UserData};
use crate::diesel_schema::{sessions, users};
use crate::error::PersistenceError;

/// Diesel Queryable struct for user rows.
#[derive(Queryable, Selectable)]
#[diesel(table_name = users)]
struct UserRow {
    user_id: i64,
    name: String,
    email: String,
    password_hash: String,
    role: String,
    created_by: Option<i64>,
    phone: Option<String>,
    status: String,
    last_login_at: Option<String>,
    created_at: String,
    updated_at: String,
}

impl TryFrom<UserRow> for UserData {
    type Error = PersistenceError;

    fn try_from(row: UserRow) -> Result<Self, Self::Error> {
        Ok(Self {
            user_id: row.user_id,
            name: row.name,
            email: Email::parse(&row.email)?,
            password_hash: row.password_hash,
            role: row.role.parse()?,
            created_by: row.created_by,
            phone: row.phone,
            status: row.status.parse()?,
            last_login_at: row.last_login_at,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

/// Diesel Queryable struct for session rows.
#[derive(Queryable, Selectable)]
#[diesel(table_name = sessions)]
struct SessionRow {
    session_id: i64,
    session_token: String,
    user_id: i64,
    created_at: String,
    last_activity_at: String,
    expires_at: String,
}

backend_fn! {
/// Retrieves a user by ID.
///
/// # Errors
///
/// Returns an error if the query fails or the row cannot be decoded.
/// Returns `Ok(None)` if the user is not found.
pub fn get_user(conn: &mut _, user_id: i64) -> Result<Option<UserData>, PersistenceError> {
    debug!("Looking up user by ID: {}", user_id);

    let row: Option<UserRow> = users::table
        .filter(users::user_id.eq(user_id))
        .select(UserRow::as_select())
        .first(conn)
        .optional()?;

    row.map(UserData::try_from).transpose()
}
}

backend_fn! {
/// Retrieves a user by email.
///
/// `Email` is already lowercase, so this lookup is case-insensitive with
/// respect to the caller's input.
///
/// # Errors
///
/// Returns an error if the query fails or the row cannot be decoded.
/// Returns `Ok(None)` if no user has this email.
pub fn get_user_by_email(
    conn: &mut _,
    email: &Email,
) -> Result<Option<UserData>, PersistenceError> {
    debug!("Looking up user by email: {}", email);

    let row: Option<UserRow> = users::table
        .filter(users::email.eq(email.as_str()))
        .select(UserRow::as_select())
        .first(conn)
        .optional()?;

    row.map(UserData::try_from).transpose()
}
}

backend_fn! {
/// Lists users visible within `scope`, ordered by ID.
///
/// # Errors
///
/// Returns an error if the query fails, a row cannot be decoded, or the
/// scope does not apply to users.
pub fn list_users(conn: &mut _, scope: Scope) -> Result<Vec<UserData>, PersistenceError> {
    debug!("Listing users for scope {:?}", scope);

    let mut query = users::table.into_boxed();
    query = match scope {
        Scope::All => query,
        Scope::CreatedBy(creator_id) => query.filter(users::created_by.eq(creator_id)),
        Scope::OwnedBy(user_id) => query.filter(users::user_id.eq(user_id)),
        Scope::SupervisedBy(_) => {
            return Err(PersistenceError::UnsupportedScope { collection: "users" });
        }
    };

    let rows: Vec<UserRow> = query
        .order(users::user_id.asc())
        .select(UserRow::as_select())
        .load(conn)?;

    rows.into_iter().map(UserData::try_from).collect()
}
}

backend_fn! {
/// Counts all user accounts.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn count_users(conn: &mut _) -> Result<i64, PersistenceError> {
    let count: i64 = users::table.count().get_result(conn)?;
    Ok(count)
}
}

backend_fn! {
/// Retrieves a session by its token.
///
/// Expiry is not checked here; the caller compares `expires_at` with the
/// current time.
///
/// # Errors
///
/// Returns an error if the query fails.
/// Returns `Ok(None)` if no session has this token.
pub fn get_session_by_token(
    conn: &mut _,
    session_token: &str,
) -> Result<Option<SessionData>, PersistenceError> {
    let row: Option<SessionRow> = sessions::table
        .filter(sessions::session_token.eq(session_token))
        .select(SessionRow::as_select())
        .first(conn)
        .optional()?;

    Ok(row.map(|row| SessionData {
        session_id: row.session_id,
        session_token: row.session_token,
        user_id: row.user_id,
        created_at: row.created_at,
        last_activity_at: row.last_activity_at,
        expires_at: row.expires_at,
    }))
}
}
