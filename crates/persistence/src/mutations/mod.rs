// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! State-changing operations.
//!
//! - `users`: accounts and sessions
//! - `restaurants`: restaurants and their initial zones
//! - `venue`: zones and tables
//! - `reservations`: reservations and the table holds they drive
//!
//! Every multi-step write runs inside `Connection::transaction`, so an
//! error at any step rolls back the steps before it.

pub mod reservations;
pub mod restaurants;
pub mod users;
pub mod venue;

use num_traits::ToPrimitive;
use tablebook_domain::format_timestamp;
use time::OffsetDateTime;

use crate::error::PersistenceError;

pub use reservations::{
    create_reservation_mysql, create_reservation_sqlite, delete_reservation_mysql,
    delete_reservation_sqlite, update_reservation_mysql, update_reservation_sqlite,
};
pub use restaurants::{
    create_restaurant_mysql, create_restaurant_sqlite, delete_restaurant_mysql,
    delete_restaurant_sqlite, update_restaurant_mysql, update_restaurant_sqlite,
};
pub use users::{
    create_session_mysql, create_session_sqlite, create_user_mysql, create_user_sqlite,
    delete_expired_sessions_mysql, delete_expired_sessions_sqlite, delete_session_mysql,
    delete_session_sqlite, delete_user_mysql, delete_user_sqlite, update_last_login_mysql,
    update_last_login_sqlite, update_session_activity_mysql, update_session_activity_sqlite,
    update_user_mysql, update_user_sqlite,
};
pub use venue::{
    create_table_mysql, create_table_sqlite, create_zone_mysql, create_zone_sqlite,
    delete_table_mysql, delete_table_sqlite, delete_zone_mysql, delete_zone_sqlite,
    rename_zone_mysql, rename_zone_sqlite, update_table_mysql, update_table_sqlite,
};

/// The current instant in the stored timestamp layout.
///
/// # Errors
///
/// Returns an error if the clock value cannot be formatted.
pub fn now_timestamp() -> Result<String, PersistenceError> {
    format_timestamp(OffsetDateTime::now_utc()).map_err(|e| PersistenceError::Other(e.to_string()))
}

/// Converts a validated capacity to its column type.
///
/// # Errors
///
/// Returns an error if the value does not fit the column.
pub fn capacity_column(capacity: u32) -> Result<i32, PersistenceError> {
    capacity
        .to_i32()
        .ok_or_else(|| PersistenceError::Other(format!("capacity {capacity} is out of range")))
}
