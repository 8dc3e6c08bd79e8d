// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Records exchanged between the persistence adapter and its callers.
//!
//! Enumerated columns are decoded into their domain types on read, so a
//! caller never sees an unvalidated status or role string.

use tablebook_domain::{
    Email, ReservationStatus, RestaurantStatus, Role, TableSet, TableStatus, UserStatus,
};

/// A stored user account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserData {
    pub user_id: i64,
    pub name: String,
    pub email: Email,
    pub password_hash: String,
    pub role: Role,
    pub created_by: Option<i64>,
    pub phone: Option<String>,
    pub status: UserStatus,
    pub last_login_at: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

/// Input for creating a user. The password is hashed on insert.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub name: String,
    pub email: Email,
    pub password: String,
    pub role: Role,
    pub created_by: Option<i64>,
    pub phone: Option<String>,
}

/// Fields to change on a user. `None` leaves the column untouched.
#[derive(Debug, Clone, Default)]
pub struct UserChanges {
    pub name: Option<String>,
    pub email: Option<Email>,
    pub password: Option<String>,
    pub role: Option<Role>,
    pub phone: Option<String>,
    pub status: Option<UserStatus>,
}

/// A stored session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionData {
    pub session_id: i64,
    pub session_token: String,
    pub user_id: i64,
    pub created_at: String,
    pub last_activity_at: String,
    pub expires_at: String,
}

/// A stored restaurant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RestaurantData {
    pub restaurant_id: i64,
    pub name: String,
    pub business_name: Option<String>,
    pub business_email: Option<String>,
    pub food_type: Option<String>,
    pub phone: Option<String>,
    pub description: Option<String>,
    pub capacity: u32,
    pub supervisor_id: i64,
    pub opening_time: Option<String>,
    pub closing_time: Option<String>,
    pub status: RestaurantStatus,
    pub created_at: String,
    pub updated_at: String,
}

/// Input for creating a restaurant together with its initial zones.
#[derive(Debug, Clone)]
pub struct NewRestaurant {
    pub name: String,
    pub business_name: Option<String>,
    pub business_email: Option<Email>,
    pub food_type: Option<String>,
    pub phone: Option<String>,
    pub description: Option<String>,
    pub capacity: u32,
    pub supervisor_id: i64,
    pub opening_time: Option<String>,
    pub closing_time: Option<String>,
    pub status: RestaurantStatus,
    pub zones: Vec<String>,
}

/// Fields to change on a restaurant.
#[derive(Debug, Clone, Default)]
pub struct RestaurantChanges {
    pub name: Option<String>,
    pub business_name: Option<String>,
    pub business_email: Option<Email>,
    pub food_type: Option<String>,
    pub phone: Option<String>,
    pub description: Option<String>,
    pub capacity: Option<u32>,
    pub supervisor_id: Option<i64>,
    pub opening_time: Option<String>,
    pub closing_time: Option<String>,
    pub status: Option<RestaurantStatus>,
}

/// A stored zone.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ZoneData {
    pub zone_id: i64,
    pub restaurant_id: i64,
    pub name: String,
}

/// A stored table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableData {
    pub table_id: i64,
    pub restaurant_id: i64,
    pub zone_id: Option<i64>,
    pub name: String,
    pub capacity: u32,
    pub status: TableStatus,
}

/// Input for creating a table.
#[derive(Debug, Clone)]
pub struct NewTable {
    pub restaurant_id: i64,
    pub zone_id: Option<i64>,
    pub name: String,
    pub capacity: u32,
    pub status: TableStatus,
}

/// Fields to change on a table.
///
/// `zone_id: Some(None)` detaches the table from its zone.
#[derive(Debug, Clone, Default)]
pub struct TableChanges {
    pub name: Option<String>,
    pub capacity: Option<u32>,
    pub zone_id: Option<Option<i64>>,
    pub status: Option<TableStatus>,
}

/// A stored reservation with its table set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReservationData {
    pub reservation_id: i64,
    pub user_id: i64,
    pub restaurant_id: i64,
    pub reservation_at: String,
    pub party_size: Option<u32>,
    pub comment: Option<String>,
    pub status: ReservationStatus,
    pub table_ids: Vec<i64>,
    pub created_at: String,
    pub updated_at: String,
}

/// A reservation ready to be written, with its tables and the status
/// they take while held.
#[derive(Debug, Clone)]
pub struct NewReservation {
    pub user_id: i64,
    pub restaurant_id: i64,
    pub reservation_at: String,
    pub party_size: Option<u32>,
    pub comment: Option<String>,
    pub status: ReservationStatus,
    pub table_hold: TableStatus,
    pub tables: TableSet,
}

/// The resolved outcome of a reservation edit.
///
/// `status` and `user_id` are the values after the edit. When
/// `table_hold` is `None` the reservation's tables are released.
#[derive(Debug, Clone)]
pub struct ReservationUpdate {
    pub user_id: i64,
    pub reservation_at: Option<String>,
    pub party_size: Option<u32>,
    pub comment: Option<String>,
    pub tables: Option<TableSet>,
    pub status: ReservationStatus,
    pub table_hold: Option<TableStatus>,
}
