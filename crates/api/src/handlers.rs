// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! API handler functions.
//!
//! Every handler takes the persistence layer and the acting user
//! explicitly, validates its input, asks the access-control evaluator,
//! and only then touches storage. A handler that returns an error has
//! changed nothing.

mod reservations;
mod restaurants;
mod sessions;
mod users;
mod venue;

pub use reservations::{
    create_reservation, delete_reservation, get_reservation, list_my_reservations,
    list_reservations, update_reservation, update_reservation_status,
};
pub use restaurants::{
    create_restaurant, delete_restaurant, get_restaurant, list_restaurant_reservations,
    list_restaurant_tables, list_restaurant_zones, list_restaurants, update_restaurant,
};
pub use sessions::{login, logout, profile, refresh_token, register};
pub use users::{create_user, delete_user, get_user, list_users, update_user};
pub use venue::{
    create_table, create_zone, delete_table, delete_zone, get_table, get_zone, list_tables,
    list_zone_tables, list_zones, update_table, update_zone,
};

use tablebook::{Actor, Resource};
use tablebook_domain::validate_optional_text;
use tablebook_persistence::{
    Persistence, ReservationData, RestaurantData, TableData, UserData, ZoneData,
};

use crate::capabilities::compute_restaurant_capabilities;
use crate::error::ApiError;
use crate::request_response::{ReservationInfo, RestaurantInfo, TableInfo, UserInfo, ZoneInfo};

/// Longest accepted phone number.
const MAX_PHONE_LENGTH: usize = 32;

fn user_info(user: &UserData) -> UserInfo {
    UserInfo {
        user_id: user.user_id,
        name: user.name.clone(),
        email: user.email.to_string(),
        role: user.role.as_str().to_string(),
        phone: user.phone.clone(),
        status: user.status.as_str().to_string(),
        created_by: user.created_by,
        last_login_at: user.last_login_at.clone(),
        created_at: user.created_at.clone(),
        updated_at: user.updated_at.clone(),
    }
}

fn restaurant_info(actor: &Actor, restaurant: &RestaurantData) -> RestaurantInfo {
    RestaurantInfo {
        restaurant_id: restaurant.restaurant_id,
        name: restaurant.name.clone(),
        business_name: restaurant.business_name.clone(),
        business_email: restaurant.business_email.clone(),
        food_type: restaurant.food_type.clone(),
        phone: restaurant.phone.clone(),
        description: restaurant.description.clone(),
        capacity: restaurant.capacity,
        supervisor_id: restaurant.supervisor_id,
        opening_time: restaurant.opening_time.clone(),
        closing_time: restaurant.closing_time.clone(),
        status: restaurant.status.as_str().to_string(),
        created_at: restaurant.created_at.clone(),
        updated_at: restaurant.updated_at.clone(),
        capabilities: compute_restaurant_capabilities(actor, restaurant.supervisor_id),
    }
}

fn zone_info(zone: &ZoneData) -> ZoneInfo {
    ZoneInfo {
        zone_id: zone.zone_id,
        restaurant_id: zone.restaurant_id,
        name: zone.name.clone(),
    }
}

fn table_info(table: &TableData) -> TableInfo {
    TableInfo {
        table_id: table.table_id,
        restaurant_id: table.restaurant_id,
        zone_id: table.zone_id,
        name: table.name.clone(),
        capacity: table.capacity,
        status: table.status.as_str().to_string(),
    }
}

fn reservation_info(reservation: &ReservationData) -> ReservationInfo {
    ReservationInfo {
        reservation_id: reservation.reservation_id,
        user_id: reservation.user_id,
        restaurant_id: reservation.restaurant_id,
        reservation_at: reservation.reservation_at.clone(),
        party_size: reservation.party_size,
        comment: reservation.comment.clone(),
        status: reservation.status.as_str().to_string(),
        tables: reservation.table_ids.clone(),
        created_at: reservation.created_at.clone(),
        updated_at: reservation.updated_at.clone(),
    }
}

fn load_user(persistence: &mut Persistence, user_id: i64) -> Result<UserData, ApiError> {
    persistence
        .get_user(user_id)?
        .ok_or_else(|| ApiError::not_found("user", user_id))
}

fn load_restaurant(
    persistence: &mut Persistence,
    restaurant_id: i64,
) -> Result<RestaurantData, ApiError> {
    persistence
        .get_restaurant(restaurant_id)?
        .ok_or_else(|| ApiError::not_found("restaurant", restaurant_id))
}

/// The zones and tables of a restaurant, as an access-control resource.
fn venue_of(persistence: &mut Persistence, restaurant_id: i64) -> Result<Resource, ApiError> {
    let restaurant: RestaurantData = load_restaurant(persistence, restaurant_id)?;
    Ok(Resource::Venue {
        supervisor_id: restaurant.supervisor_id,
    })
}

/// Normalizes an optional phone number; blank becomes `None`.
fn validate_phone(phone: Option<&str>) -> Result<Option<String>, ApiError> {
    Ok(validate_optional_text("phone", phone, MAX_PHONE_LENGTH)?)
}
