// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all
)]

//! API boundary for the reservation service.
//!
//! This crate sits between the HTTP server and the lower layers. It
//! authenticates sessions, validates request DTOs into domain values,
//! consults the access-control evaluator, and translates every failure
//! into an [`ApiError`] the server can map to a status code.

mod auth;
mod capabilities;
mod error;
mod handlers;
mod password_policy;
mod request_response;

#[cfg(test)]
mod tests;

pub use auth::{AuthenticatedActor, AuthenticationService};
pub use capabilities::{compute_global_capabilities, compute_restaurant_capabilities};
pub use error::{
    ApiError, AuthError, translate_core_error, translate_domain_error,
    translate_persistence_error,
};
pub use handlers::{
    create_reservation, create_restaurant, create_table, create_user, create_zone,
    delete_reservation, delete_restaurant, delete_table, delete_user, delete_zone,
    get_reservation, get_restaurant, get_table, get_user, get_zone, list_my_reservations,
    list_reservations, list_restaurant_reservations, list_restaurant_tables,
    list_restaurant_zones, list_restaurants, list_tables, list_users, list_zone_tables,
    list_zones, login, logout, profile, refresh_token, register, update_reservation,
    update_reservation_status, update_restaurant, update_table, update_user, update_zone,
};
pub use password_policy::{PasswordPolicy, PasswordPolicyError};
pub use request_response::{
    Capability, CreateReservationRequest, CreateRestaurantRequest, CreateTableRequest,
    CreateZoneRequest, GlobalCapabilities, ListReservationsResponse, ListRestaurantsResponse,
    ListTablesResponse, ListUsersResponse, ListZonesResponse, LoginRequest, LoginResponse,
    ProfileResponse, RefreshResponse, RegisterRequest, ReservationInfo, RestaurantCapabilities,
    RestaurantInfo, TableInfo, UpdateReservationRequest, UpdateReservationStatusRequest,
    UpdateRestaurantRequest, UpdateTableRequest, UpdateUserRequest, UpdateZoneRequest, UserInfo,
    ZoneInfo,
};
