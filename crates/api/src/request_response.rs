// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Request and response types for the API.
//!
//! Enumerated values travel as their canonical strings and are parsed
//! by the handlers, so a bad value is reported against its field.

use serde::{Deserialize, Deserializer, Serialize};

/// Distinguishes an absent field from an explicit `null`.
fn deserialize_some<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    T::deserialize(deserializer).map(Some)
}

// ========================================================================
// Sessions and accounts
// ========================================================================

/// Request to register an account, or to create one as staff.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
    pub password_confirmation: String,
    /// Defaults to `customer`.
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Response for a successful login.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginResponse {
    /// The opaque bearer token.
    pub token: String,
    /// Always `bearer`.
    pub token_type: String,
    /// RFC 3339 expiry of the session.
    pub expires_at: String,
    pub user: UserInfo,
}

/// Response for a token rotation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RefreshResponse {
    pub token: String,
    pub token_type: String,
    pub expires_at: String,
}

/// The caller's own account and what it may do.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileResponse {
    pub user: UserInfo,
    pub capabilities: GlobalCapabilities,
}

/// Public view of an account. The password hash never leaves the server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserInfo {
    pub user_id: i64,
    pub name: String,
    pub email: String,
    pub role: String,
    pub phone: Option<String>,
    pub status: String,
    /// The account that created this one, if any.
    pub created_by: Option<i64>,
    pub last_login_at: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

/// Request to update an account. Absent fields stay unchanged.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct UpdateUserRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
    #[serde(default)]
    pub password_confirmation: Option<String>,
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListUsersResponse {
    pub users: Vec<UserInfo>,
}

// ========================================================================
// Restaurants
// ========================================================================

/// Request to create a restaurant.
///
/// The supervisor is named by `supervisor_id` or `supervisor_email`.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CreateRestaurantRequest {
    pub name: String,
    #[serde(default)]
    pub business_name: Option<String>,
    #[serde(default)]
    pub business_email: Option<String>,
    #[serde(default)]
    pub food_type: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    pub capacity: i64,
    #[serde(default)]
    pub supervisor_id: Option<i64>,
    #[serde(default)]
    pub supervisor_email: Option<String>,
    /// `HH:MM`, 24-hour clock.
    #[serde(default)]
    pub opening_time: Option<String>,
    /// `HH:MM`, 24-hour clock.
    #[serde(default)]
    pub closing_time: Option<String>,
    /// Defaults to `active`.
    #[serde(default)]
    pub status: Option<String>,
    /// Zones created together with the restaurant.
    #[serde(default)]
    pub zones: Vec<String>,
}

/// Request to update a restaurant. Absent fields stay unchanged.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct UpdateRestaurantRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub business_name: Option<String>,
    #[serde(default)]
    pub business_email: Option<String>,
    #[serde(default)]
    pub food_type: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub capacity: Option<i64>,
    #[serde(default)]
    pub supervisor_id: Option<i64>,
    #[serde(default)]
    pub supervisor_email: Option<String>,
    #[serde(default)]
    pub opening_time: Option<String>,
    #[serde(default)]
    pub closing_time: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RestaurantInfo {
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
    pub status: String,
    pub created_at: String,
    pub updated_at: String,
    /// What the caller may do with this restaurant.
    pub capabilities: RestaurantCapabilities,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListRestaurantsResponse {
    pub restaurants: Vec<RestaurantInfo>,
}

// ========================================================================
// Zones and tables
// ========================================================================

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CreateZoneRequest {
    pub restaurant_id: i64,
    pub name: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct UpdateZoneRequest {
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ZoneInfo {
    pub zone_id: i64,
    pub restaurant_id: i64,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListZonesResponse {
    pub zones: Vec<ZoneInfo>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CreateTableRequest {
    pub restaurant_id: i64,
    #[serde(default)]
    pub zone_id: Option<i64>,
    pub name: String,
    pub capacity: i64,
    /// Defaults to `available`.
    #[serde(default)]
    pub status: Option<String>,
}

/// Request to update a table. Absent fields stay unchanged; an explicit
/// `"zone_id": null` removes the table from its zone.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct UpdateTableRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub capacity: Option<i64>,
    #[serde(
        default,
        deserialize_with = "deserialize_some",
        skip_serializing_if = "Option::is_none"
    )]
    pub zone_id: Option<Option<i64>>,
    #[serde(default)]
    pub status: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableInfo {
    pub table_id: i64,
    pub restaurant_id: i64,
    pub zone_id: Option<i64>,
    pub name: String,
    pub capacity: u32,
    pub status: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListTablesResponse {
    pub tables: Vec<TableInfo>,
}

// ========================================================================
// Reservations
// ========================================================================

/// Request to book tables.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CreateReservationRequest {
    pub restaurant_id: i64,
    /// The guest. Staff may book for others; defaults to the caller.
    #[serde(default)]
    pub user_id: Option<i64>,
    pub tables: Vec<i64>,
    /// RFC 3339, or `YYYY-MM-DD HH:MM[:SS]` read as UTC.
    pub reservation_at: String,
    #[serde(default)]
    pub party_size: Option<i64>,
    #[serde(default)]
    pub comment: Option<String>,
    /// Defaults to `pending`.
    #[serde(default)]
    pub status: Option<String>,
}

/// Request to edit a reservation. Absent fields stay unchanged.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct UpdateReservationRequest {
    #[serde(default)]
    pub user_id: Option<i64>,
    #[serde(default)]
    pub tables: Option<Vec<i64>>,
    #[serde(default)]
    pub reservation_at: Option<String>,
    #[serde(default)]
    pub party_size: Option<i64>,
    #[serde(default)]
    pub comment: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct UpdateReservationStatusRequest {
    pub status: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReservationInfo {
    pub reservation_id: i64,
    pub user_id: i64,
    pub restaurant_id: i64,
    pub reservation_at: String,
    pub party_size: Option<u32>,
    pub comment: Option<String>,
    pub status: String,
    /// Table ids in ascending order.
    pub tables: Vec<i64>,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListReservationsResponse {
    pub reservations: Vec<ReservationInfo>,
}

// ========================================================================
// Capability Model
// ========================================================================

/// Represents whether a specific action is permitted.
///
/// Serializes to JSON as true/false.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Capability {
    /// The action is permitted.
    Allowed,
    /// The action is not permitted.
    Denied,
}

impl Capability {
    /// Returns true if the capability is allowed.
    #[must_use]
    pub const fn is_allowed(self) -> bool {
        matches!(self, Self::Allowed)
    }

    /// Creates a capability from a boolean value.
    #[must_use]
    pub const fn from_bool(value: bool) -> Self {
        if value { Self::Allowed } else { Self::Denied }
    }
}

impl Serialize for Capability {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_bool(self.is_allowed())
    }
}

impl<'de> Deserialize<'de> for Capability {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value: bool = bool::deserialize(deserializer)?;
        Ok(Self::from_bool(value))
    }
}

/// Account-level capabilities, shown on the profile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GlobalCapabilities {
    /// Whether the account can list the users in its scope.
    pub can_list_users: Capability,
    /// Whether the account can create other accounts.
    pub can_create_users: Capability,
    /// Whether the account can grant staff roles.
    pub can_assign_staff_roles: Capability,
    /// Whether the account can create restaurants.
    pub can_create_restaurants: Capability,
    /// Whether the account can manage zones and tables.
    pub can_manage_venues: Capability,
    /// Whether the account can confirm or seat reservations.
    pub can_confirm_reservations: Capability,
}

/// Capabilities of the caller on one restaurant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RestaurantCapabilities {
    pub can_update: Capability,
    pub can_delete: Capability,
    pub can_reassign_supervisor: Capability,
    /// Whether the caller can manage the restaurant's zones and tables.
    pub can_manage_venue: Capability,
    /// Whether the caller can see every reservation of the restaurant.
    pub can_view_reservations: Capability,
}
