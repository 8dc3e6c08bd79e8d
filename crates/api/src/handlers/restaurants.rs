// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use tablebook::{Operation, Resource, authorize};
use tablebook_domain::{
    Email, MAX_TEXT_LENGTH, RestaurantStatus, validate_capacity, validate_name,
    validate_opening_hours, validate_optional_text,
};
use tablebook_persistence::{
    NewRestaurant, Persistence, ReservationData, RestaurantChanges, RestaurantData, TableData,
    UserData, ZoneData,
};
use tracing::info;

use super::{
    load_restaurant, reservation_info, restaurant_info, table_info, validate_phone, zone_info,
};
use crate::auth::AuthenticatedActor;
use crate::error::ApiError;
use crate::request_response::{
    CreateRestaurantRequest, ListRestaurantsResponse, ListReservationsResponse,
    ListTablesResponse, ListZonesResponse, RestaurantInfo, UpdateRestaurantRequest,
};

/// Resolves a supervisor named by id, by email, or both.
///
/// The role check happens in the same transaction as the write.
fn resolve_supervisor(
    persistence: &mut Persistence,
    supervisor_id: Option<i64>,
    supervisor_email: Option<&str>,
) -> Result<Option<i64>, ApiError> {
    let Some(raw_email) = supervisor_email else {
        return Ok(supervisor_id);
    };

    let email: Email = Email::parse(raw_email)?;
    let user: UserData =
        persistence
            .get_user_by_email(&email)?
            .ok_or_else(|| ApiError::InvalidInput {
                field: String::from("supervisor_email"),
                message: format!("No account is registered as {email}"),
            })?;

    match supervisor_id {
        Some(id) if id != user.user_id => Err(ApiError::InvalidInput {
            field: String::from("supervisor_id"),
            message: format!("supervisor_id {id} does not match {email}"),
        }),
        _ => Ok(Some(user.user_id)),
    }
}

fn optional_text(field: &'static str, value: Option<&str>) -> Result<Option<String>, ApiError> {
    Ok(validate_optional_text(field, value, MAX_TEXT_LENGTH)?)
}

/// Lists every restaurant. Open to all authenticated callers.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn list_restaurants(
    persistence: &mut Persistence,
    actor: &AuthenticatedActor,
) -> Result<ListRestaurantsResponse, ApiError> {
    authorize(&actor.actor, Operation::List, &Resource::RestaurantCatalog)?;
    let restaurants: Vec<RestaurantData> = persistence.list_restaurants()?;
    Ok(ListRestaurantsResponse {
        restaurants: restaurants
            .iter()
            .map(|restaurant: &RestaurantData| restaurant_info(&actor.actor, restaurant))
            .collect(),
    })
}

/// Retrieves one restaurant.
///
/// # Errors
///
/// Returns `ResourceNotFound` if the restaurant does not exist.
pub fn get_restaurant(
    persistence: &mut Persistence,
    restaurant_id: i64,
    actor: &AuthenticatedActor,
) -> Result<RestaurantInfo, ApiError> {
    let restaurant: RestaurantData = load_restaurant(persistence, restaurant_id)?;
    authorize(
        &actor.actor,
        Operation::View,
        &Resource::Restaurant {
            supervisor_id: restaurant.supervisor_id,
        },
    )?;
    Ok(restaurant_info(&actor.actor, &restaurant))
}

/// Creates a restaurant with its initial zones. Admin only.
///
/// # Errors
///
/// Returns an error if:
/// - The caller is not an admin
/// - No supervisor is named, or the named account is not a supervisor
/// - A field fails validation
/// - The business email or a zone name is duplicated
pub fn create_restaurant(
    persistence: &mut Persistence,
    request: CreateRestaurantRequest,
    actor: &AuthenticatedActor,
) -> Result<RestaurantInfo, ApiError> {
    authorize(&actor.actor, Operation::Create, &Resource::RestaurantCatalog)?;

    let supervisor_id: i64 = resolve_supervisor(
        persistence,
        request.supervisor_id,
        request.supervisor_email.as_deref(),
    )?
    .ok_or_else(|| ApiError::InvalidInput {
        field: String::from("supervisor_id"),
        message: String::from("A restaurant needs a supervisor"),
    })?;

    let name: String = validate_name("name", &request.name)?;
    let capacity: u32 = validate_capacity("capacity", request.capacity)?;
    validate_opening_hours(
        request.opening_time.as_deref(),
        request.closing_time.as_deref(),
    )?;
    let status: RestaurantStatus = request
        .status
        .as_deref()
        .map(str::parse::<RestaurantStatus>)
        .transpose()?
        .unwrap_or_default();
    let zones: Vec<String> = request
        .zones
        .iter()
        .map(|zone: &String| validate_name("zones", zone))
        .collect::<Result<_, _>>()?;

    let restaurant: RestaurantData = persistence.create_restaurant(&NewRestaurant {
        name,
        business_name: optional_text("business_name", request.business_name.as_deref())?,
        business_email: request
            .business_email
            .as_deref()
            .map(Email::parse)
            .transpose()?,
        food_type: optional_text("food_type", request.food_type.as_deref())?,
        phone: validate_phone(request.phone.as_deref())?,
        description: optional_text("description", request.description.as_deref())?,
        capacity,
        supervisor_id,
        opening_time: optional_text("opening_time", request.opening_time.as_deref())?,
        closing_time: optional_text("closing_time", request.closing_time.as_deref())?,
        status,
        zones,
    })?;

    info!(
        restaurant_id = restaurant.restaurant_id,
        supervisor_id,
        actor_id = actor.user_id(),
        "Created restaurant"
    );
    Ok(restaurant_info(&actor.actor, &restaurant))
}

/// Updates a restaurant.
///
/// The owning supervisor may edit everything except the supervisor
/// assignment, which is reserved to admins.
///
/// # Errors
///
/// Returns an error if:
/// - The restaurant does not exist
/// - The caller may not edit it or may not reassign it
/// - A field fails validation, or the opening hours end up inverted
pub fn update_restaurant(
    persistence: &mut Persistence,
    restaurant_id: i64,
    request: UpdateRestaurantRequest,
    actor: &AuthenticatedActor,
) -> Result<RestaurantInfo, ApiError> {
    let restaurant: RestaurantData = load_restaurant(persistence, restaurant_id)?;
    let resource: Resource = Resource::Restaurant {
        supervisor_id: restaurant.supervisor_id,
    };
    authorize(&actor.actor, Operation::Update, &resource)?;

    let supervisor_id: Option<i64> = resolve_supervisor(
        persistence,
        request.supervisor_id,
        request.supervisor_email.as_deref(),
    )?
    .filter(|id: &i64| *id != restaurant.supervisor_id);
    if supervisor_id.is_some() {
        authorize(&actor.actor, Operation::AssignSupervisor, &resource)?;
    }

    let opening_time: Option<String> =
        optional_text("opening_time", request.opening_time.as_deref())?;
    let closing_time: Option<String> =
        optional_text("closing_time", request.closing_time.as_deref())?;
    validate_opening_hours(
        opening_time
            .as_deref()
            .or(restaurant.opening_time.as_deref()),
        closing_time
            .as_deref()
            .or(restaurant.closing_time.as_deref()),
    )?;

    let changes: RestaurantChanges = RestaurantChanges {
        name: request
            .name
            .as_deref()
            .map(|name: &str| validate_name("name", name))
            .transpose()?,
        business_name: optional_text("business_name", request.business_name.as_deref())?,
        business_email: request
            .business_email
            .as_deref()
            .map(Email::parse)
            .transpose()?,
        food_type: optional_text("food_type", request.food_type.as_deref())?,
        phone: validate_phone(request.phone.as_deref())?,
        description: optional_text("description", request.description.as_deref())?,
        capacity: request
            .capacity
            .map(|capacity: i64| validate_capacity("capacity", capacity))
            .transpose()?,
        supervisor_id,
        opening_time,
        closing_time,
        status: request
            .status
            .as_deref()
            .map(str::parse::<RestaurantStatus>)
            .transpose()?,
    };

    let updated: RestaurantData = persistence.update_restaurant(restaurant_id, &changes)?;
    info!(restaurant_id, actor_id = actor.user_id(), "Updated restaurant");
    Ok(restaurant_info(&actor.actor, &updated))
}

/// Deletes a restaurant with its zones, tables, and past reservations.
/// Admin only.
///
/// # Errors
///
/// Returns a rule violation while the restaurant has active reservations.
pub fn delete_restaurant(
    persistence: &mut Persistence,
    restaurant_id: i64,
    actor: &AuthenticatedActor,
) -> Result<(), ApiError> {
    let restaurant: RestaurantData = load_restaurant(persistence, restaurant_id)?;
    authorize(
        &actor.actor,
        Operation::Delete,
        &Resource::Restaurant {
            supervisor_id: restaurant.supervisor_id,
        },
    )?;

    persistence.delete_restaurant(restaurant_id)?;
    info!(restaurant_id, actor_id = actor.user_id(), "Deleted restaurant");
    Ok(())
}

/// Lists a restaurant's zones. Admin or owning supervisor.
///
/// # Errors
///
/// Returns `ResourceNotFound` or `Unauthorized`.
pub fn list_restaurant_zones(
    persistence: &mut Persistence,
    restaurant_id: i64,
    actor: &AuthenticatedActor,
) -> Result<ListZonesResponse, ApiError> {
    let venue: Resource = super::venue_of(persistence, restaurant_id)?;
    authorize(&actor.actor, Operation::List, &venue)?;

    let zones: Vec<ZoneData> = persistence.list_zones_for_restaurant(restaurant_id)?;
    Ok(ListZonesResponse {
        zones: zones.iter().map(zone_info).collect(),
    })
}

/// Lists a restaurant's tables. Admin or owning supervisor.
///
/// # Errors
///
/// Returns `ResourceNotFound` or `Unauthorized`.
pub fn list_restaurant_tables(
    persistence: &mut Persistence,
    restaurant_id: i64,
    actor: &AuthenticatedActor,
) -> Result<ListTablesResponse, ApiError> {
    let venue: Resource = super::venue_of(persistence, restaurant_id)?;
    authorize(&actor.actor, Operation::List, &venue)?;

    let tables: Vec<TableData> = persistence.list_tables_for_restaurant(restaurant_id)?;
    Ok(ListTablesResponse {
        tables: tables.iter().map(table_info).collect(),
    })
}

/// Lists every reservation of a restaurant. Admin or owning supervisor.
///
/// # Errors
///
/// Returns `ResourceNotFound` or `Unauthorized`.
pub fn list_restaurant_reservations(
    persistence: &mut Persistence,
    restaurant_id: i64,
    actor: &AuthenticatedActor,
) -> Result<ListReservationsResponse, ApiError> {
    let venue: Resource = super::venue_of(persistence, restaurant_id)?;
    authorize(&actor.actor, Operation::List, &venue)?;

    let reservations: Vec<ReservationData> =
        persistence.list_reservations_for_restaurant(restaurant_id)?;
    Ok(ListReservationsResponse {
        reservations: reservations.iter().map(reservation_info).collect(),
    })
}
