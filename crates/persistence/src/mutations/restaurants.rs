// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Restaurant mutations.

use std::collections::BTreeSet;

use diesel::prelude::*;
use diesel::{MysqlConnection, SqliteConnection};
use tablebook_domain::{Email, RestaurantStatus, Role};
use tracing::info;

use crate::backend::PersistenceBackend;
use crate::data_models::{NewRestaurant, RestaurantChanges};
use crate::diesel_schema::{reservations, restaurants, users, zones};
use crate::error::PersistenceError;
use crate::holds::ACTIVE_STATUSES;
use crate::mutations::{capacity_column, now_timestamp};

/// Changeset for restaurant updates. `None` fields are skipped.
#[derive(AsChangeset)]
#[diesel(table_name = restaurants)]
struct RestaurantChangeset<'a> {
    name: Option<&'a str>,
    business_name: Option<&'a str>,
    business_email: Option<&'a str>,
    food_type: Option<&'a str>,
    phone: Option<&'a str>,
    description: Option<&'a str>,
    capacity: Option<i32>,
    supervisor_id: Option<i64>,
    opening_time: Option<&'a str>,
    closing_time: Option<&'a str>,
    status: Option<&'a str>,
    updated_at: String,
}

/// Verifies that `$supervisor_id` names a user with the supervisor role.
macro_rules! ensure_supervisor {
    ($conn:expr, $supervisor_id:expr) => {{
        let role: Option<String> = users::table
            .filter(users::user_id.eq($supervisor_id))
            .select(users::role)
            .first($conn)
            .optional()?;
        if role.as_deref() != Some(Role::Supervisor.as_str()) {
            return Err(PersistenceError::NotASupervisor($supervisor_id));
        }
    }};
}

/// Rejects a business email already used by another restaurant.
macro_rules! ensure_business_email_free {
    ($conn:expr, $email:expr) => {{
        let clashes: i64 = restaurants::table
            .filter(restaurants::business_email.eq($email.as_str()))
            .count()
            .get_result($conn)?;
        if clashes > 0 {
            return Err(PersistenceError::DuplicateBusinessEmail($email.to_string()));
        }
    }};
    ($conn:expr, $email:expr, except $restaurant_id:expr) => {{
        let clashes: i64 = restaurants::table
            .filter(restaurants::business_email.eq($email.as_str()))
            .filter(restaurants::restaurant_id.ne($restaurant_id))
            .count()
            .get_result($conn)?;
        if clashes > 0 {
            return Err(PersistenceError::DuplicateBusinessEmail($email.to_string()));
        }
    }};
}

backend_fn! {
/// Creates a restaurant and its initial zones.
///
/// # Errors
///
/// Returns `NotASupervisor`, `DuplicateBusinessEmail`,
/// `DuplicateZoneName`, or a database error. Nothing is written on error.
pub fn create_restaurant(
    conn: &mut _,
    new_restaurant: &NewRestaurant,
) -> Result<i64, PersistenceError> {
    info!(
        "Creating restaurant '{}' for supervisor {}",
        new_restaurant.name, new_restaurant.supervisor_id
    );

    let capacity: i32 = capacity_column(new_restaurant.capacity)?;
    let now: String = now_timestamp()?;

    conn.transaction::<i64, PersistenceError, _>(|conn| {
        ensure_supervisor!(conn, new_restaurant.supervisor_id);
        if let Some(email) = &new_restaurant.business_email {
            ensure_business_email_free!(conn, email);
        }

        diesel::insert_into(restaurants::table)
            .values((
                restaurants::name.eq(&new_restaurant.name),
                restaurants::business_name.eq(new_restaurant.business_name.as_deref()),
                restaurants::business_email
                    .eq(new_restaurant.business_email.as_ref().map(Email::as_str)),
                restaurants::food_type.eq(new_restaurant.food_type.as_deref()),
                restaurants::phone.eq(new_restaurant.phone.as_deref()),
                restaurants::description.eq(new_restaurant.description.as_deref()),
                restaurants::capacity.eq(capacity),
                restaurants::supervisor_id.eq(new_restaurant.supervisor_id),
                restaurants::opening_time.eq(new_restaurant.opening_time.as_deref()),
                restaurants::closing_time.eq(new_restaurant.closing_time.as_deref()),
                restaurants::status.eq(new_restaurant.status.as_str()),
                restaurants::created_at.eq(&now),
                restaurants::updated_at.eq(&now),
            ))
            .execute(conn)?;
        let restaurant_id: i64 = conn.get_last_insert_rowid()?;

        let mut seen: BTreeSet<&str> = BTreeSet::new();
        for zone_name in &new_restaurant.zones {
            if !seen.insert(zone_name.as_str()) {
                return Err(PersistenceError::DuplicateZoneName {
                    restaurant_id,
                    name: zone_name.clone(),
                });
            }
            diesel::insert_into(zones::table)
                .values((
                    zones::restaurant_id.eq(restaurant_id),
                    zones::name.eq(zone_name),
                ))
                .execute(conn)?;
        }

        info!(restaurant_id, zones = seen.len(), "Restaurant created");
        Ok(restaurant_id)
    })
}
}

backend_fn! {
/// Applies changes to a restaurant.
///
/// # Errors
///
/// Returns `NotFound`, `NotASupervisor`, `DuplicateBusinessEmail`, or a
/// database error.
pub fn update_restaurant(
    conn: &mut _,
    restaurant_id: i64,
    changes: &RestaurantChanges,
) -> Result<(), PersistenceError> {
    info!("Updating restaurant ID: {}", restaurant_id);

    let capacity: Option<i32> = changes.capacity.map(capacity_column).transpose()?;
    let now: String = now_timestamp()?;

    conn.transaction::<(), PersistenceError, _>(|conn| {
        let exists: i64 = restaurants::table
            .filter(restaurants::restaurant_id.eq(restaurant_id))
            .count()
            .get_result(conn)?;
        if exists == 0 {
            return Err(PersistenceError::NotFound(format!("restaurant {restaurant_id}")));
        }
        if let Some(supervisor_id) = changes.supervisor_id {
            ensure_supervisor!(conn, supervisor_id);
        }
        if let Some(email) = &changes.business_email {
            ensure_business_email_free!(conn, email, except restaurant_id);
        }

        let changeset: RestaurantChangeset<'_> = RestaurantChangeset {
            name: changes.name.as_deref(),
            business_name: changes.business_name.as_deref(),
            business_email: changes.business_email.as_ref().map(Email::as_str),
            food_type: changes.food_type.as_deref(),
            phone: changes.phone.as_deref(),
            description: changes.description.as_deref(),
            capacity,
            supervisor_id: changes.supervisor_id,
            opening_time: changes.opening_time.as_deref(),
            closing_time: changes.closing_time.as_deref(),
            status: changes.status.as_ref().map(RestaurantStatus::as_str),
            updated_at: now,
        };
        diesel::update(restaurants::table.filter(restaurants::restaurant_id.eq(restaurant_id)))
            .set(&changeset)
            .execute(conn)?;

        Ok(())
    })
}
}

backend_fn! {
/// Deletes a restaurant with its zones, tables, and past reservations.
///
/// Refused while any reservation of the restaurant is still active.
///
/// # Errors
///
/// Returns `NotFound`, `RestaurantHasActiveReservations`, or a database
/// error.
pub fn delete_restaurant(conn: &mut _, restaurant_id: i64) -> Result<(), PersistenceError> {
    info!("Deleting restaurant ID: {}", restaurant_id);

    conn.transaction::<(), PersistenceError, _>(|conn| {
        let active: i64 = reservations::table
            .filter(reservations::restaurant_id.eq(restaurant_id))
            .filter(reservations::status.eq_any(ACTIVE_STATUSES))
            .count()
            .get_result(conn)?;
        if active > 0 {
            return Err(PersistenceError::RestaurantHasActiveReservations {
                restaurant_id,
                count: active,
            });
        }

        let deleted: usize = diesel::delete(
            restaurants::table.filter(restaurants::restaurant_id.eq(restaurant_id)),
        )
        .execute(conn)?;
        if deleted == 0 {
            return Err(PersistenceError::NotFound(format!("restaurant {restaurant_id}")));
        }

        info!(restaurant_id, "Restaurant deleted");
        Ok(())
    })
}
}
