// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Restaurant queries.

use diesel::prelude::*;
use diesel::{MysqlConnection, SqliteConnection};
use num_traits::ToPrimitive;
use tracing::debug;

use crate::data_models::RestaurantData;
use crate::diesel_schema::restaurants;
use crate::error::PersistenceError;

/// Diesel Queryable struct for restaurant rows.
#[derive(Queryable, Selectable)]
#[diesel(table_name = restaurants)]
struct RestaurantRow {
    restaurant_id: i64,
    name: String,
    business_name: Option<String>,
    business_email: Option<String>,
    food_type: Option<String>,
    phone: Option<String>,
    description: Option<String>,
    capacity: i32,
    supervisor_id: i64,
    opening_time: Option<String>,
    closing_time: Option<String>,
    status: String,
    created_at: String,
    updated_at: String,
}

impl TryFrom<RestaurantRow> for RestaurantData {
    type Error = PersistenceError;

    fn try_from(row: RestaurantRow) -> Result<Self, Self::Error> {
        let capacity: u32 = row.capacity.to_u32().ok_or_else(|| {
            PersistenceError::CorruptRecord(format!(
                "restaurant {} has capacity {}",
                row.restaurant_id, row.capacity
            ))
        })?;

        Ok(Self {
            restaurant_id: row.restaurant_id,
            name: row.name,
            business_name: row.business_name,
            business_email: row.business_email,
            food_type: row.food_type,
            phone: row.phone,
            description: row.description,
            capacity,
            supervisor_id: row.supervisor_id,
            opening_time: row.opening_time,
            closing_time: row.closing_time,
            status: row.status.parse()?,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

backend_fn! {
/// Retrieves a restaurant by ID.
///
/// # Errors
///
/// Returns an error if the query fails or the row cannot be decoded.
/// Returns `Ok(None)` if the restaurant is not found.
pub fn get_restaurant(
    conn: &mut _,
    restaurant_id: i64,
) -> Result<Option<RestaurantData>, PersistenceError> {
    debug!("Looking up restaurant by ID: {}", restaurant_id);

    let row: Option<RestaurantRow> = restaurants::table
        .filter(restaurants::restaurant_id.eq(restaurant_id))
        .select(RestaurantRow::as_select())
        .first(conn)
        .optional()?;

    row.map(RestaurantData::try_from).transpose()
}
}

backend_fn! {
/// Lists every restaurant, ordered by ID.
///
/// # Errors
///
/// Returns an error if the query fails or a row cannot be decoded.
pub fn list_restaurants(conn: &mut _) -> Result<Vec<RestaurantData>, PersistenceError> {
    let rows: Vec<RestaurantRow> = restaurants::table
        .order(restaurants::restaurant_id.asc())
        .select(RestaurantRow::as_select())
        .load(conn)?;

    rows.into_iter().map(RestaurantData::try_from).collect()
}
}
