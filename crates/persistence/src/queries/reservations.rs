// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Reservation queries.
//!
//! A reservation's table set lives in `reservation_tables`. List queries
//! load the reservation rows first and then fetch all join rows for the
//! page in one statement.

use std::collections::BTreeMap;

use diesel::prelude::*;
use diesel::{MysqlConnection, SqliteConnection};
use num_traits::ToPrimitive;
use tablebook::Scope;
use tracing::debug;

use crate::data_models::ReservationData;
use crate::diesel_schema::{reservation_tables, reservations, restaurants};
use crate::error::PersistenceError;

/// Diesel Queryable struct for reservation rows.
#[derive(Queryable, Selectable)]
#[diesel(table_name = reservations)]
struct ReservationRow {
    reservation_id: i64,
    user_id: i64,
    restaurant_id: i64,
    reservation_at: String,
    party_size: Option<i32>,
    comment: Option<String>,
    status: String,
    created_at: String,
    updated_at: String,
}

fn into_reservation_data(
    row: ReservationRow,
    table_ids: Vec<i64>,
) -> Result<ReservationData, PersistenceError> {
    let party_size: Option<u32> = row
        .party_size
        .map(|size| {
            size.to_u32().ok_or_else(|| {
                PersistenceError::CorruptRecord(format!(
                    "reservation {} has party size {size}",
                    row.reservation_id
                ))
            })
        })
        .transpose()?;

    Ok(ReservationData {
        reservation_id: row.reservation_id,
        user_id: row.user_id,
        restaurant_id: row.restaurant_id,
        reservation_at: row.reservation_at,
        party_size,
        comment: row.comment,
        status: row.status.parse()?,
        table_ids,
        created_at: row.created_at,
        updated_at: row.updated_at,
    })
}

/// Pairs each reservation row with its table IDs.
fn attach_tables(
    rows: Vec<ReservationRow>,
    links: Vec<(i64, i64)>,
) -> Result<Vec<ReservationData>, PersistenceError> {
    let mut by_reservation: BTreeMap<i64, Vec<i64>> = BTreeMap::new();
    for (reservation_id, table_id) in links {
        by_reservation
            .entry(reservation_id)
            .or_default()
            .push(table_id);
    }

    rows.into_iter()
        .map(|row| {
            let mut table_ids: Vec<i64> = by_reservation
                .remove(&row.reservation_id)
                .unwrap_or_default();
            table_ids.sort_unstable();
            into_reservation_data(row, table_ids)
        })
        .collect()
}

backend_fn! {
/// Retrieves a reservation and its table set by ID.
///
/// # Errors
///
/// Returns an error if the query fails or the row cannot be decoded.
/// Returns `Ok(None)` if the reservation is not found.
pub fn get_reservation(
    conn: &mut _,
    reservation_id: i64,
) -> Result<Option<ReservationData>, PersistenceError> {
    debug!("Looking up reservation by ID: {}", reservation_id);

    let row: Option<ReservationRow> = reservations::table
        .filter(reservations::reservation_id.eq(reservation_id))
        .select(ReservationRow::as_select())
        .first(conn)
        .optional()?;

    let Some(row) = row else {
        return Ok(None);
    };

    let table_ids: Vec<i64> = reservation_tables::table
        .filter(reservation_tables::reservation_id.eq(reservation_id))
        .order(reservation_tables::table_id.asc())
        .select(reservation_tables::table_id)
        .load(conn)?;

    into_reservation_data(row, table_ids).map(Some)
}
}

backend_fn! {
/// Lists reservations visible within `scope`, ordered by date-time then ID.
///
/// # Errors
///
/// Returns an error if the query fails, a row cannot be decoded, or the
/// scope does not apply to reservations.
pub fn list_reservations(
    conn: &mut _,
    scope: Scope,
) -> Result<Vec<ReservationData>, PersistenceError> {
    debug!("Listing reservations for scope {:?}", scope);

    let mut query = reservations::table.into_boxed();
    query = match scope {
        Scope::All => query,
        Scope::SupervisedBy(supervisor_id) => query.filter(
            reservations::restaurant_id.eq_any(
                restaurants::table
                    .filter(restaurants::supervisor_id.eq(supervisor_id))
                    .select(restaurants::restaurant_id),
            ),
        ),
        Scope::OwnedBy(user_id) => query.filter(reservations::user_id.eq(user_id)),
        Scope::CreatedBy(_) => {
            return Err(PersistenceError::UnsupportedScope {
                collection: "reservations",
            });
        }
    };

    let rows: Vec<ReservationRow> = query
        .order((
            reservations::reservation_at.asc(),
            reservations::reservation_id.asc(),
        ))
        .select(ReservationRow::as_select())
        .load(conn)?;

    let ids: Vec<i64> = rows.iter().map(|row| row.reservation_id).collect();
    let links: Vec<(i64, i64)> = reservation_tables::table
        .filter(reservation_tables::reservation_id.eq_any(&ids))
        .select((
            reservation_tables::reservation_id,
            reservation_tables::table_id,
        ))
        .load(conn)?;

    attach_tables(rows, links)
}
}

backend_fn! {
/// Lists the reservations of one restaurant, ordered by date-time then ID.
///
/// # Errors
///
/// Returns an error if the query fails or a row cannot be decoded.
pub fn list_reservations_for_restaurant(
    conn: &mut _,
    restaurant_id: i64,
) -> Result<Vec<ReservationData>, PersistenceError> {
    let rows: Vec<ReservationRow> = reservations::table
        .filter(reservations::restaurant_id.eq(restaurant_id))
        .order((
            reservations::reservation_at.asc(),
            reservations::reservation_id.asc(),
        ))
        .select(ReservationRow::as_select())
        .load(conn)?;

    let links: Vec<(i64, i64)> = reservation_tables::table
        .inner_join(reservations::table)
        .filter(reservations::restaurant_id.eq(restaurant_id))
        .select((
            reservation_tables::reservation_id,
            reservation_tables::table_id,
        ))
        .load(conn)?;

    attach_tables(rows, links)
}
}
