// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Reservation mutations and the table holds they drive.
//!
//! ## Invariant
//!
//! At most one active reservation holds a given table. Holds are taken
//! with `acquire_table!`, a conditional update that only matches an
//! `available` table, so of two concurrent bookings for the same table
//! exactly one updates the row. The other sees zero affected rows,
//! returns `TableUnavailable`, and its transaction rolls back.
//!
//! Every write here runs in `write_transaction`, so on `SQLite` the
//! losing booking waits for the write lock rather than failing with
//! `database is locked`.
//!
//! ## Ordering
//!
//! Every write validates the whole requested table set before touching
//! any table. A booking that names one unavailable table therefore
//! leaves the other tables exactly as they were.

use std::collections::BTreeSet;

use diesel::prelude::*;
use diesel::{MysqlConnection, SqliteConnection};
use num_traits::ToPrimitive;
use tablebook_domain::{ReservationStatus, TableSet};
use tracing::{debug, info, warn};

use crate::backend::PersistenceBackend;
use crate::data_models::{NewReservation, ReservationUpdate};
use crate::diesel_schema::{reservation_tables, reservations};
use crate::error::PersistenceError;
use crate::holds::{TableFacts, check_bookable, check_party_fits};
use crate::mutations::now_timestamp;

/// Changeset for reservation updates. `None` fields are skipped.
#[derive(AsChangeset)]
#[diesel(table_name = reservations)]
struct ReservationChangeset<'a> {
    user_id: i64,
    reservation_at: Option<&'a str>,
    party_size: Option<i32>,
    comment: Option<&'a str>,
    status: &'a str,
    updated_at: String,
}

fn party_size_column(party_size: Option<u32>) -> Result<Option<i32>, PersistenceError> {
    party_size
        .map(|size| {
            size.to_i32().ok_or_else(|| {
                PersistenceError::Other(format!("party size {size} is out of range"))
            })
        })
        .transpose()
}

/// Takes a hold on each listed table, failing on the first that is no
/// longer available.
macro_rules! acquire_all {
    ($conn:expr, $restaurant_id:expr, $facts:expr, $table_ids:expr, $hold:expr) => {{
        for &table_id in $table_ids {
            let affected: usize = acquire_table!($conn, $restaurant_id, table_id, $hold)?;
            if affected == 0 {
                let table_name: String = $facts
                    .iter()
                    .find(|fact: &&TableFacts| fact.table_id == table_id)
                    .map(|fact: &TableFacts| fact.name.clone())
                    .unwrap_or_default();
                warn!(table_id, "Table was taken by a concurrent booking");
                return Err(PersistenceError::TableUnavailable {
                    table_id,
                    table_name,
                });
            }
        }
    }};
}

/// Replaces the join rows of a reservation.
macro_rules! link_tables {
    ($conn:expr, $reservation_id:expr, $table_ids:expr) => {{
        diesel::delete(
            reservation_tables::table
                .filter(reservation_tables::reservation_id.eq($reservation_id)),
        )
        .execute($conn)?;
        for &table_id in $table_ids {
            diesel::insert_into(reservation_tables::table)
                .values((
                    reservation_tables::reservation_id.eq($reservation_id),
                    reservation_tables::table_id.eq(table_id),
                ))
                .execute($conn)?;
        }
    }};
}

backend_fn! {
/// Creates a reservation and holds its tables.
///
/// All checks on the requested tables complete before the first hold is
/// taken. Holds and the insert share one transaction.
///
/// # Errors
///
/// Returns `TableNotFound`, `TableNotInRestaurant`, `TableUnavailable`,
/// `PartySizeExceedsCapacity`, or a database error. On error no table
/// changes status and no reservation row exists.
pub fn create_reservation(
    conn: &mut _,
    new_reservation: &NewReservation,
) -> Result<i64, PersistenceError> {
    info!(
        "Creating reservation for user {} at restaurant {} on {}",
        new_reservation.user_id, new_reservation.restaurant_id, new_reservation.reservation_at
    );

    let party_size: Option<i32> = party_size_column(new_reservation.party_size)?;
    let now: String = now_timestamp()?;
    let requested: Vec<i64> = new_reservation.tables.to_vec();
    let restaurant_id: i64 = new_reservation.restaurant_id;

    conn.write_transaction(|conn| {
        let facts: Vec<TableFacts> = load_table_facts!(conn, &requested)?;
        check_bookable(&requested, &facts, restaurant_id)?;
        if let Some(size) = new_reservation.party_size {
            check_party_fits(size, &facts)?;
        }

        acquire_all!(conn, restaurant_id, facts, &requested, new_reservation.table_hold);

        diesel::insert_into(reservations::table)
            .values((
                reservations::user_id.eq(new_reservation.user_id),
                reservations::restaurant_id.eq(restaurant_id),
                reservations::reservation_at.eq(&new_reservation.reservation_at),
                reservations::party_size.eq(party_size),
                reservations::comment.eq(new_reservation.comment.as_deref()),
                reservations::status.eq(new_reservation.status.as_str()),
                reservations::created_at.eq(&now),
                reservations::updated_at.eq(&now),
            ))
            .execute(conn)?;
        let reservation_id: i64 = conn.get_last_insert_rowid()?;

        link_tables!(conn, reservation_id, &requested);

        info!(reservation_id, tables = requested.len(), "Reservation created");
        Ok(reservation_id)
    })
}
}

backend_fn! {
/// Applies a planned edit to a reservation, moving table holds to match.
///
/// - Entering a terminal status releases every table the reservation held.
/// - A replaced table set releases dropped tables and holds added ones.
/// - Tables that stay are retagged, e.g. `occupied` once seated.
///
/// # Errors
///
/// Returns `NotFound`, the table errors of [`create_reservation_sqlite`],
/// or a database error. On error nothing changes.
pub fn update_reservation(
    conn: &mut _,
    reservation_id: i64,
    update: &ReservationUpdate,
) -> Result<(), PersistenceError> {
    info!(
        "Updating reservation {} to status {}",
        reservation_id, update.status
    );

    let party_size: Option<i32> = party_size_column(update.party_size)?;
    let now: String = now_timestamp()?;

    conn.write_transaction(|conn| {
        let current: Option<(i64, Option<i32>)> = reservations::table
            .filter(reservations::reservation_id.eq(reservation_id))
            .select((reservations::restaurant_id, reservations::party_size))
            .first(conn)
            .optional()?;
        let Some((restaurant_id, stored_party_size)) = current else {
            return Err(PersistenceError::NotFound(format!(
                "reservation {reservation_id}"
            )));
        };

        let held: Vec<i64> = reservation_tables::table
            .filter(reservation_tables::reservation_id.eq(reservation_id))
            .select(reservation_tables::table_id)
            .load(conn)?;
        let held_set: BTreeSet<i64> = held.iter().copied().collect();
        let target: Vec<i64> = update
            .tables
            .as_ref()
            .map_or_else(|| held.clone(), TableSet::to_vec);

        match update.table_hold {
            None => {
                let released: usize = release_tables!(conn, &held)?;
                debug!(reservation_id, released, "Released tables");
            }
            Some(hold) => {
                let target_set: BTreeSet<i64> = target.iter().copied().collect();
                let dropped: Vec<i64> = held_set.difference(&target_set).copied().collect();
                let added: Vec<i64> = target_set.difference(&held_set).copied().collect();
                let kept: Vec<i64> = held_set.intersection(&target_set).copied().collect();

                let facts: Vec<TableFacts> = load_table_facts!(conn, &target)?;
                check_bookable(&added, &facts, restaurant_id)?;
                let final_party_size: Option<u32> = update
                    .party_size
                    .or_else(|| stored_party_size.and_then(|size| size.to_u32()));
                if let Some(size) = final_party_size {
                    check_party_fits(size, &facts)?;
                }

                release_tables!(conn, &dropped)?;
                acquire_all!(conn, restaurant_id, facts, &added, hold);
                retag_held_tables!(conn, &kept, hold)?;
            }
        }

        if update.tables.is_some() {
            link_tables!(conn, reservation_id, &target);
        }

        let changeset: ReservationChangeset<'_> = ReservationChangeset {
            user_id: update.user_id,
            reservation_at: update.reservation_at.as_deref(),
            party_size,
            comment: update.comment.as_deref(),
            status: update.status.as_str(),
            updated_at: now,
        };
        diesel::update(reservations::table.filter(reservations::reservation_id.eq(reservation_id)))
            .set(&changeset)
            .execute(conn)?;

        Ok(())
    })
}
}

backend_fn! {
/// Deletes a reservation, releasing its tables first if it is active.
///
/// # Errors
///
/// Returns `NotFound` or a database error. On error nothing changes.
pub fn delete_reservation(conn: &mut _, reservation_id: i64) -> Result<(), PersistenceError> {
    info!("Deleting reservation ID: {}", reservation_id);

    conn.write_transaction(|conn| {
        let status: Option<String> = reservations::table
            .filter(reservations::reservation_id.eq(reservation_id))
            .select(reservations::status)
            .first(conn)
            .optional()?;
        let Some(status) = status else {
            return Err(PersistenceError::NotFound(format!(
                "reservation {reservation_id}"
            )));
        };

        let status: ReservationStatus = status.parse()?;
        if status.is_active() {
            let held: Vec<i64> = reservation_tables::table
                .filter(reservation_tables::reservation_id.eq(reservation_id))
                .select(reservation_tables::table_id)
                .load(conn)?;
            let released: usize = release_tables!(conn, &held)?;
            debug!(reservation_id, released, "Released tables");
        }

        diesel::delete(reservations::table.filter(reservations::reservation_id.eq(reservation_id)))
            .execute(conn)?;
        Ok(())
    })
}
}

