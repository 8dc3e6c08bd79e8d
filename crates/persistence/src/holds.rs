// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Table hold primitives shared by reservation, table, and user writes.
//!
//! The statements are macros so that the same text expands inside both
//! the `_sqlite` and `_mysql` bodies generated by `backend_fn!`. Callers
//! must have `diesel::prelude::*` in scope and run them inside a
//! transaction.
//!
//! A hold is taken with a conditional update that only matches a table
//! whose status is still `available`. Two writers racing for the same
//! table therefore cannot both succeed: the loser's update matches zero
//! rows and its transaction is rolled back.

use diesel::prelude::*;
use num_traits::ToPrimitive;
use tablebook_domain::{TableStatus, validate_party_fits};

use crate::diesel_schema::tables;
use crate::error::PersistenceError;

/// Loads the [`TableFacts`] for the given table IDs.
macro_rules! load_table_facts {
    ($conn:expr, $table_ids:expr) => {
        $crate::diesel_schema::tables::table
            .filter($crate::diesel_schema::tables::table_id.eq_any($table_ids))
            .select($crate::holds::TableFacts::as_select())
            .load::<$crate::holds::TableFacts>($conn)
    };
}

/// Moves one table from `available` to `$hold` if it belongs to
/// `$restaurant_id`. Evaluates to the number of rows changed.
macro_rules! acquire_table {
    ($conn:expr, $restaurant_id:expr, $table_id:expr, $hold:expr) => {
        diesel::update($crate::diesel_schema::tables::table)
            .filter($crate::diesel_schema::tables::table_id.eq($table_id))
            .filter($crate::diesel_schema::tables::restaurant_id.eq($restaurant_id))
            .filter(
                $crate::diesel_schema::tables::status
                    .eq(tablebook_domain::TableStatus::Available.as_str()),
            )
            .set($crate::diesel_schema::tables::status.eq($hold.as_str()))
            .execute($conn)
    };
}

/// Sets already-held tables to `$hold`, e.g. `occupied` on seating.
macro_rules! retag_held_tables {
    ($conn:expr, $table_ids:expr, $hold:expr) => {
        diesel::update($crate::diesel_schema::tables::table)
            .filter($crate::diesel_schema::tables::table_id.eq_any($table_ids))
            .filter($crate::diesel_schema::tables::status.eq_any($crate::holds::HELD_STATUSES))
            .set($crate::diesel_schema::tables::status.eq($hold.as_str()))
            .execute($conn)
    };
}

/// Returns held tables to `available`. Tables in maintenance are left
/// alone.
macro_rules! release_tables {
    ($conn:expr, $table_ids:expr) => {
        diesel::update($crate::diesel_schema::tables::table)
            .filter($crate::diesel_schema::tables::table_id.eq_any($table_ids))
            .filter($crate::diesel_schema::tables::status.eq_any($crate::holds::HELD_STATUSES))
            .set(
                $crate::diesel_schema::tables::status
                    .eq(tablebook_domain::TableStatus::Available.as_str()),
            )
            .execute($conn)
    };
}

/// Finds the active reservation holding `$table_id`, as
/// `QueryResult<Option<i64>>`.
macro_rules! active_hold {
    ($conn:expr, $table_id:expr) => {
        $crate::diesel_schema::reservation_tables::table
            .inner_join($crate::diesel_schema::reservations::table)
            .filter($crate::diesel_schema::reservation_tables::table_id.eq($table_id))
            .filter($crate::diesel_schema::reservations::status.eq_any($crate::holds::ACTIVE_STATUSES))
            .select($crate::diesel_schema::reservation_tables::reservation_id)
            .first::<i64>($conn)
            .optional()
    };
}

/// Stored statuses of a held table.
pub const HELD_STATUSES: [&str; 2] = [
    TableStatus::Reserved.as_str(),
    TableStatus::Occupied.as_str(),
];

/// Stored statuses of an active reservation.
pub const ACTIVE_STATUSES: [&str; 3] = [
    tablebook_domain::ReservationStatus::Pending.as_str(),
    tablebook_domain::ReservationStatus::Confirmed.as_str(),
    tablebook_domain::ReservationStatus::Seated.as_str(),
];

/// The columns of a table needed to validate a booking.
#[derive(Debug, Queryable, Selectable)]
#[diesel(table_name = tables)]
pub struct TableFacts {
    pub table_id: i64,
    pub restaurant_id: i64,
    pub name: String,
    pub capacity: i32,
    pub status: String,
}

/// Checks that every requested table exists, belongs to the restaurant,
/// and is available.
///
/// This runs before any table is written, so a rejected booking leaves
/// every table untouched. The first offending table is named in the
/// error.
///
/// # Errors
///
/// Returns `TableNotFound`, `TableNotInRestaurant`, or `TableUnavailable`.
pub fn check_bookable(
    requested: &[i64],
    facts: &[TableFacts],
    restaurant_id: i64,
) -> Result<(), PersistenceError> {
    for &table_id in requested {
        let Some(fact) = facts.iter().find(|fact| fact.table_id == table_id) else {
            return Err(PersistenceError::TableNotFound(table_id));
        };
        if fact.restaurant_id != restaurant_id {
            return Err(PersistenceError::TableNotInRestaurant {
                table_id,
                restaurant_id,
            });
        }
        let status: TableStatus = fact.status.parse()?;
        if status != TableStatus::Available {
            return Err(PersistenceError::TableUnavailable {
                table_id,
                table_name: fact.name.clone(),
            });
        }
    }
    Ok(())
}

/// Checks that a party fits at the combined capacity of `facts`.
///
/// # Errors
///
/// Returns `PartySizeExceedsCapacity` when it does not, or
/// `CorruptRecord` if a stored capacity is negative.
pub fn check_party_fits(party_size: u32, facts: &[TableFacts]) -> Result<(), PersistenceError> {
    let mut capacity: u32 = 0;
    for fact in facts {
        let seats: u32 = fact.capacity.to_u32().ok_or_else(|| {
            PersistenceError::CorruptRecord(format!(
                "table {} has capacity {}",
                fact.table_id, fact.capacity
            ))
        })?;
        capacity = capacity.saturating_add(seats);
    }

    validate_party_fits(party_size, capacity).map_err(|_| {
        PersistenceError::PartySizeExceedsCapacity {
            party_size,
            capacity,
        }
    })
}
