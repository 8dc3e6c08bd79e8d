// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Zone and table queries.
//!
//! Supervisor scoping is expressed as a subselect on
//! `restaurants.supervisor_id`, so a single statement returns only the
//! rows of restaurants the supervisor owns.

use diesel::prelude::*;
use diesel::{MysqlConnection, SqliteConnection};
use num_traits::ToPrimitive;
use tablebook::Scope;
use tracing::debug;

use crate::data_models::{TableData, ZoneData};
use crate::diesel_schema::{restaurants, tables, zones};
use crate::error::PersistenceError;

/// Diesel Queryable struct for zone rows.
#[derive(Queryable, Selectable)]
#[diesel(table_name = zones)]
struct ZoneRow {
    zone_id: i64,
    restaurant_id: i64,
    name: String,
}

impl From<ZoneRow> for ZoneData {
    fn from(row: ZoneRow) -> Self {
        Self {
            zone_id: row.zone_id,
            restaurant_id: row.restaurant_id,
            name: row.name,
        }
    }
}

/// Diesel Queryable struct for table rows.
#[derive(Queryable, Selectable)]
#[diesel(table_name = tables)]
struct TableRow {
    table_id: i64,
    restaurant_id: i64,
    zone_id: Option<i64>,
    name: String,
    capacity: i32,
    status: String,
}

impl TryFrom<TableRow> for TableData {
    type Error = PersistenceError;

    fn try_from(row: TableRow) -> Result<Self, Self::Error> {
        let capacity: u32 = row.capacity.to_u32().ok_or_else(|| {
            PersistenceError::CorruptRecord(format!(
                "table {} has capacity {}",
                row.table_id, row.capacity
            ))
        })?;

        Ok(Self {
            table_id: row.table_id,
            restaurant_id: row.restaurant_id,
            zone_id: row.zone_id,
            name: row.name,
            capacity,
            status: row.status.parse()?,
        })
    }
}

// ============================================================================
// Zones
// ============================================================================

backend_fn! {
/// Retrieves a zone by ID.
///
/// # Errors
///
/// Returns an error if the query fails.
/// Returns `Ok(None)` if the zone is not found.
pub fn get_zone(conn: &mut _, zone_id: i64) -> Result<Option<ZoneData>, PersistenceError> {
    let row: Option<ZoneRow> = zones::table
        .filter(zones::zone_id.eq(zone_id))
        .select(ZoneRow::as_select())
        .first(conn)
        .optional()?;

    Ok(row.map(ZoneData::from))
}
}

backend_fn! {
/// Lists zones visible within `scope`, ordered by ID.
///
/// # Errors
///
/// Returns an error if the query fails or the scope does not apply to
/// zones.
pub fn list_zones(conn: &mut _, scope: Scope) -> Result<Vec<ZoneData>, PersistenceError> {
    debug!("Listing zones for scope {:?}", scope);

    let mut query = zones::table.into_boxed();
    query = match scope {
        Scope::All => query,
        Scope::SupervisedBy(supervisor_id) => query.filter(
            zones::restaurant_id.eq_any(
                restaurants::table
                    .filter(restaurants::supervisor_id.eq(supervisor_id))
                    .select(restaurants::restaurant_id),
            ),
        ),
        Scope::OwnedBy(_) | Scope::CreatedBy(_) => {
            return Err(PersistenceError::UnsupportedScope { collection: "zones" });
        }
    };

    let rows: Vec<ZoneRow> = query
        .order(zones::zone_id.asc())
        .select(ZoneRow::as_select())
        .load(conn)?;

    Ok(rows.into_iter().map(ZoneData::from).collect())
}
}

backend_fn! {
/// Lists the zones of one restaurant, ordered by ID.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn list_zones_for_restaurant(
    conn: &mut _,
    restaurant_id: i64,
) -> Result<Vec<ZoneData>, PersistenceError> {
    let rows: Vec<ZoneRow> = zones::table
        .filter(zones::restaurant_id.eq(restaurant_id))
        .order(zones::zone_id.asc())
        .select(ZoneRow::as_select())
        .load(conn)?;

    Ok(rows.into_iter().map(ZoneData::from).collect())
}
}

// ============================================================================
// Tables
// ============================================================================

backend_fn! {
/// Retrieves a table by ID.
///
/// # Errors
///
/// Returns an error if the query fails or the row cannot be decoded.
/// Returns `Ok(None)` if the table is not found.
pub fn get_table(conn: &mut _, table_id: i64) -> Result<Option<TableData>, PersistenceError> {
    let row: Option<TableRow> = tables::table
        .filter(tables::table_id.eq(table_id))
        .select(TableRow::as_select())
        .first(conn)
        .optional()?;

    row.map(TableData::try_from).transpose()
}
}

backend_fn! {
/// Lists tables visible within `scope`, ordered by ID.
///
/// # Errors
///
/// Returns an error if the query fails, a row cannot be decoded, or the
/// scope does not apply to tables.
pub fn list_tables(conn: &mut _, scope: Scope) -> Result<Vec<TableData>, PersistenceError> {
    debug!("Listing tables for scope {:?}", scope);

    let mut query = tables::table.into_boxed();
    query = match scope {
        Scope::All => query,
        Scope::SupervisedBy(supervisor_id) => query.filter(
            tables::restaurant_id.eq_any(
                restaurants::table
                    .filter(restaurants::supervisor_id.eq(supervisor_id))
                    .select(restaurants::restaurant_id),
            ),
        ),
        Scope::OwnedBy(_) | Scope::CreatedBy(_) => {
            return Err(PersistenceError::UnsupportedScope { collection: "tables" });
        }
    };

    let rows: Vec<TableRow> = query
        .order(tables::table_id.asc())
        .select(TableRow::as_select())
        .load(conn)?;

    rows.into_iter().map(TableData::try_from).collect()
}
}

backend_fn! {
/// Lists the tables of one restaurant, ordered by ID.
///
/// # Errors
///
/// Returns an error if the query fails or a row cannot be decoded.
pub fn list_tables_for_restaurant(
    conn: &mut _,
    restaurant_id: i64,
) -> Result<Vec<TableData>, PersistenceError> {
    let rows: Vec<TableRow> = tables::table
        .filter(tables::restaurant_id.eq(restaurant_id))
        .order(tables::table_id.asc())
        .select(TableRow::as_select())
        .load(conn)?;

    rows.into_iter().map(TableData::try_from).collect()
}
}

backend_fn! {
/// Lists the tables assigned to one zone, ordered by ID.
///
/// # Errors
///
/// Returns an error if the query fails or a row cannot be decoded.
pub fn list_tables_for_zone(
    conn: &mut _,
    zone_id: i64,
) -> Result<Vec<TableData>, PersistenceError> {
    let rows: Vec<TableRow> = tables::table
        .filter(tables::zone_id.eq(zone_id))
        .order(tables::table_id.asc())
        .select(TableRow::as_select())
        .load(conn)?;

    rows.into_iter().map(TableData::try_from).collect()
}
}

backend_fn! {
/// Finds the active reservation holding a table, if any.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn find_active_hold(conn: &mut _, table_id: i64) -> Result<Option<i64>, PersistenceError> {
    let holder: Option<i64> = active_hold!(conn, table_id)?;
    Ok(holder)
}
}
