// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Zone and table mutations.
//!
//! Names are unique per restaurant. The check runs before the write so
//! the caller gets a precise error; the unique index behind it catches
//! anything that slips past.

use diesel::prelude::*;
use diesel::{MysqlConnection, SqliteConnection};
use tablebook_domain::TableStatus;
use tracing::info;

use crate::backend::PersistenceBackend;
use crate::data_models::{NewTable, TableChanges};
use crate::diesel_schema::{restaurants, tables, zones};
use crate::error::PersistenceError;
use crate::mutations::capacity_column;

/// Changeset for table updates. `None` fields are skipped.
#[derive(AsChangeset)]
#[diesel(table_name = tables)]
struct TableChangeset<'a> {
    name: Option<&'a str>,
    capacity: Option<i32>,
    zone_id: Option<Option<i64>>,
    status: Option<&'a str>,
}

/// Fails with `NotFound` unless the restaurant exists.
macro_rules! ensure_restaurant_exists {
    ($conn:expr, $restaurant_id:expr) => {{
        let found: i64 = restaurants::table
            .filter(restaurants::restaurant_id.eq($restaurant_id))
            .count()
            .get_result($conn)?;
        if found == 0 {
            return Err(PersistenceError::NotFound(format!(
                "restaurant {}",
                $restaurant_id
            )));
        }
    }};
}

/// Fails unless the zone exists and belongs to the restaurant.
macro_rules! ensure_zone_in_restaurant {
    ($conn:expr, $zone_id:expr, $restaurant_id:expr) => {{
        let owner: Option<i64> = zones::table
            .filter(zones::zone_id.eq($zone_id))
            .select(zones::restaurant_id)
            .first($conn)
            .optional()?;
        match owner {
            None => {
                return Err(PersistenceError::NotFound(format!("zone {}", $zone_id)));
            }
            Some(owner) if owner != $restaurant_id => {
                return Err(PersistenceError::ZoneNotInRestaurant {
                    zone_id: $zone_id,
                    restaurant_id: $restaurant_id,
                });
            }
            Some(_) => {}
        }
    }};
}

// ============================================================================
// Zones
// ============================================================================

backend_fn! {
/// Creates a zone in a restaurant.
///
/// # Errors
///
/// Returns `NotFound` if the restaurant does not exist,
/// `DuplicateZoneName`, or a database error.
pub fn create_zone(conn: &mut _, restaurant_id: i64, name: &str) -> Result<i64, PersistenceError> {
    info!("Creating zone '{}' in restaurant {}", name, restaurant_id);

    conn.transaction::<i64, PersistenceError, _>(|conn| {
        ensure_restaurant_exists!(conn, restaurant_id);

        let clashes: i64 = zones::table
            .filter(zones::restaurant_id.eq(restaurant_id))
            .filter(zones::name.eq(name))
            .count()
            .get_result(conn)?;
        if clashes > 0 {
            return Err(PersistenceError::DuplicateZoneName {
                restaurant_id,
                name: name.to_string(),
            });
        }

        diesel::insert_into(zones::table)
            .values((zones::restaurant_id.eq(restaurant_id), zones::name.eq(name)))
            .execute(conn)?;

        conn.get_last_insert_rowid()
    })
}
}

backend_fn! {
/// Renames a zone.
///
/// # Errors
///
/// Returns `NotFound`, `DuplicateZoneName`, or a database error.
pub fn rename_zone(conn: &mut _, zone_id: i64, name: &str) -> Result<(), PersistenceError> {
    conn.transaction::<(), PersistenceError, _>(|conn| {
        let restaurant_id: Option<i64> = zones::table
            .filter(zones::zone_id.eq(zone_id))
            .select(zones::restaurant_id)
            .first(conn)
            .optional()?;
        let Some(restaurant_id) = restaurant_id else {
            return Err(PersistenceError::NotFound(format!("zone {zone_id}")));
        };

        let clashes: i64 = zones::table
            .filter(zones::restaurant_id.eq(restaurant_id))
            .filter(zones::name.eq(name))
            .filter(zones::zone_id.ne(zone_id))
            .count()
            .get_result(conn)?;
        if clashes > 0 {
            return Err(PersistenceError::DuplicateZoneName {
                restaurant_id,
                name: name.to_string(),
            });
        }

        diesel::update(zones::table.filter(zones::zone_id.eq(zone_id)))
            .set(zones::name.eq(name))
            .execute(conn)?;
        Ok(())
    })
}
}

backend_fn! {
/// Deletes a zone. Its tables stay in the restaurant without a zone.
///
/// # Errors
///
/// Returns `NotFound` or a database error.
pub fn delete_zone(conn: &mut _, zone_id: i64) -> Result<(), PersistenceError> {
    let deleted: usize =
        diesel::delete(zones::table.filter(zones::zone_id.eq(zone_id))).execute(conn)?;
    if deleted == 0 {
        return Err(PersistenceError::NotFound(format!("zone {zone_id}")));
    }
    info!(zone_id, "Zone deleted");
    Ok(())
}
}

// ============================================================================
// Tables
// ============================================================================

backend_fn! {
/// Creates a table.
///
/// # Errors
///
/// Returns `NotFound` for a missing restaurant or zone,
/// `ZoneNotInRestaurant`, `DuplicateTableName`, or a database error.
pub fn create_table(conn: &mut _, new_table: &NewTable) -> Result<i64, PersistenceError> {
    info!(
        "Creating table '{}' in restaurant {}",
        new_table.name, new_table.restaurant_id
    );

    let capacity: i32 = capacity_column(new_table.capacity)?;

    conn.transaction::<i64, PersistenceError, _>(|conn| {
        ensure_restaurant_exists!(conn, new_table.restaurant_id);
        if let Some(zone_id) = new_table.zone_id {
            ensure_zone_in_restaurant!(conn, zone_id, new_table.restaurant_id);
        }

        let clashes: i64 = tables::table
            .filter(tables::restaurant_id.eq(new_table.restaurant_id))
            .filter(tables::name.eq(&new_table.name))
            .count()
            .get_result(conn)?;
        if clashes > 0 {
            return Err(PersistenceError::DuplicateTableName {
                restaurant_id: new_table.restaurant_id,
                name: new_table.name.clone(),
            });
        }

        diesel::insert_into(tables::table)
            .values((
                tables::restaurant_id.eq(new_table.restaurant_id),
                tables::zone_id.eq(new_table.zone_id),
                tables::name.eq(&new_table.name),
                tables::capacity.eq(capacity),
                tables::status.eq(new_table.status.as_str()),
            ))
            .execute(conn)?;

        let table_id: i64 = conn.get_last_insert_rowid()?;
        info!(table_id, "Table created");
        Ok(table_id)
    })
}
}

backend_fn! {
/// Applies changes to a table.
///
/// The status of a table held by an active reservation is owned by that
/// reservation and cannot be changed here.
///
/// # Errors
///
/// Returns `NotFound`, `ZoneNotInRestaurant`, `DuplicateTableName`,
/// `TableHeld`, or a database error.
pub fn update_table(
    conn: &mut _,
    table_id: i64,
    changes: &TableChanges,
) -> Result<(), PersistenceError> {
    info!("Updating table ID: {}", table_id);

    let capacity: Option<i32> = changes.capacity.map(capacity_column).transpose()?;

    conn.transaction::<(), PersistenceError, _>(|conn| {
        let restaurant_id: Option<i64> = tables::table
            .filter(tables::table_id.eq(table_id))
            .select(tables::restaurant_id)
            .first(conn)
            .optional()?;
        let Some(restaurant_id) = restaurant_id else {
            return Err(PersistenceError::TableNotFound(table_id));
        };

        if let Some(Some(zone_id)) = changes.zone_id {
            ensure_zone_in_restaurant!(conn, zone_id, restaurant_id);
        }

        if let Some(name) = &changes.name {
            let clashes: i64 = tables::table
                .filter(tables::restaurant_id.eq(restaurant_id))
                .filter(tables::name.eq(name))
                .filter(tables::table_id.ne(table_id))
                .count()
                .get_result(conn)?;
            if clashes > 0 {
                return Err(PersistenceError::DuplicateTableName {
                    restaurant_id,
                    name: name.clone(),
                });
            }
        }

        if changes.status.is_some() {
            let holder: Option<i64> = active_hold!(conn, table_id)?;
            if let Some(reservation_id) = holder {
                return Err(PersistenceError::TableHeld {
                    table_id,
                    reservation_id,
                });
            }
        }

        let changeset: TableChangeset<'_> = TableChangeset {
            name: changes.name.as_deref(),
            capacity,
            zone_id: changes.zone_id,
            status: changes.status.as_ref().map(TableStatus::as_str),
        };
        // An empty changeset is an error in Diesel.
        if changeset.name.is_none()
            && changeset.capacity.is_none()
            && changeset.zone_id.is_none()
            && changeset.status.is_none()
        {
            return Ok(());
        }
        diesel::update(tables::table.filter(tables::table_id.eq(table_id)))
            .set(&changeset)
            .execute(conn)?;

        Ok(())
    })
}
}

backend_fn! {
/// Deletes a table that no active reservation holds.
///
/// # Errors
///
/// Returns `TableNotFound`, `TableHeld`, or a database error.
pub fn delete_table(conn: &mut _, table_id: i64) -> Result<(), PersistenceError> {
    info!("Deleting table ID: {}", table_id);

    conn.transaction::<(), PersistenceError, _>(|conn| {
        let holder: Option<i64> = active_hold!(conn, table_id)?;
        if let Some(reservation_id) = holder {
            return Err(PersistenceError::TableHeld {
                table_id,
                reservation_id,
            });
        }

        let deleted: usize =
            diesel::delete(tables::table.filter(tables::table_id.eq(table_id))).execute(conn)?;
        if deleted == 0 {
            return Err(PersistenceError::TableNotFound(table_id));
        }
        Ok(())
    })
}
}
