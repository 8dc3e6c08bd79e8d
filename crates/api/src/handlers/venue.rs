// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Zone and table handlers.
//!
//! Both are managed by an admin or by the supervisor of the owning
//! restaurant. Customers have no access.

use tablebook::{Operation, Resource, Scope, authorize, venue_scope};
use tablebook_domain::{TableStatus, validate_capacity, validate_name};
use tablebook_persistence::{NewTable, Persistence, TableChanges, TableData, ZoneData};
use tracing::info;

use super::{table_info, venue_of, zone_info};
use crate::auth::AuthenticatedActor;
use crate::error::ApiError;
use crate::request_response::{
    CreateTableRequest, CreateZoneRequest, ListTablesResponse, ListZonesResponse, TableInfo,
    UpdateTableRequest, UpdateZoneRequest, ZoneInfo,
};

fn load_zone(persistence: &mut Persistence, zone_id: i64) -> Result<ZoneData, ApiError> {
    persistence
        .get_zone(zone_id)?
        .ok_or_else(|| ApiError::not_found("zone", zone_id))
}

fn load_table(persistence: &mut Persistence, table_id: i64) -> Result<TableData, ApiError> {
    persistence
        .get_table(table_id)?
        .ok_or_else(|| ApiError::not_found("table", table_id))
}

/// Parses a manually set table status.
///
/// `reserved` and `occupied` belong to reservations and cannot be set
/// by hand.
fn manual_table_status(status: &str) -> Result<TableStatus, ApiError> {
    let status: TableStatus = status.parse()?;
    if status.is_held() {
        return Err(ApiError::InvalidInput {
            field: String::from("status"),
            message: format!(
                "'{}' is set by reservations; use 'available' or 'maintenance'",
                status.as_str()
            ),
        });
    }
    Ok(status)
}

// ========================================================================
// Zones
// ========================================================================

/// Lists the zones in the caller's scope.
///
/// # Errors
///
/// Returns `Unauthorized` for customers.
pub fn list_zones(
    persistence: &mut Persistence,
    actor: &AuthenticatedActor,
) -> Result<ListZonesResponse, ApiError> {
    let scope: Scope = venue_scope(&actor.actor)?;
    let zones: Vec<ZoneData> = persistence.list_zones(scope)?;
    Ok(ListZonesResponse {
        zones: zones.iter().map(zone_info).collect(),
    })
}

/// Retrieves one zone.
///
/// # Errors
///
/// Returns `ResourceNotFound` or `Unauthorized`.
pub fn get_zone(
    persistence: &mut Persistence,
    zone_id: i64,
    actor: &AuthenticatedActor,
) -> Result<ZoneInfo, ApiError> {
    let zone: ZoneData = load_zone(persistence, zone_id)?;
    let venue: Resource = venue_of(persistence, zone.restaurant_id)?;
    authorize(&actor.actor, Operation::View, &venue)?;
    Ok(zone_info(&zone))
}

/// Creates a zone.
///
/// # Errors
///
/// Returns an error if the restaurant does not exist, the caller does
/// not manage it, or the name is invalid or taken.
pub fn create_zone(
    persistence: &mut Persistence,
    request: CreateZoneRequest,
    actor: &AuthenticatedActor,
) -> Result<ZoneInfo, ApiError> {
    let venue: Resource = venue_of(persistence, request.restaurant_id)?;
    authorize(&actor.actor, Operation::Create, &venue)?;

    let name: String = validate_name("name", &request.name)?;
    let zone: ZoneData = persistence.create_zone(request.restaurant_id, &name)?;

    info!(
        zone_id = zone.zone_id,
        restaurant_id = zone.restaurant_id,
        "Created zone"
    );
    Ok(zone_info(&zone))
}

/// Renames a zone.
///
/// # Errors
///
/// Returns an error if the zone does not exist, the caller does not
/// manage it, or the name is invalid or taken.
pub fn update_zone(
    persistence: &mut Persistence,
    zone_id: i64,
    request: UpdateZoneRequest,
    actor: &AuthenticatedActor,
) -> Result<ZoneInfo, ApiError> {
    let zone: ZoneData = load_zone(persistence, zone_id)?;
    let venue: Resource = venue_of(persistence, zone.restaurant_id)?;
    authorize(&actor.actor, Operation::Update, &venue)?;

    let name: String = validate_name("name", &request.name)?;
    let renamed: ZoneData = persistence.rename_zone(zone_id, &name)?;
    Ok(zone_info(&renamed))
}

/// Deletes a zone. Its tables stay in the restaurant without a zone.
///
/// # Errors
///
/// Returns `ResourceNotFound` or `Unauthorized`.
pub fn delete_zone(
    persistence: &mut Persistence,
    zone_id: i64,
    actor: &AuthenticatedActor,
) -> Result<(), ApiError> {
    let zone: ZoneData = load_zone(persistence, zone_id)?;
    let venue: Resource = venue_of(persistence, zone.restaurant_id)?;
    authorize(&actor.actor, Operation::Delete, &venue)?;

    persistence.delete_zone(zone_id)?;
    info!(zone_id, actor_id = actor.user_id(), "Deleted zone");
    Ok(())
}

/// Lists the tables in a zone.
///
/// # Errors
///
/// Returns `ResourceNotFound` or `Unauthorized`.
pub fn list_zone_tables(
    persistence: &mut Persistence,
    zone_id: i64,
    actor: &AuthenticatedActor,
) -> Result<ListTablesResponse, ApiError> {
    let zone: ZoneData = load_zone(persistence, zone_id)?;
    let venue: Resource = venue_of(persistence, zone.restaurant_id)?;
    authorize(&actor.actor, Operation::List, &venue)?;

    let tables: Vec<TableData> = persistence.list_tables_for_zone(zone_id)?;
    Ok(ListTablesResponse {
        tables: tables.iter().map(table_info).collect(),
    })
}

// ========================================================================
// Tables
// ========================================================================

/// Lists the tables in the caller's scope.
///
/// # Errors
///
/// Returns `Unauthorized` for customers.
pub fn list_tables(
    persistence: &mut Persistence,
    actor: &AuthenticatedActor,
) -> Result<ListTablesResponse, ApiError> {
    let scope: Scope = venue_scope(&actor.actor)?;
    let tables: Vec<TableData> = persistence.list_tables(scope)?;
    Ok(ListTablesResponse {
        tables: tables.iter().map(table_info).collect(),
    })
}

/// Retrieves one table.
///
/// # Errors
///
/// Returns `ResourceNotFound` or `Unauthorized`.
pub fn get_table(
    persistence: &mut Persistence,
    table_id: i64,
    actor: &AuthenticatedActor,
) -> Result<TableInfo, ApiError> {
    let table: TableData = load_table(persistence, table_id)?;
    let venue: Resource = venue_of(persistence, table.restaurant_id)?;
    authorize(&actor.actor, Operation::View, &venue)?;
    Ok(table_info(&table))
}

/// Creates a table.
///
/// # Errors
///
/// Returns an error if:
/// - The restaurant does not exist or the caller does not manage it
/// - The name, capacity, or status is invalid
/// - The zone belongs to another restaurant
/// - The restaurant already has a table with this name
pub fn create_table(
    persistence: &mut Persistence,
    request: CreateTableRequest,
    actor: &AuthenticatedActor,
) -> Result<TableInfo, ApiError> {
    let venue: Resource = venue_of(persistence, request.restaurant_id)?;
    authorize(&actor.actor, Operation::Create, &venue)?;

    let name: String = validate_name("name", &request.name)?;
    let capacity: u32 = validate_capacity("capacity", request.capacity)?;
    let status: TableStatus = request
        .status
        .as_deref()
        .map(manual_table_status)
        .transpose()?
        .unwrap_or_default();

    let table: TableData = persistence.create_table(&NewTable {
        restaurant_id: request.restaurant_id,
        zone_id: request.zone_id,
        name,
        capacity,
        status,
    })?;

    info!(
        table_id = table.table_id,
        restaurant_id = table.restaurant_id,
        "Created table"
    );
    Ok(table_info(&table))
}

/// Updates a table.
///
/// The status of a table held by an active reservation cannot be
/// changed by hand.
///
/// # Errors
///
/// Returns an error if:
/// - The table does not exist or the caller does not manage it
/// - A field is invalid or the new name is taken
/// - The zone belongs to another restaurant
/// - The status is changed while a reservation holds the table
pub fn update_table(
    persistence: &mut Persistence,
    table_id: i64,
    request: UpdateTableRequest,
    actor: &AuthenticatedActor,
) -> Result<TableInfo, ApiError> {
    let table: TableData = load_table(persistence, table_id)?;
    let venue: Resource = venue_of(persistence, table.restaurant_id)?;
    authorize(&actor.actor, Operation::Update, &venue)?;

    let changes: TableChanges = TableChanges {
        name: request
            .name
            .as_deref()
            .map(|name: &str| validate_name("name", name))
            .transpose()?,
        capacity: request
            .capacity
            .map(|capacity: i64| validate_capacity("capacity", capacity))
            .transpose()?,
        zone_id: request.zone_id,
        status: request
            .status
            .as_deref()
            .map(manual_table_status)
            .transpose()?,
    };

    let updated: TableData = persistence.update_table(table_id, &changes)?;
    Ok(table_info(&updated))
}

/// Deletes a table that no active reservation holds.
///
/// # Errors
///
/// Returns `ResourceNotFound`, `Unauthorized`, or a rule violation while
/// the table is held.
pub fn delete_table(
    persistence: &mut Persistence,
    table_id: i64,
    actor: &AuthenticatedActor,
) -> Result<(), ApiError> {
    let table: TableData = load_table(persistence, table_id)?;
    let venue: Resource = venue_of(persistence, table.restaurant_id)?;
    authorize(&actor.actor, Operation::Delete, &venue)?;

    persistence.delete_table(table_id)?;
    info!(table_id, actor_id = actor.user_id(), "Deleted table");
    Ok(())
}
