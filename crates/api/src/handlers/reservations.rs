// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Reservation handlers.
//!
//! The lifecycle rules are planned by `tablebook::plan_*`; the table
//! holds a plan implies are executed by the persistence layer inside one
//! transaction together with the reservation write.

use time::OffsetDateTime;
use tablebook::{
    CreatePlan, Operation, ReservationContext, ReservationDraft, ReservationEdit, Scope,
    StatusChange, UpdatePlan, authorize, plan_create, plan_delete, plan_status_change,
    plan_update, reservation_scope,
};
use tablebook_domain::{
    MAX_TEXT_LENGTH, ReservationStatus, TableSet, TableStatus, format_timestamp, parse_datetime,
    validate_capacity, validate_optional_text,
};
use tablebook_persistence::{
    NewReservation, Persistence, ReservationData, ReservationUpdate, RestaurantData,
};
use tracing::info;

use super::{load_restaurant, load_user, reservation_info};
use crate::auth::AuthenticatedActor;
use crate::error::ApiError;
use crate::request_response::{
    CreateReservationRequest, ListReservationsResponse, ReservationInfo,
    UpdateReservationRequest, UpdateReservationStatusRequest,
};

fn load_reservation(
    persistence: &mut Persistence,
    reservation_id: i64,
) -> Result<ReservationData, ApiError> {
    persistence
        .get_reservation(reservation_id)?
        .ok_or_else(|| ApiError::not_found("reservation", reservation_id))
}

/// Resolves the ownership keys of a reservation.
fn context_of(
    persistence: &mut Persistence,
    reservation: &ReservationData,
) -> Result<ReservationContext, ApiError> {
    let restaurant: RestaurantData = load_restaurant(persistence, reservation.restaurant_id)?;
    Ok(ReservationContext {
        owner_id: reservation.user_id,
        supervisor_id: restaurant.supervisor_id,
        status: reservation.status,
    })
}

/// Fails with `InvalidInput` unless the booking's guest exists.
fn ensure_guest_exists(persistence: &mut Persistence, user_id: i64) -> Result<(), ApiError> {
    load_user(persistence, user_id).map_err(|_| ApiError::InvalidInput {
        field: String::from("user_id"),
        message: format!("No account has id {user_id}"),
    })?;
    Ok(())
}

fn party_size(value: Option<i64>) -> Result<Option<u32>, ApiError> {
    Ok(value
        .map(|size: i64| validate_capacity("party_size", size))
        .transpose()?)
}

fn listing(reservations: &[ReservationData]) -> ListReservationsResponse {
    ListReservationsResponse {
        reservations: reservations.iter().map(reservation_info).collect(),
    }
}

/// Lists the reservations in the caller's scope.
///
/// Admins see every reservation, supervisors those of their restaurants,
/// customers their own.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn list_reservations(
    persistence: &mut Persistence,
    actor: &AuthenticatedActor,
) -> Result<ListReservationsResponse, ApiError> {
    let scope: Scope = reservation_scope(&actor.actor);
    let reservations: Vec<ReservationData> = persistence.list_reservations(scope)?;
    Ok(listing(&reservations))
}

/// Lists the caller's own bookings, whatever the caller's role.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn list_my_reservations(
    persistence: &mut Persistence,
    actor: &AuthenticatedActor,
) -> Result<ListReservationsResponse, ApiError> {
    let reservations: Vec<ReservationData> =
        persistence.list_reservations(Scope::OwnedBy(actor.user_id()))?;
    Ok(listing(&reservations))
}

/// Retrieves one reservation.
///
/// # Errors
///
/// Returns `ResourceNotFound` or `Unauthorized`.
pub fn get_reservation(
    persistence: &mut Persistence,
    reservation_id: i64,
    actor: &AuthenticatedActor,
) -> Result<ReservationInfo, ApiError> {
    let reservation: ReservationData = load_reservation(persistence, reservation_id)?;
    let context: ReservationContext = context_of(persistence, &reservation)?;
    authorize(&actor.actor, Operation::View, &context.resource())?;
    Ok(reservation_info(&reservation))
}

/// Books tables.
///
/// Customers book for themselves; staff may name another guest. Every
/// requested table must exist, belong to the restaurant, and be
/// available; otherwise nothing is held and no reservation is stored.
///
/// # Errors
///
/// Returns an error if:
/// - The restaurant does not exist
/// - The caller may not book here, for this guest, or with this status
/// - The date-time is malformed or not in the future
/// - The table set is empty, or a table is missing, foreign, or taken
/// - The party does not fit at the tables
pub fn create_reservation(
    persistence: &mut Persistence,
    request: CreateReservationRequest,
    actor: &AuthenticatedActor,
) -> Result<ReservationInfo, ApiError> {
    let restaurant: RestaurantData = load_restaurant(persistence, request.restaurant_id)?;

    let reservation_at: OffsetDateTime = parse_datetime(&request.reservation_at)?;
    let tables: TableSet = TableSet::new(request.tables)?;
    let party_size: Option<u32> = party_size(request.party_size)?;
    let comment: Option<String> =
        validate_optional_text("comment", request.comment.as_deref(), MAX_TEXT_LENGTH)?;
    let status: Option<ReservationStatus> = request
        .status
        .as_deref()
        .map(str::parse::<ReservationStatus>)
        .transpose()?;

    let plan: CreatePlan = plan_create(
        &actor.actor,
        &ReservationDraft {
            requested_user_id: request.user_id,
            supervisor_id: restaurant.supervisor_id,
            reservation_at,
            status,
        },
        OffsetDateTime::now_utc(),
    )?;

    if plan.owner_id != actor.user_id() {
        ensure_guest_exists(persistence, plan.owner_id)?;
    }

    let reservation: ReservationData = persistence.create_reservation(&NewReservation {
        user_id: plan.owner_id,
        restaurant_id: restaurant.restaurant_id,
        reservation_at: format_timestamp(reservation_at)?,
        party_size,
        comment,
        status: plan.status,
        table_hold: plan.table_hold,
        tables,
    })?;

    info!(
        reservation_id = reservation.reservation_id,
        restaurant_id = reservation.restaurant_id,
        user_id = reservation.user_id,
        status = %reservation.status,
        "Created reservation"
    );
    Ok(reservation_info(&reservation))
}

/// Edits a reservation.
///
/// A closed reservation cannot be edited. A new table set releases the
/// dropped tables and holds the added ones under the same rules as a
/// booking; a status change moves the holds with it.
///
/// # Errors
///
/// Returns an error if:
/// - The reservation does not exist or the caller may not edit it
/// - The reservation is closed, or the status change is not allowed
/// - A field is invalid, or the tables change while the reservation closes
/// - An added table is missing, foreign, or taken, or the party does not fit
pub fn update_reservation(
    persistence: &mut Persistence,
    reservation_id: i64,
    request: UpdateReservationRequest,
    actor: &AuthenticatedActor,
) -> Result<ReservationInfo, ApiError> {
    let reservation: ReservationData = load_reservation(persistence, reservation_id)?;
    let context: ReservationContext = context_of(persistence, &reservation)?;

    let reservation_at: Option<OffsetDateTime> = request
        .reservation_at
        .as_deref()
        .map(parse_datetime)
        .transpose()?;
    let tables: Option<TableSet> = request.tables.map(TableSet::new).transpose()?;
    let party_size: Option<u32> = party_size(request.party_size)?;
    let comment: Option<String> =
        validate_optional_text("comment", request.comment.as_deref(), MAX_TEXT_LENGTH)?;
    let status: Option<ReservationStatus> = request
        .status
        .as_deref()
        .map(str::parse::<ReservationStatus>)
        .transpose()?;

    let plan: UpdatePlan = plan_update(
        &actor.actor,
        &context,
        &ReservationEdit {
            user_id: request.user_id,
            reservation_at,
            changes_tables: tables.is_some(),
            status,
        },
        OffsetDateTime::now_utc(),
    )?;

    let final_status: ReservationStatus = plan.final_status(reservation.status);
    let table_hold: Option<TableStatus> = final_status.table_hold();

    if plan.owner_id != reservation.user_id {
        ensure_guest_exists(persistence, plan.owner_id)?;
    }

    let updated: ReservationData = persistence.update_reservation(
        reservation_id,
        &ReservationUpdate {
            user_id: plan.owner_id,
            reservation_at: reservation_at.map(format_timestamp).transpose()?,
            party_size,
            comment,
            tables,
            status: final_status,
            table_hold,
        },
    )?;

    info!(
        reservation_id,
        status = %updated.status,
        actor_id = actor.user_id(),
        "Updated reservation"
    );
    Ok(reservation_info(&updated))
}

/// Moves a reservation through its lifecycle.
///
/// Only staff confirm or seat. Closing a reservation releases its
/// tables; seating marks them occupied. Repeating the current status
/// changes nothing.
///
/// # Errors
///
/// Returns an error if the reservation does not exist, the caller may
/// not make this change, or the transition is not allowed.
pub fn update_reservation_status(
    persistence: &mut Persistence,
    reservation_id: i64,
    request: &UpdateReservationStatusRequest,
    actor: &AuthenticatedActor,
) -> Result<ReservationInfo, ApiError> {
    let reservation: ReservationData = load_reservation(persistence, reservation_id)?;
    let context: ReservationContext = context_of(persistence, &reservation)?;
    let new_status: ReservationStatus = request.status.parse()?;

    let change: StatusChange = plan_status_change(&actor.actor, &context, new_status)?;
    if change.from == change.to {
        return Ok(reservation_info(&reservation));
    }

    let updated: ReservationData = persistence.update_reservation(
        reservation_id,
        &ReservationUpdate {
            user_id: reservation.user_id,
            reservation_at: None,
            party_size: None,
            comment: None,
            tables: None,
            status: change.to,
            table_hold: change.table_hold,
        },
    )?;

    info!(
        reservation_id,
        from = %change.from,
        to = %change.to,
        released = change.releases_tables(),
        actor_id = actor.user_id(),
        "Reservation status changed"
    );
    Ok(reservation_info(&updated))
}

/// Deletes a reservation, releasing its tables first.
///
/// # Errors
///
/// Returns `ResourceNotFound` or `Unauthorized`.
pub fn delete_reservation(
    persistence: &mut Persistence,
    reservation_id: i64,
    actor: &AuthenticatedActor,
) -> Result<(), ApiError> {
    let reservation: ReservationData = load_reservation(persistence, reservation_id)?;
    let context: ReservationContext = context_of(persistence, &reservation)?;
    plan_delete(&actor.actor, &context)?;

    persistence.delete_reservation(reservation_id)?;
    info!(reservation_id, actor_id = actor.user_id(), "Deleted reservation");
    Ok(())
}
