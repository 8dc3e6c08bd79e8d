// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Reservation lifecycle planning.
//!
//! These functions decide whether a reservation change is allowed and
//! what it implies for table holds. They never touch storage: the
//! persistence layer executes the resulting plan inside a single
//! transaction.

use crate::access::{AccessDenied, Actor, Operation, Resource, authorize};
use crate::error::CoreError;
use tablebook_domain::{DomainError, ReservationStatus, Role, TableStatus, validate_future};
use time::OffsetDateTime;

/// The ownership and status of an existing reservation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReservationContext {
    /// The user the reservation is for.
    pub owner_id: i64,
    /// The supervisor of the reserved restaurant.
    pub supervisor_id: i64,
    /// The current status.
    pub status: ReservationStatus,
}

impl ReservationContext {
    /// The access-control resource describing this reservation.
    #[must_use]
    pub const fn resource(&self) -> Resource {
        Resource::Reservation {
            owner_id: self.owner_id,
            supervisor_id: self.supervisor_id,
        }
    }
}

/// Input to [`plan_create`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReservationDraft {
    /// The user id supplied by the caller, if any.
    pub requested_user_id: Option<i64>,
    /// The supervisor of the restaurant being booked.
    pub supervisor_id: i64,
    /// When the party arrives.
    pub reservation_at: OffsetDateTime,
    /// The initial status supplied by the caller, if any.
    pub status: Option<ReservationStatus>,
}

/// An approved reservation creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CreatePlan {
    /// The user the reservation is recorded for.
    pub owner_id: i64,
    /// The initial status.
    pub status: ReservationStatus,
    /// The status the tables take.
    pub table_hold: TableStatus,
}

/// Plans the creation of a reservation.
///
/// Customers always book for themselves; naming another user is
/// forbidden rather than silently corrected. Supervisors may only book
/// their own restaurants. The initial status defaults to pending and
/// may be confirmed or seated only by staff.
///
/// # Arguments
///
/// * `actor` - The caller
/// * `draft` - The requested reservation
/// * `now` - The current instant
///
/// # Errors
///
/// Returns `CoreError::AccessDenied` for permission failures and
/// `CoreError::DomainViolation` for a past date-time or a terminal
/// initial status.
pub fn plan_create(
    actor: &Actor,
    draft: &ReservationDraft,
    now: OffsetDateTime,
) -> Result<CreatePlan, CoreError> {
    let owner_id: i64 = match draft.requested_user_id {
        Some(user_id) if user_id != actor.user_id && actor.role == Role::Customer => {
            return Err(CoreError::AccessDenied(AccessDenied {
                operation: Operation::Create,
                resource: "reservation",
                reason: "customers may only book for themselves",
            }));
        }
        Some(user_id) => user_id,
        None => actor.user_id,
    };

    let resource: Resource = Resource::Reservation {
        owner_id,
        supervisor_id: draft.supervisor_id,
    };
    authorize(actor, Operation::Create, &resource)?;

    let status: ReservationStatus = draft.status.unwrap_or_default();
    authorize(actor, Operation::SetReservationStatus(status), &resource)?;

    let Some(table_hold) = status.table_hold() else {
        return Err(CoreError::DomainViolation(
            DomainError::InvalidStatusTransition {
                from: ReservationStatus::Pending,
                to: status,
            },
        ));
    };

    validate_future(draft.reservation_at, now)?;

    Ok(CreatePlan {
        owner_id,
        status,
        table_hold,
    })
}

/// An approved status change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusChange {
    /// Status before the change.
    pub from: ReservationStatus,
    /// Status after the change.
    pub to: ReservationStatus,
    /// The status the tables take afterwards; `None` releases them.
    pub table_hold: Option<TableStatus>,
}

impl StatusChange {
    /// Returns true if this change releases the reservation's tables.
    #[must_use]
    pub const fn releases_tables(&self) -> bool {
        self.from.is_active() && self.to.is_terminal()
    }
}

/// Plans a status change on an existing reservation.
///
/// # Errors
///
/// Returns `CoreError::AccessDenied` if the actor may not touch the
/// reservation or may not set the requested status, and
/// `CoreError::DomainViolation` for an invalid transition.
pub fn plan_status_change(
    actor: &Actor,
    reservation: &ReservationContext,
    new_status: ReservationStatus,
) -> Result<StatusChange, CoreError> {
    let resource: Resource = reservation.resource();
    authorize(actor, Operation::Update, &resource)?;
    authorize(actor, Operation::SetReservationStatus(new_status), &resource)?;
    reservation.status.validate_transition(new_status)?;

    Ok(StatusChange {
        from: reservation.status,
        to: new_status,
        table_hold: new_status.table_hold(),
    })
}

/// The fields a caller wants to change on a reservation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ReservationEdit {
    /// New owner, if reassigning.
    pub user_id: Option<i64>,
    /// New date-time, if moving.
    pub reservation_at: Option<OffsetDateTime>,
    /// True if the table set is being replaced.
    pub changes_tables: bool,
    /// New status, if changing.
    pub status: Option<ReservationStatus>,
}

/// An approved reservation edit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UpdatePlan {
    /// The owner after the edit.
    pub owner_id: i64,
    /// The status change, if any.
    pub status_change: Option<StatusChange>,
}

impl UpdatePlan {
    /// The status after the edit.
    #[must_use]
    pub fn final_status(&self, current: ReservationStatus) -> ReservationStatus {
        self.status_change.map_or(current, |change| change.to)
    }
}

/// Plans a general edit of an existing reservation.
///
/// Reservations in a terminal status are closed to edits. A changed
/// date-time must be in the future. Only staff may reassign the owner.
/// A new table set cannot accompany a status that releases tables.
///
/// # Errors
///
/// Returns `CoreError::AccessDenied` or `CoreError::DomainViolation`.
pub fn plan_update(
    actor: &Actor,
    reservation: &ReservationContext,
    edit: &ReservationEdit,
    now: OffsetDateTime,
) -> Result<UpdatePlan, CoreError> {
    let resource: Resource = reservation.resource();
    authorize(actor, Operation::Update, &resource)?;

    if reservation.status.is_terminal() {
        return Err(CoreError::DomainViolation(DomainError::ReservationClosed {
            status: reservation.status,
        }));
    }

    let owner_id: i64 = match edit.user_id {
        Some(user_id) if user_id != reservation.owner_id => {
            if actor.role == Role::Customer {
                return Err(CoreError::AccessDenied(AccessDenied {
                    operation: Operation::Update,
                    resource: "reservation",
                    reason: "customers may only book for themselves",
                }));
            }
            user_id
        }
        _ => reservation.owner_id,
    };

    if let Some(reservation_at) = edit.reservation_at {
        validate_future(reservation_at, now)?;
    }

    let status_change: Option<StatusChange> = edit
        .status
        .map(|status| plan_status_change(actor, reservation, status))
        .transpose()?;

    if edit.changes_tables
        && let Some(change) = status_change
        && change.table_hold.is_none()
    {
        return Err(CoreError::DomainViolation(DomainError::InvalidField {
            field: "tables",
            message: format!(
                "Tables cannot change while the reservation becomes {}",
                change.to.as_str()
            ),
        }));
    }

    Ok(UpdatePlan {
        owner_id,
        status_change,
    })
}

/// Authorizes deleting a reservation.
///
/// # Errors
///
/// Returns `CoreError::AccessDenied` if the actor may not delete it.
pub fn plan_delete(actor: &Actor, reservation: &ReservationContext) -> Result<(), CoreError> {
    authorize(actor, Operation::Delete, &reservation.resource())?;
    Ok(())
}
