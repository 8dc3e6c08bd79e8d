// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Capability computation for authorization-aware UI gating.
//!
//! Capabilities expose what actions an actor is permitted to perform.
//! They are derived from the same evaluator the handlers call, are
//! advisory only, and do not replace backend authorization checks.

use tablebook::{Actor, Operation, Resource, can_access};
use tablebook_domain::{ReservationStatus, Role};

use crate::request_response::{Capability, GlobalCapabilities, RestaurantCapabilities};

/// Computes the account-level capabilities of an actor.
#[must_use]
pub fn compute_global_capabilities(actor: &Actor) -> GlobalCapabilities {
    // A reservation inside the actor's own scope.
    let own_reservation: Resource = Resource::Reservation {
        owner_id: actor.user_id,
        supervisor_id: actor.user_id,
    };

    GlobalCapabilities {
        can_list_users: Capability::from_bool(can_access(
            actor,
            Operation::List,
            &Resource::UserDirectory,
        )),
        can_create_users: Capability::from_bool(can_access(
            actor,
            Operation::Create,
            &Resource::UserDirectory,
        )),
        can_assign_staff_roles: Capability::from_bool(can_access(
            actor,
            Operation::AssignRole(Role::Supervisor),
            &Resource::UserDirectory,
        )),
        can_create_restaurants: Capability::from_bool(can_access(
            actor,
            Operation::Create,
            &Resource::RestaurantCatalog,
        )),
        can_manage_venues: Capability::from_bool(can_access(
            actor,
            Operation::List,
            &Resource::VenueDirectory,
        )),
        can_confirm_reservations: Capability::from_bool(can_access(
            actor,
            Operation::SetReservationStatus(ReservationStatus::Confirmed),
            &own_reservation,
        )),
    }
}

/// Computes the capabilities of an actor on one restaurant.
///
/// # Arguments
///
/// * `actor` - The acting user
/// * `supervisor_id` - The restaurant's supervisor
#[must_use]
pub fn compute_restaurant_capabilities(actor: &Actor, supervisor_id: i64) -> RestaurantCapabilities {
    let restaurant: Resource = Resource::Restaurant { supervisor_id };
    let venue: Resource = Resource::Venue { supervisor_id };

    RestaurantCapabilities {
        can_update: Capability::from_bool(can_access(actor, Operation::Update, &restaurant)),
        can_delete: Capability::from_bool(can_access(actor, Operation::Delete, &restaurant)),
        can_reassign_supervisor: Capability::from_bool(can_access(
            actor,
            Operation::AssignSupervisor,
            &restaurant,
        )),
        can_manage_venue: Capability::from_bool(can_access(actor, Operation::Update, &venue)),
        can_view_reservations: Capability::from_bool(can_access(actor, Operation::List, &venue)),
    }
}
