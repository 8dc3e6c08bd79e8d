// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Centralized access-control evaluation.
//!
//! Every permission decision in the system goes through [`authorize`].
//! The evaluator is a pure function of the actor, the operation, and a
//! description of the target resource. Callers resolve ownership keys
//! (a restaurant's supervisor, a user's creator, a reservation's owner)
//! before asking.

use tablebook_domain::{Email, ReservationStatus, Role};

/// The authenticated identity making a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Actor {
    /// The actor's user id.
    pub user_id: i64,
    /// The actor's role.
    pub role: Role,
    /// The actor's normalized email.
    pub email: Email,
    /// The user who created the actor's account, if any.
    pub created_by: Option<i64>,
}

impl Actor {
    /// Creates a new actor.
    #[must_use]
    pub const fn new(user_id: i64, role: Role, email: Email, created_by: Option<i64>) -> Self {
        Self {
            user_id,
            role,
            email,
            created_by,
        }
    }
}

/// Operations subject to access control.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    /// Read a single resource.
    View,
    /// Enumerate resources.
    List,
    /// Create a resource.
    Create,
    /// Modify a resource.
    Update,
    /// Remove a resource.
    Delete,
    /// Set or change the supervisor that owns a restaurant.
    AssignSupervisor,
    /// Give an account the specified role.
    AssignRole(Role),
    /// Move a reservation into the specified status.
    SetReservationStatus(ReservationStatus),
}

impl Operation {
    /// Short name used in logs and errors.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::View => "view",
            Self::List => "list",
            Self::Create => "create",
            Self::Update => "update",
            Self::Delete => "delete",
            Self::AssignSupervisor => "assign_supervisor",
            Self::AssignRole(_) => "assign_role",
            Self::SetReservationStatus(_) => "set_reservation_status",
        }
    }
}

/// The target of an operation, with its ownership keys resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resource {
    /// The set of all user accounts (listing, creating).
    UserDirectory,
    /// A specific user account.
    User {
        /// The account's id.
        user_id: i64,
        /// Who created the account.
        created_by: Option<i64>,
    },
    /// The set of all restaurants (listing, creating).
    RestaurantCatalog,
    /// A specific restaurant.
    Restaurant {
        /// The owning supervisor.
        supervisor_id: i64,
    },
    /// The set of all zones and tables (listing).
    VenueDirectory,
    /// A zone or table of a specific restaurant.
    Venue {
        /// The owning supervisor of the parent restaurant.
        supervisor_id: i64,
    },
    /// The set of all reservations (listing).
    ReservationBook,
    /// A specific reservation.
    Reservation {
        /// The user the reservation is for.
        owner_id: i64,
        /// The owning supervisor of the reserved restaurant.
        supervisor_id: i64,
    },
}

impl Resource {
    /// Short name used in logs and errors.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::UserDirectory | Self::User { .. } => "user",
            Self::RestaurantCatalog | Self::Restaurant { .. } => "restaurant",
            Self::VenueDirectory | Self::Venue { .. } => "venue",
            Self::ReservationBook | Self::Reservation { .. } => "reservation",
        }
    }
}

/// A denied access decision.
///
/// `reason` is a fixed phrase intended for logs; it is never built from
/// resource data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AccessDenied {
    /// The operation that was attempted.
    pub operation: Operation,
    /// The kind of resource targeted.
    pub resource: &'static str,
    /// Why the evaluator refused.
    pub reason: &'static str,
}

impl std::fmt::Display for AccessDenied {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Access denied: cannot {} {}: {}",
            self.operation.name(),
            self.resource,
            self.reason
        )
    }
}

impl std::error::Error for AccessDenied {}

/// The subset of a collection an actor may enumerate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scope {
    /// Every row.
    All,
    /// Rows belonging to restaurants supervised by the given user.
    SupervisedBy(i64),
    /// Rows owned by the given user.
    OwnedBy(i64),
    /// Accounts created by the given user.
    CreatedBy(i64),
}

/// Returns true if `actor` may perform `operation` on `resource`.
#[must_use]
pub fn can_access(actor: &Actor, operation: Operation, resource: &Resource) -> bool {
    evaluate(actor, operation, resource).is_ok()
}

/// Authorizes `operation` on `resource` for `actor`.
///
/// # Errors
///
/// Returns `AccessDenied` if the evaluator refuses the operation.
pub fn authorize(
    actor: &Actor,
    operation: Operation,
    resource: &Resource,
) -> Result<(), AccessDenied> {
    evaluate(actor, operation, resource).map_err(|reason| AccessDenied {
        operation,
        resource: resource.kind(),
        reason,
    })
}

fn evaluate(actor: &Actor, operation: Operation, resource: &Resource) -> Result<(), &'static str> {
    if let (Operation::Delete, Resource::User { user_id, .. }) = (operation, resource)
        && *user_id == actor.user_id
    {
        return Err("cannot delete your own account");
    }

    if actor.role == Role::Admin {
        return Ok(());
    }

    match operation {
        Operation::AssignSupervisor => {
            return Err("only an admin may assign a restaurant supervisor");
        }
        Operation::AssignRole(role) if role != Role::Customer => {
            return Err("only an admin may grant a staff role");
        }
        Operation::SetReservationStatus(status)
            if status.requires_staff() && actor.role != Role::Supervisor =>
        {
            return Err("only staff may confirm or seat a reservation");
        }
        _ => {}
    }

    let is_supervisor: bool = actor.role == Role::Supervisor;
    match *resource {
        Resource::UserDirectory => {
            if is_supervisor
                && matches!(
                    operation,
                    Operation::View | Operation::List | Operation::Create | Operation::AssignRole(_)
                )
            {
                Ok(())
            } else {
                Err("customers cannot manage user accounts")
            }
        }
        Resource::User {
            user_id,
            created_by,
        } => {
            if user_id == actor.user_id && matches!(operation, Operation::View | Operation::Update)
            {
                return Ok(());
            }
            if is_supervisor && created_by == Some(actor.user_id) {
                return Ok(());
            }
            Err("account is outside the actor's scope")
        }
        Resource::RestaurantCatalog => match operation {
            Operation::View | Operation::List => Ok(()),
            _ => Err("only an admin may create restaurants"),
        },
        Resource::Restaurant { supervisor_id } => match operation {
            Operation::View | Operation::List => Ok(()),
            Operation::Create | Operation::Delete => {
                Err("only an admin may create or delete restaurants")
            }
            _ if is_supervisor && supervisor_id == actor.user_id => Ok(()),
            _ => Err("restaurant is outside the actor's scope"),
        },
        Resource::VenueDirectory => {
            if is_supervisor && matches!(operation, Operation::View | Operation::List) {
                Ok(())
            } else {
                Err("customers cannot manage zones or tables")
            }
        }
        Resource::Venue { supervisor_id } => {
            if is_supervisor && supervisor_id == actor.user_id {
                Ok(())
            } else {
                Err("restaurant is outside the actor's scope")
            }
        }
        Resource::ReservationBook => match operation {
            Operation::View | Operation::List | Operation::Create => Ok(()),
            _ => Err("reservations must be addressed individually"),
        },
        Resource::Reservation {
            owner_id,
            supervisor_id,
        } => {
            let in_scope: bool = if is_supervisor {
                supervisor_id == actor.user_id
            } else {
                owner_id == actor.user_id
            };
            if in_scope {
                Ok(())
            } else {
                Err("reservation is outside the actor's scope")
            }
        }
    }
}

/// Scope of reservations an actor may list.
#[must_use]
pub const fn reservation_scope(actor: &Actor) -> Scope {
    match actor.role {
        Role::Admin => Scope::All,
        Role::Supervisor => Scope::SupervisedBy(actor.user_id),
        Role::Customer => Scope::OwnedBy(actor.user_id),
    }
}

/// Scope of zones and tables an actor may list.
///
/// # Errors
///
/// Customers may not list zones or tables.
pub fn venue_scope(actor: &Actor) -> Result<Scope, AccessDenied> {
    authorize(actor, Operation::List, &Resource::VenueDirectory)?;
    Ok(match actor.role {
        Role::Admin => Scope::All,
        Role::Supervisor | Role::Customer => Scope::SupervisedBy(actor.user_id),
    })
}

/// Scope of user accounts an actor may list.
///
/// # Errors
///
/// Customers may not list users.
pub fn user_scope(actor: &Actor) -> Result<Scope, AccessDenied> {
    authorize(actor, Operation::List, &Resource::UserDirectory)?;
    Ok(match actor.role {
        Role::Admin => Scope::All,
        Role::Supervisor | Role::Customer => Scope::CreatedBy(actor.user_id),
    })
}

/// The outcome of an authorized registration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Registration {
    /// The role the new account receives.
    pub role: Role,
    /// Provenance recorded on the new account.
    pub created_by: Option<i64>,
}

/// Decides whether an account with `requested_role` may be created, and
/// by whom.
///
/// Anonymous callers may only self-register as customers. Supervisors
/// may create customers. Admins may create any role. Customers may not
/// create accounts. A missing role means customer.
///
/// # Errors
///
/// Returns `AccessDenied` for any other combination.
pub fn authorize_registration(
    actor: Option<&Actor>,
    requested_role: Option<Role>,
) -> Result<Registration, AccessDenied> {
    let role: Role = requested_role.unwrap_or(Role::Customer);

    let Some(actor) = actor else {
        if role == Role::Customer {
            return Ok(Registration {
                role,
                created_by: None,
            });
        }
        return Err(AccessDenied {
            operation: Operation::AssignRole(role),
            resource: Resource::UserDirectory.kind(),
            reason: "anonymous registration is limited to customers",
        });
    };

    authorize(actor, Operation::Create, &Resource::UserDirectory)?;
    authorize(actor, Operation::AssignRole(role), &Resource::UserDirectory)?;

    Ok(Registration {
        role,
        created_by: Some(actor.user_id),
    })
}
