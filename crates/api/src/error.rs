// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Error types for the API layer.

use crate::password_policy::PasswordPolicyError;
use tablebook::{AccessDenied, CoreError};
use tablebook_domain::DomainError;
use tablebook_persistence::PersistenceError;

/// Authentication errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    /// Authentication failed.
    AuthenticationFailed {
        /// The reason authentication failed.
        reason: String,
    },
    /// Authentication succeeded but the actor may not do this.
    Unauthorized {
        /// The action that was attempted.
        action: String,
        /// Why the action was refused.
        reason: String,
    },
    /// Session storage failed. The message is for logs only.
    Internal {
        /// A description of the storage failure.
        message: String,
    },
}

impl std::fmt::Display for AuthError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::AuthenticationFailed { reason } => {
                write!(f, "Authentication failed: {reason}")
            }
            Self::Unauthorized { action, reason } => {
                write!(f, "Unauthorized: cannot {action}: {reason}")
            }
            Self::Internal { message } => write!(f, "Internal error: {message}"),
        }
    }
}

impl std::error::Error for AuthError {}

/// API-level errors.
///
/// These are distinct from domain/core errors and represent the API contract.
/// The server maps each variant onto exactly one HTTP status.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// Authentication failed (401).
    AuthenticationFailed {
        /// The reason authentication failed.
        reason: String,
    },
    /// Authorization failed: the actor does not have permission (403).
    Unauthorized {
        /// The action that was attempted.
        action: String,
        /// Why the action was refused. Logged, never returned to clients.
        reason: String,
    },
    /// A domain rule was violated (422).
    DomainRuleViolation {
        /// The rule that was violated.
        rule: String,
        /// A human-readable description of the violation.
        message: String,
    },
    /// Invalid input was provided (422).
    InvalidInput {
        /// The field that was invalid.
        field: String,
        /// A human-readable description of the error.
        message: String,
    },
    /// A requested resource was not found (404).
    ResourceNotFound {
        /// The type of resource that was not found.
        resource_type: String,
        /// A human-readable description of what was not found.
        message: String,
    },
    /// An internal error occurred (500).
    Internal {
        /// A description of the internal error.
        message: String,
    },
    /// Password policy violation (422).
    PasswordPolicyViolation {
        /// A human-readable description of the policy violation.
        message: String,
    },
}

impl ApiError {
    /// Builds the not-found error for a missing resource.
    #[must_use]
    pub fn not_found(resource_type: &str, id: i64) -> Self {
        Self::ResourceNotFound {
            resource_type: resource_type.to_string(),
            message: format!("{resource_type} {id} does not exist"),
        }
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::AuthenticationFailed { reason } => {
                write!(f, "Authentication failed: {reason}")
            }
            Self::Unauthorized { action, reason } => {
                write!(f, "Unauthorized: cannot {action}: {reason}")
            }
            Self::DomainRuleViolation { rule, message } => {
                write!(f, "Domain rule violation ({rule}): {message}")
            }
            Self::InvalidInput { field, message } => {
                write!(f, "Invalid input for field '{field}': {message}")
            }
            Self::ResourceNotFound {
                resource_type,
                message,
            } => {
                write!(f, "{resource_type} not found: {message}")
            }
            Self::Internal { message } => {
                write!(f, "Internal error: {message}")
            }
            Self::PasswordPolicyViolation { message } => {
                write!(f, "Password policy violation: {message}")
            }
        }
    }
}

impl std::error::Error for ApiError {}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::AuthenticationFailed { reason } => Self::AuthenticationFailed { reason },
            AuthError::Unauthorized { action, reason } => Self::Unauthorized { action, reason },
            AuthError::Internal { message } => Self::Internal { message },
        }
    }
}

impl From<PasswordPolicyError> for ApiError {
    fn from(err: PasswordPolicyError) -> Self {
        Self::PasswordPolicyViolation {
            message: err.to_string(),
        }
    }
}

impl From<AccessDenied> for ApiError {
    fn from(err: AccessDenied) -> Self {
        Self::Unauthorized {
            action: format!("{} {}", err.operation.name(), err.resource),
            reason: err.reason.to_string(),
        }
    }
}

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        translate_domain_error(err)
    }
}

impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        translate_core_error(err)
    }
}

impl From<PersistenceError> for ApiError {
    fn from(err: PersistenceError) -> Self {
        translate_persistence_error(err)
    }
}

/// Translates a domain error into an API error.
///
/// This translation is explicit and ensures domain errors are not leaked directly.
#[must_use]
pub fn translate_domain_error(err: DomainError) -> ApiError {
    let message: String = err.to_string();
    match err {
        DomainError::InvalidField { field, .. } | DomainError::InvalidCapacity { field, .. } => {
            ApiError::InvalidInput {
                field: field.to_string(),
                message,
            }
        }
        DomainError::InvalidEmail(_) => ApiError::InvalidInput {
            field: String::from("email"),
            message,
        },
        DomainError::InvalidRole(_) => ApiError::InvalidInput {
            field: String::from("role"),
            message,
        },
        DomainError::InvalidUserStatus(_)
        | DomainError::InvalidRestaurantStatus(_)
        | DomainError::InvalidTableStatus(_)
        | DomainError::InvalidReservationStatus(_) => ApiError::InvalidInput {
            field: String::from("status"),
            message,
        },
        DomainError::EmptyTableSet => ApiError::InvalidInput {
            field: String::from("tables"),
            message,
        },
        DomainError::InvalidDateTime { .. } | DomainError::DateTimeNotInFuture { .. } => {
            ApiError::InvalidInput {
                field: String::from("reservation_at"),
                message,
            }
        }
        DomainError::InvalidTimeOfDay(_) | DomainError::InvalidOpeningHours { .. } => {
            ApiError::InvalidInput {
                field: String::from("opening_hours"),
                message,
            }
        }
        DomainError::InvalidStatusTransition { .. } => ApiError::DomainRuleViolation {
            rule: String::from("status_transition"),
            message,
        },
        DomainError::ReservationClosed { .. } => ApiError::DomainRuleViolation {
            rule: String::from("reservation_closed"),
            message,
        },
        DomainError::PartySizeExceedsCapacity { .. } => ApiError::DomainRuleViolation {
            rule: String::from("party_fits_tables"),
            message,
        },
        DomainError::TimestampFormat(_) => ApiError::Internal { message },
    }
}

/// Translates a core error into an API error.
///
/// This translation is explicit and ensures core errors are not leaked directly.
#[must_use]
pub fn translate_core_error(err: CoreError) -> ApiError {
    match err {
        CoreError::DomainViolation(domain_err) => translate_domain_error(domain_err),
        CoreError::AccessDenied(denied) => ApiError::from(denied),
    }
}

/// Translates a persistence error into an API error.
///
/// Rule violations detected inside a transaction surface as 422-class
/// errors; storage failures become `Internal`.
#[must_use]
pub fn translate_persistence_error(err: PersistenceError) -> ApiError {
    let message: String = err.to_string();
    match err {
        PersistenceError::NotFound(what) => {
            let resource_type: &str = what.split_whitespace().next().unwrap_or("resource");
            ApiError::ResourceNotFound {
                resource_type: resource_type.to_string(),
                message,
            }
        }
        PersistenceError::TableNotFound(_) => ApiError::ResourceNotFound {
            resource_type: String::from("table"),
            message,
        },
        PersistenceError::DuplicateEmail(_) => ApiError::DomainRuleViolation {
            rule: String::from("unique_email"),
            message,
        },
        PersistenceError::DuplicateBusinessEmail(_) => ApiError::DomainRuleViolation {
            rule: String::from("unique_business_email"),
            message,
        },
        PersistenceError::DuplicateZoneName { .. } => ApiError::DomainRuleViolation {
            rule: String::from("unique_zone_name"),
            message,
        },
        PersistenceError::DuplicateTableName { .. } => ApiError::DomainRuleViolation {
            rule: String::from("unique_table_name"),
            message,
        },
        PersistenceError::NotASupervisor(_) => ApiError::DomainRuleViolation {
            rule: String::from("supervisor_role"),
            message,
        },
        PersistenceError::ZoneNotInRestaurant { .. } => ApiError::DomainRuleViolation {
            rule: String::from("zone_in_restaurant"),
            message,
        },
        PersistenceError::TableNotInRestaurant { .. } => ApiError::DomainRuleViolation {
            rule: String::from("table_in_restaurant"),
            message,
        },
        PersistenceError::TableUnavailable { .. } => ApiError::DomainRuleViolation {
            rule: String::from("table_available"),
            message,
        },
        PersistenceError::TableHeld { .. } => ApiError::DomainRuleViolation {
            rule: String::from("table_held"),
            message,
        },
        PersistenceError::PartySizeExceedsCapacity { .. } => ApiError::DomainRuleViolation {
            rule: String::from("party_fits_tables"),
            message,
        },
        PersistenceError::RestaurantHasActiveReservations { .. } => {
            ApiError::DomainRuleViolation {
                rule: String::from("no_active_reservations"),
                message,
            }
        }
        PersistenceError::UserSupervisesRestaurants { .. } => ApiError::DomainRuleViolation {
            rule: String::from("supervisor_reassigned"),
            message,
        },
        PersistenceError::ConstraintViolation(_) => ApiError::DomainRuleViolation {
            rule: String::from("constraint"),
            message,
        },
        PersistenceError::DatabaseError(_)
        | PersistenceError::DatabaseConnectionFailed(_)
        | PersistenceError::MigrationFailed(_)
        | PersistenceError::QueryFailed(_)
        | PersistenceError::InitializationError(_)
        | PersistenceError::ForeignKeyEnforcementNotEnabled
        | PersistenceError::CorruptRecord(_)
        | PersistenceError::PasswordHash(_)
        | PersistenceError::UnsupportedScope { .. }
        | PersistenceError::Other(_) => ApiError::Internal { message },
    }
}
