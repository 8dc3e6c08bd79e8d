// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::status::ReservationStatus;

/// Errors that can occur during domain validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// A required text field is empty or too long.
    InvalidField {
        /// The offending field name.
        field: &'static str,
        /// Description of the problem.
        message: String,
    },
    /// Email address is malformed.
    InvalidEmail(String),
    /// Role string is not one of the known roles.
    InvalidRole(String),
    /// User status string is not recognized.
    InvalidUserStatus(String),
    /// Restaurant status string is not recognized.
    InvalidRestaurantStatus(String),
    /// Table status string is not recognized.
    InvalidTableStatus(String),
    /// Reservation status string is not recognized.
    InvalidReservationStatus(String),
    /// A capacity or party size must be strictly positive.
    InvalidCapacity {
        /// The offending field name.
        field: &'static str,
        /// The rejected value.
        value: i64,
    },
    /// A reservation must reference at least one table.
    EmptyTableSet,
    /// Reservation date-time could not be parsed.
    InvalidDateTime {
        /// The rejected input.
        input: String,
    },
    /// Reservation date-time is not strictly in the future.
    DateTimeNotInFuture {
        /// The rejected date-time, formatted.
        datetime: String,
    },
    /// Time of day is not a valid `HH:MM` value.
    InvalidTimeOfDay(String),
    /// Opening time is not before closing time.
    InvalidOpeningHours {
        /// Opening time as given.
        opening: String,
        /// Closing time as given.
        closing: String,
    },
    /// The requested reservation status transition is not permitted.
    InvalidStatusTransition {
        /// Current status.
        from: ReservationStatus,
        /// Requested status.
        to: ReservationStatus,
    },
    /// A reservation in a terminal status cannot be edited.
    ReservationClosed {
        /// The terminal status.
        status: ReservationStatus,
    },
    /// Party size exceeds the combined capacity of the reserved tables.
    PartySizeExceedsCapacity {
        /// Requested party size.
        party_size: u32,
        /// Combined capacity of the tables.
        capacity: u32,
    },
    /// A timestamp could not be formatted.
    TimestampFormat(String),
}

impl std::fmt::Display for DomainError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidField { field, message } => write!(f, "Invalid {field}: {message}"),
            Self::InvalidEmail(email) => write!(f, "Invalid email address: '{email}'"),
            Self::InvalidRole(role) => write!(f, "Invalid role: '{role}'"),
            Self::InvalidUserStatus(status) => write!(f, "Invalid user status: '{status}'"),
            Self::InvalidRestaurantStatus(status) => {
                write!(f, "Invalid restaurant status: '{status}'")
            }
            Self::InvalidTableStatus(status) => write!(f, "Invalid table status: '{status}'"),
            Self::InvalidReservationStatus(status) => {
                write!(f, "Invalid reservation status: '{status}'")
            }
            Self::InvalidCapacity { field, value } => {
                write!(f, "Invalid {field}: {value}. Must be greater than 0")
            }
            Self::EmptyTableSet => write!(f, "A reservation must include at least one table"),
            Self::InvalidDateTime { input } => {
                write!(f, "Invalid reservation date-time: '{input}'")
            }
            Self::DateTimeNotInFuture { datetime } => {
                write!(f, "Reservation date-time {datetime} must be in the future")
            }
            Self::InvalidTimeOfDay(value) => {
                write!(f, "Invalid time of day: '{value}'. Expected HH:MM")
            }
            Self::InvalidOpeningHours { opening, closing } => {
                write!(
                    f,
                    "Opening time {opening} must be before closing time {closing}"
                )
            }
            Self::InvalidStatusTransition { from, to } => {
                write!(
                    f,
                    "Cannot change reservation status from '{}' to '{}'",
                    from.as_str(),
                    to.as_str()
                )
            }
            Self::ReservationClosed { status } => {
                write!(
                    f,
                    "Reservation is '{}' and can no longer be modified",
                    status.as_str()
                )
            }
            Self::PartySizeExceedsCapacity {
                party_size,
                capacity,
            } => {
                write!(
                    f,
                    "Party size {party_size} exceeds the combined table capacity of {capacity}"
                )
            }
            Self::TimestampFormat(msg) => write!(f, "Failed to format timestamp: {msg}"),
        }
    }
}

impl std::error::Error for DomainError {}
