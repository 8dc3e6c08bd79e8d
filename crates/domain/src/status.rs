// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Status enumerations for restaurants, tables, and reservations.
//!
//! The reservation status carries the lifecycle state machine. Table
//! holds are derived from it: an active reservation keeps its tables
//! `reserved` (or `occupied` once the party is seated) and a terminal
//! reservation releases them.

use crate::error::DomainError;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Operating status of a restaurant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum RestaurantStatus {
    /// Open for business.
    #[default]
    #[serde(rename = "active")]
    Active,
    /// Closed or hidden from customers.
    #[serde(rename = "inactive")]
    Inactive,
    /// Open with free tables.
    #[serde(rename = "tables available")]
    TablesAvailable,
    /// Open with every table taken.
    #[serde(rename = "fully booked")]
    FullyBooked,
}

impl RestaurantStatus {
    /// Returns the persisted string representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Inactive => "inactive",
            Self::TablesAvailable => "tables available",
            Self::FullyBooked => "fully booked",
        }
    }
}

impl FromStr for RestaurantStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "active" => Ok(Self::Active),
            "inactive" => Ok(Self::Inactive),
            "tables available" => Ok(Self::TablesAvailable),
            "fully booked" => Ok(Self::FullyBooked),
            _ => Err(DomainError::InvalidRestaurantStatus(s.to_string())),
        }
    }
}

impl std::fmt::Display for RestaurantStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Status of a single dining table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TableStatus {
    /// Free to be reserved.
    #[default]
    Available,
    /// Held by a pending or confirmed reservation.
    Reserved,
    /// Held by a seated reservation.
    Occupied,
    /// Taken out of service by staff.
    Maintenance,
}

impl TableStatus {
    /// Returns the persisted string representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Available => "available",
            Self::Reserved => "reserved",
            Self::Occupied => "occupied",
            Self::Maintenance => "maintenance",
        }
    }

    /// Returns true if the status represents a hold by a reservation.
    #[must_use]
    pub const fn is_held(&self) -> bool {
        matches!(self, Self::Reserved | Self::Occupied)
    }
}

impl FromStr for TableStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "available" => Ok(Self::Available),
            "reserved" | "unavailable" => Ok(Self::Reserved),
            "occupied" => Ok(Self::Occupied),
            "maintenance" => Ok(Self::Maintenance),
            _ => Err(DomainError::InvalidTableStatus(s.to_string())),
        }
    }
}

impl std::fmt::Display for TableStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Reservation lifecycle states.
///
/// Valid transitions:
/// - `Pending` → `Confirmed` | `Canceled`
/// - `Confirmed` → `Seated` | `Canceled` | `NoShow`
/// - `Seated` → `Completed` | `NoShow`
///
/// `Completed`, `Canceled`, and `NoShow` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReservationStatus {
    /// Requested, awaiting confirmation.
    #[default]
    Pending,
    /// Accepted by the restaurant.
    Confirmed,
    /// Party has arrived and is at the table.
    Seated,
    /// Visit finished.
    #[serde(alias = "closed")]
    Completed,
    /// Called off before the visit.
    #[serde(alias = "cancelled")]
    Canceled,
    /// Party never arrived.
    NoShow,
}

impl ReservationStatus {
    /// Returns the persisted string representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Confirmed => "confirmed",
            Self::Seated => "seated",
            Self::Completed => "completed",
            Self::Canceled => "canceled",
            Self::NoShow => "no_show",
        }
    }

    /// Returns true if this status is terminal.
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Canceled | Self::NoShow)
    }

    /// Returns true if a reservation in this status holds its tables.
    #[must_use]
    pub const fn is_active(&self) -> bool {
        !self.is_terminal()
    }

    /// Returns true if only staff (admin or supervisor) may move a
    /// reservation into this status.
    #[must_use]
    pub const fn requires_staff(&self) -> bool {
        matches!(self, Self::Confirmed | Self::Seated)
    }

    /// The status tables take while held by a reservation in this status.
    ///
    /// Returns `None` for terminal statuses, whose tables are released.
    #[must_use]
    pub const fn table_hold(&self) -> Option<TableStatus> {
        match self {
            Self::Pending | Self::Confirmed => Some(TableStatus::Reserved),
            Self::Seated => Some(TableStatus::Occupied),
            Self::Completed | Self::Canceled | Self::NoShow => None,
        }
    }

    /// Checks if a transition from this status to `target` is valid.
    ///
    /// Re-asserting the current status is accepted as a no-op.
    #[must_use]
    pub const fn can_transition_to(&self, target: Self) -> bool {
        if *self as u8 == target as u8 {
            return true;
        }
        matches!(
            (self, target),
            (Self::Pending, Self::Confirmed | Self::Canceled)
                | (Self::Confirmed, Self::Seated | Self::Canceled | Self::NoShow)
                | (Self::Seated, Self::Completed | Self::NoShow)
        )
    }

    /// Validates a transition from this status to `target`.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidStatusTransition` if the transition is
    /// not permitted.
    pub const fn validate_transition(&self, target: Self) -> Result<(), DomainError> {
        if self.can_transition_to(target) {
            Ok(())
        } else {
            Err(DomainError::InvalidStatusTransition {
                from: *self,
                to: target,
            })
        }
    }
}

impl FromStr for ReservationStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "confirmed" => Ok(Self::Confirmed),
            "seated" => Ok(Self::Seated),
            "completed" | "closed" => Ok(Self::Completed),
            "canceled" | "cancelled" => Ok(Self::Canceled),
            "no_show" => Ok(Self::NoShow),
            _ => Err(DomainError::InvalidReservationStatus(s.to_string())),
        }
    }
}

impl std::fmt::Display for ReservationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
