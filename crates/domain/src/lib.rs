// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all,
    clippy::suspicious,
    clippy::complexity,
    clippy::perf,
    clippy::unwrap_used,
    clippy::expect_used
)]

mod error;
mod schedule;
mod status;
mod types;
mod validation;

#[cfg(test)]
mod tests;

pub use error::DomainError;
pub use schedule::{
    format_timestamp, parse_datetime, parse_time_of_day, validate_future, validate_opening_hours,
};
pub use status::{ReservationStatus, RestaurantStatus, TableStatus};
pub use types::{Email, Role, TableSet, UserStatus};
pub use validation::{
    MAX_NAME_LENGTH, MAX_TEXT_LENGTH, validate_capacity, validate_name, validate_optional_text,
    validate_party_fits,
};
