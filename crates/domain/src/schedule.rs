// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Date-time handling for reservations, sessions, and opening hours.
//!
//! All instants are stored as RFC 3339 strings in UTC at whole-second
//! precision, so that lexical order in the database matches
//! chronological order.

use crate::error::DomainError;
use time::format_description::well_known::Rfc3339;
use time::macros::format_description;
use time::{OffsetDateTime, PrimitiveDateTime, Time, UtcOffset};

/// Parses a reservation date-time.
///
/// Accepted forms:
/// - RFC 3339 with an offset (`2026-11-01T19:30:00+02:00`)
/// - `YYYY-MM-DD HH:MM:SS` or `YYYY-MM-DDTHH:MM:SS`, read as UTC
/// - `YYYY-MM-DD HH:MM`, read as UTC
///
/// The result is converted to UTC.
///
/// # Errors
///
/// Returns `DomainError::InvalidDateTime` if no accepted form matches.
pub fn parse_datetime(input: &str) -> Result<OffsetDateTime, DomainError> {
    let trimmed: &str = input.trim();

    if let Ok(parsed) = OffsetDateTime::parse(trimmed, &Rfc3339) {
        return Ok(parsed.to_offset(UtcOffset::UTC));
    }

    let layouts = [
        format_description!("[year]-[month]-[day] [hour]:[minute]:[second]"),
        format_description!("[year]-[month]-[day]T[hour]:[minute]:[second]"),
        format_description!("[year]-[month]-[day] [hour]:[minute]"),
    ];
    for layout in layouts {
        if let Ok(parsed) = PrimitiveDateTime::parse(trimmed, layout) {
            return Ok(parsed.assume_utc());
        }
    }

    Err(DomainError::InvalidDateTime {
        input: input.to_string(),
    })
}

/// Formats an instant as an RFC 3339 UTC string with whole seconds.
///
/// # Errors
///
/// Returns `DomainError::TimestampFormat` if the instant cannot be
/// represented.
pub fn format_timestamp(instant: OffsetDateTime) -> Result<String, DomainError> {
    let truncated: OffsetDateTime = instant
        .to_offset(UtcOffset::UTC)
        .replace_nanosecond(0)
        .map_err(|e| DomainError::TimestampFormat(e.to_string()))?;
    truncated
        .format(&Rfc3339)
        .map_err(|e| DomainError::TimestampFormat(e.to_string()))
}

/// Validates that `datetime` lies strictly after `now`.
///
/// # Errors
///
/// Returns `DomainError::DateTimeNotInFuture` otherwise.
pub fn validate_future(datetime: OffsetDateTime, now: OffsetDateTime) -> Result<(), DomainError> {
    if datetime > now {
        return Ok(());
    }
    Err(DomainError::DateTimeNotInFuture {
        datetime: format_timestamp(datetime).unwrap_or_else(|_| datetime.to_string()),
    })
}

/// Parses an `HH:MM` time of day.
///
/// # Errors
///
/// Returns `DomainError::InvalidTimeOfDay` for anything else.
pub fn parse_time_of_day(value: &str) -> Result<Time, DomainError> {
    Time::parse(
        value.trim(),
        format_description!("[hour repr:24]:[minute]"),
    )
    .map_err(|_| DomainError::InvalidTimeOfDay(value.to_string()))
}

/// Validates a pair of optional opening hours.
///
/// Either bound may be absent. When both are present the opening time
/// must be strictly earlier than the closing time.
///
/// # Errors
///
/// Returns an error if either value is malformed or the pair is inverted.
pub fn validate_opening_hours(
    opening: Option<&str>,
    closing: Option<&str>,
) -> Result<(), DomainError> {
    let open: Option<Time> = opening.map(parse_time_of_day).transpose()?;
    let close: Option<Time> = closing.map(parse_time_of_day).transpose()?;

    if let (Some(open), Some(close)) = (open, close)
        && open >= close
    {
        return Err(DomainError::InvalidOpeningHours {
            opening: opening.unwrap_or_default().to_string(),
            closing: closing.unwrap_or_default().to_string(),
        });
    }
    Ok(())
}
