// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::error::DomainError;

/// Maximum length accepted for names and short text fields.
pub const MAX_NAME_LENGTH: usize = 255;

/// Maximum length accepted for free-form descriptions and comments.
pub const MAX_TEXT_LENGTH: usize = 2000;

/// Validates a required short text field and returns it trimmed.
///
/// # Arguments
///
/// * `field` - The field name used in the error
/// * `value` - The raw input
///
/// # Errors
///
/// Returns `DomainError::InvalidField` if the trimmed value is empty or
/// longer than [`MAX_NAME_LENGTH`].
pub fn validate_name(field: &'static str, value: &str) -> Result<String, DomainError> {
    let trimmed: &str = value.trim();
    if trimmed.is_empty() {
        return Err(DomainError::InvalidField {
            field,
            message: String::from("cannot be empty"),
        });
    }
    if trimmed.chars().count() > MAX_NAME_LENGTH {
        return Err(DomainError::InvalidField {
            field,
            message: format!("must be at most {MAX_NAME_LENGTH} characters"),
        });
    }
    Ok(trimmed.to_string())
}

/// Validates an optional text field.
///
/// Blank input is normalized to `None`.
///
/// # Errors
///
/// Returns `DomainError::InvalidField` if the value exceeds `max_len`.
pub fn validate_optional_text(
    field: &'static str,
    value: Option<&str>,
    max_len: usize,
) -> Result<Option<String>, DomainError> {
    let Some(raw) = value else {
        return Ok(None);
    };
    let trimmed: &str = raw.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    if trimmed.chars().count() > max_len {
        return Err(DomainError::InvalidField {
            field,
            message: format!("must be at most {max_len} characters"),
        });
    }
    Ok(Some(trimmed.to_string()))
}

/// Validates that a capacity-like quantity is strictly positive.
///
/// # Errors
///
/// Returns `DomainError::InvalidCapacity` for zero or negative values,
/// or values that do not fit in `u32`.
pub fn validate_capacity(field: &'static str, value: i64) -> Result<u32, DomainError> {
    if value <= 0 {
        return Err(DomainError::InvalidCapacity { field, value });
    }
    u32::try_from(value).map_err(|_| DomainError::InvalidCapacity { field, value })
}

/// Validates a party size against the combined capacity of its tables.
///
/// # Errors
///
/// Returns `DomainError::PartySizeExceedsCapacity` when the party does
/// not fit.
pub const fn validate_party_fits(party_size: u32, capacity: u32) -> Result<(), DomainError> {
    if party_size > capacity {
        return Err(DomainError::PartySizeExceedsCapacity {
            party_size,
            capacity,
        });
    }
    Ok(())
}
