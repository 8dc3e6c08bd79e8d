// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Password policy validation.
//!
//! Applied whenever an account password is set: registration, user
//! creation, and password changes.

use thiserror::Error;

/// Password policy errors.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PasswordPolicyError {
    /// Password is too short.
    #[error("Password must be at least {min_length} characters long")]
    TooShort { min_length: usize },

    /// Password does not meet complexity requirements.
    #[error(
        "Password must contain at least {required} of the following: uppercase letter, lowercase letter, digit, symbol (found {found})"
    )]
    InsufficientComplexity { required: usize, found: usize },

    /// Password matches a forbidden value.
    #[error("Password must not match {field}")]
    MatchesForbiddenField { field: String },

    /// Password and confirmation do not match.
    #[error("Password and confirmation do not match")]
    ConfirmationMismatch,
}

/// Password policy configuration.
pub struct PasswordPolicy {
    /// Minimum password length, in characters.
    pub min_length: usize,
    /// Minimum number of character classes required (out of 4).
    pub min_complexity: usize,
}

impl Default for PasswordPolicy {
    fn default() -> Self {
        Self {
            min_length: 8,
            min_complexity: 2,
        }
    }
}

impl PasswordPolicy {
    /// Validates a password against the policy.
    ///
    /// # Arguments
    ///
    /// * `password` - The password to validate
    /// * `confirmation` - The password confirmation
    /// * `email` - The account email (password must not match)
    /// * `name` - The account display name (password must not match)
    ///
    /// # Errors
    ///
    /// Returns a `PasswordPolicyError` if the password does not meet policy requirements.
    pub fn validate(
        &self,
        password: &str,
        confirmation: &str,
        email: &str,
        name: &str,
    ) -> Result<(), PasswordPolicyError> {
        if password != confirmation {
            return Err(PasswordPolicyError::ConfirmationMismatch);
        }

        if password.chars().count() < self.min_length {
            return Err(PasswordPolicyError::TooShort {
                min_length: self.min_length,
            });
        }

        let complexity: usize = Self::calculate_complexity(password);
        if complexity < self.min_complexity {
            return Err(PasswordPolicyError::InsufficientComplexity {
                required: self.min_complexity,
                found: complexity,
            });
        }

        // Case-insensitive.
        let password_lower: String = password.to_lowercase();

        if password_lower == email.trim().to_lowercase() {
            return Err(PasswordPolicyError::MatchesForbiddenField {
                field: String::from("email"),
            });
        }

        if password_lower == name.trim().to_lowercase() {
            return Err(PasswordPolicyError::MatchesForbiddenField {
                field: String::from("name"),
            });
        }

        Ok(())
    }

    /// Counts the character classes present: uppercase, lowercase,
    /// digits, symbols.
    fn calculate_complexity(password: &str) -> usize {
        let has_uppercase: bool = password.chars().any(|c: char| c.is_uppercase());
        let has_lowercase: bool = password.chars().any(|c: char| c.is_lowercase());
        let has_digit: bool = password.chars().any(|c: char| c.is_ascii_digit());
        let has_symbol: bool = password
            .chars()
            .any(|c: char| !c.is_alphanumeric() && !c.is_whitespace());

        [has_uppercase, has_lowercase, has_digit, has_symbol]
            .into_iter()
            .filter(|present: &bool| *present)
            .count()
    }
}
