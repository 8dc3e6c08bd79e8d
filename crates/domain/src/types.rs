// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::error::DomainError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::str::FromStr;

/// The closed set of roles an account can hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Full access to every resource.
    Admin,
    /// Manages the restaurants assigned to them and the customers they created.
    Supervisor,
    /// Manages their own profile and reservations.
    #[default]
    Customer,
}

impl Role {
    /// Returns the persisted string representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::Supervisor => "supervisor",
            Self::Customer => "customer",
        }
    }

    /// Returns true for roles that act on behalf of a restaurant.
    #[must_use]
    pub const fn is_staff(&self) -> bool {
        matches!(self, Self::Admin | Self::Supervisor)
    }
}

impl FromStr for Role {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "admin" => Ok(Self::Admin),
            "supervisor" => Ok(Self::Supervisor),
            "customer" => Ok(Self::Customer),
            _ => Err(DomainError::InvalidRole(s.to_string())),
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Whether an account may sign in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserStatus {
    /// May sign in.
    #[default]
    Active,
    /// Sign-in refused; existing sessions stop validating.
    Inactive,
}

impl UserStatus {
    /// Returns the persisted string representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Inactive => "inactive",
        }
    }
}

impl FromStr for UserStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "active" => Ok(Self::Active),
            "inactive" => Ok(Self::Inactive),
            _ => Err(DomainError::InvalidUserStatus(s.to_string())),
        }
    }
}

/// An email address, normalized to lowercase.
///
/// Equality is therefore case-insensitive with respect to the input.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Email(String);

impl Email {
    /// Parses and normalizes an email address.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidEmail` unless the address has exactly
    /// one `@`, a non-empty local part, and a dotted domain.
    pub fn parse(value: &str) -> Result<Self, DomainError> {
        let normalized: String = value.trim().to_lowercase();
        let Some((local, domain)) = normalized.split_once('@') else {
            return Err(DomainError::InvalidEmail(value.to_string()));
        };
        let domain_ok: bool = domain.contains('.')
            && !domain.starts_with('.')
            && !domain.ends_with('.')
            && !domain.contains('@');
        if local.is_empty() || !domain_ok || normalized.chars().any(char::is_whitespace) {
            return Err(DomainError::InvalidEmail(value.to_string()));
        }
        Ok(Self(normalized))
    }

    /// Returns the normalized address.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for Email {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<Email> for String {
    fn from(value: Email) -> Self {
        value.0
    }
}

impl std::fmt::Display for Email {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The ordered, de-duplicated, non-empty set of tables a reservation holds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<i64>", into = "Vec<i64>")]
pub struct TableSet(BTreeSet<i64>);

impl TableSet {
    /// Builds a table set from raw identifiers.
    ///
    /// Duplicates collapse; order is ascending by id.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::EmptyTableSet` when no identifiers are given.
    pub fn new<I>(ids: I) -> Result<Self, DomainError>
    where
        I: IntoIterator<Item = i64>,
    {
        let set: BTreeSet<i64> = ids.into_iter().collect();
        if set.is_empty() {
            return Err(DomainError::EmptyTableSet);
        }
        Ok(Self(set))
    }

    /// Number of distinct tables.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Never true for a constructed set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns true if the table is part of the set.
    #[must_use]
    pub fn contains(&self, table_id: i64) -> bool {
        self.0.contains(&table_id)
    }

    /// Iterates the identifiers in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = i64> + '_ {
        self.0.iter().copied()
    }

    /// Identifiers present in `self` but not in `other`.
    #[must_use]
    pub fn difference(&self, other: &Self) -> Vec<i64> {
        self.0.difference(&other.0).copied().collect()
    }

    /// Returns the identifiers as a vector.
    #[must_use]
    pub fn to_vec(&self) -> Vec<i64> {
        self.iter().collect()
    }
}

impl TryFrom<Vec<i64>> for TableSet {
    type Error = DomainError;

    fn try_from(value: Vec<i64>) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<TableSet> for Vec<i64> {
    fn from(value: TableSet) -> Self {
        value.to_vec()
    }
}
