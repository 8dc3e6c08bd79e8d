// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use diesel::result::DatabaseErrorKind;
use tablebook_domain::DomainError;

/// Errors that can occur during persistence operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PersistenceError {
    /// A database error occurred.
    DatabaseError(String),
    /// Database connection failed.
    DatabaseConnectionFailed(String),
    /// Database migration failed.
    MigrationFailed(String),
    /// Query execution failed.
    QueryFailed(String),
    /// Initialization error.
    InitializationError(String),
    /// Foreign key enforcement is not enabled.
    ForeignKeyEnforcementNotEnabled,
    /// The requested resource was not found.
    NotFound(String),
    /// A stored value could not be decoded into its domain type.
    CorruptRecord(String),
    /// Password hashing or verification failed.
    PasswordHash(String),
    /// A list query was asked for a scope that does not apply to it.
    UnsupportedScope {
        /// The collection being listed.
        collection: &'static str,
    },
    /// A user with the same email already exists.
    DuplicateEmail(String),
    /// A restaurant with the same business email already exists.
    DuplicateBusinessEmail(String),
    /// The restaurant already has a zone with this name.
    DuplicateZoneName { restaurant_id: i64, name: String },
    /// The restaurant already has a table with this name.
    DuplicateTableName { restaurant_id: i64, name: String },
    /// The designated supervisor does not hold the supervisor role.
    NotASupervisor(i64),
    /// The zone belongs to a different restaurant.
    ZoneNotInRestaurant { zone_id: i64, restaurant_id: i64 },
    /// A referenced table does not exist.
    TableNotFound(i64),
    /// A referenced table belongs to a different restaurant.
    TableNotInRestaurant { table_id: i64, restaurant_id: i64 },
    /// A referenced table is not available for booking.
    TableUnavailable { table_id: i64, table_name: String },
    /// The table is held by an active reservation.
    TableHeld { table_id: i64, reservation_id: i64 },
    /// The party does not fit at the reserved tables.
    PartySizeExceedsCapacity { party_size: u32, capacity: u32 },
    /// The restaurant still has active reservations.
    RestaurantHasActiveReservations { restaurant_id: i64, count: i64 },
    /// The user still supervises restaurants.
    UserSupervisesRestaurants { user_id: i64, count: i64 },
    /// A uniqueness or foreign key constraint rejected the write.
    ConstraintViolation(String),
    /// A general error occurred.
    Other(String),
}

impl std::fmt::Display for PersistenceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DatabaseError(msg) => write!(f, "Database error: {msg}"),
            Self::DatabaseConnectionFailed(msg) => {
                write!(f, "Database connection failed: {msg}")
            }
            Self::MigrationFailed(msg) => write!(f, "Migration failed: {msg}"),
            Self::QueryFailed(msg) => write!(f, "Query failed: {msg}"),
            Self::InitializationError(msg) => write!(f, "Initialization error: {msg}"),
            Self::ForeignKeyEnforcementNotEnabled => {
                write!(f, "Foreign key enforcement is not enabled")
            }
            Self::NotFound(msg) => write!(f, "Not found: {msg}"),
            Self::CorruptRecord(msg) => write!(f, "Corrupt record: {msg}"),
            Self::PasswordHash(msg) => write!(f, "Password hashing failed: {msg}"),
            Self::UnsupportedScope { collection } => {
                write!(f, "Unsupported scope for listing {collection}")
            }
            Self::DuplicateEmail(email) => {
                write!(f, "A user with email '{email}' already exists")
            }
            Self::DuplicateBusinessEmail(email) => {
                write!(f, "A restaurant with business email '{email}' already exists")
            }
            Self::DuplicateZoneName {
                restaurant_id,
                name,
            } => write!(
                f,
                "Restaurant {restaurant_id} already has a zone named '{name}'"
            ),
            Self::DuplicateTableName {
                restaurant_id,
                name,
            } => write!(
                f,
                "Restaurant {restaurant_id} already has a table named '{name}'"
            ),
            Self::NotASupervisor(user_id) => {
                write!(f, "User {user_id} is not a supervisor")
            }
            Self::ZoneNotInRestaurant {
                zone_id,
                restaurant_id,
            } => write!(
                f,
                "Zone {zone_id} does not belong to restaurant {restaurant_id}"
            ),
            Self::TableNotFound(table_id) => write!(f, "Table {table_id} does not exist"),
            Self::TableNotInRestaurant {
                table_id,
                restaurant_id,
            } => write!(
                f,
                "Table {table_id} does not belong to restaurant {restaurant_id}"
            ),
            Self::TableUnavailable {
                table_id,
                table_name,
            } => write!(f, "Table '{table_name}' ({table_id}) is not available"),
            Self::TableHeld {
                table_id,
                reservation_id,
            } => write!(
                f,
                "Table {table_id} is held by active reservation {reservation_id}"
            ),
            Self::PartySizeExceedsCapacity {
                party_size,
                capacity,
            } => write!(
                f,
                "Party of {party_size} exceeds the combined table capacity of {capacity}"
            ),
            Self::RestaurantHasActiveReservations {
                restaurant_id,
                count,
            } => write!(
                f,
                "Restaurant {restaurant_id} has {count} active reservation(s)"
            ),
            Self::UserSupervisesRestaurants { user_id, count } => write!(
                f,
                "User {user_id} still supervises {count} restaurant(s)"
            ),
            Self::ConstraintViolation(msg) => write!(f, "Constraint violation: {msg}"),
            Self::Other(msg) => write!(f, "{msg}"),
        }
    }
}

impl std::error::Error for PersistenceError {}

impl From<diesel::result::Error> for PersistenceError {
    fn from(err: diesel::result::Error) -> Self {
        match err {
            diesel::result::Error::NotFound => Self::NotFound("Record not found".to_string()),
            diesel::result::Error::DatabaseError(
                DatabaseErrorKind::UniqueViolation | DatabaseErrorKind::ForeignKeyViolation,
                info,
            ) => Self::ConstraintViolation(info.message().to_string()),
            _ => Self::DatabaseError(err.to_string()),
        }
    }
}

impl From<diesel::ConnectionError> for PersistenceError {
    fn from(err: diesel::ConnectionError) -> Self {
        Self::DatabaseConnectionFailed(err.to_string())
    }
}

impl From<DomainError> for PersistenceError {
    fn from(err: DomainError) -> Self {
        Self::CorruptRecord(err.to_string())
    }
}

impl From<bcrypt::BcryptError> for PersistenceError {
    fn from(err: bcrypt::BcryptError) -> Self {
        Self::PasswordHash(err.to_string())
    }
}
