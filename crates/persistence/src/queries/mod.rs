// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Read-only queries.
//!
//! - `users`: accounts and sessions
//! - `restaurants`: the restaurant catalog
//! - `venue`: zones, tables, and table holds
//! - `reservations`: reservations with their table sets
//!
//! Every function exists as a `_sqlite` and a `_mysql` variant generated
//! by `backend_fn!`; `Persistence` picks one per call.

pub mod reservations;
pub mod restaurants;
pub mod users;
pub mod venue;

pub use reservations::{
    get_reservation_mysql, get_reservation_sqlite, list_reservations_for_restaurant_mysql,
    list_reservations_for_restaurant_sqlite, list_reservations_mysql, list_reservations_sqlite,
};
pub use restaurants::{
    get_restaurant_mysql, get_restaurant_sqlite, list_restaurants_mysql, list_restaurants_sqlite,
};
pub use users::{
    count_users_mysql, count_users_sqlite, get_session_by_token_mysql,
    get_session_by_token_sqlite, get_user_by_email_mysql, get_user_by_email_sqlite,
    get_user_mysql, get_user_sqlite, list_users_mysql, list_users_sqlite,
};
pub use venue::{
    find_active_hold_mysql, find_active_hold_sqlite, get_table_mysql, get_table_sqlite,
    get_zone_mysql, get_zone_sqlite, list_tables_for_restaurant_mysql,
    list_tables_for_restaurant_sqlite, list_tables_for_zone_mysql, list_tables_for_zone_sqlite,
    list_tables_mysql, list_tables_sqlite, list_zones_for_restaurant_mysql,
    list_zones_for_restaurant_sqlite, list_zones_mysql, list_zones_sqlite,
};
