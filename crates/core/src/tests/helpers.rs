// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::{Actor, ReservationContext};
use tablebook_domain::{Email, ReservationStatus, Role};
use time::OffsetDateTime;
use time::macros::datetime;

pub const ADMIN_ID: i64 = 1;
pub const SUPERVISOR_ID: i64 = 10;
pub const OTHER_SUPERVISOR_ID: i64 = 11;
pub const CUSTOMER_ID: i64 = 100;
pub const OTHER_CUSTOMER_ID: i64 = 101;

pub fn create_test_admin() -> Actor {
    Actor::new(
        ADMIN_ID,
        Role::Admin,
        Email::parse("admin@tablebook.test").unwrap(),
        None,
    )
}

pub fn create_test_supervisor(user_id: i64) -> Actor {
    Actor::new(
        user_id,
        Role::Supervisor,
        Email::parse(&format!("supervisor{user_id}@tablebook.test")).unwrap(),
        Some(ADMIN_ID),
    )
}

pub fn create_test_customer(user_id: i64) -> Actor {
    Actor::new(
        user_id,
        Role::Customer,
        Email::parse(&format!("customer{user_id}@tablebook.test")).unwrap(),
        None,
    )
}

pub fn create_test_reservation(status: ReservationStatus) -> ReservationContext {
    ReservationContext {
        owner_id: CUSTOMER_ID,
        supervisor_id: SUPERVISOR_ID,
        status,
    }
}

pub fn test_now() -> OffsetDateTime {
    datetime!(2026-06-01 12:00:00 UTC)
}
