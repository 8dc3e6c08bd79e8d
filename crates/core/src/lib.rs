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

mod access;
mod error;
mod lifecycle;

#[cfg(test)]
mod tests;

pub use access::{
    AccessDenied, Actor, Operation, Registration, Resource, Scope, authorize,
    authorize_registration, can_access, reservation_scope, user_scope, venue_scope,
};
pub use error::CoreError;
pub use lifecycle::{
    CreatePlan, ReservationContext, ReservationDraft, ReservationEdit, StatusChange, UpdatePlan,
    plan_create, plan_delete, plan_status_change, plan_update,
};
