// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use super::helpers::{
    CUSTOMER_ID, OTHER_CUSTOMER_ID, OTHER_SUPERVISOR_ID, SUPERVISOR_ID, create_test_admin,
    create_test_customer, create_test_reservation, create_test_supervisor, test_now,
};
use crate::{
    CoreError, CreatePlan, ReservationDraft, ReservationEdit, StatusChange, UpdatePlan,
    plan_create, plan_delete, plan_status_change, plan_update,
};
use tablebook_domain::{DomainError, ReservationStatus, TableStatus};
use time::Duration;

fn draft(requested_user_id: Option<i64>, supervisor_id: i64) -> ReservationDraft {
    ReservationDraft {
        requested_user_id,
        supervisor_id,
        reservation_at: test_now() + Duration::days(2),
        status: None,
    }
}

#[test]
fn test_customer_books_for_self_by_default() {
    let customer = create_test_customer(CUSTOMER_ID);
    let plan: CreatePlan = plan_create(&customer, &draft(None, SUPERVISOR_ID), test_now()).unwrap();
    assert_eq!(plan.owner_id, CUSTOMER_ID);
    assert_eq!(plan.status, ReservationStatus::Pending);
    assert_eq!(plan.table_hold, TableStatus::Reserved);
}

#[test]
fn test_customer_spoofing_user_id_is_forbidden() {
    let customer = create_test_customer(CUSTOMER_ID);
    let result = plan_create(
        &customer,
        &draft(Some(OTHER_CUSTOMER_ID), SUPERVISOR_ID),
        test_now(),
    );
    assert!(matches!(result, Err(CoreError::AccessDenied(_))));

    // Naming oneself explicitly is fine.
    assert!(plan_create(&customer, &draft(Some(CUSTOMER_ID), SUPERVISOR_ID), test_now()).is_ok());
}

#[test]
fn test_supervisor_books_only_own_restaurant() {
    let supervisor = create_test_supervisor(SUPERVISOR_ID);
    let plan: CreatePlan = plan_create(
        &supervisor,
        &draft(Some(CUSTOMER_ID), SUPERVISOR_ID),
        test_now(),
    )
    .unwrap();
    assert_eq!(plan.owner_id, CUSTOMER_ID);

    let result = plan_create(
        &supervisor,
        &draft(Some(CUSTOMER_ID), OTHER_SUPERVISOR_ID),
        test_now(),
    );
    assert!(matches!(result, Err(CoreError::AccessDenied(_))));
}

#[test]
fn test_create_requires_future_datetime() {
    let customer = create_test_customer(CUSTOMER_ID);
    let mut past: ReservationDraft = draft(None, SUPERVISOR_ID);
    past.reservation_at = test_now() - Duration::hours(1);
    let result = plan_create(&customer, &past, test_now());
    assert!(matches!(
        result,
        Err(CoreError::DomainViolation(
            DomainError::DateTimeNotInFuture { .. }
        ))
    ));
}

#[test]
fn test_initial_status_restrictions() {
    let customer = create_test_customer(CUSTOMER_ID);
    let mut confirmed: ReservationDraft = draft(None, SUPERVISOR_ID);
    confirmed.status = Some(ReservationStatus::Confirmed);
    assert!(matches!(
        plan_create(&customer, &confirmed, test_now()),
        Err(CoreError::AccessDenied(_))
    ));

    let admin = create_test_admin();
    let mut seated: ReservationDraft = draft(Some(CUSTOMER_ID), SUPERVISOR_ID);
    seated.status = Some(ReservationStatus::Seated);
    let plan: CreatePlan = plan_create(&admin, &seated, test_now()).unwrap();
    assert_eq!(plan.table_hold, TableStatus::Occupied);

    let mut canceled: ReservationDraft = draft(Some(CUSTOMER_ID), SUPERVISOR_ID);
    canceled.status = Some(ReservationStatus::Canceled);
    assert!(matches!(
        plan_create(&admin, &canceled, test_now()),
        Err(CoreError::DomainViolation(_))
    ));
}

#[test]
fn test_cancel_releases_tables() {
    let customer = create_test_customer(CUSTOMER_ID);
    let change: StatusChange = plan_status_change(
        &customer,
        &create_test_reservation(ReservationStatus::Pending),
        ReservationStatus::Canceled,
    )
    .unwrap();
    assert!(change.releases_tables());
    assert_eq!(change.table_hold, None);
}

#[test]
fn test_seating_occupies_tables() {
    let supervisor = create_test_supervisor(SUPERVISOR_ID);
    let change: StatusChange = plan_status_change(
        &supervisor,
        &create_test_reservation(ReservationStatus::Confirmed),
        ReservationStatus::Seated,
    )
    .unwrap();
    assert!(!change.releases_tables());
    assert_eq!(change.table_hold, Some(TableStatus::Occupied));
}

#[test]
fn test_customer_cannot_confirm_own_reservation() {
    let customer = create_test_customer(CUSTOMER_ID);
    let result = plan_status_change(
        &customer,
        &create_test_reservation(ReservationStatus::Pending),
        ReservationStatus::Confirmed,
    );
    assert!(matches!(result, Err(CoreError::AccessDenied(_))));
}

#[test]
fn test_invalid_transition_rejected() {
    let admin = create_test_admin();
    let result = plan_status_change(
        &admin,
        &create_test_reservation(ReservationStatus::Pending),
        ReservationStatus::Completed,
    );
    assert_eq!(
        result,
        Err(CoreError::DomainViolation(
            DomainError::InvalidStatusTransition {
                from: ReservationStatus::Pending,
                to: ReservationStatus::Completed,
            }
        ))
    );
}

#[test]
fn test_update_closed_reservation_rejected() {
    let admin = create_test_admin();
    let edit: ReservationEdit = ReservationEdit {
        changes_tables: true,
        ..ReservationEdit::default()
    };
    let result = plan_update(
        &admin,
        &create_test_reservation(ReservationStatus::Canceled),
        &edit,
        test_now(),
    );
    assert!(matches!(
        result,
        Err(CoreError::DomainViolation(DomainError::ReservationClosed { .. }))
    ));
}

#[test]
fn test_update_rejects_new_tables_on_closing_reservation() {
    let admin = create_test_admin();
    let reservation = create_test_reservation(ReservationStatus::Confirmed);
    let closing: ReservationEdit = ReservationEdit {
        changes_tables: true,
        status: Some(ReservationStatus::Canceled),
        ..ReservationEdit::default()
    };

    let result = plan_update(&admin, &reservation, &closing, test_now());
    assert!(matches!(
        result,
        Err(CoreError::DomainViolation(DomainError::InvalidField { field: "tables", .. }))
    ));

    let seating: ReservationEdit = ReservationEdit {
        status: Some(ReservationStatus::Seated),
        ..closing
    };
    let plan: UpdatePlan = plan_update(&admin, &reservation, &seating, test_now()).unwrap();
    assert_eq!(
        plan.final_status(ReservationStatus::Confirmed),
        ReservationStatus::Seated
    );
}

#[test]
fn test_update_revalidates_datetime() {
    let customer = create_test_customer(CUSTOMER_ID);
    let edit: ReservationEdit = ReservationEdit {
        reservation_at: Some(test_now() - Duration::minutes(5)),
        ..ReservationEdit::default()
    };
    let result = plan_update(
        &customer,
        &create_test_reservation(ReservationStatus::Pending),
        &edit,
        test_now(),
    );
    assert!(matches!(result, Err(CoreError::DomainViolation(_))));
}

#[test]
fn test_update_owner_reassignment_is_staff_only() {
    let reservation = create_test_reservation(ReservationStatus::Pending);
    let edit: ReservationEdit = ReservationEdit {
        user_id: Some(OTHER_CUSTOMER_ID),
        ..ReservationEdit::default()
    };

    let customer = create_test_customer(CUSTOMER_ID);
    assert!(matches!(
        plan_update(&customer, &reservation, &edit, test_now()),
        Err(CoreError::AccessDenied(_))
    ));

    let supervisor = create_test_supervisor(SUPERVISOR_ID);
    let plan: UpdatePlan = plan_update(&supervisor, &reservation, &edit, test_now()).unwrap();
    assert_eq!(plan.owner_id, OTHER_CUSTOMER_ID);
    assert_eq!(
        plan.final_status(ReservationStatus::Pending),
        ReservationStatus::Pending
    );
}

#[test]
fn test_update_with_cancel_carries_release() {
    let customer = create_test_customer(CUSTOMER_ID);
    let edit: ReservationEdit = ReservationEdit {
        status: Some(ReservationStatus::Canceled),
        ..ReservationEdit::default()
    };
    let plan: UpdatePlan = plan_update(
        &customer,
        &create_test_reservation(ReservationStatus::Confirmed),
        &edit,
        test_now(),
    )
    .unwrap();
    let change: StatusChange = plan.status_change.unwrap();
    assert!(change.releases_tables());
}

#[test]
fn test_delete_authorization() {
    let reservation = create_test_reservation(ReservationStatus::Pending);
    assert!(plan_delete(&create_test_customer(CUSTOMER_ID), &reservation).is_ok());
    assert!(plan_delete(&create_test_customer(OTHER_CUSTOMER_ID), &reservation).is_err());
    assert!(plan_delete(&create_test_supervisor(OTHER_SUPERVISOR_ID), &reservation).is_err());
    assert!(plan_delete(&create_test_admin(), &reservation).is_ok());
}
