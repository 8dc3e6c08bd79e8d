// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Self-registration and staff-created accounts.

use tablebook_persistence::Persistence;

use crate::{
    ApiError, AuthenticatedActor, RegisterRequest, UpdateUserRequest, UserInfo, create_user,
    register, update_user,
};

use super::helpers::{
    TEST_PASSWORD, create_test_admin, create_test_customer, create_test_supervisor,
    setup_test_persistence,
};

fn registration(email: &str, role: Option<&str>) -> RegisterRequest {
    RegisterRequest {
        name: String::from("Ada Guest"),
        email: email.to_string(),
        password: TEST_PASSWORD.to_string(),
        password_confirmation: TEST_PASSWORD.to_string(),
        role: role.map(str::to_string),
        phone: Some(String::from("+1 555 0100")),
    }
}

#[test]
fn test_anonymous_registration_creates_customer() {
    let mut persistence: Persistence = setup_test_persistence();

    let user: UserInfo =
        register(&mut persistence, registration("ada@tablebook.test", None), None).unwrap();

    assert_eq!(user.role, "customer");
    assert_eq!(user.status, "active");
    assert_eq!(user.created_by, None);
    assert_eq!(user.phone.as_deref(), Some("+1 555 0100"));
}

#[test]
fn test_anonymous_admin_registration_is_forbidden_and_stores_nothing() {
    let mut persistence: Persistence = setup_test_persistence();
    let admin: AuthenticatedActor = create_test_admin(&mut persistence);
    let before: i64 = persistence.count_users().unwrap();

    let anonymous = register(
        &mut persistence,
        registration("ada@tablebook.test", Some("admin")),
        None,
    );

    assert!(matches!(anonymous, Err(ApiError::Unauthorized { .. })));
    assert_eq!(persistence.count_users().unwrap(), before);

    let created: UserInfo = register(
        &mut persistence,
        registration("ada@tablebook.test", Some("admin")),
        Some(&admin),
    )
    .unwrap();

    assert_eq!(created.role, "admin");
    assert_eq!(created.created_by, Some(admin.user_id()));
    assert_eq!(persistence.count_users().unwrap(), before + 1);
}

#[test]
fn test_supervisor_creates_customers_only() {
    let mut persistence: Persistence = setup_test_persistence();
    let supervisor: AuthenticatedActor =
        create_test_supervisor(&mut persistence, "host@tablebook.test");

    let customer: UserInfo = create_user(
        &mut persistence,
        registration("walkin@tablebook.test", None),
        &supervisor,
    )
    .unwrap();
    assert_eq!(customer.created_by, Some(supervisor.user_id()));

    let staff = create_user(
        &mut persistence,
        registration("staff@tablebook.test", Some("supervisor")),
        &supervisor,
    );
    assert!(matches!(staff, Err(ApiError::Unauthorized { .. })));
}

#[test]
fn test_customer_cannot_create_accounts() {
    let mut persistence: Persistence = setup_test_persistence();
    let customer: AuthenticatedActor = create_test_customer(&mut persistence, "guest@tablebook.test");

    let result = create_user(
        &mut persistence,
        registration("friend@tablebook.test", None),
        &customer,
    );

    assert!(matches!(result, Err(ApiError::Unauthorized { .. })));
}

#[test]
fn test_registration_enforces_password_policy() {
    let mut persistence: Persistence = setup_test_persistence();

    let mut short: RegisterRequest = registration("ada@tablebook.test", None);
    short.password = String::from("ab1");
    short.password_confirmation = String::from("ab1");
    assert!(matches!(
        register(&mut persistence, short, None),
        Err(ApiError::PasswordPolicyViolation { .. })
    ));

    let mut mismatch: RegisterRequest = registration("ada@tablebook.test", None);
    mismatch.password_confirmation = String::from("Something-else-1");
    assert!(matches!(
        register(&mut persistence, mismatch, None),
        Err(ApiError::PasswordPolicyViolation { .. })
    ));

    let mut same_as_email: RegisterRequest = registration("ada@tablebook.test", None);
    same_as_email.password = String::from("ADA@tablebook.test");
    same_as_email.password_confirmation = String::from("ADA@tablebook.test");
    assert!(matches!(
        register(&mut persistence, same_as_email, None),
        Err(ApiError::PasswordPolicyViolation { .. })
    ));

    assert_eq!(persistence.count_users().unwrap(), 0);
}

#[test]
fn test_registration_rejects_invalid_fields() {
    let mut persistence: Persistence = setup_test_persistence();

    let bad_email = register(&mut persistence, registration("ada-at-example", None), None);
    assert!(matches!(
        bad_email,
        Err(ApiError::InvalidInput { field, .. }) if field == "email"
    ));

    let bad_role = register(
        &mut persistence,
        registration("ada@tablebook.test", Some("chef")),
        None,
    );
    assert!(matches!(
        bad_role,
        Err(ApiError::InvalidInput { field, .. }) if field == "role"
    ));

    let mut blank_name: RegisterRequest = registration("ada@tablebook.test", None);
    blank_name.name = String::from("   ");
    assert!(matches!(
        register(&mut persistence, blank_name, None),
        Err(ApiError::InvalidInput { field, .. }) if field == "name"
    ));
}

#[test]
fn test_duplicate_email_is_rule_violation() {
    let mut persistence: Persistence = setup_test_persistence();
    register(&mut persistence, registration("ada@tablebook.test", None), None).unwrap();

    let result = register(
        &mut persistence,
        registration("ADA@tablebook.test", None),
        None,
    );

    assert!(matches!(
        result,
        Err(ApiError::DomainRuleViolation { rule, .. }) if rule == "unique_email"
    ));
}

#[test]
fn test_only_admin_grants_staff_roles() {
    let mut persistence: Persistence = setup_test_persistence();
    let admin: AuthenticatedActor = create_test_admin(&mut persistence);
    let supervisor: AuthenticatedActor =
        create_test_supervisor(&mut persistence, "host@tablebook.test");
    let customer: UserInfo = create_user(
        &mut persistence,
        registration("walkin@tablebook.test", None),
        &supervisor,
    )
    .unwrap();

    let promote = UpdateUserRequest {
        role: Some(String::from("supervisor")),
        ..UpdateUserRequest::default()
    };

    let by_supervisor = update_user(
        &mut persistence,
        customer.user_id,
        promote.clone(),
        &supervisor,
    );
    assert!(matches!(by_supervisor, Err(ApiError::Unauthorized { .. })));

    let by_admin: UserInfo =
        update_user(&mut persistence, customer.user_id, promote, &admin).unwrap();
    assert_eq!(by_admin.role, "supervisor");
}
