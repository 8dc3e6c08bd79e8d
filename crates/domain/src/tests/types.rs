// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::{DomainError, Email, Role, TableSet, UserStatus};
use std::str::FromStr;

#[test]
fn test_role_round_trip() {
    for role in [Role::Admin, Role::Supervisor, Role::Customer] {
        assert_eq!(Role::from_str(role.as_str()).unwrap(), role);
    }
    assert_eq!(
        Role::from_str("Admin"),
        Err(DomainError::InvalidRole(String::from("Admin")))
    );
}

#[test]
fn test_role_staff_flag() {
    assert!(Role::Admin.is_staff());
    assert!(Role::Supervisor.is_staff());
    assert!(!Role::Customer.is_staff());
}

#[test]
fn test_user_status_parsing() {
    assert_eq!(UserStatus::from_str("inactive").unwrap(), UserStatus::Inactive);
    assert!(UserStatus::from_str("banned").is_err());
}

#[test]
fn test_email_normalized_to_lowercase() {
    let email: Email = Email::parse("  Chef@Example.COM ").unwrap();
    assert_eq!(email.as_str(), "chef@example.com");
    assert_eq!(email, Email::parse("chef@example.com").unwrap());
}

#[test]
fn test_email_rejects_malformed_addresses() {
    for bad in ["", "no-at-sign", "@example.com", "a@b", "a@.com", "a@b.", "a b@c.com", "a@b@c.com"] {
        assert!(Email::parse(bad).is_err(), "{bad:?} should be rejected");
    }
}

#[test]
fn test_email_deserializes_through_validation() {
    let email: Email = serde_json::from_str("\"Owner@Bistro.io\"").unwrap();
    assert_eq!(email.as_str(), "owner@bistro.io");
    assert!(serde_json::from_str::<Email>("\"nope\"").is_err());
}

#[test]
fn test_table_set_deduplicates_and_orders() {
    let set: TableSet = TableSet::new(vec![7, 3, 7, 1]).unwrap();
    assert_eq!(set.to_vec(), vec![1, 3, 7]);
    assert_eq!(set.len(), 3);
    assert!(set.contains(3));
    assert!(!set.contains(4));
}

#[test]
fn test_table_set_rejects_empty() {
    assert_eq!(TableSet::new(Vec::new()), Err(DomainError::EmptyTableSet));
    assert!(serde_json::from_str::<TableSet>("[]").is_err());
}

#[test]
fn test_table_set_difference() {
    let old: TableSet = TableSet::new(vec![1, 2, 3]).unwrap();
    let new: TableSet = TableSet::new(vec![2, 3, 4]).unwrap();
    assert_eq!(old.difference(&new), vec![1]);
    assert_eq!(new.difference(&old), vec![4]);
}
