// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Backend initialization tests.
//!
//! Migrations and foreign key enforcement are exercised by every other
//! test through `Persistence::new_in_memory()`. These cover the
//! constructors directly.

use tablebook_domain::Role;

use super::create_test_user;
use crate::Persistence;

#[test]
fn test_persistence_initialization() {
    let result: Result<Persistence, crate::PersistenceError> = Persistence::new_in_memory();
    assert!(result.is_ok());
}

#[test]
fn test_foreign_key_enforcement_is_verified() {
    let mut persistence: Persistence = Persistence::new_in_memory().unwrap();
    assert!(persistence.verify_foreign_key_enforcement().is_ok());
}

#[test]
fn test_multiple_in_memory_instances_are_isolated() {
    let mut db1: Persistence = Persistence::new_in_memory().unwrap();
    let mut db2: Persistence = Persistence::new_in_memory().unwrap();

    create_test_user(&mut db1, "one@example.com", Role::Customer);

    assert_eq!(db1.count_users().unwrap(), 1, "db1 should have 1 user");
    assert_eq!(db2.count_users().unwrap(), 0, "db2 should be isolated");
}

#[test]
fn test_file_database_persists_across_reopen() {
    let path: std::path::PathBuf = std::env::temp_dir().join(format!(
        "tablebook_init_test_{}.db",
        std::process::id()
    ));
    let _ = std::fs::remove_file(&path);

    {
        let mut persistence: Persistence = Persistence::new_with_file(&path).unwrap();
        create_test_user(&mut persistence, "kept@example.com", Role::Admin);
    }

    let mut reopened: Persistence = Persistence::new_with_file(&path).unwrap();
    assert_eq!(reopened.count_users().unwrap(), 1);

    drop(reopened);
    let _ = std::fs::remove_file(&path);
    let _ = std::fs::remove_file(path.with_extension("db-wal"));
    let _ = std::fs::remove_file(path.with_extension("db-shm"));
}
