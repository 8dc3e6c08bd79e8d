// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! # xtask - Tablebook project automation
//!
//! `cargo test` runs every test against in-memory `SQLite` and needs no
//! services. The `MariaDB` backend is validated on request only:
//!
//! - `cargo xtask test-mariadb` runs the ignored backend validation tests
//!   in `tablebook-persistence` against a throwaway `MariaDB` container
//! - `cargo xtask verify-migrations` applies `migrations/` to `SQLite` and
//!   `migrations_mysql/` to `MariaDB` and fails on any structural drift
//!
//! Containers are removed when the command finishes, pass or fail.

#![deny(
    clippy::pedantic,
    //clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all
)]

use std::collections::{BTreeMap, BTreeSet};
use std::fmt::Debug;
use std::io;
use std::process::Output;
use std::thread::sleep;
use std::time::Duration;

use cargo_metadata::MetadataCommand;
use clap::{Parser, Subcommand};
use clap_verbosity_flag::{InfoLevel, Verbosity};
use color_eyre::{eyre::Context, eyre::eyre, Result};
use diesel::sql_types::{Integer, Text};
use diesel::{Connection, MysqlConnection, QueryableByName, RunQueryDsl, SqliteConnection};
use diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness};
use duct::cmd;
use tracing::level_filters::LevelFilter;
use tracing_log::AsTrace;

const SQLITE_MIGRATIONS: EmbeddedMigrations = embed_migrations!("../crates/persistence/migrations");
const MYSQL_MIGRATIONS: EmbeddedMigrations =
    embed_migrations!("../crates/persistence/migrations_mysql");

/// Diesel's bookkeeping table, excluded from schema comparison.
const MIGRATIONS_TABLE: &str = "__diesel_schema_migrations";

fn main() -> Result<()> {
    color_eyre::install()?;
    let args = Args::parse();
    tracing_subscriber::fmt()
        .with_max_level(args.log_level())
        .without_time()
        .init();

    match args.run() {
        Ok(()) => (),
        Err(err) => {
            tracing::error!("{err}");
            std::process::exit(1);
        }
    }
    Ok(())
}

#[derive(Debug, Parser)]
#[command(bin_name = "cargo xtask", styles = clap_cargo::style::CLAP_STYLING)]
struct Args {
    #[command(subcommand)]
    command: Command,

    #[command(flatten)]
    verbosity: Verbosity<InfoLevel>,
}

impl Args {
    fn run(self) -> Result<()> {
        self.command.run()
    }

    fn log_level(&self) -> LevelFilter {
        self.verbosity.log_level_filter().as_trace()
    }
}

#[derive(Clone, Debug, Subcommand)]
enum Command {
    /// Run CI checks (lint, build, test)
    CI,

    /// Build the project
    #[command(visible_alias = "b")]
    Build,

    /// Run cargo check
    #[command(visible_alias = "c")]
    Check,

    /// Lint formatting, clippy, and docs
    #[command(visible_alias = "l")]
    Lint,

    /// Run clippy on the project
    #[command(visible_alias = "cl")]
    LintClippy,

    /// Check documentation for errors and warnings
    #[command(visible_alias = "d")]
    LintDocs,

    /// Check for formatting issues in the project
    #[command(visible_alias = "lf")]
    LintFormatting,

    /// Fix clippy warnings in the project
    #[command(visible_alias = "fc")]
    FixClippy,

    /// Fix formatting issues in the project
    #[command(visible_alias = "fmt")]
    FixFormatting,

    /// Run tests
    #[command(visible_alias = "t")]
    Test,

    /// Run `MariaDB` backend validation tests
    #[command(visible_alias = "tm")]
    TestMariadb,

    /// Verify schema parity between `SQLite` and `MySQL` migrations
    #[command(visible_alias = "vm")]
    VerifyMigrations,
}

impl Command {
    fn run(self) -> Result<()> {
        match self {
            Self::CI => ci(),
            Self::Build => run_cargo(vec!["build", "--all-targets", "--all-features"]),
            Self::Check => run_cargo(vec!["check", "--all-targets", "--all-features"]),
            Self::Lint => lint(),
            Self::LintClippy => lint_clippy(),
            Self::LintDocs => lint_docs(),
            Self::LintFormatting => run_cargo_nightly(vec!["fmt", "--all", "--check"]),
            Self::FixClippy => fix_clippy(),
            Self::FixFormatting => run_cargo_nightly(vec!["fmt", "--all"]),
            Self::Test => test(),
            Self::TestMariadb => test_mariadb(),
            Self::VerifyMigrations => verify_migrations(),
        }
    }
}

/// Run CI checks (lint, build, test)
fn ci() -> Result<()> {
    lint()?;
    run_cargo(vec!["build", "--all-targets", "--all-features"])?;
    test()
}

/// Lint clippy, docs, and formatting
fn lint() -> Result<()> {
    lint_clippy()?;
    lint_docs()?;
    run_cargo_nightly(vec!["fmt", "--all", "--check"])
}

fn lint_clippy() -> Result<()> {
    run_cargo(vec![
        "clippy",
        "--all-targets",
        "--all-features",
        "--",
        "-D",
        "warnings",
    ])
}

fn fix_clippy() -> Result<()> {
    run_cargo(vec![
        "clippy",
        "--all-targets",
        "--all-features",
        "--fix",
        "--allow-dirty",
        "--allow-staged",
        "--",
        "-D",
        "warnings",
    ])
}

/// Check that docs build without warnings for every default member
fn lint_docs() -> Result<()> {
    let meta = MetadataCommand::new()
        .exec()
        .wrap_err("failed to get cargo metadata")?;

    for package in meta.workspace_default_packages() {
        cmd(
            "cargo",
            [
                "doc",
                "--no-deps",
                "--all-features",
                "--package",
                &package.name,
            ],
        )
        .env("RUSTDOCFLAGS", "-D warnings")
        .run_with_trace()?;
    }

    Ok(())
}

/// Run unit, integration, and doc tests
fn test() -> Result<()> {
    run_cargo(vec!["test", "--all-targets", "--all-features"])?;
    run_cargo(vec!["test", "--doc", "--all-features"])
}

fn run_cargo(args: Vec<&str>) -> Result<()> {
    cmd("cargo", args).run_with_trace()?;
    Ok(())
}

fn run_cargo_nightly(args: Vec<&str>) -> Result<()> {
    cmd("cargo", args)
        // CARGO is set because we run inside a cargo subcommand
        .env_remove("CARGO")
        .env("RUSTUP_TOOLCHAIN", "nightly")
        .run_with_trace()?;
    Ok(())
}

// ============================================================================
// MariaDB containers
// ============================================================================

/// A disposable `MariaDB` 11 container.
///
/// The container is stopped and removed when this value is dropped.
struct MariaDb {
    container: &'static str,
    database: &'static str,
    port: u16,
}

impl MariaDb {
    const USER: &'static str = "tablebook";
    const PASSWORD: &'static str = "tablebook_password";
    const READY_ATTEMPTS: u32 = 30;

    /// Starts the container and waits until it accepts queries.
    fn start(container: &'static str, database: &'static str, port: u16) -> Result<Self> {
        cmd!("docker", "--version")
            .run_with_trace()
            .wrap_err("Docker is not available. Please install Docker.")?;

        // A container left behind by an aborted run holds the name.
        remove_container(container);

        tracing::info!("Starting MariaDB container: {container}");
        cmd!(
            "docker",
            "run",
            "--name",
            container,
            "-e",
            format!("MARIADB_DATABASE={database}"),
            "-e",
            format!("MARIADB_USER={}", Self::USER),
            "-e",
            format!("MARIADB_PASSWORD={}", Self::PASSWORD),
            "-e",
            "MARIADB_ROOT_PASSWORD=root_password",
            "-p",
            format!("{port}:3306"),
            "-d",
            "mariadb:11"
        )
        .run_with_trace()
        .wrap_err("Failed to start MariaDB container")?;

        let db = Self {
            container,
            database,
            port,
        };
        db.wait_ready()?;
        Ok(db)
    }

    fn wait_ready(&self) -> Result<()> {
        tracing::info!("Waiting for MariaDB to be ready...");
        for attempt in 1..=Self::READY_ATTEMPTS {
            sleep(Duration::from_secs(1));
            tracing::debug!("Connection attempt {attempt}/{}", Self::READY_ATTEMPTS);

            let probe = cmd!(
                "docker",
                "exec",
                self.container,
                "mariadb",
                "-u",
                Self::USER,
                format!("-p{}", Self::PASSWORD),
                "-e",
                "SELECT 1"
            )
            .stdout_null()
            .stderr_null()
            .run();

            if probe.is_ok() {
                tracing::info!("MariaDB is ready");
                return Ok(());
            }
        }
        Err(eyre!("MariaDB did not become ready within timeout"))
    }

    fn url(&self) -> String {
        format!(
            "mysql://{}:{}@127.0.0.1:{}/{}",
            Self::USER,
            Self::PASSWORD,
            self.port,
            self.database
        )
    }
}

impl Drop for MariaDb {
    fn drop(&mut self) {
        tracing::info!("Removing MariaDB container: {}", self.container);
        remove_container(self.container);
    }
}

fn remove_container(container: &str) {
    let _ = cmd!("docker", "stop", container)
        .stdout_null()
        .stderr_null()
        .run();
    let _ = cmd!("docker", "rm", container)
        .stdout_null()
        .stderr_null()
        .run();
}

/// Run `MariaDB` backend validation tests
///
/// Starts a `MariaDB` container on port 3307 and runs the ignored
/// `backend_validation_tests` of `tablebook-persistence` against it with
/// `DATABASE_URL` and `TABLEBOOK_TEST_BACKEND=mariadb` set. The tests
/// cover migrations, foreign key cascades, unique constraints, and the
/// conditional table holds under `MySQL` semantics.
///
/// ## Requirements
///
/// - Docker must be installed and running
/// - Port 3307 must be free
/// - `MySQL` client libraries must be available for compilation
fn test_mariadb() -> Result<()> {
    tracing::info!("Starting MariaDB backend validation");
    let db = MariaDb::start("tablebook-test-mariadb", "tablebook_test", 3307)?;

    cmd!(
        "cargo",
        "test",
        "--package",
        "tablebook-persistence",
        "backend_validation_tests",
        "--",
        "--ignored",
        "--test-threads=1"
    )
    .env("DATABASE_URL", db.url())
    .env("TABLEBOOK_TEST_BACKEND", "mariadb")
    .run_with_trace()
    .wrap_err("MariaDB backend validation tests failed")?;

    tracing::info!("MariaDB backend validation completed successfully");
    Ok(())
}

/// Verify schema parity between `SQLite` and `MySQL` migrations
///
/// Applies `migrations/` to an in-memory `SQLite` database and
/// `migrations_mysql/` to a `MariaDB` container on port 3308, reads both
/// schemas back, and reports every difference in tables, columns, column
/// types, nullability, primary keys, foreign keys, unique constraints,
/// and indexes.
///
/// `InnoDB` adds a single-column index for each foreign key; those are
/// accepted as `MySQL`-only.
fn verify_migrations() -> Result<()> {
    tracing::info!("Starting schema parity verification");
    let db = MariaDb::start("tablebook-verify-migrations", "tablebook_verify", 3308)?;

    tracing::info!("Applying SQLite migrations");
    let mut sqlite_conn = SqliteConnection::establish(":memory:")
        .wrap_err("Failed to create SQLite in-memory database")?;
    diesel::sql_query("PRAGMA foreign_keys = ON")
        .execute(&mut sqlite_conn)
        .wrap_err("Failed to enable foreign keys on SQLite")?;
    sqlite_conn
        .run_pending_migrations(SQLITE_MIGRATIONS)
        .map_err(|e| eyre!("Failed to apply SQLite migrations: {e}"))?;

    tracing::info!("Applying MySQL migrations");
    let mut mysql_conn =
        MysqlConnection::establish(&db.url()).wrap_err("Failed to connect to MariaDB")?;
    mysql_conn
        .run_pending_migrations(MYSQL_MIGRATIONS)
        .map_err(|e| eyre!("Failed to apply MySQL migrations: {e}"))?;

    let sqlite_schema = introspect_sqlite_schema(&mut sqlite_conn)?;
    let mysql_schema = introspect_mysql_schema(&mut mysql_conn, db.database)?;

    let mismatches: Vec<String> = compare_schemas(&sqlite_schema, &mysql_schema);
    if !mismatches.is_empty() {
        return Err(eyre!(
            "Schema parity check FAILED:\n{}",
            mismatches.join("\n")
        ));
    }

    tracing::info!(
        "Schema parity verified for {} tables",
        sqlite_schema.tables.len()
    );
    Ok(())
}

// ============================================================================
// Schema introspection
// ============================================================================

/// Backend-neutral view of a schema.
#[derive(Debug, Default)]
struct Schema {
    tables: BTreeMap<String, Table>,
}

#[derive(Debug, Default)]
struct Table {
    /// Column name to (normalized type, nullable).
    columns: BTreeMap<String, (String, bool)>,
    primary_key: BTreeSet<String>,
    /// (column, referenced table, referenced column).
    foreign_keys: BTreeSet<(String, String, String)>,
    unique: BTreeSet<Vec<String>>,
    indexes: BTreeSet<Vec<String>>,
}

#[derive(QueryableByName)]
struct NameRow {
    #[diesel(sql_type = Text)]
    name: String,
}

fn introspect_sqlite_schema(conn: &mut SqliteConnection) -> Result<Schema> {
    #[derive(QueryableByName)]
    struct ColumnRow {
        #[diesel(sql_type = Text)]
        name: String,
        #[diesel(sql_type = Text)]
        r#type: String,
        #[diesel(sql_type = Integer)]
        notnull: i32,
        #[diesel(sql_type = Integer)]
        pk: i32,
    }

    #[derive(QueryableByName)]
    struct ForeignKeyRow {
        #[diesel(sql_type = Text)]
        table: String,
        #[diesel(sql_type = Text)]
        from: String,
        #[diesel(sql_type = Text)]
        to: String,
    }

    #[derive(QueryableByName)]
    struct IndexRow {
        #[diesel(sql_type = Text)]
        name: String,
        #[diesel(sql_type = Integer)]
        unique: i32,
        #[diesel(sql_type = Text)]
        origin: String,
    }

    let table_names: Vec<NameRow> = diesel::sql_query(format!(
        "SELECT name FROM sqlite_master WHERE type = 'table' \
         AND name NOT LIKE 'sqlite_%' AND name != '{MIGRATIONS_TABLE}' ORDER BY name"
    ))
    .load(conn)
    .wrap_err("Failed to query SQLite tables")?;

    let mut schema = Schema::default();
    for NameRow { name: table_name } in table_names {
        let mut table = Table::default();

        let columns: Vec<ColumnRow> =
            diesel::sql_query(format!("PRAGMA table_info({table_name})"))
                .load(conn)
                .wrap_err_with(|| format!("Failed to read columns of {table_name}"))?;
        for column in columns {
            if column.pk > 0 {
                table.primary_key.insert(column.name.clone());
            }
            table.columns.insert(
                column.name,
                (normalize_type(&column.r#type), column.notnull == 0),
            );
        }

        let foreign_keys: Vec<ForeignKeyRow> =
            diesel::sql_query(format!("PRAGMA foreign_key_list({table_name})"))
                .load(conn)
                .wrap_err_with(|| format!("Failed to read foreign keys of {table_name}"))?;
        table.foreign_keys = foreign_keys
            .into_iter()
            .map(|fk| (fk.from, fk.table, fk.to))
            .collect();

        let indexes: Vec<IndexRow> = diesel::sql_query(format!("PRAGMA index_list({table_name})"))
            .load(conn)
            .wrap_err_with(|| format!("Failed to read indexes of {table_name}"))?;
        for index in indexes {
            // Primary key indexes are covered by `primary_key`.
            if index.origin == "pk" {
                continue;
            }
            let columns: Vec<String> =
                diesel::sql_query(format!("SELECT name FROM pragma_index_info('{}')", index.name))
                    .load::<NameRow>(conn)
                    .wrap_err_with(|| format!("Failed to read columns of index {}", index.name))?
                    .into_iter()
                    .map(|row| row.name)
                    .collect();

            if index.unique == 1 {
                table.unique.insert(columns);
            } else {
                table.indexes.insert(columns);
            }
        }

        schema.tables.insert(table_name, table);
    }

    Ok(schema)
}

fn introspect_mysql_schema(conn: &mut MysqlConnection, database: &str) -> Result<Schema> {
    #[derive(QueryableByName)]
    struct ColumnRow {
        #[diesel(sql_type = Text)]
        name: String,
        #[diesel(sql_type = Text)]
        data_type: String,
        #[diesel(sql_type = Text)]
        is_nullable: String,
        #[diesel(sql_type = Text)]
        column_key: String,
    }

    #[derive(QueryableByName)]
    struct ForeignKeyRow {
        #[diesel(sql_type = Text)]
        name: String,
        #[diesel(sql_type = Text)]
        ref_table: String,
        #[diesel(sql_type = Text)]
        ref_column: String,
    }

    #[derive(QueryableByName)]
    struct IndexRow {
        #[diesel(sql_type = Text)]
        index_name: String,
        #[diesel(sql_type = Text)]
        name: String,
        #[diesel(sql_type = Integer)]
        non_unique: i32,
    }

    let table_names: Vec<NameRow> = diesel::sql_query(
        "SELECT table_name AS name FROM information_schema.tables \
         WHERE table_schema = ? AND table_name != ? ORDER BY table_name",
    )
    .bind::<Text, _>(database)
    .bind::<Text, _>(MIGRATIONS_TABLE)
    .load(conn)
    .wrap_err("Failed to query MySQL tables")?;

    let mut schema = Schema::default();
    for NameRow { name: table_name } in table_names {
        let mut table = Table::default();

        let columns: Vec<ColumnRow> = diesel::sql_query(
            "SELECT column_name AS name, data_type, is_nullable, column_key \
             FROM information_schema.columns \
             WHERE table_schema = ? AND table_name = ? ORDER BY ordinal_position",
        )
        .bind::<Text, _>(database)
        .bind::<Text, _>(&table_name)
        .load(conn)
        .wrap_err_with(|| format!("Failed to read columns of {table_name}"))?;
        for column in columns {
            if column.column_key == "PRI" {
                table.primary_key.insert(column.name.clone());
            }
            table.columns.insert(
                column.name,
                (
                    normalize_type(&column.data_type),
                    column.is_nullable == "YES",
                ),
            );
        }

        let foreign_keys: Vec<ForeignKeyRow> = diesel::sql_query(
            "SELECT column_name AS name, referenced_table_name AS ref_table, \
             referenced_column_name AS ref_column \
             FROM information_schema.key_column_usage \
             WHERE table_schema = ? AND table_name = ? AND referenced_table_name IS NOT NULL",
        )
        .bind::<Text, _>(database)
        .bind::<Text, _>(&table_name)
        .load(conn)
        .wrap_err_with(|| format!("Failed to read foreign keys of {table_name}"))?;
        table.foreign_keys = foreign_keys
            .into_iter()
            .map(|fk| (fk.name, fk.ref_table, fk.ref_column))
            .collect();

        let index_rows: Vec<IndexRow> = diesel::sql_query(
            "SELECT index_name, column_name AS name, non_unique \
             FROM information_schema.statistics \
             WHERE table_schema = ? AND table_name = ? AND index_name != 'PRIMARY' \
             ORDER BY index_name, seq_in_index",
        )
        .bind::<Text, _>(database)
        .bind::<Text, _>(&table_name)
        .load(conn)
        .wrap_err_with(|| format!("Failed to read indexes of {table_name}"))?;

        let mut indexes: BTreeMap<String, (bool, Vec<String>)> = BTreeMap::new();
        for row in index_rows {
            indexes
                .entry(row.index_name)
                .or_insert_with(|| (row.non_unique == 0, Vec::new()))
                .1
                .push(row.name);
        }
        for (unique, columns) in indexes.into_values() {
            if unique {
                table.unique.insert(columns);
            } else {
                table.indexes.insert(columns);
            }
        }

        schema.tables.insert(table_name, table);
    }

    Ok(schema)
}

/// Maps a backend column type onto `integer`, `real`, `blob`, or `text`.
fn normalize_type(raw: &str) -> String {
    let upper: String = raw.to_uppercase();
    let normalized: &str = if upper.contains("INT") {
        "integer"
    } else if ["REAL", "FLOA", "DOUB", "DEC", "NUMERIC"]
        .iter()
        .any(|t| upper.contains(t))
    {
        "real"
    } else if upper.contains("BLOB") || upper.contains("BINARY") {
        "blob"
    } else {
        "text"
    };
    normalized.to_string()
}

/// Lists every difference between the two schemas. Empty means parity.
fn compare_schemas(sqlite: &Schema, mysql: &Schema) -> Vec<String> {
    let mut mismatches: Vec<String> = Vec::new();

    for name in sqlite.tables.keys() {
        if !mysql.tables.contains_key(name) {
            mismatches.push(format!("  - table '{name}' exists only in SQLite"));
        }
    }
    for name in mysql.tables.keys() {
        if !sqlite.tables.contains_key(name) {
            mismatches.push(format!("  - table '{name}' exists only in MySQL"));
        }
    }

    for (name, lite) in &sqlite.tables {
        if let Some(my) = mysql.tables.get(name) {
            compare_tables(name, lite, my, &mut mismatches);
        }
    }

    mismatches
}

fn compare_tables(name: &str, sqlite: &Table, mysql: &Table, mismatches: &mut Vec<String>) {
    for (column, lite) in &sqlite.columns {
        match mysql.columns.get(column) {
            None => mismatches.push(format!("  - {name}.{column} exists only in SQLite")),
            Some(my) if my != lite => mismatches.push(format!(
                "  - {name}.{column}: SQLite {lite:?} vs MySQL {my:?} (type, nullable)"
            )),
            Some(_) => {}
        }
    }
    for column in mysql.columns.keys() {
        if !sqlite.columns.contains_key(column) {
            mismatches.push(format!("  - {name}.{column} exists only in MySQL"));
        }
    }

    report_difference(name, "primary key", &sqlite.primary_key, &mysql.primary_key, mismatches);
    report_difference(name, "foreign keys", &sqlite.foreign_keys, &mysql.foreign_keys, mismatches);
    report_difference(name, "unique constraints", &sqlite.unique, &mysql.unique, mismatches);

    let fk_columns: BTreeSet<&str> = mysql
        .foreign_keys
        .iter()
        .map(|fk| fk.0.as_str())
        .collect();
    let mysql_indexes: BTreeSet<Vec<String>> = mysql
        .indexes
        .iter()
        .filter(|columns| {
            sqlite.indexes.contains(*columns)
                || !(columns.len() == 1 && fk_columns.contains(columns[0].as_str()))
        })
        .cloned()
        .collect();
    report_difference(name, "indexes", &sqlite.indexes, &mysql_indexes, mismatches);
}

fn report_difference<T: Ord + Debug>(
    table: &str,
    what: &str,
    sqlite: &BTreeSet<T>,
    mysql: &BTreeSet<T>,
    mismatches: &mut Vec<String>,
) {
    if sqlite != mysql {
        mismatches.push(format!(
            "  - {table} {what}: SQLite {sqlite:?} vs MySQL {mysql:?}"
        ));
    }
}

/// An extension trait for `duct::Expression` that logs the command being run
/// before running it.
trait ExpressionExt {
    /// Run the command and log the command being run
    fn run_with_trace(&self) -> io::Result<Output>;
}

impl ExpressionExt for duct::Expression {
    fn run_with_trace(&self) -> io::Result<Output> {
        tracing::info!("running command: {:?}", self);
        self.run().inspect_err(|_| {
            // The command may have scrolled off the screen, so repeat it here
            tracing::error!("failed to run command: {:?}", self);
        })
    }
}
