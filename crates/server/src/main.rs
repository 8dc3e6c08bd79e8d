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
    clippy::all
)]
#![allow(clippy::multiple_crate_versions)]

mod response;
mod routes;
mod session;

#[cfg(test)]
mod tests;

use axum::Router;
use clap::Parser;
use std::sync::Arc;
use tablebook_api::PasswordPolicy;
use tablebook_domain::{Email, Role};
use tablebook_persistence::{NewUser, Persistence, UserData};
use tokio::sync::Mutex;
use tracing::{info, warn};

use crate::routes::build_router;

/// Tablebook Server - HTTP server for the Tablebook reservation service
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the `SQLite` database file. If not provided, uses in-memory database.
    #[arg(short, long, env = "TABLEBOOK_DATABASE")]
    database: Option<String>,

    /// `MySQL`/`MariaDB` connection URL. Takes precedence over `--database`.
    #[arg(long, env = "TABLEBOOK_MYSQL_URL")]
    mysql_url: Option<String>,

    /// Address to bind the server to
    #[arg(short, long, env = "TABLEBOOK_BIND", default_value = "127.0.0.1")]
    bind: String,

    /// Port to bind the server to
    #[arg(short, long, env = "TABLEBOOK_PORT", default_value_t = 3000)]
    port: u16,

    /// Session lifetime in days
    #[arg(long, env = "TABLEBOOK_SESSION_DAYS", default_value_t = 30)]
    session_days: i64,

    /// Email of the admin created when the database has no accounts
    #[arg(long, env = "TABLEBOOK_ADMIN_EMAIL")]
    bootstrap_admin_email: Option<String>,

    /// Password of the bootstrap admin
    #[arg(long, env = "TABLEBOOK_ADMIN_PASSWORD", hide_env_values = true)]
    bootstrap_admin_password: Option<String>,

    /// Display name of the bootstrap admin
    #[arg(long, env = "TABLEBOOK_ADMIN_NAME", default_value = "Administrator")]
    bootstrap_admin_name: String,
}

/// Application state shared across handlers.
///
/// Persistence sits behind one async mutex, so every handler's
/// check-then-write runs without interleaving.
#[derive(Clone)]
pub struct AppState {
    pub persistence: Arc<Mutex<Persistence>>,
    /// How long a new or refreshed session stays valid.
    pub session_lifetime: time::Duration,
}

impl AppState {
    /// Wraps a persistence layer for sharing across handlers.
    #[must_use]
    pub fn new(persistence: Persistence, session_lifetime: time::Duration) -> Self {
        Self {
            persistence: Arc::new(Mutex::new(persistence)),
            session_lifetime,
        }
    }
}

/// Creates the first admin when the database holds no accounts.
///
/// # Errors
///
/// Returns an error if the credentials fail validation or the insert fails.
fn bootstrap_admin(
    persistence: &mut Persistence,
    args: &Args,
) -> Result<(), Box<dyn std::error::Error>> {
    let (Some(raw_email), Some(password)) = (
        args.bootstrap_admin_email.as_deref(),
        args.bootstrap_admin_password.as_deref(),
    ) else {
        return Ok(());
    };

    if persistence.count_users()? > 0 {
        info!("Accounts exist, skipping admin bootstrap");
        return Ok(());
    }

    let email: Email = Email::parse(raw_email)?;
    PasswordPolicy::default().validate(
        password,
        password,
        email.as_str(),
        &args.bootstrap_admin_name,
    )?;

    let admin: UserData = persistence.create_user(&NewUser {
        name: args.bootstrap_admin_name.clone(),
        email,
        password: password.to_string(),
        role: Role::Admin,
        created_by: None,
        phone: None,
    })?;
    info!(user_id = admin.user_id, "Created bootstrap admin");
    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    info!("Initializing Tablebook Server");

    let mut persistence: Persistence = if let Some(url) = &args.mysql_url {
        info!("Using MySQL/MariaDB database");
        Persistence::new_with_mysql(url)?
    } else if let Some(db_path) = &args.database {
        info!("Using file-based database at: {}", db_path);
        Persistence::new_with_file(db_path)?
    } else {
        warn!("Using in-memory database; data is lost on shutdown");
        Persistence::new_in_memory()?
    };

    bootstrap_admin(&mut persistence, &args)?;

    let app_state: AppState =
        AppState::new(persistence, time::Duration::days(args.session_days));
    let app: Router = build_router(app_state);

    let addr: std::net::SocketAddr = format!("{}:{}", args.bind, args.port).parse()?;
    info!("Server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
