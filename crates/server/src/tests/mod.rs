// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![allow(clippy::expect_used, clippy::unwrap_used)]

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode as HttpStatusCode, header::AUTHORIZATION},
};
use serde_json::{Value, json};
use tablebook_domain::{Email, Role};
use tablebook_persistence::{NewUser, Persistence};
use tower::ServiceExt;

use crate::AppState;
use crate::routes::build_router;

const PASSWORD: &str = "Tables4Two!";

/// Creates app state with an in-memory database holding one admin, one
/// supervisor, and one customer.
fn create_test_app_state() -> AppState {
    let mut persistence: Persistence =
        Persistence::new_in_memory().expect("Failed to create in-memory persistence");
    for (name, email, role) in [
        ("Admin", "admin@tablebook.test", Role::Admin),
        ("Host", "host@tablebook.test", Role::Supervisor),
        ("Guest", "guest@tablebook.test", Role::Customer),
    ] {
        persistence
            .create_user(&NewUser {
                name: name.to_string(),
                email: Email::parse(email).unwrap(),
                password: PASSWORD.to_string(),
                role,
                created_by: None,
                phone: None,
            })
            .expect("Failed to seed account");
    }
    AppState::new(persistence, time::Duration::days(1))
}

/// Sends one request and returns the status with the decoded envelope.
async fn send(
    app: &Router,
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: Option<&Value>,
) -> (HttpStatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(AUTHORIZATION, format!("Bearer {token}"));
    }
    let request: Request<Body> = match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(serde_json::to_string(body).unwrap()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status: HttpStatusCode = response.status();
    let body_bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let envelope: Value = serde_json::from_slice(&body_bytes).unwrap();
    (status, envelope)
}

async fn login_as(app: &Router, email: &str) -> String {
    let (status, envelope) = send(
        app,
        "POST",
        "/login",
        None,
        Some(&json!({ "email": email, "password": PASSWORD })),
    )
    .await;
    assert_eq!(status, HttpStatusCode::OK);
    envelope["data"]["token"].as_str().unwrap().to_string()
}

/// Creates a restaurant run by the seeded supervisor and returns its id.
async fn create_restaurant(app: &Router, admin_token: &str) -> i64 {
    let (status, envelope) = send(
        app,
        "POST",
        "/restaurants",
        Some(admin_token),
        Some(&json!({
            "name": "Chez Test",
            "capacity": 40,
            "supervisor_email": "host@tablebook.test",
        })),
    )
    .await;
    assert_eq!(status, HttpStatusCode::CREATED);
    envelope["data"]["restaurant_id"].as_i64().unwrap()
}

async fn create_table(app: &Router, token: &str, restaurant_id: i64, name: &str) -> i64 {
    let (status, envelope) = send(
        app,
        "POST",
        "/tables",
        Some(token),
        Some(&json!({ "restaurant_id": restaurant_id, "name": name, "capacity": 4 })),
    )
    .await;
    assert_eq!(status, HttpStatusCode::CREATED);
    envelope["data"]["table_id"].as_i64().unwrap()
}

fn booking(restaurant_id: i64, tables: &[i64]) -> Value {
    json!({
        "restaurant_id": restaurant_id,
        "reservation_at": "2099-06-01T19:30:00Z",
        "party_size": 2,
        "tables": tables,
    })
}

#[tokio::test]
async fn test_register_returns_created_envelope() {
    let app: Router = build_router(create_test_app_state());

    let (status, envelope) = send(
        &app,
        "POST",
        "/register",
        None,
        Some(&json!({
            "name": "New Guest",
            "email": "new@tablebook.test",
            "password": PASSWORD,
            "password_confirmation": PASSWORD,
        })),
    )
    .await;

    assert_eq!(status, HttpStatusCode::CREATED);
    assert_eq!(envelope["status"], json!(true));
    assert_eq!(envelope["data"]["role"], json!("customer"));
    assert!(envelope["data"].get("password").is_none());
}

#[tokio::test]
async fn test_anonymous_admin_registration_is_rejected() {
    let app_state: AppState = create_test_app_state();
    let app: Router = build_router(app_state.clone());

    let (status, envelope) = send(
        &app,
        "POST",
        "/register",
        None,
        Some(&json!({
            "name": "Sneaky",
            "email": "sneaky@tablebook.test",
            "password": PASSWORD,
            "password_confirmation": PASSWORD,
            "role": "admin",
        })),
    )
    .await;

    assert_eq!(status, HttpStatusCode::FORBIDDEN);
    assert_eq!(envelope["status"], json!(false));
    assert_eq!(envelope["message"], json!("Unauthorized access"));

    let mut persistence = app_state.persistence.lock().await;
    assert_eq!(persistence.count_users().unwrap(), 3);
}

#[tokio::test]
async fn test_admin_token_may_register_admin() {
    let app: Router = build_router(create_test_app_state());
    let admin_token: String = login_as(&app, "admin@tablebook.test").await;

    let (status, envelope) = send(
        &app,
        "POST",
        "/register",
        Some(&admin_token),
        Some(&json!({
            "name": "Second Admin",
            "email": "admin2@tablebook.test",
            "password": PASSWORD,
            "password_confirmation": PASSWORD,
            "role": "admin",
        })),
    )
    .await;

    assert_eq!(status, HttpStatusCode::CREATED);
    assert_eq!(envelope["data"]["role"], json!("admin"));
}

#[tokio::test]
async fn test_login_with_wrong_password_is_unauthorized() {
    let app: Router = build_router(create_test_app_state());

    let (status, envelope) = send(
        &app,
        "POST",
        "/login",
        None,
        Some(&json!({ "email": "guest@tablebook.test", "password": "nope" })),
    )
    .await;

    assert_eq!(status, HttpStatusCode::UNAUTHORIZED);
    assert_eq!(envelope["message"], json!("Invalid credentials"));
}

#[tokio::test]
async fn test_missing_token_is_unauthorized() {
    let app: Router = build_router(create_test_app_state());

    let (status, envelope) = send(&app, "GET", "/profile", None, None).await;

    assert_eq!(status, HttpStatusCode::UNAUTHORIZED);
    assert_eq!(envelope["message"], json!("Authentication required"));
}

#[tokio::test]
async fn test_logout_invalidates_token() {
    let app: Router = build_router(create_test_app_state());
    let token: String = login_as(&app, "guest@tablebook.test").await;

    let (status, envelope) = send(&app, "GET", "/profile", Some(&token), None).await;
    assert_eq!(status, HttpStatusCode::OK);
    assert_eq!(envelope["data"]["user"]["email"], json!("guest@tablebook.test"));

    let (status, _) = send(&app, "POST", "/logout", Some(&token), None).await;
    assert_eq!(status, HttpStatusCode::OK);

    let (status, envelope) = send(&app, "GET", "/profile", Some(&token), None).await;
    assert_eq!(status, HttpStatusCode::UNAUTHORIZED);
    assert_eq!(envelope["message"], json!("Invalid or expired session"));
}

#[tokio::test]
async fn test_customer_cannot_list_tables() {
    let app: Router = build_router(create_test_app_state());
    let token: String = login_as(&app, "guest@tablebook.test").await;

    let (status, envelope) = send(&app, "GET", "/tables", Some(&token), None).await;

    assert_eq!(status, HttpStatusCode::FORBIDDEN);
    assert_eq!(envelope["message"], json!("Unauthorized access"));
}

#[tokio::test]
async fn test_unknown_reservation_is_not_found() {
    let app: Router = build_router(create_test_app_state());
    let token: String = login_as(&app, "admin@tablebook.test").await;

    let (status, envelope) = send(&app, "GET", "/reservations/999", Some(&token), None).await;

    assert_eq!(status, HttpStatusCode::NOT_FOUND);
    assert_eq!(envelope["status"], json!(false));
}

#[tokio::test]
async fn test_malformed_json_is_unprocessable() {
    let app: Router = build_router(create_test_app_state());

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/login")
                .header("content-type", "application/json")
                .body(Body::from("{\"email\": "))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), HttpStatusCode::UNPROCESSABLE_ENTITY);
    let body_bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let envelope: Value = serde_json::from_slice(&body_bytes).unwrap();
    assert_eq!(envelope["status"], json!(false));
}

#[tokio::test]
async fn test_duplicate_table_name_is_rejected() {
    let app: Router = build_router(create_test_app_state());
    let admin_token: String = login_as(&app, "admin@tablebook.test").await;
    let host_token: String = login_as(&app, "host@tablebook.test").await;
    let restaurant_id: i64 = create_restaurant(&app, &admin_token).await;
    create_table(&app, &host_token, restaurant_id, "T1").await;

    let (status, _) = send(
        &app,
        "POST",
        "/tables",
        Some(&host_token),
        Some(&json!({ "restaurant_id": restaurant_id, "name": "T1", "capacity": 2 })),
    )
    .await;
    assert_eq!(status, HttpStatusCode::UNPROCESSABLE_ENTITY);

    let uri: String = format!("/restaurants/{restaurant_id}/tables");
    let (status, envelope) = send(&app, "GET", &uri, Some(&host_token), None).await;
    assert_eq!(status, HttpStatusCode::OK);
    assert_eq!(envelope["data"]["tables"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_concurrent_bookings_of_one_table_admit_one() {
    let app: Router = build_router(create_test_app_state());
    let admin_token: String = login_as(&app, "admin@tablebook.test").await;
    let host_token: String = login_as(&app, "host@tablebook.test").await;
    let guest_token: String = login_as(&app, "guest@tablebook.test").await;
    let restaurant_id: i64 = create_restaurant(&app, &admin_token).await;
    let table_id: i64 = create_table(&app, &host_token, restaurant_id, "T1").await;

    let body: Value = booking(restaurant_id, &[table_id]);
    let (first, second) = tokio::join!(
        send(&app, "POST", "/reservations", Some(&guest_token), Some(&body)),
        send(&app, "POST", "/reservations", Some(&host_token), Some(&body)),
    );

    let mut statuses: Vec<HttpStatusCode> = vec![first.0, second.0];
    statuses.sort_by_key(HttpStatusCode::as_u16);
    assert_eq!(
        statuses,
        vec![HttpStatusCode::CREATED, HttpStatusCode::UNPROCESSABLE_ENTITY]
    );

    let uri: String = format!("/tables/{table_id}");
    let (_, envelope) = send(&app, "GET", &uri, Some(&host_token), None).await;
    assert_eq!(envelope["data"]["status"], json!("reserved"));
}

#[tokio::test]
async fn test_cancel_over_http_releases_tables() {
    let app: Router = build_router(create_test_app_state());
    let admin_token: String = login_as(&app, "admin@tablebook.test").await;
    let host_token: String = login_as(&app, "host@tablebook.test").await;
    let guest_token: String = login_as(&app, "guest@tablebook.test").await;
    let restaurant_id: i64 = create_restaurant(&app, &admin_token).await;
    let table_id: i64 = create_table(&app, &host_token, restaurant_id, "T1").await;

    let (status, envelope) = send(
        &app,
        "POST",
        "/reservations",
        Some(&guest_token),
        Some(&booking(restaurant_id, &[table_id])),
    )
    .await;
    assert_eq!(status, HttpStatusCode::CREATED);
    let reservation_id: i64 = envelope["data"]["reservation_id"].as_i64().unwrap();

    let uri: String = format!("/reservations/{reservation_id}/status");
    let (status, envelope) = send(
        &app,
        "PATCH",
        &uri,
        Some(&guest_token),
        Some(&json!({ "status": "canceled" })),
    )
    .await;
    assert_eq!(status, HttpStatusCode::OK);
    assert_eq!(envelope["data"]["status"], json!("canceled"));

    let uri: String = format!("/tables/{table_id}");
    let (_, envelope) = send(&app, "GET", &uri, Some(&host_token), None).await;
    assert_eq!(envelope["data"]["status"], json!("available"));

    let (status, envelope) = send(&app, "GET", "/my-reservations", Some(&guest_token), None).await;
    assert_eq!(status, HttpStatusCode::OK);
    assert_eq!(envelope["data"]["reservations"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_unreadable_session_answers_500_without_detail() {
    let app_state: AppState = create_test_app_state();
    {
        let mut persistence = app_state.persistence.lock().await;
        let guest = persistence
            .get_user_by_email(&Email::parse("guest@tablebook.test").unwrap())
            .unwrap()
            .unwrap();
        persistence
            .create_session("garbled-token", guest.user_id, "not a timestamp")
            .unwrap();
    }
    let app: Router = build_router(app_state);

    let (status, envelope) = send(&app, "GET", "/profile", Some("garbled-token"), None).await;
    assert_eq!(status, HttpStatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(envelope["status"], false);
    assert_eq!(envelope["message"], "Internal server error");

    let (status, envelope) = send(&app, "POST", "/refresh-token", Some("garbled-token"), None).await;
    assert_eq!(status, HttpStatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(envelope["message"], "Internal server error");
}
