// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! HTTP routes.
//!
//! Handlers here only unpack the request, lock persistence, and call
//! into `tablebook_api`. Every rule lives below this layer.

use axum::{
    Json, Router,
    extract::{Path, State as AxumState},
    routing::{get, patch, post},
};
use tablebook_api::{
    CreateReservationRequest, CreateRestaurantRequest, CreateTableRequest, CreateZoneRequest,
    ListReservationsResponse, ListRestaurantsResponse, ListTablesResponse, ListUsersResponse,
    ListZonesResponse, LoginRequest, LoginResponse, ProfileResponse, RefreshResponse,
    RegisterRequest, ReservationInfo, RestaurantInfo, TableInfo, UpdateReservationRequest,
    UpdateReservationStatusRequest, UpdateRestaurantRequest, UpdateTableRequest,
    UpdateUserRequest, UpdateZoneRequest, UserInfo, ZoneInfo, create_reservation,
    create_restaurant, create_table, create_user, create_zone, delete_reservation,
    delete_restaurant, delete_table, delete_user, delete_zone, get_reservation, get_restaurant,
    get_table, get_user, get_zone, list_my_reservations, list_reservations,
    list_restaurant_reservations, list_restaurant_tables, list_restaurant_zones,
    list_restaurants, list_tables, list_users, list_zone_tables, list_zones, login, logout,
    profile, refresh_token, register, update_reservation, update_reservation_status,
    update_restaurant, update_table, update_user, update_zone,
};
use crate::AppState;
use crate::response::{ApiJson, ApiResponse, Created, Envelope, created, ok};
use crate::session::{BearerToken, MaybeSessionUser, SessionUser};

// ============================================================================
// Sessions
// ============================================================================

/// Handler for POST `/register`.
///
/// Open to anonymous callers; staff may send a token to create accounts
/// with other roles.
async fn handle_register(
    AxumState(app_state): AxumState<AppState>,
    MaybeSessionUser(actor): MaybeSessionUser,
    ApiJson(req): ApiJson<RegisterRequest>,
) -> Created<UserInfo> {
    let mut persistence = app_state.persistence.lock().await;
    created(register(&mut persistence, req, actor.as_ref())?)
}

/// Handler for POST `/login`.
async fn handle_login(
    AxumState(app_state): AxumState<AppState>,
    ApiJson(req): ApiJson<LoginRequest>,
) -> ApiResponse<LoginResponse> {
    let mut persistence = app_state.persistence.lock().await;
    ok(login(&mut persistence, &req, app_state.session_lifetime)?)
}

/// Handler for GET `/profile`.
async fn handle_profile(SessionUser(actor, user): SessionUser) -> ApiResponse<ProfileResponse> {
    ok(profile(&actor, &user))
}

/// Handler for POST `/logout`.
async fn handle_logout(
    AxumState(app_state): AxumState<AppState>,
    BearerToken(token): BearerToken,
) -> ApiResponse<()> {
    let mut persistence = app_state.persistence.lock().await;
    logout(&mut persistence, &token)?;
    Ok(Json(Envelope::done("Logged out")))
}

/// Handler for POST `/refresh-token`.
async fn handle_refresh_token(
    AxumState(app_state): AxumState<AppState>,
    BearerToken(token): BearerToken,
) -> ApiResponse<RefreshResponse> {
    let mut persistence = app_state.persistence.lock().await;
    ok(refresh_token(
        &mut persistence,
        &token,
        app_state.session_lifetime,
    )?)
}

// ============================================================================
// Users
// ============================================================================

async fn handle_list_users(
    AxumState(app_state): AxumState<AppState>,
    SessionUser(actor, _user): SessionUser,
) -> ApiResponse<ListUsersResponse> {
    let mut persistence = app_state.persistence.lock().await;
    ok(list_users(&mut persistence, &actor)?)
}

async fn handle_create_user(
    AxumState(app_state): AxumState<AppState>,
    SessionUser(actor, _user): SessionUser,
    ApiJson(req): ApiJson<RegisterRequest>,
) -> Created<UserInfo> {
    let mut persistence = app_state.persistence.lock().await;
    created(create_user(&mut persistence, req, &actor)?)
}

async fn handle_get_user(
    AxumState(app_state): AxumState<AppState>,
    SessionUser(actor, _user): SessionUser,
    Path(user_id): Path<i64>,
) -> ApiResponse<UserInfo> {
    let mut persistence = app_state.persistence.lock().await;
    ok(get_user(&mut persistence, user_id, &actor)?)
}

async fn handle_update_user(
    AxumState(app_state): AxumState<AppState>,
    SessionUser(actor, _user): SessionUser,
    Path(user_id): Path<i64>,
    ApiJson(req): ApiJson<UpdateUserRequest>,
) -> ApiResponse<UserInfo> {
    let mut persistence = app_state.persistence.lock().await;
    ok(update_user(&mut persistence, user_id, req, &actor)?)
}

async fn handle_delete_user(
    AxumState(app_state): AxumState<AppState>,
    SessionUser(actor, _user): SessionUser,
    Path(user_id): Path<i64>,
) -> ApiResponse<()> {
    let mut persistence = app_state.persistence.lock().await;
    delete_user(&mut persistence, user_id, &actor)?;
    Ok(Json(Envelope::done("User deleted")))
}

// ============================================================================
// Restaurants
// ============================================================================

async fn handle_list_restaurants(
    AxumState(app_state): AxumState<AppState>,
    SessionUser(actor, _user): SessionUser,
) -> ApiResponse<ListRestaurantsResponse> {
    let mut persistence = app_state.persistence.lock().await;
    ok(list_restaurants(&mut persistence, &actor)?)
}

async fn handle_create_restaurant(
    AxumState(app_state): AxumState<AppState>,
    SessionUser(actor, _user): SessionUser,
    ApiJson(req): ApiJson<CreateRestaurantRequest>,
) -> Created<RestaurantInfo> {
    let mut persistence = app_state.persistence.lock().await;
    created(create_restaurant(&mut persistence, req, &actor)?)
}

async fn handle_get_restaurant(
    AxumState(app_state): AxumState<AppState>,
    SessionUser(actor, _user): SessionUser,
    Path(restaurant_id): Path<i64>,
) -> ApiResponse<RestaurantInfo> {
    let mut persistence = app_state.persistence.lock().await;
    ok(get_restaurant(&mut persistence, restaurant_id, &actor)?)
}

async fn handle_update_restaurant(
    AxumState(app_state): AxumState<AppState>,
    SessionUser(actor, _user): SessionUser,
    Path(restaurant_id): Path<i64>,
    ApiJson(req): ApiJson<UpdateRestaurantRequest>,
) -> ApiResponse<RestaurantInfo> {
    let mut persistence = app_state.persistence.lock().await;
    ok(update_restaurant(
        &mut persistence,
        restaurant_id,
        req,
        &actor,
    )?)
}

async fn handle_delete_restaurant(
    AxumState(app_state): AxumState<AppState>,
    SessionUser(actor, _user): SessionUser,
    Path(restaurant_id): Path<i64>,
) -> ApiResponse<()> {
    let mut persistence = app_state.persistence.lock().await;
    delete_restaurant(&mut persistence, restaurant_id, &actor)?;
    Ok(Json(Envelope::done("Restaurant deleted")))
}

async fn handle_list_restaurant_zones(
    AxumState(app_state): AxumState<AppState>,
    SessionUser(actor, _user): SessionUser,
    Path(restaurant_id): Path<i64>,
) -> ApiResponse<ListZonesResponse> {
    let mut persistence = app_state.persistence.lock().await;
    ok(list_restaurant_zones(
        &mut persistence,
        restaurant_id,
        &actor,
    )?)
}

async fn handle_list_restaurant_tables(
    AxumState(app_state): AxumState<AppState>,
    SessionUser(actor, _user): SessionUser,
    Path(restaurant_id): Path<i64>,
) -> ApiResponse<ListTablesResponse> {
    let mut persistence = app_state.persistence.lock().await;
    ok(list_restaurant_tables(
        &mut persistence,
        restaurant_id,
        &actor,
    )?)
}

async fn handle_list_restaurant_reservations(
    AxumState(app_state): AxumState<AppState>,
    SessionUser(actor, _user): SessionUser,
    Path(restaurant_id): Path<i64>,
) -> ApiResponse<ListReservationsResponse> {
    let mut persistence = app_state.persistence.lock().await;
    ok(list_restaurant_reservations(
        &mut persistence,
        restaurant_id,
        &actor,
    )?)
}

// ============================================================================
// Zones
// ============================================================================

async fn handle_list_zones(
    AxumState(app_state): AxumState<AppState>,
    SessionUser(actor, _user): SessionUser,
) -> ApiResponse<ListZonesResponse> {
    let mut persistence = app_state.persistence.lock().await;
    ok(list_zones(&mut persistence, &actor)?)
}

async fn handle_create_zone(
    AxumState(app_state): AxumState<AppState>,
    SessionUser(actor, _user): SessionUser,
    ApiJson(req): ApiJson<CreateZoneRequest>,
) -> Created<ZoneInfo> {
    let mut persistence = app_state.persistence.lock().await;
    created(create_zone(&mut persistence, req, &actor)?)
}

async fn handle_get_zone(
    AxumState(app_state): AxumState<AppState>,
    SessionUser(actor, _user): SessionUser,
    Path(zone_id): Path<i64>,
) -> ApiResponse<ZoneInfo> {
    let mut persistence = app_state.persistence.lock().await;
    ok(get_zone(&mut persistence, zone_id, &actor)?)
}

async fn handle_update_zone(
    AxumState(app_state): AxumState<AppState>,
    SessionUser(actor, _user): SessionUser,
    Path(zone_id): Path<i64>,
    ApiJson(req): ApiJson<UpdateZoneRequest>,
) -> ApiResponse<ZoneInfo> {
    let mut persistence = app_state.persistence.lock().await;
    ok(update_zone(&mut persistence, zone_id, req, &actor)?)
}

async fn handle_delete_zone(
    AxumState(app_state): AxumState<AppState>,
    SessionUser(actor, _user): SessionUser,
    Path(zone_id): Path<i64>,
) -> ApiResponse<()> {
    let mut persistence = app_state.persistence.lock().await;
    delete_zone(&mut persistence, zone_id, &actor)?;
    Ok(Json(Envelope::done("Zone deleted")))
}

async fn handle_list_zone_tables(
    AxumState(app_state): AxumState<AppState>,
    SessionUser(actor, _user): SessionUser,
    Path(zone_id): Path<i64>,
) -> ApiResponse<ListTablesResponse> {
    let mut persistence = app_state.persistence.lock().await;
    ok(list_zone_tables(&mut persistence, zone_id, &actor)?)
}

// ============================================================================
// Tables
// ============================================================================

async fn handle_list_tables(
    AxumState(app_state): AxumState<AppState>,
    SessionUser(actor, _user): SessionUser,
) -> ApiResponse<ListTablesResponse> {
    let mut persistence = app_state.persistence.lock().await;
    ok(list_tables(&mut persistence, &actor)?)
}

async fn handle_create_table(
    AxumState(app_state): AxumState<AppState>,
    SessionUser(actor, _user): SessionUser,
    ApiJson(req): ApiJson<CreateTableRequest>,
) -> Created<TableInfo> {
    let mut persistence = app_state.persistence.lock().await;
    created(create_table(&mut persistence, req, &actor)?)
}

async fn handle_get_table(
    AxumState(app_state): AxumState<AppState>,
    SessionUser(actor, _user): SessionUser,
    Path(table_id): Path<i64>,
) -> ApiResponse<TableInfo> {
    let mut persistence = app_state.persistence.lock().await;
    ok(get_table(&mut persistence, table_id, &actor)?)
}

async fn handle_update_table(
    AxumState(app_state): AxumState<AppState>,
    SessionUser(actor, _user): SessionUser,
    Path(table_id): Path<i64>,
    ApiJson(req): ApiJson<UpdateTableRequest>,
) -> ApiResponse<TableInfo> {
    let mut persistence = app_state.persistence.lock().await;
    ok(update_table(&mut persistence, table_id, req, &actor)?)
}

async fn handle_delete_table(
    AxumState(app_state): AxumState<AppState>,
    SessionUser(actor, _user): SessionUser,
    Path(table_id): Path<i64>,
) -> ApiResponse<()> {
    let mut persistence = app_state.persistence.lock().await;
    delete_table(&mut persistence, table_id, &actor)?;
    Ok(Json(Envelope::done("Table deleted")))
}

// ============================================================================
// Reservations
// ============================================================================

async fn handle_list_reservations(
    AxumState(app_state): AxumState<AppState>,
    SessionUser(actor, _user): SessionUser,
) -> ApiResponse<ListReservationsResponse> {
    let mut persistence = app_state.persistence.lock().await;
    ok(list_reservations(&mut persistence, &actor)?)
}

async fn handle_list_my_reservations(
    AxumState(app_state): AxumState<AppState>,
    SessionUser(actor, _user): SessionUser,
) -> ApiResponse<ListReservationsResponse> {
    let mut persistence = app_state.persistence.lock().await;
    ok(list_my_reservations(&mut persistence, &actor)?)
}

async fn handle_create_reservation(
    AxumState(app_state): AxumState<AppState>,
    SessionUser(actor, _user): SessionUser,
    ApiJson(req): ApiJson<CreateReservationRequest>,
) -> Created<ReservationInfo> {
    let mut persistence = app_state.persistence.lock().await;
    created(create_reservation(&mut persistence, req, &actor)?)
}

async fn handle_get_reservation(
    AxumState(app_state): AxumState<AppState>,
    SessionUser(actor, _user): SessionUser,
    Path(reservation_id): Path<i64>,
) -> ApiResponse<ReservationInfo> {
    let mut persistence = app_state.persistence.lock().await;
    ok(get_reservation(&mut persistence, reservation_id, &actor)?)
}

async fn handle_update_reservation(
    AxumState(app_state): AxumState<AppState>,
    SessionUser(actor, _user): SessionUser,
    Path(reservation_id): Path<i64>,
    ApiJson(req): ApiJson<UpdateReservationRequest>,
) -> ApiResponse<ReservationInfo> {
    let mut persistence = app_state.persistence.lock().await;
    ok(update_reservation(
        &mut persistence,
        reservation_id,
        req,
        &actor,
    )?)
}

async fn handle_update_reservation_status(
    AxumState(app_state): AxumState<AppState>,
    SessionUser(actor, _user): SessionUser,
    Path(reservation_id): Path<i64>,
    ApiJson(req): ApiJson<UpdateReservationStatusRequest>,
) -> ApiResponse<ReservationInfo> {
    let mut persistence = app_state.persistence.lock().await;
    ok(update_reservation_status(
        &mut persistence,
        reservation_id,
        &req,
        &actor,
    )?)
}

async fn handle_delete_reservation(
    AxumState(app_state): AxumState<AppState>,
    SessionUser(actor, _user): SessionUser,
    Path(reservation_id): Path<i64>,
) -> ApiResponse<()> {
    let mut persistence = app_state.persistence.lock().await;
    delete_reservation(&mut persistence, reservation_id, &actor)?;
    Ok(Json(Envelope::done("Reservation deleted")))
}

/// Builds the application router.
pub fn build_router(app_state: AppState) -> Router {
    Router::new()
        .route("/register", post(handle_register))
        .route("/login", post(handle_login))
        .route("/profile", get(handle_profile))
        .route("/logout", post(handle_logout))
        .route("/refresh-token", post(handle_refresh_token))
        .route("/users", get(handle_list_users).post(handle_create_user))
        .route(
            "/users/{id}",
            get(handle_get_user)
                .put(handle_update_user)
                .delete(handle_delete_user),
        )
        .route(
            "/restaurants",
            get(handle_list_restaurants).post(handle_create_restaurant),
        )
        .route(
            "/restaurants/{id}",
            get(handle_get_restaurant)
                .put(handle_update_restaurant)
                .delete(handle_delete_restaurant),
        )
        .route(
            "/restaurants/{id}/zones",
            get(handle_list_restaurant_zones),
        )
        .route(
            "/restaurants/{id}/tables",
            get(handle_list_restaurant_tables),
        )
        .route(
            "/restaurants/{id}/reservations",
            get(handle_list_restaurant_reservations),
        )
        .route("/zones", get(handle_list_zones).post(handle_create_zone))
        .route(
            "/zones/{id}",
            get(handle_get_zone)
                .put(handle_update_zone)
                .delete(handle_delete_zone),
        )
        .route("/zones/{id}/tables", get(handle_list_zone_tables))
        .route("/tables", get(handle_list_tables).post(handle_create_table))
        .route(
            "/tables/{id}",
            get(handle_get_table)
                .put(handle_update_table)
                .delete(handle_delete_table),
        )
        .route(
            "/reservations",
            get(handle_list_reservations).post(handle_create_reservation),
        )
        .route(
            "/reservations/{id}",
            get(handle_get_reservation)
                .put(handle_update_reservation)
                .delete(handle_delete_reservation),
        )
        .route(
            "/reservations/{id}/status",
            patch(handle_update_reservation_status),
        )
        .route("/my-reservations", get(handle_list_my_reservations))
        .with_state(app_state)
}
