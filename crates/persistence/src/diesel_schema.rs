// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

diesel::table! {
    reservation_tables (reservation_id, table_id) {
        reservation_id -> BigInt,
        table_id -> BigInt,
    }
}

diesel::table! {
    reservations (reservation_id) {
        reservation_id -> BigInt,
        user_id -> BigInt,
        restaurant_id -> BigInt,
        reservation_at -> Text,
        party_size -> Nullable<Integer>,
        comment -> Nullable<Text>,
        status -> Text,
        created_at -> Text,
        updated_at -> Text,
    }
}

diesel::table! {
    restaurants (restaurant_id) {
        restaurant_id -> BigInt,
        name -> Text,
        business_name -> Nullable<Text>,
        business_email -> Nullable<Text>,
        food_type -> Nullable<Text>,
        phone -> Nullable<Text>,
        description -> Nullable<Text>,
        capacity -> Integer,
        supervisor_id -> BigInt,
        opening_time -> Nullable<Text>,
        closing_time -> Nullable<Text>,
        status -> Text,
        created_at -> Text,
        updated_at -> Text,
    }
}

diesel::table! {
    sessions (session_id) {
        session_id -> BigInt,
        session_token -> Text,
        user_id -> BigInt,
        created_at -> Text,
        last_activity_at -> Text,
        expires_at -> Text,
    }
}

diesel::table! {
    tables (table_id) {
        table_id -> BigInt,
        restaurant_id -> BigInt,
        zone_id -> Nullable<BigInt>,
        name -> Text,
        capacity -> Integer,
        status -> Text,
    }
}

diesel::table! {
    users (user_id) {
        user_id -> BigInt,
        name -> Text,
        email -> Text,
        password_hash -> Text,
        role -> Text,
        created_by -> Nullable<BigInt>,
        phone -> Nullable<Text>,
        status -> Text,
        last_login_at -> Nullable<Text>,
        created_at -> Text,
        updated_at -> Text,
    }
}

diesel::table! {
    zones (zone_id) {
        zone_id -> BigInt,
        restaurant_id -> BigInt,
        name -> Text,
    }
}

diesel::joinable!(reservation_tables -> reservations (reservation_id));
diesel::joinable!(reservation_tables -> tables (table_id));
diesel::joinable!(reservations -> restaurants (restaurant_id));
diesel::joinable!(reservations -> users (user_id));
diesel::joinable!(restaurants -> users (supervisor_id));
diesel::joinable!(sessions -> users (user_id));
diesel::joinable!(tables -> restaurants (restaurant_id));
diesel::joinable!(tables -> zones (zone_id));
diesel::joinable!(zones -> restaurants (restaurant_id));

diesel::allow_tables_to_appear_in_same_query!(
    reservation_tables,
    reservations,
    restaurants,
    sessions,
    tables,
    users,
    zones,
);
