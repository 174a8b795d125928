//! Diesel table definitions matching `backend/migrations`.
//!
//! Keep in sync with the SQL migrations. `users` is owned by the
//! authentication service and only ever read here.

diesel::table! {
    users (id) {
        id -> Uuid,
        display_name -> Text,
        email -> Nullable<Text>,
        avatar_ref -> Nullable<Text>,
        is_admin -> Bool,
        is_verified_owner -> Bool,
    }
}

diesel::table! {
    rooms (id) {
        id -> Uuid,
        name -> Text,
        created_by -> Uuid,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    room_members (room_id, user_id) {
        room_id -> Uuid,
        user_id -> Uuid,
        role -> Text,
        is_muted -> Bool,
        joined_at -> Timestamptz,
    }
}

diesel::table! {
    messages (id) {
        id -> Uuid,
        seq -> Int8,
        room_id -> Nullable<Uuid>,
        sender_id -> Uuid,
        content -> Text,
        created_at -> Timestamptz,
    }
}

diesel::joinable!(rooms -> users (created_by));
diesel::joinable!(room_members -> rooms (room_id));
diesel::joinable!(room_members -> users (user_id));
diesel::joinable!(messages -> rooms (room_id));
diesel::joinable!(messages -> users (sender_id));

diesel::allow_tables_to_appear_in_same_query!(users, rooms, room_members, messages);
