//! Diesel table definitions for the PostgreSQL schema.
//!
//! These definitions must match the migrations under `backend/migrations`
//! exactly. `diesel print-schema` regenerates them from a live database.

diesel::table! {
    /// Registered identities. `email` carries a unique index.
    users (id) {
        id -> Uuid,
        email -> Varchar,
        password_digest -> Text,
        role -> Varchar,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// Shipment orders. Addresses are flattened into prefixed columns.
    orders (id) {
        id -> Uuid,
        client_id -> Uuid,
        origin_latitude -> Float8,
        origin_longitude -> Float8,
        destination_latitude -> Float8,
        destination_longitude -> Float8,
        origin_street -> Varchar,
        origin_zip_code -> Varchar,
        origin_ext_num -> Varchar,
        origin_int_num -> Nullable<Varchar>,
        origin_city -> Varchar,
        origin_state -> Varchar,
        origin_country -> Varchar,
        destination_street -> Varchar,
        destination_zip_code -> Varchar,
        destination_ext_num -> Varchar,
        destination_int_num -> Nullable<Varchar>,
        destination_city -> Varchar,
        destination_state -> Varchar,
        destination_country -> Varchar,
        product_quantity -> Int4,
        total_weight -> Float8,
        package_size -> Varchar,
        status -> Varchar,
        /// Optimistic concurrency counter, bumped on every status change.
        revision -> Int4,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::joinable!(orders -> users (client_id));
diesel::allow_tables_to_appear_in_same_query!(orders, users);
