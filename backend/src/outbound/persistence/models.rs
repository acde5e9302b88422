//! Internal Diesel row structs for database operations.
//!
//! These types are implementation details of the persistence layer and must
//! never be exposed to the domain. They exist solely to satisfy Diesel's
//! type requirements for queries and mutations.

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use super::schema::{orders, users};

/// Row struct for reading from the users table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct UserRow {
    pub id: Uuid,
    pub email: String,
    pub password_digest: String,
    pub role: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Insertable struct for creating new user records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = users)]
pub(crate) struct NewUserRow<'a> {
    pub id: Uuid,
    pub email: &'a str,
    pub password_digest: &'a str,
    pub role: &'a str,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Changeset applied when an identity changes its password.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = users)]
pub(crate) struct UserPasswordUpdate<'a> {
    pub password_digest: &'a str,
    pub updated_at: DateTime<Utc>,
}

// ---------------------------------------------------------------------------
// Order models
// ---------------------------------------------------------------------------

/// Row struct for reading from the orders table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = orders)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct OrderRow {
    pub id: Uuid,
    pub client_id: Uuid,
    pub origin_latitude: f64,
    pub origin_longitude: f64,
    pub destination_latitude: f64,
    pub destination_longitude: f64,
    pub origin_street: String,
    pub origin_zip_code: String,
    pub origin_ext_num: String,
    pub origin_int_num: Option<String>,
    pub origin_city: String,
    pub origin_state: String,
    pub origin_country: String,
    pub destination_street: String,
    pub destination_zip_code: String,
    pub destination_ext_num: String,
    pub destination_int_num: Option<String>,
    pub destination_city: String,
    pub destination_state: String,
    pub destination_country: String,
    pub product_quantity: i32,
    pub total_weight: f64,
    pub package_size: String,
    pub status: String,
    pub revision: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Insertable struct for creating new order records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = orders)]
pub(crate) struct NewOrderRow<'a> {
    pub id: Uuid,
    pub client_id: Uuid,
    pub origin_latitude: f64,
    pub origin_longitude: f64,
    pub destination_latitude: f64,
    pub destination_longitude: f64,
    pub origin_street: &'a str,
    pub origin_zip_code: &'a str,
    pub origin_ext_num: &'a str,
    pub origin_int_num: Option<&'a str>,
    pub origin_city: &'a str,
    pub origin_state: &'a str,
    pub origin_country: &'a str,
    pub destination_street: &'a str,
    pub destination_zip_code: &'a str,
    pub destination_ext_num: &'a str,
    pub destination_int_num: Option<&'a str>,
    pub destination_city: &'a str,
    pub destination_state: &'a str,
    pub destination_country: &'a str,
    pub product_quantity: i32,
    pub total_weight: f64,
    pub package_size: &'a str,
    pub status: &'a str,
    pub revision: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Changeset applied by a status transition.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = orders)]
pub(crate) struct OrderStatusUpdate<'a> {
    pub status: &'a str,
    pub revision: i32,
    pub updated_at: DateTime<Utc>,
}
