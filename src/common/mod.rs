//! Shared building blocks: HTTP errors, validation bags, database
//! connection helpers and the tracing subscriber.

pub mod database;
pub mod error;
pub mod tracing;
pub mod validation;

use chrono::{NaiveDateTime, Utc};

pub use error::{Error, ErrorResponse, Success};
pub use validation::Validation;

/// Current UTC time without offset, matching the `timestamp` columns.
pub fn now() -> NaiveDateTime {
    Utc::now().naive_utc()
}

pub mod prelude {
    pub use actix_web::body::BoxBody;
    pub use actix_web::http::StatusCode;
    pub use actix_web::web::{self, Data, Json, Path, Query, ServiceConfig};
    pub use actix_web::{HttpRequest, HttpResponse, Responder};
    pub use chrono::NaiveDateTime;
    pub use sea_orm::DatabaseConnection;
    pub use uuid::Uuid;

    pub use super::error::{Error, ErrorResponse, Success};
    pub use super::now;
    pub use super::validation::Validation;
}
