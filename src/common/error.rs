use std::collections::BTreeMap;

use actix_web::body::BoxBody;
use actix_web::http::StatusCode;
use actix_web::{HttpRequest, HttpResponse, Responder, ResponseError};
use sea_orm::DbErr;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::{IntoResponses, ToSchema};

use super::validation::Validation;

/// Message returned to clients for every internal failure.
pub const OPERATION_FAILED: &str = "Operation failed";

#[derive(Debug, Error)]
pub enum Error {
    #[error("{message}")]
    BadRequest { message: String },
    #[error("{message}")]
    Unauthorized { message: String },
    #[error("{message}")]
    Forbidden { message: String },
    #[error("{message}")]
    NotFound { message: String },
    #[error("Validation failed")]
    Validation(Validation),
    #[error("{message}")]
    InternalServerError { message: String },
}

impl Error {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::BadRequest {
            message: message.into(),
        }
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::Unauthorized {
            message: message.into(),
        }
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::Forbidden {
            message: message.into(),
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound {
            message: message.into(),
        }
    }

    /// Single field validation failure.
    pub fn invalid(field: impl Into<String>, message: impl Into<String>) -> Self {
        let mut validation = Validation::new();
        validation.add(field, message);
        Self::Validation(validation)
    }

    /// Internal failure. The cause is logged here and never sent to the client.
    pub fn internal(cause: impl std::fmt::Display) -> Self {
        ::tracing::error!(error = %cause, "Internal server error");

        Self::InternalServerError {
            message: OPERATION_FAILED.to_string(),
        }
    }
}

impl From<Validation> for Error {
    fn from(validation: Validation) -> Self {
        Self::Validation(validation)
    }
}

impl From<DbErr> for Error {
    fn from(e: DbErr) -> Self {
        Self::internal(e)
    }
}

impl From<anyhow::Error> for Error {
    fn from(e: anyhow::Error) -> Self {
        Self::internal(format!("{e:#}"))
    }
}

/// JSON body of every error response
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    #[schema(example = false)]
    pub success: bool,
    #[schema(example = 422)]
    pub status: u16,
    #[schema(example = "Validation failed")]
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<BTreeMap<String, Vec<String>>>,
}

impl ResponseError for Error {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::BadRequest { .. } => StatusCode::BAD_REQUEST,
            Self::Unauthorized { .. } => StatusCode::UNAUTHORIZED,
            Self::Forbidden { .. } => StatusCode::FORBIDDEN,
            Self::NotFound { .. } => StatusCode::NOT_FOUND,
            Self::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Self::InternalServerError { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse<BoxBody> {
        let status = self.status_code();
        let errors = match self {
            Self::Validation(validation) => Some(validation.errors().clone()),
            _ => None,
        };

        HttpResponse::build(status).json(ErrorResponse {
            success: false,
            status: status.as_u16(),
            message: self.to_string(),
            errors,
        })
    }
}

/// Plain acknowledgement body
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, IntoResponses)]
#[response(status = 200, description = "OK")]
pub struct Success {
    #[schema(example = true)]
    pub success: bool,
    #[schema(example = "Deleted")]
    pub message: String,
}

impl Success {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
        }
    }
}

impl Responder for Success {
    type Body = BoxBody;

    fn respond_to(self, _: &HttpRequest) -> HttpResponse<Self::Body> {
        HttpResponse::Ok().json(self)
    }
}
