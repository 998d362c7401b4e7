use sea_orm::DbErr;
use thiserror::Error;

use crate::common::{Error, Validation};
use crate::entities::v1::permissions::Action;

#[derive(Debug, Error)]
pub enum MatrixError {
    #[error("{entity} {id} not found")]
    NotFound { entity: &'static str, id: i32 },
    #[error("Module name '{0}' already exists")]
    DuplicateName(String),
    #[error("Submodule title '{title}' already exists in module {module_id}")]
    DuplicateTitle { module_id: i32, title: String },
    #[error("Validation failed: {0}")]
    Validation(Validation),
    #[error("Missing permission to {} {module} / {submodule}", .action.as_str())]
    Forbidden {
        module: String,
        submodule: String,
        action: Action,
    },
    #[error("Transaction failed during {operation}")]
    Transaction {
        operation: &'static str,
        #[source]
        source: DbErr,
    },
    #[error(transparent)]
    Database(#[from] DbErr),
}

impl MatrixError {
    pub fn not_found(entity: &'static str, id: i32) -> Self {
        Self::NotFound { entity, id }
    }
}

impl From<MatrixError> for Error {
    fn from(e: MatrixError) -> Self {
        match e {
            MatrixError::NotFound { .. } => Error::not_found(e.to_string()),
            MatrixError::DuplicateName(_) => Error::invalid("name", "Name already exists"),
            MatrixError::DuplicateTitle { .. } => {
                Error::invalid("title", "Title already exists in this module")
            }
            MatrixError::Validation(validation) => Error::Validation(validation),
            MatrixError::Forbidden { .. } => Error::forbidden(e.to_string()),
            MatrixError::Transaction { operation, source } => {
                Error::internal(format!("{operation}: {source}"))
            }
            MatrixError::Database(source) => Error::internal(source),
        }
    }
}
