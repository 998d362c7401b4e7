use std::future::{Ready, ready};

use actix_web::FromRequest;
use actix_web::dev::Payload;

use crate::common::prelude::*;
use crate::metrics::AppMetrics;
use crate::rbac::PermissionMatrix;

/// Builds a request scoped [`PermissionMatrix`] over the shared pool.
impl FromRequest for PermissionMatrix {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        let Some(db) = req.app_data::<Data<DatabaseConnection>>() else {
            return ready(Err(Error::internal("Database connection is not registered")));
        };

        let matrix = PermissionMatrix::new(db.get_ref().clone());
        let matrix = match req.app_data::<Data<AppMetrics>>() {
            Some(metrics) => matrix.with_metrics(metrics.get_ref().clone()),
            None => matrix,
        };

        ready(Ok(matrix))
    }
}
