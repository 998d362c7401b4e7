use actix_web::error::JsonPayloadError;
use utoipa::OpenApi;
use utoipa_swagger_ui::{SwaggerUi, Url};

use crate::api::Definition;
use crate::common::prelude::*;
use crate::controllers;
use crate::metrics::AppMetrics;

/// Malformed JSON bodies become 400 with the parser's message.
fn json_error(error: JsonPayloadError, _: &HttpRequest) -> actix_web::Error {
    Error::bad_request(error.to_string()).into()
}

pub fn route(app: &mut ServiceConfig) {
    app.app_data(Data::new(AppMetrics::new()));
    app.app_data(web::JsonConfig::default().error_handler(json_error));
    app.app_data(web::QueryConfig::default().error_handler(|error, _| {
        Error::bad_request(error.to_string()).into()
    }));
    app.app_data(web::PathConfig::default().error_handler(|error, _| {
        Error::not_found(error.to_string()).into()
    }));

    // Module
    app.service(controllers::v1::module::index);
    app.service(controllers::v1::module::store);
    app.service(controllers::v1::module::toggle);
    app.service(controllers::v1::module::delete);
    // Submodule
    app.service(controllers::v1::submodule::index);
    app.service(controllers::v1::submodule::store);
    app.service(controllers::v1::submodule::toggle);
    app.service(controllers::v1::submodule::delete);
    // Permission
    app.service(controllers::v1::permission::me);
    // Role
    app.service(controllers::v1::role::index);
    app.service(controllers::v1::role::store);
    app.service(controllers::v1::role::show);
    app.service(controllers::v1::role::update);
    app.service(controllers::v1::role::delete);
    app.service(controllers::v1::role::permissions);
    // User
    app.service(controllers::v1::user::paginate);
    app.service(controllers::v1::user::store);
    app.service(controllers::v1::user::show);
    app.service(controllers::v1::user::assign_role);
    app.service(controllers::v1::user::toggle);
    app.service(controllers::v1::user::delete);
    app.service(controllers::v1::user::update_general_information);
    app.service(controllers::v1::user::password_reset);
    app.service(controllers::v1::user::profile);
    app.service(controllers::v1::user::update_profile);
    app.service(controllers::v1::user::update_password);
    // Auth
    app.service(controllers::v1::auth::login);
    app.service(controllers::v1::auth::authenticated);
    app.service(controllers::v1::auth::logout);
    app.service(controllers::v1::auth::reset_password);

    // Health
    app.service(controllers::health::health);
    app.service(controllers::health::health_db);
    app.service(controllers::health::ready);
    app.service(controllers::health::live);

    app.service(controllers::metrics::metrics);

    // must at the end!
    app.service(web::redirect("/docs", "/docs/"));
    app.service(SwaggerUi::new("/docs/{_:.*}").urls(vec![(
        Url::new("Estate Admin", "/api.json"),
        Definition::openapi(),
    )]));
}
