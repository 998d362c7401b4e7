use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::openapi::{Components, OpenApi as Document};
use utoipa::{Modify, OpenApi};

use crate::{common, controllers, entities, rbac, requests, responses};

/// Registers the `token` bearer scheme referenced by `security(("token" = []))`.
pub struct Authentication;

impl Modify for Authentication {
    fn modify(&self, openapi: &mut Document) {
        openapi
            .components
            .get_or_insert_with(Components::new)
            .add_security_scheme(
                "token",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .description(Some("Token returned by /v1/auth/login"))
                        .build(),
                ),
            );
    }
}

#[derive(OpenApi)]
#[openapi(
    info(title = "Estate Admin", description = "Real-estate back-office access control"),
    tags(
        (name = "Auth"),
        (name = "Module"),
        (name = "Submodule"),
        (name = "Permission"),
        (name = "Role"),
        (name = "User"),
        (name = "Health"),
    ),
    modifiers(&Authentication),
    paths(
        controllers::v1::module::index,
        controllers::v1::module::store,
        controllers::v1::module::toggle,
        controllers::v1::module::delete,

        controllers::v1::submodule::index,
        controllers::v1::submodule::store,
        controllers::v1::submodule::toggle,
        controllers::v1::submodule::delete,

        controllers::v1::permission::me,

        controllers::v1::role::index,
        controllers::v1::role::store,
        controllers::v1::role::show,
        controllers::v1::role::update,
        controllers::v1::role::delete,
        controllers::v1::role::permissions,

        controllers::v1::user::paginate,
        controllers::v1::user::store,
        controllers::v1::user::show,
        controllers::v1::user::assign_role,
        controllers::v1::user::toggle,
        controllers::v1::user::delete,
        controllers::v1::user::update_general_information,
        controllers::v1::user::password_reset,
        controllers::v1::user::profile,
        controllers::v1::user::update_profile,
        controllers::v1::user::update_password,

        controllers::v1::auth::login,
        controllers::v1::auth::authenticated,
        controllers::v1::auth::logout,
        controllers::v1::auth::reset_password,

        controllers::health::health,
        controllers::health::health_db,
        controllers::health::ready,
        controllers::health::live,
    ),
    components(schemas(
        common::ErrorResponse,
        common::Success,
        common::Validation,

        entities::v1::permissions::Action,
        rbac::CascadeReport,
        rbac::EffectivePermission,

        requests::v1::auth::LoginRequest,
        requests::v1::auth::PasswordResetRequest,
        requests::v1::module::ModuleRequest,
        requests::v1::submodule::SubmoduleRequest,
        requests::v1::role::RoleRequest,
        requests::v1::role::GrantRequest,
        requests::v1::role::RolePermissionsRequest,
        requests::v1::user::UserStoreRequest,
        requests::v1::user::UserRoleRequest,
        requests::v1::user::UserUpdateGeneralInformationRequest,
        requests::v1::user::UserUpdatePasswordRequest,

        responses::v1::module::Module,
        responses::v1::module::ModuleTree,
        responses::v1::submodule::Submodule,
        responses::v1::submodule::SubmoduleListItem,
        responses::v1::submodule::CascadeDeleted,
        responses::v1::role::Role,
        responses::v1::role::RoleSummary,
        responses::v1::role::RoleModule,
        responses::v1::role::RoleSubmodule,
        responses::v1::role::RoleDetail,
        responses::v1::role::Permission,
        responses::v1::role::RolePermissions,
        responses::v1::user::User,
        responses::v1::user::UserWithRole,
        responses::v1::user::UserPaginationResponse,
        responses::v1::user::PasswordResetIssued,
        responses::v1::auth::LoginResponse,
        responses::v1::auth::Authenticated,

        controllers::health::LivenessResponse,
        controllers::health::HealthResponse,
        controllers::health::ReadinessResponse,
    )),
)]
pub struct Definition;
