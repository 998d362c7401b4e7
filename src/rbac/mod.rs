//! Module → Submodule → Permission → Role authorization matrix.
//!
//! [`PermissionMatrix`] owns every mutation of the graph (creation, cascading
//! deletes, activation toggles and wholesale role grant replacement) and
//! answers per-request authorization questions. Nothing is cached; every
//! check reads current state.

mod error;
mod matrix;

pub use error::MatrixError;
pub use matrix::{
    CascadeReport, EffectivePermission, Grant, ModuleWithSubmodules, PermissionMatrix,
    SubmoduleWithModule,
};

/// Id of the seeded "Super Admin" role.
///
/// Magic value: nothing in the schema marks this role. The seeder inserts it
/// first so it receives id 1. Holders see inactive modules and submodules,
/// pass every authorization check, and are the only ones allowed to view,
/// edit or assign this role.
pub const SUPER_ADMIN_ROLE_ID: i32 = 1;

/// Authenticated principal an authorization question is asked for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Actor {
    pub user_id: i32,
    pub role_id: i32,
}

impl Actor {
    pub fn new(user_id: i32, role_id: i32) -> Self {
        Self { user_id, role_id }
    }

    pub fn is_super_admin(&self) -> bool {
        self.role_id == SUPER_ADMIN_ROLE_ID
    }
}

// Guarded catalogue entries. These names are seeded by the migration crate.
pub const USER_MANAGEMENT: &str = "User Management";
pub const USERS: &str = "Users";
pub const USER_ROLES: &str = "User Roles";
