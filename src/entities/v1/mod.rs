pub mod modules;
pub mod password_resets;
pub mod permission_role;
pub mod permissions;
pub mod roles;
pub mod submodules;
pub mod tokens;
pub mod users;
