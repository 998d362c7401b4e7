pub mod auth;
pub mod module;
pub mod permission;
pub mod role;
pub mod submodule;
pub mod user;
