pub mod auth;
pub mod module;
pub mod role;
pub mod submodule;
pub mod user;
