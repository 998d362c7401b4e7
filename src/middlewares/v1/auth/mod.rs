#[allow(clippy::module_inception)]
pub mod auth;
pub mod bearer;

pub use auth::Auth;
