pub mod auth;
pub mod matrix;
