//! Query helpers attached to the entity models.

pub mod password_reset;
pub mod role;
pub mod token;
pub mod user;
