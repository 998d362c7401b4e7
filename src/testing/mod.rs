//! Fixtures shared by unit and integration tests.

pub mod instance;
pub mod setup;

#[cfg(test)]
mod module;
#[cfg(test)]
mod role;
#[cfg(test)]
mod user;
