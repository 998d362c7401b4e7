pub mod authenticated;
pub mod login;
pub mod logout;
pub mod reset_password;
