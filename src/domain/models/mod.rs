pub mod appointment;
pub mod auth;
pub mod client;
pub mod tenant;
pub mod user;
