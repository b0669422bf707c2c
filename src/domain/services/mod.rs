pub mod auth_service;
pub mod availability;
pub mod booking;
pub mod conflict;
pub mod datetime_parse;
pub mod intent;
pub mod reminders;
pub mod slots;
