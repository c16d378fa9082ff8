pub mod auth;
pub mod calendar;
pub mod strip;
pub mod tables;
