pub mod booking_api;
pub mod identity;
pub mod prompt;
pub mod token_store;
pub mod view_state;
