pub mod auth;
pub mod listing;
