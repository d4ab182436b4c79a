pub mod listing_repository;
pub mod memory;
pub mod user_repository;
