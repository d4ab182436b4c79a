//! UniLodge REST API: accounts, stateless bearer-token sessions and
//! owner-checked property listings.

pub mod application;
pub mod data;
pub mod domain;
pub mod infrastructure;
pub mod presentation;
pub mod server;
