//! Typed client for the UniLodge REST API.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

mod error;
mod http_client;
mod session;

pub use error::ClientError;
pub use http_client::LodgeClient;
pub use session::{DEFAULT_SESSION_FILE, SessionStore};

/// Credentials returned by a successful login.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub token: String,
    pub user_id: Uuid,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Listing {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub address: String,
    pub rent: i64,
    pub bedrooms: i32,
    pub image_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl fmt::Display for Listing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}] {} | rent {} | {} bedroom(s)",
            self.id, self.address, self.rent, self.bedrooms
        )?;
        if let Some(url) = &self.image_url {
            write!(f, " | {url}")?;
        }
        Ok(())
    }
}

/// Body for creating or replacing a listing.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListingInput {
    pub address: String,
    pub rent: i64,
    pub bedrooms: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}
