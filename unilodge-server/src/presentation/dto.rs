use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::error::DomainError;
use crate::domain::listing::{ListingDraft, NumericInput};

// Presence is checked by the services so that a missing field and an empty
// one produce the same validation error.

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterResponse {
    pub message: String,
    pub user_id: Uuid,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub token: String,
    pub user_id: Uuid,
}

// ======================= LISTINGS =======================

/// Body of `POST /properties` and `PUT /properties/{id}`. Any `ownerId` the
/// client sends is ignored.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListingRequest {
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub rent: Option<NumericInput>,
    #[serde(default)]
    pub bedrooms: Option<NumericInput>,
    #[serde(default)]
    pub image_url: Option<String>,
}

impl ListingRequest {
    pub fn into_draft(self) -> Result<ListingDraft, DomainError> {
        ListingDraft::parse(self.address, self.rent, self.bedrooms, self.image_url)
    }
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub timestamp: DateTime<Utc>,
}
