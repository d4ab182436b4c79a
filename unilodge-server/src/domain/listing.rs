use chrono::{DateTime, SubsecRound, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::domain::error::DomainError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
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

impl Listing {
    pub fn new(owner_id: Uuid, draft: ListingDraft) -> Self {
        let now = timestamp();
        Self {
            id: Uuid::new_v4(),
            owner_id,
            address: draft.address,
            rent: draft.rent,
            bedrooms: draft.bedrooms,
            image_url: draft.image_url,
            created_at: now,
            updated_at: now,
        }
    }

    /// Replaces the mutable fields. `id` and `owner_id` never change.
    pub fn apply(&mut self, draft: ListingDraft) {
        self.address = draft.address;
        self.rent = draft.rent;
        self.bedrooms = draft.bedrooms;
        self.image_url = draft.image_url;
        self.updated_at = timestamp();
    }

    pub fn is_owned_by(&self, user_id: Uuid) -> bool {
        self.owner_id == user_id
    }
}

/// Current time at the precision Postgres `TIMESTAMPTZ` keeps, so a listing
/// reads back exactly as it was written.
fn timestamp() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(6)
}

pub fn ensure_owner(listing: &Listing, caller_id: Uuid) -> Result<(), DomainError> {
    if listing.is_owned_by(caller_id) {
        Ok(())
    } else {
        Err(DomainError::Forbidden)
    }
}

/// A numeric field as a client submitted it. The mobile app posts form text
/// (`"500"`), scripted callers post JSON numbers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum NumericInput {
    Integer(i64),
    Text(String),
    Other(serde_json::Value),
}

impl From<i64> for NumericInput {
    fn from(value: i64) -> Self {
        NumericInput::Integer(value)
    }
}

impl From<&str> for NumericInput {
    fn from(value: &str) -> Self {
        NumericInput::Text(value.to_string())
    }
}

/// Validated values for the four client-editable listing fields.
#[derive(Debug, Clone, PartialEq)]
pub struct ListingDraft {
    pub address: String,
    pub rent: i64,
    pub bedrooms: i32,
    pub image_url: Option<String>,
}

impl ListingDraft {
    pub fn parse(
        address: Option<String>,
        rent: Option<NumericInput>,
        bedrooms: Option<NumericInput>,
        image_url: Option<String>,
    ) -> Result<Self, DomainError> {
        let address = address
            .map(|a| a.trim().to_string())
            .filter(|a| !a.is_empty())
            .ok_or_else(|| DomainError::Validation("address is required".into()))?;

        let rent = parse_non_negative("rent", rent)?;
        let bedrooms = i32::try_from(parse_non_negative("bedrooms", bedrooms)?)
            .map_err(|_| DomainError::Validation("bedrooms is out of range".into()))?;

        let image_url = image_url
            .map(|u| u.trim().to_string())
            .filter(|u| !u.is_empty());

        Ok(Self {
            address,
            rent,
            bedrooms,
            image_url,
        })
    }
}

fn parse_non_negative(field: &str, input: Option<NumericInput>) -> Result<i64, DomainError> {
    let value = match input {
        None => return Err(DomainError::Validation(format!("{field} is required"))),
        Some(NumericInput::Integer(v)) => v,
        Some(NumericInput::Text(text)) => text
            .trim()
            .parse::<i64>()
            .map_err(|_| DomainError::Validation(format!("{field} must be a whole number")))?,
        Some(NumericInput::Other(_)) => {
            return Err(DomainError::Validation(format!(
                "{field} must be a whole number"
            )));
        }
    };

    if value < 0 {
        return Err(DomainError::Validation(format!("{field} must not be negative")));
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft(rent: NumericInput, bedrooms: NumericInput) -> Result<ListingDraft, DomainError> {
        ListingDraft::parse(
            Some("1 Main St".into()),
            Some(rent),
            Some(bedrooms),
            None,
        )
    }

    #[test]
    fn text_and_integer_inputs_parse_to_the_same_value() {
        let from_text = draft("500".into(), " 2 ".into()).unwrap();
        let from_int = draft(500i64.into(), 2i64.into()).unwrap();
        assert_eq!(from_text, from_int);
        assert_eq!(from_text.rent, 500);
        assert_eq!(from_text.bedrooms, 2);
    }

    #[test]
    fn non_numeric_rent_is_rejected() {
        let err = draft("five hundred".into(), 2i64.into()).unwrap_err();
        assert!(matches!(err, DomainError::Validation(msg) if msg.contains("rent")));
    }

    #[test]
    fn trailing_garbage_is_rejected() {
        assert!(matches!(
            draft("500abc".into(), 2i64.into()),
            Err(DomainError::Validation(_))
        ));
    }

    #[test]
    fn fractional_json_number_is_rejected() {
        let fractional = NumericInput::Other(serde_json::json!(2.5));
        assert!(matches!(
            draft(500i64.into(), fractional),
            Err(DomainError::Validation(msg)) if msg.contains("bedrooms")
        ));
    }

    #[test]
    fn negative_values_are_rejected() {
        assert!(matches!(
            draft((-1i64).into(), 2i64.into()),
            Err(DomainError::Validation(_))
        ));
        assert!(matches!(
            draft(500i64.into(), "-3".into()),
            Err(DomainError::Validation(_))
        ));
    }

    #[test]
    fn bedrooms_beyond_i32_are_rejected() {
        assert!(matches!(
            draft(500i64.into(), (i64::from(i32::MAX) + 1).into()),
            Err(DomainError::Validation(_))
        ));
    }

    #[test]
    fn missing_fields_are_rejected() {
        assert!(ListingDraft::parse(None, Some(500i64.into()), Some(1i64.into()), None).is_err());
        assert!(ListingDraft::parse(Some("   ".into()), Some(500i64.into()), Some(1i64.into()), None).is_err());
        assert!(ListingDraft::parse(Some("x".into()), None, Some(1i64.into()), None).is_err());
        assert!(ListingDraft::parse(Some("x".into()), Some(500i64.into()), None, None).is_err());
    }

    #[test]
    fn blank_image_url_becomes_none() {
        let d = ListingDraft::parse(
            Some("x".into()),
            Some(1i64.into()),
            Some(1i64.into()),
            Some("  ".into()),
        )
        .unwrap();
        assert_eq!(d.image_url, None);
    }

    #[test]
    fn numeric_input_deserializes_from_string_and_number() {
        let n: NumericInput = serde_json::from_str("500").unwrap();
        let s: NumericInput = serde_json::from_str("\"500\"").unwrap();
        let f: NumericInput = serde_json::from_str("5.5").unwrap();
        assert_eq!(n, NumericInput::Integer(500));
        assert_eq!(s, NumericInput::Text("500".into()));
        assert!(matches!(f, NumericInput::Other(_)));
    }

    #[test]
    fn apply_keeps_identity_and_owner() {
        let owner = Uuid::new_v4();
        let mut listing = Listing::new(owner, draft(500i64.into(), 2i64.into()).unwrap());
        let id = listing.id;
        listing.apply(ListingDraft {
            address: "2 Side St".into(),
            rent: 750,
            bedrooms: 3,
            image_url: Some("https://img/1.jpg".into()),
        });
        assert_eq!(listing.id, id);
        assert_eq!(listing.owner_id, owner);
        assert_eq!(listing.address, "2 Side St");
        assert_eq!(listing.rent, 750);
    }

    #[test]
    fn ensure_owner_rejects_other_users() {
        let owner = Uuid::new_v4();
        let listing = Listing::new(owner, draft(500i64.into(), 2i64.into()).unwrap());
        assert!(ensure_owner(&listing, owner).is_ok());
        assert!(matches!(
            ensure_owner(&listing, Uuid::new_v4()),
            Err(DomainError::Forbidden)
        ));
    }

    #[test]
    fn timestamps_keep_whole_microseconds() {
        let mut listing = Listing::new(Uuid::new_v4(), draft(500i64.into(), 2i64.into()).unwrap());
        assert_eq!(listing.created_at.timestamp_subsec_nanos() % 1_000, 0);
        assert_eq!(listing.updated_at, listing.created_at);

        listing.apply(draft(600i64.into(), 3i64.into()).unwrap());
        assert_eq!(listing.updated_at.timestamp_subsec_nanos() % 1_000, 0);
    }
}
