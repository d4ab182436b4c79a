use std::sync::Arc;

use tracing::instrument;
use uuid::Uuid;

use crate::data::listing_repository::ListingRepository;
use crate::domain::error::DomainError;
use crate::domain::listing::{Listing, ListingDraft, ensure_owner};

/// Listing CRUD. Reads are public; every mutation is checked against the
/// verified caller, and the owner of a listing is always the caller that
/// created it.
#[derive(Clone)]
pub struct ListingService {
    repo: Arc<dyn ListingRepository>,
}

impl ListingService {
    pub fn new(repo: Arc<dyn ListingRepository>) -> Self {
        Self { repo }
    }

    pub async fn list_all(&self) -> Result<Vec<Listing>, DomainError> {
        self.repo.list_all().await
    }

    pub async fn get_by_id(&self, id: Uuid) -> Result<Listing, DomainError> {
        self.repo
            .find_by_id(id)
            .await?
            .ok_or(DomainError::ListingNotFound(id))
    }

    #[instrument(skip(self))]
    pub async fn list_by_owner(
        &self,
        owner_id: Uuid,
        caller_id: Uuid,
    ) -> Result<Vec<Listing>, DomainError> {
        if owner_id != caller_id {
            return Err(DomainError::Forbidden);
        }
        self.repo.list_by_owner(owner_id).await
    }

    #[instrument(skip(self, draft))]
    pub async fn create(&self, caller_id: Uuid, draft: ListingDraft) -> Result<Listing, DomainError> {
        self.repo.create(Listing::new(caller_id, draft)).await
    }

    #[instrument(skip(self, draft))]
    pub async fn update(
        &self,
        caller_id: Uuid,
        id: Uuid,
        draft: ListingDraft,
    ) -> Result<Listing, DomainError> {
        let mut listing = self.owned_listing(caller_id, id).await?;
        listing.apply(draft);

        self.repo
            .update(&listing)
            .await?
            .ok_or(DomainError::ListingNotFound(id))
    }

    #[instrument(skip(self))]
    pub async fn delete(&self, caller_id: Uuid, id: Uuid) -> Result<(), DomainError> {
        self.owned_listing(caller_id, id).await?;

        if self.repo.delete(id).await? {
            Ok(())
        } else {
            Err(DomainError::ListingNotFound(id))
        }
    }

    /// Existence first, then ownership: a missing listing is `ListingNotFound`
    /// for every caller.
    async fn owned_listing(&self, caller_id: Uuid, id: Uuid) -> Result<Listing, DomainError> {
        let listing = self.get_by_id(id).await?;
        ensure_owner(&listing, caller_id)?;
        Ok(listing)
    }
}
