//! Process-local repositories behind `tokio::sync::RwLock`.
//!
//! Same contracts as the Postgres repositories, including email uniqueness and
//! oldest-first ordering. Used by the test suites and for running the API
//! without a database.

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::info;
use uuid::Uuid;

use crate::data::listing_repository::ListingRepository;
use crate::data::user_repository::UserRepository;
use crate::domain::error::DomainError;
use crate::domain::listing::Listing;
use crate::domain::user::User;

#[derive(Default)]
pub struct InMemoryUserRepository {
    users: RwLock<Vec<User>>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn create(&self, user: User) -> Result<User, DomainError> {
        let mut users = self.users.write().await;
        if users.iter().any(|u| u.email == user.email) {
            return Err(DomainError::DuplicateEmail);
        }
        users.push(user.clone());
        info!(user_id = %user.id, "user created");
        Ok(user)
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, DomainError> {
        let users = self.users.read().await;
        Ok(users.iter().find(|u| u.email == email).cloned())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, DomainError> {
        let users = self.users.read().await;
        Ok(users.iter().find(|u| u.id == id).cloned())
    }
}

#[derive(Default)]
pub struct InMemoryListingRepository {
    // insertion order is the listing order
    listings: RwLock<Vec<Listing>>,
}

impl InMemoryListingRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ListingRepository for InMemoryListingRepository {
    async fn create(&self, listing: Listing) -> Result<Listing, DomainError> {
        self.listings.write().await.push(listing.clone());
        info!(listing_id = %listing.id, owner_id = %listing.owner_id, "listing created");
        Ok(listing)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Listing>, DomainError> {
        let listings = self.listings.read().await;
        Ok(listings.iter().find(|l| l.id == id).cloned())
    }

    async fn list_all(&self) -> Result<Vec<Listing>, DomainError> {
        Ok(self.listings.read().await.clone())
    }

    async fn list_by_owner(&self, owner_id: Uuid) -> Result<Vec<Listing>, DomainError> {
        let listings = self.listings.read().await;
        Ok(listings
            .iter()
            .filter(|l| l.owner_id == owner_id)
            .cloned()
            .collect())
    }

    async fn update(&self, listing: &Listing) -> Result<Option<Listing>, DomainError> {
        let mut listings = self.listings.write().await;
        let Some(stored) = listings.iter_mut().find(|l| l.id == listing.id) else {
            return Ok(None);
        };
        stored.address = listing.address.clone();
        stored.rent = listing.rent;
        stored.bedrooms = listing.bedrooms;
        stored.image_url = listing.image_url.clone();
        stored.updated_at = listing.updated_at;
        info!(listing_id = %listing.id, "listing updated");
        Ok(Some(stored.clone()))
    }

    async fn delete(&self, id: Uuid) -> Result<bool, DomainError> {
        let mut listings = self.listings.write().await;
        let before = listings.len();
        listings.retain(|l| l.id != id);
        let removed = listings.len() < before;
        if removed {
            info!(listing_id = %id, "listing deleted");
        }
        Ok(removed)
    }
}
