use crate::domain::error::DomainError;
use crate::domain::listing::Listing;
use async_trait::async_trait;
use sqlx::PgPool;
use tracing::{error, info};
use uuid::Uuid;

/// Listing storage. Every query returns listings oldest first.
#[async_trait]
pub trait ListingRepository: Send + Sync {
    async fn create(&self, listing: Listing) -> Result<Listing, DomainError>;
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Listing>, DomainError>;
    async fn list_all(&self) -> Result<Vec<Listing>, DomainError>;
    async fn list_by_owner(&self, owner_id: Uuid) -> Result<Vec<Listing>, DomainError>;
    /// Writes the mutable fields of `listing`. `None` when the row no longer exists.
    async fn update(&self, listing: &Listing) -> Result<Option<Listing>, DomainError>;
    /// Returns `false` when nothing was deleted.
    async fn delete(&self, id: Uuid) -> Result<bool, DomainError>;
}

#[derive(Clone)]
pub struct PostgresListingRepository {
    pool: PgPool,
}

impl PostgresListingRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ListingRepository for PostgresListingRepository {
    async fn create(&self, listing: Listing) -> Result<Listing, DomainError> {
        let created = sqlx::query_as::<_, Listing>(
            r#"
            INSERT INTO listings (id, owner_id, address, rent, bedrooms, image_url, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING id, owner_id, address, rent, bedrooms, image_url, created_at, updated_at
            "#,
        )
        .bind(listing.id)
        .bind(listing.owner_id)
        .bind(&listing.address)
        .bind(listing.rent)
        .bind(listing.bedrooms)
        .bind(&listing.image_url)
        .bind(listing.created_at)
        .bind(listing.updated_at)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            error!("failed to create listing: {}", e);
            DomainError::Internal(format!("database error: {}", e))
        })?;

        info!(listing_id = %created.id, owner_id = %created.owner_id, "listing created");
        Ok(created)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Listing>, DomainError> {
        sqlx::query_as::<_, Listing>(
            r#"
            SELECT id, owner_id, address, rent, bedrooms, image_url, created_at, updated_at
            FROM listings WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            error!("db error find_by_id {}: {}", id, e);
            DomainError::Internal(e.to_string())
        })
    }

    async fn list_all(&self) -> Result<Vec<Listing>, DomainError> {
        sqlx::query_as::<_, Listing>(
            r#"
            SELECT id, owner_id, address, rent, bedrooms, image_url, created_at, updated_at
            FROM listings
            ORDER BY created_at ASC, id ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            error!("db error while fetching listings: {}", e);
            DomainError::Internal(e.to_string())
        })
    }

    async fn list_by_owner(&self, owner_id: Uuid) -> Result<Vec<Listing>, DomainError> {
        sqlx::query_as::<_, Listing>(
            r#"
            SELECT id, owner_id, address, rent, bedrooms, image_url, created_at, updated_at
            FROM listings
            WHERE owner_id = $1
            ORDER BY created_at ASC, id ASC
            "#,
        )
        .bind(owner_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            error!("db error while fetching listings of {}: {}", owner_id, e);
            DomainError::Internal(e.to_string())
        })
    }

    async fn update(&self, listing: &Listing) -> Result<Option<Listing>, DomainError> {
        let updated = sqlx::query_as::<_, Listing>(
            r#"
            UPDATE listings
            SET
                address = $1,
                rent = $2,
                bedrooms = $3,
                image_url = $4,
                updated_at = $5
            WHERE id = $6
            RETURNING id, owner_id, address, rent, bedrooms, image_url, created_at, updated_at
            "#,
        )
        .bind(&listing.address)
        .bind(listing.rent)
        .bind(listing.bedrooms)
        .bind(&listing.image_url)
        .bind(listing.updated_at)
        .bind(listing.id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            error!("failed to update listing {}: {}", listing.id, e);
            DomainError::Internal(e.to_string())
        })?;

        if updated.is_some() {
            info!(listing_id = %listing.id, "listing updated");
        }

        Ok(updated)
    }

    async fn delete(&self, id: Uuid) -> Result<bool, DomainError> {
        let deleted = sqlx::query("DELETE FROM listings WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                error!("failed to delete listing {}: {}", id, e);
                DomainError::Internal(e.to_string())
            })?;

        let removed = deleted.rows_affected() > 0;
        if removed {
            info!(listing_id = %id, "listing deleted");
        }
        Ok(removed)
    }
}
