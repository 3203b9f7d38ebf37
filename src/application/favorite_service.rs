use std::sync::Arc;

use chrono::Utc;
use uuid::Uuid;

use crate::api::dtos::{FavoriteResponse, ListingResponse};
use crate::domain::Favorite;
use crate::error::{AppError, AppResult};
use crate::infrastructure::repositories::{FavoriteRepository, ListingRepository};

#[derive(Clone)]
pub struct FavoriteService {
    listing_repo: Arc<dyn ListingRepository>,
    favorite_repo: Arc<dyn FavoriteRepository>,
}

impl FavoriteService {
    pub fn new(
        listing_repo: Arc<dyn ListingRepository>,
        favorite_repo: Arc<dyn FavoriteRepository>,
    ) -> Self {
        Self {
            listing_repo,
            favorite_repo,
        }
    }

    pub async fn list(&self, user_id: Uuid) -> AppResult<Vec<FavoriteResponse>> {
        let favorites = self.favorite_repo.find_for_user(user_id).await?;
        Ok(favorites.into_iter().map(FavoriteResponse::from).collect())
    }

    /// Resolves favorites to full listings, skipping ones that have been
    /// deleted since they were favorited.
    pub async fn list_listings(&self, user_id: Uuid) -> AppResult<Vec<ListingResponse>> {
        let favorites = self.favorite_repo.find_for_user(user_id).await?;

        let mut listings = Vec::with_capacity(favorites.len());
        for favorite in favorites {
            if let Some(listing) = self.listing_repo.find_by_id(favorite.listing_id).await? {
                listings.push(ListingResponse::from(listing));
            }
        }
        Ok(listings)
    }

    pub async fn add(&self, user_id: Uuid, listing_id: Uuid) -> AppResult<FavoriteResponse> {
        self.listing_repo
            .find_by_id(listing_id)
            .await?
            .ok_or_else(|| AppError::NotFound("listing not found".to_string()))?;

        let favorite = Favorite {
            id: Uuid::new_v4(),
            user_id,
            listing_id,
            created_at: Utc::now(),
        };

        // A duplicate surfaces as Conflict through the unique constraint.
        let created = self.favorite_repo.create(&favorite).await?;
        Ok(FavoriteResponse::from(created))
    }

    pub async fn remove(&self, user_id: Uuid, listing_id: Uuid) -> AppResult<()> {
        let removed = self.favorite_repo.delete(user_id, listing_id).await?;
        if !removed {
            return Err(AppError::NotFound("favorite not found".to_string()));
        }
        Ok(())
    }
}
