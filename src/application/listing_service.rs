use std::sync::Arc;

use chrono::Utc;
use rust_decimal::Decimal;
use tracing::info;
use uuid::Uuid;
use validator::Validate;

use super::MessagingService;
use crate::api::dtos::{
    CreateListingRequest, DeleteListingRequest, ListingQueryParams, ListingResponse,
    UpdateListingRequest,
};
use crate::domain::{Listing, Role};
use crate::error::{AppError, AppResult};
use crate::infrastructure::repositories::{ListingRepository, ListingSearchParams, UserRepository};

#[derive(Clone)]
pub struct ListingService {
    user_repo: Arc<dyn UserRepository>,
    listing_repo: Arc<dyn ListingRepository>,
    messaging: Arc<MessagingService>,
}

impl ListingService {
    pub fn new(
        user_repo: Arc<dyn UserRepository>,
        listing_repo: Arc<dyn ListingRepository>,
        messaging: Arc<MessagingService>,
    ) -> Self {
        Self {
            user_repo,
            listing_repo,
            messaging,
        }
    }

    pub async fn list(&self, params: ListingQueryParams) -> AppResult<Vec<ListingResponse>> {
        let page = params.page.unwrap_or(1).max(1);
        let limit = params.limit.unwrap_or(20).clamp(1, 100);
        let offset = (page - 1) * limit;

        let search = ListingSearchParams {
            category: params.category,
            min_price: params.min_price,
            max_price: params.max_price,
            location: params.location,
            query: params.q,
        };

        let listings = self.listing_repo.find_all(&search, limit, offset).await?;
        Ok(listings.into_iter().map(ListingResponse::from).collect())
    }

    pub async fn get_by_id(&self, id: Uuid) -> AppResult<ListingResponse> {
        let listing = self
            .listing_repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("listing not found".to_string()))?;
        Ok(ListingResponse::from(listing))
    }

    pub async fn list_own(&self, owner_id: Uuid) -> AppResult<Vec<ListingResponse>> {
        let listings = self.listing_repo.find_by_owner(owner_id).await?;
        Ok(listings.into_iter().map(ListingResponse::from).collect())
    }

    pub async fn create(
        &self,
        owner_id: Uuid,
        request: CreateListingRequest,
    ) -> AppResult<ListingResponse> {
        request.validate()?;

        if request.price <= Decimal::ZERO {
            return Err(AppError::validation_error(
                "Price must be greater than zero",
            ));
        }

        let now = Utc::now();
        let listing = Listing {
            id: Uuid::new_v4(),
            owner_id,
            title: request.title,
            description: request.description,
            price: request.price,
            category: request.category,
            location: request.location,
            image_urls: request.image_urls,
            created_at: now,
            updated_at: now,
            deleted_at: None,
            deletion_reason: None,
            was_sold: None,
        };

        let created = self.listing_repo.create(&listing).await?;
        info!(listing_id = %created.id, owner_id = %owner_id, "listing created");
        Ok(ListingResponse::from(created))
    }

    pub async fn update(
        &self,
        actor_user_id: Uuid,
        listing_id: Uuid,
        request: UpdateListingRequest,
    ) -> AppResult<ListingResponse> {
        request.validate()?;

        let mut existing = self
            .listing_repo
            .find_by_id(listing_id)
            .await?
            .ok_or_else(|| AppError::NotFound("listing not found".to_string()))?;

        if existing.owner_id != actor_user_id {
            return Err(AppError::Forbidden(
                "You can only modify your own listings".to_string(),
            ));
        }

        if let Some(title) = request.title {
            existing.title = title;
        }
        if let Some(description) = request.description {
            existing.description = description;
        }
        if let Some(price) = request.price {
            if price <= Decimal::ZERO {
                return Err(AppError::validation_error(
                    "Price must be greater than zero",
                ));
            }
            existing.price = price;
        }
        if let Some(category) = request.category {
            existing.category = category;
        }
        if let Some(location) = request.location {
            existing.location = location;
        }
        if let Some(image_urls) = request.image_urls {
            existing.image_urls = image_urls;
        }

        let updated = self.listing_repo.update(&existing).await?;
        Ok(ListingResponse::from(updated))
    }

    /// Soft-deletes the listing, keeping the deletion feedback, then
    /// hard-deletes every conversation attached to it as part of the same
    /// flow. Owner only, with an admin override.
    pub async fn delete(
        &self,
        actor_user_id: Uuid,
        listing_id: Uuid,
        request: DeleteListingRequest,
    ) -> AppResult<()> {
        let existing = self
            .listing_repo
            .find_by_id(listing_id)
            .await?
            .ok_or_else(|| AppError::NotFound("listing not found".to_string()))?;

        if existing.owner_id != actor_user_id {
            let actor = self
                .user_repo
                .find_by_id(actor_user_id)
                .await?
                .ok_or(AppError::Unauthorized)?;
            if actor.role != Role::Admin {
                return Err(AppError::Forbidden(
                    "You can only delete your own listings".to_string(),
                ));
            }
            info!(
                actor_user_id = %actor_user_id,
                listing_id = %listing_id,
                owner_id = %existing.owner_id,
                "admin override: delete listing"
            );
        }

        self.listing_repo
            .soft_delete(listing_id, request.reason.as_str(), request.was_sold)
            .await?;

        let deleted_conversations = self
            .messaging
            .delete_conversations_for_listing(listing_id)
            .await?;

        info!(
            listing_id = %listing_id,
            reason = request.reason.as_str(),
            was_sold = request.was_sold,
            deleted_conversations = deleted_conversations,
            "listing deleted"
        );
        Ok(())
    }
}
