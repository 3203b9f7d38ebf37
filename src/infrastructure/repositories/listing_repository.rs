use super::traits::{ListingRepository, ListingSearchParams};
use crate::domain::Listing;
use crate::error::AppResult;
use async_trait::async_trait;
use chrono::Utc;
use sqlx::{PgPool, Postgres};
use uuid::Uuid;

const LISTING_COLUMNS: &str = "id, owner_id, title, description, price, category, location, \
     image_urls, created_at, updated_at, deleted_at, deletion_reason, was_sold";

pub struct ListingRepositoryImpl {
    pool: PgPool,
}

impl ListingRepositoryImpl {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ListingRepository for ListingRepositoryImpl {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Listing>> {
        let listing = sqlx::query_as::<_, Listing>(&format!(
            "SELECT {LISTING_COLUMNS} FROM listings WHERE id = $1 AND deleted_at IS NULL"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(listing)
    }

    async fn find_all(
        &self,
        params: &ListingSearchParams,
        limit: i64,
        offset: i64,
    ) -> AppResult<Vec<Listing>> {
        let mut sql = format!("SELECT {LISTING_COLUMNS} FROM listings WHERE deleted_at IS NULL");
        let mut bind_index = 0;

        if params.category.is_some() {
            bind_index += 1;
            sql.push_str(&format!(" AND category = ${bind_index}"));
        }
        if params.min_price.is_some() {
            bind_index += 1;
            sql.push_str(&format!(" AND price >= ${bind_index}"));
        }
        if params.max_price.is_some() {
            bind_index += 1;
            sql.push_str(&format!(" AND price <= ${bind_index}"));
        }
        if params.location.is_some() {
            bind_index += 1;
            sql.push_str(&format!(" AND location ILIKE ${bind_index}"));
        }
        if params.query.is_some() {
            bind_index += 1;
            sql.push_str(&format!(
                " AND (title ILIKE ${bind_index} OR description ILIKE ${bind_index})"
            ));
        }

        sql.push_str(&format!(
            " ORDER BY created_at DESC LIMIT ${} OFFSET ${}",
            bind_index + 1,
            bind_index + 2
        ));

        let mut query = sqlx::query_as::<Postgres, Listing>(&sql);
        if let Some(category) = &params.category {
            query = query.bind(category.clone());
        }
        if let Some(min_price) = params.min_price {
            query = query.bind(min_price);
        }
        if let Some(max_price) = params.max_price {
            query = query.bind(max_price);
        }
        if let Some(location) = &params.location {
            query = query.bind(format!("%{location}%"));
        }
        if let Some(text) = &params.query {
            query = query.bind(format!("%{text}%"));
        }

        let listings = query.bind(limit).bind(offset).fetch_all(&self.pool).await?;
        Ok(listings)
    }

    async fn find_by_owner(&self, owner_id: Uuid) -> AppResult<Vec<Listing>> {
        let listings = sqlx::query_as::<_, Listing>(&format!(
            "SELECT {LISTING_COLUMNS} FROM listings \
             WHERE owner_id = $1 AND deleted_at IS NULL ORDER BY created_at DESC"
        ))
        .bind(owner_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(listings)
    }

    async fn create(&self, listing: &Listing) -> AppResult<Listing> {
        let created = sqlx::query_as::<_, Listing>(&format!(
            r#"
            INSERT INTO listings
                (id, owner_id, title, description, price, category, location, image_urls,
                 created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            RETURNING {LISTING_COLUMNS}
            "#
        ))
        .bind(listing.id)
        .bind(listing.owner_id)
        .bind(&listing.title)
        .bind(&listing.description)
        .bind(listing.price)
        .bind(&listing.category)
        .bind(&listing.location)
        .bind(&listing.image_urls)
        .bind(listing.created_at)
        .bind(listing.updated_at)
        .fetch_one(&self.pool)
        .await?;
        Ok(created)
    }

    async fn update(&self, listing: &Listing) -> AppResult<Listing> {
        let updated = sqlx::query_as::<_, Listing>(&format!(
            r#"
            UPDATE listings
            SET title = $2, description = $3, price = $4, category = $5, location = $6,
                image_urls = $7, updated_at = $8
            WHERE id = $1 AND deleted_at IS NULL
            RETURNING {LISTING_COLUMNS}
            "#
        ))
        .bind(listing.id)
        .bind(&listing.title)
        .bind(&listing.description)
        .bind(listing.price)
        .bind(&listing.category)
        .bind(&listing.location)
        .bind(&listing.image_urls)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;
        Ok(updated)
    }

    async fn soft_delete(&self, id: Uuid, reason: &str, was_sold: bool) -> AppResult<()> {
        sqlx::query(
            r#"
            UPDATE listings
            SET deleted_at = $2, deletion_reason = $3, was_sold = $4, updated_at = $2
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(Utc::now())
        .bind(reason)
        .bind(was_sold)
        .execute(&self.pool)
        .await?;
        Ok(())
    }
}
