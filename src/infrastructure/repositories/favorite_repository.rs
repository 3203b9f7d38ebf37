use super::traits::FavoriteRepository;
use crate::domain::Favorite;
use crate::error::AppResult;
use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

pub struct FavoriteRepositoryImpl {
    pool: PgPool,
}

impl FavoriteRepositoryImpl {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl FavoriteRepository for FavoriteRepositoryImpl {
    async fn find_for_user(&self, user_id: Uuid) -> AppResult<Vec<Favorite>> {
        let favorites = sqlx::query_as::<_, Favorite>(
            r#"
            SELECT id, user_id, listing_id, created_at
            FROM favorites
            WHERE user_id = $1
            ORDER BY created_at DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(favorites)
    }

    async fn create(&self, favorite: &Favorite) -> AppResult<Favorite> {
        let created = sqlx::query_as::<_, Favorite>(
            r#"
            INSERT INTO favorites (id, user_id, listing_id, created_at)
            VALUES ($1, $2, $3, $4)
            RETURNING id, user_id, listing_id, created_at
            "#,
        )
        .bind(favorite.id)
        .bind(favorite.user_id)
        .bind(favorite.listing_id)
        .bind(favorite.created_at)
        .fetch_one(&self.pool)
        .await?;
        Ok(created)
    }

    async fn delete(&self, user_id: Uuid, listing_id: Uuid) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM favorites WHERE user_id = $1 AND listing_id = $2")
            .bind(user_id)
            .bind(listing_id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
