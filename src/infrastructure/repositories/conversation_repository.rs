use super::traits::ConversationRepository;
use crate::domain::{Conversation, Message};
use crate::error::AppResult;
use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

pub struct ConversationRepositoryImpl {
    pool: PgPool,
}

impl ConversationRepositoryImpl {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ConversationRepository for ConversationRepositoryImpl {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Conversation>> {
        let conversation = sqlx::query_as::<_, Conversation>(
            r#"
            SELECT id, listing_id, buyer_id, seller_id, created_at, updated_at
            FROM conversations
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(conversation)
    }

    async fn find_by_listing_and_participants(
        &self,
        listing_id: Uuid,
        buyer_id: Uuid,
        seller_id: Uuid,
    ) -> AppResult<Option<Conversation>> {
        let conversation = sqlx::query_as::<_, Conversation>(
            r#"
            SELECT id, listing_id, buyer_id, seller_id, created_at, updated_at
            FROM conversations
            WHERE listing_id = $1 AND buyer_id = $2 AND seller_id = $3
            "#,
        )
        .bind(listing_id)
        .bind(buyer_id)
        .bind(seller_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(conversation)
    }

    async fn find_for_user(&self, user_id: Uuid) -> AppResult<Vec<Conversation>> {
        let conversations = sqlx::query_as::<_, Conversation>(
            r#"
            SELECT id, listing_id, buyer_id, seller_id, created_at, updated_at
            FROM conversations
            WHERE buyer_id = $1 OR seller_id = $1
            ORDER BY updated_at DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(conversations)
    }

    async fn find_for_listing(&self, listing_id: Uuid) -> AppResult<Vec<Conversation>> {
        let conversations = sqlx::query_as::<_, Conversation>(
            r#"
            SELECT id, listing_id, buyer_id, seller_id, created_at, updated_at
            FROM conversations
            WHERE listing_id = $1
            ORDER BY updated_at DESC
            "#,
        )
        .bind(listing_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(conversations)
    }

    async fn create_with_initial_message(
        &self,
        conversation: &Conversation,
        initial_message: &Message,
    ) -> AppResult<Conversation> {
        let mut tx = self.pool.begin().await?;

        let created: Conversation = sqlx::query_as(
            r#"
            INSERT INTO conversations (id, listing_id, buyer_id, seller_id, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, listing_id, buyer_id, seller_id, created_at, updated_at
            "#,
        )
        .bind(conversation.id)
        .bind(conversation.listing_id)
        .bind(conversation.buyer_id)
        .bind(conversation.seller_id)
        .bind(conversation.created_at)
        .bind(conversation.updated_at)
        .fetch_one(&mut *tx)
        .await?;

        sqlx::query(
            r#"
            INSERT INTO messages (id, conversation_id, sender_id, content, sent_at, is_read)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(initial_message.id)
        .bind(initial_message.conversation_id)
        .bind(initial_message.sender_id)
        .bind(&initial_message.content)
        .bind(initial_message.sent_at)
        .bind(initial_message.is_read)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(created)
    }

    async fn find_messages(&self, conversation_id: Uuid) -> AppResult<Vec<Message>> {
        let messages = sqlx::query_as::<_, Message>(
            r#"
            SELECT id, conversation_id, sender_id, content, sent_at, is_read
            FROM messages
            WHERE conversation_id = $1
            ORDER BY sent_at ASC
            "#,
        )
        .bind(conversation_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(messages)
    }

    async fn find_last_message(&self, conversation_id: Uuid) -> AppResult<Option<Message>> {
        let message = sqlx::query_as::<_, Message>(
            r#"
            SELECT id, conversation_id, sender_id, content, sent_at, is_read
            FROM messages
            WHERE conversation_id = $1
            ORDER BY sent_at DESC
            LIMIT 1
            "#,
        )
        .bind(conversation_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(message)
    }

    async fn find_message(
        &self,
        conversation_id: Uuid,
        message_id: Uuid,
    ) -> AppResult<Option<Message>> {
        let message = sqlx::query_as::<_, Message>(
            r#"
            SELECT id, conversation_id, sender_id, content, sent_at, is_read
            FROM messages
            WHERE id = $1 AND conversation_id = $2
            "#,
        )
        .bind(message_id)
        .bind(conversation_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(message)
    }

    async fn count_unread(&self, conversation_id: Uuid, user_id: Uuid) -> AppResult<i64> {
        let count: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*)
            FROM messages
            WHERE conversation_id = $1 AND sender_id != $2 AND is_read = FALSE
            "#,
        )
        .bind(conversation_id)
        .bind(user_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(count)
    }

    async fn append_message(&self, message: &Message) -> AppResult<Message> {
        let mut tx = self.pool.begin().await?;

        let created = sqlx::query_as::<_, Message>(
            r#"
            INSERT INTO messages (id, conversation_id, sender_id, content, sent_at, is_read)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, conversation_id, sender_id, content, sent_at, is_read
            "#,
        )
        .bind(message.id)
        .bind(message.conversation_id)
        .bind(message.sender_id)
        .bind(&message.content)
        .bind(message.sent_at)
        .bind(message.is_read)
        .fetch_one(&mut *tx)
        .await?;

        sqlx::query("UPDATE conversations SET updated_at = $2 WHERE id = $1")
            .bind(message.conversation_id)
            .bind(message.sent_at)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(created)
    }

    async fn mark_message_read(&self, message_id: Uuid) -> AppResult<Message> {
        let updated = sqlx::query_as::<_, Message>(
            r#"
            UPDATE messages
            SET is_read = TRUE
            WHERE id = $1
            RETURNING id, conversation_id, sender_id, content, sent_at, is_read
            "#,
        )
        .bind(message_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(updated)
    }

    async fn mark_all_read(&self, conversation_id: Uuid, user_id: Uuid) -> AppResult<u64> {
        let result = sqlx::query(
            r#"
            UPDATE messages
            SET is_read = TRUE
            WHERE conversation_id = $1 AND sender_id != $2 AND is_read = FALSE
            "#,
        )
        .bind(conversation_id)
        .bind(user_id)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected())
    }

    async fn delete_for_listing(&self, listing_id: Uuid) -> AppResult<u64> {
        let mut tx = self.pool.begin().await?;

        // Messages first: the FK from messages to conversations has no
        // ON DELETE action, the cascade is this explicit transaction.
        sqlx::query(
            r#"
            DELETE FROM messages
            WHERE conversation_id IN (SELECT id FROM conversations WHERE listing_id = $1)
            "#,
        )
        .bind(listing_id)
        .execute(&mut *tx)
        .await?;

        let deleted = sqlx::query("DELETE FROM conversations WHERE listing_id = $1")
            .bind(listing_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(deleted.rows_affected())
    }
}
