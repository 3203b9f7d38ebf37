use std::sync::Arc;

use chrono::Utc;
use tracing::info;
use uuid::Uuid;
use validator::Validate;

use crate::api::dtos::{
    ConversationResponse, CreateConversationRequest, MessageResponse, SendMessageRequest,
};
use crate::config::MessagingConfig;
use crate::domain::{Conversation, Message};
use crate::error::{AppError, AppResult};
use crate::infrastructure::repositories::{ConversationRepository, ListingRepository};

/// Outcome of a create-or-get call; `created` distinguishes a fresh thread
/// (201) from an existing one returned unchanged (200).
pub struct ConversationCreation {
    pub conversation: ConversationResponse,
    pub created: bool,
}

#[derive(Clone)]
pub struct MessagingService {
    listing_repo: Arc<dyn ListingRepository>,
    conversation_repo: Arc<dyn ConversationRepository>,
    config: MessagingConfig,
}

impl MessagingService {
    pub fn new(
        listing_repo: Arc<dyn ListingRepository>,
        conversation_repo: Arc<dyn ConversationRepository>,
        config: MessagingConfig,
    ) -> Self {
        Self {
            listing_repo,
            conversation_repo,
            config,
        }
    }

    /// Finds the buyer's conversation for a listing, creating it with the
    /// initial message on first contact. Idempotent: when the conversation
    /// already exists it is returned unchanged and the supplied message is
    /// discarded.
    pub async fn create_or_get_conversation(
        &self,
        buyer_id: Uuid,
        request: CreateConversationRequest,
    ) -> AppResult<ConversationCreation> {
        request.validate()?;
        ensure_not_blank(&request.initial_message)?;

        let listing = self
            .listing_repo
            .find_by_id(request.listing_id)
            .await?
            .ok_or_else(|| AppError::NotFound("listing not found".to_string()))?;
        let seller_id = listing.owner_id;

        if buyer_id == seller_id && !self.config.allow_self_messaging {
            return Err(AppError::BadRequest(
                "You cannot send a message to yourself".to_string(),
            ));
        }

        if let Some(existing) = self
            .conversation_repo
            .find_by_listing_and_participants(request.listing_id, buyer_id, seller_id)
            .await?
        {
            return Ok(ConversationCreation {
                conversation: self.compose_view(existing, buyer_id).await?,
                created: false,
            });
        }

        let now = Utc::now();
        let conversation = Conversation {
            id: Uuid::new_v4(),
            listing_id: request.listing_id,
            buyer_id,
            seller_id,
            created_at: now,
            // Matches the initial message's sent_at below.
            updated_at: now,
        };
        let initial_message = Message {
            id: Uuid::new_v4(),
            conversation_id: conversation.id,
            sender_id: buyer_id,
            content: request.initial_message,
            sent_at: now,
            is_read: false,
        };

        let created = match self
            .conversation_repo
            .create_with_initial_message(&conversation, &initial_message)
            .await
        {
            Ok(created) => created,
            Err(AppError::Conflict(_)) => {
                // Lost the first-contact race; the winner's row is now
                // visible, so fall back to returning it.
                let existing = self
                    .conversation_repo
                    .find_by_listing_and_participants(request.listing_id, buyer_id, seller_id)
                    .await?
                    .ok_or_else(|| {
                        AppError::InternalError(anyhow::anyhow!(
                            "conversation missing after unique-constraint conflict"
                        ))
                    })?;
                return Ok(ConversationCreation {
                    conversation: self.compose_view(existing, buyer_id).await?,
                    created: false,
                });
            }
            Err(error) => return Err(error),
        };

        info!(
            conversation_id = %created.id,
            listing_id = %listing.id,
            buyer_id = %buyer_id,
            seller_id = %seller_id,
            "conversation created"
        );

        Ok(ConversationCreation {
            conversation: self.compose_view(created, buyer_id).await?,
            created: true,
        })
    }

    pub async fn list_conversations_for_user(
        &self,
        user_id: Uuid,
    ) -> AppResult<Vec<ConversationResponse>> {
        let conversations = self.conversation_repo.find_for_user(user_id).await?;

        let mut views = Vec::with_capacity(conversations.len());
        for conversation in conversations {
            views.push(self.compose_view(conversation, user_id).await?);
        }
        Ok(views)
    }

    pub async fn get_conversation(
        &self,
        caller_id: Uuid,
        conversation_id: Uuid,
    ) -> AppResult<ConversationResponse> {
        let conversation = self.authorized_conversation(caller_id, conversation_id).await?;
        self.compose_view(conversation, caller_id).await
    }

    /// All buyer threads for a listing; restricted to the listing owner.
    pub async fn list_conversations_for_listing(
        &self,
        caller_id: Uuid,
        listing_id: Uuid,
    ) -> AppResult<Vec<ConversationResponse>> {
        let listing = self
            .listing_repo
            .find_by_id(listing_id)
            .await?
            .ok_or_else(|| AppError::NotFound("listing not found".to_string()))?;

        if listing.owner_id != caller_id {
            return Err(AppError::Forbidden(
                "Only the listing owner can view its conversations".to_string(),
            ));
        }

        let conversations = self.conversation_repo.find_for_listing(listing_id).await?;
        let mut views = Vec::with_capacity(conversations.len());
        for conversation in conversations {
            views.push(self.compose_view(conversation, caller_id).await?);
        }
        Ok(views)
    }

    pub async fn list_messages(
        &self,
        caller_id: Uuid,
        conversation_id: Uuid,
    ) -> AppResult<Vec<MessageResponse>> {
        self.authorized_conversation(caller_id, conversation_id)
            .await?;

        let messages = self.conversation_repo.find_messages(conversation_id).await?;
        Ok(messages.into_iter().map(MessageResponse::from).collect())
    }

    pub async fn send_message(
        &self,
        sender_id: Uuid,
        conversation_id: Uuid,
        request: SendMessageRequest,
    ) -> AppResult<MessageResponse> {
        request.validate()?;
        ensure_not_blank(&request.content)?;

        self.authorized_conversation(sender_id, conversation_id)
            .await?;

        let message = Message {
            id: Uuid::new_v4(),
            conversation_id,
            sender_id,
            content: request.content,
            sent_at: Utc::now(),
            is_read: false,
        };

        // append_message also bumps the conversation's updated_at to sent_at.
        let created = self.conversation_repo.append_message(&message).await?;
        Ok(MessageResponse::from(created))
    }

    /// Marks a single message read on behalf of its recipient. The sender of
    /// a message can never mark it read; non-participants are rejected the
    /// same way as for every other conversation operation.
    pub async fn mark_message_read(
        &self,
        caller_id: Uuid,
        conversation_id: Uuid,
        message_id: Uuid,
    ) -> AppResult<MessageResponse> {
        let conversation = self
            .conversation_repo
            .find_by_id(conversation_id)
            .await?
            .ok_or_else(|| AppError::NotFound("conversation not found".to_string()))?;

        let message = self
            .conversation_repo
            .find_message(conversation_id, message_id)
            .await?
            .ok_or_else(|| AppError::NotFound("message not found".to_string()))?;

        if !conversation.is_participant(caller_id) {
            return Err(AppError::Forbidden(
                "You are not a participant in this conversation".to_string(),
            ));
        }

        if message.sender_id == caller_id {
            return Err(AppError::BadRequest(
                "You cannot mark your own messages as read".to_string(),
            ));
        }

        if message.is_read {
            // false -> true is the only transition; repeat calls are no-ops.
            return Ok(MessageResponse::from(message));
        }

        let updated = self.conversation_repo.mark_message_read(message_id).await?;
        Ok(MessageResponse::from(updated))
    }

    /// Marks every message from the other participant as read and returns
    /// how many were updated.
    pub async fn mark_all_read(&self, caller_id: Uuid, conversation_id: Uuid) -> AppResult<u64> {
        self.authorized_conversation(caller_id, conversation_id)
            .await?;

        self.conversation_repo
            .mark_all_read(conversation_id, caller_id)
            .await
    }

    /// Cascade hook for the listing-deletion flow: hard-deletes every
    /// conversation attached to the listing, messages included.
    pub async fn delete_conversations_for_listing(&self, listing_id: Uuid) -> AppResult<u64> {
        let deleted = self.conversation_repo.delete_for_listing(listing_id).await?;
        info!(
            listing_id = %listing_id,
            deleted_conversations = deleted,
            "deleted conversations for listing"
        );
        Ok(deleted)
    }

    async fn authorized_conversation(
        &self,
        caller_id: Uuid,
        conversation_id: Uuid,
    ) -> AppResult<Conversation> {
        let conversation = self
            .conversation_repo
            .find_by_id(conversation_id)
            .await?
            .ok_or_else(|| AppError::NotFound("conversation not found".to_string()))?;

        if !conversation.is_participant(caller_id) {
            return Err(AppError::Forbidden(
                "You are not a participant in this conversation".to_string(),
            ));
        }

        Ok(conversation)
    }

    async fn compose_view(
        &self,
        conversation: Conversation,
        viewer_id: Uuid,
    ) -> AppResult<ConversationResponse> {
        let last_message = self
            .conversation_repo
            .find_last_message(conversation.id)
            .await?;
        let unread_count = self
            .conversation_repo
            .count_unread(conversation.id, viewer_id)
            .await?;
        let listing = self
            .listing_repo
            .find_by_id(conversation.listing_id)
            .await?;

        Ok(ConversationResponse {
            id: conversation.id,
            listing_id: conversation.listing_id,
            buyer_id: conversation.buyer_id,
            seller_id: conversation.seller_id,
            created_at: conversation.created_at,
            updated_at: conversation.updated_at,
            last_message: last_message.map(MessageResponse::from),
            unread_count,
            listing: listing.map(Into::into),
        })
    }
}

fn ensure_not_blank(content: &str) -> AppResult<()> {
    if content.trim().is_empty() {
        return Err(AppError::validation_error(
            "Message content cannot be blank",
        ));
    }
    Ok(())
}
