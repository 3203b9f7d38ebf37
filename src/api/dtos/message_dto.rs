use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use super::listing_dto::ListingResponse;
use crate::domain::Message;

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateConversationRequest {
    pub listing_id: Uuid,
    #[validate(length(min = 1, max = 5000, message = "Initial message must be 1-5000 characters"))]
    pub initial_message: String,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct SendMessageRequest {
    #[validate(length(min = 1, max = 5000, message = "Message must be 1-5000 characters"))]
    pub content: String,
}

#[derive(Debug, Serialize, Clone, ToSchema)]
pub struct MessageResponse {
    pub id: Uuid,
    pub conversation_id: Uuid,
    pub sender_id: Uuid,
    pub content: String,
    pub sent_at: DateTime<Utc>,
    pub is_read: bool,
}

impl From<Message> for MessageResponse {
    fn from(message: Message) -> Self {
        Self {
            id: message.id,
            conversation_id: message.conversation_id,
            sender_id: message.sender_id,
            content: message.content,
            sent_at: message.sent_at,
            is_read: message.is_read,
        }
    }
}

/// A conversation as presented to one of its participants: the thread header
/// plus the latest message, the viewer's unread count, and the listing the
/// thread is about (absent if the listing has since disappeared).
#[derive(Debug, Serialize, ToSchema)]
pub struct ConversationResponse {
    pub id: Uuid,
    pub listing_id: Uuid,
    pub buyer_id: Uuid,
    pub seller_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub last_message: Option<MessageResponse>,
    pub unread_count: i64,
    pub listing: Option<ListingResponse>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct MarkAllReadResponse {
    pub updated: u64,
}
