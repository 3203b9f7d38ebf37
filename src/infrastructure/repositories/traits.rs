use crate::domain::{Conversation, Favorite, Listing, Message, User};
use crate::error::AppResult;
use async_trait::async_trait;
use rust_decimal::Decimal;
use uuid::Uuid;

#[derive(Debug, Clone, Default)]
pub struct ListingSearchParams {
    pub category: Option<String>,
    pub min_price: Option<Decimal>,
    pub max_price: Option<Decimal>,
    pub location: Option<String>,
    pub query: Option<String>,
}

impl ListingSearchParams {
    pub fn has_filters(&self) -> bool {
        self.category.is_some()
            || self.min_price.is_some()
            || self.max_price.is_some()
            || self.location.is_some()
            || self.query.is_some()
    }
}

#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<User>>;
    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>>;
    async fn upsert(&self, user: &User) -> AppResult<User>;
}

#[async_trait]
pub trait ListingRepository: Send + Sync {
    /// Returns only live listings; soft-deleted rows are treated as absent.
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Listing>>;
    async fn find_all(
        &self,
        params: &ListingSearchParams,
        limit: i64,
        offset: i64,
    ) -> AppResult<Vec<Listing>>;
    async fn find_by_owner(&self, owner_id: Uuid) -> AppResult<Vec<Listing>>;
    async fn create(&self, listing: &Listing) -> AppResult<Listing>;
    async fn update(&self, listing: &Listing) -> AppResult<Listing>;
    async fn soft_delete(&self, id: Uuid, reason: &str, was_sold: bool) -> AppResult<()>;
}

/// Store for conversations and their owned messages.
///
/// Every mutation is atomic against the backing store. Creation enforces the
/// one-conversation-per-(listing, buyer, seller) invariant with a unique
/// constraint; a lost first-contact race surfaces as `AppError::Conflict`.
#[async_trait]
pub trait ConversationRepository: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Conversation>>;
    async fn find_by_listing_and_participants(
        &self,
        listing_id: Uuid,
        buyer_id: Uuid,
        seller_id: Uuid,
    ) -> AppResult<Option<Conversation>>;
    /// Conversations where the user is buyer or seller, most recently
    /// active first.
    async fn find_for_user(&self, user_id: Uuid) -> AppResult<Vec<Conversation>>;
    async fn find_for_listing(&self, listing_id: Uuid) -> AppResult<Vec<Conversation>>;
    async fn create_with_initial_message(
        &self,
        conversation: &Conversation,
        initial_message: &Message,
    ) -> AppResult<Conversation>;

    /// Messages in chronological (`sent_at` ascending) order.
    async fn find_messages(&self, conversation_id: Uuid) -> AppResult<Vec<Message>>;
    async fn find_last_message(&self, conversation_id: Uuid) -> AppResult<Option<Message>>;
    async fn find_message(
        &self,
        conversation_id: Uuid,
        message_id: Uuid,
    ) -> AppResult<Option<Message>>;
    /// Messages sent by the other participant that the user has not read.
    async fn count_unread(&self, conversation_id: Uuid, user_id: Uuid) -> AppResult<i64>;
    /// Appends the message and bumps the conversation's `updated_at` to the
    /// message's `sent_at` in the same transaction.
    async fn append_message(&self, message: &Message) -> AppResult<Message>;
    async fn mark_message_read(&self, message_id: Uuid) -> AppResult<Message>;
    async fn mark_all_read(&self, conversation_id: Uuid, user_id: Uuid) -> AppResult<u64>;
    /// Hard-deletes every conversation for the listing together with its
    /// messages. Returns the number of conversations removed.
    async fn delete_for_listing(&self, listing_id: Uuid) -> AppResult<u64>;
}

#[async_trait]
pub trait FavoriteRepository: Send + Sync {
    async fn find_for_user(&self, user_id: Uuid) -> AppResult<Vec<Favorite>>;
    async fn create(&self, favorite: &Favorite) -> AppResult<Favorite>;
    async fn delete(&self, user_id: Uuid, listing_id: Uuid) -> AppResult<bool>;
}
