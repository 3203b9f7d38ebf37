mod conversation_repository;
mod favorite_repository;
mod listing_repository;
mod traits;
mod user_repository;

pub use conversation_repository::ConversationRepositoryImpl;
pub use favorite_repository::FavoriteRepositoryImpl;
pub use listing_repository::ListingRepositoryImpl;
pub use traits::{
    ConversationRepository, FavoriteRepository, ListingRepository, ListingSearchParams,
    UserRepository,
};
pub use user_repository::UserRepositoryImpl;
