use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[derive(OpenApi)]
#[openapi(
    paths(
        // Conversation endpoints
        crate::api::routes::messages::list_conversations,
        crate::api::routes::messages::create_conversation,
        crate::api::routes::messages::get_conversation,
        crate::api::routes::messages::list_conversations_for_listing,
        crate::api::routes::messages::list_messages,
        crate::api::routes::messages::send_message,
        crate::api::routes::messages::mark_message_read,
        crate::api::routes::messages::mark_all_read,
        // Health checks
        crate::api::routes::health,
        crate::api::routes::ready,
    ),
    components(
        schemas(
            crate::api::dtos::message_dto::CreateConversationRequest,
            crate::api::dtos::message_dto::SendMessageRequest,
            crate::api::dtos::message_dto::ConversationResponse,
            crate::api::dtos::message_dto::MessageResponse,
            crate::api::dtos::message_dto::MarkAllReadResponse,
            crate::api::dtos::listing_dto::ListingResponse,
        )
    ),
    tags(
        (name = "conversations", description = "Buyer/seller messaging per listing"),
        (name = "health", description = "Health check endpoints"),
    ),
    info(
        title = "Classifieds Backend API",
        version = "0.1.0",
        description = "Classifieds marketplace backend API",
    )
)]
pub struct ApiDoc;

pub fn configure_swagger_ui(cfg: &mut actix_web::web::ServiceConfig) {
    cfg.service(
        SwaggerUi::new("/swagger-ui/{_:.*}").url("/api-docs/openapi.json", ApiDoc::openapi()),
    );
}
