use actix_web::{web, HttpResponse};
use uuid::Uuid;

use crate::api::dtos::{CreateConversationRequest, MarkAllReadResponse, SendMessageRequest};
use crate::api::routes::AppState;
use crate::error::AppResult;
use crate::middleware::AuthenticatedUser;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/conversations")
            .route("", web::get().to(list_conversations))
            .route("", web::post().to(create_conversation))
            // Registered before "/{id}" so the literal segment wins.
            .route(
                "/listing/{listing_id}",
                web::get().to(list_conversations_for_listing),
            )
            .route("/{id}", web::get().to(get_conversation))
            .route("/{id}/messages", web::get().to(list_messages))
            .route("/{id}/messages", web::post().to(send_message))
            .route(
                "/{id}/messages/mark-all-read",
                web::put().to(mark_all_read),
            )
            .route(
                "/{id}/messages/{message_id}/read",
                web::put().to(mark_message_read),
            ),
    );
}

#[utoipa::path(
    get,
    path = "/api/v1/conversations",
    responses(
        (status = 200, description = "Conversations for the caller, most recently active first"),
        (status = 401, description = "Not authenticated"),
    ),
    tag = "conversations"
)]
pub async fn list_conversations(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
) -> AppResult<HttpResponse> {
    let result = state
        .messaging_service
        .list_conversations_for_user(user.user_id)
        .await?;
    Ok(HttpResponse::Ok().json(result))
}

#[utoipa::path(
    post,
    path = "/api/v1/conversations",
    request_body = CreateConversationRequest,
    responses(
        (status = 201, description = "Conversation created with the initial message"),
        (status = 200, description = "Conversation already existed; returned unchanged"),
        (status = 400, description = "Self-messaging disabled or invalid message"),
        (status = 404, description = "Listing not found"),
    ),
    tag = "conversations"
)]
pub async fn create_conversation(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
    payload: web::Json<CreateConversationRequest>,
) -> AppResult<HttpResponse> {
    let result = state
        .messaging_service
        .create_or_get_conversation(user.user_id, payload.into_inner())
        .await?;

    if result.created {
        Ok(HttpResponse::Created().json(result.conversation))
    } else {
        Ok(HttpResponse::Ok().json(result.conversation))
    }
}

#[utoipa::path(
    get,
    path = "/api/v1/conversations/{id}",
    responses(
        (status = 200, description = "The conversation with last message and unread count"),
        (status = 403, description = "Caller is not a participant"),
        (status = 404, description = "Conversation not found"),
    ),
    tag = "conversations"
)]
pub async fn get_conversation(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let result = state
        .messaging_service
        .get_conversation(user.user_id, path.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(result))
}

#[utoipa::path(
    get,
    path = "/api/v1/conversations/listing/{listing_id}",
    responses(
        (status = 200, description = "All buyer threads for the listing"),
        (status = 403, description = "Caller is not the listing owner"),
        (status = 404, description = "Listing not found"),
    ),
    tag = "conversations"
)]
pub async fn list_conversations_for_listing(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let result = state
        .messaging_service
        .list_conversations_for_listing(user.user_id, path.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(result))
}

#[utoipa::path(
    get,
    path = "/api/v1/conversations/{id}/messages",
    responses(
        (status = 200, description = "Messages in chronological order"),
        (status = 403, description = "Caller is not a participant"),
        (status = 404, description = "Conversation not found"),
    ),
    tag = "conversations"
)]
pub async fn list_messages(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let result = state
        .messaging_service
        .list_messages(user.user_id, path.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(result))
}

#[utoipa::path(
    post,
    path = "/api/v1/conversations/{id}/messages",
    request_body = SendMessageRequest,
    responses(
        (status = 201, description = "Message appended"),
        (status = 400, description = "Invalid message content"),
        (status = 403, description = "Caller is not a participant"),
        (status = 404, description = "Conversation not found"),
    ),
    tag = "conversations"
)]
pub async fn send_message(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
    path: web::Path<Uuid>,
    payload: web::Json<SendMessageRequest>,
) -> AppResult<HttpResponse> {
    let result = state
        .messaging_service
        .send_message(user.user_id, path.into_inner(), payload.into_inner())
        .await?;
    Ok(HttpResponse::Created().json(result))
}

#[utoipa::path(
    put,
    path = "/api/v1/conversations/{id}/messages/{message_id}/read",
    responses(
        (status = 200, description = "Message marked read"),
        (status = 400, description = "Sender cannot mark their own message read"),
        (status = 403, description = "Caller is not a participant"),
        (status = 404, description = "Conversation or message not found"),
    ),
    tag = "conversations"
)]
pub async fn mark_message_read(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
    path: web::Path<(Uuid, Uuid)>,
) -> AppResult<HttpResponse> {
    let (conversation_id, message_id) = path.into_inner();
    let result = state
        .messaging_service
        .mark_message_read(user.user_id, conversation_id, message_id)
        .await?;
    Ok(HttpResponse::Ok().json(result))
}

#[utoipa::path(
    put,
    path = "/api/v1/conversations/{id}/messages/mark-all-read",
    responses(
        (status = 200, description = "Unread messages from the other participant marked read"),
        (status = 403, description = "Caller is not a participant"),
        (status = 404, description = "Conversation not found"),
    ),
    tag = "conversations"
)]
pub async fn mark_all_read(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let updated = state
        .messaging_service
        .mark_all_read(user.user_id, path.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(MarkAllReadResponse { updated }))
}
