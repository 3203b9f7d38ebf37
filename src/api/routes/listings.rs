use actix_web::{web, HttpResponse};
use uuid::Uuid;

use crate::api::dtos::{
    CreateListingRequest, DeleteListingRequest, ListingQueryParams, UpdateListingRequest,
};
use crate::api::routes::AppState;
use crate::error::AppResult;
use crate::middleware::AuthenticatedUser;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/listings")
            .route("", web::get().to(list_listings))
            .route("", web::post().to(create_listing))
            // Registered before "/{id}" so the literal segment wins.
            .route("/me", web::get().to(list_own_listings))
            .route("/{id}", web::get().to(get_listing))
            .route("/{id}", web::put().to(update_listing))
            .route("/{id}", web::delete().to(delete_listing)),
    );
}

async fn list_listings(
    state: web::Data<AppState>,
    query: web::Query<ListingQueryParams>,
) -> AppResult<HttpResponse> {
    let result = state.listing_service.list(query.into_inner()).await?;
    Ok(HttpResponse::Ok().json(result))
}

async fn get_listing(state: web::Data<AppState>, path: web::Path<Uuid>) -> AppResult<HttpResponse> {
    let result = state.listing_service.get_by_id(path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(result))
}

async fn list_own_listings(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
) -> AppResult<HttpResponse> {
    let result = state.listing_service.list_own(user.user_id).await?;
    Ok(HttpResponse::Ok().json(result))
}

async fn create_listing(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
    payload: web::Json<CreateListingRequest>,
) -> AppResult<HttpResponse> {
    let result = state
        .listing_service
        .create(user.user_id, payload.into_inner())
        .await?;
    Ok(HttpResponse::Created().json(result))
}

async fn update_listing(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
    path: web::Path<Uuid>,
    payload: web::Json<UpdateListingRequest>,
) -> AppResult<HttpResponse> {
    let result = state
        .listing_service
        .update(user.user_id, path.into_inner(), payload.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(result))
}

async fn delete_listing(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
    path: web::Path<Uuid>,
    payload: web::Json<DeleteListingRequest>,
) -> AppResult<HttpResponse> {
    state
        .listing_service
        .delete(user.user_id, path.into_inner(), payload.into_inner())
        .await?;
    Ok(HttpResponse::NoContent().finish())
}
