use actix_web::{web, HttpResponse};
use uuid::Uuid;

use crate::api::routes::AppState;
use crate::error::AppResult;
use crate::middleware::AuthenticatedUser;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/favorites")
            .route("", web::get().to(list_favorites))
            .route("/listings", web::get().to(list_favorite_listings))
            .route("/{listing_id}", web::post().to(add_favorite))
            .route("/{listing_id}", web::delete().to(remove_favorite)),
    );
}

async fn list_favorites(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
) -> AppResult<HttpResponse> {
    let result = state.favorite_service.list(user.user_id).await?;
    Ok(HttpResponse::Ok().json(result))
}

async fn list_favorite_listings(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
) -> AppResult<HttpResponse> {
    let result = state.favorite_service.list_listings(user.user_id).await?;
    Ok(HttpResponse::Ok().json(result))
}

async fn add_favorite(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let result = state
        .favorite_service
        .add(user.user_id, path.into_inner())
        .await?;
    Ok(HttpResponse::Created().json(result))
}

async fn remove_favorite(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    state
        .favorite_service
        .remove(user.user_id, path.into_inner())
        .await?;
    Ok(HttpResponse::NoContent().finish())
}
