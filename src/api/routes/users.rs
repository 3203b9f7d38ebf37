use actix_web::{web, HttpResponse};

use crate::api::routes::AppState;
use crate::error::AppResult;
use crate::middleware::AuthenticatedUser;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(web::scope("/users").route("/me", web::get().to(me)));
}

async fn me(state: web::Data<AppState>, user: AuthenticatedUser) -> AppResult<HttpResponse> {
    let result = state
        .user_service
        .get_or_provision(user.user_id, user.email, user.name)
        .await?;
    Ok(HttpResponse::Ok().json(result))
}
