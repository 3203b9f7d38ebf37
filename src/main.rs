use std::sync::Arc;
use std::time::Instant;

use actix_web::dev::Service as _;
use actix_web::{middleware::Logger, web, App, HttpServer};
use classifieds_backend::api::{openapi, routes, routes::AppState};
use classifieds_backend::application::{
    FavoriteService, ListingService, MessagingService, UserService,
};
use classifieds_backend::config::AppConfig;
use classifieds_backend::infrastructure::db::{migrations::run_migrations, pool::create_pool};
use classifieds_backend::infrastructure::repositories::{
    ConversationRepositoryImpl, FavoriteRepositoryImpl, ListingRepositoryImpl, UserRepositoryImpl,
};
use classifieds_backend::observability::error_tracking::capture_unexpected_5xx;
use classifieds_backend::observability::AppMetrics;
use classifieds_backend::security::{cors_middleware, security_headers};
use tracing::info;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};
use uuid::Uuid;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenvy::dotenv().ok();

    let config = AppConfig::from_env().expect("failed to load application configuration");

    let filter = EnvFilter::new(config.logging.level.clone());
    if config.logging.json_format {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .json()
                    .with_current_span(true)
                    .with_span_list(true),
            )
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer())
            .init();
    }

    let pool = create_pool(&config.database)
        .await
        .expect("failed to create database pool");

    run_migrations(&pool)
        .await
        .expect("database migrations failed");

    let user_repo = Arc::new(UserRepositoryImpl::new(pool.clone()));
    let listing_repo = Arc::new(ListingRepositoryImpl::new(pool.clone()));
    let conversation_repo = Arc::new(ConversationRepositoryImpl::new(pool.clone()));
    let favorite_repo = Arc::new(FavoriteRepositoryImpl::new(pool.clone()));

    let messaging_service = Arc::new(MessagingService::new(
        listing_repo.clone(),
        conversation_repo,
        config.messaging.clone(),
    ));

    let state = AppState {
        user_service: Arc::new(UserService::new(user_repo.clone())),
        listing_service: Arc::new(ListingService::new(
            user_repo,
            listing_repo.clone(),
            messaging_service.clone(),
        )),
        favorite_service: Arc::new(FavoriteService::new(listing_repo, favorite_repo)),
        messaging_service,
        security: config.security.clone(),
        app_environment: config.app.environment.clone(),
        metrics: Arc::new(AppMetrics::default()),
        db_pool: Some(pool.clone()),
    };

    let bind_host = config.app.host.clone();
    let bind_port = config.app.port;
    let security_config = config.security.clone();
    let auth_config = config.auth.clone();
    let metrics = state.metrics.clone();

    info!(host = %bind_host, port = bind_port, "starting classifieds backend");

    HttpServer::new(move || {
        let metrics = metrics.clone();
        App::new()
            .wrap(Logger::default())
            .wrap_fn(move |req, srv| {
                let request_id = Uuid::new_v4().to_string();
                let path = req.path().to_string();
                let method = req.method().to_string();
                let metrics = metrics.clone();
                let start = Instant::now();

                let fut = srv.call(req);
                async move {
                    match fut.await {
                        Ok(mut response) => {
                            response.headers_mut().insert(
                                actix_web::http::header::HeaderName::from_static("x-request-id"),
                                actix_web::http::header::HeaderValue::from_str(&request_id)
                                    .unwrap_or_else(|_| {
                                        actix_web::http::header::HeaderValue::from_static(
                                            "invalid-request-id",
                                        )
                                    }),
                            );

                            let status = response.status().as_u16();
                            let latency_ms = start.elapsed().as_millis() as u64;
                            metrics.record_request(status, latency_ms);

                            info!(
                                request_id = %request_id,
                                method = %method,
                                path = %path,
                                status = status,
                                latency_ms = latency_ms,
                                "request completed"
                            );

                            if status >= 500 {
                                let _ = capture_unexpected_5xx(&path, &method, status, &request_id);
                            }
                            Ok(response)
                        }
                        Err(error) => Err(error),
                    }
                }
            })
            .wrap(cors_middleware(&security_config))
            .wrap(security_headers())
            .app_data(web::Data::new(state.clone()))
            .app_data(web::Data::new(auth_config.clone()))
            .configure(routes::configure)
            .configure(openapi::configure_swagger_ui)
    })
    .bind((bind_host, bind_port))?
    .run()
    .await
}
