use actix_web::{http::StatusCode, test as actix_test, web, App};
use classifieds_backend::api::routes;
use classifieds_backend::security::{cors_middleware, security_headers};
use uuid::Uuid;

use crate::common;

#[actix_rt::test]
async fn me_provisions_user_from_token_claims() {
    let repos = common::test_repos();
    let user_id = Uuid::new_v4();
    let state = common::app_state(&repos);

    let app = actix_test::init_service(
        App::new()
            .wrap(cors_middleware(&common::security_config()))
            .wrap(security_headers())
            .app_data(web::Data::new(common::auth_config()))
            .app_data(web::Data::new(state))
            .configure(routes::configure),
    )
    .await;

    let token =
        common::bearer_token_with_profile(user_id, "user", "alice@example.com", "Alice");
    let request = actix_test::TestRequest::get()
        .uri("/api/v1/users/me")
        .insert_header(("Authorization", format!("Bearer {token}")))
        .to_request();
    let response = actix_test::call_service(&app, request).await;
    assert_eq!(response.status(), StatusCode::OK);

    let body: serde_json::Value = actix_test::read_body_json(response).await;
    assert_eq!(body["id"], serde_json::json!(user_id));
    assert_eq!(body["email"], "alice@example.com");
    assert_eq!(body["name"], "Alice");
    assert_eq!(body["role"], "user");

    // The profile was persisted.
    assert_eq!(repos.users.users.lock().unwrap().len(), 1);
}

#[actix_rt::test]
async fn me_keeps_profile_in_sync_with_claims() {
    let repos = common::test_repos();
    let user_id = Uuid::new_v4();
    let state = common::app_state(&repos);

    let app = actix_test::init_service(
        App::new()
            .wrap(cors_middleware(&common::security_config()))
            .wrap(security_headers())
            .app_data(web::Data::new(common::auth_config()))
            .app_data(web::Data::new(state))
            .configure(routes::configure),
    )
    .await;

    let token =
        common::bearer_token_with_profile(user_id, "user", "alice@example.com", "Alice");
    let request = actix_test::TestRequest::get()
        .uri("/api/v1/users/me")
        .insert_header(("Authorization", format!("Bearer {token}")))
        .to_request();
    actix_test::call_service(&app, request).await;

    let renamed =
        common::bearer_token_with_profile(user_id, "user", "alice@example.com", "Alice B.");
    let request = actix_test::TestRequest::get()
        .uri("/api/v1/users/me")
        .insert_header(("Authorization", format!("Bearer {renamed}")))
        .to_request();
    let response = actix_test::call_service(&app, request).await;
    let body: serde_json::Value = actix_test::read_body_json(response).await;

    assert_eq!(body["name"], "Alice B.");
    assert_eq!(repos.users.users.lock().unwrap().len(), 1);
}

#[actix_rt::test]
async fn me_requires_authentication() {
    let repos = common::test_repos();
    let state = common::app_state(&repos);

    let app = actix_test::init_service(
        App::new()
            .wrap(cors_middleware(&common::security_config()))
            .wrap(security_headers())
            .app_data(web::Data::new(common::auth_config()))
            .app_data(web::Data::new(state))
            .configure(routes::configure),
    )
    .await;

    let request = actix_test::TestRequest::get()
        .uri("/api/v1/users/me")
        .to_request();
    let response = actix_test::call_service(&app, request).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}
