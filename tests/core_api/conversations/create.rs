use actix_web::{http::StatusCode, test as actix_test, web, App};
use classifieds_backend::api::routes;
use classifieds_backend::security::{cors_middleware, security_headers};
use serde_json::json;
use uuid::Uuid;

use crate::common;
use crate::common::fixtures::{test_listing, test_user};

#[actix_rt::test]
async fn create_conversation_returns_201_with_composed_view() {
    let repos = common::test_repos();
    let seller = test_user();
    let buyer = test_user();
    let listing = test_listing(seller.id);
    repos.listings.push(listing.clone());
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

    let token = common::bearer_token(buyer.id, "user");
    let request = actix_test::TestRequest::post()
        .uri("/api/v1/conversations")
        .insert_header(("Authorization", format!("Bearer {token}")))
        .set_json(json!({
            "listing_id": listing.id,
            "initial_message": "Bonjour, is this still available?",
        }))
        .to_request();
    let response = actix_test::call_service(&app, request).await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let body: serde_json::Value = actix_test::read_body_json(response).await;
    assert_eq!(body["listing_id"], json!(listing.id));
    assert_eq!(body["buyer_id"], json!(buyer.id));
    assert_eq!(body["seller_id"], json!(seller.id));
    assert_eq!(body["unread_count"], 0);
    assert_eq!(
        body["last_message"]["content"],
        "Bonjour, is this still available?"
    );
    assert_eq!(body["last_message"]["is_read"], false);
    assert_eq!(body["listing"]["id"], json!(listing.id));
}

#[actix_rt::test]
async fn create_conversation_twice_returns_200_and_same_id() {
    let repos = common::test_repos();
    let seller = test_user();
    let buyer = test_user();
    let listing = test_listing(seller.id);
    repos.listings.push(listing.clone());
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

    let token = common::bearer_token(buyer.id, "user");

    let request = actix_test::TestRequest::post()
        .uri("/api/v1/conversations")
        .insert_header(("Authorization", format!("Bearer {token}")))
        .set_json(json!({"listing_id": listing.id, "initial_message": "Hi"}))
        .to_request();
    let response = actix_test::call_service(&app, request).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let first: serde_json::Value = actix_test::read_body_json(response).await;

    let request = actix_test::TestRequest::post()
        .uri("/api/v1/conversations")
        .insert_header(("Authorization", format!("Bearer {token}")))
        .set_json(json!({"listing_id": listing.id, "initial_message": "Hi again"}))
        .to_request();
    let response = actix_test::call_service(&app, request).await;
    assert_eq!(response.status(), StatusCode::OK);
    let second: serde_json::Value = actix_test::read_body_json(response).await;

    assert_eq!(first["id"], second["id"]);
    // The resubmitted message was discarded, the original is still last.
    assert_eq!(second["last_message"]["content"], "Hi");
}

#[actix_rt::test]
async fn create_conversation_fails_for_unknown_listing() {
    let repos = common::test_repos();
    let buyer = test_user();
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

    let token = common::bearer_token(buyer.id, "user");
    let request = actix_test::TestRequest::post()
        .uri("/api/v1/conversations")
        .insert_header(("Authorization", format!("Bearer {token}")))
        .set_json(json!({"listing_id": Uuid::new_v4(), "initial_message": "Hi"}))
        .to_request();
    let response = actix_test::call_service(&app, request).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[actix_rt::test]
async fn create_conversation_rejects_messaging_own_listing() {
    let repos = common::test_repos();
    let seller = test_user();
    let listing = test_listing(seller.id);
    repos.listings.push(listing.clone());
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

    let token = common::bearer_token(seller.id, "user");
    let request = actix_test::TestRequest::post()
        .uri("/api/v1/conversations")
        .insert_header(("Authorization", format!("Bearer {token}")))
        .set_json(json!({"listing_id": listing.id, "initial_message": "Hello me"}))
        .to_request();
    let response = actix_test::call_service(&app, request).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[actix_rt::test]
async fn create_conversation_rejects_blank_initial_message() {
    let repos = common::test_repos();
    let seller = test_user();
    let buyer = test_user();
    let listing = test_listing(seller.id);
    repos.listings.push(listing.clone());
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

    let token = common::bearer_token(buyer.id, "user");
    let request = actix_test::TestRequest::post()
        .uri("/api/v1/conversations")
        .insert_header(("Authorization", format!("Bearer {token}")))
        .set_json(json!({"listing_id": listing.id, "initial_message": "   "}))
        .to_request();
    let response = actix_test::call_service(&app, request).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[actix_rt::test]
async fn create_conversation_requires_authentication() {
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

    let request = actix_test::TestRequest::post()
        .uri("/api/v1/conversations")
        .set_json(json!({"listing_id": Uuid::new_v4(), "initial_message": "Hi"}))
        .to_request();
    let response = actix_test::call_service(&app, request).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}
