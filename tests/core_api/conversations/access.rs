use actix_web::{http::StatusCode, test as actix_test, web, App};
use chrono::Utc;
use classifieds_backend::api::routes;
use classifieds_backend::domain::Conversation;
use classifieds_backend::security::{cors_middleware, security_headers};
use uuid::Uuid;

use crate::common;
use crate::common::fixtures::{test_listing, test_user};

fn seeded_conversation(listing_id: Uuid, buyer_id: Uuid, seller_id: Uuid) -> Conversation {
    let now = Utc::now();
    Conversation {
        id: Uuid::new_v4(),
        listing_id,
        buyer_id,
        seller_id,
        created_at: now,
        updated_at: now,
    }
}

#[actix_rt::test]
async fn list_conversations_returns_empty_for_new_user() {
    let repos = common::test_repos();
    let user = test_user();
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

    let token = common::bearer_token(user.id, "user");
    let request = actix_test::TestRequest::get()
        .uri("/api/v1/conversations")
        .insert_header(("Authorization", format!("Bearer {token}")))
        .to_request();
    let response = actix_test::call_service(&app, request).await;
    assert_eq!(response.status(), StatusCode::OK);

    let body: serde_json::Value = actix_test::read_body_json(response).await;
    let conversations = body.as_array().expect("conversations should be an array");
    assert_eq!(conversations.len(), 0);
}

#[actix_rt::test]
async fn get_conversation_fails_for_non_participant() {
    let repos = common::test_repos();
    let seller = test_user();
    let buyer = test_user();
    let outsider = test_user();
    let listing = test_listing(seller.id);
    repos.listings.push(listing.clone());

    let conversation = seeded_conversation(listing.id, buyer.id, seller.id);
    repos.conversations.add_conversation(conversation.clone());

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

    let token = common::bearer_token(outsider.id, "user");
    let request = actix_test::TestRequest::get()
        .uri(&format!("/api/v1/conversations/{}", conversation.id))
        .insert_header(("Authorization", format!("Bearer {token}")))
        .to_request();
    let response = actix_test::call_service(&app, request).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[actix_rt::test]
async fn get_conversation_succeeds_for_both_participants() {
    let repos = common::test_repos();
    let seller = test_user();
    let buyer = test_user();
    let listing = test_listing(seller.id);
    repos.listings.push(listing.clone());

    let conversation = seeded_conversation(listing.id, buyer.id, seller.id);
    repos.conversations.add_conversation(conversation.clone());

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

    for participant in [&buyer, &seller] {
        let token = common::bearer_token(participant.id, "user");
        let request = actix_test::TestRequest::get()
            .uri(&format!("/api/v1/conversations/{}", conversation.id))
            .insert_header(("Authorization", format!("Bearer {token}")))
            .to_request();
        let response = actix_test::call_service(&app, request).await;
        assert_eq!(response.status(), StatusCode::OK);
    }
}

#[actix_rt::test]
async fn get_conversation_fails_for_unknown_id() {
    let repos = common::test_repos();
    let user = test_user();
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

    let token = common::bearer_token(user.id, "user");
    let request = actix_test::TestRequest::get()
        .uri(&format!("/api/v1/conversations/{}", Uuid::new_v4()))
        .insert_header(("Authorization", format!("Bearer {token}")))
        .to_request();
    let response = actix_test::call_service(&app, request).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[actix_rt::test]
async fn listing_threads_are_visible_to_owner_only() {
    let repos = common::test_repos();
    let seller = test_user();
    let first_buyer = test_user();
    let second_buyer = test_user();
    let listing = test_listing(seller.id);
    repos.listings.push(listing.clone());

    repos
        .conversations
        .add_conversation(seeded_conversation(listing.id, first_buyer.id, seller.id));
    repos
        .conversations
        .add_conversation(seeded_conversation(listing.id, second_buyer.id, seller.id));

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

    let owner_token = common::bearer_token(seller.id, "user");
    let request = actix_test::TestRequest::get()
        .uri(&format!("/api/v1/conversations/listing/{}", listing.id))
        .insert_header(("Authorization", format!("Bearer {owner_token}")))
        .to_request();
    let response = actix_test::call_service(&app, request).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body: serde_json::Value = actix_test::read_body_json(response).await;
    assert_eq!(body.as_array().map(Vec::len), Some(2));

    let buyer_token = common::bearer_token(first_buyer.id, "user");
    let request = actix_test::TestRequest::get()
        .uri(&format!("/api/v1/conversations/listing/{}", listing.id))
        .insert_header(("Authorization", format!("Bearer {buyer_token}")))
        .to_request();
    let response = actix_test::call_service(&app, request).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[actix_rt::test]
async fn listing_threads_fail_for_unknown_listing() {
    let repos = common::test_repos();
    let user = test_user();
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

    let token = common::bearer_token(user.id, "user");
    let request = actix_test::TestRequest::get()
        .uri(&format!("/api/v1/conversations/listing/{}", Uuid::new_v4()))
        .insert_header(("Authorization", format!("Bearer {token}")))
        .to_request();
    let response = actix_test::call_service(&app, request).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
