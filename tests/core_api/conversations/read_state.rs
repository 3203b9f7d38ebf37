use actix_web::{http::StatusCode, test as actix_test, web, App};
use chrono::{Duration, Utc};
use classifieds_backend::api::routes;
use classifieds_backend::domain::{Conversation, Message};
use classifieds_backend::security::{cors_middleware, security_headers};
use uuid::Uuid;

use crate::common;
use crate::common::fixtures::{test_listing, test_user};

struct Thread {
    conversation: Conversation,
    buyer_message: Message,
}

fn seed_thread(
    repos: &common::TestRepos,
    listing_id: Uuid,
    buyer_id: Uuid,
    seller_id: Uuid,
) -> Thread {
    let now = Utc::now();
    let conversation = Conversation {
        id: Uuid::new_v4(),
        listing_id,
        buyer_id,
        seller_id,
        created_at: now,
        updated_at: now,
    };
    let buyer_message = Message {
        id: Uuid::new_v4(),
        conversation_id: conversation.id,
        sender_id: buyer_id,
        content: "Interested!".to_string(),
        sent_at: now,
        is_read: false,
    };
    repos.conversations.add_conversation(conversation.clone());
    repos.conversations.add_message(buyer_message.clone());
    Thread {
        conversation,
        buyer_message,
    }
}

#[actix_rt::test]
async fn recipient_marks_message_read() {
    let repos = common::test_repos();
    let seller = test_user();
    let buyer = test_user();
    let listing = test_listing(seller.id);
    repos.listings.push(listing.clone());
    let thread = seed_thread(&repos, listing.id, buyer.id, seller.id);

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
    let request = actix_test::TestRequest::put()
        .uri(&format!(
            "/api/v1/conversations/{}/messages/{}/read",
            thread.conversation.id, thread.buyer_message.id
        ))
        .insert_header(("Authorization", format!("Bearer {token}")))
        .to_request();
    let response = actix_test::call_service(&app, request).await;
    assert_eq!(response.status(), StatusCode::OK);

    let body: serde_json::Value = actix_test::read_body_json(response).await;
    assert_eq!(body["is_read"], true);

    // Marking again is a no-op, not an error.
    let request = actix_test::TestRequest::put()
        .uri(&format!(
            "/api/v1/conversations/{}/messages/{}/read",
            thread.conversation.id, thread.buyer_message.id
        ))
        .insert_header(("Authorization", format!("Bearer {token}")))
        .to_request();
    let response = actix_test::call_service(&app, request).await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[actix_rt::test]
async fn sender_cannot_mark_own_message_read() {
    let repos = common::test_repos();
    let seller = test_user();
    let buyer = test_user();
    let listing = test_listing(seller.id);
    repos.listings.push(listing.clone());
    let thread = seed_thread(&repos, listing.id, buyer.id, seller.id);

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
    let request = actix_test::TestRequest::put()
        .uri(&format!(
            "/api/v1/conversations/{}/messages/{}/read",
            thread.conversation.id, thread.buyer_message.id
        ))
        .insert_header(("Authorization", format!("Bearer {token}")))
        .to_request();
    let response = actix_test::call_service(&app, request).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[actix_rt::test]
async fn mark_read_fails_when_message_belongs_to_other_conversation() {
    let repos = common::test_repos();
    let seller = test_user();
    let buyer = test_user();
    let first_listing = test_listing(seller.id);
    let second_listing = test_listing(seller.id);
    repos.listings.push(first_listing.clone());
    repos.listings.push(second_listing.clone());

    let first = seed_thread(&repos, first_listing.id, buyer.id, seller.id);
    let second = seed_thread(&repos, second_listing.id, buyer.id, seller.id);

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
    let request = actix_test::TestRequest::put()
        .uri(&format!(
            "/api/v1/conversations/{}/messages/{}/read",
            first.conversation.id, second.buyer_message.id
        ))
        .insert_header(("Authorization", format!("Bearer {token}")))
        .to_request();
    let response = actix_test::call_service(&app, request).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[actix_rt::test]
async fn mark_all_read_reports_updated_count_and_clears_unread() {
    let repos = common::test_repos();
    let seller = test_user();
    let buyer = test_user();
    let listing = test_listing(seller.id);
    repos.listings.push(listing.clone());
    let thread = seed_thread(&repos, listing.id, buyer.id, seller.id);

    // A second unread buyer message.
    repos.conversations.add_message(Message {
        id: Uuid::new_v4(),
        conversation_id: thread.conversation.id,
        sender_id: buyer.id,
        content: "Any update?".to_string(),
        sent_at: Utc::now() + Duration::minutes(1),
        is_read: false,
    });

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
    let request = actix_test::TestRequest::put()
        .uri(&format!(
            "/api/v1/conversations/{}/messages/mark-all-read",
            thread.conversation.id
        ))
        .insert_header(("Authorization", format!("Bearer {token}")))
        .to_request();
    let response = actix_test::call_service(&app, request).await;
    assert_eq!(response.status(), StatusCode::OK);

    let body: serde_json::Value = actix_test::read_body_json(response).await;
    assert_eq!(body["updated"], 2);

    let token = common::bearer_token(seller.id, "user");
    let request = actix_test::TestRequest::get()
        .uri(&format!("/api/v1/conversations/{}", thread.conversation.id))
        .insert_header(("Authorization", format!("Bearer {token}")))
        .to_request();
    let response = actix_test::call_service(&app, request).await;
    let view: serde_json::Value = actix_test::read_body_json(response).await;
    assert_eq!(view["unread_count"], 0);
}

#[actix_rt::test]
async fn mark_all_read_forbidden_for_non_participant() {
    let repos = common::test_repos();
    let seller = test_user();
    let buyer = test_user();
    let outsider = test_user();
    let listing = test_listing(seller.id);
    repos.listings.push(listing.clone());
    let thread = seed_thread(&repos, listing.id, buyer.id, seller.id);

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
    let request = actix_test::TestRequest::put()
        .uri(&format!(
            "/api/v1/conversations/{}/messages/mark-all-read",
            thread.conversation.id
        ))
        .insert_header(("Authorization", format!("Bearer {token}")))
        .to_request();
    let response = actix_test::call_service(&app, request).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}
