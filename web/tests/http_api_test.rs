//! End-to-end HTTP tests against the in-memory stores.

#![allow(clippy::unwrap_used)] // Tests can unwrap
#![allow(clippy::expect_used)] // Tests can expect

use axum::http::{HeaderName, HeaderValue, StatusCode};
use axum_test::TestServer;
use bistro_core::{AdminEmail, FeedbackManager, ReservationManager};
use bistro_testing::fixtures::ADMIN_EMAIL;
use bistro_testing::{
    FailingStore, InMemoryFeedbackStore, InMemoryReservationStore, InMemoryUserDirectory,
    test_clock,
};
use bistro_web::{AppState, CORRELATION_ID_HEADER, EMAIL_HEADER, build_router};
use serde_json::{Value, json};
use std::sync::Arc;

struct Harness {
    server: TestServer,
    feedback: InMemoryFeedbackStore,
    reservations: InMemoryReservationStore,
}

fn harness() -> Harness {
    let feedback = InMemoryFeedbackStore::new();
    let reservations = InMemoryReservationStore::new();
    let users = InMemoryUserDirectory::new().with_user("a@x.com", "alice");
    let access = Arc::new(AdminEmail::new(ADMIN_EMAIL));
    let clock = Arc::new(test_clock());

    let state = AppState::new(
        FeedbackManager::new(
            Arc::new(feedback.clone()),
            Arc::new(users),
            access.clone(),
            clock.clone(),
        ),
        ReservationManager::new(Arc::new(reservations.clone()), access, clock),
    );

    Harness {
        server: TestServer::new(build_router(state)).expect("router builds"),
        feedback,
        reservations,
    }
}

fn failing_server() -> TestServer {
    let store = Arc::new(FailingStore::default());
    let access = Arc::new(AdminEmail::new(ADMIN_EMAIL));
    let clock = Arc::new(test_clock());

    let state = AppState::new(
        FeedbackManager::new(store.clone(), store.clone(), access.clone(), clock.clone()),
        ReservationManager::new(store, access, clock),
    );

    TestServer::new(build_router(state)).expect("router builds")
}

fn email(value: &str) -> (HeaderName, HeaderValue) {
    (
        HeaderName::from_static(EMAIL_HEADER),
        HeaderValue::from_str(value).unwrap(),
    )
}

fn reservation_body(name: &str, owner: &str) -> Value {
    json!({
        "name": name,
        "email": owner,
        "date": "2025-02-14",
        "time": "19:30",
        "guests": 2,
        "tableType": "Window"
    })
}

async fn create_reservation(server: &TestServer, owner: &str) -> String {
    let response = server
        .post("/reservation")
        .json(&reservation_body("Ada", owner))
        .await;
    assert_eq!(response.status_code(), StatusCode::CREATED);
    response.json::<Value>()["reservation"]["_id"]
        .as_str()
        .expect("id is a string")
        .to_string()
}

#[tokio::test]
async fn test_health() {
    let h = harness();

    let response = h.server.get("/health").await;

    assert_eq!(response.status_code(), StatusCode::OK);
    assert_eq!(response.json::<Value>()["status"], "ok");
    assert!(response.headers().contains_key(CORRELATION_ID_HEADER));
}

#[tokio::test]
async fn test_add_feedback_creates_then_updates() {
    let h = harness();
    let mut body = json!({
        "email": "a@x.com",
        "feedback": "great",
        "rating": 5,
        "itemName": "pizza",
        "orderId": "o1"
    });

    let first = h.server.post("/addfeedback").json(&body).await;
    assert_eq!(first.status_code(), StatusCode::CREATED);
    let first: Value = first.json();
    assert_eq!(first["feedback"]["rating"], 5);

    body["rating"] = json!(3);
    let second = h.server.post("/addfeedback").json(&body).await;
    assert_eq!(second.status_code(), StatusCode::OK);
    let second: Value = second.json();
    assert_eq!(second["feedback"]["rating"], 3);
    assert_eq!(second["feedback"]["_id"], first["feedback"]["_id"]);

    assert_eq!(h.feedback.len(), 1);
}

#[tokio::test]
async fn test_add_feedback_rejects_bad_input() {
    let h = harness();

    let out_of_range = h
        .server
        .post("/addfeedback")
        .json(&json!({"email": "a@x.com", "feedback": "x", "rating": 6, "orderId": "o1"}))
        .await;
    assert_eq!(out_of_range.status_code(), StatusCode::BAD_REQUEST);
    assert_eq!(out_of_range.json::<Value>()["code"], "BAD_REQUEST");

    let missing = h
        .server
        .post("/addfeedback")
        .json(&json!({"email": "a@x.com"}))
        .await;
    assert_eq!(missing.status_code(), StatusCode::BAD_REQUEST);

    let malformed = h.server.post("/addfeedback").text("{not json").await;
    assert_eq!(malformed.status_code(), StatusCode::BAD_REQUEST);

    assert!(h.feedback.is_empty());
}

#[tokio::test]
async fn test_add_feedback_accepts_numeric_string_rating() {
    let h = harness();

    let response = h
        .server
        .post("/addfeedback")
        .json(&json!({"email": "a@x.com", "feedback": "great", "rating": "5", "itemName": "pizza", "orderId": "o1"}))
        .await;
    assert_eq!(response.status_code(), StatusCode::CREATED);
    assert_eq!(response.json::<Value>()["feedback"]["rating"], 5);

    let wordy = h
        .server
        .post("/addfeedback")
        .json(&json!({"email": "a@x.com", "feedback": "great", "rating": "five", "itemName": "pizza", "orderId": "o1"}))
        .await;
    assert_eq!(wordy.status_code(), StatusCode::BAD_REQUEST);
    assert_eq!(wordy.json::<Value>()["code"], "BAD_REQUEST");
    assert_eq!(h.feedback.len(), 1);
}

#[tokio::test]
async fn test_get_feedback_found_and_absent() {
    let h = harness();

    let absent = h
        .server
        .get("/getfeedbacks")
        .add_query_param("email", "a@x.com")
        .add_query_param("orderId", "o1")
        .add_query_param("itemName", "pizza")
        .await;
    assert_eq!(absent.status_code(), StatusCode::OK);
    assert_eq!(
        absent.json::<Value>()["message"],
        "No feedback found for this order and item!"
    );

    h.server
        .post("/addfeedback")
        .json(&json!({"email": "a@x.com", "feedback": "great", "rating": 5, "itemName": "pizza", "orderId": "o1"}))
        .await;

    let found = h
        .server
        .get("/getfeedbacks")
        .add_query_param("email", "a@x.com")
        .add_query_param("orderId", "o1")
        .add_query_param("itemName", "pizza")
        .await;
    assert_eq!(found.status_code(), StatusCode::OK);
    assert_eq!(found.json::<Value>()["feedback"], "great");

    let incomplete = h
        .server
        .get("/getfeedbacks")
        .add_query_param("email", "a@x.com")
        .await;
    assert_eq!(incomplete.status_code(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_delete_feedback_then_404() {
    let h = harness();
    h.server
        .post("/addfeedback")
        .json(&json!({"email": "a@x.com", "feedback": "great", "rating": 5, "itemName": "pizza", "orderId": "o1"}))
        .await;

    let delete = || {
        h.server
            .delete("/deletefeedback")
            .add_query_param("email", "a@x.com")
            .add_query_param("orderId", "o1")
            .add_query_param("itemName", "pizza")
    };

    assert_eq!(delete().await.status_code(), StatusCode::OK);
    assert_eq!(delete().await.status_code(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_admin_feedbacks_requires_admin() {
    let h = harness();
    h.server
        .post("/addfeedback")
        .json(&json!({"email": "a@x.com", "feedback": "great", "rating": 5, "itemName": "pizza", "orderId": "o1"}))
        .await;

    let admin = h
        .server
        .get("/admin/feedbacks")
        .add_query_param("email", ADMIN_EMAIL)
        .await;
    assert_eq!(admin.status_code(), StatusCode::OK);
    assert_eq!(admin.json::<Value>().as_array().map(Vec::len), Some(1));

    let customer = h
        .server
        .get("/admin/feedbacks")
        .add_query_param("email", "a@x.com")
        .await;
    assert_eq!(customer.status_code(), StatusCode::FORBIDDEN);

    let anonymous = h.server.get("/admin/feedbacks").await;
    assert_eq!(anonymous.status_code(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_item_reviews_enriched() {
    let h = harness();
    for (who, order, rating) in [("a@x.com", "o1", 4), ("ghost@x.com", "o2", 1)] {
        h.server
            .post("/addfeedback")
            .json(&json!({"email": who, "feedback": "ok", "rating": rating, "itemName": "pizza", "orderId": order}))
            .await;
    }

    let response = h.server.get("/item/pizza").await;
    assert_eq!(response.status_code(), StatusCode::OK);

    let body: Value = response.json();
    assert_eq!(body["averageRating"], 2.5);
    assert_eq!(body["reviews"][0]["username"], "alice");
    assert_eq!(body["reviews"][1]["username"], "Anonymous");

    let empty: Value = h.server.get("/item/soup").await.json();
    assert_eq!(empty["averageRating"], 0.0);
}

#[tokio::test]
async fn test_create_reservation_defaults() {
    let h = harness();

    let response = h
        .server
        .post("/reservation")
        .json(&reservation_body("Ada", "ada@x.com"))
        .await;

    assert_eq!(response.status_code(), StatusCode::CREATED);
    let body: Value = response.json();
    assert_eq!(body["reservation"]["status"], "Pending");
    assert_eq!(body["reservation"]["phone"], "");
    assert_eq!(body["reservation"]["specialRequests"], "");

    let missing = h
        .server
        .post("/reservation")
        .json(&json!({"name": "Ada"}))
        .await;
    assert_eq!(missing.status_code(), StatusCode::BAD_REQUEST);
    assert_eq!(h.reservations.len(), 1);
}

#[tokio::test]
async fn test_create_reservation_guest_forms() {
    let h = harness();

    let mut body = reservation_body("Ada", "ada@x.com");
    body["guests"] = json!("4");
    let response = h.server.post("/reservation").json(&body).await;
    assert_eq!(response.status_code(), StatusCode::CREATED);
    assert_eq!(response.json::<Value>()["reservation"]["guests"], 4);

    body["guests"] = json!(3_000_000_000_i64);
    let too_many = h.server.post("/reservation").json(&body).await;
    assert_eq!(too_many.status_code(), StatusCode::BAD_REQUEST);

    body["guests"] = json!("a few");
    let wordy = h.server.post("/reservation").json(&body).await;
    assert_eq!(wordy.status_code(), StatusCode::BAD_REQUEST);

    assert_eq!(h.reservations.len(), 1);
}

#[tokio::test]
async fn test_list_reservations_by_header() {
    let h = harness();
    create_reservation(&h.server, "ada@x.com").await;
    create_reservation(&h.server, "bob@x.com").await;

    let (name, value) = email("ada@x.com");
    let own = h.server.get("/reservations").add_header(name, value).await;
    assert_eq!(own.status_code(), StatusCode::OK);
    assert_eq!(own.json::<Value>().as_array().map(Vec::len), Some(1));

    let (name, value) = email("nobody@x.com");
    let none = h.server.get("/reservations").add_header(name, value).await;
    assert_eq!(none.status_code(), StatusCode::NOT_FOUND);
    assert_eq!(
        none.json::<Value>()["message"],
        "No reservations found for the given email"
    );

    let missing = h.server.get("/reservations").await;
    assert_eq!(missing.status_code(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_all_reservations_scoped_by_caller() {
    let h = harness();
    create_reservation(&h.server, "ada@x.com").await;
    create_reservation(&h.server, "bob@x.com").await;

    let (name, value) = email(ADMIN_EMAIL);
    let admin = h.server.get("/allreservations").add_header(name, value).await;
    assert_eq!(admin.json::<Value>().as_array().map(Vec::len), Some(2));

    let (name, value) = email("bob@x.com");
    let bob = h.server.get("/allreservations").add_header(name, value).await;
    let bob: Value = bob.json();
    assert_eq!(bob.as_array().map(Vec::len), Some(1));
    assert_eq!(bob[0]["email"], "bob@x.com");
}

#[tokio::test]
async fn test_update_status_rules() {
    let h = harness();
    let id = create_reservation(&h.server, "ada@x.com").await;
    let path = format!("/update/{id}");

    let (name, value) = email("ada@x.com");
    let owner = h
        .server
        .put(&path)
        .add_header(name, value)
        .json(&json!({"status": "Completed"}))
        .await;
    assert_eq!(owner.status_code(), StatusCode::OK);
    assert_eq!(owner.json::<Value>()["status"], "Completed");

    let (name, value) = email("ada@x.com");
    let launched = h
        .server
        .put(&path)
        .add_header(name, value)
        .json(&json!({"status": "Launched"}))
        .await;
    assert_eq!(launched.status_code(), StatusCode::BAD_REQUEST);

    let (name, value) = email("mallory@x.com");
    let stranger = h
        .server
        .put(&path)
        .add_header(name, value)
        .json(&json!({"status": "Cancelled"}))
        .await;
    assert_eq!(stranger.status_code(), StatusCode::FORBIDDEN);

    let (name, value) = email(ADMIN_EMAIL);
    let unknown = h
        .server
        .put("/update/00000000-0000-0000-0000-000000000000")
        .add_header(name, value)
        .json(&json!({"status": "Confirmed"}))
        .await;
    assert_eq!(unknown.status_code(), StatusCode::NOT_FOUND);

    let anonymous = h
        .server
        .put(&path)
        .json(&json!({"status": "Confirmed"}))
        .await;
    assert_eq!(anonymous.status_code(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_cancel_reservation_always_ok() {
    let h = harness();
    let id = create_reservation(&h.server, "ada@x.com").await;

    let response = h.server.delete(&format!("/reservations/{id}")).await;
    assert_eq!(response.status_code(), StatusCode::OK);
    assert_eq!(
        response.json::<Value>()["message"],
        "Reservation cancelled successfully"
    );
    assert!(h.reservations.is_empty());

    let again = h.server.delete(&format!("/reservations/{id}")).await;
    assert_eq!(again.status_code(), StatusCode::OK);
}

#[tokio::test]
async fn test_store_failure_is_500_without_detail() {
    let server = failing_server();

    let response = server
        .post("/addfeedback")
        .json(&json!({"email": "a@x.com", "feedback": "great", "rating": 5, "orderId": "o1"}))
        .await;

    assert_eq!(response.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    let text = response.text();
    assert!(text.contains("INTERNAL_SERVER_ERROR"));
    assert!(!text.contains("10.0.0.5"));
    assert!(!text.contains("connection refused"));

    let listing = server.get("/item/pizza").await;
    assert_eq!(listing.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
}
