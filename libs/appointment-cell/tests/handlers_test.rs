use std::sync::Arc;

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use appointment_cell::router::appointment_routes;
use appointment_cell::{AppointmentStore, BookingService, InMemoryAppointmentStore, SupabaseAppointmentStore};
use shared_config::AppConfig;
use shared_utils::test_utils::{JwtTestUtils, MockSupabaseResponses, TestConfig, TestUser};

fn create_test_app(config: &AppConfig, store: Arc<dyn AppointmentStore>) -> Router {
    appointment_routes(Arc::new(config.clone()), Arc::new(BookingService::new(store)))
}

fn booking_form() -> Value {
    json!({
        "name": "Form Name",
        "email": "form@x.com",
        "location": "Pune",
        "doctorId": "d1",
        "doctorName": "Dr. Rao",
        "date": "2024-12-25",
        "time": "10:30",
        "symptoms": "Headache"
    })
}

fn booking_request(token: Option<&str>, body: Value) -> Request<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri("/book-appointment")
        .header("content-type", "application/json");

    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {}", token));
    }

    builder.body(Body::from(body.to_string())).unwrap()
}

async fn read_json(response: axum::response::Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&body).unwrap()
}

#[tokio::test]
async fn test_book_with_valid_session() {
    let config = TestConfig::default().to_app_config();
    let store = Arc::new(InMemoryAppointmentStore::new());
    let app = create_test_app(&config, store.clone());

    let user = TestUser::new("bob");
    let token = JwtTestUtils::create_test_token(&user, &config.jwt_secret, Some(1));

    let response = app.oneshot(booking_request(Some(&token), booking_form())).await.unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);
    let body = read_json(response).await;
    assert!(body["message"].as_str().unwrap().starts_with("Appointment booked successfully"));

    let stored = store.all().await;
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].user_id, user.id);
    assert_eq!(stored[0].email, "form@x.com");
    assert_eq!(stored[0].doctor_id, "d1");
}

#[tokio::test]
async fn test_book_without_valid_session_writes_nothing() {
    let config = TestConfig::default().to_app_config();
    let store = Arc::new(InMemoryAppointmentStore::new());
    let user = TestUser::default();

    let tokens = vec![
        None,
        Some(JwtTestUtils::create_expired_token(&user, &config.jwt_secret)),
        Some(JwtTestUtils::create_invalid_signature_token(&user)),
        Some(JwtTestUtils::create_malformed_token()),
    ];

    for token in tokens {
        let app = create_test_app(&config, store.clone());
        let response = app
            .oneshot(booking_request(token.as_deref(), booking_form()))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert!(read_json(response).await["error"].is_string());
    }

    assert!(store.is_empty().await);
}

#[tokio::test]
async fn test_unauthorized_takes_precedence_over_bad_body() {
    let config = TestConfig::default().to_app_config();
    let store = Arc::new(InMemoryAppointmentStore::new());
    let app = create_test_app(&config, store.clone());

    let request = Request::builder()
        .method("POST")
        .uri("/book-appointment")
        .body(Body::from("garbage"))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_malformed_body_with_valid_session() {
    let config = TestConfig::default().to_app_config();
    let store = Arc::new(InMemoryAppointmentStore::new());
    let app = create_test_app(&config, store.clone());
    let token = JwtTestUtils::create_test_token(&TestUser::default(), &config.jwt_secret, Some(1));

    let request = Request::builder()
        .method("POST")
        .uri("/book-appointment")
        .header("content-type", "application/json")
        .header("authorization", format!("Bearer {}", token))
        .body(Body::from("[1, 2"))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(store.is_empty().await);
}

#[tokio::test]
async fn test_null_and_numeric_fields_are_stored_as_supplied() {
    let config = TestConfig::default().to_app_config();
    let store = Arc::new(InMemoryAppointmentStore::new());
    let app = create_test_app(&config, store.clone());
    let token = JwtTestUtils::create_test_token(&TestUser::default(), &config.jwt_secret, Some(1));

    let mut form = booking_form();
    form["symptoms"] = Value::Null;
    form["location"] = Value::Null;
    form["doctorId"] = json!(7);

    let response = app.oneshot(booking_request(Some(&token), form)).await.unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let stored = store.all().await;
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].symptoms, "");
    assert_eq!(stored[0].location, "");
    assert_eq!(stored[0].doctor_id, "7");
}

#[tokio::test]
async fn test_book_against_supabase() {
    let mock_server = MockServer::start().await;
    let config = TestConfig::with_supabase_url(&mock_server.uri()).to_app_config();
    let user = TestUser::new("bob");

    Mock::given(method("POST"))
        .and(path("/rest/v1/appointments"))
        .and(body_partial_json(json!({ "user_id": user.id, "doctor_id": "d1" })))
        .respond_with(
            ResponseTemplate::new(201)
                .set_body_json(json!([MockSupabaseResponses::appointment_row(&user.id, "d1")])),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    let app = create_test_app(&config, Arc::new(SupabaseAppointmentStore::new(&config)));
    let token = JwtTestUtils::create_test_token(&user, &config.jwt_secret, Some(1));

    let response = app.oneshot(booking_request(Some(&token), booking_form())).await.unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
}

#[tokio::test]
async fn test_store_failure_is_500() {
    let mock_server = MockServer::start().await;
    let config = TestConfig::with_supabase_url(&mock_server.uri()).to_app_config();

    Mock::given(method("POST"))
        .and(path("/rest/v1/appointments"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&mock_server)
        .await;

    let app = create_test_app(&config, Arc::new(SupabaseAppointmentStore::new(&config)));
    let token = JwtTestUtils::create_test_token(&TestUser::default(), &config.jwt_secret, Some(1));

    let response = app.oneshot(booking_request(Some(&token), booking_form())).await.unwrap();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(read_json(response).await, json!({ "error": "Error booking the appointment" }));
}
