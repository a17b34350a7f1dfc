use std::sync::Arc;

use assert_matches::assert_matches;
use chrono::Duration;
use serde_json::json;
use wiremock::matchers::{body_partial_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use auth_cell::services::password::PasswordHasherService;
use auth_cell::{IdentityError, IdentityService, LoginRequest, RegisterRequest, SupabaseUserStore};
use shared_config::AppConfig;
use shared_utils::test_utils::{MockSupabaseResponses, TestConfig};

const USER_ID: &str = "0b6f3c9e-3c1d-4a55-9d6b-5f3a1f6b2c11";

fn create_service(config: &AppConfig) -> IdentityService {
    let store = Arc::new(SupabaseUserStore::new(config));
    IdentityService::new(store, config.jwt_secret.clone(), Duration::hours(1))
}

fn bob() -> RegisterRequest {
    RegisterRequest {
        unique_id: Some("A1".into()),
        username: Some("bob".into()),
        email: Some("b@x.com".into()),
        phone_no: Some("555".into()),
        password: Some("pw".into()),
    }
}

#[tokio::test]
async fn test_register_inserts_hashed_row() {
    let mock_server = MockServer::start().await;
    let config = TestConfig::with_supabase_url(&mock_server.uri()).to_app_config();

    Mock::given(method("POST"))
        .and(path("/rest/v1/users"))
        .and(header("apikey", config.supabase_service_key.as_str()))
        .and(body_partial_json(json!({ "unique_id": "A1", "username": "bob", "email": "b@x.com" })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!([
            MockSupabaseResponses::user_row(USER_ID, "A1", "bob", "b@x.com", "$argon2id$v=19$stored")
        ])))
        .expect(1)
        .mount(&mock_server)
        .await;

    let user_id = create_service(&config).register(bob()).await.unwrap();
    assert_eq!(user_id.to_string(), USER_ID);

    let requests = mock_server.received_requests().await.unwrap();
    let sent: serde_json::Value = serde_json::from_slice(&requests[0].body).unwrap();
    let hash = sent["password_hash"].as_str().unwrap();
    assert!(hash.starts_with("$argon2"));
    assert!(sent.get("password").is_none());
}

#[tokio::test]
async fn test_unique_violation_is_duplicate_identity() {
    let mock_server = MockServer::start().await;
    let config = TestConfig::with_supabase_url(&mock_server.uri()).to_app_config();

    Mock::given(method("POST"))
        .and(path("/rest/v1/users"))
        .respond_with(
            ResponseTemplate::new(409).set_body_json(MockSupabaseResponses::unique_violation("users_username_key")),
        )
        .mount(&mock_server)
        .await;

    let result = create_service(&config).register(bob()).await;
    assert_eq!(result, Err(IdentityError::DuplicateIdentity));
}

#[tokio::test]
async fn test_store_outage_is_store_unavailable() {
    let mock_server = MockServer::start().await;
    let config = TestConfig::with_supabase_url(&mock_server.uri()).to_app_config();

    Mock::given(method("POST"))
        .and(path("/rest/v1/users"))
        .respond_with(ResponseTemplate::new(503).set_body_string("upstream down"))
        .mount(&mock_server)
        .await;

    assert_matches!(
        create_service(&config).register(bob()).await,
        Err(IdentityError::StoreUnavailable(_))
    );
}

#[tokio::test]
async fn test_login_against_stored_hash() {
    let mock_server = MockServer::start().await;
    let config = TestConfig::with_supabase_url(&mock_server.uri()).to_app_config();
    let hash = PasswordHasherService::hash_password("pw").unwrap();

    Mock::given(method("GET"))
        .and(path("/rest/v1/users"))
        .and(query_param("email", "eq.b@x.com"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            MockSupabaseResponses::user_row(USER_ID, "A1", "bob", "b@x.com", &hash)
        ])))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/users"))
        .and(query_param("email", "eq.nobody@x.com"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&mock_server)
        .await;

    let service = create_service(&config);

    let response = service
        .login(LoginRequest { email: Some("b@x.com".into()), password: Some("pw".into()) })
        .await
        .unwrap();
    assert_eq!(response.user_id.to_string(), USER_ID);
    assert_eq!(response.username, "bob");

    let wrong = service
        .login(LoginRequest { email: Some("b@x.com".into()), password: Some("nope".into()) })
        .await;
    let unknown = service
        .login(LoginRequest { email: Some("nobody@x.com".into()), password: Some("pw".into()) })
        .await;

    assert_eq!(wrong.unwrap_err(), IdentityError::InvalidCredentials);
    assert_eq!(unknown.unwrap_err(), IdentityError::InvalidCredentials);
}
