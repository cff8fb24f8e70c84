//! Wire-level tests for the verification routes.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use actix_web::{http::StatusCode, test, web, App};
use async_trait::async_trait;
use serde_json::{json, Map, Value};

use pv_api::routes::{self, verification::AppState};
use pv_core::clients::{DirectoryClient, VerificationProvider};
use pv_core::domain::{AttemptStatus, Channel, PhoneNumber, Principal};
use pv_core::errors::{DirectoryError, ProviderError};
use pv_core::services::VerificationCoordinator;

struct StubDirectory {
    claims: Mutex<HashMap<String, Value>>,
    attributes: Mutex<Map<String, Value>>,
}

impl StubDirectory {
    fn new() -> Self {
        let mut claims = HashMap::new();
        claims.insert("role".to_string(), json!("admin"));
        Self {
            claims: Mutex::new(claims),
            attributes: Mutex::new(Map::new()),
        }
    }
}

#[async_trait]
impl DirectoryClient for StubDirectory {
    async fn resolve_credential(&self, credential: &str) -> Result<Principal, DirectoryError> {
        if credential == "good-token" {
            Ok(Principal::new("uid-1"))
        } else {
            Err(DirectoryError::InvalidCredential {
                reason: "unknown token".to_string(),
            })
        }
    }

    async fn get_claims(
        &self,
        _principal: &Principal,
    ) -> Result<HashMap<String, Value>, DirectoryError> {
        Ok(self.claims.lock().unwrap().clone())
    }

    async fn merge_attributes(
        &self,
        _principal: &Principal,
        attributes: Map<String, Value>,
    ) -> Result<(), DirectoryError> {
        self.attributes.lock().unwrap().extend(attributes);
        Ok(())
    }

    async fn merge_claims(
        &self,
        _principal: &Principal,
        claims: HashMap<String, Value>,
    ) -> Result<(), DirectoryError> {
        *self.claims.lock().unwrap() = claims;
        Ok(())
    }
}

struct StubProvider {
    check_status: AttemptStatus,
    check_calls: AtomicUsize,
}

impl StubProvider {
    fn new(check_status: AttemptStatus) -> Self {
        Self {
            check_status,
            check_calls: AtomicUsize::new(0),
        }
    }
}

#[async_trait]
impl VerificationProvider for StubProvider {
    async fn start_attempt(
        &self,
        _phone: &PhoneNumber,
        _channel: Channel,
    ) -> Result<AttemptStatus, ProviderError> {
        Ok(AttemptStatus::Pending)
    }

    async fn check_attempt(
        &self,
        _phone: &PhoneNumber,
        _code: &str,
    ) -> Result<AttemptStatus, ProviderError> {
        self.check_calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.check_status.clone())
    }
}

fn state(
    directory: Arc<StubDirectory>,
    provider: Arc<StubProvider>,
) -> AppState<StubDirectory, StubProvider> {
    AppState {
        coordinator: Arc::new(VerificationCoordinator::new(directory, provider)),
    }
}

macro_rules! test_app {
    ($state:expr) => {
        test::init_service(
            App::new()
                .app_data(web::Data::new($state))
                .route("/health", web::get().to(routes::health_check))
                .configure(routes::verification::configure::<StubDirectory, StubProvider>),
        )
        .await
    };
}

#[actix_web::test]
async fn health_endpoint_responds() {
    let directory = Arc::new(StubDirectory::new());
    let provider = Arc::new(StubProvider::new(AttemptStatus::Approved));
    let app = test_app!(state(directory, provider));

    let resp = test::call_service(&app, test::TestRequest::get().uri("/health").to_request()).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["status"], "healthy");
}

#[actix_web::test]
async fn start_returns_provider_status() {
    let directory = Arc::new(StubDirectory::new());
    let provider = Arc::new(StubProvider::new(AttemptStatus::Approved));
    let app = test_app!(state(directory, provider));

    let resp = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/v1/verification/start")
            .set_json(json!({ "phone": "+15551234567", "channel": "sms" }))
            .to_request(),
    )
    .await;

    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body, json!({ "status": "pending" }));
}

#[actix_web::test]
async fn start_rejects_unknown_channel() {
    let directory = Arc::new(StubDirectory::new());
    let provider = Arc::new(StubProvider::new(AttemptStatus::Approved));
    let app = test_app!(state(directory, provider));

    let resp = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/v1/verification/start")
            .set_json(json!({ "phone": "+15551234567", "channel": "email" }))
            .to_request(),
    )
    .await;

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "INVALID_INPUT");
}

#[actix_web::test]
async fn approved_check_returns_approved_and_binds_phone() {
    let directory = Arc::new(StubDirectory::new());
    let provider = Arc::new(StubProvider::new(AttemptStatus::Approved));
    let app = test_app!(state(directory.clone(), provider));

    let resp = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/v1/verification/check")
            .insert_header(("Authorization", "Bearer good-token"))
            .set_json(json!({ "phone": "+15551234567", "code": "123456" }))
            .to_request(),
    )
    .await;

    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body, json!({ "approved": true, "status": "approved" }));

    let attributes = directory.attributes.lock().unwrap();
    assert_eq!(attributes["phoneNumber"], json!("+15551234567"));
    assert_eq!(attributes["phoneVerified"], json!(true));
    drop(attributes);

    // Pre-existing claims survive the merge.
    let claims = directory.claims.lock().unwrap();
    assert_eq!(claims["role"], json!("admin"));
    assert_eq!(claims["phoneVerified"], json!(true));
}

#[actix_web::test]
async fn rejected_check_is_a_non_error_outcome() {
    let directory = Arc::new(StubDirectory::new());
    let provider = Arc::new(StubProvider::new(AttemptStatus::Rejected));
    let app = test_app!(state(directory.clone(), provider));

    let resp = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/v1/verification/check")
            .insert_header(("Authorization", "Bearer good-token"))
            .set_json(json!({ "phone": "+15551234567", "code": "123456" }))
            .to_request(),
    )
    .await;

    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body, json!({ "approved": false, "status": "rejected" }));
    assert!(directory.attributes.lock().unwrap().is_empty());
}

#[actix_web::test]
async fn missing_bearer_token_is_unauthorized_without_provider_call() {
    let directory = Arc::new(StubDirectory::new());
    let provider = Arc::new(StubProvider::new(AttemptStatus::Approved));
    let app = test_app!(state(directory, provider.clone()));

    let resp = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/v1/verification/check")
            .set_json(json!({ "phone": "+15551234567", "code": "123456" }))
            .to_request(),
    )
    .await;

    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "UNAUTHENTICATED");
    assert_eq!(provider.check_calls.load(Ordering::SeqCst), 0);
}

#[actix_web::test]
async fn invalid_credential_is_unauthorized_without_provider_call() {
    let directory = Arc::new(StubDirectory::new());
    let provider = Arc::new(StubProvider::new(AttemptStatus::Approved));
    let app = test_app!(state(directory, provider.clone()));

    let resp = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/v1/verification/check")
            .insert_header(("Authorization", "Bearer bad-token"))
            .set_json(json!({ "phone": "+15551234567", "code": "123456" }))
            .to_request(),
    )
    .await;

    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(provider.check_calls.load(Ordering::SeqCst), 0);
}

#[actix_web::test]
async fn malformed_code_is_rejected_before_the_coordinator() {
    let directory = Arc::new(StubDirectory::new());
    let provider = Arc::new(StubProvider::new(AttemptStatus::Approved));
    let app = test_app!(state(directory, provider.clone()));

    let resp = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/v1/verification/check")
            .insert_header(("Authorization", "Bearer good-token"))
            .set_json(json!({ "phone": "+15551234567", "code": "12345" }))
            .to_request(),
    )
    .await;

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert_eq!(provider.check_calls.load(Ordering::SeqCst), 0);
}
