//! Router-level tests for the wallet sign-in flow

use std::sync::Arc;

use axum::Router;
use axum::body::{Body, to_bytes};
use axum::http::{Request, Response, StatusCode, header};
use ed25519_dalek::{Signer, SigningKey};
use platform::crypto::to_base58;
use platform::rate_limit::MemoryRateLimitStore;
use serde_json::{Value, json};
use tower::ServiceExt;

use crate::application::config::AuthConfig;
use crate::domain::entity::Identity;
use crate::domain::entity::sign_in_message::SignInMessage;
use crate::domain::repository::IdentityRepository;
use crate::domain::value_object::WalletAddress;
use crate::error::{AuthError, AuthResult};
use crate::infra::memory::{MemoryChallengeRepository, MemoryIdentityRepository};
use crate::presentation::handlers::AuthAppState;
use crate::presentation::router::auth_router;

struct Harness {
    router: Router,
    identities: Arc<MemoryIdentityRepository>,
    challenges: Arc<MemoryChallengeRepository>,
}

fn harness() -> Harness {
    let identities = Arc::new(MemoryIdentityRepository::new());
    let challenges = Arc::new(MemoryChallengeRepository::new());
    let config = AuthConfig {
        domain: "example.com".to_string(),
        ..AuthConfig::development()
    };

    let router = auth_router(AuthAppState {
        identities: identities.clone(),
        challenges: challenges.clone(),
        rate_limits: Arc::new(MemoryRateLimitStore::new()),
        config: Arc::new(config),
    });

    Harness {
        router,
        identities,
        challenges,
    }
}

fn wallet_key(seed: u8) -> SigningKey {
    SigningKey::from_bytes(&[seed; 32])
}

fn wallet_of(key: &SigningKey) -> String {
    to_base58(key.verifying_key().as_bytes())
}

/// `name=value` part of the first Set-Cookie header starting with `name=`
fn cookie_pair(response: &Response<Body>, name: &str) -> Option<String> {
    response
        .headers()
        .get_all(header::SET_COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .filter_map(|v| v.split(';').next())
        .find(|pair| pair.starts_with(&format!("{name}=")))
        .map(str::to_string)
}

async fn body_json(response: Response<Body>) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

async fn fetch_challenge(router: &Router) -> (String, String) {
    let response = router
        .clone()
        .oneshot(Request::get("/csrf").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let cookie = cookie_pair(&response, "wallet_challenge").unwrap();
    let body = body_json(response).await;
    let nonce = body["data"]["csrfToken"].as_str().unwrap().to_string();
    (cookie, nonce)
}

fn signed_request(key: &SigningKey, nonce: &str) -> Value {
    let message = SignInMessage::new(
        "example.com",
        wallet_of(key),
        nonce,
        Some("Sign in".to_string()),
    );
    let signature = to_base58(&key.sign(message.prepare().as_bytes()).to_bytes());

    json!({
        "message": serde_json::to_string(&message).unwrap(),
        "signature": signature,
    })
}

async fn post_callback(router: &Router, cookie: Option<&str>, body: String) -> Response<Body> {
    let mut request = Request::post("/callback").header(header::CONTENT_TYPE, "application/json");
    if let Some(cookie) = cookie {
        request = request.header(header::COOKIE, cookie);
    }

    router
        .clone()
        .oneshot(request.body(Body::from(body)).unwrap())
        .await
        .unwrap()
}

async fn sign_in(router: &Router, key: &SigningKey) -> String {
    let (challenge_cookie, nonce) = fetch_challenge(router).await;
    let response = post_callback(
        router,
        Some(&challenge_cookie),
        signed_request(key, &nonce).to_string(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    cookie_pair(&response, "wallet_session").unwrap()
}

async fn assert_generic_rejection(response: Response<Body>) {
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(
        body_json(response).await,
        json!({ "success": false, "error": "Authentication failed" })
    );
}

// ============================================================================
// Sign-in flow
// ============================================================================

#[tokio::test]
async fn test_sign_in_creates_identity_and_sets_session() {
    let h = harness();
    let key = wallet_key(1);

    let (challenge_cookie, nonce) = fetch_challenge(&h.router).await;
    assert_eq!(h.challenges.len(), 1);

    let response = post_callback(
        &h.router,
        Some(&challenge_cookie),
        signed_request(&key, &nonce).to_string(),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    assert!(cookie_pair(&response, "wallet_session").is_some());
    assert_eq!(
        cookie_pair(&response, "wallet_challenge").as_deref(),
        Some("wallet_challenge=")
    );

    let body = body_json(response).await;
    let wallet = wallet_of(&key);
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["identityKey"], wallet.as_str());
    assert_eq!(body["data"]["displayName"], format!("Player_{}", &wallet[..8]));
    assert_eq!(body["data"]["isNewIdentity"], true);
    assert_eq!(h.identities.len(), 1);
    assert!(h.challenges.is_empty());
}

#[tokio::test]
async fn test_second_sign_in_reuses_identity() {
    let h = harness();
    let key = wallet_key(2);

    sign_in(&h.router, &key).await;

    let (cookie, nonce) = fetch_challenge(&h.router).await;
    let response =
        post_callback(&h.router, Some(&cookie), signed_request(&key, &nonce).to_string()).await;
    let body = body_json(response).await;

    assert_eq!(body["data"]["isNewIdentity"], false);
    assert_eq!(h.identities.len(), 1);
}

#[tokio::test]
async fn test_replayed_payload_is_rejected() {
    let h = harness();
    let key = wallet_key(3);

    let (cookie, nonce) = fetch_challenge(&h.router).await;
    let payload = signed_request(&key, &nonce).to_string();

    let first = post_callback(&h.router, Some(&cookie), payload.clone()).await;
    assert_eq!(first.status(), StatusCode::OK);

    let replay = post_callback(&h.router, Some(&cookie), payload).await;
    assert_generic_rejection(replay).await;
}

#[tokio::test]
async fn test_foreign_nonce_rejected_despite_valid_signature() {
    let h = harness();
    let key = wallet_key(4);

    let (cookie, _nonce) = fetch_challenge(&h.router).await;
    let response = post_callback(
        &h.router,
        Some(&cookie),
        signed_request(&key, "attacker-chosen-nonce").to_string(),
    )
    .await;

    assert_generic_rejection(response).await;
    assert!(h.identities.is_empty());
    // A mismatching attempt still burns the challenge
    assert!(h.challenges.is_empty());
}

#[tokio::test]
async fn test_missing_challenge_cookie_is_rejected() {
    let h = harness();
    let key = wallet_key(5);

    let (_cookie, nonce) = fetch_challenge(&h.router).await;
    let response = post_callback(&h.router, None, signed_request(&key, &nonce).to_string()).await;

    assert_generic_rejection(response).await;
}

#[tokio::test]
async fn test_nonce_from_other_browser_is_rejected() {
    let h = harness();
    let key = wallet_key(6);

    let (cookie_a, _nonce_a) = fetch_challenge(&h.router).await;
    let (_cookie_b, nonce_b) = fetch_challenge(&h.router).await;

    let response =
        post_callback(&h.router, Some(&cookie_a), signed_request(&key, &nonce_b).to_string())
            .await;
    assert_generic_rejection(response).await;
}

#[tokio::test]
async fn test_every_rejection_looks_the_same() {
    let h = harness();
    let key = wallet_key(7);
    let (cookie, nonce) = fetch_challenge(&h.router).await;

    let mut bad_signature = signed_request(&key, &nonce);
    bad_signature["signature"] = json!(to_base58(&[0u8; 64]));

    let unknown_field = json!({
        "message": json!({
            "domain": "example.com",
            "publicKey": wallet_of(&key),
            "nonce": nonce,
            "admin": true,
        }).to_string(),
        "signature": "x",
    });

    let missing_fields = json!({
        "message": json!({ "domain": "example.com" }).to_string(),
        "signature": "x",
    });

    let bodies = [
        "not json".to_string(),
        json!({ "message": "{", "signature": "x" }).to_string(),
        unknown_field.to_string(),
        missing_fields.to_string(),
        bad_signature.to_string(),
    ];

    for body in bodies {
        let response = post_callback(&h.router, Some(&cookie), body).await;
        assert_generic_rejection(response).await;
    }
}

#[tokio::test]
async fn test_rate_limit_blocks_valid_signature_after_five_failures() {
    let h = harness();
    let key = wallet_key(8);
    let (cookie, nonce) = fetch_challenge(&h.router).await;

    for _ in 0..5 {
        let mut bad = signed_request(&key, &nonce);
        bad["signature"] = json!(to_base58(&[1u8; 64]));
        let response = post_callback(&h.router, Some(&cookie), bad.to_string()).await;
        assert_generic_rejection(response).await;
    }

    // Sixth attempt is correctly signed but over the limit
    let response =
        post_callback(&h.router, Some(&cookie), signed_request(&key, &nonce).to_string()).await;
    assert_generic_rejection(response).await;

    // Rate limiting happens before the nonce step, so the challenge survives
    assert_eq!(h.challenges.len(), 1);
    assert!(h.identities.is_empty());
}

// ============================================================================
// Collaborator failure
// ============================================================================

struct UnavailableIdentityRepository;

impl IdentityRepository for UnavailableIdentityRepository {
    async fn find_by_wallet(&self, _wallet: &WalletAddress) -> AuthResult<Option<Identity>> {
        Err(AuthError::Database(sqlx::Error::PoolTimedOut))
    }

    async fn create(&self, _identity: &Identity) -> AuthResult<Identity> {
        Err(AuthError::Database(sqlx::Error::PoolTimedOut))
    }
}

#[tokio::test]
async fn test_identity_store_failure_is_server_error() {
    let router = auth_router(AuthAppState {
        identities: Arc::new(UnavailableIdentityRepository),
        challenges: Arc::new(MemoryChallengeRepository::new()),
        rate_limits: Arc::new(MemoryRateLimitStore::new()),
        config: Arc::new(AuthConfig::development()),
    });
    let key = wallet_key(9);

    let (cookie, nonce) = fetch_challenge(&router).await;
    let response =
        post_callback(&router, Some(&cookie), signed_request(&key, &nonce).to_string()).await;

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        body_json(response).await,
        json!({ "success": false, "error": "Internal server error" })
    );
}

// ============================================================================
// Session and guards
// ============================================================================

#[tokio::test]
async fn test_session_status() {
    let h = harness();
    let key = wallet_key(10);

    let anonymous = h
        .router
        .clone()
        .oneshot(Request::get("/session").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(body_json(anonymous).await["data"]["authenticated"], false);

    let session = sign_in(&h.router, &key).await;
    let response = h
        .router
        .clone()
        .oneshot(
            Request::get("/session")
                .header(header::COOKIE, session)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    let body = body_json(response).await;
    assert_eq!(body["data"]["authenticated"], true);
    assert_eq!(body["data"]["user"]["identityKey"], wallet_of(&key).as_str());
}

#[tokio::test]
async fn test_sign_out_clears_cookie() {
    let h = harness();
    let response = h
        .router
        .clone()
        .oneshot(Request::post("/signout").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NO_CONTENT);
    let set_cookie = response.headers()[header::SET_COOKIE].to_str().unwrap();
    assert!(set_cookie.starts_with("wallet_session=;"));
    assert!(set_cookie.contains("Max-Age=0"));
}

#[tokio::test]
async fn test_identity_route_requires_session() {
    let h = harness();
    let wallet = wallet_of(&wallet_key(11));

    let response = h
        .router
        .clone()
        .oneshot(
            Request::get(format!("/identities/{wallet}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(
        body_json(response).await,
        json!({ "success": false, "error": "Authentication required" })
    );
}

#[tokio::test]
async fn test_identity_route_rejects_forged_session() {
    let h = harness();
    let wallet = wallet_of(&wallet_key(12));

    let response = h
        .router
        .clone()
        .oneshot(
            Request::get(format!("/identities/{wallet}"))
                .header(header::COOKIE, "wallet_session=e30.AAAA")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_identity_route_enforces_ownership() {
    let h = harness();
    let owner = wallet_key(13);
    let other = wallet_key(14);
    let session = sign_in(&h.router, &owner).await;

    let own = h
        .router
        .clone()
        .oneshot(
            Request::get(format!("/identities/{}", wallet_of(&owner)))
                .header(header::COOKIE, session.clone())
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(own.status(), StatusCode::OK);
    let body = body_json(own).await;
    assert_eq!(body["data"]["level"], 1);
    assert_eq!(body["data"]["stats"]["gamesPlayed"], 0);

    let foreign = h
        .router
        .clone()
        .oneshot(
            Request::get(format!("/identities/{}", wallet_of(&other)))
                .header(header::COOKIE, session)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(foreign.status(), StatusCode::FORBIDDEN);
    assert_eq!(
        body_json(foreign).await,
        json!({ "success": false, "error": "Access denied: wallet ownership required" })
    );
}

#[tokio::test]
async fn test_error_page_codes() {
    let h = harness();

    let response = h
        .router
        .clone()
        .oneshot(
            Request::get("/error?error=AccessDenied")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    let body = body_json(response).await;
    assert_eq!(body["data"]["title"], "Access Denied");
    assert_eq!(body["data"]["canRetry"], false);

    let response = h
        .router
        .clone()
        .oneshot(
            Request::get("/error?error=bad+signature")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(body_json(response).await["data"]["code"], "Default");
}
