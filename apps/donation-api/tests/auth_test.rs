mod common;

use axum::http::header::AUTHORIZATION;
use axum::http::StatusCode;
use axum_test::TestServer;
use serde_json::Value;

use donation_api::auth::password::verify_password;

// ---------------------------------------------------------------------------
// POST /api/admin/login
// ---------------------------------------------------------------------------

#[tokio::test]
async fn login_returns_bearer_token() {
    let (app, state) = common::test_app().await;
    let server = TestServer::new(app).unwrap();

    let resp = server
        .post("/api/admin/login")
        .json(&serde_json::json!({ "username": "alice", "password": common::ADMIN_PASSWORD }))
        .await;

    resp.assert_status_ok();
    let body: Value = resp.json();
    assert_eq!(body["token_type"], "bearer");
    assert_eq!(body["expires_in"], 1800);

    let token = body["access_token"].as_str().unwrap();
    assert_eq!(state.tokens.verify(token).unwrap(), "alice");
}

#[tokio::test]
async fn login_rejects_bad_credentials() {
    let (app, _state) = common::test_app().await;
    let server = TestServer::new(app).unwrap();

    for (username, password) in [("alice", "wrong-password"), ("nobody", common::ADMIN_PASSWORD)] {
        let resp = server
            .post("/api/admin/login")
            .json(&serde_json::json!({ "username": username, "password": password }))
            .await;
        resp.assert_status(StatusCode::UNAUTHORIZED);
        assert_eq!(
            resp.json::<Value>()["error"]["message"],
            "Incorrect username or password"
        );
    }
}

#[tokio::test]
async fn login_rejects_disabled_account() {
    let (app, _state) = common::test_app().await;
    let server = TestServer::new(app).unwrap();

    let resp = server
        .post("/api/admin/login")
        .json(&serde_json::json!({ "username": "mallory", "password": common::ADMIN_PASSWORD }))
        .await;
    resp.assert_status(StatusCode::UNAUTHORIZED);
    assert_eq!(resp.json::<Value>()["error"]["message"], "Account disabled");
}

// ---------------------------------------------------------------------------
// PUT /api/admin/change-password
// ---------------------------------------------------------------------------

#[tokio::test]
async fn change_password_rehashes() {
    let (app, state) = common::test_app().await;
    let server = TestServer::new(app).unwrap();
    let token = common::mint_token(&state, "bob");

    let resp = server
        .put("/api/admin/change-password")
        .add_header(AUTHORIZATION, format!("Bearer {token}"))
        .json(&serde_json::json!({
            "current_password": common::ADMIN_PASSWORD,
            "new_password": "a-much-longer-one",
        }))
        .await;

    resp.assert_status_ok();
    assert_eq!(resp.json::<Value>()["success"], true);

    let bob = state.store.find_admin("bob").await.unwrap().unwrap();
    assert!(verify_password("a-much-longer-one", &bob.password_hash));
    assert!(!verify_password(common::ADMIN_PASSWORD, &bob.password_hash));
}

#[tokio::test]
async fn change_password_validates_input() {
    let (app, state) = common::test_app().await;
    let server = TestServer::new(app).unwrap();
    let token = common::mint_token(&state, "bob");

    let cases = [
        (
            serde_json::json!({ "new_password": "a-much-longer-one" }),
            "current_password and new_password are required",
        ),
        (
            serde_json::json!({ "current_password": "nope", "new_password": "a-much-longer-one" }),
            "Current password is incorrect",
        ),
        (
            serde_json::json!({ "current_password": common::ADMIN_PASSWORD, "new_password": "short" }),
            "New password must be at least 8 characters long",
        ),
    ];

    for (body, message) in cases {
        let resp = server
            .put("/api/admin/change-password")
            .add_header(AUTHORIZATION, format!("Bearer {token}"))
            .json(&body)
            .await;
        resp.assert_status(StatusCode::BAD_REQUEST);
        assert_eq!(resp.json::<Value>()["error"]["message"], message);
    }
}

#[tokio::test]
async fn change_password_requires_token() {
    let (app, _state) = common::test_app().await;
    let server = TestServer::new(app).unwrap();

    let resp = server
        .put("/api/admin/change-password")
        .json(&serde_json::json!({
            "current_password": common::ADMIN_PASSWORD,
            "new_password": "a-much-longer-one",
        }))
        .await;
    resp.assert_status(StatusCode::UNAUTHORIZED);
}
