mod common;

use axum::http::StatusCode;
use axum_test::TestServer;
use serde_json::Value;

// ---------------------------------------------------------------------------
// POST /api/submit-donation
// ---------------------------------------------------------------------------

#[tokio::test]
async fn submit_donation_returns_created() {
    let (app, state) = common::test_app().await;
    let server = TestServer::new(app).unwrap();

    let resp = server
        .post("/api/submit-donation")
        .json(&common::donation_body("FT23ABC001"))
        .await;

    resp.assert_status(StatusCode::CREATED);
    let body: Value = resp.json();
    assert_eq!(body["success"], true);
    assert_eq!(body["transaction_reference"], "FT23ABC001");
    assert!(body["id"].as_i64().unwrap() > 0);

    let stored = state
        .store
        .get_donation(body["id"].as_i64().unwrap() as i32)
        .await
        .unwrap()
        .expect("stored submission");
    assert_eq!(stored.donor_name, "Abebe Kebede");
    assert!(!stored.is_verified);
}

#[tokio::test]
async fn submit_donation_without_reference_is_accepted() {
    let (app, _state) = common::test_app().await;
    let server = TestServer::new(app).unwrap();

    let mut body = common::donation_body("unused");
    body.as_object_mut().unwrap().remove("transaction_reference");
    body.as_object_mut().unwrap().remove("message");

    for _ in 0..2 {
        let resp = server.post("/api/submit-donation").json(&body).await;
        resp.assert_status(StatusCode::CREATED);
        assert!(resp.json::<Value>()["transaction_reference"].is_null());
    }
}

#[tokio::test]
async fn duplicate_reference_is_conflict() {
    let (app, _state) = common::test_app().await;
    let server = TestServer::new(app).unwrap();

    server
        .post("/api/submit-donation")
        .json(&common::donation_body("FT-DUP-1"))
        .await
        .assert_status(StatusCode::CREATED);

    let resp = server
        .post("/api/submit-donation")
        .json(&common::donation_body("FT-DUP-1"))
        .await;
    resp.assert_status(StatusCode::CONFLICT);
    assert_eq!(resp.json::<Value>()["error"]["code"], "CONFLICT");
}

#[tokio::test]
async fn invalid_submission_lists_every_bad_field() {
    let (app, state) = common::test_app().await;
    let server = TestServer::new(app).unwrap();

    let resp = server
        .post("/api/submit-donation")
        .json(&serde_json::json!({
            "transaction_reference": "a b",
            "donor_name": "X",
            "donor_contact": "not a contact",
            "bank_used": "",
            "amount_donated": "lots",
        }))
        .await;

    resp.assert_status(StatusCode::BAD_REQUEST);
    let body: Value = resp.json();
    assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
    let fields: Vec<&str> = body["error"]["details"]
        .as_array()
        .unwrap()
        .iter()
        .map(|d| d["field"].as_str().unwrap())
        .collect();
    assert_eq!(
        fields,
        vec![
            "transaction_reference",
            "donor_name",
            "donor_contact",
            "bank_used",
            "amount_donated"
        ]
    );

    assert_eq!(state.store.stats().await.unwrap().total, 0);
}
