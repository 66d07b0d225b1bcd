use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use axum_test::TestServer;
use pocket_diviner::{
    divination::{MISSING_CREDENTIAL_NOTICE, SPOKEN_NOTICE},
    server::{handlers::AppState, router},
};
use pretty_assertions::assert_eq;
use serde_json::{Value, json};
use tower::ServiceExt; // for `oneshot`

mod common;
use common::{mocks::*, test_utils::*};

fn app_state(test: &TestDiviner) -> AppState {
    AppState::new(test.diviner.clone(), test.notices.clone())
}

fn test_server(test: &TestDiviner) -> TestServer {
    TestServer::new(router(app_state(test))).unwrap()
}

#[tokio::test]
async fn test_session_starts_empty() {
    let test = create_test_diviner(MockGenerativeClient::new());
    let server = test_server(&test);

    let response = server.get("/api/session").await;
    response.assert_status_ok();

    let body: Value = response.json();
    assert_eq!(body["seed"], "");
    assert_eq!(body["omen"], Value::Null);
    assert_eq!(body["is_loading"], false);
    assert_eq!(body["show_credential_form"], false);
    assert_eq!(body["has_credential"], false);
}

#[tokio::test]
async fn test_api_divine_without_credential() {
    let test = create_test_diviner(MockGenerativeClient::new());
    let server = test_server(&test);

    let response = server
        .post("/api/divine")
        .json(&json!({"seed": "a blue coffee cup"}))
        .await;
    response.assert_status_ok();

    let body: Value = response.json();
    assert_eq!(body["outcome"], "missing_credential");
    assert_eq!(body["notices"][0]["level"], "error");
    assert_eq!(body["notices"][0]["message"], MISSING_CREDENTIAL_NOTICE);

    let session: Value = server.get("/api/session").await.json();
    assert_eq!(session["show_credential_form"], true);
}

#[tokio::test]
async fn test_api_save_credential_then_divine() {
    let client = MockGenerativeClient::new()
        .script(TEXT_MODEL, Scripted::text("Still waters reflect deep skies."))
        .script(IMAGE_MODEL, Scripted::image("iVBORw0KGgo="));
    let test = create_test_diviner(client);
    let server = test_server(&test);

    let saved: Value = server
        .put("/api/credential")
        .json(&json!({"api_key": " my-key "}))
        .await
        .json();
    assert_eq!(saved["saved"], true);
    assert_eq!(saved["notices"].as_array().unwrap().len(), 1);

    let response = server
        .post("/api/divine")
        .json(&json!({"seed": "a blue coffee cup"}))
        .await;
    response.assert_status_ok();

    let body: Value = response.json();
    assert_eq!(body["outcome"], "completed");
    assert_eq!(body["omen"], "Still waters reflect deep skies.");
    assert_eq!(body["icon"], "data:image/png;base64,iVBORw0KGgo=");
    assert_eq!(body["notices"][0]["message"], SPOKEN_NOTICE);
    assert_eq!(test.client.calls()[0].key, "my-key");
}

#[tokio::test]
async fn test_api_blank_credential_not_saved() {
    let test = create_test_diviner(MockGenerativeClient::new());
    let server = test_server(&test);

    let body: Value = server
        .put("/api/credential")
        .json(&json!({"api_key": "   "}))
        .await
        .json();

    assert_eq!(body["saved"], false);
    assert_eq!(body["notices"], json!([]));
}

#[tokio::test]
async fn test_api_divine_rejected_while_in_flight() {
    let test = create_keyed_diviner(MockGenerativeClient::new()).await;
    let state = app_state(&test);
    let server = TestServer::new(router(state.clone())).unwrap();

    let _busy = state.trigger.lock().await;
    let response = server
        .post("/api/divine")
        .json(&json!({"seed": "a blue coffee cup"}))
        .expect_failure()
        .await;

    assert_eq!(response.status_code(), StatusCode::CONFLICT);
    assert!(test.client.calls().is_empty());
}

#[tokio::test]
async fn test_index_renders_page() {
    let test = create_test_diviner(MockGenerativeClient::new());
    let server = test_server(&test);

    let response = server.get("/").await;
    response.assert_status_ok();

    let html = response.text();
    assert!(html.contains("The AI Pocket Diviner"));
    assert!(html.contains("Divine a Spark"));
    assert!(html.contains("Set API Key"));
}

#[tokio::test]
async fn test_form_flow_renders_result() {
    let client = MockGenerativeClient::new()
        .script(TEXT_MODEL, Scripted::text("Each drop a tiny messenger."))
        .script(IMAGE_MODEL, Scripted::Status(500, "Internal Server Error"));
    let test = create_test_diviner(client);
    let server = test_server(&test);

    let opened = server.get("/credential").await.text();
    assert!(opened.contains("Cosmic Connection Required"));

    let saved = server
        .post("/credential")
        .form(&[("api_key", "form-key")])
        .await
        .text();
    assert!(saved.contains("API key saved securely"));
    assert!(!saved.contains("Cosmic Connection Required"));
    assert!(saved.contains("Update API Key"));

    let divined = server
        .post("/divine")
        .form(&[("seed", "the sound of rain")])
        .await
        .text();
    assert!(divined.contains("Your Micro-Omen"));
    assert!(divined.contains("\"Each drop a tiny messenger.\""));
    assert!(divined.contains("The patterns have spoken..."));
    assert!(!divined.contains("<img"));
}

#[tokio::test]
async fn test_form_divine_while_busy_shows_loading_without_calls() {
    let test = create_keyed_diviner(MockGenerativeClient::new()).await;
    let state = app_state(&test);
    let app = router(state.clone());

    let _busy = state.trigger.lock().await;
    let request = Request::builder()
        .method("POST")
        .uri("/divine")
        .header("content-type", "application/x-www-form-urlencoded")
        .body(Body::from("seed=rain"))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert!(test.client.calls().is_empty());
}

#[tokio::test]
async fn test_api_sends_no_cross_origin_grant() {
    let test = create_keyed_diviner(MockGenerativeClient::new()).await;
    let app = router(app_state(&test));

    let preflight = Request::builder()
        .method("OPTIONS")
        .uri("/api/credential")
        .header("origin", "https://evil.example")
        .header("access-control-request-method", "PUT")
        .body(Body::empty())
        .unwrap();
    let response = app.clone().oneshot(preflight).await.unwrap();
    assert!(response.headers().get("access-control-allow-origin").is_none());

    let cross_origin = Request::builder()
        .method("GET")
        .uri("/api/session")
        .header("origin", "https://evil.example")
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(cross_origin).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers().get("access-control-allow-origin").is_none());
}
