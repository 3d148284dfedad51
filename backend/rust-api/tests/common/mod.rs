#![allow(dead_code)]

use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use axum::Router;
use std::sync::Arc;
use tower::ServiceExt;

use chainquiz_api::chain::inprocess::InProcessChain;
use chainquiz_api::config::{ChainMode, Config};
use chainquiz_api::models::question::{Question, QuestionBank};
use chainquiz_api::{create_router, services::AppState};

pub const CORRECT_ANSWER: &str = "42";
pub const WRONG_ANSWER: &str = "41";
pub const DEV_ACCOUNT_HEX: &str = "0x00000000000000000000000000000000000a11ce";
pub const REWARD_WEI: u128 = 10_000_000_000;

pub fn test_config() -> Config {
    Config {
        bind_addr: "127.0.0.1:0".to_string(),
        chain_mode: ChainMode::InProcess,
        eth_rpc_url: "http://localhost:8545".to_string(),
        eth_chain_id: 31337,
        token_address: String::new(),
        reward_issuer_key: None,
        reward_amount_wei: REWARD_WEI,
        max_wrong_answers: 20,
        token_symbol: "QT".to_string(),
        question_bank_path: None,
        question_seed: Some(42),
    }
}

/// Single-question bank so every round asks the same thing and the correct
/// answer is known to the tests.
fn test_bank() -> QuestionBank {
    QuestionBank::from_questions(vec![Question {
        prompt: "What is 6 * 7?".to_string(),
        options: vec!["41".to_string(), "42".to_string(), "43".to_string()],
        correct_answer: CORRECT_ANSWER.to_string(),
    }])
    .expect("test bank must validate")
}

/// Builds the app against an in-process chain and hands the chain back so
/// tests can script accounts, balances and failures.
pub fn create_test_app() -> (Router, Arc<InProcessChain>) {
    // try_init so repeated calls across tests stay quiet
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_max_level(tracing::Level::DEBUG)
        .try_init();

    let chain = Arc::new(InProcessChain::new());
    let app_state = Arc::new(AppState::new(
        test_config(),
        test_bank(),
        chain.clone(),
        chain.clone(),
    ));

    (create_router(app_state), chain)
}

/// Fires one request and decodes the JSON body (Null when the body is empty
/// or not JSON).
pub async fn send(
    app: &Router,
    method: &str,
    uri: &str,
    body: Option<serde_json::Value>,
) -> (StatusCode, serde_json::Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    let body = match body {
        Some(json) => {
            builder = builder.header("content-type", "application/json");
            Body::from(json.to_string())
        }
        None => Body::empty(),
    };

    let response = app
        .clone()
        .oneshot(builder.body(body).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let json = serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null);
    (status, json)
}

pub async fn create_session(app: &Router) -> String {
    let (status, json) = send(app, "POST", "/api/v1/sessions", None).await;
    assert_eq!(status, StatusCode::CREATED);
    json["session_id"].as_str().unwrap().to_string()
}

pub async fn connect(app: &Router, session_id: &str) -> (StatusCode, serde_json::Value) {
    send(
        app,
        "POST",
        &format!("/api/v1/sessions/{}/connect", session_id),
        None,
    )
    .await
}

pub async fn select(app: &Router, session_id: &str, option: &str) -> (StatusCode, serde_json::Value) {
    send(
        app,
        "PUT",
        &format!("/api/v1/sessions/{}/answer", session_id),
        Some(serde_json::json!({ "option": option })),
    )
    .await
}

pub async fn submit(app: &Router, session_id: &str) -> (StatusCode, serde_json::Value) {
    send(
        app,
        "POST",
        &format!("/api/v1/sessions/{}/answers", session_id),
        None,
    )
    .await
}

pub async fn get_session(app: &Router, session_id: &str) -> (StatusCode, serde_json::Value) {
    send(app, "GET", &format!("/api/v1/sessions/{}", session_id), None).await
}
