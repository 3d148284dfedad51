mod common;

use axum::http::StatusCode;
use ethers::types::Address;

#[tokio::test]
async fn test_leaderboard_starts_empty() {
    let (app, _chain) = common::create_test_app();

    let (status, json) = common::send(&app, "GET", "/api/v1/leaderboard", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["entries"], serde_json::json!([]));
}

#[tokio::test]
async fn test_connecting_registers_a_zero_row() {
    let (app, _chain) = common::create_test_app();
    let session_id = common::create_session(&app).await;
    common::connect(&app, &session_id).await;

    let (_, json) = common::send(&app, "GET", "/api/v1/leaderboard", None).await;

    let entries = json["entries"].as_array().unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0]["rank"], 1);
    assert_eq!(entries[0]["account"], common::DEV_ACCOUNT_HEX);
    assert_eq!(entries[0]["completed_questions"], 0);
    assert_eq!(entries[0]["token_balance"], "0");

    // Reconnecting the same account never duplicates the row, even from
    // another session
    common::connect(&app, &session_id).await;
    let other = common::create_session(&app).await;
    common::connect(&app, &other).await;
    let (_, json) = common::send(&app, "GET", "/api/v1/leaderboard", None).await;
    assert_eq!(json["entries"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_leaderboard_orders_accounts_by_completed_questions() {
    let (app, chain) = common::create_test_app();

    // First player scores once as the dev account
    let first = common::create_session(&app).await;
    common::connect(&app, &first).await;
    common::select(&app, &first, common::CORRECT_ANSWER).await;
    common::submit(&app, &first).await;

    // Second player, a different wallet account, scores twice
    chain
        .set_accounts(vec![Address::from_low_u64_be(0xB0B)])
        .await;
    let second = common::create_session(&app).await;
    common::connect(&app, &second).await;
    for _ in 0..2 {
        common::select(&app, &second, common::CORRECT_ANSWER).await;
        let (status, _) = common::submit(&app, &second).await;
        assert_eq!(status, StatusCode::OK);
    }

    let (_, json) = common::send(&app, "GET", "/api/v1/leaderboard", None).await;

    let entries = json["entries"].as_array().unwrap();
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0]["rank"], 1);
    assert_eq!(
        entries[0]["account"],
        "0x0000000000000000000000000000000000000b0b"
    );
    assert_eq!(entries[0]["completed_questions"], 2);
    assert_eq!(entries[0]["token_balance"], "0.00000002");
    assert_eq!(entries[1]["rank"], 2);
    assert_eq!(entries[1]["account"], common::DEV_ACCOUNT_HEX);
    assert_eq!(entries[1]["completed_questions"], 1);
    assert_eq!(entries[1]["token_balance"], "0.00000001");
}

#[tokio::test]
async fn test_standings_survive_a_session_reset() {
    let (app, _chain) = common::create_test_app();
    let session_id = common::create_session(&app).await;
    common::connect(&app, &session_id).await;
    common::select(&app, &session_id, common::CORRECT_ANSWER).await;
    common::submit(&app, &session_id).await;

    common::send(
        &app,
        "POST",
        &format!("/api/v1/sessions/{}/reset", session_id),
        None,
    )
    .await;

    // Resetting a session never takes earned standings away
    let (_, json) = common::send(&app, "GET", "/api/v1/leaderboard", None).await;
    let entries = json["entries"].as_array().unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0]["completed_questions"], 1);
    assert_eq!(entries[0]["token_balance"], "0.00000001");
}
