mod common;

use axum::http::StatusCode;

/// Answers the current question correctly `rounds` times. Each correct
/// answer advances to a fresh question and clears the selection, so every
/// round has to select again.
async fn answer_correctly(app: &axum::Router, session_id: &str, rounds: u32) -> serde_json::Value {
    let mut last = serde_json::Value::Null;
    for _ in 0..rounds {
        common::select(app, session_id, common::CORRECT_ANSWER).await;
        let (status, json) = common::submit(app, session_id).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["result"], "correct");
        last = json;
    }
    last
}

#[tokio::test]
async fn test_achievements_unlock_at_thresholds() {
    let (app, _chain) = common::create_test_app();
    let session_id = common::create_session(&app).await;
    common::connect(&app, &session_id).await;

    let json = answer_correctly(&app, &session_id, 1).await;
    assert_eq!(json["newly_unlocked"], serde_json::json!(["Complete 1 question"]));

    // The second correct answer sits between thresholds
    let json = answer_correctly(&app, &session_id, 1).await;
    assert_eq!(json["newly_unlocked"], serde_json::json!([]));

    let json = answer_correctly(&app, &session_id, 1).await;
    assert_eq!(json["newly_unlocked"], serde_json::json!(["Complete 3 questions"]));

    let json = answer_correctly(&app, &session_id, 2).await;
    assert_eq!(json["newly_unlocked"], serde_json::json!(["Complete 5 questions"]));
    assert_eq!(
        json["unlocked_achievements"],
        serde_json::json!([
            "Complete 1 question",
            "Complete 3 questions",
            "Complete 5 questions"
        ])
    );
}

#[tokio::test]
async fn test_session_view_reports_checklist_state() {
    let (app, _chain) = common::create_test_app();
    let session_id = common::create_session(&app).await;
    common::connect(&app, &session_id).await;

    answer_correctly(&app, &session_id, 3).await;

    let (_, view) = common::get_session(&app, &session_id).await;
    let achievements = view["achievements"].as_array().unwrap();
    assert_eq!(achievements.len(), 8);

    assert_eq!(achievements[0]["threshold"], 1);
    assert_eq!(achievements[0]["label"], "Complete 1 question");
    assert_eq!(achievements[0]["unlocked"], true);
    assert_eq!(achievements[1]["threshold"], 3);
    assert_eq!(achievements[1]["unlocked"], true);
    assert_eq!(achievements[2]["threshold"], 5);
    assert_eq!(achievements[2]["unlocked"], false);
}

#[tokio::test]
async fn test_reset_clears_achievements_and_they_unlock_again() {
    let (app, _chain) = common::create_test_app();
    let session_id = common::create_session(&app).await;
    common::connect(&app, &session_id).await;

    answer_correctly(&app, &session_id, 1).await;

    let (status, json) = common::send(
        &app,
        "POST",
        &format!("/api/v1/sessions/{}/reset", session_id),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let achievements = json["achievements"].as_array().unwrap();
    assert!(achievements.iter().all(|a| a["unlocked"] == false));

    // Starting over earns the first achievement again
    let json = answer_correctly(&app, &session_id, 1).await;
    assert_eq!(json["newly_unlocked"], serde_json::json!(["Complete 1 question"]));
}
