use std::sync::Arc;

use axum::{extract::State, Json};
use ethers::types::Address;
use serde::Serialize;

use crate::chain::format_ether;
use crate::services::AppState;

#[derive(Debug, Serialize)]
pub struct LeaderboardResponse {
    pub entries: Vec<LeaderboardRow>,
}

#[derive(Debug, Serialize)]
pub struct LeaderboardRow {
    pub rank: u32,
    pub account: Address,
    pub completed_questions: u32,
    pub token_balance: String,
}

/// Current standings. Rank is dense by position; ties were already ordered
/// first-seen-first by the model.
pub async fn get_leaderboard(State(state): State<Arc<AppState>>) -> Json<LeaderboardResponse> {
    let board = state.leaderboard.read().await;
    let entries = board
        .entries()
        .iter()
        .enumerate()
        .map(|(i, entry)| LeaderboardRow {
            rank: (i + 1) as u32,
            account: entry.account,
            completed_questions: entry.completed_questions,
            token_balance: format_ether(entry.token_balance_wei),
        })
        .collect();
    Json(LeaderboardResponse { entries })
}
