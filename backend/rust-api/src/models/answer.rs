use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
pub struct SelectAnswerRequest {
    pub option: String,
}

#[derive(Debug, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SubmitResult {
    Correct,
    Incorrect,
}

#[derive(Debug, Serialize)]
pub struct SubmitAnswerResponse {
    pub result: SubmitResult,
    pub message: String,
    pub completed_questions: u32,
    pub wrong_answers: u32,
    pub remaining_attempts: u32,
    /// Hash of the reward transaction, present only on a correct answer.
    pub reward_tx: Option<String>,
    pub token_balance: String,
    pub unlocked_achievements: Vec<String>,
    pub newly_unlocked: Vec<String>,
}
