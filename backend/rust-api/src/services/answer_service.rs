use std::sync::Arc;

use ethers::types::U256;

use crate::chain::format_ether;
use crate::metrics::{
    track_chain_call, ACHIEVEMENTS_UNLOCKED_TOTAL, ANSWERS_SUBMITTED_TOTAL, LEADERBOARD_SIZE,
    REWARDS_SENT_TOTAL, REWARD_WEI_TOTAL,
};
use crate::models::achievement::label_for;
use crate::models::answer::{SubmitAnswerResponse, SubmitResult};
use crate::services::session_service::SessionError;
use crate::services::AppState;

pub const MSG_NOT_CONNECTED: &str = "Connect a wallet before submitting an answer";
pub const MSG_LIMIT_REACHED: &str = "Attempt limit reached, reset the quiz to continue";
pub const MSG_GAME_OVER: &str = "Too many wrong answers, the quiz is over. Reset to try again";
pub const MSG_REWARD_FAILED: &str = "Reward transfer failed, your progress was not updated";

pub struct AnswerService {
    state: Arc<AppState>,
}

impl AnswerService {
    pub fn new(state: Arc<AppState>) -> Self {
        Self { state }
    }

    /// Grades the pending selection. The session lock is held for the whole
    /// submission including the reward transfer, so overlapping submits for
    /// one session can never pay out twice for the same question.
    pub async fn submit_answer(
        &self,
        session_id: &str,
    ) -> Result<SubmitAnswerResponse, SessionError> {
        let handle = {
            let sessions = self.state.sessions.read().await;
            sessions
                .get(session_id)
                .cloned()
                .ok_or(SessionError::NotFound)?
        };
        let mut session = handle.lock().await;

        let Some(account) = session.account else {
            session.message = Some(MSG_NOT_CONNECTED.to_string());
            session.touch();
            ANSWERS_SUBMITTED_TOTAL
                .with_label_values(&["rejected"])
                .inc();
            return Err(SessionError::NotConnected);
        };

        let max_wrong = self.state.config.max_wrong_answers;
        if session.wrong_answers >= max_wrong {
            session.message = Some(MSG_LIMIT_REACHED.to_string());
            session.touch();
            ANSWERS_SUBMITTED_TOTAL
                .with_label_values(&["rejected"])
                .inc();
            return Err(SessionError::AttemptLimitReached);
        }

        // No selection submits as an empty answer, which can never match.
        let selected = session.selected_answer.clone().unwrap_or_default();
        let correct = selected == session.question.correct_answer;

        tracing::info!(
            "Grading submission: session={}, account={:?}, correct={}",
            session_id,
            account,
            correct
        );

        if correct {
            let amount = U256::from(self.state.config.reward_amount_wei);
            let tx = match track_chain_call("reward_user", self.state.token.reward(account, amount))
                .await
            {
                Ok(tx) => tx,
                Err(e) => {
                    REWARDS_SENT_TOTAL.with_label_values(&["failure"]).inc();
                    session.message = Some(MSG_REWARD_FAILED.to_string());
                    session.touch();
                    tracing::error!("Reward transfer failed for session {}: {}", session_id, e);
                    return Err(e.into());
                }
            };
            REWARDS_SENT_TOTAL.with_label_values(&["success"]).inc();
            REWARD_WEI_TOTAL.inc_by(self.state.config.reward_amount_wei as f64);

            session.completed_questions += 1;
            let completed = session.completed_questions;
            let newly = session.achievements.unlock_for(completed);
            if !newly.is_empty() {
                ACHIEVEMENTS_UNLOCKED_TOTAL.inc_by(newly.len() as u64);
            }

            // Refresh the snapshot so the leaderboard row reflects this payout.
            match track_chain_call("balance_of", self.state.token.balance_of(account)).await {
                Ok(balance) => session.token_balance_wei = balance,
                Err(e) => {
                    tracing::warn!("Token balance refresh failed for {:?}: {}", account, e);
                }
            }

            {
                let mut board = self.state.leaderboard.write().await;
                board.record_progress(
                    account,
                    session.completed_questions,
                    session.token_balance_wei,
                );
                LEADERBOARD_SIZE.set(board.len() as i64);
            }

            ANSWERS_SUBMITTED_TOTAL
                .with_label_values(&["correct"])
                .inc();

            let message = format!(
                "Correct! {} {} sent to your wallet",
                format_ether(amount),
                self.state.config.token_symbol
            );
            let response = SubmitAnswerResponse {
                result: SubmitResult::Correct,
                message: message.clone(),
                completed_questions: session.completed_questions,
                wrong_answers: session.wrong_answers,
                remaining_attempts: session.remaining_attempts(max_wrong),
                reward_tx: Some(format!("{:?}", tx)),
                token_balance: format_ether(session.token_balance_wei),
                unlocked_achievements: session.achievements.labels(),
                newly_unlocked: newly.iter().map(|t| label_for(*t)).collect(),
            };

            tracing::info!(
                "Answer correct: session={}, completed={}, tx={:?}",
                session_id,
                session.completed_questions,
                tx
            );

            // Advance to a fresh question; this clears selection and message.
            let question = self.state.pick_question().await;
            session.put_question(question);

            Ok(response)
        } else {
            session.wrong_answers += 1;
            let remaining = session.remaining_attempts(max_wrong);
            let message = if session.wrong_answers >= max_wrong {
                MSG_GAME_OVER.to_string()
            } else {
                format!("Wrong answer, {} attempts remaining", remaining)
            };
            session.message = Some(message.clone());
            session.touch();
            ANSWERS_SUBMITTED_TOTAL
                .with_label_values(&["incorrect"])
                .inc();

            tracing::info!(
                "Answer wrong: session={}, wrong={}, remaining={}",
                session_id,
                session.wrong_answers,
                remaining
            );

            Ok(SubmitAnswerResponse {
                result: SubmitResult::Incorrect,
                message,
                completed_questions: session.completed_questions,
                wrong_answers: session.wrong_answers,
                remaining_attempts: remaining,
                reward_tx: None,
                token_balance: format_ether(session.token_balance_wei),
                unlocked_achievements: session.achievements.labels(),
                newly_unlocked: Vec::new(),
            })
        }
    }
}
