use chrono::{DateTime, Utc};
use ethers::types::{Address, U256};
use serde::Serialize;

use crate::chain::format_ether;
use crate::config::Config;
use crate::models::achievement::{AchievementSet, AchievementStatus};
use crate::models::question::Question;

/// Where a session sits in its lifecycle. Derived from the counters rather
/// than stored, so it can never drift out of sync with them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionPhase {
    Disconnected,
    Answering,
    LimitReached,
}

/// One player's quiz run: wallet identity, the question on screen, progress
/// counters and unlocked achievements.
#[derive(Debug, Clone)]
pub struct QuizSession {
    pub id: String,
    pub account: Option<Address>,
    pub native_balance_wei: U256,
    pub token_balance_wei: U256,
    pub question: Question,
    pub selected_answer: Option<String>,
    pub message: Option<String>,
    pub completed_questions: u32,
    pub wrong_answers: u32,
    pub achievements: AchievementSet,
    pub started_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl QuizSession {
    pub fn new(id: String, question: Question) -> Self {
        let now = Utc::now();
        QuizSession {
            id,
            account: None,
            native_balance_wei: U256::zero(),
            token_balance_wei: U256::zero(),
            question,
            selected_answer: None,
            message: None,
            completed_questions: 0,
            wrong_answers: 0,
            achievements: AchievementSet::default(),
            started_at: now,
            updated_at: now,
        }
    }

    pub fn phase(&self, max_wrong_answers: u32) -> SessionPhase {
        if self.account.is_none() {
            SessionPhase::Disconnected
        } else if self.wrong_answers >= max_wrong_answers {
            SessionPhase::LimitReached
        } else {
            SessionPhase::Answering
        }
    }

    pub fn remaining_attempts(&self, max_wrong_answers: u32) -> u32 {
        max_wrong_answers.saturating_sub(self.wrong_answers)
    }

    /// Replaces the question on screen. Any pending selection and status
    /// message belong to the old question, so both are dropped.
    pub fn put_question(&mut self, question: Question) {
        self.question = question;
        self.selected_answer = None;
        self.message = None;
        self.touch();
    }

    /// Drops quiz progress while keeping the wallet identity. Used when the
    /// connected account changes and on explicit reset.
    pub fn reset_progress(&mut self) {
        self.completed_questions = 0;
        self.wrong_answers = 0;
        self.achievements.clear();
        self.touch();
    }

    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

/// Everything a client needs to render the quiz screen. The embedded
/// question serializes without its correct answer.
#[derive(Debug, Serialize)]
pub struct SessionView {
    pub session_id: String,
    pub phase: SessionPhase,
    pub account: Option<Address>,
    pub eth_balance: String,
    pub token_balance: String,
    pub token_symbol: String,
    pub question: Question,
    pub selected_answer: Option<String>,
    pub message: Option<String>,
    pub completed_questions: u32,
    pub wrong_answers: u32,
    pub remaining_attempts: u32,
    pub achievements: Vec<AchievementStatus>,
    pub started_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl SessionView {
    pub fn of(session: &QuizSession, config: &Config) -> Self {
        SessionView {
            session_id: session.id.clone(),
            phase: session.phase(config.max_wrong_answers),
            account: session.account,
            eth_balance: format_ether(session.native_balance_wei),
            token_balance: format_ether(session.token_balance_wei),
            token_symbol: config.token_symbol.clone(),
            question: session.question.clone(),
            selected_answer: session.selected_answer.clone(),
            message: session.message.clone(),
            completed_questions: session.completed_questions,
            wrong_answers: session.wrong_answers,
            remaining_attempts: session.remaining_attempts(config.max_wrong_answers),
            achievements: session.achievements.checklist(),
            started_at: session.started_at,
            updated_at: session.updated_at,
        }
    }
}
