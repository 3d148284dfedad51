use chrono::{DateTime, Utc};
use ethers::types::{Address, U256};

/// Per-account standing. Balances are stored raw in wei and formatted at the
/// API boundary.
#[derive(Debug, Clone)]
pub struct LeaderboardEntry {
    pub account: Address,
    pub completed_questions: u32,
    pub token_balance_wei: U256,
    pub updated_at: DateTime<Utc>,
}

/// Process-wide standings across every account that ever connected, ordered
/// by completed questions descending. Ties keep first-seen order.
#[derive(Debug, Default)]
pub struct Leaderboard {
    entries: Vec<LeaderboardEntry>,
}

impl Leaderboard {
    /// Registers an account with a zero row so it shows up before its first
    /// correct answer. Returns false if the account was already present.
    pub fn ensure_entry(&mut self, account: Address) -> bool {
        if self.entries.iter().any(|e| e.account == account) {
            return false;
        }
        self.entries.push(LeaderboardEntry {
            account,
            completed_questions: 0,
            token_balance_wei: U256::zero(),
            updated_at: Utc::now(),
        });
        self.sort();
        true
    }

    /// Upserts an account's standing and re-sorts.
    pub fn record_progress(
        &mut self,
        account: Address,
        completed_questions: u32,
        token_balance_wei: U256,
    ) {
        match self.entries.iter_mut().find(|e| e.account == account) {
            Some(entry) => {
                entry.completed_questions = completed_questions;
                entry.token_balance_wei = token_balance_wei;
                entry.updated_at = Utc::now();
            }
            None => self.entries.push(LeaderboardEntry {
                account,
                completed_questions,
                token_balance_wei,
                updated_at: Utc::now(),
            }),
        }
        self.sort();
    }

    pub fn entries(&self) -> &[LeaderboardEntry] {
        &self.entries
    }

    pub fn contains(&self, account: Address) -> bool {
        self.entries.iter().any(|e| e.account == account)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn sort(&mut self) {
        self.entries
            .sort_by(|a, b| b.completed_questions.cmp(&a.completed_questions));
    }
}
