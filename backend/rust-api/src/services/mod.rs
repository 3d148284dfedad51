use std::collections::HashMap;
use std::sync::Arc;

use rand::rngs::StdRng;
use rand::SeedableRng;
use tokio::sync::{Mutex, RwLock};

use crate::chain::{RewardToken, WalletGateway};
use crate::config::Config;
use crate::models::leaderboard::Leaderboard;
use crate::models::question::{Question, QuestionBank};
use crate::models::session::QuizSession;

pub struct AppState {
    pub config: Config,
    pub bank: QuestionBank,
    pub wallet: Arc<dyn WalletGateway>,
    pub token: Arc<dyn RewardToken>,
    /// Question selection RNG. Seeded from config when a deterministic run
    /// is wanted, otherwise from the OS.
    pub rng: Mutex<StdRng>,
    /// Open sessions by id. Each session carries its own lock so one slow
    /// submission never blocks the others.
    pub sessions: RwLock<HashMap<String, Arc<Mutex<QuizSession>>>>,
    pub leaderboard: RwLock<Leaderboard>,
}

impl AppState {
    pub fn new(
        config: Config,
        bank: QuestionBank,
        wallet: Arc<dyn WalletGateway>,
        token: Arc<dyn RewardToken>,
    ) -> Self {
        let rng = match config.question_seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        Self {
            config,
            bank,
            wallet,
            token,
            rng: Mutex::new(rng),
            sessions: RwLock::new(HashMap::new()),
            leaderboard: RwLock::new(Leaderboard::default()),
        }
    }

    pub async fn pick_question(&self) -> Question {
        let mut rng = self.rng.lock().await;
        self.bank.pick(&mut *rng).clone()
    }
}

pub mod answer_service;
pub mod session_service;
