use std::sync::Arc;

use thiserror::Error;
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::chain::ChainError;
use crate::metrics::{
    track_chain_call, LEADERBOARD_SIZE, SESSIONS_ACTIVE, SESSIONS_TOTAL, WALLET_CONNECTS_TOTAL,
};
use crate::models::session::{QuizSession, SessionView};
use crate::services::AppState;

pub const MSG_CONNECTED: &str = "Wallet connected";
pub const MSG_CONNECT_FAILED: &str = "Wallet connection failed";
pub const MSG_INSTALL_WALLET: &str = "No wallet provider found, install a browser wallet to play";
pub const MSG_RESET: &str = "Quiz reset, start again!";

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("session not found")]
    NotFound,
    #[error("connect a wallet before submitting an answer")]
    NotConnected,
    #[error("attempt limit reached, reset the quiz to continue")]
    AttemptLimitReached,
    #[error(transparent)]
    Chain(#[from] ChainError),
}

pub struct SessionService {
    state: Arc<AppState>,
}

impl SessionService {
    pub fn new(state: Arc<AppState>) -> Self {
        Self { state }
    }

    pub async fn create_session(&self) -> SessionView {
        let question = self.state.pick_question().await;
        let session = QuizSession::new(Uuid::new_v4().to_string(), question);
        let view = SessionView::of(&session, &self.state.config);

        let mut sessions = self.state.sessions.write().await;
        sessions.insert(session.id.clone(), Arc::new(Mutex::new(session)));
        SESSIONS_TOTAL.with_label_values(&["created"]).inc();
        SESSIONS_ACTIVE.set(sessions.len() as i64);

        tracing::info!("Created quiz session {}", view.session_id);
        view
    }

    pub async fn view(&self, session_id: &str) -> Result<SessionView, SessionError> {
        let handle = self.handle(session_id).await?;
        let session = handle.lock().await;
        Ok(SessionView::of(&session, &self.state.config))
    }

    /// Connects the provider's first account to the session. Switching to a
    /// different account drops the previous account's progress; reconnecting
    /// the same account keeps it.
    pub async fn connect_wallet(&self, session_id: &str) -> Result<SessionView, SessionError> {
        let handle = self.handle(session_id).await?;
        let mut session = handle.lock().await;

        let accounts = match track_chain_call(
            "request_accounts",
            self.state.wallet.request_accounts(),
        )
        .await
        {
            Ok(accounts) => accounts,
            Err(e) => {
                session.message = Some(connect_failure_message(&e).to_string());
                session.touch();
                WALLET_CONNECTS_TOTAL.with_label_values(&["failure"]).inc();
                tracing::warn!("Wallet connection failed for session {}: {}", session_id, e);
                return Err(e.into());
            }
        };
        let account = match accounts.first() {
            Some(account) => *account,
            None => {
                session.message = Some(MSG_INSTALL_WALLET.to_string());
                session.touch();
                WALLET_CONNECTS_TOTAL.with_label_values(&["failure"]).inc();
                return Err(SessionError::Chain(ChainError::NoAccounts));
            }
        };

        if session.account != Some(account) {
            // New identity: progress belongs to the previous account.
            session.account = Some(account);
            session.reset_progress();

            let mut board = self.state.leaderboard.write().await;
            if board.ensure_entry(account) {
                LEADERBOARD_SIZE.set(board.len() as i64);
            }
        }

        match track_chain_call("native_balance", self.state.wallet.native_balance(account)).await {
            Ok(balance) => session.native_balance_wei = balance,
            Err(e) => {
                session.message = Some(MSG_CONNECT_FAILED.to_string());
                session.touch();
                WALLET_CONNECTS_TOTAL.with_label_values(&["failure"]).inc();
                tracing::warn!("Balance fetch failed for session {}: {}", session_id, e);
                return Err(e.into());
            }
        }

        // Token balance is display-only, a failed read must not block connect.
        match track_chain_call("balance_of", self.state.token.balance_of(account)).await {
            Ok(balance) => session.token_balance_wei = balance,
            Err(e) => {
                tracing::warn!("Token balance fetch failed for {:?}: {}", account, e);
            }
        }

        session.message = Some(MSG_CONNECTED.to_string());
        session.touch();
        WALLET_CONNECTS_TOTAL.with_label_values(&["success"]).inc();
        tracing::info!("Session {} connected account {:?}", session_id, account);

        Ok(SessionView::of(&session, &self.state.config))
    }

    /// Swaps in a fresh random question without grading anything. Skipping
    /// never touches the counters.
    pub async fn next_question(&self, session_id: &str) -> Result<SessionView, SessionError> {
        let handle = self.handle(session_id).await?;
        let mut session = handle.lock().await;
        let question = self.state.pick_question().await;
        session.put_question(question);
        Ok(SessionView::of(&session, &self.state.config))
    }

    /// Records the highlighted option verbatim. Nothing is validated here;
    /// grading happens at submission, where a stray value is just a miss.
    pub async fn select_answer(
        &self,
        session_id: &str,
        option: String,
    ) -> Result<SessionView, SessionError> {
        let handle = self.handle(session_id).await?;
        let mut session = handle.lock().await;
        session.selected_answer = Some(option);
        session.touch();
        Ok(SessionView::of(&session, &self.state.config))
    }

    /// Starts the run over: counters and achievements go, the wallet stays.
    /// Waits on the session lock, so an in-flight submission finishes first.
    pub async fn reset(&self, session_id: &str) -> Result<SessionView, SessionError> {
        let handle = self.handle(session_id).await?;
        let mut session = handle.lock().await;
        session.reset_progress();
        let question = self.state.pick_question().await;
        session.put_question(question);
        session.message = Some(MSG_RESET.to_string());
        SESSIONS_TOTAL.with_label_values(&["reset"]).inc();
        tracing::info!("Session {} reset", session_id);
        Ok(SessionView::of(&session, &self.state.config))
    }

    async fn handle(&self, session_id: &str) -> Result<Arc<Mutex<QuizSession>>, SessionError> {
        let sessions = self.state.sessions.read().await;
        sessions
            .get(session_id)
            .cloned()
            .ok_or(SessionError::NotFound)
    }
}

fn connect_failure_message(err: &ChainError) -> &'static str {
    match err {
        ChainError::ProviderUnavailable(_) | ChainError::NoAccounts => MSG_INSTALL_WALLET,
        _ => MSG_CONNECT_FAILED,
    }
}
