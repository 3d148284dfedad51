use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use ethers::types::{Address, TxHash, U256};
use tokio::sync::Mutex;

use super::{ChainError, RewardToken, WalletGateway};

struct ChainState {
    accounts: Vec<Address>,
    native: HashMap<Address, U256>,
    tokens: HashMap<Address, U256>,
    fail_provider: bool,
    fail_native_balance: bool,
    fail_token_balance: bool,
    fail_transfers: bool,
    transfer_delay: Option<Duration>,
    next_tx: u64,
}

/// In-memory chain backend. Backs both chain traits so the quiz runs with no
/// Ethereum node at all; tests use the setters to script accounts and
/// failures.
pub struct InProcessChain {
    state: Mutex<ChainState>,
}

impl InProcessChain {
    /// Account exposed by a freshly built backend, funded with 1 ETH.
    pub fn dev_account() -> Address {
        Address::from_low_u64_be(0xA11CE)
    }

    pub fn new() -> Self {
        let account = Self::dev_account();
        let mut native = HashMap::new();
        native.insert(account, U256::exp10(18));
        InProcessChain {
            state: Mutex::new(ChainState {
                accounts: vec![account],
                native,
                tokens: HashMap::new(),
                fail_provider: false,
                fail_native_balance: false,
                fail_token_balance: false,
                fail_transfers: false,
                transfer_delay: None,
                next_tx: 1,
            }),
        }
    }

    pub async fn set_accounts(&self, accounts: Vec<Address>) {
        self.state.lock().await.accounts = accounts;
    }

    pub async fn fund_native(&self, account: Address, amount_wei: U256) {
        self.state.lock().await.native.insert(account, amount_wei);
    }

    pub async fn set_token_balance(&self, account: Address, amount_wei: U256) {
        self.state.lock().await.tokens.insert(account, amount_wei);
    }

    pub async fn token_balance(&self, account: Address) -> U256 {
        self.state
            .lock()
            .await
            .tokens
            .get(&account)
            .copied()
            .unwrap_or_default()
    }

    /// Makes account discovery and the liveness probe fail, as if no wallet
    /// provider were installed.
    pub async fn set_fail_provider(&self, fail: bool) {
        self.state.lock().await.fail_provider = fail;
    }

    /// Makes only the native balance query fail, leaving account discovery up.
    pub async fn set_fail_native_balance(&self, fail: bool) {
        self.state.lock().await.fail_native_balance = fail;
    }

    /// Makes only the token balance query fail, leaving account discovery up.
    pub async fn set_fail_token_balance(&self, fail: bool) {
        self.state.lock().await.fail_token_balance = fail;
    }

    pub async fn set_fail_transfers(&self, fail: bool) {
        self.state.lock().await.fail_transfers = fail;
    }

    /// Adds latency to reward transfers so tests can overlap submissions.
    pub async fn set_transfer_delay(&self, delay: Option<Duration>) {
        self.state.lock().await.transfer_delay = delay;
    }
}

impl Default for InProcessChain {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl WalletGateway for InProcessChain {
    async fn request_accounts(&self) -> Result<Vec<Address>, ChainError> {
        let state = self.state.lock().await;
        if state.fail_provider {
            return Err(ChainError::ProviderUnavailable(
                "no wallet provider installed".to_string(),
            ));
        }
        if state.accounts.is_empty() {
            return Err(ChainError::NoAccounts);
        }
        Ok(state.accounts.clone())
    }

    async fn native_balance(&self, account: Address) -> Result<U256, ChainError> {
        let state = self.state.lock().await;
        if state.fail_provider {
            return Err(ChainError::Call("provider offline".to_string()));
        }
        if state.fail_native_balance {
            return Err(ChainError::Call(
                "native balance failure injected".to_string(),
            ));
        }
        Ok(state.native.get(&account).copied().unwrap_or_default())
    }

    async fn ping(&self) -> Result<(), ChainError> {
        let state = self.state.lock().await;
        if state.fail_provider {
            return Err(ChainError::ProviderUnavailable(
                "provider offline".to_string(),
            ));
        }
        Ok(())
    }
}

#[async_trait]
impl RewardToken for InProcessChain {
    async fn balance_of(&self, account: Address) -> Result<U256, ChainError> {
        let state = self.state.lock().await;
        if state.fail_provider {
            return Err(ChainError::Call("provider offline".to_string()));
        }
        if state.fail_token_balance {
            return Err(ChainError::Call(
                "token balance failure injected".to_string(),
            ));
        }
        Ok(state.tokens.get(&account).copied().unwrap_or_default())
    }

    async fn reward(&self, recipient: Address, amount: U256) -> Result<TxHash, ChainError> {
        // Read the scripted behavior first, then sleep outside the lock so
        // overlapping transfers actually overlap.
        let delay = {
            let state = self.state.lock().await;
            if state.fail_transfers {
                return Err(ChainError::TransferRejected(
                    "transfer failure injected".to_string(),
                ));
            }
            state.transfer_delay
        };
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        let mut state = self.state.lock().await;
        let balance = state.tokens.entry(recipient).or_insert_with(U256::zero);
        *balance = balance.saturating_add(amount);
        let tx = TxHash::from_low_u64_be(state.next_tx);
        state.next_tx += 1;
        Ok(tx)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn reward_accumulates_token_balance() {
        let chain = InProcessChain::new();
        let account = Address::from_low_u64_be(7);
        chain.reward(account, U256::from(10u64)).await.unwrap();
        chain.reward(account, U256::from(5u64)).await.unwrap();
        assert_eq!(
            chain.balance_of(account).await.unwrap(),
            U256::from(15u64)
        );
    }

    #[tokio::test]
    async fn reward_tx_hashes_are_unique() {
        let chain = InProcessChain::new();
        let account = Address::from_low_u64_be(7);
        let a = chain.reward(account, U256::one()).await.unwrap();
        let b = chain.reward(account, U256::one()).await.unwrap();
        assert_ne!(a, b);
    }

    #[tokio::test]
    async fn injected_transfer_failure_leaves_balance_untouched() {
        let chain = InProcessChain::new();
        let account = Address::from_low_u64_be(7);
        chain.set_fail_transfers(true).await;
        let err = chain.reward(account, U256::one()).await.unwrap_err();
        assert!(matches!(err, ChainError::TransferRejected(_)));
        assert_eq!(chain.balance_of(account).await.unwrap(), U256::zero());
    }

    #[tokio::test]
    async fn balance_queries_can_fail_independently_of_discovery() {
        let chain = InProcessChain::new();
        let account = InProcessChain::dev_account();
        chain.set_fail_native_balance(true).await;
        chain.set_fail_token_balance(true).await;
        assert!(chain.request_accounts().await.is_ok());
        assert!(matches!(
            chain.native_balance(account).await.unwrap_err(),
            ChainError::Call(_)
        ));
        assert!(matches!(
            chain.balance_of(account).await.unwrap_err(),
            ChainError::Call(_)
        ));
    }

    #[tokio::test]
    async fn failed_provider_reports_unavailable() {
        let chain = InProcessChain::new();
        chain.set_fail_provider(true).await;
        let err = chain.request_accounts().await.unwrap_err();
        assert!(matches!(err, ChainError::ProviderUnavailable(_)));
        assert!(chain.ping().await.is_err());
    }

    #[tokio::test]
    async fn empty_account_list_reports_no_accounts() {
        let chain = InProcessChain::new();
        chain.set_accounts(vec![]).await;
        let err = chain.request_accounts().await.unwrap_err();
        assert!(matches!(err, ChainError::NoAccounts));
    }
}
