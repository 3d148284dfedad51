use std::sync::Arc;

use async_trait::async_trait;
use ethers::types::{Address, TxHash, U256};
use thiserror::Error;

use crate::config::{ChainMode, Config};

pub mod eth;
pub mod inprocess;

#[derive(Debug, Error)]
pub enum ChainError {
    /// The wallet provider itself cannot be reached. The rendered message
    /// tells the player to install or unlock a wallet.
    #[error("wallet provider unavailable: {0}")]
    ProviderUnavailable(String),
    #[error("wallet provider returned no accounts")]
    NoAccounts,
    /// A read call (balance, token balance) failed after a wallet was found.
    #[error("chain call failed: {0}")]
    Call(String),
    /// The reward transaction was rejected before or at mining time.
    #[error("reward transfer rejected: {0}")]
    TransferRejected(String),
    /// The reward transaction left the mempool without a receipt.
    #[error("reward transaction dropped from the mempool")]
    TxDropped,
}

/// Wallet-provider side of the chain: account discovery and native balances.
#[async_trait]
pub trait WalletGateway: Send + Sync {
    /// Asks the provider for its unlocked accounts. The first one becomes
    /// the session identity.
    async fn request_accounts(&self) -> Result<Vec<Address>, ChainError>;

    async fn native_balance(&self, account: Address) -> Result<U256, ChainError>;

    /// Cheap liveness probe for health checks.
    async fn ping(&self) -> Result<(), ChainError>;
}

/// Reward-token side of the chain, mirroring the contract interface:
/// a balance read and an issuer-only transfer.
#[async_trait]
pub trait RewardToken: Send + Sync {
    async fn balance_of(&self, account: Address) -> Result<U256, ChainError>;

    /// Transfers `amount` of the reward token to `recipient`, signed by the
    /// configured issuer. Resolves only once the transaction is mined.
    async fn reward(&self, recipient: Address, amount: U256) -> Result<TxHash, ChainError>;
}

/// Builds both chain handles for the configured mode. In inprocess mode one
/// instance backs both traits so rewards show up in later balance reads.
pub fn connect_backends(
    config: &Config,
) -> anyhow::Result<(Arc<dyn WalletGateway>, Arc<dyn RewardToken>)> {
    match config.chain_mode {
        ChainMode::InProcess => {
            let chain = Arc::new(inprocess::InProcessChain::new());
            tracing::info!(
                "In-process chain ready, dev account {:?}",
                inprocess::InProcessChain::dev_account()
            );
            Ok((chain.clone(), chain))
        }
        ChainMode::Rpc => {
            let chain = Arc::new(eth::EthChain::new(config)?);
            Ok((chain.clone(), chain))
        }
    }
}

/// Formats a wei amount as a decimal ether string with trailing zeros
/// trimmed, e.g. 10_000_000_000 wei renders as "0.00000001".
pub fn format_ether(amount: U256) -> String {
    let raw = match ethers::utils::format_units(amount, "ether") {
        Ok(s) => s,
        Err(_) => return amount.to_string(),
    };
    let trimmed = raw.trim_end_matches('0').trim_end_matches('.');
    if trimmed.is_empty() {
        "0".to_string()
    } else {
        trimmed.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_whole_ether_without_fraction() {
        assert_eq!(format_ether(U256::exp10(18)), "1");
    }

    #[test]
    fn formats_reward_sized_amounts() {
        assert_eq!(format_ether(U256::from(10_000_000_000u64)), "0.00000001");
    }

    #[test]
    fn formats_zero() {
        assert_eq!(format_ether(U256::zero()), "0");
    }

    #[test]
    fn keeps_integer_digits_ending_in_zero() {
        assert_eq!(format_ether(U256::exp10(19)), "10");
    }
}
