use anyhow::{anyhow, Context, Result};
use ethers::prelude::*;
use std::sync::Arc;

use super::{ChainError, RewardToken, WalletGateway};
use crate::config::Config;

abigen!(
    QuizToken,
    r#"[
        function balanceOf(address account) external view returns (uint256)
        function rewardUser(address recipient, uint256 amount) external
    ]"#
);

type SignerClient = SignerMiddleware<Provider<Http>, LocalWallet>;

/// JSON-RPC chain backend. Reads go straight to the provider; the reward
/// call is signed with the configured issuer key.
#[derive(Clone)]
pub struct EthChain {
    provider: Provider<Http>,
    contract: QuizToken<SignerClient>,
}

impl EthChain {
    pub fn new(config: &Config) -> Result<Self> {
        let rpc_url = config.eth_rpc_url.clone();
        let provider = Provider::<Http>::try_from(rpc_url.clone())
            .with_context(|| format!("invalid ethereum rpc url: {rpc_url}"))?;

        let private_key = config
            .reward_issuer_key
            .as_deref()
            .ok_or_else(|| anyhow!("reward issuer key is required in rpc mode"))?;
        let wallet: LocalWallet = private_key
            .parse::<LocalWallet>()
            .context("failed parsing reward issuer key")?
            .with_chain_id(config.eth_chain_id);

        let client = SignerMiddleware::new(provider.clone(), wallet);
        let client = Arc::new(client);

        let addr: Address = config
            .token_address
            .parse()
            .context("invalid token_address")?;
        if addr == Address::zero() {
            return Err(anyhow!("token_address is zero; deploy and update config"));
        }

        let contract = QuizToken::new(addr, client);
        Ok(Self { provider, contract })
    }
}

#[async_trait::async_trait]
impl WalletGateway for EthChain {
    async fn request_accounts(&self) -> Result<Vec<Address>, ChainError> {
        let accounts = self
            .provider
            .get_accounts()
            .await
            .map_err(|e| ChainError::ProviderUnavailable(e.to_string()))?;
        if accounts.is_empty() {
            return Err(ChainError::NoAccounts);
        }
        Ok(accounts)
    }

    async fn native_balance(&self, account: Address) -> Result<U256, ChainError> {
        self.provider
            .get_balance(account, None)
            .await
            .map_err(|e| ChainError::Call(e.to_string()))
    }

    async fn ping(&self) -> Result<(), ChainError> {
        self.provider
            .get_block_number()
            .await
            .map(|_| ())
            .map_err(|e| ChainError::ProviderUnavailable(e.to_string()))
    }
}

#[async_trait::async_trait]
impl RewardToken for EthChain {
    async fn balance_of(&self, account: Address) -> Result<U256, ChainError> {
        self.contract
            .balance_of(account)
            .call()
            .await
            .map_err(|e| ChainError::Call(e.to_string()))
    }

    async fn reward(&self, recipient: Address, amount: U256) -> Result<TxHash, ChainError> {
        let call = self.contract.reward_user(recipient, amount);
        let pending = call
            .send()
            .await
            .map_err(|e| ChainError::TransferRejected(e.to_string()))?;

        let receipt = pending
            .await
            .map_err(|e| ChainError::TransferRejected(e.to_string()))?
            .ok_or(ChainError::TxDropped)?;
        if receipt.status == Some(U64::from(1)) {
            Ok(receipt.transaction_hash)
        } else {
            Err(ChainError::TransferRejected(
                "transaction reverted".to_string(),
            ))
        }
    }
}
