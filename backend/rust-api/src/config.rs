use serde::Deserialize;
use std::env;

/// Chain backend selector. `InProcess` keeps balances in memory so the quiz
/// runs without an Ethereum node; `Rpc` talks to a real JSON-RPC endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChainMode {
    InProcess,
    Rpc,
}

impl ChainMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChainMode::InProcess => "inprocess",
            ChainMode::Rpc => "rpc",
        }
    }

    pub fn parse(value: &str) -> Result<Self, config::ConfigError> {
        match value {
            "inprocess" | "in_process" => Ok(ChainMode::InProcess),
            "rpc" => Ok(ChainMode::Rpc),
            other => Err(config::ConfigError::Message(format!(
                "unknown chain.mode '{}' (expected 'inprocess' or 'rpc')",
                other
            ))),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub bind_addr: String,
    pub chain_mode: ChainMode,
    pub eth_rpc_url: String,
    pub eth_chain_id: u64,
    pub token_address: String,
    /// Hex private key of the account allowed to call the token's reward
    /// method. Required in rpc mode, unused in inprocess mode.
    pub reward_issuer_key: Option<String>,
    pub reward_amount_wei: u128,
    pub max_wrong_answers: u32,
    pub token_symbol: String,
    pub question_bank_path: Option<String>,
    /// Fixed seed for question selection. Unset means seed from the OS.
    pub question_seed: Option<u64>,
}

impl Config {
    pub fn load() -> Result<Self, config::ConfigError> {
        // The .env sits at the workspace root, two levels above this crate;
        // fall back to a local one when running from elsewhere.
        let skip_root_env = env::var("SKIP_ROOT_ENV").is_ok();
        if skip_root_env {
            dotenvy::dotenv().ok();
        } else if dotenvy::from_path("../../.env").is_err() {
            dotenvy::dotenv().ok();
        }

        let env = env::var("APP_ENV").unwrap_or_else(|_| "dev".to_string());

        // Layered sources: config/<env>.toml first, APP__ variables on top.
        let config_builder = config::Config::builder()
            .add_source(
                config::File::with_name(&format!("config/{}", env)).required(false), // env vars can carry everything
            )
            .add_source(config::Environment::with_prefix("APP").separator("__"));

        let settings = config_builder.build()?;

        // Every key also answers to a bare env var, so a plain .env is enough.
        let bind_addr = settings
            .get_string("server.bind_addr")
            .or_else(|_| env::var("BIND_ADDR"))
            .unwrap_or_else(|_| "0.0.0.0:8081".to_string());

        let chain_mode = settings
            .get_string("chain.mode")
            .or_else(|_| env::var("CHAIN_MODE"))
            .unwrap_or_else(|_| "inprocess".to_string());
        let chain_mode = ChainMode::parse(&chain_mode)?;

        let eth_rpc_url = settings
            .get_string("chain.rpc_url")
            .or_else(|_| env::var("ETH_RPC_URL"))
            .unwrap_or_else(|_| "http://localhost:8545".to_string());

        let eth_chain_id = settings
            .get_string("chain.chain_id")
            .or_else(|_| env::var("ETH_CHAIN_ID"))
            .unwrap_or_else(|_| "31337".to_string());
        let eth_chain_id = eth_chain_id.parse::<u64>().map_err(|e| {
            config::ConfigError::Message(format!("invalid chain.chain_id: {}", e))
        })?;

        let token_address = settings
            .get_string("chain.token_address")
            .or_else(|_| env::var("TOKEN_ADDRESS"))
            .unwrap_or_default();

        let reward_issuer_key = settings
            .get_string("chain.issuer_key")
            .or_else(|_| env::var("ETH_ISSUER_KEY"))
            .ok();
        if chain_mode == ChainMode::Rpc && reward_issuer_key.is_none() {
            return Err(config::ConfigError::Message(
                "chain.issuer_key (or ETH_ISSUER_KEY) must be set in rpc mode".to_string(),
            ));
        }

        let reward_amount_wei = settings
            .get_string("quiz.reward_amount_wei")
            .or_else(|_| env::var("REWARD_AMOUNT_WEI"))
            .unwrap_or_else(|_| "10000000000".to_string());
        let reward_amount_wei = reward_amount_wei.parse::<u128>().map_err(|e| {
            config::ConfigError::Message(format!("invalid quiz.reward_amount_wei: {}", e))
        })?;

        let max_wrong_answers = settings
            .get_string("quiz.max_wrong_answers")
            .or_else(|_| env::var("MAX_WRONG_ANSWERS"))
            .unwrap_or_else(|_| "20".to_string());
        let max_wrong_answers = max_wrong_answers.parse::<u32>().map_err(|e| {
            config::ConfigError::Message(format!("invalid quiz.max_wrong_answers: {}", e))
        })?;
        if max_wrong_answers == 0 {
            return Err(config::ConfigError::Message(
                "quiz.max_wrong_answers must be at least 1".to_string(),
            ));
        }

        let token_symbol = settings
            .get_string("quiz.token_symbol")
            .or_else(|_| env::var("TOKEN_SYMBOL"))
            .unwrap_or_else(|_| "QT".to_string());

        let question_bank_path = settings
            .get_string("quiz.question_bank_path")
            .or_else(|_| env::var("QUESTION_BANK_PATH"))
            .ok();

        let question_seed = match settings
            .get_string("quiz.question_seed")
            .or_else(|_| env::var("QUESTION_SEED"))
        {
            Ok(raw) => Some(raw.parse::<u64>().map_err(|e| {
                config::ConfigError::Message(format!("invalid quiz.question_seed: {}", e))
            })?),
            Err(_) => None,
        };

        Ok(Config {
            bind_addr,
            chain_mode,
            eth_rpc_url,
            eth_chain_id,
            token_address,
            reward_issuer_key,
            reward_amount_wei,
            max_wrong_answers,
            token_symbol,
            question_bank_path,
            question_seed,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_known_chain_modes() {
        assert_eq!(ChainMode::parse("inprocess").unwrap(), ChainMode::InProcess);
        assert_eq!(ChainMode::parse("in_process").unwrap(), ChainMode::InProcess);
        assert_eq!(ChainMode::parse("rpc").unwrap(), ChainMode::Rpc);
    }

    #[test]
    fn rejects_unknown_chain_mode() {
        assert!(ChainMode::parse("solana").is_err());
    }
}
