// src/config.rs
use alloy::primitives::{address, Address};
use dotenvy::dotenv;
use eyre::{eyre, Result};
use std::{env, path::PathBuf};
use tracing::info;

/// $STAX token contract on Ethereum mainnet
pub const DEFAULT_CONTRACT: Address = address!("1e4954a41b8a9aa9654cec6ad19fc94bfe7932ad");
pub const DEFAULT_RPC_URL: &str = "https://ethereum-rpc.publicnode.com";
pub const DEFAULT_OUTPUT: &str = "mint_transactions.csv";

#[derive(Debug, Clone)]
pub struct Config {
    pub rpc_http_url: String,
    pub contract_address: Address,
    pub from_block: u64,
    pub output_path: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            rpc_http_url: DEFAULT_RPC_URL.to_string(),
            contract_address: DEFAULT_CONTRACT,
            from_block: 0,
            output_path: PathBuf::from(DEFAULT_OUTPUT),
        }
    }
}

pub fn load() -> Result<Config> {
    dotenv().ok(); // optional .env

    let defaults = Config::default();

    let rpc_http_url = env::var("RPC_HTTP_URL")
        .or_else(|_| env::var("ETH_RPC"))
        .unwrap_or(defaults.rpc_http_url);

    let contract_address = match env::var("CONTRACT_ADDRESS") {
        Ok(s) => s
            .trim()
            .parse::<Address>()
            .map_err(|e| eyre!("invalid CONTRACT_ADDRESS {:?}: {}", s, e))?,
        Err(_) => defaults.contract_address,
    };

    let from_block = match env::var("FROM_BLOCK") {
        Ok(s) => s
            .trim()
            .parse::<u64>()
            .map_err(|e| eyre!("invalid FROM_BLOCK {:?}: {}", s, e))?,
        Err(_) => defaults.from_block,
    };

    let output_path = env::var("OUTPUT_PATH")
        .map(PathBuf::from)
        .unwrap_or(defaults.output_path);

    let cfg = Config {
        rpc_http_url,
        contract_address,
        from_block,
        output_path,
    };

    info!("Loaded config: {:?}", cfg);

    Ok(cfg)
}
