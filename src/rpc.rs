// src/rpc.rs
use alloy::primitives::{Address, B256};
use eyre::{eyre, Result};
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{debug, info, warn};

use crate::models::{EventLog, TransactionRecord};
use crate::parser::{self, TRANSFER_TOPIC};

#[derive(Debug, Deserialize, Clone)]
pub struct RawLog {
    pub address: String,
    pub topics: Vec<String>,
    pub data: String,

    #[serde(rename = "blockNumber", default)]
    pub block_number_hex: Option<String>,

    #[serde(rename = "transactionHash", default)]
    pub tx_hash: Option<String>,

    #[serde(rename = "logIndex", default)]
    pub log_index_hex: Option<String>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct RawTransaction {
    pub hash: String,
    pub from: String,
    pub value: String,
    pub input: String,

    #[serde(rename = "blockNumber", default)]
    pub block_number_hex: Option<String>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct RawBlock {
    #[serde(rename = "timestamp")]
    pub timestamp_hex: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct RawReceipt {
    pub logs: Vec<RawLog>,
}

#[derive(Debug, Deserialize)]
struct RpcError {
    code: i64,
    message: String,
}

#[derive(Debug, Deserialize)]
struct RpcResponse<T> {
    result: Option<T>,
    error: Option<RpcError>,
}

/// Chain reads the report job depends on. Every call is awaited before the
/// next one is issued.
#[allow(async_fn_in_trait)]
pub trait ChainSource {
    /// All zero-origin Transfer logs of `contract` from `from_block` to latest
    async fn mint_logs(&self, contract: Address, from_block: u64) -> Result<Vec<EventLog>>;

    async fn transaction(&self, hash: B256) -> Result<Option<TransactionRecord>>;

    /// Block timestamp in unix seconds
    async fn block_timestamp(&self, number: u64) -> Result<Option<u64>>;

    /// Every log of the transaction's receipt, in log index order
    async fn receipt_logs(&self, hash: B256) -> Result<Option<Vec<EventLog>>>;
}

/// Plain HTTP JSON-RPC client
#[derive(Debug, Clone)]
pub struct RpcClient {
    client: Client,
    url: String,
}

impl RpcClient {
    pub fn new(url: &str) -> Result<Self> {
        let client = Client::builder().build()?;
        Ok(Self {
            client,
            url: url.to_string(),
        })
    }

    async fn call<T: DeserializeOwned>(&self, method: &str, params: Value) -> Result<Option<T>> {
        let payload = json!({
            "jsonrpc": "2.0",
            "id": 1,
            "method": method,
            "params": params
        });

        debug!("📡 Sending {} → {}", method, self.url);

        let resp = self.client.post(&self.url).json(&payload).send().await?;
        if resp.status() != StatusCode::OK {
            return Err(eyre!("RPC error: HTTP {} on {}", resp.status(), method));
        }

        let parsed: RpcResponse<T> = resp.json().await?;
        if let Some(err) = parsed.error {
            return Err(eyre!("RPC error {} on {}: {}", err.code, method, err.message));
        }
        Ok(parsed.result)
    }
}

impl ChainSource for RpcClient {
    async fn mint_logs(&self, contract: Address, from_block: u64) -> Result<Vec<EventLog>> {
        info!("📡 Fetching mint logs for {} from block {}", contract, from_block);

        let params = json!([{
            "fromBlock": format!("0x{:x}", from_block),
            "toBlock": "latest",
            "address": contract.to_string(),
            "topics": [
                TRANSFER_TOPIC.to_string(),
                Address::ZERO.into_word().to_string()
            ]
        }]);

        let raw: Vec<RawLog> = self.call("eth_getLogs", params).await?.unwrap_or_default();
        info!("📩 {} mint logs returned", raw.len());

        let mut logs = Vec::with_capacity(raw.len());
        for r in &raw {
            match parser::decode_log(r) {
                Ok(log) => logs.push(log),
                Err(e) => warn!("Skipping unusable log {:?}: {}", r.tx_hash, e),
            }
        }
        Ok(logs)
    }

    async fn transaction(&self, hash: B256) -> Result<Option<TransactionRecord>> {
        let raw: Option<RawTransaction> = self
            .call("eth_getTransactionByHash", json!([hash.to_string()]))
            .await?;

        match raw {
            Some(r) => Ok(Some(parser::decode_transaction(&r)?)),
            None => Ok(None),
        }
    }

    async fn block_timestamp(&self, number: u64) -> Result<Option<u64>> {
        let raw: Option<RawBlock> = self
            .call("eth_getBlockByNumber", json!([format!("0x{:x}", number), false]))
            .await?;

        match raw {
            Some(b) => Ok(Some(u64::from_str_radix(
                b.timestamp_hex.trim_start_matches("0x"),
                16,
            )?)),
            None => Ok(None),
        }
    }

    async fn receipt_logs(&self, hash: B256) -> Result<Option<Vec<EventLog>>> {
        let raw: Option<RawReceipt> = self
            .call("eth_getTransactionReceipt", json!([hash.to_string()]))
            .await?;

        match raw {
            Some(receipt) => {
                let mut logs = Vec::with_capacity(receipt.logs.len());
                for r in &receipt.logs {
                    match parser::decode_log(r) {
                        Ok(log) => logs.push(log),
                        Err(e) => debug!("Dropping receipt log of {}: {}", hash, e),
                    }
                }
                Ok(Some(logs))
            }
            None => Ok(None),
        }
    }
}
