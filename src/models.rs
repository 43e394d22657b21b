// src/models.rs
use alloy::primitives::{Address, Bytes, B256, U256};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use std::fmt;

/// One event log, either from the mint query or from a transaction receipt
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventLog {
    pub tx_hash: B256,
    pub address: Address,
    pub topics: Vec<B256>,
    pub data: Bytes,
    pub block_number: u64,
    pub log_index: u64,
}

/// A transaction that emitted at least one mint log
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionRecord {
    pub hash: B256,
    pub from: Address,
    pub value: U256, // wei
    pub input: Bytes,
    pub block_number: u64,
}

/// Call data matched against the token ABI
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DecodedCall {
    AddGroup {
        shareholders: Vec<Address>,
        amounts: Vec<U256>,
        period: U256,
    },
    AddShareholder {
        vesting_group: Address,
        account: Address,
        amount: U256,
    },
    Mint {
        amount: U256,
    },
    MintForShib {
        amount: U256,
    },
}

impl DecodedCall {
    pub fn name(&self) -> &'static str {
        match self {
            DecodedCall::AddGroup { .. } => "addGroup",
            DecodedCall::AddShareholder { .. } => "addShareholder",
            DecodedCall::Mint { .. } => "mint",
            DecodedCall::MintForShib { .. } => "mintForShib",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Currency {
    Eth,
    Shib,
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Currency::Eth => f.write_str("ETH"),
            Currency::Shib => f.write_str("SHIB"),
        }
    }
}

/// A single report line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputRow {
    pub tx_hash: B256,
    pub timestamp: DateTime<Utc>,
    pub currency: Currency,
    pub payment_amount: Decimal,
    pub token_amount: Decimal,
    pub sender: Address, // always the zero address for a mint
    pub receiver: Address,
    pub vesting_group: Address,
    pub group_title: String, // `N/A` when the group is not registered
    pub group_subtitle: String,
}
