// src/parser.rs
use alloy::primitives::{Address, Bytes, B256};
use alloy::sol;
use alloy::sol_types::{SolEvent, SolInterface};
use eyre::{eyre, Result};
use thiserror::Error;

use crate::models::{DecodedCall, EventLog, TransactionRecord};
use crate::rpc::{RawLog, RawTransaction};

sol! {
    /// The four entry points that mint $STAX, plus the ERC20 Transfer event
    interface StaxToken {
        function addGroup(address[] calldata shareholders, uint256[] calldata maxAmounts, uint256 period) external;
        function addShareholder(address vestingGroup, address account, uint256 amount) external;
        function mint(uint256 amount) external payable;
        function mintForShib(uint256 amount) external;

        event Transfer(address indexed from, address indexed to, uint256 value);
    }
}

/// keccak256("Transfer(address,address,uint256)")
pub const TRANSFER_TOPIC: B256 = StaxToken::Transfer::SIGNATURE_HASH;

#[derive(Debug, Error)]
#[error("input with selector 0x{selector} matches no known function: {cause}")]
pub struct DecodeError {
    pub selector: String,
    pub cause: String,
}

/// Match raw call data against the four known functions
pub fn decode_call(input: &[u8]) -> Result<DecodedCall, DecodeError> {
    let selector = hex::encode(&input[..input.len().min(4)]);

    let call = StaxToken::StaxTokenCalls::abi_decode(input).map_err(|e| DecodeError {
        selector,
        cause: e.to_string(),
    })?;

    Ok(match call {
        StaxToken::StaxTokenCalls::addGroup(c) => DecodedCall::AddGroup {
            shareholders: c.shareholders,
            amounts: c.maxAmounts,
            period: c.period,
        },
        StaxToken::StaxTokenCalls::addShareholder(c) => DecodedCall::AddShareholder {
            vesting_group: c.vestingGroup,
            account: c.account,
            amount: c.amount,
        },
        StaxToken::StaxTokenCalls::mint(c) => DecodedCall::Mint { amount: c.amount },
        StaxToken::StaxTokenCalls::mintForShib(c) => DecodedCall::MintForShib { amount: c.amount },
    })
}

/// True for a Transfer whose `from` topic is the zero-padded zero address
pub fn is_mint_transfer(log: &EventLog) -> bool {
    log.topics.len() >= 3 && log.topics[0] == TRANSFER_TOPIC && log.topics[1] == Address::ZERO.into_word()
}

/// Recipient of a mint Transfer (`to` topic)
pub fn mint_recipient(log: &EventLog) -> Option<Address> {
    if !is_mint_transfer(log) {
        return None;
    }
    StaxToken::Transfer::decode_raw_log(log.topics.iter().copied(), &log.data)
        .ok()
        .map(|t| t.to)
}

fn parse_hex_u64(s: &str) -> Result<u64> {
    Ok(u64::from_str_radix(s.trim_start_matches("0x"), 16)?)
}

/// Convert a JSON-RPC log into an `EventLog`
pub fn decode_log(raw: &RawLog) -> Result<EventLog> {
    let tx_hash = raw
        .tx_hash
        .as_deref()
        .ok_or_else(|| eyre!("log has no transaction hash"))?
        .parse::<B256>()?;

    let topics = raw
        .topics
        .iter()
        .map(|t| t.parse::<B256>())
        .collect::<Result<Vec<_>, _>>()?;

    let block_number = match raw.block_number_hex.as_deref() {
        Some(b) => parse_hex_u64(b)?,
        None => 0,
    };
    let log_index = match raw.log_index_hex.as_deref() {
        Some(i) => parse_hex_u64(i)?,
        None => 0,
    };

    Ok(EventLog {
        tx_hash,
        address: raw.address.parse::<Address>()?,
        topics,
        data: raw.data.parse::<Bytes>()?,
        block_number,
        log_index,
    })
}

/// Convert a JSON-RPC transaction into a `TransactionRecord`
pub fn decode_transaction(raw: &RawTransaction) -> Result<TransactionRecord> {
    let block_number = raw
        .block_number_hex
        .as_deref()
        .ok_or_else(|| eyre!("transaction {} is still pending", raw.hash))?;

    Ok(TransactionRecord {
        hash: raw.hash.parse()?,
        from: raw.from.parse()?,
        value: raw.value.parse()?,
        input: raw.input.parse()?,
        block_number: parse_hex_u64(block_number)?,
    })
}
