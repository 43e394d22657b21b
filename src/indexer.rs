// src/indexer.rs
use alloy::primitives::{Address, B256};
use chrono::{DateTime, Utc};
use eyre::{eyre, Result};
use std::collections::HashMap;
use tracing::{debug, info, warn};

use crate::classifier::{self, SkipReason, TxContext, TxOutcome};
use crate::config::Config;
use crate::models::{DecodedCall, EventLog};
use crate::parser;
use crate::registry::VestingRegistry;
use crate::report::ReportWriter;
use crate::rpc::ChainSource;

/// Mint logs grouped by transaction, in the order transactions first appear
#[derive(Debug, Default)]
pub struct TxLogs {
    order: Vec<B256>,
    by_tx: HashMap<B256, Vec<EventLog>>,
}

impl TxLogs {
    /// Group zero-origin Transfer logs by transaction hash. Logs that are not
    /// mint transfers are dropped.
    pub fn from_logs(logs: impl IntoIterator<Item = EventLog>) -> Self {
        let mut grouped = TxLogs::default();
        for log in logs {
            if !parser::is_mint_transfer(&log) {
                debug!("Ignoring non-mint log {}#{}", log.tx_hash, log.log_index);
                continue;
            }
            let hash = log.tx_hash;
            let entry = grouped.by_tx.entry(hash).or_default();
            if entry.is_empty() {
                grouped.order.push(hash);
            }
            entry.push(log);
        }
        grouped
    }

    pub fn get(&self, hash: &B256) -> Option<&[EventLog]> {
        self.by_tx.get(hash).map(Vec::as_slice)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&B256, &[EventLog])> {
        self.order
            .iter()
            .filter_map(|h| self.by_tx.get(h).map(|logs| (h, logs.as_slice())))
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub transactions: usize,
    pub rows_written: usize,
    pub skipped: usize,
}

/// Fetch, decode and classify one transaction. The outer error is fatal,
/// the inner one is a skip.
pub async fn process_transaction<C: ChainSource>(
    chain: &C,
    contract: Address,
    hash: B256,
    mint_logs: &[EventLog],
    registry: &VestingRegistry,
) -> Result<TxOutcome> {
    let Some(tx) = chain.transaction(hash).await? else {
        return Ok(Err(SkipReason::MissingTransaction));
    };

    let Some(secs) = chain.block_timestamp(tx.block_number).await? else {
        return Ok(Err(SkipReason::MissingBlock(tx.block_number)));
    };
    let timestamp = i64::try_from(secs)
        .ok()
        .and_then(|s| DateTime::<Utc>::from_timestamp(s, 0))
        .ok_or_else(|| eyre!("block {} has invalid timestamp {}", tx.block_number, secs))?;

    let call = match parser::decode_call(&tx.input) {
        Ok(call) => call,
        Err(e) => return Ok(Err(e.into())),
    };
    debug!("{} decoded as {}", hash, call.name());

    let receipt_logs = match call {
        DecodedCall::AddGroup { .. } => match chain.receipt_logs(hash).await? {
            Some(logs) => logs,
            None => return Ok(Err(SkipReason::MissingTransferLog)),
        },
        _ => Vec::new(),
    };

    let ctx = TxContext {
        contract,
        tx: &tx,
        timestamp,
        mint_logs,
        receipt_logs: &receipt_logs,
    };
    Ok(classifier::classify(call, &ctx, registry))
}

/// Run the whole report job: one log query, then every minting transaction
/// in order
pub async fn run<C: ChainSource>(
    chain: &C,
    cfg: &Config,
    registry: &VestingRegistry,
) -> Result<RunSummary> {
    let mut writer = ReportWriter::create(&cfg.output_path)?;

    let logs = chain.mint_logs(cfg.contract_address, cfg.from_block).await?;
    let grouped = TxLogs::from_logs(logs);
    info!("{} transactions with mint logs", grouped.len());

    let mut summary = RunSummary::default();
    for (hash, logs) in grouped.iter() {
        summary.transactions += 1;
        debug!("Processing {} ({} mint logs)", hash, logs.len());

        match process_transaction(chain, cfg.contract_address, *hash, logs, registry).await? {
            Ok(rows) => {
                for row in &rows {
                    writer.append(row)?;
                }
            }
            Err(reason) => {
                warn!("Error processing tx {}: {}", hash, reason);
                summary.skipped += 1;
            }
        }
    }

    summary.rows_written = writer.rows_written();
    info!(
        "Run complete: {} transactions, {} rows, {} skipped",
        summary.transactions, summary.rows_written, summary.skipped
    );
    Ok(summary)
}
