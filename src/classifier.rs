// src/classifier.rs
use alloy::primitives::{Address, B256, U256};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use thiserror::Error;
use tracing::warn;

use crate::amount::{self, AmountError, NATIVE_DECIMALS, TOKEN_DECIMALS};
use crate::models::{Currency, DecodedCall, EventLog, OutputRow, TransactionRecord};
use crate::parser::{self, DecodeError};
use crate::registry::{VestingRegistry, PRIVATE_ROUND};

/// Why a transaction contributed no rows
#[derive(Debug, Error)]
pub enum SkipReason {
    #[error(transparent)]
    Undecodable(#[from] DecodeError),
    #[error("transaction not found")]
    MissingTransaction,
    #[error("block {0} not found")]
    MissingBlock(u64),
    #[error("no zero-origin Transfer log from the token contract in receipt")]
    MissingTransferLog,
    #[error("addGroup has {shareholders} shareholders but {amounts} amounts")]
    LengthMismatch { shareholders: usize, amounts: usize },
    #[error(transparent)]
    Amount(#[from] AmountError),
}

/// Per-transaction outcome: rows to write, or the reason to skip
pub type TxOutcome = Result<Vec<OutputRow>, SkipReason>;

/// Everything about a transaction the classifier needs besides the call
#[derive(Debug, Clone)]
pub struct TxContext<'a> {
    /// Token contract whose mints are reported
    pub contract: Address,
    pub tx: &'a TransactionRecord,
    pub timestamp: DateTime<Utc>,
    /// Mint logs correlated to this transaction, in log index order
    pub mint_logs: &'a [EventLog],
    /// Receipt logs, only fetched for `addGroup`
    pub receipt_logs: &'a [EventLog],
}

/// Recipient of the first mint emitted by `contract` in `logs`
pub fn minted_group(contract: Address, logs: &[EventLog]) -> Option<Address> {
    logs.iter()
        .filter(|log| log.address == contract)
        .find_map(parser::mint_recipient)
}

/// Recipient of the correlated mint when it is not the private round group
pub fn private_round_mismatch(ctx: &TxContext<'_>) -> Option<Address> {
    minted_group(ctx.contract, ctx.mint_logs).filter(|to| *to != PRIVATE_ROUND)
}

struct RowBuilder<'a> {
    tx_hash: B256,
    timestamp: DateTime<Utc>,
    registry: &'a VestingRegistry,
}

impl RowBuilder<'_> {
    fn row(
        &self,
        currency: Currency,
        payment_amount: Decimal,
        tokens: U256,
        receiver: Address,
        vesting_group: Address,
    ) -> Result<OutputRow, AmountError> {
        let (title, subtitle) = self.registry.describe(&vesting_group);
        Ok(OutputRow {
            tx_hash: self.tx_hash,
            timestamp: self.timestamp,
            currency,
            payment_amount,
            token_amount: amount::scale(tokens, TOKEN_DECIMALS)?,
            sender: Address::ZERO,
            receiver,
            vesting_group,
            group_title: title.to_string(),
            group_subtitle: subtitle.to_string(),
        })
    }
}

/// Map a decoded call to its report rows
pub fn classify(call: DecodedCall, ctx: &TxContext<'_>, registry: &VestingRegistry) -> TxOutcome {
    let builder = RowBuilder {
        tx_hash: ctx.tx.hash,
        timestamp: ctx.timestamp,
        registry,
    };

    if matches!(call, DecodedCall::Mint { .. } | DecodedCall::MintForShib { .. }) {
        if let Some(to) = private_round_mismatch(ctx) {
            warn!(
                "tx {}: {} minted to {}, reporting private round {}",
                ctx.tx.hash,
                call.name(),
                to,
                PRIVATE_ROUND
            );
        }
    }

    match call {
        DecodedCall::AddGroup {
            shareholders,
            amounts,
            ..
        } => {
            if shareholders.len() != amounts.len() {
                return Err(SkipReason::LengthMismatch {
                    shareholders: shareholders.len(),
                    amounts: amounts.len(),
                });
            }
            let group = minted_group(ctx.contract, ctx.receipt_logs)
                .ok_or(SkipReason::MissingTransferLog)?;

            shareholders
                .into_iter()
                .zip(amounts)
                .map(|(holder, tokens)| {
                    builder
                        .row(Currency::Eth, Decimal::ZERO, tokens, holder, group)
                        .map_err(SkipReason::from)
                })
                .collect()
        }
        DecodedCall::AddShareholder {
            vesting_group,
            account,
            amount,
        } => Ok(vec![builder.row(
            Currency::Eth,
            Decimal::ZERO,
            amount,
            account,
            vesting_group,
        )?]),
        DecodedCall::Mint { amount } => {
            let paid = amount::scale(ctx.tx.value, NATIVE_DECIMALS)?;
            Ok(vec![builder.row(
                Currency::Eth,
                paid,
                amount,
                ctx.tx.from,
                PRIVATE_ROUND,
            )?])
        }
        // SHIB paid is not visible in the mint events
        DecodedCall::MintForShib { amount } => Ok(vec![builder.row(
            Currency::Shib,
            Decimal::ZERO,
            amount,
            ctx.tx.from,
            PRIVATE_ROUND,
        )?]),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::TRANSFER_TOPIC;
    use crate::registry::UNKNOWN_GROUP;
    use alloy::primitives::{address, Bytes};
    use chrono::TimeZone;
    use std::str::FromStr;

    const TOKEN: Address = address!("1e4954a41b8a9aa9654cec6ad19fc94bfe7932ad");
    const BUYER: Address = address!("00000000000000000000000000000000000000b1");

    fn tx(value: U256) -> TransactionRecord {
        TransactionRecord {
            hash: B256::repeat_byte(0x11),
            from: BUYER,
            value,
            input: Bytes::new(),
            block_number: 100,
        }
    }

    fn mint_log(emitter: Address, to: Address) -> EventLog {
        EventLog {
            tx_hash: B256::repeat_byte(0x11),
            address: emitter,
            topics: vec![TRANSFER_TOPIC, Address::ZERO.into_word(), to.into_word()],
            data: Bytes::from(U256::from(7u64).to_be_bytes_vec()),
            block_number: 100,
            log_index: 3,
        }
    }

    fn ctx<'a>(
        record: &'a TransactionRecord,
        mint_logs: &'a [EventLog],
        receipt_logs: &'a [EventLog],
    ) -> TxContext<'a> {
        TxContext {
            contract: TOKEN,
            tx: record,
            timestamp: Utc.with_ymd_and_hms(2023, 5, 1, 12, 0, 0).unwrap(),
            mint_logs,
            receipt_logs,
        }
    }

    fn add_group(holders: usize) -> DecodedCall {
        DecodedCall::AddGroup {
            shareholders: (1..=holders as u8).map(Address::repeat_byte).collect(),
            amounts: (1..=holders as u64)
                .map(|i| U256::from(i * 1_000_000_000))
                .collect(),
            period: U256::from(30u64),
        }
    }

    #[test]
    fn mint_pays_eth_into_private_round() {
        let record = tx(U256::from(500_000_000_000_000_000u128));
        let logs = vec![mint_log(TOKEN, PRIVATE_ROUND)];
        let rows = classify(
            DecodedCall::Mint { amount: U256::from(1_000_000_000_000u64) },
            &ctx(&record, &logs, &[]),
            &VestingRegistry::builtin(),
        )
        .unwrap();

        assert_eq!(rows.len(), 1);
        let row = &rows[0];
        assert_eq!(row.currency, Currency::Eth);
        assert_eq!(row.payment_amount, Decimal::from_str("0.5").unwrap());
        assert_eq!(row.token_amount, Decimal::from(1000));
        assert_eq!(row.receiver, BUYER);
        assert_eq!(row.sender, Address::ZERO);
        assert_eq!(row.vesting_group, PRIVATE_ROUND);
        assert_eq!(row.group_title, "Private Round");
    }

    #[test]
    fn mint_for_shib_reports_zero_payment() {
        let record = tx(U256::ZERO);
        let logs = vec![mint_log(TOKEN, PRIVATE_ROUND)];
        let rows = classify(
            DecodedCall::MintForShib { amount: U256::from(2_000_000_000u64) },
            &ctx(&record, &logs, &[]),
            &VestingRegistry::builtin(),
        )
        .unwrap();

        assert_eq!(rows[0].currency, Currency::Shib);
        assert_eq!(rows[0].payment_amount, Decimal::ZERO);
        assert_eq!(rows[0].token_amount, Decimal::from(2));
        assert_eq!(rows[0].vesting_group, PRIVATE_ROUND);
    }

    #[test]
    fn private_round_is_checked_against_correlated_mint() {
        let record = tx(U256::ZERO);

        let matching = vec![mint_log(TOKEN, PRIVATE_ROUND)];
        assert_eq!(private_round_mismatch(&ctx(&record, &matching, &[])), None);

        let elsewhere = Address::repeat_byte(0x33);
        let diverging = vec![mint_log(TOKEN, elsewhere)];
        assert_eq!(
            private_round_mismatch(&ctx(&record, &diverging, &[])),
            Some(elsewhere)
        );

        // the row still carries the private round group
        let rows = classify(
            DecodedCall::Mint { amount: U256::from(1u64) },
            &ctx(&record, &diverging, &[]),
            &VestingRegistry::builtin(),
        )
        .unwrap();
        assert_eq!(rows[0].vesting_group, PRIVATE_ROUND);
    }

    #[test]
    fn add_shareholder_keeps_group_address_verbatim() {
        let unknown = Address::repeat_byte(0x5a);
        let account = Address::repeat_byte(0x6b);
        let record = tx(U256::ZERO);
        let rows = classify(
            DecodedCall::AddShareholder {
                vesting_group: unknown,
                account,
                amount: U256::from(1_500_000_000u64),
            },
            &ctx(&record, &[], &[]),
            &VestingRegistry::builtin(),
        )
        .unwrap();

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].vesting_group, unknown);
        assert_eq!(rows[0].receiver, account);
        assert_eq!(rows[0].group_title, UNKNOWN_GROUP);
        assert_eq!(rows[0].group_subtitle, UNKNOWN_GROUP);
    }

    #[test]
    fn add_group_emits_one_row_per_shareholder() {
        let group = Address::repeat_byte(0x77);
        let receipt = vec![mint_log(TOKEN, group)];
        let record = tx(U256::ZERO);

        let rows = classify(
            add_group(2),
            &ctx(&record, &receipt, &receipt),
            &VestingRegistry::builtin(),
        )
        .unwrap();

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].receiver, Address::repeat_byte(0x01));
        assert_eq!(rows[1].receiver, Address::repeat_byte(0x02));
        assert_eq!(rows[1].token_amount, Decimal::from(2));
        assert!(rows.iter().all(|r| r.vesting_group == group));
    }

    #[test]
    fn add_group_ignores_mints_of_other_tokens() {
        let foreign = mint_log(Address::repeat_byte(0xee), Address::repeat_byte(0x44));
        let ours = mint_log(TOKEN, Address::repeat_byte(0x77));
        let receipt = vec![foreign, ours.clone()];
        let record = tx(U256::ZERO);

        let rows = classify(
            add_group(1),
            &ctx(&record, &[ours], &receipt),
            &VestingRegistry::builtin(),
        )
        .unwrap();
        assert_eq!(rows[0].vesting_group, Address::repeat_byte(0x77));
    }

    #[test]
    fn add_group_without_transfer_log_is_skipped() {
        let record = tx(U256::ZERO);
        let mut not_a_mint = mint_log(TOKEN, Address::repeat_byte(0x77));
        not_a_mint.topics[1] = Address::repeat_byte(0x99).into_word();
        let foreign = mint_log(Address::repeat_byte(0xee), Address::repeat_byte(0x44));
        let receipt = vec![not_a_mint, foreign];

        let err = classify(
            add_group(1),
            &ctx(&record, &[], &receipt),
            &VestingRegistry::builtin(),
        )
        .unwrap_err();
        assert!(matches!(err, SkipReason::MissingTransferLog));
    }

    #[test]
    fn add_group_with_uneven_arrays_is_skipped() {
        let receipt = vec![mint_log(TOKEN, Address::repeat_byte(0x77))];
        let record = tx(U256::ZERO);

        let err = classify(
            DecodedCall::AddGroup {
                shareholders: vec![Address::repeat_byte(0x01), Address::repeat_byte(0x02)],
                amounts: vec![U256::from(1u64)],
                period: U256::ZERO,
            },
            &ctx(&record, &receipt, &receipt),
            &VestingRegistry::builtin(),
        )
        .unwrap_err();
        assert!(matches!(
            err,
            SkipReason::LengthMismatch { shareholders: 2, amounts: 1 }
        ));
    }
}
