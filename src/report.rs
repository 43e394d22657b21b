// src/report.rs
use chrono::SecondsFormat;
use eyre::Result;
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::Path;
use tracing::debug;

use crate::amount::format_amount;
use crate::models::OutputRow;

pub const HEADER: &str = "Transaction Hash,Transaction Date,Currency,Amount of Purchase,# $STAX Purchased,$STAX Sending Wallet,Buyer Receiving Wallet,Vesting Group,Vesting Group Title,Vesting Group Subtitle";

/// Render one row. Fields are wrapped in double quotes; embedded quotes are
/// written as-is.
pub fn render_row(row: &OutputRow) -> String {
    let fields = [
        row.tx_hash.to_string(),
        row.timestamp.to_rfc3339_opts(SecondsFormat::Millis, true),
        row.currency.to_string(),
        format_amount(row.payment_amount),
        format_amount(row.token_amount),
        row.sender.to_string(),
        row.receiver.to_string(),
        row.vesting_group.to_string(),
        row.group_title.clone(),
        row.group_subtitle.clone(),
    ];

    let mut line = fields
        .iter()
        .map(|v| format!("\"{v}\""))
        .collect::<Vec<_>>()
        .join(",");
    line.push('\n');
    line
}

/// Owns the CSV file for one run
#[derive(Debug)]
pub struct ReportWriter {
    file: File,
    rows_written: usize,
}

impl ReportWriter {
    /// Truncate `path` and write the header line
    pub fn create(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let mut file = File::create(path)?;
        file.write_all(HEADER.as_bytes())?;
        file.write_all(b"\n")?;
        file.flush()?;
        drop(file);

        // reopen in append mode so every row lands after what is on disk
        let file = OpenOptions::new().append(true).open(path)?;
        debug!("Report header written to {}", path.display());

        Ok(Self {
            file,
            rows_written: 0,
        })
    }

    /// Append one row and flush it before returning
    pub fn append(&mut self, row: &OutputRow) -> Result<()> {
        let line = render_row(row);
        self.file.write_all(line.as_bytes())?;
        self.file.flush()?;
        self.rows_written += 1;
        Ok(())
    }

    pub fn rows_written(&self) -> usize {
        self.rows_written
    }
}
