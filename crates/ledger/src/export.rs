//! Spreadsheet (CSV) export of the trade history.
//!
//! One row per transaction in stored order, then a `TOTAL` row carrying the
//! summed profit.

use std::io::Write;

use csv::Writer;
use serde::Serialize;

use crate::{Currency, ResultLedger, Transaction, total_profit};

#[derive(Debug, Default, Serialize)]
struct ExportRow {
    #[serde(rename = "#")]
    index: String,
    #[serde(rename = "Date")]
    date: String,
    #[serde(rename = "Type")]
    kind: String,
    #[serde(rename = "Input Amount")]
    input_amount: String,
    #[serde(rename = "Input Currency")]
    input_currency: String,
    #[serde(rename = "Output Amount")]
    output_amount: String,
    #[serde(rename = "Output Currency")]
    output_currency: String,
    #[serde(rename = "Exchange Rate")]
    rate: String,
    #[serde(rename = "Profit (LBP)")]
    profit: String,
    #[serde(rename = "Box")]
    target_box: String,
}

impl ExportRow {
    fn from_transaction(index: usize, tx: &Transaction) -> Self {
        let kind = match tx.input_currency {
            Currency::Usd => "Customer gave USD",
            Currency::Lbp => "Customer gave LBP",
        };
        Self {
            index: (index + 1).to_string(),
            date: tx.timestamp.format("%Y-%m-%d %H:%M:%S").to_string(),
            kind: kind.to_string(),
            input_amount: tx.amount.to_string(),
            input_currency: tx.from_currency.code().to_string(),
            output_amount: format!("{:.2}", tx.result),
            output_currency: tx.to_currency.code().to_string(),
            rate: tx.rate.to_string(),
            profit: format!("{:.2}", tx.profit),
            target_box: tx.box_label().to_string(),
        }
    }

    fn total(transactions: &[Transaction]) -> Self {
        Self {
            date: "TOTAL".to_string(),
            profit: format!("{:.2}", total_profit(transactions)),
            ..Self::default()
        }
    }
}

/// Writes `transactions` as CSV (with header) into `writer`.
pub fn write_csv<W: Write>(transactions: &[Transaction], writer: W) -> ResultLedger<()> {
    let mut writer = Writer::from_writer(writer);
    for (index, tx) in transactions.iter().enumerate() {
        writer.serialize(ExportRow::from_transaction(index, tx))?;
    }
    writer.serialize(ExportRow::total(transactions))?;
    writer.flush().map_err(csv::Error::from)?;
    Ok(())
}
