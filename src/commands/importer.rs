// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::api::TransactionApi;
use crate::format::format_date_for_input;
use crate::models::{Transaction, TransactionType};
use crate::store::TransactionStore;
use crate::utils::{parse_date, parse_decimal};
use anyhow::{anyhow, Context, Result};
use csv::ReaderBuilder;
use std::fs::File;
use std::io::Read;

pub fn handle<A: TransactionApi>(
    store: &mut TransactionStore<A>,
    m: &clap::ArgMatches,
) -> Result<()> {
    match m.subcommand() {
        Some(("transactions", sub)) => import_transactions(store, sub),
        _ => Ok(()),
    }
}

fn import_transactions<A: TransactionApi>(
    store: &mut TransactionStore<A>,
    sub: &clap::ArgMatches,
) -> Result<()> {
    let path = sub.get_one::<String>("path").unwrap().trim();
    let file = File::open(path).with_context(|| format!("Open CSV {}", path))?;
    let txs = read_csv(file).with_context(|| format!("Import {}", path))?;
    let total = txs.len();

    let outcome = store.import(txs);
    if let Some(err) = outcome.failed {
        return Err(anyhow::Error::new(err).context(format!(
            "Import stopped after {} of {} transactions",
            outcome.added, total
        )));
    }
    println!("Imported {} transactions from {}", outcome.added, path);
    Ok(())
}

fn parse_type(raw: &str) -> TransactionType {
    match raw.trim() {
        "支出" | "expense" => TransactionType::Expense,
        _ => TransactionType::Income,
    }
}

/// Parses the export layout. Dates may carry a time part, which is dropped.
/// Blank rows are skipped; a row whose date or
/// amount does not parse fails the whole file so nothing is half-imported.
/// Fields are kept as written. Returned transactions carry no id.
pub fn read_csv<R: Read>(r: R) -> Result<Vec<Transaction>> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(r);

    let mut out = Vec::new();
    for (i, result) in rdr.records().enumerate() {
        let rec = result?;
        let line = rec.position().map(|p| p.line()).unwrap_or(i as u64 + 2);
        if rec.iter().all(|f| f.trim().is_empty()) {
            continue;
        }
        if rec.len() < 3 {
            return Err(anyhow!(
                "Line {}: expected date, category and amount, found {} field(s)",
                line,
                rec.len()
            ));
        }
        let date = format_date_for_input(&rec[0])
            .and_then(|d| parse_date(&d))
            .with_context(|| format!("Line {}", line))?;
        let amount = parse_decimal(&rec[2]).with_context(|| format!("Line {}", line))?;
        let memo = rec.get(3).unwrap_or("").to_string();
        let r#type = parse_type(rec.get(4).unwrap_or(""));

        out.push(Transaction::new(amount, &rec[1], date, memo, r#type));
    }
    Ok(out)
}
