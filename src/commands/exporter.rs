// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::api::TransactionApi;
use crate::commands::load;
use crate::config::default_export_path;
use crate::models::Transaction;
use crate::store::TransactionStore;
use anyhow::{anyhow, bail, Context, Result};
use chrono::Local;
use csv::{QuoteStyle, Terminator, WriterBuilder};
use std::fs::File;
use std::io::Write;
use std::path::PathBuf;

pub const CSV_HEADER: [&str; 5] = ["日付", "カテゴリ", "金額", "メモ", "タイプ"];

pub fn handle<A: TransactionApi>(
    store: &mut TransactionStore<A>,
    m: &clap::ArgMatches,
) -> Result<()> {
    match m.subcommand() {
        Some(("transactions", sub)) => export_transactions(store, sub),
        _ => Ok(()),
    }
}

fn export_transactions<A: TransactionApi>(
    store: &mut TransactionStore<A>,
    sub: &clap::ArgMatches,
) -> Result<()> {
    let fmt = sub.get_one::<String>("format").unwrap().to_lowercase();
    if fmt != "csv" && fmt != "json" {
        return Err(anyhow!("Unknown format: {} (use csv|json)", fmt));
    }
    load(store, sub)?;
    if store.transactions().is_empty() {
        bail!("No transactions to export");
    }
    let out = match sub.get_one::<String>("out") {
        Some(p) => PathBuf::from(p.trim()),
        None => default_export_path(Local::now().date_naive(), &fmt),
    };

    let file = File::create(&out).with_context(|| format!("Create {}", out.display()))?;
    match fmt.as_str() {
        "csv" => write_csv(file, store.transactions())?,
        _ => {
            let mut file = file;
            file.write_all(serde_json::to_string_pretty(store.transactions())?.as_bytes())?;
        }
    }
    tracing::info!(path = %out.display(), count = store.transactions().len(), "exported transactions");
    println!(
        "Exported {} transactions to {}",
        store.transactions().len(),
        out.display()
    );
    Ok(())
}

/// Quotes a field only when it would otherwise break the row.
fn plain_field(s: &str) -> String {
    if s.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", s.replace('"', "\"\""))
    } else {
        s.to_string()
    }
}

/// Non-empty memos are always quoted.
fn memo_field(memo: &str) -> String {
    if memo.is_empty() {
        String::new()
    } else {
        format!("\"{}\"", memo.replace('"', "\"\""))
    }
}

/// Writes the `日付,カテゴリ,金額,メモ,タイプ` layout. Ids are not part of it.
pub fn write_csv<W: Write>(w: W, txs: &[Transaction]) -> Result<()> {
    // Quoting is done per field above; the writer must not add its own.
    let mut wtr = WriterBuilder::new()
        .quote_style(QuoteStyle::Never)
        .terminator(Terminator::Any(b'\n'))
        .from_writer(w);
    wtr.write_record(CSV_HEADER)?;
    for t in txs {
        wtr.write_record([
            t.date.format("%Y-%m-%d").to_string(),
            plain_field(&t.category),
            t.amount.abs().normalize().to_string(),
            memo_field(&t.memo),
            t.r#type.label().to_string(),
        ])?;
    }
    wtr.flush()?;
    Ok(())
}
