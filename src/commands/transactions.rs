// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::aggregate::{history, HistoryQuery};
use crate::api::TransactionApi;
use crate::commands::{load, print_status, selected_scope};
use crate::format::{format_currency, format_year_month};
use crate::models::{Scope, Transaction, TransactionType};
use crate::store::TransactionStore;
use crate::utils::{maybe_print_json, parse_date, parse_decimal, pretty_table};
use anyhow::Result;
use chrono::Datelike;
use serde::Serialize;

pub fn handle<A: TransactionApi>(
    store: &mut TransactionStore<A>,
    m: &clap::ArgMatches,
) -> Result<()> {
    match m.subcommand() {
        Some(("list", sub)) => list(store, sub)?,
        Some(("add", sub)) => add(store, sub)?,
        Some(("update", sub)) => update(store, sub)?,
        Some(("rm", sub)) => remove(store, sub)?,
        _ => {}
    }
    Ok(())
}

/// Builds a transaction from `--amount/--category/--date/--type/--memo`.
pub fn transaction_from_args(sub: &clap::ArgMatches) -> Result<Transaction> {
    let amount = parse_decimal(sub.get_one::<String>("amount").unwrap())?;
    let category = sub.get_one::<String>("category").unwrap().trim().to_string();
    let date = parse_date(sub.get_one::<String>("date").unwrap())?;
    let r#type: TransactionType = sub.get_one::<String>("type").unwrap().parse()?;
    let memo = sub.get_one::<String>("memo").cloned().unwrap_or_default();
    Ok(Transaction::new(amount, category, date, memo, r#type))
}

fn list<A: TransactionApi>(store: &mut TransactionStore<A>, sub: &clap::ArgMatches) -> Result<()> {
    load(store, sub)?;
    let query = history_query(sub)?;
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let data = rows(&history(store.transactions(), &query));
    if !maybe_print_json(json_flag, jsonl_flag, &data)? {
        let table_rows: Vec<Vec<String>> = data
            .iter()
            .map(|r| {
                vec![
                    r.id.clone(),
                    r.date.clone(),
                    r.category.clone(),
                    r.r#type.clone(),
                    r.amount.clone(),
                    r.memo.clone(),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(&["ID", "Date", "Category", "Type", "Amount", "Memo"], table_rows)
        );
        let s = store.summary();
        println!(
            "Income {}  Expense {}  Balance {}",
            format_currency(s.income),
            format_currency(s.expense),
            format_currency(s.balance)
        );
    }
    Ok(())
}

#[derive(Serialize)]
pub struct TransactionRow {
    pub id: String,
    pub date: String,
    pub category: String,
    pub r#type: String,
    pub amount: String,
    pub memo: String,
}

/// `--search/--type/--sort/--asc` from `tx list`.
pub fn history_query(sub: &clap::ArgMatches) -> Result<HistoryQuery> {
    Ok(HistoryQuery {
        search: sub.get_one::<String>("search").cloned().unwrap_or_default(),
        r#type: sub.get_one::<String>("type").unwrap().parse()?,
        sort: sub.get_one::<String>("sort").unwrap().parse()?,
        ascending: sub.get_flag("asc"),
    })
}

/// Display rows in the given order.
pub fn rows(txs: &[Transaction]) -> Vec<TransactionRow> {
    txs.iter()
        .map(|t| TransactionRow {
            id: t.id.map(|i| i.to_string()).unwrap_or_default(),
            date: t.date.to_string(),
            category: t.category.clone(),
            r#type: t.r#type.to_string(),
            amount: format_currency(t.amount),
            memo: t.memo.clone(),
        })
        .collect()
}

fn add<A: TransactionApi>(store: &mut TransactionStore<A>, sub: &clap::ArgMatches) -> Result<()> {
    let tx = transaction_from_args(sub)?;
    // Show the month the new entry belongs to.
    store.set_scope(Scope::new(tx.date.year(), tx.date.month()));
    print_status(store);
    let created = store.add(tx)?;
    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &created)? {
        println!(
            "Recorded {} {} ({}) on {} [id {}]",
            created.r#type,
            format_currency(created.amount),
            created.category,
            created.date,
            created.id.unwrap_or_default()
        );
        print_month_summary(store);
    }
    Ok(())
}

fn update<A: TransactionApi>(
    store: &mut TransactionStore<A>,
    sub: &clap::ArgMatches,
) -> Result<()> {
    let id = *sub.get_one::<i64>("id").unwrap();
    let tx = transaction_from_args(sub)?.with_id(id);
    let scope = selected_scope(sub, store.scope())?;
    store.set_scope(scope);
    print_status(store);
    let updated = store.update(tx)?;
    if store.find(id).is_some() {
        println!("Updated transaction {}", id);
    } else {
        println!(
            "Updated transaction {}; it now falls in {} and left this view",
            id,
            format_year_month(updated.date.year(), updated.date.month())
        );
    }
    print_month_summary(store);
    Ok(())
}

fn remove<A: TransactionApi>(
    store: &mut TransactionStore<A>,
    sub: &clap::ArgMatches,
) -> Result<()> {
    let id = *sub.get_one::<i64>("id").unwrap();
    let scope = selected_scope(sub, store.scope())?;
    store.set_scope(scope);
    print_status(store);
    store.delete(id)?;
    println!("Removed transaction {}", id);
    print_month_summary(store);
    Ok(())
}

fn print_month_summary<A: TransactionApi>(store: &TransactionStore<A>) {
    let scope = store.scope();
    let s = store.summary();
    println!(
        "{}: income {} / expense {} / balance {}",
        format_year_month(scope.year, scope.month),
        format_currency(s.income),
        format_currency(s.expense),
        format_currency(s.balance)
    );
}
