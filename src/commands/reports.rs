// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::aggregate::{
    balance_trend, by_category, by_month, by_weekday, category_shares, stats, TOP_EXPENSES,
};
use crate::api::{DataSource, TransactionApi};
use crate::commands::{load, print_status};
use crate::format::{
    format_currency, format_date, format_year_month, savings_rate, savings_rate_label,
};
use crate::models::{BalanceSummary, Scope};
use crate::store::TransactionStore;
use crate::utils::{maybe_print_json, parse_decimal, pretty_table};
use anyhow::Result;
use rust_decimal::Decimal;
use serde::Serialize;

pub fn handle<A: TransactionApi>(
    store: &mut TransactionStore<A>,
    m: &clap::ArgMatches,
) -> Result<()> {
    match m.subcommand() {
        Some(("summary", sub)) => summary(store, sub)?,
        Some(("monthly", sub)) => monthly(store, sub)?,
        Some(("categories", sub)) => categories(store, sub)?,
        Some(("weekdays", sub)) => weekdays(store, sub)?,
        Some(("stats", sub)) => transaction_stats(store, sub)?,
        Some(("trend", sub)) => trend(store, sub)?,
        _ => {}
    }
    Ok(())
}

#[derive(Debug, Serialize)]
pub struct SummaryReport {
    pub scope: Scope,
    pub income: Decimal,
    pub expense: Decimal,
    pub balance: Decimal,
    pub savings_rate: i64,
    pub label: &'static str,
    pub source: DataSource,
}

pub fn summary_report(scope: Scope, s: &BalanceSummary, source: DataSource) -> SummaryReport {
    let rate = savings_rate(s);
    SummaryReport {
        scope,
        income: s.income,
        expense: s.expense,
        balance: s.balance,
        savings_rate: rate,
        label: savings_rate_label(rate),
        source,
    }
}

fn summary<A: TransactionApi>(
    store: &mut TransactionStore<A>,
    sub: &clap::ArgMatches,
) -> Result<()> {
    load(store, sub)?;
    let report = summary_report(store.scope(), &store.summary(), store.source());
    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &report)? {
        let data = vec![
            vec!["収入".to_string(), format_currency(report.income)],
            vec!["支出".to_string(), format_currency(report.expense)],
            vec!["残高".to_string(), format_currency(report.balance)],
            vec![
                "貯蓄率".to_string(),
                format!("{}% ({})", report.savings_rate, report.label),
            ],
        ];
        let header = format_year_month(report.scope.year, report.scope.month);
        println!("{}", pretty_table(&[header.as_str(), "Amount"], data));
    }
    Ok(())
}

fn monthly<A: TransactionApi>(
    store: &mut TransactionStore<A>,
    sub: &clap::ArgMatches,
) -> Result<()> {
    let year = sub
        .get_one::<i32>("year")
        .copied()
        .unwrap_or(store.current_year());
    store.refresh(Some(year), None);
    print_status(store);
    let series = by_month(store.transactions());
    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &series)? {
        let data: Vec<Vec<String>> = (0..12)
            .map(|i| {
                vec![
                    series.labels[i].clone(),
                    format_currency(series.income[i]),
                    format_currency(series.expense[i]),
                    format_currency(series.balance[i]),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(&["Month", "Income", "Expense", "Balance"], data)
        );
    }
    Ok(())
}

fn categories<A: TransactionApi>(
    store: &mut TransactionStore<A>,
    sub: &clap::ArgMatches,
) -> Result<()> {
    load(store, sub)?;
    let shares = category_shares(&by_category(store.transactions()));
    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &shares)? {
        let data = shares
            .iter()
            .map(|s| {
                vec![
                    s.category.clone(),
                    format_currency(s.total),
                    format!("{}%", s.percent),
                ]
            })
            .collect();
        println!("{}", pretty_table(&["Category", "Spent", "Share"], data));
    }
    Ok(())
}

fn weekdays<A: TransactionApi>(
    store: &mut TransactionStore<A>,
    sub: &clap::ArgMatches,
) -> Result<()> {
    load(store, sub)?;
    let buckets = by_weekday(store.transactions());
    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &buckets)? {
        let data = buckets
            .iter()
            .map(|b| {
                vec![
                    b.label.clone(),
                    format_currency(b.total),
                    b.count.to_string(),
                    format_currency(b.average),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(&["Weekday", "Spent", "Count", "Average"], data)
        );
    }
    Ok(())
}

fn transaction_stats<A: TransactionApi>(
    store: &mut TransactionStore<A>,
    sub: &clap::ArgMatches,
) -> Result<()> {
    load(store, sub)?;
    let top = sub.get_one::<usize>("top").copied().unwrap_or(TOP_EXPENSES);
    let st = stats(store.transactions(), top);
    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &st)? {
        let data = vec![
            vec!["取引回数".to_string(), format!("{}回", st.count)],
            vec!["平均取引額".to_string(), format_currency(st.average)],
            vec![
                "最大支出".to_string(),
                st.largest_expense.map(format_currency).unwrap_or_else(|| "-".into()),
            ],
        ];
        println!("{}", pretty_table(&["統計", "Value"], data));

        let top_rows = st
            .top_expenses
            .iter()
            .map(|t| {
                vec![
                    t.category.clone(),
                    format_date(t.date),
                    format_currency(t.amount),
                ]
            })
            .collect();
        println!("{}", pretty_table(&["主要支出", "Date", "Amount"], top_rows));
    }
    Ok(())
}

fn trend<A: TransactionApi>(store: &mut TransactionStore<A>, sub: &clap::ArgMatches) -> Result<()> {
    load(store, sub)?;
    let saved = parse_decimal(sub.get_one::<String>("saved").unwrap())?;
    // The month's own movement is already part of `saved`.
    let opening = saved - store.summary().balance;
    let points = balance_trend(store.transactions(), opening);
    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &points)? {
        let data = points
            .iter()
            .map(|p| vec![p.date.to_string(), format_currency(p.balance)])
            .collect();
        println!("{}", pretty_table(&["Date", "Balance"], data));
    }
    Ok(())
}
