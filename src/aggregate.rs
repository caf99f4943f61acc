// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Chart series derived from a transaction list. Everything here is a pure
//! function of its input.

use anyhow::anyhow;
use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;
use serde::Serialize;
use std::cmp::Ordering;
use std::collections::{BTreeMap, HashMap};
use std::str::FromStr;

use crate::format::{calculate_percentage, format_month};
use crate::models::{Transaction, TransactionType};

/// How many expenses `stats` lists by default.
pub const TOP_EXPENSES: usize = 5;

pub const WEEKDAY_LABELS: [&str; 7] = ["日", "月", "火", "水", "木", "金", "土"];

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthlySeries {
    pub labels: Vec<String>,
    pub income: Vec<Decimal>,
    pub expense: Vec<Decimal>,
    pub balance: Vec<Decimal>,
}

/// Buckets by month of year (January first), regardless of year.
pub fn by_month(txs: &[Transaction]) -> MonthlySeries {
    let mut income = vec![Decimal::ZERO; 12];
    let mut expense = vec![Decimal::ZERO; 12];
    for t in txs {
        let idx = t.date.month0() as usize;
        if t.is_income() {
            income[idx] += t.amount;
        } else {
            expense[idx] += t.amount;
        }
    }
    let balance = income.iter().zip(&expense).map(|(i, e)| *i - *e).collect();
    MonthlySeries {
        labels: (1..=12).map(format_month).collect(),
        income,
        expense,
        balance,
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryTotal {
    pub category: String,
    pub total: Decimal,
}

/// Expense totals per category, largest first. Equal totals fall back to
/// name order.
pub fn by_category(txs: &[Transaction]) -> Vec<CategoryTotal> {
    let mut agg: HashMap<&str, Decimal> = HashMap::new();
    for t in txs.iter().filter(|t| t.is_expense()) {
        *agg.entry(t.category.as_str()).or_insert(Decimal::ZERO) += t.amount;
    }
    let mut items: Vec<CategoryTotal> = agg
        .into_iter()
        .map(|(category, total)| CategoryTotal {
            category: category.to_string(),
            total,
        })
        .collect();
    items.sort_by(|a, b| b.total.cmp(&a.total).then_with(|| a.category.cmp(&b.category)));
    items
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryShare {
    pub category: String,
    pub total: Decimal,
    pub percent: i64,
}

pub fn category_shares(rows: &[CategoryTotal]) -> Vec<CategoryShare> {
    let sum: Decimal = rows.iter().map(|r| r.total).sum();
    rows.iter()
        .map(|r| CategoryShare {
            category: r.category.clone(),
            total: r.total,
            percent: calculate_percentage(r.total, sum),
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeekdayBucket {
    pub label: String,
    pub total: Decimal,
    pub count: usize,
    pub average: Decimal,
}

/// Seven expense buckets, Sunday first.
pub fn by_weekday(txs: &[Transaction]) -> Vec<WeekdayBucket> {
    let mut totals = [Decimal::ZERO; 7];
    let mut counts = [0usize; 7];
    for t in txs.iter().filter(|t| t.is_expense()) {
        let idx = t.date.weekday().num_days_from_sunday() as usize;
        totals[idx] += t.amount;
        counts[idx] += 1;
    }
    WEEKDAY_LABELS
        .iter()
        .enumerate()
        .map(|(i, label)| {
            let average = if counts[i] == 0 {
                Decimal::ZERO
            } else {
                totals[i] / Decimal::from(counts[i] as u64)
            };
            WeekdayBucket {
                label: label.to_string(),
                total: totals[i],
                count: counts[i],
                average,
            }
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrendPoint {
    pub date: NaiveDate,
    pub balance: Decimal,
}

/// Running balance starting at `opening`, one point per distinct date
/// holding the balance after that day's transactions.
pub fn balance_trend(txs: &[Transaction], opening: Decimal) -> Vec<TrendPoint> {
    let mut sorted: Vec<&Transaction> = txs.iter().collect();
    sorted.sort_by_key(|t| t.date);

    let mut running = opening;
    let mut by_date: BTreeMap<NaiveDate, Decimal> = BTreeMap::new();
    for t in sorted {
        running += t.signed_amount();
        by_date.insert(t.date, running);
    }
    by_date
        .into_iter()
        .map(|(date, balance)| TrendPoint { date, balance })
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TypeFilter {
    #[default]
    All,
    Only(TransactionType),
}

impl FromStr for TypeFilter {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "all" => Ok(TypeFilter::All),
            other => other
                .parse()
                .map(TypeFilter::Only)
                .map_err(|_| anyhow!("Unknown type filter '{}', expected all|income|expense", other)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortKey {
    #[default]
    Date,
    Amount,
}

impl FromStr for SortKey {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "date" => Ok(SortKey::Date),
            "amount" => Ok(SortKey::Amount),
            other => Err(anyhow!("Unknown sort key '{}', expected date|amount", other)),
        }
    }
}

/// Search, filter and ordering for the history view. The default is every
/// transaction, newest first.
#[derive(Debug, Clone, Default)]
pub struct HistoryQuery {
    pub search: String,
    pub r#type: TypeFilter,
    pub sort: SortKey,
    pub ascending: bool,
}

impl HistoryQuery {
    /// Case-insensitive substring match on category or memo; an empty term
    /// matches everything.
    pub fn matches(&self, t: &Transaction) -> bool {
        let type_ok = match self.r#type {
            TypeFilter::All => true,
            TypeFilter::Only(ty) => t.r#type == ty,
        };
        if !type_ok {
            return false;
        }
        let term = self.search.trim().to_lowercase();
        term.is_empty()
            || t.category.to_lowercase().contains(&term)
            || t.memo.to_lowercase().contains(&term)
    }
}

/// Applies `query` to `txs`. Ties keep their input order.
pub fn history(txs: &[Transaction], query: &HistoryQuery) -> Vec<Transaction> {
    let mut out: Vec<Transaction> = txs.iter().filter(|t| query.matches(t)).cloned().collect();
    out.sort_by(|a, b| {
        let ord: Ordering = match query.sort {
            SortKey::Date => a.date.cmp(&b.date),
            SortKey::Amount => a.amount.cmp(&b.amount),
        };
        if query.ascending { ord } else { ord.reverse() }
    });
    out
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TransactionStats {
    pub count: usize,
    /// Mean amount over all transactions, both types; zero for an empty list.
    pub average: Decimal,
    pub largest_expense: Option<Decimal>,
    pub top_expenses: Vec<Transaction>,
}

pub fn stats(txs: &[Transaction], top: usize) -> TransactionStats {
    let count = txs.len();
    let average = if count == 0 {
        Decimal::ZERO
    } else {
        txs.iter().map(|t| t.amount).sum::<Decimal>() / Decimal::from(count as u64)
    };
    let mut expenses: Vec<&Transaction> = txs.iter().filter(|t| t.is_expense()).collect();
    expenses.sort_by(|a, b| b.amount.cmp(&a.amount));
    TransactionStats {
        count,
        average,
        largest_expense: expenses.first().map(|t| t.amount),
        top_expenses: expenses.into_iter().take(top).cloned().collect(),
    }
}
