// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Context, Result};
use chrono::{Datelike, Local, NaiveDate};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};

use crate::models::BalanceSummary;

/// Whole-yen amount with ja-JP digit grouping, e.g. `1234567` -> `1,234,567`.
pub fn format_currency(amount: Decimal) -> String {
    let rounded = amount.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero);
    let digits = rounded.abs().trunc().to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    if rounded.is_sign_negative() && !rounded.is_zero() {
        format!("-{}", grouped)
    } else {
        grouped
    }
}

pub fn format_date(date: NaiveDate) -> String {
    format!("{}年{}月{}日", date.year(), date.month(), date.day())
}

/// Normalizes a date or datetime string to `YYYY-MM-DD`.
pub fn format_date_for_input(s: &str) -> Result<String> {
    let s = s.trim();
    let head = s.get(..10).unwrap_or(s);
    let d = NaiveDate::parse_from_str(head, "%Y-%m-%d")
        .with_context(|| format!("Invalid date '{}', expected YYYY-MM-DD", s))?;
    Ok(d.format("%Y-%m-%d").to_string())
}

pub fn current_year_month() -> (i32, u32) {
    let today = Local::now().date_naive();
    (today.year(), today.month())
}

pub fn format_month(month: u32) -> String {
    format!("{}月", month)
}

pub fn format_year_month(year: i32, month: u32) -> String {
    format!("{}年{}月", year, month)
}

/// Rounds half toward positive infinity, matching how the web UI rounded
/// its percentages.
fn round_half_up(d: Decimal) -> i64 {
    (d + Decimal::new(5, 1)).floor().to_i64().unwrap_or(0)
}

pub fn calculate_percentage(value: Decimal, total: Decimal) -> i64 {
    if total.is_zero() {
        return 0;
    }
    round_half_up(value / total * Decimal::ONE_HUNDRED)
}

/// Month navigation: wraps 12 -> 1 and 1 -> 12, carrying into the year.
/// `None` if the resulting year does not fit an `i32`.
pub fn shift_month(year: i32, month: u32, delta: i32) -> Option<(i32, u32)> {
    let index = i64::from(year)
        .checked_mul(12)?
        .checked_add(i64::from(month) - 1)?
        .checked_add(i64::from(delta))?;
    let year = i32::try_from(index.div_euclid(12)).ok()?;
    Some((year, index.rem_euclid(12) as u32 + 1))
}

pub fn savings_rate(summary: &BalanceSummary) -> i64 {
    if summary.income.is_zero() {
        return 0;
    }
    round_half_up((summary.income - summary.expense) / summary.income * Decimal::ONE_HUNDRED)
}

pub fn savings_rate_label(rate: i64) -> &'static str {
    if rate < 0 {
        "赤字"
    } else if rate < 15 {
        "低貯蓄"
    } else if rate < 30 {
        "中貯蓄"
    } else {
        "高貯蓄"
    }
}
