// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Static data shown when the backend is unreachable and
//! `FallbackMode::MockData` is on.

use chrono::{Datelike, NaiveDate};
use once_cell::sync::Lazy;
use rust_decimal::Decimal;

use crate::models::{
    ProfileSettings, SavingsGoal, Transaction, TransactionType, UserProfile,
};

fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap_or_default()
}

static TRANSACTIONS: Lazy<Vec<Transaction>> = Lazy::new(|| {
    vec![
        Transaction::new(
            Decimal::new(450_000, 0),
            "給料",
            ymd(2025, 4, 25),
            "4月分給料",
            TransactionType::Income,
        )
        .with_id(1),
    ]
});

static GOALS: Lazy<Vec<SavingsGoal>> = Lazy::new(|| {
    vec![
        SavingsGoal {
            id: Some(1),
            name: "緊急用資金".into(),
            target_amount: Decimal::new(1_000_000, 0),
            current_amount: Decimal::new(450_000, 0),
            target_date: Some(ymd(2025, 12, 31)),
        },
        SavingsGoal {
            id: Some(2),
            name: "旅行資金".into(),
            target_amount: Decimal::new(300_000, 0),
            current_amount: Decimal::new(120_000, 0),
            target_date: Some(ymd(2025, 8, 1)),
        },
        SavingsGoal {
            id: Some(3),
            name: "新しいパソコン".into(),
            target_amount: Decimal::new(250_000, 0),
            current_amount: Decimal::new(100_000, 0),
            target_date: Some(ymd(2025, 10, 1)),
        },
    ]
});

static PROFILE: Lazy<UserProfile> = Lazy::new(|| UserProfile {
    id: Some(1),
    username: "user123".into(),
    email: "user@example.com".into(),
    name: "山田 太郎".into(),
    settings: ProfileSettings {
        currency: Some("JPY".into()),
        language: Some("ja".into()),
        theme: Some("dark".into()),
        savings_goal: Some(Decimal::new(3_000_000, 0)),
        extra: Default::default(),
    },
    extra: Default::default(),
});

/// Fallback transactions matching a list query; `None` leaves that part open.
pub fn transactions(year: Option<i32>, month: Option<u32>) -> Vec<Transaction> {
    TRANSACTIONS
        .iter()
        .filter(|t| year.is_none_or(|y| t.date.year() == y))
        .filter(|t| month.is_none_or(|m| t.date.month() == m))
        .cloned()
        .collect()
}

pub fn savings_goals() -> Vec<SavingsGoal> {
    GOALS.clone()
}

pub fn user_profile() -> UserProfile {
    PROFILE.clone()
}
