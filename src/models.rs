// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;

pub const EXPENSE_CATEGORIES: &[&str] = &[
    "食費", "家賃", "光熱費", "交通費", "娯楽", "医療費", "衣服", "その他",
];
pub const INCOME_CATEGORIES: &[&str] = &["給料", "副業", "投資", "贈与", "その他"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionType {
    Income,
    Expense,
}

impl TransactionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionType::Income => "income",
            TransactionType::Expense => "expense",
        }
    }

    /// Label used in the CSV `タイプ` column.
    pub fn label(&self) -> &'static str {
        match self {
            TransactionType::Income => "収入",
            TransactionType::Expense => "支出",
        }
    }

    pub fn presets(&self) -> &'static [&'static str] {
        match self {
            TransactionType::Income => INCOME_CATEGORIES,
            TransactionType::Expense => EXPENSE_CATEGORIES,
        }
    }
}

impl fmt::Display for TransactionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TransactionType {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "income" | "収入" => Ok(TransactionType::Income),
            "expense" | "支出" => Ok(TransactionType::Expense),
            other => Err(anyhow::anyhow!(
                "Invalid transaction type '{}', expected income|expense",
                other
            )),
        }
    }
}

/// A single income or expense entry. `amount` is always a magnitude; the
/// direction lives in `type`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    #[serde(serialize_with = "rust_decimal::serde::float::serialize")]
    pub amount: Decimal,
    pub category: String,
    #[serde(deserialize_with = "lenient_date")]
    pub date: NaiveDate,
    #[serde(default)]
    pub memo: String,
    pub r#type: TransactionType,
}

impl Transaction {
    pub fn new(
        amount: Decimal,
        category: impl Into<String>,
        date: NaiveDate,
        memo: impl Into<String>,
        r#type: TransactionType,
    ) -> Self {
        Self {
            id: None,
            amount: amount.abs(),
            category: category.into(),
            date,
            memo: memo.into(),
            r#type,
        }
    }

    pub fn with_id(mut self, id: i64) -> Self {
        self.id = Some(id);
        self
    }

    pub fn is_income(&self) -> bool {
        self.r#type == TransactionType::Income
    }

    pub fn is_expense(&self) -> bool {
        self.r#type == TransactionType::Expense
    }

    pub fn in_scope(&self, scope: Scope) -> bool {
        self.date.year() == scope.year && self.date.month() == scope.month
    }

    /// Signed contribution to a balance.
    pub fn signed_amount(&self) -> Decimal {
        match self.r#type {
            TransactionType::Income => self.amount,
            TransactionType::Expense => -self.amount,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BalanceSummary {
    pub income: Decimal,
    pub expense: Decimal,
    pub balance: Decimal,
}

impl BalanceSummary {
    pub fn from_transactions(txs: &[Transaction]) -> Self {
        let income: Decimal = txs.iter().filter(|t| t.is_income()).map(|t| t.amount).sum();
        let expense: Decimal = txs.iter().filter(|t| t.is_expense()).map(|t| t.amount).sum();
        Self {
            income,
            expense,
            balance: income - expense,
        }
    }
}

/// The (year, month) viewing window. The month is not range-checked here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Scope {
    pub year: i32,
    pub month: u32,
}

impl Scope {
    pub fn new(year: i32, month: u32) -> Self {
        Self { year, month }
    }

    pub fn current() -> Self {
        let (year, month) = crate::format::current_year_month();
        Self { year, month }
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{:02}", self.year, self.month)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavingsGoal {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub name: String,
    #[serde(serialize_with = "rust_decimal::serde::float::serialize")]
    pub target_amount: Decimal,
    #[serde(serialize_with = "rust_decimal::serde::float::serialize")]
    pub current_amount: Decimal,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProfileSettings {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub theme: Option<String>,
    #[serde(
        rename = "savingsGoal",
        default,
        skip_serializing_if = "Option::is_none",
        serialize_with = "rust_decimal::serde::float_option::serialize"
    )]
    pub savings_goal: Option<Decimal>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// Server-side user record. Unknown keys ride along in `extra` so a
/// read-modify-write does not drop them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub settings: ProfileSettings,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// Accepts `YYYY-MM-DD` as well as a full datetime; only the date part is kept.
pub fn lenient_date<'de, D>(d: D) -> Result<NaiveDate, D::Error>
where
    D: Deserializer<'de>,
{
    let s = String::deserialize(d)?;
    let head = s.get(..10).unwrap_or(&s);
    NaiveDate::parse_from_str(head, "%Y-%m-%d").map_err(serde::de::Error::custom)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transaction_json_uses_numeric_amount_and_type_key() {
        let t = Transaction::new(
            Decimal::new(-1200, 0),
            "食費",
            NaiveDate::from_ymd_opt(2025, 4, 3).unwrap(),
            "",
            TransactionType::Expense,
        );
        let v = serde_json::to_value(&t).unwrap();
        assert_eq!(v["amount"], serde_json::json!(1200.0));
        assert_eq!(v["type"], "expense");
        assert!(v.get("id").is_none());
    }

    #[test]
    fn lenient_date_takes_date_part_of_datetime() {
        let t: Transaction = serde_json::from_str(
            r#"{"id":3,"amount":"500","category":"交通費","date":"2025-04-10T09:30:00Z","type":"expense"}"#,
        )
        .unwrap();
        assert_eq!(t.date, NaiveDate::from_ymd_opt(2025, 4, 10).unwrap());
        assert_eq!(t.memo, "");
    }

    #[test]
    fn profile_keeps_unknown_fields() {
        let raw = r#"{"id":1,"username":"u","email":"e","name":"n","plan":"pro","settings":{"currency":"JPY","savingsGoal":3000000,"notify":true}}"#;
        let p: UserProfile = serde_json::from_str(raw).unwrap();
        assert_eq!(p.settings.savings_goal, Some(Decimal::new(3_000_000, 0)));
        let back = serde_json::to_value(&p).unwrap();
        assert_eq!(back["plan"], "pro");
        assert_eq!(back["settings"]["notify"], true);
        assert_eq!(back["settings"]["savingsGoal"], serde_json::json!(3000000.0));
    }
}
