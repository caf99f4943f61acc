// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! HTTP adapter for the transactions, savings and users endpoints.
//!
//! Every call returns `Result<_, ApiError>`. Substituting canned data is the
//! caller's decision, made explicitly through [`with_fallback`].

use chrono::NaiveDate;
use reqwest::blocking::{Client, RequestBuilder};
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::Value;

use crate::errors::ApiError;
use crate::models::{lenient_date, SavingsGoal, Transaction, TransactionType, UserProfile};
use crate::utils::http_client;

/// What to do when the backend cannot be reached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FallbackMode {
    Disabled,
    #[default]
    MockData,
}

impl FallbackMode {
    pub fn enabled(self) -> bool {
        self == FallbackMode::MockData
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DataSource {
    #[default]
    Live,
    Fallback,
}

/// A payload tagged with where it came from.
#[derive(Debug, Clone, PartialEq)]
pub struct Fetched<T> {
    pub data: T,
    pub source: DataSource,
}

impl<T> Fetched<T> {
    pub fn live(data: T) -> Self {
        Self { data, source: DataSource::Live }
    }

    pub fn fallback(data: T) -> Self {
        Self { data, source: DataSource::Fallback }
    }

    pub fn is_fallback(&self) -> bool {
        self.source == DataSource::Fallback
    }
}

/// Applies the resilience policy to one API result: when `mode` allows it and
/// the backend was unreachable, `fallback` supplies the data instead.
pub fn with_fallback<T>(
    result: Result<T, ApiError>,
    mode: FallbackMode,
    what: &str,
    fallback: impl FnOnce() -> T,
) -> Result<Fetched<T>, ApiError> {
    match result {
        Ok(data) => Ok(Fetched::live(data)),
        Err(err) if mode.enabled() && err.is_unavailable() => {
            tracing::warn!(error = %err, "{} failed; using fallback data", what);
            Ok(Fetched::fallback(fallback()))
        }
        Err(err) => Err(err),
    }
}

/// The transaction operations the store depends on.
pub trait TransactionApi {
    fn list_transactions(
        &self,
        year: Option<i32>,
        month: Option<u32>,
    ) -> Result<Vec<Transaction>, ApiError>;
    fn create_transaction(&self, tx: &Transaction) -> Result<Transaction, ApiError>;
    fn update_transaction(&self, id: i64, tx: &Transaction) -> Result<Transaction, ApiError>;
    fn delete_transaction(&self, id: i64) -> Result<(), ApiError>;
}

impl<T: TransactionApi + ?Sized> TransactionApi for &T {
    fn list_transactions(
        &self,
        year: Option<i32>,
        month: Option<u32>,
    ) -> Result<Vec<Transaction>, ApiError> {
        (**self).list_transactions(year, month)
    }

    fn create_transaction(&self, tx: &Transaction) -> Result<Transaction, ApiError> {
        (**self).create_transaction(tx)
    }

    fn update_transaction(&self, id: i64, tx: &Transaction) -> Result<Transaction, ApiError> {
        (**self).update_transaction(id, tx)
    }

    fn delete_transaction(&self, id: i64) -> Result<(), ApiError> {
        (**self).delete_transaction(id)
    }
}

/// Transaction as the backend sends it. Older endpoints encode expenses as
/// negative amounts and omit `type`.
#[derive(Debug, Deserialize)]
struct WireTransaction {
    #[serde(default)]
    id: Option<i64>,
    amount: Decimal,
    #[serde(default)]
    category: Option<String>,
    #[serde(deserialize_with = "lenient_date")]
    date: NaiveDate,
    #[serde(default)]
    memo: Option<String>,
    #[serde(default)]
    r#type: Option<TransactionType>,
}

impl From<WireTransaction> for Transaction {
    fn from(w: WireTransaction) -> Self {
        let r#type = if w.amount.is_sign_negative() && !w.amount.is_zero() {
            TransactionType::Expense
        } else {
            w.r#type.unwrap_or(TransactionType::Income)
        };
        Transaction {
            id: w.id,
            amount: w.amount.abs(),
            category: w.category.unwrap_or_default(),
            date: w.date,
            memo: w.memo.unwrap_or_default(),
            r#type,
        }
    }
}

pub fn normalize_transaction(v: Value) -> Result<Transaction, ApiError> {
    let wire: WireTransaction =
        serde_json::from_value(v).map_err(|_| ApiError::InvalidResponse)?;
    Ok(wire.into())
}

#[derive(Debug, Clone)]
pub struct ApiClient {
    base_url: String,
    http: Client,
}

impl ApiClient {
    pub fn new(base_url: &str) -> Result<Self, ApiError> {
        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            http: http_client()?,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    fn send(&self, method: &str, url: &str, req: RequestBuilder) -> Result<Value, ApiError> {
        tracing::debug!(method, url, "API request");
        let resp = req.send().map_err(|e| {
            tracing::warn!(method, url, error = %e, "API request failed");
            ApiError::from(e)
        })?;
        let status = resp.status();
        tracing::debug!(method, url, status = status.as_u16(), "API response");
        let body = resp.text()?;
        let parsed = serde_json::from_str::<Value>(&body);

        if !status.is_success() {
            let message = parsed
                .ok()
                .and_then(|v| v.get("error").and_then(Value::as_str).map(str::to_string))
                .unwrap_or_else(|| format!("API Error: {}", status.as_u16()));
            tracing::warn!(method, url, status = status.as_u16(), %message, "API error response");
            return Err(ApiError::Http {
                status: status.as_u16(),
                message,
            });
        }
        if body.trim().is_empty() {
            return Ok(Value::Null);
        }
        parsed.map_err(|_| ApiError::InvalidResponse)
    }

    fn entity(data: Value, key: &'static str) -> Result<Value, ApiError> {
        match data {
            Value::Object(mut map) => match map.remove(key) {
                Some(v) if !v.is_null() => Ok(v),
                _ => Err(ApiError::MissingField(key)),
            },
            Value::Null => Err(ApiError::InvalidResponse),
            _ => Err(ApiError::MissingField(key)),
        }
    }

    // Savings goals

    pub fn list_goals(&self) -> Result<Vec<SavingsGoal>, ApiError> {
        let url = self.url("savings");
        let data = self.send("GET", &url, self.http.get(&url))?;
        match data.get("savings") {
            Some(v @ Value::Array(_)) => {
                serde_json::from_value(v.clone()).map_err(|_| ApiError::InvalidResponse)
            }
            _ => Ok(Vec::new()),
        }
    }

    pub fn create_goal(&self, goal: &SavingsGoal) -> Result<SavingsGoal, ApiError> {
        let url = self.url("savings");
        let data = self.send("POST", &url, self.http.post(&url).json(goal))?;
        serde_json::from_value(Self::entity(data, "savingsGoal")?)
            .map_err(|_| ApiError::InvalidResponse)
    }

    pub fn update_goal(&self, id: i64, goal: &SavingsGoal) -> Result<SavingsGoal, ApiError> {
        let url = self.url(&format!("savings/{}", id));
        let data = self.send("PUT", &url, self.http.put(&url).json(goal))?;
        serde_json::from_value(Self::entity(data, "savingsGoal")?)
            .map_err(|_| ApiError::InvalidResponse)
    }

    pub fn delete_goal(&self, id: i64) -> Result<(), ApiError> {
        let url = self.url(&format!("savings/{}", id));
        self.send("DELETE", &url, self.http.delete(&url))?;
        Ok(())
    }

    // Users

    pub fn get_profile(&self) -> Result<UserProfile, ApiError> {
        let url = self.url("users");
        let data = self.send("GET", &url, self.http.get(&url))?;
        match data.get("user") {
            Some(v) if !v.is_null() => {
                serde_json::from_value(v.clone()).map_err(|_| ApiError::InvalidResponse)
            }
            _ => Ok(UserProfile::default()),
        }
    }

    pub fn update_profile(&self, profile: &UserProfile) -> Result<UserProfile, ApiError> {
        let url = self.url("users");
        let data = self.send("PUT", &url, self.http.put(&url).json(profile))?;
        serde_json::from_value(Self::entity(data, "user")?).map_err(|_| ApiError::InvalidResponse)
    }
}

impl TransactionApi for ApiClient {
    fn list_transactions(
        &self,
        year: Option<i32>,
        month: Option<u32>,
    ) -> Result<Vec<Transaction>, ApiError> {
        let mut query: Vec<(&str, String)> = Vec::new();
        if let Some(y) = year {
            query.push(("year", y.to_string()));
        }
        if let Some(m) = month {
            query.push(("month", m.to_string()));
        }
        let base = self.url("transactions");
        let url = if query.is_empty() {
            base
        } else {
            let qs: Vec<String> = query.iter().map(|(k, v)| format!("{}={}", k, v)).collect();
            format!("{}?{}", base, qs.join("&"))
        };
        let data = self.send("GET", &url, self.http.get(&url))?;
        match data.get("transactions").and_then(Value::as_array) {
            Some(items) => items.iter().cloned().map(normalize_transaction).collect(),
            None => Ok(Vec::new()),
        }
    }

    fn create_transaction(&self, tx: &Transaction) -> Result<Transaction, ApiError> {
        let url = self.url("transactions");
        let mut body = tx.clone();
        body.id = None;
        let data = self.send("POST", &url, self.http.post(&url).json(&body))?;
        normalize_transaction(Self::entity(data, "transaction")?)
    }

    fn update_transaction(&self, id: i64, tx: &Transaction) -> Result<Transaction, ApiError> {
        let url = self.url(&format!("transactions/{}", id));
        let data = self.send("PUT", &url, self.http.put(&url).json(tx))?;
        normalize_transaction(Self::entity(data, "transaction")?)
    }

    fn delete_transaction(&self, id: i64) -> Result<(), ApiError> {
        let url = self.url(&format!("transactions/{}", id));
        self.send("DELETE", &url, self.http.delete(&url))?;
        Ok(())
    }
}
