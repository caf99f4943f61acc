// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

#![allow(dead_code)]

use chrono::{Datelike, NaiveDate};
use future_ledger::api::TransactionApi;
use future_ledger::errors::ApiError;
use future_ledger::models::{Transaction, TransactionType};
use rust_decimal::Decimal;
use std::cell::{Cell, RefCell};

/// In-memory backend. Setting `fail_status` makes every call answer with
/// that HTTP status until it is cleared.
#[derive(Default)]
pub struct FakeApi {
    pub rows: RefCell<Vec<Transaction>>,
    pub next_id: Cell<i64>,
    pub fail_status: Cell<Option<u16>>,
    pub list_calls: RefCell<Vec<(Option<i32>, Option<u32>)>>,
    pub created: RefCell<Vec<Transaction>>,
}

impl FakeApi {
    pub fn with_rows(rows: Vec<Transaction>) -> Self {
        let max = rows.iter().filter_map(|t| t.id).max().unwrap_or(0);
        let api = FakeApi::default();
        *api.rows.borrow_mut() = rows;
        api.next_id.set(max);
        api
    }

    pub fn fail(&self, status: u16) {
        self.fail_status.set(Some(status));
    }

    pub fn recover(&self) {
        self.fail_status.set(None);
    }

    fn check(&self) -> Result<(), ApiError> {
        match self.fail_status.get() {
            Some(status) => Err(ApiError::Http {
                status,
                message: format!("API Error: {}", status),
            }),
            None => Ok(()),
        }
    }
}

impl TransactionApi for FakeApi {
    fn list_transactions(
        &self,
        year: Option<i32>,
        month: Option<u32>,
    ) -> Result<Vec<Transaction>, ApiError> {
        self.list_calls.borrow_mut().push((year, month));
        self.check()?;
        Ok(self
            .rows
            .borrow()
            .iter()
            .filter(|t| year.is_none_or(|y| t.date.year() == y))
            .filter(|t| month.is_none_or(|m| t.date.month() == m))
            .cloned()
            .collect())
    }

    fn create_transaction(&self, tx: &Transaction) -> Result<Transaction, ApiError> {
        self.check()?;
        let id = self.next_id.get() + 1;
        self.next_id.set(id);
        let stored = tx.clone().with_id(id);
        self.rows.borrow_mut().push(stored.clone());
        self.created.borrow_mut().push(tx.clone());
        Ok(stored)
    }

    fn update_transaction(&self, id: i64, tx: &Transaction) -> Result<Transaction, ApiError> {
        self.check()?;
        let mut rows = self.rows.borrow_mut();
        let slot = rows
            .iter_mut()
            .find(|t| t.id == Some(id))
            .ok_or_else(|| ApiError::Http {
                status: 404,
                message: "Transaction not found".into(),
            })?;
        *slot = tx.clone().with_id(id);
        Ok(slot.clone())
    }

    fn delete_transaction(&self, id: i64) -> Result<(), ApiError> {
        self.check()?;
        self.rows.borrow_mut().retain(|t| t.id != Some(id));
        Ok(())
    }
}

pub fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub fn yen(n: i64) -> Decimal {
    Decimal::new(n, 0)
}

pub fn income(amount: i64, category: &str, date: NaiveDate) -> Transaction {
    Transaction::new(yen(amount), category, date, "", TransactionType::Income)
}

pub fn expense(amount: i64, category: &str, date: NaiveDate) -> Transaction {
    Transaction::new(yen(amount), category, date, "", TransactionType::Expense)
}
