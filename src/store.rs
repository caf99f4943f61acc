// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Month-scoped transaction state and its derived summary.
//!
//! The store owns the list of transactions visible for the selected
//! `(year, month)` and keeps [`BalanceSummary`] in sync with it. All changes
//! go through the API first; local state follows the response, or the
//! fallback when [`FallbackMode::MockData`] is on and the backend is down.

use anyhow::anyhow;
use std::str::FromStr;

use crate::api::{with_fallback, DataSource, FallbackMode, TransactionApi};
use crate::errors::{ApiError, StoreError, ValidationError};
use crate::fallback;
use crate::models::{BalanceSummary, Scope, Transaction};

/// Whether a newly created transaction joins the visible list when its date
/// falls outside the selected month.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InsertPolicy {
    #[default]
    ScopedToMonth,
    Always,
}

impl InsertPolicy {
    fn admits(self, tx: &Transaction, scope: Scope) -> bool {
        match self {
            InsertPolicy::ScopedToMonth => tx.in_scope(scope),
            InsertPolicy::Always => true,
        }
    }
}

impl FromStr for InsertPolicy {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "scoped" | "month" | "scoped-to-month" => Ok(InsertPolicy::ScopedToMonth),
            "always" => Ok(InsertPolicy::Always),
            other => Err(anyhow!(
                "Unknown insert policy '{}', expected scoped|always",
                other
            )),
        }
    }
}

/// Handle for one issued refresh. Only the most recently issued ticket may
/// change the list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RefreshTicket {
    generation: u64,
    year: Option<i32>,
    month: Option<u32>,
}

impl RefreshTicket {
    pub fn generation(&self) -> u64 {
        self.generation
    }
}

/// Result of a batch import: rows added before the first failure, if any.
#[derive(Debug)]
pub struct ImportOutcome {
    pub added: usize,
    pub failed: Option<StoreError>,
}

pub fn validate(tx: &Transaction) -> Result<(), ValidationError> {
    if tx.amount.is_zero() {
        return Err(ValidationError::MissingAmount);
    }
    if tx.category.trim().is_empty() {
        return Err(ValidationError::MissingCategory);
    }
    Ok(())
}

pub struct TransactionStore<A: TransactionApi> {
    api: A,
    fallback: FallbackMode,
    policy: InsertPolicy,
    scope: Scope,
    transactions: Vec<Transaction>,
    summary: BalanceSummary,
    loading: bool,
    error: Option<String>,
    source: DataSource,
    issued: u64,
    max_seen_id: i64,
}

impl<A: TransactionApi> TransactionStore<A> {
    /// Creates an empty store for `scope`. Nothing is fetched until
    /// [`refresh`](Self::refresh) or a scope setter runs.
    pub fn new(api: A, scope: Scope) -> Self {
        Self {
            api,
            fallback: FallbackMode::Disabled,
            policy: InsertPolicy::default(),
            scope,
            transactions: Vec::new(),
            summary: BalanceSummary::default(),
            loading: false,
            error: None,
            source: DataSource::Live,
            issued: 0,
            max_seen_id: 0,
        }
    }

    pub fn with_fallback(mut self, mode: FallbackMode) -> Self {
        self.fallback = mode;
        self
    }

    pub fn with_insert_policy(mut self, policy: InsertPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    pub fn transactions(&self) -> &[Transaction] {
        &self.transactions
    }

    pub fn summary(&self) -> BalanceSummary {
        self.summary
    }

    pub fn scope(&self) -> Scope {
        self.scope
    }

    pub fn current_year(&self) -> i32 {
        self.scope.year
    }

    pub fn current_month(&self) -> u32 {
        self.scope.month
    }

    pub fn loading(&self) -> bool {
        self.loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn source(&self) -> DataSource {
        self.source
    }

    pub fn fallback_mode(&self) -> FallbackMode {
        self.fallback
    }

    pub fn insert_policy(&self) -> InsertPolicy {
        self.policy
    }

    pub fn find(&self, id: i64) -> Option<&Transaction> {
        self.transactions.iter().find(|t| t.id == Some(id))
    }

    pub fn set_current_year(&mut self, year: i32) -> bool {
        self.set_scope(Scope::new(year, self.scope.month))
    }

    pub fn set_current_month(&mut self, month: u32) -> bool {
        self.set_scope(Scope::new(self.scope.year, month))
    }

    /// Switches the viewing window and fetches it.
    pub fn set_scope(&mut self, scope: Scope) -> bool {
        self.scope = scope;
        self.refresh(Some(scope.year), Some(scope.month))
    }

    /// Fetches and applies a list. Failures are recorded in
    /// [`error`](Self::error) and never returned. Returns whether the result
    /// was applied.
    pub fn refresh(&mut self, year: Option<i32>, month: Option<u32>) -> bool {
        let ticket = self.begin_refresh(year, month);
        let result = self.api.list_transactions(year, month);
        self.finish_refresh(ticket, result)
    }

    pub fn begin_refresh(&mut self, year: Option<i32>, month: Option<u32>) -> RefreshTicket {
        self.issued += 1;
        self.loading = true;
        self.error = None;
        tracing::debug!(generation = self.issued, ?year, ?month, "refresh issued");
        RefreshTicket {
            generation: self.issued,
            year,
            month,
        }
    }

    /// Applies a fetched list if `ticket` is still the latest one issued.
    /// A superseded response is dropped and leaves state untouched.
    pub fn finish_refresh(
        &mut self,
        ticket: RefreshTicket,
        result: Result<Vec<Transaction>, ApiError>,
    ) -> bool {
        if ticket.generation != self.issued {
            tracing::debug!(
                generation = ticket.generation,
                latest = self.issued,
                "discarding stale refresh"
            );
            return false;
        }
        self.loading = false;
        match result {
            Ok(list) => {
                self.transactions = list;
                self.source = DataSource::Live;
                tracing::info!(count = self.transactions.len(), "transactions loaded");
            }
            Err(err) => {
                self.error = Some(err.to_string());
                if self.fallback.enabled() && err.is_unavailable() {
                    tracing::warn!(error = %err, "refresh failed; showing fallback transactions");
                    self.transactions = fallback::transactions(ticket.year, ticket.month);
                    self.source = DataSource::Fallback;
                } else {
                    tracing::warn!(error = %err, "refresh failed");
                    self.transactions.clear();
                    self.source = DataSource::Live;
                }
            }
        }
        self.note_ids();
        self.recompute();
        true
    }

    /// Submits a new transaction. The created entity is returned whether or
    /// not the insert policy lets it into the visible list.
    pub fn add(&mut self, tx: Transaction) -> Result<Transaction, StoreError> {
        validate(&tx)?;
        let mut tx = tx;
        tx.id = None;
        tx.amount = tx.amount.abs();

        let local_id = self.next_local_id();
        let result = self.api.create_transaction(&tx);
        let fetched = with_fallback(result, self.fallback, "create transaction", || {
            tx.clone().with_id(local_id)
        })
        .map_err(|e| self.fail("add", e))?;
        if fetched.is_fallback() {
            self.source = DataSource::Fallback;
        }

        let mut created = fetched.data;
        if created.id.is_none() {
            created.id = Some(local_id);
        }
        self.max_seen_id = self.max_seen_id.max(created.id.unwrap_or(0));

        if self.policy.admits(&created, self.scope) {
            self.transactions.push(created.clone());
            self.recompute();
        } else {
            tracing::info!(date = %created.date, scope = %self.scope, "created transaction is outside the selected month");
        }
        Ok(created)
    }

    /// Replaces a transaction by id. If its new date leaves the selected
    /// month it drops out of the visible list.
    pub fn update(&mut self, tx: Transaction) -> Result<Transaction, StoreError> {
        let id = tx.id.ok_or(ValidationError::MissingId)?;
        validate(&tx)?;
        let mut tx = tx;
        tx.amount = tx.amount.abs();

        let result = self.api.update_transaction(id, &tx);
        let fetched = with_fallback(result, self.fallback, "update transaction", || tx.clone())
            .map_err(|e| self.fail("update", e))?;
        if fetched.is_fallback() {
            self.source = DataSource::Fallback;
        }

        let mut updated = fetched.data;
        if updated.id.is_none() {
            updated.id = Some(id);
        }
        let pos = self.transactions.iter().position(|t| t.id == Some(id));
        match (pos, updated.in_scope(self.scope)) {
            (Some(i), true) => self.transactions[i] = updated.clone(),
            (Some(i), false) => {
                self.transactions.remove(i);
            }
            (None, true) if self.policy.admits(&updated, self.scope) => {
                self.transactions.push(updated.clone());
            }
            (None, _) => {}
        }
        self.recompute();
        Ok(updated)
    }

    pub fn delete(&mut self, id: i64) -> Result<(), StoreError> {
        let result = self.api.delete_transaction(id);
        let fetched = with_fallback(result, self.fallback, "delete transaction", || ())
            .map_err(|e| self.fail("delete", e))?;
        if fetched.is_fallback() {
            self.source = DataSource::Fallback;
        }
        self.transactions.retain(|t| t.id != Some(id));
        self.recompute();
        Ok(())
    }

    /// Adds each transaction in order, stopping at the first failure. Ids in
    /// the input are ignored; the backend assigns new ones.
    pub fn import(&mut self, txs: Vec<Transaction>) -> ImportOutcome {
        let mut added = 0;
        for tx in txs {
            match self.add(tx) {
                Ok(_) => added += 1,
                Err(err) => {
                    return ImportOutcome {
                        added,
                        failed: Some(err),
                    }
                }
            }
        }
        tracing::info!(added, "import finished");
        ImportOutcome {
            added,
            failed: None,
        }
    }

    fn fail(&mut self, op: &str, err: ApiError) -> StoreError {
        tracing::warn!(op, error = %err, "transaction operation failed");
        self.error = Some(err.to_string());
        StoreError::Api(err)
    }

    fn note_ids(&mut self) {
        let max = self.transactions.iter().filter_map(|t| t.id).max().unwrap_or(0);
        self.max_seen_id = self.max_seen_id.max(max);
    }

    fn next_local_id(&self) -> i64 {
        self.max_seen_id + 1
    }

    fn recompute(&mut self) {
        self.summary = BalanceSummary::from_transactions(&self.transactions);
    }
}
