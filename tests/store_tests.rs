// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

mod common;

use common::{expense, income, ymd, yen, FakeApi};
use future_ledger::api::{DataSource, FallbackMode};
use future_ledger::errors::{ApiError, StoreError, ValidationError};
use future_ledger::models::{BalanceSummary, Scope, Transaction, TransactionType};
use future_ledger::store::{InsertPolicy, TransactionStore};

fn seeded() -> FakeApi {
    FakeApi::with_rows(vec![
        income(1000, "給料", ymd(2025, 5, 25)).with_id(1),
        expense(400, "食費", ymd(2025, 5, 3)).with_id(2),
        expense(50, "交通費", ymd(2025, 6, 1)).with_id(3),
    ])
}

#[test]
fn refresh_loads_month_and_summarizes() {
    let api = seeded();
    let mut store = TransactionStore::new(&api, Scope::new(2025, 1));
    assert!(store.set_scope(Scope::new(2025, 5)));

    assert_eq!(api.list_calls.borrow().as_slice(), &[(Some(2025), Some(5))]);
    assert_eq!(store.transactions().len(), 2);
    assert_eq!(
        store.summary(),
        BalanceSummary {
            income: yen(1000),
            expense: yen(400),
            balance: yen(600),
        }
    );
    assert!(!store.loading());
    assert!(store.error().is_none());
    assert_eq!(store.source(), DataSource::Live);
}

#[test]
fn empty_month_has_zero_summary() {
    let api = seeded();
    let mut store = TransactionStore::new(&api, Scope::new(2025, 5));
    store.set_current_month(2);
    assert!(store.transactions().is_empty());
    assert_eq!(store.summary(), BalanceSummary::default());
    assert_eq!(store.current_month(), 2);
    assert_eq!(store.current_year(), 2025);
}

#[test]
fn year_setter_keeps_month() {
    let api = seeded();
    let mut store = TransactionStore::new(&api, Scope::new(2024, 6));
    store.set_current_year(2025);
    assert_eq!(store.scope(), Scope::new(2025, 6));
    assert_eq!(store.transactions().len(), 1);
}

#[test]
fn add_in_month_joins_list_and_summary() {
    let api = seeded();
    let mut store = TransactionStore::new(&api, Scope::new(2025, 5));
    store.set_scope(Scope::new(2025, 5));

    let created = store.add(expense(300, "娯楽", ymd(2025, 5, 10))).unwrap();
    assert_eq!(created.id, Some(4));
    assert!(store.find(4).is_some());
    assert_eq!(store.summary().expense, yen(700));
    assert_eq!(store.summary().balance, yen(300));
}

#[test]
fn add_outside_month_is_created_but_hidden_by_default() {
    let api = seeded();
    let mut store = TransactionStore::new(&api, Scope::new(2025, 5));
    store.set_scope(Scope::new(2025, 5));
    assert_eq!(store.insert_policy(), InsertPolicy::ScopedToMonth);

    let created = store.add(expense(800, "食費", ymd(2025, 7, 1))).unwrap();
    assert_eq!(created.id, Some(4));
    assert!(store.find(4).is_none());
    assert_eq!(store.transactions().len(), 2);
    assert_eq!(store.summary().expense, yen(400));
    assert_eq!(api.rows.borrow().len(), 4);
}

#[test]
fn always_policy_keeps_out_of_month_entries_visible() {
    let api = seeded();
    let mut store =
        TransactionStore::new(&api, Scope::new(2025, 5)).with_insert_policy(InsertPolicy::Always);
    store.set_scope(Scope::new(2025, 5));

    store.add(expense(800, "食費", ymd(2025, 7, 1))).unwrap();
    assert_eq!(store.transactions().len(), 3);
    assert_eq!(store.summary().expense, yen(1200));
}

#[test]
fn add_sends_magnitude_without_id() {
    let api = seeded();
    let mut store = TransactionStore::new(&api, Scope::new(2025, 5));
    let mut tx = expense(0, "食費", ymd(2025, 5, 2)).with_id(99);
    tx.amount = yen(-500);

    let created = store.add(tx).unwrap();
    let sent = api.created.borrow();
    assert_eq!(sent[0].id, None);
    assert_eq!(sent[0].amount, yen(500));
    assert_eq!(created.amount, yen(500));
    assert_eq!(created.r#type, TransactionType::Expense);
}

#[test]
fn delete_removes_entry() {
    let api = seeded();
    let mut store = TransactionStore::new(&api, Scope::new(2025, 5));
    store.set_scope(Scope::new(2025, 5));

    store.delete(2).unwrap();
    assert!(store.find(2).is_none());
    assert_eq!(store.summary().expense, yen(0));
    assert_eq!(store.summary().balance, yen(1000));
}

#[test]
fn update_within_month_replaces_in_place() {
    let api = seeded();
    let mut store = TransactionStore::new(&api, Scope::new(2025, 5));
    store.set_scope(Scope::new(2025, 5));

    let changed = expense(450, "食費", ymd(2025, 5, 4)).with_id(2);
    store.update(changed).unwrap();
    assert_eq!(store.transactions().len(), 2);
    assert_eq!(store.find(2).unwrap().amount, yen(450));
    assert_eq!(store.summary().balance, yen(550));
}

#[test]
fn update_moving_to_other_month_drops_from_view() {
    let api = seeded();
    let mut store = TransactionStore::new(&api, Scope::new(2025, 5))
        .with_insert_policy(InsertPolicy::Always);
    store.set_scope(Scope::new(2025, 5));

    let moved = expense(400, "食費", ymd(2025, 6, 3)).with_id(2);
    let updated = store.update(moved).unwrap();
    assert_eq!(updated.date, ymd(2025, 6, 3));
    assert!(store.find(2).is_none());
    assert_eq!(store.summary().expense, yen(0));
}

#[test]
fn update_requires_id() {
    let api = seeded();
    let mut store = TransactionStore::new(&api, Scope::new(2025, 5));
    let err = store.update(expense(10, "食費", ymd(2025, 5, 1))).unwrap_err();
    assert!(matches!(
        err,
        StoreError::Validation(ValidationError::MissingId)
    ));
}

#[test]
fn validation_rejects_before_any_call() {
    let api = seeded();
    let mut store = TransactionStore::new(&api, Scope::new(2025, 5));

    let err = store.add(expense(0, "食費", ymd(2025, 5, 1))).unwrap_err();
    assert!(matches!(
        err,
        StoreError::Validation(ValidationError::MissingAmount)
    ));
    let err = store.add(expense(100, "  ", ymd(2025, 5, 1))).unwrap_err();
    assert!(matches!(
        err,
        StoreError::Validation(ValidationError::MissingCategory)
    ));
    assert!(api.created.borrow().is_empty());
}

#[test]
fn superseded_refresh_is_discarded() {
    let api = seeded();
    let mut store = TransactionStore::new(&api, Scope::new(2025, 5));

    let may = store.begin_refresh(Some(2025), Some(5));
    let june = store.begin_refresh(Some(2025), Some(6));
    assert!(store.loading());
    assert!(june.generation() > may.generation());

    let june_rows = vec![expense(50, "交通費", ymd(2025, 6, 1)).with_id(3)];
    let may_rows = vec![income(1000, "給料", ymd(2025, 5, 25)).with_id(1)];
    assert!(store.finish_refresh(june, Ok(june_rows)));
    assert!(!store.finish_refresh(may, Ok(may_rows)));

    assert_eq!(store.transactions().len(), 1);
    assert_eq!(store.transactions()[0].id, Some(3));
    assert_eq!(store.summary().expense, yen(50));
    assert!(!store.loading());
}

#[test]
fn stale_failure_does_not_clobber_newer_list() {
    let api = seeded();
    let mut store = TransactionStore::new(&api, Scope::new(2025, 5));

    let first = store.begin_refresh(Some(2025), Some(5));
    let second = store.begin_refresh(Some(2025), Some(5));
    store.finish_refresh(second, Ok(vec![income(1, "給料", ymd(2025, 5, 1))]));
    let stale = Err(ApiError::Http {
        status: 500,
        message: "boom".into(),
    });
    assert!(!store.finish_refresh(first, stale));
    assert!(store.error().is_none());
    assert_eq!(store.transactions().len(), 1);
}

#[test]
fn failed_refresh_clears_list_and_records_error() {
    let api = seeded();
    let mut store = TransactionStore::new(&api, Scope::new(2025, 5));
    store.set_scope(Scope::new(2025, 5));
    assert_eq!(store.transactions().len(), 2);

    api.fail(500);
    assert!(store.refresh(Some(2025), Some(5)));
    assert_eq!(store.error(), Some("API Error: 500"));
    assert!(store.transactions().is_empty());
    assert_eq!(store.summary(), BalanceSummary::default());
    assert!(!store.loading());

    api.recover();
    store.refresh(Some(2025), Some(5));
    assert!(store.error().is_none());
    assert_eq!(store.transactions().len(), 2);
}

#[test]
fn unavailable_backend_shows_fallback_for_that_month() {
    let api = FakeApi::default();
    let mut store =
        TransactionStore::new(&api, Scope::new(2025, 4)).with_fallback(FallbackMode::MockData);
    api.fail(503);

    store.set_scope(Scope::new(2025, 4));
    assert_eq!(store.source(), DataSource::Fallback);
    assert!(store.error().is_some());
    assert_eq!(store.transactions().len(), 1);
    assert_eq!(store.summary().income, yen(450_000));

    store.set_scope(Scope::new(2025, 5));
    assert!(store.transactions().is_empty());
}

#[test]
fn rejected_request_is_not_masked_by_fallback() {
    let api = FakeApi::default();
    let mut store =
        TransactionStore::new(&api, Scope::new(2025, 4)).with_fallback(FallbackMode::MockData);
    api.fail(400);

    store.set_scope(Scope::new(2025, 4));
    assert_eq!(store.source(), DataSource::Live);
    assert!(store.transactions().is_empty());
}

#[test]
fn failed_add_propagates_and_keeps_list() {
    let api = seeded();
    let mut store = TransactionStore::new(&api, Scope::new(2025, 5));
    store.set_scope(Scope::new(2025, 5));

    api.fail(422);
    let err = store.add(expense(10, "食費", ymd(2025, 5, 9))).unwrap_err();
    match err {
        StoreError::Api(ApiError::Http { status, .. }) => assert_eq!(status, 422),
        other => panic!("unexpected error: {other:?}"),
    }
    assert_eq!(store.error(), Some("API Error: 422"));
    assert_eq!(store.transactions().len(), 2);
}

#[test]
fn fallback_add_assigns_next_local_id() {
    let api = seeded();
    let mut store =
        TransactionStore::new(&api, Scope::new(2025, 5)).with_fallback(FallbackMode::MockData);
    store.set_scope(Scope::new(2025, 5));

    api.fail(503);
    let created = store.add(expense(10, "食費", ymd(2025, 5, 9))).unwrap();
    assert_eq!(created.id, Some(3));
    assert_eq!(store.source(), DataSource::Fallback);
    assert!(store.find(3).is_some());

    let next = store.add(expense(20, "食費", ymd(2025, 5, 9))).unwrap();
    assert_eq!(next.id, Some(4));
}

#[test]
fn import_stops_at_first_invalid_row() {
    let api = seeded();
    let mut store = TransactionStore::new(&api, Scope::new(2025, 5));
    store.set_scope(Scope::new(2025, 5));

    let rows: Vec<Transaction> = vec![
        expense(120, "食費", ymd(2025, 5, 11)),
        expense(0, "食費", ymd(2025, 5, 12)),
        expense(300, "食費", ymd(2025, 5, 13)),
    ];
    let outcome = store.import(rows);
    assert_eq!(outcome.added, 1);
    assert!(matches!(
        outcome.failed,
        Some(StoreError::Validation(ValidationError::MissingAmount))
    ));
    assert_eq!(api.created.borrow().len(), 1);
    assert_eq!(store.transactions().len(), 3);
}

#[test]
fn april_scenario_summary() {
    let api = FakeApi::with_rows(vec![
        income(1000, "給料", ymd(2025, 4, 5)).with_id(1),
        expense(400, "食費", ymd(2025, 4, 10)).with_id(2),
    ]);
    let mut store = TransactionStore::new(&api, Scope::new(2025, 4));
    store.refresh(Some(2025), Some(4));
    let s = store.summary();
    assert_eq!((s.income, s.expense, s.balance), (yen(1000), yen(400), yen(600)));
}
