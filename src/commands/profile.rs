// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::api::{with_fallback, ApiClient};
use crate::fallback;
use crate::format::format_currency;
use crate::store::TransactionStore;
use crate::utils::{maybe_print_json, parse_decimal, pretty_table};
use anyhow::Result;

pub fn handle(store: &TransactionStore<ApiClient>, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("show", sub)) => show(store, sub)?,
        Some(("set-goal", sub)) => set_goal(store, sub)?,
        _ => {}
    }
    Ok(())
}

fn show(store: &TransactionStore<ApiClient>, sub: &clap::ArgMatches) -> Result<()> {
    let fetched = with_fallback(
        store.api().get_profile(),
        store.fallback_mode(),
        "fetch user profile",
        fallback::user_profile,
    )?;
    if fetched.is_fallback() {
        eprintln!("note: backend unreachable, showing fallback data");
    }
    let p = &fetched.data;
    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), p)? {
        let s = &p.settings;
        let rows = vec![
            vec!["Username".into(), p.username.clone()],
            vec!["Name".into(), p.name.clone()],
            vec!["Email".into(), p.email.clone()],
            vec!["Currency".into(), s.currency.clone().unwrap_or_default()],
            vec!["Language".into(), s.language.clone().unwrap_or_default()],
            vec![
                "Savings goal".into(),
                s.savings_goal.map(format_currency).unwrap_or_default(),
            ],
        ];
        println!("{}", pretty_table(&["Field", "Value"], rows));
    }
    Ok(())
}

/// Read-modify-write of `settings.savingsGoal`; other profile fields are
/// sent back as received.
fn set_goal(store: &TransactionStore<ApiClient>, sub: &clap::ArgMatches) -> Result<()> {
    let amount = parse_decimal(sub.get_one::<String>("amount").unwrap())?;
    let mut profile = store.api().get_profile()?;
    profile.settings.savings_goal = Some(amount);
    let saved = store.api().update_profile(&profile)?;
    println!(
        "Savings goal set to {}",
        format_currency(saved.settings.savings_goal.unwrap_or(amount))
    );
    Ok(())
}
