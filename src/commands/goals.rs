// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::api::{with_fallback, ApiClient, Fetched};
use crate::commands::load;
use crate::fallback;
use crate::format::{format_currency, format_year_month};
use crate::models::SavingsGoal;
use crate::savings::{month_contribution, progress, projection};
use crate::store::TransactionStore;
use crate::utils::{maybe_print_json, parse_date, parse_decimal, pretty_table};
use anyhow::{anyhow, Result};
use rust_decimal::Decimal;
use serde::Serialize;

pub fn handle(store: &mut TransactionStore<ApiClient>, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("list", sub)) => list(store, sub)?,
        Some(("add", sub)) => add(store, sub)?,
        Some(("update", sub)) => update(store, sub)?,
        Some(("rm", sub)) => remove(store, sub)?,
        Some(("project", sub)) => project(store, sub)?,
        _ => {}
    }
    Ok(())
}

fn note_fallback<T>(fetched: &Fetched<T>) {
    if fetched.is_fallback() {
        eprintln!("note: backend unreachable, change not saved");
    }
}

fn goal_from_args(sub: &clap::ArgMatches) -> Result<SavingsGoal> {
    let name = sub.get_one::<String>("name").unwrap().trim().to_string();
    let target_amount = parse_decimal(sub.get_one::<String>("target").unwrap())?;
    let current_amount = parse_decimal(sub.get_one::<String>("current").unwrap())?;
    let target_date = sub
        .get_one::<String>("date")
        .map(|s| parse_date(s))
        .transpose()?;
    Ok(SavingsGoal {
        id: None,
        name,
        target_amount,
        current_amount,
        target_date,
    })
}

#[derive(Serialize)]
pub struct GoalRow {
    pub id: Option<i64>,
    pub name: String,
    pub target: Decimal,
    pub current: Decimal,
    pub percent: i64,
    pub remaining: Decimal,
    pub target_date: Option<String>,
}

pub fn goal_rows(goals: &[SavingsGoal]) -> Vec<GoalRow> {
    goals
        .iter()
        .map(|g| {
            let p = progress(g);
            GoalRow {
                id: g.id,
                name: g.name.clone(),
                target: g.target_amount,
                current: g.current_amount,
                percent: p.percent,
                remaining: p.remaining,
                target_date: g.target_date.map(|d| d.to_string()),
            }
        })
        .collect()
}

fn list(store: &TransactionStore<ApiClient>, sub: &clap::ArgMatches) -> Result<()> {
    let fetched = with_fallback(
        store.api().list_goals(),
        store.fallback_mode(),
        "list savings goals",
        fallback::savings_goals,
    )?;
    if fetched.is_fallback() {
        eprintln!("note: backend unreachable, showing fallback data");
    }
    let data = goal_rows(&fetched.data);
    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &data)? {
        let rows = data
            .iter()
            .map(|r| {
                vec![
                    r.id.map(|i| i.to_string()).unwrap_or_default(),
                    r.name.clone(),
                    format_currency(r.current),
                    format_currency(r.target),
                    format!("{}%", r.percent),
                    format_currency(r.remaining),
                    r.target_date.clone().unwrap_or_default(),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(
                &["ID", "Goal", "Saved", "Target", "Progress", "Remaining", "Due"],
                rows
            )
        );
    }
    Ok(())
}

fn add(store: &TransactionStore<ApiClient>, sub: &clap::ArgMatches) -> Result<()> {
    let goal = goal_from_args(sub)?;
    let fetched = with_fallback(
        store.api().create_goal(&goal),
        store.fallback_mode(),
        "create savings goal",
        || goal.clone(),
    )?;
    note_fallback(&fetched);
    println!(
        "Added goal '{}' ({} / {})",
        fetched.data.name,
        format_currency(fetched.data.current_amount),
        format_currency(fetched.data.target_amount)
    );
    Ok(())
}

fn update(store: &TransactionStore<ApiClient>, sub: &clap::ArgMatches) -> Result<()> {
    let id = *sub.get_one::<i64>("id").unwrap();
    let mut goal = goal_from_args(sub)?;
    goal.id = Some(id);
    let fetched = with_fallback(
        store.api().update_goal(id, &goal),
        store.fallback_mode(),
        "update savings goal",
        || goal.clone(),
    )?;
    note_fallback(&fetched);
    println!("Updated goal {} '{}'", id, fetched.data.name);
    Ok(())
}

fn remove(store: &TransactionStore<ApiClient>, sub: &clap::ArgMatches) -> Result<()> {
    let id = *sub.get_one::<i64>("id").unwrap();
    let fetched = with_fallback(
        store.api().delete_goal(id),
        store.fallback_mode(),
        "delete savings goal",
        || (),
    )?;
    note_fallback(&fetched);
    println!("Removed goal {}", id);
    Ok(())
}

fn project(store: &mut TransactionStore<ApiClient>, sub: &clap::ArgMatches) -> Result<()> {
    load(store, sub)?;
    let saved = parse_decimal(sub.get_one::<String>("saved").unwrap())?;
    let goal = match sub.get_one::<String>("goal") {
        Some(raw) => parse_decimal(raw)?,
        None => {
            let profile = with_fallback(
                store.api().get_profile(),
                store.fallback_mode(),
                "fetch user profile",
                fallback::user_profile,
            )?;
            profile
                .data
                .settings
                .savings_goal
                .ok_or_else(|| anyhow!("Profile has no savings goal; pass --goal"))?
        }
    };

    let summary = store.summary();
    let scope = store.scope();
    println!(
        "Goal {} / saved {} / this month {}",
        format_currency(goal),
        format_currency(saved),
        format_currency(summary.balance)
    );
    if let Some(pct) = month_contribution(&summary, saved, goal) {
        println!("This month covers {}% of the remaining amount", pct);
    }
    match projection(saved, goal, summary.balance, scope) {
        Some(p) => println!(
            "At this pace the goal is reached in {} months ({})",
            p.months,
            format_year_month(p.year, p.month)
        ),
        None if saved >= goal => println!("Goal already reached"),
        None => println!("Balance is not growing this month; no projection"),
    }
    Ok(())
}
