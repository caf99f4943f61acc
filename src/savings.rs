// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::Serialize;

use crate::format::{calculate_percentage, shift_month};
use crate::models::{BalanceSummary, SavingsGoal, Scope};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct GoalProgress {
    pub percent: i64,
    /// `percent` capped to 100 for progress bars.
    pub bar_percent: i64,
    pub remaining: Decimal,
}

pub fn progress_toward(saved: Decimal, target: Decimal) -> GoalProgress {
    let percent = calculate_percentage(saved, target);
    GoalProgress {
        percent,
        bar_percent: percent.clamp(0, 100),
        remaining: (target - saved).max(Decimal::ZERO),
    }
}

pub fn progress(goal: &SavingsGoal) -> GoalProgress {
    progress_toward(goal.current_amount, goal.target_amount)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Projection {
    pub months: u32,
    pub year: i32,
    pub month: u32,
}

/// Months until `goal` is reached at the current monthly balance, and the
/// calendar month that lands on. `None` if the goal is met or the balance
/// does not grow.
pub fn projection(
    total_saved: Decimal,
    goal: Decimal,
    monthly_balance: Decimal,
    from: Scope,
) -> Option<Projection> {
    let remaining = goal - total_saved;
    if remaining <= Decimal::ZERO || monthly_balance <= Decimal::ZERO {
        return None;
    }
    let months = (remaining / monthly_balance).ceil().to_u32()?;
    let (year, month) = shift_month(from.year, from.month, i32::try_from(months).ok()?)?;
    Some(Projection {
        months,
        year,
        month,
    })
}

/// This month's balance as a share of what is still missing, one decimal.
pub fn month_contribution(
    summary: &BalanceSummary,
    total_saved: Decimal,
    goal: Decimal,
) -> Option<Decimal> {
    let remaining = goal - total_saved;
    if remaining <= Decimal::ZERO {
        return None;
    }
    let pct = (summary.income - summary.expense) / remaining * Decimal::ONE_HUNDRED;
    Some(pct.round_dp_with_strategy(1, RoundingStrategy::MidpointAwayFromZero))
}
