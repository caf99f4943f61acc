// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::models::TransactionType;
use crate::utils::pretty_table;
use anyhow::Result;

pub fn handle() -> Result<()> {
    let rows = [TransactionType::Expense, TransactionType::Income]
        .iter()
        .flat_map(|ty| {
            ty.presets()
                .iter()
                .map(move |c| vec![ty.as_str().to_string(), c.to_string()])
        })
        .collect();
    println!("{}", pretty_table(&["Type", "Category"], rows));
    Ok(())
}
