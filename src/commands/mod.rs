// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

pub mod categories;
pub mod exporter;
pub mod goals;
pub mod importer;
pub mod profile;
pub mod reports;
pub mod transactions;

use crate::api::{DataSource, TransactionApi};
use crate::format::shift_month;
use crate::models::Scope;
use crate::store::TransactionStore;
use anyhow::{anyhow, Result};

/// Month picked by `--year/--month/--offset`, starting from `base`.
pub fn selected_scope(sub: &clap::ArgMatches, base: Scope) -> Result<Scope> {
    let year = sub.get_one::<i32>("year").copied().unwrap_or(base.year);
    let month = sub.get_one::<u32>("month").copied().unwrap_or(base.month);
    let offset = sub.get_one::<i32>("offset").copied().unwrap_or(0);
    let (year, month) = shift_month(year, month, offset)
        .ok_or_else(|| anyhow!("--offset {} moves {}-{:02} out of range", offset, year, month))?;
    Ok(Scope::new(year, month))
}

/// Loads the month chosen on the command line, or everything with `--all`.
pub fn load<A: TransactionApi>(
    store: &mut TransactionStore<A>,
    sub: &clap::ArgMatches,
) -> Result<()> {
    let wants_all = sub
        .try_get_one::<bool>("all")
        .ok()
        .flatten()
        .copied()
        .unwrap_or(false);
    if wants_all {
        store.refresh(None, None);
    } else {
        let scope = selected_scope(sub, store.scope())?;
        store.set_scope(scope);
    }
    print_status(store);
    Ok(())
}

/// Surfaces refresh problems on stderr so stdout stays machine-readable.
pub fn print_status<A: TransactionApi>(store: &TransactionStore<A>) {
    if let Some(err) = store.error() {
        eprintln!("warning: {}", err);
    }
    if store.source() == DataSource::Fallback {
        eprintln!("note: backend unreachable, showing fallback data");
    }
}
