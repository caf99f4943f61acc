// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;

use future_ledger::api::ApiClient;
use future_ledger::config::Config;
use future_ledger::models::Scope;
use future_ledger::store::TransactionStore;
use future_ledger::{cli, commands, utils};

fn main() -> Result<()> {
    utils::init_tracing();
    let matches = cli::build_cli().get_matches();

    let mut config = Config::from_env()?;
    config.apply_overrides(&matches)?;
    tracing::debug!(?config, "configuration loaded");

    let api = ApiClient::new(&config.api_base_url)?;
    let mut store = TransactionStore::new(api, Scope::current())
        .with_fallback(config.fallback)
        .with_insert_policy(config.insert_policy);

    match matches.subcommand() {
        Some(("tx", sub)) => commands::transactions::handle(&mut store, sub)?,
        Some(("report", sub)) => commands::reports::handle(&mut store, sub)?,
        Some(("goals", sub)) => commands::goals::handle(&mut store, sub)?,
        Some(("profile", sub)) => commands::profile::handle(&store, sub)?,
        Some(("export", sub)) => commands::exporter::handle(&mut store, sub)?,
        Some(("import", sub)) => commands::importer::handle(&mut store, sub)?,
        Some(("categories", _)) => commands::categories::handle()?,
        _ => {
            cli::build_cli().print_help()?;
            println!();
        }
    }
    Ok(())
}
