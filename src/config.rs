// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Context, Result};
use chrono::NaiveDate;
use directories::UserDirs;
use std::path::PathBuf;

use crate::api::FallbackMode;
use crate::store::InsertPolicy;

pub const DEFAULT_API_BASE_URL: &str = "https://x.rxxuzi.com/api";

pub const ENV_API_BASE_URL: &str = "FUTURE_API_BASE_URL";
pub const ENV_FALLBACK_TO_MOCKS: &str = "FUTURE_FALLBACK_TO_MOCKS";
pub const ENV_INSERT_POLICY: &str = "FUTURE_INSERT_POLICY";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub api_base_url: String,
    pub fallback: FallbackMode,
    pub insert_policy: InsertPolicy,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            fallback: FallbackMode::MockData,
            insert_policy: InsertPolicy::ScopedToMonth,
        }
    }
}

/// Anything but the literal `false` keeps the fallback on.
fn parse_fallback(raw: &str) -> FallbackMode {
    if raw.trim().eq_ignore_ascii_case("false") {
        FallbackMode::Disabled
    } else {
        FallbackMode::MockData
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut cfg = Config::default();
        if let Some(url) = lookup(ENV_API_BASE_URL).filter(|s| !s.trim().is_empty()) {
            cfg.api_base_url = url.trim().trim_end_matches('/').to_string();
        }
        if let Some(raw) = lookup(ENV_FALLBACK_TO_MOCKS) {
            cfg.fallback = parse_fallback(&raw);
        }
        if let Some(raw) = lookup(ENV_INSERT_POLICY).filter(|s| !s.trim().is_empty()) {
            cfg.insert_policy = raw
                .parse()
                .with_context(|| format!("Invalid {}", ENV_INSERT_POLICY))?;
        }
        Ok(cfg)
    }

    /// Global CLI flags win over the environment.
    pub fn apply_overrides(&mut self, m: &clap::ArgMatches) -> Result<()> {
        if let Some(url) = m.get_one::<String>("api_url") {
            self.api_base_url = url.trim().trim_end_matches('/').to_string();
        }
        if let Some(raw) = m.get_one::<String>("fallback") {
            self.fallback = parse_fallback(raw);
        }
        if let Some(raw) = m.get_one::<String>("insert_policy") {
            self.insert_policy = raw.parse()?;
        }
        Ok(())
    }
}

/// `future_YYYY-MM-DD.csv`, placed in the user's download directory when the
/// platform has one.
pub fn default_export_path(today: NaiveDate, ext: &str) -> PathBuf {
    let file = format!("future_{}.{}", today.format("%Y-%m-%d"), ext);
    match UserDirs::new().and_then(|u| u.download_dir().map(|d| d.to_path_buf())) {
        Some(dir) if dir.is_dir() => dir.join(file),
        _ => PathBuf::from(file),
    }
}
