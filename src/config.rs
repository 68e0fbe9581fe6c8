// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Trailmap and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Command-line and environment configuration.

use std::env;
use std::path::{Path, PathBuf};

use crate::store::WriteDurability;

pub const PROGRESS_ENV: &str = "TRAILMAP_PROGRESS";
pub const CATALOG_ENV: &str = "TRAILMAP_CATALOG";
pub const LOG_ENV: &str = "TRAILMAP_LOG";
pub const DEFAULT_LOG_FILTER: &str = "trailmap=info";

const PROGRESS_FILE_NAME: &str = "progress.json";
const LOG_FILE_NAME: &str = "trailmap.log";

pub fn usage(program: &str) -> String {
    format!(
        "Usage:\n  {program} [--progress <file>] [--catalog <file>] [--durable-writes] [--log-file <file>] [--stats]\n  {program} --ephemeral [--catalog <file>] [--log-file <file>] [--stats]\n\n--progress selects the progress file (env {PROGRESS_ENV}; default $XDG_DATA_HOME/trailmap/{PROGRESS_FILE_NAME}).\n--catalog loads roadmaps from a JSON file instead of the built-in curriculum (env {CATALOG_ENV}).\n--durable-writes opts into slower, best-effort durable persistence (fsync/sync where supported).\n--ephemeral keeps progress in memory only.\n--stats prints per-roadmap progress and exits.\n--log-file selects the log destination; {LOG_ENV} sets the filter (default {DEFAULT_LOG_FILTER})."
    )
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("flag {0} given more than once")]
    DuplicateFlag(String),
    #[error("flag {0} needs a value")]
    MissingValue(String),
    #[error("unexpected argument {0:?}")]
    UnexpectedArgument(String),
    #[error("--ephemeral cannot be combined with {0}")]
    EphemeralConflict(&'static str),
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct CliOptions {
    pub progress: Option<PathBuf>,
    pub catalog: Option<PathBuf>,
    pub log_file: Option<PathBuf>,
    pub durable_writes: bool,
    pub ephemeral: bool,
    pub stats: bool,
    pub help: bool,
}

pub fn parse_options(mut args: impl Iterator<Item = String>) -> Result<CliOptions, ConfigError> {
    let mut options = CliOptions::default();

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "-h" | "--help" => options.help = true,
            "--progress" => set_path(&mut options.progress, &arg, &mut args)?,
            "--catalog" => set_path(&mut options.catalog, &arg, &mut args)?,
            "--log-file" => set_path(&mut options.log_file, &arg, &mut args)?,
            "--durable-writes" => set_flag(&mut options.durable_writes, &arg)?,
            "--ephemeral" => set_flag(&mut options.ephemeral, &arg)?,
            "--stats" => set_flag(&mut options.stats, &arg)?,
            _ => return Err(ConfigError::UnexpectedArgument(arg)),
        }
    }

    if options.ephemeral {
        if options.progress.is_some() {
            return Err(ConfigError::EphemeralConflict("--progress"));
        }
        if options.durable_writes {
            return Err(ConfigError::EphemeralConflict("--durable-writes"));
        }
    }

    Ok(options)
}

fn set_flag(slot: &mut bool, flag: &str) -> Result<(), ConfigError> {
    if *slot {
        return Err(ConfigError::DuplicateFlag(flag.to_owned()));
    }
    *slot = true;
    Ok(())
}

fn set_path(
    slot: &mut Option<PathBuf>,
    flag: &str,
    args: &mut impl Iterator<Item = String>,
) -> Result<(), ConfigError> {
    if slot.is_some() {
        return Err(ConfigError::DuplicateFlag(flag.to_owned()));
    }
    let value = args
        .next()
        .filter(|value| !value.starts_with("--"))
        .ok_or_else(|| ConfigError::MissingValue(flag.to_owned()))?;
    *slot = Some(PathBuf::from(value));
    Ok(())
}

/// Fully resolved runtime settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// `None` keeps progress in memory only.
    pub progress_path: Option<PathBuf>,
    /// `None` uses the built-in catalog.
    pub catalog_path: Option<PathBuf>,
    pub durability: WriteDurability,
    pub log_file: PathBuf,
    pub log_filter: String,
    pub stats_only: bool,
}

impl Config {
    pub fn from_env(options: CliOptions) -> Self {
        Self::resolve(options, |key| env::var(key).ok())
    }

    /// Merges CLI options over environment values; flags win.
    pub fn resolve(options: CliOptions, lookup: impl Fn(&str) -> Option<String>) -> Self {
        let var = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let data_file = options
            .progress
            .or_else(|| var(PROGRESS_ENV).map(PathBuf::from))
            .unwrap_or_else(|| default_progress_path(&var));
        let log_file = options
            .log_file
            .unwrap_or_else(|| sibling_log_file(&data_file));
        let catalog_path = options.catalog.or_else(|| var(CATALOG_ENV).map(PathBuf::from));
        let log_filter = var(LOG_ENV).unwrap_or_else(|| DEFAULT_LOG_FILTER.to_owned());
        let durability = if options.durable_writes {
            WriteDurability::Durable
        } else {
            WriteDurability::BestEffort
        };

        Self {
            progress_path: (!options.ephemeral).then_some(data_file),
            catalog_path,
            durability,
            log_file,
            log_filter,
            stats_only: options.stats,
        }
    }
}

/// `$XDG_DATA_HOME/trailmap/progress.json`, then `$HOME/.local/share/...`, then the working
/// directory.
fn default_progress_path(var: &impl Fn(&str) -> Option<String>) -> PathBuf {
    if let Some(data_home) = var("XDG_DATA_HOME") {
        return Path::new(&data_home).join("trailmap").join(PROGRESS_FILE_NAME);
    }
    if let Some(home) = var("HOME") {
        return Path::new(&home)
            .join(".local")
            .join("share")
            .join("trailmap")
            .join(PROGRESS_FILE_NAME);
    }
    PathBuf::from("trailmap-progress.json")
}

fn sibling_log_file(progress_path: &Path) -> PathBuf {
    match progress_path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.join(LOG_FILE_NAME),
        _ => PathBuf::from(LOG_FILE_NAME),
    }
}
