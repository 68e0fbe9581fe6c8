// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Trailmap and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Trailmap CLI entrypoint.
//!
//! By default this opens the interactive TUI on the progress file. `--stats` prints a
//! summary instead.

use std::error::Error;

use trailmap::catalog::{builtin_catalog, load_catalog_file};
use trailmap::config::{parse_options, usage, Config};
use trailmap::store::{MemorySink, ProgressFile};
use trailmap::tracker::Tracker;

fn main() {
    let result = (|| -> Result<(), Box<dyn Error>> {
        let mut args = std::env::args();
        let program = args.next().unwrap_or_else(|| "trailmap".to_owned());

        let options = match parse_options(args) {
            Ok(options) => options,
            Err(err) => {
                eprintln!("trailmap: {err}\n");
                eprintln!("{}", usage(&program));
                std::process::exit(2);
            }
        };
        if options.help {
            println!("{}", usage(&program));
            return Ok(());
        }

        let config = Config::from_env(options);
        if let Err(err) = trailmap::logging::init_file_logging(&config.log_file, &config.log_filter)
        {
            eprintln!("trailmap: logging disabled ({}): {err}", config.log_file.display());
        }
        tracing::info!(version = env!("CARGO_PKG_VERSION"), "starting");

        let catalog = match &config.catalog_path {
            Some(path) => load_catalog_file(path)?,
            None => builtin_catalog(),
        };

        if config.stats_only {
            let blob = config.progress_path.as_ref().and_then(|path| {
                ProgressFile::new(path).read_blob_or_none()
            });
            print_stats(&Tracker::snapshot(catalog, blob.as_deref()));
            return Ok(());
        }

        match &config.progress_path {
            Some(path) => {
                let file = ProgressFile::new(path).with_durability(config.durability);
                let blob = file.read_blob_or_none();
                tracing::info!(path = %path.display(), "opening progress file");
                trailmap::tui::run(Tracker::open(catalog, blob.as_deref(), file))
            }
            None => {
                tracing::info!("ephemeral session; progress stays in memory");
                trailmap::tui::run(Tracker::open(catalog, None, MemorySink::new()))
            }
        }
    })();

    if let Err(err) = result {
        tracing::error!(error = %err, "fatal");
        eprintln!("trailmap: {err}");
        std::process::exit(1);
    }
}

// `--stats` never writes: the snapshot reconciles in memory only.
fn print_stats(tracker: &Tracker<MemorySink>) {
    print!(
        "{}",
        trailmap::stats::render_table(tracker.catalog(), tracker.store())
    );
}
