//! Handlers for each `nntt` subcommand.
//!
//! Handlers write their user-facing output to the supplied writer so they can
//! be tested without capturing stdout.  Diagnostics go through `tracing`.

use std::io::Write;
use std::path::Path;

use anyhow::Context;
use nntt_config::ConfigStore;
use nntt_sysinfo::{nvidia_info, NvidiaSmi};
use tracing::info;

use crate::cli::{Cli, Command};
use crate::defaults::register_training_defaults;

/// Executes the parsed command line.
///
/// # Errors
///
/// Returns an error if the config directory is missing, a document cannot
/// be loaded or written, or output cannot be written.  The GPU command never
/// fails on a missing driver; it reports `"state": false` instead.
pub fn run(cli: Cli, out: &mut dyn Write) -> anyhow::Result<()> {
    match cli.command {
        Command::Template { name } => {
            let store = open_store(&cli.config_dir)?;
            let path = store
                .generate_template(&name)
                .with_context(|| format!("failed to write template {name}"))?;
            writeln!(out, "template written to {}", path.display())?;
        }
        Command::Show { name } => {
            let mut store = open_store(&cli.config_dir)?;
            store
                .load(&name)
                .with_context(|| format!("failed to load configuration {name}"))?;
            write!(out, "{}", store.render_parameters())?;
        }
        Command::Gpu { smi } => {
            let report = nvidia_info(&NvidiaSmi::with_program(smi));
            info!(state = report.state, devices = report.device_count, "GPU probe finished");
            writeln!(out, "{}", serde_json::to_string_pretty(&report)?)?;
        }
    }
    Ok(())
}

/// Opens the store and registers the template defaults.
fn open_store(config_dir: &Path) -> anyhow::Result<ConfigStore> {
    let mut store = ConfigStore::new(config_dir)
        .with_context(|| format!("cannot open config directory {}", config_dir.display()))?;
    register_training_defaults(&mut store);
    Ok(store)
}
