//! NN-Training-Template command-line entry point.
//!
//! Parses arguments, installs structured logging, and dispatches to the
//! command handlers in [`nntt_cli::commands`].
//!
//! # Usage
//!
//! ```text
//! nntt --config-dir ./config template
//! nntt --config-dir ./config show experiment.yaml
//! nntt gpu
//! ```

use clap::Parser;
use tracing_subscriber::EnvFilter;

use nntt_cli::{run, Cli};

fn main() -> anyhow::Result<()> {
    // Initialise structured logging.  Level is overridden by `RUST_LOG`.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    run(cli, &mut out)
}
