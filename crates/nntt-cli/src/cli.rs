//! Command-line interface of the `nntt` binary.
//!
//! ```text
//! nntt [--config-dir <DIR>] <COMMAND>
//!
//! Commands:
//!   template [--name <NAME>]   Write the default schema to <DIR>/<NAME>
//!   show <NAME>                Load <DIR>/<NAME>, merge defaults, print tables
//!   gpu                        Print installed GPUs as JSON
//! ```
//!
//! | Variable          | Default    | Description                    |
//! |-------------------|------------|--------------------------------|
//! | `NNTT_CONFIG_DIR` | `./config` | Configuration storage directory |

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use nntt_config::{DEFAULT_CONFIG_DIR, DEFAULT_TEMPLATE_NAME};

/// Configuration and device-info tool for the NN training template.
#[derive(Debug, Parser)]
#[command(name = "nntt", version)]
pub struct Cli {
    /// Directory holding configuration documents.  Must already exist.
    #[arg(long, global = true, default_value = DEFAULT_CONFIG_DIR, env = "NNTT_CONFIG_DIR")]
    pub config_dir: PathBuf,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand, PartialEq, Eq)]
pub enum Command {
    /// Write the default parameter schema as a template document.
    Template {
        /// Document name inside the config directory.  Overwritten if present.
        #[arg(long, default_value = DEFAULT_TEMPLATE_NAME)]
        name: String,
    },

    /// Load a document, fill in defaults, and print the parameter tables.
    Show {
        /// Document name inside the config directory.
        name: String,
    },

    /// Print installed NVIDIA GPUs as JSON.
    Gpu {
        /// Path to the `nvidia-smi` executable.
        #[arg(long, default_value = "nvidia-smi")]
        smi: PathBuf,
    },
}
