// SPDX-FileCopyrightText: 2026 Callctl Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! callctl - call-control event nucleus.
//!
//! Consumes engine signaling and lifecycle messages, keeps channel and
//! bridge state, and drives the workflow callbacks.

#[cfg(not(target_env = "msvc"))]
use tikv_jemallocator::Jemalloc;

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: Jemalloc = Jemalloc;

mod serve;
mod workflows;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use callctl_config::{CallctlConfig, ConfigError};

/// callctl - call-control event nucleus.
#[derive(Parser, Debug)]
#[command(name = "callctl", version, about, long_about = None)]
struct Cli {
    /// Config file to use instead of the standard search path.
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Replay bus traffic through the event pipeline.
    Serve {
        /// JSON-lines message capture. Reads stdin when omitted.
        #[arg(long, value_name = "PATH")]
        input: Option<PathBuf>,

        /// Print the Prometheus exposition before exiting.
        #[arg(long)]
        dump_metrics: bool,
    },
    /// Print the effective configuration as TOML.
    Config,
}

fn load_config(path: Option<&PathBuf>) -> Result<CallctlConfig, Vec<ConfigError>> {
    match path {
        Some(path) => callctl_config::load_and_validate_path(path),
        None => callctl_config::load_and_validate(),
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config = match load_config(cli.config.as_ref()) {
        Ok(config) => config,
        Err(errors) => {
            callctl_config::render_errors(&errors);
            std::process::exit(1);
        }
    };

    match cli.command {
        Some(Commands::Serve {
            input,
            dump_metrics,
        }) => {
            let options = serve::ServeOptions {
                input,
                dump_metrics,
            };
            if let Err(e) = serve::run_serve(config, options).await {
                eprintln!("error: {e}");
                std::process::exit(1);
            }
        }
        Some(Commands::Config) => match toml::to_string_pretty(&config) {
            Ok(rendered) => print!("{rendered}"),
            Err(e) => {
                eprintln!("error: cannot render config: {e}");
                std::process::exit(1);
            }
        },
        None => {
            println!("callctl: use --help for available commands");
        }
    }
}
