// Copyright 2026 Rainwatch Contributors
// SPDX-License-Identifier: Apache-2.0

#![allow(dead_code, unused_imports)]

use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;

mod acquisition;
mod cli;
mod config;
mod renderer;
mod report;
mod resolver;
mod rest;

#[derive(Parser)]
#[command(
    name = "rainwatch",
    about = "Will-it-rain service for Taiwan counties",
    version,
    after_help = "Run 'rainwatch <command> --help' for details on each command."
)]
struct Cli {
    /// Enable verbose/debug logging
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP weather service
    Serve {
        /// Port to listen on
        #[arg(long, default_value = "8000")]
        port: u16,
    },
    /// Resolve one city and print the result
    Probe {
        /// City name (e.g. "臺北市")
        #[arg(default_value = config::DEFAULT_REGION)]
        city: String,
        /// Print the raw JSON report
        #[arg(long)]
        json: bool,
    },
    /// Check environment and diagnose issues
    Doctor,
    /// Generate shell completion scripts
    Completions {
        /// Shell type (bash, zsh, fish, powershell)
        shell: Shell,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set the flag via environment so all modules can check it
    if cli.verbose {
        std::env::set_var("RAINWATCH_VERBOSE", "1");
    }

    let result = match cli.command {
        Commands::Serve { port } => cli::serve::run(port).await,
        Commands::Probe { city, json } => cli::probe::run(&city, json).await,
        Commands::Doctor => cli::doctor::run().await,
        Commands::Completions { shell } => {
            let mut cmd = Cli::command();
            clap_complete::generate(shell, &mut cmd, "rainwatch", &mut std::io::stdout());
            Ok(())
        }
    };

    // Consistent exit codes: 0=success, 1=error
    if let Err(e) = &result {
        eprintln!("  Error: {e:#}");
        std::process::exit(1);
    }

    result
}
