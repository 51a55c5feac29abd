// Copyright 2026 Stockwatch Contributors
// SPDX-License-Identifier: Apache-2.0

use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;
use stockwatch_runtime::cli;
use stockwatch_runtime::config::{FeedArgs, ScrapeArgs, ServeArgs};

#[derive(Parser)]
#[command(
    name = "stockwatch",
    about = "Stockwatch: garden stock harvester and read API",
    version,
    after_help = "Run 'stockwatch <command> --help' for details on each command."
)]
struct Cli {
    /// Enable verbose/debug logging
    #[arg(long, short, global = true)]
    verbose: bool,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    log_json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Serve the read API and HTML view, ingesting on an interval
    Serve(ServeArgs),
    /// Scrape or poll upstream and relay payloads to a running server
    Scrape(ScrapeArgs),
    /// Check environment and diagnose issues
    Doctor(FeedArgs),
    /// Generate shell completion scripts
    Completions {
        /// Shell type (bash, zsh, fish, powershell)
        shell: Shell,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Serve(args) => {
            cli::init_tracing(cli.verbose, cli.log_json)?;
            cli::serve::run(args).await
        }
        Commands::Scrape(args) => {
            cli::init_tracing(cli.verbose, cli.log_json)?;
            cli::scrape::run(args).await
        }
        Commands::Doctor(feed) => cli::doctor::run(feed).await,
        Commands::Completions { shell } => {
            let mut cmd = Cli::command();
            clap_complete::generate(shell, &mut cmd, "stockwatch", &mut std::io::stdout());
            Ok(())
        }
    };

    if let Err(e) = &result {
        eprintln!("  Error: {e:#}");
        std::process::exit(1);
    }

    result
}
