// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// pagecut — command-line entry point.
//
// Logs go to stderr so the JSON report on stdout stays machine-readable.
// Exit codes: 0 on success, 2 when a requested anchor was not found,
// 1 for any other failure.

mod analyze_cmd;
mod cli;

use std::process::ExitCode;

use clap::Parser;
use pagecut_core::human_errors::humanize_error;
use tracing::error;
use tracing_subscriber::EnvFilter;

use cli::{Cli, Commands};

fn main() -> ExitCode {
    let cli = Cli::parse();

    let default_level = if cli.debug { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Analyze(args) => match analyze_cmd::run(&args, cli.debug) {
            Ok(report) => {
                let json = if args.pretty {
                    serde_json::to_string_pretty(&report)
                } else {
                    serde_json::to_string(&report)
                };
                match json {
                    Ok(json) => println!("{json}"),
                    Err(err) => {
                        error!(error = %err, "Failed to serialize report");
                        return ExitCode::FAILURE;
                    }
                }
                if report.has_missing_anchor() {
                    ExitCode::from(2)
                } else {
                    ExitCode::SUCCESS
                }
            }
            Err(err) => {
                let human = humanize_error(&err);
                error!(error = %err, "Analysis failed");
                eprintln!("{}\n{}", human.message, human.suggestion);
                ExitCode::FAILURE
            }
        },
    }
}
