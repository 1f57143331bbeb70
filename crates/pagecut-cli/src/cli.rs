// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Command-line argument definitions.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// Recover page margins, the column gap and anchor marker boxes from scanned pages.
#[derive(Debug, Parser)]
#[command(name = "pagecut", about, version)]
pub struct Cli {
    /// Log detector decisions and per-pass timings
    #[arg(long, global = true)]
    pub debug: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Analyze one page image and print its layout cues as JSON
    Analyze(AnalyzeArgs),
}

#[derive(Debug, Args)]
pub struct AnalyzeArgs {
    /// Path to the page image (PNG, JPEG, TIFF, ...)
    #[arg(value_name = "IMAGE")]
    pub image: PathBuf,

    /// JSON analysis settings file
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Cap on the working resolution's short side (overrides the config file)
    #[arg(long)]
    pub size_limit: Option<u32>,

    /// Skip binarization and analyze the resampled pixels as they are
    #[arg(long)]
    pub raw: bool,

    /// Run the denoise pass after binarization
    #[arg(long)]
    pub denoise: bool,

    /// Seed point for an anchor marker search, as normalized "x,y" (repeatable)
    #[arg(long = "anchor", value_name = "NX,NY", value_parser = parse_seed)]
    pub anchors: Vec<(f64, f64)>,

    /// Pretty-print the JSON report
    #[arg(long)]
    pub pretty: bool,
}

/// Parse a normalized seed point such as `0.05,0.95`.
pub fn parse_seed(value: &str) -> Result<(f64, f64), String> {
    let (x, y) = value
        .split_once(',')
        .ok_or_else(|| format!("expected NX,NY but got '{value}'"))?;
    let parse = |part: &str| {
        part.trim()
            .parse::<f64>()
            .map_err(|err| format!("invalid coordinate '{part}': {err}"))
            .and_then(|v| {
                if (0.0..=1.0).contains(&v) {
                    Ok(v)
                } else {
                    Err(format!("coordinate {v} is outside 0..=1"))
                }
            })
    };
    Ok((parse(x)?, parse(y)?))
}
