// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// `pagecut analyze` — run the full analysis on one page image.

use pagecut_core::error::Result;
use pagecut_core::human_errors::humanize_error;
use pagecut_core::{AnalysisConfig, AnchorBox, ColumnSpan, Gap, Padding};
use pagecut_document::PageAnalyzer;
use serde::Serialize;
use tracing::{info, warn};

use crate::cli::AnalyzeArgs;

/// JSON report for one page.
#[derive(Debug, Serialize)]
pub struct Report {
    pub width: u32,
    pub height: u32,
    pub original_width: u32,
    pub original_height: u32,
    /// Working-to-original scale factor.
    pub scale: f64,
    pub padding: Padding,
    pub gap: Option<Gap>,
    pub columns: Vec<ColumnSpan>,
    pub two_column: bool,
    pub anchors: Vec<AnchorReport>,
}

/// Outcome of one anchor search.
#[derive(Debug, Serialize)]
pub struct AnchorReport {
    pub seed: [f64; 2],
    #[serde(skip_serializing_if = "Option::is_none")]
    pub anchor: Option<AnchorBox>,
    /// `[left, top, right, bottom]` in source image pixels.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pixels: Option<[f64; 4]>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<String>,
}

impl Report {
    /// Whether any requested anchor was missing.
    pub fn has_missing_anchor(&self) -> bool {
        self.anchors.iter().any(|a| a.anchor.is_none())
    }
}

/// Resolve the effective configuration from the optional file and flags.
pub fn resolve_config(args: &AnalyzeArgs, debug: bool) -> Result<AnalysisConfig> {
    let mut config = match &args.config {
        Some(path) => AnalysisConfig::load(path)?,
        None => AnalysisConfig::default(),
    };
    if let Some(size_limit) = args.size_limit {
        config.size_limit = size_limit;
    }
    config.debugging |= debug;
    Ok(config)
}

/// Analyze the image named in `args`.
pub fn run(args: &AnalyzeArgs, debug: bool) -> Result<Report> {
    let config = resolve_config(args, debug)?;
    let mut analyzer = PageAnalyzer::open(&args.image, config)?;

    if args.raw {
        info!("Skipping binarization");
    } else {
        analyzer.binarize();
    }
    if args.denoise {
        analyzer.denoise();
    }

    let layout = analyzer.detect_layout();
    let original_width = analyzer.original_width();
    let original_height = analyzer.original_height();
    let anchors = args
        .anchors
        .iter()
        .zip(analyzer.pick_anchors(&args.anchors))
        .map(|(&(nx, ny), result)| match result {
            Ok(anchor) => {
                let (left, top, right, bottom) = anchor.to_pixels(original_width, original_height);
                AnchorReport {
                    seed: [nx, ny],
                    anchor: Some(anchor),
                    pixels: Some([left, top, right, bottom]),
                    error: None,
                    suggestion: None,
                }
            }
            Err(err) => {
                warn!(nx, ny, error = %err, "Anchor search failed");
                let human = humanize_error(&err);
                AnchorReport {
                    seed: [nx, ny],
                    anchor: None,
                    pixels: None,
                    error: Some(human.message),
                    suggestion: Some(human.suggestion),
                }
            }
        })
        .collect();

    Ok(Report {
        width: analyzer.width(),
        height: analyzer.height(),
        original_width,
        original_height,
        scale: analyzer.buffer().scale(),
        padding: layout.padding,
        gap: layout.gap,
        columns: layout.columns(),
        two_column: layout.is_two_column(),
        anchors,
    })
}
