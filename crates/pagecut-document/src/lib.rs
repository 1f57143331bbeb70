// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// pagecut-document — Pixel analysis engine for scanned document pages.
//
// Provides the working raster buffer and black/white classification rules,
// the binarize and denoise passes, and the detectors that recover page
// margins, the column gap of a two-column page, and anchor marker boxes.

pub mod analyzer;
pub mod image;
pub mod scan;

#[cfg(test)]
pub(crate) mod fixtures;

// Re-export the primary structs so callers can use `pagecut_document::PageAnalyzer` etc.
pub use analyzer::PageAnalyzer;
pub use image::RasterBuffer;
