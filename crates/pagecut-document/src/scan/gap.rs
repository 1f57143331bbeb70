// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Column gap detection for two-column pages.

use pagecut_core::Gap;
use tracing::{debug, instrument};

use super::density::column_black_run_count;
use crate::image::RasterBuffer;

/// Columns below this run count are gap; above it, text.
pub const GAP_LINE_THRESHOLD: u32 = 6;

/// Narrower candidates are treated as scan noise and skipped.
pub const GAP_MIN_WIDTH: f64 = 0.02;

/// Where the gap search starts by default.
pub const DEFAULT_GAP_FROM: f64 = 0.33;

/// The gap's left edge must appear before this fraction of the width.
const GAP_LEFT_LIMIT: f64 = 0.66;

/// The gap's right edge must appear before this fraction of the width.
const GAP_RIGHT_LIMIT: f64 = 0.75;

/// Find the gap between two text columns, starting at [`DEFAULT_GAP_FROM`].
pub fn find_gap(buffer: &RasterBuffer) -> Option<Gap> {
    find_gap_from(buffer, DEFAULT_GAP_FROM)
}

/// Find the gap between two text columns, starting the scan at `from`
/// (a fraction of the width). A non-positive `from` means the default.
///
/// Candidates narrower than [`GAP_MIN_WIDTH`] restart the search at their
/// right edge. The start column strictly increases on every restart, so the
/// loop ends within one pass over the central band.
#[instrument(skip(buffer), fields(width = buffer.width()))]
pub fn find_gap_from(buffer: &RasterBuffer, from: f64) -> Option<Gap> {
    let mut from = if from > 0.0 { from } else { DEFAULT_GAP_FROM };
    loop {
        let Some(left) = find_gap_left(buffer, from) else {
            debug!(from, "No low-density column; single column page");
            return None;
        };
        if left <= 0.0 {
            debug!("Low density at the page edge is margin, not a gap");
            return None;
        }
        let Some(right) = find_gap_right(buffer, left) else {
            debug!(left, "Density never resumes after gap start");
            return None;
        };
        if right <= left {
            return None;
        }
        let gap = Gap::new(left, right);
        if gap.width() < GAP_MIN_WIDTH {
            debug!(left, right, "Gap too narrow; retrying further right");
            from = right;
            continue;
        }

        debug!(?gap, "Column gap detected");
        return Some(gap);
    }
}

/// First column in `[from, 0.66)` whose run count drops below the threshold.
pub fn find_gap_left(buffer: &RasterBuffer, from: f64) -> Option<f64> {
    let width = buffer.width();
    (column_at(from, width)..column_at(GAP_LEFT_LIMIT, width))
        .find(|&x| column_black_run_count(buffer, x) < GAP_LINE_THRESHOLD)
        .map(|x| x as f64 / width as f64)
}

/// First column in `[left, 0.75)` whose run count rises above the threshold.
pub fn find_gap_right(buffer: &RasterBuffer, left: f64) -> Option<f64> {
    let width = buffer.width();
    (column_at(left, width)..column_at(GAP_RIGHT_LIMIT, width))
        .find(|&x| column_black_run_count(buffer, x) > GAP_LINE_THRESHOLD)
        .map(|x| x as f64 / width as f64)
}

fn column_at(fraction: f64, width: u32) -> u32 {
    ((fraction * width as f64).round().max(0.0) as u32).min(width)
}
