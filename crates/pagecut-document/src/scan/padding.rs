// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Page margin detection — four independent scans inward from the edges.

use pagecut_core::Padding;
use tracing::{debug, instrument};

use super::density::{column_black_run_count, row_black_run_count};
use crate::image::RasterBuffer;

/// A line counts as content once it has more black runs than this.
pub const PADDING_LINE_THRESHOLD: u32 = 6;

/// Margin kept between the detected content edge and the crop line.
pub const PADDING_OFFSET: f64 = 0.005;

/// Margin reported when the outer third holds no content (e.g. a blank page).
pub const DEFAULT_PADDING: f64 = 0.05;

/// Detect the page margins.
///
/// Each edge is scanned independently over the outer third of its axis. An
/// edge with no qualifying line falls back to [`DEFAULT_PADDING`]; this never
/// fails.
#[instrument(skip_all, fields(width = buffer.width(), height = buffer.height()))]
pub fn find_padding(buffer: &RasterBuffer) -> Padding {
    let (width, height) = (buffer.width(), buffer.height());
    let column = |x| column_black_run_count(buffer, x);
    let row = |y| row_black_run_count(buffer, y);

    let padding = Padding {
        left: leading_edge(width, column).unwrap_or(DEFAULT_PADDING),
        right: trailing_edge(width, column).unwrap_or(1.0 - DEFAULT_PADDING),
        top: leading_edge(height, row).unwrap_or(DEFAULT_PADDING),
        bottom: trailing_edge(height, row).unwrap_or(1.0 - DEFAULT_PADDING),
    };
    debug!(?padding, "Padding detected");
    padding
}

/// First content line scanning up from 0, as a fraction pulled outward.
fn leading_edge(len: u32, run_count: impl Fn(u32) -> u32) -> Option<f64> {
    let limit = len as f64 / 3.0;
    let hit = (0..len)
        .take_while(|&j| (j as f64) < limit)
        .find(|&j| run_count(j) > PADDING_LINE_THRESHOLD)?;

    let mut pos = hit as f64 / len as f64 - PADDING_OFFSET;
    if pos <= 0.0 {
        pos += PADDING_OFFSET;
    }
    Some(pos)
}

/// First content line scanning down from `len - 1`, as a fraction pushed
/// outward.
fn trailing_edge(len: u32, run_count: impl Fn(u32) -> u32) -> Option<f64> {
    let limit = len as f64 * 2.0 / 3.0;
    let hit = (0..len)
        .rev()
        .take_while(|&j| (j as f64) > limit)
        .find(|&j| run_count(j) > PADDING_LINE_THRESHOLD)?;

    let mut pos = hit as f64 / len as f64 + PADDING_OFFSET;
    if pos >= 1.0 {
        pos -= PADDING_OFFSET;
    }
    Some(pos)
}
