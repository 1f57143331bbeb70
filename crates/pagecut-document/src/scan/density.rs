// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Line density — number of distinct black runs crossing a row or column.

use crate::image::RasterBuffer;

/// Count of black runs (rising edges) down column `x`, display rule.
pub fn column_black_run_count(buffer: &RasterBuffer, x: u32) -> u32 {
    count_rising_edges((0..buffer.height()).map(|y| buffer.is_bin_black(x, y)))
}

/// Count of black runs (rising edges) along row `y`, display rule.
pub fn row_black_run_count(buffer: &RasterBuffer, y: u32) -> u32 {
    count_rising_edges((0..buffer.width()).map(|x| buffer.is_bin_black(x, y)))
}

fn count_rising_edges(line: impl Iterator<Item = bool>) -> u32 {
    let mut count = 0;
    let mut last = false;
    for current in line {
        if current && !last {
            count += 1;
        }
        last = current;
    }
    count
}
