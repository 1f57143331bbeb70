// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Scan enhancement passes — binarization and neighbourhood-vote denoising.
// Both rewrite the raster buffer in place and flush it when done.

use pagecut_core::DenoiseOptions;
use tracing::{debug, info, instrument};

use crate::image::RasterBuffer;
use crate::image::classify::{BLACK, ClassifyRule, NeighborhoodVote, WHITE};

// -- Binarization -------------------------------------------------------------

/// Replace every pixel with solid black or solid white per the display rule.
///
/// Idempotent: solid black and solid white classify as themselves.
#[instrument(skip_all, fields(width = buffer.width(), height = buffer.height()))]
pub fn binarize(buffer: &mut RasterBuffer) {
    info!("Applying display-rule binarization");

    let (width, height) = (buffer.width(), buffer.height());
    let mut black = 0u64;
    for x in 0..width {
        for y in 0..height {
            if buffer.is_bin_black(x, y) {
                buffer.put_pixel(x, y, BLACK);
                black += 1;
            } else {
                buffer.put_pixel(x, y, WHITE);
            }
        }
    }
    buffer.flush();

    debug!(black, total = width as u64 * height as u64, "Binarization complete");
}

// -- Denoising ----------------------------------------------------------------

/// Flip pixels that disagree with a strong majority of their neighbours.
///
/// Pixels are visited column by column and updated in place, so later votes
/// see earlier flips. The vote counts neighbours with the raw-data rule while
/// the pixel itself is judged by the display rule. A pixel flips when the
/// majority disagrees with it and its share exceeds `options.throttle`.
///
/// Returns the number of flipped pixels.
#[instrument(skip(buffer), fields(width = buffer.width(), height = buffer.height()))]
pub fn denoise(buffer: &mut RasterBuffer, options: DenoiseOptions) -> u64 {
    info!(
        throttle = options.throttle,
        range = options.range,
        "Applying neighbourhood denoise"
    );

    let (width, height) = (buffer.width(), buffer.height());
    let mut flipped = 0u64;
    for x in 0..width {
        for y in 0..height {
            let is_black = buffer.is_bin_black(x, y);
            let vote = NeighborhoodVote::around(
                buffer,
                x as i64,
                y as i64,
                options.range,
                ClassifyRule::RawData,
            );
            if vote.is_black_more() != is_black && vote.proportion_of_more() > options.throttle {
                buffer.put_pixel(x, y, if is_black { WHITE } else { BLACK });
                flipped += 1;
            }
        }
    }
    buffer.flush();

    debug!(flipped, "Denoise complete");
    flipped
}

// -- Tests --------------------------------------------------------------------
