// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Synthetic page images for unit tests.

use image::{Rgba, RgbaImage};
use imageproc::drawing::draw_filled_rect_mut;
use imageproc::rect::Rect;

use crate::image::RasterBuffer;
use crate::image::classify::BLACK;

/// Side of one fake glyph in `text_block`.
pub const GLYPH: u32 = 6;
/// Distance between fake glyph origins in `text_block`.
pub const GLYPH_PITCH: u32 = 12;

pub fn white(width: u32, height: u32) -> RgbaImage {
    RgbaImage::from_pixel(width, height, Rgba([255, 255, 255, 255]))
}

/// Wrap an image without downscaling.
pub fn buffer(image: RgbaImage) -> RasterBuffer {
    let limit = image.width().max(image.height()).saturating_add(1);
    RasterBuffer::from_rgba(image, limit).expect("fixture image is non-empty")
}

/// Solid black rectangle covering `[x0, x1) x [y0, y1)`.
pub fn fill(image: &mut RgbaImage, x0: u32, y0: u32, x1: u32, y1: u32) {
    let rect = Rect::at(x0 as i32, y0 as i32).of_size(x1 - x0, y1 - y0);
    draw_filled_rect_mut(image, rect, BLACK);
}

/// A grid of small black squares standing in for printed text inside
/// `[x0, x1) x [y0, y1)`. Every row and column that crosses a glyph has
/// roughly `extent / GLYPH_PITCH` black runs.
pub fn text_block(image: &mut RgbaImage, x0: u32, y0: u32, x1: u32, y1: u32) {
    let mut y = y0;
    while y + GLYPH <= y1 {
        let mut x = x0;
        while x + GLYPH <= x1 {
            fill(image, x, y, x + GLYPH, y + GLYPH);
            x += GLYPH_PITCH;
        }
        y += GLYPH_PITCH;
    }
}

/// Last ink column or row produced by `text_block` for an axis range.
pub fn last_glyph_line(start: u32, end: u32) -> u32 {
    let glyphs = (end - start - GLYPH) / GLYPH_PITCH;
    start + glyphs * GLYPH_PITCH + GLYPH - 1
}

/// Vertical band of horizontal black stripes covering `[x0, x1)` over the full
/// height. Each column inside has `height / (2 * stripe)` runs.
pub fn striped_band(image: &mut RgbaImage, x0: u32, x1: u32, stripe: u32) {
    let height = image.height();
    let mut y = 0;
    while y + stripe <= height {
        fill(image, x0, y, x1, y + stripe);
        y += stripe * 2;
    }
}
