// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Anchor marker picking — locate the solid black square nearest a seed point
// and grow a tight bounding box around it.

use pagecut_core::error::{PagecutError, Result};
use pagecut_core::{AnchorBox, AnchorOptions};
use tracing::{debug, instrument, trace};

use crate::image::RasterBuffer;
use crate::image::classify::{ClassifyRule, NeighborhoodVote};

/// Share of black neighbours needed for a probe to sit on a marker.
pub const BLACK_SQUARE_PROPORTION: f64 = 0.9;

/// An edge keeps growing while at least this share of its next line is black.
pub const EDGE_DENSITY_RATIO: f64 = 0.3;

/// Locate the anchor marker nearest the normalized seed `(nx, ny)`.
///
/// Fails with [`PagecutError::AnchorNotFound`] when no marker lies within
/// the search radius. There is no fallback box.
#[instrument(skip(buffer), fields(width = buffer.width(), height = buffer.height()))]
pub fn pick_anchor(
    buffer: &RasterBuffer,
    nx: f64,
    ny: f64,
    options: &AnchorOptions,
) -> Result<AnchorBox> {
    options.validate()?;

    let x = (nx * buffer.width() as f64).round() as i64;
    let y = (ny * buffer.height() as f64).round() as i64;

    let (cx, cy) = find_nearest_black_square(buffer, x, y, options).ok_or_else(|| {
        PagecutError::AnchorNotFound {
            x,
            y,
            radius: search_radius_px(buffer.original_short_side(), options).round() as u32,
        }
    })?;
    debug!(seed_x = x, seed_y = y, cx, cy, "Marker square found");

    let mut expansion = Expansion::new(cx, cy, options.square_radius as i64);
    while !expansion.all_stopped() {
        for side in Side::ROUND_ROBIN {
            expansion.step(buffer, side);
        }
    }

    let anchor = expansion.to_box(buffer.width(), buffer.height());
    debug!(?anchor, "Anchor box expanded");
    Ok(anchor)
}

// -- Ring search --------------------------------------------------------------

/// Search radius in working pixels, measured against the source image's
/// short side.
fn search_radius_px(short_side: u32, options: &AnchorOptions) -> f64 {
    short_side as f64 * options.limit
}

/// Number of probe rings around the seed for an image with this short side.
pub fn ring_count(short_side: u32, options: &AnchorOptions) -> u32 {
    let layer_dist = (options.side() * 2) as f64;
    (search_radius_px(short_side, options) / layer_dist).round() as u32
}

/// Rings past this index only probe squares lying wholly outside the buffer.
fn ring_cap(buffer: &RasterBuffer, x: i64, y: i64, options: &AnchorOptions) -> u32 {
    let (width, height) = (buffer.width() as i64, buffer.height() as i64);
    let far = [x, (width - 1).saturating_sub(x), y, (height - 1).saturating_sub(y)]
        .into_iter()
        .map(i64::saturating_abs)
        .max()
        .unwrap_or(0);
    let rings = far.saturating_add(options.square_radius as i64) / options.side() as i64 + 1;
    u32::try_from(rings).unwrap_or(u32::MAX)
}

/// Probe points ordered from the seed outward.
///
/// Ring `z` is the square outline at `z * side` pixels from the seed: its
/// top and bottom rows including corners, then its left and right columns
/// without them.
pub fn ring_probes(x: i64, y: i64, side: i64, rings: u32) -> impl Iterator<Item = (i64, i64)> {
    std::iter::once((x, y)).chain((1..=rings as i64).flat_map(move |z| {
        let rows = (-z..=z).flat_map(move |i| {
            [(x + i * side, y + z * side), (x + i * side, y - z * side)]
        });
        let columns = (-z + 1..z).flat_map(move |j| {
            [(x + z * side, y + j * side), (x - z * side, y + j * side)]
        });
        rows.chain(columns)
    }))
}

/// Whether the `side x side` neighbourhood of `(x, y)` is nearly all black.
pub fn is_black_square_at(buffer: &RasterBuffer, x: i64, y: i64, square_radius: u32) -> bool {
    let vote = NeighborhoodVote::around(buffer, x, y, square_radius, ClassifyRule::Display);
    vote.is_black_more() && vote.proportion_of_more() > BLACK_SQUARE_PROPORTION
}

/// First probe, in ring order, that sits on a solid black square.
pub fn find_nearest_black_square(
    buffer: &RasterBuffer,
    x: i64,
    y: i64,
    options: &AnchorOptions,
) -> Option<(i64, i64)> {
    let rings = ring_count(buffer.original_short_side(), options)
        .min(ring_cap(buffer, x, y, options));
    trace!(rings, "Ring search");

    ring_probes(x, y, options.side() as i64, rings)
        .find(|&(px, py)| is_black_square_at(buffer, px, py, options.square_radius))
}

// -- Expansion ----------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Side {
    Top,
    Right,
    Bottom,
    Left,
}

impl Side {
    const ROUND_ROBIN: [Side; 4] = [Side::Top, Side::Right, Side::Bottom, Side::Left];

    fn index(self) -> usize {
        self as usize
    }
}

#[derive(Debug, Clone, Copy)]
struct Reach {
    dist: i64,
    stopped: bool,
}

/// Box around `(cx, cy)` described by its reach in each direction.
#[derive(Debug)]
struct Expansion {
    cx: i64,
    cy: i64,
    reach: [Reach; 4],
}

impl Expansion {
    fn new(cx: i64, cy: i64, radius: i64) -> Self {
        Self {
            cx,
            cy,
            reach: [Reach {
                dist: radius,
                stopped: false,
            }; 4],
        }
    }

    fn dist(&self, side: Side) -> i64 {
        self.reach[side.index()].dist
    }

    fn all_stopped(&self) -> bool {
        self.reach.iter().all(|r| r.stopped)
    }

    /// Try to push `side` out by one line.
    ///
    /// The candidate line spans the box's current perpendicular extent. It is
    /// accepted when its black count reaches `EDGE_DENSITY_RATIO` of that
    /// span; otherwise, or when it would leave the image, the side stops.
    fn step(&mut self, buffer: &RasterBuffer, side: Side) {
        if self.reach[side.index()].stopped {
            return;
        }

        let next = self.dist(side) + 1;
        let (width, height) = (buffer.width() as i64, buffer.height() as i64);
        let leaves_image = match side {
            Side::Top => self.cy - next < 0,
            Side::Bottom => self.cy + next >= height,
            Side::Left => self.cx - next < 0,
            Side::Right => self.cx + next >= width,
        };
        if leaves_image {
            self.reach[side.index()].stopped = true;
            return;
        }

        let (black, span) = match side {
            Side::Top | Side::Bottom => {
                let y = if side == Side::Top {
                    self.cy - next
                } else {
                    self.cy + next
                };
                let from = self.cx - self.dist(Side::Left);
                let to = self.cx + self.dist(Side::Right);
                let black = (from..=to).filter(|&x| buffer.is_bin_black_at(x, y)).count();
                (black, to - from + 1)
            }
            Side::Left | Side::Right => {
                let x = if side == Side::Left {
                    self.cx - next
                } else {
                    self.cx + next
                };
                let from = self.cy - self.dist(Side::Top);
                let to = self.cy + self.dist(Side::Bottom);
                let black = (from..=to).filter(|&y| buffer.is_bin_black_at(x, y)).count();
                (black, to - from + 1)
            }
        };

        if (black as f64) < span as f64 * EDGE_DENSITY_RATIO {
            self.reach[side.index()].stopped = true;
        } else {
            self.reach[side.index()].dist = next;
        }
    }

    /// Normalized box with edges half a pixel outside the outermost lines.
    fn to_box(&self, width: u32, height: u32) -> AnchorBox {
        let (w, h) = (width as f64, height as f64);
        let fraction = |v: f64, len: f64| (v / len).clamp(0.0, 1.0);
        AnchorBox {
            left: fraction((self.cx - self.dist(Side::Left)) as f64 - 0.5, w),
            top: fraction((self.cy - self.dist(Side::Top)) as f64 - 0.5, h),
            right: fraction((self.cx + self.dist(Side::Right)) as f64 + 0.5, w),
            bottom: fraction((self.cy + self.dist(Side::Bottom)) as f64 + 0.5, h),
        }
    }
}
