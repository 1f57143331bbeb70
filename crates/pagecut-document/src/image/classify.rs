// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Black/white pixel classification and neighbourhood majority votes.

use image::Rgba;

use super::raster::RasterBuffer;

/// Display rule: a pixel is white when `R + G + B` exceeds this (255 * 1.8).
pub const DISPLAY_WHITE_SUM: u32 = 459;

/// Raw-data rule: a pixel is black when `R + G + B` is below this
/// (255 * 3 * 0.6). Kept separate from [`DISPLAY_WHITE_SUM`]: the two rules
/// disagree on the boundary sum and the denoiser depends on that.
pub const RAW_BLACK_SUM: u32 = 459;

/// Solid black as written by binarize and denoise.
pub const BLACK: Rgba<u8> = Rgba([0, 0, 0, 255]);

/// Solid white as written by binarize and denoise.
pub const WHITE: Rgba<u8> = Rgba([255, 255, 255, 255]);

fn channel_sum(px: &Rgba<u8>) -> u32 {
    px.0[0] as u32 + px.0[1] as u32 + px.0[2] as u32
}

/// Display rule, used by density scans and anchor search.
pub fn is_bin_black(px: &Rgba<u8>) -> bool {
    channel_sum(px) <= DISPLAY_WHITE_SUM
}

pub fn is_bin_white(px: &Rgba<u8>) -> bool {
    !is_bin_black(px)
}

/// Raw-data rule, used by the denoiser's neighbourhood vote.
pub fn is_data_black(px: &Rgba<u8>) -> bool {
    channel_sum(px) < RAW_BLACK_SUM
}

pub fn is_data_white(px: &Rgba<u8>) -> bool {
    !is_data_black(px)
}

/// Which of the two classification rules a caller wants.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClassifyRule {
    Display,
    RawData,
}

impl ClassifyRule {
    pub fn is_black(self, px: &Rgba<u8>) -> bool {
        match self {
            ClassifyRule::Display => is_bin_black(px),
            ClassifyRule::RawData => is_data_black(px),
        }
    }
}

/// Black/white tally over a set of pixels.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NeighborhoodVote {
    pub black: u32,
    pub white: u32,
}

impl NeighborhoodVote {
    /// Count a set of pixels under `rule`.
    pub fn tally<I>(pixels: I, rule: ClassifyRule) -> Self
    where
        I: IntoIterator<Item = Rgba<u8>>,
    {
        pixels.into_iter().fold(Self::default(), |mut vote, px| {
            if rule.is_black(&px) {
                vote.black += 1;
            } else {
                vote.white += 1;
            }
            vote
        })
    }

    /// Vote of the in-bounds neighbours of `(x, y)` within `range`.
    pub fn around(buffer: &RasterBuffer, x: i64, y: i64, range: u32, rule: ClassifyRule) -> Self {
        Self::tally(buffer.neighbors(x, y, range), rule)
    }

    pub fn total(&self) -> u32 {
        self.black + self.white
    }

    pub fn is_black_more(&self) -> bool {
        self.black > self.white
    }

    pub fn is_white_more(&self) -> bool {
        self.white > self.black
    }

    /// Share of the larger side, or 0 for an empty set.
    pub fn proportion_of_more(&self) -> f64 {
        match self.total() {
            0 => 0.0,
            total => self.black.max(self.white) as f64 / total as f64,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures;

    fn gray(v: u8) -> Rgba<u8> {
        Rgba([v, v, v, 255])
    }

    #[test]
    fn solid_colors_classify_the_same_under_both_rules() {
        assert!(is_bin_black(&BLACK) && is_data_black(&BLACK));
        assert!(is_bin_white(&WHITE) && is_data_white(&WHITE));
    }

    #[test]
    fn boundary_sum_splits_the_rules() {
        let boundary = gray(153); // 3 * 153 = 459
        assert!(is_bin_black(&boundary));
        assert!(is_data_white(&boundary));

        let above = Rgba([153, 153, 154, 255]);
        assert!(is_bin_white(&above) && is_data_white(&above));

        let below = Rgba([153, 153, 152, 255]);
        assert!(is_bin_black(&below) && is_data_black(&below));
    }

    #[test]
    fn alpha_is_ignored() {
        assert!(is_bin_black(&Rgba([0, 0, 0, 0])));
        assert!(is_bin_white(&Rgba([255, 255, 255, 0])));
    }

    #[test]
    fn vote_reports_majority_and_proportion() {
        let vote = NeighborhoodVote::tally([BLACK, BLACK, BLACK, WHITE], ClassifyRule::Display);
        assert_eq!(vote, NeighborhoodVote { black: 3, white: 1 });
        assert!(vote.is_black_more());
        assert!(!vote.is_white_more());
        assert!((vote.proportion_of_more() - 0.75).abs() < 1e-12);
    }

    #[test]
    fn tie_is_neither_majority() {
        let vote = NeighborhoodVote::tally([BLACK, WHITE], ClassifyRule::RawData);
        assert!(!vote.is_black_more());
        assert!(!vote.is_white_more());
        assert_eq!(vote.proportion_of_more(), 0.5);
    }

    #[test]
    fn empty_vote_has_zero_proportion() {
        let vote = NeighborhoodVote::tally(std::iter::empty(), ClassifyRule::Display);
        assert_eq!(vote.total(), 0);
        assert_eq!(vote.proportion_of_more(), 0.0);
    }

    #[test]
    fn vote_around_uses_requested_rule() {
        let mut image = fixtures::white(3, 3);
        for (x, y) in [(0, 0), (1, 0), (2, 0)] {
            image.put_pixel(x, y, gray(153));
        }
        let buffer = fixtures::buffer(image);

        let display = NeighborhoodVote::around(&buffer, 1, 1, 1, ClassifyRule::Display);
        assert_eq!(display, NeighborhoodVote { black: 3, white: 5 });

        let raw = NeighborhoodVote::around(&buffer, 1, 1, 1, ClassifyRule::RawData);
        assert_eq!(raw, NeighborhoodVote { black: 0, white: 8 });
    }
}
