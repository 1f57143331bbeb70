// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Layout cue value types. All coordinates are fractions of the image's width
// (horizontal values) or height (vertical values).

use serde::{Deserialize, Serialize};

/// Page margins as normalized fractions.
///
/// `left < right` and `top < bottom` always hold for detector output.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Padding {
    pub left: f64,
    pub right: f64,
    pub top: f64,
    pub bottom: f64,
}

/// The blank vertical band between two text columns.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Gap {
    pub left: f64,
    pub right: f64,
    /// Always `(left + right) / 2`.
    pub middle: f64,
}

impl Gap {
    pub fn new(left: f64, right: f64) -> Self {
        Self {
            left,
            right,
            middle: (left + right) / 2.0,
        }
    }

    pub fn width(&self) -> f64 {
        self.right - self.left
    }
}

/// Tight rectangle around a detected anchor marker.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AnchorBox {
    pub left: f64,
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
}

impl AnchorBox {
    /// Center of the box in normalized coordinates.
    pub fn center(&self) -> (f64, f64) {
        ((self.left + self.right) / 2.0, (self.top + self.bottom) / 2.0)
    }

    /// Scale the box to pixel coordinates of an image of the given size.
    pub fn to_pixels(&self, width: u32, height: u32) -> (f64, f64, f64, f64) {
        let (w, h) = (width as f64, height as f64);
        (self.left * w, self.top * h, self.right * w, self.bottom * h)
    }
}

/// A horizontal extent occupied by one text column.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ColumnSpan {
    pub left: f64,
    pub right: f64,
}

/// Padding plus the optional column gap of one page.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PageLayout {
    pub padding: Padding,
    pub gap: Option<Gap>,
}

impl PageLayout {
    /// Initial column split: one column between the side margins, or two
    /// columns divided at the gap's middle.
    pub fn columns(&self) -> Vec<ColumnSpan> {
        let Padding { left, right, .. } = self.padding;
        match self.gap {
            Some(gap) if gap.middle > left && gap.middle < right => vec![
                ColumnSpan {
                    left,
                    right: gap.middle,
                },
                ColumnSpan {
                    left: gap.middle,
                    right,
                },
            ],
            _ => vec![ColumnSpan { left, right }],
        }
    }

    pub fn is_two_column(&self) -> bool {
        self.columns().len() == 2
    }
}
