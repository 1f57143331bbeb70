// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Image module — the working raster buffer and pixel classification rules.

pub mod classify;
pub mod raster;

pub use classify::{ClassifyRule, NeighborhoodVote};
pub use raster::RasterBuffer;
