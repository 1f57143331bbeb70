// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Scanning pipeline — binarization and denoising passes, line density, and
// the padding, column gap and anchor marker detectors built on it.

pub mod anchor;
pub mod density;
pub mod enhance;
pub mod gap;
pub mod padding;

pub use anchor::pick_anchor;
pub use density::{column_black_run_count, row_black_run_count};
pub use enhance::{binarize, denoise};
pub use gap::{find_gap, find_gap_from};
pub use padding::find_padding;
