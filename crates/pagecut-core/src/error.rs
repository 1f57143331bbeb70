// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Unified error types for Pagecut.

use thiserror::Error;

/// Top-level error type for all Pagecut operations.
///
/// A missing column gap is not an error (detectors return `Option`), and
/// padding detection never fails. The only analysis failure is a missing
/// anchor marker.
#[derive(Debug, Error)]
pub enum PagecutError {
    // -- Input errors --
    #[error("image processing failed: {0}")]
    ImageError(String),

    #[error("invalid analysis configuration: {0}")]
    InvalidConfig(String),

    // -- Analysis errors --
    #[error("no anchor marker found near ({x}, {y}) within {radius} px")]
    AnchorNotFound { x: i64, y: i64, radius: u32 },

    // -- Storage / persistence --
    #[error("file I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, PagecutError>;
