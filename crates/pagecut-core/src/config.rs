// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Analysis configuration.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::{PagecutError, Result};

/// Default cap on the working buffer's short side.
pub const DEFAULT_SIZE_LIMIT: u32 = 600;

/// Smallest accepted `size_limit`. Below this the run-count thresholds stop
/// being meaningful for typical A4 scans.
pub const MIN_SIZE_LIMIT: u32 = 500;

/// Settings for one analysis session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Maximum length of the working buffer's short side in pixels.
    pub size_limit: u32,
    /// Log per-pass timings. Has no effect on results.
    pub debugging: bool,
    /// Defaults for the denoise pass.
    pub denoise: DenoiseOptions,
    /// Defaults for anchor marker search.
    pub anchor: AnchorOptions,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            size_limit: DEFAULT_SIZE_LIMIT,
            debugging: false,
            denoise: DenoiseOptions::default(),
            anchor: AnchorOptions::default(),
        }
    }
}

/// Neighbourhood vote parameters for denoising.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DenoiseOptions {
    /// Majority proportion (0..1) that must be exceeded before a pixel flips.
    pub throttle: f64,
    /// Neighbourhood radius; 1 means a 3x3 window.
    pub range: u32,
}

impl Default for DenoiseOptions {
    fn default() -> Self {
        Self {
            throttle: 0.75,
            range: 1,
        }
    }
}

/// Anchor marker search parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnchorOptions {
    /// Half the marker side minus one; 2 means a 5x5 marker.
    pub square_radius: u32,
    /// Search radius as a fraction of the working buffer's short side.
    pub limit: f64,
}

impl Default for AnchorOptions {
    fn default() -> Self {
        Self {
            square_radius: 2,
            limit: 0.04,
        }
    }
}

impl AnchorOptions {
    /// Side length of the marker square in pixels.
    pub fn side(&self) -> u32 {
        self.square_radius * 2 + 1
    }
}

impl AnalysisConfig {
    /// Parse a configuration from JSON. Missing fields take their defaults.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a configuration from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let data = std::fs::read_to_string(path.as_ref())?;
        Self::from_json_str(&data)
    }

    /// The size limit actually used to build the working buffer.
    pub fn effective_size_limit(&self) -> u32 {
        if self.size_limit < MIN_SIZE_LIMIT {
            warn!(
                requested = self.size_limit,
                applied = MIN_SIZE_LIMIT,
                "size_limit below minimum; raising"
            );
            MIN_SIZE_LIMIT
        } else {
            self.size_limit
        }
    }

    /// Reject option values no detector can work with.
    pub fn validate(&self) -> Result<()> {
        self.denoise.validate()?;
        self.anchor.validate()
    }
}

impl DenoiseOptions {
    pub fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.throttle) {
            return Err(PagecutError::InvalidConfig(format!(
                "denoise throttle must be within [0, 1], got {}",
                self.throttle
            )));
        }
        Ok(())
    }
}

impl AnchorOptions {
    pub fn validate(&self) -> Result<()> {
        if self.square_radius == 0 {
            return Err(PagecutError::InvalidConfig(
                "anchor square_radius must be at least 1".into(),
            ));
        }
        if !self.limit.is_finite() || self.limit <= 0.0 || self.limit > 1.0 {
            return Err(PagecutError::InvalidConfig(format!(
                "anchor limit must be a fraction within (0, 1], got {}",
                self.limit
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn defaults_match_documented_values() {
        let config = AnalysisConfig::default();
        assert_eq!(config.size_limit, 600);
        assert!(!config.debugging);
        assert_eq!(config.denoise.throttle, 0.75);
        assert_eq!(config.denoise.range, 1);
        assert_eq!(config.anchor.square_radius, 2);
        assert_eq!(config.anchor.side(), 5);
        assert!((config.anchor.limit - 0.04).abs() < 1e-12);
    }

    #[test]
    fn small_size_limit_is_raised_to_minimum() {
        let config = AnalysisConfig {
            size_limit: 120,
            ..Default::default()
        };
        assert_eq!(config.effective_size_limit(), MIN_SIZE_LIMIT);

        let config = AnalysisConfig {
            size_limit: 1200,
            ..Default::default()
        };
        assert_eq!(config.effective_size_limit(), 1200);
    }

    #[test]
    fn partial_json_fills_defaults() {
        let json = r#"{"size_limit": 800, "anchor": {"limit": 0.1}}"#;
        let config = AnalysisConfig::from_json_str(json).expect("valid config");
        assert_eq!(config.size_limit, 800);
        assert_eq!(config.anchor.square_radius, 2);
        assert!((config.anchor.limit - 0.1).abs() < 1e-12);
        assert_eq!(config.denoise, DenoiseOptions::default());
    }

    #[test]
    fn out_of_range_throttle_is_rejected() {
        let err = AnalysisConfig::from_json_str(r#"{"denoise": {"throttle": 1.5}}"#).unwrap_err();
        assert!(matches!(err, PagecutError::InvalidConfig(_)));
    }

    #[test]
    fn zero_square_radius_is_rejected() {
        let options = AnchorOptions {
            square_radius: 0,
            limit: 0.04,
        };
        assert!(options.validate().is_err());
    }

    #[test]
    fn anchor_limit_above_one_is_rejected() {
        let options = AnchorOptions {
            square_radius: 2,
            limit: 1e9,
        };
        assert!(matches!(options.validate(), Err(PagecutError::InvalidConfig(_))));

        let whole_page = AnchorOptions {
            limit: 1.0,
            ..Default::default()
        };
        assert!(whole_page.validate().is_ok());
    }

    #[test]
    fn load_reads_json_file() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        write!(file, r#"{{"debugging": true}}"#).expect("write config");

        let config = AnalysisConfig::load(file.path()).expect("load config");
        assert!(config.debugging);
        assert_eq!(config.size_limit, DEFAULT_SIZE_LIMIT);
    }

    #[test]
    fn load_missing_file_is_io_error() {
        let err = AnalysisConfig::load("/nonexistent/pagecut.json").unwrap_err();
        assert!(matches!(err, PagecutError::Io(_)));
    }
}
