// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Human-readable error messages for the people cropping scanned pages.
//
// Every technical error is mapped to plain English with a clear suggestion.
// The severity drives how an outer layer presents it.

use crate::error::PagecutError;

/// Severity of an error from the user's perspective.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// The user can fix it by picking again (e.g. clicking closer to a marker).
    ActionRequired,
    /// Retrying with the same input will fail again.
    Permanent,
}

/// A human-readable error with plain English message and actionable suggestion.
#[derive(Debug, Clone)]
pub struct HumanError {
    /// Plain English summary (shown as a heading).
    pub message: String,
    /// What the user should try (shown as body text).
    pub suggestion: String,
    /// Severity level.
    pub severity: Severity,
}

/// Convert a `PagecutError` into a `HumanError`.
pub fn humanize_error(err: &PagecutError) -> HumanError {
    match err {
        PagecutError::AnchorNotFound { radius, .. } => HumanError {
            message: "No registration marker was found where you clicked.".into(),
            suggestion: format!(
                "Click directly on one of the small black squares printed on the page. \
                 The search only looks about {radius} pixels around the click."
            ),
            severity: Severity::ActionRequired,
        },

        PagecutError::ImageError(_) => HumanError {
            message: "There's a problem with this image.".into(),
            suggestion: "The image may be damaged or in an unusual format. \
                 Try saving it as a PNG or JPEG first."
                .into(),
            severity: Severity::Permanent,
        },

        PagecutError::InvalidConfig(detail) => HumanError {
            message: "The analysis settings are not valid.".into(),
            suggestion: format!("Fix the settings file and try again. ({detail})"),
            severity: Severity::ActionRequired,
        },

        PagecutError::Io(io_err) => {
            if io_err.kind() == std::io::ErrorKind::NotFound {
                HumanError {
                    message: "The file couldn't be found.".into(),
                    suggestion: "It may have been moved or deleted. \
                         Check the path and try again."
                        .into(),
                    severity: Severity::ActionRequired,
                }
            } else if io_err.kind() == std::io::ErrorKind::PermissionDenied {
                HumanError {
                    message: "Pagecut doesn't have permission to read that file.".into(),
                    suggestion: "Check the file permissions, \
                         or copy the file to a different location first."
                        .into(),
                    severity: Severity::ActionRequired,
                }
            } else {
                HumanError {
                    message: "There was a problem reading a file.".into(),
                    suggestion: "Try again. \
                         If this keeps happening, check the disk for errors."
                        .into(),
                    severity: Severity::Permanent,
                }
            }
        }

        PagecutError::Serialization(_) => HumanError {
            message: "The settings file could not be read.".into(),
            suggestion: "Make sure it is valid JSON.".into(),
            severity: Severity::ActionRequired,
        },
    }
}
