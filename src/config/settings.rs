//! User settings for markbar
//!
//! This module defines the `Settings` struct holding the host's domain
//! configuration, with serde support for the JSON config file.

use serde::{Deserialize, Serialize};

use crate::markdown::FeatureFlags;

// ─────────────────────────────────────────────────────────────────────────────
// Main Settings Struct
// ─────────────────────────────────────────────────────────────────────────────

/// Domain configuration for the comment editor.
///
/// This struct is read from JSON in the user's config directory.
/// All fields have defaults via the `Default` trait and `#[serde(default)]`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Which optional constructs the toolbar offers and the preview renders
    pub features: FeatureFlags,

    /// Character limit shown in the length counter (UTF-16 units), if any
    pub max_comment_length: Option<usize>,
}

impl Settings {
    // ─────────────────────────────────────────────────────────────────────────
    // Validation Constants and Sanitization
    // ─────────────────────────────────────────────────────────────────────────

    /// Largest comment length limit accepted.
    pub const MAX_COMMENT_LENGTH: usize = 65_536;

    /// Sanitize settings by clamping values to valid ranges.
    ///
    /// A zero limit means "no limit"; anything above `MAX_COMMENT_LENGTH`
    /// is clamped.
    pub fn sanitize(&mut self) {
        self.max_comment_length = match self.max_comment_length {
            Some(0) | None => None,
            Some(limit) => Some(limit.min(Self::MAX_COMMENT_LENGTH)),
        };
    }

    /// Deserialize settings and sanitize them.
    pub fn from_json_sanitized(json: &str) -> Result<Self, serde_json::Error> {
        let mut settings: Self = serde_json::from_str(json)?;
        settings.sanitize();
        Ok(settings)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
