//! Markdown feature gates
//!
//! Each domain decides whether comments may contain links, images and
//! tables. The same flags hide the matching toolbar buttons and tell the
//! preview renderer to leave those constructs as literal text.

use serde::{Deserialize, Serialize};

/// A gated Markdown construct.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Feature {
    Links,
    Images,
    Tables,
}

impl Feature {
    /// Plural name used in messages and config keys.
    pub fn name(&self) -> &'static str {
        match self {
            Feature::Links => "links",
            Feature::Images => "images",
            Feature::Tables => "tables",
        }
    }
}

/// Per-domain Markdown feature flags.
///
/// Everything is enabled unless the domain turns it off.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FeatureFlags {
    pub links: bool,
    pub images: bool,
    pub tables: bool,
}

impl Default for FeatureFlags {
    fn default() -> Self {
        Self {
            links: true,
            images: true,
            tables: true,
        }
    }
}

impl FeatureFlags {
    /// Flags with every gated construct switched off.
    pub const fn none() -> Self {
        Self {
            links: false,
            images: false,
            tables: false,
        }
    }

    /// Whether `feature` is enabled.
    pub fn allows(&self, feature: Feature) -> bool {
        match feature {
            Feature::Links => self.links,
            Feature::Images => self.images,
            Feature::Tables => self.tables,
        }
    }
}
