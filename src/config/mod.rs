//! Session configuration.
//!
//! Settings are fixed at session construction and constant for the
//! request lifetime. The only serialized knob is the override subfolder;
//! adapter substitution happens through the registry on the session
//! itself, since factories are code, not data.

use serde::{Deserialize, Serialize};

use crate::constants::DEFAULT_SUBFOLDER;

/// Bridge settings, fixed at initialization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Subfolder inside the theme's template directory searched for
    /// overrides. An empty value searches the theme root.
    pub subfolder: String,
}

impl Settings {
    /// Settings with a custom override subfolder.
    pub fn new(subfolder: impl Into<String>) -> Self {
        Self {
            subfolder: subfolder.into(),
        }
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            subfolder: DEFAULT_SUBFOLDER.to_string(),
        }
    }
}
