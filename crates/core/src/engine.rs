//! Engine identifiers.
//!
//! The set of generation engines is closed: every engine the platform can
//! drive is a variant here, and its string form is both the lookup key in
//! the registry and the value persisted in a job's `selected_engine` column.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A generation engine known to the platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EngineKind {
    /// The bundled Wan2GP renderer. Slower-looking output, but always
    /// available — this is the stability engine and the failover target.
    Wan2gp,
    /// The InfiniteTalk renderer. Higher quality lip-sync, but depends on
    /// local offline weights and is the engine most likely to fail.
    Infinitetalk,
}

impl EngineKind {
    /// Stable string form, used as registry key and persisted value.
    pub fn as_str(self) -> &'static str {
        match self {
            EngineKind::Wan2gp => "wan2gp",
            EngineKind::Infinitetalk => "infinitetalk",
        }
    }

    /// Parse an engine identifier. Returns `None` for unknown names;
    /// policy for unknown identifiers lives in the registry, not here.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "wan2gp" => Some(EngineKind::Wan2gp),
            "infinitetalk" => Some(EngineKind::Infinitetalk),
            _ => None,
        }
    }
}

impl fmt::Display for EngineKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
