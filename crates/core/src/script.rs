//! Narration script building.
//!
//! A submission carries either a finished script (`manual`) or a topic to
//! expand (`ai`). The AI expansion is a fixed template — the platform does
//! not ship a language model; the template produces a plausible narration
//! for the demo UI.

use serde::{Deserialize, Serialize};

/// How `script_input` should be interpreted at submission time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScriptMode {
    /// `script_input` is a topic; expand it into a narration script.
    Ai,
    /// `script_input` is the finished script, passed through verbatim.
    Manual,
}

impl ScriptMode {
    pub fn as_str(self) -> &'static str {
        match self {
            ScriptMode::Ai => "ai",
            ScriptMode::Manual => "manual",
        }
    }
}

/// Build the narration script an engine will render.
pub fn build_script(mode: ScriptMode, input: &str) -> String {
    match mode {
        ScriptMode::Manual => input.to_string(),
        ScriptMode::Ai => format!(
            "(AI draft generated from the topic \"{input}\"):\n\
             Hello everyone.\n\
             Welcome to the era of spatial computing.\n\
             What you are watching was generated by the all-in-one local bundle.\n\
             The system prefers Wan2GP for stability and falls back to it automatically."
        ),
    }
}
