//! Runner configuration.

use serde::{Deserialize, Serialize};

use crate::error::ActionError;

/// Configuration for runner sizing and delta handling.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Initial capacity hint for registered targets.
    pub target_capacity: usize,
    /// Initial capacity hint for the action list of a newly registered target.
    pub actions_per_target: usize,
    /// Maximum events retained per update; the rest are counted in `Outputs::dropped_events`.
    pub max_events_per_tick: usize,
    /// Clamp applied to every update delta, e.g. to avoid a burst after the host stalls.
    pub max_frame_delta: Option<f32>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            target_capacity: 64,
            actions_per_target: 4,
            max_events_per_tick: 1024,
            max_frame_delta: None,
        }
    }
}

impl Config {
    pub fn from_json(s: &str) -> Result<Self, ActionError> {
        Ok(serde_json::from_str(s)?)
    }
}
