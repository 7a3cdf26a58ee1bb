use serde::{Deserialize, Serialize};

/// Pacing applied before a logic gate's decided route is taken, in milliseconds.
pub const DEFAULT_LOGIC_GATE_DELAY_MS: u64 = 500;

/// Automatic transitions allowed between two player signals before a session is halted.
pub const DEFAULT_MAX_AUTOMATIC_TRANSITIONS: u32 = 1000;

/// Tunables for a playback session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EngineConfig {
    /// Presentational pause before a logic gate transitions. The route itself is decided
    /// on arrival, so this never changes where the gate leads.
    pub logic_gate_delay_ms: u64,
    /// Ceiling on consecutive `action`/`logic_gate` transitions without a player signal.
    pub max_automatic_transitions: u32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            logic_gate_delay_ms: DEFAULT_LOGIC_GATE_DELAY_MS,
            max_automatic_transitions: DEFAULT_MAX_AUTOMATIC_TRANSITIONS,
        }
    }
}

impl EngineConfig {
    /// Parses a config document, filling unspecified fields with defaults.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}
