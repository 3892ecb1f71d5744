//! Hidden Path - a rotating-pipe grid puzzle
//!
//! Core modules:
//! - `sim`: Deterministic puzzle engine (tiles, generation, connectivity, game state)
//! - `shell`: Host-shell boundary (navigation capability, final score readout)

pub mod shell;
pub mod sim;

pub use shell::{GameSummary, Navigator, Route};

/// Game configuration constants
pub mod consts {
    /// Canonical fixed timestep for the sim, in milliseconds
    pub const TICK_MS: u32 = 20;

    /// Number of levels in a run
    pub const LEVEL_COUNT: u32 = 10;
    /// Seconds on the per-level clock
    pub const LEVEL_DURATION_SECS: u32 = 30;
    /// Seconds on the run clock
    pub const TOTAL_DURATION_SECS: u32 = 300;

    /// Pause before the first path cell lights up
    pub const FLOW_PRELUDE_MS: u32 = 100;
    /// Per-cell cadence of the flow highlight
    pub const FLOW_STEP_MS: u32 = 120;
    /// Hold with the whole path lit before the zoom starts
    pub const FLOW_HOLD_MS: u32 = 250;
    /// Duration of each zoom leg (out and back in)
    pub const ZOOM_MS: u32 = 420;

    /// Bias toward rightward moves during path carving
    pub const WALK_RIGHT_BIAS: f64 = 0.75;
}
