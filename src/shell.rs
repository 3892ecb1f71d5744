//! Host-shell boundary
//!
//! The puzzle lives behind a menu shell that owns every screen around it.
//! The engine asks the shell for exactly one capability, navigation, and
//! hands back two read-only integers for the score screen.

use serde::{Deserialize, Serialize};

use crate::sim::GameState;

/// Destinations the engine can ask the shell for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    /// Main menu
    Home,
    /// Fresh run of the puzzle
    Replay,
}

/// Navigation capability provided by the host shell
pub trait Navigator {
    fn navigate(&mut self, route: Route);
}

/// Read-only run outcome for the score screen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameSummary {
    pub score: u32,
    pub levels_reached: u32,
}

impl GameSummary {
    pub fn from_state(state: &GameState) -> Self {
        Self {
            score: state.score,
            levels_reached: state.levels_reached(),
        }
    }
}

/// Format seconds as `m:ss` for the HUD clocks
pub fn format_clock(secs: u32) -> String {
    format!("{}:{:02}", secs / 60, secs % 60)
}
