//! Deterministic puzzle engine
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - No rendering or platform dependencies

pub mod connect;
pub mod generate;
pub mod grid;
pub mod state;
pub mod tick;
pub mod tile;

pub use connect::{PathResult, check_path};
pub use generate::{LevelRecord, generate, scramble};
pub use grid::{CellPos, Grid};
pub use state::{GameState, Phase, RngState, grid_size_for_level};
pub use tick::{TickInput, tick};
pub use tile::{Dir, Openings, Rotation, Tile, TileKind, align_endpoint, classify_openings};
