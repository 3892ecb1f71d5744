//! Game state and progression
//!
//! All per-run state lives here: the active grid, the per-level record cache,
//! the two countdown clocks, and the animation phase. One struct, updated
//! atomically per tick, so timer suspension and phase changes can never race.

use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::connect::check_path;
use super::generate::{LevelRecord, generate, scramble};
use super::grid::{CellPos, Grid};
use super::tile::{Rotation, Tile, TileKind};
use crate::consts;

/// Grid dimension for a 0-based level index
pub fn grid_size_for_level(index: u32) -> usize {
    match index + 1 {
        1..=3 => 5,
        4..=5 => 6,
        6..=8 => 7,
        _ => 8,
    }
}

/// Animation/transition phase. Each non-idle variant carries its own
/// remaining-duration counter; the chain runs flow -> zoom-out -> (level
/// load) -> zoom-in and cannot be re-entered because it only starts from
/// `Idle`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Phase {
    Idle,
    /// Path cells `0..lit` are highlighted; `timer_ms` counts down to the
    /// next step
    Flowing { lit: usize, timer_ms: u32 },
    ZoomOut { timer_ms: u32 },
    ZoomIn { timer_ms: u32 },
}

impl Phase {
    #[inline]
    pub fn is_idle(&self) -> bool {
        matches!(self, Phase::Idle)
    }

    #[inline]
    pub fn is_animating(&self) -> bool {
        !self.is_idle()
    }
}

/// Seed bookkeeping so generation draws stay reproducible without
/// serializing the RNG itself
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RngState {
    pub seed: u64,
    pub draws: u64,
}

impl RngState {
    pub fn new(seed: u64) -> Self {
        Self { seed, draws: 0 }
    }

    /// Derive a fresh generator for the next generation draw
    pub fn next_rng(&mut self) -> Pcg32 {
        self.draws += 1;
        let stream = self.draws.wrapping_mul(0x9E37_79B9_7F4A_7C15);
        Pcg32::seed_from_u64(self.seed.wrapping_add(stream))
    }
}

/// Complete game state (deterministic, serializable)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    /// RNG state
    pub rng_state: RngState,
    /// Current level index (0-based; equals `LEVEL_COUNT` after a full run)
    pub level_index: u32,
    /// Levels solved so far
    pub score: u32,
    /// The playable board
    pub grid: Grid,
    /// Selection cursor for rotation input
    pub selected: CellPos,
    /// Last validator verdict, recomputed after every mutation
    pub connected: bool,
    /// Last found path (start to end), empty when not connected
    pub path: Vec<CellPos>,
    /// Animation/transition phase
    pub phase: Phase,
    /// Seconds left on the per-level clock
    pub level_secs: u32,
    /// Seconds left on the run clock
    pub total_secs: u32,
    /// Whether the run has ended
    pub game_over: bool,
    /// Sub-second accumulator for the countdown clocks
    second_acc_ms: u32,
    /// Per-level cache so a reshuffle can reuse the solved layout; cleared
    /// on restart
    levels: Vec<Option<LevelRecord>>,
}

impl GameState {
    /// Create a new run with the given seed and load level 1
    pub fn new(seed: u64) -> Self {
        let mut state = Self {
            seed,
            rng_state: RngState::new(seed),
            level_index: 0,
            score: 0,
            grid: Grid::filled(1, 1, Tile::new(TileKind::Empty, Rotation::ZERO)),
            selected: CellPos::new(0, 0),
            connected: false,
            path: Vec::new(),
            phase: Phase::Idle,
            level_secs: consts::LEVEL_DURATION_SECS,
            total_secs: consts::TOTAL_DURATION_SECS,
            game_over: false,
            second_acc_ms: 0,
            levels: vec![None; consts::LEVEL_COUNT as usize],
        };
        state.load_level(0);
        state
    }

    /// Stored record for a level, if it has been generated this run
    pub fn level_record(&self, index: u32) -> Option<&LevelRecord> {
        self.levels.get(index as usize).and_then(|r| r.as_ref())
    }

    /// Generate and install the grid for `index`, resetting per-level state
    pub fn load_level(&mut self, index: u32) {
        let size = grid_size_for_level(index);
        let mut rng = self.rng_state.next_rng();
        let record = generate(size, size, &mut rng);
        self.grid = record.initial.clone();
        self.levels[index as usize] = Some(record);
        self.level_secs = consts::LEVEL_DURATION_SECS;
        self.selected = CellPos::new(0, 0);
        self.revalidate();
        log::info!("level {} loaded ({size}x{size})", index + 1);
    }

    /// Re-run the connectivity check and cache the verdict for display
    pub fn revalidate(&mut self) {
        let res = check_path(&self.grid);
        self.connected = res.found;
        self.path = res.cells;
    }

    /// Select `pos` and rotate it by `turns` quarter turns
    pub fn rotate_cell(&mut self, pos: CellPos, turns: i32) {
        if !self.grid.in_bounds(pos) {
            return;
        }
        self.selected = pos;
        self.grid[pos].rotate(turns);
        self.revalidate();
    }

    /// Rotate the selection and its right neighbor together by one turn
    /// each; in the last column the left neighbor stands in
    pub fn swap_rotate(&mut self) {
        let CellPos { row, col } = self.selected;
        let partner = if col + 1 < self.grid.cols() {
            CellPos::new(row, col + 1)
        } else if col > 0 {
            CellPos::new(row, col - 1)
        } else {
            return;
        };
        self.grid[self.selected].rotate(1);
        self.grid[partner].rotate(1);
        self.revalidate();
    }

    /// Rescramble the current level from its stored solved layout,
    /// preserving kinds and producing fresh rotations
    pub fn reshuffle(&mut self) {
        if self.game_over {
            return;
        }
        let Some(record) = self.levels[self.level_index as usize].as_ref() else {
            return;
        };
        let mut rng = self.rng_state.next_rng();
        self.grid = scramble(&record.solved, &mut rng);
        self.revalidate();
    }

    /// Advance past the current level; `solved` awards a point. Ends the
    /// run after the final level.
    pub fn advance_level(&mut self, solved: bool) {
        if self.game_over {
            return;
        }
        if solved {
            self.score += 1;
        }
        self.level_index += 1;
        if self.level_index >= consts::LEVEL_COUNT {
            self.game_over = true;
            log::info!("run complete: score {}/{}", self.score, consts::LEVEL_COUNT);
            return;
        }
        self.load_level(self.level_index);
    }

    /// Count down both clocks by whole elapsed seconds. Only called while
    /// idle; animation phases freeze the clocks as a unit.
    pub(super) fn tick_clocks(&mut self, dt_ms: u32) {
        self.second_acc_ms += dt_ms;
        while self.second_acc_ms >= 1000 {
            self.second_acc_ms -= 1000;
            self.level_secs = self.level_secs.saturating_sub(1);
            self.total_secs = self.total_secs.saturating_sub(1);
        }
    }

    /// Reset to a fresh run, clearing the level cache
    pub fn restart(&mut self) {
        self.score = 0;
        self.level_index = 0;
        self.total_secs = consts::TOTAL_DURATION_SECS;
        self.second_acc_ms = 0;
        self.game_over = false;
        self.phase = Phase::Idle;
        self.levels = vec![None; consts::LEVEL_COUNT as usize];
        self.load_level(0);
        log::info!("run restarted");
    }

    /// 1-based highest level reached, for the score screen
    pub fn levels_reached(&self) -> u32 {
        (self.level_index + 1).min(consts::LEVEL_COUNT)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grid_size_schedule() {
        let sizes: Vec<usize> = (0..10).map(grid_size_for_level).collect();
        assert_eq!(sizes, vec![5, 5, 5, 6, 6, 7, 7, 7, 8, 8]);
    }

    #[test]
    fn test_new_state_loads_level_one() {
        let state = GameState::new(11);
        assert_eq!(state.level_index, 0);
        assert_eq!(state.score, 0);
        assert_eq!(state.grid.rows(), 5);
        assert_eq!(state.level_secs, consts::LEVEL_DURATION_SECS);
        assert_eq!(state.total_secs, consts::TOTAL_DURATION_SECS);
        assert_eq!(state.selected, CellPos::new(0, 0));
        assert!(state.level_record(0).is_some());
        assert!(state.level_record(1).is_none());
    }

    #[test]
    fn test_swap_rotate_in_last_column_uses_left_neighbor() {
        let mut state = GameState::new(5);
        let cols = state.grid.cols();
        let edge = CellPos::new(2, cols - 1);
        let left = CellPos::new(2, cols - 2);

        state.selected = edge;
        let edge_rot = state.grid[edge].rot;
        let left_rot = state.grid[left].rot;
        state.swap_rotate();

        assert_eq!(state.grid[edge].rot, edge_rot.rotated(1));
        assert_eq!(state.grid[left].rot, left_rot.rotated(1));
    }

    #[test]
    fn test_swap_rotate_mid_board_uses_right_neighbor() {
        let mut state = GameState::new(5);
        let sel = CellPos::new(1, 1);
        let right = CellPos::new(1, 2);

        state.selected = sel;
        let sel_rot = state.grid[sel].rot;
        let right_rot = state.grid[right].rot;
        state.swap_rotate();

        assert_eq!(state.grid[sel].rot, sel_rot.rotated(1));
        assert_eq!(state.grid[right].rot, right_rot.rotated(1));
    }

    #[test]
    fn test_reshuffle_keeps_topology() {
        let mut state = GameState::new(21);
        let solved = state.level_record(0).expect("level 0 generated").solved.clone();
        state.reshuffle();
        for p in solved.positions() {
            assert_eq!(state.grid[p].kind, solved[p].kind);
        }
    }

    #[test]
    fn test_advance_on_final_level_ends_run() {
        let mut state = GameState::new(3);
        state.level_index = consts::LEVEL_COUNT - 1;
        state.advance_level(true);
        assert!(state.game_over);
        assert_eq!(state.score, 1);
        assert_eq!(state.levels_reached(), consts::LEVEL_COUNT);
    }

    #[test]
    fn test_restart_clears_run() {
        let mut state = GameState::new(8);
        state.score = 4;
        state.level_index = 6;
        state.game_over = true;
        state.restart();
        assert_eq!(state.score, 0);
        assert_eq!(state.level_index, 0);
        assert!(!state.game_over);
        assert!(state.level_record(6).is_none());
        assert_eq!(state.total_secs, consts::TOTAL_DURATION_SECS);
    }

    #[test]
    fn test_rotate_cell_revalidates() {
        let mut state = GameState::new(13);
        let before = state.connected;
        // a full lap leaves connectivity where it started
        for _ in 0..4 {
            state.rotate_cell(CellPos::new(2, 2), 1);
        }
        assert_eq!(state.connected, before);
        assert_eq!(state.selected, CellPos::new(2, 2));
    }
}
