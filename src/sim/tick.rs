//! Fixed timestep simulation tick
//!
//! Single entry point advancing the whole game: player rotations, the two
//! countdown clocks, and the solve-animation chain. The chain is an explicit
//! state machine stepped here; it starts only from `Phase::Idle`, so there is
//! no separate re-entrancy flag, and the clocks run only while idle, so a
//! total-time expiry can never fire mid-animation.

use super::grid::CellPos;
use super::state::{GameState, Phase};
use crate::consts::{FLOW_HOLD_MS, FLOW_PRELUDE_MS, FLOW_STEP_MS, ZOOM_MS};

/// Input commands for a single tick. All one-shot; drivers clear them after
/// each processed tick.
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Select a cell and rotate it by the given quarter turns (±1 from the
    /// two rotation gestures)
    pub rotate: Option<(CellPos, i32)>,
    /// Move the selection cursor without rotating
    pub select: Option<CellPos>,
    /// Rotate the selection together with its horizontal partner
    pub swap_rotate: bool,
    /// Rescramble the current level from its solved layout
    pub reshuffle: bool,
    /// Manual connectivity check
    pub check: bool,
    /// Start a fresh run (game-over "play again")
    pub restart: bool,
}

/// Advance the game state by one timestep of `dt_ms` milliseconds
pub fn tick(state: &mut GameState, input: &TickInput, dt_ms: u32) {
    if input.restart {
        state.restart();
        return;
    }
    if state.game_over {
        return;
    }

    match state.phase {
        // grid input is ignored while an animation is in flight
        Phase::Idle => tick_idle(state, input, dt_ms),
        _ => tick_animation(state, dt_ms),
    }
}

fn tick_idle(state: &mut GameState, input: &TickInput, dt_ms: u32) {
    // mutations first; each re-runs the validator synchronously
    if let Some(pos) = input.select {
        if state.grid.in_bounds(pos) {
            state.selected = pos;
        }
    }
    if let Some((pos, turns)) = input.rotate {
        state.rotate_cell(pos, turns);
    }
    if input.swap_rotate {
        state.swap_rotate();
    }
    if input.reshuffle {
        state.reshuffle();
    }
    if input.check && !state.connected {
        log::debug!("check: not connected");
    }

    // a found path starts the flow chain; starting from Idle is the only
    // entry, which is the whole re-entrancy guard
    if state.connected {
        log::info!(
            "level {} connected ({} cells), starting flow",
            state.level_index + 1,
            state.path.len()
        );
        state.phase = Phase::Flowing {
            lit: 0,
            timer_ms: FLOW_PRELUDE_MS,
        };
        // clocks freeze from the tick the animation starts
        return;
    }

    state.tick_clocks(dt_ms);

    if state.total_secs == 0 {
        log::info!("total time expired at level {}", state.level_index + 1);
        state.game_over = true;
        return;
    }
    if state.level_secs == 0 {
        log::info!("level {} timed out, advancing unsolved", state.level_index + 1);
        state.advance_level(false);
    }
}

/// Step the flow -> zoom-out -> load -> zoom-in chain. One call may cross
/// several phase boundaries when `dt_ms` is large.
fn tick_animation(state: &mut GameState, mut dt_ms: u32) {
    while dt_ms > 0 {
        match state.phase {
            Phase::Idle => return,

            Phase::Flowing { lit, timer_ms } => {
                if timer_ms > dt_ms {
                    state.phase = Phase::Flowing {
                        lit,
                        timer_ms: timer_ms - dt_ms,
                    };
                    return;
                }
                dt_ms -= timer_ms;
                let len = state.path.len();
                state.phase = if lit < len {
                    let lit = lit + 1;
                    // the last cell stays lit through the hold before zooming
                    let next_ms = if lit == len {
                        FLOW_STEP_MS + FLOW_HOLD_MS
                    } else {
                        FLOW_STEP_MS
                    };
                    Phase::Flowing { lit, timer_ms: next_ms }
                } else {
                    Phase::ZoomOut { timer_ms: ZOOM_MS }
                };
            }

            Phase::ZoomOut { timer_ms } => {
                if timer_ms > dt_ms {
                    state.phase = Phase::ZoomOut {
                        timer_ms: timer_ms - dt_ms,
                    };
                    return;
                }
                dt_ms -= timer_ms;
                // the solve lands here, while the board is hidden
                state.advance_level(true);
                if state.game_over {
                    state.phase = Phase::Idle;
                    return;
                }
                state.phase = Phase::ZoomIn { timer_ms: ZOOM_MS };
            }

            Phase::ZoomIn { timer_ms } => {
                if timer_ms > dt_ms {
                    state.phase = Phase::ZoomIn {
                        timer_ms: timer_ms - dt_ms,
                    };
                    return;
                }
                dt_ms -= timer_ms;
                // clocks resume on the next idle tick
                state.phase = Phase::Idle;
                return;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::{LEVEL_COUNT, LEVEL_DURATION_SECS, TICK_MS, TOTAL_DURATION_SECS};
    use crate::sim::grid::Grid;
    use crate::sim::tile::{Rotation, Tile, TileKind};

    /// State whose board cannot connect: start opens off the left edge
    fn stuck_state(seed: u64) -> GameState {
        let mut state = GameState::new(seed);
        let mut grid = Grid::filled(5, 5, Tile::new(TileKind::Empty, Rotation::ZERO));
        grid[CellPos::new(0, 0)] = Tile::new(TileKind::Start, Rotation::new(2));
        grid[CellPos::new(0, 4)] = Tile::new(TileKind::End, Rotation::ZERO);
        state.grid = grid;
        state.revalidate();
        assert!(!state.connected);
        state
    }

    /// State with the board snapped to its solved layout
    fn solved_state(seed: u64) -> GameState {
        let mut state = GameState::new(seed);
        let solved = state.level_record(0).expect("level 0 generated").solved.clone();
        state.grid = solved;
        state.revalidate();
        assert!(state.connected);
        state
    }

    fn run_until_idle(state: &mut GameState) {
        let input = TickInput::default();
        for _ in 0..100_000 {
            if state.phase.is_idle() {
                return;
            }
            tick(state, &input, TICK_MS);
        }
        panic!("animation never settled");
    }

    #[test]
    fn test_solve_runs_the_full_chain() {
        let mut state = solved_state(17);
        let path_len = state.path.len();

        tick(&mut state, &TickInput::default(), TICK_MS);
        assert!(matches!(state.phase, Phase::Flowing { lit: 0, .. }));
        // clocks froze on the entry tick
        assert_eq!(state.level_secs, LEVEL_DURATION_SECS);
        assert!(path_len >= 2);

        run_until_idle(&mut state);
        assert_eq!(state.level_index, 1);
        assert_eq!(state.score, 1);
        assert!(state.phase.is_idle());
        assert_eq!(state.level_secs, LEVEL_DURATION_SECS);
        assert_eq!(state.grid.rows(), 5); // level 2 is still a 5x5
    }

    #[test]
    fn test_flow_lights_cells_in_order() {
        let mut state = solved_state(29);
        let path_len = state.path.len();

        tick(&mut state, &TickInput::default(), TICK_MS);
        let mut max_lit = 0;
        while let Phase::Flowing { lit, .. } = state.phase {
            assert!(lit >= max_lit, "flow went backwards");
            assert!(lit <= path_len);
            max_lit = lit;
            tick(&mut state, &TickInput::default(), TICK_MS);
        }
        assert_eq!(max_lit, path_len);
        assert!(matches!(state.phase, Phase::ZoomOut { .. }));
    }

    #[test]
    fn test_rotation_ignored_while_animating() {
        let mut state = solved_state(31);
        tick(&mut state, &TickInput::default(), TICK_MS);
        assert!(state.phase.is_animating());

        let probe = CellPos::new(2, 2);
        let before = state.grid[probe].rot;
        let input = TickInput {
            rotate: Some((probe, 1)),
            ..Default::default()
        };
        tick(&mut state, &input, TICK_MS);
        assert_eq!(state.grid[probe].rot, before);
        assert!(state.phase.is_animating());
    }

    #[test]
    fn test_level_timeout_advances_without_score() {
        let mut state = stuck_state(41);
        for _ in 0..LEVEL_DURATION_SECS {
            tick(&mut state, &TickInput::default(), 1000);
        }
        assert_eq!(state.level_index, 1);
        assert_eq!(state.score, 0);
        assert_eq!(state.level_secs, LEVEL_DURATION_SECS);
        assert!(!state.game_over);
    }

    #[test]
    fn test_total_timeout_ends_run_from_idle() {
        let mut state = stuck_state(43);
        state.total_secs = 2;
        tick(&mut state, &TickInput::default(), 1000);
        assert!(!state.game_over);
        tick(&mut state, &TickInput::default(), 1000);
        assert!(state.game_over);
        let frozen = (state.level_secs, state.total_secs);
        // a dead run ignores further ticks
        tick(&mut state, &TickInput::default(), 5000);
        assert_eq!((state.level_secs, state.total_secs), frozen);
    }

    #[test]
    fn test_clocks_frozen_through_the_whole_chain() {
        let mut state = solved_state(47);
        state.total_secs = 1; // would expire after one idle second
        tick(&mut state, &TickInput::default(), TICK_MS);
        assert!(state.phase.is_animating());

        // pump far more wall time than one second through the animation
        run_until_idle(&mut state);
        assert!(!state.game_over);
        assert_eq!(state.total_secs, 1);
    }

    #[test]
    fn test_solving_the_final_level_completes_the_run() {
        let mut state = solved_state(53);
        state.level_index = LEVEL_COUNT - 1;
        state.score = LEVEL_COUNT - 1;
        tick(&mut state, &TickInput::default(), TICK_MS);
        run_until_idle(&mut state);
        assert!(state.game_over);
        assert_eq!(state.score, LEVEL_COUNT);
        assert_eq!(state.levels_reached(), LEVEL_COUNT);
    }

    #[test]
    fn test_swap_rotate_input_on_rightmost_column() {
        let mut state = stuck_state(59);
        let cols = state.grid.cols();
        let edge = CellPos::new(3, cols - 1);
        let left = CellPos::new(3, cols - 2);
        let edge_rot = state.grid[edge].rot;
        let left_rot = state.grid[left].rot;

        let select = TickInput {
            select: Some(edge),
            ..Default::default()
        };
        tick(&mut state, &select, TICK_MS);
        let swap = TickInput {
            swap_rotate: true,
            ..Default::default()
        };
        tick(&mut state, &swap, TICK_MS);

        assert_eq!(state.grid[edge].rot, edge_rot.rotated(1));
        assert_eq!(state.grid[left].rot, left_rot.rotated(1));
    }

    #[test]
    fn test_restart_input() {
        let mut state = stuck_state(61);
        state.game_over = true;
        state.score = 3;
        let input = TickInput {
            restart: true,
            ..Default::default()
        };
        tick(&mut state, &input, TICK_MS);
        assert!(!state.game_over);
        assert_eq!(state.score, 0);
        assert_eq!(state.level_index, 0);
    }

    #[test]
    fn test_determinism() {
        // two runs with the same seed and input script stay identical
        let mut a = GameState::new(77);
        let mut b = GameState::new(77);
        let script = [
            TickInput {
                rotate: Some((CellPos::new(1, 1), 1)),
                ..Default::default()
            },
            TickInput {
                swap_rotate: true,
                ..Default::default()
            },
            TickInput {
                reshuffle: true,
                ..Default::default()
            },
            TickInput::default(),
        ];
        for input in &script {
            tick(&mut a, input, TICK_MS);
            tick(&mut b, input, TICK_MS);
        }
        assert_eq!(a.grid, b.grid);
        assert_eq!(a.phase, b.phase);
        assert_eq!(a.score, b.score);
        assert_eq!(a.level_index, b.level_index);
    }

    #[test]
    fn test_total_clock_never_underflows() {
        let mut state = stuck_state(67);
        state.total_secs = TOTAL_DURATION_SECS;
        state.level_secs = 1;
        // expire several levels in a row
        for _ in 0..5 {
            tick(&mut state, &TickInput::default(), 1000);
            state.level_secs = 1;
        }
        assert!(state.total_secs <= TOTAL_DURATION_SECS);
        assert!(state.total_secs >= TOTAL_DURATION_SECS - 5);
    }
}
