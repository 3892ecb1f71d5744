//! Hidden Path entry point
//!
//! Headless driver for the puzzle engine: reads commands from stdin, advances
//! the sim in fixed steps, and draws the board with box-drawing glyphs. The
//! real shell supplies its own renderer; this binary exists for play-testing
//! and debugging the engine.

use std::io::{self, BufRead};

use hidden_path::consts::{LEVEL_COUNT, TICK_MS};
use hidden_path::shell::{GameSummary, Navigator, Route, format_clock};
use hidden_path::sim::{CellPos, GameState, TickInput, tick};

/// Glyph per opening mask (bit 0 = up, 1 = right, 2 = down, 3 = left)
const GLYPHS: [char; 16] = [
    '·', '╵', '╶', '╰', '╷', '│', '╭', '├', '╴', '╯', '─', '┴', '╮', '┤', '┬', '┼',
];

struct LogShell;

impl Navigator for LogShell {
    fn navigate(&mut self, route: Route) {
        log::info!("navigate: {route:?}");
    }
}

fn main() -> io::Result<()> {
    env_logger::init();

    let seed = std::env::args()
        .nth(1)
        .and_then(|s| s.parse().ok())
        .unwrap_or(0xC0FFEE);
    let mut state = GameState::new(seed);
    let mut shell = LogShell;

    println!("hidden-path (seed {seed})");
    println!("commands: cw R C | ccw R C | sel R C | swap | shuffle | check | again | dump | quit");
    print_board(&state);

    for line in io::stdin().lock().lines() {
        let line = line?;
        let mut parts = line.split_whitespace();
        let mut input = TickInput::default();
        match parts.next() {
            Some("cw") => input.rotate = parse_pos(&mut parts).map(|p| (p, 1)),
            Some("ccw") => input.rotate = parse_pos(&mut parts).map(|p| (p, -1)),
            Some("sel") => input.select = parse_pos(&mut parts),
            Some("swap") => input.swap_rotate = true,
            Some("shuffle") => input.reshuffle = true,
            Some("check") => input.check = true,
            Some("again") => {
                shell.navigate(Route::Replay);
                input.restart = true;
            }
            Some("dump") => {
                match serde_json::to_string_pretty(&state) {
                    Ok(json) => println!("{json}"),
                    Err(err) => eprintln!("dump failed: {err}"),
                }
                continue;
            }
            Some("quit") | Some("exit") => {
                shell.navigate(Route::Home);
                break;
            }
            Some(other) => {
                eprintln!("unknown command: {other}");
                continue;
            }
            None => {}
        }

        tick(&mut state, &input, TICK_MS);
        drain_animation(&mut state);
        print_board(&state);

        if state.game_over {
            let summary = GameSummary::from_state(&state);
            println!(
                "game over: score {}/{} (reached level {})",
                summary.score, LEVEL_COUNT, summary.levels_reached
            );
            println!("`again` to replay, `quit` to leave");
        }
    }

    Ok(())
}

fn parse_pos(parts: &mut std::str::SplitWhitespace<'_>) -> Option<CellPos> {
    let row = parts.next()?.parse().ok()?;
    let col = parts.next()?.parse().ok()?;
    Some(CellPos::new(row, col))
}

/// Headless stand-in for the frame loop: run any in-flight solve animation
/// to completion at the fixed cadence
fn drain_animation(state: &mut GameState) {
    let mut announced = false;
    while state.phase.is_animating() {
        if !announced {
            println!("path complete, flowing...");
            announced = true;
        }
        tick(state, &TickInput::default(), TICK_MS);
    }
}

fn print_board(state: &GameState) {
    if state.game_over {
        return;
    }
    println!(
        "level {}/{}  grid {}x{}  score {}  level {}  total {}  [{}]",
        state.level_index + 1,
        LEVEL_COUNT,
        state.grid.rows(),
        state.grid.cols(),
        state.score,
        format_clock(state.level_secs),
        format_clock(state.total_secs),
        if state.connected { "connected" } else { "not connected" },
    );
    for row in 0..state.grid.rows() {
        let mut line = String::new();
        for col in 0..state.grid.cols() {
            let pos = CellPos::new(row, col);
            let glyph = GLYPHS[state.grid[pos].openings().bits() as usize];
            if pos == state.selected {
                line.push('[');
                line.push(glyph);
                line.push(']');
            } else {
                line.push(' ');
                line.push(glyph);
                line.push(' ');
            }
        }
        println!("{line}");
    }
}
