//! Level generation
//!
//! A level is built in three passes:
//! 1. Carve a start-to-end path with a right-biased random walk.
//! 2. Classify each path cell's shape and rotation from its path neighbors,
//!    then fill the rest of the board with random decoy tiles.
//! 3. Scramble every rotation independently, keeping kinds fixed.
//!
//! Because the scramble touches rotations only, the puzzle is always solvable
//! by rotating tiles back into place. It is allowed to start already solved.

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::grid::{CellPos, Grid};
use super::tile::{Dir, Openings, Rotation, Tile, TileKind, align_endpoint, classify_openings};
use crate::consts::WALK_RIGHT_BIAS;

/// A generated level: the connected reference layout, its scrambled playable
/// counterpart, and the walk the generator carved. Kept around per level so a
/// reshuffle can re-randomize rotations without regenerating topology.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LevelRecord {
    pub solved: Grid,
    pub initial: Grid,
    pub path: Vec<CellPos>,
}

/// Build a guaranteed-solvable level of the given size
pub fn generate(rows: usize, cols: usize, rng: &mut impl Rng) -> LevelRecord {
    let path = carve_path(rows, cols, rng);
    let solved = lay_tiles(rows, cols, &path, rng);
    let initial = scramble(&solved, rng);
    LevelRecord {
        solved,
        initial,
        path,
    }
}

/// Random walk from `(0, 0)` to `(0, cols - 1)`.
///
/// Candidate moves are right/up/down over unvisited cells; a rightward move
/// is taken with probability [`WALK_RIGHT_BIAS`] when available, otherwise
/// the walk picks uniformly. Dead ends backtrack. A final pass closes any
/// remaining gap to the end column with straight right steps.
fn carve_path(rows: usize, cols: usize, rng: &mut impl Rng) -> Vec<CellPos> {
    let start = CellPos::new(0, 0);
    let goal = CellPos::new(0, cols - 1);
    let slot = |p: CellPos| p.row * cols + p.col;

    let mut visited = vec![false; rows * cols];
    let mut path = vec![start];
    visited[slot(start)] = true;

    // every push marks a fresh cell and every pop shrinks an exhausted
    // branch, so the walk terminates; cap iterations anyway
    let mut budget = rows * cols * 8;
    while budget > 0 {
        budget -= 1;
        let Some(&cur) = path.last() else { break };
        if cur == goal {
            break;
        }

        let mut cand: Vec<CellPos> = Vec::with_capacity(3);
        if cur.col + 1 < cols && !visited[slot(CellPos::new(cur.row, cur.col + 1))] {
            cand.push(CellPos::new(cur.row, cur.col + 1));
        }
        if cur.row > 0 && !visited[slot(CellPos::new(cur.row - 1, cur.col))] {
            cand.push(CellPos::new(cur.row - 1, cur.col));
        }
        if cur.row + 1 < rows && !visited[slot(CellPos::new(cur.row + 1, cur.col))] {
            cand.push(CellPos::new(cur.row + 1, cur.col));
        }

        if cand.is_empty() {
            if path.len() > 1 {
                path.pop();
                continue;
            }
            // single-cell dead end; the right-closure pass below takes over
            break;
        }

        let rightward = cand.iter().copied().find(|c| c.col > cur.col);
        let next = match rightward {
            Some(r) if rng.random_bool(WALK_RIGHT_BIAS) => r,
            _ => cand[rng.random_range(0..cand.len())],
        };
        visited[slot(next)] = true;
        path.push(next);
    }

    // close out to the end column with straight right steps while free
    while let Some(&last) = path.last() {
        if last.col + 1 >= cols {
            break;
        }
        let next = CellPos::new(last.row, last.col + 1);
        if visited[slot(next)] {
            break;
        }
        visited[slot(next)] = true;
        path.push(next);
    }

    path
}

/// Turn the carved path into a fully-connected solved grid and surround it
/// with random decoys.
fn lay_tiles(rows: usize, cols: usize, path: &[CellPos], rng: &mut impl Rng) -> Grid {
    let goal = CellPos::new(0, cols - 1);
    let slot = |p: CellPos| p.row * cols + p.col;

    let mut grid = Grid::filled(rows, cols, Tile::new(TileKind::Empty, Rotation::ZERO));
    let mut on_path = vec![false; rows * cols];
    for &p in path {
        on_path[slot(p)] = true;
    }

    for (i, &p) in path.iter().enumerate() {
        // open toward every path neighbor, consecutive on the walk or not
        let mut observed = Openings::EMPTY;
        for d in Dir::ALL {
            if let Some(n) = grid.neighbor(p, d) {
                if on_path[slot(n)] {
                    observed = observed.with(d);
                }
            }
        }

        grid[p] = if i == 0 {
            // the start's single opening aims at its successor on the walk
            let toward = path.get(1).and_then(|&n| p.dir_toward(n)).unwrap_or(Dir::Right);
            Tile::new(TileKind::Start, align_endpoint(TileKind::Start, toward))
        } else if p == goal {
            let toward = p.dir_toward(path[i - 1]).unwrap_or(Dir::Left);
            Tile::new(TileKind::End, align_endpoint(TileKind::End, toward))
        } else {
            match classify_openings(observed) {
                Some((kind, rot)) => Tile::new(kind, rot),
                None => {
                    // stub cell from an aborted walk: lay a line along its
                    // one neighbor
                    let along = observed.iter().next().unwrap_or(Dir::Right);
                    let rot = match along {
                        Dir::Right | Dir::Left => Rotation::ZERO,
                        Dir::Up | Dir::Down => Rotation::new(1),
                    };
                    Tile::new(TileKind::Line, rot)
                }
            }
        };
    }

    const FILLER: [TileKind; 4] = [TileKind::Empty, TileKind::Line, TileKind::Curve, TileKind::Tee];
    for p in grid.positions() {
        if on_path[slot(p)] {
            continue;
        }
        let kind = FILLER[rng.random_range(0..FILLER.len())];
        grid[p] = Tile::new(kind, Rotation::new(rng.random_range(0..4)));
    }

    // a fully degenerate walk can stop short of the end cell; the board
    // still carries its unique end tile
    if grid[goal].kind != TileKind::End {
        grid[goal] = Tile::new(TileKind::End, Rotation::ZERO);
    }

    grid
}

/// Rotation-only scramble: same kinds, independently re-randomized rotations
pub fn scramble(solved: &Grid, rng: &mut impl Rng) -> Grid {
    let mut grid = solved.clone();
    for p in grid.positions() {
        grid[p].rotate(rng.random_range(0..4));
    }
    grid
}
