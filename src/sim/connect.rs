//! Connectivity validation
//!
//! Breadth-first search from the start tile over reciprocal connections: an
//! edge between neighbors A and B in direction `d` exists only when A opens
//! toward `d` AND B opens toward `opposite(d)`. A one-sided opening is not a
//! connection.
//!
//! There is no incremental state; callers re-run the search after every grid
//! mutation. An absent path is a normal displayed condition, not an error.

use std::collections::VecDeque;

use super::grid::{CellPos, Grid};
use super::tile::TileKind;

/// Outcome of a connectivity check
#[derive(Debug, Clone, Default)]
pub struct PathResult {
    pub found: bool,
    /// Start-to-end cell sequence when found, empty otherwise. BFS yields a
    /// shortest path in hop count, not necessarily the generator's walk.
    pub cells: Vec<CellPos>,
}

/// Search for a start-to-end connection through the current rotations
pub fn check_path(grid: &Grid) -> PathResult {
    let (Some(start), Some(end)) = (grid.find(TileKind::Start), grid.find(TileKind::End)) else {
        return PathResult::default();
    };

    let slot = |p: CellPos| p.row * grid.cols() + p.col;
    let mut visited = vec![false; grid.rows() * grid.cols()];
    let mut parent: Vec<Option<CellPos>> = vec![None; grid.rows() * grid.cols()];
    let mut queue = VecDeque::new();

    visited[slot(start)] = true;
    queue.push_back(start);

    let mut found = false;
    while let Some(cur) = queue.pop_front() {
        if cur == end {
            found = true;
            break;
        }
        for dir in grid[cur].openings().iter() {
            let Some(next) = grid.neighbor(cur, dir) else {
                continue;
            };
            if !grid[next].openings().contains(dir.opposite()) {
                continue;
            }
            if !visited[slot(next)] {
                visited[slot(next)] = true;
                parent[slot(next)] = Some(cur);
                queue.push_back(next);
            }
        }
    }

    if !found {
        return PathResult::default();
    }

    // walk parent pointers end -> start, then flip to start -> end
    let mut cells = vec![end];
    let mut cur = end;
    while let Some(prev) = parent[slot(cur)] {
        cells.push(prev);
        cur = prev;
    }
    cells.reverse();
    PathResult { found: true, cells }
}
