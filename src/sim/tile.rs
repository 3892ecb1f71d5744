//! Tile geometry: pipe shapes, quarter-turn rotations, and opening sets
//!
//! A tile connects to a neighbor through an *opening* on one of its four
//! sides. Each tile kind has a canonical opening set at rotation 0; the
//! effective set is the canonical set rotated by the tile's current rotation.

use serde::{Deserialize, Serialize};

/// A side of a tile / direction toward a neighbor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Dir {
    Up,
    Right,
    Down,
    Left,
}

impl Dir {
    pub const ALL: [Dir; 4] = [Dir::Up, Dir::Right, Dir::Down, Dir::Left];

    /// Clockwise index: up=0, right=1, down=2, left=3
    #[inline]
    pub fn index(self) -> u8 {
        match self {
            Dir::Up => 0,
            Dir::Right => 1,
            Dir::Down => 2,
            Dir::Left => 3,
        }
    }

    /// Inverse of [`Dir::index`], taken modulo 4
    #[inline]
    pub fn from_index(i: u8) -> Dir {
        match i & 3 {
            0 => Dir::Up,
            1 => Dir::Right,
            2 => Dir::Down,
            _ => Dir::Left,
        }
    }

    /// The facing direction: `opposite(d) = (d + 2) mod 4`
    #[inline]
    pub fn opposite(self) -> Dir {
        Dir::from_index(self.index() + 2)
    }

    /// Row/column delta one step toward this direction
    #[inline]
    pub fn delta(self) -> (isize, isize) {
        match self {
            Dir::Up => (-1, 0),
            Dir::Right => (0, 1),
            Dir::Down => (1, 0),
            Dir::Left => (0, -1),
        }
    }
}

/// A quarter-turn rotation, always normalized to `0..4`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Rotation(u8);

impl Rotation {
    pub const ZERO: Rotation = Rotation(0);

    /// Normalize any integer number of quarter turns
    #[inline]
    pub fn new(turns: i32) -> Rotation {
        Rotation(turns.rem_euclid(4) as u8)
    }

    #[inline]
    pub fn quarter_turns(self) -> u8 {
        self.0
    }

    /// Rotate by `turns` additional quarter turns; `turns` may be any integer
    #[inline]
    pub fn rotated(self, turns: i32) -> Rotation {
        Rotation::new(self.0 as i32 + turns)
    }
}

/// A set of open directions, packed as a 4-bit mask (bit n = direction n)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Openings(u8);

impl Openings {
    pub const EMPTY: Openings = Openings(0);

    pub fn single(d: Dir) -> Openings {
        Openings(1 << d.index())
    }

    pub fn from_dirs(dirs: &[Dir]) -> Openings {
        dirs.iter().fold(Openings::EMPTY, |set, &d| set.with(d))
    }

    #[inline]
    pub fn with(self, d: Dir) -> Openings {
        Openings(self.0 | 1 << d.index())
    }

    #[inline]
    pub fn contains(self, d: Dir) -> bool {
        self.0 & (1 << d.index()) != 0
    }

    #[inline]
    pub fn len(self) -> u32 {
        self.0.count_ones()
    }

    #[inline]
    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Raw 4-bit mask (bit 0 = up, 1 = right, 2 = down, 3 = left)
    #[inline]
    pub fn bits(self) -> u8 {
        self.0
    }

    /// Every member shifted clockwise by `rot` quarter turns
    #[inline]
    pub fn rotated(self, rot: Rotation) -> Openings {
        // 4-bit barrel rotate; the mask invariant makes `>> 4` a no-op at k=0
        let k = rot.quarter_turns() as u32;
        Openings(((self.0 << k) | (self.0 >> (4 - k))) & 0xF)
    }

    pub fn iter(self) -> impl Iterator<Item = Dir> {
        Dir::ALL.into_iter().filter(move |d| self.contains(*d))
    }
}

/// Pipe shape of a tile. Kinds are fixed at generation; only rotations
/// change during play.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TileKind {
    Empty,
    Line,
    Curve,
    Tee,
    Cross,
    Start,
    End,
}

impl TileKind {
    /// Open directions at rotation 0
    pub fn canonical_openings(self) -> Openings {
        use Dir::*;
        match self {
            TileKind::Empty => Openings::EMPTY,
            TileKind::Line => Openings::from_dirs(&[Right, Left]),
            TileKind::Curve => Openings::from_dirs(&[Right, Down]),
            TileKind::Tee => Openings::from_dirs(&[Up, Right, Left]),
            TileKind::Cross => Openings::from_dirs(&[Up, Right, Down, Left]),
            TileKind::Start => Openings::single(Right),
            TileKind::End => Openings::single(Left),
        }
    }

    pub fn is_endpoint(self) -> bool {
        matches!(self, TileKind::Start | TileKind::End)
    }
}

/// A grid cell: a pipe shape plus its current rotation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tile {
    pub kind: TileKind,
    pub rot: Rotation,
}

impl Tile {
    pub fn new(kind: TileKind, rot: Rotation) -> Tile {
        Tile { kind, rot }
    }

    /// Effective opening set: canonical set rotated by the current rotation
    #[inline]
    pub fn openings(&self) -> Openings {
        self.kind.canonical_openings().rotated(self.rot)
    }

    /// Rotate in place by any integer number of quarter turns
    pub fn rotate(&mut self, turns: i32) {
        self.rot = self.rot.rotated(turns);
    }
}

/// Find the unique `(kind, rotation)` among the four pipe shapes whose
/// rotated canonical set equals `observed` exactly.
///
/// Every opening set of size 2..=4 matches exactly one kind; symmetric
/// shapes (line, cross) match at several rotations, in which case the
/// smallest rotation wins. Returns `None` for sets of size 0 or 1.
pub fn classify_openings(observed: Openings) -> Option<(TileKind, Rotation)> {
    for kind in [TileKind::Line, TileKind::Curve, TileKind::Tee, TileKind::Cross] {
        for turns in 0..4 {
            let rot = Rotation::new(turns);
            if kind.canonical_openings().rotated(rot) == observed {
                return Some((kind, rot));
            }
        }
    }
    None
}

/// Rotation that points an endpoint tile's single canonical opening at
/// `toward`. Callers pass `Start` or `End`; other kinds align their first
/// canonical direction, matching endpoint behavior for singleton sets.
pub fn align_endpoint(kind: TileKind, toward: Dir) -> Rotation {
    let canonical = kind
        .canonical_openings()
        .iter()
        .next()
        .map(Dir::index)
        .unwrap_or(0);
    Rotation::new(toward.index() as i32 - canonical as i32)
}
