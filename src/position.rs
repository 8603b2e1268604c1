use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Eq, PartialEq, Ord, PartialOrd, Hash, Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ZoneId(pub u32);

impl fmt::Display for ZoneId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Z{}", self.0)
    }
}

#[derive(Eq, PartialEq, Hash, Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Position {
    pub x: u32,
    pub y: u32,
    pub zone: ZoneId,
}

/// Distance between two positions. Positions in different zones are never
/// comparable, so the unreachable case is its own variant rather than a
/// large number.
#[derive(Eq, PartialEq, Debug, Clone, Copy)]
pub enum Range {
    Tiles(u32),
    Unreachable,
}

impl Range {
    pub fn tiles(self) -> Option<u32> {
        match self {
            Range::Tiles(tiles) => Some(tiles),
            Range::Unreachable => None,
        }
    }

    pub fn is_reachable(self) -> bool {
        matches!(self, Range::Tiles(_))
    }

    pub fn within(self, range: u32) -> bool {
        match self {
            Range::Tiles(tiles) => tiles <= range,
            Range::Unreachable => false,
        }
    }
}

impl fmt::Display for Range {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Range::Tiles(tiles) => write!(f, "{}", tiles),
            Range::Unreachable => write!(f, "unreachable"),
        }
    }
}

impl Position {
    pub const fn new(x: u32, y: u32, zone: ZoneId) -> Position {
        Position { x, y, zone }
    }

    pub fn get_range_to(&self, other: &Position) -> Range {
        if self.zone != other.zone {
            return Range::Unreachable;
        }

        let dx = self.x.abs_diff(other.x);
        let dy = self.y.abs_diff(other.y);

        Range::Tiles(dx.max(dy))
    }

    pub fn in_range_to(&self, other: &Position, range: u32) -> bool {
        self.get_range_to(other).within(range)
    }

    pub fn is_near_to(&self, other: &Position) -> bool {
        self.in_range_to(other, 1)
    }

    /// Position one tile closer to `target` along each axis. Does not cross zones.
    pub fn step_towards(&self, target: &Position) -> Position {
        if self.zone != target.zone {
            return *self;
        }

        fn step(from: u32, to: u32) -> u32 {
            match from.cmp(&to) {
                std::cmp::Ordering::Less => from + 1,
                std::cmp::Ordering::Greater => from - 1,
                std::cmp::Ordering::Equal => from,
            }
        }

        Position::new(step(self.x, target.x), step(self.y, target.y), self.zone)
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{} {},{}]", self.zone, self.x, self.y)
    }
}
