//! Compass bearings and the legacy direction sentinels.

use serde::{Deserialize, Serialize};

/// Robot or obstacle heading in 45° steps.
///
/// Cardinal bearings occupy even values and diagonals odd ones. Only the
/// cardinals take part in route search and primitive compilation; diagonals
/// exist for display orientation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum Bearing {
    /// 0
    North = 0,
    /// 1
    NorthEast = 1,
    /// 2
    East = 2,
    /// 3
    SouthEast = 3,
    /// 4
    South = 4,
    /// 5
    SouthWest = 5,
    /// 6
    West = 6,
    /// 7
    NorthWest = 7,
}

/// Wire alias for North
pub const SENTINEL_NORTH: u8 = 10;
/// Wire alias for East
pub const SENTINEL_EAST: u8 = 11;
/// Wire alias for South
pub const SENTINEL_SOUTH: u8 = 12;
/// Wire alias for West
pub const SENTINEL_WEST: u8 = 13;

impl Bearing {
    /// Cardinal bearings in clockwise order from North.
    pub const CARDINALS: [Bearing; 4] = [
        Bearing::North,
        Bearing::East,
        Bearing::South,
        Bearing::West,
    ];

    const ALL: [Bearing; 8] = [
        Bearing::North,
        Bearing::NorthEast,
        Bearing::East,
        Bearing::SouthEast,
        Bearing::South,
        Bearing::SouthWest,
        Bearing::West,
        Bearing::NorthWest,
    ];

    /// Bearing for an integer in 0..8.
    #[inline]
    pub fn from_index(index: u8) -> Option<Bearing> {
        Self::ALL.get(index as usize).copied()
    }

    /// Integer encoding (0..8).
    #[inline]
    pub fn index(self) -> u8 {
        self as u8
    }

    /// N, E, S or W?
    #[inline]
    pub fn is_cardinal(self) -> bool {
        self.index() % 2 == 0
    }

    /// NE, SE, SW or NW?
    #[inline]
    pub fn is_diagonal(self) -> bool {
        !self.is_cardinal()
    }

    #[inline]
    fn rotated(self, steps: u8) -> Bearing {
        Self::ALL[((self.index() + steps) % 8) as usize]
    }

    /// Rotate 90° clockwise (a right turn).
    #[inline]
    pub fn clockwise(self) -> Bearing {
        self.rotated(2)
    }

    /// Rotate 90° counter-clockwise (a left turn).
    #[inline]
    pub fn counter_clockwise(self) -> Bearing {
        self.rotated(6)
    }

    /// Rotate 45° clockwise.
    #[inline]
    pub fn clockwise_diagonal(self) -> Bearing {
        self.rotated(1)
    }

    /// Rotate 45° counter-clockwise.
    #[inline]
    pub fn counter_clockwise_diagonal(self) -> Bearing {
        self.rotated(7)
    }

    /// The opposite bearing.
    #[inline]
    pub fn reverse(self) -> Bearing {
        self.rotated(4)
    }

    /// Do both bearings lie on the same axis (equal or opposite)?
    #[inline]
    pub fn same_axis(self, other: Bearing) -> bool {
        self == other || self == other.reverse()
    }

    /// Unit cell step `(dx, dy)` in top-left coordinates (North is `y - 1`).
    #[inline]
    pub fn step_delta(self) -> (i32, i32) {
        match self {
            Bearing::North => (0, -1),
            Bearing::NorthEast => (1, -1),
            Bearing::East => (1, 0),
            Bearing::SouthEast => (1, 1),
            Bearing::South => (0, 1),
            Bearing::SouthWest => (-1, 1),
            Bearing::West => (-1, 0),
            Bearing::NorthWest => (-1, -1),
        }
    }

    /// Legacy direction sentinel (10..13). Diagonals have none.
    pub fn to_sentinel(self) -> Option<u8> {
        match self {
            Bearing::North => Some(SENTINEL_NORTH),
            Bearing::East => Some(SENTINEL_EAST),
            Bearing::South => Some(SENTINEL_SOUTH),
            Bearing::West => Some(SENTINEL_WEST),
            _ => None,
        }
    }

    /// Bearing for a legacy direction sentinel.
    pub fn from_sentinel(sentinel: u8) -> Option<Bearing> {
        match sentinel {
            SENTINEL_NORTH => Some(Bearing::North),
            SENTINEL_EAST => Some(Bearing::East),
            SENTINEL_SOUTH => Some(Bearing::South),
            SENTINEL_WEST => Some(Bearing::West),
            _ => None,
        }
    }

    /// Parse a direction name as sent by the operator console.
    ///
    /// Accepts full names and single letters, case-insensitive. Only
    /// cardinal directions are recognised.
    pub fn from_name(name: &str) -> Option<Bearing> {
        match name.trim().to_ascii_lowercase().as_str() {
            "north" | "n" => Some(Bearing::North),
            "east" | "e" => Some(Bearing::East),
            "south" | "s" => Some(Bearing::South),
            "west" | "w" => Some(Bearing::West),
            _ => None,
        }
    }

    /// Short compass label.
    pub fn label(self) -> &'static str {
        match self {
            Bearing::North => "N",
            Bearing::NorthEast => "NE",
            Bearing::East => "E",
            Bearing::SouthEast => "SE",
            Bearing::South => "S",
            Bearing::SouthWest => "SW",
            Bearing::West => "W",
            Bearing::NorthWest => "NW",
        }
    }
}

impl std::fmt::Display for Bearing {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_index_roundtrip() {
        for i in 0..8u8 {
            assert_eq!(Bearing::from_index(i).map(Bearing::index), Some(i));
        }
        assert_eq!(Bearing::from_index(8), None);
    }

    #[test]
    fn test_cardinal_parity() {
        for b in Bearing::CARDINALS {
            assert!(b.is_cardinal());
            assert_eq!(b.index() % 2, 0);
        }
        assert!(Bearing::NorthEast.is_diagonal());
        assert!(Bearing::SouthWest.is_diagonal());
    }

    #[test]
    fn test_rotations() {
        assert_eq!(Bearing::North.clockwise(), Bearing::East);
        assert_eq!(Bearing::West.clockwise(), Bearing::North);
        assert_eq!(Bearing::North.counter_clockwise(), Bearing::West);
        assert_eq!(Bearing::East.reverse(), Bearing::West);
        assert_eq!(Bearing::North.clockwise_diagonal(), Bearing::NorthEast);
        assert_eq!(Bearing::North.counter_clockwise_diagonal(), Bearing::NorthWest);
    }

    #[test]
    fn test_sentinel_lossless_for_cardinals() {
        for b in Bearing::CARDINALS {
            let s = b.to_sentinel().unwrap();
            assert!((10..=13).contains(&s));
            assert_eq!(Bearing::from_sentinel(s), Some(b));
        }
        assert_eq!(Bearing::NorthEast.to_sentinel(), None);
        assert_eq!(Bearing::from_sentinel(9), None);
        assert_eq!(Bearing::from_sentinel(14), None);
    }

    #[test]
    fn test_sentinel_reversal_pairs() {
        // N <-> S and E <-> W pair up the same way in both encodings
        assert_eq!(Bearing::from_sentinel(SENTINEL_NORTH).map(Bearing::reverse), Some(Bearing::South));
        assert_eq!(Bearing::from_sentinel(SENTINEL_EAST).map(Bearing::reverse), Some(Bearing::West));
    }

    #[test]
    fn test_from_name() {
        assert_eq!(Bearing::from_name("North"), Some(Bearing::North));
        assert_eq!(Bearing::from_name(" west "), Some(Bearing::West));
        assert_eq!(Bearing::from_name("S"), Some(Bearing::South));
        assert_eq!(Bearing::from_name("NorthEast"), None);
        assert_eq!(Bearing::from_name(""), None);
    }

    #[test]
    fn test_same_axis() {
        assert!(Bearing::North.same_axis(Bearing::South));
        assert!(Bearing::East.same_axis(Bearing::East));
        assert!(!Bearing::North.same_axis(Bearing::East));
    }
}
