//! Cardinal directions and their wire encoding
//!
//! Directions are encoded as 0=NORTH, 1=EAST, 2=SOUTH, 3=WEST, which is
//! also the index of the matching wall in [`crate::Cell::walls`].

use alloc::format;
use alloc::string::String;
use core::fmt;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Direction {
    North = 0,
    East = 1,
    South = 2,
    West = 3,
}

impl Direction {
    /// Neighbor scan order used by both the generator and the path finder
    pub const ALL: [Direction; 4] = [
        Direction::North,
        Direction::East,
        Direction::South,
        Direction::West,
    ];

    /// `(dx, dy)` offset of one step, `y` grows downward
    pub const fn delta(self) -> (isize, isize) {
        match self {
            Direction::North => (0, -1),
            Direction::East => (1, 0),
            Direction::South => (0, 1),
            Direction::West => (-1, 0),
        }
    }

    pub const fn opposite(self) -> Direction {
        match self {
            Direction::North => Direction::South,
            Direction::East => Direction::West,
            Direction::South => Direction::North,
            Direction::West => Direction::East,
        }
    }

    /// Wall slot for this direction
    pub const fn index(self) -> usize {
        self as usize
    }
}

impl TryFrom<u8> for Direction {
    type Error = u8;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        match code {
            0 => Ok(Direction::North),
            1 => Ok(Direction::East),
            2 => Ok(Direction::South),
            3 => Ok(Direction::West),
            other => Err(other),
        }
    }
}

impl From<Direction> for u8 {
    fn from(dir: Direction) -> Self {
        dir as u8
    }
}

impl core::str::FromStr for Direction {
    type Err = String;

    /// Accepts direction names as well as the arrow/WASD keys the game binds
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.eq_ignore_ascii_case("north") || s.eq_ignore_ascii_case("up") || s.eq_ignore_ascii_case("w") {
            Ok(Direction::North)
        } else if s.eq_ignore_ascii_case("east") || s.eq_ignore_ascii_case("right") || s.eq_ignore_ascii_case("d") {
            Ok(Direction::East)
        } else if s.eq_ignore_ascii_case("south") || s.eq_ignore_ascii_case("down") || s.eq_ignore_ascii_case("s") {
            Ok(Direction::South)
        } else if s.eq_ignore_ascii_case("west") || s.eq_ignore_ascii_case("left") || s.eq_ignore_ascii_case("a") {
            Ok(Direction::West)
        } else {
            Err(format!("Unknown direction '{}': use north/east/south/west, up/right/down/left or w/d/s/a", s))
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::North => write!(f, "north"),
            Direction::East => write!(f, "east"),
            Direction::South => write!(f, "south"),
            Direction::West => write!(f, "west"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_opposite_is_involution() {
        for dir in Direction::ALL {
            assert_eq!(dir.opposite().opposite(), dir);
            assert_ne!(dir.opposite(), dir);
        }
    }

    #[test]
    fn test_wire_codes() {
        for (code, dir) in Direction::ALL.iter().enumerate() {
            assert_eq!(Direction::try_from(code as u8), Ok(*dir));
            assert_eq!(u8::from(*dir) as usize, code);
            assert_eq!(dir.index(), code);
        }
        assert_eq!(Direction::try_from(4), Err(4));
    }

    #[test]
    fn test_parse_keys() {
        assert_eq!("up".parse::<Direction>(), Ok(Direction::North));
        assert_eq!("W".parse::<Direction>(), Ok(Direction::North));
        assert_eq!("d".parse::<Direction>(), Ok(Direction::East));
        assert_eq!("South".parse::<Direction>(), Ok(Direction::South));
        assert_eq!(" left ".parse::<Direction>(), Ok(Direction::West));
    }

    #[test]
    fn test_parse_error_names_input() {
        let err = "diagonal".parse::<Direction>().unwrap_err();
        assert!(err.contains("'diagonal'"));
    }

    #[test]
    fn test_display_round_trips_through_parse() {
        for dir in Direction::ALL {
            assert_eq!(alloc::string::ToString::to_string(&dir).parse::<Direction>(), Ok(dir));
        }
    }
}
