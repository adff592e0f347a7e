//! Game session layer for the heart maze
//!
//! Wraps the [`heart_maze_core`] algorithms in a [`GameSession`] that owns
//! the maze, the player and goal positions, the hint budget and the
//! elapsed-time clock. Both the CLI and the API server drive the game
//! exclusively through this type.

pub mod session;

pub use heart_maze_core::{path_to_moves, Direction, Position};
pub use session::{
    format_elapsed, GameSession, HintOutcome, MoveOutcome, SessionError, SessionSnapshot, HINT_BUDGET,
    HINT_DISPLAY, HINT_TRAIL_LEN,
};

use serde::{Deserialize, Serialize};

/// Side length of the square play area the presets are sized for
pub const CANVAS_PX: usize = 600;

/// Difficulty preset, differing only in grid size and drawn cell size
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    /// 20 × 20 grid, 30 px cells
    Easy,
    /// 30 × 30 grid, 20 px cells
    Medium,
    /// 40 × 40 grid, 15 px cells
    Hard,
}

impl Difficulty {
    pub const ALL: [Difficulty; 3] = [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard];

    pub fn grid_size(self) -> usize {
        match self {
            Difficulty::Easy => 20,
            Difficulty::Medium => 30,
            Difficulty::Hard => 40,
        }
    }

    pub fn cell_size(self) -> usize {
        match self {
            Difficulty::Easy => 30,
            Difficulty::Medium => 20,
            Difficulty::Hard => 15,
        }
    }
}

impl Default for Difficulty {
    fn default() -> Self {
        Difficulty::Medium
    }
}

impl std::str::FromStr for Difficulty {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "easy" => Ok(Difficulty::Easy),
            "medium" => Ok(Difficulty::Medium),
            "hard" => Ok(Difficulty::Hard),
            _ => Err(format!("Invalid difficulty: '{}'. Must be 'easy', 'medium', or 'hard'", s)),
        }
    }
}

impl std::fmt::Display for Difficulty {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Difficulty::Easy => write!(f, "easy"),
            Difficulty::Medium => write!(f, "medium"),
            Difficulty::Hard => write!(f, "hard"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_presets_fill_the_canvas() {
        for difficulty in Difficulty::ALL {
            assert_eq!(difficulty.grid_size() * difficulty.cell_size(), CANVAS_PX);
        }
    }

    #[test]
    fn test_parse_and_display() {
        for difficulty in Difficulty::ALL {
            let parsed: Difficulty = difficulty.to_string().parse().unwrap();
            assert_eq!(parsed, difficulty);
        }
        assert_eq!("HARD".parse::<Difficulty>(), Ok(Difficulty::Hard));
        assert!("nightmare".parse::<Difficulty>().is_err());
        assert_eq!(Difficulty::default(), Difficulty::Medium);
    }

    #[test]
    fn test_serde_lowercase() {
        assert_eq!(serde_json::to_string(&Difficulty::Easy).unwrap(), "\"easy\"");
        let parsed: Difficulty = serde_json::from_str("\"hard\"").unwrap();
        assert_eq!(parsed, Difficulty::Hard);
    }
}
