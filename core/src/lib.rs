//! Shape mask, maze generation and path finding for the heart maze
//!
//! This crate holds the algorithmic core shared by the game session
//! layer, the CLI and the API server:
//!
//! - [`mask`] classifies grid cells as inside or outside the heart
//! - [`maze_gen`] carves a perfect maze over the masked cells
//! - [`path`] finds the shortest route between two cells
//!
//! The crate is no_std compatible (it only needs `alloc`), so it can be
//! embedded anywhere a grid fits in memory.

#![no_std]

extern crate alloc;

pub mod direction;
pub mod mask;
pub mod maze_gen;
pub mod path;
pub mod rng;

// Re-export commonly used types for convenience
pub use direction::Direction;
pub use mask::{build_mask, is_inside_heart, HeartMask};
pub use maze_gen::{generate_maze, Cell, Maze};
pub use path::{find_path, path_to_moves, verify_moves};
pub use rng::SimpleLCG;

/// Smallest grid that still yields distinct start and goal cells
pub const MIN_GRID_SIZE: usize = 5;

/// Largest grid accepted by the session layer
pub const MAX_GRID_SIZE: usize = 64;

/// A cell coordinate, `x` grows to the right and `y` grows downward
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Position {
    pub x: usize,
    pub y: usize,
}

impl Position {
    pub const fn new(x: usize, y: usize) -> Self {
        Self { x, y }
    }

    /// Neighbor one step in `dir`, or `None` when it would leave a
    /// `size` × `size` grid
    pub fn step(self, dir: Direction, size: usize) -> Option<Position> {
        let (dx, dy) = dir.delta();
        let nx = self.x.checked_add_signed(dx)?;
        let ny = self.y.checked_add_signed(dy)?;
        if nx < size && ny < size {
            Some(Position::new(nx, ny))
        } else {
            None
        }
    }

    /// Row-major index into a `size` × `size` grid
    pub(crate) fn index(self, size: usize) -> usize {
        self.y * size + self.x
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_step_in_bounds() {
        let pos = Position::new(3, 3);
        assert_eq!(pos.step(Direction::North, 5), Some(Position::new(3, 2)));
        assert_eq!(pos.step(Direction::East, 5), Some(Position::new(4, 3)));
        assert_eq!(pos.step(Direction::South, 5), Some(Position::new(3, 4)));
        assert_eq!(pos.step(Direction::West, 5), Some(Position::new(2, 3)));
    }

    #[test]
    fn test_step_off_grid() {
        assert_eq!(Position::new(0, 0).step(Direction::North, 5), None);
        assert_eq!(Position::new(0, 0).step(Direction::West, 5), None);
        assert_eq!(Position::new(4, 4).step(Direction::East, 5), None);
        assert_eq!(Position::new(4, 4).step(Direction::South, 5), None);
    }

    #[test]
    fn test_constants() {
        assert!(MIN_GRID_SIZE < MAX_GRID_SIZE);
    }
}
