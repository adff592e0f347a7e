//! Heart-shaped playable region
//!
//! A cell is inside the heart when the implicit curve
//! `(nx² + ny² - 0.8)³ - nx² · ny³` is non-positive at its normalized
//! coordinates. The bottom two rows are always excluded to keep a margin
//! from the grid edge.

use alloc::vec::Vec;

use crate::Position;

/// Classify a single cell of a `size` × `size` grid
pub fn is_inside_heart(x: usize, y: usize, size: usize) -> bool {
    let half = size as f64 / 2.0;
    let nx = (x as f64 - half) / half;
    let ny = (y as f64 - half) / half;

    let r = nx * nx + ny * ny - 0.8;
    let heart = r * r * r - nx * nx * ny * ny * ny;

    heart <= 0.0 && y + 2 < size
}

/// Inside/outside flag for every cell, computed once per game
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HeartMask {
    size: usize,
    inside: Vec<bool>, // row-major
}

impl HeartMask {
    pub fn size(&self) -> usize {
        self.size
    }

    /// Whether `pos` is on the grid and inside the heart
    pub fn contains(&self, pos: Position) -> bool {
        pos.x < self.size && pos.y < self.size && self.inside[pos.index(self.size)]
    }

    /// Number of inside cells
    pub fn count(&self) -> usize {
        self.inside.iter().filter(|&&inside| inside).count()
    }

    /// Iterate over all inside cells in row-major order
    pub fn cells(&self) -> impl Iterator<Item = Position> + '_ {
        let size = self.size;
        self.inside
            .iter()
            .enumerate()
            .filter(|(_, &inside)| inside)
            .map(move |(i, _)| Position::new(i % size, i / size))
    }
}

/// Evaluate the heart curve over the whole grid
pub fn build_mask(size: usize) -> HeartMask {
    let mut inside = Vec::with_capacity(size * size);
    for y in 0..size {
        for x in 0..size {
            inside.push(is_inside_heart(x, y, size));
        }
    }
    HeartMask { size, inside }
}
