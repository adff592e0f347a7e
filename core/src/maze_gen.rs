//! Maze generation using the Recursive Backtracker algorithm
//!
//! Algorithm: Recursive Backtracker (DFS with an explicit stack)
//! 1. Mark the start cell visited and push it
//! 2. While the stack is not empty:
//!    - Peek the top cell and collect its unvisited neighbors inside the mask
//!    - If neighbors exist:
//!      * Choose one uniformly at random
//!      * Remove the wall between the two cells
//!      * Mark the neighbor visited, push it
//!    - Else: backtrack (pop)
//!
//! Walls are only ever removed, so the carved passages form a spanning tree
//! over every mask cell reachable from the start.

use alloc::collections::VecDeque;
use alloc::vec;
use alloc::vec::Vec;

use crate::direction::Direction;
use crate::mask::HeartMask;
use crate::rng::SimpleLCG;
use crate::Position;

/// A cell in the maze with walls in four directions
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Cell {
    /// `[NORTH, EAST, SOUTH, WEST]`, `true` means no passage
    pub walls: [bool; 4],
    /// DFS bookkeeping, meaningless once generation is over
    pub visited: bool,
    pub in_mask: bool,
}

impl Cell {
    fn new(in_mask: bool) -> Self {
        Self {
            walls: [true; 4], // All walls present initially
            visited: false,
            in_mask,
        }
    }

    pub fn has_wall(&self, dir: Direction) -> bool {
        self.walls[dir.index()]
    }
}

/// Square grid of cells annotated with wall flags
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Maze {
    cells: Vec<Cell>, // row-major
    size: usize,
}

impl Maze {
    /// Fully walled maze over `mask`, nothing carved yet
    pub fn new(mask: &HeartMask) -> Self {
        let size = mask.size();
        let mut cells = Vec::with_capacity(size * size);
        for y in 0..size {
            for x in 0..size {
                cells.push(Cell::new(mask.contains(Position::new(x, y))));
            }
        }
        Self { cells, size }
    }

    /// Carve a perfect maze over `mask` starting from `start`
    ///
    /// `start` must be inside the mask. If it is not, the maze comes back
    /// fully walled.
    pub fn generate(mask: &HeartMask, start: Position, rng: &mut SimpleLCG) -> Self {
        let mut maze = Self::new(mask);
        debug_assert!(
            maze.is_open_cell(start),
            "generation start ({}, {}) is outside the mask",
            start.x,
            start.y
        );
        if maze.is_open_cell(start) {
            maze.recursive_backtracker(start, rng);
        }
        maze
    }

    pub fn size(&self) -> usize {
        self.size
    }

    /// Cell at `pos`, `None` when off the grid
    pub fn cell(&self, pos: Position) -> Option<&Cell> {
        if pos.x < self.size && pos.y < self.size {
            Some(&self.cells[pos.index(self.size)])
        } else {
            None
        }
    }

    /// Whether `pos` is on the grid and inside the mask
    pub fn is_open_cell(&self, pos: Position) -> bool {
        self.cell(pos).is_some_and(|cell| cell.in_mask)
    }

    /// Whether a player standing on `pos` may step in `dir`
    ///
    /// The source must be a mask cell with no wall on that side and the
    /// destination must be on the grid and inside the mask.
    pub fn can_move(&self, pos: Position, dir: Direction) -> bool {
        self.passage(pos, dir).is_some()
    }

    /// Destination of an open passage out of `pos`
    pub(crate) fn passage(&self, pos: Position, dir: Direction) -> Option<Position> {
        let cell = self.cell(pos)?;
        if !cell.in_mask || cell.has_wall(dir) {
            return None;
        }
        let next = pos.step(dir, self.size)?;
        if self.is_open_cell(next) {
            Some(next)
        } else {
            None
        }
    }

    fn cell_mut(&mut self, pos: Position) -> &mut Cell {
        let size = self.size;
        &mut self.cells[pos.index(size)]
    }

    /// Iterative backtracker, the stack can grow to every mask cell
    fn recursive_backtracker(&mut self, start: Position, rng: &mut SimpleLCG) {
        let mut stack = Vec::with_capacity(self.cells.len());

        self.cell_mut(start).visited = true;
        stack.push(start);

        while let Some(&current) = stack.last() {
            let (neighbors, neighbor_count) = self.get_unvisited_neighbors(current);

            if neighbor_count > 0 {
                let (dir, next) = neighbors[rng.choice_index(neighbor_count)];

                // Remove walls between current cell and neighbor
                self.cell_mut(current).walls[dir.index()] = false;
                self.cell_mut(next).walls[dir.opposite().index()] = false;

                self.cell_mut(next).visited = true;
                stack.push(next);
            } else {
                stack.pop();
            }
        }
    }

    /// Unvisited mask neighbors of `pos` in North, East, South, West order
    ///
    /// Returns a fixed array with a count (max 4 neighbors).
    fn get_unvisited_neighbors(&self, pos: Position) -> ([(Direction, Position); 4], usize) {
        let mut neighbors = [(Direction::North, pos); 4];
        let mut count = 0;

        for dir in Direction::ALL {
            if let Some(next) = pos.step(dir, self.size) {
                let cell = &self.cells[next.index(self.size)];
                if cell.in_mask && !cell.visited {
                    neighbors[count] = (dir, next);
                    count += 1;
                }
            }
        }

        (neighbors, count)
    }

    /// Number of carved passages, each shared edge counted once
    pub fn open_edge_count(&self) -> usize {
        let mut count = 0;
        for y in 0..self.size {
            for x in 0..self.size {
                let pos = Position::new(x, y);
                // East and south cover every edge exactly once
                for dir in [Direction::East, Direction::South] {
                    if self.can_move(pos, dir) {
                        count += 1;
                    }
                }
            }
        }
        count
    }

    /// Number of mask cells reachable from `from` through open walls
    ///
    /// Less than the mask size means the heart was disconnected and part
    /// of it stayed walled off.
    pub fn reachable_count(&self, from: Position) -> usize {
        if !self.is_open_cell(from) {
            return 0;
        }
        let mut seen = vec![false; self.cells.len()];
        let mut queue = VecDeque::new();
        seen[from.index(self.size)] = true;
        queue.push_back(from);
        let mut count = 0;

        while let Some(pos) = queue.pop_front() {
            count += 1;
            for dir in Direction::ALL {
                if let Some(next) = self.passage(pos, dir) {
                    let idx = next.index(self.size);
                    if !seen[idx] {
                        seen[idx] = true;
                        queue.push_back(next);
                    }
                }
            }
        }
        count
    }

    /// Convert maze to binary grid representation
    ///
    /// Creates a grid where:
    /// - 0 = wall or outside the heart
    /// - 1 = path (mask cell or open passage)
    ///
    /// For a maze of N × N cells:
    /// - Grid size is (N*2 + 1) × (N*2 + 1)
    /// - Cell centers are at (y*2+1, x*2+1), indexed `[row][col]`
    pub fn to_binary_grid(&self) -> Vec<Vec<u8>> {
        let grid_size = self.size * 2 + 1;
        let mut grid = vec![vec![0u8; grid_size]; grid_size];

        for y in 0..self.size {
            for x in 0..self.size {
                let pos = Position::new(x, y);
                if !self.is_open_cell(pos) {
                    continue;
                }

                let gr = y * 2 + 1;
                let gc = x * 2 + 1;
                grid[gr][gc] = 1;

                if self.can_move(pos, Direction::North) {
                    grid[gr - 1][gc] = 1;
                }
                if self.can_move(pos, Direction::South) {
                    grid[gr + 1][gc] = 1;
                }
                if self.can_move(pos, Direction::East) {
                    grid[gr][gc + 1] = 1;
                }
                if self.can_move(pos, Direction::West) {
                    grid[gr][gc - 1] = 1;
                }
            }
        }

        grid
    }
}

/// Build a maze over `mask` from `start` with a fresh generator seeded by `seed`
pub fn generate_maze(mask: &HeartMask, start: Position, seed: u32) -> Maze {
    let mut rng = SimpleLCG::new(seed);
    Maze::generate(mask, start, &mut rng)
}
