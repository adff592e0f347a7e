//! Shortest paths and move replay over a carved maze
//!
//! [`find_path`] runs a breadth-first search across open walls. In a
//! perfect maze the route between two cells is unique, so BFS returns it
//! directly; on a graph with cycles ties are broken by discovery order
//! (North, East, South, West).

use alloc::collections::VecDeque;
use alloc::vec;
use alloc::vec::Vec;

use crate::direction::Direction;
use crate::maze_gen::Maze;
use crate::Position;

/// Shortest route from `start` to `goal`
///
/// The returned cells exclude `start` and end with `goal`. The result is
/// empty when the goal cannot be reached, when either endpoint is off the
/// grid or outside the mask, and when `start == goal`.
pub fn find_path(maze: &Maze, start: Position, goal: Position) -> Vec<Position> {
    if !maze.is_open_cell(start) || !maze.is_open_cell(goal) {
        return Vec::new();
    }

    let size = maze.size();
    // parent[i] is the cell we came from, the start points at itself
    let mut parent: Vec<Option<Position>> = vec![None; size * size];
    let mut queue = VecDeque::new();
    parent[start.index(size)] = Some(start);
    queue.push_back(start);

    while let Some(pos) = queue.pop_front() {
        if pos == goal {
            return reconstruct(&parent, start, goal, size);
        }

        for dir in Direction::ALL {
            if let Some(next) = maze.passage(pos, dir) {
                let slot = &mut parent[next.index(size)];
                if slot.is_none() {
                    *slot = Some(pos);
                    queue.push_back(next);
                }
            }
        }
    }

    Vec::new()
}

fn reconstruct(parent: &[Option<Position>], start: Position, goal: Position, size: usize) -> Vec<Position> {
    let mut path = Vec::new();
    let mut current = goal;
    while current != start {
        path.push(current);
        match parent[current.index(size)] {
            Some(prev) => current = prev,
            None => return Vec::new(),
        }
    }
    path.reverse();
    path
}

/// Directions that walk `path` from `start`
///
/// Stops at the first pair of cells that are not orthogonal neighbors.
pub fn path_to_moves(start: Position, path: &[Position]) -> Vec<Direction> {
    let mut moves = Vec::with_capacity(path.len());
    let mut current = start;
    for &next in path {
        let dir = Direction::ALL.into_iter().find(|&dir| {
            let (dx, dy) = dir.delta();
            current.x.checked_add_signed(dx) == Some(next.x) && current.y.checked_add_signed(dy) == Some(next.y)
        });
        match dir {
            Some(dir) => moves.push(dir),
            None => break,
        }
        current = next;
    }
    moves
}

/// Replay `moves` from `start` and report whether the goal is reached
///
/// Any move through a wall, off the grid or out of the heart fails the
/// whole replay. Moves after the goal has been reached are ignored.
pub fn verify_moves(maze: &Maze, start: Position, goal: Position, moves: &[Direction]) -> bool {
    if !maze.is_open_cell(start) {
        return false;
    }

    let mut current = start;
    for &dir in moves {
        if current == goal {
            break;
        }
        match maze.passage(current, dir) {
            Some(next) => current = next,
            None => return false,
        }
    }

    current == goal
}
