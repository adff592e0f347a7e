use std::time::{Duration, Instant};

use heart_maze_core::{
    build_mask, find_path, generate_maze, verify_moves, Direction, HeartMask, Maze, Position, MAX_GRID_SIZE,
    MIN_GRID_SIZE,
};
use serde::{Deserialize, Serialize};

use crate::{Difficulty, CANVAS_PX};

/// Hints available per game
pub const HINT_BUDGET: u32 = 3;

/// Number of solution cells revealed by one hint
pub const HINT_TRAIL_LEN: usize = 5;

/// How long a revealed hint stays visible
pub const HINT_DISPLAY: Duration = Duration::from_secs(2);

/// Fraction of the grid height where the start and goal probes begin
const START_ROW_FRACTION: f64 = 0.15;
const GOAL_ROW_FRACTION: f64 = 0.6;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionError {
    /// Grid size outside `MIN_GRID_SIZE..=MAX_GRID_SIZE`
    InvalidGridSize(usize),
    /// Probing the center column found no heart cell for the start or goal
    NoPlayableCell { size: usize, role: &'static str },
}

impl std::fmt::Display for SessionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SessionError::InvalidGridSize(size) => write!(
                f,
                "Invalid grid size {}: must be between {} and {}",
                size, MIN_GRID_SIZE, MAX_GRID_SIZE
            ),
            SessionError::NoPlayableCell { size, role } => {
                write!(f, "No {} cell inside the heart for grid size {}", role, size)
            }
        }
    }
}

impl std::error::Error for SessionError {}

/// Result of a move attempt
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum MoveOutcome {
    /// Player moved one cell
    Moved,
    /// Player moved onto the goal
    Won,
    /// Wall, grid edge or outside the heart, position unchanged
    Rejected,
    /// The game is already won
    GameOver,
}

/// Result of a hint request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HintOutcome {
    /// Leading cells of the current solution, one hint consumed
    Shown(Vec<Position>),
    Exhausted,
    /// No route to the goal from here
    Unavailable,
    GameOver,
}

/// One heart maze game: maze, positions, counters and clock
///
/// Everything is rebuilt by constructing a new session; nothing about a
/// maze changes after generation except the player position.
#[derive(Debug, Clone)]
pub struct GameSession {
    difficulty: Option<Difficulty>,
    seed: u32,
    maze: Maze,
    player: Position,
    goal: Position,
    moves: u32,
    hints_left: u32,
    solution: Vec<Position>,
    won: bool,
    started_at: Option<Instant>,
    finished_after: Option<Duration>,
    hint_shown_at: Option<Instant>,
}

impl GameSession {
    /// Start a game on a difficulty preset
    pub fn new(difficulty: Difficulty, seed: u32) -> Result<Self, SessionError> {
        Self::build(difficulty.grid_size(), seed, Some(difficulty))
    }

    /// Start a game on a preset with a fresh random seed
    pub fn new_random(difficulty: Difficulty) -> Result<Self, SessionError> {
        Self::new(difficulty, rand::random())
    }

    /// Start a game on a custom grid size
    pub fn with_grid_size(size: usize, seed: u32) -> Result<Self, SessionError> {
        Self::build(size, seed, None)
    }

    fn build(size: usize, seed: u32, difficulty: Option<Difficulty>) -> Result<Self, SessionError> {
        if !(MIN_GRID_SIZE..=MAX_GRID_SIZE).contains(&size) {
            return Err(SessionError::InvalidGridSize(size));
        }

        let mask = build_mask(size);
        let (player, goal) = place_start_and_goal(&mask)?;
        let maze = generate_maze(&mask, player, seed);
        Ok(Self::from_maze(maze, &mask, player, goal, seed, difficulty))
    }

    fn from_maze(
        maze: Maze,
        mask: &HeartMask,
        player: Position,
        goal: Position,
        seed: u32,
        difficulty: Option<Difficulty>,
    ) -> Self {
        let size = maze.size();
        let solution = find_path(&maze, player, goal);

        if solution.is_empty() {
            tracing::warn!(
                "Goal ({}, {}) unreachable for size {} seed {}: {} of {} heart cells connected, hints disabled",
                goal.x,
                goal.y,
                size,
                seed,
                maze.reachable_count(player),
                mask.count()
            );
        }

        tracing::info!(
            "New heart maze: size={} seed={} cells={} start=({}, {}) goal=({}, {}) solution={}",
            size,
            seed,
            mask.count(),
            player.x,
            player.y,
            goal.x,
            goal.y,
            solution.len()
        );

        Self {
            difficulty,
            seed,
            maze,
            player,
            goal,
            moves: 0,
            hints_left: HINT_BUDGET,
            solution,
            won: false,
            started_at: None,
            finished_after: None,
            hint_shown_at: None,
        }
    }

    pub fn difficulty(&self) -> Option<Difficulty> {
        self.difficulty
    }

    pub fn seed(&self) -> u32 {
        self.seed
    }

    pub fn size(&self) -> usize {
        self.maze.size()
    }

    /// Drawn cell size in pixels
    pub fn cell_size(&self) -> usize {
        match self.difficulty {
            Some(difficulty) => difficulty.cell_size(),
            None => CANVAS_PX / self.size(),
        }
    }

    pub fn maze(&self) -> &Maze {
        &self.maze
    }

    pub fn player(&self) -> Position {
        self.player
    }

    pub fn goal(&self) -> Position {
        self.goal
    }

    pub fn moves(&self) -> u32 {
        self.moves
    }

    pub fn hints_left(&self) -> u32 {
        self.hints_left
    }

    /// Current route to the goal, empty when there is none
    pub fn solution(&self) -> &[Position] {
        &self.solution
    }

    pub fn is_won(&self) -> bool {
        self.won
    }

    /// Attempt to move the player one cell
    ///
    /// The first attempt starts the clock, and every attempt hides a
    /// visible hint even when the move itself is rejected.
    pub fn try_move(&mut self, dir: Direction) -> MoveOutcome {
        if self.won {
            return MoveOutcome::GameOver;
        }

        self.started_at.get_or_insert_with(Instant::now);
        self.hint_shown_at = None;

        let next = match self.player.step(dir, self.size()) {
            Some(next) if self.maze.can_move(self.player, dir) => next,
            _ => {
                tracing::debug!("Rejected move {} from ({}, {})", dir, self.player.x, self.player.y);
                return MoveOutcome::Rejected;
            }
        };

        self.player = next;
        self.moves += 1;
        self.solution = find_path(&self.maze, self.player, self.goal);

        if self.player == self.goal {
            self.won = true;
            let elapsed = self.elapsed();
            self.finished_after = Some(elapsed);
            tracing::info!(
                "Heart reached in {} moves and {} (seed {})",
                self.moves,
                format_elapsed(elapsed),
                self.seed
            );
            MoveOutcome::Won
        } else {
            MoveOutcome::Moved
        }
    }

    /// Play `moves` in order, stopping at the win or at the first rejected move
    ///
    /// Returns `Won` once the goal is reached, `Rejected` when a move was
    /// blocked (the player stays on the cell before it) and `Moved` when the
    /// list ran out first.
    pub fn replay(&mut self, moves: &[Direction]) -> MoveOutcome {
        if self.won {
            return MoveOutcome::GameOver;
        }
        for &dir in moves {
            match self.try_move(dir) {
                MoveOutcome::Moved => {}
                outcome => return outcome,
            }
        }
        MoveOutcome::Moved
    }

    /// Reveal the next few cells of the solution
    pub fn request_hint(&mut self) -> HintOutcome {
        if self.won {
            return HintOutcome::GameOver;
        }
        if self.hints_left == 0 {
            return HintOutcome::Exhausted;
        }
        if self.solution.is_empty() {
            return HintOutcome::Unavailable;
        }

        self.hints_left -= 1;
        self.hint_shown_at = Some(Instant::now());
        tracing::debug!("Hint shown, {} left", self.hints_left);

        HintOutcome::Shown(self.hint_cells().to_vec())
    }

    /// Hint cells while a hint is on screen
    pub fn visible_hint(&self) -> Option<&[Position]> {
        match self.hint_shown_at {
            Some(shown) if shown.elapsed() < HINT_DISPLAY && !self.solution.is_empty() => Some(self.hint_cells()),
            _ => None,
        }
    }

    fn hint_cells(&self) -> &[Position] {
        &self.solution[..self.solution.len().min(HINT_TRAIL_LEN)]
    }

    /// Time played so far, zero before the first move and frozen once won
    pub fn elapsed(&self) -> Duration {
        match (self.finished_after, self.started_at) {
            (Some(finished), _) => finished,
            (None, Some(started)) => started.elapsed(),
            (None, None) => Duration::ZERO,
        }
    }

    /// Replay a move list from the start cell against this maze
    pub fn verify_moves(&self, moves: &[Direction]) -> bool {
        let start = self.start();
        verify_moves(&self.maze, start, self.goal, moves)
    }

    /// Cell the player started on
    pub fn start(&self) -> Position {
        // Placement is a pure function of the mask, so re-probe it
        start_probe(self.size(), |pos| self.maze.is_open_cell(pos)).unwrap_or(self.player)
    }

    /// Serializable view of the session
    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            difficulty: self.difficulty,
            size: self.size(),
            cell_size: self.cell_size(),
            seed: self.seed,
            player: self.player,
            goal: self.goal,
            moves: self.moves,
            hints_left: self.hints_left,
            won: self.won,
            elapsed_secs: self.elapsed().as_secs(),
            hint: self.visible_hint().map(<[Position]>::to_vec),
            grid: self.maze.to_binary_grid(),
        }
    }
}

/// Wire view of a session
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SessionSnapshot {
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub difficulty: Option<Difficulty>,
    pub size: usize,
    pub cell_size: usize,
    pub seed: u32,
    pub player: Position,
    pub goal: Position,
    pub moves: u32,
    pub hints_left: u32,
    pub won: bool,
    pub elapsed_secs: u64,
    /// Hint trail while it is visible
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub hint: Option<Vec<Position>>,
    /// `(2N+1)²` grid, 0=wall, 1=path
    pub grid: Vec<Vec<u8>>,
}

/// Render a duration as `m:ss`
pub fn format_elapsed(elapsed: Duration) -> String {
    let secs = elapsed.as_secs();
    format!("{}:{:02}", secs / 60, secs % 60)
}

/// Center column, probing down from near the top for the start and up
/// from below the middle for the goal
fn place_start_and_goal(mask: &HeartMask) -> Result<(Position, Position), SessionError> {
    let size = mask.size();
    let start = start_probe(size, |pos| mask.contains(pos))
        .ok_or(SessionError::NoPlayableCell { size, role: "start" })?;
    let goal = goal_probe(size, |pos| mask.contains(pos))
        .ok_or(SessionError::NoPlayableCell { size, role: "goal" })?;
    Ok((start, goal))
}

fn start_probe(size: usize, inside: impl Fn(Position) -> bool) -> Option<Position> {
    let x = size / 2;
    let first = (size as f64 * START_ROW_FRACTION).floor() as usize;
    (first..size).map(|y| Position::new(x, y)).find(|&pos| inside(pos))
}

fn goal_probe(size: usize, inside: impl Fn(Position) -> bool) -> Option<Position> {
    let x = size / 2;
    let first = (size as f64 * GOAL_ROW_FRACTION).floor() as usize;
    (0..=first.min(size - 1)).rev().map(|y| Position::new(x, y)).find(|&pos| inside(pos))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn easy(seed: u32) -> GameSession {
        GameSession::new(Difficulty::Easy, seed).unwrap()
    }

    /// An easy game whose start cell has its east wall closed
    fn easy_with_east_wall() -> GameSession {
        (1..)
            .map(easy)
            .find(|session| {
                let cell = session.maze().cell(session.player()).unwrap();
                cell.has_wall(Direction::East)
            })
            .unwrap()
    }

    #[test]
    fn test_placement_per_preset() {
        let expected = [
            (Difficulty::Easy, Position::new(10, 3), Position::new(10, 12)),
            (Difficulty::Medium, Position::new(15, 4), Position::new(15, 18)),
            (Difficulty::Hard, Position::new(20, 6), Position::new(20, 24)),
        ];
        for (difficulty, start, goal) in expected {
            let session = GameSession::new(difficulty, 1).unwrap();
            assert_eq!(session.player(), start);
            assert_eq!(session.start(), start);
            assert_eq!(session.goal(), goal);
            assert_eq!(session.size(), difficulty.grid_size());
        }
    }

    #[test]
    fn test_initial_state() {
        let session = easy(2918957128);

        assert_eq!(session.moves(), 0);
        assert_eq!(session.hints_left(), HINT_BUDGET);
        assert!(!session.is_won());
        assert_eq!(session.elapsed(), Duration::ZERO);
        assert!(session.visible_hint().is_none());
        assert!(!session.solution().is_empty());
        assert_eq!(*session.solution().last().unwrap(), session.goal());
    }

    #[test]
    fn test_invalid_grid_size() {
        assert_eq!(
            GameSession::with_grid_size(3, 1).unwrap_err(),
            SessionError::InvalidGridSize(3)
        );
        assert!(GameSession::with_grid_size(MAX_GRID_SIZE + 1, 1).is_err());
        assert!(GameSession::with_grid_size(MIN_GRID_SIZE, 1).is_ok());
    }

    #[test]
    fn test_custom_size_cell_size() {
        let session = GameSession::with_grid_size(24, 9).unwrap();
        assert_eq!(session.difficulty(), None);
        assert_eq!(session.cell_size(), 25);
    }

    #[test]
    fn test_walled_move_is_rejected() {
        let mut session = easy_with_east_wall();
        let before = session.player();

        assert_eq!(session.try_move(Direction::East), MoveOutcome::Rejected);
        assert_eq!(session.player(), before);
        assert_eq!(session.moves(), 0);
    }

    #[test]
    fn test_following_solution_wins() {
        let mut session = easy(2918957128);
        let moves = heart_maze_core::path_to_moves(session.player(), session.solution());

        let (last, rest) = moves.split_last().unwrap();
        for &dir in rest {
            assert_eq!(session.try_move(dir), MoveOutcome::Moved);
        }
        assert_eq!(session.try_move(*last), MoveOutcome::Won);

        assert!(session.is_won());
        assert_eq!(session.player(), session.goal());
        assert_eq!(session.moves() as usize, moves.len());
        assert!(session.solution().is_empty());
        assert_eq!(session.try_move(Direction::North), MoveOutcome::GameOver);
        assert_eq!(session.request_hint(), HintOutcome::GameOver);

        // Clock is frozen after the win
        let frozen = session.elapsed();
        assert_eq!(session.elapsed(), frozen);
    }

    #[test]
    fn test_solution_recomputed_after_move() {
        let mut session = easy(777);
        let first_step = session.solution()[0];
        let dir = heart_maze_core::path_to_moves(session.player(), &[first_step])[0];

        let before = session.solution().len();
        session.try_move(dir);
        assert_eq!(session.player(), first_step);
        assert_eq!(session.solution().len(), before - 1);
    }

    #[test]
    fn test_hint_budget() {
        let mut session = easy(4242);

        for remaining in (0..HINT_BUDGET).rev() {
            match session.request_hint() {
                HintOutcome::Shown(trail) => {
                    assert_eq!(trail.len(), session.solution().len().min(HINT_TRAIL_LEN));
                    assert_eq!(trail[..], session.solution()[..trail.len()]);
                }
                other => panic!("expected a hint, got {:?}", other),
            }
            assert_eq!(session.hints_left(), remaining);
        }
        assert_eq!(session.request_hint(), HintOutcome::Exhausted);
    }

    #[test]
    fn test_move_attempt_hides_hint() {
        let mut session = easy_with_east_wall();
        session.request_hint();
        assert!(session.visible_hint().is_some());
        assert!(session.snapshot().hint.is_some());

        // Even a rejected attempt clears the hint and starts the clock
        assert_eq!(session.try_move(Direction::East), MoveOutcome::Rejected);
        assert!(session.visible_hint().is_none());
        assert_eq!(session.hints_left(), HINT_BUDGET - 1);
        std::thread::sleep(Duration::from_millis(5));
        assert!(session.elapsed() > Duration::ZERO);
    }

    #[test]
    fn test_hint_expires_after_display_time() {
        let mut session = easy(4242);
        assert!(matches!(session.request_hint(), HintOutcome::Shown(_)));
        assert!(session.visible_hint().is_some());

        session.hint_shown_at = Instant::now().checked_sub(HINT_DISPLAY);
        assert!(session.visible_hint().is_none());
        assert!(session.snapshot().hint.is_none());
        assert_eq!(session.hints_left(), HINT_BUDGET - 1);
    }

    #[test]
    fn test_unreachable_goal_disables_hints() {
        let mask = build_mask(20);
        let (start, goal) = place_start_and_goal(&mask).unwrap();
        let mut session = GameSession::from_maze(Maze::new(&mask), &mask, start, goal, 1, Some(Difficulty::Easy));

        assert!(session.solution().is_empty());
        assert_eq!(session.request_hint(), HintOutcome::Unavailable);
        assert_eq!(session.hints_left(), HINT_BUDGET);
        assert!(session.visible_hint().is_none());
        assert_eq!(session.try_move(Direction::South), MoveOutcome::Rejected);
    }

    #[test]
    fn test_replay_stops_at_first_rejected_move() {
        let mut session = easy_with_east_wall();
        let start = session.player();
        let mut moves = vec![Direction::East];
        moves.extend(heart_maze_core::path_to_moves(start, session.solution()));

        assert!(!session.verify_moves(&moves));
        assert_eq!(session.replay(&moves), MoveOutcome::Rejected);
        assert_eq!(session.player(), start);
        assert_eq!(session.moves(), 0);
        assert!(!session.is_won());
    }

    #[test]
    fn test_replay_reaches_goal() {
        let mut session = easy(31337);
        let mut moves = heart_maze_core::path_to_moves(session.player(), session.solution());
        let route_len = moves.len();
        moves.push(Direction::North);

        assert_eq!(session.replay(&moves), MoveOutcome::Won);
        assert_eq!(session.moves() as usize, route_len);
        assert_eq!(session.replay(&moves), MoveOutcome::GameOver);
    }

    #[test]
    fn test_replay_running_out_of_moves() {
        let mut session = easy(31337);
        let moves = heart_maze_core::path_to_moves(session.player(), session.solution());

        assert_eq!(session.replay(&moves[..1]), MoveOutcome::Moved);
        assert_eq!(session.moves(), 1);
        assert!(!session.is_won());
    }

    #[test]
    fn test_verify_moves_from_start() {
        let session = easy(31337);
        let moves = heart_maze_core::path_to_moves(session.player(), session.solution());

        assert!(session.verify_moves(&moves));
        assert!(!session.verify_moves(&moves[1..]));
    }

    #[test]
    fn test_snapshot_serializes() {
        let session = easy(5);
        let snapshot = session.snapshot();

        assert_eq!(snapshot.grid.len(), 41);
        assert_eq!(snapshot.difficulty, Some(Difficulty::Easy));

        let json = serde_json::to_string(&snapshot).unwrap();
        assert!(json.contains("\"difficulty\":\"easy\""));
        assert!(!json.contains("\"hint\""));
        let parsed: SessionSnapshot = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, snapshot);
    }

    #[test]
    fn test_format_elapsed() {
        assert_eq!(format_elapsed(Duration::ZERO), "0:00");
        assert_eq!(format_elapsed(Duration::from_secs(65)), "1:05");
        assert_eq!(format_elapsed(Duration::from_secs(600)), "10:00");
    }

    #[test]
    fn test_same_seed_same_maze() {
        assert_eq!(easy(99).maze(), easy(99).maze());
    }
}
