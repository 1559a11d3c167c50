//! The robot maze: the student writes a short program of moves and turns that walks a
//! robot from its start to the target without hitting a wall. A lesson may hold several
//! mazes; solving enough of them completes the exercise.

use array2d::Array2D;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::config::null_as_empty;
use crate::{Completion, Score};

/// Program length allowed when a maze sets none.
pub const DEFAULT_MAX_COMMANDS: usize = 20;

/// The way the robot faces.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Heading {
    /// Toward row 0.
    Up,
    /// Toward the last row.
    Down,
    /// Toward column 0.
    Left,
    /// Toward the last column.
    #[default]
    Right,
}

impl Heading {
    /// A quarter turn counterclockwise.
    pub fn turn_left(self) -> Self {
        match self {
            Heading::Up => Heading::Left,
            Heading::Left => Heading::Down,
            Heading::Down => Heading::Right,
            Heading::Right => Heading::Up,
        }
    }

    /// A quarter turn clockwise.
    pub fn turn_right(self) -> Self {
        match self {
            Heading::Up => Heading::Right,
            Heading::Right => Heading::Down,
            Heading::Down => Heading::Left,
            Heading::Left => Heading::Up,
        }
    }
}

/// One square of a maze. Only walls block the robot; the other kinds are for display.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tile {
    /// Open floor.
    #[default]
    Empty,
    /// Blocks the robot.
    Wall,
    /// Where the robot starts.
    Start,
    /// Where the robot should go.
    Target,
    /// Drawn under the robot.
    Robot,
}

/// A program instruction.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Command {
    /// One square ahead.
    Forward,
    /// Turn without moving.
    TurnLeft,
    /// Turn without moving.
    TurnRight,
}

impl Command {
    /// Every command.
    pub const ALL: [Command; 3] = [Command::Forward, Command::TurnLeft, Command::TurnRight];
}

/// A square of a maze.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Point {
    /// Row, from the top.
    #[serde(default)]
    pub row: usize,

    /// Column, from the left.
    #[serde(default)]
    pub col: usize,
}

impl Point {
    /// Creates a point.
    pub fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }
}

/// Where the robot is and which way it faces.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Robot {
    /// The robot's square.
    pub position: Point,

    /// The way it faces.
    pub heading: Heading,
}

/// One maze as configured.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Maze {
    /// Rows of tiles. Short rows are padded with walls.
    #[serde(deserialize_with = "null_as_empty")]
    pub grid: Vec<Vec<Tile>>,

    /// Where the robot starts.
    pub start_position: Point,

    /// Which way the robot starts facing.
    pub start_direction: Heading,

    /// The square to reach.
    pub target_position: Point,

    /// Commands offered to the student; all of them when unset.
    pub available_commands: Option<Vec<Command>>,

    /// Longest program allowed; [`DEFAULT_MAX_COMMANDS`] when unset or zero.
    pub max_commands: Option<usize>,
}

impl Maze {
    /// Builds a maze from text rows: `#` is a wall, `S` the start, `T` the target, anything
    /// else open floor.
    pub fn from_rows(rows: &[&str], heading: Heading, max_commands: usize) -> Self {
        let mut maze = Maze {
            start_direction: heading,
            max_commands: Some(max_commands),
            ..Maze::default()
        };

        for (row, text) in rows.iter().enumerate() {
            let tiles = text
                .chars()
                .enumerate()
                .map(|(col, ch)| match ch {
                    '#' => Tile::Wall,
                    'S' => {
                        maze.start_position = Point::new(row, col);
                        Tile::Start
                    }
                    'T' => {
                        maze.target_position = Point::new(row, col);
                        Tile::Target
                    }
                    _ => Tile::Empty,
                })
                .collect();
            maze.grid.push(tiles);
        }

        maze
    }

    fn robot(&self) -> Robot {
        Robot {
            position: self.start_position,
            heading: self.start_direction,
        }
    }
}

/// The three mazes used when a lesson configures none.
pub fn default_mazes() -> Vec<Maze> {
    vec![
        Maze::from_rows(&["..T", "##.", "S.."], Heading::Right, 10),
        Maze::from_rows(&[".#T", ".#.", "S.."], Heading::Up, 8),
        Maze::from_rows(
            &["S...", "###.", "....", ".###", "...T"],
            Heading::Right,
            DEFAULT_MAX_COMMANDS,
        ),
    ]
}

/// Configuration of a maze exercise.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MazeConfig {
    /// The mazes, in order. The built-in mazes are used when empty.
    #[serde(deserialize_with = "null_as_empty")]
    pub mazes: Vec<Maze>,

    /// How many mazes must be solved; all of them when unset or zero.
    pub required_completed: Option<usize>,
}

/// How a run ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MazeOutcome {
    /// The robot ended on the target.
    Reached,
    /// A forward move would have left the maze or hit a wall.
    Crashed,
    /// The program ran out somewhere else.
    Stopped,
}

/// The result of running a program: the robot after each executed command, for the host to
/// animate, and how it ended.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MazeRun {
    /// Robot states after each command that was carried out.
    pub trace: Vec<Robot>,

    /// How the run ended.
    pub outcome: MazeOutcome,
}

#[derive(Clone, Debug)]
struct Track {
    maze: Maze,
    tiles: Array2D<Tile>,
    commands: Vec<Command>,
    max_commands: usize,
}

impl Track {
    fn new(maze: Maze) -> Self {
        let num_rows = maze.grid.len();
        let num_columns = maze.grid.iter().map(Vec::len).max().unwrap_or(0);
        let mut index = 0;

        let tiles = Array2D::filled_by_row_major(
            || {
                let tile = maze
                    .grid
                    .get(index / num_columns)
                    .and_then(|row| row.get(index % num_columns))
                    .copied()
                    .unwrap_or(Tile::Wall);
                index += 1;
                tile
            },
            num_rows,
            num_columns,
        );

        Self {
            commands: maze
                .available_commands
                .clone()
                .unwrap_or_else(|| Command::ALL.to_vec()),
            max_commands: maze
                .max_commands
                .filter(|&max| max > 0)
                .unwrap_or(DEFAULT_MAX_COMMANDS),
            tiles,
            maze,
        }
    }

    fn forward(&self, robot: Robot) -> Option<Point> {
        let Point { row, col } = robot.position;
        let (row, col) = match robot.heading {
            Heading::Up => (row.checked_sub(1)?, col),
            Heading::Down => (row.checked_add(1)?, col),
            Heading::Left => (row, col.checked_sub(1)?),
            Heading::Right => (row, col.checked_add(1)?),
        };

        match self.tiles.get(row, col)? {
            Tile::Wall => None,
            _ => Some(Point::new(row, col)),
        }
    }
}

/// A maze exercise being played.
#[derive(Clone, Debug)]
pub struct MazeExercise {
    tracks: Vec<Track>,
    required: usize,
    current: usize,
    program: Vec<Command>,
    robot: Robot,
    solved: Vec<bool>,
    last_run: Option<MazeOutcome>,
    completion: Option<Completion>,
}

impl Default for MazeExercise {
    fn default() -> Self {
        Self::new(MazeConfig::default())
    }
}

impl MazeExercise {
    /// Sets the exercise up on its first maze.
    pub fn new(config: MazeConfig) -> Self {
        let mazes = if config.mazes.is_empty() {
            default_mazes()
        } else {
            config.mazes
        };
        let tracks: Vec<Track> = mazes.into_iter().map(Track::new).collect();
        let required = config
            .required_completed
            .filter(|&required| required > 0)
            .map_or(tracks.len(), |required| required.min(tracks.len()));

        let robot = tracks[0].maze.robot();
        Self {
            solved: vec![false; tracks.len()],
            tracks,
            required,
            current: 0,
            program: Vec::new(),
            robot,
            last_run: None,
            completion: None,
        }
    }

    fn track(&self) -> &Track {
        &self.tracks[self.current]
    }

    /// How many mazes there are.
    pub fn maze_count(&self) -> usize {
        self.tracks.len()
    }

    /// The index of the maze on screen.
    pub fn current(&self) -> usize {
        self.current
    }

    /// The maze on screen.
    pub fn maze(&self) -> &Maze {
        &self.track().maze
    }

    /// The tile at a square of the current maze, [`None`] outside it.
    pub fn tile(&self, row: usize, col: usize) -> Option<Tile> {
        self.track().tiles.get(row, col).copied()
    }

    /// Rows of the current maze.
    pub fn num_rows(&self) -> usize {
        self.track().tiles.num_rows()
    }

    /// Columns of the current maze.
    pub fn num_columns(&self) -> usize {
        self.track().tiles.num_columns()
    }

    /// Where the robot stands now.
    pub fn robot(&self) -> Robot {
        self.robot
    }

    /// The program written so far.
    pub fn program(&self) -> &[Command] {
        &self.program
    }

    /// The commands the current maze offers.
    pub fn available_commands(&self) -> &[Command] {
        &self.track().commands
    }

    /// The longest program the current maze allows.
    pub fn max_commands(&self) -> usize {
        self.track().max_commands
    }

    /// How the last run on this maze ended.
    pub fn last_run(&self) -> Option<MazeOutcome> {
        self.last_run
    }

    /// Whether the maze at `index` was solved.
    pub fn is_solved(&self, index: usize) -> bool {
        self.solved.get(index).copied().unwrap_or(false)
    }

    /// How many mazes were solved.
    pub fn solved_count(&self) -> usize {
        self.solved.iter().filter(|&&solved| solved).count()
    }

    /// How many mazes must be solved.
    pub fn required(&self) -> usize {
        self.required
    }

    /// Solved mazes counted toward the requirement.
    pub fn score(&self) -> Score {
        Score::new(self.solved_count().min(self.required), self.required)
    }

    /// The completion, once enough mazes were solved. Play may go on afterwards.
    pub fn completion(&self) -> Option<Completion> {
        self.completion
    }

    /// Whether the completion was emitted.
    pub fn is_locked(&self) -> bool {
        self.completion.is_some()
    }

    /// Appends a command. Refused when the program is full or the maze does not offer it.
    pub fn push(&mut self, command: Command) -> bool {
        if self.program.len() >= self.max_commands() || !self.available_commands().contains(&command)
        {
            return false;
        }

        self.program.push(command);
        true
    }

    /// Removes the last command.
    pub fn undo(&mut self) -> bool {
        self.program.pop().is_some()
    }

    /// Removes every command and puts the robot back on the start.
    pub fn clear(&mut self) -> bool {
        if self.program.is_empty() {
            return false;
        }

        self.program.clear();
        self.restart();
        true
    }

    fn restart(&mut self) {
        self.robot = self.track().maze.robot();
        self.last_run = None;
    }

    /// Runs the program from the start. A crash stops the robot in front of the obstacle.
    /// Returns [`None`] for an empty program.
    pub fn run(&mut self) -> Option<MazeRun> {
        if self.program.is_empty() {
            return None;
        }

        let track = self.track();
        let mut robot = track.maze.robot();
        let mut trace = Vec::with_capacity(self.program.len());
        let mut crashed = false;

        for &command in &self.program {
            match command {
                Command::TurnLeft => robot.heading = robot.heading.turn_left(),
                Command::TurnRight => robot.heading = robot.heading.turn_right(),
                Command::Forward => match track.forward(robot) {
                    Some(position) => robot.position = position,
                    None => {
                        crashed = true;
                        break;
                    }
                },
            }
            trace.push(robot);
        }

        let outcome = if crashed {
            MazeOutcome::Crashed
        } else if robot.position == track.maze.target_position {
            MazeOutcome::Reached
        } else {
            MazeOutcome::Stopped
        };
        debug!(maze = self.current, steps = trace.len(), ?outcome, "ran maze program");

        self.robot = robot;
        self.last_run = Some(outcome);
        if outcome == MazeOutcome::Reached {
            self.solve();
        }

        Some(MazeRun { trace, outcome })
    }

    fn solve(&mut self) {
        if self.solved[self.current] {
            return;
        }
        self.solved[self.current] = true;
        info!(maze = self.current, solved = self.solved_count(), "maze solved");

        if self.completion.is_none() && self.solved_count() >= self.required {
            self.completion = Some(Score::new(self.required, self.required).into());
            info!(required = self.required, "maze exercise complete");
        }
    }

    /// Moves to the next maze with an empty program.
    pub fn go_next(&mut self) -> bool {
        if self.current + 1 >= self.tracks.len() {
            return false;
        }
        self.go_to(self.current + 1);
        true
    }

    /// Moves to the previous maze with an empty program.
    pub fn go_previous(&mut self) -> bool {
        if self.current == 0 {
            return false;
        }
        self.go_to(self.current - 1);
        true
    }

    fn go_to(&mut self, index: usize) {
        self.current = index;
        self.program.clear();
        self.restart();
    }

    /// Forgets solved mazes and returns to the first one. Unavailable once complete.
    pub fn reset(&mut self) -> bool {
        if self.is_locked() {
            return false;
        }

        self.solved.iter_mut().for_each(|solved| *solved = false);
        self.go_to(0);
        debug!("maze exercise reset");
        true
    }
}
