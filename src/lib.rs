#![warn(missing_docs)]

//! # Lesson exercises
//!
//! The interactive exercise engine of a programming course for children: crosswords,
//! placement exercises (matching, gap-fill, sorting, category sorting), program and
//! password exercises, robot mazes, online-safety quizzes, and a carousel that runs a
//! lesson's exercises in sequence and adds up their scores.
//!
//! Everything is synchronous, single-session state. Exercises are built from lesson
//! configuration, mutated by discrete input events, and locked once they report their
//! [`Completion`].

use serde::Serialize;

pub mod carousel;
pub mod config;
pub mod crossword;
mod error;
pub mod exercise;
pub mod maze;
pub mod password;
pub mod placement;
pub mod program;
pub mod quiz;
pub mod shuffle;
mod timer;

pub use carousel::{Carousel, CarouselEvent, ExerciseInfo};
pub use config::{ExerciseConfig, ExerciseKind, LessonExercise};
pub use crossword::Crossword;
pub use error::Error;
pub use exercise::Exercise;
pub use placement::{CategorySort, GapFill, Matching, Sorting};

/// How many answers were right, out of how many.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize)]
pub struct Score {
    /// Answers judged correct.
    pub correct: usize,

    /// Answers judged in total.
    pub total: usize,
}

impl Score {
    /// Creates a score of `correct` out of `total`.
    pub fn new(correct: usize, total: usize) -> Self {
        Self { correct, total }
    }

    /// Whether every answer was correct.
    pub fn is_perfect(&self) -> bool {
        self.correct == self.total
    }
}

impl std::ops::Add for Score {
    type Output = Score;

    fn add(self, rhs: Self) -> Self::Output {
        Score::new(self.correct + rhs.correct, self.total + rhs.total)
    }
}

impl std::iter::Sum for Score {
    fn sum<I: Iterator<Item = Score>>(iter: I) -> Self {
        iter.fold(Score::default(), |acc, score| acc + score)
    }
}

/// The one-time signal an exercise emits when it is checked.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub struct Completion {
    /// Whether every answer was correct.
    pub is_correct: bool,

    /// Answers judged correct.
    pub correct: usize,

    /// Answers judged in total.
    pub total: usize,
}

impl Completion {
    /// The score the completion reports.
    pub fn score(&self) -> Score {
        Score::new(self.correct, self.total)
    }
}

impl From<Score> for Completion {
    fn from(score: Score) -> Self {
        Self {
            is_correct: score.is_perfect(),
            correct: score.correct,
            total: score.total,
        }
    }
}

/// Where the host stores finished exercises, keyed by exercise id. The engine never calls
/// this itself; hosts forward each [`Completion`] they receive.
pub trait ProgressRecorder {
    /// The error the store can fail with.
    type Error;

    /// Records `score` out of `max_score` for an exercise.
    fn record(&mut self, exercise_id: &str, score: usize, max_score: usize) -> Result<(), Self::Error>;
}
