//! A single enum over every exercise kind, so a lesson can hold them side by side.

use std::time::Duration;

use crate::config::ExerciseKind;
use crate::crossword::Crossword;
use crate::maze::MazeExercise;
use crate::password::PasswordExercise;
use crate::placement::{CategorySort, GapFill, Matching, Sorting};
use crate::program::{ProgramExercise, ProgramKind};
use crate::quiz::{PhishingQuiz, PrivacyQuiz, UrlSafetyQuiz};
use crate::{Completion, Score};

/// Any exercise a lesson can hold.
///
/// The variants keep their own input APIs; match on the variant to drive one. The methods
/// here cover what the carousel and hosts need from every kind.
#[derive(Clone, Debug)]
pub enum Exercise {
    /// A crossword.
    Crossword(Crossword),
    /// A matching exercise.
    Matching(Matching),
    /// A gap-fill exercise.
    GapFill(GapFill),
    /// A sorting exercise.
    Sorting(Sorting),
    /// A category-sort exercise.
    CategorySort(CategorySort),
    /// A code or block exercise.
    Program(ProgramExercise),
    /// A password exercise.
    Password(PasswordExercise),
    /// A robot maze.
    Maze(MazeExercise),
    /// A phishing quiz.
    Phishing(PhishingQuiz),
    /// A privacy quiz.
    Privacy(PrivacyQuiz),
    /// A link-safety quiz.
    UrlSafety(UrlSafetyQuiz),
}

impl Exercise {
    /// The kind of exercise.
    pub fn kind(&self) -> ExerciseKind {
        match self {
            Exercise::Crossword(_) => ExerciseKind::Crossword,
            Exercise::Matching(_) => ExerciseKind::Matching,
            Exercise::GapFill(_) => ExerciseKind::GapFill,
            Exercise::Sorting(_) => ExerciseKind::Sorting,
            Exercise::CategorySort(_) => ExerciseKind::Category,
            Exercise::Program(program) => match program.kind() {
                ProgramKind::Code => ExerciseKind::Code,
                ProgramKind::Blocks => ExerciseKind::Blockly,
            },
            Exercise::Password(_) => ExerciseKind::Password,
            Exercise::Maze(_) => ExerciseKind::Maze,
            Exercise::Phishing(_) => ExerciseKind::Phishing,
            Exercise::Privacy(_) => ExerciseKind::Privacy,
            Exercise::UrlSafety(_) => ExerciseKind::UrlSafety,
        }
    }

    /// Whether the exercise has emitted its completion and stopped taking answers.
    pub fn is_locked(&self) -> bool {
        match self {
            Exercise::Crossword(crossword) => crossword.is_locked(),
            Exercise::Matching(exercise) => exercise.is_locked(),
            Exercise::GapFill(exercise) => exercise.is_locked(),
            Exercise::Sorting(exercise) => exercise.is_locked(),
            Exercise::CategorySort(exercise) => exercise.is_locked(),
            Exercise::Program(program) => program.is_locked(),
            Exercise::Password(password) => password.is_locked(),
            Exercise::Maze(maze) => maze.is_locked(),
            Exercise::Phishing(quiz) => quiz.is_locked(),
            Exercise::Privacy(quiz) => quiz.is_locked(),
            Exercise::UrlSafety(quiz) => quiz.is_locked(),
        }
    }

    /// The completion the exercise emitted, if any.
    pub fn completion(&self) -> Option<Completion> {
        match self {
            Exercise::Crossword(crossword) => crossword.completion(),
            Exercise::Matching(exercise) => exercise.completion(),
            Exercise::GapFill(exercise) => exercise.completion(),
            Exercise::Sorting(exercise) => exercise.completion(),
            Exercise::CategorySort(exercise) => exercise.completion(),
            Exercise::Program(program) => program.completion(),
            Exercise::Password(password) => password.completion(),
            Exercise::Maze(maze) => maze.completion(),
            Exercise::Phishing(quiz) => quiz.completion(),
            Exercise::Privacy(quiz) => quiz.completion(),
            Exercise::UrlSafety(quiz) => quiz.completion(),
        }
    }

    /// The score the current answers would get. Program and password exercises score
    /// 1 of 1 once passed; mazes count solved mazes toward the requirement.
    pub fn score(&self) -> Score {
        match self {
            Exercise::Crossword(crossword) => crossword.score(),
            Exercise::Matching(exercise) => exercise.score(),
            Exercise::GapFill(exercise) => exercise.score(),
            Exercise::Sorting(exercise) => exercise.score(),
            Exercise::CategorySort(exercise) => exercise.score(),
            Exercise::Program(_) | Exercise::Password(_) => self
                .completion()
                .map_or(Score::new(0, 1), |completion| completion.score()),
            Exercise::Maze(maze) => maze.score(),
            Exercise::Phishing(quiz) => quiz.score(),
            Exercise::Privacy(quiz) => quiz.score(),
            Exercise::UrlSafety(quiz) => quiz.score(),
        }
    }

    /// Whether a check button would be enabled.
    pub fn can_check(&self) -> bool {
        match self {
            Exercise::Crossword(crossword) => crossword.can_check(),
            Exercise::Matching(exercise) => exercise.can_check(),
            Exercise::GapFill(exercise) => exercise.can_check(),
            Exercise::Sorting(exercise) => exercise.can_check(),
            Exercise::CategorySort(exercise) => exercise.can_check(),
            _ => false,
        }
    }

    /// Checks the answers of exercises that have a check button. Program, password, maze
    /// and quiz exercises complete on their own and always return [`None`] here.
    pub fn check_answers(&mut self) -> Option<Completion> {
        match self {
            Exercise::Crossword(crossword) => crossword.check_answers(),
            Exercise::Matching(exercise) => exercise.check_answers(),
            Exercise::GapFill(exercise) => exercise.check_answers(),
            Exercise::Sorting(exercise) => exercise.check_answers(),
            Exercise::CategorySort(exercise) => exercise.check_answers(),
            _ => None,
        }
    }

    /// Starts the exercise over. Unavailable once locked.
    pub fn reset(&mut self) -> bool {
        match self {
            Exercise::Crossword(crossword) => crossword.reset(),
            Exercise::Matching(exercise) => exercise.reset(),
            Exercise::GapFill(exercise) => exercise.reset(),
            Exercise::Sorting(exercise) => exercise.reset(),
            Exercise::CategorySort(exercise) => exercise.reset(),
            Exercise::Program(program) => program.reset(),
            Exercise::Password(password) => password.reset(),
            Exercise::Maze(maze) => maze.reset(),
            Exercise::Phishing(quiz) => quiz.reset(),
            Exercise::Privacy(quiz) => quiz.reset(),
            Exercise::UrlSafety(quiz) => quiz.reset(),
        }
    }

    /// Fires the exercise's own timers. Returns whether anything fired.
    pub fn tick(&mut self, now: Duration) -> bool {
        match self {
            Exercise::Program(program) => program.tick(now),
            _ => false,
        }
    }

    /// Cancels the exercise's own timers.
    pub fn dispose(&mut self) {
        if let Exercise::Program(program) = self {
            program.dispose();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crossword::{Direction, Word};
    use crate::password::PasswordConfig;
    use crate::placement::Pair;
    use crate::program::ProgramConfig;

    #[test]
    fn check_locks_and_blocks_reset() {
        let mut exercise = Exercise::Matching(Matching::from_pairs(vec![Pair::new("1", "a", "b")]));
        assert!(!exercise.can_check());

        if let Exercise::Matching(matching) = &mut exercise {
            matching.place(0, 0);
        }
        assert!(exercise.can_check());
        assert_eq!(exercise.check_answers().map(|c| c.score()), Some(Score::new(1, 1)));
        assert!(exercise.is_locked());
        assert!(!exercise.reset());
        assert_eq!(exercise.check_answers(), None);
    }

    #[test]
    fn crossword_scores_words() {
        let mut exercise = Exercise::Crossword(Crossword::new(vec![Word::new(
            "1",
            "AB",
            "",
            (0, 0),
            Direction::Across,
        )]));
        assert_eq!(exercise.score(), Score::new(0, 1));
        assert_eq!(exercise.check_answers(), None);
        assert!(exercise.reset());
    }

    #[test]
    fn self_completing_kinds() {
        let mut password = Exercise::Password(PasswordExercise::new(PasswordConfig::default()));
        assert_eq!(password.score(), Score::new(0, 1));
        assert_eq!(password.check_answers(), None);

        if let Exercise::Password(inner) = &mut password {
            inner.set_password("abcDEF12!");
        }
        assert!(password.is_locked());
        assert_eq!(password.score(), Score::new(1, 1));
        assert_eq!(password.kind(), ExerciseKind::Password);

        let blocks = Exercise::Program(ProgramExercise::new(
            ProgramKind::Blocks,
            ProgramConfig::default(),
        ));
        assert_eq!(blocks.kind(), ExerciseKind::Blockly);
    }

    #[test]
    fn mazes_and_quizzes_score_as_they_go() {
        let maze = Exercise::Maze(MazeExercise::default());
        assert_eq!(maze.kind(), ExerciseKind::Maze);
        assert_eq!(maze.score(), Score::new(0, 3));
        assert!(!maze.can_check());

        let mut quiz = Exercise::Privacy(PrivacyQuiz::default());
        assert_eq!(quiz.check_answers(), None);
        if let Exercise::Privacy(inner) = &mut quiz {
            inner.next();
        }
        assert!(quiz.is_locked());
        assert_eq!(quiz.completion().map(|c| c.score()), Some(Score::new(0, 0)));
        assert!(!quiz.reset());
    }

    #[test]
    fn disposed_program_does_not_tick() {
        let mut exercise = Exercise::Program(ProgramExercise::new(
            ProgramKind::Code,
            ProgramConfig::default(),
        ));
        if let Exercise::Program(program) = &mut exercise {
            program.start_run(Duration::ZERO);
        }

        exercise.dispose();
        assert!(!exercise.tick(Duration::from_secs(10)));
    }
}
