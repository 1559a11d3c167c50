use std::fmt::Display;

/// An error raised while loading a lesson's exercises or driving the carousel.
///
/// Degenerate exercise content (missing lists, empty words) is never an error; it yields
/// empty exercises instead.
#[derive(Debug)]
pub enum Error {
    /// The configuration of an exercise is not valid JSON, or has the wrong shape.
    InvalidConfig(String, serde_json::Error),

    /// The lesson's exercise list is not valid JSON.
    InvalidLesson(serde_json::Error),

    /// The exercise type tag is not one the engine knows.
    UnknownExerciseType(String),

    /// A carousel index past the last exercise. Holds the index and the exercise count.
    ExerciseIndexOutOfRange(usize, usize),
}

impl Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::InvalidConfig(kind, err) => {
                write!(f, "Invalid configuration for {} exercise: {}", kind, err)
            }
            Error::InvalidLesson(err) => write!(f, "Invalid lesson: {}", err),
            Error::UnknownExerciseType(tag) => {
                write!(f, "Unknown exercise type {:?}", tag)
            }
            Error::ExerciseIndexOutOfRange(index, count) => {
                write!(
                    f,
                    "Exercise index {} is out of range for a carousel of {} exercises",
                    index, count
                )
            }
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::InvalidConfig(_, err) | Error::InvalidLesson(err) => Some(err),
            _ => None,
        }
    }
}
