//! The carousel runs a lesson's exercises one at a time, collects their completions and
//! reports the lesson total once every exercise is done.
//!
//! Time is driven by the host: methods that schedule work take the current time, and
//! [`Carousel::tick`] returns whatever came due. Call [`Carousel::dispose`] when the view
//! goes away so nothing fires afterwards.

use std::time::Duration;

use rand::Rng;
use serde::Serialize;
use tracing::{debug, info};

use crate::config::LessonExercise;
use crate::exercise::Exercise;
use crate::timer::Timer;
use crate::{Completion, Error, Score};

/// Pause between an exercise completing and the carousel moving to the next one.
pub const AUTO_ADVANCE_DELAY: Duration = Duration::from_millis(1500);

/// Pause between the last exercise completing and the lesson total being reported.
pub const ALL_COMPLETE_DELAY: Duration = Duration::from_millis(500);

/// What the carousel knows about one of its exercises.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ExerciseInfo {
    /// Title shown in the carousel.
    pub title: String,

    /// Whether the exercise reported its completion.
    pub completed: bool,

    /// The reported score.
    pub score: Option<Score>,
}

/// Something that came due in [`Carousel::tick`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum CarouselEvent {
    /// The carousel moved on by itself.
    Advanced {
        /// The exercise now shown.
        index: usize,
    },

    /// Every exercise is complete. Reported once.
    AllComplete {
        /// Sum of the correct answers of every exercise.
        total_score: usize,
        /// Sum of the answer counts of every exercise.
        total_possible: usize,
    },
}

/// A sequence of exercises with per-exercise results.
#[derive(Clone, Debug)]
pub struct Carousel {
    exercises: Vec<Exercise>,
    info: Vec<ExerciseInfo>,
    current: usize,
    advance: Timer<usize>,
    all_complete: Timer<Score>,
    reported: bool,
}

impl Carousel {
    /// A carousel with default titles.
    pub fn new(exercises: Vec<Exercise>) -> Self {
        Self::with_titles(exercises, Vec::new())
    }

    /// A carousel with the given titles. Exercises without a title, or with an empty one,
    /// are called "Exercise N".
    pub fn with_titles(exercises: Vec<Exercise>, titles: Vec<String>) -> Self {
        let mut titles = titles.into_iter();
        let info = (1..=exercises.len())
            .map(|number| ExerciseInfo {
                title: titles
                    .next()
                    .filter(|title| !title.trim().is_empty())
                    .unwrap_or_else(|| format!("Exercise {}", number)),
                completed: false,
                score: None,
            })
            .collect();

        Self {
            exercises,
            info,
            current: 0,
            advance: Timer::default(),
            all_complete: Timer::default(),
            reported: false,
        }
    }

    /// Builds every exercise of a lesson.
    pub fn from_lesson(lesson: &[LessonExercise]) -> Result<Self, Error> {
        Self::from_lesson_with(lesson, &mut rand::thread_rng())
    }

    /// Builds every exercise of a lesson, shuffling with `rng`.
    pub fn from_lesson_with<R: Rng + ?Sized>(
        lesson: &[LessonExercise],
        rng: &mut R,
    ) -> Result<Self, Error> {
        let exercises = lesson
            .iter()
            .map(|exercise| exercise.build_with(rng))
            .collect::<Result<Vec<_>, _>>()?;
        let titles = lesson
            .iter()
            .map(|exercise| exercise.title.clone().unwrap_or_default())
            .collect();

        Ok(Self::with_titles(exercises, titles))
    }

    /// Number of exercises.
    pub fn len(&self) -> usize {
        self.exercises.len()
    }

    /// Whether the carousel holds no exercises.
    pub fn is_empty(&self) -> bool {
        self.exercises.is_empty()
    }

    /// Index of the exercise on show.
    pub fn current(&self) -> usize {
        self.current
    }

    /// Per-exercise titles and results.
    pub fn info(&self) -> &[ExerciseInfo] {
        &self.info
    }

    /// An exercise.
    pub fn exercise(&self, index: usize) -> Option<&Exercise> {
        self.exercises.get(index)
    }

    /// An exercise, for driving it.
    pub fn exercise_mut(&mut self, index: usize) -> Option<&mut Exercise> {
        self.exercises.get_mut(index)
    }

    /// The exercise on show, for driving it.
    pub fn current_exercise_mut(&mut self) -> Option<&mut Exercise> {
        self.exercises.get_mut(self.current)
    }

    /// Shows the previous exercise. Stays put on the first one.
    pub fn go_previous(&mut self) -> bool {
        if self.current == 0 {
            return false;
        }

        self.current -= 1;
        true
    }

    /// Shows the next exercise. Stays put on the last one.
    pub fn go_next(&mut self) -> bool {
        if self.current + 1 >= self.len() {
            return false;
        }

        self.current += 1;
        true
    }

    /// Shows the exercise at `index`.
    pub fn go_to(&mut self, index: usize) -> Result<(), Error> {
        if index >= self.len() {
            return Err(Error::ExerciseIndexOutOfRange(index, self.len()));
        }

        self.current = index;
        Ok(())
    }

    /// Records the completion of the exercise at `index`, reported at `now`.
    ///
    /// Schedules the move to the next exercise and, when this was the last missing
    /// completion, the lesson total. A second completion of the same exercise is ignored.
    pub fn record_completion(&mut self, index: usize, completion: Completion, now: Duration) -> bool {
        let Some(info) = self.info.get_mut(index) else {
            return false;
        };
        if info.completed {
            debug!(index, "ignored repeated completion");
            return false;
        }

        info.completed = true;
        info.score = Some(completion.score());
        debug!(
            index,
            correct = completion.correct,
            total = completion.total,
            "exercise completed"
        );

        if index + 1 < self.len() {
            self.advance.schedule(now, AUTO_ADVANCE_DELAY, index + 1);
        }
        if self.is_all_complete() && !self.reported {
            self.all_complete
                .schedule(now, ALL_COMPLETE_DELAY, self.total_score());
        }

        true
    }

    /// Checks the answers of the exercise at `index` and records the completion.
    pub fn check(&mut self, index: usize, now: Duration) -> Option<Completion> {
        let completion = self.exercises.get_mut(index)?.check_answers()?;
        self.record_completion(index, completion, now);
        Some(completion)
    }

    /// Records every exercise that completed on its own (programs, passwords) since the
    /// last call. Returns how many were recorded.
    pub fn sync(&mut self, now: Duration) -> usize {
        let pending: Vec<(usize, Completion)> = self
            .exercises
            .iter()
            .zip(&self.info)
            .enumerate()
            .filter(|(_, (_, info))| !info.completed)
            .filter_map(|(index, (exercise, _))| Some((index, exercise.completion()?)))
            .collect();

        pending
            .into_iter()
            .filter(|&(index, completion)| self.record_completion(index, completion, now))
            .count()
    }

    /// Fires everything that came due by `now`, including the exercises' own timers.
    pub fn tick(&mut self, now: Duration) -> Vec<CarouselEvent> {
        for exercise in &mut self.exercises {
            exercise.tick(now);
        }

        let mut events = Vec::new();

        if let Some(index) = self.advance.fire(now) {
            self.current = index;
            events.push(CarouselEvent::Advanced { index });
        }

        if let Some(total) = self.all_complete.fire(now) {
            self.reported = true;
            info!(
                total_score = total.correct,
                total_possible = total.total,
                "lesson complete"
            );
            events.push(CarouselEvent::AllComplete {
                total_score: total.correct,
                total_possible: total.total,
            });
        }

        events
    }

    /// Cancels everything scheduled, here and in the exercises.
    pub fn dispose(&mut self) {
        self.advance.cancel();
        self.all_complete.cancel();
        for exercise in &mut self.exercises {
            exercise.dispose();
        }
    }

    /// Number of completed exercises.
    pub fn completed_count(&self) -> usize {
        self.info.iter().filter(|info| info.completed).count()
    }

    /// Share of completed exercises, 0 to 100.
    pub fn progress_percent(&self) -> f64 {
        if self.is_empty() {
            return 0.0;
        }

        self.completed_count() as f64 * 100.0 / self.len() as f64
    }

    /// Whether every exercise reported its completion.
    pub fn is_all_complete(&self) -> bool {
        self.info.iter().all(|info| info.completed)
    }

    /// Sum of the recorded scores.
    pub fn total_score(&self) -> Score {
        self.info.iter().filter_map(|info| info.score).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::placement::{Matching, Pair};

    fn ms(ms: u64) -> Duration {
        Duration::from_millis(ms)
    }

    fn completion(correct: usize, total: usize) -> Completion {
        Score::new(correct, total).into()
    }

    fn carousel(count: usize) -> Carousel {
        let exercises = (0..count)
            .map(|_| Exercise::Matching(Matching::from_pairs(vec![Pair::new("1", "a", "b")])))
            .collect();
        Carousel::new(exercises)
    }

    #[test]
    fn default_titles() {
        let carousel = Carousel::with_titles(
            carousel(3).exercises,
            vec!["Intro".into(), " ".into()],
        );
        let titles: Vec<&str> = carousel.info().iter().map(|info| info.title.as_str()).collect();
        assert_eq!(titles, vec!["Intro", "Exercise 2", "Exercise 3"]);
    }

    #[test]
    fn total_waits_for_every_exercise() {
        let mut carousel = carousel(3);

        carousel.record_completion(0, completion(4, 4), ms(0));
        carousel.record_completion(1, completion(3, 5), ms(100));
        assert!(carousel.tick(ms(10_000)).iter().all(|event| !matches!(
            event,
            CarouselEvent::AllComplete { .. }
        )));
        assert_eq!(carousel.completed_count(), 2);

        carousel.record_completion(2, completion(1, 2), ms(20_000));
        assert_eq!(carousel.tick(ms(20_499)), Vec::new());
        assert_eq!(
            carousel.tick(ms(20_500)),
            vec![CarouselEvent::AllComplete {
                total_score: 8,
                total_possible: 11
            }]
        );
        assert_eq!(carousel.tick(ms(30_000)), Vec::new());
        assert_eq!(carousel.progress_percent(), 100.0);
    }

    #[test]
    fn advances_after_a_delay_but_not_past_the_end() {
        let mut carousel = carousel(2);

        carousel.record_completion(0, completion(1, 1), ms(0));
        assert_eq!(carousel.tick(ms(1499)), Vec::new());
        assert_eq!(carousel.tick(ms(1500)), vec![CarouselEvent::Advanced { index: 1 }]);
        assert_eq!(carousel.current(), 1);

        carousel.record_completion(1, completion(1, 1), ms(2000));
        assert_eq!(
            carousel.tick(ms(5000)),
            vec![CarouselEvent::AllComplete {
                total_score: 2,
                total_possible: 2
            }]
        );
        assert_eq!(carousel.current(), 1);
    }

    #[test]
    fn repeated_completion_is_ignored() {
        let mut carousel = carousel(1);

        assert!(carousel.record_completion(0, completion(1, 1), ms(0)));
        assert!(!carousel.record_completion(0, completion(0, 1), ms(0)));
        assert!(!carousel.record_completion(7, completion(1, 1), ms(0)));
        assert_eq!(carousel.total_score(), Score::new(1, 1));
    }

    #[test]
    fn disposed_carousel_fires_nothing() {
        let mut carousel = carousel(2);

        carousel.record_completion(0, completion(1, 1), ms(0));
        carousel.record_completion(1, completion(1, 1), ms(0));
        carousel.dispose();

        assert_eq!(carousel.tick(ms(60_000)), Vec::new());
        assert_eq!(carousel.current(), 0);
    }

    #[test]
    fn navigation_is_free() {
        let mut carousel = carousel(3);

        assert!(!carousel.go_previous());
        assert!(carousel.go_next());
        assert!(carousel.go_next());
        assert!(!carousel.go_next());
        assert!(carousel.go_to(0).is_ok());
        assert!(matches!(
            carousel.go_to(3),
            Err(Error::ExerciseIndexOutOfRange(3, 3))
        ));
        assert_eq!(carousel.current(), 0);
    }

    #[test]
    fn check_forwards_the_completion() {
        let mut carousel = carousel(2);

        assert_eq!(carousel.check(0, ms(0)), None);

        if let Some(Exercise::Matching(matching)) = carousel.exercise_mut(0) {
            matching.place(0, 0);
        }
        assert_eq!(carousel.check(0, ms(0)), Some(completion(1, 1)));
        assert_eq!(carousel.info()[0].score, Some(Score::new(1, 1)));
        assert_eq!(carousel.check(0, ms(0)), None);
    }

    #[test]
    fn sync_picks_up_self_completed_exercises() {
        use crate::password::{PasswordConfig, PasswordExercise};

        let mut carousel = Carousel::new(vec![Exercise::Password(PasswordExercise::new(
            PasswordConfig::default(),
        ))]);

        assert_eq!(carousel.sync(ms(0)), 0);
        if let Some(Exercise::Password(password)) = carousel.current_exercise_mut() {
            password.set_password("Tr0ub4dor&3x");
        }
        assert_eq!(carousel.sync(ms(0)), 1);
        assert_eq!(carousel.sync(ms(0)), 0);
        assert!(carousel.is_all_complete());
    }

    #[test]
    fn empty_carousel() {
        let mut carousel = Carousel::new(Vec::new());
        assert_eq!(carousel.progress_percent(), 0.0);
        assert!(carousel.go_to(0).is_err());
        assert_eq!(carousel.tick(ms(0)), Vec::new());
    }
}
