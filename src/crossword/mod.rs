//! The crossword exercise: a grid built from intersecting words, a cursor for keyboard
//! and pointer navigation, hints, and checking.

mod cursor;
mod grid;
mod hint;

use tracing::{debug, info};

pub use cursor::{Arrow, Cursor};
pub use grid::{normalize_letter, Cell, Direction, Grid, Pos, Word, MAX_EXTENT};
pub use hint::Hints;

use crate::{Completion, Score};

/// A keyboard event on the selected cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Key {
    /// A typed character.
    Letter(char),

    /// Clears the cell, or steps back when it is already empty.
    Backspace,

    /// Moves the cursor.
    Arrow(Arrow),

    /// Jumps to the next word.
    Tab,
}

/// A crossword being solved.
#[derive(Clone, Debug)]
pub struct Crossword {
    grid: Grid,
    cursor: Cursor,
    hints: Hints,
    results: Option<Vec<bool>>,
}

impl Crossword {
    /// Builds the crossword from its words. An empty list gives an empty, trivially
    /// complete puzzle.
    pub fn new(words: Vec<Word>) -> Self {
        Self {
            grid: Grid::new(words),
            cursor: Cursor::new(),
            hints: Hints::default(),
            results: None,
        }
    }

    /// The grid with the student's input.
    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    /// The navigation cursor.
    pub fn cursor(&self) -> &Cursor {
        &self.cursor
    }

    /// How many letters were revealed by hints.
    pub fn hints_used(&self) -> u32 {
        self.hints.used()
    }

    /// Whether the answers were checked. A locked crossword ignores all input.
    pub fn is_locked(&self) -> bool {
        self.results.is_some()
    }

    /// Per-word results in input order, available once checked.
    pub fn word_results(&self) -> Option<&[bool]> {
        self.results.as_deref()
    }

    /// The completion that was emitted by [`Crossword::check_answers`], if any.
    pub fn completion(&self) -> Option<Completion> {
        self.is_locked().then(|| self.score().into())
    }

    /// Words solved so far out of all words.
    pub fn score(&self) -> Score {
        let total = self.grid.words().len();
        let correct = (0..total)
            .filter(|&index| self.grid.word_is_correct(index))
            .count();

        Score::new(correct, total)
    }

    /// Whether `pos` belongs to the word the cursor is on.
    pub fn is_in_current_word(&self, pos: Pos) -> bool {
        self.cursor
            .current_word(&self.grid)
            .and_then(|index| self.grid.word(index))
            .is_some_and(|word| word.contains(pos))
    }

    /// Handles a click on a cell.
    pub fn click(&mut self, pos: Pos) -> bool {
        if self.is_locked() {
            return false;
        }

        self.cursor.click(&self.grid, pos)
    }

    /// Handles a key press on the selected cell. Returns whether anything changed.
    pub fn key(&mut self, key: Key) -> bool {
        if self.is_locked() {
            return false;
        }

        match key {
            Key::Letter(ch) => self.type_letter(ch),
            Key::Backspace => self.backspace(),
            Key::Arrow(arrow) => self.cursor.arrow(&self.grid, arrow),
            Key::Tab => self.cursor.next_word(&self.grid),
        }
    }

    /// Writes a letter into the selected cell and advances along the axis.
    ///
    /// Whitespace and control characters are ignored. Letters revealed by a hint are kept,
    /// but the cursor still advances so typing flows through them.
    pub fn type_letter(&mut self, ch: char) -> bool {
        if self.is_locked() || ch.is_whitespace() || ch.is_control() {
            return false;
        }

        let Some(pos) = self.cursor.selected() else {
            return false;
        };

        match self.grid.cell_mut(pos) {
            Some(cell) if cell.is_active() => {
                if !cell.is_revealed() {
                    cell.set_input(Some(ch));
                }
            }
            _ => return false,
        }

        self.cursor.advance(&self.grid);
        true
    }

    /// Clears the selected cell; on an already empty cell, steps back instead.
    pub fn backspace(&mut self) -> bool {
        if self.is_locked() {
            return false;
        }

        let Some(pos) = self.cursor.selected() else {
            return false;
        };

        match self.grid.cell_mut(pos) {
            Some(cell) if cell.user_input().is_some() && !cell.is_revealed() => {
                cell.set_input(None);
                true
            }
            _ => self.cursor.retreat(&self.grid),
        }
    }

    /// Whether a hint can still reveal something.
    pub fn can_use_hint(&self) -> bool {
        !self.is_locked() && self.grid.correct_cell_count() < self.grid.active_cell_count()
    }

    /// Reveals one letter. See [`Hints::reveal`].
    pub fn hint(&mut self) -> Option<Pos> {
        if self.is_locked() {
            return None;
        }

        self.hints.reveal(&mut self.grid, &mut self.cursor)
    }

    /// Whether every active cell has a letter, so the answers may be checked.
    pub fn can_check(&self) -> bool {
        !self.is_locked() && self.grid.is_filled()
    }

    /// Checks every word, locks the crossword and returns the completion.
    ///
    /// Returns [`None`] when the grid is not filled yet or the crossword was already
    /// checked, so the completion is produced exactly once.
    pub fn check_answers(&mut self) -> Option<Completion> {
        if !self.can_check() {
            return None;
        }

        let results: Vec<bool> = (0..self.grid.words().len())
            .map(|index| self.grid.word_is_correct(index))
            .collect();
        self.results = Some(results);

        let completion: Completion = self.score().into();
        info!(
            correct = completion.correct,
            total = completion.total,
            hints = self.hints.used(),
            "crossword checked"
        );

        Some(completion)
    }

    /// Clears all input, hints and the cursor. Unavailable once checked.
    pub fn reset(&mut self) -> bool {
        if self.is_locked() {
            return false;
        }

        self.grid.clear_input();
        self.cursor = Cursor::new();
        self.hints.reset();
        debug!("crossword reset");

        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn crossword() -> Crossword {
        Crossword::new(vec![
            Word::new("print", "PRINT", "Shows text", (0, 0), Direction::Across),
            Word::new("python", "PYTHON", "A language", (0, 0), Direction::Down),
            Word::new("type", "TYPE", "Kind of a value", (2, 0), Direction::Across),
            Word::new("input", "INPUT", "Reads text", (0, 2), Direction::Down),
        ])
    }

    fn type_word(crossword: &mut Crossword, origin: Pos, text: &str) {
        crossword.click((20, 20));
        crossword.cursor.select(origin);
        for ch in text.chars() {
            crossword.type_letter(ch);
        }
    }

    fn solve(crossword: &mut Crossword) {
        let words = crossword.grid().words().to_vec();
        for word in words {
            for (ch, pos) in word.text.chars().zip(word.cells()) {
                crossword.grid.cell_mut(pos).unwrap().set_input(Some(ch));
            }
        }
    }

    #[test]
    fn solving_everything_scores_every_word() {
        let mut crossword = crossword();

        assert!(!crossword.can_check());
        assert_eq!(crossword.check_answers(), None);

        solve(&mut crossword);
        assert_eq!(
            crossword.check_answers(),
            Some(Completion {
                is_correct: true,
                correct: 4,
                total: 4
            })
        );
        assert!(crossword.is_locked());
        assert_eq!(crossword.word_results(), Some(&[true, true, true, true][..]));
    }

    #[test]
    fn conflicting_crossing_fails_the_earlier_word() {
        // TRUE needs U at (2, 2) where INPUT, listed later, needs P
        let mut crossword = Crossword::new(vec![
            Word::new("print", "PRINT", "", (0, 0), Direction::Across),
            Word::new("python", "PYTHON", "", (0, 0), Direction::Down),
            Word::new("true", "TRUE", "", (2, 0), Direction::Across),
            Word::new("input", "INPUT", "", (0, 2), Direction::Down),
        ]);
        assert_eq!(crossword.grid()[(2, 2)].letter(), Some('P'));

        while crossword.can_use_hint() {
            crossword.hint();
        }

        assert_eq!(
            crossword.check_answers(),
            Some(Completion {
                is_correct: false,
                correct: 3,
                total: 4
            })
        );
        assert_eq!(crossword.word_results(), Some(&[true, true, false, true][..]));
    }

    #[test]
    fn completion_is_emitted_once() {
        let mut crossword = crossword();
        solve(&mut crossword);

        assert!(crossword.check_answers().is_some());
        assert_eq!(crossword.check_answers(), None);
        assert_eq!(crossword.completion().map(|c| c.correct), Some(4));
    }

    #[test]
    fn locked_crossword_ignores_input() {
        let mut crossword = crossword();
        solve(&mut crossword);
        crossword.check_answers();

        assert!(!crossword.click((0, 1)));
        assert!(!crossword.key(Key::Letter('x')));
        assert!(!crossword.backspace());
        assert_eq!(crossword.hint(), None);
        assert!(!crossword.reset());
        assert_eq!(crossword.score(), Score::new(4, 4));
    }

    #[test]
    fn wrong_letter_fails_both_crossing_words() {
        let mut crossword = crossword();
        solve(&mut crossword);
        crossword.grid.cell_mut((0, 2)).unwrap().set_input(Some('x'));

        let completion = crossword.check_answers().unwrap();
        assert!(!completion.is_correct);
        assert_eq!((completion.correct, completion.total), (2, 4));
        assert_eq!(crossword.word_results(), Some(&[false, true, true, false][..]));
    }

    #[test]
    fn typing_advances_along_axis() {
        let mut crossword = crossword();

        crossword.click((0, 0));
        assert!(crossword.key(Key::Letter('p')));
        assert_eq!(crossword.grid()[(0, 0)].user_input(), Some('P'));
        assert_eq!(crossword.cursor().selected(), Some((0, 1)));

        type_word(&mut crossword, (0, 3), "nt");
        // the second letter lands on the last cell and the cursor stays there
        assert_eq!(crossword.cursor().selected(), Some((0, 4)));
        assert_eq!(crossword.grid()[(0, 4)].user_input(), Some('T'));

        assert!(!crossword.type_letter(' '));
    }

    #[test]
    fn backspace_clears_then_steps_back() {
        let mut crossword = crossword();

        crossword.click((0, 1));
        crossword.type_letter('r');
        assert_eq!(crossword.cursor().selected(), Some((0, 2)));

        // empty cell: step back without touching letters
        assert!(crossword.key(Key::Backspace));
        assert_eq!(crossword.cursor().selected(), Some((0, 1)));
        assert_eq!(crossword.grid()[(0, 1)].user_input(), Some('R'));

        // filled cell: clear and stay
        assert!(crossword.key(Key::Backspace));
        assert_eq!(crossword.cursor().selected(), Some((0, 1)));
        assert_eq!(crossword.grid()[(0, 1)].user_input(), None);
    }

    #[test]
    fn revealed_letters_are_kept() {
        let mut crossword = crossword();

        crossword.click((0, 1));
        let revealed = crossword.hint().unwrap();
        assert_eq!(revealed, (0, 0));
        assert!(crossword.grid()[(0, 0)].is_revealed());

        crossword.cursor.select((0, 0));
        crossword.type_letter('z');
        assert_eq!(crossword.grid()[(0, 0)].user_input(), Some('P'));
        assert_eq!(crossword.cursor().selected(), Some((0, 1)));
    }

    #[test]
    fn hints_count_as_correct() {
        let mut crossword = crossword();

        while crossword.can_use_hint() {
            crossword.hint();
        }

        assert_eq!(crossword.hints_used() as usize, crossword.grid().active_cell_count());
        let completion = crossword.check_answers().unwrap();
        assert!(completion.is_correct);
        assert_eq!(crossword.hint(), None);
    }

    #[test]
    fn reset_clears_everything() {
        let mut crossword = crossword();

        crossword.click((0, 0));
        crossword.type_letter('p');
        crossword.hint();

        assert!(crossword.reset());
        assert_eq!(crossword.hints_used(), 0);
        assert_eq!(crossword.cursor().selected(), None);
        assert!(crossword.grid().cells().all(|cell| cell.user_input().is_none()));
        assert!(crossword.grid().cells().all(|cell| !cell.is_revealed()));
    }

    #[test]
    fn current_word_highlight() {
        let mut crossword = crossword();

        crossword.click((2, 1));
        assert!(crossword.is_in_current_word((2, 3)));
        assert!(crossword.is_in_current_word((2, 0)));
        assert!(!crossword.is_in_current_word((3, 0)));
    }

    #[test]
    fn empty_words_take_no_input() {
        let mut crossword = Crossword::new(vec![
            Word::new("blank", "", "", (0, 0), Direction::Across),
            Word::new("hi", "HI", "", (1, 0), Direction::Across),
        ]);

        assert!(crossword.key(Key::Tab));
        assert_eq!(crossword.cursor().selected(), Some((1, 0)));

        crossword.cursor.select((0, 0));
        assert!(!crossword.type_letter('x'));
        assert_eq!(crossword.grid()[(0, 0)].user_input(), None);
    }

    #[test]
    fn empty_crossword_is_trivially_complete() {
        let mut crossword = Crossword::new(Vec::new());

        assert!(!crossword.can_use_hint());
        assert_eq!(
            crossword.check_answers(),
            Some(Completion {
                is_correct: true,
                correct: 0,
                total: 0
            })
        );
    }
}
