use std::{fmt::Display, ops::Index};

use array2d::Array2D;
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Words must end within this many rows and columns.
pub const MAX_EXTENT: usize = 256;

/// A position in the crossword grid: `(row, column)`.
pub type Pos = (usize, usize);

/// The direction a crossword word is read in.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// The word goes right from its origin.
    #[default]
    Across,

    /// The word goes down from its origin.
    Down,
}

impl Direction {
    /// Returns the perpendicular direction.
    pub fn other(self) -> Self {
        match self {
            Direction::Across => Direction::Down,
            Direction::Down => Direction::Across,
        }
    }

    /// Moves `pos` one cell along this direction, forward or backward. Returns [`None`] when
    /// the step leaves the range of `usize`.
    pub fn step(self, pos: Pos, forward: bool) -> Option<Pos> {
        let (row, col) = pos;

        match (self, forward) {
            (Direction::Across, true) => col.checked_add(1).map(|col| (row, col)),
            (Direction::Across, false) => col.checked_sub(1).map(|col| (row, col)),
            (Direction::Down, true) => row.checked_add(1).map(|row| (row, col)),
            (Direction::Down, false) => row.checked_sub(1).map(|row| (row, col)),
        }
    }
}

/// A word placed in the crossword, with its clue and origin. Deserializes from the lesson
/// configuration shape `{ id, word, clue, row, col, direction }`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Word {
    /// The identifier of the word within its exercise.
    #[serde(default)]
    pub id: String,

    /// The solution text.
    #[serde(rename = "word", default)]
    pub text: String,

    /// The clue shown to the student.
    #[serde(default)]
    pub clue: String,

    /// Row of the first letter.
    #[serde(default)]
    pub row: usize,

    /// Column of the first letter.
    #[serde(default)]
    pub col: usize,

    /// Which way the word is read.
    #[serde(default)]
    pub direction: Direction,
}

impl Word {
    /// Creates a word starting at `origin` and reading in `direction`.
    pub fn new(
        id: impl Into<String>,
        text: impl Into<String>,
        clue: impl Into<String>,
        origin: Pos,
        direction: Direction,
    ) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
            clue: clue.into(),
            row: origin.0,
            col: origin.1,
            direction,
        }
    }

    /// The number of letters in the word.
    pub fn len(&self) -> usize {
        self.text.chars().count()
    }

    /// Whether the word has no letters.
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// The cell holding the first letter.
    pub fn origin(&self) -> Pos {
        (self.row, self.col)
    }

    /// The cell the last letter lands on. For an empty word this is the origin.
    pub fn end(&self) -> Pos {
        let offset = self.len().saturating_sub(1);

        match self.direction {
            Direction::Across => (self.row, self.col.saturating_add(offset)),
            Direction::Down => (self.row.saturating_add(offset), self.col),
        }
    }

    /// Like [`Word::end`], returning [`None`] when the position overflows.
    pub fn checked_end(&self) -> Option<Pos> {
        let offset = self.len().saturating_sub(1);

        match self.direction {
            Direction::Across => Some((self.row, self.col.checked_add(offset)?)),
            Direction::Down => Some((self.row.checked_add(offset)?, self.col)),
        }
    }

    /// Returns all grid positions the word spans, in letter order. Positions past
    /// `usize::MAX` are left out.
    pub fn cells(&self) -> Vec<Pos> {
        (0..self.len())
            .map_while(|i| match self.direction {
                Direction::Across => Some((self.row, self.col.checked_add(i)?)),
                Direction::Down => Some((self.row.checked_add(i)?, self.col)),
            })
            .collect()
    }

    fn fits(&self) -> bool {
        self.checked_end()
            .is_some_and(|(row, col)| row < MAX_EXTENT && col < MAX_EXTENT)
    }

    /// The case-normalized letters of the word.
    pub fn letters(&self) -> impl Iterator<Item = char> + '_ {
        self.text.chars().map(normalize_letter)
    }

    /// Whether the word covers `pos`.
    pub fn contains(&self, pos: Pos) -> bool {
        let (row, col) = pos;
        let (end_row, end_col) = self.end();

        !self.is_empty()
            && (self.row..=end_row).contains(&row)
            && (self.col..=end_col).contains(&col)
    }
}

/// Upper-cases a letter the way grid letters and typed input are compared.
pub fn normalize_letter(ch: char) -> char {
    ch.to_uppercase().next().unwrap_or(ch)
}

/// One square of the crossword grid.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Cell {
    row: usize,
    col: usize,
    letter: Option<char>,
    owners: Vec<usize>,
    clue_number: Option<u32>,
    user_input: Option<char>,
    revealed: bool,
}

impl Cell {
    fn empty(row: usize, col: usize) -> Self {
        Self {
            row,
            col,
            ..Self::default()
        }
    }

    /// Row of this cell.
    pub fn row(&self) -> usize {
        self.row
    }

    /// Column of this cell.
    pub fn col(&self) -> usize {
        self.col
    }

    /// Position of this cell.
    pub fn pos(&self) -> Pos {
        (self.row, self.col)
    }

    /// The solution letter, or [`None`] for an inactive cell.
    pub fn letter(&self) -> Option<char> {
        self.letter
    }

    /// Whether some word covers this cell.
    pub fn is_active(&self) -> bool {
        !self.owners.is_empty()
    }

    /// Indices (into [`Grid::words`]) of the words covering this cell.
    pub fn owners(&self) -> &[usize] {
        &self.owners
    }

    /// Whether two or more words cross here.
    pub fn is_intersection(&self) -> bool {
        self.owners.len() > 1
    }

    /// The clue number printed in this cell, if a word starts here.
    pub fn clue_number(&self) -> Option<u32> {
        self.clue_number
    }

    /// What the student has entered.
    pub fn user_input(&self) -> Option<char> {
        self.user_input
    }

    /// Whether the letter was revealed by a hint.
    pub fn is_revealed(&self) -> bool {
        self.revealed
    }

    /// Whether the entered letter matches the solution.
    pub fn is_correct(&self) -> bool {
        self.is_active() && self.user_input == self.letter
    }

    pub(crate) fn set_input(&mut self, input: Option<char>) {
        self.user_input = input.map(normalize_letter);
    }

    pub(crate) fn reveal(&mut self) {
        self.user_input = self.letter;
        self.revealed = true;
    }

    fn clear(&mut self) {
        self.user_input = None;
        self.revealed = false;
    }
}

/// A crossword grid built from a list of placed words.
///
/// Dimensions are the bounding box of all words. Cells no word covers are inactive.
#[derive(Clone, Debug)]
pub struct Grid {
    cells: Array2D<Cell>,
    words: Vec<Word>,
    order: Vec<usize>,
}

impl Grid {
    /// Builds the grid and assigns clue numbers.
    ///
    /// Clue numbers follow the row-major order of word origins; words sharing an origin
    /// share a number. Letters of crossing words are not checked for agreement: when they
    /// differ, the word listed later wins the cell.
    ///
    /// Words ending beyond [`MAX_EXTENT`] are dropped. Empty words are kept but get no
    /// clue number and are skipped by navigation.
    pub fn new(words: Vec<Word>) -> Self {
        let words: Vec<Word> = words
            .into_iter()
            .filter(|word| {
                let fits = word.fits();
                if !fits {
                    warn!(
                        id = word.id.as_str(),
                        row = word.row,
                        col = word.col,
                        "crossword word does not fit the grid, skipping"
                    );
                }
                fits
            })
            .collect();

        let (num_rows, num_columns) = Self::bounding_box(&words);
        let mut cells = Self::create_cells(num_rows, num_columns);

        Self::place_words(&mut cells, &words);

        let mut order: Vec<usize> = (0..words.len())
            .filter(|&index| !words[index].is_empty())
            .collect();
        order.sort_by_key(|&index| words[index].origin());

        Self::number_clues(&mut cells, &words, &order);

        Self {
            cells,
            words,
            order,
        }
    }

    fn bounding_box(words: &[Word]) -> (usize, usize) {
        if words.is_empty() {
            return (0, 0);
        }

        words.iter().fold((0, 0), |(rows, columns), word| {
            let (end_row, end_col) = word.end();
            (rows.max(end_row + 1), columns.max(end_col + 1))
        })
    }

    fn create_cells(num_rows: usize, num_columns: usize) -> Array2D<Cell> {
        let mut index = 0;

        Array2D::filled_by_row_major(
            || {
                let cell = Cell::empty(index / num_columns, index % num_columns);
                index += 1;
                cell
            },
            num_rows,
            num_columns,
        )
    }

    fn place_words(cells: &mut Array2D<Cell>, words: &[Word]) {
        for (index, word) in words.iter().enumerate() {
            for (letter, (row, col)) in word.letters().zip(word.cells()) {
                if let Some(cell) = cells.get_mut(row, col) {
                    cell.letter = Some(letter);
                    if !cell.owners.contains(&index) {
                        cell.owners.push(index);
                    }
                }
            }
        }
    }

    fn number_clues(cells: &mut Array2D<Cell>, words: &[Word], order: &[usize]) {
        let mut next_number = 1;

        for &index in order {
            let (row, col) = words[index].origin();

            if let Some(cell) = cells.get_mut(row, col) {
                if cell.clue_number.is_none() {
                    cell.clue_number = Some(next_number);
                    next_number += 1;
                }
            }
        }
    }

    /// The number of rows in the grid.
    pub fn num_rows(&self) -> usize {
        self.cells.num_rows()
    }

    /// The number of columns in the grid.
    pub fn num_columns(&self) -> usize {
        self.cells.num_columns()
    }

    /// Whether the grid has no cells at all.
    pub fn is_empty(&self) -> bool {
        self.num_rows() == 0 || self.num_columns() == 0
    }

    /// The words the grid was built from, in input order.
    pub fn words(&self) -> &[Word] {
        &self.words
    }

    /// Gets a word by index.
    pub fn word(&self, index: usize) -> Option<&Word> {
        self.words.get(index)
    }

    /// Indices of non-empty words sorted by origin, top to bottom then left to right.
    pub fn word_order(&self) -> &[usize] {
        &self.order
    }

    /// Gets the cell at the specified coordinate, returning [`Option::None`] if out of bounds.
    pub fn get(&self, row: usize, col: usize) -> Option<&Cell> {
        self.cells.get(row, col)
    }

    /// Like [`Grid::get`], taking a position.
    pub fn cell(&self, pos: Pos) -> Option<&Cell> {
        self.get(pos.0, pos.1)
    }

    pub(crate) fn cell_mut(&mut self, pos: Pos) -> Option<&mut Cell> {
        self.cells.get_mut(pos.0, pos.1)
    }

    /// All cells, row by row.
    pub fn cells(&self) -> impl Iterator<Item = &Cell> {
        self.cells.elements_row_major_iter()
    }

    /// Whether `pos` is inside the grid and covered by a word.
    pub fn is_active(&self, pos: Pos) -> bool {
        self.cell(pos).is_some_and(Cell::is_active)
    }

    /// The clue number of a word, read from its origin cell.
    pub fn clue_number(&self, word: usize) -> Option<u32> {
        let origin = self.words.get(word)?.origin();
        self.cell(origin)?.clue_number
    }

    /// The first word covering `pos` that reads in `direction`.
    pub fn word_at(&self, pos: Pos, direction: Direction) -> Option<usize> {
        self.cell(pos)?
            .owners
            .iter()
            .copied()
            .find(|&index| self.words[index].direction == direction)
    }

    /// Returns which directions have a word through `pos`, as `(across, down)`.
    pub fn directions_at(&self, pos: Pos) -> (bool, bool) {
        (
            self.word_at(pos, Direction::Across).is_some(),
            self.word_at(pos, Direction::Down).is_some(),
        )
    }

    /// The neighbor of `pos` along `direction`, only if it is an active cell.
    pub fn active_neighbor(&self, pos: Pos, direction: Direction, forward: bool) -> Option<Pos> {
        direction
            .step(pos, forward)
            .filter(|&next| self.is_active(next))
    }

    /// Whether every letter of the word has been entered correctly.
    pub fn word_is_correct(&self, word: usize) -> bool {
        self.words.get(word).is_some_and(|word| {
            word.letters()
                .zip(word.cells())
                .all(|(letter, pos)| self.cell(pos).and_then(Cell::user_input) == Some(letter))
        })
    }

    /// Number of cells covered by at least one word.
    pub fn active_cell_count(&self) -> usize {
        self.cells().filter(|cell| cell.is_active()).count()
    }

    /// Number of active cells holding the right letter.
    pub fn correct_cell_count(&self) -> usize {
        self.cells().filter(|cell| cell.is_correct()).count()
    }

    /// Whether every active cell has some input.
    pub fn is_filled(&self) -> bool {
        self.cells()
            .all(|cell| !cell.is_active() || cell.user_input.is_some())
    }

    pub(crate) fn clear_input(&mut self) {
        for row in 0..self.num_rows() {
            for col in 0..self.num_columns() {
                if let Some(cell) = self.cells.get_mut(row, col) {
                    cell.clear();
                }
            }
        }
    }
}

impl Index<Pos> for Grid {
    type Output = Cell;

    fn index(&self, index: Pos) -> &Self::Output {
        &self.cells[index]
    }
}

impl Display for Grid {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for row in self.cells.rows_iter() {
            for cell in row {
                let ch = match (cell.letter, cell.user_input) {
                    (None, _) => '#',
                    (Some(_), Some(input)) => input,
                    (Some(_), None) => '.',
                };
                write!(f, "{} ", ch)?;
            }
            writeln!(f)?;
        }

        for &index in &self.order {
            let word = &self.words[index];
            let direction = match word.direction {
                Direction::Across => "across",
                Direction::Down => "down",
            };
            writeln!(
                f,
                "{} {}: {}",
                self.clue_number(index).unwrap_or_default(),
                direction,
                word.clue
            )?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_words() -> Vec<Word> {
        vec![
            Word::new("print", "print", "Shows text", (0, 0), Direction::Across),
            Word::new("python", "python", "A language", (0, 0), Direction::Down),
            Word::new("type", "type", "Kind of a value", (2, 0), Direction::Across),
            Word::new("input", "input", "Reads text", (0, 2), Direction::Down),
        ]
    }

    #[test]
    fn bounding_box_covers_all_words() {
        let grid = Grid::new(sample_words());

        assert_eq!(grid.num_rows(), 6);
        assert_eq!(grid.num_columns(), 5);
    }

    #[test]
    fn empty_word_list() {
        let grid = Grid::new(Vec::new());

        assert!(grid.is_empty());
        assert_eq!(grid.active_cell_count(), 0);
        assert!(grid.is_filled());
        assert_eq!(grid.cells().count(), 0);
    }

    #[test]
    fn every_cell_is_inactive_or_owned() {
        let grid = Grid::new(sample_words());

        for cell in grid.cells() {
            assert_eq!(cell.is_active(), !cell.owners().is_empty());
            assert_eq!(cell.is_active(), cell.letter().is_some());
        }

        for (index, word) in grid.words().iter().enumerate() {
            for (letter, pos) in word.letters().zip(word.cells()) {
                let cell = &grid[pos];
                assert!(cell.is_active());
                assert_eq!(cell.letter(), Some(letter));
                assert!(cell.owners().contains(&index));
            }
        }
    }

    #[test]
    fn intersections_are_shared() {
        let grid = Grid::new(sample_words());

        assert_eq!(grid[(0, 0)].owners(), &[0, 1]);
        assert!(grid[(0, 0)].is_intersection());
        // TYPE starts on the third letter of PYTHON and its P is the third letter of INPUT
        assert_eq!(grid[(2, 0)].letter(), Some('T'));
        assert_eq!(grid[(2, 0)].owners(), &[1, 2]);
        assert_eq!(grid[(2, 2)].letter(), Some('P'));
        assert_eq!(grid[(2, 2)].owners(), &[2, 3]);
        // I of PRINT starts INPUT
        assert_eq!(grid[(0, 2)].owners(), &[0, 3]);
        assert!(!grid[(1, 1)].is_active());
    }

    #[test]
    fn clue_numbers_follow_row_major_origins() {
        let grid = Grid::new(sample_words());

        assert_eq!(grid.clue_number(0), Some(1));
        assert_eq!(grid.clue_number(1), Some(1));
        assert_eq!(grid.clue_number(3), Some(2));
        assert_eq!(grid.clue_number(2), Some(3));
        assert_eq!(grid.word_order(), &[0, 1, 3, 2]);

        let numbers: Vec<u32> = grid.cells().filter_map(Cell::clue_number).collect();
        assert_eq!(numbers, vec![1, 2, 3]);
    }

    #[test]
    fn letters_are_upper_cased() {
        let grid = Grid::new(vec![Word::new("1", "čaj", "", (0, 0), Direction::Across)]);

        assert_eq!(grid[(0, 0)].letter(), Some('Č'));
        assert_eq!(grid[(0, 2)].letter(), Some('J'));
    }

    #[test]
    fn later_word_wins_conflicting_letters() {
        let grid = Grid::new(vec![
            Word::new("1", "ab", "", (0, 0), Direction::Across),
            Word::new("2", "xy", "", (0, 0), Direction::Down),
        ]);

        assert_eq!(grid[(0, 0)].letter(), Some('X'));
    }

    #[test]
    fn word_lookup_by_direction() {
        let grid = Grid::new(sample_words());

        assert_eq!(grid.word_at((0, 0), Direction::Across), Some(0));
        assert_eq!(grid.word_at((0, 0), Direction::Down), Some(1));
        assert_eq!(grid.word_at((0, 4), Direction::Down), None);
        assert_eq!(grid.directions_at((4, 2)), (false, true));
        assert_eq!(grid.directions_at((9, 9)), (false, false));
    }

    #[test]
    fn active_neighbor_respects_bounds() {
        let grid = Grid::new(sample_words());

        assert_eq!(grid.active_neighbor((0, 0), Direction::Across, true), Some((0, 1)));
        assert_eq!(grid.active_neighbor((0, 0), Direction::Across, false), None);
        assert_eq!(grid.active_neighbor((0, 4), Direction::Across, true), None);
        assert_eq!(grid.active_neighbor((0, 1), Direction::Down, true), None);
    }

    #[test]
    fn out_of_range_words_are_dropped() {
        let grid = Grid::new(vec![
            Word::new("1", "hi", "", (0, 0), Direction::Across),
            Word::new("2", "far", "", (usize::MAX, 0), Direction::Down),
            Word::new("3", "wide", "", (0, usize::MAX - 1), Direction::Across),
            Word::new("4", "huge", "", (MAX_EXTENT, 0), Direction::Across),
        ]);

        assert_eq!(grid.words().len(), 1);
        assert_eq!((grid.num_rows(), grid.num_columns()), (1, 2));
        let far = Word::new("2", "far", "", (usize::MAX, 0), Direction::Down);
        assert_eq!(far.checked_end(), None);
        assert_eq!(far.cells(), vec![(usize::MAX, 0)]);
        assert_eq!(Direction::Across.step((0, usize::MAX), true), None);
    }

    #[test]
    fn empty_words_get_no_clue_number() {
        let grid = Grid::new(vec![
            Word::new("blank", "", "", (0, 0), Direction::Across),
            Word::new("1", "hi", "", (1, 0), Direction::Across),
        ]);

        assert_eq!(grid.word_order(), &[1]);
        assert_eq!(grid.clue_number(0), None);
        assert_eq!(grid.clue_number(1), Some(1));
        assert!(!grid.is_active((0, 0)));
    }

    #[test]
    fn display_marks_inactive_cells() {
        let grid = Grid::new(vec![Word::new("1", "hi", "Greeting", (0, 0), Direction::Across)]);

        assert_eq!(grid.to_string(), ". . \n1 across: Greeting\n");
    }
}
