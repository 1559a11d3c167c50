use super::grid::{Direction, Grid, Pos};

/// An arrow key.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Arrow {
    /// Moves toward row 0.
    Up,

    /// Moves toward the last row.
    Down,

    /// Moves toward column 0.
    Left,

    /// Moves toward the last column.
    Right,
}

impl Arrow {
    /// The axis the arrow moves along.
    pub fn direction(self) -> Direction {
        match self {
            Arrow::Up | Arrow::Down => Direction::Down,
            Arrow::Left | Arrow::Right => Direction::Across,
        }
    }

    fn forward(self) -> bool {
        matches!(self, Arrow::Down | Arrow::Right)
    }
}

/// The selected cell and the axis typing advances along.
///
/// The axis is remembered while nothing is selected, so a later click keeps it when the
/// clicked cell allows both directions.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Cursor {
    selected: Option<Pos>,
    axis: Direction,
}

impl Cursor {
    /// An unselected cursor on the across axis.
    pub fn new() -> Self {
        Self::default()
    }

    /// The selected cell, if any.
    pub fn selected(&self) -> Option<Pos> {
        self.selected
    }

    /// The active axis.
    pub fn axis(&self) -> Direction {
        self.axis
    }

    /// Handles a pointer click. Returns whether the cursor changed.
    ///
    /// Clicking a new active cell selects it, switching the axis when only one direction
    /// has a word through that cell. Clicking the selected cell again flips the axis if
    /// words run both ways through it.
    pub fn click(&mut self, grid: &Grid, pos: Pos) -> bool {
        if !grid.is_active(pos) {
            return false;
        }

        let (across, down) = grid.directions_at(pos);

        if self.selected == Some(pos) {
            if across && down {
                self.axis = self.axis.other();
                return true;
            }
            return false;
        }

        self.selected = Some(pos);
        match (across, down) {
            (true, false) => self.axis = Direction::Across,
            (false, true) => self.axis = Direction::Down,
            _ => {}
        }

        true
    }

    /// Handles an arrow key: switches to the arrow's axis, then moves one cell if the
    /// destination is active. Returns whether the selected cell moved.
    pub fn arrow(&mut self, grid: &Grid, arrow: Arrow) -> bool {
        if self.selected.is_none() {
            return false;
        }

        self.axis = arrow.direction();
        self.step(grid, arrow.direction(), arrow.forward())
    }

    /// Moves one cell forward along the axis, staying put at the end of a run.
    pub fn advance(&mut self, grid: &Grid) -> bool {
        self.step(grid, self.axis, true)
    }

    /// Moves one cell backward along the axis, staying put at the start of a run.
    pub fn retreat(&mut self, grid: &Grid) -> bool {
        self.step(grid, self.axis, false)
    }

    fn step(&mut self, grid: &Grid, direction: Direction, forward: bool) -> bool {
        let next = self
            .selected
            .and_then(|pos| grid.active_neighbor(pos, direction, forward));

        match next {
            Some(pos) => {
                self.selected = Some(pos);
                true
            }
            None => false,
        }
    }

    /// Jumps to the origin of the next word in clue order, wrapping around, and takes that
    /// word's direction. With no current word the first word is chosen.
    pub fn next_word(&mut self, grid: &Grid) -> bool {
        let order = grid.word_order();
        if order.is_empty() {
            return false;
        }

        let next = match self.current_word(grid) {
            Some(current) => order
                .iter()
                .position(|&index| index == current)
                .map_or(0, |i| (i + 1) % order.len()),
            None => 0,
        };

        let word = &grid.words()[order[next]];
        self.selected = Some(word.origin());
        self.axis = word.direction;

        true
    }

    /// The word being filled: the one through the selected cell along the axis, or
    /// failing that any word through the cell.
    pub fn current_word(&self, grid: &Grid) -> Option<usize> {
        let pos = self.selected?;

        grid.word_at(pos, self.axis)
            .or_else(|| grid.cell(pos)?.owners().first().copied())
    }

    pub(crate) fn select(&mut self, pos: Pos) {
        self.selected = Some(pos);
    }
}
