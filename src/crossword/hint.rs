use tracing::debug;

use super::{
    cursor::Cursor,
    grid::{Cell, Grid, Pos},
};

/// Reveals one letter at a time and counts how many were given away.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Hints {
    used: u32,
}

impl Hints {
    /// Number of letters revealed so far.
    pub fn used(&self) -> u32 {
        self.used
    }

    /// Cells a hint may reveal, best first: unresolved cells of the word under the cursor,
    /// or when that word is done, every unresolved cell in row-major order.
    pub fn candidates(grid: &Grid, cursor: &Cursor) -> Vec<Pos> {
        let in_word: Vec<Pos> = cursor
            .current_word(grid)
            .and_then(|index| grid.word(index))
            .map(|word| {
                word.cells()
                    .into_iter()
                    .filter(|&pos| grid.cell(pos).is_some_and(is_unresolved))
                    .collect()
            })
            .unwrap_or_default();

        if !in_word.is_empty() {
            return in_word;
        }

        grid.cells()
            .filter(|cell| is_unresolved(cell))
            .map(Cell::pos)
            .collect()
    }

    /// Reveals the best candidate and moves the cursor to the next one, if any.
    ///
    /// Returns the revealed position, or [`None`] when nothing is left to reveal.
    pub fn reveal(&mut self, grid: &mut Grid, cursor: &mut Cursor) -> Option<Pos> {
        let candidates = Self::candidates(grid, cursor);
        let &target = candidates.first()?;

        grid.cell_mut(target)?.reveal();
        self.used += 1;

        if let Some(&next) = candidates.get(1) {
            cursor.select(next);
        }

        debug!(row = target.0, col = target.1, used = self.used, "revealed hint");

        Some(target)
    }

    pub(crate) fn reset(&mut self) {
        self.used = 0;
    }
}

fn is_unresolved(cell: &Cell) -> bool {
    cell.is_active() && !cell.is_correct() && !cell.is_revealed()
}
