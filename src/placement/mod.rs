//! The pool-to-slot placement protocol shared by matching, gap-fill, sorting and
//! category-sort exercises.
//!
//! Items start in a pool (or, for sorting, already arranged in the slots). The student
//! moves them into slots either by selecting an item and then a slot, or by dragging an
//! item onto a slot. Both gestures end in the same move. Checking is allowed once the
//! exercise's readiness rule holds, emits one [`Completion`] and locks the exercise.

mod category;
mod gap_fill;
mod matching;
mod sorting;

use rand::Rng;
use tracing::{debug, info};

pub use category::{Category, CategoryItem, CategoryRules, CategorySort};
pub use gap_fill::{parse_sentence, GapFill, GapFillRules, SentencePart, WordTile, GAP_MARKER};
pub use matching::{Matching, MatchingRules, Pair};
pub use sorting::{SortItem, Sorting, SortingRules};

use crate::{Completion, Score};

/// How many items a slot holds.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Occupancy {
    /// One item per slot; placing into a full slot displaces the occupant.
    Single,

    /// Any number of items per slot.
    Multiple,
}

/// Where a displaced occupant of a single-occupancy slot goes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Eviction {
    /// Back to the pool.
    ToPool,

    /// Into the slot the incoming item came from, or the pool if it came from there.
    Swap,
}

/// Where an item currently is.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Location {
    /// Not placed.
    Pool,

    /// In the slot with this index.
    Slot(usize),
}

/// The placement map: which items sit in which slot, and the ordered pool of the rest.
///
/// Items and slots are indices into the exercise's own lists. Every item appears exactly
/// once across the pool and the slots.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Board {
    pool: Vec<usize>,
    slots: Vec<Vec<usize>>,
}

impl Board {
    /// A board with `pool` unplaced and `slot_count` empty slots.
    pub fn new(pool: Vec<usize>, slot_count: usize) -> Self {
        Self {
            pool,
            slots: vec![Vec::new(); slot_count],
        }
    }

    /// A board with one item in each slot, in the given order, and an empty pool.
    pub fn arranged(items: Vec<usize>) -> Self {
        Self {
            pool: Vec::new(),
            slots: items.into_iter().map(|item| vec![item]).collect(),
        }
    }

    /// Unplaced items, in presentation order.
    pub fn pool(&self) -> &[usize] {
        &self.pool
    }

    /// Number of slots.
    pub fn slot_count(&self) -> usize {
        self.slots.len()
    }

    /// Items in a slot, in placement order. Empty for an unknown slot.
    pub fn slot(&self, slot: usize) -> &[usize] {
        self.slots.get(slot).map(Vec::as_slice).unwrap_or_default()
    }

    /// The first item in a slot.
    pub fn occupant(&self, slot: usize) -> Option<usize> {
        self.slot(slot).first().copied()
    }

    /// Where `item` is, or [`None`] if the board does not hold it.
    pub fn location(&self, item: usize) -> Option<Location> {
        if self.pool.contains(&item) {
            return Some(Location::Pool);
        }

        self.slots
            .iter()
            .position(|items| items.contains(&item))
            .map(Location::Slot)
    }

    /// Whether every slot holds at least one item.
    pub fn all_slots_filled(&self) -> bool {
        self.slots.iter().all(|items| !items.is_empty())
    }

    /// Whether the pool and slots together hold exactly the items `0..item_count`, each
    /// once.
    pub fn is_conserved(&self, item_count: usize) -> bool {
        let mut seen = vec![false; item_count];

        for &item in self.pool.iter().chain(self.slots.iter().flatten()) {
            match seen.get_mut(item) {
                Some(seen) if !*seen => *seen = true,
                _ => return false,
            }
        }

        seen.into_iter().all(|seen| seen)
    }

    fn take(&mut self, item: usize, from: Location) {
        let items = match from {
            Location::Pool => &mut self.pool,
            Location::Slot(slot) => &mut self.slots[slot],
        };
        items.retain(|&other| other != item);
    }

    /// Moves `item` into `slot`. Returns whether the board changed.
    fn place(&mut self, item: usize, slot: usize, occupancy: Occupancy, eviction: Eviction) -> bool {
        if slot >= self.slots.len() {
            return false;
        }

        let Some(from) = self.location(item) else {
            return false;
        };
        if from == Location::Slot(slot) {
            return false;
        }

        self.take(item, from);

        if occupancy == Occupancy::Single {
            for evicted in std::mem::take(&mut self.slots[slot]) {
                match (eviction, from) {
                    (Eviction::Swap, Location::Slot(origin)) => self.slots[origin].push(evicted),
                    _ => self.pool.push(evicted),
                }
            }
        }

        self.slots[slot].push(item);
        true
    }

    fn return_to_pool(&mut self, item: usize) -> bool {
        match self.location(item) {
            Some(from @ Location::Slot(_)) => {
                self.take(item, from);
                self.pool.push(item);
                true
            }
            _ => false,
        }
    }

    /// Replaces the slot contents with one item per slot, in the given order.
    pub(crate) fn rearrange(&mut self, order: Vec<usize>) {
        self.slots = order.into_iter().map(|item| vec![item]).collect();
    }
}

/// The initial state of a placement exercise.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Layout {
    /// Where the items start.
    pub board: Board,

    /// The order slots are presented in.
    pub slot_order: Vec<usize>,
}

/// What distinguishes one placement exercise from another: what the slots are, how many
/// items they take, and when a placement is correct.
pub trait PlacementRules {
    /// A short name used in log messages.
    const KIND: &'static str;

    /// Number of movable items.
    fn item_count(&self) -> usize;

    /// Number of slots.
    fn slot_count(&self) -> usize;

    /// Whether `item` is the right one for `slot`.
    fn is_correct(&self, slot: usize, item: usize) -> bool;

    /// Builds a fresh, shuffled starting state.
    fn layout<R: Rng + ?Sized>(&self, rng: &mut R) -> Layout;

    /// How many items fit in a slot.
    fn occupancy(&self) -> Occupancy {
        Occupancy::Single
    }

    /// Where displaced items go.
    fn eviction(&self) -> Eviction {
        Eviction::ToPool
    }

    /// Whether placed items may be taken back into the pool.
    fn allows_pool_return(&self) -> bool {
        true
    }

    /// Whether the answers may be checked.
    fn is_ready(&self, board: &Board) -> bool {
        board.all_slots_filled()
    }

    /// Correctness of each judged answer. By default one entry per slot, judging its
    /// occupant; an empty slot counts as wrong.
    fn results(&self, board: &Board) -> Vec<bool> {
        (0..self.slot_count())
            .map(|slot| {
                board
                    .occupant(slot)
                    .is_some_and(|item| self.is_correct(slot, item))
            })
            .collect()
    }
}

/// A placement exercise driven by the rules `R`.
#[derive(Clone, Debug)]
pub struct PlacementExercise<R> {
    rules: R,
    board: Board,
    slot_order: Vec<usize>,
    selected: Option<usize>,
    dragging: Option<usize>,
    results: Option<Vec<bool>>,
}

impl<R: PlacementRules> PlacementExercise<R> {
    /// Sets up the exercise with a shuffled layout from the thread-local generator.
    pub fn new(rules: R) -> Self {
        Self::with_rng(rules, &mut rand::thread_rng())
    }

    /// Sets up the exercise, shuffling with `rng`.
    pub fn with_rng<G: Rng + ?Sized>(rules: R, rng: &mut G) -> Self {
        let Layout { board, slot_order } = rules.layout(rng);

        Self {
            rules,
            board,
            slot_order,
            selected: None,
            dragging: None,
            results: None,
        }
    }

    /// The rules of this exercise.
    pub fn rules(&self) -> &R {
        &self.rules
    }

    /// The current placement map.
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// The order slots are presented in.
    pub fn slot_order(&self) -> &[usize] {
        &self.slot_order
    }

    /// The selected item, if any.
    pub fn selected(&self) -> Option<usize> {
        self.selected
    }

    /// The item being dragged, if any.
    pub fn dragging(&self) -> Option<usize> {
        self.dragging
    }

    /// Whether the exercise was checked. A locked exercise ignores all input.
    pub fn is_locked(&self) -> bool {
        self.results.is_some()
    }

    /// Per-answer results, available once checked.
    pub fn results(&self) -> Option<&[bool]> {
        self.results.as_deref()
    }

    /// The completion that was emitted, if the exercise was checked.
    pub fn completion(&self) -> Option<Completion> {
        self.results
            .as_ref()
            .map(|results| Self::score_results(results).into())
    }

    /// The score the current placement would get.
    pub fn score(&self) -> Score {
        Self::score_results(&self.rules.results(&self.board))
    }

    fn score_results(results: &[bool]) -> Score {
        Score::new(results.iter().filter(|&&ok| ok).count(), results.len())
    }

    /// Selects an item, or deselects it if it was already selected.
    pub fn select(&mut self, item: usize) -> bool {
        if self.is_locked() || self.board.location(item).is_none() {
            return false;
        }

        self.selected = if self.selected == Some(item) {
            None
        } else {
            Some(item)
        };
        true
    }

    /// Drops the selection.
    pub fn clear_selection(&mut self) {
        self.selected = None;
    }

    /// Moves the selected item into `slot`. Does nothing without a selection.
    pub fn target(&mut self, slot: usize) -> bool {
        let Some(item) = self.selected else {
            return false;
        };

        let moved = self.place(item, slot);
        if moved {
            self.selected = None;
        }
        moved
    }

    /// Moves the selected item back to the pool.
    pub fn target_pool(&mut self) -> bool {
        let Some(item) = self.selected else {
            return false;
        };

        self.selected = None;
        self.return_to_pool(item)
    }

    /// Starts dragging an item.
    pub fn begin_drag(&mut self, item: usize) -> bool {
        if self.is_locked() || self.board.location(item).is_none() {
            return false;
        }

        self.dragging = Some(item);
        true
    }

    /// Drops the dragged item onto `slot`.
    pub fn drop_on(&mut self, slot: usize) -> bool {
        match self.dragging.take() {
            Some(item) => self.place(item, slot),
            None => false,
        }
    }

    /// Drops the dragged item onto the pool.
    pub fn drop_on_pool(&mut self) -> bool {
        match self.dragging.take() {
            Some(item) => self.return_to_pool(item),
            None => false,
        }
    }

    /// Drops the dragged item somewhere that is not a target. Nothing moves; returns
    /// whether a drag was in progress.
    pub fn drop_outside(&mut self) -> bool {
        self.dragging.take().is_some()
    }

    /// Moves `item` into `slot`, applying the exercise's occupancy and eviction rules.
    pub fn place(&mut self, item: usize, slot: usize) -> bool {
        if self.is_locked() {
            return false;
        }

        let moved = self
            .board
            .place(item, slot, self.rules.occupancy(), self.rules.eviction());
        if moved {
            debug_assert!(self.board.is_conserved(self.rules.item_count()));
            debug!(kind = R::KIND, item, slot, "placed item");
        }
        moved
    }

    /// Takes a placed item back into the pool.
    pub fn return_to_pool(&mut self, item: usize) -> bool {
        if self.is_locked() || !self.rules.allows_pool_return() {
            return false;
        }

        let moved = self.board.return_to_pool(item);
        if moved {
            if self.selected == Some(item) {
                self.selected = None;
            }
            debug!(kind = R::KIND, item, "returned item to pool");
        }
        moved
    }

    /// Whether the answers may be checked now.
    pub fn can_check(&self) -> bool {
        !self.is_locked() && self.rules.is_ready(&self.board)
    }

    /// Judges the placement, locks the exercise and returns the completion.
    ///
    /// Returns [`None`] when the exercise is not ready or was already checked.
    pub fn check_answers(&mut self) -> Option<Completion> {
        if !self.can_check() {
            return None;
        }

        let results = self.rules.results(&self.board);
        let completion: Completion = Self::score_results(&results).into();
        self.results = Some(results);
        self.selected = None;
        self.dragging = None;

        info!(
            kind = R::KIND,
            correct = completion.correct,
            total = completion.total,
            "exercise checked"
        );

        Some(completion)
    }

    /// Starts over with a fresh shuffle. Unavailable once checked.
    pub fn reset(&mut self) -> bool {
        self.reset_with(&mut rand::thread_rng())
    }

    /// Like [`PlacementExercise::reset`], shuffling with `rng`.
    pub fn reset_with<G: Rng + ?Sized>(&mut self, rng: &mut G) -> bool {
        if self.is_locked() {
            return false;
        }

        let Layout { board, slot_order } = self.rules.layout(rng);
        self.board = board;
        self.slot_order = slot_order;
        self.selected = None;
        self.dragging = None;
        debug!(kind = R::KIND, "exercise reset");

        true
    }

    pub(crate) fn board_mut(&mut self) -> Option<&mut Board> {
        (!self.is_locked()).then_some(&mut self.board)
    }
}
