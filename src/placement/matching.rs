use rand::Rng;
use serde::{Deserialize, Serialize};

use super::{Board, Layout, PlacementExercise, PlacementRules};
use crate::shuffle::shuffle_unsolved_with;

/// A left/right pair the student has to connect.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pair {
    /// Pair identity; a connection is right when both ends share it.
    #[serde(default)]
    pub id: String,

    /// Text of the left-hand term.
    #[serde(default)]
    pub left: String,

    /// Text of the right-hand term.
    #[serde(default)]
    pub right: String,
}

impl Pair {
    /// Creates a pair.
    pub fn new(id: impl Into<String>, left: impl Into<String>, right: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            left: left.into(),
            right: right.into(),
        }
    }
}

/// Matching: left terms are the items, right terms are the slots, shown shuffled.
#[derive(Clone, Debug, Default)]
pub struct MatchingRules {
    pairs: Vec<Pair>,
}

impl MatchingRules {
    /// Rules for the given pairs.
    pub fn new(pairs: Vec<Pair>) -> Self {
        Self { pairs }
    }

    /// The pairs in their canonical order.
    pub fn pairs(&self) -> &[Pair] {
        &self.pairs
    }
}

impl PlacementRules for MatchingRules {
    const KIND: &'static str = "matching";

    fn item_count(&self) -> usize {
        self.pairs.len()
    }

    fn slot_count(&self) -> usize {
        self.pairs.len()
    }

    fn is_correct(&self, slot: usize, item: usize) -> bool {
        match (self.pairs.get(slot), self.pairs.get(item)) {
            (Some(right), Some(left)) => right.id == left.id,
            _ => false,
        }
    }

    fn layout<R: Rng + ?Sized>(&self, rng: &mut R) -> Layout {
        let slots: Vec<usize> = (0..self.pairs.len()).collect();

        Layout {
            board: Board::new(slots.clone(), self.pairs.len()),
            slot_order: shuffle_unsolved_with(&slots, |&slot| &self.pairs[slot].id, rng),
        }
    }
}

/// A matching exercise.
pub type Matching = PlacementExercise<MatchingRules>;

impl Matching {
    /// Sets up a matching exercise with the right column shuffled.
    pub fn from_pairs(pairs: Vec<Pair>) -> Self {
        Self::new(MatchingRules::new(pairs))
    }

    /// The pairs in their canonical order.
    pub fn pairs(&self) -> &[Pair] {
        self.rules().pairs()
    }

    /// The right-hand slot a left-hand item is connected to.
    pub fn connection(&self, item: usize) -> Option<usize> {
        match self.board().location(item)? {
            super::Location::Slot(slot) => Some(slot),
            super::Location::Pool => None,
        }
    }

    /// Clicking a left-hand term: a connected term is disconnected, any other term is
    /// selected (or deselected when clicked twice).
    pub fn click_left(&mut self, item: usize) -> bool {
        if self.connection(item).is_some() {
            return self.return_to_pool(item);
        }

        self.select(item)
    }

    /// The right-hand text the student connected to a left-hand term.
    pub fn user_answer(&self, item: usize) -> Option<&str> {
        let slot = self.connection(item)?;
        self.pairs().get(slot).map(|pair| pair.right.as_str())
    }

    /// The right-hand text that belongs to a left-hand term.
    pub fn correct_answer(&self, item: usize) -> Option<&str> {
        self.pairs().get(item).map(|pair| pair.right.as_str())
    }
}
