use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::warn;

use super::{Board, Eviction, Layout, Location, PlacementExercise, PlacementRules};
use crate::shuffle::shuffle_unsolved_with;

/// An item to be put in order.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortItem {
    /// Identifier referenced by the correct order.
    #[serde(default)]
    pub id: String,

    /// Text shown to the student.
    #[serde(default)]
    pub text: String,

    /// A value revealed after checking, e.g. the size behind a unit name.
    #[serde(rename = "displayValue", default, skip_serializing_if = "Option::is_none")]
    pub display_value: Option<String>,
}

impl SortItem {
    /// Creates an item without a display value.
    pub fn new(id: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
            display_value: None,
        }
    }
}

/// Sorting: slots are the positions of the list, every item starts in some position, and
/// moving an item onto a taken position swaps the two.
#[derive(Clone, Debug, Default)]
pub struct SortingRules {
    items: Vec<SortItem>,
}

impl SortingRules {
    /// Rules for putting `items` in `correct_order` (a list of item ids). Items the order
    /// does not mention are left out; ids that name no item are skipped.
    pub fn new(items: Vec<SortItem>, correct_order: &[String]) -> Self {
        let ordered: Vec<SortItem> = correct_order
            .iter()
            .filter_map(|id| {
                let item = items.iter().find(|item| &item.id == id);
                if item.is_none() {
                    warn!(id = id.as_str(), "sorting order names an unknown item");
                }
                item.cloned()
            })
            .collect();

        if ordered.len() != items.len() {
            warn!(
                items = items.len(),
                ordered = ordered.len(),
                "sorting order does not cover every item"
            );
        }

        Self { items: ordered }
    }

    /// The items in their correct order.
    pub fn items(&self) -> &[SortItem] {
        &self.items
    }
}

impl PlacementRules for SortingRules {
    const KIND: &'static str = "sorting";

    fn item_count(&self) -> usize {
        self.items.len()
    }

    fn slot_count(&self) -> usize {
        self.items.len()
    }

    fn is_correct(&self, slot: usize, item: usize) -> bool {
        match (self.items.get(slot), self.items.get(item)) {
            (Some(expected), Some(placed)) => expected.id == placed.id,
            _ => false,
        }
    }

    fn layout<R: Rng + ?Sized>(&self, rng: &mut R) -> Layout {
        let canonical: Vec<usize> = (0..self.items.len()).collect();
        let arrangement = shuffle_unsolved_with(&canonical, |&item| &self.items[item].id, rng);

        Layout {
            board: Board::arranged(arrangement),
            slot_order: canonical,
        }
    }

    fn eviction(&self) -> Eviction {
        Eviction::Swap
    }

    fn allows_pool_return(&self) -> bool {
        false
    }
}

/// A sorting exercise.
pub type Sorting = PlacementExercise<SortingRules>;

impl Sorting {
    /// Sets up a sorting exercise in a shuffled order.
    pub fn from_items(items: Vec<SortItem>, correct_order: &[String]) -> Self {
        Self::new(SortingRules::new(items, correct_order))
    }

    /// Item indices in their current order.
    pub fn arrangement(&self) -> Vec<usize> {
        (0..self.board().slot_count())
            .filter_map(|slot| self.board().occupant(slot))
            .collect()
    }

    /// The current position of an item.
    pub fn position(&self, item: usize) -> Option<usize> {
        match self.board().location(item)? {
            Location::Slot(slot) => Some(slot),
            Location::Pool => None,
        }
    }

    /// Clicking an item: the first click selects it, clicking it again deselects it, and
    /// clicking another item swaps the two.
    pub fn click_item(&mut self, item: usize) -> bool {
        match self.selected() {
            Some(selected) if selected != item => match self.position(item) {
                Some(slot) => self.target(slot),
                None => false,
            },
            _ => self.select(item),
        }
    }

    /// Swaps an item with its upper neighbor.
    pub fn move_up(&mut self, item: usize) -> bool {
        match self.position(item) {
            Some(slot) if slot > 0 => self.place(item, slot - 1),
            _ => false,
        }
    }

    /// Swaps an item with its lower neighbor.
    pub fn move_down(&mut self, item: usize) -> bool {
        match self.position(item) {
            Some(slot) if slot + 1 < self.board().slot_count() => self.place(item, slot + 1),
            _ => false,
        }
    }

    /// Takes an item out of the list and reinserts it at `position`, shifting the items in
    /// between.
    pub fn insert_at(&mut self, item: usize, position: usize) -> bool {
        let Some(from) = self.position(item) else {
            return false;
        };
        if from == position || position >= self.board().slot_count() {
            return false;
        }

        let mut order = self.arrangement();
        order.remove(from);
        order.insert(position, item);

        match self.board_mut() {
            Some(board) => {
                board.rearrange(order);
                true
            }
            None => false,
        }
    }

    /// The items in their correct order, shown once the answers were checked.
    pub fn solution(&self) -> Option<&[SortItem]> {
        self.is_locked().then(|| self.rules().items())
    }

    /// The 1-based position an item belongs at.
    pub fn correct_position(&self, item: usize) -> Option<usize> {
        let id = &self.rules().items().get(item)?.id;
        self.rules()
            .items()
            .iter()
            .position(|other| &other.id == id)
            .map(|index| index + 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Completion;

    fn units() -> Sorting {
        let items = ["bit", "byte", "kb", "mb", "gb"]
            .into_iter()
            .map(|id| SortItem::new(id, id.to_uppercase()))
            .collect();
        let order: Vec<String> = ["bit", "byte", "kb", "mb", "gb"]
            .into_iter()
            .map(String::from)
            .collect();

        Sorting::from_items(items, &order)
    }

    #[test]
    fn starts_shuffled_and_ready() {
        let sorting = units();

        assert_ne!(sorting.arrangement(), vec![0, 1, 2, 3, 4]);
        assert!(sorting.board().pool().is_empty());
        assert!(sorting.can_check());
        assert_eq!(sorting.solution(), None);
    }

    #[test]
    fn scores_positions_that_match() {
        let mut sorting = units();

        // present as [mb, bit, gb, byte, kb]
        sorting.board_mut().unwrap().rearrange(vec![3, 0, 4, 1, 2]);
        assert_eq!(sorting.score().correct, 0);

        // fix bit and byte
        sorting.click_item(0);
        sorting.click_item(3);
        assert_eq!(sorting.arrangement(), vec![0, 3, 4, 1, 2]);
        sorting.click_item(1);
        sorting.click_item(3);
        assert_eq!(sorting.arrangement(), vec![0, 1, 4, 3, 2]);

        assert_eq!(
            sorting.check_answers(),
            Some(Completion {
                is_correct: false,
                correct: 3,
                total: 5
            })
        );
        assert_eq!(sorting.results(), Some(&[true, true, false, true, false][..]));

        let solution: Vec<&str> = sorting
            .solution()
            .unwrap()
            .iter()
            .map(|item| item.id.as_str())
            .collect();
        assert_eq!(solution, vec!["bit", "byte", "kb", "mb", "gb"]);
    }

    #[test]
    fn up_and_down_stop_at_the_ends() {
        let mut sorting = units();
        sorting.board_mut().unwrap().rearrange(vec![1, 0, 2, 3, 4]);

        assert!(!sorting.move_up(1));
        assert!(sorting.move_up(0));
        assert_eq!(sorting.arrangement(), vec![0, 1, 2, 3, 4]);
        assert!(!sorting.move_down(4));
        assert!(sorting.move_down(3));
        assert_eq!(sorting.arrangement(), vec![0, 1, 2, 4, 3]);
    }

    #[test]
    fn insert_shifts_the_rest() {
        let mut sorting = units();
        sorting.board_mut().unwrap().rearrange(vec![4, 0, 1, 2, 3]);

        assert!(sorting.insert_at(4, 4));
        assert_eq!(sorting.arrangement(), vec![0, 1, 2, 3, 4]);
        assert!(!sorting.insert_at(4, 4));
        assert!(!sorting.insert_at(4, 9));
        assert!(sorting.board().is_conserved(5));
    }

    #[test]
    fn items_never_go_back_to_the_pool() {
        let mut sorting = units();

        assert!(!sorting.return_to_pool(0));
        sorting.begin_drag(0);
        assert!(!sorting.drop_on_pool());
        assert!(sorting.board().pool().is_empty());
    }

    #[test]
    fn drag_onto_a_position_swaps() {
        let mut sorting = units();
        sorting.board_mut().unwrap().rearrange(vec![1, 0, 2, 3, 4]);

        sorting.begin_drag(0);
        assert!(sorting.drop_on(0));
        assert_eq!(sorting.arrangement(), vec![0, 1, 2, 3, 4]);
        assert!(sorting.check_answers().unwrap().is_correct);
        assert!(!sorting.insert_at(0, 3));
    }

    #[test]
    fn unknown_ids_are_skipped() {
        let items = vec![SortItem::new("a", "A"), SortItem::new("b", "B")];
        let order = vec!["b".to_string(), "zzz".to_string(), "a".to_string()];
        let sorting = Sorting::from_items(items, &order);

        assert_eq!(sorting.rules().items().len(), 2);
        assert_eq!(sorting.rules().items()[0].id, "b");
        assert_eq!(sorting.correct_position(1), Some(2));
    }

    #[test]
    fn single_item_terminates() {
        let order = vec!["a".to_string()];
        let mut sorting = Sorting::from_items(vec![SortItem::new("a", "A")], &order);

        assert_eq!(sorting.arrangement(), vec![0]);
        assert!(sorting.check_answers().unwrap().is_correct);
    }
}
