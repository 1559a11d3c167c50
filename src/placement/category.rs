use rand::Rng;
use serde::{Deserialize, Serialize};

use super::{Board, Layout, Location, Occupancy, PlacementExercise, PlacementRules};
use crate::shuffle::shuffle_unsolved_with;

/// A box items are sorted into.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    /// Identifier referenced by [`CategoryItem::correct_category_id`].
    #[serde(default)]
    pub id: String,

    /// Heading of the box.
    #[serde(default)]
    pub title: String,

    /// Optional color theme name, passed through for the presentation layer.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

/// An item to be sorted into a category.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryItem {
    /// Identifier of the item.
    #[serde(default)]
    pub id: String,

    /// Text shown to the student.
    #[serde(default)]
    pub text: String,

    /// The category the item belongs in.
    #[serde(rename = "correctCategoryId", default)]
    pub correct_category_id: String,
}

/// Category sorting: categories are multi-item slots, every item is judged on its own, and
/// checking needs an empty pool.
#[derive(Clone, Debug, Default)]
pub struct CategoryRules {
    categories: Vec<Category>,
    items: Vec<CategoryItem>,
}

impl CategoryRules {
    /// Rules for sorting `items` into `categories`.
    pub fn new(categories: Vec<Category>, items: Vec<CategoryItem>) -> Self {
        Self { categories, items }
    }

    /// The categories.
    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    /// The items, in configuration order.
    pub fn items(&self) -> &[CategoryItem] {
        &self.items
    }
}

impl PlacementRules for CategoryRules {
    const KIND: &'static str = "category";

    fn item_count(&self) -> usize {
        self.items.len()
    }

    fn slot_count(&self) -> usize {
        self.categories.len()
    }

    fn is_correct(&self, slot: usize, item: usize) -> bool {
        match (self.categories.get(slot), self.items.get(item)) {
            (Some(category), Some(item)) => category.id == item.correct_category_id,
            _ => false,
        }
    }

    fn layout<R: Rng + ?Sized>(&self, rng: &mut R) -> Layout {
        let items: Vec<usize> = (0..self.items.len()).collect();

        Layout {
            board: Board::new(
                shuffle_unsolved_with(&items, |&item| &self.items[item].id, rng),
                self.categories.len(),
            ),
            slot_order: (0..self.categories.len()).collect(),
        }
    }

    fn occupancy(&self) -> Occupancy {
        Occupancy::Multiple
    }

    fn is_ready(&self, board: &Board) -> bool {
        board.pool().is_empty()
    }

    /// One entry per item, in configuration order.
    fn results(&self, board: &Board) -> Vec<bool> {
        (0..self.items.len())
            .map(|item| match board.location(item) {
                Some(Location::Slot(slot)) => self.is_correct(slot, item),
                _ => false,
            })
            .collect()
    }
}

/// A category-sort exercise.
pub type CategorySort = PlacementExercise<CategoryRules>;

impl CategorySort {
    /// Sets up a category-sort exercise with a shuffled pool.
    pub fn from_items(categories: Vec<Category>, items: Vec<CategoryItem>) -> Self {
        Self::new(CategoryRules::new(categories, items))
    }

    /// The category an item was put in.
    pub fn category_of(&self, item: usize) -> Option<&Category> {
        match self.board().location(item)? {
            Location::Slot(slot) => self.rules().categories().get(slot),
            Location::Pool => None,
        }
    }

    /// Clicking an item already in a category while another item is selected: the
    /// clicked item goes back to the pool and the selected one takes its place.
    pub fn click_placed_item(&mut self, item: usize) -> bool {
        let (Some(selected), Some(Location::Slot(slot))) =
            (self.selected(), self.board().location(item))
        else {
            return self.select(item);
        };
        if selected == item {
            return self.select(item);
        }

        if !self.place(selected, slot) {
            return false;
        }
        self.return_to_pool(item);
        self.clear_selection();
        true
    }
}
