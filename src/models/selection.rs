//! Selection store
//!
//! The foods the user has put in the meal, keyed by food id, with a gram
//! quantity each. Insertion order is kept so the selected list renders stably
//! and the calculation request lists foods in the order they were picked.

use std::sync::Arc;

use serde::Serialize;

use super::calculation::MealItem;
use super::food_item::{FoodId, FoodItem};

/// Quantity given to a food when it is first selected
pub const DEFAULT_QUANTITY_GRAMS: u32 = 100;

/// Smallest quantity the store will hold
pub const MIN_QUANTITY_GRAMS: u32 = 1;

/// A selected food and how many grams of it are in the meal
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SelectionEntry {
    pub item: FoodItem,
    pub quantity: u32,
}

/// Immutable view of the store at one revision
#[derive(Debug, Clone, PartialEq)]
pub struct SelectionSnapshot {
    pub revision: u64,
    pub entries: Arc<[SelectionEntry]>,
}

impl SelectionSnapshot {
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// `(food_id, grams)` pairs in selection order
    pub fn meal(&self) -> Vec<MealItem> {
        self.entries.iter().map(MealItem::from).collect()
    }
}

#[derive(Debug, Clone, Default)]
pub struct SelectionStore {
    entries: Vec<SelectionEntry>,
    revision: u64,
}

impl SelectionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Remove the item if it is selected, otherwise add it at the default quantity.
    ///
    /// Returns `true` when the item is selected afterwards.
    pub fn toggle(&mut self, item: &FoodItem) -> bool {
        self.revision += 1;
        match self.position(item.id) {
            Some(index) => {
                self.entries.remove(index);
                false
            }
            None => {
                self.entries.push(SelectionEntry {
                    item: item.clone(),
                    quantity: DEFAULT_QUANTITY_GRAMS,
                });
                true
            }
        }
    }

    /// Overwrite the quantity of a selected food, clamped to at least 1 gram.
    ///
    /// `None` stands for non-numeric input. Unknown ids are ignored; returns
    /// whether an entry was updated.
    pub fn set_quantity(&mut self, id: FoodId, value: Option<i64>) -> bool {
        let quantity = clamp_quantity(value);
        match self.entries.iter_mut().find(|e| e.item.id == id) {
            Some(entry) => {
                entry.quantity = quantity;
                self.revision += 1;
                true
            }
            None => false,
        }
    }

    /// Same as [`set_quantity`](Self::set_quantity) for raw editor text
    pub fn set_quantity_text(&mut self, id: FoodId, text: &str) -> bool {
        self.set_quantity(id, parse_quantity_input(text))
    }

    /// Selected entries in insertion order
    pub fn values(&self) -> impl Iterator<Item = &SelectionEntry> {
        self.entries.iter()
    }

    pub fn get(&self, id: FoodId) -> Option<&SelectionEntry> {
        self.entries.iter().find(|e| e.item.id == id)
    }

    pub fn contains(&self, id: FoodId) -> bool {
        self.position(id).is_some()
    }

    pub fn quantity_for(&self, id: FoodId) -> Option<u32> {
        self.get(id).map(|e| e.quantity)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Bumped on every mutation, including quantity edits to the same value
    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn snapshot(&self) -> SelectionSnapshot {
        SelectionSnapshot {
            revision: self.revision,
            entries: self.entries.clone().into(),
        }
    }

    fn position(&self, id: FoodId) -> Option<usize> {
        self.entries.iter().position(|e| e.item.id == id)
    }
}

/// Clamp a requested quantity into the stored range (non-numeric reads as 1)
pub fn clamp_quantity(value: Option<i64>) -> u32 {
    match value {
        Some(v) if v >= MIN_QUANTITY_GRAMS as i64 => u32::try_from(v).unwrap_or(u32::MAX),
        _ => MIN_QUANTITY_GRAMS,
    }
}

/// Read a quantity editor's text the way a number field is read with `parseInt`.
///
/// Leading whitespace and an optional sign are accepted, then the leading run
/// of digits is taken: `"150g"` is 150, `"12.7"` is 12, `"abc"` is `None`.
pub fn parse_quantity_input(text: &str) -> Option<i64> {
    let s = text.trim_start();
    let (negative, digits) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };

    let end = digits
        .bytes()
        .position(|b| !b.is_ascii_digit())
        .unwrap_or(digits.len());
    if end == 0 {
        return None;
    }

    // Longer than i64 still counts as "a very large number"
    let magnitude = digits[..end].parse::<i64>().unwrap_or(i64::MAX);
    Some(if negative { -magnitude } else { magnitude })
}
