//! Data models
//!
//! Wire types exchanged with the nutrition services, and the selection store.

mod calculation;
mod food_item;
mod search;
mod selection;

pub use calculation::{
    CalculationRequest, CalculationResult, MacroPercentages, Macronutrient, MealItem,
    CALCULATION_MODE, FACTOR_INSULIN_CHO,
};
pub use food_item::{FoodId, FoodItem};
pub use search::{parse_search_items, SearchPayloadError, SearchRequest, MAX_SEARCH_RESULTS};
pub use selection::{
    clamp_quantity, parse_quantity_input, SelectionEntry, SelectionSnapshot, SelectionStore,
    DEFAULT_QUANTITY_GRAMS, MIN_QUANTITY_GRAMS,
};
