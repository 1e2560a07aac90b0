//! Search request and response handling

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use super::food_item::FoodItem;

/// Number of candidates requested per search
pub const MAX_SEARCH_RESULTS: u32 = 60;

/// Body of a search request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchRequest {
    pub name: String,
    pub categories: Vec<String>,
    pub ascending: bool,
    pub max_results: u32,
}

impl SearchRequest {
    pub fn for_query(query: impl Into<String>) -> Self {
        Self {
            name: query.into(),
            categories: Vec::new(),
            ascending: false,
            max_results: MAX_SEARCH_RESULTS,
        }
    }
}

/// Why a search body could not be turned into candidates
#[derive(Debug, Error)]
pub enum SearchPayloadError {
    /// `items` is missing or not an array
    #[error("search response has no items array")]
    MissingItems,
}

/// Pull the candidate list out of a search response body.
///
/// Elements are decoded one at a time; one that is not a food item at all
/// (no usable `id`, say) is skipped with a warning and the rest are kept.
pub fn parse_search_items(body: Value) -> Result<Vec<FoodItem>, SearchPayloadError> {
    let items = match body {
        Value::Object(mut map) => match map.remove("items") {
            Some(Value::Array(items)) => items,
            _ => return Err(SearchPayloadError::MissingItems),
        },
        _ => return Err(SearchPayloadError::MissingItems),
    };

    Ok(items
        .into_iter()
        .enumerate()
        .filter_map(|(index, item)| match serde_json::from_value::<FoodItem>(item) {
            Ok(item) => Some(item),
            Err(e) => {
                tracing::warn!(index, error = %e, "skipping unreadable search item");
                None
            }
        })
        .collect())
}
