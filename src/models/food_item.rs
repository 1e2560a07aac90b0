//! Food Item model
//!
//! A food as returned by the search service. Treated as an immutable snapshot:
//! a selected entry keeps the item it was selected from even after the
//! candidate list is replaced.

use serde::{Deserialize, Deserializer, Serialize};

/// Food identifier, unique within a result set
pub type FoodId = i64;

/// A food item with its nutrient content as reported by the service
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FoodItem {
    pub id: FoodId,
    #[serde(default, deserialize_with = "lenient_text")]
    pub description: String,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub energy_kcal: f64,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub protein_g: f64,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub lipid_g: f64,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub carbohydrate_g: f64,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub fiber_g: f64,
}

impl FoodItem {
    pub fn new(id: FoodId, description: impl Into<String>) -> Self {
        Self {
            id,
            description: description.into(),
            energy_kcal: 0.0,
            protein_g: 0.0,
            lipid_g: 0.0,
            carbohydrate_g: 0.0,
            fiber_g: 0.0,
        }
    }
}

/// Accepts a JSON number, a numeric string or null (as 0).
///
/// The database behind the search service exports some nutrient columns as
/// text, so `"12.5"` has to read the same as `12.5`.
fn lenient_f64<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum NumberOrText {
        Number(f64),
        Text(String),
        Null(()),
    }

    match NumberOrText::deserialize(deserializer)? {
        NumberOrText::Number(n) => Ok(n),
        NumberOrText::Null(()) => Ok(0.0),
        NumberOrText::Text(s) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                return Ok(0.0);
            }
            trimmed
                .parse::<f64>()
                .map_err(|_| serde::de::Error::custom(format!("not a number: {:?}", s)))
        }
    }
}

/// Display text: null reads as empty and numbers are shown as written
fn lenient_text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum TextOrOther {
        Text(String),
        Number(serde_json::Number),
        Null(()),
    }

    Ok(match TextOrOther::deserialize(deserializer)? {
        TextOrOther::Text(s) => s,
        TextOrOther::Number(n) => n.to_string(),
        TextOrOther::Null(()) => String::new(),
    })
}
