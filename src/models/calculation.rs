//! Calculation request and result
//!
//! How insulin is derived from the meal is owned by the calculation service;
//! the client only sends the meal and displays what comes back.

use serde::{Deserialize, Serialize};

use super::food_item::FoodId;
use super::selection::SelectionEntry;

/// Grams of carbohydrate covered by one unit of insulin
pub const FACTOR_INSULIN_CHO: f64 = 10.0;

/// Calculation mode understood by the service
pub const CALCULATION_MODE: &str = "carbo";

/// One food of the meal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MealItem {
    pub food_id: FoodId,
    pub grams: u32,
}

impl From<&SelectionEntry> for MealItem {
    fn from(entry: &SelectionEntry) -> Self {
        Self {
            food_id: entry.item.id,
            grams: entry.quantity,
        }
    }
}

/// Body of a calculation request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalculationRequest {
    pub factor_insulin_cho: f64,
    pub meal: Vec<MealItem>,
    pub mode: String,
}

impl CalculationRequest {
    pub fn for_meal(meal: Vec<MealItem>) -> Self {
        Self {
            factor_insulin_cho: FACTOR_INSULIN_CHO,
            meal,
            mode: CALCULATION_MODE.to_string(),
        }
    }
}

/// Share of energy per macronutrient, in percent
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct MacroPercentages {
    #[serde(default)]
    pub carbohydrate: f64,
    #[serde(default)]
    pub protein: f64,
    #[serde(default)]
    pub lipid: f64,
}

/// Aggregate nutrition for the whole meal.
///
/// Totals the service leaves out read as 0. `percentages` is required, so an
/// error body never passes for a result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalculationResult {
    #[serde(default)]
    pub insulin_needed: f64,
    #[serde(default)]
    pub energy_kcal: f64,
    #[serde(default)]
    pub protein_g: f64,
    #[serde(default)]
    pub lipid_g: f64,
    #[serde(default)]
    pub carbohydrate_g: f64,
    #[serde(default)]
    pub fiber_g: f64,
    pub percentages: MacroPercentages,
}

/// The three macronutrients shown in the breakdown
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Macronutrient {
    Carbohydrate,
    Protein,
    Fat,
}

impl Macronutrient {
    pub const ALL: [Macronutrient; 3] = [
        Macronutrient::Carbohydrate,
        Macronutrient::Protein,
        Macronutrient::Fat,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Macronutrient::Carbohydrate => "Carbs",
            Macronutrient::Protein => "Protein",
            Macronutrient::Fat => "Fat",
        }
    }
}

impl CalculationResult {
    pub fn percentage(&self, nutrient: Macronutrient) -> f64 {
        match nutrient {
            Macronutrient::Carbohydrate => self.percentages.carbohydrate,
            Macronutrient::Protein => self.percentages.protein,
            Macronutrient::Fat => self.percentages.lipid,
        }
    }

    pub fn grams(&self, nutrient: Macronutrient) -> f64 {
        match nutrient {
            Macronutrient::Carbohydrate => self.carbohydrate_g,
            Macronutrient::Protein => self.protein_g,
            Macronutrient::Fat => self.lipid_g,
        }
    }
}
