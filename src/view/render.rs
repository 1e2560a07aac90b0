//! Text rendering of a [`ViewState`]
//!
//! Layout top to bottom: the result block (breakdown and nutrition stack) and
//! the selected list when something is selected, then the search box and the
//! candidate cards.

use std::fmt::Write;

use crate::models::{CalculationResult, FoodId, FoodItem, Macronutrient, DEFAULT_QUANTITY_GRAMS};
use crate::session::{DisplayMode, ViewState};

use super::chart::hex_color;

const BAR_WIDTH: usize = 40;

/// One slice of the macronutrient breakdown
#[derive(Debug, Clone, PartialEq)]
pub struct MacroSlice {
    pub nutrient: Macronutrient,
    pub color: String,
    pub percent: f64,
    pub grams: f64,
}

/// Slices ranked by share, largest first. Ties keep carbs, protein, fat order.
pub fn macro_breakdown(result: &CalculationResult) -> Vec<MacroSlice> {
    let mut slices: Vec<MacroSlice> = Macronutrient::ALL
        .iter()
        .map(|n| MacroSlice {
            nutrient: *n,
            color: hex_color(*n),
            percent: result.percentage(*n),
            grams: result.grams(*n),
        })
        .collect();
    slices.sort_by(|a, b| b.percent.total_cmp(&a.percent));
    slices
}

/// The nutrition stack: label and formatted value, in display order
pub fn nutrition_stack(result: &CalculationResult) -> Vec<(&'static str, String)> {
    vec![
        ("Insulin", format!("{:.1}u", result.insulin_needed)),
        ("Energy", format!("{:.1}kcal", result.energy_kcal)),
        ("Carbs", format!("{:.1}g", result.carbohydrate_g)),
        ("Protein", format!("{:.1}g", result.protein_g)),
        ("Fat", format!("{:.1}g", result.lipid_g)),
        ("Fiber", format!("{:.1}g", result.fiber_g)),
    ]
}

/// Proportional bar, one letter per macronutrient (`C`, `P`, `F`)
fn breakdown_bar(slices: &[MacroSlice]) -> String {
    let total: f64 = slices.iter().map(|s| s.percent.max(0.0)).sum();
    if total <= 0.0 {
        return format!("[{}]", " ".repeat(BAR_WIDTH));
    }

    let mut bar = String::with_capacity(BAR_WIDTH + 2);
    bar.push('[');
    let mut used = 0;
    for (i, slice) in slices.iter().enumerate() {
        let cells = if i + 1 == slices.len() {
            BAR_WIDTH - used
        } else {
            ((slice.percent.max(0.0) / total) * BAR_WIDTH as f64).round() as usize
        };
        let cells = cells.min(BAR_WIDTH - used);
        let mark = match slice.nutrient {
            Macronutrient::Carbohydrate => 'C',
            Macronutrient::Protein => 'P',
            Macronutrient::Fat => 'F',
        };
        bar.extend(std::iter::repeat(mark).take(cells));
        used += cells;
    }
    bar.push(']');
    bar
}

/// Quantity editor of a candidate card: live when selected, locked otherwise
pub fn quantity_editor(state: &ViewState, id: FoodId) -> String {
    match state.quantity_for(id) {
        Some(quantity) => format!("[{:>5} g]", quantity),
        None => format!("({:>5} g)", DEFAULT_QUANTITY_GRAMS),
    }
}

fn candidate_card(out: &mut String, state: &ViewState, item: &FoodItem) {
    let marker = if state.is_selected(item.id) { '*' } else { ' ' };
    let _ = writeln!(out, "{} [{}] {}", marker, item.id, item.description);
    let _ = writeln!(
        out,
        "      {:.0} kcal | Carbs: {:.1}g | Protein: {:.1}g | Fiber: {:.1}g | Fat: {:.1}g   qty {}",
        item.energy_kcal,
        item.carbohydrate_g,
        item.protein_g,
        item.fiber_g,
        item.lipid_g,
        quantity_editor(state, item.id),
    );
}

fn result_block(out: &mut String, result: &CalculationResult) {
    let slices = macro_breakdown(result);
    let _ = writeln!(out, "Breakdown {}", breakdown_bar(&slices));
    for slice in &slices {
        let _ = writeln!(
            out,
            "  {:<8} {} {:>5.1}%  {:.1}g",
            slice.nutrient.label(),
            slice.color,
            slice.percent,
            slice.grams
        );
    }
    let _ = writeln!(out);
    for (label, value) in nutrition_stack(result) {
        let _ = writeln!(out, "  {:<8} {:>12}", label, value);
    }
}

/// Render a whole frame
pub fn render(state: &ViewState) -> String {
    let mut out = String::new();

    if state.mode() == DisplayMode::Composed {
        let _ = writeln!(out, "=== Meal ===");
        match &state.result {
            Some(result) => result_block(&mut out, result),
            None => {
                let _ = writeln!(out, "  Calculating...");
            }
        }

        let _ = writeln!(out);
        let _ = writeln!(out, "Selected ({}):", state.selection.entries.len());
        for entry in state.selection.entries.iter() {
            let _ = writeln!(
                out,
                "  [{}] {:<40} [{:>5} g]  (rm {})",
                entry.item.id, entry.item.description, entry.quantity, entry.item.id
            );
        }
        let _ = writeln!(out);
    }

    let status = if state.searching { "  (searching...)" } else { "" };
    let _ = writeln!(out, "Search: \"{}\"{}", state.query, status);
    if state.candidates.is_empty() {
        let _ = writeln!(out, "  No foods to show.");
    }
    for item in state.candidates.iter() {
        candidate_card(&mut out, state, item);
    }

    out
}
