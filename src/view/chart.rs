//! Macronutrient pie chart
//!
//! Drawn with plotters into an RGB buffer and encoded as PNG.

use std::path::Path;

use image::{DynamicImage, ImageFormat, RgbImage};
use plotters::element::Pie;
use plotters::prelude::*;

use crate::models::{CalculationResult, Macronutrient};

// ============================================================================
// Color Constants (RGB 0-255)
// ============================================================================

const COLOR_CARBS: (u8, u8, u8) = (0xe6, 0x73, 0x3b);   // #e6733b
const COLOR_PROTEIN: (u8, u8, u8) = (0x35, 0x9a, 0xcc); // #359acc
const COLOR_FAT: (u8, u8, u8) = (0xe4, 0xa6, 0x16);     // #e4a616

pub const CHART_WIDTH: u32 = 640;
pub const CHART_HEIGHT: u32 = 320;

/// Fixed colour slot of each macronutrient
pub fn macro_color(nutrient: Macronutrient) -> (u8, u8, u8) {
    match nutrient {
        Macronutrient::Carbohydrate => COLOR_CARBS,
        Macronutrient::Protein => COLOR_PROTEIN,
        Macronutrient::Fat => COLOR_FAT,
    }
}

/// `#rrggbb` form of a colour slot
pub fn hex_color(nutrient: Macronutrient) -> String {
    let (r, g, b) = macro_color(nutrient);
    format!("#{:02x}{:02x}{:02x}", r, g, b)
}

/// Generate the carbs/protein/fat breakdown as PNG bytes
pub fn generate_macro_pie(result: &CalculationResult, width: u32, height: u32) -> Result<Vec<u8>, String> {
    let sizes: Vec<f64> = Macronutrient::ALL
        .iter()
        .map(|n| result.percentage(*n).max(0.0))
        .collect();
    if sizes.iter().sum::<f64>() <= 0.0 {
        return Err("No macronutrient data to chart".to_string());
    }

    let colors: Vec<RGBColor> = Macronutrient::ALL
        .iter()
        .map(|n| {
            let (r, g, b) = macro_color(*n);
            RGBColor(r, g, b)
        })
        .collect();
    let labels: Vec<String> = Macronutrient::ALL
        .iter()
        .map(|n| {
            format!(
                "{}: {:.1}% ({:.1}g)",
                n.label(),
                result.percentage(*n),
                result.grams(*n)
            )
        })
        .collect();

    let mut buffer = vec![0u8; (width * height * 3) as usize];

    {
        let root = BitMapBackend::with_buffer(&mut buffer, (width, height)).into_drawing_area();
        root.fill(&WHITE).map_err(|e| e.to_string())?;

        let center = ((width / 2) as i32, (height / 2) as i32);
        let radius = (width.min(height) as f64 / 2.0 - 60.0).max(20.0);

        let mut pie = Pie::new(&center, &radius, &sizes, &colors, &labels);
        pie.start_angle(-90.0);
        pie.label_style(("sans-serif", 16).into_font().color(&BLACK));
        pie.label_offset(20.0);
        root.draw(&pie).map_err(|e| e.to_string())?;

        root.present().map_err(|e| e.to_string())?;
    }

    let img = RgbImage::from_raw(width, height, buffer).ok_or("Failed to create image from buffer")?;

    let mut png_bytes = Vec::new();
    DynamicImage::ImageRgb8(img)
        .write_to(&mut std::io::Cursor::new(&mut png_bytes), ImageFormat::Png)
        .map_err(|e| e.to_string())?;

    Ok(png_bytes)
}

/// Render the chart at the default size and write it to `path`
pub fn write_macro_pie(result: &CalculationResult, path: &Path) -> Result<(), String> {
    let png = generate_macro_pie(result, CHART_WIDTH, CHART_HEIGHT)?;
    std::fs::write(path, png).map_err(|e| format!("Failed to write {}: {}", path.display(), e))
}
