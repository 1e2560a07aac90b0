//! View layer
//!
//! Text rendering, input bindings and the macronutrient chart.

pub mod chart;
pub mod commands;
pub mod render;
pub mod terminal;

pub use chart::{generate_macro_pie, write_macro_pie};
pub use commands::{parse_command, Command, CommandError, HELP};
pub use render::{macro_breakdown, nutrition_stack, render, MacroSlice};
pub use terminal::TerminalView;
