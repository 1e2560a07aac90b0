//! Input line bindings
//!
//! Each line typed at the prompt becomes one [`Command`]. Plain text is a
//! search query; the keywords below drive selection and the chart.

use std::path::PathBuf;

use thiserror::Error;

use crate::models::{parse_quantity_input, FoodId};
use crate::session::Intent;

pub const HELP: &str = "\
Commands:
  <text>                  search for foods (same as: search <text>, / <text>)
  search                  clear the search
  toggle <id>  | t <id>   select or deselect a food
  qty <id> <g> | q <id> <g>
                          set the grams of a selected food (minimum 1)
  remove <id>  | rm <id>  drop a food from the meal
  chart <path>            write the macronutrient pie chart as PNG
  show                    redraw
  help                    this text
  quit                    exit";

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Intent(Intent),
    Chart(PathBuf),
    Show,
    Help,
    Quit,
}

#[derive(Debug, Error, PartialEq)]
pub enum CommandError {
    #[error("{0} needs a food id")]
    MissingId(&'static str),

    #[error("{0:?} is not a food id")]
    BadId(String),

    #[error("chart needs a file path")]
    MissingPath,
}

/// Parse one input line
pub fn parse_command(line: &str) -> Result<Command, CommandError> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(Command::Show);
    }

    let (word, rest) = match line.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim()),
        None => (line, ""),
    };

    let command = match word.to_lowercase().as_str() {
        "search" | "/" => Command::Intent(Intent::QueryChanged(rest.to_string())),
        "toggle" | "t" => Command::Intent(Intent::Toggle(food_id("toggle", rest)?)),
        "remove" | "rm" => Command::Intent(Intent::Remove(food_id("remove", rest)?)),
        "qty" | "q" => {
            let (id, value) = match rest.split_once(char::is_whitespace) {
                Some((id, value)) => (id, value),
                None => (rest, ""),
            };
            Command::Intent(Intent::SetQuantity {
                id: food_id("qty", id)?,
                value: parse_quantity_input(value),
            })
        }
        "chart" => {
            if rest.is_empty() {
                return Err(CommandError::MissingPath);
            }
            Command::Chart(PathBuf::from(rest))
        }
        "show" => Command::Show,
        "help" | "?" => Command::Help,
        "quit" | "exit" => Command::Quit,
        _ => Command::Intent(Intent::QueryChanged(line.to_string())),
    };
    Ok(command)
}

fn food_id(command: &'static str, text: &str) -> Result<FoodId, CommandError> {
    let text = text.trim();
    if text.is_empty() {
        return Err(CommandError::MissingId(command));
    }
    text.parse::<FoodId>()
        .map_err(|_| CommandError::BadId(text.to_string()))
}
