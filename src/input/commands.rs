//! # Option Commands
//!
//! Parses typed player input into an option choice.

use crate::OptionView;

/// What a line of player input asks for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OptionCommand {
    /// Pick the option at this index
    Choose(usize),
    /// Walk away from the encounter
    Abandon,
    /// Input that names no selectable option
    Invalid(String),
}

/// Parses a 1-based option number into an option index.
///
/// # Examples
///
/// ```
/// use wavebound::parse_option_number;
///
/// assert_eq!(parse_option_number("3"), Ok(2));
/// assert!(parse_option_number("0").is_err());
/// ```
pub fn parse_option_number(input: &str) -> Result<usize, String> {
    let number: usize = input
        .trim()
        .parse()
        .map_err(|_| format!("'{}' is not an option number", input.trim()))?;
    number
        .checked_sub(1)
        .ok_or_else(|| "options are numbered from 1".to_string())
}

/// Parses `input` against the options on screen.
///
/// Accepts a 1-based option number, an option label (case-insensitive), or
/// `q`/`quit` to walk away. Hidden and disabled options cannot be chosen.
///
/// # Examples
///
/// ```
/// use wavebound::{parse_option_choice, OptionAvailability, OptionCommand, OptionView};
///
/// let options = vec![OptionView {
///     index: 0,
///     label: "Inspect".to_string(),
///     tooltip: String::new(),
///     availability: OptionAvailability::Selectable,
/// }];
/// assert_eq!(parse_option_choice("1", &options), OptionCommand::Choose(0));
/// assert_eq!(parse_option_choice("q", &options), OptionCommand::Abandon);
/// ```
pub fn parse_option_choice(input: &str, options: &[OptionView]) -> OptionCommand {
    let trimmed = input.trim();
    if trimmed.eq_ignore_ascii_case("q") || trimmed.eq_ignore_ascii_case("quit") {
        return OptionCommand::Abandon;
    }

    let found = match trimmed.parse::<usize>() {
        Ok(_) => parse_option_number(trimmed)
            .ok()
            .and_then(|index| options.iter().find(|view| view.index == index)),
        Err(_) => options
            .iter()
            .find(|view| view.is_visible() && view.label.eq_ignore_ascii_case(trimmed)),
    };

    match found {
        Some(view) if view.is_selectable() => OptionCommand::Choose(view.index),
        Some(view) if view.is_visible() => {
            OptionCommand::Invalid(format!("'{}' is not available right now", view.label))
        }
        _ => OptionCommand::Invalid(format!("no option matches '{}'", trimmed)),
    }
}
