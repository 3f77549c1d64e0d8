//! # Input Module
//!
//! How the player's option choice reaches a running encounter.
//!
//! The controller suspends on an [`OptionSelector`] while it awaits an
//! option. Returning `None` means the player walked away and the encounter
//! is abandoned.

pub mod commands;

pub use commands::*;

use crate::OptionView;
use async_trait::async_trait;
use log::{debug, warn};
use std::collections::VecDeque;
use tokio::sync::mpsc;

/// Source of option choices.
#[async_trait]
pub trait OptionSelector: Send {
    /// Picks one of `options` by index, or `None` to abandon.
    async fn choose(&mut self, options: &[OptionView]) -> Option<usize>;
}

/// Replays a fixed list of choices; runs out into abandonment.
#[derive(Debug, Clone, Default)]
pub struct ScriptedSelector {
    choices: VecDeque<usize>,
}

impl ScriptedSelector {
    /// Creates a selector that answers with `choices`, in order.
    ///
    /// # Examples
    ///
    /// ```
    /// use wavebound::ScriptedSelector;
    ///
    /// let selector = ScriptedSelector::new(vec![2]);
    /// assert_eq!(selector.remaining(), 1);
    /// ```
    pub fn new(choices: Vec<usize>) -> Self {
        Self {
            choices: choices.into(),
        }
    }

    pub fn remaining(&self) -> usize {
        self.choices.len()
    }
}

#[async_trait]
impl OptionSelector for ScriptedSelector {
    async fn choose(&mut self, _options: &[OptionView]) -> Option<usize> {
        let choice = self.choices.pop_front();
        debug!("Scripted choice: {:?}", choice);
        choice
    }
}

/// Always takes the first selectable option.
#[derive(Debug, Clone, Copy, Default)]
pub struct FirstSelectable;

#[async_trait]
impl OptionSelector for FirstSelectable {
    async fn choose(&mut self, options: &[OptionView]) -> Option<usize> {
        options
            .iter()
            .find(|view| view.is_selectable())
            .map(|view| view.index)
    }
}

/// Choices sent from another task, e.g. a UI. A closed channel abandons.
#[async_trait]
impl OptionSelector for mpsc::Receiver<usize> {
    async fn choose(&mut self, options: &[OptionView]) -> Option<usize> {
        loop {
            let index = self.recv().await?;
            match options.get(index) {
                Some(view) if view.is_selectable() => return Some(index),
                _ => warn!("Ignoring choice {}: not a selectable option", index + 1),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::OptionAvailability;

    fn views() -> Vec<OptionView> {
        [
            OptionAvailability::Disabled,
            OptionAvailability::Hidden,
            OptionAvailability::Selectable,
        ]
        .into_iter()
        .enumerate()
        .map(|(index, availability)| OptionView {
            index,
            label: format!("option {}", index + 1),
            tooltip: String::new(),
            availability,
        })
        .collect()
    }

    #[tokio::test]
    async fn test_scripted_selector_runs_out() {
        let mut selector = ScriptedSelector::new(vec![2]);
        assert_eq!(selector.choose(&views()).await, Some(2));
        assert_eq!(selector.choose(&views()).await, None);
    }

    #[tokio::test]
    async fn test_first_selectable() {
        assert_eq!(FirstSelectable.choose(&views()).await, Some(2));
    }

    #[tokio::test]
    async fn test_channel_skips_unselectable_choices() {
        let (tx, mut rx) = mpsc::channel(4);
        tx.send(0).await.unwrap();
        tx.send(9).await.unwrap();
        tx.send(2).await.unwrap();
        assert_eq!(rx.choose(&views()).await, Some(2));

        drop(tx);
        assert_eq!(rx.choose(&views()).await, None);
    }
}
