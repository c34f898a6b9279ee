//! Match mode pairing board.
//!
//! Each card contributes a term item and a definition item sharing a pair
//! index. The player selects two items; a term/definition pair with the same
//! index is marked matched, anything else just clears the selection.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::shuffle::shuffle;
use crate::types::Deck;

/// Maximum number of cards used on a board.
pub const MATCH_PAIR_LIMIT: usize = 6;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemKind {
    Term,
    Definition,
}

/// A tile on the board.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchItem {
    pub id: String,
    pub pair_index: usize,
    pub text: String,
    pub kind: ItemKind,
    pub matched: bool,
}

impl MatchItem {
    fn pairs_with(&self, other: &MatchItem) -> bool {
        self.pair_index == other.pair_index && self.kind != other.kind
    }
}

/// Selection state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", content = "item_id", rename_all = "snake_case")]
pub enum Selection {
    NoSelection,
    OneSelected(String),
}

/// What a click did to the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum ClickOutcome {
    /// Unknown or matched item, or the already selected item.
    Ignored,
    Selected,
    Matched { pair_index: usize, completed: bool },
    Mismatched,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchBoard {
    items: Vec<MatchItem>,
    selection: Selection,
    matched_pairs: usize,
    total_pairs: usize,
}

impl MatchBoard {
    /// Build a shuffled board from the first [`MATCH_PAIR_LIMIT`] cards.
    pub fn new<R: Rng + ?Sized>(deck: &Deck, rng: &mut R) -> Self {
        let cards = &deck.cards()[..deck.len().min(MATCH_PAIR_LIMIT)];

        let items: Vec<MatchItem> = cards
            .iter()
            .enumerate()
            .flat_map(|(index, card)| {
                [
                    MatchItem {
                        id: format!("term-{index}"),
                        pair_index: index,
                        text: card.term.clone(),
                        kind: ItemKind::Term,
                        matched: false,
                    },
                    MatchItem {
                        id: format!("def-{index}"),
                        pair_index: index,
                        text: card.definition.clone(),
                        kind: ItemKind::Definition,
                        matched: false,
                    },
                ]
            })
            .collect();

        Self {
            items: shuffle(&items, rng),
            selection: Selection::NoSelection,
            matched_pairs: 0,
            total_pairs: cards.len(),
        }
    }

    pub fn items(&self) -> &[MatchItem] {
        &self.items
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn matched_pairs(&self) -> usize {
        self.matched_pairs
    }

    pub fn total_pairs(&self) -> usize {
        self.total_pairs
    }

    pub fn is_complete(&self) -> bool {
        self.matched_pairs == self.total_pairs
    }

    fn position(&self, item_id: &str) -> Option<usize> {
        self.items.iter().position(|i| i.id == item_id)
    }

    /// Apply a click on `item_id`.
    pub fn click(&mut self, item_id: &str) -> ClickOutcome {
        let Some(clicked) = self.position(item_id) else {
            return ClickOutcome::Ignored;
        };
        if self.items[clicked].matched {
            return ClickOutcome::Ignored;
        }

        let selected_id = match &self.selection {
            Selection::NoSelection => None,
            Selection::OneSelected(id) if id == item_id => return ClickOutcome::Ignored,
            Selection::OneSelected(id) => Some(id.clone()),
        };
        let Some(selected_id) = selected_id else {
            self.selection = Selection::OneSelected(item_id.to_string());
            return ClickOutcome::Selected;
        };

        self.selection = Selection::NoSelection;
        let Some(selected) = self.position(&selected_id) else {
            return ClickOutcome::Mismatched;
        };

        if !self.items[selected].pairs_with(&self.items[clicked]) {
            return ClickOutcome::Mismatched;
        }

        self.items[selected].matched = true;
        self.items[clicked].matched = true;
        self.matched_pairs += 1;

        ClickOutcome::Matched {
            pair_index: self.items[clicked].pair_index,
            completed: self.is_complete(),
        }
    }
}
