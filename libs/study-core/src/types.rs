//! Core types for study sessions.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A single term/definition pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Flashcard {
    pub id: String,
    pub term: String,
    pub definition: String,
    /// Opaque image reference (URL or encoded data), never inspected.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    pub order: i32,
}

impl Flashcard {
    pub fn new(
        id: impl Into<String>,
        term: impl Into<String>,
        definition: impl Into<String>,
        order: i32,
    ) -> Self {
        Self {
            id: id.into(),
            term: term.into(),
            definition: definition.into(),
            image: None,
            order,
        }
    }
}

/// Ordered snapshot of a study set's flashcards.
///
/// Cards are kept sorted by `order` ascending; ties keep their input order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Deck {
    cards: Vec<Flashcard>,
}

impl Deck {
    pub fn new(mut cards: Vec<Flashcard>) -> Self {
        cards.sort_by_key(|c| c.order);
        Self { cards }
    }

    pub fn cards(&self) -> &[Flashcard] {
        &self.cards
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Flashcard> {
        self.cards.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Flashcard> {
        self.cards.iter()
    }
}

impl From<Vec<Flashcard>> for Deck {
    fn from(cards: Vec<Flashcard>) -> Self {
        Self::new(cards)
    }
}

/// Practice mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StudyMode {
    Flashcards,
    Learn,
    Test,
    Match,
}

impl StudyMode {
    /// Get the mode name as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Flashcards => "flashcards",
            Self::Learn => "learn",
            Self::Test => "test",
            Self::Match => "match",
        }
    }

    /// Smallest deck a session of this mode can start from.
    pub fn minimum_cards(&self) -> usize {
        match self {
            Self::Flashcards | Self::Learn | Self::Test => 1,
            Self::Match => 2,
        }
    }
}

impl fmt::Display for StudyMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Kind of activity recorded against a study set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivityType {
    Viewed,
    Studied,
    Completed,
}

impl ActivityType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Viewed => "viewed",
            Self::Studied => "studied",
            Self::Completed => "completed",
        }
    }
}

/// Final outcome of a completed session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionResult {
    pub mode: StudyMode,
    pub score: u32,
    pub total_questions: u32,
    pub time_spent_seconds: u64,
    pub completed: bool,
}

impl SessionResult {
    pub(crate) fn completed(
        mode: StudyMode,
        score: usize,
        total_questions: usize,
        time_spent_seconds: u64,
    ) -> Self {
        Self {
            mode,
            score: score as u32,
            total_questions: total_questions as u32,
            time_spent_seconds,
            completed: true,
        }
    }

    /// Score as a rounded percentage (0 when there were no questions).
    pub fn percentage(&self) -> u32 {
        if self.total_questions == 0 {
            return 0;
        }
        ((self.score as f64 / self.total_questions as f64) * 100.0).round() as u32
    }
}
