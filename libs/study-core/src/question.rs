//! Question generation for Learn and Test modes.
//!
//! Test mode slices the deck into fixed index ranges:
//! - `[0, 5)` multiple choice
//! - `[5, 8)` true/false
//! - `[8, 10)` written
//!
//! Smaller decks simply produce fewer questions.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::distractor::{distractors_for, DEFAULT_DISTRACTOR_COUNT};
use crate::shuffle::shuffle;
use crate::types::Deck;

/// End (exclusive) of the multiple-choice range in Test mode.
pub const TEST_MULTIPLE_CHOICE_END: usize = 5;
/// End (exclusive) of the true/false range in Test mode.
pub const TEST_TRUE_FALSE_END: usize = 8;
/// End (exclusive) of the written range in Test mode.
pub const TEST_WRITTEN_END: usize = 10;
/// Offset of the definition used for a false statement, wrapping around the deck.
pub const FALSE_STATEMENT_OFFSET: usize = 5;

pub const TRUE_ANSWER: &str = "True";
pub const FALSE_ANSWER: &str = "False";

/// Question kind, without payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuestionKind {
    MultipleChoice,
    TrueFalse,
    Written,
}

/// A generated question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Question {
    MultipleChoice {
        prompt: String,
        correct_answer: String,
        options: Vec<String>,
    },
    TrueFalse {
        prompt: String,
        correct_answer: String,
    },
    Written {
        prompt: String,
        correct_answer: String,
    },
}

impl Question {
    pub fn kind(&self) -> QuestionKind {
        match self {
            Self::MultipleChoice { .. } => QuestionKind::MultipleChoice,
            Self::TrueFalse { .. } => QuestionKind::TrueFalse,
            Self::Written { .. } => QuestionKind::Written,
        }
    }

    pub fn prompt(&self) -> &str {
        match self {
            Self::MultipleChoice { prompt, .. }
            | Self::TrueFalse { prompt, .. }
            | Self::Written { prompt, .. } => prompt,
        }
    }

    pub fn correct_answer(&self) -> &str {
        match self {
            Self::MultipleChoice { correct_answer, .. }
            | Self::TrueFalse { correct_answer, .. }
            | Self::Written { correct_answer, .. } => correct_answer,
        }
    }

    /// Choices shown to the user; `None` for written questions.
    pub fn options(&self) -> Option<Vec<String>> {
        match self {
            Self::MultipleChoice { options, .. } => Some(options.clone()),
            Self::TrueFalse { .. } => Some(vec![TRUE_ANSWER.to_string(), FALSE_ANSWER.to_string()]),
            Self::Written { .. } => None,
        }
    }
}

/// One multiple-choice question per card, in deck order.
pub fn learn_questions<R: Rng + ?Sized>(deck: &Deck, rng: &mut R) -> Vec<Question> {
    (0..deck.len())
        .map(|index| multiple_choice(deck, index, rng))
        .collect()
}

/// Capped battery: multiple choice, then true/false, then written.
pub fn test_questions<R: Rng + ?Sized>(deck: &Deck, rng: &mut R) -> Vec<Question> {
    let n = deck.len();
    let mut questions = Vec::with_capacity(n.min(TEST_WRITTEN_END));

    for index in 0..n.min(TEST_MULTIPLE_CHOICE_END) {
        questions.push(multiple_choice(deck, index, rng));
    }

    for index in TEST_MULTIPLE_CHOICE_END..n.min(TEST_TRUE_FALSE_END) {
        questions.push(true_false(deck, index, rng));
    }

    for card in deck
        .iter()
        .take(TEST_WRITTEN_END)
        .skip(TEST_TRUE_FALSE_END)
    {
        questions.push(Question::Written {
            prompt: card.term.clone(),
            correct_answer: card.definition.clone(),
        });
    }

    questions
}

fn multiple_choice<R: Rng + ?Sized>(deck: &Deck, index: usize, rng: &mut R) -> Question {
    let card = &deck.cards()[index];
    let mut answers = Vec::with_capacity(DEFAULT_DISTRACTOR_COUNT + 1);
    answers.push(card.definition.clone());
    answers.extend(distractors_for(index, deck, DEFAULT_DISTRACTOR_COUNT));

    Question::MultipleChoice {
        prompt: card.term.clone(),
        correct_answer: card.definition.clone(),
        options: shuffle(&answers, rng),
    }
}

fn true_false<R: Rng + ?Sized>(deck: &Deck, index: usize, rng: &mut R) -> Question {
    let cards = deck.cards();
    let card = &cards[index];
    let use_correct = rng.random_bool(0.5);

    let (shown, answer) = if use_correct {
        (&card.definition, TRUE_ANSWER)
    } else {
        let other = &cards[(index + FALSE_STATEMENT_OFFSET) % cards.len()];
        (&other.definition, FALSE_ANSWER)
    };

    Question::TrueFalse {
        prompt: format!("\"{}\" means \"{}\"", card.term, shown),
        correct_answer: answer.to_string(),
    }
}

/// Expected Test mode question count for a deck of `n` cards.
pub fn test_question_count(n: usize) -> usize {
    n.min(TEST_MULTIPLE_CHOICE_END)
        + n.saturating_sub(TEST_MULTIPLE_CHOICE_END)
            .min(TEST_TRUE_FALSE_END - TEST_MULTIPLE_CHOICE_END)
        + n.saturating_sub(TEST_TRUE_FALSE_END)
            .min(TEST_WRITTEN_END - TEST_TRUE_FALSE_END)
}
