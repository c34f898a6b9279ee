//! Distractor sampling for multiple-choice questions.

use crate::scoring::normalize;
use crate::types::Deck;

/// Number of wrong answers offered next to the correct one.
pub const DEFAULT_DISTRACTOR_COUNT: usize = 3;

/// Pick up to `count` wrong answers for the card at `target_index`.
///
/// Definitions of the other cards are taken in deck order. Definitions that
/// grade the same as the target's own, or as one already picked, are skipped.
/// Small decks return fewer than `count` answers, possibly none.
pub fn distractors_for(target_index: usize, deck: &Deck, count: usize) -> Vec<String> {
    let target = deck.get(target_index).map(|c| normalize(&c.definition));
    let mut seen: Vec<String> = target.into_iter().collect();
    let mut picked: Vec<String> = Vec::with_capacity(count);

    for (index, card) in deck.iter().enumerate() {
        if picked.len() == count {
            break;
        }
        if index == target_index {
            continue;
        }
        let key = normalize(&card.definition);
        if seen.contains(&key) {
            continue;
        }
        seen.push(key);
        picked.push(card.definition.clone());
    }

    picked
}
