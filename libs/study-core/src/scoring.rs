//! Answer grading.
//!
//! Choice questions compare trimmed, case-folded strings for equality. Written
//! answers use a configurable [`WrittenMatching`] rule; the default accepts any
//! non-blank answer contained in the correct answer.

use serde::{Deserialize, Serialize};

use crate::question::Question;

/// Rule for grading written answers.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "rule", rename_all = "snake_case")]
pub enum WrittenMatching {
    /// Correct iff the correct answer contains the typed answer.
    Contains,
    /// Correct iff normalized Levenshtein similarity reaches `threshold`.
    Similarity { threshold: f64 },
}

impl Default for WrittenMatching {
    fn default() -> Self {
        Self::Contains
    }
}

/// Grades answers against questions with a fixed written-answer rule.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Grader {
    pub written: WrittenMatching,
}

impl Grader {
    pub fn new(written: WrittenMatching) -> Self {
        Self { written }
    }

    /// Whether `answer` is correct for `question`. Never fails.
    pub fn grade(&self, question: &Question, answer: &str) -> bool {
        let typed = normalize(answer);
        let correct = normalize(question.correct_answer());

        match question {
            Question::MultipleChoice { .. } | Question::TrueFalse { .. } => typed == correct,
            Question::Written { .. } => {
                if typed.is_empty() {
                    return false;
                }
                match self.written {
                    WrittenMatching::Contains => correct.contains(&typed),
                    WrittenMatching::Similarity { threshold } => {
                        normalized_similarity(&typed, &correct) >= threshold
                    }
                }
            }
        }
    }
}

/// Grade with the default rules.
pub fn is_correct(question: &Question, answer: &str) -> bool {
    Grader::default().grade(question, answer)
}

/// Trimmed, lowercased form answers are compared in.
pub fn normalize(s: &str) -> String {
    s.trim().to_lowercase()
}

/// Calculate Levenshtein distance between two strings.
pub fn levenshtein_distance(a: &str, b: &str) -> usize {
    let a_chars: Vec<char> = a.chars().collect();
    let b_chars: Vec<char> = b.chars().collect();

    let m = a_chars.len();
    let n = b_chars.len();

    if m == 0 {
        return n;
    }
    if n == 0 {
        return m;
    }

    // Two rows are enough
    let mut prev = (0..=n).collect::<Vec<_>>();
    let mut curr = vec![0; n + 1];

    for i in 1..=m {
        curr[0] = i;

        for j in 1..=n {
            let cost = usize::from(a_chars[i - 1] != b_chars[j - 1]);

            curr[j] = (prev[j] + 1)
                .min(curr[j - 1] + 1)
                .min(prev[j - 1] + cost);
        }

        std::mem::swap(&mut prev, &mut curr);
    }

    prev[n]
}

/// Similarity in `[0.0, 1.0]` derived from Levenshtein distance.
pub fn normalized_similarity(a: &str, b: &str) -> f64 {
    let max_len = a.chars().count().max(b.chars().count());
    if max_len == 0 {
        return 1.0;
    }

    let distance = levenshtein_distance(a, b);
    1.0 - (distance as f64 / max_len as f64)
}
