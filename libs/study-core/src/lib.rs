//! Study-session engine shared by the backend service.
//!
//! Provides:
//! - Fisher–Yates shuffling and distractor sampling
//! - Question generation for Learn and Test modes
//! - Match mode pairing board
//! - Answer grading (exact and written containment rules)
//! - Mode controllers that drive a session to its `SessionResult`

pub mod distractor;
pub mod error;
pub mod pairing;
pub mod question;
pub mod scoring;
pub mod session;
pub mod shuffle;
pub mod timer;
pub mod types;

pub use distractor::{distractors_for, DEFAULT_DISTRACTOR_COUNT};
pub use error::{Result, StudyError};
pub use pairing::{ClickOutcome, ItemKind, MatchBoard, MatchItem, Selection};
pub use question::{learn_questions, test_questions, Question, QuestionKind};
pub use scoring::{is_correct, normalize, Grader, WrittenMatching};
pub use session::{
    AnswerFeedback, CommandOutcome, ModeView, SessionCommand, SessionView, StudySession,
};
pub use shuffle::shuffle;
pub use timer::{elapsed_seconds, SessionTimer};
pub use types::{ActivityType, Deck, Flashcard, SessionResult, StudyMode};
