//! Mode controllers.
//!
//! A [`StudySession`] owns everything one run of a mode needs: the generated
//! questions or board, progress, and the timer. Commands move it forward until
//! it completes; the transition into completion yields the [`SessionResult`]
//! exactly once. `Restart` regenerates the material with fresh randomness.

use chrono::{DateTime, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::{Result, StudyError};
use crate::pairing::{ClickOutcome, ItemKind, MatchBoard, Selection};
use crate::question::{learn_questions, test_questions, Question, QuestionKind};
use crate::scoring::Grader;
use crate::timer::SessionTimer;
use crate::types::{Deck, SessionResult, StudyMode};

/// User input routed to a session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SessionCommand {
    /// Flashcards: show or hide the definition.
    Flip,
    /// Flashcards: next card. Learn: next question (completes after the last).
    Next,
    /// Flashcards: previous card.
    Previous,
    /// Flashcards: end browsing.
    Finish,
    /// Learn: answer the current question (`index` optional).
    /// Test: answer question `index`, replacing any earlier answer.
    Answer {
        #[serde(default)]
        index: Option<usize>,
        answer: String,
    },
    /// Test: grade all answers.
    Submit,
    /// Match: click a tile.
    Click { item_id: String },
    /// Any mode: regenerate and start over.
    Restart,
}

impl SessionCommand {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Flip => "flip",
            Self::Next => "next",
            Self::Previous => "previous",
            Self::Finish => "finish",
            Self::Answer { .. } => "answer",
            Self::Submit => "submit",
            Self::Click { .. } => "click",
            Self::Restart => "restart",
        }
    }
}

/// Immediate feedback for a Learn answer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnswerFeedback {
    pub correct: bool,
    pub correct_answer: String,
}

/// What a command produced.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandOutcome {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub feedback: Option<AnswerFeedback>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub click: Option<ClickOutcome>,
    /// Set only by the command that completed the session.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<SessionResult>,
}

fn ensure_enough(mode: StudyMode, deck: &Deck) -> Result<()> {
    let required = mode.minimum_cards();
    if deck.len() < required {
        return Err(StudyError::InsufficientData {
            mode,
            required,
            actual: deck.len(),
        });
    }
    Ok(())
}

// === Flashcards ===

#[derive(Debug, Clone)]
pub struct FlashcardsSession {
    deck: Deck,
    index: usize,
    showing_definition: bool,
    revealed: Vec<bool>,
    timer: SessionTimer,
    result: Option<SessionResult>,
}

impl FlashcardsSession {
    pub fn start(deck: Deck, now: DateTime<Utc>) -> Result<Self> {
        ensure_enough(StudyMode::Flashcards, &deck)?;
        let revealed = vec![false; deck.len()];
        Ok(Self {
            deck,
            index: 0,
            showing_definition: false,
            revealed,
            timer: SessionTimer::start(now),
            result: None,
        })
    }

    fn apply(&mut self, command: &SessionCommand, now: DateTime<Utc>) -> Result<CommandOutcome> {
        match command {
            SessionCommand::Flip => {
                self.showing_definition = !self.showing_definition;
                if self.showing_definition {
                    self.revealed[self.index] = true;
                }
            }
            SessionCommand::Next => {
                if self.index + 1 < self.deck.len() {
                    self.index += 1;
                    self.showing_definition = false;
                }
            }
            SessionCommand::Previous => {
                if self.index > 0 {
                    self.index -= 1;
                    self.showing_definition = false;
                }
            }
            SessionCommand::Finish => {
                let seen = self.revealed.iter().filter(|r| **r).count();
                let result = SessionResult::completed(
                    StudyMode::Flashcards,
                    seen,
                    self.deck.len(),
                    self.timer.stop(now),
                );
                self.result = Some(result.clone());
                return Ok(CommandOutcome {
                    result: Some(result),
                    ..Default::default()
                });
            }
            other => return Err(unsupported(other, StudyMode::Flashcards)),
        }
        Ok(CommandOutcome::default())
    }

    fn view(&self) -> ModeView {
        let card = &self.deck.cards()[self.index];
        ModeView::Flashcards {
            index: self.index,
            total: self.deck.len(),
            term: card.term.clone(),
            definition: self.showing_definition.then(|| card.definition.clone()),
            image: card.image.clone(),
        }
    }
}

// === Learn ===

#[derive(Debug, Clone)]
pub struct LearnSession {
    deck: Deck,
    grader: Grader,
    questions: Vec<Question>,
    index: usize,
    feedback: Option<AnswerFeedback>,
    score: usize,
    timer: SessionTimer,
    result: Option<SessionResult>,
}

impl LearnSession {
    pub fn start<R: Rng + ?Sized>(deck: Deck, grader: Grader, rng: &mut R, now: DateTime<Utc>) -> Result<Self> {
        ensure_enough(StudyMode::Learn, &deck)?;
        let questions = learn_questions(&deck, rng);
        Ok(Self {
            deck,
            grader,
            questions,
            index: 0,
            feedback: None,
            score: 0,
            timer: SessionTimer::start(now),
            result: None,
        })
    }

    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    fn apply(&mut self, command: &SessionCommand, now: DateTime<Utc>) -> Result<CommandOutcome> {
        match command {
            SessionCommand::Answer { index, answer } => {
                if let Some(i) = index {
                    if *i != self.index {
                        return Err(StudyError::invalid(format!(
                            "question {i} is not the current question"
                        )));
                    }
                }
                if self.feedback.is_some() {
                    return Err(StudyError::invalid("question already answered"));
                }

                let question = &self.questions[self.index];
                let correct = self.grader.grade(question, answer);
                if correct {
                    self.score += 1;
                }
                let feedback = AnswerFeedback {
                    correct,
                    correct_answer: question.correct_answer().to_string(),
                };
                self.feedback = Some(feedback.clone());
                Ok(CommandOutcome {
                    feedback: Some(feedback),
                    ..Default::default()
                })
            }
            SessionCommand::Next => {
                if self.feedback.is_none() {
                    return Err(StudyError::invalid("answer the current question first"));
                }
                self.feedback = None;
                self.index += 1;
                if self.index < self.questions.len() {
                    return Ok(CommandOutcome::default());
                }

                let result = SessionResult::completed(
                    StudyMode::Learn,
                    self.score,
                    self.questions.len(),
                    self.timer.stop(now),
                );
                self.result = Some(result.clone());
                Ok(CommandOutcome {
                    result: Some(result),
                    ..Default::default()
                })
            }
            other => Err(unsupported(other, StudyMode::Learn)),
        }
    }

    fn view(&self) -> ModeView {
        let current = self.questions.get(self.index);
        ModeView::Learn {
            index: self.index,
            total: self.questions.len(),
            score: self.score,
            prompt: current.map(|q| q.prompt().to_string()),
            options: current.and_then(Question::options).unwrap_or_default(),
            feedback: self.feedback.clone(),
        }
    }
}

// === Test ===

#[derive(Debug, Clone)]
pub struct TestSession {
    deck: Deck,
    grader: Grader,
    questions: Vec<Question>,
    answers: Vec<Option<String>>,
    timer: SessionTimer,
    result: Option<SessionResult>,
}

impl TestSession {
    pub fn start<R: Rng + ?Sized>(deck: Deck, grader: Grader, rng: &mut R, now: DateTime<Utc>) -> Result<Self> {
        ensure_enough(StudyMode::Test, &deck)?;
        let questions = test_questions(&deck, rng);
        if questions.is_empty() {
            return Err(StudyError::InsufficientData {
                mode: StudyMode::Test,
                required: StudyMode::Test.minimum_cards(),
                actual: deck.len(),
            });
        }
        let answers = vec![None; questions.len()];
        Ok(Self {
            deck,
            grader,
            questions,
            answers,
            timer: SessionTimer::start(now),
            result: None,
        })
    }

    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    fn is_correct(&self, index: usize) -> bool {
        self.answers[index]
            .as_deref()
            .is_some_and(|a| self.grader.grade(&self.questions[index], a))
    }

    fn apply(&mut self, command: &SessionCommand, now: DateTime<Utc>) -> Result<CommandOutcome> {
        match command {
            SessionCommand::Answer { index, answer } => {
                let index = index.ok_or_else(|| StudyError::invalid("test answers need a question index"))?;
                let slot = self.answers.get_mut(index).ok_or_else(|| {
                    StudyError::invalid(format!("question {index} does not exist"))
                })?;
                *slot = Some(answer.clone());
                Ok(CommandOutcome::default())
            }
            SessionCommand::Submit => {
                let score = (0..self.questions.len()).filter(|i| self.is_correct(*i)).count();
                let result = SessionResult::completed(
                    StudyMode::Test,
                    score,
                    self.questions.len(),
                    self.timer.stop(now),
                );
                self.result = Some(result.clone());
                Ok(CommandOutcome {
                    result: Some(result),
                    ..Default::default()
                })
            }
            other => Err(unsupported(other, StudyMode::Test)),
        }
    }

    fn view(&self) -> ModeView {
        let review = self.result.is_some().then(|| {
            self.questions
                .iter()
                .enumerate()
                .map(|(i, q)| ReviewEntry {
                    kind: q.kind(),
                    prompt: q.prompt().to_string(),
                    user_answer: self.answers[i].clone(),
                    correct_answer: q.correct_answer().to_string(),
                    correct: self.is_correct(i),
                })
                .collect()
        });

        ModeView::Test {
            questions: self
                .questions
                .iter()
                .map(|q| QuestionView {
                    kind: q.kind(),
                    prompt: q.prompt().to_string(),
                    options: q.options(),
                })
                .collect(),
            answers: self.answers.clone(),
            review,
        }
    }
}

// === Match ===

#[derive(Debug, Clone)]
pub struct MatchSession {
    deck: Deck,
    board: MatchBoard,
    timer: SessionTimer,
    result: Option<SessionResult>,
}

impl MatchSession {
    pub fn start<R: Rng + ?Sized>(deck: Deck, rng: &mut R, now: DateTime<Utc>) -> Result<Self> {
        ensure_enough(StudyMode::Match, &deck)?;
        let board = MatchBoard::new(&deck, rng);
        Ok(Self {
            deck,
            board,
            timer: SessionTimer::start(now),
            result: None,
        })
    }

    pub fn board(&self) -> &MatchBoard {
        &self.board
    }

    fn apply(&mut self, command: &SessionCommand, now: DateTime<Utc>) -> Result<CommandOutcome> {
        let SessionCommand::Click { item_id } = command else {
            return Err(unsupported(command, StudyMode::Match));
        };

        let click = self.board.click(item_id);
        let mut outcome = CommandOutcome {
            click: Some(click),
            ..Default::default()
        };

        if let ClickOutcome::Matched { completed: true, .. } = click {
            let pairs = self.board.total_pairs();
            // Every completed board scores 100%.
            let result = SessionResult::completed(StudyMode::Match, pairs, pairs, self.timer.stop(now));
            self.result = Some(result.clone());
            outcome.result = Some(result);
        }

        Ok(outcome)
    }

    fn view(&self) -> ModeView {
        let selected = match self.board.selection() {
            Selection::OneSelected(id) => Some(id.clone()),
            Selection::NoSelection => None,
        };
        ModeView::Match {
            items: self
                .board
                .items()
                .iter()
                .map(|i| MatchItemView {
                    id: i.id.clone(),
                    text: i.text.clone(),
                    kind: i.kind,
                    matched: i.matched,
                })
                .collect(),
            selected,
            matched_pairs: self.board.matched_pairs(),
            total_pairs: self.board.total_pairs(),
        }
    }
}

fn unsupported(command: &SessionCommand, mode: StudyMode) -> StudyError {
    StudyError::invalid(format!("{} is not supported in {} mode", command.name(), mode))
}

// === Session ===

/// One running session of any mode.
#[derive(Debug, Clone)]
pub enum StudySession {
    Flashcards(FlashcardsSession),
    Learn(LearnSession),
    Test(TestSession),
    Match(MatchSession),
}

impl StudySession {
    /// Generate the session material for `mode` from `deck`.
    pub fn start<R: Rng + ?Sized>(
        mode: StudyMode,
        deck: Deck,
        grader: Grader,
        rng: &mut R,
        now: DateTime<Utc>,
    ) -> Result<Self> {
        Ok(match mode {
            StudyMode::Flashcards => Self::Flashcards(FlashcardsSession::start(deck, now)?),
            StudyMode::Learn => Self::Learn(LearnSession::start(deck, grader, rng, now)?),
            StudyMode::Test => Self::Test(TestSession::start(deck, grader, rng, now)?),
            StudyMode::Match => Self::Match(MatchSession::start(deck, rng, now)?),
        })
    }

    pub fn mode(&self) -> StudyMode {
        match self {
            Self::Flashcards(_) => StudyMode::Flashcards,
            Self::Learn(_) => StudyMode::Learn,
            Self::Test(_) => StudyMode::Test,
            Self::Match(_) => StudyMode::Match,
        }
    }

    fn deck(&self) -> &Deck {
        match self {
            Self::Flashcards(s) => &s.deck,
            Self::Learn(s) => &s.deck,
            Self::Test(s) => &s.deck,
            Self::Match(s) => &s.deck,
        }
    }

    fn grader(&self) -> Grader {
        match self {
            Self::Learn(s) => s.grader,
            Self::Test(s) => s.grader,
            Self::Flashcards(_) | Self::Match(_) => Grader::default(),
        }
    }

    fn timer(&self) -> &SessionTimer {
        match self {
            Self::Flashcards(s) => &s.timer,
            Self::Learn(s) => &s.timer,
            Self::Test(s) => &s.timer,
            Self::Match(s) => &s.timer,
        }
    }

    /// The final result, once completed.
    pub fn result(&self) -> Option<&SessionResult> {
        match self {
            Self::Flashcards(s) => s.result.as_ref(),
            Self::Learn(s) => s.result.as_ref(),
            Self::Test(s) => s.result.as_ref(),
            Self::Match(s) => s.result.as_ref(),
        }
    }

    pub fn is_complete(&self) -> bool {
        self.result().is_some()
    }

    /// Route a command. Completed sessions accept only `Restart`.
    pub fn apply<R: Rng + ?Sized>(
        &mut self,
        command: &SessionCommand,
        rng: &mut R,
        now: DateTime<Utc>,
    ) -> Result<CommandOutcome> {
        if let SessionCommand::Restart = command {
            let deck = self.deck().clone();
            *self = Self::start(self.mode(), deck, self.grader(), rng, now)?;
            return Ok(CommandOutcome::default());
        }

        if self.is_complete() {
            return Err(StudyError::invalid("session already completed"));
        }

        match self {
            Self::Flashcards(s) => s.apply(command, now),
            Self::Learn(s) => s.apply(command, now),
            Self::Test(s) => s.apply(command, now),
            Self::Match(s) => s.apply(command, now),
        }
    }

    /// Client-facing snapshot. Pending answers are never revealed.
    pub fn view(&self, now: DateTime<Utc>) -> SessionView {
        let detail = match self {
            Self::Flashcards(s) => s.view(),
            Self::Learn(s) => s.view(),
            Self::Test(s) => s.view(),
            Self::Match(s) => s.view(),
        };
        SessionView {
            elapsed_seconds: self.timer().elapsed(now),
            completed: self.is_complete(),
            result: self.result().cloned(),
            detail,
        }
    }
}

// === Views ===

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SessionView {
    pub elapsed_seconds: u64,
    pub completed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<SessionResult>,
    #[serde(flatten)]
    pub detail: ModeView,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum ModeView {
    Flashcards {
        index: usize,
        total: usize,
        term: String,
        definition: Option<String>,
        image: Option<String>,
    },
    Learn {
        index: usize,
        total: usize,
        score: usize,
        prompt: Option<String>,
        options: Vec<String>,
        feedback: Option<AnswerFeedback>,
    },
    Test {
        questions: Vec<QuestionView>,
        answers: Vec<Option<String>>,
        review: Option<Vec<ReviewEntry>>,
    },
    Match {
        items: Vec<MatchItemView>,
        selected: Option<String>,
        matched_pairs: usize,
        total_pairs: usize,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QuestionView {
    pub kind: QuestionKind,
    pub prompt: String,
    pub options: Option<Vec<String>>,
}

/// Per-question breakdown shown after a test is submitted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReviewEntry {
    pub kind: QuestionKind,
    pub prompt: String,
    pub user_answer: Option<String>,
    pub correct_answer: String,
    pub correct: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MatchItemView {
    pub id: String,
    pub text: String,
    pub kind: ItemKind,
    pub matched: bool,
}
