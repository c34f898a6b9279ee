//! Database models and API types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

// Re-export shared types from study-core
pub use study_core::{
    ActivityType, CommandOutcome, Deck, Flashcard, Grader, SessionCommand, SessionResult,
    SessionView, StudyMode, StudySession,
};

// === Database Entity Types ===

/// Resolved login session
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct AuthSession {
    pub token: String,
    pub user_id: String,
    pub expires_at: DateTime<Utc>,
}

/// Study set header
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbStudySet {
    pub id: String,
    pub title: String,
    pub description: Option<String>,
    pub is_public: bool,
    pub user_id: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl DbStudySet {
    /// Owners can always read; everyone else only public sets
    pub fn readable_by(&self, user_id: &str) -> bool {
        self.is_public || self.user_id == user_id
    }
}

/// Flashcard stored in PostgreSQL
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbFlashcard {
    pub id: String,
    pub study_set_id: String,
    pub term: String,
    pub definition: String,
    pub image: Option<String>,
    pub order: i32,
}

impl DbFlashcard {
    /// Convert to study-core flashcard
    pub fn to_core_card(&self) -> Flashcard {
        Flashcard {
            id: self.id.clone(),
            term: self.term.clone(),
            definition: self.definition.clone(),
            image: self.image.clone(),
            order: self.order,
        }
    }
}

/// Result record
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbResult {
    pub id: Uuid,
    pub user_id: String,
    pub study_set_id: String,
    pub mode: String,
    pub score: i32,
    pub total_questions: i32,
    pub time_spent: Option<i32>,
    pub completed: bool,
    pub created_at: DateTime<Utc>,
}

impl DbResult {
    /// Build a new record from a finished session
    pub fn from_session_result(user_id: &str, study_set_id: &str, result: &SessionResult) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id: user_id.to_string(),
            study_set_id: study_set_id.to_string(),
            mode: result.mode.as_str().to_string(),
            score: result.score as i32,
            total_questions: result.total_questions as i32,
            time_spent: Some(result.time_spent_seconds.min(i32::MAX as u64) as i32),
            completed: result.completed,
            created_at: Utc::now(),
        }
    }
}

/// Aggregated result statistics for one user
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResultStats {
    pub total_tests: usize,
    /// Mean of per-result percentages, rounded
    pub average_score: u32,
    pub total_time_spent: i64,
}

impl ResultStats {
    pub fn from_results(results: &[DbResult]) -> Self {
        let total_tests = results.len();
        if total_tests == 0 {
            return Self::default();
        }

        let percent_sum: f64 = results
            .iter()
            .filter(|r| r.total_questions > 0)
            .map(|r| r.score as f64 / r.total_questions as f64 * 100.0)
            .sum();

        Self {
            total_tests,
            average_score: (percent_sum / total_tests as f64).round() as u32,
            total_time_spent: results
                .iter()
                .map(|r| r.time_spent.unwrap_or(0) as i64)
                .sum(),
        }
    }
}

// === API Request/Response Types ===

// Deck types
#[derive(Debug, Serialize, Deserialize)]
pub struct DeckResponse {
    pub id: String,
    pub title: String,
    pub description: Option<String>,
    pub is_public: bool,
    pub flashcards: Vec<Flashcard>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct StudyCountResponse {
    pub study_set_id: String,
    pub count: i64,
}

// Session types
#[derive(Debug, Serialize, Deserialize)]
pub struct StartSessionRequest {
    pub mode: StudyMode,
}

#[derive(Debug, Serialize)]
pub struct StartSessionResponse {
    pub session_id: Uuid,
    pub study_set_id: String,
    pub mode: StudyMode,
    pub view: SessionView,
}

#[derive(Debug, Serialize)]
pub struct SessionResponse {
    pub session_id: Uuid,
    pub study_set_id: String,
    pub mode: StudyMode,
    pub view: SessionView,
}

#[derive(Debug, Serialize)]
pub struct CommandResponse {
    pub outcome: CommandOutcome,
    pub view: SessionView,
}

// Result types
#[derive(Debug, Serialize, Deserialize)]
pub struct ResultListResponse {
    pub results: Vec<DbResult>,
}
