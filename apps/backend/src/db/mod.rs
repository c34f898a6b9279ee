//! PostgreSQL database operations

use sqlx::{postgres::PgPoolOptions, PgPool};
use uuid::Uuid;

use crate::error::{ApiError, Result};
use crate::models::*;

/// Database wrapper with connection pool
#[derive(Clone)]
pub struct Database {
    pool: PgPool,
}

impl Database {
    /// Connect to PostgreSQL and create connection pool
    pub async fn connect(database_url: &str) -> Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(10)
            .connect(database_url)
            .await?;

        Ok(Self { pool })
    }

    /// Create a pool that connects on first use
    pub fn connect_lazy(database_url: &str) -> Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(10)
            .connect_lazy(database_url)?;

        Ok(Self { pool })
    }

    pub fn from_pool(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Run database migrations
    pub async fn run_migrations(&self) -> Result<()> {
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .map_err(|e| ApiError::Migration(e.to_string()))?;
        Ok(())
    }

    /// Get the connection pool
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    // === Identity ===

    /// Look up an unexpired login session by token
    pub async fn get_auth_session(&self, token: &str) -> Result<Option<AuthSession>> {
        let session = sqlx::query_as::<_, AuthSession>(
            r#"
            SELECT token, user_id, expires_at
            FROM auth_sessions
            WHERE token = $1 AND expires_at > NOW()
            "#,
        )
        .bind(token)
        .fetch_optional(&self.pool)
        .await?;

        Ok(session)
    }

    // === Study Set Repository ===

    /// Get study set header by ID
    pub async fn get_study_set(&self, study_set_id: &str) -> Result<Option<DbStudySet>> {
        let set = sqlx::query_as::<_, DbStudySet>(
            r#"
            SELECT id, title, description, is_public, user_id, created_at, updated_at
            FROM study_sets
            WHERE id = $1
            "#,
        )
        .bind(study_set_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(set)
    }

    /// Get a readable study set, or NotFound / Forbidden
    pub async fn get_readable_study_set(&self, study_set_id: &str, user_id: &str) -> Result<DbStudySet> {
        let set = self
            .get_study_set(study_set_id)
            .await?
            .ok_or_else(|| ApiError::NotFound(format!("Study set {} not found", study_set_id)))?;

        if !set.readable_by(user_id) {
            return Err(ApiError::Forbidden(
                "You don't have permission to view this study set".to_string(),
            ));
        }

        Ok(set)
    }

    /// Get flashcards of a study set ordered by `order`
    pub async fn get_flashcards(&self, study_set_id: &str) -> Result<Vec<DbFlashcard>> {
        let cards = sqlx::query_as::<_, DbFlashcard>(
            r#"
            SELECT id, study_set_id, term, definition, image, "order"
            FROM flashcards
            WHERE study_set_id = $1
            ORDER BY "order" ASC, created_at ASC
            "#,
        )
        .bind(study_set_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(cards)
    }

    /// Fetch the deck snapshot a session is generated from
    pub async fn fetch_deck(&self, study_set_id: &str, user_id: &str) -> Result<(DbStudySet, Deck)> {
        let set = self.get_readable_study_set(study_set_id, user_id).await?;
        let cards = self.get_flashcards(study_set_id).await?;
        let deck = Deck::new(cards.iter().map(DbFlashcard::to_core_card).collect());
        Ok((set, deck))
    }

    // === Activity Repository ===

    /// Record an activity against a study set
    pub async fn record_activity(
        &self,
        study_set_id: &str,
        user_id: &str,
        activity: ActivityType,
    ) -> Result<()> {
        let result = sqlx::query(
            r#"
            INSERT INTO activities (id, user_id, activity_type, study_set_id, study_set_title)
            SELECT $1, $2, $3, s.id, s.title
            FROM study_sets s
            WHERE s.id = $4
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(user_id)
        .bind(activity.as_str())
        .bind(study_set_id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(ApiError::NotFound(format!("Study set {} not found", study_set_id)));
        }

        Ok(())
    }

    /// Count distinct users who studied a set
    pub async fn get_study_count(&self, study_set_id: &str) -> Result<i64> {
        let count: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(DISTINCT user_id)
            FROM activities
            WHERE study_set_id = $1 AND activity_type = 'studied'
            "#,
        )
        .bind(study_set_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(count)
    }

    // === Result Repository ===

    /// Insert a result record
    pub async fn insert_result(&self, result: &DbResult) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO results (id, user_id, study_set_id, mode, score, total_questions,
                                 time_spent, completed, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            "#,
        )
        .bind(result.id)
        .bind(&result.user_id)
        .bind(&result.study_set_id)
        .bind(&result.mode)
        .bind(result.score)
        .bind(result.total_questions)
        .bind(result.time_spent)
        .bind(result.completed)
        .bind(result.created_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Record a finished session's result
    pub async fn record_result(
        &self,
        study_set_id: &str,
        user_id: &str,
        result: &SessionResult,
    ) -> Result<()> {
        self.insert_result(&DbResult::from_session_result(user_id, study_set_id, result))
            .await
    }

    /// Latest results of a user for one set
    pub async fn get_results_for_set(
        &self,
        user_id: &str,
        study_set_id: &str,
        limit: i64,
    ) -> Result<Vec<DbResult>> {
        let results = sqlx::query_as::<_, DbResult>(
            r#"
            SELECT id, user_id, study_set_id, mode, score, total_questions,
                   time_spent, completed, created_at
            FROM results
            WHERE user_id = $1 AND study_set_id = $2
            ORDER BY created_at DESC
            LIMIT $3
            "#,
        )
        .bind(user_id)
        .bind(study_set_id)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(results)
    }

    /// All results of a user
    pub async fn get_results_for_user(&self, user_id: &str) -> Result<Vec<DbResult>> {
        let results = sqlx::query_as::<_, DbResult>(
            r#"
            SELECT id, user_id, study_set_id, mode, score, total_questions,
                   time_spent, completed, created_at
            FROM results
            WHERE user_id = $1
            ORDER BY created_at DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(results)
    }
}
