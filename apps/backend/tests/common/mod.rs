//! Common test utilities and fixtures for integration tests.
//!
//! # Requirements
//! Integration tests require a PostgreSQL database (set DATABASE_URL env var).

pub mod fixtures;

use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use chrono::Utc;
use uuid::Uuid;

use flashcard_study_backend::config::Config;
use flashcard_study_backend::db::Database;
use flashcard_study_backend::{router, AppState};

/// Test context containing database connection and router.
pub struct TestContext {
    pub db: Arc<Database>,
    app: Router,
}

impl TestContext {
    /// Create a new test context.
    ///
    /// # Panics
    /// Panics if DATABASE_URL is not set or database connection fails.
    pub async fn new() -> Self {
        dotenvy::dotenv().ok();

        let config = Config::from_env().expect("DATABASE_URL must be set for integration tests");

        let db = Database::connect(&config.database_url)
            .await
            .expect("Failed to connect to test database");

        db.run_migrations()
            .await
            .expect("Failed to run migrations");

        let state = AppState::new(db, config);
        let db = state.db.clone();

        Self {
            db,
            app: router(state),
        }
    }

    /// Get the router for use with axum-test.
    pub fn router(&self) -> Router {
        self.app.clone()
    }

    /// Create a test user with a live login session. Returns (user_id, token).
    pub async fn create_test_user(&self) -> (String, String) {
        let user_id = format!("user-{}", Uuid::new_v4());
        let token = format!("token-{}", Uuid::new_v4());

        sqlx::query("INSERT INTO users (id, name, email) VALUES ($1, $2, $3)")
            .bind(&user_id)
            .bind("Test User")
            .bind(format!("{}@example.com", user_id))
            .execute(self.db.pool())
            .await
            .expect("Failed to create test user");

        sqlx::query("INSERT INTO auth_sessions (token, user_id, expires_at) VALUES ($1, $2, $3)")
            .bind(&token)
            .bind(&user_id)
            .bind(Utc::now() + chrono::Duration::hours(1))
            .execute(self.db.pool())
            .await
            .expect("Failed to create login session");

        (user_id, token)
    }

    /// Create an already-expired login session for `user_id`.
    pub async fn create_expired_token(&self, user_id: &str) -> String {
        let token = format!("token-{}", Uuid::new_v4());
        sqlx::query("INSERT INTO auth_sessions (token, user_id, expires_at) VALUES ($1, $2, $3)")
            .bind(&token)
            .bind(user_id)
            .bind(Utc::now() - chrono::Duration::minutes(1))
            .execute(self.db.pool())
            .await
            .expect("Failed to create login session");
        token
    }

    /// Create a study set with the given (term, definition) cards. Returns its ID.
    pub async fn create_study_set(
        &self,
        user_id: &str,
        is_public: bool,
        cards: &[(&str, &str)],
    ) -> String {
        let set_id = format!("set-{}", Uuid::new_v4());

        sqlx::query(
            "INSERT INTO study_sets (id, title, description, is_public, user_id) VALUES ($1, $2, $3, $4, $5)",
        )
        .bind(&set_id)
        .bind("Test Set")
        .bind(Some("Created by integration tests"))
        .bind(is_public)
        .bind(user_id)
        .execute(self.db.pool())
        .await
        .expect("Failed to create study set");

        // Insert in reverse so ordering has to come from "order"
        for (order, (term, definition)) in cards.iter().enumerate().rev() {
            sqlx::query(
                r#"INSERT INTO flashcards (id, study_set_id, term, definition, "order") VALUES ($1, $2, $3, $4, $5)"#,
            )
            .bind(format!("card-{}", Uuid::new_v4()))
            .bind(&set_id)
            .bind(*term)
            .bind(*definition)
            .bind(order as i32)
            .execute(self.db.pool())
            .await
            .expect("Failed to create flashcard");
        }

        set_id
    }

    /// Count activities of one type recorded for a set, waiting briefly for
    /// background recording to land.
    pub async fn wait_for_activities(&self, set_id: &str, activity_type: &str, expected: i64) -> i64 {
        let mut count: i64 = 0;
        for _ in 0..50 {
            count = sqlx::query_scalar(
                "SELECT COUNT(*) FROM activities WHERE study_set_id = $1 AND activity_type = $2",
            )
            .bind(set_id)
            .bind(activity_type)
            .fetch_one(self.db.pool())
            .await
            .expect("Failed to count activities");
            if count >= expected {
                break;
            }
            tokio::time::sleep(Duration::from_millis(20)).await;
        }
        count
    }

    /// Count results recorded for a user on a set, waiting briefly.
    pub async fn wait_for_results(&self, user_id: &str, set_id: &str, expected: i64) -> i64 {
        let mut count: i64 = 0;
        for _ in 0..50 {
            count = sqlx::query_scalar(
                "SELECT COUNT(*) FROM results WHERE user_id = $1 AND study_set_id = $2",
            )
            .bind(user_id)
            .bind(set_id)
            .fetch_one(self.db.pool())
            .await
            .expect("Failed to count results");
            if count >= expected {
                break;
            }
            tokio::time::sleep(Duration::from_millis(20)).await;
        }
        count
    }

    /// Format authorization header value.
    pub fn auth_header_value(token: &str) -> String {
        format!("Bearer {}", token)
    }

    /// Clean up test data for a user. Cascades to sets, cards, activities and results.
    pub async fn cleanup_user(&self, user_id: &str) {
        let _ = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(user_id)
            .execute(self.db.pool())
            .await;
    }
}
