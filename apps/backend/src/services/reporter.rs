//! Background recording of activities and results.
//!
//! Recording never blocks or fails the request that triggered it; failures
//! are logged and dropped.

use std::sync::Arc;

use tokio::task::JoinHandle;

use crate::db::Database;
use crate::models::{ActivityType, SessionResult};

#[derive(Clone)]
pub struct Reporter {
    db: Arc<Database>,
}

impl Reporter {
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    pub fn activity(
        &self,
        study_set_id: &str,
        user_id: &str,
        activity: ActivityType,
    ) -> JoinHandle<()> {
        let db = self.db.clone();
        let study_set_id = study_set_id.to_string();
        let user_id = user_id.to_string();

        tokio::spawn(async move {
            if let Err(e) = db.record_activity(&study_set_id, &user_id, activity).await {
                tracing::warn!(
                    study_set_id = %study_set_id,
                    activity = activity.as_str(),
                    "Failed to record activity: {}",
                    e
                );
            }
        })
    }

    pub fn result(
        &self,
        study_set_id: &str,
        user_id: &str,
        result: SessionResult,
    ) -> JoinHandle<()> {
        let db = self.db.clone();
        let study_set_id = study_set_id.to_string();
        let user_id = user_id.to_string();

        tokio::spawn(async move {
            if let Err(e) = db.record_result(&study_set_id, &user_id, &result).await {
                tracing::warn!(
                    study_set_id = %study_set_id,
                    mode = result.mode.as_str(),
                    "Failed to record result: {}",
                    e
                );
            }
        })
    }

    /// Result plus the `completed` activity for a finished session.
    pub fn completion(&self, study_set_id: &str, user_id: &str, result: SessionResult) {
        self.result(study_set_id, user_id, result);
        self.activity(study_set_id, user_id, ActivityType::Completed);
    }
}
