//! Study set endpoints

use axum::{
    extract::{Path, State},
    Extension, Json,
};

use crate::error::Result;
use crate::models::*;
use crate::routes::auth::AuthenticatedUser;
use crate::AppState;

/// How many past results the history view shows
const RESULT_HISTORY_LIMIT: i64 = 10;

/// GET /api/sets/:id/deck
pub async fn deck(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedUser>,
    Path(study_set_id): Path<String>,
) -> Result<Json<DeckResponse>> {
    let (set, deck) = state.db.fetch_deck(&study_set_id, &auth.user_id).await?;

    state
        .reporter
        .activity(&set.id, &auth.user_id, ActivityType::Viewed);

    Ok(Json(DeckResponse {
        id: set.id,
        title: set.title,
        description: set.description,
        is_public: set.is_public,
        flashcards: deck.cards().to_vec(),
    }))
}

/// GET /api/sets/:id/study-count
pub async fn study_count(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedUser>,
    Path(study_set_id): Path<String>,
) -> Result<Json<StudyCountResponse>> {
    let set = state
        .db
        .get_readable_study_set(&study_set_id, &auth.user_id)
        .await?;
    let count = state.db.get_study_count(&set.id).await?;

    Ok(Json(StudyCountResponse {
        study_set_id: set.id,
        count,
    }))
}

/// GET /api/sets/:id/results
pub async fn results(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedUser>,
    Path(study_set_id): Path<String>,
) -> Result<Json<ResultListResponse>> {
    let set = state
        .db
        .get_readable_study_set(&study_set_id, &auth.user_id)
        .await?;
    let results = state
        .db
        .get_results_for_set(&auth.user_id, &set.id, RESULT_HISTORY_LIMIT)
        .await?;

    Ok(Json(ResultListResponse { results }))
}
