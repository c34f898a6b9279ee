//! Study session endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use chrono::Utc;
use uuid::Uuid;

use crate::error::Result;
use crate::models::*;
use crate::routes::auth::AuthenticatedUser;
use crate::services::sessions::OwnedSession;
use crate::AppState;

/// POST /api/sets/:id/sessions
pub async fn start(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedUser>,
    Path(study_set_id): Path<String>,
    Json(payload): Json<StartSessionRequest>,
) -> Result<(StatusCode, Json<StartSessionResponse>)> {
    let (set, deck) = state.db.fetch_deck(&study_set_id, &auth.user_id).await?;
    let card_count = deck.len();

    let now = Utc::now();
    let session = StudySession::start(payload.mode, deck, state.grader(), &mut rand::rng(), now)?;
    let view = session.view(now);

    let session_id = state.sessions.insert(OwnedSession {
        user_id: auth.user_id.clone(),
        study_set_id: set.id.clone(),
        session,
    })?;

    state
        .reporter
        .activity(&set.id, &auth.user_id, ActivityType::Studied);

    tracing::info!(
        %session_id,
        study_set_id = %set.id,
        mode = payload.mode.as_str(),
        cards = card_count,
        "Study session started"
    );

    Ok((
        StatusCode::CREATED,
        Json(StartSessionResponse {
            session_id,
            study_set_id: set.id,
            mode: payload.mode,
            view,
        }),
    ))
}

/// GET /api/sessions/:id
pub async fn get(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedUser>,
    Path(session_id): Path<Uuid>,
) -> Result<Json<SessionResponse>> {
    let now = Utc::now();
    let response = state
        .sessions
        .with_session(session_id, &auth.user_id, |owned| {
            Ok(SessionResponse {
                session_id,
                study_set_id: owned.study_set_id.clone(),
                mode: owned.session.mode(),
                view: owned.session.view(now),
            })
        })?;

    Ok(Json(response))
}

/// POST /api/sessions/:id/commands
pub async fn command(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedUser>,
    Path(session_id): Path<Uuid>,
    Json(command): Json<SessionCommand>,
) -> Result<Json<CommandResponse>> {
    let now = Utc::now();
    let (outcome, view, study_set_id) =
        state
            .sessions
            .with_session(session_id, &auth.user_id, |owned| {
                let outcome = owned.session.apply(&command, &mut rand::rng(), now)?;
                Ok((outcome, owned.session.view(now), owned.study_set_id.clone()))
            })?;

    tracing::debug!(%session_id, command = command.name(), "Session command applied");

    if let Some(result) = &outcome.result {
        tracing::info!(
            %session_id,
            study_set_id = %study_set_id,
            mode = result.mode.as_str(),
            score = result.score,
            total = result.total_questions,
            "Study session completed"
        );
        state
            .reporter
            .completion(&study_set_id, &auth.user_id, result.clone());
    }

    Ok(Json(CommandResponse { outcome, view }))
}

/// DELETE /api/sessions/:id
pub async fn discard(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedUser>,
    Path(session_id): Path<Uuid>,
) -> Result<StatusCode> {
    state.sessions.remove(session_id, &auth.user_id)?;
    Ok(StatusCode::NO_CONTENT)
}
