//! Result endpoints

use axum::{extract::State, Extension, Json};

use crate::error::Result;
use crate::models::*;
use crate::routes::auth::AuthenticatedUser;
use crate::AppState;

/// GET /api/results/stats
pub async fn stats(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedUser>,
) -> Result<Json<ResultStats>> {
    let results = state.db.get_results_for_user(&auth.user_id).await?;
    Ok(Json(ResultStats::from_results(&results)))
}
