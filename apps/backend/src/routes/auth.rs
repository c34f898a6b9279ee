//! Authentication middleware

use axum::{
    body::Body,
    extract::{Request, State},
    http::header::AUTHORIZATION,
    middleware::Next,
    response::Response,
};
use chrono::Utc;

use crate::error::{ApiError, Result};
use crate::models::AuthSession;
use crate::AppState;

/// Authenticated user info stored in request extensions
#[derive(Clone, Debug)]
pub struct AuthenticatedUser {
    pub user_id: String,
    pub token: String,
}

/// Auth middleware - resolves the Bearer token to a login session
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request<Body>,
    next: Next,
) -> Result<Response> {
    // Extract Bearer token
    let auth_header = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .ok_or_else(|| ApiError::Unauthorized("Missing Authorization header".to_string()))?;

    let token = auth_header
        .strip_prefix("Bearer ")
        .ok_or_else(|| ApiError::Unauthorized("Invalid Authorization format".to_string()))?
        .to_string();

    let session = resolve_session(&state, &token)
        .await?
        .ok_or_else(|| ApiError::Unauthorized("Invalid or expired session".to_string()))?;

    // Store authenticated user in request extensions
    request.extensions_mut().insert(AuthenticatedUser {
        user_id: session.user_id,
        token,
    });

    Ok(next.run(request).await)
}

/// Cached lookup; the cache lock is never held across the database call.
async fn resolve_session(state: &AppState, token: &str) -> Result<Option<AuthSession>> {
    let cached = state.auth_cache()?.get(&token.to_string());
    if let Some(session) = cached {
        if session.expires_at > Utc::now() {
            return Ok(Some(session));
        }
        state.auth_cache()?.remove(&token.to_string());
    }

    let Some(session) = state.db.get_auth_session(token).await? else {
        return Ok(None);
    };

    tracing::debug!(user_id = %session.user_id, "Resolved login session");
    state
        .auth_cache()?
        .insert(token.to_string(), session.clone());

    Ok(Some(session))
}
