use axum::{extract::Request, middleware::Next, response::Response};
use tower_sessions::Session;

use super::ApiError;
use crate::constants::session::USER_ID_KEY;

/// Id of the user bound to the current session, attached to the request by
/// [`require_session`].
#[derive(Debug, Clone)]
pub struct CurrentUser(pub String);

// ============================================================================
// Middleware
// ============================================================================

/// Rejects the request with 401 unless the session carries a user id.
pub async fn require_session(
    session: Session,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let user_id = session_user_id(&session)
        .await?
        .ok_or_else(ApiError::not_authenticated)?;

    tracing::Span::current().record("user_id", user_id.as_str());
    request.extensions_mut().insert(CurrentUser(user_id));

    Ok(next.run(request).await)
}

// ============================================================================
// Helpers
// ============================================================================

pub async fn session_user_id(session: &Session) -> Result<Option<String>, ApiError> {
    Ok(session.get::<String>(USER_ID_KEY).await?)
}

/// Bind the session to `user_id` under a fresh session id.
pub async fn establish_session(session: &Session, user_id: &str) -> Result<(), ApiError> {
    session.cycle_id().await?;
    session.insert(USER_ID_KEY, user_id).await?;
    Ok(())
}
