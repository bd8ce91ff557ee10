//! Bearer-token authentication against the session store.
//!
//! Tokens are minted and refreshed by the external auth service; this layer
//! only resolves them to a user and places the user in request extensions.

use axum::{
    extract::{Request, State},
    http::header,
    middleware::Next,
    response::Response,
};

use crate::errors::AppError;
use crate::state::AppState;

pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let token = extract_bearer_token(&request)
        .ok_or_else(|| AppError::unauthorized("Authentication required"))?;
    let user = state
        .users
        .find_by_session(&token)
        .await
        .map_err(AppError::from)?
        .ok_or_else(|| AppError::unauthorized("Invalid or expired session"))?;

    request.extensions_mut().insert(user);
    Ok(next.run(request).await)
}

/// Like [`auth_middleware`], but anonymous requests pass through without a
/// user extension; read handlers then omit the requester-specific fields.
pub async fn optional_auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    if let Some(token) = extract_bearer_token(&request)
        && let Ok(Some(user)) = state.users.find_by_session(&token).await
    {
        request.extensions_mut().insert(user);
    }
    next.run(request).await
}

fn extract_bearer_token(request: &Request) -> Option<String> {
    request
        .headers()
        .get(header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(str::to_string)
}
