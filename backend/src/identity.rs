use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use uuid::Uuid;

use crate::error::AppError;
use crate::AppState;

pub const USER_ID_HEADER: &str = "x-user-id";

/// Owner of every query and command in a request.
#[derive(Debug, Clone, Copy)]
pub struct Identity {
    pub user_id: Uuid,
}

/// Resolves the requesting owner from `X-User-Id`, falling back to the
/// configured default user. Authentication happens upstream.
pub async fn resolve_identity(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let user_id = match req.headers().get(USER_ID_HEADER) {
        Some(value) => value
            .to_str()
            .ok()
            .and_then(|v| Uuid::parse_str(v.trim()).ok())
            .ok_or_else(|| AppError::Validation("X-User-Id must be a valid UUID".into()))?,
        None => state.config.default_user_id,
    };

    req.extensions_mut().insert(Identity { user_id });
    Ok(next.run(req).await)
}
