// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Session gate for the authenticated routes.

use crate::error::AppError;
use crate::AppState;
use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use std::sync::Arc;

/// Email of the logged-in account, inserted as a request extension.
#[derive(Debug, Clone)]
pub struct SessionUser {
    pub email: String,
}

/// Middleware that requires a logged-in local session.
pub async fn require_session(
    State(state): State<Arc<AppState>>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let email = state
        .session
        .current_email()
        .await
        .ok_or(AppError::Unauthorized)?;

    request.extensions_mut().insert(SessionUser { email });
    Ok(next.run(request).await)
}
