// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Profile and schedule routes for the logged-in user.

use crate::error::{AppError, Result};
use crate::middleware::auth::SessionUser;
use crate::models::{ScheduleItem, ScheduleStatus, UserProfile};
use crate::routes::catalog::ExerciseResponse;
use crate::services::catalog::{find_exercise, is_known_restriction, is_weekday};
use crate::services::{ProfileUpdate, Reminder, SessionError, SessionSnapshot};
use crate::time_utils::{parse_date, today_utc};
use crate::AppState;
use axum::{
    extract::{Path, State},
    routing::{get, post},
    Extension, Json, Router,
};
use serde::Serialize;
use std::sync::Arc;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// Workout routes (require a session).
/// The session gate is applied in routes/mod.rs for these routes.
pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/profile", get(get_profile).patch(update_profile))
        .route(
            "/api/profile/restrictions/{id}/toggle",
            post(toggle_restriction),
        )
        .route("/api/profile/days/{day}/toggle", post(toggle_day))
        .route("/api/profile/save", post(save_profile))
        .route("/api/schedule", get(get_schedule))
        .route("/api/schedule/generate", post(generate_schedule))
        .route("/api/schedule/next", get(next_activity))
        .route("/api/schedule/{date}/complete", post(complete_exercise))
        .route("/api/reminders", get(get_reminders))
}

// ─── Profile ─────────────────────────────────────────────────

async fn get_profile(State(state): State<Arc<AppState>>) -> Json<UserProfile> {
    Json(state.session.profile().await)
}

/// Apply onboarding answers to the local profile.
async fn update_profile(
    State(state): State<Arc<AppState>>,
    Json(update): Json<ProfileUpdate>,
) -> Result<Json<UserProfile>> {
    state.session.update_profile(update).await?;
    Ok(Json(state.session.profile().await))
}

async fn toggle_restriction(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<UserProfile>> {
    if !is_known_restriction(&id) {
        return Err(AppError::BadRequest(format!("Unknown restriction: {}", id)));
    }
    state.session.toggle_restriction(&id).await;
    Ok(Json(state.session.profile().await))
}

async fn toggle_day(
    State(state): State<Arc<AppState>>,
    Path(day): Path<String>,
) -> Result<Json<UserProfile>> {
    if !is_weekday(&day) {
        return Err(AppError::BadRequest(format!("Unknown weekday: {}", day)));
    }
    state.session.toggle_day(&day).await;
    Ok(Json(state.session.profile().await))
}

/// Validate and persist the profile (end of onboarding).
async fn save_profile(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<SessionUser>,
) -> Result<Json<SessionSnapshot>> {
    state.session.try_save_profile().await?;
    tracing::debug!(email = %user.email, "Profile save request completed");
    Ok(Json(state.session.snapshot().await))
}

// ─── Schedule ────────────────────────────────────────────────

/// Schedule entry with its catalog exercise, when the id is known.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct ScheduleEntry {
    pub date: String,
    pub exercise_id: String,
    pub status: ScheduleStatus,
    pub exercise: Option<ExerciseResponse>,
}

impl From<ScheduleItem> for ScheduleEntry {
    fn from(item: ScheduleItem) -> Self {
        let exercise = find_exercise(&item.exercise_id).map(ExerciseResponse::from);
        Self {
            date: item.date,
            exercise_id: item.exercise_id,
            status: item.status,
            exercise,
        }
    }
}

/// Weekly schedule with progress counts.
#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct ScheduleResponse {
    pub items: Vec<ScheduleEntry>,
    pub completed: usize,
    pub total: usize,
}

impl From<Vec<ScheduleItem>> for ScheduleResponse {
    fn from(schedule: Vec<ScheduleItem>) -> Self {
        let completed = schedule.iter().filter(|i| i.is_completed()).count();
        let total = schedule.len();
        Self {
            items: schedule.into_iter().map(ScheduleEntry::from).collect(),
            completed,
            total,
        }
    }
}

async fn get_schedule(State(state): State<Arc<AppState>>) -> Json<ScheduleResponse> {
    Json(ScheduleResponse::from(state.session.schedule().await))
}

/// Generate a new weekly schedule.
///
/// A generation failure still answers 200: the schedule is empty and the
/// session carries the error message.
async fn generate_schedule(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<SessionUser>,
) -> Result<Json<SessionSnapshot>> {
    match state.session.try_create_schedule().await {
        Ok(count) => {
            tracing::info!(email = %user.email, items = count, "Schedule created");
        }
        Err(SessionError::Generation(err)) => {
            tracing::warn!(email = %user.email, error = %err, "Schedule creation degraded to empty");
        }
        Err(err) => return Err(err.into()),
    }
    Ok(Json(state.session.snapshot().await))
}

async fn complete_exercise(
    State(state): State<Arc<AppState>>,
    Path(date): Path<String>,
) -> Result<Json<ScheduleResponse>> {
    if parse_date(&date).is_none() {
        return Err(AppError::BadRequest(format!("Invalid date: {}", date)));
    }
    state.session.try_complete_exercise(&date).await?;
    Ok(Json(ScheduleResponse::from(state.session.schedule().await)))
}

async fn next_activity(State(state): State<Arc<AppState>>) -> Json<Option<ScheduleEntry>> {
    let next = state.session.next_activity(today_utc()).await;
    Json(next.map(ScheduleEntry::from))
}

/// Reminders still due, in device local time.
async fn get_reminders(State(state): State<Arc<AppState>>) -> Json<Vec<Reminder>> {
    let now = chrono::Local::now().naive_local();
    Json(state.session.reminders(now).await)
}
