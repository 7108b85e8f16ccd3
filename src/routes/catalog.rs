// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Read-only catalog routes (public).

use axum::{extract::Path, routing::get, Json, Router};
use serde::Serialize;
use std::sync::Arc;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

use crate::error::{AppError, Result};
use crate::models::{Category, Exercise, Intensity};
use crate::services::catalog::{find_exercise, EXERCISE_CATALOG, RESTRICTION_OPTIONS, WEEKDAYS};
use crate::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/catalog/exercises", get(list_exercises))
        .route("/api/catalog/exercises/{id}", get(get_exercise))
        .route("/api/catalog/restrictions", get(list_restrictions))
        .route("/api/catalog/weekdays", get(list_weekdays))
}

/// Exercise as returned by the API.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct ExerciseResponse {
    pub id: String,
    pub title: String,
    pub category: Category,
    pub intensity: Intensity,
    pub contraindications: Vec<String>,
    pub description: String,
    pub duration_min: u32,
}

impl From<&Exercise> for ExerciseResponse {
    fn from(ex: &Exercise) -> Self {
        Self {
            id: ex.id.to_string(),
            title: ex.title.to_string(),
            category: ex.category,
            intensity: ex.intensity,
            contraindications: ex.contraindications.iter().map(|c| c.to_string()).collect(),
            description: ex.description.to_string(),
            duration_min: ex.duration_min,
        }
    }
}

/// Restriction choice shown during onboarding.
#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct RestrictionResponse {
    pub id: String,
    pub label: String,
}

async fn list_exercises() -> Json<Vec<ExerciseResponse>> {
    Json(EXERCISE_CATALOG.iter().map(ExerciseResponse::from).collect())
}

async fn get_exercise(Path(id): Path<String>) -> Result<Json<ExerciseResponse>> {
    find_exercise(&id)
        .map(|ex| Json(ExerciseResponse::from(ex)))
        .ok_or_else(|| AppError::NotFound(format!("Exercise {} not found", id)))
}

async fn list_restrictions() -> Json<Vec<RestrictionResponse>> {
    Json(
        RESTRICTION_OPTIONS
            .iter()
            .map(|r| RestrictionResponse {
                id: r.id.to_string(),
                label: r.label.to_string(),
            })
            .collect(),
    )
}

async fn list_weekdays() -> Json<Vec<&'static str>> {
    Json(WEEKDAYS.to_vec())
}
