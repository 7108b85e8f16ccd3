// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Weekly schedule generation.
//!
//! Pipeline:
//! 1. Filter the catalog to exercises safe for the profile's restrictions
//! 2. Build the planning prompt around those candidates
//! 3. Ask the model for a JSON array of `{date, exerciseId}`
//! 4. Parse the answer and drop anything outside the candidate set
//!
//! The filter in step 1 is the source of truth. The model only sequences
//! candidates it was given.

use crate::models::{Exercise, ScheduleItem, UserProfile};
use crate::services::catalog::{EXERCISE_CATALOG, NO_RESTRICTION};
use crate::services::gemini::GeminiClient;
use crate::time_utils::{format_date, parse_date, today_utc};
use chrono::NaiveDate;
use serde::Deserialize;

/// Number of calendar days a schedule covers, starting today.
pub const SCHEDULE_DAYS: u32 = 7;

/// Errors from the generation pipeline.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ScheduleError {
    #[error("Gemini API key is not configured")]
    MissingApiKey,

    #[error("Generation request failed: {0}")]
    Request(String),

    #[error("Generation request timed out")]
    Timeout,

    #[error("Gemini API error (HTTP {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Model returned no content")]
    EmptyResponse,

    #[error("Malformed schedule response: {0}")]
    Malformed(String),
}

/// Catalog exercises with no contraindication in `profile.restrictions`.
pub fn suitable_exercises<'a>(profile: &UserProfile, catalog: &'a [Exercise]) -> Vec<&'a Exercise> {
    catalog
        .iter()
        .filter(|ex| !ex.is_contraindicated_for(profile.restrictions.as_slice()))
        .collect()
}

/// Build the planning prompt for `profile` starting at `today`.
pub fn build_prompt(profile: &UserProfile, suitable: &[&Exercise], today: NaiveDate) -> String {
    let restrictions: Vec<&str> = profile
        .restrictions
        .iter()
        .map(String::as_str)
        .filter(|r| *r != NO_RESTRICTION)
        .collect();
    let restrictions = if restrictions.is_empty() {
        "none".to_string()
    } else {
        restrictions.join(", ")
    };

    let exercises = suitable
        .iter()
        .map(|ex| {
            format!(
                "{}: {} ({}, {})",
                ex.id,
                ex.title,
                ex.category.as_str(),
                ex.intensity.as_str()
            )
        })
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        "You are a fitness specialist for older adults. Based on the profile below, \
create an exercise schedule for the next {days} days.

USER PROFILE:
- Age: {age} years
- Restrictions: {restrictions}
- Available days: {available}
- Preferred time: {time}

AVAILABLE EXERCISES (IDs):
{exercises}

RULES:
0. The schedule must cover exactly the next {days} calendar days starting today, {today}.
1. Only schedule exercises on the user's available days
2. Vary the exercise categories (cardio, strength, flexibility)
3. Never repeat the same exercise on consecutive days
4. Prefer low intensity exercises
5. Respect the contraindications; only use the exercise IDs listed above

Return ONLY a valid raw JSON array (no markdown) in this format, with dates as YYYY-MM-DD:
[{{\"date\":\"{today}\",\"exerciseId\":\"ex_001\"}}]",
        days = SCHEDULE_DAYS,
        age = profile.age,
        restrictions = restrictions,
        available = profile.availability.days.join(", "),
        time = profile.availability.time,
        exercises = exercises,
        today = format_date(today),
    )
}

/// Remove markdown code fences the model sometimes wraps JSON in.
pub fn strip_code_fences(text: &str) -> String {
    text.replace("```json", "").replace("```", "").trim().to_string()
}

#[derive(Debug, Deserialize)]
struct RawScheduleEntry {
    date: String,
    #[serde(rename = "exerciseId")]
    exercise_id: String,
}

/// Parse the model's answer into pending schedule items.
///
/// Entries naming an exercise outside `suitable` are dropped. Entries that
/// are missing fields or carry an invalid date fail the whole parse.
pub fn parse_schedule(
    text: &str,
    suitable: &[&Exercise],
) -> Result<Vec<ScheduleItem>, ScheduleError> {
    let cleaned = strip_code_fences(text);
    let entries: Vec<RawScheduleEntry> =
        serde_json::from_str(&cleaned).map_err(|e| ScheduleError::Malformed(e.to_string()))?;

    let mut items = Vec::with_capacity(entries.len());
    for entry in entries {
        let Some(date) = parse_date(&entry.date) else {
            return Err(ScheduleError::Malformed(format!(
                "invalid date '{}'",
                entry.date
            )));
        };

        if !suitable.iter().any(|ex| ex.id == entry.exercise_id) {
            tracing::warn!(
                date = %entry.date,
                exercise_id = %entry.exercise_id,
                "Dropping unsafe or unknown exercise from model output"
            );
            continue;
        }

        items.push(ScheduleItem::pending(format_date(date), entry.exercise_id));
    }

    // Dates are YYYY-MM-DD, so string order is date order
    items.sort_by(|a, b| a.date.cmp(&b.date));
    Ok(items)
}

/// Generates weekly schedules with the external model.
#[derive(Clone)]
pub struct ScheduleGenerator {
    client: GeminiClient,
    catalog: &'static [Exercise],
}

impl ScheduleGenerator {
    pub fn new(client: GeminiClient) -> Self {
        Self {
            client,
            catalog: EXERCISE_CATALOG,
        }
    }

    /// Generate a schedule starting today (UTC).
    pub async fn generate(&self, profile: &UserProfile) -> Result<Vec<ScheduleItem>, ScheduleError> {
        self.generate_from(profile, today_utc()).await
    }

    /// Generate a schedule starting at `today`.
    pub async fn generate_from(
        &self,
        profile: &UserProfile,
        today: NaiveDate,
    ) -> Result<Vec<ScheduleItem>, ScheduleError> {
        let suitable = suitable_exercises(profile, self.catalog);
        tracing::info!(
            count = suitable.len(),
            ids = ?suitable.iter().map(|ex| ex.id).collect::<Vec<_>>(),
            "Suitable exercises found"
        );

        if suitable.is_empty() {
            tracing::info!("No suitable exercises, skipping generation");
            return Ok(Vec::new());
        }

        let prompt = build_prompt(profile, &suitable, today);
        let text = self.client.generate_json(&prompt).await?;
        let items = parse_schedule(&text, &suitable)?;

        tracing::info!(items = items.len(), "Schedule generated");
        Ok(items)
    }
}
