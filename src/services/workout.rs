// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! In-memory workout state for the logged-in account.
//!
//! Mirrors the account's profile and schedule. Mutations here are local;
//! the session layer decides when to persist them.

use crate::models::{ScheduleItem, ScheduleStatus, UserAccount, UserProfile};
use crate::time_utils::{format_date, parse_time};
use chrono::NaiveDate;
use serde::Deserialize;
use validator::{Validate, ValidationError};
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// Minimum age accepted by onboarding.
pub const MIN_AGE: u32 = 50;
/// Maximum age accepted by onboarding.
pub const MAX_AGE: u32 = 120;

/// Partial profile update from the onboarding wizard.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct ProfileUpdate {
    #[validate(length(min = 1, max = 100))]
    pub name: Option<String>,
    #[validate(range(min = MIN_AGE, max = MAX_AGE))]
    pub age: Option<u32>,
    #[validate(custom(function = "validate_time"))]
    pub time: Option<String>,
}

fn validate_time(time: &str) -> Result<(), ValidationError> {
    if parse_time(time).is_some() {
        Ok(())
    } else {
        Err(ValidationError::new("time_format"))
    }
}

/// Profile problems that block saving.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ProfileError {
    #[error("Name is required")]
    MissingName,

    #[error("Age must be between 50 and 120")]
    AgeOutOfRange,

    #[error("Time must use the HH:MM format")]
    InvalidTime,

    #[error("Select at least one available day")]
    NoDays,

    #[error("Invalid profile update: {0}")]
    Invalid(String),
}

/// Profile and schedule of the current session.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WorkoutState {
    pub profile: UserProfile,
    pub schedule: Vec<ScheduleItem>,
}

impl WorkoutState {
    /// Mirror an account; the default state when there is none.
    pub fn from_account(account: Option<&UserAccount>) -> Self {
        match account {
            Some(account) => Self {
                profile: account.profile.clone().unwrap_or_default(),
                schedule: account.schedule.clone(),
            },
            None => Self::default(),
        }
    }

    /// Add the restriction if absent, remove it if present.
    pub fn toggle_restriction(&mut self, id: &str) {
        toggle(&mut self.profile.restrictions, id);
    }

    /// Add the day if absent, remove it if present.
    pub fn toggle_day(&mut self, day: &str) {
        toggle(&mut self.profile.availability.days, day);
    }

    pub fn set_name(&mut self, name: &str) {
        self.profile.name = name.to_string();
    }

    pub fn set_age(&mut self, age: u32) {
        self.profile.age = age;
    }

    pub fn set_time(&mut self, time: &str) {
        self.profile.availability.time = time.to_string();
    }

    /// Apply a validated partial update.
    pub fn apply_update(&mut self, update: ProfileUpdate) -> Result<(), ProfileError> {
        update
            .validate()
            .map_err(|e| ProfileError::Invalid(e.to_string()))?;

        if let Some(name) = update.name {
            self.profile.name = name.trim().to_string();
        }
        if let Some(age) = update.age {
            self.profile.age = age;
        }
        if let Some(time) = update.time {
            self.profile.availability.time = time;
        }
        Ok(())
    }

    /// Check that the profile is complete enough to save.
    pub fn validate_profile(&self) -> Result<(), ProfileError> {
        let profile = &self.profile;
        if profile.name.trim().is_empty() {
            return Err(ProfileError::MissingName);
        }
        if !(MIN_AGE..=MAX_AGE).contains(&profile.age) {
            return Err(ProfileError::AgeOutOfRange);
        }
        if parse_time(&profile.availability.time).is_none() {
            return Err(ProfileError::InvalidTime);
        }
        if profile.availability.days.is_empty() {
            return Err(ProfileError::NoDays);
        }
        Ok(())
    }

    /// Replace the whole schedule.
    pub fn replace_schedule(&mut self, schedule: Vec<ScheduleItem>) {
        self.schedule = schedule;
    }

    /// Mark every item on `date` as completed.
    ///
    /// Returns `true` if any item changed.
    pub fn complete_exercise(&mut self, date: &str) -> bool {
        let mut changed = false;
        for item in self.schedule.iter_mut().filter(|i| i.date == date) {
            if item.status != ScheduleStatus::Completed {
                item.status = ScheduleStatus::Completed;
                changed = true;
            }
        }
        changed
    }

    /// First pending item dated `today` or later.
    pub fn next_activity(&self, today: NaiveDate) -> Option<&ScheduleItem> {
        let today = format_date(today);
        self.schedule
            .iter()
            .find(|item| item.date >= today && item.status == ScheduleStatus::Pending)
    }

    /// (completed, total) item counts.
    pub fn progress(&self) -> (usize, usize) {
        let completed = self.schedule.iter().filter(|i| i.is_completed()).count();
        (completed, self.schedule.len())
    }
}

fn toggle(values: &mut Vec<String>, value: &str) {
    if let Some(pos) = values.iter().position(|v| v == value) {
        values.remove(pos);
    } else {
        values.push(value.to_string());
    }
}
