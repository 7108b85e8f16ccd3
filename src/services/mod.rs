// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Services module - business logic layer.

pub mod auth;
pub mod catalog;
pub mod gemini;
pub mod reminders;
pub mod schedule;
pub mod session;
pub mod workout;

pub use auth::{AuthError, AuthService};
pub use gemini::GeminiClient;
pub use reminders::{plan_reminders, Reminder};
pub use schedule::{ScheduleError, ScheduleGenerator};
pub use session::{AppSession, SessionError, SessionSnapshot};
pub use workout::{ProfileError, ProfileUpdate, WorkoutState};
