// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Data models for the application.

pub mod exercise;
pub mod schedule;
pub mod user;

pub use exercise::{Category, Exercise, Intensity};
pub use schedule::{ScheduleItem, ScheduleStatus};
pub use user::{normalize_email, Availability, UserAccount, UserProfile};
