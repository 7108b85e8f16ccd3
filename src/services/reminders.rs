// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Workout reminder planning.
//!
//! Computes which schedule items need a reminder and when. Delivering the
//! notification is left to the device.

use crate::models::{Exercise, ScheduleItem, ScheduleStatus};
use crate::time_utils::{parse_date, parse_time};
use chrono::{NaiveDateTime, NaiveTime};
use serde::Serialize;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// A reminder to deliver at `fire_at` (device local time).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct Reminder {
    pub date: String,
    pub exercise_id: String,
    #[cfg_attr(feature = "binding-generation", ts(type = "string"))]
    pub fire_at: NaiveDateTime,
    pub title: String,
    pub body: String,
}

fn default_time() -> NaiveTime {
    NaiveTime::from_hms_opt(8, 0, 0).unwrap_or(NaiveTime::MIN)
}

/// Plan reminders for every pending item still ahead of `now`.
pub fn plan_reminders(
    schedule: &[ScheduleItem],
    preferred_time: &str,
    catalog: &[Exercise],
    now: NaiveDateTime,
) -> Vec<Reminder> {
    let time = parse_time(preferred_time).unwrap_or_else(default_time);

    schedule
        .iter()
        .filter(|item| item.status == ScheduleStatus::Pending)
        .filter_map(|item| {
            let Some(date) = parse_date(&item.date) else {
                tracing::warn!(date = %item.date, "Skipping reminder for invalid date");
                return None;
            };
            let fire_at = date.and_time(time);
            if fire_at < now {
                return None;
            }

            let exercise = catalog.iter().find(|ex| ex.id == item.exercise_id);
            let (title, body) = match exercise {
                Some(ex) => (
                    format!("Time to work out: {}", ex.title),
                    format!(
                        "Stay on track! Your {}-minute workout is waiting for you.",
                        ex.duration_min
                    ),
                ),
                None => (
                    "Time to work out!".to_string(),
                    "Stay on track! Your workout is waiting for you.".to_string(),
                ),
            };

            Some(Reminder {
                date: item.date.clone(),
                exercise_id: item.exercise_id.clone(),
                fire_at,
                title,
                body,
            })
        })
        .collect()
}
