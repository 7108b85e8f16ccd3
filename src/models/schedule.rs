//! Schedule item model.

use serde::{Deserialize, Serialize};
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// Completion status of a scheduled exercise.
///
/// Transitions are one-way: `Pending` -> `Completed`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub enum ScheduleStatus {
    #[default]
    Pending,
    Completed,
}

/// One exercise on one day of the weekly schedule.
///
/// Several items may share a date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct ScheduleItem {
    /// Calendar date (YYYY-MM-DD)
    pub date: String,
    /// Catalog exercise ID
    pub exercise_id: String,
    pub status: ScheduleStatus,
}

impl ScheduleItem {
    /// Create a pending item.
    pub fn pending(date: impl Into<String>, exercise_id: impl Into<String>) -> Self {
        Self {
            date: date.into(),
            exercise_id: exercise_id.into(),
            status: ScheduleStatus::Pending,
        }
    }

    pub fn is_completed(&self) -> bool {
        self.status == ScheduleStatus::Completed
    }
}
