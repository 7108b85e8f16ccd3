//! User account and safety profile models.

use serde::{Deserialize, Serialize};
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

use crate::models::ScheduleItem;

/// Preferred workout time when the user has not picked one.
pub const DEFAULT_WORKOUT_TIME: &str = "08:00";

/// Normalize an email for use as the account key (trimmed, lower-cased).
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Weekly availability.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct Availability {
    /// Weekday names (e.g., "Segunda")
    pub days: Vec<String>,
    /// Preferred time of day (HH:MM)
    pub time: String,
}

impl Default for Availability {
    fn default() -> Self {
        Self {
            days: Vec::new(),
            time: DEFAULT_WORKOUT_TIME.to_string(),
        }
    }
}

/// Safety profile entered during onboarding.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct UserProfile {
    pub name: String,
    pub age: u32,
    /// Restriction tags; may contain the "none" sentinel
    pub restrictions: Vec<String>,
    pub availability: Availability,
}

/// Stored account record, keyed by normalized email.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserAccount {
    /// Normalized email (primary key)
    pub email: String,
    /// Stored as entered. Never leaves the device.
    pub password: String,
    /// None until onboarding completes
    pub profile: Option<UserProfile>,
    #[serde(default)]
    pub schedule: Vec<ScheduleItem>,
}

impl UserAccount {
    /// New account right after registration.
    pub fn new(email: &str, password: &str) -> Self {
        Self {
            email: normalize_email(email),
            password: password.to_string(),
            profile: None,
            schedule: Vec::new(),
        }
    }
}
