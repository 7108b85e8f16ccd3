// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Exercise model for the compiled-in catalog.

use serde::{Deserialize, Serialize};
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// Exercise category, used to vary the week.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub enum Category {
    Strength,
    Cardio,
    Flexibility,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Strength => "strength",
            Category::Cardio => "cardio",
            Category::Flexibility => "flexibility",
        }
    }
}

/// Exercise intensity. The catalog only carries gentle levels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub enum Intensity {
    Low,
    Medium,
}

impl Intensity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Intensity::Low => "low",
            Intensity::Medium => "medium",
        }
    }
}

/// A catalog exercise with its safety metadata.
///
/// Catalog entries are `'static` and never mutated at runtime.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Exercise {
    /// Unique catalog ID (e.g., "ex_001")
    pub id: &'static str,
    /// Display title
    pub title: &'static str,
    pub category: Category,
    /// Duration in minutes
    pub duration_min: u32,
    pub intensity: Intensity,
    /// Restriction tags that rule this exercise out
    pub contraindications: &'static [&'static str],
    /// Step-by-step instructions, one step per line
    pub description: &'static str,
}

impl Exercise {
    /// Whether any of the given restriction tags is a contraindication.
    pub fn is_contraindicated_for<S: AsRef<str>>(&self, restrictions: &[S]) -> bool {
        self.contraindications
            .iter()
            .any(|c| restrictions.iter().any(|r| r.as_ref() == *c))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: Exercise = Exercise {
        id: "ex_test",
        title: "Test",
        category: Category::Cardio,
        duration_min: 10,
        intensity: Intensity::Low,
        contraindications: &["knee_pain"],
        description: "",
    };

    #[test]
    fn test_contraindication_match() {
        assert!(SAMPLE.is_contraindicated_for(&["back_pain", "knee_pain"]));
        assert!(!SAMPLE.is_contraindicated_for(&["back_pain"]));
        assert!(!SAMPLE.is_contraindicated_for::<&str>(&[]));
    }

    #[test]
    fn test_serializes_camel_case() {
        let json = serde_json::to_value(&SAMPLE).unwrap();
        assert_eq!(json["durationMin"], 10);
        assert_eq!(json["category"], "cardio");
        assert_eq!(json["intensity"], "low");
        assert_eq!(json["contraindications"][0], "knee_pain");
    }
}
