// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Static exercise catalog, restriction options and weekday names.

use crate::models::{Category, Exercise, Intensity};
use serde::Serialize;

pub const KNEE_PAIN: &str = "knee_pain";
pub const BACK_PAIN: &str = "back_pain";
pub const HEART_CONDITION: &str = "heart_condition";
/// Sentinel tag meaning "no restrictions".
pub const NO_RESTRICTION: &str = "none";

/// Curated exercises suitable for older adults.
pub const EXERCISE_CATALOG: &[Exercise] = &[
    Exercise {
        id: "ex_001",
        title: "Caminhada Leve",
        category: Category::Cardio,
        duration_min: 20,
        intensity: Intensity::Low,
        contraindications: &[],
        description: "1. Encontre um local plano e seguro\n2. Use calçado confortável\n3. Caminhe em ritmo suave por 20 minutos\n4. Mantenha postura ereta\n5. Hidrate-se antes e depois",
    },
    Exercise {
        id: "ex_002",
        title: "Exercícios na Cadeira",
        category: Category::Strength,
        duration_min: 15,
        intensity: Intensity::Low,
        contraindications: &[],
        description: "1. Sente-se em cadeira firme\n2. Elevação de braços (10x)\n3. Rotação de ombros (10x)\n4. Elevação de pernas alternadas (10x cada)\n5. Respire profundamente entre séries",
    },
    Exercise {
        id: "ex_003",
        title: "Alongamento Suave",
        category: Category::Flexibility,
        duration_min: 10,
        intensity: Intensity::Low,
        contraindications: &[],
        description: "1. Alongue pescoço suavemente\n2. Estique braços acima da cabeça\n3. Rotação de punhos e tornozelos\n4. Alongue pernas sentado\n5. Nunca force além do confortável",
    },
    Exercise {
        id: "ex_004",
        title: "Yoga na Cadeira",
        category: Category::Flexibility,
        duration_min: 20,
        intensity: Intensity::Low,
        contraindications: &[KNEE_PAIN],
        description: "1. Sente-se confortavelmente\n2. Respiração profunda (5 min)\n3. Torção suave do tronco\n4. Extensão lateral dos braços\n5. Meditação final (2 min)",
    },
    Exercise {
        id: "ex_005",
        title: "Hidroginástica",
        category: Category::Cardio,
        duration_min: 30,
        intensity: Intensity::Medium,
        contraindications: &[HEART_CONDITION],
        description: "1. Entre na piscina com auxílio\n2. Aquecimento com movimentos leves\n3. Caminhada na água\n4. Movimentos de braços\n5. Resfriamento gradual",
    },
    Exercise {
        id: "ex_006",
        title: "Fortalecimento com Peso Leve",
        category: Category::Strength,
        duration_min: 15,
        intensity: Intensity::Medium,
        contraindications: &[BACK_PAIN],
        description: "1. Use pesos de 0.5-1kg\n2. Bíceps (3 séries de 8)\n3. Elevação lateral (3 séries de 8)\n4. Descanso de 1 min entre séries\n5. Alongue após finalizar",
    },
];

/// A selectable restriction with its display label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RestrictionOption {
    pub id: &'static str,
    pub label: &'static str,
}

/// Restrictions offered by the onboarding wizard, sentinel last.
pub const RESTRICTION_OPTIONS: &[RestrictionOption] = &[
    RestrictionOption {
        id: KNEE_PAIN,
        label: "Dor nos joelhos",
    },
    RestrictionOption {
        id: BACK_PAIN,
        label: "Dor nas costas",
    },
    RestrictionOption {
        id: HEART_CONDITION,
        label: "Problema cardíaco",
    },
    RestrictionOption {
        id: NO_RESTRICTION,
        label: "Nenhuma limitação",
    },
];

/// Weekday names offered by the availability step, Monday first.
pub const WEEKDAYS: &[&str] = &[
    "Segunda", "Terça", "Quarta", "Quinta", "Sexta", "Sábado", "Domingo",
];

/// Look up a catalog exercise by ID.
pub fn find_exercise(id: &str) -> Option<&'static Exercise> {
    EXERCISE_CATALOG.iter().find(|ex| ex.id == id)
}

pub fn is_known_restriction(id: &str) -> bool {
    RESTRICTION_OPTIONS.iter().any(|r| r.id == id)
}

pub fn is_weekday(day: &str) -> bool {
    WEEKDAYS.contains(&day)
}
