use std::fmt;

use fxhash::FxHashMap;
use serde::{Deserialize, Serialize};

/// Severity bucket shown next to the guidance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum TriageLevel {
    Critical,
    Urgent,
    #[default]
    Routine,
}

impl TriageLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            TriageLevel::Critical => "critical",
            TriageLevel::Urgent => "urgent",
            TriageLevel::Routine => "routine",
        }
    }
}

impl fmt::Display for TriageLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

pub const DEFAULT_CRITICAL_LABELS: &[&str] = &[
    "chest_pain",
    "choking",
    "not_breathing",
    "severe_bleeding",
    "unconscious",
    "stroke",
    "anaphylaxis",
    "seizure",
    "heart_attack",
];

pub const DEFAULT_URGENT_LABELS: &[&str] = &[
    "fracture",
    "burn",
    "head_injury",
    "poisoning",
    "allergic_reaction",
    "asthma_attack",
    "dislocation",
    "deep_cut",
];

/// Total label → [`TriageLevel`] mapping. Unknown labels are `Routine`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TriageMapper {
    levels: FxHashMap<String, TriageLevel>,
}

impl TriageMapper {
    /// Builds a mapper from explicit entries only; everything else is `Routine`.
    pub fn from_entries<I, S>(entries: I) -> Self
    where
        I: IntoIterator<Item = (S, TriageLevel)>,
        S: Into<String>,
    {
        Self {
            levels: entries
                .into_iter()
                .map(|(label, level)| (label.into(), level))
                .collect(),
        }
    }

    /// Default table with `overrides` applied on top.
    pub fn with_overrides<I, S>(overrides: I) -> Self
    where
        I: IntoIterator<Item = (S, TriageLevel)>,
        S: Into<String>,
    {
        let mut mapper = Self::default();
        for (label, level) in overrides {
            mapper.levels.insert(label.into(), level);
        }
        mapper
    }

    pub fn level(&self, label: &str) -> TriageLevel {
        self.levels.get(label).copied().unwrap_or_default()
    }
}

impl Default for TriageMapper {
    fn default() -> Self {
        let critical = DEFAULT_CRITICAL_LABELS
            .iter()
            .map(|&label| (label, TriageLevel::Critical));
        let urgent = DEFAULT_URGENT_LABELS
            .iter()
            .map(|&label| (label, TriageLevel::Urgent));
        Self::from_entries(critical.chain(urgent))
    }
}
