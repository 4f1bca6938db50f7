//! How class levels turn into caster levels.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// A named progression speed within a spellcasting method (full, half, ...).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProgressionMode {
    pub label: String,
    /// Class levels per caster level.
    pub divisor: u32,
    /// Round fractional caster levels up instead of down.
    pub round_up: bool,
}

impl Default for ProgressionMode {
    fn default() -> Self {
        Self {
            label: String::new(),
            divisor: 1,
            round_up: true,
        }
    }
}

impl ProgressionMode {
    pub fn new(label: impl Into<String>, divisor: u32, round_up: bool) -> Self {
        Self {
            label: label.into(),
            divisor,
            round_up,
        }
    }

    /// Caster levels contributed by `levels` class levels.
    pub fn contribution(&self, levels: u32) -> u32 {
        if self.round_up {
            self.ceil(levels)
        } else {
            levels / self.divisor.max(1)
        }
    }

    pub(crate) fn ceil(&self, levels: u32) -> u32 {
        levels.div_ceil(self.divisor.max(1))
    }
}

/// The spellcasting a single class grants.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassSpellcasting {
    /// Class identifier, used for logging only.
    #[serde(default)]
    pub class: String,
    /// Spellcasting method key.
    pub method: String,
    /// Progression mode key within the method. Ignored by methods without modes.
    #[serde(default)]
    pub progression: String,
    /// Class levels.
    pub levels: u32,
}

impl ClassSpellcasting {
    pub fn new(method: impl Into<String>, progression: impl Into<String>, levels: u32) -> Self {
        Self {
            class: String::new(),
            method: method.into(),
            progression: progression.into(),
            levels,
        }
    }

    pub fn with_class(mut self, class: impl Into<String>) -> Self {
        self.class = class.into();
        self
    }
}

/// Running caster level per spellcasting method.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CasterProgression(BTreeMap<String, i32>);

impl CasterProgression {
    pub fn new() -> Self {
        Self::default()
    }

    /// Caster level for the method, 0 if nothing contributed.
    pub fn level(&self, method: &str) -> i32 {
        self.0.get(method).copied().unwrap_or(0)
    }

    pub fn set(&mut self, method: &str, level: i32) {
        self.0.insert(method.to_string(), level);
    }

    /// Saturates instead of overflowing; levels are clamped when slots are
    /// calculated.
    pub fn add(&mut self, method: &str, levels: i32) {
        let level = self.0.entry(method.to_string()).or_insert(0);
        *level = level.saturating_add(levels);
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, i32)> {
        self.0.iter().map(|(key, level)| (key.as_str(), *level))
    }
}
