//! Label lookup injected into spellcasting methods.
//!
//! Methods never reach for a global translation table. They are handed a
//! [`Localizer`] at construction and resolve label keys through it.

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Key prefix for per-method slot labels (`SPELLCASTING.SLOTS.pact`, `SPELLCASTING.SLOTS.spell3`).
pub const SLOT_LABEL_PREFIX: &str = "SPELLCASTING.SLOTS.";

/// Key prefix for spell level labels (`SpellLevel0` .. `SpellLevel9`).
pub const SPELL_LEVEL_LABEL_PREFIX: &str = "SpellLevel";

/// Resolves label keys into display text.
pub trait Localizer: Send + Sync + fmt::Debug {
    /// Localize a key. Unknown keys are returned unchanged.
    fn localize(&self, key: &str) -> String;

    /// Whether the key has a translation.
    fn has(&self, key: &str) -> bool;
}

/// Flat key/text catalog, typically loaded from a JSON object.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LabelCatalog {
    entries: HashMap<String, String>,
}

impl LabelCatalog {
    /// Create an empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a translation, builder style.
    pub fn with(mut self, key: impl Into<String>, text: impl Into<String>) -> Self {
        self.insert(key, text);
        self
    }

    /// Add or replace a translation.
    pub fn insert(&mut self, key: impl Into<String>, text: impl Into<String>) {
        self.entries.insert(key.into(), text.into());
    }

    /// Merge another catalog on top of this one.
    pub fn extend(&mut self, other: LabelCatalog) {
        self.entries.extend(other.entries);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// English labels for the built-in ruleset preset.
    pub fn standard() -> Self {
        const ORDINALS: [&str; 9] = ["1st", "2nd", "3rd", "4th", "5th", "6th", "7th", "8th", "9th"];

        let mut catalog = Self::new()
            .with(format!("{SPELL_LEVEL_LABEL_PREFIX}0"), "Cantrip")
            .with(format!("{SLOT_LABEL_PREFIX}spell0"), "Cantrips")
            .with(format!("{SLOT_LABEL_PREFIX}pact"), "Pact Slots")
            .with(format!("{SLOT_LABEL_PREFIX}innate"), "Innate Spellcasting")
            .with(format!("{SLOT_LABEL_PREFIX}atwill"), "At-Will");
        for (i, ordinal) in ORDINALS.iter().enumerate() {
            let level = i + 1;
            catalog.insert(
                format!("{SPELL_LEVEL_LABEL_PREFIX}{level}"),
                format!("{ordinal} Level"),
            );
            catalog.insert(
                format!("{SLOT_LABEL_PREFIX}spell{level}"),
                format!("{ordinal} Level Slots"),
            );
        }
        catalog
    }
}

impl Localizer for LabelCatalog {
    fn localize(&self, key: &str) -> String {
        self.entries
            .get(key)
            .cloned()
            .unwrap_or_else(|| key.to_string())
    }

    fn has(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }
}
