//! Serializable ruleset configuration and the built-in standard preset.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::limits::RulesetLimits;
use super::method::{MethodType, DEFAULT_METHOD_IMG};
use super::progression::ProgressionMode;
use super::rest::RestTypeConfig;
use super::table::{SlotEntry, SlotTableConfig};

/// Slot progression of a full caster by character level. Row `n` holds the
/// slots at level `n + 1`; column `i` holds slots of spell level `i + 1`.
pub const STANDARD_SLOT_ROWS: [&[u32]; 20] = [
    &[2],
    &[3],
    &[4, 2],
    &[4, 3],
    &[4, 3, 2],
    &[4, 3, 3],
    &[4, 3, 3, 1],
    &[4, 3, 3, 2],
    &[4, 3, 3, 3, 1],
    &[4, 3, 3, 3, 2],
    &[4, 3, 3, 3, 2, 1],
    &[4, 3, 3, 3, 2, 1],
    &[4, 3, 3, 3, 2, 1, 1],
    &[4, 3, 3, 3, 2, 1, 1],
    &[4, 3, 3, 3, 2, 1, 1, 1],
    &[4, 3, 3, 3, 2, 1, 1, 1],
    &[4, 3, 3, 3, 2, 1, 1, 1, 1],
    &[4, 3, 3, 3, 3, 1, 1, 1, 1],
    &[4, 3, 3, 3, 3, 2, 1, 1, 1],
    &[4, 3, 3, 3, 3, 2, 2, 1, 1],
];

/// Pact slots by pact caster level as absolute `(level, slots, slot level)`
/// entries, the format of the deprecated direct-lookup tables.
pub const LEGACY_PACT_PROGRESSION: [(u8, u32, u8); 8] = [
    (1, 1, 1),
    (2, 2, 1),
    (3, 2, 2),
    (5, 2, 3),
    (7, 2, 4),
    (9, 2, 5),
    (11, 3, 5),
    (17, 4, 5),
];

/// Pact slots as accumulating `(level, slot increase, slot level increase)`.
const PACT_PROGRESSION: [(u8, u32, u8); 8] = [
    (1, 1, 1),
    (2, 1, 0),
    (3, 0, 1),
    (5, 0, 1),
    (7, 0, 1),
    (9, 0, 1),
    (11, 1, 0),
    (17, 1, 0),
];

/// Complete spellcasting configuration of a ruleset.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RulesetConfig {
    pub limits: RulesetLimits,
    /// Spellcasting methods by key.
    pub spellcasting: BTreeMap<String, MethodConfig>,
    /// Slot tables by name, referenced from [`MethodConfig::table`].
    pub spellcasting_tables: BTreeMap<String, SlotTableConfig>,
    /// Rest types by key (`short`, `long`).
    pub rest_types: BTreeMap<String, RestTypeConfig>,
}

/// Configuration of one spellcasting method.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MethodConfig {
    #[serde(rename = "type")]
    pub method_type: MethodType,
    #[serde(default = "default_label")]
    pub label: String,
    #[serde(default = "default_img")]
    pub img: String,
    #[serde(default)]
    pub order: i32,
    #[serde(default = "default_true")]
    pub cantrips: bool,
    #[serde(default = "default_true")]
    pub prepares: bool,
    /// Track slots of each spell level in their own bucket.
    #[serde(default)]
    pub separate: bool,
    /// Progression modes by key.
    #[serde(default)]
    pub progression: BTreeMap<String, ProgressionMode>,
    /// Name of the slot table in [`RulesetConfig::spellcasting_tables`].
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub table: Option<String>,
}

fn default_label() -> String {
    "Unlabeled".to_string()
}

fn default_img() -> String {
    DEFAULT_METHOD_IMG.to_string()
}

fn default_true() -> bool {
    true
}

impl MethodConfig {
    /// A method without slots.
    pub fn static_method(label: impl Into<String>) -> Self {
        Self {
            method_type: MethodType::Static,
            label: label.into(),
            img: default_img(),
            order: 0,
            cantrips: true,
            prepares: true,
            separate: false,
            progression: BTreeMap::new(),
            table: None,
        }
    }

    /// A slot-based method reading the named table.
    pub fn progression(label: impl Into<String>, table: impl Into<String>) -> Self {
        Self {
            method_type: MethodType::Progression,
            table: Some(table.into()),
            ..Self::static_method(label)
        }
    }

    pub fn with_order(mut self, order: i32) -> Self {
        self.order = order;
        self
    }

    pub fn with_separate(mut self, separate: bool) -> Self {
        self.separate = separate;
        self
    }

    pub fn with_preparation(mut self, prepares: bool) -> Self {
        self.prepares = prepares;
        self
    }

    pub fn with_mode(mut self, key: impl Into<String>, mode: ProgressionMode) -> Self {
        self.progression.insert(key.into(), mode);
        self
    }
}

impl RulesetConfig {
    /// The standard fifth-edition style ruleset: leveled spell slots, pact
    /// magic, and innate and at-will casting.
    pub fn standard() -> Self {
        let spellcasting = BTreeMap::from([
            (
                "spell".to_string(),
                MethodConfig::progression("Spell Slots", "spell")
                    .with_order(10)
                    .with_separate(true)
                    .with_mode("full", ProgressionMode::new("Full Caster", 1, false))
                    .with_mode("half", ProgressionMode::new("Half Caster", 2, false))
                    .with_mode("third", ProgressionMode::new("Third Caster", 3, false))
                    .with_mode("artificer", ProgressionMode::new("Artificer", 2, true)),
            ),
            (
                "pact".to_string(),
                MethodConfig::progression("Pact Magic", "pact")
                    .with_order(20)
                    .with_preparation(false),
            ),
            (
                "innate".to_string(),
                MethodConfig::static_method("Innate Spellcasting").with_order(30),
            ),
            (
                "atwill".to_string(),
                MethodConfig::static_method("At-Will").with_order(40),
            ),
        ]);

        let spellcasting_tables = BTreeMap::from([
            (
                "spell".to_string(),
                SlotTableConfig::SeparateRows {
                    rows: standard_slot_rows(),
                },
            ),
            (
                "pact".to_string(),
                SlotTableConfig::Single {
                    entries: single_entries(&PACT_PROGRESSION),
                },
            ),
        ]);

        let rest_types = BTreeMap::from([
            ("short".to_string(), RestTypeConfig::new("Short Rest", ["pact"])),
            (
                "long".to_string(),
                RestTypeConfig::new("Long Rest", ["spell", "pact"]),
            ),
        ]);

        Self {
            limits: RulesetLimits::default(),
            spellcasting,
            spellcasting_tables,
            rest_types,
        }
    }
}

/// [`STANDARD_SLOT_ROWS`] as owned rows.
pub fn standard_slot_rows() -> Vec<Vec<u32>> {
    STANDARD_SLOT_ROWS.iter().map(|row| row.to_vec()).collect()
}

/// [`LEGACY_PACT_PROGRESSION`] as table entries.
pub fn legacy_pact_entries() -> BTreeMap<u8, SlotEntry> {
    single_entries(&LEGACY_PACT_PROGRESSION)
}

fn single_entries(entries: &[(u8, u32, u8)]) -> BTreeMap<u8, SlotEntry> {
    entries
        .iter()
        .map(|&(key, slots, level)| (key, SlotEntry::new(slots, level)))
        .collect()
}
