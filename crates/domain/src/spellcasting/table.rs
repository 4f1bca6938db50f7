//! Spell slot progression tables.
//!
//! A table maps caster levels to slot changes. Two models exist:
//!
//! - [`Accumulation`]: every entry is a delta, and the slots at a caster
//!   level are the sum of all entries up to and including that level.
//! - [`LegacyLookup`]: entries are absolute, and the slots at a caster level
//!   are read from the closest entry at or below it. Kept for rulesets
//!   authored before accumulation existed.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::allocation::SlotAllocation;
use super::limits::RulesetLimits;
use crate::error::DomainError;

/// One entry of a single-bucket table.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SlotEntry {
    /// Number of slots (a delta in accumulating tables).
    pub slots: u32,
    /// Slot level (a delta in accumulating tables).
    pub level: u8,
}

impl SlotEntry {
    pub fn new(slots: u32, level: u8) -> Self {
        Self { slots, level }
    }
}

/// Serialized form of a slot table, as authored in ruleset files.
///
/// Level keys are JSON object keys, so they travel as strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum SlotTableConfig {
    /// Accumulating single-bucket table.
    Single {
        #[serde(with = "serde_with_level_key")]
        entries: BTreeMap<u8, SlotEntry>,
    },
    /// Accumulating table with one bucket per slot level.
    Separate {
        #[serde(with = "serde_with_nested_level_key")]
        entries: BTreeMap<u8, BTreeMap<u8, u32>>,
    },
    /// Accumulating per-level table derived from absolute rows.
    SeparateRows { rows: Vec<Vec<u32>> },
    /// Deprecated single-bucket table with absolute entries.
    LegacySingle {
        #[serde(with = "serde_with_level_key")]
        entries: BTreeMap<u8, SlotEntry>,
    },
    /// Deprecated table of absolute rows, one per caster level.
    LegacyRows { rows: Vec<Vec<u32>> },
}

// Custom serde modules for level-keyed maps.
// Keys inside the tagged table enum reach us as strings.
fn parse_level<E: serde::de::Error>(key: &str) -> Result<u8, E> {
    key.trim()
        .parse()
        .map_err(|e| E::custom(format!("Invalid level key '{key}': {e}")))
}

pub mod serde_with_level_key {
    use super::*;
    use serde::{Deserializer, Serializer};

    /// Serialize BTreeMap<u8, T> as BTreeMap<String, T>
    pub fn serialize<S, T>(map: &BTreeMap<u8, T>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
        T: Serialize,
    {
        let string_map: BTreeMap<String, &T> =
            map.iter().map(|(k, v)| (k.to_string(), v)).collect();
        string_map.serialize(serializer)
    }

    /// Deserialize BTreeMap<String, T> as BTreeMap<u8, T>
    pub fn deserialize<'de, D, T>(deserializer: D) -> Result<BTreeMap<u8, T>, D::Error>
    where
        D: Deserializer<'de>,
        T: Deserialize<'de>,
    {
        let string_map: BTreeMap<String, T> = Deserialize::deserialize(deserializer)?;
        string_map
            .into_iter()
            .map(|(key, value)| parse_level::<D::Error>(&key).map(|level| (level, value)))
            .collect()
    }
}

pub mod serde_with_nested_level_key {
    use super::*;
    use serde::{Deserializer, Serializer};

    /// Serialize BTreeMap<u8, BTreeMap<u8, u32>> with string keys at both depths
    pub fn serialize<S>(
        map: &BTreeMap<u8, BTreeMap<u8, u32>>,
        serializer: S,
    ) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let string_map: BTreeMap<String, BTreeMap<String, u32>> = map
            .iter()
            .map(|(k, inner)| {
                let inner = inner.iter().map(|(l, n)| (l.to_string(), *n)).collect();
                (k.to_string(), inner)
            })
            .collect();
        string_map.serialize(serializer)
    }

    /// Deserialize string keys at both depths into levels
    pub fn deserialize<'de, D>(deserializer: D) -> Result<BTreeMap<u8, BTreeMap<u8, u32>>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let string_map: BTreeMap<String, BTreeMap<String, u32>> =
            Deserialize::deserialize(deserializer)?;

        let mut result = BTreeMap::new();
        for (key, inner) in string_map {
            let mut increases = BTreeMap::new();
            for (slot_level, increase) in inner {
                increases.insert(parse_level::<D::Error>(&slot_level)?, increase);
            }
            result.insert(parse_level::<D::Error>(&key)?, increases);
        }
        Ok(result)
    }
}

/// A validated slot table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SlotTable {
    Accumulating(Accumulation),
    Legacy(LegacyLookup),
}

/// Tables whose entries are summed from caster level 1 upward.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Accumulation {
    /// Slot count and slot level both creep upward into one bucket.
    Single(BTreeMap<u8, SlotEntry>),
    /// Slot level -> increase, accumulated independently per slot level.
    Separate(BTreeMap<u8, BTreeMap<u8, u32>>),
}

/// Tables read by direct, non-cumulative lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LegacyLookup {
    /// The entry at the highest key not above the caster level.
    Single(BTreeMap<u8, SlotEntry>),
    /// `rows[min(level, len) - 1]`, column `i` holding slots of level `i + 1`.
    Rows(Vec<Vec<u32>>),
}

impl SlotTable {
    /// Validate an authored table against the ruleset's level bounds.
    pub fn from_config(config: SlotTableConfig, limits: &RulesetLimits) -> Result<Self, DomainError> {
        let table = match config {
            SlotTableConfig::Single { entries } => {
                validate_levels(entries.keys(), limits)?;
                Self::Accumulating(Accumulation::Single(entries))
            }
            SlotTableConfig::Separate { entries } => {
                validate_levels(entries.keys(), limits)?;
                for increases in entries.values() {
                    validate_slot_levels(increases.keys(), limits)?;
                }
                Self::Accumulating(Accumulation::Separate(entries))
            }
            SlotTableConfig::SeparateRows { rows } => {
                validate_rows(&rows, limits)?;
                Self::Accumulating(Accumulation::from_rows(&rows)?)
            }
            SlotTableConfig::LegacySingle { entries } => {
                validate_levels(entries.keys(), limits)?;
                Self::Legacy(LegacyLookup::Single(entries))
            }
            SlotTableConfig::LegacyRows { rows } => {
                validate_rows(&rows, limits)?;
                Self::Legacy(LegacyLookup::Rows(rows))
            }
        };
        Ok(table)
    }

    /// Whether slots of different levels are tracked in separate buckets.
    pub fn is_separate(&self) -> bool {
        matches!(
            self,
            Self::Accumulating(Accumulation::Separate(_)) | Self::Legacy(LegacyLookup::Rows(_))
        )
    }

    /// Whether this is a deprecated direct-lookup table.
    pub fn is_legacy(&self) -> bool {
        matches!(self, Self::Legacy(_))
    }

    /// Slots available at an already clamped caster level.
    pub fn slots_at(&self, level: u8) -> SlotAllocation {
        match self {
            Self::Accumulating(table) => table.slots_at(level),
            Self::Legacy(table) => table.slots_at(level),
        }
    }
}

impl Accumulation {
    /// Build a separate accumulating table from absolute per-level rows.
    ///
    /// Each entry holds the increase over the previous row. Rows may never
    /// lose slots, since a delta cannot be negative.
    pub fn from_rows(rows: &[Vec<u32>]) -> Result<Self, DomainError> {
        let mut entries = BTreeMap::new();
        let mut previous: &[u32] = &[];
        for (i, row) in rows.iter().enumerate() {
            let caster_level = u8::try_from(i + 1)
                .map_err(|_| DomainError::validation("slot table has more than 255 rows"))?;
            if row.len() < previous.len() && previous[row.len()..].iter().any(|&n| n > 0) {
                return Err(DomainError::validation(format!(
                    "slot table row for level {caster_level} drops a spell level"
                )));
            }
            let mut increases = BTreeMap::new();
            for (j, &slots) in row.iter().enumerate() {
                let slot_level = u8::try_from(j + 1).map_err(|_| {
                    DomainError::validation("slot table row has more than 255 spell levels")
                })?;
                let before = previous.get(j).copied().unwrap_or(0);
                if slots < before {
                    return Err(DomainError::validation(format!(
                        "slot table row for level {caster_level} loses level {slot_level} slots"
                    )));
                }
                if slots > before {
                    increases.insert(slot_level, slots - before);
                }
            }
            if !increases.is_empty() {
                entries.insert(caster_level, increases);
            }
            previous = row;
        }
        Ok(Self::Separate(entries))
    }

    fn slots_at(&self, level: u8) -> SlotAllocation {
        match self {
            Self::Separate(entries) => {
                let mut acc = SlotAllocation::new();
                for increases in accumulated(entries, level) {
                    for (&slot_level, &increase) in increases {
                        acc.add(slot_level, increase);
                    }
                }
                acc
            }
            Self::Single(entries) => {
                let mut amount: u32 = 0;
                let mut slot_level: u8 = 0;
                for entry in accumulated(entries, level) {
                    amount = amount.saturating_add(entry.slots);
                    slot_level = slot_level.saturating_add(entry.level);
                }
                // A zero slot level drops the amount entirely.
                if amount != 0 && slot_level != 0 {
                    [(slot_level, amount)].into_iter().collect()
                } else {
                    SlotAllocation::new()
                }
            }
        }
    }
}

/// Entries at caster levels `1..=level`.
fn accumulated<T>(entries: &BTreeMap<u8, T>, level: u8) -> impl Iterator<Item = &T> {
    entries
        .range(..=level)
        .filter(|&(&key, _)| key >= 1)
        .map(|(_, entry)| entry)
}

impl LegacyLookup {
    fn slots_at(&self, level: u8) -> SlotAllocation {
        match self {
            Self::Single(entries) => entries
                .range(..=level)
                .next_back()
                .map(|(_, entry)| [(entry.level, entry.slots)].into_iter().collect())
                .unwrap_or_default(),
            Self::Rows(rows) => {
                let index = usize::from(level).min(rows.len());
                match index.checked_sub(1).and_then(|i| rows.get(i)) {
                    Some(row) => row
                        .iter()
                        .enumerate()
                        .map_while(|(i, &n)| u8::try_from(i + 1).ok().map(|level| (level, n)))
                        .collect(),
                    None => SlotAllocation::new(),
                }
            }
        }
    }
}

fn validate_levels<'a>(
    levels: impl Iterator<Item = &'a u8>,
    limits: &RulesetLimits,
) -> Result<(), DomainError> {
    for &level in levels {
        if level == 0 || level > limits.max_level {
            return Err(DomainError::validation(format!(
                "slot table key {level} is outside caster levels 1..={}",
                limits.max_level
            )));
        }
    }
    Ok(())
}

fn validate_slot_levels<'a>(
    levels: impl Iterator<Item = &'a u8>,
    limits: &RulesetLimits,
) -> Result<(), DomainError> {
    for &level in levels {
        if level == 0 || level > limits.max_spell_level {
            return Err(DomainError::validation(format!(
                "slot level {level} is outside spell levels 1..={}",
                limits.max_spell_level
            )));
        }
    }
    Ok(())
}

fn validate_rows(rows: &[Vec<u32>], limits: &RulesetLimits) -> Result<(), DomainError> {
    if rows.len() > usize::from(limits.max_level) {
        return Err(DomainError::validation(format!(
            "slot table has {} rows but the maximum level is {}",
            rows.len(),
            limits.max_level
        )));
    }
    if let Some(row) = rows
        .iter()
        .find(|row| row.len() > usize::from(limits.max_spell_level))
    {
        return Err(DomainError::validation(format!(
            "slot table row has {} spell levels but the maximum is {}",
            row.len(),
            limits.max_spell_level
        )));
    }
    Ok(())
}
