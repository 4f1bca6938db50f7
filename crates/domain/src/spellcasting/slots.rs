//! Prepared spell slot state of an actor.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Kind of actor slots are prepared for.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActorKind {
    #[default]
    Character,
    Npc,
}

/// One bucket of spell slots, keyed in [`ActorSpells`] by its slot key.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SpellSlot {
    /// Currently available slots
    pub value: u32,
    /// Maximum slots
    pub max: u32,
    /// Spell level the slots cast at
    pub level: u8,
    /// Manual maximum that replaces the computed one
    #[serde(rename = "override", skip_serializing_if = "Option::is_none")]
    pub override_max: Option<u32>,
    pub label: String,
    /// Key of the spellcasting method that provides the slots
    pub method: String,
}

impl SpellSlot {
    /// Create a slot bucket with all slots available.
    pub fn new(max: u32, level: u8) -> Self {
        Self {
            value: max,
            max,
            level,
            ..Self::default()
        }
    }

    /// Set a manual maximum.
    pub fn with_override(mut self, max: u32) -> Self {
        self.override_max = Some(max);
        self
    }

    /// The maximum restored on a rest.
    pub fn recovery_target(&self) -> u32 {
        self.override_max.unwrap_or(self.max)
    }

    /// Check if any slots are available.
    pub fn has_slots(&self) -> bool {
        self.value > 0
    }

    /// Use one slot.
    pub fn use_slot(&mut self) {
        self.value = self.value.saturating_sub(1);
    }

    /// Keep `value` within `0..=max`.
    pub(crate) fn clamp_value(&mut self) {
        self.value = self.value.min(self.max);
    }
}

/// Every slot bucket of an actor, keyed by slot key (`spell3`, `pact`, ...).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ActorSpells(BTreeMap<String, SpellSlot>);

impl ActorSpells {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<&SpellSlot> {
        self.0.get(key)
    }

    pub fn get_mut(&mut self, key: &str) -> Option<&mut SpellSlot> {
        self.0.get_mut(key)
    }

    /// Bucket for the key, created empty when missing.
    pub fn slot_mut(&mut self, key: &str) -> &mut SpellSlot {
        self.0.entry(key.to_string()).or_default()
    }

    pub fn insert(&mut self, key: impl Into<String>, slot: SpellSlot) {
        self.0.insert(key.into(), slot);
    }

    /// Maximum of the bucket, 0 when it does not exist.
    pub fn max(&self, key: &str) -> u32 {
        self.0.get(key).map_or(0, |slot| slot.max)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &SpellSlot)> {
        self.0.iter().map(|(key, slot)| (key.as_str(), slot))
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = (&str, &mut SpellSlot)> {
        self.0.iter_mut().map(|(key, slot)| (key.as_str(), slot))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
