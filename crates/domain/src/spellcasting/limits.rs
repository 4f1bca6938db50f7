//! Level bounds of a ruleset.

use serde::{Deserialize, Serialize};

/// Highest character level in the standard ruleset.
pub const DEFAULT_MAX_LEVEL: u8 = 20;

/// Highest spell level in the standard ruleset (spell levels run 0..=9).
pub const DEFAULT_MAX_SPELL_LEVEL: u8 = 9;

/// Character and spell level bounds used by tables and slot preparation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RulesetLimits {
    /// Highest caster level a table may be indexed with.
    pub max_level: u8,
    /// Highest spell level that has slots. Level 0 is the cantrip level.
    pub max_spell_level: u8,
}

impl Default for RulesetLimits {
    fn default() -> Self {
        Self {
            max_level: DEFAULT_MAX_LEVEL,
            max_spell_level: DEFAULT_MAX_SPELL_LEVEL,
        }
    }
}

impl RulesetLimits {
    /// Clamp a caster level into `0..=max_level`.
    pub fn clamp_level(&self, level: i32) -> u8 {
        // Bounded by max_level, which fits in u8.
        level.clamp(0, i32::from(self.max_level)) as u8
    }

    /// Spell levels that can hold slots, in ascending order.
    pub fn slot_levels(&self) -> impl Iterator<Item = u8> {
        1..=self.max_spell_level
    }

    /// Whether the spell level has a configured label.
    pub fn has_spell_level(&self, level: u8) -> bool {
        level <= self.max_spell_level
    }
}
