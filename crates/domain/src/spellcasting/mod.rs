//! Spellcasting methods and spell slot progression.
//!
//! The pieces build on each other bottom-up:
//!
//! - [`SlotTable`] turns a caster level into a [`SlotAllocation`]
//! - [`SpellcastingMethod`] wraps a table with keys, labels and rest recovery
//! - [`SpellcastingRegistry`] builds every method of a [`RulesetConfig`]

mod allocation;
mod config;
mod limits;
mod method;
mod progression;
mod registry;
mod rest;
mod slots;
mod table;

pub use allocation::SlotAllocation;
pub use config::{
    legacy_pact_entries, standard_slot_rows, MethodConfig, RulesetConfig, LEGACY_PACT_PROGRESSION,
    STANDARD_SLOT_ROWS,
};
pub use limits::{RulesetLimits, DEFAULT_MAX_LEVEL, DEFAULT_MAX_SPELL_LEVEL};
pub use method::{
    MethodKind, MethodType, ProgressionMethod, SpellcastingMethod, CANTRIP_SLOT_KEY,
    DEFAULT_METHOD_IMG,
};
pub use progression::{CasterProgression, ClassSpellcasting, ProgressionMode};
pub use registry::SpellcastingRegistry;
pub use rest::{RestType, RestTypeConfig};
pub use slots::{ActorKind, ActorSpells, SpellSlot};
pub use table::{Accumulation, LegacyLookup, SlotEntry, SlotTable, SlotTableConfig};
