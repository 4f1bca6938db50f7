//! Use cases - Spell slot operations run against a loaded ruleset.

pub mod spell_slots;

pub use spell_slots::{PreparationResult, SlotRecovery, SpellSlotError, SpellSlotUseCases};
