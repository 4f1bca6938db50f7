//! # Arcanum Domain
//!
//! Spell slot progression rules, independent of any host application.
//!
//! ## Design Principles
//!
//! 1. **Pure calculations** - No I/O, no async, no global state
//! 2. **Injected configuration** - Tables and labels are passed to constructors
//! 3. **Serializable** - Configuration and prepared state derive Serialize/Deserialize

pub mod error;
pub mod i18n;
pub mod spellcasting;

pub use error::DomainError;
pub use i18n::{LabelCatalog, Localizer};

pub use spellcasting::{
    ActorKind, ActorSpells, CasterProgression, ClassSpellcasting, MethodConfig, MethodKind,
    MethodType, ProgressionMethod, ProgressionMode, RestType, RestTypeConfig, RulesetConfig,
    RulesetLimits, SlotAllocation, SlotEntry, SlotTable, SlotTableConfig, SpellSlot,
    SpellcastingMethod, SpellcastingRegistry,
};
