//! Spell slot preparation and rest recovery.
//!
//! Preparation turns an actor's classes into caster levels per method and
//! writes every method's slots into the actor's spell buckets. Recovery
//! refills the buckets of methods that recover on a given rest.

mod error;

pub use error::SpellSlotError;

use std::collections::BTreeMap;
use std::sync::Arc;

use serde::Serialize;

use arcanum_domain::{
    ActorSpells, CasterProgression, RestType, SlotAllocation, SpellcastingRegistry,
};

use crate::entities::{ActorData, NPC_SPELL_METHOD};

// =============================================================================
// Result Types
// =============================================================================

/// Result of preparing an actor's spell slots.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PreparationResult {
    /// Caster level per method.
    pub progression: CasterProgression,
    /// Prepared slot buckets.
    pub spells: ActorSpells,
    /// Spell levels with slots, per method with any.
    pub sections: BTreeMap<String, Vec<u8>>,
}

/// A slot bucket changed by a rest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SlotRecovery {
    pub key: String,
    pub from: u32,
    pub to: u32,
}

// =============================================================================
// Use Cases
// =============================================================================

/// Container for spell slot use cases.
#[derive(Debug, Clone)]
pub struct SpellSlotUseCases {
    registry: Arc<SpellcastingRegistry>,
}

impl SpellSlotUseCases {
    pub fn new(registry: Arc<SpellcastingRegistry>) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &SpellcastingRegistry {
        &self.registry
    }

    /// Slots a method grants at a caster level.
    pub fn slots_for_level(
        &self,
        method: &str,
        level: i32,
    ) -> Result<SlotAllocation, SpellSlotError> {
        let method = self
            .registry
            .get(method)
            .ok_or_else(|| SpellSlotError::MethodNotFound(method.to_string()))?;
        Ok(method.calculate_slots(level)?)
    }

    /// Caster level per method for an actor.
    ///
    /// NPCs take their spell level for the leveled method and get nothing
    /// from classes.
    pub fn caster_progression(&self, actor: &ActorData) -> CasterProgression {
        let mut progression = CasterProgression::new();
        if actor.is_npc() {
            progression.set(NPC_SPELL_METHOD, actor.spell_level);
            return progression;
        }

        for class in &actor.classes {
            let Some(method) = self.registry.get(&class.method) else {
                tracing::warn!(
                    actor = %actor.name,
                    class = %class.class,
                    method = %class.method,
                    "Class uses an unknown spellcasting method"
                );
                continue;
            };
            let count = actor.classes_with_method(&class.method);
            method.compute_progression(&mut progression, class, count);
        }
        progression
    }

    /// Prepare every method's slots for an actor.
    ///
    /// Existing bucket values and overrides are kept; maximums, levels, and
    /// labels are recomputed.
    pub fn prepare_actor(&self, actor: &ActorData) -> Result<PreparationResult, SpellSlotError> {
        let progression = self.caster_progression(actor);
        let mut spells = actor.spells.clone();
        let mut sections = BTreeMap::new();

        for method in self.registry.methods() {
            method.prepare_slots(&mut spells, &progression, actor.kind, actor.spell_level)?;
            let levels = method.spell_sections(&spells);
            if !levels.is_empty() {
                sections.insert(method.key().to_string(), levels);
            }
        }

        tracing::debug!(
            actor = %actor.name,
            buckets = spells.len(),
            "Prepared spell slots"
        );

        Ok(PreparationResult {
            progression,
            spells,
            sections,
        })
    }

    /// Refill the buckets of every method that recovers on this rest.
    ///
    /// A bucket recovers to its override when one is set, otherwise to its
    /// maximum. Returns one record per bucket whose value changed.
    pub fn recover_spell_slots(&self, spells: &mut ActorSpells, rest: RestType) -> Vec<SlotRecovery> {
        let mut recovered = Vec::new();
        for (key, slot) in spells.iter_mut() {
            let recovers = self
                .registry
                .get(&slot.method)
                .is_some_and(|method| method.recovery().contains(&rest));
            if !recovers {
                continue;
            }

            let target = slot.recovery_target();
            if slot.value != target {
                recovered.push(SlotRecovery {
                    key: key.to_string(),
                    from: slot.value,
                    to: target,
                });
                slot.value = target;
            }
        }

        tracing::info!(
            rest = %rest,
            recovered = recovered.len(),
            "Recovered spell slots"
        );
        recovered
    }
}
