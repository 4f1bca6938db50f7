//! Spellcasting methods.
//!
//! A method is one way a creature casts spells: slot-based progressions
//! (standard spell slots, pact slots) or static casting without slots
//! (innate, at-will). Methods are built once per ruleset and never change
//! afterwards.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::allocation::SlotAllocation;
use super::limits::RulesetLimits;
use super::progression::{CasterProgression, ClassSpellcasting, ProgressionMode};
use super::rest::RestType;
use super::slots::{ActorKind, ActorSpells};
use super::table::SlotTable;
use crate::error::DomainError;
use crate::i18n::{Localizer, SLOT_LABEL_PREFIX, SPELL_LEVEL_LABEL_PREFIX};

/// Slot key shared by every method for cantrips.
pub const CANTRIP_SLOT_KEY: &str = "spell0";

/// Icon used when a method configures none.
pub const DEFAULT_METHOD_IMG: &str = "icons/magic/unholy/silhouette-robe-evil-power.webp";

/// Discriminant of [`MethodKind`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MethodType {
    /// No slots (innate or at-will casting)
    Static,
    /// Slots from a progression table
    Progression,
}

impl fmt::Display for MethodType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Static => write!(f, "static"),
            Self::Progression => write!(f, "progression"),
        }
    }
}

/// Type-specific data of a method.
#[derive(Debug, Clone)]
pub enum MethodKind {
    Static,
    Progression(ProgressionMethod),
}

/// Slot-based spellcasting driven by a progression table.
#[derive(Debug, Clone)]
pub struct ProgressionMethod {
    grants_cantrips: bool,
    prepares_spells: bool,
    separate_slots_per_level: bool,
    modes: BTreeMap<String, ProgressionMode>,
    table: Option<Arc<SlotTable>>,
}

impl ProgressionMethod {
    /// A progression reading its slots from `table`.
    ///
    /// Whether slots are tracked per level follows the table's shape.
    pub fn new(table: Arc<SlotTable>) -> Self {
        Self {
            grants_cantrips: true,
            prepares_spells: true,
            separate_slots_per_level: table.is_separate(),
            modes: BTreeMap::new(),
            table: Some(table),
        }
    }

    /// A progression whose table is missing from the ruleset.
    pub fn without_table(separate_slots_per_level: bool) -> Self {
        Self {
            grants_cantrips: true,
            prepares_spells: true,
            separate_slots_per_level,
            modes: BTreeMap::new(),
            table: None,
        }
    }

    pub fn with_cantrips(mut self, grants_cantrips: bool) -> Self {
        self.grants_cantrips = grants_cantrips;
        self
    }

    pub fn with_preparation(mut self, prepares_spells: bool) -> Self {
        self.prepares_spells = prepares_spells;
        self
    }

    /// Accept a named progression mode.
    pub fn with_mode(mut self, key: impl Into<String>, mode: ProgressionMode) -> Self {
        self.modes.insert(key.into(), mode);
        self
    }

    pub fn grants_cantrips(&self) -> bool {
        self.grants_cantrips
    }

    pub fn prepares_spells(&self) -> bool {
        self.prepares_spells
    }

    pub fn separate_slots_per_level(&self) -> bool {
        self.separate_slots_per_level
    }

    pub fn modes(&self) -> &BTreeMap<String, ProgressionMode> {
        &self.modes
    }

    pub fn table(&self) -> Option<&SlotTable> {
        self.table.as_deref()
    }
}

/// A configured spellcasting method.
#[derive(Debug, Clone)]
pub struct SpellcastingMethod {
    key: String,
    label: String,
    img: String,
    order: i32,
    kind: MethodKind,
    recovery: BTreeSet<RestType>,
    limits: RulesetLimits,
    i18n: Arc<dyn Localizer>,
}

impl SpellcastingMethod {
    /// A method without slots.
    pub fn new_static(
        key: impl Into<String>,
        label: impl Into<String>,
        i18n: Arc<dyn Localizer>,
    ) -> Self {
        Self::new(key, label, MethodKind::Static, RulesetLimits::default(), i18n)
    }

    /// A slot-based method.
    pub fn new_progression(
        key: impl Into<String>,
        label: impl Into<String>,
        progression: ProgressionMethod,
        limits: RulesetLimits,
        i18n: Arc<dyn Localizer>,
    ) -> Self {
        Self::new(key, label, MethodKind::Progression(progression), limits, i18n)
    }

    fn new(
        key: impl Into<String>,
        label: impl Into<String>,
        kind: MethodKind,
        limits: RulesetLimits,
        i18n: Arc<dyn Localizer>,
    ) -> Self {
        Self {
            key: key.into(),
            label: label.into(),
            img: DEFAULT_METHOD_IMG.to_string(),
            order: 0,
            kind,
            recovery: BTreeSet::new(),
            limits,
            i18n,
        }
    }

    pub fn with_img(mut self, img: impl Into<String>) -> Self {
        self.img = img.into();
        self
    }

    pub fn with_order(mut self, order: i32) -> Self {
        self.order = order;
        self
    }

    /// Rest types that restore this method's slots. Ignored for static methods.
    pub fn with_recovery(mut self, rests: impl IntoIterator<Item = RestType>) -> Self {
        if matches!(self.kind, MethodKind::Progression(_)) {
            self.recovery = rests.into_iter().collect();
        }
        self
    }

    // === Properties ===

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn img(&self) -> &str {
        &self.img
    }

    pub fn order(&self) -> i32 {
        self.order
    }

    pub fn kind(&self) -> &MethodKind {
        &self.kind
    }

    pub fn method_type(&self) -> MethodType {
        match self.kind {
            MethodKind::Static => MethodType::Static,
            MethodKind::Progression(_) => MethodType::Progression,
        }
    }

    pub fn limits(&self) -> &RulesetLimits {
        &self.limits
    }

    /// The progression data, if this is a slot-based method.
    pub fn progression(&self) -> Option<&ProgressionMethod> {
        match &self.kind {
            MethodKind::Progression(progression) => Some(progression),
            MethodKind::Static => None,
        }
    }

    /// Whether this method has no slots to track, either by type or because
    /// its table is missing.
    pub fn is_static(&self) -> bool {
        self.table().is_none()
    }

    fn table(&self) -> Option<&SlotTable> {
        self.progression().and_then(ProgressionMethod::table)
    }

    fn is_separate(&self) -> bool {
        self.progression()
            .is_some_and(ProgressionMethod::separate_slots_per_level)
    }

    /// Rest types that fully restore this method's slots.
    pub fn recovery(&self) -> &BTreeSet<RestType> {
        &self.recovery
    }

    /// Are slots recovered on a short rest?
    pub fn is_sr(&self) -> bool {
        self.recovery.contains(&RestType::Short)
    }

    /// Are slots recovered on a long rest?
    pub fn is_lr(&self) -> bool {
        self.recovery.contains(&RestType::Long)
    }

    // === Slot keys and labels ===

    /// Key of the actor slot bucket holding spells of `level`.
    pub fn spell_slot_key(&self, level: u8) -> String {
        if self.is_static() {
            return self.key.clone();
        }
        if self.is_separate() && level > 0 {
            return format!("{}{}", self.key, level);
        }
        if level > 0 {
            self.key.clone()
        } else {
            CANTRIP_SLOT_KEY.to_string()
        }
    }

    /// Display label for slots of `level`.
    pub fn spell_slot_label(&self, level: u8, short: bool) -> String {
        if self.is_static() {
            return self.label.clone();
        }
        if self.is_separate() {
            return self
                .i18n
                .localize(&format!("{SLOT_LABEL_PREFIX}{}", self.spell_slot_key(level)));
        }
        let kind = self.i18n.localize(&format!("{SLOT_LABEL_PREFIX}{}", self.key));
        if short || !self.limits.has_spell_level(level) {
            return kind;
        }
        let level_label = self
            .i18n
            .localize(&format!("{SPELL_LEVEL_LABEL_PREFIX}{level}"));
        format!("{kind} — {level_label}")
    }

    // === Calculation ===

    /// Slots this method provides at `level`, clamped to the ruleset's
    /// level range.
    pub fn calculate_slots(&self, level: i32) -> Result<SlotAllocation, DomainError> {
        let table = self
            .table()
            .ok_or_else(|| DomainError::missing_slot_table(&self.key))?;
        Ok(table.slots_at(self.limits.clamp_level(level)))
    }

    /// Spell levels a sheet shows for this method even with no spells,
    /// i.e. every level with a non-zero prepared maximum.
    pub fn spell_sections(&self, spells: &ActorSpells) -> Vec<u8> {
        if self.progression().is_none() {
            return Vec::new();
        }
        if self.is_separate() {
            return self
                .limits
                .slot_levels()
                .filter(|&level| spells.max(&self.spell_slot_key(level)) > 0)
                .collect();
        }
        match spells.get(&self.key) {
            Some(slot) if slot.max > 0 => vec![slot.level],
            _ => Vec::new(),
        }
    }

    /// Add one class's contribution to this method's caster level.
    ///
    /// `count` is the number of classes the actor has with this method.
    pub fn compute_progression(
        &self,
        progression: &mut CasterProgression,
        class: &ClassSpellcasting,
        count: usize,
    ) {
        let Some(method) = self.progression() else {
            return;
        };
        if method.modes.is_empty() {
            progression.add(&self.key, to_level(class.levels));
            return;
        }
        let Some(mode) = method.modes.get(&class.progression) else {
            tracing::debug!(
                method = %self.key,
                class = %class.class,
                progression = %class.progression,
                "Unknown progression mode, class contributes nothing"
            );
            return;
        };
        progression.add(&self.key, to_level(mode.contribution(class.levels)));

        // Single-classed, non-full progression rounds up rather than down.
        if count == 1 && mode.divisor > 1 && progression.level(&self.key) != 0 {
            progression.set(&self.key, to_level(mode.ceil(class.levels)));
        }
    }

    /// Write this method's slots into the actor's spell buckets.
    ///
    /// `npc_spell_level` stands in for the caster level of NPCs that have a
    /// manual maximum but no class levels.
    pub fn prepare_slots(
        &self,
        spells: &mut ActorSpells,
        progression: &CasterProgression,
        actor: ActorKind,
        npc_spell_level: i32,
    ) -> Result<(), DomainError> {
        if self.is_static() {
            return Ok(());
        }
        if self.is_separate() {
            self.prepare_separate_slots(spells, progression)
        } else {
            self.prepare_single_slots(spells, progression, actor, npc_spell_level)
        }
    }

    fn prepare_separate_slots(
        &self,
        spells: &mut ActorSpells,
        progression: &CasterProgression,
    ) -> Result<(), DomainError> {
        let slots = self.calculate_slots(progression.level(&self.key))?;
        for level in self.limits.slot_levels() {
            let key = self.spell_slot_key(level);
            let label = self.spell_slot_label(level, false);
            let slot = spells.slot_mut(&key);
            slot.label = label;
            slot.level = level;
            slot.method = self.key.clone();
            slot.max = slot.override_max.unwrap_or_else(|| slots.get(level));
            slot.clamp_value();
        }
        Ok(())
    }

    fn prepare_single_slots(
        &self,
        spells: &mut ActorSpells,
        progression: &CasterProgression,
        actor: ActorKind,
        npc_spell_level: i32,
    ) -> Result<(), DomainError> {
        let mut level = self.limits.clamp_level(progression.level(&self.key));
        let override_max = spells.get(&self.key).and_then(|slot| slot.override_max);
        if level == 0 && actor == ActorKind::Npc && override_max.is_some() {
            level = self.limits.clamp_level(npc_spell_level);
        }

        let slots = self.calculate_slots(i32::from(level))?;
        if slots.is_empty() && override_max.unwrap_or(0) == 0 {
            return Ok(());
        }

        let (slot_level, amount) = slots.first().unwrap_or((0, 0));
        let slot = spells.slot_mut(&self.key);
        slot.label = self.label.clone();
        slot.method = self.key.clone();
        slot.max = override_max.unwrap_or(amount);
        slot.level = match (slot.max, slot_level) {
            (0, _) => 0,
            (_, 0) => 1,
            (_, level) => level,
        };
        slot.clamp_value();
        Ok(())
    }
}

fn to_level(levels: u32) -> i32 {
    i32::try_from(levels).unwrap_or(i32::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::i18n::LabelCatalog;
    use crate::spellcasting::slots::SpellSlot;
    use crate::spellcasting::table::{Accumulation, LegacyLookup, SlotEntry};

    fn i18n() -> Arc<dyn Localizer> {
        Arc::new(LabelCatalog::standard())
    }

    fn pact_table() -> Arc<SlotTable> {
        Arc::new(SlotTable::Accumulating(Accumulation::Single(BTreeMap::from([
            (1, SlotEntry::new(1, 1)),
            (2, SlotEntry::new(1, 0)),
            (3, SlotEntry::new(0, 1)),
        ]))))
    }

    fn separate_table() -> Arc<SlotTable> {
        Arc::new(SlotTable::Accumulating(Accumulation::Separate(BTreeMap::from([
            (1, BTreeMap::from([(1, 1)])),
            (3, BTreeMap::from([(1, 1), (2, 1)])),
        ]))))
    }

    fn pact() -> SpellcastingMethod {
        SpellcastingMethod::new_progression(
            "pact",
            "Pact Magic",
            ProgressionMethod::new(pact_table()),
            RulesetLimits::default(),
            i18n(),
        )
        .with_recovery([RestType::Short, RestType::Long])
    }

    fn leveled() -> SpellcastingMethod {
        SpellcastingMethod::new_progression(
            "spell",
            "Spell Slots",
            ProgressionMethod::new(separate_table())
                .with_mode("full", ProgressionMode::new("Full", 1, true))
                .with_mode("half", ProgressionMode::new("Half", 2, false))
                .with_mode("artificer", ProgressionMode::new("Artificer", 2, true)),
            RulesetLimits::default(),
            i18n(),
        )
        .with_recovery([RestType::Long])
    }

    fn innate() -> SpellcastingMethod {
        SpellcastingMethod::new_static("innate", "Innate Spellcasting", i18n())
    }

    #[test]
    fn static_methods_use_their_own_key_and_label() {
        let method = innate();
        assert!(method.is_static());
        assert_eq!(method.method_type(), MethodType::Static);
        assert_eq!(method.spell_slot_key(0), "innate");
        assert_eq!(method.spell_slot_key(3), "innate");
        assert_eq!(method.spell_slot_label(3, false), "Innate Spellcasting");
    }

    #[test]
    fn static_methods_refuse_to_calculate_slots() {
        let err = innate().calculate_slots(5).unwrap_err();
        assert_eq!(err, DomainError::missing_slot_table("innate"));
    }

    #[test]
    fn progression_without_table_is_static() {
        let method = SpellcastingMethod::new_progression(
            "psionic",
            "Psionics",
            ProgressionMethod::without_table(true),
            RulesetLimits::default(),
            i18n(),
        );
        assert!(method.is_static());
        assert_eq!(method.spell_slot_key(2), "psionic");
        assert!(matches!(
            method.calculate_slots(1),
            Err(DomainError::MissingSlotTable { .. })
        ));
    }

    #[test]
    fn cantrip_key_is_shared() {
        assert_eq!(pact().spell_slot_key(0), "spell0");
        assert_eq!(leveled().spell_slot_key(0), "spell0");
    }

    #[test]
    fn slot_keys_follow_separation() {
        assert_eq!(pact().spell_slot_key(3), "pact");
        assert_eq!(leveled().spell_slot_key(3), "spell3");
    }

    #[test]
    fn slot_labels() {
        let pact = pact();
        assert_eq!(pact.spell_slot_label(3, false), "Pact Slots — 3rd Level");
        assert_eq!(pact.spell_slot_label(3, true), "Pact Slots");
        assert_eq!(pact.spell_slot_label(12, false), "Pact Slots");
        assert_eq!(leveled().spell_slot_label(2, false), "2nd Level Slots");
    }

    #[test]
    fn recovery_flags() {
        let pact = pact();
        assert!(pact.is_sr());
        assert!(pact.is_lr());

        let leveled = leveled();
        assert!(!leveled.is_sr());
        assert!(leveled.is_lr());

        let unrecovered = SpellcastingMethod::new_progression(
            "ritual",
            "Rituals",
            ProgressionMethod::new(pact_table()),
            RulesetLimits::default(),
            i18n(),
        );
        assert!(unrecovered.recovery().is_empty());
        assert!(!unrecovered.is_sr());
        assert!(!unrecovered.is_lr());
    }

    #[test]
    fn calculate_slots_clamps_level() {
        let method = leveled();
        assert!(method.calculate_slots(-4).unwrap().is_empty());
        assert_eq!(method.calculate_slots(99).unwrap(), method.calculate_slots(20).unwrap());
        assert_eq!(
            method.calculate_slots(3).unwrap(),
            [(1, 2), (2, 1)].into_iter().collect()
        );
    }

    #[test]
    fn calculate_slots_is_repeatable() {
        let method = pact();
        assert_eq!(method.calculate_slots(3).unwrap(), method.calculate_slots(3).unwrap());
        assert_eq!(method.calculate_slots(3).unwrap(), [(2, 2)].into_iter().collect());
    }

    #[test]
    fn legacy_tables_read_directly() {
        let table = Arc::new(SlotTable::Legacy(LegacyLookup::Single(BTreeMap::from([
            (1, SlotEntry::new(1, 1)),
            (5, SlotEntry::new(2, 3)),
        ]))));
        let method = SpellcastingMethod::new_progression(
            "pact",
            "Pact Magic",
            ProgressionMethod::new(table),
            RulesetLimits::default(),
            i18n(),
        );
        assert_eq!(method.calculate_slots(4).unwrap(), [(1, 1)].into_iter().collect());
        assert_eq!(method.calculate_slots(7).unwrap(), [(3, 2)].into_iter().collect());
    }

    #[test]
    fn full_progression_adds_class_levels() {
        let method = leveled();
        let mut progression = CasterProgression::new();
        method.compute_progression(&mut progression, &ClassSpellcasting::new("spell", "full", 5), 2);
        method.compute_progression(&mut progression, &ClassSpellcasting::new("spell", "half", 5), 2);
        assert_eq!(progression.level("spell"), 7);
    }

    #[test]
    fn single_class_half_caster_rounds_up() {
        let method = leveled();
        let mut progression = CasterProgression::new();
        method.compute_progression(&mut progression, &ClassSpellcasting::new("spell", "half", 5), 1);
        assert_eq!(progression.level("spell"), 3);

        // Too low to contribute at all, so nothing is rounded up.
        let mut progression = CasterProgression::new();
        method.compute_progression(&mut progression, &ClassSpellcasting::new("spell", "half", 1), 1);
        assert_eq!(progression.level("spell"), 0);
    }

    #[test]
    fn unknown_mode_contributes_nothing() {
        let method = leveled();
        let mut progression = CasterProgression::new();
        method.compute_progression(&mut progression, &ClassSpellcasting::new("spell", "quarter", 8), 1);
        assert_eq!(progression.level("spell"), 0);
    }

    #[test]
    fn methods_without_modes_add_class_levels() {
        let method = pact();
        let mut progression = CasterProgression::new();
        method.compute_progression(&mut progression, &ClassSpellcasting::new("pact", "", 3), 1);
        method.compute_progression(&mut progression, &ClassSpellcasting::new("pact", "", 2), 1);
        assert_eq!(progression.level("pact"), 5);
    }

    #[test]
    fn prepares_separate_slots_for_every_level() {
        let method = leveled();
        let mut progression = CasterProgression::new();
        progression.set("spell", 3);
        let mut spells = ActorSpells::new();
        spells.insert("spell1", SpellSlot::new(5, 1));
        spells.insert("spell3", SpellSlot::default().with_override(2));

        method
            .prepare_slots(&mut spells, &progression, ActorKind::Character, 0)
            .unwrap();

        let first = spells.get("spell1").unwrap();
        assert_eq!((first.max, first.value, first.level), (2, 2, 1));
        assert_eq!(first.label, "1st Level Slots");
        assert_eq!(spells.max("spell2"), 1);
        assert_eq!(spells.max("spell3"), 2);
        assert_eq!(spells.max("spell9"), 0);
        assert_eq!(spells.len(), 9);
        assert_eq!(method.spell_sections(&spells), vec![1, 2, 3]);
    }

    #[test]
    fn prepares_single_bucket() {
        let method = pact();
        let mut progression = CasterProgression::new();
        progression.set("pact", 3);
        let mut spells = ActorSpells::new();

        method
            .prepare_slots(&mut spells, &progression, ActorKind::Character, 0)
            .unwrap();

        let slot = spells.get("pact").unwrap();
        assert_eq!((slot.max, slot.level, slot.value), (2, 2, 0));
        assert_eq!(slot.method, "pact");
        assert_eq!(method.spell_sections(&spells), vec![2]);
    }

    #[test]
    fn single_bucket_without_slots_is_left_alone() {
        let method = pact();
        let mut spells = ActorSpells::new();
        method
            .prepare_slots(&mut spells, &CasterProgression::new(), ActorKind::Character, 0)
            .unwrap();
        assert!(spells.get("pact").is_none());
        assert!(method.spell_sections(&spells).is_empty());
    }

    #[test]
    fn npc_override_uses_npc_spell_level() {
        let method = pact();
        let mut spells = ActorSpells::new();
        spells.insert("pact", SpellSlot::default().with_override(4));

        method
            .prepare_slots(&mut spells, &CasterProgression::new(), ActorKind::Npc, 3)
            .unwrap();

        let slot = spells.get("pact").unwrap();
        assert_eq!((slot.max, slot.level), (4, 2));
    }

    #[test]
    fn static_methods_prepare_nothing() {
        let mut spells = ActorSpells::new();
        innate()
            .prepare_slots(&mut spells, &CasterProgression::new(), ActorKind::Npc, 5)
            .unwrap();
        assert!(spells.is_empty());
        assert!(innate().spell_sections(&spells).is_empty());
    }
}
