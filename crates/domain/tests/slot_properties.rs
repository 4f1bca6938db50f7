//! Property tests: slot calculations are pure and accumulate monotonically.

use std::collections::BTreeMap;
use std::sync::Arc;

use arcanum_domain::{
    LabelCatalog, ProgressionMethod, RulesetLimits, SlotEntry, SlotTable, SlotTableConfig,
    SpellcastingMethod,
};
use proptest::prelude::*;

// ---------------------------------------------------------------------------
// Helpers / Strategies
// ---------------------------------------------------------------------------

/// Single-bucket accumulating table with small non-negative deltas.
fn arb_single_entries() -> impl Strategy<Value = BTreeMap<u8, SlotEntry>> {
    prop::collection::btree_map(1u8..=20, (0u32..4, 0u8..3), 0..8).prop_map(|entries| {
        entries
            .into_iter()
            .map(|(key, (slots, level))| (key, SlotEntry::new(slots, level)))
            .collect()
    })
}

/// Separate accumulating table over spell levels 1..=9.
fn arb_separate_entries() -> impl Strategy<Value = BTreeMap<u8, BTreeMap<u8, u32>>> {
    prop::collection::btree_map(
        1u8..=20,
        prop::collection::btree_map(1u8..=9, 0u32..4, 1..4),
        0..8,
    )
}

fn method(config: SlotTableConfig) -> SpellcastingMethod {
    let limits = RulesetLimits::default();
    let table = SlotTable::from_config(config, &limits).expect("generated tables are valid");
    SpellcastingMethod::new_progression(
        "test",
        "Test",
        ProgressionMethod::new(Arc::new(table)),
        limits,
        Arc::new(LabelCatalog::new()),
    )
}

/// Running totals of a single-bucket table, mirroring the accumulation walk.
fn totals(entries: &BTreeMap<u8, SlotEntry>, level: u8) -> (u32, u32) {
    entries
        .iter()
        .filter(|&(&key, _)| key >= 1 && key <= level)
        .fold((0, 0), |(amount, slot_level), (_, entry)| {
            (amount + entry.slots, slot_level + u32::from(entry.level))
        })
}

// ---------------------------------------------------------------------------
// Properties
// ---------------------------------------------------------------------------

proptest! {
    #[test]
    fn single_totals_never_decrease(entries in arb_single_entries(), a in 0u8..=20, b in 0u8..=20) {
        let (low, high) = (a.min(b), a.max(b));
        let (amount_low, level_low) = totals(&entries, low);
        let (amount_high, level_high) = totals(&entries, high);
        prop_assert!(amount_high >= amount_low);
        prop_assert!(level_high >= level_low);

        let method = method(SlotTableConfig::Single { entries });
        let slots = method.calculate_slots(i32::from(high)).unwrap();
        if amount_high != 0 && level_high != 0 {
            prop_assert_eq!(slots.len(), 1);
            prop_assert_eq!(slots.first(), Some((level_high as u8, amount_high)));
        } else {
            prop_assert!(slots.is_empty());
        }
    }

    #[test]
    fn separate_level_zero_is_empty(entries in arb_separate_entries()) {
        let method = method(SlotTableConfig::Separate { entries });
        prop_assert!(method.calculate_slots(0).unwrap().is_empty());
    }

    #[test]
    fn separate_counts_never_decrease(entries in arb_separate_entries(), level in 1i32..=20) {
        let method = method(SlotTableConfig::Separate { entries });
        let before = method.calculate_slots(level - 1).unwrap();
        let after = method.calculate_slots(level).unwrap();
        for (slot_level, count) in before.iter() {
            prop_assert!(after.get(slot_level) >= count);
        }
    }

    #[test]
    fn calculation_is_idempotent(entries in arb_separate_entries(), level in -5i32..30) {
        let method = method(SlotTableConfig::Separate { entries });
        prop_assert_eq!(method.calculate_slots(level).unwrap(), method.calculate_slots(level).unwrap());
    }

    #[test]
    fn cantrip_key_is_shared(entries in arb_single_entries()) {
        let method = method(SlotTableConfig::Single { entries });
        prop_assert_eq!(method.spell_slot_key(0), "spell0");
    }
}
