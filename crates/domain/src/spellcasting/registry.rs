//! Registry of the spellcasting methods of one ruleset.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use super::config::{MethodConfig, RulesetConfig};
use super::limits::RulesetLimits;
use super::method::{MethodType, ProgressionMethod, SpellcastingMethod};
use super::rest::RestType;
use super::table::SlotTable;
use crate::error::DomainError;
use crate::i18n::Localizer;

/// Spellcasting methods built from a [`RulesetConfig`].
///
/// Immutable once built, so a single registry can be shared across threads.
#[derive(Debug, Clone)]
pub struct SpellcastingRegistry {
    methods: BTreeMap<String, SpellcastingMethod>,
    /// Progression mode key -> method key.
    progressions: BTreeMap<String, String>,
    limits: RulesetLimits,
}

impl SpellcastingRegistry {
    /// Build every configured method, resolving tables and rest recovery.
    pub fn from_config(
        config: &RulesetConfig,
        i18n: Arc<dyn Localizer>,
    ) -> Result<Self, DomainError> {
        let limits = config.limits;
        if limits.max_level == 0 {
            return Err(DomainError::validation("maximum level must be at least 1"));
        }

        let mut tables = BTreeMap::new();
        for (name, table) in &config.spellcasting_tables {
            let table = SlotTable::from_config(table.clone(), &limits)
                .map_err(|e| DomainError::validation(format!("slot table '{name}': {e}")))?;
            tables.insert(name.as_str(), Arc::new(table));
        }

        let recovery = recovery_by_method(config);

        let mut methods = BTreeMap::new();
        let mut progressions: BTreeMap<String, String> = BTreeMap::new();
        for (key, method_config) in &config.spellcasting {
            let method = match method_config.method_type {
                MethodType::Static => {
                    SpellcastingMethod::new_static(key, &method_config.label, i18n.clone())
                }
                MethodType::Progression => {
                    let progression = build_progression(key, method_config, &tables)?;
                    for mode in progression.modes().keys() {
                        if let Some(previous) = progressions.insert(mode.clone(), key.clone()) {
                            tracing::warn!(
                                progression = %mode,
                                previous = %previous,
                                method = %key,
                                "Duplicate spell progression key detected"
                            );
                        }
                    }
                    SpellcastingMethod::new_progression(
                        key,
                        &method_config.label,
                        progression,
                        limits,
                        i18n.clone(),
                    )
                }
            }
            .with_img(&method_config.img)
            .with_order(method_config.order)
            .with_recovery(recovery.get(key.as_str()).into_iter().flatten().copied());

            methods.insert(key.clone(), method);
        }

        tracing::debug!(
            methods = methods.len(),
            tables = tables.len(),
            "Spellcasting registry built"
        );

        Ok(Self {
            methods,
            progressions,
            limits,
        })
    }

    /// Registry of the built-in standard ruleset.
    pub fn standard(i18n: Arc<dyn Localizer>) -> Result<Self, DomainError> {
        Self::from_config(&RulesetConfig::standard(), i18n)
    }

    /// Get a method by key.
    pub fn get(&self, key: &str) -> Option<&SpellcastingMethod> {
        self.methods.get(key)
    }

    /// Get a method by key, failing if it is not configured.
    pub fn require(&self, key: &str) -> Result<&SpellcastingMethod, DomainError> {
        self.get(key)
            .ok_or_else(|| DomainError::not_found("SpellcastingMethod", key))
    }

    /// All methods in display order (by `order`, then key).
    pub fn methods(&self) -> Vec<&SpellcastingMethod> {
        let mut methods: Vec<_> = self.methods.values().collect();
        methods.sort_by(|a, b| a.order().cmp(&b.order()).then_with(|| a.key().cmp(b.key())));
        methods
    }

    /// The method that owns a progression mode (`half` -> `spell`).
    pub fn method_for_progression(&self, mode: &str) -> Option<&SpellcastingMethod> {
        self.progressions.get(mode).and_then(|key| self.get(key))
    }

    pub fn limits(&self) -> &RulesetLimits {
        &self.limits
    }

    pub fn len(&self) -> usize {
        self.methods.len()
    }

    pub fn is_empty(&self) -> bool {
        self.methods.is_empty()
    }
}

fn build_progression(
    key: &str,
    config: &MethodConfig,
    tables: &BTreeMap<&str, Arc<SlotTable>>,
) -> Result<ProgressionMethod, DomainError> {
    let table = config
        .table
        .as_deref()
        .and_then(|name| match tables.get(name) {
            Some(table) => Some(table.clone()),
            None => {
                tracing::warn!(method = %key, table = %name, "Unknown spellcasting table");
                None
            }
        });

    let mut progression = match table {
        Some(table) => {
            if table.is_separate() != config.separate {
                return Err(DomainError::validation(format!(
                    "method '{key}' declares separate={} but its table is {}",
                    config.separate,
                    if table.is_separate() { "separate" } else { "single" }
                )));
            }
            ProgressionMethod::new(table)
        }
        None => ProgressionMethod::without_table(config.separate),
    }
    .with_cantrips(config.cantrips)
    .with_preparation(config.prepares);

    for (mode_key, mode) in &config.progression {
        if mode.divisor == 0 {
            return Err(DomainError::validation(format!(
                "progression '{mode_key}' of method '{key}' has a zero divisor"
            )));
        }
        progression = progression.with_mode(mode_key.clone(), mode.clone());
    }
    Ok(progression)
}

/// Method key -> rest types that restore its slots.
fn recovery_by_method(config: &RulesetConfig) -> BTreeMap<&str, BTreeSet<RestType>> {
    let mut recovery: BTreeMap<&str, BTreeSet<RestType>> = BTreeMap::new();
    for (rest_key, rest) in &config.rest_types {
        let rest_type = match rest_key.parse::<RestType>() {
            Ok(rest_type) => rest_type,
            Err(e) => {
                tracing::warn!(rest = %rest_key, error = %e, "Ignoring unknown rest type");
                continue;
            }
        };
        for method in &rest.recover_spell_slot_types {
            if !config.spellcasting.contains_key(method) {
                tracing::warn!(rest = %rest_key, method = %method, "Rest recovers an unknown spellcasting method");
            }
            recovery.entry(method.as_str()).or_default().insert(rest_type);
        }
    }
    recovery
}
