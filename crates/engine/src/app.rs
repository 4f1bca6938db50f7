//! Application state and composition.

use std::sync::Arc;

use crate::infrastructure::{EngineSettings, LoadError};
use crate::use_cases::SpellSlotUseCases;

/// Main application state.
///
/// Holds the loaded ruleset and the use cases built on it.
#[derive(Debug, Clone)]
pub struct App {
    pub use_cases: UseCases,
}

/// Container for all use cases.
#[derive(Debug, Clone)]
pub struct UseCases {
    pub spell_slots: SpellSlotUseCases,
}

impl App {
    /// Load the configured ruleset and wire the use cases.
    pub async fn load(settings: &EngineSettings) -> Result<Self, LoadError> {
        let registry = Arc::new(settings.loader().registry().await?);
        Ok(Self {
            use_cases: UseCases {
                spell_slots: SpellSlotUseCases::new(registry),
            },
        })
    }
}
