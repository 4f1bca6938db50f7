//! Spell slot operation errors.

use arcanum_domain::DomainError;

/// Errors that can occur during spell slot operations.
#[derive(Debug, thiserror::Error)]
pub enum SpellSlotError {
    #[error("Spellcasting method not found: {0}")]
    MethodNotFound(String),

    #[error("Domain error: {0}")]
    Domain(#[from] DomainError),
}
