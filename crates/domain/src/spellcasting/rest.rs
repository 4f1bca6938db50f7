//! Rest types and which slots they restore.

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::DomainError;

/// Rest type for resource recovery.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RestType {
    /// Short rest (typically 1 hour)
    Short,
    /// Long rest (typically 8 hours)
    Long,
}

impl RestType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Short => "short",
            Self::Long => "long",
        }
    }
}

impl fmt::Display for RestType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for RestType {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "short" => Ok(Self::Short),
            "long" => Ok(Self::Long),
            _ => Err(DomainError::parse(format!("Unknown rest type: {s}"))),
        }
    }
}

/// Ruleset configuration of one rest type.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RestTypeConfig {
    pub label: String,
    /// Keys of the spellcasting methods whose slots this rest restores.
    pub recover_spell_slot_types: BTreeSet<String>,
}

impl RestTypeConfig {
    pub fn new<I, S>(label: impl Into<String>, recovers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            label: label.into(),
            recover_spell_slot_types: recovers.into_iter().map(Into::into).collect(),
        }
    }

    pub fn recovers(&self, method: &str) -> bool {
        self.recover_spell_slot_types.contains(method)
    }
}
