//! Actor spellcasting data.

use serde::{Deserialize, Serialize};

use arcanum_domain::{ActorKind, ActorSpells, ClassSpellcasting};

/// Method whose caster level an NPC takes from its spell level.
pub const NPC_SPELL_METHOD: &str = "spell";

/// The spellcasting-relevant part of an actor document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ActorData {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: ActorKind,
    /// NPC spellcaster level.
    pub spell_level: i32,
    /// Spellcasting granted by each class.
    pub classes: Vec<ClassSpellcasting>,
    /// Slot buckets, including manual overrides.
    pub spells: ActorSpells,
}

impl ActorData {
    pub fn character(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn npc(name: impl Into<String>, spell_level: i32) -> Self {
        Self {
            name: name.into(),
            kind: ActorKind::Npc,
            spell_level,
            ..Self::default()
        }
    }

    pub fn with_class(mut self, class: ClassSpellcasting) -> Self {
        self.classes.push(class);
        self
    }

    pub fn is_npc(&self) -> bool {
        self.kind == ActorKind::Npc
    }

    /// Number of classes that cast through the given method.
    pub fn classes_with_method(&self, method: &str) -> usize {
        self.classes.iter().filter(|c| c.method == method).count()
    }
}
