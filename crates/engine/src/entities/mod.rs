//! Entity modules - Actor state handled by the use cases.

pub mod actor;

pub use actor::{ActorData, NPC_SPELL_METHOD};
