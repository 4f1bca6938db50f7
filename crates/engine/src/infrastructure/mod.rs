//! Infrastructure - Ruleset files and environment settings.

pub mod loader;
pub mod settings;

pub use loader::{LoadError, RulesetLoader};
pub use settings::{load_dotenv_from_repo_root, EngineSettings};
