//! Environment-driven engine settings.

use std::path::{Path, PathBuf};

use super::loader::RulesetLoader;

/// Ruleset JSON to load instead of the built-in preset.
pub const RULESET_PATH_VAR: &str = "ARCANUM_RULESET_PATH";
/// Label catalog JSON layered over the built-in labels.
pub const CATALOG_PATH_VAR: &str = "ARCANUM_CATALOG_PATH";

/// Settings read from the process environment.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EngineSettings {
    pub ruleset_path: Option<PathBuf>,
    pub catalog_path: Option<PathBuf>,
}

impl EngineSettings {
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build settings from any variable source. Blank values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let path = |name: &str| {
            lookup(name)
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .map(PathBuf::from)
        };
        Self {
            ruleset_path: path(RULESET_PATH_VAR),
            catalog_path: path(CATALOG_PATH_VAR),
        }
    }

    pub fn loader(&self) -> RulesetLoader {
        let mut loader = RulesetLoader::new();
        if let Some(path) = &self.ruleset_path {
            loader = loader.with_ruleset(path);
        }
        if let Some(path) = &self.catalog_path {
            loader = loader.with_catalog(path);
        }
        loader
    }
}

/// Load `.env.local` then `.env` from the workspace root.
///
/// Variables already set win over both files.
pub fn load_dotenv_from_repo_root() {
    let repo_root = Path::new(env!("CARGO_MANIFEST_DIR")).join("..").join("..");

    // Prefer local overrides.
    for filename in [".env.local", ".env"] {
        let path = repo_root.join(filename);
        if path.exists() {
            let _ = dotenvy::from_path(path);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn settings(vars: &[(&str, &str)]) -> EngineSettings {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        EngineSettings::from_lookup(|name| vars.get(name).cloned())
    }

    #[test]
    fn unset_variables_use_builtins() {
        assert_eq!(settings(&[]), EngineSettings::default());
    }

    #[test]
    fn reads_both_paths() {
        let settings = settings(&[
            (RULESET_PATH_VAR, "/srv/rules.json"),
            (CATALOG_PATH_VAR, "labels/de.json"),
        ]);
        assert_eq!(settings.ruleset_path, Some(PathBuf::from("/srv/rules.json")));
        assert_eq!(settings.catalog_path, Some(PathBuf::from("labels/de.json")));
    }

    #[test]
    fn blank_values_are_unset() {
        let settings = settings(&[(RULESET_PATH_VAR, "   ")]);
        assert!(settings.ruleset_path.is_none());
    }
}
