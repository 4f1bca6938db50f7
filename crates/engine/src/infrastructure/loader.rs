//! Ruleset and label catalog loading.
//!
//! Rulesets are JSON documents shaped like [`RulesetConfig`]; catalogs are
//! flat `{ "key": "text" }` objects layered over the built-in English labels.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use thiserror::Error;
use tokio::fs;

use arcanum_domain::{DomainError, LabelCatalog, RulesetConfig, SpellcastingRegistry};

/// Errors that can occur while loading ruleset files.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("File not found: {0}")]
    FileNotFound(PathBuf),
    #[error("Invalid ruleset: {0}")]
    Domain(#[from] DomainError),
}

/// Loads the files a registry is built from.
///
/// Paths left unset fall back to the built-in standard ruleset and labels.
#[derive(Debug, Clone, Default)]
pub struct RulesetLoader {
    ruleset_path: Option<PathBuf>,
    catalog_path: Option<PathBuf>,
}

impl RulesetLoader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_ruleset(mut self, path: impl Into<PathBuf>) -> Self {
        self.ruleset_path = Some(path.into());
        self
    }

    pub fn with_catalog(mut self, path: impl Into<PathBuf>) -> Self {
        self.catalog_path = Some(path.into());
        self
    }

    /// Load the ruleset configuration.
    pub async fn ruleset(&self) -> Result<RulesetConfig, LoadError> {
        match &self.ruleset_path {
            Some(path) => load_ruleset(path).await,
            None => Ok(RulesetConfig::standard()),
        }
    }

    /// Load the label catalog, overlaying any file on the built-in labels.
    pub async fn catalog(&self) -> Result<LabelCatalog, LoadError> {
        let mut catalog = LabelCatalog::standard();
        if let Some(path) = &self.catalog_path {
            catalog.extend(load_catalog(path).await?);
        }
        Ok(catalog)
    }

    /// Load both files and build the registry.
    pub async fn registry(&self) -> Result<SpellcastingRegistry, LoadError> {
        let config = self.ruleset().await?;
        let catalog = self.catalog().await?;
        let registry = SpellcastingRegistry::from_config(&config, Arc::new(catalog))?;

        tracing::info!(
            ruleset = %display_path(self.ruleset_path.as_deref()),
            methods = registry.len(),
            "Loaded spellcasting ruleset"
        );
        Ok(registry)
    }
}

/// Read a ruleset configuration from a JSON file.
pub async fn load_ruleset(path: impl AsRef<Path>) -> Result<RulesetConfig, LoadError> {
    let content = read(path.as_ref()).await?;
    Ok(serde_json::from_str(&content)?)
}

/// Read a label catalog from a JSON file.
pub async fn load_catalog(path: impl AsRef<Path>) -> Result<LabelCatalog, LoadError> {
    let content = read(path.as_ref()).await?;
    let catalog: LabelCatalog = serde_json::from_str(&content)?;
    tracing::debug!(path = %path.as_ref().display(), labels = catalog.len(), "Loaded label catalog");
    Ok(catalog)
}

async fn read(path: &Path) -> Result<String, LoadError> {
    if !fs::try_exists(path).await? {
        return Err(LoadError::FileNotFound(path.to_path_buf()));
    }
    Ok(fs::read_to_string(path).await?)
}

fn display_path(path: Option<&Path>) -> String {
    path.map(|p| p.display().to_string())
        .unwrap_or_else(|| "standard".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use arcanum_domain::{MethodConfig, SlotTableConfig};
    use tempfile::TempDir;

    async fn write(dir: &TempDir, name: &str, content: &str) -> PathBuf {
        let path = dir.path().join(name);
        fs::write(&path, content).await.expect("write fixture");
        path
    }

    #[tokio::test]
    async fn defaults_to_the_standard_ruleset() {
        let registry = RulesetLoader::new().registry().await.unwrap();
        assert_eq!(registry.len(), 4);
        let spell = registry.require("spell").unwrap();
        assert_eq!(spell.spell_slot_label(1, false), "1st Level Slots");
    }

    #[tokio::test]
    async fn loads_a_ruleset_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut config = RulesetConfig::default();
        config.spellcasting.insert(
            "rune".into(),
            MethodConfig::progression("Rune Magic", "rune").with_separate(true),
        );
        config.spellcasting_tables.insert(
            "rune".into(),
            SlotTableConfig::LegacyRows {
                rows: vec![vec![1], vec![2]],
            },
        );
        let json = serde_json::to_string(&config).unwrap();
        let path = write(&dir, "ruleset.json", &json).await;

        let registry = RulesetLoader::new().with_ruleset(&path).registry().await.unwrap();
        let rune = registry.require("rune").unwrap();
        assert_eq!(rune.calculate_slots(5).unwrap(), [(1, 2)].into_iter().collect());
    }

    #[tokio::test]
    async fn catalog_overrides_builtin_labels() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = write(
            &dir,
            "labels.json",
            r#"{"SPELLCASTING.SLOTS.pact": "Hexenplätze", "SpellLevel2": "2. Grad"}"#,
        )
        .await;

        let registry = RulesetLoader::new().with_catalog(&path).registry().await.unwrap();
        let pact = registry.require("pact").unwrap();
        assert_eq!(pact.spell_slot_label(2, false), "Hexenplätze — 2. Grad");
        let spell = registry.require("spell").unwrap();
        assert_eq!(spell.spell_slot_label(1, false), "1st Level Slots");
    }

    #[tokio::test]
    async fn missing_files_are_reported() {
        let dir = tempfile::tempdir().expect("tempdir");
        let err = load_ruleset(dir.path().join("absent.json")).await.unwrap_err();
        assert!(matches!(err, LoadError::FileNotFound(_)));
    }

    #[tokio::test]
    async fn malformed_json_is_a_parse_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = write(&dir, "broken.json", "{ not json").await;
        assert!(matches!(load_catalog(&path).await, Err(LoadError::Json(_))));
    }

    #[tokio::test]
    async fn invalid_tables_are_domain_errors() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = write(
            &dir,
            "ruleset.json",
            r#"{"spellcastingTables": {"bad": {"kind": "legacyRows", "rows": [[1,1,1,1,1,1,1,1,1,1]]}}}"#,
        )
        .await;
        let err = RulesetLoader::new().with_ruleset(&path).registry().await.unwrap_err();
        assert!(matches!(err, LoadError::Domain(_)));
    }
}
