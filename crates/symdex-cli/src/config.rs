use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::{Deserialize, Serialize};
use symdex_indexer::IndexerConfig;

/// Config file looked up in the working directory when none is given.
pub const DEFAULT_CONFIG_FILE: &str = "symdex.toml";

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SymdexConfig {
    pub indexer: IndexerConfig,
    pub store: StoreConfig,
    pub catalog: CatalogConfig,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Root of the symbol-server directory tree.
    pub root: PathBuf,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("symbols"),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogConfig {
    /// JSON file listing published packages. Without one the catalog is empty.
    pub path: Option<PathBuf>,
}

impl SymdexConfig {
    pub fn from_toml(source: &str) -> anyhow::Result<Self> {
        toml::from_str(source).context("invalid symdex configuration")
    }

    /// Load `path`, or `./symdex.toml` if it exists, or the defaults.
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        let path = match path {
            Some(path) => path.to_path_buf(),
            None => {
                let fallback = PathBuf::from(DEFAULT_CONFIG_FILE);
                if !fallback.is_file() {
                    return Ok(Self::default());
                }
                fallback
            }
        };
        let source = std::fs::read_to_string(&path)
            .with_context(|| format!("reading config {}", path.display()))?;
        Self::from_toml(&source).with_context(|| format!("in {}", path.display()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let c = SymdexConfig::default();
        assert_eq!(c.store.root, PathBuf::from("symbols"));
        assert!(c.catalog.path.is_none());
        assert_eq!(c.indexer, IndexerConfig::default());
    }

    #[test]
    fn empty_file_is_default() {
        assert_eq!(SymdexConfig::from_toml("").unwrap(), SymdexConfig::default());
    }

    #[test]
    fn full_file() {
        let c = SymdexConfig::from_toml(
            r#"
            [indexer]
            scratch_spool_threshold = 4096
            copy_chunk_size = 512

            [store]
            root = "/srv/symbols"

            [catalog]
            path = "packages.json"
            "#,
        )
        .unwrap();
        assert_eq!(c.indexer.scratch_spool_threshold, 4096);
        assert_eq!(c.indexer.copy_chunk_size, 512);
        assert_eq!(c.store.root, PathBuf::from("/srv/symbols"));
        assert_eq!(c.catalog.path, Some(PathBuf::from("packages.json")));
    }

    #[test]
    fn unknown_types_are_rejected() {
        assert!(SymdexConfig::from_toml("[store]\nroot = 5").is_err());
    }

    #[test]
    fn load_explicit_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("symdex.toml");
        std::fs::write(&path, "[store]\nroot = \"out\"\n").unwrap();
        let c = SymdexConfig::load(Some(&path)).unwrap();
        assert_eq!(c.store.root, PathBuf::from("out"));
    }

    #[test]
    fn load_missing_explicit_file_fails() {
        let dir = tempfile::tempdir().unwrap();
        assert!(SymdexConfig::load(Some(&dir.path().join("nope.toml"))).is_err());
    }
}
