use serde::{Deserialize, Serialize};
use symdex_types::DEFAULT_CHUNK_SIZE;

/// Tuning knobs for the indexing pipeline.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct IndexerConfig {
    /// Scratch files stay in memory up to this many bytes, then spill to disk.
    pub scratch_spool_threshold: usize,
    /// Chunk size for entry copies. Cancellation is checked between chunks.
    pub copy_chunk_size: usize,
}

impl Default for IndexerConfig {
    fn default() -> Self {
        Self {
            scratch_spool_threshold: 1024 * 1024,
            copy_chunk_size: DEFAULT_CHUNK_SIZE,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let c = IndexerConfig::default();
        assert_eq!(c.scratch_spool_threshold, 1024 * 1024);
        assert_eq!(c.copy_chunk_size, 64 * 1024);
    }

    #[test]
    fn partial_toml_keeps_defaults() {
        let c: IndexerConfig = toml::from_str("copy_chunk_size = 4096").unwrap();
        assert_eq!(c.copy_chunk_size, 4096);
        assert_eq!(c.scratch_spool_threshold, 1024 * 1024);
    }
}
