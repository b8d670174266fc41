use std::collections::VecDeque;

use tracing::debug;

use crate::extractor::SymbolArtifact;

/// Artifacts extracted from one package, held until the whole batch is known
/// good.
///
/// Members are handed out for persistence one at a time, in extraction
/// order. Whatever is still staged when the batch drops is released.
#[derive(Debug, Default)]
pub struct StagingBatch {
    staged: VecDeque<SymbolArtifact>,
}

impl StagingBatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, artifact: SymbolArtifact) {
        self.staged.push_back(artifact);
    }

    pub fn len(&self) -> usize {
        self.staged.len()
    }

    pub fn is_empty(&self) -> bool {
        self.staged.is_empty()
    }

    /// Take the next artifact to persist.
    pub fn next_for_commit(&mut self) -> Option<SymbolArtifact> {
        self.staged.pop_front()
    }

    pub fn iter(&self) -> impl Iterator<Item = &SymbolArtifact> {
        self.staged.iter()
    }
}

impl Drop for StagingBatch {
    fn drop(&mut self) {
        if !self.staged.is_empty() {
            debug!(count = self.staged.len(), "releasing staged artifacts");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scratch::ScratchSpace;
    use symdex_types::SymbolKey;

    fn artifact(space: &ScratchSpace, name: &str) -> SymbolArtifact {
        SymbolArtifact {
            source_path: name.to_string(),
            filename: name.to_lowercase(),
            key: SymbolKey::parse("12345678123412341234123456789ABCffffffff").unwrap(),
            content: space.create(),
        }
    }

    #[test]
    fn commits_in_push_order() {
        let space = ScratchSpace::new(64);
        let mut batch = StagingBatch::new();
        batch.push(artifact(&space, "a.pdb"));
        batch.push(artifact(&space, "b.pdb"));
        assert_eq!(batch.len(), 2);
        assert_eq!(
            batch.iter().map(|a| a.filename.as_str()).collect::<Vec<_>>(),
            vec!["a.pdb", "b.pdb"]
        );

        assert_eq!(batch.next_for_commit().unwrap().filename, "a.pdb");
        assert_eq!(batch.next_for_commit().unwrap().filename, "b.pdb");
        assert!(batch.next_for_commit().is_none());
        assert!(batch.is_empty());
    }

    #[test]
    fn drop_releases_uncommitted() {
        let space = ScratchSpace::new(64);
        let mut batch = StagingBatch::new();
        batch.push(artifact(&space, "a.pdb"));
        batch.push(artifact(&space, "b.pdb"));
        let first = batch.next_for_commit().unwrap();
        assert_eq!(space.live_count(), 2);

        drop(batch);
        assert_eq!(space.live_count(), 1);
        drop(first);
        assert_eq!(space.live_count(), 0);
    }
}
