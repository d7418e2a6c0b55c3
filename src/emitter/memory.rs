use super::{SourceEmitter, SourceFile};
use crate::error::Result;
use std::collections::BTreeMap;

/// Keeps every file in memory. `save` only counts.
#[derive(Debug, Default)]
pub struct InMemoryEmitter {
    files: BTreeMap<String, SourceFile>,
    saves: usize,
}

impl InMemoryEmitter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rendered text of a file.
    pub fn text(&self, path: &str) -> Option<String> {
        self.files.get(path).map(SourceFile::text)
    }

    pub fn files(&self) -> impl Iterator<Item = &SourceFile> {
        self.files.values()
    }

    pub fn save_count(&self) -> usize {
        self.saves
    }
}

impl SourceEmitter for InMemoryEmitter {
    fn get_or_create(&mut self, path: &str) -> &mut SourceFile {
        self.files
            .entry(path.to_string())
            .or_insert_with(|| SourceFile::new(path))
    }

    fn get(&self, path: &str) -> Option<&SourceFile> {
        self.files.get(path)
    }

    fn get_mut(&mut self, path: &str) -> Option<&mut SourceFile> {
        self.files.get_mut(path)
    }

    fn remove(&mut self, path: &str) -> Option<SourceFile> {
        self.files.remove(path)
    }

    fn paths(&self) -> Vec<String> {
        self.files.keys().cloned().collect()
    }

    fn save(&mut self) -> Result<()> {
        self.saves += 1;
        Ok(())
    }
}
