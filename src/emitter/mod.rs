//! # Source Emitter
//!
//! The capability the generator writes through. Files are addressed by their
//! path relative to the output root and hold a list of [`Statement`]s until
//! [`SourceEmitter::save`] persists them.

pub mod fs;
pub mod imports;
pub mod memory;
pub mod statements;

pub use fs::FileSystemEmitter;
pub use imports::ImportDeclarationMap;
pub use memory::InMemoryEmitter;
pub use statements::{
    ClassDeclaration, Decorator, EnumDeclaration, EnumMember, ImportDeclaration, NamedImport, Property,
    SourceFile, Statement,
};

use crate::error::Result;
use std::collections::BTreeSet;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DefaultImport {
    /// `import Name from '...'`
    SameName,
    Named(String),
}

/// How to import one symbol (from config, a decorate rule or a directive).
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ImportSpec {
    pub name: String,
    pub from: String,
    pub named_import: bool,
    pub default_import: Option<DefaultImport>,
    pub namespace_import: Option<String>,
    pub type_only: bool,
}

pub trait SourceEmitter {
    fn get_or_create(&mut self, path: &str) -> &mut SourceFile;

    fn get(&self, path: &str) -> Option<&SourceFile>;

    fn get_mut(&mut self, path: &str) -> Option<&mut SourceFile>;

    fn set_statements(&mut self, path: &str, statements: Vec<Statement>) {
        self.get_or_create(path).statements = statements;
    }

    fn remove(&mut self, path: &str) -> Option<SourceFile>;

    /// All file paths, sorted.
    fn paths(&self) -> Vec<String>;

    /// Every directory that holds a file, including ancestors, excluding the root.
    fn directories(&self) -> BTreeSet<String> {
        let mut directories = BTreeSet::new();
        for path in self.paths() {
            let mut current = path.as_str();
            while let Some((parent, _)) = current.rsplit_once('/') {
                directories.insert(parent.to_string());
                current = parent;
            }
        }
        directories
    }

    fn save(&mut self) -> Result<()>;

    /// Remove directories left empty below the output root.
    fn remove_empty_directories(&mut self) -> Result<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_directories_include_ancestors() {
        let mut emitter = InMemoryEmitter::new();
        emitter.get_or_create("prisma/sort-order.enum.ts");
        emitter.get_or_create("user/nested/user.model.ts");
        emitter.get_or_create("index.ts");
        let directories: Vec<String> = emitter.directories().into_iter().collect();
        assert_eq!(directories, vec!["prisma", "user", "user/nested"]);
    }
}
