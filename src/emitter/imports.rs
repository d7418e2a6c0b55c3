//! Import declarations collected while building one file.

use super::statements::{ImportDeclaration, NamedImport, Statement};
use super::{DefaultImport, ImportSpec};

/// Ordered map from bound name to its declaration. The first registration
/// of a name wins; type-only imports are keyed as `type:<name>`.
#[derive(Debug, Clone, Default)]
pub struct ImportDeclarationMap {
    entries: Vec<(String, ImportDeclaration)>,
}

impl ImportDeclarationMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn has(&self, key: &str) -> bool {
        self.entries.iter().any(|(k, _)| k == key)
    }

    fn insert(&mut self, key: String, declaration: ImportDeclaration) {
        if !self.has(&key) {
            self.entries.push((key, declaration));
        }
    }

    /// `import { name } from 'module'`.
    pub fn add(&mut self, name: &str, module_specifier: &str) {
        self.insert(name.to_string(), ImportDeclaration::named(name, module_specifier));
    }

    pub fn add_declaration(&mut self, name: &str, declaration: ImportDeclaration) {
        self.insert(name.to_string(), declaration);
    }

    /// `import type { name } from 'module'`, skipped when a value import of
    /// the same name exists.
    pub fn add_type(&mut self, name: &str, module_specifier: &str) {
        if self.has(name) {
            return;
        }
        let mut declaration = ImportDeclaration::named(name, module_specifier);
        declaration.type_only = true;
        self.insert(format!("type:{name}"), declaration);
    }

    /// Import shaped by an [`ImportSpec`]: named-import of the namespace,
    /// default import, namespace import, or a plain named import, in that
    /// order of preference.
    pub fn create(&mut self, spec: &ImportSpec) {
        let mut declaration = ImportDeclaration {
            module_specifier: spec.from.clone(),
            type_only: spec.type_only,
            ..Default::default()
        };
        let name = match (&spec.namespace_import, &spec.default_import) {
            (Some(namespace), _) if spec.named_import => {
                declaration.named_imports.push(NamedImport::new(namespace.clone()));
                namespace.clone()
            }
            (_, Some(default)) => {
                let bound = match default {
                    DefaultImport::SameName => spec.name.clone(),
                    DefaultImport::Named(alias) => alias.clone(),
                };
                declaration.default_import = Some(bound.clone());
                bound
            }
            (Some(namespace), None) => {
                declaration.namespace_import = Some(namespace.clone());
                namespace.clone()
            }
            (None, None) => {
                declaration.named_imports.push(NamedImport::new(spec.name.clone()));
                spec.name.clone()
            }
        };
        let key = if spec.type_only { format!("type:{name}") } else { name };
        self.insert(key, declaration);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn to_statements(&self) -> Vec<Statement> {
        self.entries
            .iter()
            .map(|(_, declaration)| Statement::Import(declaration.clone()))
            .collect()
    }
}
