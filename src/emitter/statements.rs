//! Statement structures that make up a generated TypeScript file.

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamedImport {
    pub name: String,
    pub alias: Option<String>,
}

impl NamedImport {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            alias: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ImportDeclaration {
    pub module_specifier: String,
    pub named_imports: Vec<NamedImport>,
    pub default_import: Option<String>,
    pub namespace_import: Option<String>,
    pub type_only: bool,
}

impl ImportDeclaration {
    pub fn named(name: impl Into<String>, module_specifier: impl Into<String>) -> Self {
        Self {
            module_specifier: module_specifier.into(),
            named_imports: vec![NamedImport::new(name)],
            ..Default::default()
        }
    }

    /// Names this declaration brings into scope.
    pub fn bound_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self
            .named_imports
            .iter()
            .map(|n| n.alias.as_deref().unwrap_or(&n.name))
            .collect();
        names.extend(self.default_import.as_deref());
        names.extend(self.namespace_import.as_deref());
        names
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Decorator {
    pub name: String,
    pub arguments: Vec<String>,
}

impl Decorator {
    pub fn new(name: impl Into<String>, arguments: Vec<String>) -> Self {
        Self {
            name: name.into(),
            arguments,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Property {
    pub name: String,
    pub type_text: String,
    pub has_question_token: bool,
    pub has_exclamation_token: bool,
    pub decorators: Vec<Decorator>,
    pub docs: Option<String>,
}

impl Property {
    pub fn new(name: impl Into<String>, type_text: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            type_text: type_text.into(),
            ..Default::default()
        }
    }

    pub fn decorator(&self, name: &str) -> Option<&Decorator> {
        self.decorators.iter().find(|d| d.name == name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ClassDeclaration {
    pub name: String,
    pub decorators: Vec<Decorator>,
    pub properties: Vec<Property>,
    pub docs: Option<String>,
}

impl ClassDeclaration {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn property(&self, name: &str) -> Option<&Property> {
        self.properties.iter().find(|p| p.name == name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumMember {
    pub name: String,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct EnumDeclaration {
    pub name: String,
    pub members: Vec<EnumMember>,
    pub docs: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Statement {
    Import(ImportDeclaration),
    Class(ClassDeclaration),
    Enum(EnumDeclaration),
    /// Verbatim text, e.g. `registerEnumType(...)` or a file loaded from disk.
    Raw(String),
}

/// One output file, addressed by its path relative to the output root.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SourceFile {
    pub path: String,
    pub statements: Vec<Statement>,
}

impl SourceFile {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            statements: Vec::new(),
        }
    }

    pub fn from_text(path: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            statements: vec![Statement::Raw(text.into())],
        }
    }

    pub fn imports(&self) -> impl Iterator<Item = &ImportDeclaration> {
        self.statements.iter().filter_map(|s| match s {
            Statement::Import(import) => Some(import),
            _ => None,
        })
    }

    pub fn class(&self) -> Option<&ClassDeclaration> {
        self.statements.iter().find_map(|s| match s {
            Statement::Class(class) => Some(class),
            _ => None,
        })
    }

    pub fn classes(&self) -> impl Iterator<Item = &ClassDeclaration> {
        self.statements.iter().filter_map(|s| match s {
            Statement::Class(class) => Some(class),
            _ => None,
        })
    }

    pub fn enum_declaration(&self) -> Option<&EnumDeclaration> {
        self.statements.iter().find_map(|s| match s {
            Statement::Enum(declaration) => Some(declaration),
            _ => None,
        })
    }

    /// File name without directory and `.ts` extension.
    pub fn base_name(&self) -> &str {
        let name = self.path.rsplit('/').next().unwrap_or(&self.path);
        name.strip_suffix(".ts").unwrap_or(name)
    }

    /// Directory part of the path, empty for files at the root.
    pub fn directory(&self) -> &str {
        self.path.rsplit_once('/').map(|(dir, _)| dir).unwrap_or("")
    }

    /// Rendered TypeScript source.
    pub fn text(&self) -> String {
        crate::codegen::render_statements(&self.statements)
    }
}
