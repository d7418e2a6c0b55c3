//! Single-file output: every generated declaration lands in `index.ts`.

use crate::emitter::{ImportDeclaration, ImportDeclarationMap, SourceFile, Statement};
use crate::error::Result;
use crate::handlers::runtime::{self, DECIMAL_HELPERS_FILE, REGISTER_ALL_FILE, TYPE_REGISTRY_FILE};
use crate::naming::relative_path;
use crate::pipeline::{ClassPropertyEvent, EventBus, GenerationContext};

const INDEX_FILE: &str = "index.ts";

/// `ClassProperty`: object references become `InstanceType<typeof X>` so
/// classes declared later in the merged file can be referenced.
pub fn class_property(event: &mut ClassPropertyEvent, _ctx: &mut GenerationContext<'_>, _bus: &EventBus) -> Result<()> {
    if !event.location.is_object() || event.is_list {
        return Ok(());
    }
    let (safe, instance): (Vec<&String>, Vec<&String>) = event
        .property_types
        .iter()
        .partition(|t| *t == "null" || t.starts_with("Prisma."));
    let mut types: Vec<String> = instance.iter().map(|t| format!("InstanceType<typeof {t}>")).collect();
    types.extend(safe.into_iter().cloned());
    event.property.type_text = types.join(" | ");
    Ok(())
}

/// Merge every generated file into `index.ts`. Enum files come first;
/// imports between merged files are dropped and imports of the runtime
/// modules are re-pointed at the root.
pub fn merge(ctx: &mut GenerationContext<'_>) -> Result<()> {
    let mut sources: Vec<SourceFile> = Vec::new();
    for path in ctx.project.paths() {
        if is_runtime(&path) {
            continue;
        }
        if let Some(file) = ctx.project.remove(&path) {
            if file.base_name() != "index" {
                sources.push(file);
            }
        }
    }
    sources.sort_by_key(|file| file.enum_declaration().is_none());

    let mut imports = ImportDeclarationMap::new();
    let mut body: Vec<Statement> = Vec::new();
    for file in &sources {
        for statement in &file.statements {
            match statement {
                Statement::Import(import) => {
                    if let Some(import) = rebase_import(file, import) {
                        let names = import.bound_names().join(",");
                        let key = if import.type_only { format!("type:{names}") } else { names };
                        imports.add_declaration(&key, import);
                    }
                }
                other => body.push(other.clone()),
            }
        }
    }
    for spec in &ctx.config.custom_import {
        imports.create(spec);
    }

    let mut statements = imports.to_statements();
    statements.extend(body);
    ctx.project.set_statements(INDEX_FILE, statements);
    tracing::debug!("[PNGC] Merged {} files into {}", sources.len(), INDEX_FILE);

    if ctx.config.lazy_binding {
        runtime::register_all_types(ctx)?;
    }
    Ok(())
}

fn is_runtime(path: &str) -> bool {
    matches!(path, TYPE_REGISTRY_FILE | REGISTER_ALL_FILE | DECIMAL_HELPERS_FILE)
}

/// Package imports are kept, relative imports survive only when they point
/// at a runtime module.
fn rebase_import(file: &SourceFile, import: &ImportDeclaration) -> Option<ImportDeclaration> {
    let specifier = import.module_specifier.as_str();
    if !specifier.starts_with('.') {
        return Some(import.clone());
    }
    let target = format!("{}.ts", resolve_specifier(file.directory(), specifier));
    if !is_runtime(&target) {
        return None;
    }
    Some(ImportDeclaration {
        module_specifier: relative_path(INDEX_FILE, &target),
        ..import.clone()
    })
}

/// Join a relative module specifier onto `directory`.
fn resolve_specifier(directory: &str, specifier: &str) -> String {
    let mut parts: Vec<&str> = directory.split('/').filter(|p| !p.is_empty()).collect();
    for segment in specifier.split('/') {
        match segment {
            "." | "" => {}
            ".." => {
                parts.pop();
            }
            other => parts.push(other),
        }
    }
    parts.join("/")
}
