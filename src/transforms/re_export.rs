//! `index.ts` barrels, written on `BeforeGenerateFiles`.

use crate::config::ReExport;
use crate::emitter::{SourceEmitter, Statement};
use crate::error::Result;
use crate::pipeline::{EventBus, GenerationContext};

pub fn before_generate_files(_: &mut (), ctx: &mut GenerationContext<'_>, _bus: &EventBus) -> Result<()> {
    let mode = ctx.config.re_export;
    if matches!(mode, ReExport::Directories | ReExport::All) {
        directory_indexes(&mut *ctx.project);
    }
    match mode {
        ReExport::Single => single_index(&mut *ctx.project),
        ReExport::All => root_of_directories(&mut *ctx.project),
        ReExport::None | ReExport::Directories => {}
    }
    Ok(())
}

fn is_index(path: &str) -> bool {
    path == "index.ts" || path.ends_with("/index.ts")
}

fn parent(path: &str) -> &str {
    path.rsplit_once('/').map(|(dir, _)| dir).unwrap_or("")
}

fn child_name<'a>(dir: &str, path: &'a str) -> &'a str {
    let name = if dir.is_empty() { path } else { &path[dir.len() + 1..] };
    name.strip_suffix(".ts").unwrap_or(name)
}

fn write_exports(project: &mut dyn SourceEmitter, path: &str, specifiers: &[String]) {
    let code: String = specifiers
        .iter()
        .map(|s| format!("export * from '{s}';\n"))
        .collect();
    project.set_statements(path, vec![Statement::Raw(code)]);
    tracing::debug!("[PNGC] Wrote index {} ({} exports)", path, specifiers.len());
}

/// One index per directory: its files, or its sub-directories when it
/// holds no files.
fn directory_indexes(project: &mut dyn SourceEmitter) {
    let paths: Vec<String> = project.paths().into_iter().filter(|p| !is_index(p)).collect();
    let directories = project.directories();

    let mut indexes: Vec<(String, Vec<String>)> = Vec::new();
    for dir in &directories {
        let files: Vec<String> = paths
            .iter()
            .filter(|p| parent(p) == dir)
            .map(|p| format!("./{}.js", child_name(dir, p)))
            .collect();
        let specifiers = if files.is_empty() {
            directories
                .iter()
                .filter(|d| parent(d) == dir)
                .map(|d| format!("./{}/index.js", child_name(dir, d)))
                .collect()
        } else {
            files
        };
        if !specifiers.is_empty() {
            indexes.push((format!("{dir}/index.ts"), specifiers));
        }
    }
    for (path, specifiers) in indexes {
        write_exports(project, &path, &specifiers);
    }
}

fn single_index(project: &mut dyn SourceEmitter) {
    let specifiers: Vec<String> = project
        .paths()
        .iter()
        .filter(|p| !is_index(p))
        .map(|p| format!("./{}.js", p.strip_suffix(".ts").unwrap_or(p)))
        .collect();
    write_exports(project, "index.ts", &specifiers);
}

/// Root index over the top-level directory indexes.
fn root_of_directories(project: &mut dyn SourceEmitter) {
    let specifiers: Vec<String> = project
        .directories()
        .iter()
        .filter(|d| !d.contains('/') && project.get(&format!("{d}/index.ts")).is_some())
        .map(|d| format!("./{d}/index.js"))
        .collect();
    if !specifiers.is_empty() {
        write_exports(project, "index.ts", &specifiers);
    }
}
