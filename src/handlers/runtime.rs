//! Runtime modules the generated classes import: the name-keyed type
//! registry, its `register-all-types` manifest and the Decimal helpers.

use crate::emitter::Statement;
use crate::error::Result;
use crate::pipeline::GenerationContext;
use regex::Regex;

pub const TYPE_REGISTRY_FILE: &str = "type-registry.ts";
pub const REGISTER_ALL_FILE: &str = "register-all-types.ts";
pub const DECIMAL_HELPERS_FILE: &str = "decimal-helpers.ts";

const TYPE_REGISTRY_SOURCE: &str = r#"const registry = new Map<string, unknown>();
const pendingForwardRefs = new Set<string>();
let registrationComplete = false;

export function registerType<T>(name: string, value: T): void {
    if (value === undefined) {
        console.warn(`[type-registry] Registering undefined value for type '${name}'`);
    }
    registry.set(name, value);
    pendingForwardRefs.delete(name);
}

export function getType<T = any>(name: string): T {
    const value = registry.get(name);
    if (value === undefined && registrationComplete) {
        console.warn(`[type-registry] Type '${name}' was requested but is not registered`);
    }
    return value as T;
}

export function forwardRef<T = any>(name: string): () => T {
    return () => {
        const value = registry.get(name);
        if (value === undefined) {
            pendingForwardRefs.add(name);
            throw new Error(`[type-registry] Unresolved forward reference to type '${name}'`);
        }
        return value as T;
    };
}

export function lazyType<T = any>(name: string): () => T {
    return () => getType<T>(name);
}

export function markRegistrationComplete(): void {
    registrationComplete = true;
    if (pendingForwardRefs.size > 0) {
        console.warn(`[type-registry] Unresolved forward references: ${[...pendingForwardRefs].join(', ')}`);
    }
}

export function getRegisteredTypes(): string[] {
    return [...registry.keys()];
}

export function isTypeRegistered(name: string): boolean {
    return registry.has(name);
}

export function validateRegistry(expected: readonly string[]): string[] {
    const missing = expected.filter(name => !registry.has(name));
    if (missing.length > 0) {
        console.warn(`[type-registry] Missing registrations: ${missing.join(', ')}`);
    }
    return missing;
}
"#;

const DECIMAL_HELPERS_SOURCE: &str = r#"import { Decimal } from 'decimal.js';

export { Decimal };

export function transformToDecimal({ value }: { value: unknown }): unknown {
    if (value === null || value === undefined) {
        return value;
    }
    if (Array.isArray(value)) {
        return value.map(item => new Decimal(item as Decimal.Value));
    }
    return new Decimal(value as Decimal.Value);
}
"#;

pub fn type_registry(ctx: &mut GenerationContext<'_>) {
    ctx.project
        .set_statements(TYPE_REGISTRY_FILE, vec![Statement::Raw(TYPE_REGISTRY_SOURCE.to_string())]);
    tracing::debug!("[PNGC] Generated {}", TYPE_REGISTRY_FILE);
}

pub fn decimal_helpers(ctx: &mut GenerationContext<'_>) {
    ctx.project
        .set_statements(DECIMAL_HELPERS_FILE, vec![Statement::Raw(DECIMAL_HELPERS_SOURCE.to_string())]);
    tracing::debug!("[PNGC] Generated {}", DECIMAL_HELPERS_FILE);
}

/// Side-effect imports of every file that calls `registerType`, so importing
/// the manifest first registers the whole type universe.
pub fn register_all_types(ctx: &mut GenerationContext<'_>) -> Result<()> {
    let marker = Regex::new(r#"registerType\(['"]([^'"]+)['"]"#)?;
    let mut modules = Vec::new();
    let mut type_names = Vec::new();

    let merged = ctx.config.emit_single;
    for path in ctx.project.paths() {
        if is_skipped(&path, merged) {
            continue;
        }
        let Some(file) = ctx.project.get(&path) else {
            continue;
        };
        let text = file.text();
        let registered: Vec<String> = marker.captures_iter(&text).map(|c| c[1].to_string()).collect();
        if registered.is_empty() {
            continue;
        }
        modules.push(path.strip_suffix(".ts").unwrap_or(&path).to_string());
        type_names.extend(registered);
    }
    modules.sort();
    type_names.sort();
    type_names.dedup();

    let mut code = String::new();
    for module in &modules {
        code.push_str(&format!("import './{module}.js';\n"));
    }
    code.push_str("import { markRegistrationComplete } from './type-registry.js';\n\n");
    code.push_str("markRegistrationComplete();\n\n");
    let quoted: Vec<String> = type_names.iter().map(|n| format!("    '{n}',")).collect();
    if quoted.is_empty() {
        code.push_str("export const registeredTypes = [] as const;\n");
    } else {
        code.push_str(&format!("export const registeredTypes = [\n{}\n] as const;\n", quoted.join("\n")));
    }
    code.push_str("\nexport type RegisteredTypeName = typeof registeredTypes[number];\n");

    ctx.project.set_statements(REGISTER_ALL_FILE, vec![Statement::Raw(code)]);
    tracing::debug!("[PNGC] Generated {} ({} modules)", REGISTER_ALL_FILE, modules.len());
    Ok(())
}

/// Index files only re-export, except the root index of a single-file run.
fn is_skipped(path: &str, merged: bool) -> bool {
    if merged && path == "index.ts" {
        return false;
    }
    let name = path.rsplit('/').next().unwrap_or(path);
    matches!(name, TYPE_REGISTRY_FILE | REGISTER_ALL_FILE | "index.ts")
}
