//! `EnumType`: a TypeScript enum plus its `registerEnumType` call.

use crate::directives::NESTJS_GRAPHQL;
use crate::emitter::{EnumDeclaration, EnumMember, ImportDeclarationMap, Statement};
use crate::error::Result;
use crate::pipeline::{EventBus, GenerationContext};
use crate::schema::{EnumValue, SchemaEnum};
use regex::Regex;
use serde_json::{json, Map, Value};

pub fn register_enum(enum_type: &mut SchemaEnum, ctx: &mut GenerationContext<'_>, _bus: &EventBus) -> Result<()> {
    let datamodel_enum = ctx.enums.get(&enum_type.name).cloned();
    if !ctx.config.emit_blocks.prisma_enums && datamodel_enum.is_none() {
        return Ok(());
    }

    let name = enum_type.name.clone();
    let path = ctx.file_path(&name, "enum");
    let mut imports = ImportDeclarationMap::new();
    imports.add("registerEnumType", NESTJS_GRAPHQL);

    let values = datamodel_enum.as_ref().map(|e| e.values.as_slice()).unwrap_or_default();
    let values_map = enum_values_map(values);
    let values_map_entry = if values_map.is_empty() {
        String::new()
    } else {
        let pretty = serde_json::to_string_pretty(&Value::Object(values_map))?;
        let unquoted = Regex::new(r#""([^"]+)":"#)?.replace_all(&pretty, "$1:").into_owned();
        format!(", valuesMap: {unquoted}")
    };
    let description = match datamodel_enum.as_ref().and_then(|e| e.documentation.as_deref()) {
        Some(documentation) => serde_json::to_string(documentation)?,
        None => "undefined".to_string(),
    };

    let declaration = EnumDeclaration {
        name: name.clone(),
        members: enum_type
            .values
            .iter()
            .map(|value| -> Result<EnumMember> {
                Ok(EnumMember {
                    name: value.clone(),
                    value: serde_json::to_string(value)?,
                })
            })
            .collect::<Result<Vec<_>>>()?,
        docs: None,
    };

    let mut statements = imports.to_statements();
    statements.push(Statement::Enum(declaration));
    statements.push(Statement::Raw(format!(
        "registerEnumType({name}, {{ name: '{name}', description: {description}{values_map_entry} }})"
    )));
    ctx.project.set_statements(&path, statements);
    tracing::debug!("[PNGC] Generated enum {} ({})", name, path);
    Ok(())
}

/// Per-value docs: `@deprecated reason` becomes `deprecationReason`, any
/// other string becomes `description`. Values without string docs are left out.
pub fn enum_values_map(values: &[EnumValue]) -> Map<String, Value> {
    let mut map = Map::new();
    for value in values {
        let Some(documentation) = value.documentation.as_ref().and_then(Value::as_str) else {
            continue;
        };
        let entry = match documentation.strip_prefix("@deprecated") {
            Some(reason) => json!({ "deprecationReason": reason.trim() }),
            None => json!({ "description": documentation }),
        };
        map.insert(value.name.clone(), entry);
    }
    map
}
