//! # Type Reference Resolver
//!
//! Decides, per field, the TypeScript property type, the GraphQL wire type,
//! where the wire type is imported from and whether the reference is bound
//! directly or deferred through the runtime registry.

use crate::config::Config;
use crate::directives::{DirectiveKind, EmissionContext, NameMatcher, ObjectSettings, NESTJS_GRAPHQL};
use crate::emitter::ImportSpec;
use crate::error::{GeneratorError, Result};
use crate::graph::CircularPairSet;
use crate::naming::{enum_name, file_type_by_location, is_where_unique_input, relative_path};
use crate::schema::{FieldLocation, TypeRef};

pub const DECIMAL_SCALAR_PACKAGE: &str = "prisma-graphql-type-decimal";
pub const JSON_SCALAR_PACKAGE: &str = "graphql-type-json";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BindingMode {
    /// Static import of the referenced class.
    Direct,
    /// Type-only import plus a `getType('<Name>')` lookup at call time.
    Deferred,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Binding {
    pub property_types: Vec<String>,
    pub graphql_type: String,
    pub location: FieldLocation,
    pub is_list: bool,
    pub mode: BindingMode,
    /// When set, emit `@HideField()` instead of `@Field()`.
    pub hidden: bool,
    pub graphql_import: Option<ImportSpec>,
    pub property_import: Option<ImportSpec>,
}

impl Binding {
    pub fn is_deferred(&self) -> bool {
        self.mode == BindingMode::Deferred
    }

    /// `() => X`, `() => [X]` or their `getType('X')` forms.
    pub fn type_expression(&self) -> String {
        let target = match self.mode {
            BindingMode::Direct => self.graphql_type.clone(),
            BindingMode::Deferred => format!("getType('{}')", self.graphql_type),
        };
        if self.is_list {
            format!("() => [{target}]")
        } else {
            format!("() => {target}")
        }
    }

    pub fn uses_prisma_namespace(&self) -> bool {
        self.property_import.is_none() && self.property_types.iter().any(|t| t.starts_with("Prisma."))
    }
}

/// Everything the resolver needs to know about one field.
#[derive(Debug, Clone)]
pub struct FieldRequest<'a> {
    /// Class being emitted.
    pub owner: &'a str,
    pub field_name: &'a str,
    pub type_ref: &'a TypeRef,
    pub context: EmissionContext,
    pub settings: Option<&'a ObjectSettings>,
    /// Path of the file being written, relative to the output root.
    pub source_path: &'a str,
    /// The selected type is the model field's own type, so custom field
    /// types and decorators apply.
    pub customs_applicable: bool,
    pub is_id: bool,
    /// Where-unique keys of the owning model, used for `Prisma.AtLeast`.
    pub at_least_keys: Option<&'a [String]>,
}

/// TypeScript property type(s) for a type reference.
pub fn property_types(type_name: &str, location: FieldLocation) -> Vec<String> {
    match location {
        FieldLocation::Scalar => scalar_property_types(type_name),
        FieldLocation::EnumTypes => vec![format!("`${{{type_name}}}`")],
        _ => vec![type_name.to_string()],
    }
}

fn scalar_property_types(type_name: &str) -> Vec<String> {
    let types: &[&str] = match type_name {
        "Float" | "Int" => &["number"],
        "String" => &["string"],
        "Boolean" | "true" => &["boolean"],
        "DateTime" => &["Date", "string"],
        "Decimal" => &["Prisma.Decimal"],
        "Json" => &["any"],
        "Null" | "null" => &["null"],
        "Bytes" => &["Uint8Array"],
        "BigInt" => &["bigint", "number"],
        other => return vec![other.to_string()],
    };
    types.iter().map(|t| t.to_string()).collect()
}

/// Pick the one candidate type a field is emitted with.
pub fn select_input_type(
    owner: &str,
    field: &str,
    candidates: &[TypeRef],
    pattern: Option<&str>,
) -> Result<TypeRef> {
    let mut types: Vec<&TypeRef> = Vec::new();
    for candidate in candidates {
        if matches!(candidate.type_name.as_str(), "null" | "Null") || types.contains(&candidate) {
            continue;
        }
        types.push(candidate);
    }

    if types.len() == 1 {
        return Ok(types[0].clone());
    }

    let count = |location: FieldLocation| types.iter().filter(|t| t.location == location).count();
    let scalars = count(FieldLocation::Scalar);
    let enums = count(FieldLocation::EnumTypes);
    let field_refs = count(FieldLocation::FieldRefTypes);

    let one_location = types.windows(2).all(|w| w[0].location == w[1].location);
    if one_location && !types.is_empty() {
        if let Some(list) = types.iter().find(|t| t.is_list) {
            return Ok((*list).clone());
        }
    }

    if let Some(pattern) = pattern {
        let glob = pattern.strip_prefix("matcher:").or_else(|| pattern.strip_prefix("match:"));
        let found = match glob {
            Some(glob) => {
                let matcher = NameMatcher::new(glob)?;
                types.iter().find(|t| matcher.is_match(&t.type_name)).copied()
            }
            None => types.iter().find(|t| t.type_name.contains(pattern)).copied(),
        };
        if let Some(found) = found {
            return Ok(found.clone());
        }
    }

    if let Some(object) = types.iter().find(|t| t.location == FieldLocation::InputObjectTypes) {
        return Ok((*object).clone());
    }

    if enums > 0 && scalars > 0 {
        if let Some(json) = types
            .iter()
            .find(|t| t.location == FieldLocation::Scalar && t.type_name == "Json")
        {
            return Ok((*json).clone());
        }
    }

    if (scalars > 0 || enums > 0) && field_refs == 1 {
        let plain = |t: &&&TypeRef| matches!(t.location, FieldLocation::Scalar | FieldLocation::EnumTypes);
        if let Some(found) = types.iter().filter(plain).find(|t| t.is_list).or_else(|| types.iter().find(plain)) {
            return Ok((*found).clone());
        }
    }

    Err(GeneratorError::Resolution {
        type_name: owner.to_string(),
        field: field.to_string(),
        candidates: types
            .iter()
            .map(|t| format!("{} ({})", t.type_name, t.location.as_str()))
            .collect::<Vec<_>>()
            .join(", "),
    })
}

/// GraphQL wire type for a reference and where it comes from. `None` as
/// module means a global (`Date`, `Boolean`, `String`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GraphqlImport {
    pub name: String,
    pub module: Option<String>,
}

/// `locate(name, file_type)` returns the output path of a generated type.
pub fn graphql_import(
    config: &Config,
    type_ref: &TypeRef,
    is_id: bool,
    source_path: &str,
    is_model: &dyn Fn(&str) -> bool,
    locate: &dyn Fn(&str, &str) -> String,
) -> GraphqlImport {
    let type_name = type_ref.type_name.as_str();
    let builtin = |name: &str, module: Option<&str>| GraphqlImport {
        name: name.to_string(),
        module: module.map(str::to_string),
    };

    if type_ref.location == FieldLocation::Scalar {
        if is_id && !config.no_type_id {
            return builtin("ID", Some(NESTJS_GRAPHQL));
        }
        if let Some(custom) = config.graphql_scalars.get(type_name) {
            return builtin(&custom.name, custom.specifier.as_deref());
        }
        return match type_name {
            "Float" | "Int" => builtin(type_name, Some(NESTJS_GRAPHQL)),
            "DateTime" => builtin("Date", None),
            "true" | "Boolean" => builtin("Boolean", None),
            "Decimal" => builtin("GraphQLDecimal", Some(DECIMAL_SCALAR_PACKAGE)),
            "Json" => builtin("GraphQLJSON", Some(JSON_SCALAR_PACKAGE)),
            _ => builtin("String", None),
        };
    }

    let file_type = if type_ref.location == FieldLocation::OutputObjectTypes && is_model(type_name) {
        "model"
    } else {
        file_type_by_location(type_ref.location)
    };
    let target = locate(type_name, file_type);
    GraphqlImport {
        name: type_name.to_string(),
        module: Some(relative_path(source_path, &target)),
    }
}

/// HideField directive or a `decorate` rule naming `HideField` from `@nestjs/graphql`.
pub fn is_hidden(config: &Config, settings: Option<&ObjectSettings>, context: EmissionContext, owner: &str, field: &str) -> bool {
    settings.map(|s| s.should_hide_field(context, field)).unwrap_or(false)
        || config
            .decorate
            .iter()
            .any(|d| d.name() == "HideField" && d.import.from == NESTJS_GRAPHQL && d.is_match(owner, field))
}

/// Lazy binding only applies to generated object types that refer back to
/// the owner, directly or through a recorded cycle.
pub fn binding_mode(config: &Config, circular: &CircularPairSet, owner: &str, type_ref: &TypeRef) -> BindingMode {
    let object = matches!(
        type_ref.location,
        FieldLocation::InputObjectTypes | FieldLocation::OutputObjectTypes
    );
    if config.lazy_binding && object && (type_ref.type_name == owner || circular.contains(owner, &type_ref.type_name)) {
        BindingMode::Deferred
    } else {
        BindingMode::Direct
    }
}

/// Import of an applied `FieldType`/`PropertyType` directive. A directive
/// without a resolvable `from` is a configuration error.
fn directive_import(
    settings: &ObjectSettings,
    kind: DirectiveKind,
    context: EmissionContext,
    field: &str,
) -> Result<Option<ImportSpec>> {
    let directive = match kind {
        DirectiveKind::FieldType => settings.field_type(context, field),
        _ => settings.property_type(context, field),
    };
    directive.map(|d| d.import_spec()).transpose()
}

pub fn resolve_field_binding(
    request: &FieldRequest<'_>,
    circular: &CircularPairSet,
    config: &Config,
    is_model: &dyn Fn(&str) -> bool,
    locate: &dyn Fn(&str, &str) -> String,
) -> Result<Binding> {
    let type_ref = request.type_ref;
    let type_name = type_ref.type_name.as_str();
    let context = request.context;
    let field = request.field_name;
    let hidden = is_hidden(config, request.settings, context, request.owner, field);

    let property_override = request.settings.and_then(|s| s.property_type(context, field));
    let at_least = request
        .at_least_keys
        .filter(|keys| is_where_unique_input(type_name) && !keys.is_empty())
        .map(|keys| {
            let keys: Vec<String> = keys.iter().map(|k| format!("'{k}'")).collect();
            format!("Prisma.AtLeast<{type_name}, {}>", keys.join(" | "))
        });
    let property_types = match (property_override, at_least) {
        (Some(directive), _) => vec![directive.name.clone()],
        (None, Some(at_least)) => vec![at_least],
        (None, None) => property_types(type_name, type_ref.location),
    };
    let property_import = match request.settings {
        Some(settings) => directive_import(settings, DirectiveKind::PropertyType, context, field)?,
        None => None,
    };

    let field_type = request.settings.and_then(|s| s.field_type(context, field));
    if let (Some(directive), true, false) = (field_type, request.customs_applicable, hidden) {
        let graphql_import = match request.settings {
            Some(settings) => directive_import(settings, DirectiveKind::FieldType, context, field)?,
            None => None,
        };
        return Ok(Binding {
            property_types,
            graphql_type: directive.name.clone(),
            location: type_ref.location,
            is_list: type_ref.is_list,
            mode: BindingMode::Direct,
            hidden,
            graphql_import,
            property_import,
        });
    }

    let import = graphql_import(config, type_ref, request.is_id, request.source_path, is_model, locate);
    let mode = binding_mode(config, circular, request.owner, type_ref);
    let reference = match type_ref.location {
        FieldLocation::EnumTypes => property_types
            .first()
            .and_then(|p| enum_name(p))
            .unwrap_or(type_name)
            .to_string(),
        _ => property_types.first().cloned().unwrap_or_default(),
    };
    let wanted = import.name != request.owner && (!hidden || reference == import.name);
    let graphql_import = match (&import.module, wanted) {
        (Some(module), true) => Some(ImportSpec {
            name: import.name.clone(),
            from: module.clone(),
            type_only: mode == BindingMode::Deferred,
            ..Default::default()
        }),
        _ => None,
    };

    if mode == BindingMode::Deferred {
        tracing::debug!("[PNGC] Deferred binding {}.{} -> {}", request.owner, field, import.name);
    }

    Ok(Binding {
        property_types,
        graphql_type: import.name,
        location: type_ref.location,
        is_list: type_ref.is_list,
        mode,
        hidden,
        graphql_import,
        property_import,
    })
}
