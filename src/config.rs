//! # Generator Configuration
//!
//! Resolves the flat key/value options handed to the generator into an
//! immutable [`Config`]. Keys are hierarchical with `_` as separator, so
//! `fields_Validator_from = "class-validator"` configures the `Validator`
//! namespace. Problems that can be repaired (an invalid file pattern, a
//! deprecated key) become warnings; a decorate or custom import rule without
//! `from`/`name` is a hard [`GeneratorError::Configuration`].

use crate::directives::literal::{parse_literal, Literal};
use crate::directives::matcher::NameMatcher;
use crate::emitter::{DefaultImport, ImportSpec};
use crate::error::{GeneratorError, Result};
use crate::naming::sanitize_segment;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub const DEFAULT_OUTPUT_FILE_PATTERN: &str = "{model}/{name}.{type}.ts";
pub const DEFAULT_PRISMA_CLIENT_IMPORT: &str = "@prisma/client";

/// A raw option value as delivered by the host: one string or a list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawValue {
    Single(String),
    List(Vec<String>),
}

impl RawValue {
    fn first(&self) -> Option<&str> {
        match self {
            RawValue::Single(s) => Some(s),
            RawValue::List(items) => items.first().map(String::as_str),
        }
    }

    fn items(&self) -> Vec<String> {
        match self {
            RawValue::Single(s) => s.split(',').map(|p| p.trim().to_string()).filter(|p| !p.is_empty()).collect(),
            RawValue::List(items) => items.clone(),
        }
    }
}

impl From<&str> for RawValue {
    fn from(value: &str) -> Self {
        RawValue::Single(value.to_string())
    }
}

pub type RawConfig = BTreeMap<String, RawValue>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReExport {
    #[default]
    None,
    Directories,
    Single,
    All,
}

impl ReExport {
    fn parse(value: &str) -> Self {
        match value {
            "Directories" => ReExport::Directories,
            "Single" => ReExport::Single,
            "All" => ReExport::All,
            _ => ReExport::None,
        }
    }
}

/// Which groups of types are emitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EmitBlocks {
    pub prisma_enums: bool,
    pub schema_enums: bool,
    pub models: bool,
    pub inputs: bool,
    pub outputs: bool,
    pub args: bool,
}

impl Default for EmitBlocks {
    fn default() -> Self {
        Self {
            prisma_enums: true,
            schema_enums: true,
            models: true,
            inputs: true,
            outputs: true,
            args: true,
        }
    }
}

impl EmitBlocks {
    /// Enable the named blocks and what they depend on. Unknown names are ignored.
    pub fn from_names<S: AsRef<str>>(names: &[S]) -> Self {
        let mut blocks = EmitBlocks {
            prisma_enums: false,
            schema_enums: false,
            models: false,
            inputs: false,
            outputs: false,
            args: false,
        };
        for name in names {
            match name.as_ref() {
                "enums" => {
                    blocks.schema_enums = true;
                    blocks.prisma_enums = true;
                }
                "models" => {
                    blocks.models = true;
                    blocks.schema_enums = true;
                }
                "inputs" => {
                    blocks.inputs = true;
                    blocks.prisma_enums = true;
                }
                "outputs" => blocks.outputs = true,
                "args" => {
                    blocks.args = true;
                    blocks.inputs = true;
                    blocks.prisma_enums = true;
                }
                other => tracing::debug!("[PNGC] Ignoring unknown emit block '{}'", other),
            }
        }
        blocks
    }
}

/// Import mapping and default applicability for a decorator namespace such
/// as `Validator`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FieldNamespace {
    pub from: Option<String>,
    pub input: bool,
    pub output: bool,
    pub model: bool,
    pub default_import: Option<DefaultImport>,
    pub namespace_import: Option<String>,
}

/// A `decorate_<n>` rule: add a decorator to every matching field.
#[derive(Debug, Clone)]
pub struct DecorateRule {
    pub type_pattern: NameMatcher,
    pub field_pattern: NameMatcher,
    pub import: ImportSpec,
    /// Argument templates over `{propertyType}`.
    pub arguments: Option<Vec<String>>,
}

impl DecorateRule {
    pub fn name(&self) -> &str {
        &self.import.name
    }

    pub fn is_match(&self, type_name: &str, field_name: &str) -> bool {
        self.type_pattern.is_match(type_name) && self.field_pattern.is_match(field_name)
    }
}

/// `useInputType_<TypeFragment>_<field|ALL>` preference patterns.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UseInputType {
    pub type_fragment: String,
    pub all: Option<String>,
    pub fields: BTreeMap<String, String>,
}

impl UseInputType {
    pub fn pattern_for(&self, field: &str) -> Option<&str> {
        self.all.as_deref().or_else(|| self.fields.get(field).map(String::as_str))
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScalarOverride {
    pub name: String,
    pub specifier: Option<String>,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub output_file_pattern: String,
    pub prisma_client_import: String,
    pub combine_scalar_filters: bool,
    pub no_atomic_operations: bool,
    pub emit_single: bool,
    pub purge_output: bool,
    pub no_type_id: bool,
    pub omit_models_count: bool,
    pub require_single_fields_in_where_unique_input: bool,
    pub unsafe_compatible_where_unique_input: bool,
    /// `esmCompatible`: emit the runtime registry and defer circular references.
    pub lazy_binding: bool,
    pub re_export: ReExport,
    pub emit_blocks: EmitBlocks,
    pub fields: BTreeMap<String, FieldNamespace>,
    pub decorate: Vec<DecorateRule>,
    pub custom_import: Vec<ImportSpec>,
    pub use_input_type: Vec<UseInputType>,
    pub graphql_scalars: BTreeMap<String, ScalarOverride>,
    /// Repairs made while resolving, flushed at the start of a run.
    pub warnings: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            output_file_pattern: DEFAULT_OUTPUT_FILE_PATTERN.to_string(),
            prisma_client_import: DEFAULT_PRISMA_CLIENT_IMPORT.to_string(),
            combine_scalar_filters: false,
            no_atomic_operations: false,
            emit_single: false,
            purge_output: false,
            no_type_id: false,
            omit_models_count: false,
            require_single_fields_in_where_unique_input: false,
            unsafe_compatible_where_unique_input: false,
            lazy_binding: false,
            re_export: ReExport::None,
            emit_blocks: EmitBlocks::default(),
            fields: BTreeMap::new(),
            decorate: Vec::new(),
            custom_import: Vec::new(),
            use_input_type: Vec::new(),
            graphql_scalars: BTreeMap::new(),
            warnings: Vec::new(),
        }
    }
}

impl Config {
    pub fn from_raw(raw: &RawConfig) -> Result<Self> {
        let tree = ConfigNode::unflatten(raw);
        let mut config = Config::default();

        let pattern = tree
            .value("outputFilePattern")
            .filter(|p| !p.is_empty())
            .unwrap_or(DEFAULT_OUTPUT_FILE_PATTERN);
        config.output_file_pattern = sanitize_file_pattern(pattern);
        if config.output_file_pattern != pattern {
            config.warnings.push(format!(
                "Due to invalid filepath 'outputFilePattern' changed to '{}'",
                config.output_file_pattern
            ));
        }

        if let Some(client) = tree.value("prismaClientImport") {
            config.prisma_client_import = client.to_string();
        }

        config.combine_scalar_filters = tree.flag("combineScalarFilters");
        config.no_atomic_operations = tree.flag("noAtomicOperations");
        config.emit_single = tree.flag("emitSingle");
        config.purge_output = tree.flag("purgeOutput");
        config.no_type_id = tree.flag("noTypeId");
        config.omit_models_count = tree.flag("omitModelsCount");
        config.require_single_fields_in_where_unique_input = tree.flag("requireSingleFieldsInWhereUniqueInput");
        config.unsafe_compatible_where_unique_input = tree.flag("unsafeCompatibleWhereUniqueInput");
        config.lazy_binding = tree.flag("esmCompatible");

        config.re_export = tree.value("reExport").map(ReExport::parse).unwrap_or_default();
        if tree.get("reExportAll").is_some() {
            config
                .warnings
                .push("Option 'reExportAll' is deprecated, use 'reExport' instead".to_string());
            if tree.flag("reExportAll") {
                config.re_export = ReExport::All;
            }
        }

        if let Some(ConfigNode::Value(blocks)) = tree.get("emitBlocks") {
            config.emit_blocks = EmitBlocks::from_names(&blocks.items());
        }

        for (namespace, node) in tree.children("fields") {
            if !matches!(node, ConfigNode::Branch(_)) {
                continue;
            }
            config.fields.insert(
                namespace.to_string(),
                FieldNamespace {
                    from: node.value("from").map(str::to_string),
                    input: node.flag("input"),
                    output: node.flag("output"),
                    model: node.flag("model"),
                    default_import: default_import(node),
                    namespace_import: node.value("namespaceImport").map(str::to_string),
                },
            );
        }

        for (_, node) in numbered(tree.children("decorate")) {
            let import = import_spec(node, "decorate")?;
            let arguments = match node.value("arguments") {
                Some(text) => Some(decorate_arguments(text)?),
                None => None,
            };
            config.decorate.push(DecorateRule {
                type_pattern: NameMatcher::new(node.value("type").unwrap_or("*"))?,
                field_pattern: NameMatcher::new(node.value("field").unwrap_or("*"))?,
                import,
                arguments,
            });
        }

        for (_, node) in numbered(tree.children("customImport")) {
            config.custom_import.push(import_spec(node, "customImport")?);
        }

        for (type_fragment, node) in tree.children("useInputType") {
            let mut entry = UseInputType {
                type_fragment: type_fragment.to_string(),
                ..Default::default()
            };
            for (property, pattern) in node.entries() {
                let Some(pattern) = pattern.as_value() else { continue };
                if property == "ALL" {
                    entry.all = Some(pattern.to_string());
                } else {
                    entry.fields.insert(property.to_string(), pattern.to_string());
                }
            }
            config.use_input_type.push(entry);
        }

        for (scalar, node) in tree.children("graphqlScalars") {
            if let Some(name) = node.value("name") {
                config.graphql_scalars.insert(
                    scalar.to_string(),
                    ScalarOverride {
                        name: name.to_string(),
                        specifier: node.value("specifier").map(str::to_string),
                    },
                );
            }
        }

        tracing::debug!(
            "[PNGC] Resolved configuration: {} namespaces, {} decorate rules, {} warnings",
            config.fields.len(),
            config.decorate.len(),
            config.warnings.len()
        );

        Ok(config)
    }

    pub fn use_input_type_for(&self, type_name: &str) -> Option<&UseInputType> {
        self.use_input_type.iter().find(|u| type_name.contains(&u.type_fragment))
    }
}

pub fn to_boolean(value: &str) -> bool {
    matches!(value, "true" | "1" | "on")
}

/// Sanitize every path segment, collapse `..` and duplicate separators.
pub fn sanitize_file_pattern(pattern: &str) -> String {
    let joined = pattern
        .split('/')
        .map(sanitize_segment)
        .collect::<Vec<_>>()
        .join("/")
        .replace("..", "/");
    let mut collapsed = String::with_capacity(joined.len());
    for c in joined.chars() {
        if c == '/' && collapsed.ends_with('/') {
            continue;
        }
        collapsed.push(c);
    }
    collapsed.trim_matches('/').to_string()
}

fn default_import(node: &ConfigNode) -> Option<DefaultImport> {
    let value = node.value("defaultImport")?;
    if to_boolean(value) {
        Some(DefaultImport::SameName)
    } else {
        Some(DefaultImport::Named(value.to_string()))
    }
}

fn import_spec(node: &ConfigNode, section: &str) -> Result<ImportSpec> {
    match (node.value("from"), node.value("name")) {
        (Some(from), Some(name)) if !from.is_empty() && !name.is_empty() => Ok(ImportSpec {
            name: name.to_string(),
            from: from.to_string(),
            named_import: node.flag("namedImport"),
            default_import: default_import(node),
            namespace_import: node.value("namespaceImport").map(str::to_string),
            type_only: false,
        }),
        _ => Err(GeneratorError::configuration(format!(
            "Missed 'from' or 'name' part in configuration for {section}"
        ))),
    }
}

fn decorate_arguments(text: &str) -> Result<Vec<String>> {
    match parse_literal(text).map_err(GeneratorError::Configuration)? {
        Literal::Array(items) => Ok(items
            .into_iter()
            .map(|item| match item {
                Literal::String(s) => s,
                other => other.to_source(),
            })
            .collect()),
        other => Err(GeneratorError::configuration(format!(
            "decorate arguments must be an array, got {other}"
        ))),
    }
}

/// Sort numbered rule keys (`1`, `2`, `10`) numerically.
fn numbered<'a>(mut entries: Vec<(&'a str, &'a ConfigNode)>) -> Vec<(&'a str, &'a ConfigNode)> {
    entries.sort_by_key(|(key, _)| (key.parse::<u64>().unwrap_or(u64::MAX), key.to_string()));
    entries
}

/// Unflattened view of the raw options.
#[derive(Debug, Clone, PartialEq)]
enum ConfigNode {
    Value(RawValue),
    Branch(BTreeMap<String, ConfigNode>),
}

impl ConfigNode {
    fn unflatten(raw: &RawConfig) -> Self {
        let mut root = BTreeMap::new();
        for (key, value) in raw {
            let segments: Vec<&str> = key.split('_').filter(|s| !s.is_empty()).collect();
            if segments.is_empty() {
                continue;
            }
            insert(&mut root, &segments, value.clone());
        }
        ConfigNode::Branch(root)
    }

    fn get(&self, key: &str) -> Option<&ConfigNode> {
        match self {
            ConfigNode::Branch(map) => map.get(key),
            ConfigNode::Value(_) => None,
        }
    }

    fn as_value(&self) -> Option<&str> {
        match self {
            ConfigNode::Value(v) => v.first(),
            ConfigNode::Branch(_) => None,
        }
    }

    fn value(&self, key: &str) -> Option<&str> {
        self.get(key)?.as_value()
    }

    fn flag(&self, key: &str) -> bool {
        self.value(key).map(to_boolean).unwrap_or(false)
    }

    fn entries(&self) -> Vec<(&str, &ConfigNode)> {
        match self {
            ConfigNode::Branch(map) => map.iter().map(|(k, v)| (k.as_str(), v)).collect(),
            ConfigNode::Value(_) => Vec::new(),
        }
    }

    fn children(&self, key: &str) -> Vec<(&str, &ConfigNode)> {
        self.get(key).map(ConfigNode::entries).unwrap_or_default()
    }
}

fn insert(map: &mut BTreeMap<String, ConfigNode>, segments: &[&str], value: RawValue) {
    let (head, rest) = match segments.split_first() {
        Some(split) => split,
        None => return,
    };
    if rest.is_empty() {
        map.entry(head.to_string()).or_insert(ConfigNode::Value(value));
        return;
    }
    let node = map
        .entry(head.to_string())
        .or_insert_with(|| ConfigNode::Branch(BTreeMap::new()));
    if let ConfigNode::Value(_) = node {
        tracing::warn!("[PNGC] Configuration key '{}' is both a value and a section", head);
        return;
    }
    if let ConfigNode::Branch(children) = node {
        insert(children, rest, value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn raw(pairs: &[(&str, &str)]) -> RawConfig {
        pairs.iter().map(|(k, v)| (k.to_string(), RawValue::from(*v))).collect()
    }

    #[test]
    fn test_defaults() {
        let config = Config::from_raw(&RawConfig::new()).unwrap();
        assert_eq!(config.output_file_pattern, "{model}/{name}.{type}.ts");
        assert_eq!(config.prisma_client_import, "@prisma/client");
        assert_eq!(config.re_export, ReExport::None);
        assert_eq!(config.emit_blocks, EmitBlocks::default());
        assert!(!config.lazy_binding);
        assert!(config.warnings.is_empty());
    }

    #[test]
    fn test_toggles() {
        let config = Config::from_raw(&raw(&[
            ("esmCompatible", "true"),
            ("noAtomicOperations", "1"),
            ("combineScalarFilters", "on"),
            ("purgeOutput", "yes"),
        ]))
        .unwrap();
        assert!(config.lazy_binding);
        assert!(config.no_atomic_operations);
        assert!(config.combine_scalar_filters);
        assert!(!config.purge_output);
    }

    #[test]
    fn test_field_namespace() {
        let config = Config::from_raw(&raw(&[
            ("fields_Validator_from", "class-validator"),
            ("fields_Validator_input", "true"),
        ]))
        .unwrap();
        let ns = &config.fields["Validator"];
        assert_eq!(ns.from.as_deref(), Some("class-validator"));
        assert!(ns.input);
        assert!(!ns.output);
    }

    #[test]
    fn test_invalid_file_pattern_is_sanitized_with_warning() {
        let config = Config::from_raw(&raw(&[("outputFilePattern", "{model}//{name}:{type}.ts")])).unwrap();
        assert_eq!(config.output_file_pattern, "{model}/{name}-{type}.ts");
        assert_eq!(
            config.warnings,
            vec!["Due to invalid filepath 'outputFilePattern' changed to '{model}/{name}-{type}.ts'".to_string()]
        );
    }

    #[test]
    fn test_decorate_rules_sorted_and_parsed() {
        let config = Config::from_raw(&raw(&[
            ("decorate_10_type", "*CreateInput"),
            ("decorate_10_field", "email"),
            ("decorate_10_from", "class-validator"),
            ("decorate_10_name", "IsEmail"),
            ("decorate_2_type", "*Args"),
            ("decorate_2_field", "@(data|where)"),
            ("decorate_2_from", "class-validator"),
            ("decorate_2_name", "ValidateNested"),
            ("decorate_2_arguments", "['{propertyType.0}', 1]"),
        ]))
        .unwrap();
        assert_eq!(config.decorate.len(), 2);
        assert_eq!(config.decorate[0].name(), "ValidateNested");
        assert_eq!(
            config.decorate[0].arguments,
            Some(vec!["{propertyType.0}".to_string(), "1".to_string()])
        );
        assert!(config.decorate[0].is_match("UserFindManyArgs", "where"));
        assert!(config.decorate[1].is_match("UserCreateInput", "email"));
        assert!(!config.decorate[1].is_match("UserUpdateInput", "email"));
    }

    #[test]
    fn test_decorate_missing_from_is_error() {
        let err = Config::from_raw(&raw(&[("decorate_1_name", "IsEmail")])).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Configuration error: Missed 'from' or 'name' part in configuration for decorate"
        );
    }

    #[test]
    fn test_custom_import_missing_name_is_error() {
        assert!(Config::from_raw(&raw(&[("customImport_1_from", "x")])).is_err());
    }

    #[test]
    fn test_emit_blocks_expand_dependencies() {
        let mut input = RawConfig::new();
        input.insert("emitBlocks".into(), RawValue::List(vec!["args".into(), "bogus".into()]));
        let config = Config::from_raw(&input).unwrap();
        assert!(config.emit_blocks.args);
        assert!(config.emit_blocks.inputs);
        assert!(config.emit_blocks.prisma_enums);
        assert!(!config.emit_blocks.models);
        assert!(!config.emit_blocks.outputs);
    }

    #[test]
    fn test_re_export_all_is_deprecated() {
        let config = Config::from_raw(&raw(&[("reExportAll", "true")])).unwrap();
        assert_eq!(config.re_export, ReExport::All);
        assert_eq!(config.warnings.len(), 1);
    }

    #[test]
    fn test_use_input_type_and_scalars() {
        let config = Config::from_raw(&raw(&[
            ("useInputType_WhereInput_ALL", "WhereInput"),
            ("useInputType_CreateInput_author", "match:*CreateNested*"),
            ("graphqlScalars_BigInt_name", "GraphQLBigInt"),
            ("graphqlScalars_BigInt_specifier", "graphql-scalars"),
        ]))
        .unwrap();
        let where_input = config.use_input_type_for("UserWhereInput").unwrap();
        assert_eq!(where_input.pattern_for("anything"), Some("WhereInput"));
        let create = config.use_input_type_for("PostCreateInput").unwrap();
        assert_eq!(create.pattern_for("author"), Some("match:*CreateNested*"));
        assert_eq!(create.pattern_for("title"), None);
        assert_eq!(config.graphql_scalars["BigInt"].name, "GraphQLBigInt");
    }
}
