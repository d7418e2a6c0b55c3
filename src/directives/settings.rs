//! Structured directives and the per-field [`ObjectSettings`] built from a
//! documentation comment.

use super::literal::{parse_args, split_arguments, Literal};
use super::matcher::NameMatcher;
use super::parser::{parse_line, DirectiveLine};
use crate::config::{Config, FieldNamespace};
use crate::emitter::{DefaultImport, ImportSpec};
use crate::error::{GeneratorError, Result};
use regex::Regex;

pub const NESTJS_GRAPHQL: &str = "@nestjs/graphql";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DirectiveKind {
    HideField,
    FieldType,
    PropertyType,
    /// Options folded into the field's own `@Field()` (deprecation, complexity).
    Field,
    ObjectType,
    Decorator,
}

/// Where a field is being emitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmissionContext {
    Input,
    Output,
    Model,
}

#[derive(Debug, Clone)]
pub struct Directive {
    pub kind: DirectiveKind,
    /// Decorator or type name, e.g. `Validator.MaxLength` or `GraphQLJSON`.
    pub name: String,
    pub input: bool,
    pub output: bool,
    pub model: bool,
    pub field_match: Option<NameMatcher>,
    pub from: Option<String>,
    pub named_import: bool,
    pub default_import: Option<DefaultImport>,
    pub namespace_import: Option<String>,
    /// Decorator arguments keep their source text as [`Literal::Raw`];
    /// `Field` and `ObjectType` carry a single options object.
    pub arguments: Vec<Literal>,
}

impl Directive {
    fn new(kind: DirectiveKind, name: impl Into<String>) -> Self {
        Self {
            kind,
            name: name.into(),
            input: false,
            output: false,
            model: false,
            field_match: None,
            from: None,
            named_import: false,
            default_import: None,
            namespace_import: None,
            arguments: Vec::new(),
        }
    }

    pub fn applies_in(&self, context: EmissionContext) -> bool {
        match context {
            EmissionContext::Input => self.input,
            EmissionContext::Output => self.output,
            EmissionContext::Model => self.output || self.model,
        }
    }

    fn matches_field(&self, field_name: &str) -> bool {
        self.field_match.as_ref().map(|m| m.is_match(field_name)).unwrap_or(true)
    }

    /// Argument source fragments as written in the comment.
    pub fn argument_sources(&self) -> Vec<String> {
        self.arguments.iter().map(Literal::to_source).collect()
    }

    pub fn options(&self) -> Option<&Literal> {
        self.arguments.first().filter(|l| matches!(l, Literal::Object(_)))
    }

    /// Import that brings this directive's name into scope.
    pub fn import_spec(&self) -> Result<ImportSpec> {
        let from = self.from.clone().filter(|f| !f.is_empty()).ok_or_else(|| {
            GeneratorError::configuration(format!(
                "Missed 'from' part in configuration or field setting for '{}'",
                self.name
            ))
        })?;
        Ok(ImportSpec {
            name: self.name.clone(),
            from,
            named_import: self.named_import,
            default_import: self.default_import.clone(),
            namespace_import: self.namespace_import.clone(),
            type_only: false,
        })
    }

    fn apply_namespace(&mut self, namespace: &FieldNamespace) {
        self.input = namespace.input;
        self.output = namespace.output;
        self.model = namespace.model;
        if namespace.from.is_some() {
            self.from = namespace.from.clone();
        }
        if namespace.default_import.is_some() {
            self.default_import = namespace.default_import.clone();
        }
        if namespace.namespace_import.is_some() {
            self.namespace_import = namespace.namespace_import.clone();
        }
    }
}

/// All directives attached to one field or model.
#[derive(Debug, Clone, Default)]
pub struct ObjectSettings {
    directives: Vec<Directive>,
}

impl ObjectSettings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, directive: Directive) {
        let single_valued = matches!(directive.kind, DirectiveKind::FieldType | DirectiveKind::PropertyType);
        if single_valued {
            if let Some(existing) = self.directives.iter_mut().find(|d| d.kind == directive.kind) {
                *existing = directive;
                return;
            }
        }
        self.directives.push(directive);
    }

    pub fn iter(&self) -> impl Iterator<Item = &Directive> {
        self.directives.iter()
    }

    pub fn len(&self) -> usize {
        self.directives.len()
    }

    pub fn is_empty(&self) -> bool {
        self.directives.is_empty()
    }

    fn find(&self, kind: DirectiveKind) -> Option<&Directive> {
        self.directives.iter().find(|d| d.kind == kind)
    }

    pub fn should_hide_field(&self, context: EmissionContext, field_name: &str) -> bool {
        let Some(hide) = self.find(DirectiveKind::HideField) else {
            return false;
        };
        let by_context = match context {
            EmissionContext::Input => hide.input,
            EmissionContext::Output | EmissionContext::Model => hide.output,
        };
        by_context || hide.field_match.as_ref().map(|m| m.is_match(field_name)).unwrap_or(false)
    }

    pub fn field_type(&self, context: EmissionContext, field_name: &str) -> Option<&Directive> {
        self.override_for(DirectiveKind::FieldType, context, field_name)
    }

    pub fn property_type(&self, context: EmissionContext, field_name: &str) -> Option<&Directive> {
        self.override_for(DirectiveKind::PropertyType, context, field_name)
    }

    fn override_for(&self, kind: DirectiveKind, context: EmissionContext, field_name: &str) -> Option<&Directive> {
        let directive = self.find(kind)?;
        match &directive.field_match {
            Some(matcher) => matcher.is_match(field_name).then_some(directive),
            None => directive.applies_in(context).then_some(directive),
        }
    }

    /// Extra `@Field()` options such as `deprecationReason` and `complexity`.
    pub fn field_arguments(&self) -> Option<&Literal> {
        self.find(DirectiveKind::Field).and_then(Directive::options)
    }

    /// `@ObjectType()` arguments: an optional name followed by the options
    /// object, which is left out when empty.
    pub fn object_type_arguments(&self, base: Literal) -> Vec<String> {
        let mut options = base;
        let mut name = None;
        if let Some(mut custom) = self.find(DirectiveKind::ObjectType).and_then(Directive::options).cloned() {
            name = custom.remove("name").and_then(|n| n.as_str().map(str::to_string));
            options.merge(&custom);
        }
        let mut out = Vec::new();
        if let Some(name) = name.filter(|n| !n.is_empty()) {
            out.push(Literal::String(name).to_string());
        }
        if !options.is_empty_object() {
            out.push(options.to_string());
        }
        out
    }

    /// Decorator directives to emit on a field in `context`.
    pub fn decorators<'a>(&'a self, context: EmissionContext, field_name: &'a str) -> impl Iterator<Item = &'a Directive> + 'a {
        self.directives.iter().filter(move |d| {
            d.kind == DirectiveKind::Decorator && d.applies_in(context) && d.matches_field(field_name)
        })
    }
}

/// Result of parsing one documentation comment.
#[derive(Debug, Clone, Default)]
pub struct ParsedComment {
    pub documentation: String,
    pub settings: ObjectSettings,
}

/// Split a documentation comment into plain documentation and directives.
pub fn parse_directives(text: &str, config: &Config) -> Result<ParsedComment> {
    let mut documentation = Vec::new();
    let mut settings = ObjectSettings::new();

    for line in text.split('\n') {
        match parse_line(line) {
            None => {
                if !line.trim().is_empty() {
                    documentation.push(line.trim_end_matches('\r'));
                }
            }
            Some(DirectiveLine::Deprecated(reason)) => {
                field_options(&mut settings).set("deprecationReason", Literal::string(reason));
            }
            Some(DirectiveLine::Complexity(value)) => {
                let complexity = leading_integer(value).filter(|n| *n >= 1).unwrap_or(1);
                field_options(&mut settings).set("complexity", Literal::Number(complexity.to_string()));
            }
            Some(DirectiveLine::Call { name, args, .. }) => {
                let directive = build_directive(name, args, line, config)?;
                settings.push(directive);
            }
        }
    }

    Ok(ParsedComment {
        documentation: documentation.join("\n"),
        settings,
    })
}

fn field_options(settings: &mut ObjectSettings) -> &mut Literal {
    let index = match settings.directives.iter().position(|d| d.kind == DirectiveKind::Field) {
        Some(index) => index,
        None => {
            let mut field = Directive::new(DirectiveKind::Field, "");
            field.arguments.push(Literal::object());
            settings.directives.push(field);
            settings.directives.len() - 1
        }
    };
    let directive = &mut settings.directives[index];
    if directive.arguments.is_empty() {
        directive.arguments.push(Literal::object());
    }
    &mut directive.arguments[0]
}

fn leading_integer(text: &str) -> Option<i64> {
    let text = text.trim();
    let end = text
        .char_indices()
        .find(|(i, c)| !(c.is_ascii_digit() || (*i == 0 && (*c == '-' || *c == '+'))))
        .map(|(i, _)| i)
        .unwrap_or(text.len());
    text[..end].parse().ok()
}

fn namespace_of(name: &str) -> Option<&str> {
    name.split_once('.').map(|(ns, _)| ns)
}

fn build_directive(name: &str, args: &str, line: &str, config: &Config) -> Result<Directive> {
    let invalid = |message: String| GeneratorError::Directive {
        line: line.trim().to_string(),
        message,
    };

    match name {
        "HideField" | "TypeGraphQL.omit" => hide_field(args, &invalid),
        "FieldType" | "PropertyType" => {
            let kind = if name == "FieldType" {
                DirectiveKind::FieldType
            } else {
                DirectiveKind::PropertyType
            };
            custom_type(kind, args, config, &invalid)
        }
        "ObjectType" => {
            let mut directive = Directive::new(DirectiveKind::ObjectType, "ObjectType");
            directive.from = Some(NESTJS_GRAPHQL.to_string());
            let parsed = parse_args(args).map_err(invalid)?;
            let mut options = Literal::object();
            for item in &parsed {
                match item {
                    Literal::String(s) if !s.is_empty() => options.set("name", item.clone()),
                    Literal::Object(_) => {
                        for key in ["name", "isAbstract"] {
                            if let Some(value) = item.get(key) {
                                options.set(key, value.clone());
                            }
                        }
                    }
                    _ => {}
                }
            }
            directive.arguments.push(options);
            Ok(directive)
        }
        "Directive" => {
            let mut directive = Directive::new(DirectiveKind::Decorator, "Directive");
            directive.model = true;
            directive.output = true;
            directive.from = Some(NESTJS_GRAPHQL.to_string());
            directive.arguments = split_arguments(args).into_iter().map(Literal::Raw).collect();
            Ok(directive)
        }
        _ => {
            let mut directive = Directive::new(DirectiveKind::Decorator, name);
            directive.arguments = split_arguments(args).into_iter().map(Literal::Raw).collect();
            let namespace = namespace_of(name).unwrap_or(name);
            if namespace_of(name).is_some() {
                directive.namespace_import = Some(namespace.to_string());
            }
            if let Some(ns) = config.fields.get(namespace) {
                directive.apply_namespace(ns);
            }
            Ok(directive)
        }
    }
}

fn hide_field(args: &str, invalid: &dyn Fn(String) -> GeneratorError) -> Result<Directive> {
    let mut directive = Directive::new(DirectiveKind::HideField, "HideField");
    directive.from = Some(NESTJS_GRAPHQL.to_string());

    if args.is_empty() {
        directive.output = true;
        return Ok(directive);
    }
    if args.contains('{') && args.contains('}') {
        let parsed = parse_args(args).map_err(invalid)?;
        let options = parsed.first().cloned().unwrap_or_else(Literal::object);
        directive.output = options.get("output").and_then(Literal::as_bool).unwrap_or(false);
        directive.input = options.get("input").and_then(Literal::as_bool).unwrap_or(false);
        directive.field_match = match_option(&options)?;
    } else {
        // `TypeGraphQL.omit(output: true)` style flags.
        directive.output = Regex::new(r"output:\s*true")?.is_match(args);
        directive.input = Regex::new(r"input:\s*true")?.is_match(args);
    }
    Ok(directive)
}

fn custom_type(
    kind: DirectiveKind,
    args: &str,
    config: &Config,
    invalid: &dyn Fn(String) -> GeneratorError,
) -> Result<Directive> {
    let parsed = parse_args(args).map_err(invalid)?;
    let options = match parsed.into_iter().next() {
        Some(Literal::String(name)) => {
            let mut options = Literal::object();
            options.set("name", Literal::String(name));
            options
        }
        Some(object @ Literal::Object(_)) => object,
        _ => return Err(invalid("expected a type name or an options object".to_string())),
    };
    let name = options
        .get("name")
        .and_then(Literal::as_str)
        .ok_or_else(|| invalid("missing 'name'".to_string()))?;

    let mut directive = Directive::new(kind, name);
    let namespace = namespace_of(name);
    match namespace.and_then(|ns| config.fields.get(ns)) {
        Some(ns) => directive.apply_namespace(ns),
        None => {
            directive.input = true;
            directive.output = true;
        }
    }
    if let Some(ns) = namespace {
        directive.namespace_import = Some(ns.to_string());
    }
    if let Some(from) = options.get("from").and_then(Literal::as_str) {
        directive.from = Some(from.to_string());
    }
    if let Some(input) = options.get("input").and_then(Literal::as_bool) {
        directive.input = input;
    }
    if let Some(output) = options.get("output").and_then(Literal::as_bool) {
        directive.output = output;
    }
    if let Some(model) = options.get("model").and_then(Literal::as_bool) {
        directive.model = model;
    }
    if let Some(ns) = options.get("namespaceImport").and_then(Literal::as_str) {
        directive.namespace_import = Some(ns.to_string());
    }
    match options.get("defaultImport") {
        Some(Literal::Bool(true)) => directive.default_import = Some(DefaultImport::SameName),
        Some(Literal::String(s)) => directive.default_import = Some(DefaultImport::Named(s.clone())),
        _ => {}
    }
    if let Some(named) = options.get("namedImport").and_then(Literal::as_bool) {
        directive.named_import = named;
    }
    directive.field_match = match_option(&options)?;
    Ok(directive)
}

fn match_option(options: &Literal) -> Result<Option<NameMatcher>> {
    match options.get("match") {
        Some(Literal::String(pattern)) => Ok(Some(NameMatcher::new(pattern)?)),
        Some(Literal::Array(items)) => {
            let patterns: Vec<&str> = items.iter().filter_map(Literal::as_str).collect();
            Ok(Some(NameMatcher::from_sources(&patterns)?))
        }
        _ => Ok(None),
    }
}
