//! # Phase Handlers
//!
//! Listeners that turn schema entities into generated files. [`register`]
//! subscribes them according to the configured emit blocks; the helpers
//! below are shared by the class-emitting handlers.

pub mod aggregate_input;
pub mod args_type;
pub mod generate_files;
pub mod input_type;
pub mod model_data;
pub mod model_output_type;
pub mod output_type;
pub mod register_enum;
pub mod runtime;
pub mod warning;

use crate::config::Config;
use crate::directives::{EmissionContext, Literal, ObjectSettings, NESTJS_GRAPHQL};
use crate::emitter::{ClassDeclaration, Decorator, ImportDeclarationMap, Property, Statement};
use crate::error::Result;
use crate::naming::{interpolate, relative_path};
use crate::pipeline::{EventBus, GenerationContext};
use crate::resolver::Binding;

pub const CLASS_TRANSFORMER: &str = "class-transformer";

pub fn register(bus: &mut EventBus, config: &Config) {
    let blocks = config.emit_blocks;
    bus.on_warning(warning::warning);
    bus.on_model(model_data::model_data);
    if blocks.prisma_enums || blocks.schema_enums {
        bus.on_enum_type(register_enum::register_enum);
    }
    if blocks.outputs || (blocks.models && !config.omit_models_count) {
        bus.on_output_type(output_type::output_type);
    }
    if blocks.models {
        bus.on_model_output_type(model_output_type::model_output_type);
    }
    if blocks.outputs {
        bus.on_aggregate_output(aggregate_input::aggregate_input);
    }
    if blocks.inputs {
        bus.on_input_type(input_type::input_type);
    }
    if blocks.args {
        bus.on_args_type(args_type::args_type);
    }
    bus.on_generate_files(generate_files::generate_files);
}

/// Property with `name: A | B`, list types wrapped as `Array<T>`. The
/// question token defaults to `is_nullable`, the exclamation token to its
/// negation.
pub fn property_structure(
    name: &str,
    property_types: &[String],
    is_list: bool,
    is_nullable: bool,
    question: Option<bool>,
    exclamation: Option<bool>,
) -> Property {
    let type_text = property_types
        .iter()
        .map(|t| if is_list { format!("Array<{t}>") } else { t.clone() })
        .collect::<Vec<_>>()
        .join(" | ");
    let mut property = Property::new(name, type_text);
    property.has_question_token = question.unwrap_or(is_nullable);
    property.has_exclamation_token = exclamation.unwrap_or(!is_nullable);
    property
}

/// Imports every class file starts with.
pub fn class_imports(config: &Config, path: &str, class_decorator: &str) -> ImportDeclarationMap {
    let mut imports = ImportDeclarationMap::new();
    imports.add("Field", NESTJS_GRAPHQL);
    imports.add(class_decorator, NESTJS_GRAPHQL);
    if config.lazy_binding {
        imports.add("registerType", &relative_path(path, runtime::TYPE_REGISTRY_FILE));
    }
    imports
}

/// Imports a resolved binding needs: its property type, its wire type and
/// `getType` for deferred references.
pub fn import_binding(imports: &mut ImportDeclarationMap, binding: &Binding, config: &Config, path: &str) {
    match &binding.property_import {
        Some(spec) => imports.create(spec),
        None if binding.uses_prisma_namespace() => imports.add("Prisma", &config.prisma_client_import),
        None => {}
    }
    if let Some(spec) = &binding.graphql_import {
        if spec.type_only {
            imports.add_type(&spec.name, &spec.from);
        } else {
            imports.create(spec);
        }
    }
    if binding.is_deferred() {
        imports.add("getType", &relative_path(path, runtime::TYPE_REGISTRY_FILE));
    }
}

/// `@Field()` options from the field's directives.
pub fn field_options(settings: Option<&ObjectSettings>) -> Literal {
    settings
        .and_then(ObjectSettings::field_arguments)
        .cloned()
        .unwrap_or_else(Literal::object)
}

pub fn hide_field(property: &mut Property, imports: &mut ImportDeclarationMap) {
    imports.add("HideField", NESTJS_GRAPHQL);
    property.decorators.push(Decorator::new("HideField", Vec::new()));
}

/// Decorator directives applicable in `context`.
pub fn apply_directive_decorators(
    settings: Option<&ObjectSettings>,
    context: EmissionContext,
    field: &str,
    decorators: &mut Vec<Decorator>,
    imports: &mut ImportDeclarationMap,
) -> Result<()> {
    let Some(settings) = settings else {
        return Ok(());
    };
    for directive in settings.decorators(context, field) {
        decorators.push(Decorator::new(directive.name.clone(), directive.argument_sources()));
        imports.create(&directive.import_spec()?);
    }
    Ok(())
}

/// `decorate_<n>` rules matching `owner.field`.
pub fn apply_decorate_rules(
    config: &Config,
    owner: &str,
    field: &str,
    property_types: &[String],
    property: &mut Property,
    imports: &mut ImportDeclarationMap,
) {
    for rule in config.decorate.iter().filter(|d| d.is_match(owner, field)) {
        let arguments = rule
            .arguments
            .as_ref()
            .map(|templates| templates.iter().map(|t| with_property_type(t, property_types)).collect())
            .unwrap_or_default();
        property.decorators.push(Decorator::new(rule.name(), arguments));
        imports.create(&rule.import);
    }
}

fn with_property_type(template: &str, property_types: &[String]) -> String {
    interpolate(template, |key| match key {
        "propertyType" => Some(property_types.join(",")),
        _ => key
            .strip_prefix("propertyType.")
            .and_then(|index| index.parse::<usize>().ok())
            .and_then(|index| property_types.get(index).cloned()),
    })
}

/// Write a class file. In lazy mode the class registers itself.
pub fn write_class(ctx: &mut GenerationContext<'_>, path: &str, imports: &ImportDeclarationMap, class: ClassDeclaration) {
    let name = class.name.clone();
    let mut statements = imports.to_statements();
    statements.push(Statement::Class(class));
    if ctx.config.lazy_binding {
        statements.push(Statement::Raw(format!("registerType('{name}', {name});")));
    }
    ctx.project.set_statements(path, statements);
    tracing::debug!("[PNGC] Generated {} ({})", name, path);
}
