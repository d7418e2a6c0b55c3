//! `ModelOutputType`: the `@ObjectType()` class of a model.

use super::{
    apply_decorate_rules, apply_directive_decorators, class_imports, field_options, hide_field, import_binding,
    property_structure, write_class,
};
use crate::codegen::create_comment;
use crate::directives::{EmissionContext, Literal, ObjectSettings};
use crate::emitter::{ClassDeclaration, Decorator};
use crate::error::{GeneratorError, Result};
use crate::naming::{is_many_and_return, output_type_name};
use crate::pipeline::{ClassPropertyEvent, EventBus, GenerationContext};
use crate::resolver::{resolve_field_binding, FieldRequest};
use crate::schema::{Field, OutputType};
use std::collections::BTreeMap;

pub fn model_output_type(output: &mut OutputType, ctx: &mut GenerationContext<'_>, bus: &EventBus) -> Result<()> {
    if is_many_and_return(&output.name) {
        return Ok(());
    }
    let config = ctx.config;
    let model = ctx
        .models
        .get(&output.name)
        .cloned()
        .ok_or_else(|| GeneratorError::MissingModel(output.name.clone()))?;
    let name = output.name.clone();
    let path = ctx.file_path(&name, "model");
    let model_settings: Option<ObjectSettings> = ctx.model_settings.get(&model.name).cloned();
    let field_settings: BTreeMap<String, ObjectSettings> =
        ctx.field_settings.get(&model.name).cloned().unwrap_or_default();

    let mut imports = class_imports(config, &path, "ObjectType");
    let mut class = ClassDeclaration::new(&name);

    let mut base = Literal::object();
    if let Some(documentation) = model.documentation.as_deref() {
        base.set("description", Literal::string(documentation));
        class.docs = Some(create_comment(documentation, model_settings.as_ref()));
    }
    let object_type_arguments = match &model_settings {
        Some(settings) => settings.object_type_arguments(base),
        None if base.is_empty_object() => Vec::new(),
        None => vec![base.to_string()],
    };
    class.decorators.push(Decorator::new("ObjectType", object_type_arguments));
    apply_directive_decorators(
        model_settings.as_ref(),
        EmissionContext::Model,
        &name,
        &mut class.decorators,
        &mut imports,
    )?;

    for field in output.fields.iter_mut() {
        if config.omit_models_count && field.name == "_count" {
            continue;
        }
        if !ctx.is_model(&field.output_type.type_name) {
            field.output_type.type_name = output_type_name(&field.output_type.type_name);
        }
        let type_ref = field.output_type.clone();
        let model_field = model.field(&field.name);
        let settings = field_settings.get(&field.name);
        let customs_applicable = model_field.map(|f| f.type_name == type_ref.type_name).unwrap_or(false);

        let request = FieldRequest {
            owner: &name,
            field_name: &field.name,
            type_ref: &type_ref,
            context: EmissionContext::Model,
            settings,
            source_path: &path,
            customs_applicable,
            is_id: model_field.map(|f| f.is_id).unwrap_or(false),
            at_least_keys: None,
        };
        let binding = {
            let is_model = |n: &str| ctx.is_model(n);
            let locate = |n: &str, file_type: &str| ctx.file_path(n, file_type);
            resolve_field_binding(&request, &ctx.circular, config, &is_model, &locate)?
        };

        let mut property_types: Vec<String> = binding.property_types.iter().take(1).cloned().collect();
        if field.is_nullable && !binding.is_list {
            property_types.push("null".to_string());
        }
        let mut property = property_structure(
            &field.name,
            &property_types,
            binding.is_list,
            field.is_nullable,
            Some(false),
            Some(true),
        );
        if let Some(documentation) = model_field.and_then(|f| f.documentation.as_deref()) {
            property.docs = Some(create_comment(documentation, settings));
        }
        import_binding(&mut imports, &binding, config, &path);

        if binding.hidden {
            hide_field(&mut property, &mut imports);
        } else {
            let mut options = field_options(settings);
            options.set("nullable", Literal::Bool(field.is_nullable));
            if let Some(default) = model_field.and_then(default_value) {
                options.set("defaultValue", default);
            }
            if let Some(documentation) = model_field.and_then(|f| f.documentation.as_deref()) {
                options.set("description", Literal::string(documentation));
            }
            property
                .decorators
                .push(Decorator::new("Field", vec![binding.type_expression(), options.to_string()]));

            if customs_applicable {
                apply_directive_decorators(
                    settings,
                    EmissionContext::Model,
                    &field.name,
                    &mut property.decorators,
                    &mut imports,
                )?;
            }
            apply_decorate_rules(config, &name, &field.name, &property_types, &mut property, &mut imports);
        }

        let mut property_event = ClassPropertyEvent {
            property,
            location: type_ref.location,
            is_list: type_ref.is_list,
            property_types,
        };
        bus.emit_class_property(&mut property_event, ctx)?;
        class.properties.push(property_event.property);
    }

    write_class(ctx, &path, &imports, class);
    Ok(())
}

/// Scalar `@default(...)` values usable as `defaultValue`. Functions such as
/// `autoincrement()` arrive as objects and are skipped.
fn default_value(field: &Field) -> Option<Literal> {
    if field.is_list {
        return None;
    }
    match field.default.as_ref()? {
        serde_json::Value::Bool(b) => Some(Literal::Bool(*b)),
        serde_json::Value::Number(n) => Some(Literal::Number(n.to_string())),
        serde_json::Value::String(s) => Some(Literal::String(s.clone())),
        _ => None,
    }
}
