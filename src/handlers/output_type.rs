//! `OutputType`: `@ObjectType()` classes for non-model outputs (aggregates,
//! counts, batch payloads).

use super::{
    apply_directive_decorators, class_imports, field_options, hide_field, import_binding, property_structure,
    write_class,
};
use crate::directives::{EmissionContext, Literal, ObjectSettings};
use crate::emitter::{ClassDeclaration, Decorator};
use crate::error::Result;
use crate::naming::output_type_name;
use crate::pipeline::{ClassPropertyEvent, EventBus, GenerationContext};
use crate::resolver::{resolve_field_binding, FieldRequest};
use crate::schema::{OutputType, TypeRef};
use regex::Regex;
use std::collections::BTreeMap;

pub fn output_type(output: &mut OutputType, ctx: &mut GenerationContext<'_>, bus: &EventBus) -> Result<()> {
    let config = ctx.config;
    let aggregate = Regex::new(r"(?:Count|Avg|Sum|Min|Max)AggregateOutputType$")?;

    let model = ctx.model_for(&output.name).cloned();
    let is_aggregate = model
        .as_ref()
        .map(|m| aggregate.is_match(&output.name) && output.name.starts_with(&m.name))
        .unwrap_or(false);
    let is_count = model
        .as_ref()
        .map(|m| output.name == format!("{}CountOutputType", m.name))
        .unwrap_or(false);

    if !config.emit_blocks.outputs && !is_count {
        return Ok(());
    }

    output.name = output_type_name(&output.name);
    if is_aggregate {
        bus.emit_aggregate_output(output, ctx)?;
    }

    let name = output.name.clone();
    let path = ctx.file_path(&name, "output");
    let field_settings: BTreeMap<String, ObjectSettings> = match (&model, is_count) {
        (Some(m), false) => ctx.field_settings.get(&m.name).cloned().unwrap_or_default(),
        _ => BTreeMap::new(),
    };

    let mut imports = class_imports(config, &path, "ObjectType");
    let mut class = ClassDeclaration::new(&name);
    class.decorators.push(Decorator::new("ObjectType", Vec::new()));

    for field in output.fields.iter_mut() {
        let reference = output_type_name(&field.output_type.type_name);
        field.output_type.type_name = reference.clone();
        let type_ref: TypeRef = field.output_type.clone();
        let settings = field_settings.get(&field.name);
        let customs_applicable = model
            .as_ref()
            .and_then(|m| m.field(&field.name))
            .map(|f| f.type_name == reference)
            .unwrap_or(false);

        let request = FieldRequest {
            owner: &name,
            field_name: &field.name,
            type_ref: &type_ref,
            context: EmissionContext::Output,
            settings,
            source_path: &path,
            customs_applicable,
            is_id: false,
            at_least_keys: None,
        };
        let binding = {
            let is_model = |n: &str| ctx.is_model(n);
            let locate = |n: &str, file_type: &str| ctx.file_path(n, file_type);
            resolve_field_binding(&request, &ctx.circular, config, &is_model, &locate)?
        };

        let mut property = property_structure(
            &field.name,
            &binding.property_types,
            binding.is_list,
            field.is_nullable,
            is_count.then_some(true),
            None,
        );
        import_binding(&mut imports, &binding, config, &path);

        if binding.hidden {
            hide_field(&mut property, &mut imports);
        } else {
            let mut options = field_options(settings);
            options.set("nullable", Literal::Bool(field.is_nullable));
            property
                .decorators
                .push(Decorator::new("Field", vec![binding.type_expression(), options.to_string()]));
            if customs_applicable {
                apply_directive_decorators(
                    settings,
                    EmissionContext::Output,
                    &field.name,
                    &mut property.decorators,
                    &mut imports,
                )?;
            }
        }

        let mut property_event = ClassPropertyEvent {
            property,
            location: type_ref.location,
            is_list: type_ref.is_list,
            property_types: binding.property_types,
        };
        bus.emit_class_property(&mut property_event, ctx)?;
        class.properties.push(property_event.property);
    }

    write_class(ctx, &path, &imports, class);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Config, RawConfig};
    use crate::emitter::InMemoryEmitter;
    use crate::handlers::aggregate_input::aggregate_input;
    use crate::handlers::input_type::input_type;
    use crate::schema::{Document, Field, FieldLocation, Model, SchemaField};

    fn scalar_field(name: &str, type_name: &str, nullable: bool) -> SchemaField {
        SchemaField {
            name: name.into(),
            output_type: TypeRef::new(type_name, FieldLocation::Scalar),
            args: Vec::new(),
            is_nullable: nullable,
        }
    }

    fn document() -> Document {
        let mut document = Document::default();
        document
            .datamodel
            .models
            .push(Model::new("User", vec![Field::scalar("id", "Int"), Field::object("posts", "Post").list()]));
        document
    }

    #[test]
    fn test_count_output_has_optional_properties() {
        let config = Config::from_raw(&[("emitBlocks".to_string(), "models".into())].into_iter().collect()).unwrap();
        let document = document();
        let mut emitter = InMemoryEmitter::new();
        {
            let mut ctx = GenerationContext::new(&config, &document, &mut emitter);
            ctx.models.insert("User".into(), document.datamodel.models[0].clone());
            let mut output = OutputType {
                name: "UserCountOutputType".into(),
                fields: vec![scalar_field("posts", "Int", false)],
            };
            output_type(&mut output, &mut ctx, &EventBus::new()).unwrap();
            assert_eq!(output.name, "UserCount");

            let mut skipped = OutputType {
                name: "AffectedRowsOutput".into(),
                fields: vec![scalar_field("count", "Int", false)],
            };
            output_type(&mut skipped, &mut ctx, &EventBus::new()).unwrap();
        }

        let text = emitter.text("user/user-count.output.ts").unwrap();
        assert!(text.contains("@ObjectType()\nexport class UserCount {"));
        assert!(text.contains("posts?: number;"));
        assert!(text.contains("@Field(() => Int, {nullable:false})"));
        assert_eq!(emitter.files().count(), 1);
    }

    #[test]
    fn test_aggregate_output_dispatches_aggregate_input() {
        let config = Config::from_raw(&RawConfig::new()).unwrap();
        let document = document();
        let mut emitter = InMemoryEmitter::new();
        {
            let mut ctx = GenerationContext::new(&config, &document, &mut emitter);
            ctx.models.insert("User".into(), document.datamodel.models[0].clone());
            let mut bus = EventBus::new();
            bus.on_aggregate_output(aggregate_input);
            bus.on_input_type(input_type);
            let mut output = OutputType {
                name: "UserMaxAggregateOutputType".into(),
                fields: vec![scalar_field("id", "Int", true)],
            };
            output_type(&mut output, &mut ctx, &bus).unwrap();
            assert!(ctx.registry.type_names.contains("UserMaxAggregateInput"));
        }

        let output = emitter.text("user/user-max-aggregate.output.ts").unwrap();
        assert!(output.contains("export class UserMaxAggregate {"));
        assert!(output.contains("id?: number;"));
        let input = emitter.text("user/user-max-aggregate.input.ts").unwrap();
        assert!(input.contains("@InputType()\nexport class UserMaxAggregateInput {"));
        assert!(input.contains("@Field(() => Boolean, {nullable:true})"));
        assert!(input.contains("id?: boolean;"));
    }
}
