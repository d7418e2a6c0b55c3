//! `InputType`: one `@InputType()` (or `@ArgsType()`) class per input shape.

use super::{
    apply_decorate_rules, apply_directive_decorators, class_imports, field_options, hide_field, import_binding,
    property_structure, runtime, write_class, CLASS_TRANSFORMER,
};
use crate::directives::{EmissionContext, Literal};
use crate::emitter::{ClassDeclaration, Decorator};
use crate::error::Result;
use crate::naming::{is_where_unique_input, relative_path};
use crate::pipeline::{ClassPropertyEvent, EventBus, GenerationContext, InputTypeEvent};
use crate::resolver::{resolve_field_binding, select_input_type, FieldRequest};
use crate::schema::{Field, FieldKind, FieldLocation, Model};

/// Field names whose values are nested write payloads.
const NESTED_WRITE_FIELDS: &[&str] = &[
    "connect",
    "connectOrCreate",
    "create",
    "createMany",
    "data",
    "delete",
    "deleteMany",
    "disconnect",
    "set",
    "update",
    "updateMany",
    "upsert",
    "where",
];

pub fn input_type(event: &mut InputTypeEvent, ctx: &mut GenerationContext<'_>, bus: &EventBus) -> Result<()> {
    let config = ctx.config;
    let name = event.input_type.name.clone();
    ctx.registry.type_names.insert(name.clone());

    let path = ctx.file_path(&name, &event.file_type);
    let model: Option<Model> = ctx.model_for(&name).cloned();
    let model_settings = model
        .as_ref()
        .and_then(|m| ctx.field_settings.get(&m.name).cloned())
        .unwrap_or_default();
    let at_least_keys = model.as_ref().map(Model::where_unique_keys);
    let use_input_type = config.use_input_type_for(&name);
    let where_unique = is_where_unique_input(&name);

    let mut imports = class_imports(config, &path, &event.class_decorator);
    let mut class = ClassDeclaration::new(&name);
    class.decorators.push(Decorator::new(event.class_decorator.clone(), Vec::new()));

    for field in event.input_type.fields.iter_mut() {
        let registry = &ctx.registry;
        // A removed name that was renamed stays reachable until the rename is applied.
        field
            .input_types
            .retain(|t| registry.aliases.contains_key(&t.type_name) || !registry.remove_types.contains(&t.type_name));
        bus.emit_before_generate_field(field, ctx)?;
        if field.input_types.is_empty() {
            continue;
        }

        let pattern = use_input_type.and_then(|u| u.pattern_for(&field.name));
        let selected = select_input_type(&name, &field.name, &field.input_types, pattern)?;
        let settings = model_settings.get(&field.name);
        let model_field = model.as_ref().and_then(|m| m.field(&field.name));
        let customs_applicable = model_field.map(|f| f.type_name == selected.type_name).unwrap_or(false);

        let request = FieldRequest {
            owner: &name,
            field_name: &field.name,
            type_ref: &selected,
            context: EmissionContext::Input,
            settings,
            source_path: &path,
            customs_applicable,
            is_id: false,
            at_least_keys: at_least_keys.as_deref(),
        };
        let binding = {
            let is_model = |n: &str| ctx.is_model(n);
            let locate = |n: &str, file_type: &str| ctx.file_path(n, file_type);
            resolve_field_binding(&request, &ctx.circular, config, &is_model, &locate)?
        };

        let unsafe_required = where_unique
            && config.unsafe_compatible_where_unique_input
            && at_least_keys.as_ref().map(|keys| keys.contains(&field.name)).unwrap_or(false);
        let mut property = property_structure(
            &field.name,
            &binding.property_types,
            binding.is_list,
            !field.is_required,
            unsafe_required.then_some(false),
            unsafe_required.then_some(true),
        );
        import_binding(&mut imports, &binding, config, &path);

        if binding.hidden {
            hide_field(&mut property, &mut imports);
        } else {
            let mut options = field_options(settings);
            options.set("nullable", Literal::Bool(!field.is_required));
            property
                .decorators
                .push(Decorator::new("Field", vec![binding.type_expression(), options.to_string()]));

            if binding.graphql_type == "GraphQLDecimal" {
                imports.add("transformToDecimal", &relative_path(&path, runtime::DECIMAL_HELPERS_FILE));
                imports.add("Transform", CLASS_TRANSFORMER);
                imports.add("Type", CLASS_TRANSFORMER);
                property
                    .decorators
                    .push(Decorator::new("Type", vec!["() => Object".to_string()]));
                property
                    .decorators
                    .push(Decorator::new("Transform", vec!["transformToDecimal".to_string()]));
            } else if selected.location == FieldLocation::InputObjectTypes
                && needs_type_hint(ctx, model_field, &field.name, &binding.graphql_type)
            {
                imports.add("Type", CLASS_TRANSFORMER);
                let target = if binding.is_deferred() {
                    format!("() => getType('{}')", binding.graphql_type)
                } else {
                    format!("() => {}", binding.graphql_type)
                };
                property.decorators.push(Decorator::new("Type", vec![target]));
            }

            if customs_applicable {
                apply_directive_decorators(
                    settings,
                    EmissionContext::Input,
                    &field.name,
                    &mut property.decorators,
                    &mut imports,
                )?;
            }
            apply_decorate_rules(config, &name, &field.name, &binding.property_types, &mut property, &mut imports);
        }

        let mut property_event = ClassPropertyEvent {
            property,
            location: selected.location,
            is_list: selected.is_list,
            property_types: binding.property_types,
        };
        bus.emit_class_property(&mut property_event, ctx)?;
        class.properties.push(property_event.property);
    }

    write_class(ctx, &path, &imports, class);
    Ok(())
}

/// Nested inputs need `@Type()` so `class-transformer` can instantiate them.
fn needs_type_hint(ctx: &GenerationContext<'_>, model_field: Option<&Field>, field_name: &str, graphql_type: &str) -> bool {
    let tracked = &ctx.registry.class_transformer_type_models;
    if model_field.map(|f| f.type_name == "Decimal").unwrap_or(false) || NESTED_WRITE_FIELDS.contains(&field_name) {
        return true;
    }
    if ctx.model_name(graphql_type).map(|m| tracked.contains(m)).unwrap_or(false) {
        return true;
    }
    model_field
        .filter(|f| f.kind == FieldKind::Object)
        .and_then(|f| ctx.models.get(&f.type_name))
        .map(|related| {
            related
                .fields
                .iter()
                .any(|f| f.kind == FieldKind::Object && tracked.contains(&f.type_name))
        })
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Config, RawConfig};
    use crate::emitter::InMemoryEmitter;
    use crate::handlers::model_data::model_data;
    use crate::schema::{Document, InputType, SchemaArg, TypeRef};

    fn arg(name: &str, required: bool, types: Vec<TypeRef>) -> SchemaArg {
        SchemaArg {
            name: name.into(),
            input_types: types,
            is_required: required,
            is_nullable: !required,
        }
    }

    fn user() -> Model {
        Model::new(
            "User",
            vec![
                Field {
                    is_id: true,
                    ..Field::scalar("id", "Int")
                },
                Field::scalar("email", "String").documented("@Validator.IsEmail()"),
                Field::scalar("balance", "Decimal"),
            ],
        )
    }

    fn run(config: &Config, input: InputType) -> (InMemoryEmitter, Vec<String>) {
        let mut document = Document::default();
        document.datamodel.models.push(user());
        let mut emitter = InMemoryEmitter::new();
        let names;
        {
            let mut ctx = GenerationContext::new(config, &document, &mut emitter);
            let bus = EventBus::new();
            model_data(&mut user(), &mut ctx, &bus).unwrap();
            input_type(&mut InputTypeEvent::input(input), &mut ctx, &bus).unwrap();
            names = ctx.registry.type_names.iter().cloned().collect();
        }
        (emitter, names)
    }

    fn validator_config() -> Config {
        let mut raw = RawConfig::new();
        raw.insert("fields_Validator_from".into(), "class-validator".into());
        raw.insert("fields_Validator_input".into(), "true".into());
        Config::from_raw(&raw).unwrap()
    }

    #[test]
    fn test_scalar_fields_and_validator() {
        let input = InputType {
            name: "UserCreateInput".into(),
            fields: vec![
                arg("email", true, vec![TypeRef::new("String", FieldLocation::Scalar)]),
                arg("balance", false, vec![TypeRef::new("Decimal", FieldLocation::Scalar)]),
            ],
        };
        let (emitter, names) = run(&validator_config(), input);
        let text = emitter.text("user/user-create.input.ts").unwrap();

        assert_eq!(names, vec!["UserCreateInput"]);
        assert!(text.contains("import * as Validator from 'class-validator';"));
        assert!(text.contains("@Field(() => String, {nullable:false})"));
        assert!(text.contains("@Validator.IsEmail()"));
        assert!(text.contains("email!: string;"));
        assert!(text.contains("@Type(() => Object)"));
        assert!(text.contains("@Transform(transformToDecimal)"));
        assert!(text.contains("import { transformToDecimal } from '../decimal-helpers';"));
        assert!(text.contains("balance?: Prisma.Decimal;"));
        assert!(text.contains("import { Prisma } from '@prisma/client';"));
    }

    #[test]
    fn test_nested_write_gets_type_hint() {
        let input = InputType {
            name: "UserUpdateInput".into(),
            fields: vec![arg(
                "where",
                false,
                vec![TypeRef::new("UserWhereInput", FieldLocation::InputObjectTypes)],
            )],
        };
        let (emitter, _) = run(&Config::default(), input);
        let text = emitter.text("user/user-update.input.ts").unwrap();
        assert!(text.contains("@Type(() => UserWhereInput)"));
        assert!(text.contains("import { UserWhereInput } from './user-where.input';"));
    }

    #[test]
    fn test_where_unique_at_least() {
        let input = InputType {
            name: "PostUpsertInput".into(),
            fields: vec![arg(
                "user",
                true,
                vec![TypeRef::new("UserWhereUniqueInput", FieldLocation::InputObjectTypes)],
            )],
        };
        let (emitter, _) = run(&Config::default(), input);
        let text = emitter.text("prisma/post-upsert.input.ts").unwrap();
        assert!(text.contains("user!: UserWhereUniqueInput;"));

        let input = InputType {
            name: "UserUpsertWithoutPostsInput".into(),
            fields: vec![arg(
                "where",
                true,
                vec![TypeRef::new("UserWhereUniqueInput", FieldLocation::InputObjectTypes)],
            )],
        };
        let (emitter, _) = run(&Config::default(), input);
        let text = emitter.text("user/user-upsert-without-posts.input.ts").unwrap();
        assert!(text.contains("where!: Prisma.AtLeast<UserWhereUniqueInput, 'id'>;"));
    }

    #[test]
    fn test_fields_without_candidates_are_skipped() {
        let input = InputType {
            name: "UserWhereInput".into(),
            fields: vec![arg("id", false, Vec::new())],
        };
        let (emitter, _) = run(&Config::default(), input);
        let file = emitter.files().next().unwrap();
        assert!(file.class().unwrap().properties.is_empty());
    }
}
