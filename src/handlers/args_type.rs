use crate::error::Result;
use crate::naming::{is_many_and_return, pascal_case};
use crate::pipeline::{EventBus, GenerationContext, InputTypeEvent};
use crate::schema::{FieldLocation, InputType, SchemaArg, SchemaField, TypeRef};

const AGGREGATES: [&str; 5] = ["Count", "Avg", "Sum", "Min", "Max"];

/// `ArgsType`: an `@ArgsType()` class for the arguments of one query or
/// mutation field.
pub fn args_type(field: &mut SchemaField, ctx: &mut GenerationContext<'_>, bus: &EventBus) -> Result<()> {
    if matches!(field.name.as_str(), "queryRaw" | "executeRaw") || is_many_and_return(&field.name) {
        return Ok(());
    }

    let mut class_name = pascal_case(&format!("{}Args", field.name));
    let model_name = ctx.model_name(&class_name).unwrap_or_default().to_string();
    if class_name == format!("Aggregate{model_name}Args") {
        class_name = format!("{model_name}AggregateArgs");
    } else if class_name == format!("GroupBy{model_name}Args") {
        class_name = format!("{model_name}GroupByArgs");
    }

    let mut input = InputType {
        name: class_name,
        fields: field.args.clone(),
    };

    let aggregate_args = format!("{model_name}AggregateArgs");
    let group_by_args = format!("{model_name}GroupByArgs");
    let has_count = field.args.iter().any(|a| a.name == "_count");
    if !has_count && (input.name == aggregate_args || input.name == group_by_args) {
        if input.name == group_by_args {
            if let Some(by) = input.fields.iter_mut().find(|f| f.name == "by") {
                by.input_types.retain(|t| t.is_list);
            }
        }
        for aggregate in AGGREGATES {
            let type_name = format!("{model_name}{aggregate}AggregateInput");
            if !ctx.registry.type_names.contains(&type_name) {
                continue;
            }
            input.fields.push(SchemaArg {
                name: format!("_{}", aggregate.to_lowercase()),
                input_types: vec![TypeRef::new(type_name, FieldLocation::InputObjectTypes)],
                is_required: false,
                is_nullable: true,
            });
        }
    }

    bus.emit_input_type(&mut InputTypeEvent::args(input), ctx)
}
