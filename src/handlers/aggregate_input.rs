use crate::error::Result;
use crate::pipeline::{EventBus, GenerationContext, InputTypeEvent};
use crate::schema::{FieldLocation, InputType, OutputType, SchemaArg, TypeRef};

/// `AggregateOutput`: every aggregate output gets a matching
/// `<Name>Input` whose fields select what to aggregate.
pub fn aggregate_input(output: &mut OutputType, ctx: &mut GenerationContext<'_>, bus: &EventBus) -> Result<()> {
    let input = InputType {
        name: format!("{}Input", output.name),
        fields: output
            .fields
            .iter()
            .map(|field| SchemaArg {
                name: field.name.clone(),
                input_types: vec![TypeRef::new("true", FieldLocation::Scalar)],
                is_required: false,
                is_nullable: field.is_nullable,
            })
            .collect(),
    };
    tracing::debug!("[PNGC] Aggregate input {} from {}", input.name, output.name);
    bus.emit_input_type(&mut InputTypeEvent::input(input), ctx)
}
