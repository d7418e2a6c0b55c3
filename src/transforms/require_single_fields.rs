use crate::error::Result;
use crate::naming::is_where_unique_input;
use crate::pipeline::{EventBus, GenerationContext, InputTypeEvent};

/// `BeforeInputType`: a where-unique input with a single field makes that
/// field required.
pub fn before_input_type(event: &mut InputTypeEvent, _ctx: &mut GenerationContext<'_>, _bus: &EventBus) -> Result<()> {
    let input = &mut event.input_type;
    if !is_where_unique_input(&input.name) || input.fields.len() != 1 {
        return Ok(());
    }
    for field in input.fields.iter_mut() {
        field.is_required = true;
        field.is_nullable = false;
    }
    Ok(())
}
