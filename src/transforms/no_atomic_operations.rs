//! Drop atomic update operation inputs (`increment`, `push`, ...) so updates
//! accept plain values only.

use crate::error::Result;
use crate::pipeline::{EventBus, GenerationContext, InputTypeEvent};

pub fn before_input_type(event: &mut InputTypeEvent, ctx: &mut GenerationContext<'_>, _bus: &EventBus) -> Result<()> {
    for field in event.input_type.fields.iter_mut() {
        let field_name = field.name.clone();
        field.input_types.retain(|candidate| {
            let type_name = candidate.type_name.as_str();
            let list_input = ctx
                .model_name(type_name)
                .map(|model| is_list_input(type_name, model, &field_name))
                .unwrap_or(false);
            !is_atomic_operation(type_name) && !list_input
        });
    }
    Ok(())
}

/// `BeforeGenerateFiles`: remove files whose class is an atomic operation.
pub fn before_generate_files(_: &mut (), ctx: &mut GenerationContext<'_>, _bus: &EventBus) -> Result<()> {
    for path in ctx.project.paths() {
        let atomic = ctx
            .project
            .get(&path)
            .and_then(|file| file.class())
            .map(|class| is_atomic_operation(&class.name))
            .unwrap_or(false);
        if atomic {
            ctx.project.remove(&path);
            tracing::debug!("[PNGC] Removed atomic operation {}", path);
        }
    }
    Ok(())
}

fn is_atomic_operation(type_name: &str) -> bool {
    type_name.ends_with("FieldUpdateOperationsInput")
}

fn is_list_input(type_name: &str, model: &str, field: &str) -> bool {
    type_name == format!("{model}Create{field}Input") || type_name == format!("{model}Update{field}Input")
}
