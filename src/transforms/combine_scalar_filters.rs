//! Collapse `Nullable`/`Nested` filter variants into their canonical filter.

use crate::error::Result;
use crate::naming::{is_contain_bogus, replace_bogus};
use crate::pipeline::{EventBus, GenerationContext, InputTypeEvent};
use crate::schema::{FieldLocation, InputType, SchemaArg};
use std::collections::BTreeSet;

/// `PostBegin`: every bogus engine input whose canonical name is missing is
/// copied forward under that name, then all bogus inputs leave the universe.
/// Non-`Nested` variants are preferred as the source shape.
pub fn post_begin(_: &mut (), ctx: &mut GenerationContext<'_>, _bus: &EventBus) -> Result<()> {
    let inputs = &ctx.schema.input_object_types.prisma;
    let existing: BTreeSet<&str> = inputs.iter().map(|i| i.name.as_str()).collect();

    let mut sources: Vec<&InputType> = inputs.iter().filter(|i| is_contain_bogus(&i.name)).collect();
    sources.sort_by_key(|i| i.name.starts_with("Nested"));

    let mut promoted: Vec<InputType> = Vec::new();
    let mut renames: Vec<(String, String)> = Vec::new();
    for source in sources {
        let canonical = replace_bogus(&source.name);
        renames.push((source.name.clone(), canonical.clone()));
        if existing.contains(canonical.as_str()) || promoted.iter().any(|p| p.name == canonical) {
            continue;
        }
        tracing::debug!("[PNGC] Promoted {} to {}", source.name, canonical);
        promoted.push(InputType {
            name: canonical,
            fields: source.fields.clone(),
        });
    }

    for (bogus, canonical) in renames {
        ctx.registry.remove_types.insert(bogus.clone());
        ctx.registry.aliases.insert(bogus, canonical);
    }
    let inputs = &mut ctx.schema.input_object_types.prisma;
    inputs.retain(|i| !is_contain_bogus(&i.name));
    inputs.extend(promoted);
    Ok(())
}

/// `BeforeInputType`: bogus scalar filters that survived are emitted under
/// their canonical name.
pub fn before_input_type(event: &mut InputTypeEvent, ctx: &mut GenerationContext<'_>, _bus: &EventBus) -> Result<()> {
    let name = event.input_type.name.clone();
    if is_contain_bogus(&name) && is_scalar_filter(&event.input_type) {
        let canonical = replace_bogus(&name);
        ctx.registry.remove_types.insert(name.clone());
        ctx.registry.aliases.insert(name, canonical.clone());
        event.input_type.name = canonical;
    }
    Ok(())
}

/// `BeforeGenerateField`: references to bogus filters point at the canonical one.
pub fn before_generate_field(field: &mut SchemaArg, _ctx: &mut GenerationContext<'_>, _bus: &EventBus) -> Result<()> {
    for candidate in field
        .input_types
        .iter_mut()
        .filter(|t| t.location == FieldLocation::InputObjectTypes)
    {
        if is_contain_bogus(&candidate.type_name) {
            candidate.type_name = replace_bogus(&candidate.type_name);
        }
    }
    Ok(())
}

/// A `*Filter` whose `equals` accepts only scalars or enums.
fn is_scalar_filter(input: &InputType) -> bool {
    if !input.name.ends_with("Filter") {
        return false;
    }
    input
        .fields
        .iter()
        .find(|f| f.name == "equals")
        .map(|equals| {
            equals
                .input_types
                .iter()
                .all(|t| matches!(t.location, FieldLocation::EnumTypes | FieldLocation::Scalar))
        })
        .unwrap_or(false)
}
