//! Collects models, their fields and the settings parsed from their
//! documentation before any file is generated.

use crate::directives::parse_directives;
use crate::error::Result;
use crate::pipeline::{EventBus, GenerationContext};
use crate::schema::Model;
use std::collections::BTreeMap;

pub fn model_data(model: &mut Model, ctx: &mut GenerationContext<'_>, _bus: &EventBus) -> Result<()> {
    let config = ctx.config;
    let mut settings = BTreeMap::new();

    for field in model.fields.iter_mut() {
        let Some(documentation) = field.documentation.as_deref() else {
            continue;
        };
        let parsed = parse_directives(documentation, config)?;
        field.documentation = Some(parsed.documentation).filter(|d| !d.is_empty());
        settings.insert(field.name.clone(), parsed.settings);
    }

    if let Some(documentation) = model.documentation.as_deref() {
        let parsed = parse_directives(documentation, config)?;
        model.documentation = Some(parsed.documentation).filter(|d| !d.is_empty());
        ctx.model_settings.insert(model.name.clone(), parsed.settings);
    }

    if model.fields.iter().any(|f| f.type_name == "Decimal") {
        ctx.registry.class_transformer_type_models.insert(model.name.clone());
    }

    tracing::debug!(
        "[PNGC] Model {}: {} fields, {} with directives",
        model.name,
        model.fields.len(),
        settings.values().filter(|s| !s.is_empty()).count()
    );
    ctx.field_settings.insert(model.name.clone(), settings);
    ctx.models.insert(model.name.clone(), model.clone());
    Ok(())
}
