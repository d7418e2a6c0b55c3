use crate::error::Result;
use crate::pipeline::{EventBus, GenerationContext};

/// Log a configuration warning and keep it for the run report.
pub fn warning(message: &mut String, ctx: &mut GenerationContext<'_>, _bus: &EventBus) -> Result<()> {
    tracing::warn!("[PNGC] {}", message);
    ctx.warnings.push(message.clone());
    Ok(())
}
