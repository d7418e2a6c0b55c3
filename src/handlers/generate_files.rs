use crate::error::Result;
use crate::pipeline::{EventBus, GenerationContext};

/// `GenerateFiles`: collapse into one file when `emitSingle` is set, then
/// persist the project.
pub fn generate_files(_: &mut (), ctx: &mut GenerationContext<'_>, _bus: &EventBus) -> Result<()> {
    if ctx.config.emit_single {
        crate::transforms::emit_single::merge(ctx)?;
    }
    ctx.project.save()?;
    tracing::info!("[PNGC] Saved {} files", ctx.project.paths().len());
    Ok(())
}
