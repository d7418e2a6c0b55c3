use crate::error::Result;
use crate::pipeline::{EventBus, GenerationContext};

/// `Begin`: forget every file already below the output root.
pub fn begin(_: &mut (), ctx: &mut GenerationContext<'_>, _bus: &EventBus) -> Result<()> {
    let paths = ctx.project.paths();
    for path in &paths {
        ctx.project.remove(path);
    }
    tracing::debug!("[PNGC] Purged {} existing files", paths.len());
    Ok(())
}

/// `End`: remove directories the run left empty.
pub fn end(_: &mut (), ctx: &mut GenerationContext<'_>, _bus: &EventBus) -> Result<()> {
    ctx.project.remove_empty_directories()
}
