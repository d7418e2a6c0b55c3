//! # Generator
//!
//! Main entry points turning a schema document into generated files.

use crate::config::{Config, RawConfig};
use crate::emitter::{FileSystemEmitter, SourceEmitter};
use crate::error::Result;
use crate::graph::{build_graph, build_type_graph, detect_cycles};
use crate::handlers::{self, runtime};
use crate::pipeline::{EventBus, GenerationContext, InputTypeEvent};
use crate::schema::{Document, Model, OutputType};
use crate::transforms;
use std::path::Path;

/// What a finished run produced.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GenerationReport {
    /// Every file known to the emitter after the run, sorted.
    pub files: Vec<String>,
    pub warnings: Vec<String>,
    /// Canonical `A:B` pairs whose references were eligible for deferral.
    pub circular_pairs: Vec<String>,
}

/// One generation run. Handlers and transforms are subscribed according
/// to the configuration; extra listeners can be added through [`Generator::bus_mut`]
/// before [`Generator::run`] consumes the generator.
pub struct Generator<'c> {
    config: &'c Config,
    bus: EventBus,
}

impl<'c> Generator<'c> {
    pub fn new(config: &'c Config) -> Self {
        let mut bus = EventBus::new();
        handlers::register(&mut bus, config);
        transforms::register(&mut bus, config);
        Self { config, bus }
    }

    pub fn bus_mut(&mut self) -> &mut EventBus {
        &mut self.bus
    }

    /// Run every phase in order. The first listener error aborts the run;
    /// files already handed to `project` should then be discarded.
    pub fn run(mut self, document: &Document, project: &mut dyn SourceEmitter) -> Result<GenerationReport> {
        let config = self.config;
        let datamodel = &document.datamodel;
        tracing::info!("[PNGC] Starting generation");
        tracing::info!(
            "[PNGC] Schema: {} models, {} types, {} enums",
            datamodel.models.len(),
            datamodel.types.len(),
            datamodel.enums.len()
        );

        let bus = &self.bus;
        let mut ctx = GenerationContext::new(config, document, project);

        // Phase 1: Configuration warnings
        tracing::info!("[PNGC] Phase 1: Flushing {} configuration warnings...", config.warnings.len());
        for message in &config.warnings {
            bus.emit_warning(&mut message.clone(), &mut ctx)?;
        }

        // Phase 2: Begin, then the runtime files a purge must not wipe
        tracing::info!("[PNGC] Phase 2: Begin...");
        bus.emit_begin(&mut (), &mut ctx)?;
        if config.lazy_binding {
            runtime::type_registry(&mut ctx);
        }
        runtime::decimal_helpers(&mut ctx);

        // Phase 3: Models and composite types
        tracing::info!("[PNGC] Phase 3: Collecting model data...");
        let all_models: Vec<Model> = datamodel.models.iter().chain(datamodel.types.iter()).cloned().collect();
        ctx.circular = detect_cycles(&build_graph(&all_models));
        tracing::info!("[PNGC]   - {} circular model pairs", ctx.circular.len());
        for model in &all_models {
            bus.emit_model(&mut model.clone(), &mut ctx)?;
        }

        // Phase 4: PostBegin, then the type-reference graph over the final universe
        tracing::info!("[PNGC] Phase 4: PostBegin...");
        bus.emit_post_begin(&mut (), &mut ctx)?;
        if config.lazy_binding {
            let type_pairs = {
                let graph = build_type_graph(&ctx.schema, &ctx.registry.aliases, |name| ctx.is_model(name));
                detect_cycles(&graph)
            };
            tracing::info!("[PNGC]   - {} circular type pairs", type_pairs.len());
            ctx.circular.extend(&type_pairs);
        }
        let schema = ctx.schema.clone();

        // Phase 5: Enums
        tracing::info!("[PNGC] Phase 5: Registering enums...");
        for enum_type in schema.enum_types.iter() {
            bus.emit_enum_type(&mut enum_type.clone(), &mut ctx)?;
        }

        // Phase 6: Model output types
        tracing::info!("[PNGC] Phase 6: Generating model classes...");
        for output in &schema.output_object_types.model {
            bus.emit_model_output_type(&mut output.clone(), &mut ctx)?;
        }

        // Phase 7: Output types, holding back Query and Mutation
        tracing::info!("[PNGC] Phase 7: Generating output types...");
        let mut operations: Vec<&OutputType> = Vec::new();
        for output in &schema.output_object_types.prisma {
            if matches!(output.name.as_str(), "Query" | "Mutation") {
                operations.push(output);
                continue;
            }
            bus.emit_output_type(&mut output.clone(), &mut ctx)?;
        }

        // Phase 8: Input types
        tracing::info!("[PNGC] Phase 8: Generating input types...");
        for input in schema.input_object_types.iter() {
            if input.fields.is_empty() {
                ctx.registry.remove_types.insert(input.name.clone());
                continue;
            }
            let mut event = InputTypeEvent::input(input.clone());
            bus.emit_before_input_type(&mut event, &mut ctx)?;
            bus.emit_input_type(&mut event, &mut ctx)?;
        }

        // Phase 9: Args types
        tracing::info!("[PNGC] Phase 9: Generating args types...");
        for field in operations.iter().flat_map(|o| o.fields.iter()) {
            bus.emit_args_type(&mut field.clone(), &mut ctx)?;
        }
        if config.lazy_binding {
            runtime::register_all_types(&mut ctx)?;
        }

        // Phase 10: Write out
        tracing::info!("[PNGC] Phase 10: Writing files...");
        bus.emit_before_generate_files(&mut (), &mut ctx)?;
        if config.lazy_binding {
            // Rebuilt so the manifest only imports files that survived pruning.
            runtime::register_all_types(&mut ctx)?;
        }
        bus.emit_generate_files(&mut (), &mut ctx)?;
        bus.emit_end(&mut (), &mut ctx)?;

        let report = GenerationReport {
            files: ctx.project.paths(),
            warnings: ctx.warnings.clone(),
            circular_pairs: ctx.circular.iter().map(str::to_string).collect(),
        };
        drop(ctx);
        self.bus.clear();

        tracing::info!("[PNGC] Generation complete ({} files)", report.files.len());
        Ok(report)
    }
}

/// Generate into any [`SourceEmitter`].
///
/// ```rust,no_run
/// use pngc::{generate_with, Config, Document, InMemoryEmitter};
///
/// let document = Document::from_json(&std::fs::read_to_string("dmmf.json")?)?;
/// let mut emitter = InMemoryEmitter::new();
/// let report = generate_with(&document, &Config::default(), &mut emitter)?;
/// println!("{} files", report.files.len());
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub fn generate_with(document: &Document, config: &Config, project: &mut dyn SourceEmitter) -> Result<GenerationReport> {
    Generator::new(config).run(document, project)
}

/// Resolve `raw` and generate into `output_dir`. Existing `*.ts` files
/// below it are loaded first so `purgeOutput` and overwrites see them.
pub fn generate(document: &Document, raw: &RawConfig, output_dir: impl AsRef<Path>) -> Result<GenerationReport> {
    let config = Config::from_raw(raw)?;
    let mut emitter = FileSystemEmitter::open(output_dir.as_ref())?;
    generate_with(document, &config, &mut emitter)
}
