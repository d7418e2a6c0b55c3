//! # Prisma NestJS GraphQL Compiler (PNGC)
//!
//! Generator that turns a Prisma schema document (DMMF) into NestJS GraphQL
//! TypeScript: one `@ObjectType`, `@InputType` or `@ArgsType` class per
//! schema shape, registered enums, and optional index files.
//!
//! PNGC provides:
//! - Documentation directives (`@HideField`, `@FieldType`, `@PropertyType`,
//!   namespaced decorators) parsed from schema comments
//! - Circular reference detection with lazy, name-keyed binding for ESM output
//! - Cross-cutting transforms: filter collapsing, atomic operation removal,
//!   re-exports, single-file output, output purging
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use pngc::{generate, Document, RawConfig};
//!
//! let document = Document::from_json(&std::fs::read_to_string("dmmf.json")?)?;
//! let mut config = RawConfig::new();
//! config.insert("esmCompatible".into(), "true".into());
//!
//! match generate(&document, &config, "src/@generated") {
//!     Ok(report) => println!("Generated {} files", report.files.len()),
//!     Err(e) => eprintln!("Generation failed: {}", e),
//! }
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! ## Architecture
//!
//! PNGC runs a strictly ordered phase pipeline over one [`GenerationContext`]:
//!
//! 1. **Configuration** - Flat keys resolved into an immutable [`Config`]
//! 2. **Model Data** - Directive settings parsed, model cycles detected
//! 3. **Type Universe** - Filter renames applied, type-reference cycles merged
//! 4. **Emission** - Enums, model classes, outputs, inputs and args, each
//!    field bound through the resolver
//! 5. **Write Out** - Transforms reshape the project, the emitter persists it

pub mod codegen;
pub mod config;
pub mod directives;
pub mod emitter;
pub mod error;
pub mod generator;
pub mod graph;
pub mod handlers;
pub mod naming;
pub mod pipeline;
pub mod resolver;
pub mod schema;
pub mod transforms;

// Re-export the main generation API
pub use generator::{generate, generate_with, GenerationReport, Generator};

pub use config::{Config, RawConfig, RawValue, ReExport};
pub use emitter::{FileSystemEmitter, InMemoryEmitter, SourceEmitter};
pub use error::{GeneratorError, Result};
pub use graph::{detect_cycles, has_circular_dependency, CircularPairSet, DependencyGraph};
pub use pipeline::{EventBus, GenerationContext, Phase};
pub use resolver::{Binding, BindingMode};
pub use schema::Document;
