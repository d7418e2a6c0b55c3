//! Error types for the generator.

use crate::pipeline::Phase;
use thiserror::Error;

pub type Result<T, E = GeneratorError> = std::result::Result<T, E>;

#[derive(Debug, Error)]
pub enum GeneratorError {
    /// Malformed generator configuration (missing required sub-key, bad literal).
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// No viable candidate type for a field.
    #[error("Cannot get matching input type for '{type_name}.{field}' from [{candidates}] or zero length inputTypes")]
    Resolution {
        type_name: String,
        field: String,
        candidates: String,
    },

    #[error("Invalid directive '{line}': {message}")]
    Directive { line: String, message: String },

    #[error("Model '{0}' not found")]
    MissingModel(String),

    /// First error raised by a listener. Aborts the whole run.
    #[error("Generation aborted in phase {phase}: {source}")]
    PipelineAbort {
        phase: Phase,
        #[source]
        source: Box<GeneratorError>,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Invalid pattern: {0}")]
    Pattern(#[from] glob::PatternError),

    #[error("Invalid regex: {0}")]
    Regex(#[from] regex::Error),
}

impl GeneratorError {
    /// Wrap `source` as an abort of `phase`. Errors that already abort keep
    /// their original phase.
    pub fn abort(phase: Phase, source: GeneratorError) -> Self {
        match source {
            abort @ GeneratorError::PipelineAbort { .. } => abort,
            other => GeneratorError::PipelineAbort {
                phase,
                source: Box::new(other),
            },
        }
    }

    pub fn configuration(message: impl Into<String>) -> Self {
        GeneratorError::Configuration(message.into())
    }
}
