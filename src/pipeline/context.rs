//! The accumulator threaded through one generation run.
//!
//! Read-only slices (`config`, `classifier`) sit next to the read-write
//! registries listeners mutate. A context lives for exactly one run.

use crate::config::Config;
use crate::directives::ObjectSettings;
use crate::emitter::SourceEmitter;
use crate::graph::CircularPairSet;
use crate::naming::{generate_file_name, ModelClassifier};
use crate::schema::{DatamodelEnum, Document, Model, Schema};
use std::collections::{BTreeMap, BTreeSet};

/// Run-scoped type bookkeeping shared by handlers and transforms.
#[derive(Debug, Clone, Default)]
pub struct TypeRegistry {
    /// Every input or args class emitted so far.
    pub type_names: BTreeSet<String>,
    /// Types dropped from the universe. Candidates naming them are filtered
    /// out and their files are not written.
    pub remove_types: BTreeSet<String>,
    /// Models whose inputs need `class-transformer` `@Type` hints.
    pub class_transformer_type_models: BTreeSet<String>,
    /// Old type name -> the name it was renamed to.
    pub aliases: BTreeMap<String, String>,
}

impl TypeRegistry {
    /// Follow renames until a name that was not renamed.
    pub fn resolve_alias<'a>(&'a self, name: &'a str) -> &'a str {
        let mut current = name;
        let mut hops = 0;
        while let Some(next) = self.aliases.get(current) {
            if hops > self.aliases.len() {
                break;
            }
            current = next;
            hops += 1;
        }
        current
    }
}

pub struct GenerationContext<'r> {
    pub config: &'r Config,
    pub schema: Schema,
    /// Models and composite types by name.
    pub models: BTreeMap<String, Model>,
    pub classifier: ModelClassifier,
    pub enums: BTreeMap<String, DatamodelEnum>,
    pub circular: CircularPairSet,
    /// model -> field -> settings parsed from the field documentation.
    pub field_settings: BTreeMap<String, BTreeMap<String, ObjectSettings>>,
    /// Settings parsed from model documentation.
    pub model_settings: BTreeMap<String, ObjectSettings>,
    pub registry: TypeRegistry,
    pub project: &'r mut dyn SourceEmitter,
    /// Warnings flushed in this run.
    pub warnings: Vec<String>,
    model_names: BTreeSet<String>,
}

impl<'r> GenerationContext<'r> {
    pub fn new(config: &'r Config, document: &Document, project: &'r mut dyn SourceEmitter) -> Self {
        let datamodel = &document.datamodel;
        let model_names: BTreeSet<String> = datamodel
            .models
            .iter()
            .chain(datamodel.types.iter())
            .map(|m| m.name.clone())
            .collect();
        Self {
            config,
            schema: document.schema.clone(),
            models: BTreeMap::new(),
            classifier: ModelClassifier::new(model_names.iter().cloned()),
            enums: datamodel.enums.iter().map(|e| (e.name.clone(), e.clone())).collect(),
            circular: CircularPairSet::new(),
            field_settings: BTreeMap::new(),
            model_settings: BTreeMap::new(),
            registry: TypeRegistry::default(),
            project,
            warnings: Vec::new(),
            model_names,
        }
    }

    /// Output path of a generated type.
    pub fn file_path(&self, name: &str, file_type: &str) -> String {
        generate_file_name(&self.config.output_file_pattern, name, file_type, &self.classifier)
    }

    pub fn model_name(&self, name: &str) -> Option<&str> {
        self.classifier.model_name(name)
    }

    pub fn is_model(&self, name: &str) -> bool {
        self.model_names.contains(name)
    }

    pub fn model_for(&self, type_name: &str) -> Option<&Model> {
        self.model_name(type_name).and_then(|name| self.models.get(name))
    }

    pub fn settings_for(&self, model: &str, field: &str) -> Option<&ObjectSettings> {
        self.field_settings.get(model).and_then(|fields| fields.get(field))
    }
}
