//! # Cross-cutting Transforms
//!
//! Optional listeners that reshape the type universe or the output layout.
//! They subscribe after the phase handlers, so on a shared phase they
//! observe the handlers' effects.

pub mod combine_scalar_filters;
pub mod emit_single;
pub mod no_atomic_operations;
pub mod purge_output;
pub mod re_export;
pub mod require_single_fields;

use crate::config::{Config, ReExport};
use crate::pipeline::EventBus;

pub fn register(bus: &mut EventBus, config: &Config) {
    if config.combine_scalar_filters {
        bus.on_before_input_type(combine_scalar_filters::before_input_type);
        bus.on_before_generate_field(combine_scalar_filters::before_generate_field);
        bus.on_post_begin(combine_scalar_filters::post_begin);
    }
    if config.no_atomic_operations {
        bus.on_before_input_type(no_atomic_operations::before_input_type);
        bus.on_before_generate_files(no_atomic_operations::before_generate_files);
    }
    if config.re_export != ReExport::None {
        bus.on_before_generate_files(re_export::before_generate_files);
    }
    if config.emit_single {
        bus.on_class_property(emit_single::class_property);
    }
    if config.purge_output {
        bus.on_begin(purge_output::begin);
        bus.on_end(purge_output::end);
    }
    if config.require_single_fields_in_where_unique_input {
        bus.on_before_input_type(require_single_fields::before_input_type);
    }
}
