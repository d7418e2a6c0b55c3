//! Typed phase dispatcher. Each phase owns a list of listeners that run in
//! subscription order; the first error aborts the run.

use super::context::GenerationContext;
use super::phase::Phase;
use crate::emitter::Property;
use crate::error::{GeneratorError, Result};
use crate::schema::{FieldLocation, InputType, Model, OutputType, SchemaArg, SchemaEnum, SchemaField};

pub type Listener<P> = Box<dyn Fn(&mut P, &mut GenerationContext<'_>, &EventBus) -> Result<()>>;

/// Payload of `BeforeInputType` and `InputType`.
#[derive(Debug, Clone)]
pub struct InputTypeEvent {
    pub input_type: InputType,
    /// `input` or `args`.
    pub file_type: String,
    /// `InputType` or `ArgsType`.
    pub class_decorator: String,
}

impl InputTypeEvent {
    pub fn input(input_type: InputType) -> Self {
        Self {
            input_type,
            file_type: "input".to_string(),
            class_decorator: "InputType".to_string(),
        }
    }

    pub fn args(input_type: InputType) -> Self {
        Self {
            input_type,
            file_type: "args".to_string(),
            class_decorator: "ArgsType".to_string(),
        }
    }
}

/// Payload of `ClassProperty`, dispatched once per emitted property.
#[derive(Debug, Clone)]
pub struct ClassPropertyEvent {
    pub property: Property,
    pub location: FieldLocation,
    pub is_list: bool,
    pub property_types: Vec<String>,
}

fn dispatch<P>(
    phase: Phase,
    listeners: &[Listener<P>],
    payload: &mut P,
    ctx: &mut GenerationContext<'_>,
    bus: &EventBus,
) -> Result<()> {
    for listener in listeners {
        listener(payload, ctx, bus).map_err(|e| GeneratorError::abort(phase, e))?;
    }
    Ok(())
}

macro_rules! event_bus {
    ($( $phase:ident => $field:ident, $on:ident, $emit:ident : $payload:ty; )*) => {
        /// Listener lists for every [`Phase`].
        #[derive(Default)]
        pub struct EventBus {
            $( $field: Vec<Listener<$payload>>, )*
        }

        impl EventBus {
            pub fn new() -> Self {
                Self::default()
            }

            $(
                pub fn $on<F>(&mut self, listener: F)
                where
                    F: Fn(&mut $payload, &mut GenerationContext<'_>, &EventBus) -> Result<()> + 'static,
                {
                    self.$field.push(Box::new(listener));
                }

                pub fn $emit(&self, payload: &mut $payload, ctx: &mut GenerationContext<'_>) -> Result<()> {
                    dispatch(Phase::$phase, &self.$field, payload, ctx, self)
                }
            )*

            pub fn listener_count(&self, phase: Phase) -> usize {
                match phase {
                    $( Phase::$phase => self.$field.len(), )*
                }
            }

            /// Detach every listener.
            pub fn clear(&mut self) {
                $( self.$field.clear(); )*
            }
        }
    };
}

event_bus! {
    Warning => warning, on_warning, emit_warning: String;
    Begin => begin, on_begin, emit_begin: ();
    Model => model, on_model, emit_model: Model;
    PostBegin => post_begin, on_post_begin, emit_post_begin: ();
    EnumType => enum_type, on_enum_type, emit_enum_type: SchemaEnum;
    ModelOutputType => model_output_type, on_model_output_type, emit_model_output_type: OutputType;
    OutputType => output_type, on_output_type, emit_output_type: OutputType;
    AggregateOutput => aggregate_output, on_aggregate_output, emit_aggregate_output: OutputType;
    BeforeInputType => before_input_type, on_before_input_type, emit_before_input_type: InputTypeEvent;
    InputType => input_type, on_input_type, emit_input_type: InputTypeEvent;
    BeforeGenerateField => before_generate_field, on_before_generate_field, emit_before_generate_field: SchemaArg;
    ClassProperty => class_property, on_class_property, emit_class_property: ClassPropertyEvent;
    ArgsType => args_type, on_args_type, emit_args_type: SchemaField;
    BeforeGenerateFiles => before_generate_files, on_before_generate_files, emit_before_generate_files: ();
    GenerateFiles => generate_files, on_generate_files, emit_generate_files: ();
    End => end, on_end, emit_end: ();
}
