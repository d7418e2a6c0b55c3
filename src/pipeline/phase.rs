use std::fmt;

/// A named step of a generation run, in run order. `AggregateOutput`,
/// `BeforeGenerateField` and `ClassProperty` are nested inside the phase
/// that dispatches them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Phase {
    Warning,
    Begin,
    Model,
    PostBegin,
    EnumType,
    ModelOutputType,
    OutputType,
    AggregateOutput,
    BeforeInputType,
    InputType,
    BeforeGenerateField,
    ClassProperty,
    ArgsType,
    BeforeGenerateFiles,
    GenerateFiles,
    End,
}

impl Phase {
    pub const ALL: [Phase; 16] = [
        Phase::Warning,
        Phase::Begin,
        Phase::Model,
        Phase::PostBegin,
        Phase::EnumType,
        Phase::ModelOutputType,
        Phase::OutputType,
        Phase::AggregateOutput,
        Phase::BeforeInputType,
        Phase::InputType,
        Phase::BeforeGenerateField,
        Phase::ClassProperty,
        Phase::ArgsType,
        Phase::BeforeGenerateFiles,
        Phase::GenerateFiles,
        Phase::End,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Phase::Warning => "Warning",
            Phase::Begin => "Begin",
            Phase::Model => "Model",
            Phase::PostBegin => "PostBegin",
            Phase::EnumType => "EnumType",
            Phase::ModelOutputType => "ModelOutputType",
            Phase::OutputType => "OutputType",
            Phase::AggregateOutput => "AggregateOutput",
            Phase::BeforeInputType => "BeforeInputType",
            Phase::InputType => "InputType",
            Phase::BeforeGenerateField => "BeforeGenerateField",
            Phase::ClassProperty => "ClassProperty",
            Phase::ArgsType => "ArgsType",
            Phase::BeforeGenerateFiles => "BeforeGenerateFiles",
            Phase::GenerateFiles => "GenerateFiles",
            Phase::End => "End",
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
