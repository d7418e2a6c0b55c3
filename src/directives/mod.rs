//! # Documentation Directives
//!
//! Schema authors attach generator instructions to models and fields through
//! `///` comments. This module turns such a comment into plain documentation
//! plus [`ObjectSettings`].
//!
//! - [`literal`]: relaxed object-literal values for directive arguments
//! - [`parser`]: line grammar (`@Name(args)`, `@deprecated`, `@complexity`)
//! - [`matcher`]: glob matching for `match` options and decorate rules
//! - [`settings`]: structured directives and per-context queries

pub mod literal;
pub mod matcher;
pub mod parser;
pub mod settings;

pub use literal::Literal;
pub use matcher::NameMatcher;
pub use settings::{
    parse_directives, Directive, DirectiveKind, EmissionContext, ObjectSettings, ParsedComment, NESTJS_GRAPHQL,
};
