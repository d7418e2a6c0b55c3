//! # TypeScript Code Generation
//!
//! Text rendering for generated files.

mod comment;
mod typescript;

pub use comment::create_comment;
pub use typescript::*;
