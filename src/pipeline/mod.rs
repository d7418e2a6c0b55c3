//! # Event Pipeline
//!
//! Generation is a fixed sequence of [`Phase`]s dispatched over one
//! [`GenerationContext`]. Handlers and transforms subscribe to phases on an
//! [`EventBus`]; listeners of a phase run in subscription order and may
//! dispatch nested phases through the bus they receive.

pub mod bus;
pub mod context;
pub mod phase;

pub use bus::{ClassPropertyEvent, EventBus, InputTypeEvent, Listener};
pub use context::{GenerationContext, TypeRegistry};
pub use phase::Phase;
