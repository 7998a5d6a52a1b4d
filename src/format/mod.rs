//! Argument formatting
//!
//! Turns the raw arguments of an entry point into the body of a trace line,
//! driven entirely by the static descriptors in [`registry`].

pub mod descriptor;
pub mod names;
pub mod registry;
mod render;

pub use descriptor::{ArgValue, Direction, FunctionDescriptor, LengthSource, ParamKind, ParamSpec};
pub use render::{DUMP_LIMIT, MAX_TEMPLATE_DEPTH, NULL, REDACTED, UNREADABLE, format_arguments, format_rv};
