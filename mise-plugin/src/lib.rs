//! Mise Plugin System
//!
//! Every engine operation is exposed as a named `FunctionPlugin` so front
//! ends and tool hosts can discover and call it uniformly.

mod traits;
mod registry;
mod context;
pub mod helpers;

pub use traits::{FunctionPlugin, FunctionMeta, ArgMeta};
pub use registry::PluginRegistry;
pub use context::EvalContext;

/// Re-export core types for plugin authors
pub mod prelude {
    pub use crate::{FunctionPlugin, FunctionMeta, ArgMeta, PluginRegistry, EvalContext};
    pub use mise_core::prelude::*;
}
