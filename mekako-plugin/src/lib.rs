//! Mekako Plugin System
//!
//! Provides traits for exposing statistics by name:
//! - Functions (pure computation)
//! - Commands (draw from the context's random generator)

mod config;
mod context;
mod registry;
mod traits;

pub use config::{StatConfig, ENV_ALPHA, ENV_CURVE_POINTS, ENV_SEED, MAX_CURVE_POINTS};
pub use context::EvalContext;
pub use registry::PluginRegistry;
pub use traits::{ArgMeta, CommandMeta, CommandPlugin, FunctionMeta, FunctionPlugin};

/// Re-export core types for plugin authors
pub mod prelude {
    pub use crate::{
        ArgMeta, CommandMeta, CommandPlugin, EvalContext, FunctionMeta, FunctionPlugin,
        PluginRegistry, StatConfig,
    };
    pub use mekako_core::prelude::*;
}
