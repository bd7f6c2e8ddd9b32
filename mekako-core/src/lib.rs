//! Mekako Core - Fundamental types
//!
//! This crate provides the core types used throughout Mekako:
//! - `Sample`: Validated, non-empty list of finite reals
//! - `Value`: Runtime values (numbers, exact integers, text, objects, errors)
//! - `StatError`: Structured errors with codes and suggestions

mod error;
mod sample;
mod value;

pub use error::{codes, ErrorContext, ErrorKind, Severity, StatError};
pub use sample::{parse_groups, Group, Sample, SampleError};
pub use value::Value;

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::error::codes;
    pub use crate::{ErrorKind, Sample, Severity, StatError, Value};
}
