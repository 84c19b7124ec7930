//! Hashcash as a gateway policy step.
//!
//! A host hands [`HashcashCallout`] a set of string properties and a
//! [`VariableContext`]. Properties may reference context variables as
//! `{name}`. Results are written back as `hashcash_*` variables.

pub mod callout;
pub mod context;
pub mod error;
pub mod properties;

pub use callout::{ExecutionResult, HashcashCallout, VAR_PREFIX};
pub use context::{MemoryContext, VariableContext};
pub use error::CalloutError;
pub use properties::Properties;
