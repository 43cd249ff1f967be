//! Data models
//!
//! Catalog option types (with the load-time coercion rules) and the
//! computed material cost breakdown. Shared between the engine and any
//! API surface.

pub mod cost;
pub mod option;

// Re-exports
pub use cost::*;
pub use option::*;
