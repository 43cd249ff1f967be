//! Shared types for the embroidery customization engine
//!
//! Domain models, the per-design selection state machine, and the
//! error system. Pure data and logic, no I/O.

pub mod error;
pub mod models;
pub mod session;
pub mod util;

// Re-exports
pub use serde::{Deserialize, Serialize};

pub use error::{EngineError, EngineResult};
pub use models::{
    CostBreakdown, EmbroideryOption, OptionCategory, OptionLevel, OptionRecord, SelectionArity,
};
pub use session::{
    CustomizationSession, Design, DesignFile, Dimensions, MAX_DESIGNS, Placement, Position,
    SelectionSet,
};
