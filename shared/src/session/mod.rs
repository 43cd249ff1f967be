//! Customization session state
//!
//! One [`CustomizationSession`] per product customization, holding up
//! to [`MAX_DESIGNS`] designs. Each design carries its own dimensions
//! and a [`SelectionSet`] — the per-design selection state machine.

mod customization;
mod design;
mod selections;

pub use customization::CustomizationSession;
pub use design::{Design, DesignFile, Dimensions, Placement, Position};
pub use selections::SelectionSet;

/// Fixed cap on simultaneous designs per customization
pub const MAX_DESIGNS: usize = 5;
