//! Material cost breakdown
//!
//! Computed from a design's physical dimensions, never stored. The six
//! components are computed independently from the same (width, height)
//! pair; `total_cost` is always their sum.

use serde::{Deserialize, Serialize};

/// Itemized material cost for one design at a given physical size
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Default)]
pub struct CostBreakdown {
    pub fabric: f64,
    pub patch_attach: f64,
    pub thread: f64,
    pub bobbin: f64,
    pub cut_away_stabilizer: f64,
    pub wash_away_stabilizer: f64,
    pub total_cost: f64,
}

impl CostBreakdown {
    /// Sum of the six components (should always equal `total_cost`)
    pub fn component_sum(&self) -> f64 {
        self.fabric
            + self.patch_attach
            + self.thread
            + self.bobbin
            + self.cut_away_stabilizer
            + self.wash_away_stabilizer
    }
}
