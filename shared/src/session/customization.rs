//! Customization session aggregate

use super::{Design, MAX_DESIGNS, SelectionSet};
use crate::error::{EngineError, EngineResult};
use crate::util::now_millis;
use serde::{Deserialize, Serialize};

/// Full working set for one product customization: up to
/// [`MAX_DESIGNS`] designs, quantity multiplier and the product's base
/// price. Owned by exactly one caller; never shared.
///
/// `selections` is the legacy single-design shape kept for backward
/// compatibility: the price aggregator consults it only when `designs`
/// is empty.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CustomizationSession {
    #[serde(default)]
    pub designs: Vec<Design>,
    pub quantity: u32,
    pub base_price: f64,
    /// Legacy top-level selections (single-design flows)
    #[serde(default)]
    pub selections: SelectionSet,
    pub created_at: i64,
    pub updated_at: i64,
}

impl CustomizationSession {
    pub fn new(base_price: f64) -> Self {
        let now = now_millis();
        Self {
            designs: Vec::new(),
            quantity: 1,
            base_price,
            selections: SelectionSet::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Add a design, enforcing the session cap
    pub fn add_design(&mut self, design: Design) -> EngineResult<()> {
        if self.designs.len() >= MAX_DESIGNS {
            return Err(EngineError::DesignLimitReached { max: MAX_DESIGNS });
        }
        self.designs.push(design);
        self.touch();
        Ok(())
    }

    /// Remove a design by ID; returns false when no such design exists
    pub fn remove_design(&mut self, id: &str) -> bool {
        let before = self.designs.len();
        self.designs.retain(|d| d.id != id);
        let removed = self.designs.len() != before;
        if removed {
            self.touch();
        }
        removed
    }

    pub fn design(&self, id: &str) -> Option<&Design> {
        self.designs.iter().find(|d| d.id == id)
    }

    pub fn design_mut(&mut self, id: &str) -> Option<&mut Design> {
        self.designs.iter_mut().find(|d| d.id == id)
    }

    /// Bump the modification timestamp
    pub fn touch(&mut self) {
        self.updated_at = now_millis();
    }
}

impl Default for CustomizationSession {
    fn default() -> Self {
        Self::new(0.0)
    }
}
