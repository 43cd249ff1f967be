//! Design: one embroidery job within a product customization

use super::SelectionSet;
use crate::models::{EmbroideryOption, OptionCategory};
use crate::util::now_millis;
use serde::{Deserialize, Serialize};

/// Physical dimensions of the embroidered area (same unit, inches)
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Dimensions {
    pub width: f64,
    pub height: f64,
}

impl Dimensions {
    /// Both sides finite and strictly positive
    pub fn is_valid(&self) -> bool {
        self.width.is_finite() && self.height.is_finite() && self.width > 0.0 && self.height > 0.0
    }

    pub fn area(&self) -> f64 {
        self.width * self.height
    }
}

/// Placement position on the product
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum Placement {
    #[default]
    Front,
    Back,
    LeftChest,
    RightChest,
    Sleeve,
    Custom,
}

/// Free position offset within the placement area
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Default)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

/// Uploaded source file reference
///
/// The raw bytes are excluded from serialization: a persisted snapshot
/// keeps only the declared name/size/mime, and deserialization yields
/// an empty placeholder so the UI can still show "a file was attached".
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct DesignFile {
    pub name: String,
    /// Declared size in bytes (survives serialization even though the
    /// payload does not)
    pub size: u64,
    pub mime: String,
    #[serde(skip)]
    pub bytes: Vec<u8>,
}

impl DesignFile {
    /// True when the original payload is gone (reloaded from snapshot)
    pub fn is_placeholder(&self) -> bool {
        self.bytes.is_empty() && self.size > 0
    }
}

/// One embroidery job: source file, preview, dimensions, placement,
/// and per-category option selections
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Design {
    /// Session-local ID, generated at creation
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file: Option<DesignFile>,
    /// Encoded preview (data string), independent of the original binary
    #[serde(skip_serializing_if = "Option::is_none")]
    pub preview: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dimensions: Option<Dimensions>,
    #[serde(default)]
    pub placement: Placement,
    #[serde(default)]
    pub position: Position,
    #[serde(default)]
    pub selections: SelectionSet,
    pub created_at: i64,
    pub updated_at: i64,
}

impl Design {
    pub fn new(id: String) -> Self {
        let now = now_millis();
        Self {
            id,
            file: None,
            preview: None,
            dimensions: None,
            placement: Placement::default(),
            position: Position::default(),
            selections: SelectionSet::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Select an option (single-select semantics; see [`SelectionSet::select`])
    pub fn select(&mut self, option: EmbroideryOption) {
        self.selections.select(option);
        self.touch();
    }

    /// Toggle an option (multi-select semantics; see [`SelectionSet::toggle`])
    pub fn toggle(&mut self, option: EmbroideryOption) {
        self.selections.toggle(option);
        self.touch();
    }

    pub fn is_selected(&self, category: OptionCategory, option_id: &str) -> bool {
        self.selections.is_selected(category, option_id)
    }

    /// Dimensions usable for pricing, if any
    pub fn priced_dimensions(&self) -> Option<Dimensions> {
        self.dimensions.filter(Dimensions::is_valid)
    }

    pub fn can_finalize(&self) -> bool {
        self.selections.can_finalize()
    }

    fn touch(&mut self) {
        self.updated_at = now_millis();
    }
}
