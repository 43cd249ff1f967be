//! Embroidery option model
//!
//! Raw catalog records ([`OptionRecord`]) arrive from the external
//! option source with loosely typed fields. Normalization into
//! [`EmbroideryOption`] happens exactly once, at catalog load, so the
//! rest of the engine only ever sees clean numbers and resolved
//! incompatibility lists. A design must never become unpriceable, so
//! every malformed field coerces to a safe default instead of failing.

use rust_decimal::prelude::*;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use tracing::warn;

// ============================================================================
// Category Policy
// ============================================================================

/// Selection arity for a category
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionArity {
    /// At most one option selected
    Single,
    /// A set of options selected
    Multi,
}

/// The seven fixed option categories
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum OptionCategory {
    Coverage,
    Material,
    Border,
    Threads,
    Backing,
    Upgrades,
    Cutting,
}

impl OptionCategory {
    /// All categories, in display order
    pub const ALL: [OptionCategory; 7] = [
        OptionCategory::Coverage,
        OptionCategory::Material,
        OptionCategory::Border,
        OptionCategory::Threads,
        OptionCategory::Backing,
        OptionCategory::Upgrades,
        OptionCategory::Cutting,
    ];

    /// Static selection policy: single- or multi-select
    pub fn arity(&self) -> SelectionArity {
        match self {
            Self::Threads | Self::Upgrades => SelectionArity::Multi,
            _ => SelectionArity::Single,
        }
    }

    /// Whether a selection is required before the design can be finalized
    pub fn is_required(&self) -> bool {
        matches!(self, Self::Coverage | Self::Material | Self::Border)
    }

    /// Canonical lowercase name (matches the wire format)
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Coverage => "coverage",
            Self::Material => "material",
            Self::Border => "border",
            Self::Threads => "threads",
            Self::Backing => "backing",
            Self::Upgrades => "upgrades",
            Self::Cutting => "cutting",
        }
    }

    /// Parse a raw category string (case-insensitive)
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "coverage" => Some(Self::Coverage),
            "material" => Some(Self::Material),
            "border" => Some(Self::Border),
            "threads" => Some(Self::Threads),
            "backing" => Some(Self::Backing),
            "upgrades" => Some(Self::Upgrades),
            "cutting" => Some(Self::Cutting),
            _ => None,
        }
    }
}

impl std::fmt::Display for OptionCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Option tier, informational only (no pricing effect)
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum OptionLevel {
    Basic,
    #[default]
    Standard,
    Premium,
    Luxury,
}

impl OptionLevel {
    /// Tolerant parse; anything unrecognized is Standard
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "basic" => Self::Basic,
            "premium" => Self::Premium,
            "luxury" => Self::Luxury,
            _ => Self::Standard,
        }
    }
}

// ============================================================================
// Normalized Option
// ============================================================================

/// Normalized catalog entry
///
/// Immutable for the duration of a customization session. `price` is
/// always finite and non-negative; zero is a valid "free" tier.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EmbroideryOption {
    pub id: String,
    pub category: OptionCategory,
    #[serde(default)]
    pub level: OptionLevel,
    pub price: f64,
    #[serde(default)]
    pub is_popular: bool,
    #[serde(default = "default_true")]
    pub is_active: bool,
    /// IDs of options that cannot co-exist with this one in a design.
    /// Advisory metadata: selection is never blocked by it.
    #[serde(default)]
    pub incompatible_with: Vec<String>,
}

fn default_true() -> bool {
    true
}

impl EmbroideryOption {
    /// Whether this option declares a conflict with `other_id`
    pub fn conflicts_with(&self, other_id: &str) -> bool {
        self.incompatible_with.iter().any(|id| id == other_id)
    }
}

// ============================================================================
// Raw Record + Coercion
// ============================================================================

/// Raw option record as fetched from the external option source
///
/// `price` may arrive as a JSON number or a numeric string;
/// `incompatible_with` may arrive as a list or as a JSON-encoded list
/// string. Both are coerced by [`OptionRecord::normalize`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OptionRecord {
    pub id: String,
    pub category: String,
    #[serde(default)]
    pub level: Option<String>,
    #[serde(default)]
    pub price: Option<serde_json::Value>,
    #[serde(default)]
    pub is_popular: bool,
    #[serde(default = "default_true")]
    pub is_active: bool,
    #[serde(default)]
    pub incompatible_with: Option<serde_json::Value>,
}

impl OptionRecord {
    /// Normalize into an [`EmbroideryOption`].
    ///
    /// Returns `None` for inactive records and for records whose
    /// category is not one of the seven known categories (such records
    /// cannot participate in selection and are dropped with a warning).
    pub fn normalize(&self) -> Option<EmbroideryOption> {
        if !self.is_active {
            return None;
        }
        let Some(category) = OptionCategory::parse(&self.category) else {
            warn!(
                option_id = %self.id,
                category = %self.category,
                "dropping option with unknown category"
            );
            return None;
        };

        let price = parse_option_price(self.price.as_ref(), &self.id);
        let incompatible_with = parse_incompatibility(self.incompatible_with.as_ref(), &self.id);
        let level = self
            .level
            .as_deref()
            .map(OptionLevel::parse)
            .unwrap_or_default();

        Some(EmbroideryOption {
            id: self.id.clone(),
            category,
            level,
            price: price.to_f64().unwrap_or(0.0),
            is_popular: self.is_popular,
            is_active: true,
            incompatible_with,
        })
    }
}

/// Parse an option price that may arrive as a number or numeric string.
///
/// The single tolerant price parser: parse failure coerces to zero and
/// negative prices clamp to zero, because an unparseable price must
/// degrade to "free", never make the design unpriceable.
pub fn parse_option_price(raw: Option<&serde_json::Value>, option_id: &str) -> Decimal {
    let parsed = match raw {
        None | Some(serde_json::Value::Null) => Some(Decimal::ZERO),
        Some(serde_json::Value::Number(n)) => n.as_f64().and_then(Decimal::from_f64),
        Some(serde_json::Value::String(s)) => {
            let trimmed = s.trim().trim_start_matches(['$', '€', '£']).trim();
            Decimal::from_str(trimmed).ok()
        }
        Some(_) => None,
    };

    let Some(price) = parsed else {
        warn!(option_id = %option_id, ?raw, "unparseable option price, coercing to 0");
        return Decimal::ZERO;
    };

    if price.is_sign_negative() && !price.is_zero() {
        warn!(option_id = %option_id, %price, "negative option price, clamping to 0");
        return Decimal::ZERO;
    }
    price
}

/// Parse an incompatibility list that may arrive as a JSON array or as
/// a JSON-encoded array string. Malformed input fails open to "no
/// constraint" (empty list) rather than blocking all selection.
pub fn parse_incompatibility(raw: Option<&serde_json::Value>, option_id: &str) -> Vec<String> {
    match raw {
        None | Some(serde_json::Value::Null) => Vec::new(),
        Some(serde_json::Value::Array(items)) => items
            .iter()
            .filter_map(|v| v.as_str().map(str::to_owned))
            .collect(),
        Some(serde_json::Value::String(s)) => match serde_json::from_str::<Vec<String>>(s) {
            Ok(list) => list,
            Err(err) => {
                warn!(
                    option_id = %option_id,
                    error = %err,
                    "malformed incompatibility list, treating as empty"
                );
                Vec::new()
            }
        },
        Some(other) => {
            warn!(option_id = %option_id, ?other, "unexpected incompatibility shape, treating as empty");
            Vec::new()
        }
    }
}
