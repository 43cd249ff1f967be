//! Option catalog with fail-soft loading
//!
//! The catalog is fetched once per session from an [`OptionSource`]
//! (active-only filter) and is immutable afterwards. A source failure
//! must never make pricing impossible: the catalog degrades to a fixed
//! built-in default set, logged but not propagated.

use shared::models::{EmbroideryOption, OptionCategory, OptionLevel, OptionRecord};
use std::collections::HashMap;
use thiserror::Error;
use tracing::{debug, warn};

/// Option source failure (never propagates past catalog load)
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("option source unavailable: {0}")]
    Unavailable(String),

    #[error("option source returned malformed payload: {0}")]
    Decode(#[from] serde_json::Error),
}

/// External option source
///
/// Fetches catalog records with the "active only" filter already
/// applied where the source supports it; inactive records that slip
/// through are dropped during normalization.
pub trait OptionSource {
    fn fetch_active(&self) -> Result<Vec<OptionRecord>, SourceError>;
}

/// Immutable, normalized option catalog for one session
#[derive(Debug, Clone)]
pub struct OptionCatalog {
    /// Options in source order
    options: Vec<EmbroideryOption>,
    /// Index by option id
    by_id: HashMap<String, usize>,
}

impl OptionCatalog {
    /// Load from the external source, falling back to the built-in
    /// default catalog when the source is unavailable or yields
    /// nothing usable.
    pub fn load<S: OptionSource>(source: &S) -> Self {
        match source.fetch_active() {
            Ok(records) => {
                let catalog = Self::from_records(&records);
                if catalog.is_empty() {
                    warn!("option source returned no usable options, using built-in defaults");
                    Self::default_catalog()
                } else {
                    debug!(count = catalog.len(), "option catalog loaded");
                    catalog
                }
            }
            Err(err) => {
                warn!(error = %err, "option source unavailable, using built-in defaults");
                Self::default_catalog()
            }
        }
    }

    /// Build a catalog from raw records, applying the coercion rules
    /// (tolerant price parse, fail-open incompatibility lists) and
    /// dropping inactive or unknown-category records.
    pub fn from_records(records: &[OptionRecord]) -> Self {
        let options: Vec<EmbroideryOption> =
            records.iter().filter_map(OptionRecord::normalize).collect();
        Self::from_options(options)
    }

    fn from_options(options: Vec<EmbroideryOption>) -> Self {
        let by_id = options
            .iter()
            .enumerate()
            .map(|(i, o)| (o.id.clone(), i))
            .collect();
        Self { options, by_id }
    }

    /// Fixed built-in catalog used when the live source is unreachable
    pub fn default_catalog() -> Self {
        fn opt(
            id: &str,
            category: OptionCategory,
            level: OptionLevel,
            price: f64,
            popular: bool,
        ) -> EmbroideryOption {
            EmbroideryOption {
                id: id.to_string(),
                category,
                level,
                price,
                is_popular: popular,
                is_active: true,
                incompatible_with: Vec::new(),
            }
        }

        use OptionCategory::*;
        use OptionLevel::*;
        let options = vec![
            // Coverage
            opt("coverage-outline", Coverage, Basic, 8.00, false),
            opt("coverage-partial", Coverage, Standard, 11.25, true),
            opt("coverage-full", Coverage, Premium, 14.50, false),
            // Material
            opt("material-polyester", Material, Standard, 0.00, true),
            opt("material-cotton", Material, Standard, 2.50, false),
            opt("material-metallic", Material, Luxury, 6.75, false),
            // Border
            opt("border-none", Border, Basic, 0.00, true),
            opt("border-satin", Border, Standard, 3.25, false),
            opt("border-merrowed", Border, Premium, 4.50, false),
            // Threads
            opt("threads-glow", Threads, Premium, 5.00, false),
            opt("threads-variegated", Threads, Standard, 3.50, false),
            opt("threads-metallic", Threads, Luxury, 6.00, false),
            // Backing
            opt("backing-iron-on", Backing, Standard, 2.00, true),
            opt("backing-velcro", Backing, Standard, 3.75, false),
            // Upgrades
            opt("upgrade-rush", Upgrades, Standard, 10.00, false),
            opt("upgrade-digitizing", Upgrades, Premium, 15.00, false),
            // Cutting
            opt("cutting-die-cut", Cutting, Standard, 1.50, true),
            opt("cutting-laser", Cutting, Premium, 3.00, false),
        ];
        Self::from_options(options)
    }

    pub fn get(&self, id: &str) -> Option<&EmbroideryOption> {
        self.by_id.get(id).map(|&i| &self.options[i])
    }

    /// Active options of one category, in source order
    pub fn by_category(&self, category: OptionCategory) -> Vec<&EmbroideryOption> {
        self.options
            .iter()
            .filter(|o| o.category == category)
            .collect()
    }

    pub fn len(&self) -> usize {
        self.options.len()
    }

    pub fn is_empty(&self) -> bool {
        self.options.is_empty()
    }
}

impl Default for OptionCatalog {
    fn default() -> Self {
        Self::default_catalog()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    struct FailingSource;
    impl OptionSource for FailingSource {
        fn fetch_active(&self) -> Result<Vec<OptionRecord>, SourceError> {
            Err(SourceError::Unavailable("connection refused".to_string()))
        }
    }

    struct FixedSource(Vec<OptionRecord>);
    impl OptionSource for FixedSource {
        fn fetch_active(&self) -> Result<Vec<OptionRecord>, SourceError> {
            Ok(self.0.clone())
        }
    }

    fn record(id: &str, category: &str, price: serde_json::Value) -> OptionRecord {
        OptionRecord {
            id: id.to_string(),
            category: category.to_string(),
            level: None,
            price: Some(price),
            is_popular: false,
            is_active: true,
            incompatible_with: None,
        }
    }

    #[test]
    fn test_load_falls_back_on_source_error() {
        let catalog = OptionCatalog::load(&FailingSource);
        assert!(!catalog.is_empty());
        // Default catalog covers every category
        for category in OptionCategory::ALL {
            assert!(!catalog.by_category(category).is_empty());
        }
    }

    #[test]
    fn test_load_falls_back_on_empty_source() {
        let catalog = OptionCatalog::load(&FixedSource(vec![]));
        assert!(!catalog.is_empty());
    }

    #[test]
    fn test_load_normalizes_records() {
        let mut inactive = record("gone", "coverage", json!(1));
        inactive.is_active = false;
        let records = vec![
            record("c1", "coverage", json!("12.00")),
            record("m1", "material", json!(0)),
            inactive,
            record("weird", "sequins", json!(1)),
        ];
        let catalog = OptionCatalog::load(&FixedSource(records));
        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.get("c1").unwrap().price, 12.0);
        assert_eq!(catalog.get("m1").unwrap().price, 0.0);
        assert!(catalog.get("gone").is_none());
        assert!(catalog.get("weird").is_none());
    }

    #[test]
    fn test_default_catalog_has_free_tiers() {
        let catalog = OptionCatalog::default_catalog();
        assert_eq!(catalog.get("material-polyester").unwrap().price, 0.0);
        assert_eq!(catalog.get("border-none").unwrap().price, 0.0);
    }
}
