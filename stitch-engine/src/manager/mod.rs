//! Customization manager
//!
//! One [`CustomizationManager`] per product customization: it owns the
//! session, the loaded option catalog, the material rate card and the
//! optional snapshot store. All operations are synchronous; pricing is
//! recomputed on demand by explicit calls, never by background state.
//!
//! Every successful mutation triggers a best-effort snapshot save;
//! persistence failures are logged and never propagated, because
//! losing a draft must not break the customization flow.

use crate::catalog::{OptionCatalog, SourceError};
use crate::pricing::{self, MaterialRates};
use crate::storage::SessionStore;
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use shared::error::{EngineError, EngineResult};
use shared::models::{CostBreakdown, EmbroideryOption, OptionCategory, OptionRecord};
use shared::session::{CustomizationSession, Design, DesignFile, Dimensions, Placement, Position};
use shared::util::design_id;
use tracing::{debug, warn};

#[cfg(test)]
mod tests;

/// Maximum accepted upload size (10 MiB)
pub const MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

/// Raw user-initiated upload: declared filename, optional declared
/// content type, and the file bytes
#[derive(Debug, Clone)]
pub struct FileUpload {
    pub name: String,
    pub mime: Option<String>,
    pub bytes: Vec<u8>,
}

/// Owned handle over one customization session
pub struct CustomizationManager {
    session: CustomizationSession,
    catalog: OptionCatalog,
    rates: MaterialRates,
    store: Option<SessionStore>,
    /// Bumped on reset so catalog responses that resolve afterwards
    /// can be recognized as stale and discarded
    catalog_epoch: u64,
}

impl CustomizationManager {
    /// Create a manager with the built-in default catalog and the
    /// standard rate card
    pub fn new(base_price: f64) -> Self {
        Self {
            session: CustomizationSession::new(base_price),
            catalog: OptionCatalog::default_catalog(),
            rates: MaterialRates::default(),
            store: None,
            catalog_epoch: 0,
        }
    }

    pub fn with_store(mut self, store: SessionStore) -> Self {
        self.store = Some(store);
        self
    }

    pub fn with_rates(mut self, rates: MaterialRates) -> Self {
        self.rates = rates;
        self
    }

    pub fn with_catalog(mut self, catalog: OptionCatalog) -> Self {
        self.catalog = catalog;
        self
    }

    pub fn session(&self) -> &CustomizationSession {
        &self.session
    }

    pub fn catalog(&self) -> &OptionCatalog {
        &self.catalog
    }

    // ========================================================================
    // Catalog lifecycle
    // ========================================================================

    /// Epoch token to pair with an in-flight catalog fetch
    pub fn catalog_epoch(&self) -> u64 {
        self.catalog_epoch
    }

    /// Apply the result of a catalog fetch started under `epoch`.
    ///
    /// A result arriving after [`reset`](Self::reset) carries a stale
    /// epoch and is discarded silently. A fetch failure degrades to
    /// the built-in default catalog. Returns whether the result was
    /// applied.
    pub fn apply_catalog(
        &mut self,
        epoch: u64,
        result: Result<Vec<OptionRecord>, SourceError>,
    ) -> bool {
        if epoch != self.catalog_epoch {
            debug!(epoch, current = self.catalog_epoch, "discarding stale catalog response");
            return false;
        }
        self.catalog = match result {
            Ok(records) => {
                let catalog = OptionCatalog::from_records(&records);
                if catalog.is_empty() {
                    warn!("catalog fetch yielded no usable options, using built-in defaults");
                    OptionCatalog::default_catalog()
                } else {
                    catalog
                }
            }
            Err(err) => {
                warn!(error = %err, "catalog fetch failed, using built-in defaults");
                OptionCatalog::default_catalog()
            }
        };
        true
    }

    /// Clear the session and persisted snapshot, invalidating any
    /// in-flight catalog fetch
    pub fn reset(&mut self) {
        let base_price = self.session.base_price;
        self.session = CustomizationSession::new(base_price);
        self.catalog_epoch += 1;
        if let Some(store) = &mut self.store {
            if let Err(err) = store.clear() {
                warn!(error = %err, "failed to clear customization snapshot");
            }
        }
    }

    /// Replace the session with the persisted snapshot, if one exists.
    /// Returns whether a snapshot was restored.
    pub fn restore(&mut self) -> bool {
        let Some(store) = &self.store else {
            return false;
        };
        match store.load() {
            Some(session) => {
                self.session = session;
                true
            }
            None => false,
        }
    }

    // ========================================================================
    // Design lifecycle
    // ========================================================================

    /// Validate an upload and add it as a new design.
    ///
    /// Rejections (non-image type, over 10 MiB, empty file) leave the
    /// session unchanged and carry user-facing messages.
    pub fn add_design(&mut self, upload: FileUpload) -> EngineResult<String> {
        let mime = resolve_mime(&upload)?;
        if upload.bytes.is_empty() {
            return Err(EngineError::invalid_upload("The selected file is empty"));
        }
        if upload.bytes.len() > MAX_UPLOAD_BYTES {
            return Err(EngineError::invalid_upload(
                "Images must be 10 MiB or smaller",
            ));
        }

        let id = design_id();
        let mut design = Design::new(id.clone());
        design.preview = Some(format!(
            "data:{};base64,{}",
            mime,
            BASE64.encode(&upload.bytes)
        ));
        design.file = Some(DesignFile {
            name: upload.name,
            size: upload.bytes.len() as u64,
            mime,
            bytes: upload.bytes,
        });

        self.session.add_design(design)?;
        self.persist();
        Ok(id)
    }

    pub fn remove_design(&mut self, design_id: &str) -> EngineResult<()> {
        if !self.session.remove_design(design_id) {
            return Err(EngineError::design_not_found(design_id));
        }
        self.persist();
        Ok(())
    }

    // ========================================================================
    // Selection
    // ========================================================================

    /// Select an option in a single-select category (re-click
    /// deselects). Incompatibility with selections in other categories
    /// is advisory and never blocks; see
    /// [`design_conflicts`](Self::design_conflicts).
    pub fn select_style(
        &mut self,
        design_id: &str,
        category: OptionCategory,
        option_id: &str,
    ) -> EngineResult<()> {
        let option = self.catalog_option(category, option_id)?;
        self.design_mut(design_id)?.select(option);
        self.persist();
        Ok(())
    }

    /// Toggle an option in a multi-select category (set XOR by id)
    pub fn toggle_style(
        &mut self,
        design_id: &str,
        category: OptionCategory,
        option_id: &str,
    ) -> EngineResult<()> {
        let option = self.catalog_option(category, option_id)?;
        self.design_mut(design_id)?.toggle(option);
        self.persist();
        Ok(())
    }

    pub fn is_selected(
        &self,
        design_id: &str,
        category: OptionCategory,
        option_id: &str,
    ) -> EngineResult<bool> {
        Ok(self.design(design_id)?.is_selected(category, option_id))
    }

    /// Whether every required category of the design has a selection
    pub fn can_finalize(&self, design_id: &str) -> EngineResult<bool> {
        Ok(self.design(design_id)?.can_finalize())
    }

    /// Advisory incompatibility conflicts among the design's current
    /// selections, for the review UI
    pub fn design_conflicts(&self, design_id: &str) -> EngineResult<Vec<(String, String)>> {
        Ok(self.design(design_id)?.selections.conflicts())
    }

    // ========================================================================
    // Dimensions / session fields
    // ========================================================================

    pub fn set_dimensions(&mut self, design_id: &str, width: f64, height: f64) -> EngineResult<()> {
        let dims = Dimensions { width, height };
        if !dims.is_valid() {
            return Err(EngineError::invalid_dimensions(format!(
                "width and height must be positive, got {width} x {height}"
            )));
        }
        let design = self.design_mut(design_id)?;
        design.dimensions = Some(dims);
        self.session.touch();
        self.persist();
        Ok(())
    }

    pub fn set_placement(
        &mut self,
        design_id: &str,
        placement: Placement,
        position: Position,
    ) -> EngineResult<()> {
        let design = self.design_mut(design_id)?;
        design.placement = placement;
        design.position = position;
        self.session.touch();
        self.persist();
        Ok(())
    }

    pub fn set_quantity(&mut self, quantity: u32) -> EngineResult<()> {
        if quantity == 0 {
            return Err(EngineError::InvalidQuantity { quantity });
        }
        self.session.quantity = quantity;
        self.session.touch();
        self.persist();
        Ok(())
    }

    pub fn set_base_price(&mut self, base_price: f64) -> EngineResult<()> {
        if !base_price.is_finite() || base_price < 0.0 {
            return Err(EngineError::invalid_price(format!(
                "base price must be finite and non-negative, got {base_price}"
            )));
        }
        self.session.base_price = base_price;
        self.session.touch();
        self.persist();
        Ok(())
    }

    // ========================================================================
    // Pricing
    // ========================================================================

    pub fn calculate_design_price(&self, design_id: &str) -> EngineResult<f64> {
        let design = self.design(design_id)?;
        Ok(pricing::to_money_f64(pricing::design_price(design, &self.rates)))
    }

    pub fn calculate_session_total(&self) -> f64 {
        pricing::to_money_f64(pricing::session_total(&self.session, &self.rates))
    }

    /// Itemized material cost for the design, `None` until it has
    /// positive dimensions ("no cost yet")
    pub fn get_cost_breakdown(&self, design_id: &str) -> EngineResult<Option<CostBreakdown>> {
        let design = self.design(design_id)?;
        Ok(design
            .priced_dimensions()
            .map(|dims| pricing::compute_material_cost(dims, &self.rates)))
    }

    // ========================================================================
    // Internals
    // ========================================================================

    fn design(&self, design_id: &str) -> EngineResult<&Design> {
        self.session
            .design(design_id)
            .ok_or_else(|| EngineError::design_not_found(design_id))
    }

    fn design_mut(&mut self, design_id: &str) -> EngineResult<&mut Design> {
        self.session
            .design_mut(design_id)
            .ok_or_else(|| EngineError::design_not_found(design_id))
    }

    fn catalog_option(
        &self,
        category: OptionCategory,
        option_id: &str,
    ) -> EngineResult<EmbroideryOption> {
        match self.catalog.get(option_id) {
            Some(option) if option.category == category => Ok(option.clone()),
            _ => Err(EngineError::option_not_found(option_id)),
        }
    }

    /// Best-effort snapshot save; failures are warnings, never errors
    fn persist(&mut self) {
        if let Some(store) = &mut self.store {
            if let Err(err) = store.save(&self.session) {
                warn!(error = %err, "failed to persist customization snapshot");
            }
        }
    }
}

/// Resolve the upload's content type: declared type first, then a
/// guess from the filename. Only `image/*` is embroiderable.
fn resolve_mime(upload: &FileUpload) -> EngineResult<String> {
    let mime = match upload.mime.as_deref().filter(|m| !m.is_empty()) {
        Some(declared) => declared.to_string(),
        None => mime_guess::from_path(&upload.name)
            .first_raw()
            .unwrap_or("application/octet-stream")
            .to_string(),
    };
    if !mime.starts_with("image/") {
        return Err(EngineError::invalid_upload(
            "Only image files can be embroidered",
        ));
    }
    Ok(mime)
}
