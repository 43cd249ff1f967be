//! Price calculation using rust_decimal for precision
//!
//! All arithmetic is done with `Decimal` internally and converted to
//! `f64` only at the caller boundary, rounded half-up to 2 decimal
//! places. Every function here is pure: identical input always yields
//! an identical result, with no hidden pricing state.

use rust_decimal::prelude::*;
use shared::models::CostBreakdown;
use shared::session::{CustomizationSession, Design, Dimensions, SelectionSet};


/// Rounding for monetary values (2 decimal places, half-up)
const DECIMAL_PLACES: u32 = 2;

fn round_money(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(DECIMAL_PLACES, RoundingStrategy::MidpointAwayFromZero)
}

/// Convert a boundary value to `f64`, rounded to money precision
pub fn to_money_f64(value: Decimal) -> f64 {
    round_money(value).to_f64().unwrap_or(0.0)
}

fn decimal(value: f64) -> Decimal {
    Decimal::from_f64(value).unwrap_or(Decimal::ZERO)
}

// ============================================================================
// Material Rates
// ============================================================================

/// Per-square-inch rate card for the six material cost components.
///
/// External configuration, not a business rule the engine invents; the
/// `Default` is the standard storefront rate card.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MaterialRates {
    pub fabric: Decimal,
    pub patch_attach: Decimal,
    pub thread: Decimal,
    pub bobbin: Decimal,
    pub cut_away_stabilizer: Decimal,
    pub wash_away_stabilizer: Decimal,
}

impl Default for MaterialRates {
    fn default() -> Self {
        Self {
            fabric: Decimal::new(45, 2),                // 0.45 / sq in
            patch_attach: Decimal::new(30, 2),          // 0.30
            thread: Decimal::new(55, 2),                // 0.55
            bobbin: Decimal::new(15, 2),                // 0.15
            cut_away_stabilizer: Decimal::new(25, 2),   // 0.25
            wash_away_stabilizer: Decimal::new(20, 2),  // 0.20
        }
    }
}

// ============================================================================
// Material Cost Calculator
// ============================================================================

/// Compute the itemized material cost for the given physical size.
///
/// Pure function of `(width, height)` and the rate card: each of the
/// six components is rate × area, rounded independently; `total_cost`
/// is their sum. Callers do not invoke this for missing or
/// non-positive dimensions (zero-area is not priced).
pub fn compute_material_cost(dims: Dimensions, rates: &MaterialRates) -> CostBreakdown {
    let area = decimal(dims.width) * decimal(dims.height);

    let fabric = round_money(rates.fabric * area);
    let patch_attach = round_money(rates.patch_attach * area);
    let thread = round_money(rates.thread * area);
    let bobbin = round_money(rates.bobbin * area);
    let cut_away = round_money(rates.cut_away_stabilizer * area);
    let wash_away = round_money(rates.wash_away_stabilizer * area);
    let total = fabric + patch_attach + thread + bobbin + cut_away + wash_away;

    CostBreakdown {
        fabric: to_money_f64(fabric),
        patch_attach: to_money_f64(patch_attach),
        thread: to_money_f64(thread),
        bobbin: to_money_f64(bobbin),
        cut_away_stabilizer: to_money_f64(cut_away),
        wash_away_stabilizer: to_money_f64(wash_away),
        total_cost: to_money_f64(total),
    }
}

/// Material total as Decimal; zero when no priceable dimensions exist
fn material_total(design: &Design, rates: &MaterialRates) -> Decimal {
    match design.priced_dimensions() {
        Some(dims) => decimal(compute_material_cost(dims, rates).total_cost),
        None => Decimal::ZERO,
    }
}

// ============================================================================
// Price Aggregator
// ============================================================================

/// Sum of every selected option's price across all categories.
///
/// Single-select categories contribute 0 or 1 option, multi-select
/// 0..N. Zero-price ("free") options contribute zero but are still
/// counted as selected.
fn options_subtotal(selections: &SelectionSet) -> Decimal {
    selections
        .selected_options()
        .iter()
        .map(|o| decimal(o.price))
        .sum()
}

/// Per-design price: material cost total plus all selected option
/// prices. A design with no selections and no dimensions contributes
/// exactly zero.
pub fn design_price(design: &Design, rates: &MaterialRates) -> Decimal {
    round_money(material_total(design, rates) + options_subtotal(&design.selections))
}

/// Session total: `(base_price + Σ design_price) × quantity`.
///
/// When the `designs` list is empty, falls back to the legacy
/// single-design shape and prices the session's own top-level
/// selections instead. A non-empty `designs` list always wins.
pub fn session_total(session: &CustomizationSession, rates: &MaterialRates) -> Decimal {
    let designs_subtotal: Decimal = if session.designs.is_empty() {
        options_subtotal(&session.selections)
    } else {
        session
            .designs
            .iter()
            .map(|d| design_price(d, rates))
            .sum()
    };

    let quantity = Decimal::from(session.quantity.max(1));
    round_money((decimal(session.base_price) + designs_subtotal) * quantity)
}
