//! Inventory domain module (catalog items and unique jewelry pieces).
//!
//! This crate contains the item registry entities, implemented purely as
//! deterministic domain logic (no IO, no HTTP, no storage). The only mutable
//! item state the ledger touches is [`JewelryState`]; the transition rules
//! live here, the atomic commit discipline lives in the store.

pub mod jewelry;
pub mod standard;

pub use jewelry::{JewelryItem, JewelryState};
pub use standard::StandardItem;

use goldbook_core::{DomainError, DomainResult};
use rust_decimal::Decimal;

/// Shared numeric guardrails for gold quantities.
///
/// Weights are strictly positive grams; purity is a fineness fraction in
/// `(0, 1]` (e.g. 0.750, 0.999).
pub(crate) fn ensure_weight(weight_grams: Decimal) -> DomainResult<()> {
    if weight_grams <= Decimal::ZERO {
        return Err(DomainError::validation(format!(
            "weight_grams must be positive: {weight_grams}"
        )));
    }
    Ok(())
}

pub(crate) fn ensure_purity(purity: Decimal) -> DomainResult<()> {
    if purity <= Decimal::ZERO || purity > Decimal::ONE {
        return Err(DomainError::validation(format!(
            "purity must lie in (0, 1]: {purity}"
        )));
    }
    Ok(())
}

pub(crate) fn ensure_code(code: &str) -> DomainResult<()> {
    if code.trim().is_empty() {
        return Err(DomainError::validation("code cannot be empty"));
    }
    Ok(())
}
