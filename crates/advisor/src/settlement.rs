use rust_decimal::Decimal;
use serde::Serialize;

use crate::exposure::{BalanceSnapshot, CustomerExposure, rank_exposures};
use crate::price::GoldPrice;

/// A settlement recommendation: which counterparty to pay down first.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SettlementSuggestion {
    pub candidate: CustomerExposure,
    pub explanation: String,
}

/// Pick the collaborator the business owes the most, every position valued
/// at `price`. `None` when no collaborator is owed anything.
pub fn suggest_settlement(
    snapshots: &[BalanceSnapshot],
    price: GoldPrice,
) -> Option<SettlementSuggestion> {
    let candidate = rank_exposures(snapshots, price)
        .into_iter()
        .find(|exposure| exposure.exposure > Decimal::ZERO)?;
    let explanation = format!(
        "settle with {}: owed {} in money, plus {} g pure gold held, {} total at {} per gram",
        candidate.full_name,
        candidate.owed_money,
        candidate.owed_gold_grams,
        candidate.exposure,
        price.per_gram(),
    );
    Some(SettlementSuggestion {
        candidate,
        explanation,
    })
}
