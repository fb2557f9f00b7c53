use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use goldbook_core::CustomerId;

use crate::price::GoldPrice;

/// One counterparty's derived balance, as the caller computed it.
///
/// Sign convention matches the ledger: positive money is owed to the
/// counterparty, negative gold is their pure metal sitting with the
/// business.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BalanceSnapshot {
    pub customer_id: CustomerId,
    pub full_name: String,
    pub collaborator: bool,
    pub money: Decimal,
    pub gold_grams: Decimal,
}

/// What the business owes one counterparty, valued in money.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CustomerExposure {
    pub customer_id: CustomerId,
    pub full_name: String,
    /// Money owed to the counterparty (`max(money, 0)`).
    pub owed_money: Decimal,
    /// Pure grams of the counterparty's gold held by the business
    /// (`max(-gold_grams, 0)`).
    pub owed_gold_grams: Decimal,
    /// `owed_money + owed_gold_grams × price`.
    pub exposure: Decimal,
}

impl CustomerExposure {
    pub fn from_snapshot(snapshot: &BalanceSnapshot, price: GoldPrice) -> Self {
        let owed_money = snapshot.money.max(Decimal::ZERO);
        let owed_gold_grams = (-snapshot.gold_grams).max(Decimal::ZERO);
        let exposure = owed_money + owed_gold_grams * price.per_gram();
        Self {
            customer_id: snapshot.customer_id,
            full_name: snapshot.full_name.clone(),
            owed_money,
            owed_gold_grams,
            exposure,
        }
    }
}

/// Collaborator exposures, largest first.
///
/// Only collaborator snapshots are ranked; plain customers settle on their
/// own schedule. Ties break on the display name so the order is
/// deterministic.
pub fn rank_exposures(snapshots: &[BalanceSnapshot], price: GoldPrice) -> Vec<CustomerExposure> {
    let mut ranked: Vec<CustomerExposure> = snapshots
        .iter()
        .filter(|snapshot| snapshot.collaborator)
        .map(|snapshot| CustomerExposure::from_snapshot(snapshot, price))
        .collect();
    ranked.sort_by(|a, b| {
        b.exposure
            .cmp(&a.exposure)
            .then_with(|| a.full_name.cmp(&b.full_name))
    });
    ranked
}
