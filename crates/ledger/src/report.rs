//! Report folds over a customer's history.
//!
//! Like balance derivation these are pure functions of the record sequence;
//! nothing here reads a registry or caches a result.

use std::collections::HashMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use goldbook_core::BankAccountId;

use crate::transaction::{Transaction, TransactionDetails};

/// Net raw-gold position for one purity, signed like the balance fold.
///
/// Only the four raw-gold kinds contribute; jewelry moves are tracked
/// per-piece instead (see [`jewelry_positions`]).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PurityBucket {
    pub purity: Decimal,
    /// Signed alloy weight, grams.
    pub net_weight_grams: Decimal,
    /// Signed pure gold content, grams (`net_weight_grams × purity`).
    pub net_pure_grams: Decimal,
}

/// Group the raw-gold movements of a history by payload purity.
///
/// Buckets are ordered by purity descending. A bucket that nets to zero is
/// kept: it still tells the business that metal of that fineness moved.
pub fn raw_gold_by_purity<'a, I>(transactions: I) -> Vec<PurityBucket>
where
    I: IntoIterator<Item = &'a Transaction>,
{
    let mut buckets: Vec<PurityBucket> = Vec::new();

    for tx in transactions {
        let (signed_weight, purity) = match &tx.details {
            TransactionDetails::SellRawGold(trade) => (-trade.weight_grams, trade.purity),
            TransactionDetails::BuyRawGold(trade) => (trade.weight_grams, trade.purity),
            TransactionDetails::ReceiveRawGold(transfer) => {
                (-transfer.weight_grams, transfer.purity)
            }
            TransactionDetails::GiveRawGold(transfer) => (transfer.weight_grams, transfer.purity),
            TransactionDetails::ReceiveMoney(_)
            | TransactionDetails::SendMoney(_)
            | TransactionDetails::ReceiveJewelry(_)
            | TransactionDetails::GiveJewelry(_) => continue,
        };

        match buckets.iter_mut().find(|b| b.purity == purity) {
            Some(bucket) => {
                bucket.net_weight_grams += signed_weight;
                bucket.net_pure_grams += signed_weight * purity;
            }
            None => buckets.push(PurityBucket {
                purity,
                net_weight_grams: signed_weight,
                net_pure_grams: signed_weight * purity,
            }),
        }
    }

    buckets.sort_by(|a, b| b.purity.cmp(&a.purity));
    buckets
}

/// Who currently holds a piece, from the net signed flow of its moves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JewelryCustody {
    /// Net flow into the business: the piece (or its value) sits with us.
    HeldByBusiness,
    /// Net flow out: the piece is with the customer.
    WithCustomer,
    /// Gives and receives cancelled out.
    Settled,
}

/// Net position of one jewelry piece within one customer's history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JewelryPosition {
    pub jewelry_code: String,
    /// Signed pure grams, same convention as the balance fold.
    pub net_pure_grams: Decimal,
    pub custody: JewelryCustody,
}

/// Per-piece net flow over the two jewelry kinds, ordered by the code's first
/// appearance in the history.
pub fn jewelry_positions<'a, I>(transactions: I) -> Vec<JewelryPosition>
where
    I: IntoIterator<Item = &'a Transaction>,
{
    let mut order: Vec<String> = Vec::new();
    let mut nets: HashMap<String, Decimal> = HashMap::new();

    for tx in transactions {
        // Only the two jewelry kinds carry a serial code; their gold delta
        // is the piece's signed pure content.
        let Some(code) = tx.details.jewelry_code() else {
            continue;
        };
        if !nets.contains_key(code) {
            order.push(code.to_string());
        }
        *nets.entry(code.to_string()).or_insert(Decimal::ZERO) += tx.details.gold_delta();
    }

    order
        .into_iter()
        .map(|code| {
            let net = nets[&code];
            let custody = if net < Decimal::ZERO {
                JewelryCustody::HeldByBusiness
            } else if net > Decimal::ZERO {
                JewelryCustody::WithCustomer
            } else {
                JewelryCustody::Settled
            };
            JewelryPosition {
                jewelry_code: code,
                net_pure_grams: net,
                custody,
            }
        })
        .collect()
}

/// Net money moved through one bank account across the given records.
///
/// `ReceiveMoney` raises the account (money came in), `SendMoney` lowers it;
/// the signs coincide with `money_delta`, so this is a filtered delta sum.
pub fn bank_account_flow<'a, I>(transactions: I, account: BankAccountId) -> Decimal
where
    I: IntoIterator<Item = &'a Transaction>,
{
    transactions
        .into_iter()
        .filter(|tx| tx.details.bank_account_id() == Some(account))
        .map(|tx| tx.details.money_delta())
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transaction::{
        JewelryMovement, MoneyMovement, RawGoldTrade, RawGoldTransfer,
    };
    use chrono::Utc;
    use goldbook_core::{CustomerId, JewelryItemId, TransactionId};
    use rust_decimal_macros::dec;

    fn tx(details: TransactionDetails) -> Transaction {
        Transaction::new(TransactionId::new(), CustomerId::new(), details, None, Utc::now())
    }

    fn movement(code: &str, weight: Decimal, purity: Decimal) -> JewelryMovement {
        JewelryMovement {
            jewelry_id: JewelryItemId::new(),
            jewelry_code: code.to_string(),
            weight_grams: weight,
            purity,
        }
    }

    #[test]
    fn buckets_group_by_purity_descending() {
        let history = vec![
            tx(TransactionDetails::ReceiveRawGold(RawGoldTransfer {
                weight_grams: dec!(10),
                purity: dec!(0.750),
            })),
            tx(TransactionDetails::SellRawGold(RawGoldTrade {
                weight_grams: dec!(30),
                purity: dec!(0.999),
                price: dec!(290_000_000),
            })),
            tx(TransactionDetails::GiveRawGold(RawGoldTransfer {
                weight_grams: dec!(4),
                purity: dec!(0.750),
            })),
        ];

        let buckets = raw_gold_by_purity(&history);
        assert_eq!(buckets.len(), 2);

        assert_eq!(buckets[0].purity, dec!(0.999));
        assert_eq!(buckets[0].net_weight_grams, dec!(-30));
        assert_eq!(buckets[0].net_pure_grams, dec!(-29.970));

        assert_eq!(buckets[1].purity, dec!(0.750));
        assert_eq!(buckets[1].net_weight_grams, dec!(-6));
        assert_eq!(buckets[1].net_pure_grams, dec!(-4.500));
    }

    #[test]
    fn buckets_ignore_money_and_jewelry_kinds() {
        let history = vec![
            tx(TransactionDetails::ReceiveMoney(MoneyMovement {
                amount: dec!(100),
                bank_account_id: BankAccountId::new(),
            })),
            tx(TransactionDetails::GiveJewelry(movement("RING-1", dec!(5), dec!(0.750)))),
        ];

        assert!(raw_gold_by_purity(&history).is_empty());
    }

    #[test]
    fn zero_net_bucket_is_kept() {
        let transfer = RawGoldTransfer {
            weight_grams: dec!(10),
            purity: dec!(0.900),
        };
        let history = vec![
            tx(TransactionDetails::ReceiveRawGold(transfer.clone())),
            tx(TransactionDetails::GiveRawGold(transfer)),
        ];

        let buckets = raw_gold_by_purity(&history);
        assert_eq!(buckets.len(), 1);
        assert_eq!(buckets[0].net_weight_grams, Decimal::ZERO);
    }

    #[test]
    fn jewelry_positions_track_custody_per_piece() {
        let ring = movement("RING-1", dec!(10), dec!(0.750));
        let chain = movement("CHAIN-2", dec!(20), dec!(0.900));

        let history = vec![
            // Ring goes out and comes back: settled.
            tx(TransactionDetails::GiveJewelry(ring.clone())),
            tx(TransactionDetails::ReceiveJewelry(ring)),
            // Chain comes in on consignment: held by the business.
            tx(TransactionDetails::ReceiveJewelry(chain)),
        ];

        let positions = jewelry_positions(&history);
        assert_eq!(positions.len(), 2);

        assert_eq!(positions[0].jewelry_code, "RING-1");
        assert_eq!(positions[0].custody, JewelryCustody::Settled);
        assert_eq!(positions[0].net_pure_grams, Decimal::ZERO);

        assert_eq!(positions[1].jewelry_code, "CHAIN-2");
        assert_eq!(positions[1].custody, JewelryCustody::HeldByBusiness);
        assert_eq!(positions[1].net_pure_grams, dec!(-18.000));
    }

    #[test]
    fn jewelry_position_with_customer_after_give() {
        let history = vec![tx(TransactionDetails::GiveJewelry(movement(
            "RING-9",
            dec!(8),
            dec!(0.750),
        )))];

        let positions = jewelry_positions(&history);
        assert_eq!(positions[0].custody, JewelryCustody::WithCustomer);
        assert_eq!(positions[0].net_pure_grams, dec!(6.000));
    }

    #[test]
    fn bank_flow_filters_by_account() {
        let melli = BankAccountId::new();
        let saderat = BankAccountId::new();

        let history = vec![
            tx(TransactionDetails::ReceiveMoney(MoneyMovement {
                amount: dec!(500),
                bank_account_id: melli,
            })),
            tx(TransactionDetails::SendMoney(MoneyMovement {
                amount: dec!(200),
                bank_account_id: melli,
            })),
            tx(TransactionDetails::ReceiveMoney(MoneyMovement {
                amount: dec!(999),
                bank_account_id: saderat,
            })),
        ];

        assert_eq!(bank_account_flow(&history, melli), dec!(300));
        assert_eq!(bank_account_flow(&history, saderat), dec!(999));
        assert_eq!(bank_account_flow(&history, BankAccountId::new()), Decimal::ZERO);
    }
}
