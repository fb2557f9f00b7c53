//! Balance derivation: the pure fold that is the only source of truth.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::transaction::Transaction;

/// A derived two-commodity position for one customer.
///
/// Never persisted. `money` positive means the business owes the customer;
/// `gold_grams` negative means the customer's pure gold sits with the
/// business (see the crate docs for the full convention).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Balance {
    pub money: Decimal,
    pub gold_grams: Decimal,
}

impl Balance {
    pub const ZERO: Balance = Balance {
        money: Decimal::ZERO,
        gold_grams: Decimal::ZERO,
    };

    pub fn is_settled(&self) -> bool {
        self.money.is_zero() && self.gold_grams.is_zero()
    }
}

/// Fold a history into a balance, in the order given.
///
/// Start from zero, apply each record's signed deltas, return the end state.
/// No caching and no running totals anywhere else: callers re-fold on every
/// question.
pub fn derive_balance<'a, I>(transactions: I) -> Balance
where
    I: IntoIterator<Item = &'a Transaction>,
{
    transactions.into_iter().fold(Balance::ZERO, |acc, tx| Balance {
        money: acc.money + tx.details.money_delta(),
        gold_grams: acc.gold_grams + tx.details.gold_delta(),
    })
}

/// The same fold restricted to records with `recorded_at <= as_of`.
///
/// Replays history up to a point in time. Insertion order is preserved; the
/// timestamp only decides membership.
pub fn derive_balance_as_of<'a, I>(transactions: I, as_of: DateTime<Utc>) -> Balance
where
    I: IntoIterator<Item = &'a Transaction>,
{
    derive_balance(
        transactions
            .into_iter()
            .filter(move |tx| tx.recorded_at <= as_of),
    )
}
