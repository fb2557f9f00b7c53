//! Ledger domain module: the transaction record model and the balance folds.
//!
//! The ledger is append-only. A record is never edited or deleted; a mistake
//! is corrected by a new compensating record. Balances are **derived**, never
//! stored: every position answer folds the relevant history in insertion
//! order, every time.
//!
//! Sign convention (business point of view, per customer):
//! - `money > 0`: the business owes the customer money.
//! - `gold  < 0`: the customer's pure gold has net-flowed into the business.
//! - The mirror readings hold too: negative money is the customer's debt,
//!   positive gold is metal the business has net-handed out.

pub mod balance;
pub mod report;
pub mod transaction;

pub use balance::{Balance, derive_balance, derive_balance_as_of};
pub use report::{
    JewelryCustody, JewelryPosition, PurityBucket, bank_account_flow, jewelry_positions,
    raw_gold_by_purity,
};
pub use transaction::{
    JewelryMovement, MoneyMovement, PostedTransaction, RawGoldTrade, RawGoldTransfer, Transaction,
    TransactionDetails, TransactionKind,
};
