//! `goldbook-advisor`
//!
//! **Responsibility:** settlement insight over derived balances.
//!
//! This crate is intentionally **not** part of the domain model:
//! - It must not depend on the ledger or the entity registry.
//! - It must not mutate any state.
//! - It emits suggestions, not transactions.
//!
//! Callers (the API layer) derive balances, hand them over as snapshots,
//! and decide what to do with the answer.

pub mod exposure;
pub mod price;
pub mod settlement;

pub use exposure::{BalanceSnapshot, CustomerExposure, rank_exposures};
pub use price::{AdvisorError, GoldPrice};
pub use settlement::{SettlementSuggestion, suggest_settlement};
