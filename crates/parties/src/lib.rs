//! Parties domain module (customers and collaborators).
//!
//! This crate contains the counterparty registry entities, implemented purely
//! as deterministic domain logic (no IO, no HTTP, no storage). Balances are
//! deliberately absent: a counterparty's position is derived from the ledger,
//! never stored on the entity.

pub mod customer;

pub use customer::{Customer, CustomerRole};
