//! `goldbook-core`: domain foundation building blocks.
//!
//! This crate contains **pure domain** primitives shared by every goldbook
//! crate (typed identifiers, the domain error model, the entity contract).
//! No persistence, no transport, no clocks.

pub mod entity;
pub mod error;
pub mod id;

pub use entity::Entity;
pub use error::{DomainError, DomainResult};
pub use id::{BankAccountId, CustomerId, JewelryItemId, StandardItemId, TransactionId};
