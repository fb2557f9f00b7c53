//! Banking domain module (business bank accounts).
//!
//! Bank accounts are registry entities referenced by money transactions. Their
//! balances are never stored; an account's net flow is derived from the ledger.

pub mod account;

pub use account::BankAccount;
