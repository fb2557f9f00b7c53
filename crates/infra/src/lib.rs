//! Infrastructure for the goldbook ledger.
//!
//! This crate wires the domain crates into a running pipeline:
//! request validation, atomic commit against a [`LedgerStore`], and the
//! read side that folds histories into balances and reports. The store
//! contract lives behind a trait so the in-memory backend can be swapped
//! for a durable one without touching the pipeline.

pub mod executor;
pub mod ledger_store;
pub mod reader;
pub mod validator;


pub use executor::{
    BatchAborted, BatchItem, BatchReport, CommitReceipt, ExecuteError, ItemOutcome,
    TransactionExecutor,
};
pub use ledger_store::{
    AppendError, InMemoryLedgerStore, JewelryTransition, LedgerStore, RegistryError, StorageError,
};
pub use reader::{CustomerOverview, LedgerReader, ReadError};
pub use validator::{
    JewelryRef, RejectReason, TransactionRequest, TransactionValidator, ValidateError,
    ValidatedTransaction,
};
