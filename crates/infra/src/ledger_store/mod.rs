//! Ledger storage: the append contract and the in-memory backend.

pub mod in_memory;
pub mod r#trait;

pub use in_memory::InMemoryLedgerStore;
pub use r#trait::{AppendError, JewelryTransition, LedgerStore, RegistryError, StorageError};
