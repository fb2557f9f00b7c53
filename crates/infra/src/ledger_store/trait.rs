//! Storage contract for the append-only ledger and its entity registry.

use std::sync::Arc;

use thiserror::Error;

use goldbook_banking::BankAccount;
use goldbook_core::{BankAccountId, CustomerId, JewelryItemId};
use goldbook_inventory::{JewelryItem, JewelryState, StandardItem};
use goldbook_ledger::{PostedTransaction, Transaction};
use goldbook_parties::Customer;

/// Infrastructure failure. The outcome of the attempted operation is
/// unknown to the caller; batch execution stops on the first one.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("store lock poisoned during {0}")]
    LockPoisoned(&'static str),
    #[error("storage backend unavailable: {0}")]
    Unavailable(String),
}

/// A jewelry custody flip that must land atomically with its ledger record.
///
/// `expect` is the state the validator observed. The store re-checks it
/// under its write lock before committing anything, so two racing commits
/// cannot both flip the same piece.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JewelryTransition {
    pub jewelry_id: JewelryItemId,
    pub jewelry_code: String,
    pub expect: JewelryState,
    pub to: JewelryState,
}

/// Append failure.
#[derive(Debug, Error)]
pub enum AppendError {
    /// The compare-and-set on the jewelry state failed: another commit
    /// moved the piece between validation and this append.
    #[error("jewelry {code}: expected {expected}, found {found}")]
    StateConflict {
        code: String,
        expected: JewelryState,
        found: JewelryState,
    },
    /// The transition names a piece the registry does not hold.
    #[error("jewelry not found: {0}")]
    JewelryMissing(String),
    /// The requested flip is not a legal custody transition.
    #[error("invalid jewelry transition: {0}")]
    InvalidTransition(String),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Entity registry failure.
#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("duplicate {kind}: {key}")]
    Duplicate { kind: &'static str, key: String },
    #[error("{kind} not found: {key}")]
    Missing { kind: &'static str, key: String },
    #[error(transparent)]
    Storage(#[from] StorageError),
}

impl RegistryError {
    pub fn duplicate(kind: &'static str, key: impl ToString) -> Self {
        RegistryError::Duplicate {
            kind,
            key: key.to_string(),
        }
    }

    pub fn missing(kind: &'static str, key: impl ToString) -> Self {
        RegistryError::Missing {
            kind,
            key: key.to_string(),
        }
    }
}

/// The append-only transaction log plus the entity registry the validator
/// resolves references against.
///
/// The store assigns every committed record a gapless global `sequence`
/// starting at 1, and that sequence is the only ordering authority the
/// balance folds recognise. Records are never edited or deleted. Registry
/// rows are insert-only apart from their display fields.
pub trait LedgerStore: Send + Sync {
    /// Commit one record, atomically with its jewelry transition when one
    /// is present. Nothing is written when any part fails.
    fn append(
        &self,
        transaction: Transaction,
        transition: Option<JewelryTransition>,
    ) -> Result<PostedTransaction, AppendError>;

    /// One customer's records in insertion order.
    fn transactions_for(
        &self,
        customer: CustomerId,
    ) -> Result<Vec<PostedTransaction>, StorageError>;

    /// Every record in insertion order.
    fn all_transactions(&self) -> Result<Vec<PostedTransaction>, StorageError>;

    fn customer(&self, id: CustomerId) -> Result<Option<Customer>, StorageError>;

    fn bank_account(&self, id: BankAccountId) -> Result<Option<BankAccount>, StorageError>;

    fn jewelry(&self, id: JewelryItemId) -> Result<Option<JewelryItem>, StorageError>;

    /// Serial codes are unique across the registry, so this resolves at
    /// most one piece.
    fn jewelry_by_code(&self, code: &str) -> Result<Option<JewelryItem>, StorageError>;

    fn insert_customer(&self, customer: Customer) -> Result<(), RegistryError>;

    fn insert_bank_account(&self, account: BankAccount) -> Result<(), RegistryError>;

    fn insert_standard_item(&self, item: StandardItem) -> Result<(), RegistryError>;

    fn insert_jewelry(&self, item: JewelryItem) -> Result<(), RegistryError>;

    /// Replace a customer row after a display-name change.
    fn update_customer(&self, customer: Customer) -> Result<(), RegistryError>;

    /// Replace a bank-account row after a relabel.
    fn update_bank_account(&self, account: BankAccount) -> Result<(), RegistryError>;

    fn list_customers(&self) -> Result<Vec<Customer>, StorageError>;

    fn list_bank_accounts(&self) -> Result<Vec<BankAccount>, StorageError>;

    fn list_standard_items(&self) -> Result<Vec<StandardItem>, StorageError>;

    fn list_jewelry(&self) -> Result<Vec<JewelryItem>, StorageError>;
}

impl<S> LedgerStore for Arc<S>
where
    S: LedgerStore + ?Sized,
{
    fn append(
        &self,
        transaction: Transaction,
        transition: Option<JewelryTransition>,
    ) -> Result<PostedTransaction, AppendError> {
        (**self).append(transaction, transition)
    }

    fn transactions_for(
        &self,
        customer: CustomerId,
    ) -> Result<Vec<PostedTransaction>, StorageError> {
        (**self).transactions_for(customer)
    }

    fn all_transactions(&self) -> Result<Vec<PostedTransaction>, StorageError> {
        (**self).all_transactions()
    }

    fn customer(&self, id: CustomerId) -> Result<Option<Customer>, StorageError> {
        (**self).customer(id)
    }

    fn bank_account(&self, id: BankAccountId) -> Result<Option<BankAccount>, StorageError> {
        (**self).bank_account(id)
    }

    fn jewelry(&self, id: JewelryItemId) -> Result<Option<JewelryItem>, StorageError> {
        (**self).jewelry(id)
    }

    fn jewelry_by_code(&self, code: &str) -> Result<Option<JewelryItem>, StorageError> {
        (**self).jewelry_by_code(code)
    }

    fn insert_customer(&self, customer: Customer) -> Result<(), RegistryError> {
        (**self).insert_customer(customer)
    }

    fn insert_bank_account(&self, account: BankAccount) -> Result<(), RegistryError> {
        (**self).insert_bank_account(account)
    }

    fn insert_standard_item(&self, item: StandardItem) -> Result<(), RegistryError> {
        (**self).insert_standard_item(item)
    }

    fn insert_jewelry(&self, item: JewelryItem) -> Result<(), RegistryError> {
        (**self).insert_jewelry(item)
    }

    fn update_customer(&self, customer: Customer) -> Result<(), RegistryError> {
        (**self).update_customer(customer)
    }

    fn update_bank_account(&self, account: BankAccount) -> Result<(), RegistryError> {
        (**self).update_bank_account(account)
    }

    fn list_customers(&self) -> Result<Vec<Customer>, StorageError> {
        (**self).list_customers()
    }

    fn list_bank_accounts(&self) -> Result<Vec<BankAccount>, StorageError> {
        (**self).list_bank_accounts()
    }

    fn list_standard_items(&self) -> Result<Vec<StandardItem>, StorageError> {
        (**self).list_standard_items()
    }

    fn list_jewelry(&self) -> Result<Vec<JewelryItem>, StorageError> {
        (**self).list_jewelry()
    }
}
