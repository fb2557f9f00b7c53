//! The read side: every answer folds ledger history on demand.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use thiserror::Error;

use goldbook_core::{BankAccountId, CustomerId};
use goldbook_ledger::{
    Balance, JewelryPosition, PostedTransaction, PurityBucket, bank_account_flow, derive_balance,
    derive_balance_as_of, jewelry_positions, raw_gold_by_purity,
};
use goldbook_parties::Customer;

use crate::ledger_store::{LedgerStore, StorageError};

/// Read failure.
#[derive(Debug, Error)]
pub enum ReadError {
    #[error("customer not found: {0}")]
    CustomerNotFound(CustomerId),
    #[error("bank account not found: {0}")]
    BankAccountNotFound(BankAccountId),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// A customer row together with its derived balance.
#[derive(Debug, Clone, PartialEq)]
pub struct CustomerOverview {
    pub customer: Customer,
    pub balance: Balance,
}

/// Derivation queries over a [`LedgerStore`].
///
/// Nothing here is cached or stored. Every call fetches the relevant
/// history and folds it in sequence order.
pub struct LedgerReader<S> {
    store: S,
}

impl<S: LedgerStore> LedgerReader<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Full statement: the customer's records in insertion order.
    pub fn statement(&self, customer: CustomerId) -> Result<Vec<PostedTransaction>, ReadError> {
        self.ensure_customer(customer)?;
        Ok(self.store.transactions_for(customer)?)
    }

    pub fn balance(&self, customer: CustomerId) -> Result<Balance, ReadError> {
        let posted = self.statement(customer)?;
        Ok(derive_balance(posted.iter().map(|p| &p.record)))
    }

    /// Balance from records captured at or before `as_of`.
    pub fn balance_as_of(
        &self,
        customer: CustomerId,
        as_of: DateTime<Utc>,
    ) -> Result<Balance, ReadError> {
        let posted = self.statement(customer)?;
        Ok(derive_balance_as_of(
            posted.iter().map(|p| &p.record),
            as_of,
        ))
    }

    /// Net raw-gold position per purity, highest purity first.
    pub fn raw_gold_by_purity(
        &self,
        customer: CustomerId,
    ) -> Result<Vec<PurityBucket>, ReadError> {
        let posted = self.statement(customer)?;
        Ok(raw_gold_by_purity(posted.iter().map(|p| &p.record)))
    }

    /// Net per-piece jewelry flow for one customer.
    pub fn jewelry_positions(
        &self,
        customer: CustomerId,
    ) -> Result<Vec<JewelryPosition>, ReadError> {
        let posted = self.statement(customer)?;
        Ok(jewelry_positions(posted.iter().map(|p| &p.record)))
    }

    /// Net money flow through one bank account, across all customers.
    pub fn bank_account_balance(&self, account: BankAccountId) -> Result<Decimal, ReadError> {
        if self.store.bank_account(account)?.is_none() {
            return Err(ReadError::BankAccountNotFound(account));
        }
        let posted = self.store.all_transactions()?;
        Ok(bank_account_flow(posted.iter().map(|p| &p.record), account))
    }

    /// One customer with its derived balance.
    pub fn overview(&self, customer: CustomerId) -> Result<CustomerOverview, ReadError> {
        let row = self
            .store
            .customer(customer)?
            .ok_or(ReadError::CustomerNotFound(customer))?;
        let posted = self.store.transactions_for(customer)?;
        Ok(CustomerOverview {
            customer: row,
            balance: derive_balance(posted.iter().map(|p| &p.record)),
        })
    }

    /// Every registered customer with its derived balance, in registration
    /// order.
    pub fn overviews(&self) -> Result<Vec<CustomerOverview>, ReadError> {
        let customers = self.store.list_customers()?;
        let posted = self.store.all_transactions()?;
        Ok(customers
            .into_iter()
            .map(|customer| {
                let id = customer.id();
                let balance = derive_balance(
                    posted
                        .iter()
                        .map(|p| &p.record)
                        .filter(|record| record.customer_id == id),
                );
                CustomerOverview { customer, balance }
            })
            .collect())
    }

    fn ensure_customer(&self, customer: CustomerId) -> Result<(), ReadError> {
        if self.store.customer(customer)?.is_none() {
            return Err(ReadError::CustomerNotFound(customer));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use goldbook_parties::CustomerRole;

    use crate::ledger_store::InMemoryLedgerStore;

    use super::*;

    #[test]
    fn statement_requires_a_known_customer() {
        let reader = LedgerReader::new(InMemoryLedgerStore::new());
        let err = reader.statement(CustomerId::new()).unwrap_err();
        assert!(matches!(err, ReadError::CustomerNotFound(_)));
    }

    #[test]
    fn overviews_cover_every_registered_customer() {
        let store = InMemoryLedgerStore::new();
        for name in ["One", "Two", "Three"] {
            let customer = Customer::register(
                CustomerId::new(),
                name,
                CustomerRole::Customer,
                None,
                Utc::now(),
            )
            .unwrap();
            store.insert_customer(customer).unwrap();
        }

        let reader = LedgerReader::new(store);
        let overviews = reader.overviews().unwrap();
        assert_eq!(overviews.len(), 3);
        assert_eq!(overviews[0].customer.full_name(), "One");
        assert!(overviews.iter().all(|o| o.balance == Balance::ZERO));
    }
}
