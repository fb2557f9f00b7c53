//! In-memory ledger store.
//!
//! Single-process backend: one `RwLock` guards the whole state, so appends
//! are serialised, the global sequence stays gapless, and a jewelry
//! transition lands in the same critical section as its record.

use std::collections::HashMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use goldbook_banking::BankAccount;
use goldbook_core::{BankAccountId, CustomerId, Entity, JewelryItemId};
use goldbook_inventory::{JewelryItem, JewelryState, StandardItem};
use goldbook_ledger::{PostedTransaction, Transaction};
use goldbook_parties::Customer;

use super::r#trait::{AppendError, JewelryTransition, LedgerStore, RegistryError, StorageError};

/// Insertion-ordered rows with an id index. One per entity kind; the
/// code-keyed indexes for items stay beside it in [`Inner`].
#[derive(Debug)]
struct Registry<E: Entity> {
    rows: Vec<E>,
    by_id: HashMap<E::Id, usize>,
}

impl<E: Entity> Default for Registry<E> {
    fn default() -> Self {
        Self {
            rows: Vec::new(),
            by_id: HashMap::new(),
        }
    }
}

impl<E: Entity + Clone> Registry<E> {
    /// Returns the new row index so secondary indexes can reference it.
    fn insert(&mut self, kind: &'static str, entity: E) -> Result<usize, RegistryError> {
        if self.by_id.contains_key(&entity.id()) {
            return Err(RegistryError::duplicate(kind, entity.id()));
        }
        let index = self.rows.len();
        self.by_id.insert(entity.id(), index);
        self.rows.push(entity);
        Ok(index)
    }

    fn replace(&mut self, kind: &'static str, entity: E) -> Result<(), RegistryError> {
        let index = *self
            .by_id
            .get(&entity.id())
            .ok_or_else(|| RegistryError::missing(kind, entity.id()))?;
        self.rows[index] = entity;
        Ok(())
    }

    fn get(&self, id: E::Id) -> Option<E> {
        self.by_id.get(&id).map(|&index| self.rows[index].clone())
    }

    fn all(&self) -> Vec<E> {
        self.rows.clone()
    }
}

#[derive(Debug, Default)]
struct Inner {
    log: Vec<PostedTransaction>,
    customers: Registry<Customer>,
    accounts: Registry<BankAccount>,
    standard_items: Registry<StandardItem>,
    standard_codes: HashMap<String, usize>,
    jewelry: Registry<JewelryItem>,
    jewelry_codes: HashMap<String, usize>,
}

#[derive(Debug, Default)]
pub struct InMemoryLedgerStore {
    inner: RwLock<Inner>,
}

impl InMemoryLedgerStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, Inner>, StorageError> {
        self.inner
            .read()
            .map_err(|_| StorageError::LockPoisoned("read"))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, Inner>, StorageError> {
        self.inner
            .write()
            .map_err(|_| StorageError::LockPoisoned("write"))
    }
}

impl LedgerStore for InMemoryLedgerStore {
    fn append(
        &self,
        transaction: Transaction,
        transition: Option<JewelryTransition>,
    ) -> Result<PostedTransaction, AppendError> {
        let mut inner = self.write()?;

        // Flip the custody state first. Everything after the checks is
        // infallible, so the flip and the log entry land together or the
        // store is left untouched.
        if let Some(transition) = &transition {
            let index = *inner
                .jewelry_codes
                .get(&transition.jewelry_code)
                .ok_or_else(|| AppendError::JewelryMissing(transition.jewelry_code.clone()))?;
            let found = inner.jewelry.rows[index].state();
            if found != transition.expect {
                return Err(AppendError::StateConflict {
                    code: transition.jewelry_code.clone(),
                    expected: transition.expect,
                    found,
                });
            }
            let piece = &mut inner.jewelry.rows[index];
            match transition.to {
                JewelryState::Disposed => piece.mark_disposed(),
                JewelryState::InStock => piece.mark_in_stock(),
            }
            .map_err(|e| AppendError::InvalidTransition(e.to_string()))?;
        }

        let sequence = inner.log.len() as u64 + 1;
        let posted = PostedTransaction {
            sequence,
            record: transaction,
        };
        inner.log.push(posted.clone());
        Ok(posted)
    }

    fn transactions_for(
        &self,
        customer: CustomerId,
    ) -> Result<Vec<PostedTransaction>, StorageError> {
        let inner = self.read()?;
        Ok(inner
            .log
            .iter()
            .filter(|posted| posted.record.customer_id == customer)
            .cloned()
            .collect())
    }

    fn all_transactions(&self) -> Result<Vec<PostedTransaction>, StorageError> {
        Ok(self.read()?.log.clone())
    }

    fn customer(&self, id: CustomerId) -> Result<Option<Customer>, StorageError> {
        Ok(self.read()?.customers.get(id))
    }

    fn bank_account(&self, id: BankAccountId) -> Result<Option<BankAccount>, StorageError> {
        Ok(self.read()?.accounts.get(id))
    }

    fn jewelry(&self, id: JewelryItemId) -> Result<Option<JewelryItem>, StorageError> {
        Ok(self.read()?.jewelry.get(id))
    }

    fn jewelry_by_code(&self, code: &str) -> Result<Option<JewelryItem>, StorageError> {
        let inner = self.read()?;
        Ok(inner
            .jewelry_codes
            .get(code)
            .map(|&index| inner.jewelry.rows[index].clone()))
    }

    fn insert_customer(&self, customer: Customer) -> Result<(), RegistryError> {
        self.write()?.customers.insert("customer", customer)?;
        Ok(())
    }

    fn insert_bank_account(&self, account: BankAccount) -> Result<(), RegistryError> {
        self.write()?.accounts.insert("bank account", account)?;
        Ok(())
    }

    fn insert_standard_item(&self, item: StandardItem) -> Result<(), RegistryError> {
        let mut inner = self.write()?;
        if inner.standard_codes.contains_key(item.code()) {
            return Err(RegistryError::duplicate("standard item code", item.code()));
        }
        let code = item.code().to_string();
        let index = inner.standard_items.insert("standard item", item)?;
        inner.standard_codes.insert(code, index);
        Ok(())
    }

    fn insert_jewelry(&self, item: JewelryItem) -> Result<(), RegistryError> {
        let mut inner = self.write()?;
        if inner.jewelry_codes.contains_key(item.code()) {
            return Err(RegistryError::duplicate("jewelry code", item.code()));
        }
        let code = item.code().to_string();
        let index = inner.jewelry.insert("jewelry item", item)?;
        inner.jewelry_codes.insert(code, index);
        Ok(())
    }

    fn update_customer(&self, customer: Customer) -> Result<(), RegistryError> {
        self.write()?.customers.replace("customer", customer)
    }

    fn update_bank_account(&self, account: BankAccount) -> Result<(), RegistryError> {
        self.write()?.accounts.replace("bank account", account)
    }

    fn list_customers(&self) -> Result<Vec<Customer>, StorageError> {
        Ok(self.read()?.customers.all())
    }

    fn list_bank_accounts(&self) -> Result<Vec<BankAccount>, StorageError> {
        Ok(self.read()?.accounts.all())
    }

    fn list_standard_items(&self) -> Result<Vec<StandardItem>, StorageError> {
        Ok(self.read()?.standard_items.all())
    }

    fn list_jewelry(&self) -> Result<Vec<JewelryItem>, StorageError> {
        Ok(self.read()?.jewelry.all())
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use rust_decimal_macros::dec;

    use goldbook_core::TransactionId;
    use goldbook_ledger::{JewelryMovement, RawGoldTransfer, TransactionDetails};
    use goldbook_parties::CustomerRole;

    use super::*;

    fn customer(name: &str) -> Customer {
        Customer::register(CustomerId::new(), name, CustomerRole::Customer, None, Utc::now())
            .unwrap()
    }

    fn ring(code: &str, state: JewelryState) -> JewelryItem {
        JewelryItem::intake(
            JewelryItemId::new(),
            code,
            "Gold ring",
            dec!(12.5),
            dec!(0.750),
            dec!(500000),
            state,
            Utc::now(),
        )
        .unwrap()
    }

    fn receive_raw_gold(customer: CustomerId) -> Transaction {
        Transaction::new(
            TransactionId::new(),
            customer,
            TransactionDetails::ReceiveRawGold(RawGoldTransfer {
                weight_grams: dec!(10),
                purity: dec!(0.900),
            }),
            None,
            Utc::now(),
        )
    }

    fn give_jewelry(customer: CustomerId, piece: &JewelryItem) -> Transaction {
        Transaction::new(
            TransactionId::new(),
            customer,
            TransactionDetails::GiveJewelry(JewelryMovement {
                jewelry_id: piece.id(),
                jewelry_code: piece.code().to_string(),
                weight_grams: piece.weight_grams(),
                purity: piece.purity(),
            }),
            None,
            Utc::now(),
        )
    }

    #[test]
    fn append_assigns_gapless_global_sequence() {
        let store = InMemoryLedgerStore::new();
        let first = customer("First");
        let second = customer("Second");

        let a = store.append(receive_raw_gold(first.id()), None).unwrap();
        let b = store.append(receive_raw_gold(second.id()), None).unwrap();
        let c = store.append(receive_raw_gold(first.id()), None).unwrap();

        assert_eq!(a.sequence, 1);
        assert_eq!(b.sequence, 2);
        assert_eq!(c.sequence, 3);

        let firsts = store.transactions_for(first.id()).unwrap();
        assert_eq!(firsts.len(), 2);
        assert_eq!(firsts[0].sequence, 1);
        assert_eq!(firsts[1].sequence, 3);
    }

    #[test]
    fn transition_commits_with_the_record() {
        let store = InMemoryLedgerStore::new();
        let piece = ring("RING-0042", JewelryState::InStock);
        let owner = customer("Owner");
        store.insert_jewelry(piece.clone()).unwrap();

        let transition = JewelryTransition {
            jewelry_id: piece.id(),
            jewelry_code: piece.code().to_string(),
            expect: JewelryState::InStock,
            to: JewelryState::Disposed,
        };
        store
            .append(give_jewelry(owner.id(), &piece), Some(transition))
            .unwrap();

        let stored = store.jewelry(piece.id()).unwrap().unwrap();
        assert_eq!(stored.state(), JewelryState::Disposed);
        assert_eq!(store.all_transactions().unwrap().len(), 1);
    }

    #[test]
    fn state_conflict_leaves_the_store_untouched() {
        let store = InMemoryLedgerStore::new();
        let piece = ring("RING-0042", JewelryState::Disposed);
        let owner = customer("Owner");
        store.insert_jewelry(piece.clone()).unwrap();

        let transition = JewelryTransition {
            jewelry_id: piece.id(),
            jewelry_code: piece.code().to_string(),
            expect: JewelryState::InStock,
            to: JewelryState::Disposed,
        };
        let err = store
            .append(give_jewelry(owner.id(), &piece), Some(transition))
            .unwrap_err();

        match err {
            AppendError::StateConflict {
                expected, found, ..
            } => {
                assert_eq!(expected, JewelryState::InStock);
                assert_eq!(found, JewelryState::Disposed);
            }
            other => panic!("expected state conflict, got {other:?}"),
        }
        assert!(store.all_transactions().unwrap().is_empty());
        let stored = store.jewelry(piece.id()).unwrap().unwrap();
        assert_eq!(stored.state(), JewelryState::Disposed);
    }

    #[test]
    fn transition_for_unknown_piece_is_rejected() {
        let store = InMemoryLedgerStore::new();
        let owner = customer("Owner");
        let piece = ring("RING-0042", JewelryState::InStock);

        let transition = JewelryTransition {
            jewelry_id: piece.id(),
            jewelry_code: piece.code().to_string(),
            expect: JewelryState::InStock,
            to: JewelryState::Disposed,
        };
        let err = store
            .append(give_jewelry(owner.id(), &piece), Some(transition))
            .unwrap_err();

        assert!(matches!(err, AppendError::JewelryMissing(_)));
        assert!(store.all_transactions().unwrap().is_empty());
    }

    #[test]
    fn duplicate_registrations_are_rejected() {
        let store = InMemoryLedgerStore::new();
        let c = customer("Dup");
        store.insert_customer(c.clone()).unwrap();
        let err = store.insert_customer(c).unwrap_err();
        assert!(matches!(err, RegistryError::Duplicate { kind: "customer", .. }));

        store
            .insert_jewelry(ring("RING-0001", JewelryState::InStock))
            .unwrap();
        let err = store
            .insert_jewelry(ring("RING-0001", JewelryState::InStock))
            .unwrap_err();
        assert!(matches!(
            err,
            RegistryError::Duplicate {
                kind: "jewelry code",
                ..
            }
        ));
    }

    #[test]
    fn update_customer_replaces_the_row() {
        let store = InMemoryLedgerStore::new();
        let mut c = customer("Before");
        store.insert_customer(c.clone()).unwrap();

        c.rename("After").unwrap();
        store.update_customer(c.clone()).unwrap();

        let stored = store.customer(c.id()).unwrap().unwrap();
        assert_eq!(stored.full_name(), "After");

        let unknown = customer("Ghost");
        assert!(matches!(
            store.update_customer(unknown).unwrap_err(),
            RegistryError::Missing { .. }
        ));
    }

    #[test]
    fn lookups_by_code_and_listings_preserve_insertion_order() {
        let store = InMemoryLedgerStore::new();
        store
            .insert_jewelry(ring("RING-0001", JewelryState::InStock))
            .unwrap();
        store
            .insert_jewelry(ring("RING-0002", JewelryState::Disposed))
            .unwrap();

        let by_code = store.jewelry_by_code("RING-0002").unwrap().unwrap();
        assert_eq!(by_code.code(), "RING-0002");
        assert!(store.jewelry_by_code("RING-9999").unwrap().is_none());

        let listed = store.list_jewelry().unwrap();
        assert_eq!(listed.len(), 2);
        assert_eq!(listed[0].code(), "RING-0001");
        assert_eq!(listed[1].code(), "RING-0002");
    }
}
