use std::sync::Arc;

use goldbook_advisor::GoldPrice;
use goldbook_infra::{InMemoryLedgerStore, LedgerReader, TransactionExecutor};

/// Per-process state handed to every handler via `Extension`.
///
/// The executor and reader share one store; handlers own no state of their
/// own. `gold_price` is the configured quote the advisor values gold with
/// when a request carries no override.
pub struct AppServices {
    pub store: Arc<InMemoryLedgerStore>,
    pub executor: TransactionExecutor<Arc<InMemoryLedgerStore>>,
    pub reader: LedgerReader<Arc<InMemoryLedgerStore>>,
    pub gold_price: GoldPrice,
}

pub fn build_services(gold_price: GoldPrice) -> AppServices {
    let store = Arc::new(InMemoryLedgerStore::new());
    AppServices {
        executor: TransactionExecutor::new(store.clone()),
        reader: LedgerReader::new(store.clone()),
        store,
        gold_price,
    }
}
