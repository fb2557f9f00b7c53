//! Validate-then-commit execution of transaction requests.

use chrono::{DateTime, Utc};
use thiserror::Error;
use tracing::{debug, error, info, warn};

use goldbook_core::TransactionId;

use crate::ledger_store::{AppendError, LedgerStore, StorageError};
use crate::validator::{RejectReason, TransactionRequest, TransactionValidator, ValidateError};

/// Proof of commit: the record id plus its ledger position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitReceipt {
    pub transaction_id: TransactionId,
    pub sequence: u64,
    pub recorded_at: DateTime<Utc>,
}

/// Execution failure for a single request.
#[derive(Debug, Error)]
pub enum ExecuteError {
    /// Deterministic rejection; nothing was written.
    #[error("transaction rejected: {0}")]
    Rejected(#[from] RejectReason),
    /// Infrastructure failure; the outcome is unknown and the caller must
    /// stop writing.
    #[error(transparent)]
    Storage(#[from] StorageError),
}

impl From<ValidateError> for ExecuteError {
    fn from(error: ValidateError) -> Self {
        match error {
            ValidateError::Rejected(reason) => ExecuteError::Rejected(reason),
            ValidateError::Storage(error) => ExecuteError::Storage(error),
        }
    }
}

/// Outcome of one batch item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ItemOutcome {
    Committed(CommitReceipt),
    Rejected(RejectReason),
}

/// One entry of a batch report, in request order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchItem {
    pub index: usize,
    pub outcome: ItemOutcome,
}

/// Per-item outcomes for a batch that ran to the end.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct BatchReport {
    pub items: Vec<BatchItem>,
}

impl BatchReport {
    pub fn committed_count(&self) -> usize {
        self.items
            .iter()
            .filter(|item| matches!(item.outcome, ItemOutcome::Committed(_)))
            .count()
    }

    pub fn rejected_count(&self) -> usize {
        self.items.len() - self.committed_count()
    }
}

/// A batch stopped by infrastructure failure.
///
/// `completed` holds the outcomes decided before the failure; the failed
/// item and everything after it were never attempted or have unknown state.
#[derive(Debug, Error)]
#[error("batch aborted at item {failed_index}: {source}")]
pub struct BatchAborted {
    pub completed: Vec<BatchItem>,
    pub failed_index: usize,
    #[source]
    pub source: StorageError,
}

const COMMIT_ATTEMPTS: usize = 2;

/// Validates and commits requests against a [`LedgerStore`].
///
/// Commit is optimistic: the custody state observed at validation time is
/// the commit precondition. When the store reports that the state moved in
/// between, the request is validated once more against the new state; a
/// precondition that keeps moving turns into a rejection rather than an
/// endless retry.
pub struct TransactionExecutor<S> {
    store: S,
}

impl<S: LedgerStore> TransactionExecutor<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Validate and commit one request as a single atomic unit.
    pub fn execute_one(
        &self,
        request: &TransactionRequest,
    ) -> Result<CommitReceipt, ExecuteError> {
        let validator = TransactionValidator::new(&self.store);

        for attempt in 1..=COMMIT_ATTEMPTS {
            let validated = match validator.validate(request) {
                Ok(validated) => validated,
                Err(validate_error) => {
                    let execute_error = ExecuteError::from(validate_error);
                    if let ExecuteError::Rejected(reason) = &execute_error {
                        warn!(
                            customer = %request.customer_id,
                            transaction_type = %request.transaction_type,
                            reason = reason.kind(),
                            "transaction rejected"
                        );
                    }
                    return Err(execute_error);
                }
            };

            match self
                .store
                .append(validated.transaction, validated.transition)
            {
                Ok(posted) => {
                    info!(
                        customer = %posted.record.customer_id,
                        kind = posted.record.kind().wire_name(),
                        sequence = posted.sequence,
                        "transaction committed"
                    );
                    return Ok(CommitReceipt {
                        transaction_id: posted.record.id,
                        sequence: posted.sequence,
                        recorded_at: posted.record.recorded_at,
                    });
                }
                Err(AppendError::StateConflict { code, .. }) => {
                    // Lost the custody race; revalidation against the new
                    // state usually turns this into an item-state rejection.
                    debug!(
                        jewelry = %code,
                        attempt,
                        "custody state moved between validation and commit"
                    );
                    continue;
                }
                Err(AppendError::JewelryMissing(code)) => {
                    return Err(ExecuteError::Rejected(RejectReason::ItemNotFound(code)));
                }
                Err(AppendError::InvalidTransition(message)) => {
                    return Err(ExecuteError::Storage(StorageError::Unavailable(message)));
                }
                Err(AppendError::Storage(storage)) => {
                    return Err(ExecuteError::Storage(storage));
                }
            }
        }

        warn!(
            customer = %request.customer_id,
            transaction_type = %request.transaction_type,
            "transaction rejected after repeated custody races"
        );
        Err(ExecuteError::Rejected(RejectReason::ConcurrentConflict(
            format!("{} kept losing the custody race", request.transaction_type),
        )))
    }

    /// Execute a batch in order, best effort: each request is validated and
    /// committed independently and reported per item, so one rejection never
    /// erases an earlier valid commit. Only an infrastructure failure stops
    /// the batch.
    pub fn execute_batch(
        &self,
        requests: &[TransactionRequest],
    ) -> Result<BatchReport, BatchAborted> {
        let mut items = Vec::with_capacity(requests.len());
        for (index, request) in requests.iter().enumerate() {
            match self.execute_one(request) {
                Ok(receipt) => items.push(BatchItem {
                    index,
                    outcome: ItemOutcome::Committed(receipt),
                }),
                Err(ExecuteError::Rejected(reason)) => items.push(BatchItem {
                    index,
                    outcome: ItemOutcome::Rejected(reason),
                }),
                Err(ExecuteError::Storage(source)) => {
                    error!(
                        failed_index = index,
                        error = %source,
                        "batch aborted on storage failure"
                    );
                    return Err(BatchAborted {
                        completed: items,
                        failed_index: index,
                        source,
                    });
                }
            }
        }
        Ok(BatchReport { items })
    }
}
