//! Request validation.
//!
//! A [`TransactionRequest`] is what the outside world submits: a customer
//! id, a transaction type by wire name, and an untyped JSON payload. The
//! validator runs a fixed sequence of checks against the registry and,
//! when every check passes, freezes the request into a typed
//! [`ValidatedTransaction`] ready for an atomic commit. The first failing
//! check decides the [`RejectReason`]; later checks never run.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use thiserror::Error;

use goldbook_core::{BankAccountId, CustomerId, DomainError, TransactionId};
use goldbook_inventory::JewelryState;
use goldbook_ledger::{
    JewelryMovement, MoneyMovement, RawGoldTrade, RawGoldTransfer, Transaction,
    TransactionDetails, TransactionKind,
};

use crate::ledger_store::{JewelryTransition, LedgerStore, StorageError};

/// One intended ledger transaction, as submitted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionRequest {
    pub customer_id: CustomerId,
    /// Wire name of the kind, e.g. `"Sell Raw Gold"`.
    pub transaction_type: String,
    #[serde(default)]
    pub payload: JsonValue,
    #[serde(default)]
    pub note: Option<String>,
}

/// Wire payload for the two jewelry kinds: requests name the piece by its
/// serial code; the validator resolves everything else.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct JewelryRef {
    pub jewelry_code: String,
}

/// Why a request was turned away. Deterministic and local to the request:
/// nothing was written, and other requests are unaffected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RejectReason {
    #[error("unknown transaction type: {0}")]
    UnknownType(String),
    #[error("customer not found: {0}")]
    CustomerNotFound(CustomerId),
    #[error("bank account not found: {0}")]
    BankAccountNotFound(BankAccountId),
    #[error("jewelry not found: {0}")]
    ItemNotFound(String),
    #[error("jewelry {code} is {found}, {kind} requires {required}")]
    ItemState {
        code: String,
        kind: TransactionKind,
        required: JewelryState,
        found: JewelryState,
    },
    #[error("malformed payload: {0}")]
    MalformedPayload(String),
    #[error("concurrent conflict: {0}")]
    ConcurrentConflict(String),
}

impl RejectReason {
    /// Stable machine-readable code, used by batch reports and HTTP bodies.
    pub fn kind(&self) -> &'static str {
        match self {
            RejectReason::UnknownType(_) => "unknown_type",
            RejectReason::CustomerNotFound(_) => "customer_not_found",
            RejectReason::BankAccountNotFound(_) => "bank_account_not_found",
            RejectReason::ItemNotFound(_) => "item_not_found",
            RejectReason::ItemState { .. } => "item_state",
            RejectReason::MalformedPayload(_) => "malformed_payload",
            RejectReason::ConcurrentConflict(_) => "concurrent_conflict",
        }
    }
}

/// Validation failure: either a rejection of the request itself or an
/// infrastructure fault while consulting the registry.
#[derive(Debug, Error)]
pub enum ValidateError {
    #[error(transparent)]
    Rejected(#[from] RejectReason),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// A request that passed every check.
///
/// The payload is frozen into typed details (jewelry kinds carry the piece
/// snapshot as resolved now), and `transition` holds the compare-and-set
/// custody flip the commit must apply atomically.
#[derive(Debug, Clone)]
pub struct ValidatedTransaction {
    pub transaction: Transaction,
    pub transition: Option<JewelryTransition>,
}

/// Runs the check sequence against a store. Never mutates anything.
pub struct TransactionValidator<'a, S> {
    store: &'a S,
}

impl<'a, S: LedgerStore> TransactionValidator<'a, S> {
    pub fn new(store: &'a S) -> Self {
        Self { store }
    }

    /// Check order: transaction type, customer, payload shape and numbers,
    /// bank account, jewelry resolution and custody state. First failure
    /// wins.
    pub fn validate(
        &self,
        request: &TransactionRequest,
    ) -> Result<ValidatedTransaction, ValidateError> {
        let kind: TransactionKind = request
            .transaction_type
            .parse()
            .map_err(|_| RejectReason::UnknownType(request.transaction_type.clone()))?;

        if self.store.customer(request.customer_id)?.is_none() {
            return Err(RejectReason::CustomerNotFound(request.customer_id).into());
        }

        let (details, transition) = match kind {
            TransactionKind::SellRawGold | TransactionKind::BuyRawGold => {
                let trade: RawGoldTrade = decode(&request.payload)?;
                sanity(trade.validate())?;
                let details = if kind == TransactionKind::SellRawGold {
                    TransactionDetails::SellRawGold(trade)
                } else {
                    TransactionDetails::BuyRawGold(trade)
                };
                (details, None)
            }
            TransactionKind::ReceiveMoney | TransactionKind::SendMoney => {
                let movement: MoneyMovement = decode(&request.payload)?;
                sanity(movement.validate())?;
                if self
                    .store
                    .bank_account(movement.bank_account_id)?
                    .is_none()
                {
                    return Err(
                        RejectReason::BankAccountNotFound(movement.bank_account_id).into()
                    );
                }
                let details = if kind == TransactionKind::ReceiveMoney {
                    TransactionDetails::ReceiveMoney(movement)
                } else {
                    TransactionDetails::SendMoney(movement)
                };
                (details, None)
            }
            TransactionKind::ReceiveRawGold | TransactionKind::GiveRawGold => {
                let transfer: RawGoldTransfer = decode(&request.payload)?;
                sanity(transfer.validate())?;
                let details = if kind == TransactionKind::ReceiveRawGold {
                    TransactionDetails::ReceiveRawGold(transfer)
                } else {
                    TransactionDetails::GiveRawGold(transfer)
                };
                (details, None)
            }
            TransactionKind::ReceiveJewelry | TransactionKind::GiveJewelry => {
                let reference: JewelryRef = decode(&request.payload)?;
                let code = reference.jewelry_code.trim();
                if code.is_empty() {
                    return Err(
                        RejectReason::MalformedPayload("jewelry_code cannot be empty".into())
                            .into(),
                    );
                }
                let piece = self
                    .store
                    .jewelry_by_code(code)?
                    .ok_or_else(|| RejectReason::ItemNotFound(code.to_string()))?;

                let (required, to) = if kind == TransactionKind::GiveJewelry {
                    (JewelryState::InStock, JewelryState::Disposed)
                } else {
                    (JewelryState::Disposed, JewelryState::InStock)
                };
                if piece.state() != required {
                    return Err(RejectReason::ItemState {
                        code: piece.code().to_string(),
                        kind,
                        required,
                        found: piece.state(),
                    }
                    .into());
                }

                let movement = JewelryMovement {
                    jewelry_id: piece.id(),
                    jewelry_code: piece.code().to_string(),
                    weight_grams: piece.weight_grams(),
                    purity: piece.purity(),
                };
                let details = if kind == TransactionKind::GiveJewelry {
                    TransactionDetails::GiveJewelry(movement)
                } else {
                    TransactionDetails::ReceiveJewelry(movement)
                };
                let transition = JewelryTransition {
                    jewelry_id: piece.id(),
                    jewelry_code: piece.code().to_string(),
                    expect: required,
                    to,
                };
                (details, Some(transition))
            }
        };

        Ok(ValidatedTransaction {
            transaction: Transaction::new(
                TransactionId::new(),
                request.customer_id,
                details,
                request.note.clone(),
                Utc::now(),
            ),
            transition,
        })
    }
}

fn decode<T: serde::de::DeserializeOwned>(payload: &JsonValue) -> Result<T, RejectReason> {
    serde_json::from_value(payload.clone())
        .map_err(|e| RejectReason::MalformedPayload(e.to_string()))
}

fn sanity(checked: Result<(), DomainError>) -> Result<(), RejectReason> {
    checked.map_err(|e| RejectReason::MalformedPayload(domain_message(e)))
}

fn domain_message(error: DomainError) -> String {
    match error {
        DomainError::Validation(message) => message,
        other => other.to_string(),
    }
}
