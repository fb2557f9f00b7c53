use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde_json::json;

use goldbook_core::DomainError;
use goldbook_infra::{ExecuteError, ReadError, RegistryError, RejectReason, StorageError};

/// Map a deterministic rejection to its HTTP status. The error code is the
/// stable reason kind, the same string batch reports carry.
pub fn reject_to_response(reason: RejectReason) -> axum::response::Response {
    let status = match &reason {
        RejectReason::UnknownType(_) | RejectReason::MalformedPayload(_) => StatusCode::BAD_REQUEST,
        RejectReason::CustomerNotFound(_)
        | RejectReason::BankAccountNotFound(_)
        | RejectReason::ItemNotFound(_) => StatusCode::NOT_FOUND,
        RejectReason::ItemState { .. } | RejectReason::ConcurrentConflict(_) => {
            StatusCode::CONFLICT
        }
    };
    json_error(status, reason.kind(), reason.to_string())
}

pub fn execute_error_to_response(err: ExecuteError) -> axum::response::Response {
    match err {
        ExecuteError::Rejected(reason) => reject_to_response(reason),
        ExecuteError::Storage(storage) => storage_error_to_response(storage),
    }
}

pub fn storage_error_to_response(err: StorageError) -> axum::response::Response {
    json_error(
        StatusCode::SERVICE_UNAVAILABLE,
        "storage_unavailable",
        err.to_string(),
    )
}

pub fn read_error_to_response(err: ReadError) -> axum::response::Response {
    match &err {
        ReadError::CustomerNotFound(_) => {
            json_error(StatusCode::NOT_FOUND, "customer_not_found", err.to_string())
        }
        ReadError::BankAccountNotFound(_) => json_error(
            StatusCode::NOT_FOUND,
            "bank_account_not_found",
            err.to_string(),
        ),
        ReadError::Storage(_) => json_error(
            StatusCode::SERVICE_UNAVAILABLE,
            "storage_unavailable",
            err.to_string(),
        ),
    }
}

pub fn registry_error_to_response(err: RegistryError) -> axum::response::Response {
    match &err {
        RegistryError::Duplicate { .. } => {
            json_error(StatusCode::CONFLICT, "duplicate", err.to_string())
        }
        RegistryError::Missing { .. } => {
            json_error(StatusCode::NOT_FOUND, "not_found", err.to_string())
        }
        RegistryError::Storage(_) => json_error(
            StatusCode::SERVICE_UNAVAILABLE,
            "storage_unavailable",
            err.to_string(),
        ),
    }
}

/// Entity constructor failures surface as plain validation errors.
pub fn domain_error_to_response(err: DomainError) -> axum::response::Response {
    json_error(StatusCode::BAD_REQUEST, "validation", err.to_string())
}

pub fn json_error(
    status: StatusCode,
    code: &'static str,
    message: impl Into<String>,
) -> axum::response::Response {
    (
        status,
        axum::Json(json!({
            "error": code,
            "message": message.into(),
        })),
    )
        .into_response()
}
