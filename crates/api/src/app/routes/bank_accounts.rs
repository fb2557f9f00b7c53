use std::sync::Arc;

use axum::{
    extract::{Extension, Path},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use chrono::Utc;

use goldbook_banking::BankAccount;
use goldbook_core::BankAccountId;
use goldbook_infra::LedgerStore;

use crate::app::services::AppServices;
use crate::app::{dto, errors};

pub fn router() -> Router {
    Router::new()
        .route("/", post(open_bank_account).get(list_bank_accounts))
        .route("/:id", get(get_bank_account).patch(relabel_bank_account))
}

pub async fn open_bank_account(
    Extension(services): Extension<Arc<AppServices>>,
    Json(body): Json<dto::OpenBankAccountRequest>,
) -> axum::response::Response {
    let account = match BankAccount::open(BankAccountId::new(), body.label, body.currency, Utc::now())
    {
        Ok(account) => account,
        Err(e) => return errors::domain_error_to_response(e),
    };

    let response = dto::bank_account_to_json(&account);
    if let Err(e) = services.store.insert_bank_account(account) {
        return errors::registry_error_to_response(e);
    }
    (StatusCode::CREATED, Json(response)).into_response()
}

pub async fn list_bank_accounts(
    Extension(services): Extension<Arc<AppServices>>,
) -> axum::response::Response {
    match services.store.list_bank_accounts() {
        Ok(accounts) => {
            let items = accounts
                .iter()
                .map(dto::bank_account_to_json)
                .collect::<Vec<_>>();
            (StatusCode::OK, Json(serde_json::json!({ "items": items }))).into_response()
        }
        Err(e) => errors::storage_error_to_response(e),
    }
}

/// The account row plus the net money flow derived from the full ledger.
pub async fn get_bank_account(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let account_id = match parse_id(&id) {
        Ok(v) => v,
        Err(resp) => return resp,
    };

    let account = match services.store.bank_account(account_id) {
        Ok(Some(row)) => row,
        Ok(None) => {
            return errors::json_error(
                StatusCode::NOT_FOUND,
                "bank_account_not_found",
                format!("bank account not found: {account_id}"),
            );
        }
        Err(e) => return errors::storage_error_to_response(e),
    };
    let net_flow = match services.reader.bank_account_balance(account_id) {
        Ok(flow) => flow,
        Err(e) => return errors::read_error_to_response(e),
    };

    let mut body = dto::bank_account_to_json(&account);
    body["net_flow"] = serde_json::json!(net_flow.to_string());
    (StatusCode::OK, Json(body)).into_response()
}

pub async fn relabel_bank_account(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
    Json(body): Json<dto::RelabelBankAccountRequest>,
) -> axum::response::Response {
    let account_id = match parse_id(&id) {
        Ok(v) => v,
        Err(resp) => return resp,
    };

    let mut account = match services.store.bank_account(account_id) {
        Ok(Some(row)) => row,
        Ok(None) => {
            return errors::json_error(
                StatusCode::NOT_FOUND,
                "bank_account_not_found",
                format!("bank account not found: {account_id}"),
            );
        }
        Err(e) => return errors::storage_error_to_response(e),
    };

    if let Err(e) = account.relabel(body.label) {
        return errors::domain_error_to_response(e);
    }

    let response = dto::bank_account_to_json(&account);
    if let Err(e) = services.store.update_bank_account(account) {
        return errors::registry_error_to_response(e);
    }
    (StatusCode::OK, Json(response)).into_response()
}

fn parse_id(id: &str) -> Result<BankAccountId, axum::response::Response> {
    id.parse().map_err(|_| {
        errors::json_error(
            StatusCode::BAD_REQUEST,
            "invalid_id",
            "invalid bank account id",
        )
    })
}
