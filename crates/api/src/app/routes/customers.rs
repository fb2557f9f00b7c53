use std::sync::Arc;

use axum::{
    extract::{Extension, Path, Query},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use chrono::Utc;

use goldbook_core::CustomerId;
use goldbook_infra::LedgerStore;
use goldbook_parties::{Customer, CustomerRole};

use crate::app::services::AppServices;
use crate::app::{dto, errors};

pub fn router() -> Router {
    Router::new()
        .route("/", post(register_customer).get(list_customers))
        .route("/:id", get(get_customer).patch(rename_customer))
        .route("/:id/transactions", get(customer_transactions))
        .route("/:id/balance", get(customer_balance))
        .route("/:id/balance/raw-gold-by-purity", get(customer_raw_gold))
        .route("/:id/balance/jewelry", get(customer_jewelry))
}

pub async fn register_customer(
    Extension(services): Extension<Arc<AppServices>>,
    Json(body): Json<dto::RegisterCustomerRequest>,
) -> axum::response::Response {
    let role: CustomerRole = match body.role.parse() {
        Ok(role) => role,
        Err(e) => return errors::domain_error_to_response(e),
    };

    let customer = match Customer::register(
        CustomerId::new(),
        body.full_name,
        role,
        body.phone,
        Utc::now(),
    ) {
        Ok(customer) => customer,
        Err(e) => return errors::domain_error_to_response(e),
    };

    let response = dto::customer_to_json(&customer);
    if let Err(e) = services.store.insert_customer(customer) {
        return errors::registry_error_to_response(e);
    }
    (StatusCode::CREATED, Json(response)).into_response()
}

pub async fn list_customers(
    Extension(services): Extension<Arc<AppServices>>,
    Query(query): Query<dto::ListCustomersQuery>,
) -> axum::response::Response {
    let role = match query.role.as_deref() {
        Some(raw) => match raw.parse::<CustomerRole>() {
            Ok(role) => Some(role),
            Err(e) => return errors::domain_error_to_response(e),
        },
        None => None,
    };

    let customers = match services.store.list_customers() {
        Ok(rows) => rows,
        Err(e) => return errors::storage_error_to_response(e),
    };
    let items = customers
        .iter()
        .filter(|customer| role.is_none_or(|wanted| customer.role() == wanted))
        .map(dto::customer_to_json)
        .collect::<Vec<_>>();
    (StatusCode::OK, Json(serde_json::json!({ "items": items }))).into_response()
}

/// The registry row together with the balance derived from its history.
pub async fn get_customer(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let customer_id = match parse_id(&id) {
        Ok(v) => v,
        Err(resp) => return resp,
    };

    match services.reader.overview(customer_id) {
        Ok(overview) => {
            let mut body = dto::customer_to_json(&overview.customer);
            body["balance"] = dto::balance_to_json(&overview.balance);
            (StatusCode::OK, Json(body)).into_response()
        }
        Err(e) => errors::read_error_to_response(e),
    }
}

pub async fn rename_customer(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
    Json(body): Json<dto::RenameCustomerRequest>,
) -> axum::response::Response {
    let customer_id = match parse_id(&id) {
        Ok(v) => v,
        Err(resp) => return resp,
    };

    let mut customer = match services.store.customer(customer_id) {
        Ok(Some(row)) => row,
        Ok(None) => {
            return errors::json_error(
                StatusCode::NOT_FOUND,
                "customer_not_found",
                format!("customer not found: {customer_id}"),
            );
        }
        Err(e) => return errors::storage_error_to_response(e),
    };

    if let Err(e) = customer.rename(body.full_name) {
        return errors::domain_error_to_response(e);
    }

    let response = dto::customer_to_json(&customer);
    if let Err(e) = services.store.update_customer(customer) {
        return errors::registry_error_to_response(e);
    }
    (StatusCode::OK, Json(response)).into_response()
}

pub async fn customer_transactions(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let customer_id = match parse_id(&id) {
        Ok(v) => v,
        Err(resp) => return resp,
    };

    match services.reader.statement(customer_id) {
        Ok(posted) => {
            let items = posted.iter().map(dto::posted_to_json).collect::<Vec<_>>();
            (StatusCode::OK, Json(serde_json::json!({ "items": items }))).into_response()
        }
        Err(e) => errors::read_error_to_response(e),
    }
}

pub async fn customer_balance(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
    Query(query): Query<dto::BalanceQuery>,
) -> axum::response::Response {
    let customer_id = match parse_id(&id) {
        Ok(v) => v,
        Err(resp) => return resp,
    };

    let as_of = match query.as_of.as_deref() {
        Some(raw) => match chrono::DateTime::parse_from_rfc3339(raw) {
            Ok(dt) => Some(dt.with_timezone(&Utc)),
            Err(e) => {
                return errors::json_error(
                    StatusCode::BAD_REQUEST,
                    "invalid_as_of",
                    format!("as_of must be RFC 3339: {e}"),
                );
            }
        },
        None => None,
    };

    let derived = match as_of {
        Some(cut) => services.reader.balance_as_of(customer_id, cut),
        None => services.reader.balance(customer_id),
    };
    match derived {
        Ok(balance) => (StatusCode::OK, Json(dto::balance_to_json(&balance))).into_response(),
        Err(e) => errors::read_error_to_response(e),
    }
}

pub async fn customer_raw_gold(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let customer_id = match parse_id(&id) {
        Ok(v) => v,
        Err(resp) => return resp,
    };

    match services.reader.raw_gold_by_purity(customer_id) {
        Ok(buckets) => {
            (StatusCode::OK, Json(serde_json::json!({ "items": buckets }))).into_response()
        }
        Err(e) => errors::read_error_to_response(e),
    }
}

pub async fn customer_jewelry(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let customer_id = match parse_id(&id) {
        Ok(v) => v,
        Err(resp) => return resp,
    };

    let positions = match services.reader.jewelry_positions(customer_id) {
        Ok(positions) => positions,
        Err(e) => return errors::read_error_to_response(e),
    };

    // The fold reports serial codes; join display names from the registry.
    let mut items = Vec::with_capacity(positions.len());
    for position in &positions {
        let name = match services.store.jewelry_by_code(&position.jewelry_code) {
            Ok(piece) => piece.map(|p| p.name().to_string()),
            Err(e) => return errors::storage_error_to_response(e),
        };
        items.push(serde_json::json!({
            "jewelry_code": position.jewelry_code,
            "name": name,
            "net_pure_grams": position.net_pure_grams.to_string(),
            "custody": position.custody,
        }));
    }
    (StatusCode::OK, Json(serde_json::json!({ "items": items }))).into_response()
}

fn parse_id(id: &str) -> Result<CustomerId, axum::response::Response> {
    id.parse().map_err(|_| {
        errors::json_error(StatusCode::BAD_REQUEST, "invalid_id", "invalid customer id")
    })
}
