use std::sync::Arc;

use axum::{
    extract::{Extension, Path, Query},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use chrono::Utc;

use goldbook_core::{JewelryItemId, StandardItemId};
use goldbook_infra::LedgerStore;
use goldbook_inventory::{JewelryItem, JewelryState, StandardItem};

use crate::app::services::AppServices;
use crate::app::{dto, errors};

pub fn router() -> Router {
    Router::new()
        .route("/standard", post(catalog_standard_item).get(list_standard_items))
        .route("/jewelry", post(intake_jewelry).get(list_jewelry))
        .route("/jewelry/:code", get(get_jewelry))
}

pub async fn catalog_standard_item(
    Extension(services): Extension<Arc<AppServices>>,
    Json(body): Json<dto::CatalogStandardItemRequest>,
) -> axum::response::Response {
    let item = match StandardItem::catalog(
        StandardItemId::new(),
        body.code,
        body.name,
        body.unit_weight_grams,
        body.purity,
        Utc::now(),
    ) {
        Ok(item) => item,
        Err(e) => return errors::domain_error_to_response(e),
    };

    let response = dto::standard_item_to_json(&item);
    if let Err(e) = services.store.insert_standard_item(item) {
        return errors::registry_error_to_response(e);
    }
    (StatusCode::CREATED, Json(response)).into_response()
}

pub async fn list_standard_items(
    Extension(services): Extension<Arc<AppServices>>,
) -> axum::response::Response {
    match services.store.list_standard_items() {
        Ok(items) => {
            let items = items
                .iter()
                .map(dto::standard_item_to_json)
                .collect::<Vec<_>>();
            (StatusCode::OK, Json(serde_json::json!({ "items": items }))).into_response()
        }
        Err(e) => errors::storage_error_to_response(e),
    }
}

pub async fn intake_jewelry(
    Extension(services): Extension<Arc<AppServices>>,
    Json(body): Json<dto::IntakeJewelryRequest>,
) -> axum::response::Response {
    let state = match body.state.as_deref() {
        Some(raw) => match raw.parse::<JewelryState>() {
            Ok(state) => state,
            Err(e) => return errors::domain_error_to_response(e),
        },
        None => JewelryState::InStock,
    };

    let piece = match JewelryItem::intake(
        JewelryItemId::new(),
        body.code,
        body.name,
        body.weight_grams,
        body.purity,
        body.premium,
        state,
        Utc::now(),
    ) {
        Ok(piece) => piece,
        Err(e) => return errors::domain_error_to_response(e),
    };

    let response = dto::jewelry_to_json(&piece);
    if let Err(e) = services.store.insert_jewelry(piece) {
        return errors::registry_error_to_response(e);
    }
    (StatusCode::CREATED, Json(response)).into_response()
}

pub async fn list_jewelry(
    Extension(services): Extension<Arc<AppServices>>,
    Query(query): Query<dto::ListJewelryQuery>,
) -> axum::response::Response {
    let state = match query.state.as_deref() {
        Some(raw) => match raw.parse::<JewelryState>() {
            Ok(state) => Some(state),
            Err(e) => return errors::domain_error_to_response(e),
        },
        None => None,
    };

    match services.store.list_jewelry() {
        Ok(pieces) => {
            let items = pieces
                .iter()
                .filter(|piece| state.is_none_or(|wanted| piece.state() == wanted))
                .map(dto::jewelry_to_json)
                .collect::<Vec<_>>();
            (StatusCode::OK, Json(serde_json::json!({ "items": items }))).into_response()
        }
        Err(e) => errors::storage_error_to_response(e),
    }
}

pub async fn get_jewelry(
    Extension(services): Extension<Arc<AppServices>>,
    Path(code): Path<String>,
) -> axum::response::Response {
    match services.store.jewelry_by_code(&code) {
        Ok(Some(piece)) => (StatusCode::OK, Json(dto::jewelry_to_json(&piece))).into_response(),
        Ok(None) => errors::json_error(
            StatusCode::NOT_FOUND,
            "item_not_found",
            format!("jewelry not found: {code}"),
        ),
        Err(e) => errors::storage_error_to_response(e),
    }
}
