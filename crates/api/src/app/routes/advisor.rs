use std::sync::Arc;

use axum::{
    extract::Extension, http::StatusCode, response::IntoResponse, routing::post, Json, Router,
};

use goldbook_advisor::{GoldPrice, suggest_settlement};

use crate::app::services::AppServices;
use crate::app::{dto, errors};

pub fn router() -> Router {
    Router::new().route("/settlement", post(settlement))
}

/// Which counterparty to settle first, valuing every position at the
/// configured quote unless the request overrides it.
pub async fn settlement(
    Extension(services): Extension<Arc<AppServices>>,
    Json(body): Json<dto::SettlementRequest>,
) -> axum::response::Response {
    let price = match body.gold_price {
        Some(per_gram) => match GoldPrice::new(per_gram) {
            Ok(price) => price,
            Err(e) => {
                return errors::json_error(StatusCode::BAD_REQUEST, "validation", e.to_string());
            }
        },
        None => services.gold_price,
    };

    let overviews = match services.reader.overviews() {
        Ok(rows) => rows,
        Err(e) => return errors::read_error_to_response(e),
    };
    let snapshots = overviews
        .iter()
        .map(dto::overview_to_snapshot)
        .collect::<Vec<_>>();

    let suggestion = suggest_settlement(&snapshots, price);
    (
        StatusCode::OK,
        Json(serde_json::json!({
            "gold_price_per_gram": price.per_gram().to_string(),
            "suggestion": suggestion,
        })),
    )
        .into_response()
}
