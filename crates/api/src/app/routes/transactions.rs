use std::sync::Arc;

use axum::{
    extract::Extension, http::StatusCode, response::IntoResponse, routing::post, Json, Router,
};

use goldbook_infra::TransactionRequest;

use crate::app::services::AppServices;
use crate::app::{dto, errors};

pub fn router() -> Router {
    Router::new()
        .route("/", post(execute_transaction))
        .route("/batch", post(execute_batch))
}

pub async fn execute_transaction(
    Extension(services): Extension<Arc<AppServices>>,
    Json(request): Json<TransactionRequest>,
) -> axum::response::Response {
    match services.executor.execute_one(&request) {
        Ok(receipt) => (StatusCode::CREATED, Json(dto::receipt_to_json(&receipt))).into_response(),
        Err(e) => errors::execute_error_to_response(e),
    }
}

/// Best-effort batch: mixed per-item outcomes are a `200` with the report.
/// Only a storage failure aborts, reported as `503` with the partial report
/// so the caller can see which items already committed.
pub async fn execute_batch(
    Extension(services): Extension<Arc<AppServices>>,
    Json(body): Json<dto::BatchRequest>,
) -> axum::response::Response {
    match services.executor.execute_batch(&body.requests) {
        Ok(report) => {
            (StatusCode::OK, Json(dto::batch_report_to_json(&report))).into_response()
        }
        Err(aborted) => (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(serde_json::json!({
                "error": "storage_unavailable",
                "message": aborted.to_string(),
                "failed_index": aborted.failed_index,
                "completed": aborted
                    .completed
                    .iter()
                    .map(dto::batch_item_to_json)
                    .collect::<Vec<_>>(),
            })),
        )
            .into_response(),
    }
}
