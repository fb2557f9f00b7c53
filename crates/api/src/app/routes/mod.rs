use axum::{routing::get, Router};

pub mod advisor;
pub mod bank_accounts;
pub mod customers;
pub mod inventory;
pub mod system;
pub mod transactions;

/// Router for every endpoint except `/health`.
pub fn router() -> Router {
    Router::new()
        .route("/gold-price", get(system::gold_price))
        .nest("/customers", customers::router())
        .nest("/bank-accounts", bank_accounts::router())
        .nest("/items", inventory::router())
        .nest("/transactions", transactions::router())
        .nest("/advisor", advisor::router())
}
