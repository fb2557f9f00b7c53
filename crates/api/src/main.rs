use rust_decimal::Decimal;

use goldbook_advisor::GoldPrice;

const DEFAULT_ADDR: &str = "0.0.0.0:8080";
const DEFAULT_GOLD_PRICE_PER_GRAM: u64 = 10_000_000;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    goldbook_observability::init();

    let addr = std::env::var("GOLDBOOK_ADDR").unwrap_or_else(|_| {
        tracing::warn!("GOLDBOOK_ADDR not set; using {DEFAULT_ADDR}");
        DEFAULT_ADDR.to_string()
    });
    let gold_price = gold_price_from_env()?;

    let app = goldbook_api::app::build_app(gold_price);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("listening on {}", listener.local_addr()?);

    axum::serve(listener, app).await?;
    Ok(())
}

/// Gram quote used to value gold positions, from `GOLD_PRICE_PER_GRAM`.
///
/// A missing variable falls back to the default; a present but unparsable or
/// non-positive one fails startup instead of silently misquoting.
fn gold_price_from_env() -> anyhow::Result<GoldPrice> {
    match std::env::var("GOLD_PRICE_PER_GRAM") {
        Ok(raw) => {
            let per_gram: Decimal = raw
                .parse()
                .map_err(|e| anyhow::anyhow!("GOLD_PRICE_PER_GRAM is not a number: {e}"))?;
            Ok(GoldPrice::new(per_gram)?)
        }
        Err(_) => {
            tracing::warn!("GOLD_PRICE_PER_GRAM not set; using {DEFAULT_GOLD_PRICE_PER_GRAM}");
            Ok(GoldPrice::new(Decimal::from(DEFAULT_GOLD_PRICE_PER_GRAM))?)
        }
    }
}
