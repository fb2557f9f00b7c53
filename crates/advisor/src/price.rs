use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AdvisorError {
    #[error("invalid gold price: {0}")]
    InvalidPrice(String),
}

/// Validated price per pure gram, money units.
///
/// Always an explicit parameter: there is no global quote, and nothing in
/// this crate fetches one. Whoever calls decides what the metal is worth
/// right now.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GoldPrice(Decimal);

impl GoldPrice {
    pub fn new(per_gram: Decimal) -> Result<Self, AdvisorError> {
        if per_gram <= Decimal::ZERO {
            return Err(AdvisorError::InvalidPrice(format!(
                "price per gram must be positive: {per_gram}"
            )));
        }
        Ok(Self(per_gram))
    }

    pub fn per_gram(&self) -> Decimal {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal_macros::dec;

    use super::*;

    #[test]
    fn rejects_non_positive_prices() {
        assert!(GoldPrice::new(dec!(0)).is_err());
        assert!(GoldPrice::new(dec!(-1)).is_err());
        assert_eq!(
            GoldPrice::new(dec!(10000000)).unwrap().per_gram(),
            dec!(10000000)
        );
    }
}
