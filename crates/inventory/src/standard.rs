use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use goldbook_core::{DomainError, DomainResult, Entity, StandardItemId};

use crate::{ensure_code, ensure_purity, ensure_weight};

/// A fungible catalog entry (coin, standard bar) identified by catalog code.
///
/// Catalog-only: no transaction kind consumes standard items. Raw-gold
/// transactions carry their own weight and purity; the catalog exists so the
/// business can quote standard pieces consistently.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StandardItem {
    id: StandardItemId,
    /// Catalog code, unique in the registry (e.g. `BAHAR-1G`).
    code: String,
    name: String,
    unit_weight_grams: Decimal,
    purity: Decimal,
    cataloged_at: DateTime<Utc>,
}

impl StandardItem {
    /// Add a fungible entry to the catalog.
    pub fn catalog(
        id: StandardItemId,
        code: impl Into<String>,
        name: impl Into<String>,
        unit_weight_grams: Decimal,
        purity: Decimal,
        cataloged_at: DateTime<Utc>,
    ) -> DomainResult<Self> {
        let code = code.into();
        ensure_code(&code)?;

        let name = name.into();
        if name.trim().is_empty() {
            return Err(DomainError::validation("name cannot be empty"));
        }

        ensure_weight(unit_weight_grams)?;
        ensure_purity(purity)?;

        Ok(Self {
            id,
            code: code.trim().to_string(),
            name: name.trim().to_string(),
            unit_weight_grams,
            purity,
            cataloged_at,
        })
    }

    pub fn id(&self) -> StandardItemId {
        self.id
    }

    pub fn code(&self) -> &str {
        &self.code
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn unit_weight_grams(&self) -> Decimal {
        self.unit_weight_grams
    }

    pub fn purity(&self) -> Decimal {
        self.purity
    }

    /// Pure gold content of one unit, in grams.
    pub fn unit_pure_grams(&self) -> Decimal {
        self.unit_weight_grams * self.purity
    }

    pub fn cataloged_at(&self) -> DateTime<Utc> {
        self.cataloged_at
    }
}

impl Entity for StandardItem {
    type Id = StandardItemId;

    fn id(&self) -> StandardItemId {
        self.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn catalog_computes_unit_pure_grams() {
        let item = StandardItem::catalog(
            StandardItemId::new(),
            "BAHAR-1G",
            "Bahar Azadi 1g",
            dec!(1.0),
            dec!(0.900),
            Utc::now(),
        )
        .unwrap();

        assert_eq!(item.unit_pure_grams(), dec!(0.900));
    }

    #[test]
    fn catalog_rejects_zero_weight() {
        let err = StandardItem::catalog(
            StandardItemId::new(),
            "X",
            "Zero",
            dec!(0),
            dec!(0.900),
            Utc::now(),
        )
        .unwrap_err();

        assert!(matches!(err, DomainError::Validation(_)));
    }

    #[test]
    fn catalog_rejects_purity_above_one() {
        let err = StandardItem::catalog(
            StandardItemId::new(),
            "X",
            "Impossible",
            dec!(1.0),
            dec!(1.001),
            Utc::now(),
        )
        .unwrap_err();

        assert!(matches!(err, DomainError::Validation(_)));
    }

    #[test]
    fn catalog_rejects_blank_code() {
        let err = StandardItem::catalog(
            StandardItemId::new(),
            "  ",
            "No code",
            dec!(1.0),
            dec!(0.900),
            Utc::now(),
        )
        .unwrap_err();

        assert!(matches!(err, DomainError::Validation(_)));
    }
}
