use chrono::{DateTime, Utc};
use core::str::FromStr;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use goldbook_core::{DomainError, DomainResult, Entity, JewelryItemId};

use crate::{ensure_code, ensure_purity, ensure_weight};

/// Custody state of a unique jewelry piece.
///
/// This is the only item state the ledger touches, and it flips exactly once
/// per committed jewelry transaction: `InStock -> Disposed` on a give,
/// `Disposed -> InStock` on a receive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JewelryState {
    InStock,
    Disposed,
}

impl JewelryState {
    pub fn as_str(&self) -> &'static str {
        match self {
            JewelryState::InStock => "in_stock",
            JewelryState::Disposed => "disposed",
        }
    }
}

impl core::fmt::Display for JewelryState {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for JewelryState {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "in_stock" => Ok(JewelryState::InStock),
            "disposed" => Ok(JewelryState::Disposed),
            other => Err(DomainError::validation(format!(
                "unknown jewelry state: {other}"
            ))),
        }
    }
}

/// A unique physical jewelry piece identified by serial code.
///
/// Weight, purity and premium are fixed at intake; custody `state` is the
/// single mutable field. A piece physically with a customer can be cataloged
/// as `Disposed` so a later consignment intake validates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JewelryItem {
    id: JewelryItemId,
    /// Serial code, unique in the registry (e.g. `RING-0042`).
    code: String,
    name: String,
    weight_grams: Decimal,
    purity: Decimal,
    /// Craftsmanship markup in money units, on top of the metal value.
    premium: Decimal,
    state: JewelryState,
    cataloged_at: DateTime<Utc>,
}

impl JewelryItem {
    /// Take a piece into the registry.
    pub fn intake(
        id: JewelryItemId,
        code: impl Into<String>,
        name: impl Into<String>,
        weight_grams: Decimal,
        purity: Decimal,
        premium: Decimal,
        state: JewelryState,
        cataloged_at: DateTime<Utc>,
    ) -> DomainResult<Self> {
        let code = code.into();
        ensure_code(&code)?;

        let name = name.into();
        if name.trim().is_empty() {
            return Err(DomainError::validation("name cannot be empty"));
        }

        ensure_weight(weight_grams)?;
        ensure_purity(purity)?;

        if premium < Decimal::ZERO {
            return Err(DomainError::validation(format!(
                "premium cannot be negative: {premium}"
            )));
        }

        Ok(Self {
            id,
            code: code.trim().to_string(),
            name: name.trim().to_string(),
            weight_grams,
            purity,
            premium,
            state,
            cataloged_at,
        })
    }

    /// Transition for an outgoing piece. Requires `InStock`.
    pub fn mark_disposed(&mut self) -> DomainResult<()> {
        match self.state {
            JewelryState::InStock => {
                self.state = JewelryState::Disposed;
                Ok(())
            }
            JewelryState::Disposed => Err(DomainError::conflict(format!(
                "jewelry {} is already disposed",
                self.code
            ))),
        }
    }

    /// Transition for an incoming piece. Requires `Disposed`.
    pub fn mark_in_stock(&mut self) -> DomainResult<()> {
        match self.state {
            JewelryState::Disposed => {
                self.state = JewelryState::InStock;
                Ok(())
            }
            JewelryState::InStock => Err(DomainError::conflict(format!(
                "jewelry {} is already in stock",
                self.code
            ))),
        }
    }

    pub fn id(&self) -> JewelryItemId {
        self.id
    }

    pub fn code(&self) -> &str {
        &self.code
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn weight_grams(&self) -> Decimal {
        self.weight_grams
    }

    pub fn purity(&self) -> Decimal {
        self.purity
    }

    pub fn premium(&self) -> Decimal {
        self.premium
    }

    /// Pure gold content of the piece, in grams.
    pub fn pure_grams(&self) -> Decimal {
        self.weight_grams * self.purity
    }

    pub fn state(&self) -> JewelryState {
        self.state
    }

    pub fn cataloged_at(&self) -> DateTime<Utc> {
        self.cataloged_at
    }
}

impl Entity for JewelryItem {
    type Id = JewelryItemId;

    fn id(&self) -> JewelryItemId {
        self.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn test_piece(state: JewelryState) -> JewelryItem {
        JewelryItem::intake(
            JewelryItemId::new(),
            "RING-0042",
            "Plain band",
            dec!(12.5),
            dec!(0.750),
            dec!(2_000_000),
            state,
            Utc::now(),
        )
        .unwrap()
    }

    #[test]
    fn intake_computes_pure_grams() {
        let piece = test_piece(JewelryState::InStock);
        assert_eq!(piece.pure_grams(), dec!(9.3750));
    }

    #[test]
    fn intake_rejects_negative_premium() {
        let err = JewelryItem::intake(
            JewelryItemId::new(),
            "RING-1",
            "Bad",
            dec!(1),
            dec!(0.750),
            dec!(-1),
            JewelryState::InStock,
            Utc::now(),
        )
        .unwrap_err();

        assert!(matches!(err, DomainError::Validation(_)));
    }

    #[test]
    fn give_requires_in_stock() {
        let mut piece = test_piece(JewelryState::InStock);
        piece.mark_disposed().unwrap();
        assert_eq!(piece.state(), JewelryState::Disposed);

        let err = piece.mark_disposed().unwrap_err();
        assert!(matches!(err, DomainError::Conflict(_)));
        assert_eq!(piece.state(), JewelryState::Disposed);
    }

    #[test]
    fn receive_requires_disposed() {
        let mut piece = test_piece(JewelryState::Disposed);
        piece.mark_in_stock().unwrap();
        assert_eq!(piece.state(), JewelryState::InStock);

        let err = piece.mark_in_stock().unwrap_err();
        assert!(matches!(err, DomainError::Conflict(_)));
        assert_eq!(piece.state(), JewelryState::InStock);
    }

    #[test]
    fn state_parses_from_wire_strings() {
        assert_eq!("in_stock".parse::<JewelryState>().unwrap(), JewelryState::InStock);
        assert_eq!(" DISPOSED ".parse::<JewelryState>().unwrap(), JewelryState::Disposed);
        assert!("melted".parse::<JewelryState>().is_err());
    }

    mod properties {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #![proptest_config(ProptestConfig {
                cases: 256,
                ..ProptestConfig::default()
            })]

            /// Property: any sequence of attempted transitions leaves the piece
            /// in a valid state, and a failed transition never changes state.
            #[test]
            fn transitions_alternate_or_fail(go_out in prop::collection::vec(proptest::bool::ANY, 1..20)) {
                let mut piece = test_piece(JewelryState::InStock);

                for out in go_out {
                    let before = piece.state();
                    let result = if out { piece.mark_disposed() } else { piece.mark_in_stock() };
                    match result {
                        Ok(()) => prop_assert_ne!(piece.state(), before),
                        Err(_) => prop_assert_eq!(piece.state(), before),
                    }
                }
            }
        }
    }
}
