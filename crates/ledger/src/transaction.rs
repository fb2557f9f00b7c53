//! Transaction kinds, payloads, and the immutable ledger record.

use chrono::{DateTime, Utc};
use core::str::FromStr;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use goldbook_core::{
    BankAccountId, CustomerId, DomainError, DomainResult, JewelryItemId, TransactionId,
};

/// The eight transaction kinds, named from the customer's perspective:
/// `SellRawGold` means the customer sells gold **to** the business.
///
/// The wire names below are the exact labels the business (and its upstream
/// assistant) uses in request payloads. Parsing happens once at the boundary;
/// past that point every `match` is exhaustive over the closed enum, so a new
/// kind cannot be added without teaching derivation and validation about it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TransactionKind {
    #[serde(rename = "Sell Raw Gold")]
    SellRawGold,
    #[serde(rename = "Buy Raw Gold")]
    BuyRawGold,
    #[serde(rename = "Receive Money")]
    ReceiveMoney,
    #[serde(rename = "Send Money")]
    SendMoney,
    #[serde(rename = "Receive Raw Gold")]
    ReceiveRawGold,
    #[serde(rename = "Give Raw Gold")]
    GiveRawGold,
    #[serde(rename = "Receive Jewelry")]
    ReceiveJewelry,
    #[serde(rename = "Give Jewelry")]
    GiveJewelry,
}

impl TransactionKind {
    pub const ALL: [TransactionKind; 8] = [
        TransactionKind::SellRawGold,
        TransactionKind::BuyRawGold,
        TransactionKind::ReceiveMoney,
        TransactionKind::SendMoney,
        TransactionKind::ReceiveRawGold,
        TransactionKind::GiveRawGold,
        TransactionKind::ReceiveJewelry,
        TransactionKind::GiveJewelry,
    ];

    pub fn wire_name(&self) -> &'static str {
        match self {
            TransactionKind::SellRawGold => "Sell Raw Gold",
            TransactionKind::BuyRawGold => "Buy Raw Gold",
            TransactionKind::ReceiveMoney => "Receive Money",
            TransactionKind::SendMoney => "Send Money",
            TransactionKind::ReceiveRawGold => "Receive Raw Gold",
            TransactionKind::GiveRawGold => "Give Raw Gold",
            TransactionKind::ReceiveJewelry => "Receive Jewelry",
            TransactionKind::GiveJewelry => "Give Jewelry",
        }
    }

}

impl core::fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.wire_name())
    }
}

impl FromStr for TransactionKind {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TransactionKind::ALL
            .into_iter()
            .find(|kind| kind.wire_name() == s.trim())
            .ok_or_else(|| DomainError::validation(format!("unknown transaction type: {s}")))
    }
}

/// Payload of a raw-gold trade against money (`SellRawGold` / `BuyRawGold`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RawGoldTrade {
    pub weight_grams: Decimal,
    pub purity: Decimal,
    /// Agreed total price for the lot, money units.
    pub price: Decimal,
}

impl RawGoldTrade {
    pub fn validate(&self) -> DomainResult<()> {
        ensure_positive("weight_grams", self.weight_grams)?;
        ensure_purity(self.purity)?;
        ensure_positive("price", self.price)
    }

    /// Pure gold content of the lot, grams.
    pub fn pure_grams(&self) -> Decimal {
        self.weight_grams * self.purity
    }
}

/// Payload of a money movement through a bank account
/// (`ReceiveMoney` / `SendMoney`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MoneyMovement {
    pub amount: Decimal,
    pub bank_account_id: BankAccountId,
}

impl MoneyMovement {
    pub fn validate(&self) -> DomainResult<()> {
        ensure_positive("amount", self.amount)
    }
}

/// Payload of a raw-gold hand-over with no payment leg
/// (`ReceiveRawGold` / `GiveRawGold`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RawGoldTransfer {
    pub weight_grams: Decimal,
    pub purity: Decimal,
}

impl RawGoldTransfer {
    pub fn validate(&self) -> DomainResult<()> {
        ensure_positive("weight_grams", self.weight_grams)?;
        ensure_purity(self.purity)
    }

    pub fn pure_grams(&self) -> Decimal {
        self.weight_grams * self.purity
    }
}

/// Snapshot of a jewelry piece as resolved at validation time
/// (`ReceiveJewelry` / `GiveJewelry`).
///
/// Requests reference pieces by serial code only; the validator resolves the
/// piece and freezes its weight and purity into the record, so the balance
/// fold never needs a registry lookup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JewelryMovement {
    pub jewelry_id: JewelryItemId,
    pub jewelry_code: String,
    pub weight_grams: Decimal,
    pub purity: Decimal,
}

impl JewelryMovement {
    pub fn validate(&self) -> DomainResult<()> {
        if self.jewelry_code.trim().is_empty() {
            return Err(DomainError::validation("jewelry_code cannot be empty"));
        }
        ensure_positive("weight_grams", self.weight_grams)?;
        ensure_purity(self.purity)
    }

    pub fn pure_grams(&self) -> Decimal {
        self.weight_grams * self.purity
    }
}

/// Typed payload per transaction kind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum TransactionDetails {
    #[serde(rename = "Sell Raw Gold")]
    SellRawGold(RawGoldTrade),
    #[serde(rename = "Buy Raw Gold")]
    BuyRawGold(RawGoldTrade),
    #[serde(rename = "Receive Money")]
    ReceiveMoney(MoneyMovement),
    #[serde(rename = "Send Money")]
    SendMoney(MoneyMovement),
    #[serde(rename = "Receive Raw Gold")]
    ReceiveRawGold(RawGoldTransfer),
    #[serde(rename = "Give Raw Gold")]
    GiveRawGold(RawGoldTransfer),
    #[serde(rename = "Receive Jewelry")]
    ReceiveJewelry(JewelryMovement),
    #[serde(rename = "Give Jewelry")]
    GiveJewelry(JewelryMovement),
}

impl TransactionDetails {
    pub fn kind(&self) -> TransactionKind {
        match self {
            TransactionDetails::SellRawGold(_) => TransactionKind::SellRawGold,
            TransactionDetails::BuyRawGold(_) => TransactionKind::BuyRawGold,
            TransactionDetails::ReceiveMoney(_) => TransactionKind::ReceiveMoney,
            TransactionDetails::SendMoney(_) => TransactionKind::SendMoney,
            TransactionDetails::ReceiveRawGold(_) => TransactionKind::ReceiveRawGold,
            TransactionDetails::GiveRawGold(_) => TransactionKind::GiveRawGold,
            TransactionDetails::ReceiveJewelry(_) => TransactionKind::ReceiveJewelry,
            TransactionDetails::GiveJewelry(_) => TransactionKind::GiveJewelry,
        }
    }

    pub fn validate(&self) -> DomainResult<()> {
        match self {
            TransactionDetails::SellRawGold(p) | TransactionDetails::BuyRawGold(p) => p.validate(),
            TransactionDetails::ReceiveMoney(p) | TransactionDetails::SendMoney(p) => p.validate(),
            TransactionDetails::ReceiveRawGold(p) | TransactionDetails::GiveRawGold(p) => {
                p.validate()
            }
            TransactionDetails::ReceiveJewelry(p) | TransactionDetails::GiveJewelry(p) => {
                p.validate()
            }
        }
    }

    /// Signed money delta. Positive: the business owes the customer.
    ///
    /// The authoritative table. Exhaustive on purpose: a ninth kind must be
    /// priced here before anything compiles.
    pub fn money_delta(&self) -> Decimal {
        match self {
            TransactionDetails::SellRawGold(trade) => trade.price,
            TransactionDetails::BuyRawGold(trade) => -trade.price,
            TransactionDetails::ReceiveMoney(movement) => movement.amount,
            TransactionDetails::SendMoney(movement) => -movement.amount,
            TransactionDetails::ReceiveRawGold(_) | TransactionDetails::GiveRawGold(_) => {
                Decimal::ZERO
            }
            TransactionDetails::ReceiveJewelry(_) | TransactionDetails::GiveJewelry(_) => {
                Decimal::ZERO
            }
        }
    }

    /// Signed pure-gold delta in grams. Negative: gold flowed into the
    /// business (the business holds it and owes it back).
    pub fn gold_delta(&self) -> Decimal {
        match self {
            TransactionDetails::SellRawGold(trade) => -trade.pure_grams(),
            TransactionDetails::BuyRawGold(trade) => trade.pure_grams(),
            TransactionDetails::ReceiveMoney(_) | TransactionDetails::SendMoney(_) => Decimal::ZERO,
            TransactionDetails::ReceiveRawGold(transfer) => -transfer.pure_grams(),
            TransactionDetails::GiveRawGold(transfer) => transfer.pure_grams(),
            TransactionDetails::ReceiveJewelry(movement) => -movement.pure_grams(),
            TransactionDetails::GiveJewelry(movement) => movement.pure_grams(),
        }
    }

    /// Bank account a money movement routed through, for the two money kinds.
    pub fn bank_account_id(&self) -> Option<BankAccountId> {
        match self {
            TransactionDetails::ReceiveMoney(movement) | TransactionDetails::SendMoney(movement) => {
                Some(movement.bank_account_id)
            }
            _ => None,
        }
    }

    /// Serial code of the moved piece, for the two jewelry kinds.
    pub fn jewelry_code(&self) -> Option<&str> {
        match self {
            TransactionDetails::ReceiveJewelry(movement)
            | TransactionDetails::GiveJewelry(movement) => Some(&movement.jewelry_code),
            _ => None,
        }
    }
}

/// An immutable ledger record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: TransactionId,
    pub customer_id: CustomerId,
    pub details: TransactionDetails,
    pub note: Option<String>,
    /// Wall-clock capture for `as_of` replay and display. Ordering authority
    /// is the store-assigned sequence, never this timestamp.
    pub recorded_at: DateTime<Utc>,
}

impl Transaction {
    pub fn new(
        id: TransactionId,
        customer_id: CustomerId,
        details: TransactionDetails,
        note: Option<String>,
        recorded_at: DateTime<Utc>,
    ) -> Self {
        let note = note.map(|n| n.trim().to_string()).filter(|n| !n.is_empty());
        Self {
            id,
            customer_id,
            details,
            note,
            recorded_at,
        }
    }

    pub fn kind(&self) -> TransactionKind {
        self.details.kind()
    }
}

/// A committed record plus its store-assigned insertion sequence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostedTransaction {
    /// Gapless global sequence starting at 1; the only ordering authority.
    pub sequence: u64,
    pub record: Transaction,
}

fn ensure_positive(field: &str, value: Decimal) -> DomainResult<()> {
    if value <= Decimal::ZERO {
        return Err(DomainError::validation(format!(
            "{field} must be positive: {value}"
        )));
    }
    Ok(())
}

fn ensure_purity(purity: Decimal) -> DomainResult<()> {
    if purity <= Decimal::ZERO || purity > Decimal::ONE {
        return Err(DomainError::validation(format!(
            "purity must lie in (0, 1]: {purity}"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn account() -> BankAccountId {
        BankAccountId::new()
    }

    fn jewelry_movement() -> JewelryMovement {
        JewelryMovement {
            jewelry_id: JewelryItemId::new(),
            jewelry_code: "RING-0042".to_string(),
            weight_grams: dec!(12.5),
            purity: dec!(0.750),
        }
    }

    #[test]
    fn kind_parses_exact_wire_names_only() {
        assert_eq!(
            "Sell Raw Gold".parse::<TransactionKind>().unwrap(),
            TransactionKind::SellRawGold
        );
        assert_eq!(
            " Give Jewelry ".parse::<TransactionKind>().unwrap(),
            TransactionKind::GiveJewelry
        );
        assert!("sell raw gold".parse::<TransactionKind>().is_err());
        assert!("Melt Gold".parse::<TransactionKind>().is_err());
    }

    #[test]
    fn every_kind_round_trips_through_its_wire_name() {
        for kind in TransactionKind::ALL {
            assert_eq!(kind.wire_name().parse::<TransactionKind>().unwrap(), kind);
        }
    }

    #[test]
    fn sell_raw_gold_deltas() {
        let details = TransactionDetails::SellRawGold(RawGoldTrade {
            weight_grams: dec!(30),
            purity: dec!(0.999),
            price: dec!(290_000_000),
        });

        assert_eq!(details.money_delta(), dec!(290_000_000));
        assert_eq!(details.gold_delta(), dec!(-29.970));
    }

    #[test]
    fn buy_raw_gold_mirrors_sell() {
        let trade = RawGoldTrade {
            weight_grams: dec!(30),
            purity: dec!(0.999),
            price: dec!(290_000_000),
        };
        let sell = TransactionDetails::SellRawGold(trade.clone());
        let buy = TransactionDetails::BuyRawGold(trade);

        assert_eq!(buy.money_delta(), -sell.money_delta());
        assert_eq!(buy.gold_delta(), -sell.gold_delta());
    }

    #[test]
    fn money_movement_deltas() {
        let receive = TransactionDetails::ReceiveMoney(MoneyMovement {
            amount: dec!(100_000_000),
            bank_account_id: account(),
        });
        let send = TransactionDetails::SendMoney(MoneyMovement {
            amount: dec!(100_000_000),
            bank_account_id: account(),
        });

        assert_eq!(receive.money_delta(), dec!(100_000_000));
        assert_eq!(send.money_delta(), dec!(-100_000_000));
        assert_eq!(receive.gold_delta(), Decimal::ZERO);
        assert_eq!(send.gold_delta(), Decimal::ZERO);
    }

    #[test]
    fn raw_gold_transfer_deltas() {
        let transfer = RawGoldTransfer {
            weight_grams: dec!(10),
            purity: dec!(0.750),
        };
        let receive = TransactionDetails::ReceiveRawGold(transfer.clone());
        let give = TransactionDetails::GiveRawGold(transfer);

        assert_eq!(receive.gold_delta(), dec!(-7.500));
        assert_eq!(give.gold_delta(), dec!(7.500));
        assert_eq!(receive.money_delta(), Decimal::ZERO);
        assert_eq!(give.money_delta(), Decimal::ZERO);
    }

    #[test]
    fn jewelry_deltas_use_the_frozen_snapshot() {
        let movement = jewelry_movement();
        let receive = TransactionDetails::ReceiveJewelry(movement.clone());
        let give = TransactionDetails::GiveJewelry(movement);

        assert_eq!(receive.gold_delta(), dec!(-9.3750));
        assert_eq!(give.gold_delta(), dec!(9.3750));
        assert_eq!(receive.money_delta(), Decimal::ZERO);
    }

    #[test]
    fn payload_validation_rejects_nonpositive_and_out_of_range() {
        assert!(
            RawGoldTrade {
                weight_grams: dec!(0),
                purity: dec!(0.9),
                price: dec!(1),
            }
            .validate()
            .is_err()
        );
        assert!(
            RawGoldTrade {
                weight_grams: dec!(1),
                purity: dec!(1.01),
                price: dec!(1),
            }
            .validate()
            .is_err()
        );
        assert!(
            MoneyMovement {
                amount: dec!(-5),
                bank_account_id: account(),
            }
            .validate()
            .is_err()
        );
        assert!(
            RawGoldTransfer {
                weight_grams: dec!(5),
                purity: dec!(1.0),
            }
            .validate()
            .is_ok()
        );
    }

    #[test]
    fn payload_decode_rejects_unknown_fields() {
        let err = serde_json::from_value::<MoneyMovement>(serde_json::json!({
            "amount": "100",
            "bank_account_id": uuid::Uuid::now_v7(),
            "price": "3",
        }))
        .unwrap_err();

        assert!(err.to_string().contains("price"));
    }

    #[test]
    fn details_serialize_with_wire_name_tag() {
        let details = TransactionDetails::ReceiveRawGold(RawGoldTransfer {
            weight_grams: dec!(10),
            purity: dec!(0.750),
        });

        let value = serde_json::to_value(&details).unwrap();
        assert_eq!(value["kind"], "Receive Raw Gold");

        let back: TransactionDetails = serde_json::from_value(value).unwrap();
        assert_eq!(back, details);
    }

    #[test]
    fn transaction_new_normalizes_blank_notes() {
        let tx = Transaction::new(
            TransactionId::new(),
            CustomerId::new(),
            TransactionDetails::ReceiveMoney(MoneyMovement {
                amount: dec!(1),
                bank_account_id: account(),
            }),
            Some("   ".to_string()),
            Utc::now(),
        );

        assert_eq!(tx.note, None);
        assert_eq!(tx.kind(), TransactionKind::ReceiveMoney);
    }
}
