use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use goldbook_core::{BankAccountId, DomainError, DomainResult, Entity};

/// A business bank account that money transactions route through.
///
/// Immutable after opening except `label`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BankAccount {
    id: BankAccountId,
    label: String,
    /// Uppercase currency code, e.g. `IRR`. Single-currency bookkeeping:
    /// the ledger does no conversion between accounts.
    currency: String,
    opened_at: DateTime<Utc>,
}

impl BankAccount {
    /// Open a new account in the registry.
    pub fn open(
        id: BankAccountId,
        label: impl Into<String>,
        currency: impl Into<String>,
        opened_at: DateTime<Utc>,
    ) -> DomainResult<Self> {
        let label = label.into();
        if label.trim().is_empty() {
            return Err(DomainError::validation("label cannot be empty"));
        }

        let currency = currency.into().trim().to_ascii_uppercase();
        if currency.is_empty() {
            return Err(DomainError::validation("currency cannot be empty"));
        }
        if !currency.chars().all(|c| c.is_ascii_alphabetic()) {
            return Err(DomainError::validation(format!(
                "currency must be an alphabetic code: {currency}"
            )));
        }

        Ok(Self {
            id,
            label: label.trim().to_string(),
            currency,
            opened_at,
        })
    }

    /// The single permitted mutation: change the display label.
    pub fn relabel(&mut self, label: impl Into<String>) -> DomainResult<()> {
        let label = label.into();
        if label.trim().is_empty() {
            return Err(DomainError::validation("label cannot be empty"));
        }
        self.label = label.trim().to_string();
        Ok(())
    }

    pub fn id(&self) -> BankAccountId {
        self.id
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn currency(&self) -> &str {
        &self.currency
    }

    pub fn opened_at(&self) -> DateTime<Utc> {
        self.opened_at
    }
}

impl Entity for BankAccount {
    type Id = BankAccountId;

    fn id(&self) -> BankAccountId {
        self.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn open_normalizes_currency_and_trims_label() {
        let account =
            BankAccount::open(BankAccountId::new(), " Melli main ", "irr", Utc::now()).unwrap();

        assert_eq!(account.label(), "Melli main");
        assert_eq!(account.currency(), "IRR");
    }

    #[test]
    fn open_rejects_blank_label() {
        let err = BankAccount::open(BankAccountId::new(), "", "IRR", Utc::now()).unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }

    #[test]
    fn open_rejects_nonalphabetic_currency() {
        let err = BankAccount::open(BankAccountId::new(), "Main", "IR1", Utc::now()).unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }

    #[test]
    fn relabel_keeps_identity_and_currency() {
        let id = BankAccountId::new();
        let mut account = BankAccount::open(id, "Old", "IRR", Utc::now()).unwrap();

        account.relabel("New label").unwrap();

        assert_eq!(account.label(), "New label");
        assert_eq!(account.id(), id);
        assert_eq!(account.currency(), "IRR");
    }

    #[test]
    fn relabel_rejects_blank() {
        let mut account = BankAccount::open(BankAccountId::new(), "Keeps", "IRR", Utc::now()).unwrap();
        assert!(account.relabel("   ").is_err());
        assert_eq!(account.label(), "Keeps");
    }
}
