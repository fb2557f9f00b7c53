use chrono::{DateTime, Utc};
use core::str::FromStr;
use serde::{Deserialize, Serialize};

use goldbook_core::{CustomerId, DomainError, DomainResult, Entity};

/// Counterparty role: retail customer or collaborator (peer gold trader).
///
/// The role is chosen explicitly at registration and never inferred from the
/// display name. Settlement ranking considers collaborators only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CustomerRole {
    Customer,
    Collaborator,
}

impl CustomerRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            CustomerRole::Customer => "customer",
            CustomerRole::Collaborator => "collaborator",
        }
    }
}

impl FromStr for CustomerRole {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "customer" => Ok(CustomerRole::Customer),
            "collaborator" => Ok(CustomerRole::Collaborator),
            other => Err(DomainError::validation(format!(
                "unknown customer role: {other}"
            ))),
        }
    }
}

/// A counterparty the business trades with.
///
/// Immutable after registration except `full_name`. The entity carries no
/// balance fields: positions are always derived by folding the counterparty's
/// transaction history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Customer {
    id: CustomerId,
    full_name: String,
    role: CustomerRole,
    /// Free-form contact number; normalized to `None` when blank.
    phone: Option<String>,
    registered_at: DateTime<Utc>,
}

impl Customer {
    /// Register a new counterparty.
    pub fn register(
        id: CustomerId,
        full_name: impl Into<String>,
        role: CustomerRole,
        phone: Option<String>,
        registered_at: DateTime<Utc>,
    ) -> DomainResult<Self> {
        let full_name = full_name.into();
        if full_name.trim().is_empty() {
            return Err(DomainError::validation("full_name cannot be empty"));
        }

        Ok(Self {
            id,
            full_name: full_name.trim().to_string(),
            role,
            phone: normalize_phone(phone),
            registered_at,
        })
    }

    /// The single permitted mutation: change the display name.
    pub fn rename(&mut self, full_name: impl Into<String>) -> DomainResult<()> {
        let full_name = full_name.into();
        if full_name.trim().is_empty() {
            return Err(DomainError::validation("full_name cannot be empty"));
        }
        self.full_name = full_name.trim().to_string();
        Ok(())
    }

    pub fn id(&self) -> CustomerId {
        self.id
    }

    pub fn full_name(&self) -> &str {
        &self.full_name
    }

    pub fn role(&self) -> CustomerRole {
        self.role
    }

    pub fn phone(&self) -> Option<&str> {
        self.phone.as_deref()
    }

    pub fn registered_at(&self) -> DateTime<Utc> {
        self.registered_at
    }

    pub fn is_collaborator(&self) -> bool {
        self.role == CustomerRole::Collaborator
    }
}

impl Entity for Customer {
    type Id = CustomerId;

    fn id(&self) -> CustomerId {
        self.id
    }
}

fn normalize_phone(phone: Option<String>) -> Option<String> {
    phone
        .map(|p| p.trim().to_string())
        .filter(|p| !p.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_time() -> DateTime<Utc> {
        Utc::now()
    }

    #[test]
    fn register_sets_fields_and_trims_name() {
        let id = CustomerId::new();
        let customer = Customer::register(
            id,
            "  Akbar Zargar ",
            CustomerRole::Collaborator,
            Some("+98 912 000 0000".to_string()),
            test_time(),
        )
        .unwrap();

        assert_eq!(customer.id(), id);
        assert_eq!(customer.full_name(), "Akbar Zargar");
        assert_eq!(customer.role(), CustomerRole::Collaborator);
        assert!(customer.is_collaborator());
        assert_eq!(customer.phone(), Some("+98 912 000 0000"));
    }

    #[test]
    fn register_rejects_blank_name() {
        let err = Customer::register(
            CustomerId::new(),
            "   ",
            CustomerRole::Customer,
            None,
            test_time(),
        )
        .unwrap_err();

        assert!(matches!(err, DomainError::Validation(_)));
    }

    #[test]
    fn blank_phone_normalizes_to_none() {
        let customer = Customer::register(
            CustomerId::new(),
            "Reza",
            CustomerRole::Customer,
            Some("   ".to_string()),
            test_time(),
        )
        .unwrap();

        assert_eq!(customer.phone(), None);
    }

    #[test]
    fn rename_changes_only_the_display_name() {
        let id = CustomerId::new();
        let mut customer = Customer::register(
            id,
            "Old Name",
            CustomerRole::Collaborator,
            Some("123".to_string()),
            test_time(),
        )
        .unwrap();

        customer.rename("New Name").unwrap();

        assert_eq!(customer.full_name(), "New Name");
        assert_eq!(customer.id(), id);
        assert_eq!(customer.role(), CustomerRole::Collaborator);
        assert_eq!(customer.phone(), Some("123"));
    }

    #[test]
    fn rename_rejects_blank_name() {
        let mut customer =
            Customer::register(CustomerId::new(), "Keeps", CustomerRole::Customer, None, test_time())
                .unwrap();

        let err = customer.rename("  ").unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
        assert_eq!(customer.full_name(), "Keeps");
    }

    #[test]
    fn role_parses_from_wire_strings() {
        assert_eq!("customer".parse::<CustomerRole>().unwrap(), CustomerRole::Customer);
        assert_eq!(
            " Collaborator ".parse::<CustomerRole>().unwrap(),
            CustomerRole::Collaborator
        );
        assert!("supplier".parse::<CustomerRole>().is_err());
    }

    mod properties {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #![proptest_config(ProptestConfig {
                cases: 256,
                ..ProptestConfig::default()
            })]

            /// Property: any name with at least one non-whitespace character
            /// registers, and registration never alters the chosen role.
            #[test]
            fn nonblank_names_always_register(
                name in "[a-zA-Z][a-zA-Z ]{0,30}",
                collaborator in proptest::bool::ANY
            ) {
                let role = if collaborator {
                    CustomerRole::Collaborator
                } else {
                    CustomerRole::Customer
                };

                let customer =
                    Customer::register(CustomerId::new(), name.clone(), role, None, Utc::now())
                        .unwrap();

                prop_assert_eq!(customer.full_name(), name.trim());
                prop_assert_eq!(customer.role(), role);
            }
        }
    }
}
