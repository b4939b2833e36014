use async_trait::async_trait;
use pizzeria_shared::Address;
use serde::{Deserialize, Serialize};

use crate::CoreResult;

/// Outcome of an address check
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "verdict", content = "reason", rename_all = "snake_case")]
pub enum AddressVerdict {
    Valid,
    Invalid(String),
}

impl AddressVerdict {
    pub fn is_valid(&self) -> bool {
        matches!(self, AddressVerdict::Valid)
    }
}

/// Decides whether an order can be delivered to an address.
///
/// Implementations may call out to a geocoding service. Transport failures
/// are reported as `Err` and the caller treats them as a rejected address.
#[async_trait]
pub trait AddressValidator: Send + Sync {
    async fn validate(&self, address: &Address) -> CoreResult<AddressVerdict>;
}

/// Service-area rules that need no network access: every field filled in,
/// the configured city and one of the configured postal codes.
#[derive(Debug, Clone)]
pub struct LocalAddressValidator {
    city: String,
    postal_codes: Vec<String>,
}

impl LocalAddressValidator {
    pub fn new(city: impl Into<String>, postal_codes: Vec<String>) -> Self {
        Self {
            city: city.into(),
            postal_codes,
        }
    }

    /// Synchronous form of the rules, reused by validators that add a remote lookup.
    pub fn check(&self, address: &Address) -> AddressVerdict {
        let blank = address.blank_fields();
        if !blank.is_empty() {
            return AddressVerdict::Invalid(format!(
                "Missing address fields: {}",
                blank.join(", ")
            ));
        }

        if !address.city.trim().eq_ignore_ascii_case(&self.city) {
            return AddressVerdict::Invalid(format!("City must be {}", self.city));
        }

        let postal_code = address.postal_code.trim();
        if !self.postal_codes.iter().any(|code| code == postal_code) {
            return AddressVerdict::Invalid(format!(
                "Postal code must be one of: {}",
                self.postal_codes.join(", ")
            ));
        }

        AddressVerdict::Valid
    }
}

impl Default for LocalAddressValidator {
    fn default() -> Self {
        Self::new("Toulouse", vec!["31000".to_string()])
    }
}

#[async_trait]
impl AddressValidator for LocalAddressValidator {
    async fn validate(&self, address: &Address) -> CoreResult<AddressVerdict> {
        let verdict = self.check(address);
        if let AddressVerdict::Invalid(reason) = &verdict {
            tracing::debug!("Address rejected by service-area rules: {}", reason);
        }
        Ok(verdict)
    }
}
