use serde::{Deserialize, Serialize};
use std::fmt;

/// Delivery address as submitted by the customer.
///
/// Validity is decided once, at order creation, by an address validator.
/// Afterwards the address is carried around as descriptive data only.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Address {
    pub street_number: String,
    pub street: String,
    pub city: String,
    pub postal_code: String,
}

impl Address {
    pub fn new(
        street_number: impl Into<String>,
        street: impl Into<String>,
        city: impl Into<String>,
        postal_code: impl Into<String>,
    ) -> Self {
        Self {
            street_number: street_number.into(),
            street: street.into(),
            city: city.into(),
            postal_code: postal_code.into(),
        }
    }

    /// Names of the fields left blank, in declaration order
    pub fn blank_fields(&self) -> Vec<&'static str> {
        [
            ("street_number", &self.street_number),
            ("street", &self.street),
            ("city", &self.city),
            ("postal_code", &self.postal_code),
        ]
        .into_iter()
        .filter(|(_, value)| value.trim().is_empty())
        .map(|(name, _)| name)
        .collect()
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {}, {} {}",
            self.street_number, self.street, self.postal_code, self.city
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_format() {
        let address = Address::new("22", "Rue Alsace-Lorraine", "Toulouse", "31000");
        assert_eq!(address.to_string(), "22 Rue Alsace-Lorraine, 31000 Toulouse");
    }

    #[test]
    fn test_blank_fields() {
        let address = Address::new("22", "  ", "Toulouse", "");
        assert_eq!(address.blank_fields(), vec!["street", "postal_code"]);
    }
}
