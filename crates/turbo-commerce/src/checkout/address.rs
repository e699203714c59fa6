//! Shipping address.

use crate::error::CommerceError;
use serde::{Deserialize, Serialize};

/// Where an order ships to.
///
/// Street, city, state and country are required before checkout. The zip
/// code is optional.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct ShippingAddress {
    /// Street line.
    #[serde(default)]
    pub street: String,
    /// City.
    #[serde(default)]
    pub city: String,
    /// State or province.
    #[serde(default)]
    pub state: String,
    /// Country.
    #[serde(default)]
    pub country: String,
    /// Postal code.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub zip_code: Option<String>,
}

impl ShippingAddress {
    /// Create an address without a zip code.
    pub fn new(
        street: impl Into<String>,
        city: impl Into<String>,
        state: impl Into<String>,
        country: impl Into<String>,
    ) -> Self {
        Self {
            street: street.into(),
            city: city.into(),
            state: state.into(),
            country: country.into(),
            zip_code: None,
        }
    }

    /// Set the zip code.
    pub fn with_zip(mut self, zip_code: impl Into<String>) -> Self {
        self.zip_code = Some(zip_code.into());
        self
    }

    /// Names of required fields that are blank, in form order.
    pub fn missing_fields(&self) -> Vec<&'static str> {
        [
            ("street", &self.street),
            ("city", &self.city),
            ("state", &self.state),
            ("country", &self.country),
        ]
        .into_iter()
        .filter(|(_, value)| value.trim().is_empty())
        .map(|(name, _)| name)
        .collect()
    }

    /// Check every required field is populated.
    pub fn validate(&self) -> Result<(), CommerceError> {
        let missing = self.missing_fields();
        if missing.is_empty() {
            Ok(())
        } else {
            Err(CommerceError::IncompleteAddress { missing })
        }
    }

    /// Format as single line.
    pub fn one_line(&self) -> String {
        let mut parts = vec![self.street.as_str(), self.city.as_str(), self.state.as_str()];
        if let Some(ref zip) = self.zip_code {
            parts.push(zip);
        }
        parts.push(&self.country);
        parts.join(", ")
    }

    /// Format as multi-line.
    pub fn multi_line(&self) -> String {
        let city_line = match self.zip_code {
            Some(ref zip) => format!("{}, {} {}", self.city, self.state, zip),
            None => format!("{}, {}", self.city, self.state),
        };
        [self.street.clone(), city_line, self.country.clone()].join("\n")
    }
}
