//! Product name type.

use core::fmt;

use serde::{Deserialize, Serialize};

use super::ValidationError;

/// The display name of a product.
///
/// ## Constraints
///
/// - Must not be empty or consist only of whitespace
///
/// The name is stored exactly as given; surrounding whitespace is not trimmed.
///
/// ## Examples
///
/// ```
/// use cartpay_core::ProductName;
///
/// assert!(ProductName::parse("Dried Pineapple").is_ok());
///
/// assert!(ProductName::parse("").is_err());
/// assert!(ProductName::parse("   ").is_err());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct ProductName(String);

impl ProductName {
    /// Field name used in validation messages.
    pub const FIELD: &'static str = "name";

    /// Parse a `ProductName` from a string.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::Required`] if the input is empty or blank.
    pub fn parse(s: &str) -> Result<Self, ValidationError> {
        if s.trim().is_empty() {
            return Err(ValidationError::Required(Self::FIELD));
        }
        Ok(Self(s.to_owned()))
    }

    /// Get the name as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consume the name and return the inner string.
    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for ProductName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for ProductName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_valid() {
        let name = ProductName::parse("Pineapple Rings").unwrap();
        assert_eq!(name.as_str(), "Pineapple Rings");
        assert_eq!(name.to_string(), "Pineapple Rings");
    }

    #[test]
    fn test_parse_keeps_surrounding_whitespace() {
        let name = ProductName::parse(" Mango ").unwrap();
        assert_eq!(name.into_inner(), " Mango ");
    }

    #[test]
    fn test_parse_empty() {
        let err = ProductName::parse("").unwrap_err();
        assert_eq!(err, ValidationError::Required("name"));
        assert_eq!(err.to_string(), "name is required");
    }

    #[test]
    fn test_parse_blank() {
        assert!(ProductName::parse(" \t\n").is_err());
    }
}
