//! Strictly positive decimal quantities: product prices and payment amounts.
//!
//! Both travel as JSON numbers and are stored as doubles, so each type can be
//! built from an `f64` as well as from a [`Decimal`]. Conversions go through
//! the shortest decimal form of the double, so a value read back from storage
//! or an RPC message is the same value that was written.

use core::fmt;

use rust_decimal::Decimal;

use super::ValidationError;

/// Convert a double to the decimal with the same shortest round-trip digits.
///
/// Returns `None` for NaN, infinities and values a [`Decimal`] cannot hold
/// exactly (magnitudes of `1e29` and above, or more than 28 fractional
/// digits).
#[must_use]
pub fn decimal_from_f64(value: f64) -> Option<Decimal> {
    if !value.is_finite() {
        return None;
    }
    Decimal::from_str_exact(&value.to_string()).ok()
}

/// Convert a decimal to the nearest double.
#[must_use]
pub fn decimal_to_f64(value: Decimal) -> f64 {
    value.to_string().parse().unwrap_or(f64::NAN)
}

/// Serde adapter for decimals that travel as JSON numbers.
///
/// Use with `#[serde(with = "cartpay_core::types::price::serde_float")]`.
pub mod serde_float {
    use rust_decimal::Decimal;
    use serde::{Deserialize, Deserializer, Serializer, de};

    /// Serialize as the nearest double.
    ///
    /// # Errors
    ///
    /// Returns the serializer's error.
    pub fn serialize<S: Serializer>(value: &Decimal, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(super::decimal_to_f64(*value))
    }

    /// Deserialize from any JSON number.
    ///
    /// # Errors
    ///
    /// Fails for non-numbers and numbers a decimal cannot hold.
    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Decimal, D::Error> {
        let value = f64::deserialize(deserializer)?;
        super::decimal_from_f64(value)
            .ok_or_else(|| de::Error::custom(format!("number {value} is out of range")))
    }
}

macro_rules! positive_decimal {
    ($(#[$meta:meta])* $name:ident, $field:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
        pub struct $name(Decimal);

        impl $name {
            /// Field name used in validation messages.
            pub const FIELD: &'static str = $field;

            /// Create a new value.
            ///
            /// # Errors
            ///
            /// Returns [`ValidationError::NotPositive`] if `value <= 0`.
            pub fn new(value: Decimal) -> Result<Self, ValidationError> {
                if value <= Decimal::ZERO {
                    return Err(ValidationError::NotPositive(Self::FIELD));
                }
                Ok(Self(value))
            }

            /// Create a new value from a double.
            ///
            /// # Errors
            ///
            /// Returns [`ValidationError::NotFinite`] for NaN or infinities,
            /// [`ValidationError::NotPositive`] if `value <= 0` and
            /// [`ValidationError::OutOfRange`] if no decimal holds it exactly.
            pub fn from_f64(value: f64) -> Result<Self, ValidationError> {
                if !value.is_finite() {
                    return Err(ValidationError::NotFinite(Self::FIELD));
                }
                if value <= 0.0 {
                    return Err(ValidationError::NotPositive(Self::FIELD));
                }
                let decimal =
                    decimal_from_f64(value).ok_or(ValidationError::OutOfRange(Self::FIELD))?;
                Self::new(decimal)
            }

            /// Get the decimal value.
            #[must_use]
            pub const fn get(self) -> Decimal {
                self.0
            }

            /// Get the value as a double, for storage and RPC messages.
            #[must_use]
            pub fn as_f64(self) -> f64 {
                decimal_to_f64(self.0)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                fmt::Display::fmt(&self.0, f)
            }
        }

        impl From<$name> for Decimal {
            fn from(value: $name) -> Self {
                value.0
            }
        }
    };
}

positive_decimal!(
    /// Unit price of a product, in the store's currency.
    Price,
    "price"
);

positive_decimal!(
    /// Monetary amount of a payment.
    Amount,
    "amount"
);

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_positive_values_accepted() {
        let price = Price::new(Decimal::new(1999, 2)).unwrap();
        assert_eq!(price.get(), Decimal::new(1999, 2));
        assert_eq!(price.to_string(), "19.99");

        let amount = Amount::new(Decimal::new(1, 2)).unwrap();
        assert_eq!(Decimal::from(amount), Decimal::new(1, 2));
    }

    #[test]
    fn test_zero_and_negative_rejected() {
        assert_eq!(
            Price::new(Decimal::ZERO),
            Err(ValidationError::NotPositive("price"))
        );
        assert_eq!(
            Amount::new(Decimal::new(-10, 0)),
            Err(ValidationError::NotPositive("amount"))
        );
        assert_eq!(
            Amount::new(Decimal::ZERO).unwrap_err().to_string(),
            "amount must be greater than 0"
        );
        assert_eq!(
            Price::new(Decimal::NEGATIVE_ONE).unwrap_err().to_string(),
            "price must be greater than 0"
        );
    }

    #[test]
    fn test_from_f64() {
        let amount = Amount::from_f64(100.5).unwrap();
        assert_eq!(amount.get(), Decimal::new(1005, 1));
        assert!((amount.as_f64() - 100.5).abs() < f64::EPSILON);

        assert_eq!(
            Amount::from_f64(-0.01),
            Err(ValidationError::NotPositive("amount"))
        );
        assert_eq!(
            Price::from_f64(f64::NAN),
            Err(ValidationError::NotFinite("price"))
        );
        assert_eq!(
            Price::from_f64(f64::INFINITY),
            Err(ValidationError::NotFinite("price"))
        );
    }

    #[test]
    fn test_from_f64_keeps_every_digit() {
        for raw in [100.123_456_789_012_34, 0.300_000_000_000_000_04, 19.999_999_999_999_996] {
            let amount = Amount::from_f64(raw).unwrap();
            assert_eq!(amount.to_string(), raw.to_string());
            assert_eq!(amount.as_f64().to_bits(), raw.to_bits());
        }
    }

    #[test]
    fn test_from_f64_reports_unrepresentable_values() {
        assert_eq!(
            Amount::from_f64(1e-30),
            Err(ValidationError::OutOfRange("amount"))
        );
        assert_eq!(
            Price::from_f64(1e30),
            Err(ValidationError::OutOfRange("price"))
        );
        assert_eq!(
            Price::from_f64(1e30).unwrap_err().to_string(),
            "price is out of range"
        );
        assert!(Amount::from_f64(1e28).is_ok());
        assert!(Amount::from_f64(1e-28).is_ok());
    }

    #[test]
    fn test_serde_float_round_trips_doubles() {
        #[derive(serde::Serialize, serde::Deserialize)]
        struct Body {
            #[serde(with = "serde_float")]
            amount: Decimal,
        }

        let body: Body = serde_json::from_str(r#"{"amount": 0.30000000000000004}"#).unwrap();
        assert_eq!(body.amount.to_string(), "0.30000000000000004");
        assert_eq!(
            serde_json::to_string(&body).unwrap(),
            r#"{"amount":0.30000000000000004}"#
        );

        let body: Body = serde_json::from_str(r#"{"amount": 42}"#).unwrap();
        assert_eq!(body.amount, Decimal::new(42, 0));

        assert!(serde_json::from_str::<Body>(r#"{"amount": 1e30}"#).is_err());
    }
}
