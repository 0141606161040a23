//! Payment records and wire shapes.

use cartpay_core::{Amount, PaymentId};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// A stored payment. Payments are immutable once created.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Payment {
    pub id: PaymentId,
    pub amount: Amount,
}

/// Validated fields for recording a payment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NewPayment {
    pub amount: Amount,
}

impl NewPayment {
    /// Attach a store-assigned id.
    #[must_use]
    pub const fn with_id(self, id: PaymentId) -> Payment {
        Payment {
            id,
            amount: self.amount,
        }
    }
}

/// Body of `POST /payments`.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, ToSchema)]
pub struct PaymentRequest {
    #[serde(default, with = "cartpay_core::types::price::serde_float")]
    #[schema(value_type = f64, example = 100.5)]
    pub amount: Decimal,
}

/// A payment as returned to clients.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct PaymentResponse {
    #[schema(value_type = String, example = "65f1c0ffee0123456789abcd")]
    pub id: PaymentId,
    #[serde(with = "cartpay_core::types::price::serde_float")]
    #[schema(value_type = f64, example = 100.5)]
    pub amount: Decimal,
}

impl From<Payment> for PaymentResponse {
    fn from(payment: Payment) -> Self {
        Self {
            id: payment.id,
            amount: payment.amount.get(),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_response_serializes_amount_as_number() {
        let payment = NewPayment {
            amount: Amount::new(Decimal::new(1005, 1)).unwrap(),
        }
        .with_id(PaymentId::parse("65f1c0ffee0123456789abcd").unwrap());

        let value = serde_json::to_value(PaymentResponse::from(payment)).unwrap();
        assert_eq!(
            value,
            json!({"id": "65f1c0ffee0123456789abcd", "amount": 100.5})
        );
    }

    #[test]
    fn test_response_amount_keeps_every_digit() {
        let payment = NewPayment {
            amount: Amount::from_f64(19.999_999_999_999_996).unwrap(),
        }
        .with_id(PaymentId::parse("65f1c0ffee0123456789abcd").unwrap());

        let json = serde_json::to_string(&PaymentResponse::from(payment)).unwrap();
        assert_eq!(
            json,
            r#"{"id":"65f1c0ffee0123456789abcd","amount":19.999999999999996}"#
        );
    }

    #[test]
    fn test_request_accepts_integers_and_defaults_missing_amount() {
        let req: PaymentRequest = serde_json::from_value(json!({"amount": 42})).unwrap();
        assert_eq!(req.amount, Decimal::new(42, 0));

        let req: PaymentRequest = serde_json::from_value(json!({})).unwrap();
        assert_eq!(req.amount, Decimal::ZERO);
    }
}
