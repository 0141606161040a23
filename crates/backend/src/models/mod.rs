//! Domain records and their wire representations.
//!
//! Records (`Product`, `Payment`) only ever hold validated values. The
//! request types accept whatever the client sent so that validation errors
//! come from the service layer with a consistent message; the response types
//! are what both transports serialize.

pub mod payment;
pub mod product;

pub use payment::{NewPayment, Payment, PaymentRequest, PaymentResponse};
pub use product::{NewProduct, Product, ProductRequest, ProductResponse};
