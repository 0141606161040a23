//! Newtype IDs for store-assigned object identifiers.
//!
//! Records are identified by 12-byte object ids assigned by the document
//! store on insert. On the wire they travel as 24 lowercase hex characters.
//! Use the `define_id!` macro to create type-safe wrappers that prevent
//! accidentally mixing ids from different entity types.

/// Number of raw bytes in an object id.
pub const OBJECT_ID_LEN: usize = 12;

/// Number of hex characters in the textual form of an object id.
pub const OBJECT_ID_HEX_LEN: usize = OBJECT_ID_LEN * 2;

/// Errors that can occur when parsing an object id.
#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdError {
    /// The input does not have exactly 24 characters.
    #[error("invalid id: expected {OBJECT_ID_HEX_LEN} hex characters, got {0}")]
    InvalidLength(usize),
    /// The input contains a byte that is not a hex digit.
    #[error("invalid id: non-hex character at position {0}")]
    InvalidCharacter(usize),
}

/// Decode the 24-character hex form of an object id.
///
/// Upper-case digits are accepted.
///
/// # Errors
///
/// Returns an error if the input has the wrong length or contains a non-hex
/// character.
pub fn decode_hex(s: &str) -> Result<[u8; OBJECT_ID_LEN], IdError> {
    if s.len() != OBJECT_ID_HEX_LEN {
        return Err(IdError::InvalidLength(s.len()));
    }

    let mut bytes = [0u8; OBJECT_ID_LEN];
    hex::decode_to_slice(s, &mut bytes).map_err(|err| match err {
        hex::FromHexError::InvalidHexCharacter { index, .. } => IdError::InvalidCharacter(index),
        hex::FromHexError::OddLength | hex::FromHexError::InvalidStringLength => {
            IdError::InvalidLength(s.len())
        }
    })?;

    Ok(bytes)
}

/// Encode object id bytes as 24 lowercase hex characters.
#[must_use]
pub fn encode_hex(bytes: &[u8; OBJECT_ID_LEN]) -> String {
    hex::encode(bytes)
}

/// Macro to define a type-safe object id wrapper.
///
/// Creates a newtype wrapper around the 12 raw bytes with:
/// - `Serialize`/`Deserialize` as the 24-character hex string
/// - `Debug`, `Clone`, `Copy`, `PartialEq`, `Eq`, `Hash`, `Ord`
/// - `parse()`, `to_hex()`, `Display` and `FromStr`
/// - `bson::oid::ObjectId` conversions (with `bson` feature)
///
/// # Example
///
/// ```rust
/// # use cartpay_core::define_id;
/// define_id!(OrderId);
/// define_id!(InvoiceId);
///
/// let order_id = OrderId::parse("65f1c0ffee0123456789abcd").unwrap();
/// assert_eq!(order_id.to_string(), "65f1c0ffee0123456789abcd");
///
/// // These are different types, so this won't compile:
/// // let _: InvoiceId = order_id;
/// ```
#[macro_export]
macro_rules! define_id {
    ($name:ident) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub struct $name([u8; $crate::types::id::OBJECT_ID_LEN]);

        impl $name {
            /// Create an id from its raw bytes.
            #[must_use]
            pub const fn from_bytes(bytes: [u8; $crate::types::id::OBJECT_ID_LEN]) -> Self {
                Self(bytes)
            }

            /// Get the raw bytes.
            #[must_use]
            pub const fn bytes(&self) -> [u8; $crate::types::id::OBJECT_ID_LEN] {
                self.0
            }

            /// Parse an id from its 24-character hex form.
            ///
            /// # Errors
            ///
            /// Returns an error if the input is not exactly 24 hex characters.
            pub fn parse(s: &str) -> ::core::result::Result<Self, $crate::IdError> {
                $crate::types::id::decode_hex(s).map(Self)
            }

            /// Render the id as 24 lowercase hex characters.
            #[must_use]
            pub fn to_hex(&self) -> String {
                $crate::types::id::encode_hex(&self.0)
            }
        }

        impl ::core::fmt::Display for $name {
            fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                f.write_str(&self.to_hex())
            }
        }

        impl ::core::str::FromStr for $name {
            type Err = $crate::IdError;

            fn from_str(s: &str) -> ::core::result::Result<Self, Self::Err> {
                Self::parse(s)
            }
        }

        impl ::serde::Serialize for $name {
            fn serialize<S>(&self, serializer: S) -> ::core::result::Result<S::Ok, S::Error>
            where
                S: ::serde::Serializer,
            {
                serializer.collect_str(self)
            }
        }

        impl<'de> ::serde::Deserialize<'de> for $name {
            fn deserialize<D>(deserializer: D) -> ::core::result::Result<Self, D::Error>
            where
                D: ::serde::Deserializer<'de>,
            {
                let s = <String as ::serde::Deserialize>::deserialize(deserializer)?;
                Self::parse(&s).map_err(::serde::de::Error::custom)
            }
        }

        #[cfg(feature = "bson")]
        impl From<::bson::oid::ObjectId> for $name {
            fn from(oid: ::bson::oid::ObjectId) -> Self {
                Self(oid.bytes())
            }
        }

        #[cfg(feature = "bson")]
        impl From<$name> for ::bson::oid::ObjectId {
            fn from(id: $name) -> Self {
                Self::from_bytes(id.0)
            }
        }
    };
}

define_id!(ProductId);
define_id!(PaymentId);
