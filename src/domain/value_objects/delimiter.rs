//! # Delimiter Value Object
//!
//! Single-byte separator between the elements of a composite value.
//!
//! # Examples
//!
//! ```
//! use pg_coder::domain::value_objects::delimiter::Delimiter;
//!
//! let delimiter = Delimiter::new(b";").unwrap();
//! assert_eq!(delimiter.as_byte(), b';');
//! assert!(Delimiter::new(b"").is_err());
//! assert!(Delimiter::new(b",,").is_err());
//! ```

use crate::domain::errors::{CoderError, CoderResult};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A validated one-byte delimiter.
///
/// Any byte value is accepted, including bytes outside the ASCII range.
///
/// In configuration files the delimiter is written as a one-character
/// string. Characters up to U+00FF map to the byte of the same value, so
/// every delimiter survives a serialize/deserialize cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Delimiter(u8);

impl Delimiter {
    /// The delimiter used when none is configured.
    pub const DEFAULT: Self = Self(b',');

    /// Creates a delimiter from a byte string.
    ///
    /// # Errors
    ///
    /// Returns `CoderError::InvalidDelimiter` unless `bytes` is exactly one
    /// byte long.
    pub fn new(bytes: &[u8]) -> CoderResult<Self> {
        match bytes {
            [byte] => Ok(Self(*byte)),
            other => Err(CoderError::InvalidDelimiter(other.len())),
        }
    }

    /// Creates a delimiter from a single byte.
    #[inline]
    #[must_use]
    pub const fn from_byte(byte: u8) -> Self {
        Self(byte)
    }

    /// Returns the delimiter byte.
    #[inline]
    #[must_use]
    pub const fn as_byte(self) -> u8 {
        self.0
    }

    /// Returns the delimiter as a one-byte string.
    #[inline]
    #[must_use]
    pub const fn to_bytes(self) -> [u8; 1] {
        [self.0]
    }
}

impl Default for Delimiter {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl fmt::Display for Delimiter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", char::from(self.0))
    }
}

impl TryFrom<String> for Delimiter {
    type Error = CoderError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        if value.len() == 1 {
            return Self::new(value.as_bytes());
        }
        let mut chars = value.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => u8::try_from(u32::from(c))
                .map(Self)
                .map_err(|_| CoderError::InvalidDelimiter(value.len())),
            _ => Err(CoderError::InvalidDelimiter(value.len())),
        }
    }
}

impl From<Delimiter> for String {
    fn from(delimiter: Delimiter) -> Self {
        char::from(delimiter.0).to_string()
    }
}
