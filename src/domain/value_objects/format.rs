//! # Wire Format
//!
//! Transmission format of a coder: text or binary.

use crate::domain::errors::{CoderError, CoderResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Wire representation mode spoken by a coder.
///
/// The numeric codes match the format codes of the PostgreSQL protocol.
///
/// # Examples
///
/// ```
/// use pg_coder::domain::value_objects::format::Format;
///
/// assert_eq!(Format::default(), Format::Text);
/// assert_eq!(Format::Binary.code(), 1);
/// assert_eq!(Format::from_code(0).unwrap(), Format::Text);
/// assert!(Format::from_code(2).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[repr(u8)]
pub enum Format {
    /// Text representation.
    #[default]
    Text = 0,
    /// Binary representation.
    Binary = 1,
}

impl Format {
    /// Returns the protocol format code.
    #[inline]
    #[must_use]
    pub const fn code(self) -> i16 {
        self as i16
    }

    /// Converts a protocol format code.
    ///
    /// # Errors
    ///
    /// Returns `CoderError::InvalidArgument` for codes other than 0 and 1.
    pub fn from_code(code: i64) -> CoderResult<Self> {
        match code {
            0 => Ok(Self::Text),
            1 => Ok(Self::Binary),
            other => Err(CoderError::InvalidArgument(format!(
                "unknown format code {other}"
            ))),
        }
    }

    /// Returns true for the text format.
    #[inline]
    #[must_use]
    pub const fn is_text(self) -> bool {
        matches!(self, Self::Text)
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text => write!(f, "text"),
            Self::Binary => write!(f, "binary"),
        }
    }
}

impl FromStr for Format {
    type Err = CoderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "text" | "0" => Ok(Self::Text),
            "binary" | "1" => Ok(Self::Binary),
            other => Err(CoderError::InvalidArgument(format!(
                "unknown format '{other}'"
            ))),
        }
    }
}
