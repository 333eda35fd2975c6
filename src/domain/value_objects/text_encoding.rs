//! # Text Encoding
//!
//! Declared byte-level encoding of a decode input buffer.

use crate::domain::errors::{CoderError, CoderResult};
use crate::domain::value_objects::position::CellPosition;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::fmt;

/// Encoding of the bytes handed to a decode function.
///
/// Decode functions that produce strings use it to interpret the input.
/// [`TextEncoding::Binary`] marks raw bytes without a character encoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextEncoding {
    /// UTF-8 text.
    #[default]
    Utf8,
    /// ISO-8859-1 text; every byte is one character.
    Latin1,
    /// Raw bytes.
    Binary,
}

impl TextEncoding {
    /// Returns the encoding name used in diagnostics.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Utf8 => "UTF-8",
            Self::Latin1 => "ISO-8859-1",
            Self::Binary => "ASCII-8BIT",
        }
    }

    /// Interprets `data` as text in this encoding.
    ///
    /// Binary input is accepted when it happens to be valid UTF-8.
    ///
    /// # Errors
    ///
    /// Returns `CoderError::InvalidEncoding` for byte sequences that are not
    /// valid in the encoding.
    ///
    /// # Examples
    ///
    /// ```
    /// use pg_coder::domain::value_objects::position::CellPosition;
    /// use pg_coder::domain::value_objects::text_encoding::TextEncoding;
    ///
    /// let bytes = [0x63, 0x61, 0x66, 0xE9];
    /// let text = TextEncoding::Latin1.decode_str(&bytes, CellPosition::UNKNOWN);
    /// assert_eq!(text.unwrap(), "café");
    /// ```
    pub fn decode_str(self, data: &[u8], position: CellPosition) -> CoderResult<Cow<'_, str>> {
        match self {
            Self::Utf8 | Self::Binary => match std::str::from_utf8(data) {
                Ok(text) => Ok(Cow::Borrowed(text)),
                Err(_) => Err(CoderError::InvalidEncoding {
                    encoding: self.name(),
                    position,
                }),
            },
            Self::Latin1 => {
                // ASCII is a valid UTF-8 subset
                if data.is_ascii()
                    && let Ok(text) = std::str::from_utf8(data)
                {
                    return Ok(Cow::Borrowed(text));
                }
                Ok(Cow::Owned(data.iter().map(|&b| char::from(b)).collect()))
            }
        }
    }
}

impl fmt::Display for TextEncoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn utf8_valid() {
        let text = TextEncoding::Utf8
            .decode_str("grüße".as_bytes(), CellPosition::UNKNOWN)
            .unwrap();
        assert_eq!(text, "grüße");
        assert!(matches!(text, Cow::Borrowed(_)));
    }

    #[test]
    fn utf8_invalid_reports_position() {
        let err = TextEncoding::Utf8
            .decode_str(&[0xFF, 0xFE], CellPosition::new(1, 2))
            .unwrap_err();
        assert_eq!(
            err,
            CoderError::InvalidEncoding {
                encoding: "UTF-8",
                position: CellPosition::new(1, 2),
            }
        );
    }

    #[test]
    fn latin1_maps_high_bytes() {
        let text = TextEncoding::Latin1
            .decode_str(&[0xC5, 0x41], CellPosition::UNKNOWN)
            .unwrap();
        assert_eq!(text, "ÅA");
    }

    #[test]
    fn latin1_ascii_borrows() {
        let text = TextEncoding::Latin1
            .decode_str(b"plain", CellPosition::UNKNOWN)
            .unwrap();
        assert_eq!(text, "plain");
        assert!(matches!(text, Cow::Borrowed(_)));
    }

    #[test]
    fn default_is_utf8() {
        assert_eq!(TextEncoding::default(), TextEncoding::Utf8);
    }
}
