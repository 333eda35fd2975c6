//! # Element Fallback Resolution
//!
//! How a composite coder converts its elements.
//!
//! Encoding resolves, in order:
//!
//! 1. the element coder's native encode function
//! 2. the element coder's host encode path when it has no native function
//! 3. the to-string rendering of the value when there is no element coder
//!
//! Decoding uses the element coder's native decode function. Without an
//! element coder, elements are returned as strings in the declared input
//! encoding; an element coder without a decode function is a binding error.

use super::coder::{Coder, encode_two_phase};
use super::traits::{DecodeContext, DecodeFn, EncodeContext, EncodeFn};
use super::type_map::CoderLookup;
use crate::domain::errors::{CoderError, CoderResult};
use crate::domain::value_objects::{TextEncoding, Value};
use std::borrow::Cow;

/// Which path element encoding takes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FallbackKind {
    /// Element coder with a native function.
    Native,
    /// Element coder without a native function.
    Host,
    /// No element coder.
    ToStr,
}

/// Resolved element encode path of a composite coder.
#[derive(Clone, Copy)]
pub enum ElementEncoder<'a> {
    /// Run the element coder's native function.
    Native {
        /// Element coder.
        coder: &'a Coder,
        /// Its bound encode function.
        func: EncodeFn,
    },
    /// Run the element coder's host encode path.
    Host(&'a Coder),
    /// Render values with their own string conversion.
    ToStr,
}

impl<'a> ElementEncoder<'a> {
    /// Resolves the encode path for an optional element coder.
    #[must_use]
    pub fn resolve(element: Option<&'a Coder>) -> Self {
        match element {
            Some(coder) => match coder.encode_fn() {
                Some(func) => Self::Native { coder, func },
                None => Self::Host(coder),
            },
            None => Self::ToStr,
        }
    }

    /// Returns the resolved path.
    #[must_use]
    pub const fn kind(&self) -> FallbackKind {
        match self {
            Self::Native { .. } => FallbackKind::Native,
            Self::Host(_) => FallbackKind::Host,
            Self::ToStr => FallbackKind::ToStr,
        }
    }

    /// Encodes one element.
    ///
    /// # Errors
    ///
    /// Returns the error of the element coder. The host path fails with
    /// `CoderError::NoEncoder` when the element coder has no host encoder
    /// either.
    pub fn encode(
        &self,
        value: &'a Value,
        lookup: &'a dyn CoderLookup,
    ) -> CoderResult<Cow<'a, [u8]>> {
        match *self {
            Self::Native { coder, func } => {
                encode_two_phase(func, EncodeContext::new(coder, lookup), value).map(Cow::Owned)
            }
            Self::Host(coder) => coder.encode_in(value, lookup).map(Cow::Owned),
            Self::ToStr => Ok(value.to_text_bytes()),
        }
    }
}

impl std::fmt::Debug for ElementEncoder<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Native { coder, .. } => write!(f, "Native({})", coder.display_name()),
            Self::Host(coder) => write!(f, "Host({})", coder.display_name()),
            Self::ToStr => f.write_str("ToStr"),
        }
    }
}

/// Resolved element decode path of a composite coder.
#[derive(Clone, Copy)]
pub enum ElementDecoder<'a> {
    /// Run the element coder's native function.
    Native {
        /// Element coder.
        coder: &'a Coder,
        /// Its bound decode function.
        func: DecodeFn,
    },
    /// Element coder without a decode function.
    Unbound(&'a Coder),
    /// No element coder: return elements as strings.
    Text,
}

impl<'a> ElementDecoder<'a> {
    /// Resolves the decode path for an optional element coder.
    #[must_use]
    pub fn resolve(element: Option<&'a Coder>) -> Self {
        match element {
            Some(coder) => match coder.decode_fn() {
                Some(func) => Self::Native { coder, func },
                None => Self::Unbound(coder),
            },
            None => Self::Text,
        }
    }

    /// Decodes one element of the cell described by `parent`.
    ///
    /// # Errors
    ///
    /// Returns `CoderError::NoDecoder` for an unbound element coder, the
    /// error of the element decode function, or
    /// `CoderError::InvalidEncoding` for undecodable text.
    pub fn decode(&self, data: &[u8], parent: &DecodeContext<'a>) -> CoderResult<Value> {
        match *self {
            Self::Native { coder, func } => func(&parent.for_coder(coder), data),
            Self::Unbound(coder) => Err(CoderError::NoDecoder(coder.display_name())),
            Self::Text => match parent.encoding() {
                TextEncoding::Binary => Ok(Value::Bytes(data.to_vec())),
                encoding => Ok(Value::Text(
                    encoding.decode_str(data, parent.position())?.into_owned(),
                )),
            },
        }
    }
}

impl std::fmt::Debug for ElementDecoder<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Native { coder, .. } => write!(f, "Native({})", coder.display_name()),
            Self::Unbound(coder) => write!(f, "Unbound({})", coder.display_name()),
            Self::Text => f.write_str("Text"),
        }
    }
}
