//! # Codec Function Contracts
//!
//! Signatures of the native codec functions bound to coders, and the
//! contexts they receive.
//!
//! ## Encoding
//!
//! An [`EncodeFn`] runs in two phases. The first call returns an
//! [`EncodeStep`]:
//!
//! - [`EncodeStep::Ready`] - the output is already materialized and is
//!   returned unchanged, no buffer is allocated
//! - [`EncodeStep::NeedsBuffer`] - the exact output length plus a
//!   continuation that writes into a buffer of that length and reports the
//!   number of bytes written
//!
//! The continuation owns whatever intermediate state the first phase
//! computed, so nothing is shared between the two calls.
//!
//! ## Decoding
//!
//! A [`DecodeFn`] receives the raw cell bytes together with a
//! [`DecodeContext`] exposing the coder metadata, the cell position hints
//! and the declared text encoding of the input.

use super::coder::Coder;
use super::composite::CompositeParams;
use super::fallback::{ElementDecoder, ElementEncoder};
use super::type_map::CoderLookup;
use crate::domain::errors::{CoderError, CoderResult};
use crate::domain::value_objects::{CellPosition, Format, Oid, TextEncoding, Value};
use std::fmt;
use tracing::trace;

/// Native encode function.
pub type EncodeFn = for<'a> fn(&EncodeContext<'a>, &'a Value) -> CoderResult<EncodeStep<'a>>;

/// Native decode function.
pub type DecodeFn = fn(&DecodeContext<'_>, &[u8]) -> CoderResult<Value>;

/// Second phase of an encode: writes into the sized buffer, returns the
/// number of bytes written.
pub type WriteFn<'a> = Box<dyn FnOnce(&mut [u8]) -> CoderResult<usize> + 'a>;

/// Result of the first encode phase.
pub enum EncodeStep<'a> {
    /// Final output, produced without a separately sized buffer.
    Ready(Vec<u8>),
    /// Output of exactly `len` bytes, written by `write`.
    NeedsBuffer {
        /// Number of bytes the output occupies.
        len: usize,
        /// Writes the output and returns the number of bytes written.
        write: WriteFn<'a>,
    },
}

impl<'a> EncodeStep<'a> {
    /// Creates a [`EncodeStep::NeedsBuffer`] step.
    pub fn needs_buffer<F>(len: usize, write: F) -> Self
    where
        F: FnOnce(&mut [u8]) -> CoderResult<usize> + 'a,
    {
        Self::NeedsBuffer {
            len,
            write: Box::new(write),
        }
    }
}

impl fmt::Debug for EncodeStep<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ready(output) => f.debug_tuple("Ready").field(&output.len()).finish(),
            Self::NeedsBuffer { len, .. } => {
                f.debug_struct("NeedsBuffer").field("len", len).finish()
            }
        }
    }
}

/// View of the encoding coder handed to an [`EncodeFn`].
#[derive(Clone, Copy)]
pub struct EncodeContext<'a> {
    coder: &'a Coder,
    lookup: &'a dyn CoderLookup,
}

impl<'a> EncodeContext<'a> {
    /// Creates a context for `coder`, resolving element coders in `lookup`.
    #[must_use]
    pub fn new(coder: &'a Coder, lookup: &'a dyn CoderLookup) -> Self {
        Self { coder, lookup }
    }

    /// Returns the coder being run.
    #[inline]
    #[must_use]
    pub fn coder(&self) -> &'a Coder {
        self.coder
    }

    /// Returns the lookup used for element coders.
    #[inline]
    #[must_use]
    pub fn lookup(&self) -> &'a dyn CoderLookup {
        self.lookup
    }

    /// Returns the OID of the coder.
    #[inline]
    #[must_use]
    pub fn oid(&self) -> Oid {
        self.coder.oid()
    }

    /// Returns the wire format of the coder.
    #[inline]
    #[must_use]
    pub fn format(&self) -> Format {
        self.coder.format()
    }

    /// Returns the composite parameters, if the coder is composite.
    #[inline]
    #[must_use]
    pub fn composite(&self) -> Option<&'a CompositeParams> {
        self.coder.composite()
    }

    /// Resolves how the elements of a composite value are encoded.
    ///
    /// # Errors
    ///
    /// Returns `CoderError::UnknownCoder` if the element handle does not
    /// resolve in the lookup.
    pub fn element_encoder(&self) -> CoderResult<ElementEncoder<'a>> {
        let element = resolve_element(self.coder, self.lookup)?;
        let resolved = ElementEncoder::resolve(element);
        trace!(
            coder = %self.coder.display_name(),
            fallback = ?resolved.kind(),
            "resolved element encoder"
        );
        Ok(resolved)
    }

    /// Builds the error for a value this coder cannot encode.
    #[must_use]
    pub fn unsupported(&self, value: &Value) -> CoderError {
        CoderError::UnsupportedValue {
            coder: self.coder.display_name(),
            found: value.type_name(),
        }
    }
}

impl fmt::Debug for EncodeContext<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EncodeContext")
            .field("coder", &self.coder.display_name())
            .finish()
    }
}

/// View of the decoding coder and the decoded cell handed to a [`DecodeFn`].
#[derive(Clone, Copy)]
pub struct DecodeContext<'a> {
    coder: &'a Coder,
    lookup: &'a dyn CoderLookup,
    position: CellPosition,
    encoding: TextEncoding,
}

impl<'a> DecodeContext<'a> {
    /// Creates a context for decoding one cell with `coder`.
    #[must_use]
    pub fn new(
        coder: &'a Coder,
        lookup: &'a dyn CoderLookup,
        position: CellPosition,
        encoding: TextEncoding,
    ) -> Self {
        Self {
            coder,
            lookup,
            position,
            encoding,
        }
    }

    /// Returns the coder being run.
    #[inline]
    #[must_use]
    pub fn coder(&self) -> &'a Coder {
        self.coder
    }

    /// Returns the lookup used for element coders.
    #[inline]
    #[must_use]
    pub fn lookup(&self) -> &'a dyn CoderLookup {
        self.lookup
    }

    /// Returns the position hints of the cell.
    #[inline]
    #[must_use]
    pub fn position(&self) -> CellPosition {
        self.position
    }

    /// Returns the declared encoding of the input bytes.
    #[inline]
    #[must_use]
    pub fn encoding(&self) -> TextEncoding {
        self.encoding
    }

    /// Returns the wire format of the coder.
    #[inline]
    #[must_use]
    pub fn format(&self) -> Format {
        self.coder.format()
    }

    /// Returns the composite parameters, if the coder is composite.
    #[inline]
    #[must_use]
    pub fn composite(&self) -> Option<&'a CompositeParams> {
        self.coder.composite()
    }

    /// Returns a context for `coder` decoding the same cell.
    #[must_use]
    pub fn for_coder(&self, coder: &'a Coder) -> Self {
        Self { coder, ..*self }
    }

    /// Resolves how the elements of a composite value are decoded.
    ///
    /// # Errors
    ///
    /// Returns `CoderError::UnknownCoder` if the element handle does not
    /// resolve in the lookup.
    pub fn element_decoder(&self) -> CoderResult<ElementDecoder<'a>> {
        let element = resolve_element(self.coder, self.lookup)?;
        Ok(ElementDecoder::resolve(element))
    }

    /// Builds an invalid-input error carrying the cell position.
    #[must_use]
    pub fn invalid_input(&self, message: impl Into<String>) -> CoderError {
        CoderError::InvalidInput {
            coder: self.coder.display_name(),
            position: self.position,
            message: message.into(),
        }
    }
}

impl fmt::Debug for DecodeContext<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DecodeContext")
            .field("coder", &self.coder.display_name())
            .field("position", &self.position)
            .field("encoding", &self.encoding)
            .finish()
    }
}

fn resolve_element<'a>(
    coder: &'a Coder,
    lookup: &'a dyn CoderLookup,
) -> CoderResult<Option<&'a Coder>> {
    match coder.elements_type() {
        Some(id) => lookup
            .coder(id)
            .map(Some)
            .ok_or(CoderError::UnknownCoder(id)),
        None => Ok(None),
    }
}
