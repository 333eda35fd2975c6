//! # Coder
//!
//! The coder entity: identity metadata, the bound codec function and,
//! for composite coders, the structural parameters.
//!
//! Simple and composite coders share this one type; [`CoderKind`] tags the
//! variant. A coder is either an encoder or a decoder, fixed by its
//! [`BaseClass`], and binds only the function matching that role.
//!
//! # Encoding
//!
//! [`Coder::encode_in`] resolves the encode path in order:
//!
//! 1. the bound native [`EncodeFn`], run through the two-phase protocol
//! 2. the host encoder hook installed with [`Coder::with_host_encoder`]
//! 3. otherwise `CoderError::NoEncoder`
//!
//! A native function may return [`EncodeStep::Ready`], which is passed
//! through unchanged, or [`EncodeStep::NeedsBuffer`], in which case exactly
//! `len` bytes are allocated and the continuation fills them. A continuation
//! reporting more bytes than it asked for is a broken codec function and
//! aborts with a panic.
//!
//! # Decoding
//!
//! Decoding requires a bound [`DecodeFn`]; without one the coder fails with
//! `CoderError::NoDecoder`. [`Coder::decode_positional`] accepts one or
//! three arguments: the buffer, or the buffer with tuple and field hints.
//!
//! # Examples
//!
//! ```
//! use pg_coder::coder::{BaseClass, Coder};
//! use pg_coder::domain::value_objects::{Format, Oid, Value};
//!
//! let mut coder = Coder::new(BaseClass::SimpleEncoder).unwrap();
//! assert_eq!(coder.oid(), Oid::UNSET);
//! assert_eq!(coder.format(), Format::Text);
//!
//! coder.set_oid(Oid::new(23));
//! coder.set_name(Some("int4".to_string()));
//! assert_eq!(coder.name(), Some("int4"));
//!
//! // nothing bound yet
//! assert!(coder.encode(&Value::from(1)).is_err());
//! ```

use super::class::{BaseClass, CodecFn, Role};
use super::composite::CompositeParams;
use super::traits::{DecodeContext, DecodeFn, EncodeContext, EncodeFn, EncodeStep};
use super::type_map::{CoderLookup, Detached};
use crate::config::CoderDefaults;
use crate::domain::errors::{CoderError, CoderResult};
use crate::domain::value_objects::{
    CellPosition, CoderId, Delimiter, Format, Oid, TextEncoding, Value,
};
use std::fmt;
use std::sync::Arc;
use tracing::{error, trace};

/// Host-side encode override, used when no native function is bound.
pub type HostEncodeFn = Arc<dyn Fn(&Coder, &Value) -> CoderResult<Vec<u8>> + Send + Sync>;

/// Simple or composite variant of a coder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CoderKind {
    /// Leaf coder.
    Simple,
    /// Container coder with structural parameters.
    Composite(CompositeParams),
}

/// An encoder or decoder for one database type in one format.
#[derive(Clone)]
pub struct Coder {
    class_name: Arc<str>,
    base: BaseClass,
    role: Role,
    oid: Oid,
    format: Format,
    name: Option<String>,
    encode_fn: Option<EncodeFn>,
    decode_fn: Option<DecodeFn>,
    host_encoder: Option<HostEncodeFn>,
    kind: CoderKind,
}

impl Coder {
    /// Constructs a coder of a concrete base class with default metadata:
    /// OID 0, text format, no name and no bound function. Composite coders
    /// start with delimiter `,`, quotation enabled and no element coder.
    ///
    /// # Errors
    ///
    /// Returns `CoderError::AbstractClass` for [`BaseClass::Coder`],
    /// [`BaseClass::SimpleCoder`] and [`BaseClass::CompositeCoder`].
    pub fn new(base: BaseClass) -> CoderResult<Self> {
        Self::with_class_name(base, Arc::from(base.name()))
    }

    pub(crate) fn with_class_name(base: BaseClass, class_name: Arc<str>) -> CoderResult<Self> {
        let Some(role) = base.role() else {
            return Err(CoderError::AbstractClass(class_name.to_string()));
        };
        let kind = if base.is_composite() {
            CoderKind::Composite(CompositeParams::default())
        } else {
            CoderKind::Simple
        };
        Ok(Self {
            class_name,
            base,
            role,
            oid: Oid::UNSET,
            format: Format::Text,
            name: None,
            encode_fn: None,
            decode_fn: None,
            host_encoder: None,
            kind,
        })
    }

    // ========================================================================
    // Identity and metadata
    // ========================================================================

    /// Returns the class name, qualified by namespace for defined classes.
    #[inline]
    #[must_use]
    pub fn class_name(&self) -> &str {
        &self.class_name
    }

    /// Returns the base class.
    #[inline]
    #[must_use]
    pub const fn base(&self) -> BaseClass {
        self.base
    }

    /// Returns whether this coder encodes or decodes.
    #[inline]
    #[must_use]
    pub const fn role(&self) -> Role {
        self.role
    }

    /// Returns the database type identifier.
    #[inline]
    #[must_use]
    pub const fn oid(&self) -> Oid {
        self.oid
    }

    /// Sets the database type identifier.
    pub fn set_oid(&mut self, oid: impl Into<Oid>) {
        self.oid = oid.into();
    }

    /// Returns the wire format.
    #[inline]
    #[must_use]
    pub const fn format(&self) -> Format {
        self.format
    }

    /// Sets the wire format.
    pub fn set_format(&mut self, format: Format) {
        self.format = format;
    }

    /// Sets the wire format from its numeric code.
    ///
    /// # Errors
    ///
    /// Returns `CoderError::InvalidArgument` for codes other than 0 and 1.
    pub fn set_format_code(&mut self, code: i64) -> CoderResult<()> {
        self.format = Format::from_code(code)?;
        Ok(())
    }

    /// Returns the diagnostic name, if set.
    #[inline]
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Sets or clears the diagnostic name.
    pub fn set_name(&mut self, name: Option<String>) {
        self.name = name;
    }

    /// Returns the class name followed by the diagnostic name, if any.
    #[must_use]
    pub fn display_name(&self) -> String {
        match &self.name {
            Some(name) => format!("{} ({name})", self.class_name),
            None => self.class_name.to_string(),
        }
    }

    // ========================================================================
    // Function binding
    // ========================================================================

    /// Returns the bound encode function.
    #[inline]
    #[must_use]
    pub fn encode_fn(&self) -> Option<EncodeFn> {
        self.encode_fn
    }

    /// Returns the bound decode function.
    #[inline]
    #[must_use]
    pub fn decode_fn(&self) -> Option<DecodeFn> {
        self.decode_fn
    }

    /// Binds a codec function, replacing any previous binding.
    ///
    /// # Errors
    ///
    /// Returns `CoderError::RoleMismatch` when binding a decode function to
    /// an encoder or an encode function to a decoder.
    pub fn bind(&mut self, function: CodecFn) -> CoderResult<()> {
        match (self.role, function) {
            (Role::Encoder, CodecFn::Encode(f)) => self.encode_fn = Some(f),
            (Role::Decoder, CodecFn::Decode(f)) => self.decode_fn = Some(f),
            (_, function) => {
                return Err(CoderError::RoleMismatch {
                    class: self.class_name.to_string(),
                    base: self.base.name(),
                    function: function.kind(),
                });
            }
        }
        Ok(())
    }

    /// Installs a host-side encode override.
    ///
    /// The override is used by [`Coder::encode_in`] when no native function
    /// is bound, and by composite coders encoding elements with this coder.
    #[must_use]
    pub fn with_host_encoder<F>(mut self, encoder: F) -> Self
    where
        F: Fn(&Coder, &Value) -> CoderResult<Vec<u8>> + Send + Sync + 'static,
    {
        self.host_encoder = Some(Arc::new(encoder));
        self
    }

    /// Installs or removes the host-side encode override.
    pub fn set_host_encoder(&mut self, encoder: Option<HostEncodeFn>) {
        self.host_encoder = encoder;
    }

    /// Returns true if a host-side encode override is installed.
    #[inline]
    #[must_use]
    pub fn has_host_encoder(&self) -> bool {
        self.host_encoder.is_some()
    }

    // ========================================================================
    // Composite parameters
    // ========================================================================

    /// Returns the simple/composite variant.
    #[inline]
    #[must_use]
    pub const fn kind(&self) -> &CoderKind {
        &self.kind
    }

    /// Returns true for composite coders.
    #[inline]
    #[must_use]
    pub const fn is_composite(&self) -> bool {
        matches!(self.kind, CoderKind::Composite(_))
    }

    /// Returns the composite parameters, if this is a composite coder.
    #[inline]
    #[must_use]
    pub const fn composite(&self) -> Option<&CompositeParams> {
        match &self.kind {
            CoderKind::Composite(params) => Some(params),
            CoderKind::Simple => None,
        }
    }

    fn composite_mut(&mut self) -> CoderResult<&mut CompositeParams> {
        match &mut self.kind {
            CoderKind::Composite(params) => Ok(params),
            CoderKind::Simple => Err(CoderError::NotComposite(self.class_name.to_string())),
        }
    }

    /// Returns the element coder handle of a composite coder.
    #[must_use]
    pub fn elements_type(&self) -> Option<CoderId> {
        self.composite().and_then(CompositeParams::elements_type)
    }

    /// Sets or clears the element coder handle.
    ///
    /// Clearing it re-enables the to-string fallback for elements. The
    /// handle is not checked here; [`TypeMap::set_elements_type`] verifies
    /// that it resolves.
    ///
    /// [`TypeMap::set_elements_type`]: super::TypeMap::set_elements_type
    ///
    /// # Errors
    ///
    /// Returns `CoderError::NotComposite` on simple coders.
    pub fn set_elements_type(&mut self, elements_type: Option<CoderId>) -> CoderResult<()> {
        self.composite_mut()?.set_elements_type(elements_type);
        Ok(())
    }

    /// Returns the element delimiter of a composite coder.
    #[must_use]
    pub fn delimiter(&self) -> Option<Delimiter> {
        self.composite().map(CompositeParams::delimiter)
    }

    /// Sets the element delimiter.
    ///
    /// # Errors
    ///
    /// Returns `CoderError::InvalidDelimiter` unless `delimiter` is exactly
    /// one byte, and `CoderError::NotComposite` on simple coders.
    pub fn set_delimiter(&mut self, delimiter: &[u8]) -> CoderResult<()> {
        let delimiter = Delimiter::new(delimiter)?;
        self.composite_mut()?.set_delimiter(delimiter);
        Ok(())
    }

    /// Returns the quotation policy of a composite coder.
    #[must_use]
    pub fn needs_quotation(&self) -> Option<bool> {
        self.composite().map(CompositeParams::needs_quotation)
    }

    /// Sets the quotation policy.
    ///
    /// # Errors
    ///
    /// Returns `CoderError::NotComposite` on simple coders.
    pub fn set_needs_quotation(&mut self, needs_quotation: bool) -> CoderResult<()> {
        self.composite_mut()?.set_needs_quotation(needs_quotation);
        Ok(())
    }

    pub(crate) fn apply_defaults(&mut self, defaults: &CoderDefaults) {
        if let CoderKind::Composite(params) = &mut self.kind {
            let elements_type = params.elements_type();
            *params = CompositeParams::from_defaults(defaults);
            params.set_elements_type(elements_type);
        }
    }

    // ========================================================================
    // Encode
    // ========================================================================

    /// Encodes `value` without an element coder lookup.
    ///
    /// Composite coders encode their elements through the to-string
    /// fallback unless they are run through a [`TypeMap`](super::TypeMap).
    ///
    /// # Errors
    ///
    /// Returns `CoderError::NoEncoder` if neither a native function nor a
    /// host encoder is available, or the error of the codec function.
    ///
    /// # Panics
    ///
    /// Panics if the native function writes more bytes than it requested.
    pub fn encode(&self, value: &Value) -> CoderResult<Vec<u8>> {
        self.encode_in(value, &Detached)
    }

    /// Encodes `value`, resolving element coders in `lookup`.
    ///
    /// # Errors
    ///
    /// Returns `CoderError::NoEncoder` if neither a native function nor a
    /// host encoder is available, or the error of the codec function.
    ///
    /// # Panics
    ///
    /// Panics if the native function writes more bytes than it requested.
    pub fn encode_in<'a>(
        &'a self,
        value: &'a Value,
        lookup: &'a dyn CoderLookup,
    ) -> CoderResult<Vec<u8>> {
        if let Some(func) = self.encode_fn {
            return encode_two_phase(func, EncodeContext::new(self, lookup), value);
        }
        if let Some(host) = &self.host_encoder {
            trace!(coder = %self.class_name, "encoding through host encoder");
            return host(self, value);
        }
        Err(CoderError::NoEncoder(self.display_name()))
    }

    // ========================================================================
    // Decode
    // ========================================================================

    /// Decodes `data` with unknown position hints and UTF-8 input.
    ///
    /// # Errors
    ///
    /// Returns `CoderError::NoDecoder` if no decode function is bound, or
    /// the error of the codec function.
    pub fn decode(&self, data: &[u8]) -> CoderResult<Value> {
        self.decode_args(&DecodeArgs::new(data), &Detached)
    }

    /// Decodes `data` located at `tuple`/`field`.
    ///
    /// # Errors
    ///
    /// Same as [`Coder::decode`].
    pub fn decode_at(&self, data: &[u8], tuple: i32, field: i32) -> CoderResult<Value> {
        self.decode_args(&DecodeArgs::new(data).at(tuple, field), &Detached)
    }

    /// Decodes with explicit arguments, resolving element coders in `lookup`.
    ///
    /// # Errors
    ///
    /// Same as [`Coder::decode`].
    pub fn decode_args(
        &self,
        args: &DecodeArgs<'_>,
        lookup: &dyn CoderLookup,
    ) -> CoderResult<Value> {
        let func = self
            .decode_fn
            .ok_or_else(|| CoderError::NoDecoder(self.display_name()))?;
        let ctx = DecodeContext::new(self, lookup, args.position(), args.encoding());
        func(&ctx, args.data())
    }

    /// Decodes from dynamic positional arguments: `[buffer]` or
    /// `[buffer, tuple, field]`.
    ///
    /// A [`Value::Text`] buffer is decoded as UTF-8, a [`Value::Bytes`]
    /// buffer as binary.
    ///
    /// # Errors
    ///
    /// Returns `CoderError::ArgumentCount` for any other number of
    /// arguments, `CoderError::WrongArgumentType` or
    /// `CoderError::InvalidArgument` for malformed arguments, otherwise the
    /// errors of [`Coder::decode`].
    pub fn decode_positional(&self, args: &[Value]) -> CoderResult<Value> {
        let args = DecodeArgs::from_positional(args)?;
        self.decode_args(&args, &Detached)
    }
}

impl fmt::Debug for Coder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Coder")
            .field("class_name", &self.class_name)
            .field("oid", &self.oid)
            .field("format", &self.format)
            .field("name", &self.name)
            .field("encode_fn", &self.encode_fn.is_some())
            .field("decode_fn", &self.decode_fn.is_some())
            .field("host_encoder", &self.host_encoder.is_some())
            .field("kind", &self.kind)
            .finish()
    }
}

// ============================================================================
// Two-phase encode driver
// ============================================================================

/// Runs `func` through the two-phase encode protocol.
pub(crate) fn encode_two_phase<'a>(
    func: EncodeFn,
    ctx: EncodeContext<'a>,
    value: &'a Value,
) -> CoderResult<Vec<u8>> {
    match func(&ctx, value)? {
        EncodeStep::Ready(output) => {
            trace!(
                coder = %ctx.coder().class_name(),
                len = output.len(),
                "encoder returned ready output"
            );
            Ok(output)
        }
        EncodeStep::NeedsBuffer { len, write } => {
            let mut buffer = vec![0u8; len];
            let written = write(&mut buffer)?;
            if written > len {
                length_violation(ctx.coder(), len, written);
            }
            buffer.truncate(written);
            trace!(coder = %ctx.coder().class_name(), len, written, "encoder filled buffer");
            Ok(buffer)
        }
    }
}

#[cold]
#[allow(clippy::panic)]
fn length_violation(coder: &Coder, len: usize, written: usize) -> ! {
    error!(
        class = %coder.class_name(),
        name = coder.name().unwrap_or(""),
        len,
        written,
        "encoder wrote more bytes than it requested"
    );
    panic!(
        "{}: result length of first encoder run ({len}) is less than second run ({written})",
        coder.display_name()
    );
}

// ============================================================================
// Decode arguments
// ============================================================================

/// Input of a decode call: the buffer, its position hints and encoding.
///
/// # Examples
///
/// ```
/// use pg_coder::coder::DecodeArgs;
/// use pg_coder::domain::value_objects::{CellPosition, TextEncoding};
///
/// let args = DecodeArgs::new(b"42").at(3, 1).with_encoding(TextEncoding::Latin1);
/// assert_eq!(args.position(), CellPosition::new(3, 1));
/// assert_eq!(args.encoding(), TextEncoding::Latin1);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecodeArgs<'a> {
    data: &'a [u8],
    position: CellPosition,
    encoding: TextEncoding,
}

impl<'a> DecodeArgs<'a> {
    /// Creates arguments with unknown position and UTF-8 encoding.
    #[must_use]
    pub const fn new(data: &'a [u8]) -> Self {
        Self {
            data,
            position: CellPosition::UNKNOWN,
            encoding: TextEncoding::Utf8,
        }
    }

    /// Sets the tuple and field hints.
    #[must_use]
    pub const fn at(mut self, tuple: i32, field: i32) -> Self {
        self.position = CellPosition::new(tuple, field);
        self
    }

    /// Sets the declared encoding of the buffer.
    #[must_use]
    pub const fn with_encoding(mut self, encoding: TextEncoding) -> Self {
        self.encoding = encoding;
        self
    }

    /// Parses dynamic positional arguments.
    ///
    /// # Errors
    ///
    /// See [`Coder::decode_positional`].
    pub fn from_positional(args: &'a [Value]) -> CoderResult<Self> {
        match args {
            [buffer] => Self::from_buffer(buffer),
            [buffer, tuple, field] => {
                let args = Self::from_buffer(buffer)?;
                Ok(args.at(index_arg(tuple)?, index_arg(field)?))
            }
            other => Err(CoderError::ArgumentCount { given: other.len() }),
        }
    }

    fn from_buffer(buffer: &'a Value) -> CoderResult<Self> {
        match buffer {
            Value::Text(text) => Ok(Self::new(text.as_bytes())),
            Value::Bytes(bytes) => Ok(Self::new(bytes).with_encoding(TextEncoding::Binary)),
            other => Err(CoderError::WrongArgumentType {
                expected: "text or bytes",
                found: other.type_name(),
            }),
        }
    }

    /// Returns the input buffer.
    #[inline]
    #[must_use]
    pub const fn data(&self) -> &'a [u8] {
        self.data
    }

    /// Returns the position hints.
    #[inline]
    #[must_use]
    pub const fn position(&self) -> CellPosition {
        self.position
    }

    /// Returns the declared encoding.
    #[inline]
    #[must_use]
    pub const fn encoding(&self) -> TextEncoding {
        self.encoding
    }
}

fn index_arg(value: &Value) -> CoderResult<i32> {
    match value {
        Value::Int(i) => i32::try_from(*i)
            .map_err(|_| CoderError::InvalidArgument(format!("position index {i} out of range"))),
        other => Err(CoderError::WrongArgumentType {
            expected: "integer",
            found: other.type_name(),
        }),
    }
}
