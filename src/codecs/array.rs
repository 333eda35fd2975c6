//! # Text Array Codec
//!
//! Composite codec for the text array syntax `{a,b,{c,d},NULL}`.
//!
//! Elements are converted by the composite's element coder, or by the
//! fallback path when it has none. The codec contributes only the
//! structure: braces, the configured delimiter, NULL markers, and quoting
//! with backslash escapes.
//!
//! With quotation enabled an element is quoted when it is empty, spells
//! `NULL` in any case, or contains a quote, backslash, brace, the
//! delimiter or whitespace. With quotation disabled elements are written
//! verbatim, which suits element types whose text form never needs quoting.
//!
//! The delimiter must not be a quote, backslash or brace, and arrays nest
//! at most [`MAX_DIMENSIONS`] levels deep. Both directions reject values
//! and inputs outside these limits.

use crate::coder::{
    CoderLookup, CompositeParams, DecodeContext, ElementDecoder, ElementEncoder, EncodeContext,
    EncodeStep,
};
use crate::domain::errors::{CoderError, CoderResult};
use crate::domain::value_objects::Value;
use std::borrow::Cow;

const NULL_LITERAL: &[u8] = b"NULL";

/// Maximum nesting depth of an array, matching the server's limit.
pub const MAX_DIMENSIONS: usize = 6;

// ============================================================================
// Encode
// ============================================================================

/// Encodes a [`Value::Array`] in text array syntax.
///
/// The first phase encodes every element and measures the output; the
/// second writes braces, delimiters and quoted elements into the buffer.
///
/// # Errors
///
/// Returns `CoderError::UnsupportedValue` for non-array values,
/// `CoderError::NotComposite` when bound to a simple coder,
/// `CoderError::InvalidArgument` for a structural delimiter or an array
/// nested deeper than [`MAX_DIMENSIONS`], or the error of the element coder.
pub fn encode_array<'a>(
    ctx: &EncodeContext<'a>,
    value: &'a Value,
) -> CoderResult<EncodeStep<'a>> {
    let Value::Array(values) = value else {
        return Err(ctx.unsupported(value));
    };
    let name = || ctx.coder().display_name();
    let params = composite_params(ctx.composite(), name)?;
    let delimiter = checked_delimiter(params, name)?;
    let element = ctx.element_encoder()?;
    let items = Collector {
        element: &element,
        lookup: ctx.lookup(),
        quote: params.needs_quotation(),
        delimiter,
    }
    .items(values, 1)?;
    let len = items_len(&items);

    Ok(EncodeStep::needs_buffer(len, move |buf| {
        let mut out = SliceWriter::new(buf);
        write_items(&items, delimiter, &mut out);
        Ok(out.position())
    }))
}

enum Item<'a> {
    Null,
    Element { text: Cow<'a, [u8]>, quoted: bool },
    Nested(Vec<Item<'a>>),
}

/// First encode phase: converts elements and decides their quoting.
struct Collector<'c, 'a> {
    element: &'c ElementEncoder<'a>,
    lookup: &'a dyn CoderLookup,
    quote: bool,
    delimiter: u8,
}

impl<'a> Collector<'_, 'a> {
    fn items(&self, values: &'a [Value], depth: usize) -> CoderResult<Vec<Item<'a>>> {
        if depth > MAX_DIMENSIONS {
            return Err(CoderError::InvalidArgument(format!(
                "number of array dimensions exceeds the maximum allowed ({MAX_DIMENSIONS})"
            )));
        }
        values
            .iter()
            .map(|value| match value {
                Value::Null => Ok(Item::Null),
                Value::Array(nested) => self.items(nested, depth + 1).map(Item::Nested),
                other => {
                    let text = self.element.encode(other, self.lookup)?;
                    let quoted = self.quote && needs_quotes(&text, self.delimiter);
                    Ok(Item::Element { text, quoted })
                }
            })
            .collect()
    }
}

fn needs_quotes(text: &[u8], delimiter: u8) -> bool {
    text.is_empty()
        || text.eq_ignore_ascii_case(NULL_LITERAL)
        || text.iter().any(|&b| {
            matches!(b, b'"' | b'\\' | b'{' | b'}') || b == delimiter || is_array_space(b)
        })
}

fn is_array_space(byte: u8) -> bool {
    matches!(byte, b' ' | b'\t' | b'\n' | b'\r' | 0x0B | 0x0C)
}

fn items_len(items: &[Item<'_>]) -> usize {
    let inner: usize = items.iter().map(item_len).sum();
    2 + inner + items.len().saturating_sub(1)
}

fn item_len(item: &Item<'_>) -> usize {
    match item {
        Item::Null => NULL_LITERAL.len(),
        Item::Element {
            text,
            quoted: false,
        } => text.len(),
        Item::Element { text, quoted: true } => {
            2 + text.len() + text.iter().filter(|&&b| b == b'"' || b == b'\\').count()
        }
        Item::Nested(items) => items_len(items),
    }
}

/// Writes into a fixed buffer, counting every byte offered.
///
/// Bytes past the end are dropped but still counted, so an undersized
/// first phase shows up as a position larger than the buffer.
struct SliceWriter<'b> {
    buf: &'b mut [u8],
    pos: usize,
}

impl<'b> SliceWriter<'b> {
    fn new(buf: &'b mut [u8]) -> Self {
        Self { buf, pos: 0 }
    }

    fn push(&mut self, byte: u8) {
        if let Some(slot) = self.buf.get_mut(self.pos) {
            *slot = byte;
        }
        self.pos += 1;
    }

    fn extend(&mut self, bytes: &[u8]) {
        for &b in bytes {
            self.push(b);
        }
    }

    fn position(&self) -> usize {
        self.pos
    }
}

fn write_items(items: &[Item<'_>], delimiter: u8, out: &mut SliceWriter<'_>) {
    out.push(b'{');
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            out.push(delimiter);
        }
        match item {
            Item::Null => out.extend(NULL_LITERAL),
            Item::Element {
                text,
                quoted: false,
            } => out.extend(text),
            Item::Element { text, quoted: true } => {
                out.push(b'"');
                for &b in text.iter() {
                    if b == b'"' || b == b'\\' {
                        out.push(b'\\');
                    }
                    out.push(b);
                }
                out.push(b'"');
            }
            Item::Nested(nested) => write_items(nested, delimiter, out),
        }
    }
    out.push(b'}');
}

// ============================================================================
// Decode
// ============================================================================

/// Decodes text array syntax into a [`Value::Array`].
///
/// Unquoted `NULL` (any case) becomes [`Value::Null`]; every other element
/// goes through the element decoder, or is returned as a string when the
/// composite has no element coder.
///
/// # Errors
///
/// Returns `CoderError::InvalidInput` for malformed syntax or nesting
/// deeper than [`MAX_DIMENSIONS`], `CoderError::NotComposite` when bound to
/// a simple coder, `CoderError::InvalidArgument` for a structural
/// delimiter, or the error of the element decoder.
pub fn decode_array(ctx: &DecodeContext<'_>, data: &[u8]) -> CoderResult<Value> {
    let name = || ctx.coder().display_name();
    let params = composite_params(ctx.composite(), name)?;
    let delimiter = checked_delimiter(params, name)?;
    let element = ctx.element_decoder()?;
    let mut parser = ArrayParser {
        data,
        pos: 0,
        depth: 0,
        delimiter,
        ctx,
        element: &element,
    };

    parser.skip_whitespace();
    let value = parser.parse_array()?;
    parser.skip_whitespace();
    if parser.pos != data.len() {
        return Err(ctx.invalid_input("junk after closing right brace"));
    }
    Ok(value)
}

struct ArrayParser<'p, 'a> {
    data: &'p [u8],
    pos: usize,
    depth: usize,
    delimiter: u8,
    ctx: &'p DecodeContext<'a>,
    element: &'p ElementDecoder<'a>,
}

impl ArrayParser<'_, '_> {
    fn peek(&self) -> Option<u8> {
        self.data.get(self.pos).copied()
    }

    fn error(&self, message: impl Into<String>) -> CoderError {
        let message: String = message.into();
        let text = format!("malformed array literal at byte {}: {message}", self.pos);
        self.ctx.invalid_input(text)
    }

    fn unexpected(&self) -> CoderError {
        match self.peek() {
            Some(b) => self.error(format!("unexpected character '{}'", char::from(b))),
            None => self.error("unexpected end of input"),
        }
    }

    fn skip_whitespace(&mut self) {
        while let Some(b) = self.peek()
            && is_array_space(b)
            && b != self.delimiter
        {
            self.pos += 1;
        }
    }

    fn parse_array(&mut self) -> CoderResult<Value> {
        if self.peek() != Some(b'{') {
            return Err(self.unexpected());
        }
        if self.depth == MAX_DIMENSIONS {
            return Err(self.error(format!(
                "number of array dimensions exceeds the maximum allowed ({MAX_DIMENSIONS})"
            )));
        }
        self.pos += 1;
        self.depth += 1;
        let items = self.parse_items()?;
        self.depth -= 1;
        Ok(Value::Array(items))
    }

    /// Parses the elements after an opening brace, up to its closing brace.
    fn parse_items(&mut self) -> CoderResult<Vec<Value>> {
        let mut items = Vec::new();
        self.skip_whitespace();
        if self.peek() == Some(b'}') {
            self.pos += 1;
            return Ok(items);
        }

        loop {
            self.skip_whitespace();
            let item = match self.peek() {
                Some(b'{') => self.parse_array()?,
                Some(b'"') => {
                    let text = self.parse_quoted()?;
                    self.element.decode(&text, self.ctx)?
                }
                Some(_) => match self.parse_unquoted()? {
                    Some(text) => self.element.decode(&text, self.ctx)?,
                    None => Value::Null,
                },
                None => return Err(self.unexpected()),
            };
            items.push(item);

            self.skip_whitespace();
            match self.peek() {
                Some(b'}') => {
                    self.pos += 1;
                    return Ok(items);
                }
                Some(b) if b == self.delimiter => self.pos += 1,
                _ => return Err(self.unexpected()),
            }
        }
    }

    fn parse_quoted(&mut self) -> CoderResult<Vec<u8>> {
        // opening quote
        self.pos += 1;
        let mut text = Vec::new();
        loop {
            match self.peek() {
                Some(b'"') => {
                    self.pos += 1;
                    return Ok(text);
                }
                Some(b'\\') => {
                    self.pos += 1;
                    let Some(escaped) = self.peek() else {
                        return Err(self.error("unterminated quoted element"));
                    };
                    text.push(escaped);
                }
                Some(b) => text.push(b),
                None => return Err(self.error("unterminated quoted element")),
            }
            self.pos += 1;
        }
    }

    /// Returns `None` for an unquoted NULL marker.
    fn parse_unquoted(&mut self) -> CoderResult<Option<Vec<u8>>> {
        let mut text = Vec::new();
        let mut escaped = false;
        // length up to the last significant byte; trailing whitespace is dropped
        let mut keep = 0;
        while let Some(b) = self.peek() {
            if b == self.delimiter || b == b'}' {
                break;
            }
            match b {
                b'\\' => {
                    self.pos += 1;
                    let Some(next) = self.peek() else {
                        return Err(self.unexpected());
                    };
                    text.push(next);
                    escaped = true;
                    keep = text.len();
                }
                b'{' | b'"' => return Err(self.unexpected()),
                _ => {
                    text.push(b);
                    if !is_array_space(b) {
                        keep = text.len();
                    }
                }
            }
            self.pos += 1;
        }
        text.truncate(keep);

        if text.is_empty() && !escaped {
            return Err(self.unexpected());
        }
        if !escaped && text.eq_ignore_ascii_case(NULL_LITERAL) {
            return Ok(None);
        }
        Ok(Some(text))
    }
}

// ============================================================================
// Parameters
// ============================================================================

fn composite_params<'a>(
    params: Option<&'a CompositeParams>,
    coder_name: impl FnOnce() -> String,
) -> CoderResult<&'a CompositeParams> {
    params.ok_or_else(|| CoderError::NotComposite(coder_name()))
}

/// Returns the delimiter byte unless it collides with the array syntax.
fn checked_delimiter(
    params: &CompositeParams,
    coder_name: impl FnOnce() -> String,
) -> CoderResult<u8> {
    let delimiter = params.delimiter().as_byte();
    if matches!(delimiter, b'"' | b'\\' | b'{' | b'}') {
        return Err(CoderError::InvalidArgument(format!(
            "{}: '{}' cannot delimit array elements",
            coder_name(),
            char::from(delimiter)
        )));
    }
    Ok(delimiter)
}
