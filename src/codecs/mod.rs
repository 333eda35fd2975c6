//! # Reference Codecs
//!
//! A minimal set of codec functions and the namespaces that register them.
//!
//! | Namespace | Class | Base | Function |
//! |-----------|-------|------|----------|
//! | `TextEncoder` | `Integer` | simple | [`text::encode_integer`] |
//! | `TextEncoder` | `String` | simple | [`text::encode_string`] |
//! | `TextEncoder` | `Array` | composite | [`array::encode_array`] |
//! | `TextDecoder` | `Integer` | simple | [`text::decode_integer`] |
//! | `TextDecoder` | `String` | simple | [`text::decode_string`] |
//! | `TextDecoder` | `Array` | composite | [`array::decode_array`] |
//! | `BinaryEncoder` | `Int4`, `Int8` | simple | [`binary::encode_int4`], [`binary::encode_int8`] |
//! | `BinaryDecoder` | `Integer` | simple | [`binary::decode_integer`] |
//!
//! Each namespace is built fresh, so callers may add their own classes to
//! it with [`define_coder`].

pub mod array;
pub mod binary;
pub mod text;

use crate::coder::{BaseClass, CodecFn, Namespace, define_coder};
use crate::domain::errors::CoderResult;
use crate::domain::value_objects::Format;

/// Text-format encoder classes.
///
/// # Errors
///
/// Propagates definition errors; the built-in definitions never fail.
pub fn text_encoders() -> CoderResult<Namespace> {
    let mut ns = Namespace::with_format("TextEncoder", Format::Text);
    define_coder(
        "Integer",
        CodecFn::Encode(text::encode_integer),
        BaseClass::SimpleEncoder,
        &mut ns,
    )?;
    define_coder(
        "String",
        CodecFn::Encode(text::encode_string),
        BaseClass::SimpleEncoder,
        &mut ns,
    )?;
    define_coder(
        "Array",
        CodecFn::Encode(array::encode_array),
        BaseClass::CompositeEncoder,
        &mut ns,
    )?;
    Ok(ns)
}

/// Text-format decoder classes.
///
/// # Errors
///
/// Propagates definition errors; the built-in definitions never fail.
pub fn text_decoders() -> CoderResult<Namespace> {
    let mut ns = Namespace::with_format("TextDecoder", Format::Text);
    define_coder(
        "Integer",
        CodecFn::Decode(text::decode_integer),
        BaseClass::SimpleDecoder,
        &mut ns,
    )?;
    define_coder(
        "String",
        CodecFn::Decode(text::decode_string),
        BaseClass::SimpleDecoder,
        &mut ns,
    )?;
    define_coder(
        "Array",
        CodecFn::Decode(array::decode_array),
        BaseClass::CompositeDecoder,
        &mut ns,
    )?;
    Ok(ns)
}

/// Binary-format encoder classes.
///
/// # Errors
///
/// Propagates definition errors; the built-in definitions never fail.
pub fn binary_encoders() -> CoderResult<Namespace> {
    let mut ns = Namespace::with_format("BinaryEncoder", Format::Binary);
    define_coder(
        "Int4",
        CodecFn::Encode(binary::encode_int4),
        BaseClass::SimpleEncoder,
        &mut ns,
    )?;
    define_coder(
        "Int8",
        CodecFn::Encode(binary::encode_int8),
        BaseClass::SimpleEncoder,
        &mut ns,
    )?;
    Ok(ns)
}

/// Binary-format decoder classes.
///
/// # Errors
///
/// Propagates definition errors; the built-in definitions never fail.
pub fn binary_decoders() -> CoderResult<Namespace> {
    let mut ns = Namespace::with_format("BinaryDecoder", Format::Binary);
    define_coder(
        "Integer",
        CodecFn::Decode(binary::decode_integer),
        BaseClass::SimpleDecoder,
        &mut ns,
    )?;
    Ok(ns)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn namespaces_list_classes() {
        let names: Vec<String> = text_encoders()
            .unwrap()
            .classes()
            .map(|c| c.qualified_name())
            .collect();
        assert_eq!(
            names,
            vec![
                "TextEncoder::Array",
                "TextEncoder::Integer",
                "TextEncoder::String",
            ]
        );
        assert_eq!(text_decoders().unwrap().len(), 3);
        assert_eq!(binary_encoders().unwrap().len(), 2);
        assert_eq!(binary_decoders().unwrap().len(), 1);
    }

    #[test]
    fn namespace_formats() {
        assert_eq!(text_encoders().unwrap().format(), Some(Format::Text));
        assert_eq!(binary_decoders().unwrap().format(), Some(Format::Binary));
    }
}
