//! # Property-Based Tests for Coder Roundtrips
//!
//! Uses proptest to verify that inverse encoder/decoder pairs preserve
//! values and that the two-phase protocol sizes its buffers exactly.
//!
//! # Test Coverage
//!
//! - Text and binary integer roundtrip
//! - Text string roundtrip
//! - Integer and string array roundtrip, including NULLs and any delimiter
//! - Encoded length equals the length the first phase announced

#![allow(clippy::unwrap_used)]
#![allow(clippy::indexing_slicing)]

use proptest::prelude::*;

use crate::codecs;
use crate::coder::{EncodeContext, EncodeStep, Namespace, TypeMap};
use crate::domain::value_objects::{CoderId, Oid, Value};

// ============================================================================
// Fixtures
// ============================================================================

struct Coders {
    map: TypeMap,
    text_int_enc: CoderId,
    text_int_dec: CoderId,
    text_str_enc: CoderId,
    text_str_dec: CoderId,
    bin_int_enc: CoderId,
    bin_int_dec: CoderId,
    int_array_enc: CoderId,
    int_array_dec: CoderId,
    str_array_enc: CoderId,
    str_array_dec: CoderId,
}

fn coders() -> Coders {
    let text_enc = codecs::text_encoders().unwrap();
    let text_dec = codecs::text_decoders().unwrap();
    let bin_enc = codecs::binary_encoders().unwrap();
    let bin_dec = codecs::binary_decoders().unwrap();
    let mut map = TypeMap::new();

    let mut add = |ns: &Namespace, name: &str, oid: u32| {
        let class = ns.get(name).unwrap();
        map.insert_class(&class, Oid::new(oid)).unwrap()
    };
    let text_int_enc = add(&text_enc, "Integer", 20);
    let text_int_dec = add(&text_dec, "Integer", 20);
    let text_str_enc = add(&text_enc, "String", 25);
    let text_str_dec = add(&text_dec, "String", 25);
    let bin_int_enc = add(&bin_enc, "Int8", 20);
    let bin_int_dec = add(&bin_dec, "Integer", 20);
    let int_array_enc = add(&text_enc, "Array", 1016);
    let int_array_dec = add(&text_dec, "Array", 1016);
    let str_array_enc = add(&text_enc, "Array", 1009);
    let str_array_dec = add(&text_dec, "Array", 1009);

    map.set_elements_type(int_array_enc, Some(text_int_enc))
        .unwrap();
    map.set_elements_type(int_array_dec, Some(text_int_dec))
        .unwrap();
    map.get_mut(int_array_enc)
        .unwrap()
        .set_needs_quotation(false)
        .unwrap();
    map.set_elements_type(str_array_enc, Some(text_str_enc))
        .unwrap();
    map.set_elements_type(str_array_dec, Some(text_str_dec))
        .unwrap();

    Coders {
        map,
        text_int_enc,
        text_int_dec,
        text_str_enc,
        text_str_dec,
        bin_int_enc,
        bin_int_dec,
        int_array_enc,
        int_array_dec,
        str_array_enc,
        str_array_dec,
    }
}

// ============================================================================
// Strategies
// ============================================================================

fn nullable_int() -> impl Strategy<Value = Value> {
    prop_oneof![
        1 => Just(Value::Null),
        8 => any::<i64>().prop_map(Value::Int),
    ]
}

fn nullable_string() -> impl Strategy<Value = Value> {
    prop_oneof![
        1 => Just(Value::Null),
        8 => ".{0,12}".prop_map(Value::Text),
    ]
}

fn int_array() -> impl Strategy<Value = Value> {
    prop::collection::vec(nullable_int(), 0..8).prop_map(Value::Array)
}

fn int_rows() -> impl Strategy<Value = Vec<Vec<Value>>> {
    prop::collection::vec(prop::collection::vec(nullable_int(), 1..4), 1..4)
}

// ============================================================================
// Scalar Roundtrips
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(500))]

    #[test]
    fn text_integer_roundtrip(n in any::<i64>()) {
        let c = coders();
        let bytes = c.map.encode(c.text_int_enc, &Value::Int(n)).unwrap();
        prop_assert_eq!(&bytes, &n.to_string().into_bytes());
        prop_assert_eq!(c.map.decode(c.text_int_dec, &bytes).unwrap(), Value::Int(n));
    }

    #[test]
    fn binary_integer_roundtrip(n in any::<i64>()) {
        let c = coders();
        let bytes = c.map.encode(c.bin_int_enc, &Value::Int(n)).unwrap();
        prop_assert_eq!(bytes.len(), 8);
        prop_assert_eq!(c.map.decode(c.bin_int_dec, &bytes).unwrap(), Value::Int(n));
    }

    #[test]
    fn text_string_roundtrip(s in "\\PC{0,32}") {
        let c = coders();
        let value = Value::Text(s);
        let bytes = c.map.encode(c.text_str_enc, &value).unwrap();
        prop_assert_eq!(c.map.decode(c.text_str_dec, &bytes).unwrap(), value);
    }

    /// The buffer path returns exactly the announced length for integers.
    #[test]
    fn announced_length_is_exact(n in any::<i64>()) {
        let c = coders();
        let coder = c.map.get(c.text_int_enc).unwrap();
        let value = Value::Int(n);
        let func = coder.encode_fn().unwrap();
        let step = func(&EncodeContext::new(coder, &c.map), &value).unwrap();
        let EncodeStep::NeedsBuffer { len, write } = step else {
            return Err(TestCaseError::fail("integer encoder must size a buffer"));
        };
        let mut buffer = vec![0u8; len];
        prop_assert_eq!(write(&mut buffer).unwrap(), len);
    }
}

// ============================================================================
// Array Roundtrips
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(300))]

    #[test]
    fn int_array_roundtrip(value in int_array()) {
        let c = coders();
        let bytes = c.map.encode(c.int_array_enc, &value).unwrap();
        prop_assert_eq!(c.map.decode(c.int_array_dec, &bytes).unwrap(), value);
    }

    #[test]
    fn nested_int_array_roundtrip(rows in int_rows()) {
        let c = coders();
        let value = Value::Array(rows.into_iter().map(Value::Array).collect());
        let bytes = c.map.encode(c.int_array_enc, &value).unwrap();
        prop_assert_eq!(c.map.decode(c.int_array_dec, &bytes).unwrap(), value);
    }

    #[test]
    fn string_array_roundtrip(
        items in prop::collection::vec(nullable_string(), 0..8),
        delimiter in prop::sample::select(vec![b',', b';', b'|', b'\t', 0xA7]),
    ) {
        let mut c = coders();
        for id in [c.str_array_enc, c.str_array_dec] {
            c.map.get_mut(id).unwrap().set_delimiter(&[delimiter]).unwrap();
        }
        let value = Value::Array(items);
        let bytes = c.map.encode(c.str_array_enc, &value).unwrap();
        prop_assert_eq!(c.map.decode(c.str_array_dec, &bytes).unwrap(), value);
    }
}
