//! # Coder Framework Integration Tests
//!
//! Exercises the public surface end to end: class definition, type map
//! wiring, the two-phase encode protocol, decode argument handling and
//! element fallback resolution.

#![allow(clippy::unwrap_used)]
#![allow(clippy::panic)]

use pg_coder::codecs;
use pg_coder::coder::{
    AttrValue, BaseClass, CodecFn, Coder, DecodeContext, EncodeContext, EncodeStep, Namespace,
    TypeMap, define_coder,
};
use pg_coder::config::{CoderConfig, CoderDefaults};
use pg_coder::domain::errors::{CoderError, CoderResult};
use pg_coder::domain::value_objects::{CoderId, Delimiter, Oid, Value};
use std::sync::atomic::{AtomicUsize, Ordering};

// ============================================================================
// Fixtures
// ============================================================================

struct IntArrays {
    map: TypeMap,
    int_enc: CoderId,
    array_enc: CoderId,
    array_dec: CoderId,
}

fn int_arrays() -> IntArrays {
    let encoders = codecs::text_encoders().unwrap();
    let decoders = codecs::text_decoders().unwrap();
    let mut map = TypeMap::new();

    let int_enc = map
        .insert_class(&encoders.get("Integer").unwrap(), Oid::new(23))
        .unwrap();
    let int_dec = map
        .insert_class(&decoders.get("Integer").unwrap(), Oid::new(23))
        .unwrap();
    let array_enc = map
        .insert_class(&encoders.get("Array").unwrap(), Oid::new(1007))
        .unwrap();
    let array_dec = map
        .insert_class(&decoders.get("Array").unwrap(), Oid::new(1007))
        .unwrap();

    map.set_elements_type(array_enc, Some(int_enc)).unwrap();
    map.set_elements_type(array_dec, Some(int_dec)).unwrap();
    let array = map.get_mut(array_enc).unwrap();
    array.set_delimiter(b",").unwrap();
    array.set_needs_quotation(false).unwrap();

    IntArrays {
        map,
        int_enc,
        array_enc,
        array_dec,
    }
}

fn ints(items: &[i64]) -> Value {
    items.iter().copied().collect()
}

// ============================================================================
// Concrete Scenario
// ============================================================================

#[test]
fn integer_array_encodes_to_braces() {
    let f = int_arrays();
    let encoded = f.map.encode(f.array_enc, &ints(&[1, 2, 3])).unwrap();
    assert_eq!(encoded, b"{1,2,3}");
}

#[test]
fn integer_array_decodes_from_braces() {
    let f = int_arrays();
    let decoded = f.map.decode(f.array_dec, b"{1,2,3}").unwrap();
    assert_eq!(decoded, ints(&[1, 2, 3]));
}

#[test]
fn inverse_simple_coders_roundtrip() {
    let encoders = codecs::text_encoders().unwrap();
    let decoders = codecs::text_decoders().unwrap();
    let enc = encoders.instantiate("Integer").unwrap();
    let dec = decoders.instantiate("Integer").unwrap();
    for n in [0, 1, -1, i64::MAX, i64::MIN] {
        let wire = enc.encode(&Value::Int(n)).unwrap();
        assert_eq!(dec.decode(&wire).unwrap(), Value::Int(n));
    }
}

// ============================================================================
// Class Definition
// ============================================================================

#[test]
fn abstract_bases_cannot_be_instantiated() {
    let bases = [
        BaseClass::Coder,
        BaseClass::SimpleCoder,
        BaseClass::CompositeCoder,
    ];
    for base in bases {
        let result = Coder::new(base);
        assert!(matches!(result, Err(CoderError::AbstractClass(_))));
    }
    let composite = Coder::new(BaseClass::CompositeDecoder).unwrap();
    assert!(composite.is_composite());
}

#[test]
fn defined_class_binds_by_role() {
    let mut ns = Namespace::new("Custom");
    define_coder(
        "Doubled",
        CodecFn::Encode(encode_doubled),
        BaseClass::SimpleEncoder,
        &mut ns,
    )
    .unwrap();
    let coder = ns.instantiate("Doubled").unwrap();
    assert_eq!(coder.class_name(), "Custom::Doubled");
    assert!(coder.encode_fn().is_some());
    assert!(coder.decode_fn().is_none());
    assert_eq!(coder.encode(&Value::from(21)).unwrap(), b"42");
}

#[test]
fn defining_with_wrong_role_fails() {
    let mut ns = Namespace::new("Custom");
    let err = define_coder(
        "Broken",
        CodecFn::Encode(encode_doubled),
        BaseClass::SimpleDecoder,
        &mut ns,
    )
    .unwrap_err();
    assert!(matches!(err, CoderError::RoleMismatch { .. }));
    assert!(ns.is_empty());
}

// ============================================================================
// Two-Phase Encode Protocol
// ============================================================================

static READY_CALLS: AtomicUsize = AtomicUsize::new(0);

fn encode_ready<'a>(_ctx: &EncodeContext<'a>, value: &'a Value) -> CoderResult<EncodeStep<'a>> {
    READY_CALLS.fetch_add(1, Ordering::SeqCst);
    Ok(EncodeStep::Ready(format!("ready:{value}").into_bytes()))
}

static SIZED_WRITES: AtomicUsize = AtomicUsize::new(0);

fn encode_over_reserved<'a>(
    _ctx: &EncodeContext<'a>,
    _value: &'a Value,
) -> CoderResult<EncodeStep<'a>> {
    // asks for 8 bytes, writes 3
    Ok(EncodeStep::needs_buffer(8, |buf| {
        SIZED_WRITES.fetch_add(1, Ordering::SeqCst);
        assert_eq!(buf.len(), 8);
        buf.get_mut(..3).unwrap().copy_from_slice(b"abc");
        Ok(3)
    }))
}

fn encode_overflowing<'a>(
    _ctx: &EncodeContext<'a>,
    _value: &'a Value,
) -> CoderResult<EncodeStep<'a>> {
    Ok(EncodeStep::needs_buffer(2, |_buf| Ok(5)))
}

fn encoder(func: pg_coder::coder::EncodeFn) -> Coder {
    let mut coder = Coder::new(BaseClass::SimpleEncoder).unwrap();
    coder.bind(CodecFn::Encode(func)).unwrap();
    coder
}

#[test]
fn ready_output_returned_unchanged() {
    let coder = encoder(encode_ready);
    let before = READY_CALLS.load(Ordering::SeqCst);
    assert_eq!(coder.encode(&Value::from(7)).unwrap(), b"ready:7");
    assert_eq!(READY_CALLS.load(Ordering::SeqCst) - before, 1);
}

#[test]
fn shorter_second_phase_truncates() {
    let coder = encoder(encode_over_reserved);
    let before = SIZED_WRITES.load(Ordering::SeqCst);
    assert_eq!(coder.encode(&Value::Null).unwrap(), b"abc");
    assert_eq!(SIZED_WRITES.load(Ordering::SeqCst) - before, 1);
}

#[test]
#[should_panic(expected = "result length of first encoder run (2) is less than second run (5)")]
fn longer_second_phase_aborts() {
    let mut coder = encoder(encode_overflowing);
    coder.set_name(Some("broken".to_string()));
    let _ = coder.encode(&Value::Null);
}

#[test]
#[should_panic(expected = "SimpleEncoder (broken)")]
fn abort_names_the_coder() {
    let mut coder = encoder(encode_overflowing);
    coder.set_name(Some("broken".to_string()));
    let _ = coder.encode(&Value::Null);
}

#[test]
fn encode_without_function_or_hook_fails() {
    let coder = Coder::new(BaseClass::CompositeEncoder).unwrap();
    assert!(matches!(
        coder.encode(&ints(&[1])),
        Err(CoderError::NoEncoder(_))
    ));
}

// ============================================================================
// Decode Arguments
// ============================================================================

fn decode_position(ctx: &DecodeContext<'_>, _data: &[u8]) -> CoderResult<Value> {
    Ok(Value::Array(vec![
        ctx.position().tuple().map(i64::from).into(),
        ctx.position().field().map(i64::from).into(),
    ]))
}

fn position_decoder() -> Coder {
    let mut ns = Namespace::new("Test");
    define_coder(
        "Position",
        CodecFn::Decode(decode_position),
        BaseClass::SimpleDecoder,
        &mut ns,
    )
    .unwrap();
    ns.instantiate("Position").unwrap()
}

#[test]
fn decode_two_arguments_rejected() {
    let err = position_decoder()
        .decode_positional(&[Value::from("1"), Value::from(0)])
        .unwrap_err();
    assert_eq!(err, CoderError::ArgumentCount { given: 2 });
    assert_eq!(err.to_string(), "wrong number of arguments (2 for 1 or 3)");
}

#[test]
fn decode_one_argument_uses_unknown_hints() {
    let value = position_decoder()
        .decode_positional(&[Value::from("1")])
        .unwrap();
    assert_eq!(value, Value::Array(vec![Value::Null, Value::Null]));
}

#[test]
fn decode_three_arguments_pass_hints_through() {
    let value = position_decoder()
        .decode_positional(&[Value::from("1"), Value::from(12), Value::from(3)])
        .unwrap();
    assert_eq!(value, ints(&[12, 3]));
}

#[test]
fn decode_without_function_fails() {
    let coder = Coder::new(BaseClass::SimpleDecoder).unwrap();
    assert!(matches!(coder.decode(b"1"), Err(CoderError::NoDecoder(_))));
}

// ============================================================================
// Composite Parameters
// ============================================================================

#[test]
fn elements_type_rejects_integer() {
    let mut f = int_arrays();
    let array = f.map.get_mut(f.array_enc).unwrap();
    let err = array
        .set_attribute("elements_type", AttrValue::Int(5))
        .unwrap_err();
    assert_eq!(err, CoderError::WrongElementsType("integer"));
    assert!(err.to_string().contains("integer"));
    assert_eq!(array.elements_type(), Some(f.int_enc));
}

#[test]
fn clearing_elements_type_reenables_fallback() {
    let mut f = int_arrays();
    f.map.set_elements_type(f.array_enc, None).unwrap();
    let mixed = Value::Array(vec![Value::from(1), Value::from("two"), Value::Null]);
    assert_eq!(f.map.encode(f.array_enc, &mixed).unwrap(), b"{1,two,NULL}");
}

#[test]
fn delimiter_length_validated() {
    let mut f = int_arrays();
    let array = f.map.get_mut(f.array_enc).unwrap();
    let empty = array.set_delimiter(b"");
    assert_eq!(empty, Err(CoderError::InvalidDelimiter(0)));
    let double = array.set_delimiter(b"ab");
    assert_eq!(double, Err(CoderError::InvalidDelimiter(2)));
    array.set_delimiter(&[0xFE]).unwrap();
    assert_eq!(array.delimiter(), Some(Delimiter::from_byte(0xFE)));
    assert_eq!(
        f.map.encode(f.array_enc, &ints(&[1, 2])).unwrap(),
        vec![b'{', b'1', 0xFE, b'2', b'}']
    );
}

// ============================================================================
// Element Delegation
// ============================================================================

fn encode_doubled<'a>(ctx: &EncodeContext<'a>, value: &'a Value) -> CoderResult<EncodeStep<'a>> {
    match value {
        Value::Int(n) => Ok(EncodeStep::Ready((n * 2).to_string().into_bytes())),
        other => Err(ctx.unsupported(other)),
    }
}

#[test]
fn element_coder_function_used() {
    let mut f = int_arrays();
    let mut ns = Namespace::new("Test");
    let doubled = CodecFn::Encode(encode_doubled);
    let doubled = ns
        .define("Doubled", doubled, BaseClass::SimpleEncoder)
        .unwrap();
    let doubled = f.map.insert_class(&doubled, Oid::new(23)).unwrap();
    f.map.set_elements_type(f.array_enc, Some(doubled)).unwrap();
    let encoded = f.map.encode(f.array_enc, &ints(&[1, 2, 3])).unwrap();
    assert_eq!(encoded, b"{2,4,6}");
}

#[test]
fn element_host_encoder_used_without_native_function() {
    let mut f = int_arrays();
    let host = Coder::new(BaseClass::SimpleEncoder)
        .unwrap()
        .with_host_encoder(|_, value| Ok(format!("#{value}").into_bytes()));
    let host = f.map.insert(host);
    f.map.set_elements_type(f.array_enc, Some(host)).unwrap();
    let encoded = f.map.encode(f.array_enc, &ints(&[1, 2])).unwrap();
    assert_eq!(encoded, b"{#1,#2}");
}

#[test]
fn detached_composite_cannot_resolve_handle() {
    let f = int_arrays();
    let array = f.map.get(f.array_enc).unwrap();
    assert_eq!(
        array.encode(&ints(&[1])),
        Err(CoderError::UnknownCoder(f.int_enc))
    );
}

#[test]
fn decoder_without_element_coder_returns_strings() {
    let decoders = codecs::text_decoders().unwrap();
    let array = decoders.instantiate("Array").unwrap();
    assert_eq!(
        array.decode(b"{1,b,NULL}").unwrap(),
        Value::Array(vec![Value::from("1"), Value::from("b"), Value::Null])
    );
}

// ============================================================================
// Configuration
// ============================================================================

#[test]
fn configured_defaults_reach_composites() {
    let config = CoderConfig::from_toml_str(
        r#"
        [defaults]
        delimiter = ";"
        needs_quotation = false
        "#,
    )
    .unwrap();
    config.validate().unwrap();

    let mut map = TypeMap::with_defaults(config.defaults);
    let encoders = codecs::text_encoders().unwrap();
    let array = map
        .insert_class(&encoders.get("Array").unwrap(), Oid::new(1009))
        .unwrap();
    let value = Value::Array(vec![Value::from("a b"), Value::from("c")]);
    assert_eq!(map.encode(array, &value).unwrap(), b"{a b;c}");
    assert_ne!(*map.defaults(), CoderDefaults::default());
}
