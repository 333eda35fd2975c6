//! Binary-format integer codecs (network byte order).

use crate::coder::{DecodeContext, EncodeContext, EncodeStep};
use crate::domain::errors::{CoderError, CoderResult};
use crate::domain::value_objects::Value;

/// Encodes an integer as 8 big-endian bytes.
///
/// # Errors
///
/// Returns `CoderError::UnsupportedValue` for non-integer values.
pub fn encode_int8<'a>(ctx: &EncodeContext<'a>, value: &'a Value) -> CoderResult<EncodeStep<'a>> {
    let Value::Int(number) = *value else {
        return Err(ctx.unsupported(value));
    };
    Ok(write_fixed(number.to_be_bytes()))
}

/// Encodes an integer as 4 big-endian bytes.
///
/// # Errors
///
/// Returns `CoderError::UnsupportedValue` for non-integer values and
/// `CoderError::InvalidArgument` for integers outside the `i32` range.
pub fn encode_int4<'a>(ctx: &EncodeContext<'a>, value: &'a Value) -> CoderResult<EncodeStep<'a>> {
    let Value::Int(number) = *value else {
        return Err(ctx.unsupported(value));
    };
    let number = i32::try_from(number)
        .map_err(|_| CoderError::InvalidArgument(format!("{number} out of range for int4")))?;
    Ok(write_fixed(number.to_be_bytes()))
}

/// Decodes a 2, 4 or 8 byte big-endian integer.
///
/// # Errors
///
/// Returns `CoderError::InvalidInput` for any other width.
pub fn decode_integer(ctx: &DecodeContext<'_>, data: &[u8]) -> CoderResult<Value> {
    let number = match *data {
        [a, b] => i64::from(i16::from_be_bytes([a, b])),
        [a, b, c, d] => i64::from(i32::from_be_bytes([a, b, c, d])),
        [a, b, c, d, e, f, g, h] => i64::from_be_bytes([a, b, c, d, e, f, g, h]),
        _ => {
            return Err(ctx.invalid_input(format!(
                "integer must be 2, 4 or 8 bytes, got {}",
                data.len()
            )));
        }
    };
    Ok(Value::Int(number))
}

fn write_fixed<'a, const N: usize>(bytes: [u8; N]) -> EncodeStep<'a> {
    EncodeStep::needs_buffer(N, move |buf| {
        buf.get_mut(..N)
            .ok_or_else(|| CoderError::InvalidArgument(format!("integer needs {N} bytes")))?
            .copy_from_slice(&bytes);
        Ok(N)
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::codecs;
    use crate::domain::value_objects::Format;

    #[test]
    fn int8_big_endian() {
        let encoders = codecs::binary_encoders().unwrap();
        let coder = encoders.instantiate("Int8").unwrap();
        assert_eq!(coder.format(), Format::Binary);
        assert_eq!(
            coder.encode(&Value::Int(0x0102)).unwrap(),
            vec![0, 0, 0, 0, 0, 0, 1, 2]
        );
    }

    #[test]
    fn int4_range_checked() {
        let encoders = codecs::binary_encoders().unwrap();
        let coder = encoders.instantiate("Int4").unwrap();
        assert_eq!(coder.encode(&Value::Int(-1)).unwrap(), vec![0xFF; 4]);
        assert!(matches!(
            coder.encode(&Value::Int(i64::from(i32::MAX) + 1)),
            Err(CoderError::InvalidArgument(_))
        ));
    }

    #[test]
    fn decode_widths() {
        let decoders = codecs::binary_decoders().unwrap();
        let coder = decoders.instantiate("Integer").unwrap();
        assert_eq!(coder.decode(&[0xFF, 0xFE]).unwrap(), Value::Int(-2));
        assert_eq!(coder.decode(&[0, 0, 1, 0]).unwrap(), Value::Int(256));
        assert_eq!(
            coder.decode(&i64::MIN.to_be_bytes()).unwrap(),
            Value::Int(i64::MIN)
        );
        assert!(matches!(
            coder.decode(&[1, 2, 3]),
            Err(CoderError::InvalidInput { .. })
        ));
    }
}
