//! Text-format scalar codecs.

use crate::coder::{DecodeContext, EncodeContext, EncodeStep};
use crate::domain::errors::{CoderError, CoderResult};
use crate::domain::value_objects::{TextEncoding, Value};

/// Encodes an integer as decimal digits.
///
/// The first phase only measures the digit count; the digits are written
/// straight into the sized buffer.
///
/// # Errors
///
/// Returns `CoderError::UnsupportedValue` for non-integer values.
pub fn encode_integer<'a>(
    ctx: &EncodeContext<'a>,
    value: &'a Value,
) -> CoderResult<EncodeStep<'a>> {
    let Value::Int(number) = *value else {
        return Err(ctx.unsupported(value));
    };
    let len = decimal_len(number);
    let step = EncodeStep::needs_buffer(len, move |buf| write_decimal(number, buf));
    Ok(step)
}

/// Decodes decimal digits, with optional sign and surrounding whitespace.
///
/// # Errors
///
/// Returns `CoderError::InvalidInput` if the input is not an `i64`.
pub fn decode_integer(ctx: &DecodeContext<'_>, data: &[u8]) -> CoderResult<Value> {
    let text = std::str::from_utf8(data)
        .map_err(|_| ctx.invalid_input("integer input is not valid UTF-8"))?;
    text.trim()
        .parse::<i64>()
        .map(Value::Int)
        .map_err(|e| ctx.invalid_input(format!("invalid integer '{text}': {e}")))
}

/// Encodes any value through its string conversion.
///
/// The output is available immediately, so no buffer is sized.
///
/// # Errors
///
/// Never fails.
pub fn encode_string<'a>(
    _ctx: &EncodeContext<'a>,
    value: &'a Value,
) -> CoderResult<EncodeStep<'a>> {
    Ok(EncodeStep::Ready(value.to_text_bytes().into_owned()))
}

/// Decodes a string in the declared input encoding; binary input yields
/// bytes.
///
/// # Errors
///
/// Returns `CoderError::InvalidEncoding` for malformed text.
pub fn decode_string(ctx: &DecodeContext<'_>, data: &[u8]) -> CoderResult<Value> {
    match ctx.encoding() {
        TextEncoding::Binary => Ok(Value::Bytes(data.to_vec())),
        encoding => {
            let text = encoding.decode_str(data, ctx.position())?;
            Ok(Value::Text(text.into_owned()))
        }
    }
}

fn decimal_len(number: i64) -> usize {
    let mut rest = number.unsigned_abs();
    let mut len = usize::from(number < 0) + 1;
    while rest >= 10 {
        rest /= 10;
        len += 1;
    }
    len
}

fn write_decimal(number: i64, buf: &mut [u8]) -> CoderResult<usize> {
    let len = decimal_len(number);
    let out = buf
        .get_mut(..len)
        .ok_or_else(|| CoderError::InvalidArgument(format!("integer needs {len} bytes")))?;
    let mut rest = number.unsigned_abs();
    for slot in out.iter_mut().rev() {
        // rest % 10 < 10
        #[allow(clippy::cast_possible_truncation)]
        let digit = (rest % 10) as u8;
        *slot = b'0' + digit;
        rest /= 10;
    }
    if number < 0
        && let Some(sign) = out.first_mut()
    {
        *sign = b'-';
    }
    Ok(len)
}
