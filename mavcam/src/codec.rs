//! Encoding of parameter values and fixed-width strings.
//!
//! Extended parameter values are carried in a 128 byte field. Where a scalar
//! goes in that field depends on its type:
//!
//! Type | Outbound encoding
//! ---- | -----------------
//! [`Int32`][ParamType::Int32] | little-endian, in the *last* 4 bytes
//! [`Uint32`][ParamType::Uint32] | little-endian over the whole field, so the value is in the first 4 bytes
//! [`Bool`][ParamType::Bool] | as `Uint32`
//!
//! Controllers place the scalar of a `PARAM_EXT_SET` at body offset 22..26,
//! which is read by [decode_scalar]. [decode_value] is the exact inverse of
//! [encode_scalar].
use crate::{
    params::ParamType,
    protocol::message::{ParamExtSet, PARAM_VALUE_LENGTH},
    Error, Result,
};
use std::ops::Range;

/// Position of the scalar within a `PARAM_EXT_SET` body.
pub const SET_SCALAR_WINDOW: Range<usize> = 22..26;

/// Position of the scalar within the value field of a `PARAM_EXT_SET`.
const VALUE_WINDOW: Range<usize> = (SET_SCALAR_WINDOW.start - ParamExtSet::VALUE_OFFSET)
    ..(SET_SCALAR_WINDOW.end - ParamExtSet::VALUE_OFFSET);

/// Offset of a right-aligned [`Int32`][ParamType::Int32] value.
const INT32_OFFSET: usize = PARAM_VALUE_LENGTH - 4;

/// Encodes a scalar as a 128 byte parameter value.
///
/// ## Errors
///
/// * [`Error::ParameterOutOfRange`] when `value` can't be represented by
///   `typ`; the value is never truncated.
pub fn encode_scalar(value: i64, typ: ParamType) -> Result<[u8; PARAM_VALUE_LENGTH]> {
    if !typ.range().contains(&value) {
        error!("value {value} can't be encoded as {typ}");
        return Err(Error::ParameterOutOfRange);
    }

    let mut out = [0; PARAM_VALUE_LENGTH];
    match typ {
        ParamType::Int32 => {
            let v = i32::try_from(value).map_err(|_| Error::ParameterOutOfRange)?;
            out[INT32_OFFSET..].copy_from_slice(&v.to_le_bytes());
        }
        ParamType::Uint32 | ParamType::Bool => {
            let v = u32::try_from(value).map_err(|_| Error::ParameterOutOfRange)?;
            out[..4].copy_from_slice(&v.to_le_bytes());
        }
    }
    Ok(out)
}

/// Decodes the scalar of a `PARAM_EXT_SET` value field.
///
/// This reads the window at [SET_SCALAR_WINDOW], as a signed value for
/// [`Int32`][ParamType::Int32], and unsigned otherwise.
///
/// ## Errors
///
/// * [`Error::ParameterOutOfRange`] when a [`Bool`][ParamType::Bool] is
///   neither 0 nor 1
pub fn decode_scalar(value: &[u8; PARAM_VALUE_LENGTH], typ: ParamType) -> Result<i64> {
    let mut window = [0; 4];
    window.copy_from_slice(&value[VALUE_WINDOW]);
    checked(window, typ)
}

/// Decodes a value made by [encode_scalar].
///
/// ## Errors
///
/// * [`Error::ParameterOutOfRange`] when a [`Bool`][ParamType::Bool] is
///   neither 0 nor 1
pub fn decode_value(value: &[u8; PARAM_VALUE_LENGTH], typ: ParamType) -> Result<i64> {
    let mut window = [0; 4];
    match typ {
        ParamType::Int32 => window.copy_from_slice(&value[INT32_OFFSET..]),
        ParamType::Uint32 | ParamType::Bool => window.copy_from_slice(&value[..4]),
    }
    checked(window, typ)
}

fn checked(window: [u8; 4], typ: ParamType) -> Result<i64> {
    let value = match typ {
        ParamType::Int32 => i64::from(i32::from_le_bytes(window)),
        ParamType::Uint32 | ParamType::Bool => i64::from(u32::from_le_bytes(window)),
    };

    if !typ.range().contains(&value) {
        error!("value {value} is not a valid {typ}");
        return Err(Error::ParameterOutOfRange);
    }
    Ok(value)
}

/// Left-aligns `text` in a null-padded buffer of `width` bytes.
///
/// `text` is silently truncated if it is longer than `width`. Truncation may
/// split a multi-byte UTF-8 sequence.
pub fn pad_identifier(text: &str, width: usize) -> Vec<u8> {
    let mut out = vec![0; width];
    let l = text.len().min(width);
    out[..l].copy_from_slice(&text.as_bytes()[..l]);
    out
}

/// [pad_identifier] into a fixed-size array, for message fields.
pub fn pad_array<const N: usize>(text: &str) -> [u8; N] {
    let mut out = [0; N];
    let l = text.len().min(N);
    out[..l].copy_from_slice(&text.as_bytes()[..l]);
    out
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::protocol::message::{ParamExtType, PARAM_ID_LENGTH};
    use binrw::BinWrite;
    use std::io::Cursor;

    #[test]
    fn int32() -> Result<()> {
        let v = encode_scalar(-2, ParamType::Int32)?;
        assert_eq!([0u8; INT32_OFFSET], v[..INT32_OFFSET]);
        assert_eq!(hex::decode("feffffff")?, v[INT32_OFFSET..]);
        assert_eq!(-2, decode_value(&v, ParamType::Int32)?);

        let v = encode_scalar(0x12345678, ParamType::Int32)?;
        assert_eq!(hex::decode("78563412")?, v[INT32_OFFSET..]);
        Ok(())
    }

    #[test]
    fn uint32() -> Result<()> {
        let v = encode_scalar(0x12345678, ParamType::Uint32)?;
        assert_eq!(hex::decode("78563412")?, v[..4]);
        assert_eq!([0u8; PARAM_VALUE_LENGTH - 4], v[4..]);
        assert_eq!(0x12345678, decode_value(&v, ParamType::Uint32)?);

        let v = encode_scalar(1, ParamType::Bool)?;
        assert_eq!(1, v[0]);
        assert_eq!([0u8; PARAM_VALUE_LENGTH - 1], v[1..]);
        Ok(())
    }

    #[test]
    fn out_of_range() {
        for (value, typ) in [
            (i64::from(i32::MAX) + 1, ParamType::Int32),
            (i64::from(i32::MIN) - 1, ParamType::Int32),
            (-1, ParamType::Uint32),
            (i64::from(u32::MAX) + 1, ParamType::Uint32),
            (2, ParamType::Bool),
        ] {
            assert!(
                matches!(encode_scalar(value, typ), Err(Error::ParameterOutOfRange)),
                "{value} as {typ}"
            );
        }

        let mut v = [0; PARAM_VALUE_LENGTH];
        v[0] = 2;
        assert!(matches!(
            decode_value(&v, ParamType::Bool),
            Err(Error::ParameterOutOfRange)
        ));
    }

    #[test]
    fn round_trip() -> Result<()> {
        let edges = [0, 1, -1, 0xff, 0x100, i64::from(i32::MIN), i64::from(i32::MAX)];
        for v in edges
            .into_iter()
            .chain((i64::from(i32::MIN)..=i64::from(i32::MAX)).step_by(65_521))
        {
            assert_eq!(v, decode_value(&encode_scalar(v, ParamType::Int32)?, ParamType::Int32)?);
        }

        let edges = [0, 1, 0xff, 0x100, i64::from(i32::MAX) + 1, i64::from(u32::MAX)];
        for v in edges
            .into_iter()
            .chain((0..=i64::from(u32::MAX)).step_by(65_521))
        {
            assert_eq!(
                v,
                decode_value(&encode_scalar(v, ParamType::Uint32)?, ParamType::Uint32)?
            );
        }

        for v in [0, 1] {
            assert_eq!(v, decode_value(&encode_scalar(v, ParamType::Bool)?, ParamType::Bool)?);
        }
        Ok(())
    }

    #[test]
    fn set_window() -> Result<()> {
        // PARAM_EXT_SET for "zoom" = 5 (uint32), as a controller sends it.
        let mut param_value = [0; PARAM_VALUE_LENGTH];
        param_value[4] = 5;
        let set = ParamExtSet::new(pad_array("zoom"), param_value, ParamExtType::Uint32);
        let mut body = Cursor::new(Vec::new());
        set.write(&mut body)?;
        let body = body.into_inner();
        assert_eq!([5u8, 0, 0, 0], body[SET_SCALAR_WINDOW]);

        assert_eq!(5, decode_scalar(&set.param_value, ParamType::Uint32)?);

        let mut param_value = [0; PARAM_VALUE_LENGTH];
        param_value[4..8].copy_from_slice(&(-300i32).to_le_bytes());
        assert_eq!(-300, decode_scalar(&param_value, ParamType::Int32)?);
        assert_eq!(
            i64::from((-300i32) as u32),
            decode_scalar(&param_value, ParamType::Uint32)?
        );
        Ok(())
    }

    #[test]
    fn padding() {
        for width in [PARAM_ID_LENGTH, 32, 140, 160] {
            assert_eq!(width, pad_identifier("", width).len());
            assert_eq!(width, pad_identifier("video", width).len());
            assert_eq!(width, pad_identifier(&"x".repeat(200), width).len());
        }

        let p = pad_identifier("video", 8);
        assert_eq!(b"video\0\0\0", &p[..]);
        assert_eq!(b"0123", &pad_identifier("0123456789", 4)[..]);
        assert!(pad_identifier("", 0).is_empty());

        let p: [u8; PARAM_ID_LENGTH] = pad_array("exposure_absolute_long");
        assert_eq!(b"exposure_absolut", &p);
        let p: [u8; 8] = pad_array("zoom");
        assert_eq!(b"zoom\0\0\0\0", &p);
    }
}
