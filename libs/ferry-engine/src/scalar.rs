use ferry_api::{HostValue, IntWidth, Kind, WireValue};

use crate::error::ConvertError;
use crate::parse;

pub(crate) fn to_bool(value: &WireValue) -> Result<HostValue, ConvertError> {
    match value {
        WireValue::Bool(b) => Ok(HostValue::Bool(*b)),
        other => Err(ConvertError::mismatch(Kind::Bool, other)),
    }
}

/// Signed integer, wrapped to `width` with two's-complement truncation.
pub(crate) fn to_int(value: &WireValue, width: IntWidth) -> Result<HostValue, ConvertError> {
    let n = match value {
        WireValue::Int(i) => *i,
        WireValue::String(s) => {
            parse::parse_int(s).map_err(|cause| ConvertError::parse(s, cause))?
        }
        other => return Err(ConvertError::mismatch(Kind::Int(width), other)),
    };
    Ok(narrow_int(n, width))
}

/// Unsigned integer. Negative wire integers are rejected, then the value
/// is wrapped to `width` like the signed case.
pub(crate) fn to_uint(value: &WireValue, width: IntWidth) -> Result<HostValue, ConvertError> {
    let n = match value {
        WireValue::Int(i) if *i < 0 => return Err(ConvertError::NegativeForUnsigned(*i)),
        WireValue::Int(i) => *i as u64,
        WireValue::String(s) => {
            parse::parse_uint(s).map_err(|cause| ConvertError::parse(s, cause))?
        }
        other => return Err(ConvertError::mismatch(Kind::Uint(width), other)),
    };
    Ok(narrow_uint(n, width))
}

pub(crate) fn to_float64(value: &WireValue) -> Result<HostValue, ConvertError> {
    match value {
        WireValue::Int(i) => Ok(HostValue::F64(*i as f64)),
        WireValue::String(s) => parse::parse_f64(s)
            .map(HostValue::F64)
            .map_err(|cause| ConvertError::parse(s, cause)),
        other => Err(ConvertError::mismatch(Kind::Float64, other)),
    }
}

/// Integers are widened to `f64` before narrowing to `f32`.
pub(crate) fn to_float32(value: &WireValue) -> Result<HostValue, ConvertError> {
    match value {
        WireValue::Int(i) => Ok(HostValue::F32(*i as f64 as f32)),
        WireValue::String(s) => parse::parse_f32(s)
            .map(HostValue::F32)
            .map_err(|cause| ConvertError::parse(s, cause)),
        other => Err(ConvertError::mismatch(Kind::Float32, other)),
    }
}

pub(crate) fn to_string(value: &WireValue) -> Result<HostValue, ConvertError> {
    match value {
        WireValue::Int(i) => Ok(HostValue::String(i.to_string())),
        WireValue::String(s) => Ok(HostValue::String(s.clone())),
        other => Err(ConvertError::mismatch(Kind::String, other)),
    }
}

fn narrow_int(n: i64, width: IntWidth) -> HostValue {
    match width {
        IntWidth::W8 => HostValue::I8(n as i8),
        IntWidth::W16 => HostValue::I16(n as i16),
        IntWidth::W32 => HostValue::I32(n as i32),
        IntWidth::W64 => HostValue::I64(n),
    }
}

fn narrow_uint(n: u64, width: IntWidth) -> HostValue {
    match width {
        IntWidth::W8 => HostValue::U8(n as u8),
        IntWidth::W16 => HostValue::U16(n as u16),
        IntWidth::W32 => HostValue::U32(n as u32),
        IntWidth::W64 => HostValue::U64(n),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ParseFailure;
    use ferry_api::WireTag;

    fn s(text: &str) -> WireValue {
        WireValue::from(text)
    }

    #[test]
    fn bool_passthrough_only() {
        assert_eq!(to_bool(&WireValue::Bool(true)), Ok(HostValue::Bool(true)));
        assert_eq!(
            to_bool(&s("true")),
            Err(ConvertError::TypeMismatch { expected: Kind::Bool, actual: WireTag::String })
        );
        assert!(to_bool(&WireValue::Int(1)).is_err());
    }

    #[test]
    fn int_narrowing_wraps() {
        assert_eq!(to_int(&WireValue::Int(300), IntWidth::W8), Ok(HostValue::I8(44)));
        assert_eq!(to_int(&WireValue::Int(128), IntWidth::W8), Ok(HostValue::I8(-128)));
        assert_eq!(to_int(&WireValue::Int(-1), IntWidth::W16), Ok(HostValue::I16(-1)));
        assert_eq!(
            to_int(&WireValue::Int(1 << 32), IntWidth::W32),
            Ok(HostValue::I32(0))
        );
        assert_eq!(
            to_int(&WireValue::Int(i64::MIN), IntWidth::W64),
            Ok(HostValue::I64(i64::MIN))
        );
    }

    #[test]
    fn int_from_string() {
        assert_eq!(to_int(&s("0x1F"), IntWidth::W64), Ok(HostValue::I64(31)));
        assert_eq!(to_int(&s("-5"), IntWidth::W32), Ok(HostValue::I32(-5)));
        assert_eq!(to_int(&s("257"), IntWidth::W8), Ok(HostValue::I8(1)));
        assert_eq!(
            to_int(&s("1.5"), IntWidth::W64),
            Err(ConvertError::Parse { text: "1.5".into(), cause: ParseFailure::Syntax })
        );
    }

    #[test]
    fn int_rejects_other_tags() {
        assert_eq!(
            to_int(&WireValue::Float(1.0), IntWidth::W64),
            Err(ConvertError::TypeMismatch {
                expected: Kind::Int(IntWidth::W64),
                actual: WireTag::Float
            })
        );
        assert!(to_int(&WireValue::Bool(true), IntWidth::W8).is_err());
    }

    #[test]
    fn uint_rejects_negative() {
        assert_eq!(
            to_uint(&WireValue::Int(-5), IntWidth::W64),
            Err(ConvertError::NegativeForUnsigned(-5))
        );
        assert_eq!(to_uint(&WireValue::Int(0), IntWidth::W64), Ok(HostValue::U64(0)));
    }

    #[test]
    fn uint_narrowing_wraps() {
        assert_eq!(to_uint(&WireValue::Int(256), IntWidth::W8), Ok(HostValue::U8(0)));
        assert_eq!(to_uint(&WireValue::Int(70000), IntWidth::W16), Ok(HostValue::U16(4464)));
        assert_eq!(
            to_uint(&s("18446744073709551615"), IntWidth::W64),
            Ok(HostValue::U64(u64::MAX))
        );
        assert_eq!(to_uint(&s("0b11"), IntWidth::W32), Ok(HostValue::U32(3)));
    }

    #[test]
    fn uint_string_sign_is_syntax_error() {
        assert_eq!(
            to_uint(&s("-1"), IntWidth::W64),
            Err(ConvertError::Parse { text: "-1".into(), cause: ParseFailure::Syntax })
        );
    }

    #[test]
    fn floats() {
        assert_eq!(to_float32(&WireValue::Int(2)), Ok(HostValue::F32(2.0)));
        assert_eq!(to_float64(&WireValue::Int(-3)), Ok(HostValue::F64(-3.0)));
        assert_eq!(to_float64(&s("2.5")), Ok(HostValue::F64(2.5)));
        assert_eq!(
            to_float32(&WireValue::Int(16_777_217)),
            Ok(HostValue::F32(16_777_216.0))
        );
        assert_eq!(
            to_float32(&s("1e39")),
            Err(ConvertError::Parse { text: "1e39".into(), cause: ParseFailure::Range })
        );
    }

    #[test]
    fn float_tag_is_not_accepted() {
        assert_eq!(
            to_float64(&WireValue::Float(1.5)),
            Err(ConvertError::TypeMismatch { expected: Kind::Float64, actual: WireTag::Float })
        );
        assert!(to_float32(&WireValue::Float(1.5)).is_err());
    }

    #[test]
    fn float_tag_fails_every_scalar_target() {
        let value = WireValue::Float(1.5);
        let mismatch = |expected| ConvertError::TypeMismatch { expected, actual: WireTag::Float };
        assert_eq!(to_bool(&value), Err(mismatch(Kind::Bool)));
        assert_eq!(to_int(&value, IntWidth::W8), Err(mismatch(Kind::Int(IntWidth::W8))));
        assert_eq!(to_uint(&value, IntWidth::W32), Err(mismatch(Kind::Uint(IntWidth::W32))));
        assert_eq!(to_float32(&value), Err(mismatch(Kind::Float32)));
        assert_eq!(to_float64(&value), Err(mismatch(Kind::Float64)));
        assert_eq!(to_string(&value), Err(mismatch(Kind::String)));
    }

    #[test]
    fn strings() {
        assert_eq!(to_string(&WireValue::Int(-42)), Ok(HostValue::String("-42".into())));
        assert_eq!(to_string(&s("hi")), Ok(HostValue::String("hi".into())));
        assert_eq!(
            to_string(&WireValue::Bool(false)),
            Err(ConvertError::TypeMismatch { expected: Kind::String, actual: WireTag::Bool })
        );
    }
}
