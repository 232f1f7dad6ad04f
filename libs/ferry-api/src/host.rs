use std::collections::HashMap;
use std::hash::Hash;

use crate::descriptor::{IntWidth, TypeDesc};

/// Value produced by a conversion, shaped by the resolved descriptor.
///
/// Integer and float variants carry the exact width that was requested,
/// so `Int(W8)` always yields `I8`.
#[derive(Debug, Clone, PartialEq)]
pub enum HostValue {
    Bool(bool),
    I8(i8),
    I16(i16),
    I32(i32),
    I64(i64),
    U8(u8),
    U16(u16),
    U32(u32),
    U64(u64),
    F32(f32),
    F64(f64),
    String(String),
    Seq(Vec<HostValue>),
    Map(HashMap<HostKey, HostValue>),
}

/// Hashable subset of `HostValue`, used for mapping keys.
///
/// Floats are keyed by their bit pattern: `0.0` and `-0.0` are different
/// keys, a NaN key is equal to the identical NaN.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum HostKey {
    Bool(bool),
    I8(i8),
    I16(i16),
    I32(i32),
    I64(i64),
    U8(u8),
    U16(u16),
    U32(u32),
    U64(u64),
    /// `f32::to_bits`.
    F32(u32),
    /// `f64::to_bits`.
    F64(u64),
    String(String),
}

impl HostKey {
    /// Structural values cannot be keys; they are handed back unchanged.
    pub fn from_value(value: HostValue) -> Result<Self, HostValue> {
        Ok(match value {
            HostValue::Bool(v) => HostKey::Bool(v),
            HostValue::I8(v) => HostKey::I8(v),
            HostValue::I16(v) => HostKey::I16(v),
            HostValue::I32(v) => HostKey::I32(v),
            HostValue::I64(v) => HostKey::I64(v),
            HostValue::U8(v) => HostKey::U8(v),
            HostValue::U16(v) => HostKey::U16(v),
            HostValue::U32(v) => HostKey::U32(v),
            HostValue::U64(v) => HostKey::U64(v),
            HostValue::F32(v) => HostKey::F32(v.to_bits()),
            HostValue::F64(v) => HostKey::F64(v.to_bits()),
            HostValue::String(v) => HostKey::String(v),
            other @ (HostValue::Seq(_) | HostValue::Map(_)) => return Err(other),
        })
    }

    pub fn into_value(self) -> HostValue {
        match self {
            HostKey::Bool(v) => HostValue::Bool(v),
            HostKey::I8(v) => HostValue::I8(v),
            HostKey::I16(v) => HostValue::I16(v),
            HostKey::I32(v) => HostValue::I32(v),
            HostKey::I64(v) => HostValue::I64(v),
            HostKey::U8(v) => HostValue::U8(v),
            HostKey::U16(v) => HostValue::U16(v),
            HostKey::U32(v) => HostValue::U32(v),
            HostKey::U64(v) => HostValue::U64(v),
            HostKey::F32(bits) => HostValue::F32(f32::from_bits(bits)),
            HostKey::F64(bits) => HostValue::F64(f64::from_bits(bits)),
            HostKey::String(v) => HostValue::String(v),
        }
    }
}

// ---------------------------------------------------------------------------
// Static host types
// ---------------------------------------------------------------------------

/// A Rust type that can be the target of a conversion.
///
/// `descriptor()` describes the shape statically; `from_host()` unwraps a
/// value produced for that descriptor. `HostValue` itself maps to `any`.
pub trait HostType: Sized {
    fn descriptor() -> TypeDesc;

    /// `None` if `value` does not have the shape `descriptor()` asks for.
    fn from_host(value: HostValue) -> Option<Self>;
}

impl HostType for HostValue {
    fn descriptor() -> TypeDesc {
        TypeDesc::Any
    }

    fn from_host(value: HostValue) -> Option<Self> {
        Some(value)
    }
}

impl HostType for bool {
    fn descriptor() -> TypeDesc {
        TypeDesc::Bool
    }

    fn from_host(value: HostValue) -> Option<Self> {
        match value {
            HostValue::Bool(v) => Some(v),
            _ => None,
        }
    }
}

impl HostType for String {
    fn descriptor() -> TypeDesc {
        TypeDesc::String
    }

    fn from_host(value: HostValue) -> Option<Self> {
        match value {
            HostValue::String(v) => Some(v),
            _ => None,
        }
    }
}

macro_rules! host_scalar {
    ($ty:ty, $variant:ident, $desc:expr) => {
        impl HostType for $ty {
            fn descriptor() -> TypeDesc {
                $desc
            }

            fn from_host(value: HostValue) -> Option<Self> {
                match value {
                    HostValue::$variant(v) => Some(v),
                    _ => None,
                }
            }
        }
    };
}

host_scalar!(i8, I8, TypeDesc::Int(IntWidth::W8));
host_scalar!(i16, I16, TypeDesc::Int(IntWidth::W16));
host_scalar!(i32, I32, TypeDesc::Int(IntWidth::W32));
host_scalar!(i64, I64, TypeDesc::Int(IntWidth::W64));
host_scalar!(u8, U8, TypeDesc::Uint(IntWidth::W8));
host_scalar!(u16, U16, TypeDesc::Uint(IntWidth::W16));
host_scalar!(u32, U32, TypeDesc::Uint(IntWidth::W32));
host_scalar!(u64, U64, TypeDesc::Uint(IntWidth::W64));
host_scalar!(f32, F32, TypeDesc::Float32);
host_scalar!(f64, F64, TypeDesc::Float64);

impl<T: HostType> HostType for Vec<T> {
    fn descriptor() -> TypeDesc {
        TypeDesc::sequence(T::descriptor())
    }

    fn from_host(value: HostValue) -> Option<Self> {
        match value {
            HostValue::Seq(items) => items.into_iter().map(T::from_host).collect(),
            _ => None,
        }
    }
}

impl<K, V> HostType for HashMap<K, V>
where
    K: HostType + Eq + Hash,
    V: HostType,
{
    fn descriptor() -> TypeDesc {
        TypeDesc::mapping(K::descriptor(), V::descriptor())
    }

    fn from_host(value: HostValue) -> Option<Self> {
        match value {
            HostValue::Map(entries) => entries
                .into_iter()
                .map(|(k, v)| Some((K::from_host(k.into_value())?, V::from_host(v)?)))
                .collect(),
            _ => None,
        }
    }
}
